// Copyright 2023-2025 Irreducible Inc.

/// Default filter directive used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "info";

/// Installs a global `tracing` subscriber printing formatted events to stderr.
///
/// The filter is taken from `RUST_LOG` and falls back to [`DEFAULT_FILTER`]. Calling this more
/// than once is harmless: only the first call installs a subscriber.
pub fn init_tracing() {
	use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

	let _ = tracing_subscriber::registry()
		.with(filter)
		.with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
		.try_init();
}
