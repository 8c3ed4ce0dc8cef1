// Copyright 2024-2025 Irreducible Inc.

use std::num::ParseIntError;

/// Environment variable overriding the number of validation samples.
pub const SAMPLES_ENV_VAR: &str = "SHA256AIR_SAMPLES";

/// Environment flag enabling bit-pattern dumps of the derived partitions.
pub const DUMP_ENV_VAR: &str = "SHA256AIR_DUMP";

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("{var} must be a valid integer: {source}")]
	InvalidInteger {
		var: &'static str,
		#[source]
		source: ParseIntError,
	},
}

/// Read boolean flag from the environment variable.
pub fn boolean_env_flag_set(flag: &str) -> bool {
	match std::env::var(flag) {
		Ok(val) => ["1", "on", "ON", "true", "TRUE", "yes", "YES"].contains(&val.as_str()),
		Err(_) => false,
	}
}

/// Read an unsigned integer from the environment variable, `None` when unset.
pub fn usize_env_var(var: &'static str) -> Result<Option<usize>, Error> {
	match std::env::var(var) {
		Ok(val) => val
			.trim()
			.parse::<usize>()
			.map(Some)
			.map_err(|source| Error::InvalidInteger { var, source }),
		Err(_) => Ok(None),
	}
}

/// Get the validation sample count from the environment variable.
pub fn get_sample_count() -> Result<Option<usize>, Error> {
	usize_env_var(SAMPLES_ENV_VAR)
}
