// Copyright 2024-2025 Irreducible Inc.

//! Lookup-table decomposition of the nonlinear SHA-256 primitives.
//!
//! Each sigma function is split along a two-coloring of its input bits ([`partition`]) so that
//! its output can be rebuilt from two bounded-size table lookups and one XOR lookup. Ch and Maj
//! are decomposed over disjoint bit chunks and recombined by plain addition. The tables are
//! checked against the reference functions and compressor of [`sha256air_hash`] by the
//! [`validate`] module, and [`cost`] gives the resulting circuit cost of one compression.

pub mod analyze;
pub mod cost;
pub mod error;
pub mod lookup;
pub mod partition;
pub mod subset;
#[cfg(test)]
mod test_utils;
pub mod validate;

pub use analyze::{analyze, Analysis};
pub use cost::{sha256_cost, Cost, CostEstimate, Primitive};
pub use error::{Error, Result};
pub use lookup::{build_tables, LookupTable, LookupTables};
pub use partition::{find_split, Partition};
pub use sha256air_hash::RotationVariant;
pub use subset::get_subset;
pub use validate::{
	validate, validate_sha256, validate_with_rng, RangeChecks, RoundFunctions, ValidationConfig,
	ValidationReport,
};

/// Derives the input/output partition of `variant`.
pub fn derive_partition(variant: RotationVariant) -> Result<Partition> {
	find_split(variant)
}
