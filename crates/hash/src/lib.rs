// Copyright 2023-2025 Irreducible Inc.

//! Bit-exact reference implementation of the SHA-256 primitives and of the single-chunk
//! compression function.
//!
//! Everything here is an oracle: the lookup decomposition built elsewhere is checked against
//! these functions, so they favour clarity over speed.

pub mod compression;
pub mod error;
pub mod primitives;

pub use compression::*;
pub use error::Error;
pub use primitives::*;
