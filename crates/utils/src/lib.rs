// Copyright 2024-2025 Irreducible Inc.

pub mod bits;
pub mod checked_arithmetics;
pub mod env;
pub mod formatting;
pub mod tracing;
