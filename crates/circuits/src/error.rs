// Copyright 2024-2025 Irreducible Inc.

use sha256air_hash::RotationVariant;

use crate::lookup::AddStep;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("no valid split found for {variant} after {attempts} attempts")]
	NoValidSplit {
		variant: RotationVariant,
		attempts: usize,
	},
	#[error("limb {limb:#x} is not in the domain of table {table} (mask {mask:#x})")]
	LimbNotInDomain { table: String, limb: u32, mask: u32 },
	#[error("table {table} expects {expected} key limbs, got {actual}")]
	KeyArity {
		table: String,
		expected: usize,
		actual: usize,
	},
	#[error("{step:?} sum {value:#x} has carry {carry}, above the bound {max_carry}")]
	CarryOutOfRange {
		step: AddStep,
		value: u32,
		carry: u32,
		max_carry: u32,
	},
	#[error("{step:?} adds at most {max} operands, got {count}")]
	TooManyOperands {
		step: AddStep,
		count: usize,
		max: usize,
	},
	#[error(
		"{primitive} mismatch on input {input:x?}: expected {expected:#010x}, got {actual:#010x}"
	)]
	Mismatch {
		primitive: String,
		input: Vec<u32>,
		expected: u32,
		actual: u32,
	},
	#[error("{variant} has no {function} tables")]
	MissingBitwiseTables {
		variant: RotationVariant,
		function: &'static str,
	},
	#[error("configuration error: {0}")]
	Env(#[from] sha256air_utils::env::Error),
}
