// Copyright 2024-2025 Irreducible Inc.

//! Closed-form circuit cost of SHA-256 with the lookup decomposition.
//!
//! Costs are counted in committed trace cells (T) and lookups (L). A lookup is weighted as two
//! trace cells when a single figure is needed.

use std::{
	fmt,
	iter::Sum,
	ops::{Add, Mul},
};

use sha256air_hash::{RotationVariant, COMPRESSION_ROUNDS, SCHEDULE_ROUNDS};

/// Trace cells one lookup is worth.
pub const LOOKUP_WEIGHT: u64 = 2;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Cost {
	pub trace_cells: u64,
	pub lookups: u64,
}

impl Cost {
	pub const fn new(trace_cells: u64, lookups: u64) -> Self {
		Self {
			trace_cells,
			lookups,
		}
	}

	pub const fn cells(self) -> u64 {
		self.trace_cells + LOOKUP_WEIGHT * self.lookups
	}

	/// Round-weighted cost of evaluating `variant` through its tables. The Ch tables share the
	/// big sigma 1 layout and the Maj tables the big sigma 0 layout, so they are charged there.
	pub const fn for_variant(variant: RotationVariant) -> Self {
		let (rounds, per_round) = match variant {
			RotationVariant::SmallSigma0 => (SCHEDULE_ROUNDS, Primitive::SmallSigma0.cost()),
			RotationVariant::SmallSigma1 => (SCHEDULE_ROUNDS, Primitive::SmallSigma1.cost()),
			RotationVariant::BigSigma0 => (
				COMPRESSION_ROUNDS,
				Primitive::BigSigma0.cost().plus(Primitive::Maj.cost()),
			),
			RotationVariant::BigSigma1 => (
				COMPRESSION_ROUNDS,
				Primitive::BigSigma1.cost().plus(Primitive::Ch.cost()),
			),
		};
		per_round.times(rounds as u64)
	}

	const fn plus(self, rhs: Self) -> Self {
		Self::new(self.trace_cells + rhs.trace_cells, self.lookups + rhs.lookups)
	}

	const fn times(self, n: u64) -> Self {
		Self::new(self.trace_cells * n, self.lookups * n)
	}
}

impl Add for Cost {
	type Output = Self;

	fn add(self, rhs: Self) -> Self {
		self.plus(rhs)
	}
}

impl Mul<u64> for Cost {
	type Output = Self;

	fn mul(self, rhs: u64) -> Self {
		self.times(rhs)
	}
}

impl Sum for Cost {
	fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
		iter.fold(Self::default(), Add::add)
	}
}

impl fmt::Display for Cost {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}T + {}L", self.trace_cells, self.lookups)
	}
}

/// A SHA-256 operation with a fixed per-evaluation cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
	SmallSigma0,
	SmallSigma1,
	BigSigma0,
	BigSigma1,
	Ch,
	Maj,
	/// A 32-bit modular addition.
	Add,
}

impl Primitive {
	pub const fn cost(self) -> Cost {
		match self {
			Self::SmallSigma0 | Self::SmallSigma1 | Self::BigSigma1 => Cost::new(10, 3),
			Self::BigSigma0 => Cost::new(12, 3),
			Self::Ch => Cost::new(10, 4),
			Self::Maj => Cost::new(14, 6),
			Self::Add => Cost::new(2, 2),
		}
	}
}

impl From<RotationVariant> for Primitive {
	fn from(variant: RotationVariant) -> Self {
		match variant {
			RotationVariant::SmallSigma0 => Self::SmallSigma0,
			RotationVariant::SmallSigma1 => Self::SmallSigma1,
			RotationVariant::BigSigma0 => Self::BigSigma0,
			RotationVariant::BigSigma1 => Self::BigSigma1,
		}
	}
}

/// Cost of one SHA-256 chunk, split between the message schedule and the compression rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostEstimate {
	pub schedule: Cost,
	pub compression: Cost,
}

impl CostEstimate {
	pub fn total(&self) -> Cost {
		self.schedule + self.compression
	}

	pub fn cells(&self) -> u64 {
		self.total().cells()
	}
}

impl fmt::Display for CostEstimate {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		writeln!(f, "Message schedule: {} ({} cells)", self.schedule, self.schedule.cells())?;
		writeln!(f, "Compression: {} ({} cells)", self.compression, self.compression.cells())?;
		write!(f, "Total: {} ({} cells)", self.total(), self.cells())
	}
}

pub fn sha256_cost() -> CostEstimate {
	let schedule = [Primitive::SmallSigma0, Primitive::SmallSigma1, Primitive::Add]
		.into_iter()
		.map(Primitive::cost)
		.sum::<Cost>()
		* SCHEDULE_ROUNDS as u64;
	let compression = [
		Primitive::BigSigma0,
		Primitive::BigSigma1,
		Primitive::Ch,
		Primitive::Maj,
		Primitive::Add,
		Primitive::Add,
	]
	.into_iter()
	.map(Primitive::cost)
	.sum::<Cost>()
		* COMPRESSION_ROUNDS as u64;

	CostEstimate {
		schedule,
		compression,
	}
}
