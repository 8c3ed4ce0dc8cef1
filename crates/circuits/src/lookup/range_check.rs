// Copyright 2024-2025 Irreducible Inc.

use sha256air_utils::bits::{join_u16, LOW_HALF_MASK};

use super::LookupTable;
use crate::error::{Error, Result};

/// A modular addition of the SHA-256 round function, by number of 32-bit operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddStep {
	/// `W[t-16] + σ0 + W[t-7] + σ1`.
	Schedule,
	/// `h + Σ1 + Ch + K + W`.
	Compression,
	/// `d + h + Σ1 + Ch + K + W`.
	EUpdate,
	/// `h + Σ1 + Ch + K + W + Σ0 + Maj`.
	AUpdate,
}

impl AddStep {
	pub const ALL: [Self; 4] = [Self::Schedule, Self::Compression, Self::EUpdate, Self::AUpdate];

	pub const fn operands(self) -> usize {
		match self {
			Self::Schedule => 4,
			Self::Compression => 5,
			Self::EUpdate => 6,
			Self::AUpdate => 7,
		}
	}

	/// Largest carry out of a sum of `operands` 16-bit limbs.
	pub const fn max_carry(self) -> u32 {
		self.operands() as u32 - 1
	}

	/// Mask of the carry limb: the fewest bits that hold every carry up to `max_carry`.
	pub const fn carry_mask(self) -> u32 {
		(self.max_carry() + 1).next_power_of_two() - 1
	}
}

/// A 32-bit sum folded from two 16-bit limb sums.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoldedSum {
	pub value: u32,
	pub carry_low: u32,
	pub carry_high: u32,
}

/// The `(value, carry)` pairs a 16-bit limb sum of `step` may split into.
#[derive(Debug, Clone)]
pub struct RangeCheckAdd {
	step: AddStep,
	table: LookupTable<bool>,
}

impl RangeCheckAdd {
	pub fn new(step: AddStep) -> Self {
		let max_carry = step.max_carry();
		let table = LookupTable::build(
			format!("range_check_add_{}", step.operands()),
			vec![LOW_HALF_MASK, step.carry_mask()],
			|key| key[1] <= max_carry,
		);
		Self { step, table }
	}

	pub fn step(&self) -> AddStep {
		self.step
	}

	/// Whether `(value, carry)` is a valid pair. Fails with [`Error::LimbNotInDomain`] when either
	/// limb lies outside the key domain of the table.
	pub fn contains(&self, value: u32, carry: u32) -> Result<bool> {
		self.table.get(&[value, carry])
	}

	/// Splits a limb sum into its 16-bit value and carry, failing when the pair is not a table
	/// entry.
	pub fn check(&self, sum: u32) -> Result<(u32, u32)> {
		let (value, carry) = (sum & LOW_HALF_MASK, sum >> 16);
		if !self.contains(value, carry)? {
			return Err(Error::CarryOutOfRange {
				step: self.step,
				value: sum,
				carry,
				max_carry: self.step.max_carry(),
			});
		}
		Ok((value, carry))
	}

	/// The valid `(value, carry)` pairs.
	pub fn entries(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
		self.table
			.entries()
			.filter(|&(_, valid)| valid)
			.map(|(key, _)| (key[0], key[1]))
	}

	/// Number of valid pairs.
	pub fn len(&self) -> usize {
		(LOW_HALF_MASK as usize + 1) * (self.step.max_carry() as usize + 1)
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Adds words given as 16-bit limbs: the low limbs are summed first and their carry is folded
	/// into the sum of the high limbs. Both limb sums are range checked.
	pub fn fold_limbs(&self, low_terms: &[u16], high_terms: &[u16]) -> Result<FoldedSum> {
		for terms in [low_terms, high_terms] {
			if terms.len() > self.step.operands() {
				return Err(Error::TooManyOperands {
					step: self.step,
					count: terms.len(),
					max: self.step.operands(),
				});
			}
		}

		let low_sum = low_terms.iter().map(|&term| term as u32).sum::<u32>();
		let (low, carry_low) = self.check(low_sum)?;

		let high_sum = high_terms.iter().map(|&term| term as u32).sum::<u32>() + carry_low;
		let (high, carry_high) = self.check(high_sum)?;

		Ok(FoldedSum {
			value: join_u16(low as u16, high as u16),
			carry_low,
			carry_high,
		})
	}
}
