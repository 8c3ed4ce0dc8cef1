// Copyright 2024-2025 Irreducible Inc.

use std::{fmt, str::FromStr};

use crate::error::Error;

/// The four rotation-based mixing functions of SHA-256.
///
/// Small sigmas (σ) are used by the message schedule and combine two rotations with a logical
/// right shift. Big sigmas (Σ) are used by the compression rounds and combine three rotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RotationVariant {
	SmallSigma0,
	SmallSigma1,
	BigSigma0,
	BigSigma1,
}

impl RotationVariant {
	pub const ALL: [Self; 4] = [
		Self::SmallSigma0,
		Self::SmallSigma1,
		Self::BigSigma0,
		Self::BigSigma1,
	];

	/// Rotation amounts, the last one being a shift amount for small sigmas.
	pub const fn params(self) -> [u32; 3] {
		match self {
			Self::SmallSigma0 => [7, 18, 3],
			Self::SmallSigma1 => [17, 19, 10],
			Self::BigSigma0 => [2, 13, 22],
			Self::BigSigma1 => [6, 11, 25],
		}
	}

	/// Whether the variant is one of the compression-round Σ functions.
	pub const fn is_big(self) -> bool {
		matches!(self, Self::BigSigma0 | Self::BigSigma1)
	}

	pub const fn name(self) -> &'static str {
		match self {
			Self::SmallSigma0 => "small_sigma0",
			Self::SmallSigma1 => "small_sigma1",
			Self::BigSigma0 => "big_sigma0",
			Self::BigSigma1 => "big_sigma1",
		}
	}

	/// Recovers the variant from a parameter triple given in any order.
	pub fn from_params(params: [u32; 3]) -> Result<Self, Error> {
		let mut sorted = params;
		sorted.sort_unstable();
		Self::ALL
			.into_iter()
			.find(|variant| {
				let mut canonical = variant.params();
				canonical.sort_unstable();
				canonical == sorted
			})
			.ok_or(Error::InvalidParameters { params })
	}
}

impl fmt::Display for RotationVariant {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let [n1, n2, n3] = self.params();
		write!(f, "{}({}, {}, {})", self.name(), n1, n2, n3)
	}
}

impl FromStr for RotationVariant {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
		Self::ALL
			.into_iter()
			.find(|variant| variant.name() == normalized)
			.ok_or_else(|| {
				format!(
					"unknown variant '{s}', expected one of small-sigma0, small-sigma1, big-sigma0, big-sigma1"
				)
			})
	}
}

/// Rotates `x` right by `n` bits. The amount is taken modulo 32.
#[inline]
pub const fn rotr(x: u32, n: u32) -> u32 {
	x.rotate_right(n)
}

/// Logical right shift; shifting by 32 or more clears the word.
#[inline]
pub const fn shr(x: u32, n: u32) -> u32 {
	if n >= u32::BITS {
		0
	} else {
		x >> n
	}
}

/// Evaluates the sigma function of `variant` on `x`.
#[inline]
pub const fn sigma(x: u32, variant: RotationVariant) -> u32 {
	let [n1, n2, n3] = variant.params();
	if variant.is_big() {
		rotr(x, n1) ^ rotr(x, n2) ^ rotr(x, n3)
	} else {
		rotr(x, n1) ^ rotr(x, n2) ^ shr(x, n3)
	}
}

/// Evaluates the sigma function identified by a raw parameter triple.
pub fn sigma_with_params(x: u32, params: [u32; 3]) -> Result<u32, Error> {
	RotationVariant::from_params(params).map(|variant| sigma(x, variant))
}

pub const fn small_sigma0(x: u32) -> u32 {
	sigma(x, RotationVariant::SmallSigma0)
}

pub const fn small_sigma1(x: u32) -> u32 {
	sigma(x, RotationVariant::SmallSigma1)
}

pub const fn big_sigma0(x: u32) -> u32 {
	sigma(x, RotationVariant::BigSigma0)
}

pub const fn big_sigma1(x: u32) -> u32 {
	sigma(x, RotationVariant::BigSigma1)
}

/// Choice: bits of `y` where `x` is set, bits of `z` elsewhere.
#[inline]
pub const fn ch(x: u32, y: u32, z: u32) -> u32 {
	(x & y) ^ (!x & z)
}

/// Left half of [`ch`]. `ch_left(x, y) + ch_right(x, z) == ch(x, y, z)` since the two halves
/// never share a set bit.
#[inline]
pub const fn ch_left(x: u32, y: u32) -> u32 {
	x & y
}

/// Right half of [`ch`].
#[inline]
pub const fn ch_right(x: u32, z: u32) -> u32 {
	!x & z
}

/// Majority vote of the three operands, bitwise.
#[inline]
pub const fn maj(x: u32, y: u32, z: u32) -> u32 {
	(x & y) ^ (x & z) ^ (y & z)
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;

	use super::*;

	#[test]
	fn test_rotr_boundaries() {
		let x = 0x8000_0001;
		assert_eq!(rotr(x, 0), x);
		assert_eq!(rotr(x, 1), 0xc000_0000);
		assert_eq!(rotr(x, 31), 0x0000_0003);
		assert_eq!(rotr(x, 32), x);
		assert_eq!(rotr(u32::MAX, 31), u32::MAX);
	}

	#[test]
	fn test_shr_boundaries() {
		assert_eq!(shr(0xffff_ffff, 0), 0xffff_ffff);
		assert_eq!(shr(0xffff_ffff, 31), 1);
		assert_eq!(shr(0xffff_ffff, 32), 0);
	}

	#[test]
	fn test_sigma_known_values() {
		assert_eq!(small_sigma0(1), 0x0200_4000);
		assert_eq!(small_sigma1(1), 0x0000_a000);
		assert_eq!(big_sigma0(1), 0x4008_0400);
		assert_eq!(big_sigma1(1), 0x0420_0080);
		for variant in RotationVariant::ALL {
			assert_eq!(sigma(0, variant), 0);
		}
	}

	#[test]
	fn test_from_params_any_order() {
		assert_eq!(RotationVariant::from_params([7, 18, 3]).unwrap(), RotationVariant::SmallSigma0);
		assert_eq!(RotationVariant::from_params([3, 7, 18]).unwrap(), RotationVariant::SmallSigma0);
		assert_eq!(RotationVariant::from_params([25, 6, 11]).unwrap(), RotationVariant::BigSigma1);
		for variant in RotationVariant::ALL {
			assert_eq!(RotationVariant::from_params(variant.params()).unwrap(), variant);
		}
	}

	#[test]
	fn test_from_params_invalid() {
		let err = RotationVariant::from_params([1, 2, 3]).unwrap_err();
		assert!(matches!(err, Error::InvalidParameters { params: [1, 2, 3] }));
		assert!(sigma_with_params(5, [7, 18, 18]).is_err());
		assert_eq!(sigma_with_params(5, [18, 3, 7]).unwrap(), small_sigma0(5));
	}

	#[test]
	fn test_variant_names_round_trip() {
		for variant in RotationVariant::ALL {
			assert_eq!(variant.name().parse::<RotationVariant>().unwrap(), variant);
		}
		assert_eq!("big-sigma1".parse::<RotationVariant>().unwrap(), RotationVariant::BigSigma1);
		assert!("sigma2".parse::<RotationVariant>().is_err());
		assert_eq!(RotationVariant::BigSigma0.to_string(), "big_sigma0(2, 13, 22)");
	}

	proptest! {
		#[test]
		fn test_rotr_matches_shift_or(x in any::<u32>(), n in 1u32..32) {
			prop_assert_eq!(rotr(x, n), (x >> n) | (x << (32 - n)));
		}

		#[test]
		fn test_ch_split_is_exact(x in any::<u32>(), y in any::<u32>(), z in any::<u32>()) {
			prop_assert_eq!(ch_left(x, y) & ch_right(x, z), 0);
			prop_assert_eq!(ch_left(x, y) + ch_right(x, z), ch(x, y, z));
		}

		#[test]
		fn test_maj_is_symmetric(x in any::<u32>(), y in any::<u32>(), z in any::<u32>()) {
			prop_assert_eq!(maj(x, y, z), maj(y, z, x));
			prop_assert_eq!(maj(x, y, z), maj(x, z, y));
			prop_assert_eq!(maj(x, x, z), x);
		}
	}
}
