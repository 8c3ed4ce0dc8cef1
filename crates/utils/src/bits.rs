// Copyright 2024-2025 Irreducible Inc.

//! Bit manipulation helpers over 32-bit words and their 16-bit halves.

/// Mask selecting the low 16-bit half of a word.
pub const LOW_HALF_MASK: u32 = 0xFFFF;

/// Splits a word into its `(low, high)` 16-bit halves.
#[inline]
pub const fn split_u32(x: u32) -> (u16, u16) {
	(x as u16, (x >> 16) as u16)
}

/// Inverse of [`split_u32`].
#[inline]
pub const fn join_u16(low: u16, high: u16) -> u32 {
	(low as u32) | ((high as u32) << 16)
}

/// Parallel bit extract: gathers the bits of `x` selected by `mask` into the low bits of the
/// result, preserving their order.
#[inline]
pub fn pext_u32(x: u32, mask: u32) -> u32 {
	let mut out = 0;
	let mut bit = 1;
	let mut mask = mask;
	while mask != 0 {
		let lowest = mask & mask.wrapping_neg();
		if x & lowest != 0 {
			out |= bit;
		}
		mask ^= lowest;
		bit <<= 1;
	}
	out
}

/// Parallel bit deposit: scatters the low bits of `x` to the positions selected by `mask`.
#[inline]
pub fn pdep_u32(x: u32, mask: u32) -> u32 {
	let mut out = 0;
	let mut bit = 1;
	let mut mask = mask;
	while mask != 0 {
		let lowest = mask & mask.wrapping_neg();
		if x & bit != 0 {
			out |= lowest;
		}
		mask ^= lowest;
		bit <<= 1;
	}
	out
}
