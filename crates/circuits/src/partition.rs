// Copyright 2024-2025 Irreducible Inc.

//! Two-way partitions of the sigma input space.
//!
//! Output bit `i` of a sigma function depends on input bits `i + n1`, `i + n2` and `i + n3`
//! (mod 32). Input bits lying on the lattice generated by `n2 - n1` and `n3 - n1` interact with
//! each other, which gives a natural two-coloring `(I0, I1)` of the input bits. Each color only
//! reaches part of the output: `O0` is only touched by `I0`, `O1` only by `I1`, and `O2` by
//! both. Evaluating the function on each color separately and XOR-ing the `O2` contributions
//! recovers the full output with lookups over at most `2^21` entries.

use std::fmt;

use sha256air_hash::{sigma, RotationVariant};
use sha256air_utils::{bits::LOW_HALF_MASK, formatting::MaskBits};
use tracing::{debug, info, instrument, warn};

use crate::{
	error::{Error, Result},
	subset::get_subset,
};

/// Number of parameter orders tried before giving up.
pub const MAX_ATTEMPTS: usize = 3;

/// Maximum number of set bits in either input partition.
pub const MAX_INPUT_BITS: u32 = 21;

/// Maximum number of set bits in the overlap output mask.
pub const MAX_OVERLAP_BITS: u32 = 10;

/// A 16-bit half-mask is small when it has fewer set bits than this.
pub const SMALL_HALF_BITS: u32 = 8;

/// Minimum number of small half-masks among the four halves of `(I0, I1)`.
pub const MIN_SMALL_HALVES: usize = 2;

/// Side of a partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Part {
	I0,
	I1,
}

impl Part {
	pub const ALL: [Self; 2] = [Self::I0, Self::I1];

	pub const fn name(self) -> &'static str {
		match self {
			Self::I0 => "I0",
			Self::I1 => "I1",
		}
	}
}

/// 16-bit half of a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Half {
	Low,
	High,
}

impl Half {
	pub const ALL: [Self; 2] = [Self::Low, Self::High];

	pub const fn shift(self) -> u32 {
		match self {
			Self::Low => 0,
			Self::High => 16,
		}
	}

	/// Extracts this half of `x`.
	pub const fn of(self, x: u32) -> u32 {
		(x >> self.shift()) & LOW_HALF_MASK
	}

	const fn suffix(self) -> &'static str {
		match self {
			Self::Low => "L",
			Self::High => "H",
		}
	}
}

/// Residues `((n2 - n1) * a + (n3 - n1) * b) mod 32` for `a, b` in `0..4`, as a mask, together
/// with its complement.
pub fn lattice(params: [u32; 3]) -> (u32, u32) {
	let [n1, n2, n3] = params.map(i64::from);
	let mut selected = 0u32;
	for a in 0..4 {
		for b in 0..4 {
			let residue = ((n2 - n1) * a + (n3 - n1) * b).rem_euclid(32);
			selected |= 1 << residue;
		}
	}
	(selected, !selected)
}

/// The output bits that can be set when the input is restricted to `mask`.
pub fn output_bits(mask: u32, variant: RotationVariant) -> u32 {
	get_subset(mask).fold(0, |acc, x| acc | sigma(x, variant))
}

/// Checks the size constraints a split must satisfy to fit the lookup tables.
pub fn is_valid_split(i0: u32, i1: u32, o2: u32) -> bool {
	let small_halves = [i0, i1]
		.into_iter()
		.flat_map(|mask| Half::ALL.map(|half| half.of(mask)))
		.filter(|half_mask| half_mask.count_ones() < SMALL_HALF_BITS)
		.count();

	small_halves >= MIN_SMALL_HALVES
		&& i0.count_ones().max(i1.count_ones()) <= MAX_INPUT_BITS
		&& o2.count_ones() <= MAX_OVERLAP_BITS
}

/// A validated split of the sigma input and output spaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition {
	pub variant: RotationVariant,
	/// The parameter order the lattice was built from.
	pub params: [u32; 3],
	/// Zero-based index of the attempt that produced this split.
	pub attempt: usize,
	pub i0: u32,
	pub i1: u32,
	pub o0: u32,
	pub o1: u32,
	pub o2: u32,
}

impl Partition {
	/// Builds the candidate split of `variant` from the lattice of `params`.
	pub fn candidate(variant: RotationVariant, params: [u32; 3], attempt: usize) -> Self {
		let (i0, i1) = lattice(params);
		let o0 = output_bits(i0, variant);
		let o1 = output_bits(i1, variant);
		let o2 = o0 & o1;

		Self {
			variant,
			params,
			attempt,
			i0,
			i1,
			o0: o0 & !o2,
			o1: o1 & !o2,
			o2,
		}
	}

	pub fn is_valid(&self) -> bool {
		is_valid_split(self.i0, self.i1, self.o2)
	}

	pub const fn input(&self, part: Part) -> u32 {
		match part {
			Part::I0 => self.i0,
			Part::I1 => self.i1,
		}
	}

	/// Output bits reached by `part` alone.
	pub const fn output(&self, part: Part) -> u32 {
		match part {
			Part::I0 => self.o0,
			Part::I1 => self.o1,
		}
	}

	pub const fn i0_low(&self) -> u32 {
		Half::Low.of(self.i0)
	}

	pub const fn i0_high(&self) -> u32 {
		Half::High.of(self.i0)
	}

	pub const fn i1_low(&self) -> u32 {
		Half::Low.of(self.i1)
	}

	pub const fn i1_high(&self) -> u32 {
		Half::High.of(self.i1)
	}

	pub const fn o0_low(&self) -> u32 {
		Half::Low.of(self.o0)
	}

	pub const fn o0_high(&self) -> u32 {
		Half::High.of(self.o0)
	}

	pub const fn o1_low(&self) -> u32 {
		Half::Low.of(self.o1)
	}

	pub const fn o1_high(&self) -> u32 {
		Half::High.of(self.o1)
	}

	pub const fn o2_low(&self) -> u32 {
		Half::Low.of(self.o2)
	}

	pub const fn o2_high(&self) -> u32 {
		Half::High.of(self.o2)
	}

	/// The limb chunks each side is keyed by.
	///
	/// Small sigma tables are keyed by the two 16-bit halves of each side. Big sigma inputs are
	/// also fed to the three-operand Ch and Maj tables, so halves with [`SMALL_HALF_BITS`] or
	/// more set bits are split into two byte-aligned sub-limbs.
	pub fn layout(&self) -> LimbLayout {
		let mut chunks = Vec::with_capacity(8);
		for part in Part::ALL {
			for half in Half::ALL {
				let mask = half.of(self.input(part));
				if self.variant.is_big() && mask.count_ones() >= SMALL_HALF_BITS {
					chunks.push(LimbChunk {
						part,
						half,
						offset: 0,
						bits: 8,
						mask: mask & 0xFF,
					});
					chunks.push(LimbChunk {
						part,
						half,
						offset: 8,
						bits: 8,
						mask: mask >> 8,
					});
				} else {
					chunks.push(LimbChunk {
						part,
						half,
						offset: 0,
						bits: 16,
						mask,
					});
				}
			}
		}
		LimbLayout { chunks }
	}
}

impl fmt::Display for Partition {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		writeln!(f, "Variant: {}", self.variant)?;
		writeln!(f, "Params: {:?} (attempt {})", self.params, self.attempt + 1)?;
		for (name, mask) in [("I0", self.i0), ("I1", self.i1)] {
			writeln!(f, "{}", MaskBits::new(name, mask, 32))?;
		}
		for chunk in self.layout().chunks() {
			writeln!(f, "{}", MaskBits::new(&chunk.name(), chunk.mask, chunk.bits as usize))?;
		}
		for (name, mask) in [("O0", self.o0), ("O1", self.o1), ("O2", self.o2)] {
			writeln!(f, "{}", MaskBits::new(name, mask, 32))?;
		}
		let halves = [
			("O0_L", self.o0_low()),
			("O0_H", self.o0_high()),
			("O1_L", self.o1_low()),
			("O1_H", self.o1_high()),
			("O2_L", self.o2_low()),
			("O2_H", self.o2_high()),
		];
		for (i, (name, mask)) in halves.into_iter().enumerate() {
			if i > 0 {
				writeln!(f)?;
			}
			write!(f, "{}", MaskBits::new(name, mask, 16))?;
		}
		Ok(())
	}
}

/// Searches the split of `variant`, rotating the parameter order between attempts.
#[instrument(skip_all, fields(variant = variant.name()))]
pub fn find_split(variant: RotationVariant) -> Result<Partition> {
	let mut params = variant.params();
	for attempt in 0..MAX_ATTEMPTS {
		let candidate = Partition::candidate(variant, params, attempt);
		debug!(
			?params,
			i0_bits = candidate.i0.count_ones(),
			i1_bits = candidate.i1.count_ones(),
			o2_bits = candidate.o2.count_ones(),
			"split candidate"
		);

		if candidate.is_valid() {
			info!(?params, attempt, "found valid split");
			return Ok(candidate);
		}

		warn!(?params, attempt, "split rejected, rotating parameters");
		params.rotate_left(1);
	}

	Err(Error::NoValidSplit {
		variant,
		attempts: MAX_ATTEMPTS,
	})
}

/// One key limb of a partition table: the bits of `part` inside `half`, starting at `offset`
/// within the half and spanning `bits` bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimbChunk {
	pub part: Part,
	pub half: Half,
	pub offset: u32,
	pub bits: u32,
	/// Mask in limb-local coordinates.
	pub mask: u32,
}

impl LimbChunk {
	/// Distance between bit 0 of the limb and bit 0 of the word.
	pub const fn word_shift(&self) -> u32 {
		self.half.shift() + self.offset
	}

	pub const fn word_mask(&self) -> u32 {
		self.mask << self.word_shift()
	}

	/// Extracts this limb from `x` by masking.
	pub const fn extract(&self, x: u32) -> u32 {
		(x >> self.word_shift()) & self.mask
	}

	/// Moves a limb back into its word position.
	pub const fn place(&self, limb: u32) -> u32 {
		limb << self.word_shift()
	}

	/// Whether the limb spans a full 16-bit half.
	pub const fn is_whole(&self) -> bool {
		self.bits == 16
	}

	/// Name in the `I0_L`, `I0_H1` style.
	pub fn name(&self) -> String {
		if self.is_whole() {
			format!("{}_{}", self.part.name(), self.half.suffix())
		} else {
			format!("{}_{}{}", self.part.name(), self.half.suffix(), self.offset / 8)
		}
	}
}

/// Ordered limb chunks of both partition sides, `I0` chunks first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimbLayout {
	chunks: Vec<LimbChunk>,
}

impl LimbLayout {
	pub fn chunks(&self) -> &[LimbChunk] {
		&self.chunks
	}

	pub fn part(&self, part: Part) -> impl Iterator<Item = &LimbChunk> + '_ {
		self.chunks.iter().filter(move |chunk| chunk.part == part)
	}

	/// Rebuilds the word formed by `limbs` of `part`.
	pub fn compose(&self, part: Part, limbs: &[u32]) -> u32 {
		self.part(part)
			.zip(limbs)
			.fold(0, |acc, (chunk, &limb)| acc | chunk.place(limb))
	}

	/// Splits `x` into limbs the way a prover would guess them.
	///
	/// In each half, every chunk but one is obtained by masking. The remaining chunk (the last
	/// whole one if any) is the half value minus the others, so it is only constrained by the
	/// table lookup it feeds.
	pub fn split(&self, x: u32) -> Result<LimbSplit> {
		let mut limbs = vec![0u32; self.chunks.len()];

		for half in Half::ALL {
			let indices = self
				.chunks
				.iter()
				.enumerate()
				.filter(|(_, chunk)| chunk.half == half)
				.map(|(i, _)| i)
				.collect::<Vec<_>>();
			let Some(&last) = indices.last() else {
				continue;
			};
			let guessed = indices
				.iter()
				.rev()
				.copied()
				.find(|&i| self.chunks[i].is_whole())
				.unwrap_or(last);

			let mut rest = half.of(x);
			for &i in indices.iter().filter(|&&i| i != guessed) {
				let chunk = &self.chunks[i];
				limbs[i] = chunk.extract(x);
				rest -= limbs[i] << chunk.offset;
			}

			let chunk = &self.chunks[guessed];
			if rest & ((1 << chunk.offset) - 1) != 0 {
				return Err(Error::LimbNotInDomain {
					table: chunk.name(),
					limb: rest,
					mask: chunk.mask << chunk.offset,
				});
			}
			limbs[guessed] = rest >> chunk.offset;
		}

		let n_i0 = self.part(Part::I0).count();
		Ok(LimbSplit { limbs, n_i0 })
	}
}

/// Limbs of a word, aligned with [`LimbLayout::chunks`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimbSplit {
	limbs: Vec<u32>,
	n_i0: usize,
}

impl LimbSplit {
	pub fn limbs(&self) -> &[u32] {
		&self.limbs
	}

	pub fn part(&self, part: Part) -> &[u32] {
		match part {
			Part::I0 => &self.limbs[..self.n_i0],
			Part::I1 => &self.limbs[self.n_i0..],
		}
	}
}

#[cfg(test)]
mod tests {
	use assert_matches::assert_matches;
	use proptest::prelude::*;

	use super::*;
	use crate::test_utils;

	#[test]
	fn test_lattice_small_sigma1() {
		let (selected, remaining) = lattice([17, 19, 10]);
		assert_eq!(selected, 0xab56a855);
		assert_eq!(remaining, 0x54a957aa);
		assert_eq!(selected & remaining, 0);
		assert_eq!(selected | remaining, u32::MAX);
	}

	#[test]
	fn test_lattice_negative_steps_wrap() {
		// n3 - n1 is negative here.
		let (selected, _) = lattice([11, 25, 6]);
		let (rotated, _) = lattice([6, 11, 25]);
		assert_eq!(selected, 0x98c66631);
		assert_eq!(rotated, 0x63298d6d);
	}

	#[test]
	fn test_output_bits_single_bit() {
		let variant = RotationVariant::BigSigma1;
		assert_eq!(output_bits(1, variant), sigma(1, variant));
		assert_eq!(output_bits(0, variant), 0);
		assert_eq!(output_bits(0xFFFF, RotationVariant::SmallSigma0), 0xffff_dfff);
	}

	#[test]
	fn test_is_valid_split() {
		// Four 8-bit halves: no small half.
		assert!(!is_valid_split(0x00FF_00FF, 0xFF00_FF00, 0));
		assert!(is_valid_split(0x007F_007F, 0xFF80_FF80, 0b11));
		// Too many bits in I1.
		assert!(!is_valid_split(0x0000_007F, 0xFFFF_FF80, 0));
		// Too many overlap bits.
		assert!(!is_valid_split(0x007F_007F, 0xFF80_FF80, 0x7FF));
	}

	#[test]
	fn test_find_split_all_variants() {
		let expected = [
			(RotationVariant::SmallSigma0, [3, 7, 18], 2, 0x4aaab555, 0x07c007c0),
			(RotationVariant::SmallSigma1, [17, 19, 10], 0, 0xab56a855, 0x812060c1),
			(RotationVariant::BigSigma0, [2, 13, 22], 0, 0xf07c0f83, 0x8c218c21),
			(RotationVariant::BigSigma1, [11, 25, 6], 1, 0x98c66631, 0xa5500154),
		];

		for (variant, params, attempt, i0, o2) in expected {
			let partition = find_split(variant).unwrap();
			assert_eq!(partition.variant, variant);
			assert_eq!(partition.params, params);
			assert_eq!(partition.attempt, attempt);
			assert!(partition.attempt < MAX_ATTEMPTS);
			assert_eq!(partition.i0, i0);
			assert_eq!(partition.i1, !i0);
			assert_eq!(partition.o2, o2);
			assert_eq!(partition.i0 & partition.i1, 0);
			assert_eq!(partition.i0 | partition.i1, u32::MAX);
			assert_eq!(partition.o0 & partition.o1, 0);
			assert_eq!(partition.o0 & partition.o2, 0);
			assert_eq!(partition.o1 & partition.o2, 0);
			assert!(partition.is_valid());
		}
	}

	#[test]
	fn test_outputs_cover_sigma_image() {
		for variant in RotationVariant::ALL {
			let partition = find_split(variant).unwrap();
			let reach = output_bits(partition.i0, variant) | output_bits(partition.i1, variant);
			assert_eq!(partition.o0 | partition.o1 | partition.o2, reach);
		}
	}

	#[test]
	fn test_rejected_first_candidate() {
		let candidate = Partition::candidate(
			RotationVariant::SmallSigma0,
			RotationVariant::SmallSigma0.params(),
			0,
		);
		assert!(!candidate.is_valid());
		assert_eq!(candidate.o2.count_ones(), 12);
	}

	#[test]
	fn test_layout_small_sigma() {
		let partition = find_split(RotationVariant::SmallSigma0).unwrap();
		let layout = partition.layout();
		let names = layout.chunks().iter().map(LimbChunk::name).collect::<Vec<_>>();
		assert_eq!(names, ["I0_L", "I0_H", "I1_L", "I1_H"]);
		assert_eq!(layout.chunks()[0].mask, partition.i0_low());
		assert_eq!(layout.chunks()[3].mask, partition.i1_high());
	}

	#[test]
	fn test_layout_big_sigma() {
		let partition = find_split(RotationVariant::BigSigma0).unwrap();
		let layout = partition.layout();
		let names = layout.chunks().iter().map(LimbChunk::name).collect::<Vec<_>>();
		assert_eq!(names, ["I0_L", "I0_H0", "I0_H1", "I1_L0", "I1_L1", "I1_H"]);
		let masks = layout.chunks().iter().map(|c| c.mask).collect::<Vec<_>>();
		assert_eq!(masks, [0x0f83, 0x7c, 0xf0, 0x7c, 0xf0, 0x0f83]);

		let partition = find_split(RotationVariant::BigSigma1).unwrap();
		let names = partition
			.layout()
			.chunks()
			.iter()
			.map(LimbChunk::name)
			.collect::<Vec<_>>();
		assert_eq!(names, ["I0_L", "I0_H", "I1_L0", "I1_L1", "I1_H0", "I1_H1"]);
	}

	#[test]
	fn test_big_sigma_chunks_are_disjoint_and_small() {
		for variant in [RotationVariant::BigSigma0, RotationVariant::BigSigma1] {
			let layout = find_split(variant).unwrap().layout();
			let mut union = 0u32;
			for chunk in layout.chunks() {
				assert!(chunk.mask.count_ones() * 3 <= MAX_INPUT_BITS);
				assert_eq!(union & chunk.word_mask(), 0);
				union |= chunk.word_mask();
			}
			assert_eq!(union, u32::MAX);
		}
	}

	#[test]
	fn test_split_rejects_misaligned_guess() {
		let layout = LimbLayout {
			chunks: vec![
				LimbChunk {
					part: Part::I0,
					half: Half::Low,
					offset: 0,
					bits: 8,
					mask: 0x0F,
				},
				LimbChunk {
					part: Part::I1,
					half: Half::Low,
					offset: 8,
					bits: 8,
					mask: 0xFF,
				},
			],
		};
		assert_matches!(layout.split(0x0010), Err(Error::LimbNotInDomain { .. }));
		let split = layout.split(0xAB05).unwrap();
		assert_eq!(split.part(Part::I0), [0x05]);
		assert_eq!(split.part(Part::I1), [0xAB]);
	}

	#[test]
	fn test_display_dump() {
		let dump = find_split(RotationVariant::BigSigma0).unwrap().to_string();
		assert!(dump.contains("Variant: big_sigma0(2, 13, 22)"));
		assert!(dump.contains("I0: 11110000011111000000111110000011: 16 bits"));
		assert!(dump.contains("I0_H1: 11110000: 4 bits"));
		assert!(dump.contains("O2: 10001100001000011000110000100001: 10 bits"));
	}

	proptest! {
		#[test]
		fn test_split_compose_round_trip(x in any::<u32>(), variant_index in 0usize..4) {
			let layout = test_utils::partition(RotationVariant::ALL[variant_index]).layout();
			let split = layout.split(x).unwrap();
			for (chunk, &limb) in layout.chunks().iter().zip(split.limbs()) {
				prop_assert_eq!(limb & !chunk.mask, 0);
				prop_assert_eq!(limb, chunk.extract(x));
			}
			let x0 = layout.compose(Part::I0, split.part(Part::I0));
			let x1 = layout.compose(Part::I1, split.part(Part::I1));
			prop_assert_eq!(x0 & x1, 0);
			prop_assert_eq!(x0 | x1, x);
		}
	}
}
