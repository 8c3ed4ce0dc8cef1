// Copyright 2024-2025 Irreducible Inc.

use sha256air_hash::{ch, ch_left, ch_right, maj, RotationVariant};

use super::{LookupTable, TableInfo};
use crate::{
	error::Result,
	partition::{LimbChunk, LimbLayout, Partition},
};

/// Ch or Maj tables over the chunks of a limb layout.
///
/// The chunks of a layout are disjoint and cover the whole word, and both functions act bitwise,
/// so the value on a word is the sum of the per-chunk values moved back into place. Ch reads the
/// `e` input of a round, whose big sigma 1 partition it shares, and Maj reads `a` with big
/// sigma 0.
#[derive(Debug, Clone)]
pub enum BitwiseTables {
	Ch(ChTables),
	Maj(MajTables),
}

impl BitwiseTables {
	/// The tables sharing the layout of `partition`, if its variant feeds Ch or Maj.
	pub fn for_partition(partition: &Partition) -> Option<Self> {
		match partition.variant {
			RotationVariant::BigSigma1 => Some(Self::Ch(ChTables::new(partition.layout()))),
			RotationVariant::BigSigma0 => Some(Self::Maj(MajTables::new(partition.layout()))),
			RotationVariant::SmallSigma0 | RotationVariant::SmallSigma1 => None,
		}
	}

	pub fn layout(&self) -> &LimbLayout {
		match self {
			Self::Ch(tables) => &tables.layout,
			Self::Maj(tables) => &tables.layout,
		}
	}

	pub fn summary(&self) -> Vec<TableInfo> {
		match self {
			Self::Ch(tables) => tables.summary(),
			Self::Maj(tables) => tables.summary(),
		}
	}
}

#[derive(Debug, Clone)]
pub struct ChTables {
	layout: LimbLayout,
	ch: Vec<LookupTable<u16>>,
	ch_left: Vec<LookupTable<u16>>,
	ch_right: Vec<LookupTable<u16>>,
}

impl ChTables {
	pub fn new(layout: LimbLayout) -> Self {
		let ch = chunk_tables(&layout, "ch", 3, |key| ch(key[0], key[1], key[2]));
		let ch_left = chunk_tables(&layout, "ch_left", 2, |key| ch_left(key[0], key[1]));
		let ch_right = chunk_tables(&layout, "ch_right", 2, |key| ch_right(key[0], key[1]));

		Self {
			layout,
			ch,
			ch_left,
			ch_right,
		}
	}

	pub fn layout(&self) -> &LimbLayout {
		&self.layout
	}

	/// `ch(e, f, g)` through the per-chunk Ch tables.
	pub fn ch(&self, e: u32, f: u32, g: u32) -> Result<u32> {
		sum_chunks(&self.layout, &self.ch, |chunk| {
			vec![chunk.extract(e), chunk.extract(f), chunk.extract(g)]
		})
	}

	/// `ch(e, f, g)` as the sum of the `ch_left(e, f)` and `ch_right(e, g)` tables.
	pub fn ch_halves(&self, e: u32, f: u32, g: u32) -> Result<u32> {
		let left = sum_chunks(&self.layout, &self.ch_left, |chunk| {
			vec![chunk.extract(e), chunk.extract(f)]
		})?;
		let right = sum_chunks(&self.layout, &self.ch_right, |chunk| {
			vec![chunk.extract(e), chunk.extract(g)]
		})?;
		Ok(left + right)
	}

	pub fn summary(&self) -> Vec<TableInfo> {
		[&self.ch, &self.ch_left, &self.ch_right]
			.into_iter()
			.flatten()
			.map(LookupTable::info)
			.collect()
	}
}

#[derive(Debug, Clone)]
pub struct MajTables {
	layout: LimbLayout,
	maj: Vec<LookupTable<u16>>,
}

impl MajTables {
	pub fn new(layout: LimbLayout) -> Self {
		let maj = chunk_tables(&layout, "maj", 3, |key| maj(key[0], key[1], key[2]));
		Self { layout, maj }
	}

	pub fn layout(&self) -> &LimbLayout {
		&self.layout
	}

	/// `maj(a, b, c)` through the per-chunk Maj tables.
	pub fn maj(&self, a: u32, b: u32, c: u32) -> Result<u32> {
		sum_chunks(&self.layout, &self.maj, |chunk| {
			vec![chunk.extract(a), chunk.extract(b), chunk.extract(c)]
		})
	}

	pub fn summary(&self) -> Vec<TableInfo> {
		self.maj.iter().map(LookupTable::info).collect()
	}
}

/// One table per chunk, keyed by `arity` limbs of the chunk mask.
fn chunk_tables(
	layout: &LimbLayout,
	prefix: &str,
	arity: usize,
	f: impl Fn(&[u32]) -> u32,
) -> Vec<LookupTable<u16>> {
	layout
		.chunks()
		.iter()
		.map(|chunk| {
			let mask = chunk.mask;
			LookupTable::build(format!("{prefix}_{}", chunk.name()), vec![mask; arity], |key| {
				(f(key) & mask) as u16
			})
		})
		.collect()
}

fn sum_chunks(
	layout: &LimbLayout,
	tables: &[LookupTable<u16>],
	key: impl Fn(&LimbChunk) -> Vec<u32>,
) -> Result<u32> {
	layout
		.chunks()
		.iter()
		.zip(tables)
		.try_fold(0, |acc, (chunk, table)| Ok(acc + chunk.place(table.get(&key(chunk))? as u32)))
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;
	use rand::{thread_rng, Rng};

	use super::*;
	use crate::test_utils;

	#[test]
	fn test_chunks_cover_the_word() {
		for variant in [RotationVariant::BigSigma0, RotationVariant::BigSigma1] {
			let bitwise = test_utils::tables(variant).bitwise.as_ref().unwrap();
			let chunks = bitwise.layout().chunks();
			assert_eq!(chunks.len(), 6);
			let union = chunks.iter().fold(0u32, |acc, chunk| {
				assert_eq!(acc & chunk.word_mask(), 0);
				acc | chunk.word_mask()
			});
			assert_eq!(union, u32::MAX);
			assert!(chunks.iter().all(|chunk| chunk.mask.count_ones() <= 7));
		}
	}

	#[test]
	fn test_function_follows_variant() {
		let ch_tables = test_utils::tables(RotationVariant::BigSigma1);
		assert!(matches!(ch_tables.bitwise, Some(BitwiseTables::Ch(_))));
		assert!(ch_tables
			.summary()
			.iter()
			.all(|info| !info.name.starts_with("maj")));

		let maj_tables = test_utils::tables(RotationVariant::BigSigma0);
		assert!(matches!(maj_tables.bitwise, Some(BitwiseTables::Maj(_))));
		assert!(maj_tables
			.summary()
			.iter()
			.all(|info| !info.name.starts_with("ch")));
	}

	#[test]
	fn test_ch_and_maj_random_inputs() {
		let ch_tables = test_utils::tables(RotationVariant::BigSigma1).ch().unwrap();
		let maj_tables = test_utils::tables(RotationVariant::BigSigma0).maj().unwrap();
		let mut rng = thread_rng();
		for _ in 0..1000 {
			let (x, y, z) = rng.gen::<(u32, u32, u32)>();
			assert_eq!(ch_tables.ch(x, y, z).unwrap(), ch(x, y, z));
			assert_eq!(ch_tables.ch_halves(x, y, z).unwrap(), ch(x, y, z));
			assert_eq!(maj_tables.maj(x, y, z).unwrap(), maj(x, y, z));
		}
	}

	#[test]
	fn test_bitwise_tables_extremes() {
		let ch_tables = test_utils::tables(RotationVariant::BigSigma1).ch().unwrap();
		assert_eq!(ch_tables.ch(u32::MAX, 0x1234_5678, 0).unwrap(), 0x1234_5678);
		assert_eq!(ch_tables.ch(0, 0x1234_5678, 0x9abc_def0).unwrap(), 0x9abc_def0);

		let maj_tables = test_utils::tables(RotationVariant::BigSigma0).maj().unwrap();
		assert_eq!(maj_tables.maj(u32::MAX, u32::MAX, 0).unwrap(), u32::MAX);
		assert_eq!(maj_tables.maj(u32::MAX, 0, 0).unwrap(), 0);
	}

	proptest! {
		#[test]
		fn test_ch_split_matches_reference(e in any::<u32>(), f in any::<u32>(), g in any::<u32>()) {
			let ch_tables = test_utils::tables(RotationVariant::BigSigma1).ch().unwrap();
			prop_assert_eq!(ch_tables.ch_halves(e, f, g).unwrap(), ch(e, f, g));
		}

		#[test]
		fn test_maj_matches_reference(a in any::<u32>(), b in any::<u32>(), c in any::<u32>()) {
			let maj_tables = test_utils::tables(RotationVariant::BigSigma0).maj().unwrap();
			prop_assert_eq!(maj_tables.maj(a, b, c).unwrap(), maj(a, b, c));
		}
	}
}
