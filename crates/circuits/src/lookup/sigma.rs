// Copyright 2024-2025 Irreducible Inc.

use sha256air_hash::sigma;
use sha256air_utils::bits::split_u32;

use super::{LookupTable, TableInfo};
use crate::{
	error::Result,
	partition::{Half, LimbLayout, Part, Partition},
};

/// Contribution of one partition side to a sigma output.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SigmaEntry {
	/// Output bits in the low half that only this side reaches.
	pub low: u16,
	/// Output bits in the high half that only this side reaches, shifted down by 16.
	pub high: u16,
	/// Output bits in the shared overlap `O2`, in word position.
	pub overlap: u32,
}

/// The two partition-side tables of a sigma variant and the XOR table merging their overlaps.
#[derive(Debug, Clone)]
pub struct SigmaTables {
	partition: Partition,
	layout: LimbLayout,
	i0: LookupTable<SigmaEntry>,
	i1: LookupTable<SigmaEntry>,
	xor: LookupTable<[u16; 2]>,
}

impl SigmaTables {
	pub fn new(partition: &Partition) -> Self {
		let layout = partition.layout();
		let [i0, i1] = Part::ALL.map(|part| side_table(partition, &layout, part));

		let xor = LookupTable::build(
			format!("{}_xor", partition.variant.name()),
			vec![partition.o2, partition.o2],
			|key| {
				let (low, high) = split_u32(key[0] ^ key[1]);
				[low, high]
			},
		);

		Self {
			partition: *partition,
			layout,
			i0,
			i1,
			xor,
		}
	}

	pub fn partition(&self) -> &Partition {
		&self.partition
	}

	pub fn layout(&self) -> &LimbLayout {
		&self.layout
	}

	pub fn side(&self, part: Part) -> &LookupTable<SigmaEntry> {
		match part {
			Part::I0 => &self.i0,
			Part::I1 => &self.i1,
		}
	}

	pub fn xor(&self) -> &LookupTable<[u16; 2]> {
		&self.xor
	}

	/// Evaluates the sigma function on `x` through table lookups only.
	///
	/// The guessed limbs of `x` key both side tables, the overlap contributions are merged by the
	/// XOR table, and the disjoint low and high pieces are summed back into a word.
	pub fn evaluate(&self, x: u32) -> Result<u32> {
		let limbs = self.layout.split(x)?;
		let i0 = self.i0.get(limbs.part(Part::I0))?;
		let i1 = self.i1.get(limbs.part(Part::I1))?;
		let [xor_low, xor_high] = self.xor.get(&[i0.overlap, i1.overlap])?;

		let low = i0.low as u32 + i1.low as u32 + xor_low as u32;
		let high = i0.high as u32 + i1.high as u32 + xor_high as u32;
		Ok(low + (high << 16))
	}

	pub fn summary(&self) -> Vec<TableInfo> {
		vec![self.i0.info(), self.i1.info(), self.xor.info()]
	}
}

fn side_table(partition: &Partition, layout: &LimbLayout, part: Part) -> LookupTable<SigmaEntry> {
	let variant = partition.variant;
	let output = partition.output(part);
	let (out_low, out_high) = (Half::Low.of(output), Half::High.of(output));

	LookupTable::build(
		format!("{}_{}", variant.name(), part.name()),
		layout.part(part).map(|chunk| chunk.mask).collect(),
		|limbs| {
			let out = sigma(layout.compose(part, limbs), variant);
			SigmaEntry {
				low: (out & out_low) as u16,
				high: ((out >> 16) & out_high) as u16,
				overlap: out & partition.o2,
			}
		},
	)
}
