// Copyright 2024-2025 Irreducible Inc.

//! Dense lookup tables over subset domains.
//!
//! Every key limb of a [`LookupTable`] ranges over the submasks of one mask, so a table with key
//! masks `m_1, ..., m_k` has exactly `2^(popcount(m_1) + ... + popcount(m_k))` entries. Entries
//! are stored densely, indexed by the concatenated bit extraction of the limbs.

mod bitwise;
mod range_check;
mod sigma;

use std::fmt;

use itertools::Itertools;
use sha256air_hash::RotationVariant;
use sha256air_utils::{
	bits::{pdep_u32, pext_u32},
	checked_arithmetics::checked_domain_size,
};
use tracing::{info, instrument};

pub use self::{bitwise::*, range_check::*, sigma::*};
use crate::{
	error::{Error, Result},
	partition::Partition,
	subset::get_subset,
};

#[derive(Debug, Clone)]
pub struct LookupTable<V> {
	name: String,
	key_masks: Vec<u32>,
	values: Vec<V>,
}

impl<V: Copy + Default> LookupTable<V> {
	/// Materializes `f` over the product of the subset domains of `key_masks`.
	pub fn build(name: impl ToString, key_masks: Vec<u32>, f: impl Fn(&[u32]) -> V) -> Self {
		let log_size = key_masks.iter().map(|mask| mask.count_ones()).sum();
		let mut values = vec![V::default(); checked_domain_size(log_size)];

		for key in key_masks
			.iter()
			.map(|&mask| get_subset(mask))
			.multi_cartesian_product()
		{
			values[dense_index(&key_masks, &key)] = f(&key);
		}

		Self {
			name: name.to_string(),
			key_masks,
			values,
		}
	}

	pub fn get(&self, key: &[u32]) -> Result<V> {
		if key.len() != self.key_masks.len() {
			return Err(Error::KeyArity {
				table: self.name.clone(),
				expected: self.key_masks.len(),
				actual: key.len(),
			});
		}

		if let Some((&limb, &mask)) = key
			.iter()
			.zip(&self.key_masks)
			.find(|&(&limb, &mask)| limb & !mask != 0)
		{
			return Err(Error::LimbNotInDomain {
				table: self.name.clone(),
				limb,
				mask,
			});
		}

		Ok(self.values[dense_index(&self.key_masks, key)])
	}

	/// All `(key, value)` pairs in index order.
	pub fn entries(&self) -> impl Iterator<Item = (Vec<u32>, V)> + '_ {
		self.values
			.iter()
			.enumerate()
			.map(|(index, &value)| (self.key_at(index), value))
	}

	fn key_at(&self, mut index: usize) -> Vec<u32> {
		let mut key = vec![0; self.key_masks.len()];
		for (limb, &mask) in key.iter_mut().zip(&self.key_masks).rev() {
			let n_bits = mask.count_ones();
			*limb = pdep_u32((index & (checked_domain_size(n_bits) - 1)) as u32, mask);
			index >>= n_bits;
		}
		key
	}
}

impl<V> LookupTable<V> {
	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn key_masks(&self) -> &[u32] {
		&self.key_masks
	}

	pub fn log_size(&self) -> u32 {
		self.key_masks.iter().map(|mask| mask.count_ones()).sum()
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	pub fn info(&self) -> TableInfo {
		TableInfo {
			name: self.name.clone(),
			arity: self.key_masks.len(),
			log_size: self.log_size(),
		}
	}
}

fn dense_index(key_masks: &[u32], key: &[u32]) -> usize {
	key_masks.iter().zip(key).fold(0, |acc, (&mask, &limb)| {
		(acc << mask.count_ones()) | pext_u32(limb, mask) as usize
	})
}

/// Shape of one built table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableInfo {
	pub name: String,
	pub arity: usize,
	pub log_size: u32,
}

impl fmt::Display for TableInfo {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}: {} limbs, 2^{} entries", self.name, self.arity, self.log_size)
	}
}

/// Every table derived from the partition of one variant.
#[derive(Debug, Clone)]
pub struct LookupTables {
	pub sigma: SigmaTables,
	/// Ch tables for big sigma 1 and Maj tables for big sigma 0, over the same limb layout.
	pub bitwise: Option<BitwiseTables>,
}

impl LookupTables {
	pub fn variant(&self) -> RotationVariant {
		self.sigma.partition().variant
	}

	pub fn partition(&self) -> &Partition {
		self.sigma.partition()
	}

	pub fn ch(&self) -> Result<&ChTables> {
		match &self.bitwise {
			Some(BitwiseTables::Ch(tables)) => Ok(tables),
			_ => Err(self.missing("Ch")),
		}
	}

	pub fn maj(&self) -> Result<&MajTables> {
		match &self.bitwise {
			Some(BitwiseTables::Maj(tables)) => Ok(tables),
			_ => Err(self.missing("Maj")),
		}
	}

	fn missing(&self, function: &'static str) -> Error {
		Error::MissingBitwiseTables {
			variant: self.variant(),
			function,
		}
	}

	pub fn summary(&self) -> Vec<TableInfo> {
		let mut summary = self.sigma.summary();
		if let Some(bitwise) = &self.bitwise {
			summary.extend(bitwise.summary());
		}
		summary
	}
}

#[instrument(skip_all, fields(variant = partition.variant.name()))]
pub fn build_tables(partition: &Partition) -> LookupTables {
	let sigma = SigmaTables::new(partition);
	let bitwise = BitwiseTables::for_partition(partition);

	let tables = LookupTables { sigma, bitwise };
	for table in tables.summary() {
		info!(table = %table.name, arity = table.arity, log_size = table.log_size, "built table");
	}
	tables
}
