// Copyright 2024-2025 Irreducible Inc.

//! Partitions and tables shared between tests, built once per test binary.

use std::sync::OnceLock;

use sha256air_hash::RotationVariant;

use crate::{
	lookup::{build_tables, AddStep, LookupTables, RangeCheckAdd},
	partition::{find_split, Partition},
	validate::RangeChecks,
};

#[allow(clippy::declare_interior_mutable_const)]
const EMPTY_TABLES: OnceLock<LookupTables> = OnceLock::new();

static PARTITIONS: OnceLock<Vec<Partition>> = OnceLock::new();
static TABLES: [OnceLock<LookupTables>; 4] = [EMPTY_TABLES; 4];
static RANGE_CHECKS: OnceLock<RangeChecks> = OnceLock::new();

pub fn partition(variant: RotationVariant) -> &'static Partition {
	let partitions = PARTITIONS.get_or_init(|| {
		RotationVariant::ALL
			.into_iter()
			.map(|variant| find_split(variant).expect("all canonical variants split"))
			.collect()
	});
	&partitions[variant as usize]
}

pub fn tables(variant: RotationVariant) -> &'static LookupTables {
	TABLES[variant as usize].get_or_init(|| build_tables(partition(variant)))
}

pub fn range_checks() -> &'static RangeChecks {
	RANGE_CHECKS.get_or_init(RangeChecks::new)
}

pub fn range_check(step: AddStep) -> &'static RangeCheckAdd {
	range_checks().get(step)
}
