// Copyright 2024-2025 Irreducible Inc.

use sha256air_hash::RotationVariant;
use tracing::{info, instrument};

use crate::{
	cost::Cost,
	derive_partition,
	error::Result,
	lookup::{build_tables, LookupTables, TableInfo},
	partition::Partition,
	validate::{validate, ValidationReport},
};

/// Everything derived for one variant.
#[derive(Debug, Clone)]
pub struct Analysis {
	pub partition: Partition,
	pub tables: LookupTables,
	pub cost: Cost,
	pub report: ValidationReport,
}

impl Analysis {
	pub fn table_summary(&self) -> Vec<TableInfo> {
		self.tables.summary()
	}
}

/// Derives the partition of `variant`, builds its tables and validates them on `samples` random
/// inputs.
#[instrument(skip_all, fields(variant = variant.name(), samples = samples))]
pub fn analyze(variant: RotationVariant, samples: usize) -> Result<Analysis> {
	let partition = derive_partition(variant)?;
	let tables = build_tables(&partition);
	let report = validate(&tables, samples)?;
	let cost = Cost::for_variant(variant);

	info!(%cost, cells = cost.cells(), "analysis complete");
	Ok(Analysis {
		partition,
		tables,
		cost,
		report,
	})
}
