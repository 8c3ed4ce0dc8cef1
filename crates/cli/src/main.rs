// Copyright 2024-2025 Irreducible Inc.

use anyhow::Result;
use clap::{value_parser, Parser};
use sha256air_circuits::{analyze, sha256_cost, validate_sha256, Cost, ValidationConfig};
use sha256air_hash::RotationVariant;
use sha256air_utils::{
	env::{boolean_env_flag_set, DUMP_ENV_VAR},
	tracing::init_tracing,
};

#[derive(Debug, Parser)]
#[command(about = "Derives and validates the SHA-256 lookup decomposition")]
struct Args {
	/// Sigma variant to analyze, repeatable. All four by default.
	#[arg(long = "variant")]
	variants: Vec<RotationVariant>,
	/// Random samples per validation check. Defaults to SHA256AIR_SAMPLES or 10000.
	#[arg(long, value_parser = value_parser!(u64).range(1..))]
	samples: Option<u64>,
	/// Print the bit patterns of each partition.
	#[arg(long)]
	dump: bool,
	/// Only print the cost model.
	#[arg(long)]
	costs_only: bool,
}

fn main() -> Result<()> {
	let args = Args::parse();

	init_tracing();

	if !args.costs_only {
		let config = match args.samples {
			Some(samples) => ValidationConfig::with_samples(samples as usize),
			None => ValidationConfig::from_env()?,
		};
		let samples = config.samples;
		let dump = args.dump || boolean_env_flag_set(DUMP_ENV_VAR);
		let variants = if args.variants.is_empty() {
			RotationVariant::ALL.to_vec()
		} else {
			args.variants
		};

		let mut analyses = Vec::with_capacity(variants.len());
		for variant in variants {
			let analysis =
				tracing::info_span!("variant", %variant).in_scope(|| analyze(variant, samples))?;

			println!("== {variant} ==");
			if dump {
				println!("{}", analysis.partition);
			}
			for table in analysis.table_summary() {
				println!("  {table}");
			}
			println!("  {}", analysis.report);
			println!("  cost: {} ({} cells)", analysis.cost, analysis.cost.cells());
			analyses.push(analysis);
		}

		let tables = analyses.iter().map(|analysis| &analysis.tables);
		let chunks = validate_sha256(tables, config.chunk_samples)?;
		println!("== sha256 ==");
		println!("  {chunks} chunks compressed through the tables matched the reference compressor");
		println!();
	}

	println!("{}", sha256_cost());
	for variant in RotationVariant::ALL {
		let cost = Cost::for_variant(variant);
		println!("  {}: {} ({} cells)", variant.name(), cost, cost.cells());
	}

	Ok(())
}
