// Copyright 2024-2025 Irreducible Inc.

//! Randomized checks of the lookup decomposition against the reference primitives.

use std::fmt;

use rand::{thread_rng, Rng};
use sha256air_hash::{
	ch, compress, maj, message_schedule, round, sigma, ChainingState, Chunk, RotationVariant,
	ROUND_CONSTS_K,
};
use sha256air_utils::{bits::split_u32, env::get_sample_count};
use tracing::{info, instrument};

use crate::{
	error::{Error, Result},
	lookup::{AddStep, ChTables, FoldedSum, LookupTables, MajTables, RangeCheckAdd, SigmaTables},
};

pub const DEFAULT_SAMPLES: usize = 10_000;

/// Sigma samples per compressed chunk.
const SAMPLES_PER_CHUNK: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationConfig {
	/// Random inputs per sigma and per Ch/Maj check.
	pub samples: usize,
	/// Random sums per carry step.
	pub carry_samples: usize,
	/// Random chunks compressed through the tables and compared with the reference compressor.
	pub chunk_samples: usize,
}

impl Default for ValidationConfig {
	fn default() -> Self {
		Self::with_samples(DEFAULT_SAMPLES)
	}
}

impl ValidationConfig {
	pub const fn with_samples(samples: usize) -> Self {
		Self {
			samples,
			carry_samples: samples,
			chunk_samples: samples.div_ceil(SAMPLES_PER_CHUNK),
		}
	}

	/// The default configuration, with the sample count overridden by `SHA256AIR_SAMPLES` when
	/// set.
	pub fn from_env() -> Result<Self> {
		Ok(get_sample_count()?
			.map(Self::with_samples)
			.unwrap_or_default())
	}
}

/// Number of samples each check passed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationReport {
	pub variant: RotationVariant,
	pub sigma_samples: usize,
	/// Zero for the small sigma variants, which have no Ch/Maj tables.
	pub bitwise_samples: usize,
	/// Total over all carry steps.
	pub carry_samples: usize,
	pub chunk_samples: usize,
}

impl fmt::Display for ValidationReport {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{}: {} sigma samples, {} Ch/Maj samples, {} carry samples, {} chunks passed",
			self.variant,
			self.sigma_samples,
			self.bitwise_samples,
			self.carry_samples,
			self.chunk_samples
		)
	}
}

/// The nonlinear functions of a round. Each one is evaluated through its tables when they are
/// present and through the reference function otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoundFunctions<'a> {
	sigma: [Option<&'a SigmaTables>; 4],
	ch: Option<&'a ChTables>,
	maj: Option<&'a MajTables>,
}

impl<'a> RoundFunctions<'a> {
	pub fn from_tables(tables: impl IntoIterator<Item = &'a LookupTables>) -> Self {
		tables.into_iter().fold(Self::default(), Self::with_tables)
	}

	pub fn with_tables(mut self, tables: &'a LookupTables) -> Self {
		self.sigma[tables.variant() as usize] = Some(&tables.sigma);
		if let Ok(ch) = tables.ch() {
			self.ch = Some(ch);
		}
		if let Ok(maj) = tables.maj() {
			self.maj = Some(maj);
		}
		self
	}

	/// Whether every function goes through its tables.
	pub fn is_complete(&self) -> bool {
		self.sigma.iter().all(Option::is_some) && self.ch.is_some() && self.maj.is_some()
	}

	pub fn sigma(&self, variant: RotationVariant, x: u32) -> Result<u32> {
		match self.sigma[variant as usize] {
			Some(tables) => tables.evaluate(x),
			None => Ok(sigma(x, variant)),
		}
	}

	pub fn ch(&self, e: u32, f: u32, g: u32) -> Result<u32> {
		match self.ch {
			Some(tables) => tables.ch_halves(e, f, g),
			None => Ok(ch(e, f, g)),
		}
	}

	pub fn maj(&self, a: u32, b: u32, c: u32) -> Result<u32> {
		match self.maj {
			Some(tables) => tables.maj(a, b, c),
			None => Ok(maj(a, b, c)),
		}
	}
}

/// One range-checked addition per [`AddStep`].
#[derive(Debug, Clone)]
pub struct RangeChecks([RangeCheckAdd; 4]);

impl Default for RangeChecks {
	fn default() -> Self {
		Self::new()
	}
}

impl RangeChecks {
	pub fn new() -> Self {
		Self(AddStep::ALL.map(RangeCheckAdd::new))
	}

	pub fn get(&self, step: AddStep) -> &RangeCheckAdd {
		&self.0[step as usize]
	}
}

/// Validates `tables` on `samples` random inputs drawn from the thread-local generator.
pub fn validate(tables: &LookupTables, samples: usize) -> Result<ValidationReport> {
	validate_with_rng(tables, &ValidationConfig::with_samples(samples), &mut thread_rng())
}

#[instrument(skip_all, fields(variant = tables.variant().name(), samples = config.samples))]
pub fn validate_with_rng<R: Rng>(
	tables: &LookupTables,
	config: &ValidationConfig,
	rng: &mut R,
) -> Result<ValidationReport> {
	for _ in 0..config.samples {
		check_sigma(&tables.sigma, rng.gen())?;
	}

	let mut bitwise_samples = 0;
	if let Ok(ch_tables) = tables.ch() {
		for _ in 0..config.samples {
			let (e, f, g) = rng.gen();
			check_ch(ch_tables, e, f, g)?;
		}
		bitwise_samples = config.samples;
	}
	if let Ok(maj_tables) = tables.maj() {
		for _ in 0..config.samples {
			let (a, b, c) = rng.gen();
			check_maj(maj_tables, a, b, c)?;
		}
		bitwise_samples = config.samples;
	}

	let range_checks =
		(config.carry_samples > 0 || config.chunk_samples > 0).then(RangeChecks::new);

	let mut carry_samples = 0;
	if let Some(range_checks) = &range_checks {
		for step in AddStep::ALL {
			for _ in 0..config.carry_samples {
				let words = (0..step.operands()).map(|_| rng.gen()).collect::<Vec<u32>>();
				check_carry(range_checks.get(step), &words)?;
			}
			carry_samples += config.carry_samples;
		}

		let functions = RoundFunctions::default().with_tables(tables);
		validate_chunks(&functions, range_checks, config.chunk_samples, rng)?;
	}

	let report = ValidationReport {
		variant: tables.variant(),
		sigma_samples: config.samples,
		bitwise_samples,
		carry_samples,
		chunk_samples: config.chunk_samples,
	};
	info!(
		sigma_samples = report.sigma_samples,
		bitwise_samples = report.bitwise_samples,
		carry_samples = report.carry_samples,
		chunk_samples = report.chunk_samples,
		"validation passed"
	);
	Ok(report)
}

/// Compresses `chunks` random chunks from random chaining states through `functions` and the
/// range checks, comparing every state with the reference compressor.
pub fn validate_chunks<R: Rng>(
	functions: &RoundFunctions,
	range_checks: &RangeChecks,
	chunks: usize,
	rng: &mut R,
) -> Result<()> {
	for _ in 0..chunks {
		let state = rng.gen::<ChainingState>();
		let chunk = rng.gen::<Chunk>();
		check_compression(functions, range_checks, &state, &chunk)?;
	}
	Ok(())
}

/// Compresses `chunks` random chunks with every function evaluated through the given tables.
#[instrument(skip_all, fields(chunks = chunks))]
pub fn validate_sha256<'a>(
	tables: impl IntoIterator<Item = &'a LookupTables>,
	chunks: usize,
) -> Result<usize> {
	let functions = RoundFunctions::from_tables(tables);
	validate_chunks(&functions, &RangeChecks::new(), chunks, &mut thread_rng())?;
	info!(complete = functions.is_complete(), "compression through tables passed");
	Ok(chunks)
}

pub fn check_sigma(tables: &SigmaTables, x: u32) -> Result<()> {
	let variant = tables.partition().variant;
	let actual = tables.evaluate(x)?;
	ensure_eq(variant.name(), vec![x], sigma(x, variant), actual)
}

/// Checks both the Ch tables and the `ch_left + ch_right` tables.
pub fn check_ch(tables: &ChTables, e: u32, f: u32, g: u32) -> Result<()> {
	let expected = ch(e, f, g);
	ensure_eq("ch", vec![e, f, g], expected, tables.ch(e, f, g)?)?;
	ensure_eq("ch_halves", vec![e, f, g], expected, tables.ch_halves(e, f, g)?)
}

pub fn check_maj(tables: &MajTables, a: u32, b: u32, c: u32) -> Result<()> {
	ensure_eq("maj", vec![a, b, c], maj(a, b, c), tables.maj(a, b, c)?)
}

/// Adds `words` limb by limb through the range check of its step and compares the result with
/// the wrapping sum.
pub fn check_carry(range_check: &RangeCheckAdd, words: &[u32]) -> Result<u32> {
	let folded = fold_words(range_check, words)?;

	let expected = words.iter().fold(0u32, |acc, &w| acc.wrapping_add(w));
	ensure_eq(
		&format!("{:?} add", range_check.step()),
		words.to_vec(),
		expected,
		folded.value,
	)?;
	Ok(folded.value)
}

/// Expands `chunk` into its 64 schedule words, with `W[t-16] + σ0(W[t-15]) + W[t-7] + σ1(W[t-2])`
/// folded through `range_check`, and compares the words with the reference schedule.
pub fn check_schedule(
	functions: &RoundFunctions,
	range_check: &RangeCheckAdd,
	chunk: &Chunk,
) -> Result<[u32; 64]> {
	let mut w = [0u32; 64];
	w[..16].copy_from_slice(chunk);

	for t in 16..64 {
		let terms = [
			w[t - 16],
			functions.sigma(RotationVariant::SmallSigma0, w[t - 15])?,
			w[t - 7],
			functions.sigma(RotationVariant::SmallSigma1, w[t - 2])?,
		];
		w[t] = fold_words(range_check, &terms)?.value;
	}

	let expected = message_schedule(chunk);
	for t in 16..64 {
		ensure_eq("message_schedule", chunk.to_vec(), expected[t], w[t])?;
	}
	Ok(w)
}

/// Runs one round on the working variables `a..h`: `temp1 = h + Σ1(e) + Ch(e, f, g) + k + w` is
/// folded through the compression range check, and the new `e` and `a` through their own steps.
/// The result is compared with the reference round.
pub fn check_round(
	functions: &RoundFunctions,
	range_checks: &RangeChecks,
	working: &ChainingState,
	k: u32,
	w: u32,
) -> Result<ChainingState> {
	let [a, b, c, d, e, f, g, h] = *working;

	let big_sigma1 = functions.sigma(RotationVariant::BigSigma1, e)?;
	let ch = functions.ch(e, f, g)?;
	let big_sigma0 = functions.sigma(RotationVariant::BigSigma0, a)?;
	let maj = functions.maj(a, b, c)?;

	let temp1 = fold_words(range_checks.get(AddStep::Compression), &[h, big_sigma1, ch, k, w])?;
	let new_e = fold_words(range_checks.get(AddStep::EUpdate), &[d, h, big_sigma1, ch, k, w])?;
	let new_a = fold_words(
		range_checks.get(AddStep::AUpdate),
		&[h, big_sigma1, ch, k, w, big_sigma0, maj],
	)?;

	let mut expected = *working;
	round(&mut expected, k, w);
	let input = [&working[..], &[k, w]].concat();
	ensure_eq("round e", input.clone(), expected[4], new_e.value)?;
	ensure_eq("round a", input.clone(), expected[0], new_a.value)?;
	ensure_eq("round temp1", input, expected[4].wrapping_sub(d), temp1.value)?;

	Ok([new_a.value, a, b, c, new_e.value, e, f, g])
}

/// Compresses `chunk` into a copy of `state` through the schedule and round checks, and compares
/// the result with the reference compressor.
pub fn check_compression(
	functions: &RoundFunctions,
	range_checks: &RangeChecks,
	state: &ChainingState,
	chunk: &Chunk,
) -> Result<ChainingState> {
	let w = check_schedule(functions, range_checks.get(AddStep::Schedule), chunk)?;

	let mut working = *state;
	for (&k, &w) in ROUND_CONSTS_K.iter().zip(w.iter()) {
		working = check_round(functions, range_checks, &working, k, w)?;
	}

	let mut next = *state;
	for (word, round) in next.iter_mut().zip(working) {
		*word = fold_words(range_checks.get(AddStep::Schedule), &[*word, round])?.value;
	}

	let mut expected = *state;
	compress(&mut expected, chunk);
	for (&expected, &actual) in expected.iter().zip(&next) {
		ensure_eq("compress", chunk.to_vec(), expected, actual)?;
	}
	Ok(next)
}

fn fold_words(range_check: &RangeCheckAdd, words: &[u32]) -> Result<FoldedSum> {
	let (low_terms, high_terms): (Vec<u16>, Vec<u16>) =
		words.iter().map(|&word| split_u32(word)).unzip();
	range_check.fold_limbs(&low_terms, &high_terms)
}

fn ensure_eq(primitive: &str, input: Vec<u32>, expected: u32, actual: u32) -> Result<()> {
	if expected != actual {
		return Err(Error::Mismatch {
			primitive: primitive.to_string(),
			input,
			expected,
			actual,
		});
	}
	Ok(())
}
