// Copyright 2024-2025 Irreducible Inc.

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use rand::{thread_rng, Rng};
use sha256air_circuits::{build_tables, derive_partition, RotationVariant};

fn bench_find_split(c: &mut Criterion) {
	let mut group = c.benchmark_group("find_split");
	for variant in RotationVariant::ALL {
		group.bench_function(variant.name(), |bench| {
			bench.iter(|| derive_partition(std::hint::black_box(variant)).unwrap())
		});
	}
	group.finish()
}

fn bench_build_tables(c: &mut Criterion) {
	let mut group = c.benchmark_group("build_tables");
	group.sample_size(10);

	let partition = derive_partition(RotationVariant::SmallSigma0).unwrap();
	group.bench_function(RotationVariant::SmallSigma0.name(), |bench| {
		bench.iter(|| build_tables(&partition))
	});
	group.finish()
}

fn bench_evaluate(c: &mut Criterion) {
	let mut group = c.benchmark_group("lookup_evaluate");

	const N: usize = 1 << 12;
	let mut rng = thread_rng();
	let inputs: Vec<u32> = (0..N).map(|_| rng.gen()).collect();

	let tables = build_tables(&derive_partition(RotationVariant::SmallSigma1).unwrap());
	group.throughput(Throughput::Elements(N as u64));
	group.bench_function(RotationVariant::SmallSigma1.name(), |bench| {
		bench.iter(|| {
			inputs
				.iter()
				.fold(0u32, |acc, &x| acc ^ tables.sigma.evaluate(x).unwrap())
		})
	});
	group.finish()
}

criterion_group!(tables, bench_find_split, bench_build_tables, bench_evaluate);
criterion_main!(tables);
