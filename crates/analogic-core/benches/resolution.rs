//! Benchmarks for resource resolution
//!
//! Tests performance of:
//! - Label normalization
//! - Table construction (key precomputation)
//! - Resolution scans (hit early, hit late, miss)

#![allow(clippy::expect_used)] // Fine in benchmarks

use analogic_core::normalize::normalize;
use analogic_core::resolver::{resolve, ResourceQuery};
use analogic_core::table::{ReferenceRow, ReferenceTable};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::seq::SliceRandom;

const PRINCIPLES: &[&str] = &[
	"Least Astonishment",
	"Closure",
	"Proximidad",
	"Retroalimentación",
	"Consistencia",
];
const ENVIRONMENTS: &[&str] = &["Urbano", "Rural", "Costero", "Montaña"];
const INTERESTS: &[&str] = &["Música", "Deportes", "Videojuegos", "Cocina", "Naturaleza"];
const MODALITIES: &[&str] = &["Visual", "Auditiva", "Kinestésica"];

/// Generate a synthetic table covering the full attribute grid, shuffled
fn generate_table(copies: usize) -> ReferenceTable {
	let mut rng = rand::thread_rng();
	let mut rows = Vec::new();
	for copy in 0..copies {
		for p in PRINCIPLES {
			for e in ENVIRONMENTS {
				for i in INTERESTS {
					for m in MODALITIES {
						rows.push(ReferenceRow::new(
							format!("{p} {copy}"),
							*e,
							*i,
							*m,
							"Infografía",
							format!("https://recursos.example/{copy}/{p}/{e}/{i}/{m}"),
						));
					}
				}
			}
		}
	}
	rows.shuffle(&mut rng);
	ReferenceTable::from_rows(rows)
}

fn bench_normalize(c: &mut Criterion) {
	let mut group = c.benchmark_group("normalize");

	for label in ["Visual", "  Interés Vivencial  ", "Retroalimentación Kinestésica Ñandú"] {
		let _ = group.throughput(Throughput::Bytes(label.len() as u64));
		let _ = group.bench_with_input(BenchmarkId::new("label", label.len()), label, |bench, l| {
			bench.iter(|| normalize(black_box(l)));
		});
	}

	group.finish();
}

fn bench_table_build(c: &mut Criterion) {
	let mut group = c.benchmark_group("table_build");

	for copies in &[1_usize, 10, 50] {
		let _ = group.bench_with_input(BenchmarkId::new("copies", copies), copies, |bench, &n| {
			bench.iter(|| generate_table(black_box(n)));
		});
	}

	group.finish();
}

fn bench_resolve(c: &mut Criterion) {
	let mut group = c.benchmark_group("resolve");

	for copies in &[1_usize, 10, 50] {
		let table = generate_table(*copies);
		let first = &table.rows()[0];
		let last = table.rows().last().expect("non-empty table");

		let hit_first = ResourceQuery::new(
			first.principle.to_uppercase(),
			&first.environment,
			&first.interest,
			&first.modality,
		);
		let hit_last = ResourceQuery::new(
			&last.principle,
			last.environment.to_lowercase(),
			&last.interest,
			&last.modality,
		);
		let miss = ResourceQuery::new("Nada", "Nada", "Nada", "Nada");

		let _ = group.throughput(Throughput::Elements(table.len() as u64));
		let _ = group.bench_with_input(BenchmarkId::new("hit_first", table.len()), &table, |bench, t| {
			bench.iter(|| resolve(black_box(t), black_box(&hit_first)));
		});
		let _ = group.bench_with_input(BenchmarkId::new("hit_last", table.len()), &table, |bench, t| {
			bench.iter(|| resolve(black_box(t), black_box(&hit_last)));
		});
		let _ = group.bench_with_input(BenchmarkId::new("miss", table.len()), &table, |bench, t| {
			bench.iter(|| resolve(black_box(t), black_box(&miss)));
		});
	}

	group.finish();
}

criterion_group!(benches, bench_normalize, bench_table_build, bench_resolve);
criterion_main!(benches);
