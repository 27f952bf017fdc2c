//! Criterion benchmarks for bucket-sort construction and key lookup.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rowstore::{IndexedEntry, RowStore, SortedKeyIndex};

fn random_rows(rows: usize, cols: i32, per_row: usize, seed: u64) -> RowStore<IndexedEntry<f32>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut store = RowStore::new();
    store.reserve(rows, rows * per_row);
    for _ in 0..rows {
        for _ in 0..rng.gen_range(0..=per_row * 2) {
            store.add_row_item(IndexedEntry::new(rng.gen_range(-1..cols), rng.gen()));
        }
        store.end_row();
    }
    store
}

fn bench_reference_index(c: &mut Criterion) {
    let mut group = c.benchmark_group("reference_index");
    for &rows in &[1_000usize, 100_000] {
        let store = random_rows(rows, rows as i32, 8, 1);
        let entries = store.flat_data();
        group.throughput(Throughput::Elements(entries.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &rows, |b, &rows| {
            let mut target = RowStore::<u32>::new();
            b.iter(|| {
                target
                    .make_reference_index(black_box(entries.as_slice()), rows)
                    .unwrap();
                black_box(target.element_count())
            })
        });
    }
    group.finish();
}

fn bench_transpose(c: &mut Criterion) {
    let mut group = c.benchmark_group("transpose");
    for &rows in &[1_000usize, 100_000] {
        let store = random_rows(rows, rows as i32, 8, 2);
        group.throughput(Throughput::Elements(store.element_count() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &rows, |b, &rows| {
            let mut target = RowStore::new();
            b.iter(|| {
                target.make_transpose(black_box(&store), rows).unwrap();
                black_box(target.element_count())
            })
        });
    }
    group.finish();
}

fn bench_key_lookup(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(3);
    let keys: Vec<u64> = (0..100_000).map(|_| rng.gen()).collect();
    let lookups: Vec<u64> = keys.iter().step_by(7).copied().collect();
    let index = SortedKeyIndex::from_keys(keys);

    c.bench_function("key_index_lookup", |b| {
        b.iter(|| {
            let mut found = 0usize;
            for key in &lookups {
                found += usize::from(index.has_key(black_box(key)));
            }
            found
        })
    });
}

criterion_group!(
    benches,
    bench_reference_index,
    bench_transpose,
    bench_key_lookup
);
criterion_main!(benches);
