use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use sortedtable::{Direction, OrdTable};
use std::collections::BTreeMap;

const SIZES: [u64; 3] = [1_000, 10_000, 100_000];

fn shuffled(n: u64) -> Vec<u64> {
    let mut keys: Vec<u64> = (0..n).collect();
    keys.shuffle(&mut StdRng::seed_from_u64(7));
    keys
}

fn filled_table(keys: &[u64]) -> OrdTable<u64, u64> {
    let mut table = OrdTable::new();
    for &k in keys {
        table.insert(k, k).unwrap();
    }
    table
}

fn insertion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_random");
    for n in SIZES {
        let keys = shuffled(n);
        group.bench_with_input(BenchmarkId::new("sortedtable", n), &keys, |b, keys| {
            b.iter(|| black_box(filled_table(keys)))
        });
        group.bench_with_input(BenchmarkId::new("btreemap", n), &keys, |b, keys| {
            b.iter(|| {
                let mut map = BTreeMap::new();
                for &k in keys {
                    map.insert(k, k);
                }
                black_box(map)
            })
        });
    }
    group.finish();
}

fn lookup_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup_random");
    for n in SIZES {
        let keys = shuffled(n);
        let table = filled_table(&keys);
        let map: BTreeMap<u64, u64> = keys.iter().map(|&k| (k, k)).collect();

        group.bench_function(BenchmarkId::new("sortedtable", n), |b| {
            b.iter(|| {
                for k in keys.iter().take(1_000) {
                    black_box(table.get(black_box(k)));
                }
            })
        });
        group.bench_function(BenchmarkId::new("btreemap", n), |b| {
            b.iter(|| {
                for k in keys.iter().take(1_000) {
                    black_box(map.get(black_box(k)));
                }
            })
        });
    }
    group.finish();
}

fn deletion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("delete_min_drain");
    let keys = shuffled(10_000);
    group.bench_function("sortedtable", |b| {
        b.iter_batched(
            || filled_table(&keys),
            |mut table| {
                while table.delete_min().is_ok() {}
                table
            },
            criterion::BatchSize::LargeInput,
        )
    });
    group.bench_function("btreemap", |b| {
        b.iter_batched(
            || keys.iter().map(|&k| (k, k)).collect::<BTreeMap<_, _>>(),
            |mut map| {
                while map.pop_first().is_some() {}
                map
            },
            criterion::BatchSize::LargeInput,
        )
    });
    group.finish();
}

fn iteration_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("iterate_all");
    let keys = shuffled(100_000);
    let table = filled_table(&keys);
    let map: BTreeMap<u64, u64> = keys.iter().map(|&k| (k, k)).collect();

    group.bench_function("sortedtable_iter", |b| {
        b.iter(|| black_box(table.iter().map(|(_, v)| *v).sum::<u64>()))
    });
    group.bench_function("sortedtable_cursor", |b| {
        b.iter(|| {
            let mut cursor = table.cursor(Direction::Descending).unwrap();
            let mut sum = 0u64;
            while let Some((_, v)) = cursor.next(&table) {
                sum += *v;
            }
            black_box(sum)
        })
    });
    group.bench_function("btreemap", |b| {
        b.iter(|| black_box(map.values().sum::<u64>()))
    });
    group.finish();
}

criterion_group!(
    benches,
    insertion_benchmark,
    lookup_benchmark,
    deletion_benchmark,
    iteration_benchmark
);
criterion_main!(benches);
