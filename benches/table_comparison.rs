use core::hint::black_box;
use std::collections::HashMap as StdHashMap;

use criterion::AxisScale;
use criterion::BatchSize;
use criterion::Criterion;
use criterion::PlotConfiguration;
use criterion::Throughput;
use criterion::criterion_group;
use criterion::criterion_main;
use duo_hash::FoldKeyOps;
use duo_hash::HashTable;
use hashbrown::HashMap as HashbrownHashMap;
use rand::SeedableRng;
use rand::TryRngCore;
use rand::rngs::OsRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

const SIZES: &[usize] = &[
    (1 << 10),
    (1 << 12),
    (1 << 14),
    (1 << 16),
    (1 << 18),
];

fn random_pairs(count: usize) -> Vec<(u64, u64)> {
    let mut rng = OsRng;
    (0..count)
        .map(|_| {
            (
                rng.try_next_u64().unwrap(),
                rng.try_next_u64().unwrap(),
            )
        })
        .collect()
}

fn bench_insert_random(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_random");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES {
        let pairs = random_pairs(size);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_function(format!("duo_hash/{size}"), |b| {
            b.iter_batched(
                || {
                    let mut pairs = pairs.clone();
                    pairs.shuffle(&mut SmallRng::from_os_rng());
                    pairs
                },
                |pairs| {
                    let mut table = HashTable::new(FoldKeyOps::default());
                    for (key, value) in pairs {
                        table.put(key, value);
                    }
                    black_box(table)
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter_batched(
                || {
                    let mut pairs = pairs.clone();
                    pairs.shuffle(&mut SmallRng::from_os_rng());
                    pairs
                },
                |pairs| {
                    let mut map = HashbrownHashMap::new();
                    for (key, value) in pairs {
                        map.insert(key, value);
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("std/{size}"), |b| {
            b.iter_batched(
                || {
                    let mut pairs = pairs.clone();
                    pairs.shuffle(&mut SmallRng::from_os_rng());
                    pairs
                },
                |pairs| {
                    let mut map = StdHashMap::new();
                    for (key, value) in pairs {
                        map.insert(key, value);
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_lookup_hit(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup_hit");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES {
        let pairs = random_pairs(size);

        let mut table = HashTable::new(FoldKeyOps::default());
        let mut brown = HashbrownHashMap::new();
        let mut std_map = StdHashMap::new();
        for &(key, value) in &pairs {
            table.put(key, value);
            brown.insert(key, value);
            std_map.insert(key, value);
        }

        group.throughput(Throughput::Elements(size as u64));
        group.bench_function(format!("duo_hash/{size}"), |b| {
            b.iter(|| {
                for &(key, _) in &pairs {
                    black_box(table.get(black_box(key)));
                }
            })
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter(|| {
                for &(key, _) in &pairs {
                    black_box(brown.get(black_box(&key)));
                }
            })
        });

        group.bench_function(format!("std/{size}"), |b| {
            b.iter(|| {
                for &(key, _) in &pairs {
                    black_box(std_map.get(black_box(&key)));
                }
            })
        });
    }

    group.finish();
}

fn bench_insert_remove_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_remove_churn");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES {
        let pairs = random_pairs(size);

        group.throughput(Throughput::Elements(2 * size as u64));
        group.bench_function(format!("duo_hash/{size}"), |b| {
            b.iter_batched(
                || pairs.clone(),
                |pairs| {
                    let mut table = HashTable::new(FoldKeyOps::default());
                    for &(key, value) in &pairs {
                        table.put(key, value);
                    }
                    for &(key, _) in &pairs {
                        black_box(table.remove(key));
                    }
                    black_box(table)
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter_batched(
                || pairs.clone(),
                |pairs| {
                    let mut map = HashbrownHashMap::new();
                    for &(key, value) in &pairs {
                        map.insert(key, value);
                    }
                    for &(key, _) in &pairs {
                        black_box(map.remove(&key));
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_insert_random,
    bench_lookup_hit,
    bench_insert_remove_churn
);
criterion_main!(benches);
