//! Shard-count contention benchmarks for the concurrent map variants.
//!
//! Run with: `cargo bench --bench contention`
//!
//! Measures multi-threaded throughput of [`ShardedMap`] and [`StripedMap`]
//! across shard counts under read-heavy workloads. The interesting axis is
//! the shard count: a single shard serializes every writer behind one lock,
//! while 64 shards let writers proceed in parallel.

use std::hint::black_box;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand_distr::{Distribution, Zipf};
use shardkit::store::{ConcurrentMap, ShardedMap, StripedMap};

const WORKERS: usize = 16;
const OPS_PER_WORKER: u64 = 50_000;
const KEY_SPACE: u64 = 5_000;
const SHARD_COUNTS: [usize; 4] = [1, 4, 16, 64];

fn prepopulate<M: ConcurrentMap<String, u64>>(map: &M) {
    for i in 0..KEY_SPACE {
        map.insert(format!("k{i}"), i);
    }
}

/// Cycling workload: every worker walks the key space in order, writing on
/// every seventh operation and reading otherwise.
fn run_cycling<M>(map: &Arc<M>) -> Duration
where
    M: ConcurrentMap<String, u64> + 'static,
{
    let start = Instant::now();
    let handles: Vec<_> = (0..WORKERS)
        .map(|_| {
            let map = Arc::clone(map);
            thread::spawn(move || {
                for i in 0..OPS_PER_WORKER {
                    let key = format!("k{}", i % KEY_SPACE);
                    if i % 7 == 0 {
                        map.insert(key, i);
                    } else {
                        black_box(map.get(&key));
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    start.elapsed()
}

/// Skewed workload: Zipf-distributed keys concentrate traffic on a few hot
/// keys, which in turn concentrates it on a few hot shards.
fn run_zipf<M>(map: &Arc<M>) -> Duration
where
    M: ConcurrentMap<String, u64> + 'static,
{
    let start = Instant::now();
    let handles: Vec<_> = (0..WORKERS)
        .map(|worker| {
            let map = Arc::clone(map);
            thread::spawn(move || {
                let mut rng = SmallRng::seed_from_u64(0x5eed ^ worker as u64);
                let skew = Zipf::new(KEY_SPACE as f64, 1.1).unwrap();
                for i in 0..OPS_PER_WORKER {
                    let rank = skew.sample(&mut rng) as u64 - 1;
                    let key = format!("k{rank}");
                    if i % 10 == 0 {
                        map.insert(key, i);
                    } else {
                        black_box(map.get(&key));
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    start.elapsed()
}

// ============================================================================
// Cycling Mixed Workload (16 threads, 1 write per 7 ops)
// ============================================================================

fn bench_cycling(c: &mut Criterion) {
    let mut group = c.benchmark_group("cycling_mixed");
    group.throughput(Throughput::Elements(WORKERS as u64 * OPS_PER_WORKER));
    group.sample_size(10);

    for shards in SHARD_COUNTS {
        group.bench_function(format!("sharded/{shards:02}_shards"), |b| {
            b.iter_custom(|iters| {
                let mut total = Duration::ZERO;
                for _ in 0..iters {
                    let map: Arc<ShardedMap<String, u64>> =
                        Arc::new(ShardedMap::with_capacity(shards, KEY_SPACE as usize));
                    prepopulate(map.as_ref());
                    total += run_cycling(&map);
                }
                total
            })
        });

        group.bench_function(format!("striped/{shards:02}_shards"), |b| {
            b.iter_custom(|iters| {
                let mut total = Duration::ZERO;
                for _ in 0..iters {
                    let map: Arc<StripedMap<String, u64>> =
                        Arc::new(StripedMap::with_capacity(shards, KEY_SPACE as usize));
                    prepopulate(map.as_ref());
                    total += run_cycling(&map);
                }
                total
            })
        });
    }

    group.finish();
}

// ============================================================================
// Zipf-Skewed Workload (16 threads, hot-key pressure)
// ============================================================================

fn bench_zipf(c: &mut Criterion) {
    let mut group = c.benchmark_group("zipf_skewed");
    group.throughput(Throughput::Elements(WORKERS as u64 * OPS_PER_WORKER));
    group.sample_size(10);

    for shards in SHARD_COUNTS {
        group.bench_function(format!("sharded/{shards:02}_shards"), |b| {
            b.iter_custom(|iters| {
                let mut total = Duration::ZERO;
                for _ in 0..iters {
                    let map: Arc<ShardedMap<String, u64>> =
                        Arc::new(ShardedMap::with_capacity(shards, KEY_SPACE as usize));
                    prepopulate(map.as_ref());
                    total += run_zipf(&map);
                }
                total
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_cycling, bench_zipf);
criterion_main!(benches);
