//! Benchmark for buffer pool reuse vs fresh allocation.
//!
//! TARGET: pooled acquire/release faster than `vec![0; n]` for chunk-sized grids
//!
//! Run with: cargo bench --package stratum_core --bench pool_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use stratum_core::{BufferPool, LayerSeed, WorldSeed};

fn benchmark_pooled_acquire(c: &mut Criterion) {
    let mut pool: BufferPool<u16> = BufferPool::new();

    let mut group = c.benchmark_group("chunk_buffers");
    group.throughput(Throughput::Elements(18 * 18));

    group.bench_function("pooled_18x18", |b| {
        b.iter(|| {
            let buffer = pool.acquire(black_box(18 * 18));
            pool.release(black_box(buffer));
        });
    });

    group.bench_function("fresh_18x18", |b| {
        b.iter(|| {
            let buffer: Vec<u16> = vec![0; black_box(18 * 18)];
            black_box(buffer);
        });
    });

    group.finish();
}

fn benchmark_cell_seed(c: &mut Criterion) {
    let seed = LayerSeed::new(1000, WorldSeed::new(42));

    c.bench_function("cell_rng_next_int", |b| {
        let mut x = 0i32;
        b.iter(|| {
            x = x.wrapping_add(1);
            let mut rng = seed.cell_rng(black_box(x), black_box(-x));
            black_box(rng.next_int(57))
        });
    });
}

criterion_group!(benches, benchmark_pooled_acquire, benchmark_cell_seed);
criterion_main!(benches);
