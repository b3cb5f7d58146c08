// Copyright 2025 the Vantage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use vantage_index::{Aabb2D, FlatIndex, Index, Key};

fn gen_grid_rects(n: usize, cell: f64) -> Vec<Aabb2D<f64>> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            let x0 = x as f64 * cell;
            let y0 = y as f64 * cell;
            out.push(Aabb2D::<f64>::from_xywh(x0, y0, cell, cell));
        }
    }
    out
}

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

fn gen_random_rects(count: usize, extent: f64, size: f64, seed: u64) -> Vec<Aabb2D<f64>> {
    let mut rng = Rng::new(seed);
    (0..count)
        .map(|_| {
            let x0 = rng.next_f64() * (extent - size);
            let y0 = rng.next_f64() * (extent - size);
            Aabb2D::<f64>::from_xywh(x0, y0, size, size)
        })
        .collect()
}

/// Viewport-sized query windows sliding across the content.
fn gen_pan_windows(steps: usize, extent: f64, window: f64) -> Vec<Aabb2D<f64>> {
    let stride = (extent - window) / steps as f64;
    (0..steps)
        .map(|i| {
            let p = i as f64 * stride;
            Aabb2D::<f64>::from_xywh(p, p * 0.5, window, window)
        })
        .collect()
}

fn insert_all(rects: &[Aabb2D<f64>], mut insert: impl FnMut(Aabb2D<f64>, u32) -> Key) -> Vec<Key> {
    rects
        .iter()
        .copied()
        .enumerate()
        .map(|(i, r)| insert(r, i as u32))
        .collect()
}

fn bench_build_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_query");
    for &n in &[32usize, 64, 128] {
        let rects = gen_grid_rects(n, 10.0);
        let query = Aabb2D::<f64>::from_xywh(100.0, 100.0, 400.0, 400.0);
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_function(format!("rtree_n{n}"), |b| {
            b.iter_batched(
                Index::<f64, u32>::new,
                |mut idx| {
                    for (i, r) in rects.iter().copied().enumerate() {
                        let _ = idx.insert(r, i as u32);
                    }
                    black_box(idx.query_rect(query).count());
                },
                BatchSize::SmallInput,
            )
        });
        group.bench_function(format!("flat_n{n}"), |b| {
            b.iter_batched(
                FlatIndex::<f64, u32>::new,
                |mut idx| {
                    for (i, r) in rects.iter().copied().enumerate() {
                        let _ = idx.insert(r, i as u32);
                    }
                    black_box(idx.query_rect(query).count());
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_update_heavy(c: &mut Criterion) {
    let mut group = c.benchmark_group("update_heavy");
    let rects = gen_random_rects(4096, 4000.0, 20.0, 0xCAFE_F00D_DEAD_BEEF);
    let moved = gen_random_rects(512, 4000.0, 20.0, 0x5EED_0F_F00D);
    group.throughput(Throughput::Elements(moved.len() as u64));

    group.bench_function("rtree_move_512", |b| {
        b.iter_batched(
            || {
                let mut idx = Index::<f64, u32>::new();
                let keys = insert_all(&rects, |r, i| idx.insert(r, i));
                (idx, keys)
            },
            |(mut idx, keys)| {
                for (k, r) in keys.iter().zip(&moved) {
                    black_box(idx.update(*k, *r));
                }
            },
            BatchSize::LargeInput,
        )
    });
    group.bench_function("flat_move_512", |b| {
        b.iter_batched(
            || {
                let mut idx = FlatIndex::<f64, u32>::new();
                let keys = insert_all(&rects, |r, i| idx.insert(r, i));
                (idx, keys)
            },
            |(mut idx, keys)| {
                for (k, r) in keys.iter().zip(&moved) {
                    black_box(idx.update(*k, *r));
                }
            },
            BatchSize::LargeInput,
        )
    });
    group.finish();
}

fn bench_query_heavy(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_heavy");
    for &count in &[1_000usize, 10_000, 50_000] {
        let rects = gen_random_rects(count, 10_000.0, 16.0, 0xC1A5_7E55_9999_ABCD);
        let windows = gen_pan_windows(64, 10_000.0, 800.0);
        let mut rtree = Index::<f64, u32>::new();
        let mut flat = FlatIndex::<f64, u32>::new();
        for (i, r) in rects.iter().copied().enumerate() {
            let _ = rtree.insert(r, i as u32);
            let _ = flat.insert(r, i as u32);
        }
        group.throughput(Throughput::Elements(windows.len() as u64));
        group.bench_function(format!("rtree_pan_{count}"), |b| {
            b.iter(|| {
                let hits: usize = windows.iter().map(|w| rtree.query_rect(*w).count()).sum();
                black_box(hits)
            })
        });
        group.bench_function(format!("flat_pan_{count}"), |b| {
            b.iter(|| {
                let hits: usize = windows.iter().map(|w| flat.query_rect(*w).count()).sum();
                black_box(hits)
            })
        });
    }
    group.finish();
}

fn bench_fanout(c: &mut Criterion) {
    let mut group = c.benchmark_group("rtree_fanout");
    let rects = gen_random_rects(10_000, 10_000.0, 16.0, 0xFACE_FEED_CAFE_BABE);
    let query = Aabb2D::<f64>::from_xywh(4000.0, 4000.0, 800.0, 800.0);
    for &m in &[4usize, 9, 16, 32] {
        let mut idx = Index::<f64, u32>::with_max_children(m);
        for (i, r) in rects.iter().copied().enumerate() {
            let _ = idx.insert(r, i as u32);
        }
        group.bench_function(format!("query_m{m}"), |b| {
            b.iter(|| black_box(idx.query_rect(query).count()))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_build_query,
    bench_update_heavy,
    bench_query_heavy,
    bench_fanout
);
criterion_main!(benches);
