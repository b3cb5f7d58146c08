// Copyright 2025 the Vantage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![cfg(feature = "compare_rstar")]

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use vantage_index::{Aabb2D, Index};

use rstar::primitives::{GeomWithData, Rectangle};
use rstar::{AABB, RTree};

type Tagged = GeomWithData<Rectangle<[f64; 2]>, u32>;

fn gen_grid_rects(n: usize, cell: f64) -> Vec<Aabb2D<f64>> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            out.push(Aabb2D::<f64>::from_xywh(
                x as f64 * cell,
                y as f64 * cell,
                cell,
                cell,
            ));
        }
    }
    out
}

fn to_rstar(r: Aabb2D<f64>, id: u32) -> Tagged {
    GeomWithData::new(
        Rectangle::from_corners([r.min_x, r.min_y], [r.max_x, r.max_y]),
        id,
    )
}

fn bench_incremental_build_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("rtree_external_incremental");
    for &n in &[64usize, 128] {
        let rects = gen_grid_rects(n, 10.0);
        let query = Aabb2D::<f64>::from_xywh(100.0, 100.0, 400.0, 400.0);
        group.throughput(Throughput::Elements((n * n) as u64));

        group.bench_function(format!("vantage_n{n}"), |b| {
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

        group.bench_function(format!("rstar_n{n}"), |b| {
            b.iter_batched(
                RTree::<Tagged>::new,
                |mut tree| {
                    for (i, r) in rects.iter().copied().enumerate() {
                        tree.insert(to_rstar(r, i as u32));
                    }
                    let envelope = AABB::from_corners(
                        [query.min_x, query.min_y],
                        [query.max_x, query.max_y],
                    );
                    black_box(tree.locate_in_envelope_intersecting(&envelope).count());
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_remove_reinsert(c: &mut Criterion) {
    let mut group = c.benchmark_group("rtree_external_move");
    let rects = gen_grid_rects(64, 10.0);
    group.throughput(Throughput::Elements(256));

    group.bench_function("vantage_update_256", |b| {
        b.iter_batched(
            || {
                let mut idx = Index::<f64, u32>::new();
                let keys: Vec<_> = rects
                    .iter()
                    .copied()
                    .enumerate()
                    .map(|(i, r)| idx.insert(r, i as u32))
                    .collect();
                (idx, keys)
            },
            |(mut idx, keys)| {
                for (i, k) in keys.iter().take(256).enumerate() {
                    let to = Aabb2D::<f64>::from_xywh(700.0 + i as f64, 700.0, 10.0, 10.0);
                    black_box(idx.update(*k, to));
                }
            },
            BatchSize::LargeInput,
        )
    });

    group.bench_function("rstar_remove_insert_256", |b| {
        b.iter_batched(
            || {
                let items: Vec<_> = rects
                    .iter()
                    .copied()
                    .enumerate()
                    .map(|(i, r)| to_rstar(r, i as u32))
                    .collect();
                RTree::bulk_load(items)
            },
            |mut tree| {
                for (i, r) in rects.iter().copied().take(256).enumerate() {
                    let removed = tree.remove(&to_rstar(r, i as u32));
                    black_box(removed.is_some());
                    let to = Aabb2D::<f64>::from_xywh(700.0 + i as f64, 700.0, 10.0, 10.0);
                    tree.insert(to_rstar(to, i as u32));
                }
            },
            BatchSize::LargeInput,
        )
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_incremental_build_query,
    bench_remove_reinsert
);
criterion_main!(benches);
