// Copyright 2025 the Vantage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Affine, Rect};
use vantage_scene::{LocalNode, Scene};
use vantage_viewport::adapters::scene::SceneHost;
use vantage_viewport::{RefreshStrategy, Viewport, ViewportConfig};

fn build_viewport(n: usize, cell: f64, strategy: RefreshStrategy) -> Viewport<SceneHost> {
    let mut host = SceneHost::with_new_content(Scene::new());
    let mut nodes = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            let at = (x as f64 * cell, y as f64 * cell);
            nodes.push(host.scene_mut().insert(
                LocalNode::with_bounds(Rect::new(0.0, 0.0, cell * 0.8, cell * 0.8))
                    .transformed(Affine::translate(at)),
            ));
        }
    }
    let config = ViewportConfig::new(800.0, 600.0).with_strategy(strategy);
    let Ok(mut vp) = Viewport::new(host, config) else {
        panic!("empty content cannot fail");
    };
    for node in nodes {
        if vp.add_child(node).is_err() {
            panic!("fresh node rejected");
        }
    }
    vp.refresh();
    vp
}

/// Small per-frame steps along a diagonal, like a drag.
fn pan_path(frames: usize, step: f64) -> Vec<(f64, f64)> {
    (0..frames)
        .map(|i| (i as f64 * step, i as f64 * step * 0.6))
        .collect()
}

fn bench_pan(c: &mut Criterion) {
    let mut group = c.benchmark_group("viewport_pan");
    let path = pan_path(120, 8.0);
    group.throughput(Throughput::Elements(path.len() as u64));
    for &n in &[64usize, 128] {
        for (name, strategy) in [
            ("reset", RefreshStrategy::Reset),
            ("diff", RefreshStrategy::Diff),
        ] {
            group.bench_function(format!("{name}_n{n}"), |b| {
                b.iter_batched(
                    || build_viewport(n, 20.0, strategy),
                    |mut vp| {
                        for &p in &path {
                            vp.camera_mut().set_position(p);
                            black_box(vp.refresh());
                        }
                    },
                    BatchSize::LargeInput,
                )
            });
        }
    }
    group.finish();
}

fn bench_idle_frames(c: &mut Criterion) {
    let mut group = c.benchmark_group("viewport_idle");
    let mut vp = build_viewport(128, 20.0, RefreshStrategy::Reset);
    group.bench_function("refresh_clean", |b| b.iter(|| black_box(vp.refresh())));
    group.finish();
}

fn bench_rebound(c: &mut Criterion) {
    let mut group = c.benchmark_group("viewport_rebound");
    group.bench_function("move_256_children", |b| {
        b.iter_batched(
            || build_viewport(64, 20.0, RefreshStrategy::Diff),
            |mut vp| {
                let moved: Vec<_> = vp.children().iter().copied().take(256).collect();
                for (i, node) in moved.into_iter().enumerate() {
                    let to = Affine::translate((i as f64 * 3.0, 700.0));
                    vp.host_mut().scene_mut().set_local_transform(node, to);
                    black_box(vp.update_culling_bound(node).is_ok());
                }
            },
            BatchSize::LargeInput,
        )
    });
    group.finish();
}

criterion_group!(benches, bench_pan, bench_idle_frames, bench_rebound);
criterion_main!(benches);
