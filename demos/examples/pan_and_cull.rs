// Copyright 2025 the Vantage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pan a 300×300 camera across a grid of sprites and watch culling work.
//!
//! Run:
//! - `cargo run -p vantage_demos --example pan_and_cull`
//! - `RUST_LOG=vantage_viewport=trace cargo run -p vantage_demos --example pan_and_cull`

use kurbo::{Affine, Rect};
use vantage_scene::{LocalNode, Scene};
use vantage_viewport::adapters::scene::SceneHost;
use vantage_viewport::{Viewport, ViewportConfig, ViewportError};

const CELL: f64 = 50.0;
const SPRITE: f64 = 30.0;
const COLS: usize = 40;
const ROWS: usize = 40;

fn main() -> Result<(), ViewportError<vantage_scene::SceneError>> {
    tracing_subscriber::fmt::init();

    let mut host = SceneHost::with_new_content(Scene::new());
    let mut sprites = Vec::with_capacity(COLS * ROWS);
    for row in 0..ROWS {
        for col in 0..COLS {
            let origin = (col as f64 * CELL, row as f64 * CELL);
            let node = host.scene_mut().insert(
                LocalNode::with_bounds(Rect::new(0.0, 0.0, SPRITE, SPRITE))
                    .transformed(Affine::translate(origin)),
            );
            sprites.push(node);
        }
    }

    let mut viewport = Viewport::new(host, ViewportConfig::new(300.0, 300.0))?;
    for &s in &sprites {
        viewport.add_child(s)?;
    }

    // One "frame" per camera position. Frames with a still camera skip culling.
    let path = [(0.0, 0.0), (0.0, 0.0), (120.0, 0.0), (120.0, 480.0), (1700.0, 1700.0)];
    for (frame, &(x, y)) in path.iter().enumerate() {
        viewport.camera_mut().set_position((x, y));
        if frame == 1 {
            // Same position again still counts as a camera write.
            viewport.refresh();
        }
        let culled = viewport.refresh();
        let content = viewport.host().content();
        let drawn = viewport.host().scene().draw_list(content).len();
        tracing::info!(frame, culled, drawn, "frame done");
        println!(
            "frame {frame}: camera at ({x:>6.1}, {y:>6.1}) frustum {:?} culled={culled} drawn {drawn}/{}",
            viewport.camera().frustum().rect(),
            sprites.len(),
        );
    }
    Ok(())
}
