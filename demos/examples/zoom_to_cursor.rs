// Copyright 2025 the Vantage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Zoom about a cursor position using `set_origin` followed by scale changes.
//!
//! The point under the cursor keeps its screen position through the whole
//! zoom, while the frustum shrinks around it.
//!
//! Run:
//! - `cargo run -p vantage_demos --example zoom_to_cursor`

use kurbo::{Point, Rect};
use vantage_scene::{LocalNode, Scene, SceneError};
use vantage_viewport::adapters::scene::SceneHost;
use vantage_viewport::{Viewport, ViewportConfig, ViewportError};

fn main() -> Result<(), ViewportError<SceneError>> {
    tracing_subscriber::fmt::init();

    let mut host = SceneHost::with_new_content(Scene::new());
    let marker = host
        .scene_mut()
        .insert(LocalNode::with_bounds(Rect::new(240.0, 90.0, 250.0, 100.0)));
    let mut viewport = Viewport::new(host, ViewportConfig::new(400.0, 300.0))?;
    viewport.add_child(marker)?;
    viewport.refresh();

    let cursor = Point::new(245.0, 95.0);
    viewport.set_origin(Some(cursor))?;
    println!(
        "anchored at {cursor:?}: pivot {:?} position {:?}",
        viewport.camera().pivot(),
        viewport.camera().position()
    );

    for step in 0..6 {
        let zoom = 1.0 - 0.15 * f64::from(step);
        viewport.camera_mut().set_scale((zoom, zoom));
        viewport.refresh();

        let view = viewport
            .camera()
            .world_to_view()
            .map_err(ViewportError::Camera)?;
        let on_screen = view * cursor;
        println!(
            "scale {zoom:.2}: frustum {:?} cursor on screen at ({:.1}, {:.1}) visible={}",
            viewport.camera().frustum().rect(),
            on_screen.x,
            on_screen.y,
            viewport.host().scene().is_visible(marker),
        );
    }

    // A zero scale has no inverse, so re-anchoring is refused.
    viewport.camera_mut().set_scale((0.0, 1.0));
    match viewport.set_origin(None) {
        Ok(()) => println!("re-anchored"),
        Err(err) => println!("set_origin refused: {err}"),
    }
    Ok(())
}
