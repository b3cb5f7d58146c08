// Copyright 2025 the Vantage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vantage Viewport: camera-driven culling for 2D scene graphs.
//!
//! A [`Viewport`] decorates a host container (anything implementing [`Host`])
//! by composition:
//!
//! - Child mutations (`add_child`, `add_child_at`, `remove_child`,
//!   `remove_child_at`, `remove_children`) are performed on the host and
//!   mirrored into an R-tree of content-space bounds in the same call.
//! - [`Viewport::refresh`] is the per-frame hook. When the [`Camera`] moved
//!   since the last pass it queries the tree with the frustum and toggles
//!   visibility so that exactly the intersecting children are shown.
//! - [`Viewport::set_origin`] re-anchors the camera pivot without moving
//!   what is on screen, for zooming about a point.
//!
//! Culling can be switched off in [`ViewportConfig`]; the viewport then only
//! delegates to the host and keeps the content transform in sync with the
//! camera.
//!
//! ## Features
//!
//! - `scene_adapter` (default): [`adapters::scene::SceneHost`] implements
//!   [`Host`] over a `vantage_scene::Scene`.
//! - `std` (default) / `libm`: floating-point support for Kurbo.
//!
//! ## Example
//!
//! ```
//! # #[cfg(feature = "scene_adapter")]
//! # {
//! use kurbo::{Affine, Rect};
//! use vantage_scene::{LocalNode, Scene};
//! use vantage_viewport::adapters::scene::SceneHost;
//! use vantage_viewport::{Viewport, ViewportConfig};
//!
//! let mut host = SceneHost::with_new_content(Scene::new());
//! let sprite = host.scene_mut().insert(
//!     LocalNode::with_bounds(Rect::new(0.0, 0.0, 30.0, 30.0))
//!         .transformed(Affine::translate((310.0, 310.0))),
//! );
//!
//! let mut viewport = Viewport::new(host, ViewportConfig::new(300.0, 300.0))?;
//! viewport.add_child(sprite)?;
//! viewport.refresh();
//! assert!(!viewport.host().scene().is_visible(sprite));
//!
//! viewport.camera_mut().set_position((20.0, 20.0));
//! viewport.refresh();
//! assert!(viewport.host().scene().is_visible(sprite));
//! # }
//! # Ok::<(), vantage_viewport::ViewportError<vantage_scene::SceneError>>(())
//! ```
//!
//! ## Threading
//!
//! A viewport is meant to be driven from the render loop's thread. Camera
//! listeners are plain boxed closures, so the type is neither `Send` nor
//! `Sync`.

#![no_std]

extern crate alloc;

pub mod adapters;
mod config;
mod host;
mod viewport;

pub use config::{RefreshStrategy, ViewportConfig};
pub use host::Host;
pub use viewport::Viewport;

pub use vantage_camera::{Camera, CameraError, CameraState, CameraTransform, Frustum, ListenerId};

/// Errors from viewport operations.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ViewportError<E> {
    /// The camera refused the operation (for example a zero scale in `set_origin`).
    #[error(transparent)]
    Camera(CameraError),
    /// The host container failed.
    #[error(transparent)]
    Host(#[from] E),
}
