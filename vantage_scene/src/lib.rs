// Copyright 2025 the Vantage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vantage Scene: a small Kurbo-native retained scene graph.
//!
//! This is the kind of host container a viewport decorates: ordered child
//! lists, per-node local bounds and transforms, and a visibility flag the
//! renderer honours. It is deliberately plain. There is no spatial index and
//! no batching here; every query walks the graph on demand.
//!
//! - [`Scene`]: owns nodes and child lists.
//! - [`LocalNode`]: per-node bounds, transform and [`NodeFlags`].
//! - [`NodeId`]: generational handle of a node.
//! - [`SceneError`]: failures of structural operations (stale ids, bad indices, cycles).
//!
//! Key operations:
//! - [`Scene::add_child`] / [`Scene::add_child_at`] / [`Scene::remove_child`] /
//!   [`Scene::remove_children`] and the reorder family.
//! - [`Scene::bounds_in`]: a subtree's axis-aligned extent in an ancestor's frame.
//! - [`Scene::to_local`]: point conversion between two nodes' spaces.
//! - [`Scene::draw_list`]: what a renderer would paint, honouring visibility.
//!
//! ## Minimal usage
//!
//! ```
//! use kurbo::{Affine, Rect};
//! use vantage_scene::{LocalNode, Scene};
//!
//! let mut scene = Scene::new();
//! let content = scene.insert(LocalNode::group());
//! let sprite = scene.insert(
//!     LocalNode::with_bounds(Rect::new(0.0, 0.0, 10.0, 10.0))
//!         .transformed(Affine::translate((40.0, 0.0))),
//! );
//! scene.add_child(content, sprite)?;
//!
//! assert_eq!(scene.bounds_in(sprite, content)?, Rect::new(40.0, 0.0, 50.0, 10.0));
//! scene.set_visible(sprite, false);
//! assert!(scene.draw_list(content).is_empty());
//! # Ok::<(), vantage_scene::SceneError>(())
//! ```

#![no_std]

extern crate alloc;
#[cfg(test)]
extern crate std;

mod scene;
mod types;

pub use scene::Scene;
pub use types::{LocalNode, NodeFlags, NodeId, SceneError};
