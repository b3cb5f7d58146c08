// Copyright 2025 the Vantage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`Host`] implementation for Vantage Scene.
//!
//! ## Feature
//!
//! Enable with `scene_adapter` (on by default).
//!
//! ## Notes
//!
//! The viewport's children are the children of one content node. The camera's
//! view transform becomes that node's local transform, the viewport rectangle
//! becomes its local clip, and culling writes the children's
//! [`NodeFlags::VISIBLE`](vantage_scene::NodeFlags::VISIBLE) bit.

use alloc::vec::Vec;
use core::ops::Range;

use kurbo::{Affine, Rect};
use vantage_scene::{LocalNode, NodeId, Scene, SceneError};

use crate::host::Host;

/// A [`Scene`] plus the node whose children the viewport manages.
#[derive(Clone, Debug)]
pub struct SceneHost {
    scene: Scene,
    content: NodeId,
}

impl SceneHost {
    /// Uses an existing node of `scene` as the content.
    pub fn new(scene: Scene, content: NodeId) -> Result<Self, SceneError> {
        if !scene.is_alive(content) {
            return Err(SceneError::StaleNode(content));
        }
        Ok(Self { scene, content })
    }

    /// Creates a detached grouping node in `scene` to act as the content.
    pub fn with_new_content(mut scene: Scene) -> Self {
        let content = scene.insert(LocalNode::group());
        Self { scene, content }
    }

    /// The content node.
    pub fn content(&self) -> NodeId {
        self.content
    }

    /// The scene.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// The scene, for creating nodes and changing their geometry.
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Unwraps the scene.
    pub fn into_scene(self) -> Scene {
        self.scene
    }
}

impl Host for SceneHost {
    type Object = NodeId;
    type Error = SceneError;

    fn add(&mut self, obj: NodeId) -> Result<(), SceneError> {
        self.scene.add_child(self.content, obj)
    }

    fn add_at(&mut self, obj: NodeId, index: usize) -> Result<(), SceneError> {
        self.scene.add_child_at(self.content, obj, index)
    }

    fn remove(&mut self, obj: NodeId) -> Result<(), SceneError> {
        self.scene.remove_child(self.content, obj)
    }

    fn remove_at(&mut self, index: usize) -> Result<NodeId, SceneError> {
        self.scene.remove_child_at(self.content, index)
    }

    fn remove_range(&mut self, range: Range<usize>) -> Result<Vec<NodeId>, SceneError> {
        self.scene.remove_children(self.content, range)
    }

    fn child_at(&self, index: usize) -> Result<NodeId, SceneError> {
        self.scene.child_at(self.content, index)
    }

    fn index_of(&self, obj: NodeId) -> Result<usize, SceneError> {
        self.scene.child_index(self.content, obj)
    }

    fn set_index(&mut self, obj: NodeId, index: usize) -> Result<(), SceneError> {
        self.scene.set_child_index(self.content, obj, index)
    }

    fn swap(&mut self, a: NodeId, b: NodeId) -> Result<(), SceneError> {
        self.scene.swap_children(self.content, a, b)
    }

    fn children(&self) -> &[NodeId] {
        self.scene.children(self.content).unwrap_or(&[])
    }

    fn content_bounds(&self, obj: NodeId) -> Result<Rect, SceneError> {
        let local = self.scene.local(obj).ok_or(SceneError::StaleNode(obj))?;
        let extent = self.scene.bounds_in(obj, obj)?;
        Ok(local.local_transform.transform_rect_bbox(extent))
    }

    fn set_visible(&mut self, obj: NodeId, visible: bool) {
        self.scene.set_visible(obj, visible);
    }

    fn set_content_transform(&mut self, transform: Affine) {
        self.scene.set_local_transform(self.content, transform);
    }

    fn set_clip(&mut self, clip: Rect) {
        self.scene.set_local_clip(self.content, Some(clip));
    }
}
