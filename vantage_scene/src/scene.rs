// Copyright 2025 the Vantage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core scene implementation: node storage, child lists, geometry queries.

use alloc::vec::Vec;
use core::ops::Range;

use kurbo::{Affine, Point, Rect};

use crate::types::{LocalNode, NodeFlags, NodeId, SceneError};

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    local: LocalNode,
}

/// Retained scene graph with ordered children.
#[derive(Clone, Default)]
pub struct Scene {
    nodes: Vec<Option<Node>>,
    generations: Vec<u32>,
    free_list: Vec<usize>,
}

impl core::fmt::Debug for Scene {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Scene")
            .field("nodes_total", &self.nodes.len())
            .field("nodes_alive", &self.len())
            .field("free_list", &self.free_list.len())
            .finish_non_exhaustive()
    }
}

type Result<T> = core::result::Result<T, SceneError>;

impl Scene {
    /// Create a new empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.len() - self.free_list.len()
    }

    /// True if the scene holds no live nodes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Create a detached node.
    pub fn insert(&mut self, local: LocalNode) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            (idx, generation)
        } else {
            self.generations.push(1);
            self.nodes.push(None);
            (self.nodes.len() - 1, 1)
        };
        self.nodes[idx] = Some(Node {
            generation,
            parent: None,
            children: Vec::new(),
            local,
        });
        #[allow(
            clippy::cast_possible_truncation,
            reason = "NodeId uses 32-bit indices."
        )]
        NodeId::new(idx as u32, generation)
    }

    /// Detach `id` from its parent and destroy it with its whole subtree.
    ///
    /// Destroying a stale id is a no-op.
    pub fn destroy(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        self.detach(id);
        let mut stack = alloc::vec![id];
        while let Some(n) = stack.pop() {
            if let Some(node) = self.nodes[n.idx()].take() {
                stack.extend(node.children);
                self.free_list.push(n.idx());
            }
        }
    }

    /// Returns true if `id` refers to a live node.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.node(id).is_ok()
    }

    /// The parent of `id`, if it is attached.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).ok()?.parent
    }

    /// Local data of a live node.
    pub fn local(&self, id: NodeId) -> Option<&LocalNode> {
        self.node(id).ok().map(|n| &n.local)
    }

    // --- child list ---

    /// Append `child` to the end of `parent`'s children.
    ///
    /// A child that already has a parent is detached from it first.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        let len = self.attach_len(parent, child)?;
        self.add_child_at(parent, child, len)
    }

    /// Insert `child` at `index` in `parent`'s children.
    ///
    /// `index` may equal the child count. It is checked against the child list
    /// as it will be once `child` is detached from wherever it was.
    pub fn add_child_at(&mut self, parent: NodeId, child: NodeId, index: usize) -> Result<()> {
        let len = self.attach_len(parent, child)?;
        if index > len {
            return Err(SceneError::IndexOutOfBounds { index, len });
        }
        self.detach(child);
        self.node_mut(parent)?.children.insert(index, child);
        self.node_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Detach `child` from `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        let index = self.child_index(parent, child)?;
        self.remove_child_at(parent, index).map(|_| ())
    }

    /// Detach and return the child at `index`.
    pub fn remove_child_at(&mut self, parent: NodeId, index: usize) -> Result<NodeId> {
        let child = self.child_at(parent, index)?;
        self.node_mut(parent)?.children.remove(index);
        self.node_mut(child)?.parent = None;
        Ok(child)
    }

    /// Detach and return the children in `range`, in order.
    pub fn remove_children(&mut self, parent: NodeId, range: Range<usize>) -> Result<Vec<NodeId>> {
        let len = self.node(parent)?.children.len();
        if range.start > range.end || range.end > len {
            return Err(SceneError::RangeOutOfBounds {
                start: range.start,
                end: range.end,
                len,
            });
        }
        let removed: Vec<NodeId> = self.node_mut(parent)?.children.drain(range).collect();
        for &c in &removed {
            self.node_mut(c)?.parent = None;
        }
        Ok(removed)
    }

    /// The children of `parent`, in draw order.
    pub fn children(&self, parent: NodeId) -> Result<&[NodeId]> {
        Ok(&self.node(parent)?.children)
    }

    /// The child at `index`.
    pub fn child_at(&self, parent: NodeId, index: usize) -> Result<NodeId> {
        let children = self.children(parent)?;
        children
            .get(index)
            .copied()
            .ok_or(SceneError::IndexOutOfBounds {
                index,
                len: children.len(),
            })
    }

    /// Position of `child` within `parent`'s children.
    pub fn child_index(&self, parent: NodeId, child: NodeId) -> Result<usize> {
        self.children(parent)?
            .iter()
            .position(|&c| c == child)
            .ok_or(SceneError::NotAChild { parent, child })
    }

    /// Move `child` to `index` among its siblings.
    pub fn set_child_index(&mut self, parent: NodeId, child: NodeId, index: usize) -> Result<()> {
        let current = self.child_index(parent, child)?;
        let children = &mut self.node_mut(parent)?.children;
        if index >= children.len() {
            return Err(SceneError::IndexOutOfBounds {
                index,
                len: children.len(),
            });
        }
        let c = children.remove(current);
        children.insert(index, c);
        Ok(())
    }

    /// Swap the positions of two children of `parent`.
    pub fn swap_children(&mut self, parent: NodeId, a: NodeId, b: NodeId) -> Result<()> {
        let ia = self.child_index(parent, a)?;
        let ib = self.child_index(parent, b)?;
        self.node_mut(parent)?.children.swap(ia, ib);
        Ok(())
    }

    // --- local data ---

    /// Update local transform. Stale ids are ignored.
    pub fn set_local_transform(&mut self, id: NodeId, tf: Affine) {
        if let Ok(n) = self.node_mut(id) {
            n.local.local_transform = tf;
        }
    }

    /// Update local bounds. Stale ids are ignored.
    pub fn set_local_bounds(&mut self, id: NodeId, bounds: Rect) {
        if let Ok(n) = self.node_mut(id) {
            n.local.local_bounds = bounds;
        }
    }

    /// Update clip. Stale ids are ignored.
    pub fn set_local_clip(&mut self, id: NodeId, clip: Option<Rect>) {
        if let Ok(n) = self.node_mut(id) {
            n.local.local_clip = clip;
        }
    }

    /// Update node flags. Stale ids are ignored.
    pub fn set_flags(&mut self, id: NodeId, flags: NodeFlags) {
        if let Ok(n) = self.node_mut(id) {
            n.local.flags = flags;
        }
    }

    /// Show or hide a node. Stale ids are ignored.
    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        if let Ok(n) = self.node_mut(id) {
            n.local.flags.set(NodeFlags::VISIBLE, visible);
        }
    }

    /// Whether the node's own visible flag is set. False for stale ids.
    pub fn is_visible(&self, id: NodeId) -> bool {
        self.local(id)
            .is_some_and(|l| l.flags.contains(NodeFlags::VISIBLE))
    }

    // --- geometry ---

    /// Transform from `node`'s local space into `ancestor`'s local space.
    ///
    /// `ancestor == node` yields the identity.
    pub fn transform_to(&self, node: NodeId, ancestor: NodeId) -> Result<Affine> {
        let mut tf = Affine::IDENTITY;
        let mut cur = node;
        while cur != ancestor {
            let n = self.node(cur)?;
            tf = n.local.local_transform * tf;
            cur = n.parent.ok_or(SceneError::NotADescendant { ancestor, node })?;
        }
        Ok(tf)
    }

    /// Transform from `node`'s local space into the space of its root.
    pub fn world_transform(&self, node: NodeId) -> Result<Affine> {
        let mut tf = Affine::IDENTITY;
        let mut cur = Some(node);
        while let Some(id) = cur {
            let n = self.node(id)?;
            tf = n.local.local_transform * tf;
            cur = n.parent;
        }
        Ok(tf)
    }

    /// Convert a point in `from`'s local space into `to`'s local space.
    ///
    /// Goes through world space, so the nodes need not be related. Returns
    /// `None` when `to` has a non-invertible world transform.
    pub fn to_local(&self, point: Point, from: NodeId, to: NodeId) -> Result<Option<Point>> {
        let world = self.world_transform(from)? * point;
        let to_world = self.world_transform(to)?;
        if to_world.determinant() == 0.0 {
            return Ok(None);
        }
        Ok(Some(to_world.inverse() * world))
    }

    /// Axis-aligned extent of `node`'s subtree, expressed in `ancestor`'s space.
    ///
    /// Unions the transformed bounds of every renderable node in the subtree.
    /// A subtree with no renderable content yields a zero-area rect at the
    /// node's transformed origin.
    pub fn bounds_in(&self, node: NodeId, ancestor: NodeId) -> Result<Rect> {
        let base = self.transform_to(node, ancestor)?;
        let mut acc: Option<Rect> = None;
        let mut stack = alloc::vec![(node, base)];
        while let Some((id, tf)) = stack.pop() {
            let n = self.node(id)?;
            if n.local.flags.contains(NodeFlags::RENDERABLE) {
                let r = tf.transform_rect_bbox(n.local.local_bounds);
                acc = Some(acc.map_or(r, |a| a.union(r)));
            }
            for &c in &n.children {
                let child_tf = tf * self.node(c)?.local.local_transform;
                stack.push((c, child_tf));
            }
        }
        Ok(acc.unwrap_or_else(|| {
            let o = base * Point::ORIGIN;
            Rect::from_points(o, o)
        }))
    }

    /// Nodes that would be drawn under `root`, in paint order.
    ///
    /// Invisible nodes prune their whole subtree; only renderable nodes are listed.
    /// A renderable node whose transformed bounds fall entirely outside an
    /// enclosing clip is left out; its descendants are still tested on their own.
    pub fn draw_list(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        // (node, parent space to root's parent space, accumulated clip there)
        let mut stack: Vec<(NodeId, Affine, Option<Rect>)> =
            alloc::vec![(root, Affine::IDENTITY, None)];
        while let Some((id, parent_tf, clip)) = stack.pop() {
            let Ok(n) = self.node(id) else {
                continue;
            };
            if !n.local.flags.contains(NodeFlags::VISIBLE) {
                continue;
            }
            let clip = match n.local.local_clip {
                Some(own) => {
                    let own = parent_tf.transform_rect_bbox(own);
                    Some(clip.map_or(own, |c| c.intersect(own)))
                }
                None => clip,
            };
            let tf = parent_tf * n.local.local_transform;
            if n.local.flags.contains(NodeFlags::RENDERABLE) {
                let bounds = tf.transform_rect_bbox(n.local.local_bounds);
                if clip.is_none_or(|c| overlaps(bounds, c)) {
                    out.push(id);
                }
            }
            stack.extend(n.children.iter().rev().map(|&c| (c, tf, clip)));
        }
        out
    }

    // --- internals ---

    fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes
            .get(id.idx())
            .and_then(Option::as_ref)
            .filter(|n| n.generation == id.1)
            .ok_or(SceneError::StaleNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes
            .get_mut(id.idx())
            .and_then(Option::as_mut)
            .filter(|n| n.generation == id.1)
            .ok_or(SceneError::StaleNode(id))
    }

    /// Validates an attach and returns `parent`'s child count once `child` is detached.
    fn attach_len(&self, parent: NodeId, child: NodeId) -> Result<usize> {
        let p = self.node(parent)?;
        let c = self.node(child)?;
        let mut cur = Some(parent);
        while let Some(id) = cur {
            if id == child {
                return Err(SceneError::WouldCycle { parent, child });
            }
            cur = self.node(id)?.parent;
        }
        let own = usize::from(c.parent == Some(parent));
        Ok(p.children.len() - own)
    }

    fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        if let Ok(p) = self.node_mut(parent) {
            p.children.retain(|c| *c != id);
        }
        if let Ok(n) = self.node_mut(id) {
            n.parent = None;
        }
    }
}

/// Inclusive overlap; touching edges count.
fn overlaps(a: Rect, b: Rect) -> bool {
    a.x0 <= b.x1 && a.x1 >= b.x0 && a.y0 <= b.y1 && a.y1 >= b.y0
}
