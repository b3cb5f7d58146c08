// Copyright 2025 the Vantage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the scene: node identifiers, flags, local geometry and errors.

use kurbo::{Affine, Rect};

/// Identifier for a node in a [`Scene`](crate::Scene).
///
/// A small, copyable handle made of a slot index and a generation counter.
///
/// - On insert, a fresh slot is allocated with generation `1`.
/// - On destroy, the slot is freed; every `NodeId` pointing at it turns stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `NodeId`.
///
/// Stale ids never alias a different live node because the generation must match.
/// Use [`Scene::is_alive`](crate::Scene::is_alive) to check liveness.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Node flags controlling visibility and content.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// Node and its subtree are drawn.
        const VISIBLE    = 0b0000_0001;
        /// The node's own local bounds hold drawable content.
        ///
        /// Pure grouping nodes clear this so their (usually empty) local
        /// bounds do not inflate subtree extents.
        const RENDERABLE = 0b0000_0010;
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::RENDERABLE
    }
}

/// Local geometry for a node.
#[derive(Clone, Debug, PartialEq)]
pub struct LocalNode {
    /// Local (untransformed) bounds of the node's own content.
    pub local_bounds: Rect,
    /// Local transform relative to the parent's space.
    pub local_transform: Affine,
    /// Optional clip for the node and its subtree, in the parent's space.
    ///
    /// Expressed before `local_transform` applies, so it stays put while the
    /// node's own transform moves its content underneath it.
    pub local_clip: Option<Rect>,
    /// Visibility and content flags.
    pub flags: NodeFlags,
}

impl Default for LocalNode {
    fn default() -> Self {
        Self {
            local_bounds: Rect::ZERO,
            local_transform: Affine::IDENTITY,
            local_clip: None,
            flags: NodeFlags::default(),
        }
    }
}

impl LocalNode {
    /// A visible, renderable node with the given bounds and no transform.
    pub fn with_bounds(local_bounds: Rect) -> Self {
        Self {
            local_bounds,
            ..Self::default()
        }
    }

    /// A visible grouping node with no content of its own.
    pub fn group() -> Self {
        Self {
            flags: NodeFlags::VISIBLE,
            ..Self::default()
        }
    }

    /// Builder-style transform setter.
    #[must_use]
    pub fn transformed(mut self, local_transform: Affine) -> Self {
        self.local_transform = local_transform;
        self
    }

    /// Builder-style clip setter.
    #[must_use]
    pub fn clipped(mut self, local_clip: Rect) -> Self {
        self.local_clip = Some(local_clip);
        self
    }
}

/// Errors returned by structural scene operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SceneError {
    /// The node id refers to a destroyed node.
    #[error("node {0:?} is not alive")]
    StaleNode(NodeId),
    /// A child index was past the end of the child list.
    #[error("child index {index} out of bounds for {len} children")]
    IndexOutOfBounds {
        /// Requested index.
        index: usize,
        /// Number of children.
        len: usize,
    },
    /// A child range was invalid for the child list.
    #[error("child range {start}..{end} out of bounds for {len} children")]
    RangeOutOfBounds {
        /// Range start.
        start: usize,
        /// Range end (exclusive).
        end: usize,
        /// Number of children.
        len: usize,
    },
    /// The node is not a direct child of the given parent.
    #[error("node {child:?} is not a child of {parent:?}")]
    NotAChild {
        /// The parent that was searched.
        parent: NodeId,
        /// The node that was not found.
        child: NodeId,
    },
    /// The node is not in the subtree of the given ancestor.
    #[error("node {node:?} is not a descendant of {ancestor:?}")]
    NotADescendant {
        /// The expected ancestor.
        ancestor: NodeId,
        /// The node whose ancestry was walked.
        node: NodeId,
    },
    /// Attaching would make a node its own ancestor.
    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    WouldCycle {
        /// The prospective parent.
        parent: NodeId,
        /// The prospective child.
        child: NodeId,
    },
}
