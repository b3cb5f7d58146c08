// Copyright 2025 the Vantage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The container surface a [`Viewport`](crate::Viewport) decorates.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;
use core::ops::Range;

use kurbo::{Affine, Rect};

/// A host scene-graph container holding the viewport's content.
///
/// The viewport owns one host and routes every child mutation through it,
/// adding the index bookkeeping around each call. The host does the actual
/// structural work and reports failures through its own error type.
///
/// Structural methods follow the usual display-list contract: children are
/// kept in draw order, adding an object that is already a child moves it, and
/// indices are checked.
///
/// Objects destroyed by the host itself keep their index entry until the
/// viewport learns of it: remove them through the viewport first, or call
/// [`Viewport::update_culling_bound`](crate::Viewport::update_culling_bound),
/// which drops the entry once `content_bounds` fails.
pub trait Host {
    /// Handle for a child object. Compared and hashed by identity.
    type Object: Copy + Eq + Hash + Debug;
    /// Failure of a structural operation.
    type Error: core::error::Error + 'static;

    /// Append `obj` to the child list.
    fn add(&mut self, obj: Self::Object) -> Result<(), Self::Error>;

    /// Insert `obj` at `index` in the child list.
    fn add_at(&mut self, obj: Self::Object, index: usize) -> Result<(), Self::Error>;

    /// Remove `obj` from the child list.
    fn remove(&mut self, obj: Self::Object) -> Result<(), Self::Error>;

    /// Remove and return the child at `index`.
    fn remove_at(&mut self, index: usize) -> Result<Self::Object, Self::Error>;

    /// Remove and return the children in `range`, in order.
    fn remove_range(&mut self, range: Range<usize>) -> Result<Vec<Self::Object>, Self::Error>;

    /// The child at `index`.
    fn child_at(&self, index: usize) -> Result<Self::Object, Self::Error>;

    /// Position of `obj` in the child list.
    fn index_of(&self, obj: Self::Object) -> Result<usize, Self::Error>;

    /// Move `obj` to `index` among its siblings.
    fn set_index(&mut self, obj: Self::Object, index: usize) -> Result<(), Self::Error>;

    /// Swap the positions of two children.
    fn swap(&mut self, a: Self::Object, b: Self::Object) -> Result<(), Self::Error>;

    /// The children in draw order.
    fn children(&self) -> &[Self::Object];

    /// Number of children.
    fn len(&self) -> usize {
        self.children().len()
    }

    /// True if there are no children.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Full axis-aligned extent of `obj` in the content frame.
    ///
    /// This is the object's own content plus its descendants, transformed by
    /// the object's transform as a direct child of the content. It must not
    /// depend on whether `obj` is currently attached, so that it can be
    /// computed before the object is added.
    fn content_bounds(&self, obj: Self::Object) -> Result<Rect, Self::Error>;

    /// Show or hide `obj`.
    fn set_visible(&mut self, obj: Self::Object, visible: bool);

    /// Transform of the content relative to the screen.
    fn set_content_transform(&mut self, transform: Affine);

    /// Screen-space rectangle the content is clipped to.
    ///
    /// Set to the viewport rectangle on construction and on every resize. It
    /// does not move with the content transform.
    fn set_clip(&mut self, clip: Rect);
}
