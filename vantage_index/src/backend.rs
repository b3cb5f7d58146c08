// Copyright 2025 the Vantage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend trait for spatial indexing implementations.

use alloc::vec::Vec;
use core::fmt::Debug;

use crate::types::Aabb2D;

/// Spatial backend abstraction used by [`IndexGeneric`](crate::IndexGeneric).
///
/// Backends only see dense slot numbers and boxes; keys, generations and
/// payloads live in the index. Every mutation is applied immediately, so a
/// query issued right after an insert observes it.
pub trait Backend<T: Copy + PartialOrd + Debug> {
    /// Insert a slot that is not currently present.
    fn insert(&mut self, slot: usize, aabb: Aabb2D<T>);

    /// Replace the AABB of a slot that is present.
    fn update(&mut self, slot: usize, aabb: Aabb2D<T>);

    /// Remove a slot. Removing an absent slot is a no-op.
    fn remove(&mut self, slot: usize);

    /// Clear all spatial structures.
    fn clear(&mut self);

    /// Append slots whose AABB contains the point to `out`.
    fn query_point(&self, x: T, y: T, out: &mut Vec<usize>);

    /// Append slots whose AABB intersects the rectangle to `out`.
    fn query_rect(&self, rect: Aabb2D<T>, out: &mut Vec<usize>);
}
