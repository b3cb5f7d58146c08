// Copyright 2025 the Vantage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vantage Index: a generic 2D AABB index for viewport culling.
//!
//! - Insert, update, and remove axis-aligned bounding boxes (AABBs) with user payloads.
//! - Query by point or intersecting rectangle. Touching edges intersect.
//! - Changes are visible to the very next query; there is no commit step.
//!
//! It is generic over the scalar type `T` and does not depend on any geometry crate.
//! A viewport computes content-space bounds and feeds them here.
//!
//! Entries are addressed by a generational [`Key`]. Removing an entry frees
//! its slot for reuse; the old key turns stale and every operation on it is a
//! no-op.
//!
//! # Example
//!
//! ```rust
//! use vantage_index::{Aabb2D, Index};
//!
//! let mut idx: Index<f64, u32> = Index::new();
//! let k1 = idx.insert(Aabb2D::new(0.0, 0.0, 10.0, 10.0), 1);
//! let _k2 = idx.insert(Aabb2D::new(50.0, 50.0, 60.0, 60.0), 2);
//!
//! // A query rectangle that just touches the first box still finds it.
//! let hits: Vec<_> = idx.query_rect(Aabb2D::new(10.0, 10.0, 20.0, 20.0)).collect();
//! assert_eq!(hits, vec![(k1, 1)]);
//!
//! // Move it away; the same query now misses.
//! idx.update(k1, Aabb2D::new(100.0, 0.0, 110.0, 10.0));
//! assert_eq!(idx.query_rect(Aabb2D::new(10.0, 10.0, 20.0, 20.0)).count(), 0);
//! ```
//!
//! ## Choosing a backend
//!
//! - `RTreeF32`/`RTreeF64`/`RTreeI64` (default, via [`Index`]): dynamic R-tree with
//!   cost-based splits. See the [`backends`] docs for the split metric.
//! - [`FlatVec`] (via [`FlatIndex`]): linear scans. Fine for a few dozen boxes and
//!   useful as a reference when testing.
//!
//! ### Float semantics
//!
//! This crate assumes no NaNs for floating-point coordinates.

#![no_std]

extern crate alloc;

pub mod backend;
pub mod backends;
pub mod index;
pub mod types;

pub use backend::Backend;
pub use backends::flatvec::FlatVec;
pub use backends::rtree::{RTree, RTreeF32, RTreeF64, RTreeI64};
pub use index::{FlatIndex, Index, IndexGeneric, Key};
pub use types::{Aabb2D, Scalar};
