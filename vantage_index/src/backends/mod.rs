// Copyright 2025 the Vantage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend implementations for different spatial strategies.
//!
//! - `flatvec`: flat vector with linear scans. The brute-force reference.
//! - `rtree`: dynamic R-tree (`T: Scalar`) with least-enlargement descent,
//!   cost-based node splits and condense-on-remove.
//!
//! Split cost
//! ----------
//! When a node overflows its children are sorted by centroid along each axis
//! and every split point `k` is scored with
//!
//! `cost(k) = area(L_k) * k + area(R_k) * (n - k)`
//!
//! where `L_k`/`R_k` bound the first `k` and remaining `n - k` children.
//! Prefix/suffix bounds make each axis O(n). Areas use the scalar's widened
//! accumulator (`f32`→`f64`, `i64`→`i128`).

pub mod flatvec;
pub mod rtree;
