// Copyright 2025 the Vantage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flat vector backend with linear scans. Small and simple; good for tiny sets
//! and as the reference answer when checking other backends.

use alloc::vec::Vec;
use core::fmt::Debug;

use crate::backend::Backend;
use crate::types::Aabb2D;

/// Flat vector backend with linear scans.
#[derive(Clone)]
pub struct FlatVec<T> {
    slots: Vec<Option<Aabb2D<T>>>,
}

impl<T> Default for FlatVec<T> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

impl<T> Debug for FlatVec<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FlatVec")
            .field("total_slots", &self.slots.len())
            .field("alive", &self.slots.iter().flatten().count())
            .finish_non_exhaustive()
    }
}

impl<T: Copy + PartialOrd + Debug> Backend<T> for FlatVec<T> {
    fn insert(&mut self, slot: usize, aabb: Aabb2D<T>) {
        if self.slots.len() <= slot {
            self.slots.resize(slot + 1, None);
        }
        self.slots[slot] = Some(aabb);
    }

    fn update(&mut self, slot: usize, aabb: Aabb2D<T>) {
        if let Some(s @ Some(_)) = self.slots.get_mut(slot) {
            *s = Some(aabb);
        }
    }

    fn remove(&mut self, slot: usize) {
        if let Some(s) = self.slots.get_mut(slot) {
            *s = None;
        }
    }

    fn clear(&mut self) {
        self.slots.clear();
    }

    fn query_point(&self, x: T, y: T, out: &mut Vec<usize>) {
        out.extend(
            self.slots
                .iter()
                .enumerate()
                .filter(|(_, s)| s.is_some_and(|a| a.contains_point(x, y)))
                .map(|(i, _)| i),
        );
    }

    fn query_rect(&self, rect: Aabb2D<T>, out: &mut Vec<usize>) {
        out.extend(
            self.slots
                .iter()
                .enumerate()
                .filter(|(_, s)| s.is_some_and(|a| a.intersects(&rect)))
                .map(|(i, _)| i),
        );
    }
}
