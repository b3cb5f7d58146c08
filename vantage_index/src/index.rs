// Copyright 2025 the Vantage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public `Index` API and generic implementation over a pluggable backend.

use alloc::vec::Vec;
use core::fmt::Debug;

use crate::backend::Backend;
use crate::backends::flatvec::FlatVec;
use crate::backends::rtree::RTree;
use crate::types::{Aabb2D, Scalar};

/// Generational handle for entries.
///
/// A key stays valid until its entry is removed. Slots are recycled, but the
/// generation is bumped on every reuse, so a stale key never aliases a newer
/// entry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Key(u32, u32);

impl Key {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Index keys are 32-bit."
    )]
    const fn new(idx: usize, generation: u32) -> Self {
        Self(idx as u32, generation)
    }

    const fn idx(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug)]
struct Entry<T, P> {
    aabb: Aabb2D<T>,
    payload: P,
}

/// A generic AABB index parameterized by a spatial backend.
///
/// Every mutation reaches the backend immediately; there is no batching step.
#[derive(Debug)]
pub struct IndexGeneric<T: Copy + PartialOrd + Debug, P: Copy + Debug, B: Backend<T>> {
    entries: Vec<Option<Entry<T, P>>>,
    generations: Vec<u32>,
    free_list: Vec<usize>,
    len: usize,
    backend: B,
}

impl<T, P, B> Default for IndexGeneric<T, P, B>
where
    T: Copy + PartialOrd + Debug,
    P: Copy + Debug,
    B: Backend<T> + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, P, B> IndexGeneric<T, P, B>
where
    T: Copy + PartialOrd + Debug,
    P: Copy + Debug,
    B: Backend<T> + Default,
{
    /// Create an empty index using the backend's default constructor.
    pub fn new() -> Self {
        Self::with_backend(B::default())
    }
}

impl<T, P, B> IndexGeneric<T, P, B>
where
    T: Copy + PartialOrd + Debug,
    P: Copy + Debug,
    B: Backend<T>,
{
    /// Create an empty index over an explicitly configured backend.
    pub fn with_backend(backend: B) -> Self {
        Self {
            entries: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            backend,
        }
    }

    /// Reserve space for at least `n` more entries.
    pub fn reserve(&mut self, n: usize) {
        self.entries.reserve(n);
        self.generations.reserve(n);
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if the index holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert a new AABB with payload. Returns a stable handle `Key`.
    pub fn insert(&mut self, aabb: Aabb2D<T>, payload: P) -> Key {
        let entry = Some(Entry { aabb, payload });
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].wrapping_add(1);
            self.generations[idx] = generation;
            self.entries[idx] = entry;
            (idx, generation)
        } else {
            self.entries.push(entry);
            self.generations.push(1);
            (self.entries.len() - 1, 1)
        };
        self.backend.insert(idx, aabb);
        self.len += 1;
        Key::new(idx, generation)
    }

    /// Replace the AABB of an existing entry. Returns `false` for a stale key.
    pub fn update(&mut self, key: Key, aabb: Aabb2D<T>) -> bool {
        let Some(entry) = self.entry_mut(key) else {
            return false;
        };
        if entry.aabb != aabb {
            entry.aabb = aabb;
            self.backend.update(key.idx(), aabb);
        }
        true
    }

    /// Remove an entry, returning its payload. A stale key is a no-op.
    pub fn remove(&mut self, key: Key) -> Option<P> {
        self.entry_mut(key)?;
        let entry = self.entries[key.idx()].take()?;
        self.backend.remove(key.idx());
        self.free_list.push(key.idx());
        self.len -= 1;
        Some(entry.payload)
    }

    /// The AABB and payload stored under `key`, if it is live.
    pub fn get(&self, key: Key) -> Option<(Aabb2D<T>, P)> {
        let e = self.entries.get(key.idx())?.as_ref()?;
        (self.generations[key.idx()] == key.1).then_some((e.aabb, e.payload))
    }

    /// Whether `key` refers to a live entry.
    pub fn contains_key(&self, key: Key) -> bool {
        self.get(key).is_some()
    }

    /// Clear the index. Outstanding keys become stale.
    pub fn clear(&mut self) {
        for (idx, slot) in self.entries.iter_mut().enumerate() {
            if slot.take().is_some() {
                self.free_list.push(idx);
            }
        }
        self.len = 0;
        self.backend.clear();
    }

    /// Iterate all live entries in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (Key, Aabb2D<T>, P)> + '_ {
        self.entries.iter().enumerate().filter_map(|(i, e)| {
            e.as_ref()
                .map(|e| (Key::new(i, self.generations[i]), e.aabb, e.payload))
        })
    }

    /// Query for entries whose AABB contains the point.
    pub fn query_point(&self, x: T, y: T) -> impl Iterator<Item = (Key, P)> + '_ {
        let mut slots = Vec::new();
        self.backend.query_point(x, y, &mut slots);
        self.resolve(slots)
    }

    /// Query for entries whose AABB intersects the given rectangle.
    ///
    /// Touching edges count as intersecting.
    pub fn query_rect(&self, rect: Aabb2D<T>) -> impl Iterator<Item = (Key, P)> + '_ {
        let mut slots = Vec::new();
        self.backend.query_rect(rect, &mut slots);
        self.resolve(slots)
    }

    fn resolve(&self, slots: Vec<usize>) -> impl Iterator<Item = (Key, P)> + '_ {
        slots.into_iter().filter_map(|i| {
            let e = self.entries.get(i)?.as_ref()?;
            Some((Key::new(i, self.generations[i]), e.payload))
        })
    }

    fn entry_mut(&mut self, key: Key) -> Option<&mut Entry<T, P>> {
        if self.generations.get(key.idx()) != Some(&key.1) {
            return None;
        }
        self.entries.get_mut(key.idx())?.as_mut()
    }
}

/// Default index: an R-tree backend.
pub type Index<T, P> = IndexGeneric<T, P, RTree<T>>;

/// Brute-force index with linear scans.
pub type FlatIndex<T, P> = IndexGeneric<T, P, FlatVec<T>>;

impl<T: Scalar, P: Copy + Debug> Index<T, P> {
    /// Create an R-tree index whose nodes hold at most `max_children` entries.
    pub fn with_max_children(max_children: usize) -> Self {
        Self::with_backend(RTree::with_max_children(max_children))
    }
}
