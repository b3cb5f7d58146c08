// Copyright 2025 the Vantage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dynamic R-tree backend generic over scalar `T: Scalar`.
//!
//! Nodes live in an arena and carry a parent link, and every slot remembers the
//! leaf holding it, so removal touches a single root-to-leaf path instead of
//! searching the tree. Underfull nodes are dissolved on removal and their items
//! reinserted, which keeps the tree balanced under heavy churn.

use alloc::vec;
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt::Debug;

use crate::backend::Backend;
use crate::types::{Aabb2D, Scalar, area, enlargement};

/// R-tree backend using cost-based splits and widened accumulator metrics.
pub struct RTree<T: Scalar> {
    max_children: usize,
    min_children: usize,
    root: Option<NodeIdx>,
    nodes: Vec<Node<T>>,
    free_nodes: Vec<NodeIdx>,
    leaf_of: Vec<Option<NodeIdx>>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
struct NodeIdx(usize);

impl NodeIdx {
    const fn get(self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug)]
enum Children<T> {
    Leaf(Vec<(usize, Aabb2D<T>)>),
    Branch(Vec<NodeIdx>),
}

#[derive(Clone, Debug)]
struct Node<T> {
    bbox: Aabb2D<T>,
    parent: Option<NodeIdx>,
    children: Children<T>,
}

impl<T> Node<T> {
    fn len(&self) -> usize {
        match &self.children {
            Children::Leaf(items) => items.len(),
            Children::Branch(kids) => kids.len(),
        }
    }
}

impl<T: Scalar> Default for RTree<T> {
    fn default() -> Self {
        Self::with_max_children(8)
    }
}

impl<T: Scalar> RTree<T> {
    /// Create an empty tree whose nodes hold at most `max_children` entries.
    ///
    /// Values below 4 are raised to 4. The minimum fill is 40% of the maximum.
    pub fn with_max_children(max_children: usize) -> Self {
        let max_children = max_children.max(4);
        Self {
            max_children,
            min_children: (max_children * 2 / 5).max(2),
            root: None,
            nodes: Vec::new(),
            free_nodes: Vec::new(),
            leaf_of: Vec::new(),
        }
    }

    /// Number of levels from the root to the leaves; `0` when empty.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut cur = self.root;
        while let Some(idx) = cur {
            depth += 1;
            cur = match &self.nodes[idx.get()].children {
                Children::Branch(kids) => kids.first().copied(),
                Children::Leaf(_) => None,
            };
        }
        depth
    }

    fn alloc(&mut self, node: Node<T>) -> NodeIdx {
        if let Some(idx) = self.free_nodes.pop() {
            self.nodes[idx.get()] = node;
            idx
        } else {
            self.nodes.push(node);
            NodeIdx(self.nodes.len() - 1)
        }
    }

    fn release(&mut self, idx: NodeIdx) {
        let node = &mut self.nodes[idx.get()];
        node.parent = None;
        node.children = Children::Leaf(Vec::new());
        self.free_nodes.push(idx);
    }

    fn bounds_of(&self, idx: NodeIdx) -> Option<Aabb2D<T>> {
        match &self.nodes[idx.get()].children {
            Children::Leaf(items) => items.iter().map(|(_, b)| *b).reduce(|a, b| a.union(&b)),
            Children::Branch(kids) => kids
                .iter()
                .map(|k| self.nodes[k.get()].bbox)
                .reduce(|a, b| a.union(&b)),
        }
    }

    fn refresh_bbox(&mut self, idx: NodeIdx) {
        if let Some(bbox) = self.bounds_of(idx) {
            self.nodes[idx.get()].bbox = bbox;
        }
    }

    /// Descend from `start` picking the child that grows least, then the smaller one.
    fn choose_leaf(&self, start: NodeIdx, aabb: &Aabb2D<T>) -> NodeIdx {
        let mut cur = start;
        while let Children::Branch(kids) = &self.nodes[cur.get()].children {
            let mut best: Option<(NodeIdx, T::Acc, T::Acc)> = None;
            for &kid in kids {
                let bbox = &self.nodes[kid.get()].bbox;
                let grow = enlargement(bbox, aabb);
                let size = area(bbox);
                let better = best.is_none_or(|(_, g, s)| grow < g || (grow == g && size < s));
                if better {
                    best = Some((kid, grow, size));
                }
            }
            match best {
                Some((kid, _, _)) => cur = kid,
                None => break,
            }
        }
        cur
    }

    /// Walk from `start` to the root, splitting overflowing nodes and refitting boxes.
    fn propagate(&mut self, start: NodeIdx) {
        let mut cur = start;
        loop {
            let sibling = (self.nodes[cur.get()].len() > self.max_children).then(|| self.split(cur));
            self.refresh_bbox(cur);
            if let Some(parent) = self.nodes[cur.get()].parent {
                if let Some(sib) = sibling {
                    self.nodes[sib.get()].parent = Some(parent);
                    if let Children::Branch(kids) = &mut self.nodes[parent.get()].children {
                        kids.push(sib);
                    }
                }
                cur = parent;
                continue;
            }
            if let Some(sib) = sibling {
                let bbox = self.nodes[cur.get()]
                    .bbox
                    .union(&self.nodes[sib.get()].bbox);
                let root = self.alloc(Node {
                    bbox,
                    parent: None,
                    children: Children::Branch(vec![cur, sib]),
                });
                self.nodes[cur.get()].parent = Some(root);
                self.nodes[sib.get()].parent = Some(root);
                self.root = Some(root);
            }
            return;
        }
    }

    /// Split an overflowing node in two. The node keeps the first half; the
    /// returned sibling (not yet linked into a parent) gets the rest.
    fn split(&mut self, idx: NodeIdx) -> NodeIdx {
        let node = &mut self.nodes[idx.get()];
        let parent = node.parent;
        let bbox = node.bbox;
        let children = core::mem::replace(&mut node.children, Children::Leaf(Vec::new()));
        let (keep, moved) = match children {
            Children::Leaf(items) => {
                let (l, r) = partition(items, |(_, b)| *b, self.min_children);
                (Children::Leaf(l), Children::Leaf(r))
            }
            Children::Branch(kids) => {
                let nodes = &self.nodes;
                let (l, r) = partition(kids, |k| nodes[k.get()].bbox, self.min_children);
                (Children::Branch(l), Children::Branch(r))
            }
        };
        self.nodes[idx.get()].children = keep;
        let sib = self.alloc(Node {
            bbox,
            parent,
            children: moved,
        });
        let Self {
            nodes, leaf_of, ..
        } = self;
        match &nodes[sib.get()].children {
            Children::Leaf(items) => {
                for &(slot, _) in items {
                    leaf_of[slot] = Some(sib);
                }
            }
            Children::Branch(kids) => {
                for kid in kids.clone() {
                    nodes[kid.get()].parent = Some(sib);
                }
            }
        }
        self.refresh_bbox(sib);
        sib
    }

    /// Dissolve underfull nodes on the path from `start` to the root and
    /// reinsert their items.
    fn condense(&mut self, start: NodeIdx) {
        let mut orphans = Vec::new();
        let mut cur = start;
        while let Some(parent) = self.nodes[cur.get()].parent {
            if self.nodes[cur.get()].len() < self.min_children {
                if let Children::Branch(kids) = &mut self.nodes[parent.get()].children {
                    kids.retain(|k| *k != cur);
                }
                self.drain_subtree(cur, &mut orphans);
            } else {
                self.refresh_bbox(cur);
            }
            cur = parent;
        }
        self.refresh_bbox(cur);
        self.shrink_root();
        for (slot, bbox) in orphans {
            self.insert(slot, bbox);
        }
    }

    fn drain_subtree(&mut self, idx: NodeIdx, out: &mut Vec<(usize, Aabb2D<T>)>) {
        let children = core::mem::replace(
            &mut self.nodes[idx.get()].children,
            Children::Leaf(Vec::new()),
        );
        match children {
            Children::Leaf(items) => {
                for &(slot, _) in &items {
                    self.leaf_of[slot] = None;
                }
                out.extend(items);
            }
            Children::Branch(kids) => {
                for kid in kids {
                    self.drain_subtree(kid, out);
                }
            }
        }
        self.release(idx);
    }

    /// Collapse single-child branch roots and drop an empty root.
    fn shrink_root(&mut self) {
        while let Some(root) = self.root {
            match &self.nodes[root.get()].children {
                Children::Branch(kids) if kids.len() == 1 => {
                    let only = kids[0];
                    self.nodes[only.get()].parent = None;
                    self.release(root);
                    self.root = Some(only);
                }
                Children::Branch(kids) if kids.is_empty() => {
                    self.release(root);
                    self.root = None;
                }
                Children::Leaf(items) if items.is_empty() => {
                    self.release(root);
                    self.root = None;
                }
                _ => return,
            }
        }
    }

    fn search(&self, hit_node: impl Fn(&Aabb2D<T>) -> bool, out: &mut Vec<usize>) {
        let Some(root) = self.root else {
            return;
        };
        let mut stack = vec![root];
        while let Some(idx) = stack.pop() {
            let node = &self.nodes[idx.get()];
            if !hit_node(&node.bbox) {
                continue;
            }
            match &node.children {
                Children::Leaf(items) => {
                    out.extend(items.iter().filter(|(_, b)| hit_node(b)).map(|(s, _)| *s));
                }
                Children::Branch(kids) => stack.extend(kids.iter().copied()),
            }
        }
    }
}

/// Split `entries` at the cheapest centroid-sorted cut on either axis.
fn partition<C, T, F>(mut entries: Vec<C>, bbox_of: F, min_children: usize) -> (Vec<C>, Vec<C>)
where
    C: Copy,
    T: Scalar,
    F: Fn(&C) -> Aabb2D<T>,
{
    let mut best: Option<(T::Acc, usize, bool)> = None;
    for by_x in [true, false] {
        sort_on_axis(&mut entries, &bbox_of, by_x);
        if let Some((cost, k)) = cheapest_cut(&entries, &bbox_of, min_children)
            && best.is_none_or(|(c, _, _)| cost < c)
        {
            best = Some((cost, k, by_x));
        }
    }
    let (k, by_x) = best.map_or((entries.len() / 2, false), |(_, k, by_x)| (k, by_x));
    if by_x {
        sort_on_axis(&mut entries, &bbox_of, true);
    }
    let right = entries.split_off(k);
    (entries, right)
}

fn sort_on_axis<C, T: Scalar>(entries: &mut [C], bbox_of: &impl Fn(&C) -> Aabb2D<T>, by_x: bool) {
    let key = |c: &C| {
        let b = bbox_of(c);
        if by_x { b.center_x() } else { b.center_y() }
    };
    entries.sort_by(|a, b| key(a).partial_cmp(&key(b)).unwrap_or(Ordering::Equal));
}

/// Best `k` in `min..=n-min` minimizing `area(L_k) * k + area(R_k) * (n - k)`.
fn cheapest_cut<C, T: Scalar>(
    entries: &[C],
    bbox_of: &impl Fn(&C) -> Aabb2D<T>,
    min_children: usize,
) -> Option<(T::Acc, usize)> {
    let n = entries.len();
    if n < 2 * min_children || min_children == 0 {
        return None;
    }
    let boxes: Vec<Aabb2D<T>> = entries.iter().map(bbox_of).collect();
    let mut prefix = Vec::with_capacity(n);
    let mut acc = boxes[0];
    for b in &boxes {
        acc = acc.union(b);
        prefix.push(acc);
    }
    let mut suffix = boxes.clone();
    for i in (0..n - 1).rev() {
        suffix[i] = suffix[i].union(&suffix[i + 1]);
    }
    let mut best: Option<(T::Acc, usize)> = None;
    for k in min_children..=(n - min_children) {
        let cost = area(&prefix[k - 1]) * T::acc_from_usize(k)
            + area(&suffix[k]) * T::acc_from_usize(n - k);
        if best.is_none_or(|(c, _)| cost < c) {
            best = Some((cost, k));
        }
    }
    best
}

impl<T: Scalar> Backend<T> for RTree<T> {
    fn insert(&mut self, slot: usize, aabb: Aabb2D<T>) {
        if self.leaf_of.len() <= slot {
            self.leaf_of.resize(slot + 1, None);
        }
        debug_assert!(self.leaf_of[slot].is_none(), "slot {slot} inserted twice");
        let Some(root) = self.root else {
            let leaf = self.alloc(Node {
                bbox: aabb,
                parent: None,
                children: Children::Leaf(vec![(slot, aabb)]),
            });
            self.root = Some(leaf);
            self.leaf_of[slot] = Some(leaf);
            return;
        };
        let leaf = self.choose_leaf(root, &aabb);
        match &mut self.nodes[leaf.get()].children {
            Children::Leaf(items) => items.push((slot, aabb)),
            Children::Branch(_) => unreachable!("branch nodes always have children"),
        }
        self.leaf_of[slot] = Some(leaf);
        self.propagate(leaf);
    }

    fn update(&mut self, slot: usize, aabb: Aabb2D<T>) {
        let Some(leaf) = self.leaf_of.get(slot).copied().flatten() else {
            return;
        };
        if !self.nodes[leaf.get()].bbox.contains(&aabb) {
            self.remove(slot);
            self.insert(slot, aabb);
            return;
        }
        if let Children::Leaf(items) = &mut self.nodes[leaf.get()].children
            && let Some(item) = items.iter_mut().find(|(s, _)| *s == slot)
        {
            item.1 = aabb;
        }
        // Shrinking in place may tighten every ancestor.
        let mut cur = Some(leaf);
        while let Some(idx) = cur {
            self.refresh_bbox(idx);
            cur = self.nodes[idx.get()].parent;
        }
    }

    fn remove(&mut self, slot: usize) {
        let Some(leaf) = self.leaf_of.get_mut(slot).and_then(Option::take) else {
            return;
        };
        if let Children::Leaf(items) = &mut self.nodes[leaf.get()].children {
            items.retain(|(s, _)| *s != slot);
        }
        self.condense(leaf);
    }

    fn clear(&mut self) {
        self.root = None;
        self.nodes.clear();
        self.free_nodes.clear();
        self.leaf_of.clear();
    }

    fn query_point(&self, x: T, y: T, out: &mut Vec<usize>) {
        self.search(|b| b.contains_point(x, y), out);
    }

    fn query_rect(&self, rect: Aabb2D<T>, out: &mut Vec<usize>) {
        self.search(|b| b.intersects(&rect), out);
    }
}

impl<T: Scalar> Debug for RTree<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RTree")
            .field("max_children", &self.max_children)
            .field("min_children", &self.min_children)
            .field("arena_nodes", &self.nodes.len())
            .field("free_nodes", &self.free_nodes.len())
            .field("alive", &self.leaf_of.iter().flatten().count())
            .field("depth", &self.depth())
            .finish_non_exhaustive()
    }
}

/// R-tree with i64 coordinates and i128 metrics.
pub type RTreeI64 = RTree<i64>;

/// R-tree with f32 coordinates and f64 metrics.
pub type RTreeF32 = RTree<f32>;

/// R-tree with f64 coordinates and f64 metrics.
pub type RTreeF64 = RTree<f64>;
