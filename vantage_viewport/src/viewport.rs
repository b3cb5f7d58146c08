// Copyright 2025 the Vantage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The culling viewport.

use alloc::vec::Vec;
use core::ops::Range;

use hashbrown::{HashMap, HashSet};
use kurbo::{Point, Rect};
use tracing::{debug, trace, warn};
use vantage_camera::Camera;
use vantage_index::{Aabb2D, Index, Key};

use crate::ViewportError;
use crate::config::{RefreshStrategy, ViewportConfig};
use crate::host::Host;

type Result<T, E> = core::result::Result<T, ViewportError<E>>;

/// A camera-driven view over a host container that hides off-screen children.
///
/// The viewport owns the host, a [`Camera`] and an R-tree of child bounds.
/// Every child mutation goes through the viewport, which performs it on the
/// host and updates the index in the same call. Each frame the renderer calls
/// [`Viewport::refresh`]: when the camera moved since the last pass, the
/// frustum is queried and visibility of indexed children is updated.
///
/// Bounds are snapshots. After changing a child's geometry, call
/// [`Viewport::update_culling_bound`].
pub struct Viewport<H: Host> {
    host: H,
    camera: Camera,
    config: ViewportConfig,
    index: Index<f64, H::Object>,
    // Side-table from object identity to its index entry.
    entries: HashMap<H::Object, Key>,
    visible: HashSet<H::Object>,
    synced_revision: Option<u64>,
}

impl<H: Host + core::fmt::Debug> core::fmt::Debug for Viewport<H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Viewport")
            .field("host", &self.host)
            .field("camera", &self.camera)
            .field("config", &self.config)
            .field("indexed", &self.entries.len())
            .field("visible", &self.visible.len())
            .field("synced_revision", &self.synced_revision)
            .finish_non_exhaustive()
    }
}

impl<H: Host> Viewport<H> {
    /// Wraps `host` with a camera sized from `config`.
    ///
    /// With culling on, children the host already has are indexed and their
    /// visibility set against the initial frustum.
    pub fn new(host: H, config: ViewportConfig) -> Result<Self, H::Error> {
        let mut viewport = Self {
            host,
            camera: Camera::new(config.width, config.height),
            config,
            index: Index::new(),
            entries: HashMap::new(),
            visible: HashSet::new(),
            synced_revision: None,
        };
        viewport.push_clip();
        if config.culling {
            viewport.index_children()?;
        }
        Ok(viewport)
    }

    // --- accessors ---

    /// The camera.
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// The camera, for input and animation code.
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// The host container.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The host container.
    ///
    /// Child-list changes made here bypass the index; use the viewport's own
    /// mutation methods for those.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Unwraps the host.
    pub fn into_host(self) -> H {
        self.host
    }

    /// Current options.
    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    /// Objects shown by culling. Empty while culling is off.
    pub fn visible_objects(&self) -> impl Iterator<Item = H::Object> + '_ {
        self.visible.iter().copied()
    }

    /// The indexed bound of `obj`, if it has one.
    pub fn culling_bound(&self, obj: H::Object) -> Option<Rect> {
        let key = self.entries.get(&obj)?;
        let (aabb, _) = self.index.get(*key)?;
        Some(Rect::new(aabb.min_x, aabb.min_y, aabb.max_x, aabb.max_y))
    }

    /// Number of indexed objects.
    pub fn indexed_len(&self) -> usize {
        self.entries.len()
    }

    /// Indexed objects whose bound intersects `rect` (edges included).
    pub fn query(&self, rect: Rect) -> impl Iterator<Item = H::Object> + '_ {
        self.index.query_rect(rect_to_aabb(rect.abs())).map(|(_, obj)| obj)
    }

    // --- child mutation ---

    /// Appends `obj` to the content.
    ///
    /// An object that is already a child is moved to the end and its entry
    /// replaced; the index never holds two entries for one object.
    pub fn add_child(&mut self, obj: H::Object) -> Result<(), H::Error> {
        if !self.config.culling {
            return Ok(self.host.add(obj)?);
        }
        let bounds = self.host.content_bounds(obj)?;
        self.host.add(obj)?;
        self.put(obj, bounds);
        Ok(())
    }

    /// Inserts `obj` into the content at `index`.
    pub fn add_child_at(&mut self, obj: H::Object, index: usize) -> Result<(), H::Error> {
        if !self.config.culling {
            return Ok(self.host.add_at(obj, index)?);
        }
        let bounds = self.host.content_bounds(obj)?;
        self.host.add_at(obj, index)?;
        self.put(obj, bounds);
        Ok(())
    }

    /// Removes `obj` from the content and drops its entry.
    ///
    /// The object is left visible. Removing an object that is not a child is
    /// a no-op, so teardown may run in any order.
    pub fn remove_child(&mut self, obj: H::Object) -> Result<(), H::Error> {
        if self.host.index_of(obj).is_err() {
            self.forget(obj);
            trace!(?obj, "not a child, nothing to remove");
            return Ok(());
        }
        self.host.remove(obj)?;
        self.forget(obj);
        Ok(())
    }

    /// Removes and returns the child at `index`.
    pub fn remove_child_at(&mut self, index: usize) -> Result<H::Object, H::Error> {
        let obj = self.host.remove_at(index)?;
        self.forget(obj);
        Ok(obj)
    }

    /// Removes and returns the children in `range`.
    pub fn remove_children(&mut self, range: Range<usize>) -> Result<Vec<H::Object>, H::Error> {
        let removed = self.host.remove_range(range)?;
        for &obj in &removed {
            self.forget(obj);
        }
        Ok(removed)
    }

    /// Recomputes the bound of an indexed child after its geometry changed.
    ///
    /// Returns `false` without touching the host when `obj` has no entry
    /// (culling off, or not a child). Visibility is updated against the
    /// current frustum. When the host can no longer measure `obj` (it was
    /// destroyed behind the viewport's back), the entry is dropped and the
    /// host's error returned.
    pub fn update_culling_bound(&mut self, obj: H::Object) -> Result<bool, H::Error> {
        let Some(&key) = self.entries.get(&obj) else {
            return Ok(false);
        };
        let bounds = match self.host.content_bounds(obj) {
            Ok(bounds) => bounds,
            Err(err) => {
                self.entries.remove(&obj);
                self.index.remove(key);
                self.visible.remove(&obj);
                warn!(?obj, %err, "bounds unavailable, entry dropped");
                return Err(err.into());
            }
        };
        self.put(obj, bounds);
        Ok(true)
    }

    // --- reordering, no index side effects ---

    /// Swaps two children.
    pub fn swap_children(&mut self, a: H::Object, b: H::Object) -> Result<(), H::Error> {
        Ok(self.host.swap(a, b)?)
    }

    /// Position of `obj` among the children.
    pub fn child_index(&self, obj: H::Object) -> Result<usize, H::Error> {
        Ok(self.host.index_of(obj)?)
    }

    /// Moves `obj` to `index` among the children.
    pub fn set_child_index(&mut self, obj: H::Object, index: usize) -> Result<(), H::Error> {
        Ok(self.host.set_index(obj, index)?)
    }

    /// The child at `index`.
    pub fn child_at(&self, index: usize) -> Result<H::Object, H::Error> {
        Ok(self.host.child_at(index)?)
    }

    /// The children in draw order.
    pub fn children(&self) -> &[H::Object] {
        self.host.children()
    }

    // --- camera ---

    /// Re-anchors the camera pivot at `anchor`, or at the frustum center.
    ///
    /// Call once before a run of scale changes that should zoom about a fixed
    /// point. Fails with [`CameraError::DegenerateScale`](vantage_camera::CameraError::DegenerateScale)
    /// and leaves the camera untouched when a scale component is zero.
    pub fn set_origin(&mut self, anchor: Option<Point>) -> Result<(), H::Error> {
        let anchor = anchor.unwrap_or_else(|| self.camera.frustum_center());
        if let Err(err) = self.camera.set_origin(anchor) {
            warn!(x = anchor.x, y = anchor.y, %err, "origin not moved");
            return Err(ViewportError::Camera(err));
        }
        debug!(x = anchor.x, y = anchor.y, "camera origin re-anchored");
        Ok(())
    }

    /// Changes the logical viewport size and the host's clip with it.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.config.width = width;
        self.config.height = height;
        self.camera.resize(width, height);
        self.push_clip();
    }

    /// Switches culling on or off.
    ///
    /// Turning it on indexes every current child and culls right away.
    /// Turning it off drops the index and shows everything it had hidden.
    pub fn set_culling(&mut self, culling: bool) -> Result<(), H::Error> {
        if culling == self.config.culling {
            return Ok(());
        }
        if culling {
            if let Err(err) = self.index_children() {
                self.clear_index();
                return Err(err);
            }
        } else {
            self.clear_index();
        }
        self.config.culling = culling;
        debug!(culling, indexed = self.entries.len(), "culling toggled");
        Ok(())
    }

    /// Selects how culling passes update visibility.
    pub fn set_strategy(&mut self, strategy: RefreshStrategy) {
        self.config.strategy = strategy;
    }

    // --- per frame ---

    /// Per-frame hook, called before paint.
    ///
    /// Pushes the camera's view transform to the host whenever the camera
    /// changed. With culling on and the frustum-changed flag raised, clears
    /// the flag and runs a culling pass. Returns whether a pass ran.
    pub fn refresh(&mut self) -> bool {
        self.sync_content_transform();
        if !self.config.culling || !self.camera.take_frustum_changed() {
            return false;
        }
        self.cull();
        true
    }

    // --- internals ---

    fn sync_content_transform(&mut self) {
        let revision = self.camera.revision();
        if self.synced_revision == Some(revision) {
            return;
        }
        self.synced_revision = Some(revision);
        match self.camera.world_to_view() {
            Ok(transform) => self.host.set_content_transform(transform),
            Err(err) => warn!(%err, "content transform not updated"),
        }
    }

    fn push_clip(&mut self) {
        let clip = Rect::new(0.0, 0.0, self.config.width, self.config.height).abs();
        self.host.set_clip(clip);
    }

    /// Runs one culling pass. Returns how many indexed objects it left
    /// hidden and how many visibility writes it made.
    fn cull(&mut self) -> (usize, usize) {
        let frustum = self.camera.frustum().rect();
        let hits: HashSet<H::Object> = self
            .index
            .query_rect(rect_to_aabb(frustum))
            .map(|(_, obj)| obj)
            .collect();
        let writes = match self.config.strategy {
            RefreshStrategy::Reset => {
                for &obj in self.entries.keys() {
                    self.host.set_visible(obj, false);
                }
                for &obj in &hits {
                    self.host.set_visible(obj, true);
                }
                self.entries.len() + hits.len()
            }
            RefreshStrategy::Diff => {
                let mut writes = 0_usize;
                for &obj in self.visible.difference(&hits) {
                    self.host.set_visible(obj, false);
                    writes += 1;
                }
                for &obj in hits.difference(&self.visible) {
                    self.host.set_visible(obj, true);
                    writes += 1;
                }
                writes
            }
        };
        let hidden = self.entries.len().saturating_sub(hits.len());
        trace!(
            ?frustum,
            strategy = ?self.config.strategy,
            visible = hits.len(),
            hidden,
            writes,
            indexed = self.entries.len(),
            "culling pass"
        );
        self.visible = hits;
        (hidden, writes)
    }

    /// Inserts or replaces the entry for `obj` and sets its visibility.
    fn put(&mut self, obj: H::Object, bounds: Rect) {
        let aabb = rect_to_aabb(bounds);
        if let Some(&key) = self.entries.get(&obj) {
            self.index.update(key, aabb);
            debug!(?obj, ?bounds, "culling bound updated");
        } else {
            let key = self.index.insert(aabb, obj);
            self.entries.insert(obj, key);
            debug!(?obj, ?bounds, "object indexed");
        }
        let visible = aabb.intersects(&rect_to_aabb(self.camera.frustum().rect()));
        self.host.set_visible(obj, visible);
        if visible {
            self.visible.insert(obj);
        } else {
            self.visible.remove(&obj);
        }
    }

    fn forget(&mut self, obj: H::Object) {
        let Some(key) = self.entries.remove(&obj) else {
            return;
        };
        self.index.remove(key);
        if !self.visible.remove(&obj) {
            self.host.set_visible(obj, true);
        }
        debug!(?obj, "object unindexed");
    }

    fn index_children(&mut self) -> Result<(), H::Error> {
        let children = self.host.children().to_vec();
        for obj in children {
            let bounds = self.host.content_bounds(obj)?;
            self.put(obj, bounds);
        }
        Ok(())
    }

    fn clear_index(&mut self) {
        for (obj, _) in self.entries.drain() {
            if !self.visible.contains(&obj) {
                self.host.set_visible(obj, true);
            }
        }
        self.visible.clear();
        self.index.clear();
    }
}

fn rect_to_aabb(r: Rect) -> Aabb2D<f64> {
    Aabb2D::new(r.x0, r.y0, r.x1, r.y1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use kurbo::Affine;
    use vantage_camera::CameraError;

    #[derive(Debug, PartialEq, thiserror::Error)]
    enum MockError {
        #[error("{0} is not a child")]
        Missing(u32),
        #[error("index {0} out of range")]
        OutOfRange(usize),
        #[error("{0} has no geometry")]
        NoBounds(u32),
    }

    /// Display list of numbered objects with fixed bounds.
    #[derive(Debug, Default)]
    struct MockHost {
        children: Vec<u32>,
        bounds: HashMap<u32, Rect>,
        hidden: HashSet<u32>,
        visibility_writes: usize,
        transforms: Vec<Affine>,
        clips: Vec<Rect>,
    }

    impl MockHost {
        fn with_bounds(items: &[(u32, Rect)]) -> Self {
            Self {
                bounds: items.iter().copied().collect(),
                ..Self::default()
            }
        }

        fn shown(&self, obj: u32) -> bool {
            !self.hidden.contains(&obj)
        }
    }

    impl Host for MockHost {
        type Object = u32;
        type Error = MockError;

        fn add(&mut self, obj: u32) -> core::result::Result<(), MockError> {
            self.children.retain(|&c| c != obj);
            self.children.push(obj);
            Ok(())
        }

        fn add_at(&mut self, obj: u32, index: usize) -> core::result::Result<(), MockError> {
            let len = self.children.iter().filter(|&&c| c != obj).count();
            if index > len {
                return Err(MockError::OutOfRange(index));
            }
            self.children.retain(|&c| c != obj);
            self.children.insert(index, obj);
            Ok(())
        }

        fn remove(&mut self, obj: u32) -> core::result::Result<(), MockError> {
            let i = self.index_of(obj)?;
            self.children.remove(i);
            Ok(())
        }

        fn remove_at(&mut self, index: usize) -> core::result::Result<u32, MockError> {
            if index >= self.children.len() {
                return Err(MockError::OutOfRange(index));
            }
            Ok(self.children.remove(index))
        }

        fn remove_range(&mut self, range: Range<usize>) -> core::result::Result<Vec<u32>, MockError> {
            if range.end > self.children.len() || range.start > range.end {
                return Err(MockError::OutOfRange(range.end));
            }
            Ok(self.children.drain(range).collect())
        }

        fn child_at(&self, index: usize) -> core::result::Result<u32, MockError> {
            self.children
                .get(index)
                .copied()
                .ok_or(MockError::OutOfRange(index))
        }

        fn index_of(&self, obj: u32) -> core::result::Result<usize, MockError> {
            self.children
                .iter()
                .position(|&c| c == obj)
                .ok_or(MockError::Missing(obj))
        }

        fn set_index(&mut self, obj: u32, index: usize) -> core::result::Result<(), MockError> {
            let i = self.index_of(obj)?;
            if index >= self.children.len() {
                return Err(MockError::OutOfRange(index));
            }
            let c = self.children.remove(i);
            self.children.insert(index, c);
            Ok(())
        }

        fn swap(&mut self, a: u32, b: u32) -> core::result::Result<(), MockError> {
            let (ia, ib) = (self.index_of(a)?, self.index_of(b)?);
            self.children.swap(ia, ib);
            Ok(())
        }

        fn children(&self) -> &[u32] {
            &self.children
        }

        fn content_bounds(&self, obj: u32) -> core::result::Result<Rect, MockError> {
            self.bounds.get(&obj).copied().ok_or(MockError::NoBounds(obj))
        }

        fn set_visible(&mut self, obj: u32, visible: bool) {
            self.visibility_writes += 1;
            if visible {
                self.hidden.remove(&obj);
            } else {
                self.hidden.insert(obj);
            }
        }

        fn set_content_transform(&mut self, transform: Affine) {
            self.transforms.push(transform);
        }

        fn set_clip(&mut self, clip: Rect) {
            self.clips.push(clip);
        }
    }

    fn viewport_300(items: &[(u32, Rect)]) -> Viewport<MockHost> {
        Viewport::new(MockHost::with_bounds(items), ViewportConfig::new(300.0, 300.0)).unwrap()
    }

    struct XorShift(u64);

    impl XorShift {
        fn next(&mut self) -> u64 {
            let mut x = self.0;
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            self.0 = x;
            x
        }

        #[allow(clippy::cast_precision_loss, reason = "test coordinates")]
        fn coord(&mut self, span: u64) -> f64 {
            (self.next() % span) as f64
        }
    }

    fn intersects(b: Rect, f: Rect) -> bool {
        b.x0 <= f.x1 && b.x1 >= f.x0 && b.y0 <= f.y1 && b.y1 >= f.y0
    }

    #[test]
    fn panning_reveals_offscreen_object() {
        let mut vp = viewport_300(&[(1, Rect::new(310.0, 310.0, 340.0, 340.0))]);
        vp.add_child(1).unwrap();
        assert!(vp.refresh(), "first frame always culls");
        assert!(!vp.host().shown(1));

        vp.camera_mut().set_position((20.0, 20.0));
        assert_eq!(vp.camera().frustum().rect(), Rect::new(20.0, 20.0, 320.0, 320.0));
        assert!(vp.refresh());
        assert!(vp.host().shown(1));
        assert_eq!(vp.visible_objects().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn refresh_is_skipped_while_camera_is_still() {
        let mut vp = viewport_300(&[(1, Rect::new(0.0, 0.0, 10.0, 10.0))]);
        vp.add_child(1).unwrap();
        assert!(vp.refresh());
        let writes = vp.host().visibility_writes;
        assert!(!vp.refresh());
        assert!(!vp.refresh());
        assert_eq!(vp.host().visibility_writes, writes);
        assert!(!vp.camera().frustum_changed());
    }

    #[test]
    fn set_origin_defaults_to_frustum_center() {
        let mut vp = viewport_300(&[]);
        let before = vp.camera().frustum_center();
        vp.set_origin(None).unwrap();
        assert_eq!(vp.camera().pivot(), Point::new(150.0, 150.0));
        assert_eq!(vp.camera().position(), Point::new(-150.0, -150.0));
        assert_eq!(vp.camera().frustum_center(), before);
    }

    #[test]
    fn set_origin_keeps_anchor_on_screen() {
        let mut vp = viewport_300(&[]);
        vp.camera_mut().set_scale((1.5, 0.75));
        vp.camera_mut().set_position((12.0, -40.0));
        let anchor = Point::new(75.0, 210.0);
        let before = vp.camera().world_to_view().unwrap() * anchor;
        vp.set_origin(Some(anchor)).unwrap();
        let after = vp.camera().world_to_view().unwrap() * anchor;
        assert!((before - after).hypot() < 1e-9, "{before:?} vs {after:?}");

        // A zoom anchored there keeps the anchor fixed too.
        vp.camera_mut().set_scale((3.0, 1.5));
        let zoomed = vp.camera().world_to_view().unwrap() * anchor;
        assert!((zoomed - after).hypot() < 1e-9, "{zoomed:?} vs {after:?}");
    }

    #[test]
    fn set_origin_rejects_zero_scale() {
        let mut vp = viewport_300(&[]);
        vp.camera_mut().set_scale((0.0, 1.0));
        let before = vp.camera().transform();
        assert_eq!(
            vp.set_origin(Some(Point::new(5.0, 5.0))),
            Err(ViewportError::Camera(CameraError::DegenerateScale {
                x: 0.0,
                y: 1.0
            }))
        );
        assert_eq!(vp.camera().transform(), before);
    }

    #[test]
    fn double_add_replaces_entry() {
        let mut vp = viewport_300(&[
            (1, Rect::new(0.0, 0.0, 10.0, 10.0)),
            (2, Rect::new(20.0, 0.0, 30.0, 10.0)),
        ]);
        vp.add_child(1).unwrap();
        vp.add_child(2).unwrap();
        vp.host_mut().bounds.insert(1, Rect::new(500.0, 500.0, 510.0, 510.0));
        vp.add_child(1).unwrap();

        assert_eq!(vp.children(), &[2, 1]);
        assert_eq!(vp.indexed_len(), 2);
        assert_eq!(vp.culling_bound(1), Some(Rect::new(500.0, 500.0, 510.0, 510.0)));
        assert!(!vp.host().shown(1), "re-added offscreen object is hidden at once");

        vp.add_child_at(1, 0).unwrap();
        assert_eq!(vp.children(), &[1, 2]);
        assert_eq!(vp.indexed_len(), 2);
    }

    #[test]
    fn update_culling_bound_is_idempotent() {
        let mut vp = viewport_300(&[(1, Rect::new(0.0, 0.0, 10.0, 10.0))]);
        vp.add_child(1).unwrap();
        assert_eq!(vp.update_culling_bound(1), Ok(true));
        let first = vp.culling_bound(1);
        assert_eq!(vp.update_culling_bound(1), Ok(true));
        assert_eq!(vp.culling_bound(1), first);

        vp.host_mut().bounds.insert(1, Rect::new(-50.0, -50.0, -20.0, -20.0));
        assert!(vp.host().shown(1), "stale bound until told");
        assert_eq!(vp.update_culling_bound(1), Ok(true));
        assert!(!vp.host().shown(1));
        assert_eq!(vp.query(Rect::new(-30.0, -30.0, -25.0, -25.0)).count(), 1);

        assert_eq!(vp.update_culling_bound(9), Ok(false), "not a child");
    }

    #[test]
    fn removals_drop_entries_and_restore_visibility() {
        let far = Rect::new(1000.0, 1000.0, 1010.0, 1010.0);
        let items: Vec<(u32, Rect)> = (0..6).map(|i| (i, far)).collect();
        let mut vp = viewport_300(&items);
        for i in 0..6 {
            vp.add_child(i).unwrap();
        }
        assert_eq!(vp.indexed_len(), 6);
        assert!(!vp.host().shown(3));

        vp.remove_child(0).unwrap();
        assert_eq!(vp.remove_child_at(0), Ok(1));
        assert_eq!(vp.remove_children(1..3), Ok(vec![3, 4]));
        assert_eq!(vp.children(), &[2, 5]);
        assert_eq!(vp.indexed_len(), 2);
        for obj in [0, 1, 3, 4] {
            assert!(vp.host().shown(obj), "{obj} left hidden");
            assert_eq!(vp.culling_bound(obj), None);
        }

        // Removing again is a quiet no-op that leaves the rest alone.
        let writes = vp.host().visibility_writes;
        assert_eq!(vp.remove_child(0), Ok(()));
        assert_eq!(vp.remove_child(0), Ok(()));
        assert_eq!(vp.host().visibility_writes, writes);
        assert_eq!(vp.children(), &[2, 5]);
        assert_eq!(vp.indexed_len(), 2);
        assert_eq!(vp.query(far).count(), 2);

        // Index-based removal still reports bad positions.
        assert_eq!(
            vp.remove_child_at(9),
            Err(ViewportError::Host(MockError::OutOfRange(9)))
        );
    }

    #[test]
    fn host_failures_leave_index_untouched() {
        let mut vp = viewport_300(&[(1, Rect::new(0.0, 0.0, 10.0, 10.0))]);
        assert_eq!(
            vp.add_child(7),
            Err(ViewportError::Host(MockError::NoBounds(7)))
        );
        assert_eq!(
            vp.add_child_at(1, 3),
            Err(ViewportError::Host(MockError::OutOfRange(3)))
        );
        assert!(vp.children().is_empty());
        assert_eq!(vp.indexed_len(), 0);
    }

    #[test]
    fn reordering_never_touches_the_index() {
        let items: Vec<(u32, Rect)> = (0..3)
            .map(|i| (i, Rect::new(0.0, 0.0, 1.0, 1.0)))
            .collect();
        let mut vp = viewport_300(&items);
        for i in 0..3 {
            vp.add_child(i).unwrap();
        }
        let writes = vp.host().visibility_writes;
        vp.swap_children(0, 2).unwrap();
        assert_eq!(vp.children(), &[2, 1, 0]);
        vp.set_child_index(0, 1).unwrap();
        assert_eq!(vp.children(), &[2, 0, 1]);
        assert_eq!(vp.child_index(1), Ok(2));
        assert_eq!(vp.child_at(0), Ok(2));
        assert_eq!(vp.host().visibility_writes, writes);
        assert_eq!(vp.indexed_len(), 3);
    }

    #[test]
    fn disabled_culling_is_pure_delegation() {
        let host = MockHost::with_bounds(&[(1, Rect::new(900.0, 900.0, 910.0, 910.0))]);
        let config = ViewportConfig::new(300.0, 300.0).with_culling(false);
        let mut vp = Viewport::new(host, config).unwrap();
        vp.add_child(1).unwrap();
        vp.add_child(2).unwrap();
        vp.camera_mut().set_position((5.0, 5.0));
        assert!(!vp.refresh());
        assert_eq!(vp.indexed_len(), 0);
        assert_eq!(vp.host().visibility_writes, 0);
        assert!(vp.host().shown(1));
        assert_eq!(vp.update_culling_bound(1), Ok(false));
        assert_eq!(vp.host().transforms.len(), 1, "view transform still follows the camera");
    }

    #[test]
    fn toggling_culling_rebuilds_or_drops_the_index() {
        let host = MockHost::with_bounds(&[
            (1, Rect::new(0.0, 0.0, 10.0, 10.0)),
            (2, Rect::new(900.0, 900.0, 910.0, 910.0)),
        ]);
        let mut vp = Viewport::new(host, ViewportConfig::new(300.0, 300.0).with_culling(false))
            .unwrap();
        vp.add_child(1).unwrap();
        vp.add_child(2).unwrap();

        vp.set_culling(true).unwrap();
        assert_eq!(vp.indexed_len(), 2);
        assert!(vp.host().shown(1));
        assert!(!vp.host().shown(2));

        vp.set_culling(false).unwrap();
        assert_eq!(vp.indexed_len(), 0);
        assert!(vp.host().shown(2), "culling off shows everything");
        assert_eq!(vp.visible_objects().count(), 0);
    }

    #[test]
    fn existing_children_are_indexed_on_construction() {
        let mut host = MockHost::with_bounds(&[
            (1, Rect::new(0.0, 0.0, 10.0, 10.0)),
            (2, Rect::new(400.0, 0.0, 410.0, 10.0)),
        ]);
        host.children = vec![1, 2];
        let vp = Viewport::new(host, ViewportConfig::new(300.0, 300.0)).unwrap();
        assert_eq!(vp.indexed_len(), 2);
        assert!(vp.host().shown(1));
        assert!(!vp.host().shown(2));
    }

    #[test]
    fn zero_area_bounds_are_indexed() {
        let mut vp = viewport_300(&[
            (1, Rect::new(50.0, 50.0, 50.0, 50.0)),
            (2, Rect::new(300.0, 0.0, 300.0, 0.0)),
            (3, Rect::new(301.0, 0.0, 301.0, 0.0)),
        ]);
        for i in 1..=3 {
            vp.add_child(i).unwrap();
        }
        vp.refresh();
        assert!(vp.host().shown(1));
        assert!(vp.host().shown(2), "touching the frustum edge counts");
        assert!(!vp.host().shown(3));
    }

    #[test]
    fn mirrored_camera_still_culls() {
        let mut vp = viewport_300(&[
            (1, Rect::new(-100.0, 10.0, -90.0, 20.0)),
            (2, Rect::new(10.0, 10.0, 20.0, 20.0)),
        ]);
        vp.add_child(1).unwrap();
        vp.add_child(2).unwrap();
        vp.camera_mut().set_scale((-1.0, 1.0));
        vp.refresh();
        assert_eq!(vp.camera().frustum().rect(), Rect::new(-300.0, 0.0, 0.0, 300.0));
        assert!(vp.host().shown(1));
        assert!(!vp.host().shown(2));
    }

    #[test]
    fn visibility_matches_intersection_for_both_strategies() {
        for strategy in [RefreshStrategy::Reset, RefreshStrategy::Diff] {
            let mut rng = XorShift(0x9e37_79b9_7f4a_7c15);
            let items: Vec<(u32, Rect)> = (0..400)
                .map(|i| {
                    let (x, y) = (rng.coord(3000) - 1000.0, rng.coord(3000) - 1000.0);
                    let (w, h) = (rng.coord(80), rng.coord(80));
                    (i, Rect::new(x, y, x + w, y + h))
                })
                .collect();
            let config = ViewportConfig::new(640.0, 480.0).with_strategy(strategy);
            let mut vp = Viewport::new(MockHost::with_bounds(&items), config).unwrap();
            for &(i, _) in &items {
                vp.add_child(i).unwrap();
            }
            for step in 0..60 {
                let cam = vp.camera_mut();
                cam.set_position((rng.coord(1500) - 750.0, rng.coord(1500) - 750.0));
                if step % 3 == 0 {
                    let s = 0.25 + rng.coord(300) / 100.0;
                    cam.set_scale((s, s));
                }
                if step % 7 == 0 {
                    let victim = (rng.next() % 400) as u32;
                    let (x, y) = (rng.coord(2000) - 500.0, rng.coord(2000) - 500.0);
                    let r = Rect::new(x, y, x + 30.0, y + 30.0);
                    vp.host_mut().bounds.insert(victim, r);
                    vp.update_culling_bound(victim).unwrap();
                }
                vp.refresh();
                let frustum = vp.camera().frustum().rect();
                for &obj in vp.children() {
                    let b = vp.host().bounds[&obj];
                    assert_eq!(
                        vp.host().shown(obj),
                        intersects(b, frustum),
                        "{strategy:?} step {step} object {obj}"
                    );
                }
                assert_eq!(
                    vp.visible_objects().count(),
                    vp.children()
                        .iter()
                        .filter(|&&o| vp.host().shown(o))
                        .count()
                );
            }
        }
    }

    #[test]
    fn diff_touches_fewer_objects_than_reset() {
        let items: Vec<(u32, Rect)> = (0..1000)
            .map(|i| {
                let x = f64::from(i % 50) * 40.0;
                let y = f64::from(i / 50) * 40.0;
                (i, Rect::new(x, y, x + 20.0, y + 20.0))
            })
            .collect();
        let mut writes = [0_usize; 2];
        for (slot, strategy) in [RefreshStrategy::Reset, RefreshStrategy::Diff]
            .into_iter()
            .enumerate()
        {
            let config = ViewportConfig::new(300.0, 300.0).with_strategy(strategy);
            let mut vp = Viewport::new(MockHost::with_bounds(&items), config).unwrap();
            for &(i, _) in &items {
                vp.add_child(i).unwrap();
            }
            vp.refresh();
            let before = vp.host().visibility_writes;
            vp.camera_mut().set_position((40.0, 0.0));
            vp.refresh();
            writes[slot] = vp.host().visibility_writes - before;
        }
        assert!(writes[0] >= 1000, "reset hides every indexed object");
        assert!(writes[1] < 50, "diff only flips the edges: {}", writes[1]);
    }

    #[test]
    fn pass_counts_agree_across_strategies() {
        let items = [
            (1, Rect::new(0.0, 0.0, 10.0, 10.0)),
            (2, Rect::new(400.0, 0.0, 410.0, 10.0)),
            (3, Rect::new(0.0, 400.0, 10.0, 410.0)),
        ];
        for strategy in [RefreshStrategy::Reset, RefreshStrategy::Diff] {
            let config = ViewportConfig::new(300.0, 300.0).with_strategy(strategy);
            let mut vp = Viewport::new(MockHost::with_bounds(&items), config).unwrap();
            for (i, _) in items {
                vp.add_child(i).unwrap();
            }
            let (hidden, writes) = vp.cull();
            assert_eq!(hidden, 2, "{strategy:?}");
            let expected = match strategy {
                RefreshStrategy::Reset => 4,
                RefreshStrategy::Diff => 0,
            };
            assert_eq!(writes, expected, "{strategy:?}");
        }
    }

    #[test]
    fn content_transform_follows_camera_revisions() {
        let mut vp = viewport_300(&[]);
        vp.refresh();
        vp.refresh();
        assert_eq!(vp.host().transforms, vec![Affine::IDENTITY]);

        vp.camera_mut().set_position((10.0, -5.0));
        vp.camera_mut().set_scale((2.0, 2.0));
        vp.refresh();
        assert_eq!(vp.host().transforms.len(), 2);
        let tf = vp.host().transforms[1];
        assert_eq!(tf, vp.camera().world_to_view().unwrap());
        assert_eq!(tf * Point::new(20.0, -10.0), Point::new(0.0, 0.0));
    }

    #[test]
    fn clip_tracks_the_viewport_rect() {
        let mut vp = viewport_300(&[]);
        assert_eq!(vp.host().clips, vec![Rect::new(0.0, 0.0, 300.0, 300.0)]);
        vp.camera_mut().set_position((40.0, 40.0));
        vp.refresh();
        assert_eq!(vp.host().clips.len(), 1, "clip stays fixed while panning");
        vp.resize(640.0, 480.0);
        assert_eq!(vp.host().clips.last(), Some(&Rect::new(0.0, 0.0, 640.0, 480.0)));
    }

    #[test]
    fn unmeasurable_objects_lose_their_entry() {
        let mut vp = viewport_300(&[
            (1, Rect::new(0.0, 0.0, 10.0, 10.0)),
            (2, Rect::new(20.0, 0.0, 30.0, 10.0)),
        ]);
        vp.add_child(1).unwrap();
        vp.add_child(2).unwrap();
        vp.host_mut().bounds.remove(&1);
        assert_eq!(
            vp.update_culling_bound(1),
            Err(ViewportError::Host(MockError::NoBounds(1)))
        );
        assert_eq!(vp.culling_bound(1), None);
        assert_eq!(vp.indexed_len(), 1);
        assert_eq!(vp.visible_objects().collect::<Vec<_>>(), vec![2]);
        assert_eq!(vp.update_culling_bound(1), Ok(false));
    }

    #[test]
    fn resize_grows_the_frustum() {
        let mut vp = viewport_300(&[(1, Rect::new(350.0, 10.0, 360.0, 20.0))]);
        vp.add_child(1).unwrap();
        vp.refresh();
        assert!(!vp.host().shown(1));
        vp.resize(400.0, 300.0);
        assert_eq!(vp.config().width, 400.0);
        assert!(vp.refresh());
        assert!(vp.host().shown(1));
    }
}
