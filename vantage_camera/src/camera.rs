// Copyright 2025 the Vantage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::boxed::Box;
use alloc::vec::Vec;

use kurbo::{Affine, Point, Size, Vec2};

use crate::CameraError;
use crate::state::{CameraState, CameraTransform, Coefficients, Frustum};

/// Handle returned by [`Camera::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&CameraState)>;

/// 2D camera over a world-space plane.
///
/// Every setter recomputes the derived state immediately: skew and rotation
/// refresh the [`Coefficients`] first, then every path rebuilds the
/// [`Frustum`], raises the frustum-changed flag, bumps the revision and calls
/// each listener once with the new [`CameraState`].
pub struct Camera {
    transform: CameraTransform,
    size: Size,
    frustum: Frustum,
    coefficients: Coefficients,
    frustum_changed: bool,
    revision: u64,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u64,
}

impl core::fmt::Debug for Camera {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Camera")
            .field("transform", &self.transform)
            .field("size", &self.size)
            .field("frustum", &self.frustum)
            .field("coefficients", &self.coefficients)
            .field("frustum_changed", &self.frustum_changed)
            .field("revision", &self.revision)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl Camera {
    /// Creates a camera for a viewport of the given logical size.
    ///
    /// Position and pivot start at the origin, scale at `1.0`, no skew or
    /// rotation. The frustum is computed and flagged as changed, so the first
    /// refresh always runs.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        let mut camera = Self {
            transform: CameraTransform::default(),
            size: Size::new(width, height),
            frustum: Frustum::default(),
            coefficients: Coefficients::default(),
            frustum_changed: false,
            revision: 0,
            listeners: Vec::new(),
            next_listener: 0,
        };
        camera.recompute(true);
        camera
    }

    // --- accessors ---

    /// The writable fields.
    #[must_use]
    pub fn transform(&self) -> CameraTransform {
        self.transform
    }

    /// Camera position.
    #[must_use]
    pub fn position(&self) -> Point {
        self.transform.position
    }

    /// Per-axis scale.
    #[must_use]
    pub fn scale(&self) -> Vec2 {
        self.transform.scale
    }

    /// Pivot in viewport-local coordinates.
    #[must_use]
    pub fn pivot(&self) -> Point {
        self.transform.pivot
    }

    /// Skew angles in radians.
    #[must_use]
    pub fn skew(&self) -> Vec2 {
        self.transform.skew
    }

    /// Rotation in radians.
    #[must_use]
    pub fn rotation(&self) -> f64 {
        self.transform.rotation
    }

    /// Logical viewport size.
    #[must_use]
    pub fn size(&self) -> Size {
        self.size
    }

    /// The visible rectangle in world coordinates.
    #[must_use]
    pub fn frustum(&self) -> Frustum {
        self.frustum
    }

    /// Midpoint of the current frustum.
    #[must_use]
    pub fn frustum_center(&self) -> Point {
        self.frustum.center()
    }

    /// The rotation/skew basis.
    #[must_use]
    pub fn coefficients(&self) -> Coefficients {
        self.coefficients
    }

    /// Whether the frustum changed since the flag was last cleared.
    #[must_use]
    pub fn frustum_changed(&self) -> bool {
        self.frustum_changed
    }

    /// Clear the frustum-changed flag, returning its previous value.
    pub fn take_frustum_changed(&mut self) -> bool {
        core::mem::take(&mut self.frustum_changed)
    }

    /// Number of recomputations since construction.
    ///
    /// Consumers compare it against a stored value to detect changes without
    /// clearing the shared flag.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Snapshot of the whole camera.
    #[must_use]
    pub fn state(&self) -> CameraState {
        CameraState {
            transform: self.transform,
            size: self.size,
            frustum: self.frustum,
            coefficients: self.coefficients,
            revision: self.revision,
        }
    }

    // --- mutation ---

    /// Sets the position.
    pub fn set_position(&mut self, position: impl Into<Point>) {
        self.transform.position = position.into();
        self.recompute(false);
    }

    /// Sets the per-axis scale.
    ///
    /// Zero is accepted and yields a zero-area frustum; operations that divide
    /// by the scale report [`CameraError::DegenerateScale`] instead.
    pub fn set_scale(&mut self, scale: impl Into<Vec2>) {
        self.transform.scale = scale.into();
        self.recompute(false);
    }

    /// Sets the pivot.
    pub fn set_pivot(&mut self, pivot: impl Into<Point>) {
        self.transform.pivot = pivot.into();
        self.recompute(false);
    }

    /// Sets the skew angles.
    pub fn set_skew(&mut self, skew: impl Into<Vec2>) {
        self.transform.skew = skew.into();
        self.recompute(true);
    }

    /// Sets the rotation.
    pub fn set_rotation(&mut self, rotation: f64) {
        self.transform.rotation = rotation;
        self.recompute(true);
    }

    /// Replaces every writable field with a single recomputation.
    pub fn set_transform(&mut self, transform: CameraTransform) {
        let basis = transform.skew != self.transform.skew
            || transform.rotation != self.transform.rotation;
        self.transform = transform;
        self.recompute(basis);
    }

    /// Changes the logical viewport size without touching the zoom.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.size = Size::new(width, height);
        self.recompute(false);
    }

    /// Re-anchors the pivot at `anchor` without moving what is on screen.
    ///
    /// The position is shifted by `(anchor - pivot) / scale` so the frustum
    /// stays where it was; with no rotation or skew the anchor also keeps its
    /// screen coordinate. Fails and leaves the camera untouched when either
    /// scale component is zero.
    pub fn set_origin(&mut self, anchor: Point) -> Result<(), CameraError> {
        let inv = self.inverse_scale()?;
        let shift = anchor - self.transform.pivot;
        self.transform.pivot = anchor;
        self.transform.position -= Vec2::new(shift.x * inv.x, shift.y * inv.y);
        self.recompute(false);
        Ok(())
    }

    /// `1 / scale` per axis.
    pub fn inverse_scale(&self) -> Result<Vec2, CameraError> {
        let Vec2 { x, y } = self.transform.scale;
        if x == 0.0 || y == 0.0 {
            return Err(CameraError::DegenerateScale { x, y });
        }
        Ok(Vec2::new(1.0 / x, 1.0 / y))
    }

    // --- view transforms ---

    /// Transform applied to world content so the camera's view lands on screen.
    ///
    /// It undoes the camera: translation by `-position`, scale by `1 / scale`,
    /// and the inverse rotation and skew taken from the [`Coefficients`],
    /// all about the pivot.
    pub fn world_to_view(&self) -> Result<Affine, CameraError> {
        let inv = self.inverse_scale()?;
        let Coefficients { cx, sx, cy, sy } = self.coefficients;
        let a = cx * inv.x;
        let b = -sx * inv.x;
        let c = -cy * inv.y;
        let d = sy * inv.y;
        let CameraTransform {
            position, pivot, ..
        } = self.transform;
        let tx = -position.x - (pivot.x * a + pivot.y * c);
        let ty = -position.y - (pivot.x * b + pivot.y * d);
        Ok(Affine::new([a, b, c, d, tx, ty]))
    }

    /// Inverse of [`Camera::world_to_view`].
    ///
    /// Fails on a zero scale, and with [`CameraError::Singular`] when the skew
    /// angles fold both axes onto one line.
    pub fn view_to_world(&self) -> Result<Affine, CameraError> {
        let m = self.world_to_view()?;
        let Coefficients { cx, sx, cy, sy } = self.coefficients;
        // cos(skew.x + skew.y); the scale factor is already known to be nonzero.
        let basis_det = cx * sy - sx * cy;
        if basis_det < 1e-12 && basis_det > -1e-12 {
            return Err(CameraError::Singular);
        }
        Ok(m.inverse())
    }

    // --- listeners ---

    /// Registers a listener called once per recomputation.
    pub fn subscribe(&mut self, listener: impl FnMut(&CameraState) + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns `false` if the id is unknown.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(l, _)| *l != id);
        self.listeners.len() != before
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn recompute(&mut self, basis: bool) {
        let CameraTransform {
            position,
            scale,
            pivot,
            skew,
            rotation,
        } = self.transform;
        if basis {
            self.coefficients = Coefficients::from_rotation_skew(rotation, skew);
        }
        self.frustum = Frustum {
            x: position.x * scale.x + pivot.x,
            y: position.y * scale.y + pivot.y,
            width: self.size.width * scale.x,
            height: self.size.height * scale.y,
        };
        self.frustum_changed = true;
        self.revision += 1;
        if !self.listeners.is_empty() {
            let state = self.state();
            for (_, listener) in &mut self.listeners {
                listener(&state);
            }
        }
    }
}
