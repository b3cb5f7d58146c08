// Copyright 2025 the Vantage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Plain value types describing a camera.

use kurbo::{Point, Rect, Size, Vec2};

/// The visible rectangle in world coordinates.
///
/// Stored as origin plus extent so that `width` and `height` are exactly
/// `viewport size * scale`. A negative scale yields a negative extent; use
/// [`Frustum::rect`] for a normalized rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Frustum {
    /// Left edge (before normalization).
    pub x: f64,
    /// Top edge (before normalization).
    pub y: f64,
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl Frustum {
    /// Midpoint of the rectangle.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// The frustum as a normalized rectangle (`x0 <= x1`, `y0 <= y1`).
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height).abs()
    }
}

/// Rotation and skew folded into two basis vectors.
///
/// ```text
/// cx =  cos(rotation + skew.y)
/// sx =  sin(rotation + skew.y)
/// cy = -sin(rotation - skew.x)
/// sy =  cos(rotation - skew.x)
/// ```
///
/// `(cx, sx)` is the rotated x axis and `(-cy, sy)` the rotated y axis,
/// each sheared by its skew angle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coefficients {
    /// Cosine term of the x basis.
    pub cx: f64,
    /// Sine term of the x basis.
    pub sx: f64,
    /// Negated sine term of the y basis.
    pub cy: f64,
    /// Cosine term of the y basis.
    pub sy: f64,
}

impl Default for Coefficients {
    fn default() -> Self {
        Self {
            cx: 1.0,
            sx: 0.0,
            cy: 0.0,
            sy: 1.0,
        }
    }
}

impl Coefficients {
    /// Derive the coefficients for a rotation (radians) and skew angles.
    #[must_use]
    pub fn from_rotation_skew(rotation: f64, skew: Vec2) -> Self {
        let x_axis = Vec2::from_angle(rotation + skew.y);
        let y_axis = Vec2::from_angle(rotation - skew.x);
        Self {
            cx: x_axis.x,
            sx: x_axis.y,
            cy: -y_axis.y,
            sy: y_axis.x,
        }
    }
}

/// The writable camera fields.
///
/// Pass one to [`Camera::set_transform`](crate::Camera::set_transform) to
/// change several fields with a single recomputation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraTransform {
    /// Camera position.
    pub position: Point,
    /// Per-axis scale; `1.0` shows the viewport at its logical size.
    pub scale: Vec2,
    /// Fixed point for scaling and rotation, in viewport-local coordinates.
    pub pivot: Point,
    /// Shear angles in radians.
    pub skew: Vec2,
    /// Rotation in radians.
    pub rotation: f64,
}

impl Default for CameraTransform {
    fn default() -> Self {
        Self {
            position: Point::ORIGIN,
            scale: Vec2::new(1.0, 1.0),
            pivot: Point::ORIGIN,
            skew: Vec2::ZERO,
            rotation: 0.0,
        }
    }
}

/// Snapshot of a camera handed to change listeners.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraState {
    /// The writable fields.
    pub transform: CameraTransform,
    /// Logical viewport size.
    pub size: Size,
    /// Derived visible rectangle.
    pub frustum: Frustum,
    /// Derived rotation/skew basis.
    pub coefficients: Coefficients,
    /// Number of recomputations so far.
    pub revision: u64,
}
