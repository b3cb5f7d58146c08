// Copyright 2025 the Vantage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vantage Camera: a 2D camera that derives a world-space frustum.
//!
//! A [`Camera`] holds a position, per-axis scale, pivot, skew angles and a
//! rotation for a viewport of a given logical size. From those it derives:
//!
//! - the [`Frustum`], the visible rectangle in world coordinates:
//!   `x = position.x * scale.x + pivot.x`, `width = viewport width * scale.x`
//!   (and likewise for y);
//! - the rotation/skew [`Coefficients`] `cx, sx, cy, sy`;
//! - [`Camera::world_to_view`], the affine transform that puts world content on screen.
//!
//! Every setter recomputes synchronously, raises a frustum-changed flag that a
//! culling pass clears, and notifies listeners registered with
//! [`Camera::subscribe`]. Use [`Camera::set_transform`] to change several
//! fields with one recomputation.
//!
//! ```
//! use kurbo::{Point, Rect};
//! use vantage_camera::Camera;
//!
//! let mut camera = Camera::new(300.0, 300.0);
//! camera.set_position((20.0, 20.0));
//! assert_eq!(camera.frustum().rect(), Rect::new(20.0, 20.0, 320.0, 320.0));
//!
//! // Zoom about the middle of the view: anchor first, then scale.
//! camera.set_origin(camera.frustum_center())?;
//! camera.set_scale((2.0, 2.0));
//! assert_eq!(camera.pivot(), Point::new(170.0, 170.0));
//! # Ok::<(), vantage_camera::CameraError>(())
//! ```

#![no_std]

extern crate alloc;
#[cfg(test)]
extern crate std;

mod camera;
mod state;

pub use camera::{Camera, ListenerId};
pub use state::{CameraState, CameraTransform, Coefficients, Frustum};

/// Errors from camera operations that divide by the scale or invert the view.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum CameraError {
    /// A scale component is zero.
    #[error("camera scale ({x}, {y}) has a zero component")]
    DegenerateScale {
        /// Horizontal scale.
        x: f64,
        /// Vertical scale.
        y: f64,
    },
    /// Skew folds both view axes onto one line.
    #[error("camera skew makes the view transform singular")]
    Singular,
}
