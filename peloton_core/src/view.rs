// Copyright 2026 the Peloton Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! View rotation/zoom and the camera that fits the course into the stage.

use kurbo::{Affine, Point, Rect};

use crate::chain::TileChain;

/// Rotation applied by one rotate-left/right step, in degrees.
pub const ROTATION_STEP_DEGREES: f64 = 15.0;

/// Factor applied by one zoom-in/out step.
pub const ZOOM_STEP: f64 = 1.1;

/// User-controlled view rotation and zoom.
///
/// Rotation is unbounded and accumulates; zoom multiplies the automatic fit
/// scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    /// View rotation, in degrees (clockwise on screen).
    pub rotation_degrees: f64,
    /// Manual zoom factor on top of the fit scale.
    pub zoom: f64,
}

impl ViewTransform {
    /// No rotation, unit zoom.
    pub const IDENTITY: Self = Self {
        rotation_degrees: 0.0,
        zoom: 1.0,
    };

    /// Creates a view from its parts. Non-finite or non-positive zoom falls
    /// back to 1.
    #[must_use]
    pub fn new(rotation_degrees: f64, zoom: f64) -> Self {
        Self {
            rotation_degrees: if rotation_degrees.is_finite() {
                rotation_degrees
            } else {
                0.0
            },
            zoom: if zoom.is_finite() && zoom > 0.0 {
                zoom
            } else {
                1.0
            },
        }
    }

    /// Adds `delta` degrees of rotation.
    pub fn rotate_by(&mut self, delta: f64) {
        self.rotation_degrees += delta;
    }

    /// Zooms in by one [`ZOOM_STEP`].
    pub fn zoom_in(&mut self) {
        self.zoom *= ZOOM_STEP;
    }

    /// Zooms out by one [`ZOOM_STEP`].
    pub fn zoom_out(&mut self) {
        self.zoom /= ZOOM_STEP;
    }

    /// Drops manual zoom so the course fits the stage again. Rotation is
    /// kept.
    pub fn fit(&mut self) {
        self.zoom = 1.0;
    }

    /// Back to [`IDENTITY`](Self::IDENTITY).
    pub fn reset(&mut self) {
        *self = Self::IDENTITY;
    }

    /// Rotation that keeps labels upright under this view.
    #[inline]
    #[must_use]
    pub fn upright_rotation_degrees(&self) -> f64 {
        -self.rotation_degrees
    }
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Stage dimensions and fit limits.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportConfig {
    /// Stage width in user units.
    pub width: f64,
    /// Stage height in user units.
    pub height: f64,
    /// Margin kept free on every side when fitting.
    pub padding: f64,
    /// Upper bound on the automatic fit scale, before zoom.
    pub max_fit_scale: f64,
}

impl ViewportConfig {
    /// The 4000×3000 editor stage.
    #[must_use]
    pub const fn stage() -> Self {
        Self {
            width: 4000.0,
            height: 3000.0,
            padding: 200.0,
            max_fit_scale: 2.5,
        }
    }

    /// Stage centre.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self::stage()
    }
}

/// Computes the camera transform that fits the course into the viewport.
///
/// The world-space tile centres are rotated by the view rotation about their
/// bounding-box centre; the rotated box is then scaled to fit inside the
/// padded viewport (capped at [`ViewportConfig::max_fit_scale`]), multiplied
/// by the view zoom, and centred. Tiles without a centre anchor are ignored;
/// with no centres at all the camera is the identity.
#[must_use]
pub fn camera_affine(chain: &TileChain, view: &ViewTransform, viewport: &ViewportConfig) -> Affine {
    let Some(bounds) = bounds_of(chain.iter().filter_map(|t| t.world_center())) else {
        return Affine::IDENTITY;
    };
    let c = bounds.center();
    let rotate_about_c = Affine::translate(c.to_vec2())
        * Affine::rotate(view.rotation_degrees.to_radians())
        * Affine::translate(-c.to_vec2());

    let rotated = bounds_of(
        chain
            .iter()
            .filter_map(|t| t.world_center())
            .map(|p| rotate_about_c * p),
    )
    .unwrap_or(bounds);
    let w = rotated.width().max(1.0);
    let h = rotated.height().max(1.0);
    let fit = ((viewport.width - viewport.padding * 2.0) / w)
        .min((viewport.height - viewport.padding * 2.0) / h)
        .min(viewport.max_fit_scale);
    let scale = fit * view.zoom;

    Affine::translate(viewport.center().to_vec2())
        * Affine::scale(scale)
        * Affine::translate(-rotated.center().to_vec2())
        * rotate_about_c
}

fn bounds_of(points: impl Iterator<Item = Point>) -> Option<Rect> {
    points.fold(None, |acc: Option<Rect>, p| {
        Some(match acc {
            Some(r) => r.union_pt(p),
            None => Rect::from_points(p, p),
        })
    })
}
