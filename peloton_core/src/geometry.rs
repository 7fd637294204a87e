// Copyright 2026 the Peloton Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rigid 2-D placement of tiles.
//!
//! Tiles are only ever rotated about their local origin and then translated,
//! so a full affine type is not needed for layout. [`Placement`] converts to
//! a [`kurbo::Affine`] when a renderer wants one.

use kurbo::{Affine, Point, Vec2};
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

/// Rotates `p` about the origin by `radians`.
///
/// Positive angles turn the x axis towards the y axis, which is clockwise on
/// a y-down canvas (matching SVG `rotate()`).
#[inline]
#[must_use]
pub fn rotate(p: Point, radians: f64) -> Point {
    let Vec2 { x: c, y: s } = Vec2::from_angle(radians);
    Point::new(p.x * c - p.y * s, p.x * s + p.y * c)
}

/// Wraps an angle into `(-π, π]`.
#[inline]
#[must_use]
pub fn normalize_angle(radians: f64) -> f64 {
    Vec2::from_angle(radians).atan2()
}

/// Returns whether `a` and `b` differ by at most `tolerance`.
#[inline]
#[must_use]
pub fn approx_eq(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() <= tolerance
}

/// World placement of a tile: rotate by `rotation`, then translate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    /// Translation applied after rotation.
    pub translation: Vec2,
    /// Rotation about the tile's local origin, in radians.
    pub rotation: f64,
}

impl Placement {
    /// No rotation, no translation.
    pub const IDENTITY: Self = Self {
        translation: Vec2::ZERO,
        rotation: 0.0,
    };

    /// Creates a placement from its parts.
    #[inline]
    #[must_use]
    pub const fn new(translation: Vec2, rotation: f64) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    /// Solves the translation that puts `local` exactly on `world` once the
    /// tile is rotated by `rotation`.
    #[inline]
    #[must_use]
    pub fn anchored(local: Point, world: Point, rotation: f64) -> Self {
        Self {
            translation: world - rotate(local, rotation),
            rotation,
        }
    }

    /// Maps a point from tile-local to world coordinates.
    #[inline]
    #[must_use]
    pub fn local_to_world(self, local: Point) -> Point {
        rotate(local, self.rotation) + self.translation
    }

    /// Rotation in degrees, as written into SVG transforms.
    #[inline]
    #[must_use]
    pub fn rotation_degrees(self) -> f64 {
        self.rotation.to_degrees()
    }

    /// Equivalent affine transform (`translate * rotate`).
    #[inline]
    #[must_use]
    pub fn to_affine(self) -> Affine {
        Affine::translate(self.translation) * Affine::rotate(self.rotation)
    }
}

impl Default for Placement {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}
