// Copyright 2026 the Peloton Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Catmull–Rom smoothing of the step polyline into cubic Béziers.

use alloc::vec::Vec;

use kurbo::{CubicBez, ParamCurve, Point};

/// A smooth curve through a sequence of knots with increasing x.
///
/// Each knot interval becomes one cubic whose inner control points come from
/// the Catmull–Rom tangent (`(p[i+1] - p[i-1]) / 6`), with control-point y
/// clamped to `[y_min, y_max]`.
#[derive(Clone, Debug, PartialEq)]
pub struct SmoothCurve {
    segments: Vec<CubicBez>,
    y_min: f64,
    y_max: f64,
    rest_y: f64,
}

impl SmoothCurve {
    /// Builds the curve. `rest_y` is returned by [`y_at`](Self::y_at) when
    /// there are fewer than two knots.
    #[must_use]
    pub fn through(knots: &[Point], y_min: f64, y_max: f64, rest_y: f64) -> Self {
        let n = knots.len().saturating_sub(1);
        let clamp_y = |p: Point| Point::new(p.x, p.y.clamp(y_min, y_max));
        let segments = (0..n)
            .map(|i| {
                let p0 = knots[i.saturating_sub(1)];
                let p1 = knots[i];
                let p2 = knots[i + 1];
                let p3 = knots[(i + 2).min(n)];
                let c1 = clamp_y(p1 + (p2 - p0) / 6.0);
                let c2 = clamp_y(p2 - (p3 - p1) / 6.0);
                CubicBez::new(p1, c1, c2, p2)
            })
            .collect();
        Self {
            segments,
            y_min,
            y_max,
            rest_y,
        }
    }

    /// The cubic segments, one per knot interval.
    #[must_use]
    pub fn segments(&self) -> &[CubicBez] {
        &self.segments
    }

    /// Curve height at `x`.
    ///
    /// The owning segment is the first whose end points bracket `x`; values
    /// left or right of the curve use the first or last segment. The segment
    /// parameter is taken linearly in x. The result is clamped to the band.
    #[must_use]
    pub fn y_at(&self, x: f64) -> f64 {
        let (Some(first), Some(last)) = (self.segments.first(), self.segments.last()) else {
            return self.rest_y;
        };
        let seg = self
            .segments
            .iter()
            .find(|s| x >= s.p0.x && x <= s.p3.x)
            .unwrap_or(if x < first.p0.x { first } else { last });
        let dx = seg.p3.x - seg.p0.x;
        let t = if dx == 0.0 { 0.0 } else { (x - seg.p0.x) / dx };
        seg.eval(t).y.clamp(self.y_min, self.y_max)
    }

    /// `samples + 1` evenly spaced points on the curve between `x0` and `x1`.
    #[must_use]
    pub fn sample(&self, x0: f64, x1: f64, samples: usize) -> Vec<Point> {
        let samples = samples.max(1);
        (0..=samples)
            .map(|j| {
                let x = x0 + (j as f64 / samples as f64) * (x1 - x0);
                Point::new(x, self.y_at(x))
            })
            .collect()
    }
}
