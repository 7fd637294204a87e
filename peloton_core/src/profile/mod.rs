// Copyright 2026 the Peloton Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Elevation profile: a smooth curve over every terrain step of the course,
//! with start, finish, and checkpoint markers carrying distance counts.
//!
//! The profile is rebuilt from scratch on every call to [`build`]; nothing
//! here is cached across chain edits.
//!
//! # Layout
//!
//! Only tiles with a non-empty terrain track take part. Each gets a
//! horizontal span proportional to its step count, and each step a equal
//! share of its tile's span. Ascents move the curve up by a single global
//! rise, descents move it down; the rise is chosen so the walk stays inside
//! the vertical band with its resting level near the bottom.
//!
//! # Distance counts
//!
//! Counts start at 0 at the start marker. Every non-decorative step adds
//! one, so the finish shows the total. A checkpoint shows the number of
//! counted steps that end at or before its x position.

mod curve;
mod markers;

pub use curve::SmoothCurve;
pub use markers::{CountLabel, MarkerKind, ProfileMarker, dedupe_counts};

use alloc::string::ToString;
use alloc::vec::Vec;

use kurbo::Point;

use crate::chain::TileChain;
use crate::checkpoint::CheckpointProjector;
use crate::terrain::TerrainStep;

/// Tolerance used when comparing x positions against step boundaries.
const X_EPSILON: f64 = 1e-9;

/// Profile frame geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProfileConfig {
    /// Frame width.
    pub width: f64,
    /// Frame height.
    pub height: f64,
    /// Inset on every side.
    pub inner_pad: f64,
    /// Top of the vertical band, as a fraction of the inner height.
    pub band_top: f64,
    /// Bottom of the vertical band, as a fraction of the inner height.
    pub band_bottom: f64,
    /// Resting level, as a fraction of the band measured from its top.
    pub baseline_bias: f64,
    /// Largest rise per step, as a fraction of the band height.
    pub max_rise_fraction: f64,
    /// Distance of the count baseline below the band.
    pub count_baseline_offset: f64,
    /// Minimum gap between the count baseline and the inner bottom edge.
    pub count_bottom_margin: f64,
}

impl ProfileConfig {
    /// Smallest frame [`with_size`](Self::with_size) will produce.
    pub const MIN_SIZE: (f64, f64) = (320.0, 140.0);

    /// The 800×200 editor panel.
    #[must_use]
    pub const fn panel() -> Self {
        Self {
            width: 800.0,
            height: 200.0,
            inner_pad: 8.0,
            band_top: 0.18,
            band_bottom: 0.85,
            baseline_bias: 0.8,
            max_rise_fraction: 1.0 / 30.0,
            count_baseline_offset: 30.0,
            count_bottom_margin: 8.0,
        }
    }

    /// The panel preset resized, never below [`MIN_SIZE`](Self::MIN_SIZE).
    #[must_use]
    pub fn with_size(width: f64, height: f64) -> Self {
        Self {
            width: width.max(Self::MIN_SIZE.0),
            height: height.max(Self::MIN_SIZE.1),
            ..Self::panel()
        }
    }

    /// Inner frame width (at least 1).
    #[must_use]
    pub fn inner_width(&self) -> f64 {
        (self.width - self.inner_pad * 2.0).max(1.0)
    }

    /// Inner frame height (at least 1).
    #[must_use]
    pub fn inner_height(&self) -> f64 {
        (self.height - self.inner_pad * 2.0).max(1.0)
    }

    /// Top of the vertical band (smallest y the curve reaches).
    #[must_use]
    pub fn y_min(&self) -> f64 {
        self.inner_pad + self.inner_height() * self.band_top
    }

    /// Bottom of the vertical band (largest y the curve reaches).
    #[must_use]
    pub fn y_max(&self) -> f64 {
        self.inner_pad + self.inner_height() * self.band_bottom
    }

    /// Resting level of the curve.
    #[must_use]
    pub fn baseline_y(&self) -> f64 {
        let y_min = self.y_min();
        y_min + (self.y_max() - y_min) * self.baseline_bias
    }

    /// Height at which distance numbers are printed.
    #[must_use]
    pub fn count_y(&self) -> f64 {
        (self.inner_pad + self.inner_height() - self.count_bottom_margin)
            .min(self.y_max() + self.count_baseline_offset)
    }

    /// Clamps `x` into the inner frame.
    #[must_use]
    pub fn clamp_x(&self, x: f64) -> f64 {
        x.clamp(self.inner_pad, self.inner_pad + self.inner_width())
    }
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self::panel()
    }
}

/// Horizontal extent allotted to one tile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileSpan {
    /// Chain position of the tile.
    pub tile_index: usize,
    /// Left edge.
    pub x0: f64,
    /// Right edge.
    pub x1: f64,
}

impl TileSpan {
    /// Width of the span.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    /// Maps a fraction in `[0, 1]` to an x position in the span.
    #[must_use]
    pub fn lerp(&self, t: f64) -> f64 {
        self.x0 + t * self.width()
    }
}

/// One terrain step as a straight segment of the unsmoothed profile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProfileStep {
    /// Chain position of the owning tile.
    pub tile_index: usize,
    /// Position within the tile's track.
    pub index_in_tile: usize,
    /// Terrain kind.
    pub kind: TerrainStep,
    /// Left x.
    pub x0: f64,
    /// Right x.
    pub x1: f64,
    /// Height at the left end.
    pub y0: f64,
    /// Height at the right end.
    pub y1: f64,
}

/// A built profile with at least one step.
#[derive(Clone, Debug, PartialEq)]
pub struct ProfileCurve {
    config: ProfileConfig,
    spans: Vec<TileSpan>,
    steps: Vec<ProfileStep>,
    cumulative: Vec<u32>,
    rise: f64,
    curve: SmoothCurve,
    markers: Vec<ProfileMarker>,
    count_labels: Vec<CountLabel>,
}

impl ProfileCurve {
    /// Frame configuration the profile was built with.
    #[must_use]
    pub fn config(&self) -> &ProfileConfig {
        &self.config
    }

    /// Tile spans, left to right.
    #[must_use]
    pub fn spans(&self) -> &[TileSpan] {
        &self.spans
    }

    /// Flattened steps, left to right.
    #[must_use]
    pub fn steps(&self) -> &[ProfileStep] {
        &self.steps
    }

    /// Running distance count: `cumulative()[i]` is the number of counted
    /// steps among the first `i`. Has one more entry than
    /// [`steps`](Self::steps).
    #[must_use]
    pub fn cumulative(&self) -> &[u32] {
        &self.cumulative
    }

    /// Total number of counted steps.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.cumulative.last().copied().unwrap_or(0)
    }

    /// Height change applied by one ascent or descent.
    #[must_use]
    pub fn rise(&self) -> f64 {
        self.rise
    }

    /// The smoothed curve.
    #[must_use]
    pub fn curve(&self) -> &SmoothCurve {
        &self.curve
    }

    /// Curve height at `x`.
    #[must_use]
    pub fn y_at(&self, x: f64) -> f64 {
        self.curve.y_at(x)
    }

    /// Distance count at `x`: counted steps ending at or before `x`.
    #[must_use]
    pub fn count_at(&self, x: f64) -> u32 {
        let k = self.steps.partition_point(|s| s.x1 <= x + X_EPSILON);
        self.cumulative[k]
    }

    /// Start, finish, then checkpoint markers.
    #[must_use]
    pub fn markers(&self) -> &[ProfileMarker] {
        &self.markers
    }

    /// De-duplicated distance numbers, sorted by x.
    #[must_use]
    pub fn count_labels(&self) -> &[CountLabel] {
        &self.count_labels
    }

    /// Samples the smoothed curve across step `index`.
    #[must_use]
    pub fn sample_step(&self, index: usize, samples: usize) -> Vec<Point> {
        self.steps
            .get(index)
            .map(|s| self.curve.sample(s.x0, s.x1, samples))
            .unwrap_or_default()
    }

    /// Closed outline of the area between the curve and the count baseline.
    #[must_use]
    pub fn area_outline(&self, samples_per_step: usize) -> Vec<Point> {
        let mut outline: Vec<Point> = (0..self.steps.len())
            .flat_map(|i| self.sample_step(i, samples_per_step))
            .collect();
        if let (Some(first), Some(last)) = (self.steps.first(), self.steps.last()) {
            let count_y = self.config.count_y();
            outline.push(Point::new(last.x1, count_y));
            outline.push(Point::new(first.x0, count_y));
        }
        outline
    }
}

/// Result of [`build`].
#[derive(Clone, Debug, PartialEq)]
pub enum Profile {
    /// No tile has terrain steps; show a placeholder instead of a curve.
    Placeholder,
    /// A curve with markers.
    Curve(ProfileCurve),
}

impl Profile {
    /// Whether this is the placeholder state.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder)
    }

    /// The curve, unless this is the placeholder.
    #[must_use]
    pub fn as_curve(&self) -> Option<&ProfileCurve> {
        match self {
            Self::Placeholder => None,
            Self::Curve(curve) => Some(curve),
        }
    }

    /// Total distance; zero for the placeholder.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.as_curve().map_or(0, ProfileCurve::total)
    }
}

/// Builds the elevation profile of the current chain and checkpoints.
#[must_use]
pub fn build(chain: &TileChain, checkpoints: &CheckpointProjector, config: &ProfileConfig) -> Profile {
    let tiles: Vec<_> = chain.iter().filter(|t| !t.asset().track.is_empty()).collect();
    if tiles.is_empty() {
        return Profile::Placeholder;
    }

    let total_len: usize = tiles.iter().map(|t| t.asset().track.len()).sum();
    let inner_w = config.inner_width();
    let mut cursor = config.inner_pad;
    let spans: Vec<TileSpan> = tiles
        .iter()
        .map(|t| {
            let w = inner_w * (t.asset().track.len() as f64 / total_len as f64);
            let span = TileSpan {
                tile_index: t.index(),
                x0: cursor,
                x1: cursor + w,
            };
            cursor += w;
            span
        })
        .collect();

    let rise = global_rise(tiles.iter().flat_map(|t| t.asset().track.iter().copied()), config);
    let (y_min, y_max) = (config.y_min(), config.y_max());
    let mut y = config.baseline_y();
    let mut steps = Vec::with_capacity(total_len);
    for (tile, span) in tiles.iter().zip(&spans) {
        let track = &tile.asset().track;
        let k = track.len() as f64;
        for (i, &kind) in track.iter().enumerate() {
            let y0 = y;
            let y1 = (y0 - f64::from(kind.rise()) * rise).clamp(y_min, y_max);
            y = y1;
            steps.push(ProfileStep {
                tile_index: tile.index(),
                index_in_tile: i,
                kind,
                x0: span.lerp(i as f64 / k),
                x1: span.lerp((i + 1) as f64 / k),
                y0,
                y1,
            });
        }
    }

    let mut cumulative = Vec::with_capacity(steps.len() + 1);
    cumulative.push(0_u32);
    for s in &steps {
        let prev = cumulative.last().copied().unwrap_or(0);
        cumulative.push(prev + u32::from(s.kind.is_counted()));
    }

    let knots: Vec<Point> = steps
        .first()
        .map(|s| Point::new(s.x0, s.y0))
        .into_iter()
        .chain(steps.iter().map(|s| Point::new(s.x1, s.y1)))
        .collect();
    let curve = SmoothCurve::through(&knots, y_min, y_max, config.baseline_y());

    let mut profile = ProfileCurve {
        config: *config,
        spans,
        steps,
        cumulative,
        rise,
        curve,
        markers: Vec::new(),
        count_labels: Vec::new(),
    };
    profile.markers = place_markers(&profile, chain, checkpoints);
    profile.count_labels = dedupe_counts(&profile.markers);
    Profile::Curve(profile)
}

/// The single rise per step that keeps the walk inside the band.
fn global_rise(track: impl Iterator<Item = TerrainStep>, config: &ProfileConfig) -> f64 {
    let (mut acc, mut min_acc, mut max_acc) = (0_i32, 0_i32, 0_i32);
    for step in track {
        acc += step.rise();
        min_acc = min_acc.min(acc);
        max_acc = max_acc.max(acc);
    }
    let (y_min, y_max) = (config.y_min(), config.y_max());
    let base = config.baseline_y();
    let cap_above = (base - y_min).max(1.0);
    let cap_below = (y_max - base).max(1.0);
    let need_above = f64::from(max_acc.max(1));
    let need_below = f64::from((-min_acc).max(1));
    let max_rise = (y_max - y_min) * config.max_rise_fraction;
    (cap_above / need_above).min(cap_below / need_below).min(max_rise)
}

fn place_markers(
    profile: &ProfileCurve,
    chain: &TileChain,
    checkpoints: &CheckpointProjector,
) -> Vec<ProfileMarker> {
    let config = &profile.config;
    let steps = &profile.steps;
    let marker = |kind, x: f64, label: &str, count| {
        let x = config.clamp_x(x);
        ProfileMarker {
            kind,
            x,
            y: profile.y_at(x),
            label: label.to_string(),
            count,
        }
    };

    let start = steps.iter().position(|s| s.kind.is_counted()).unwrap_or(0);
    let finish = steps
        .iter()
        .rposition(|s| s.kind.is_counted())
        .unwrap_or(steps.len() - 1);
    let mut out = Vec::with_capacity(2 + checkpoints.len());
    out.push(marker(MarkerKind::Start, steps[start].x0, "S", 0));
    out.push(marker(MarkerKind::Finish, steps[finish].x1, "F", profile.total()));

    for (index, cp) in checkpoints.iter().enumerate() {
        let Some(span) = profile.spans.iter().find(|s| s.tile_index == cp.tile_index) else {
            continue;
        };
        let (Some(tile), Some(pair)) = (chain.get(cp.tile_index), cp.resolve_local(chain)) else {
            continue;
        };
        let t = tile.socket().project_onto_chord(pair.midpoint());
        let x = config.clamp_x(span.lerp(t));
        let kind = MarkerKind::Checkpoint {
            index,
            color: cp.color,
        };
        out.push(marker(kind, x, &cp.label, profile.count_at(x)));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkpoint::CheckpointColor;
    use crate::geometry::approx_eq;
    use crate::test_support::{asset, straight, track_asset, with_goal};
    use crate::terrain::TerrainStep::{Ascent, Decorative, Descent, Flat};

    fn curve(profile: &Profile) -> &ProfileCurve {
        profile.as_curve().expect("profile should have a curve")
    }

    fn scenario_b() -> TileChain {
        let mut chain = TileChain::default();
        chain.append(track_asset("a", &[Flat]), &straight(100.0)).unwrap();
        chain
            .append(
                track_asset("b", &[Ascent, Ascent]),
                &with_goal(straight(100.0), "2", 50.0),
            )
            .unwrap();
        chain.append(track_asset("c", &[Descent]), &straight(100.0)).unwrap();
        chain
    }

    #[test]
    fn empty_course_is_placeholder() {
        let profile = build(&TileChain::default(), &CheckpointProjector::new(), &ProfileConfig::default());
        assert!(profile.is_placeholder());
        assert_eq!(profile.total(), 0);
    }

    #[test]
    fn tiles_without_track_are_skipped() {
        let mut chain = TileChain::default();
        chain.append(asset("deco"), &straight(100.0)).unwrap();
        let profile = build(&chain, &CheckpointProjector::new(), &ProfileConfig::default());
        assert!(profile.is_placeholder());

        chain.append(track_asset("a", &[Flat, Flat]), &straight(100.0)).unwrap();
        let profile = build(&chain, &CheckpointProjector::new(), &ProfileConfig::default());
        let p = curve(&profile);
        assert_eq!(p.spans().len(), 1);
        assert_eq!(p.spans()[0].tile_index, 1);
        assert!(approx_eq(p.spans()[0].x0, 8.0, 1e-12));
        assert!(approx_eq(p.spans()[0].x1, 792.0, 1e-12));
    }

    #[test]
    fn three_tiles_flatten_to_four_steps() {
        let chain = scenario_b();
        let profile = build(&chain, &CheckpointProjector::new(), &ProfileConfig::default());
        let p = curve(&profile);
        assert_eq!(p.steps().len(), 4);
        assert_eq!(p.cumulative(), &[0, 1, 2, 3, 4]);
        assert_eq!(p.total(), 4);

        let finish = &p.markers()[1];
        assert_eq!(finish.kind, MarkerKind::Finish);
        assert_eq!(finish.count, 4);
        assert_eq!(finish.label, "F");
        let start = &p.markers()[0];
        assert_eq!(start.count, 0);
        assert!(approx_eq(start.x, 8.0, 1e-12));
    }

    #[test]
    fn spans_are_proportional() {
        let chain = scenario_b();
        let profile = build(&chain, &CheckpointProjector::new(), &ProfileConfig::default());
        let widths: Vec<f64> = curve(&profile).spans().iter().map(TileSpan::width).collect();
        assert!(approx_eq(widths[0], 196.0, 1e-9));
        assert!(approx_eq(widths[1], 392.0, 1e-9));
        assert!(approx_eq(widths[2], 196.0, 1e-9));
    }

    #[test]
    fn ascents_climb_and_descents_fall() {
        let chain = scenario_b();
        let config = ProfileConfig::default();
        let profile = build(&chain, &CheckpointProjector::new(), &config);
        let p = curve(&profile);
        let ys: Vec<f64> = p.steps().iter().map(|s| s.y1).collect();
        assert!(approx_eq(ys[0], config.baseline_y(), 1e-12));
        assert!(ys[1] < ys[0]);
        assert!(ys[2] < ys[1]);
        assert!(ys[3] > ys[2]);
        assert!(approx_eq(ys[0] - ys[1], p.rise(), 1e-12));
    }

    #[test]
    fn checkpoint_at_chord_midpoint_counts_half_tile() {
        let chain = scenario_b();
        let mut cps = CheckpointProjector::new();
        cps.add(&chain, 1, "2", CheckpointColor::Blue, "k").unwrap();
        let profile = build(&chain, &cps, &ProfileConfig::default());
        let p = curve(&profile);
        let m = &p.markers()[2];
        assert!(approx_eq(m.x, 400.0, 1e-9));
        // One step from the first tile plus half of the second tile's two.
        assert_eq!(m.count, 2);
        assert_eq!(m.label, "K");
        assert_eq!(
            m.kind,
            MarkerKind::Checkpoint {
                index: 0,
                color: CheckpointColor::Blue
            }
        );
    }

    #[test]
    fn checkpoint_on_trackless_tile_has_no_marker() {
        let mut chain = TileChain::default();
        chain.append(track_asset("a", &[Flat]), &straight(100.0)).unwrap();
        chain
            .append(asset("deco"), &with_goal(straight(100.0), "2", 50.0))
            .unwrap();
        let mut cps = CheckpointProjector::new();
        cps.add(&chain, 1, "2", CheckpointColor::Red, "A").unwrap();
        let profile = build(&chain, &cps, &ProfileConfig::default());
        assert_eq!(curve(&profile).markers().len(), 2);
    }

    #[test]
    fn counts_are_monotonic_and_skip_decorative() {
        let mut chain = TileChain::default();
        chain
            .append(
                track_asset("a", &[Decorative, Flat, Ascent, Decorative, Descent, Decorative]),
                &straight(100.0),
            )
            .unwrap();
        let profile = build(&chain, &CheckpointProjector::new(), &ProfileConfig::default());
        let p = curve(&profile);
        assert!(p.cumulative().windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(p.total(), 3);
        // Start and finish sit on the first and last counted steps.
        assert!(approx_eq(p.markers()[0].x, p.steps()[1].x0, 1e-12));
        assert!(approx_eq(p.markers()[1].x, p.steps()[4].x1, 1e-12));
        assert_eq!(p.markers()[1].count, 3);

        let mut last = 0;
        for i in 0..=100_i32 {
            let x = 8.0 + f64::from(i) * 7.84;
            let c = p.count_at(x);
            assert!(c >= last, "count fell at x = {x}");
            last = c;
        }
        assert_eq!(last, 3);
    }

    #[test]
    fn steep_climbs_stay_in_band() {
        let mut chain = TileChain::default();
        chain
            .append(track_asset("wall", &[Ascent; 80]), &straight(100.0))
            .unwrap();
        let config = ProfileConfig::default();
        let profile = build(&chain, &CheckpointProjector::new(), &config);
        let p = curve(&profile);
        for s in p.steps() {
            assert!(s.y1 >= config.y_min() - 1e-9 && s.y1 <= config.y_max() + 1e-9);
        }
        for i in 0..p.steps().len() {
            for pt in p.sample_step(i, 8) {
                assert!(pt.y >= config.y_min() - 1e-9 && pt.y <= config.y_max() + 1e-9);
            }
        }
    }

    #[test]
    fn rise_capped_by_band_fraction() {
        let mut chain = TileChain::default();
        chain.append(track_asset("bump", &[Ascent]), &straight(100.0)).unwrap();
        let config = ProfileConfig::default();
        let profile = build(&chain, &CheckpointProjector::new(), &config);
        let band = config.y_max() - config.y_min();
        assert!(approx_eq(curve(&profile).rise(), band / 30.0, 1e-12));
    }

    #[test]
    fn count_labels_dedupe_start_and_checkpoint() {
        let mut chain = TileChain::default();
        chain
            .append(
                track_asset("a", &[Flat, Flat]),
                &with_goal(straight(100.0), "2", 0.0),
            )
            .unwrap();
        let mut cps = CheckpointProjector::new();
        cps.add(&chain, 0, "2", CheckpointColor::Red, "A").unwrap();
        let profile = build(&chain, &cps, &ProfileConfig::default());
        let p = curve(&profile);
        assert_eq!(p.markers().len(), 3);
        assert_eq!(p.markers()[2].count, 0);
        assert_eq!(
            p.count_labels(),
            &[
                CountLabel { x: 8.0, count: 0 },
                CountLabel { x: 792.0, count: 2 }
            ]
        );
    }

    #[test]
    fn with_size_clamps_small_frames() {
        let config = ProfileConfig::with_size(100.0, 50.0);
        assert_eq!((config.width, config.height), ProfileConfig::MIN_SIZE);
        let config = ProfileConfig::with_size(1200.0, 300.0);
        assert_eq!(config.width, 1200.0);
        assert!(config.count_y() <= config.inner_pad + config.inner_height());
    }

    #[test]
    fn area_outline_closes_on_baseline() {
        let chain = scenario_b();
        let config = ProfileConfig::default();
        let profile = build(&chain, &CheckpointProjector::new(), &config);
        let outline = curve(&profile).area_outline(8);
        assert_eq!(outline.len(), 4 * 9 + 2);
        let n = outline.len();
        assert_eq!(outline[n - 1], Point::new(8.0, config.count_y()));
        assert!(approx_eq(outline[n - 2].x, 792.0, 1e-9));
    }
}
