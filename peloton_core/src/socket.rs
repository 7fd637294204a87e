// Copyright 2026 the Peloton Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Anchors, sockets, and goal pairs.
//!
//! A tile drawing carries named anchor points. Four of them are mandatory and
//! define the tile's [`Socket`]: where the track enters and leaves, and the
//! tangent direction at each end. Goal anchors come in pairs and describe
//! chords a checkpoint can be attached to.
//!
//! Reading anchor coordinates out of a drawing is the job of an
//! [`AnchorSource`]; this module only turns named points into geometry.

use alloc::collections::BTreeMap;
use alloc::string::String;

use kurbo::{Point, Vec2};

use crate::chain::InstanceId;
use crate::error::PlacementError;

/// Anchor id prefix for goal anchors.
pub const GOAL_PREFIX: &str = "goal-";

/// Suffix marking the second point of a goal pair (`goal-3` / `goal-3b`).
pub const GOAL_SECOND_SUFFIX: char = 'b';

/// The fixed, non-goal anchors a tile drawing may carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnchorKind {
    /// Where the track enters the tile.
    EntryPoint,
    /// A point along the entry tangent.
    EntryDir,
    /// Where the track leaves the tile.
    ExitPoint,
    /// A point along the exit tangent.
    ExitDir,
    /// Optional visual centre, used to place the tile's label.
    Center,
}

impl AnchorKind {
    /// Anchors that must be present for a tile to be placeable.
    pub const REQUIRED: [Self; 4] = [
        Self::EntryPoint,
        Self::ExitPoint,
        Self::EntryDir,
        Self::ExitDir,
    ];

    /// Every fixed anchor kind.
    pub const ALL: [Self; 5] = [
        Self::EntryPoint,
        Self::EntryDir,
        Self::ExitPoint,
        Self::ExitDir,
        Self::Center,
    ];

    /// The element id used for this anchor in a tile drawing.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::EntryPoint => "entry-point",
            Self::EntryDir => "entry-dir",
            Self::ExitPoint => "exit-point",
            Self::ExitDir => "exit-dir",
            Self::Center => "center-point",
        }
    }
}

/// Returns whether an (unprefixed) element id names an editor-only anchor.
#[must_use]
pub fn is_helper_anchor(id: &str) -> bool {
    AnchorKind::ALL.iter().any(|kind| id == kind.id()) || id.starts_with(GOAL_PREFIX)
}

/// Supplies the anchors of one tile instance.
///
/// The chain calls this once per placement with a freshly allocated
/// [`InstanceId`], so implementations that namespace element ids can do so
/// per instance.
pub trait AnchorSource {
    /// Returns the anchors of the drawing instantiated as `instance`, keyed by
    /// their unprefixed ids.
    fn anchors(&self, instance: InstanceId) -> AnchorSet;
}

/// Named anchor points in tile-local coordinates.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnchorSet {
    points: BTreeMap<String, Point>,
}

impl AnchorSet {
    /// Creates an empty anchor set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an anchor, replacing any earlier point with the same id.
    pub fn insert(&mut self, id: impl Into<String>, point: Point) {
        self.points.insert(id.into(), point);
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, id: impl Into<String>, point: Point) -> Self {
        self.insert(id, point);
        self
    }

    /// Looks up an anchor by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Point> {
        self.points.get(id).copied()
    }

    /// Looks up a fixed anchor.
    #[must_use]
    pub fn get_kind(&self, kind: AnchorKind) -> Option<Point> {
        self.get(kind.id())
    }

    /// Number of anchors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the set has no anchors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterates anchors in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Point)> + '_ {
        self.points.iter().map(|(id, p)| (id.as_str(), *p))
    }

    /// Derives the tile's socket.
    ///
    /// # Errors
    ///
    /// Returns [`PlacementError::MissingAnchor`] naming the first required
    /// anchor that is absent.
    pub fn socket(&self) -> Result<Socket, PlacementError> {
        Socket::from_anchors(self)
    }

    /// Collects complete goal pairs. Pairs missing either endpoint are
    /// dropped.
    #[must_use]
    pub fn goal_pairs(&self) -> GoalPairs {
        let mut partial: BTreeMap<&str, (Option<Point>, Option<Point>)> = BTreeMap::new();
        for (id, point) in self.iter() {
            let Some(raw) = id.strip_prefix(GOAL_PREFIX) else {
                continue;
            };
            let (key, second) = match raw.strip_suffix(GOAL_SECOND_SUFFIX) {
                Some(key) => (key, true),
                None => (raw, false),
            };
            let slot = partial.entry(key).or_default();
            if second {
                slot.1 = Some(point);
            } else {
                slot.0 = Some(point);
            }
        }
        let pairs = partial
            .into_iter()
            .filter_map(|(key, slot)| match slot {
                (Some(a), Some(b)) => Some((String::from(key), GoalPair { a, b })),
                _ => None,
            })
            .collect();
        GoalPairs { pairs }
    }
}

impl AnchorSource for AnchorSet {
    fn anchors(&self, instance: InstanceId) -> AnchorSet {
        _ = instance;
        self.clone()
    }
}

/// Entry/exit contact geometry of a tile, in tile-local coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Socket {
    /// Entry point.
    pub entry: Point,
    /// Exit point.
    pub exit: Point,
    /// Tangent angle at the entry, in radians.
    pub entry_angle: f64,
    /// Tangent angle at the exit, in radians.
    pub exit_angle: f64,
    /// Visual centre, if the drawing marks one.
    pub center: Option<Point>,
}

impl Socket {
    /// Derives a socket from named anchors.
    ///
    /// Each tangent angle is the direction from the point anchor to its
    /// paired direction anchor.
    ///
    /// # Errors
    ///
    /// Returns [`PlacementError::MissingAnchor`] if any of
    /// [`AnchorKind::REQUIRED`] is absent.
    pub fn from_anchors(anchors: &AnchorSet) -> Result<Self, PlacementError> {
        let require = |kind: AnchorKind| {
            anchors
                .get_kind(kind)
                .ok_or(PlacementError::MissingAnchor(kind))
        };
        let entry = require(AnchorKind::EntryPoint)?;
        let exit = require(AnchorKind::ExitPoint)?;
        let entry_dir = require(AnchorKind::EntryDir)?;
        let exit_dir = require(AnchorKind::ExitDir)?;
        Ok(Self {
            entry,
            exit,
            entry_angle: (entry_dir - entry).atan2(),
            exit_angle: (exit_dir - exit).atan2(),
            center: anchors.get_kind(AnchorKind::Center),
        })
    }

    /// Vector from entry to exit.
    #[inline]
    #[must_use]
    pub fn chord(&self) -> Vec2 {
        self.exit - self.entry
    }

    /// Scalar projection of `p` onto the entry→exit chord, clamped to
    /// `[0, 1]`. A degenerate chord projects everything to 0.
    #[must_use]
    pub fn project_onto_chord(&self, p: Point) -> f64 {
        let v = self.chord();
        let w = p - self.entry;
        let len2 = v.hypot2();
        let denom = if len2 == 0.0 { 1.0 } else { len2 };
        (v.dot(w) / denom).clamp(0.0, 1.0)
    }
}

/// Two points on a tile defining a checkpoint-attachable chord.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GoalPair {
    /// First endpoint.
    pub a: Point,
    /// Second endpoint.
    pub b: Point,
}

impl GoalPair {
    /// Midpoint of the chord.
    #[inline]
    #[must_use]
    pub fn midpoint(&self) -> Point {
        self.a.midpoint(self.b)
    }
}

/// Goal pairs of one tile, keyed by goal name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GoalPairs {
    pairs: BTreeMap<String, GoalPair>,
}

impl GoalPairs {
    /// Looks up a pair by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&GoalPair> {
        self.pairs.get(key)
    }

    /// Whether a pair with this key exists.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.pairs.contains_key(key)
    }

    /// Goal keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.pairs.keys().map(String::as_str)
    }

    /// Iterates pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &GoalPair)> + '_ {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of complete pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether the tile has no goal pairs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Segment length class inferred from the numeric part of the goal keys.
    ///
    /// The largest leading integer among the keys is bucketed to one of the
    /// canonical lengths 6, 3, 2, or 0.
    #[must_use]
    pub fn length_class(&self) -> u32 {
        let longest = self.keys().filter_map(leading_integer).max().unwrap_or(0);
        match longest {
            6.. => 6,
            3.. => 3,
            2 => 2,
            _ => 0,
        }
    }
}

fn leading_integer(key: &str) -> Option<u32> {
    let digits = key
        .char_indices()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, c)| i + c.len_utf8())?;
    key[..digits].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::approx_eq;
    use core::f64::consts::{FRAC_PI_2, PI};

    fn straight() -> AnchorSet {
        AnchorSet::new()
            .with("entry-point", Point::new(0.0, 0.0))
            .with("entry-dir", Point::new(10.0, 0.0))
            .with("exit-point", Point::new(100.0, 0.0))
            .with("exit-dir", Point::new(110.0, 0.0))
    }

    #[test]
    fn socket_angles_follow_direction_anchors() {
        let anchors = AnchorSet::new()
            .with("entry-point", Point::new(0.0, 0.0))
            .with("entry-dir", Point::new(0.0, 5.0))
            .with("exit-point", Point::new(50.0, 50.0))
            .with("exit-dir", Point::new(40.0, 50.0));
        let socket = anchors.socket().unwrap();
        assert!(approx_eq(socket.entry_angle, FRAC_PI_2, 1e-12));
        assert!(approx_eq(socket.exit_angle, PI, 1e-12));
        assert_eq!(socket.center, None);
    }

    #[test]
    fn missing_anchor_is_reported() {
        let mut anchors = straight();
        anchors.points.remove("exit-dir");
        assert_eq!(
            anchors.socket(),
            Err(PlacementError::MissingAnchor(AnchorKind::ExitDir))
        );
    }

    #[test]
    fn center_is_optional() {
        let anchors = straight().with("center-point", Point::new(50.0, 20.0));
        assert_eq!(
            anchors.socket().unwrap().center,
            Some(Point::new(50.0, 20.0))
        );
    }

    #[test]
    fn goal_pairs_require_both_endpoints() {
        let anchors = straight()
            .with("goal-2", Point::new(10.0, -5.0))
            .with("goal-2b", Point::new(10.0, 5.0))
            .with("goal-6", Point::new(60.0, -5.0));
        let goals = anchors.goal_pairs();
        assert_eq!(goals.len(), 1);
        let pair = goals.get("2").unwrap();
        assert_eq!(pair.midpoint(), Point::new(10.0, 0.0));
        assert!(!goals.contains("6"));
    }

    #[test]
    fn length_class_buckets_largest_key() {
        let pair = |set: AnchorSet, key: &str| {
            set.with(alloc::format!("goal-{key}"), Point::ZERO)
                .with(alloc::format!("goal-{key}b"), Point::ZERO)
        };
        assert_eq!(straight().goal_pairs().length_class(), 0);
        assert_eq!(pair(straight(), "2").goal_pairs().length_class(), 2);
        assert_eq!(
            pair(pair(straight(), "2"), "4a").goal_pairs().length_class(),
            3
        );
        assert_eq!(pair(straight(), "9").goal_pairs().length_class(), 6);
        assert_eq!(pair(straight(), "x").goal_pairs().length_class(), 0);
    }

    #[test]
    fn chord_projection_clamps() {
        let socket = straight().socket().unwrap();
        assert!(approx_eq(
            socket.project_onto_chord(Point::new(50.0, 30.0)),
            0.5,
            1e-12
        ));
        assert_eq!(socket.project_onto_chord(Point::new(-20.0, 0.0)), 0.0);
        assert_eq!(socket.project_onto_chord(Point::new(500.0, 0.0)), 1.0);
    }

    #[test]
    fn helper_anchor_ids() {
        assert!(is_helper_anchor("entry-dir"));
        assert!(is_helper_anchor("goal-3b"));
        assert!(!is_helper_anchor("track-surface"));
    }
}
