// Copyright 2026 the Peloton Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Anchor and asset fixtures shared by unit tests.

use alloc::format;
use alloc::sync::Arc;

use kurbo::Point;

use crate::socket::AnchorSet;
use crate::terrain::{TerrainStep, TileAsset};

/// A straight tile running along +x, `len` long, centre marked.
pub(crate) fn straight(len: f64) -> AnchorSet {
    AnchorSet::new()
        .with("entry-point", Point::new(0.0, 0.0))
        .with("entry-dir", Point::new(10.0, 0.0))
        .with("exit-point", Point::new(len, 0.0))
        .with("exit-dir", Point::new(len + 10.0, 0.0))
        .with("center-point", Point::new(len / 2.0, 0.0))
}

/// A quarter turn to the right (clockwise on a y-down canvas).
pub(crate) fn right_turn() -> AnchorSet {
    AnchorSet::new()
        .with("entry-point", Point::new(0.0, 0.0))
        .with("entry-dir", Point::new(10.0, 0.0))
        .with("exit-point", Point::new(50.0, 50.0))
        .with("exit-dir", Point::new(50.0, 60.0))
        .with("center-point", Point::new(35.0, 15.0))
}

/// Adds a goal pair `key` straddling the track at local `x`.
pub(crate) fn with_goal(anchors: AnchorSet, key: &str, x: f64) -> AnchorSet {
    anchors
        .with(format!("goal-{key}"), Point::new(x, -20.0))
        .with(format!("goal-{key}b"), Point::new(x, 20.0))
}

/// An asset with no terrain steps.
pub(crate) fn asset(id: &str) -> Arc<TileAsset> {
    Arc::new(TileAsset::new(id))
}

/// An asset with the given terrain steps.
pub(crate) fn track_asset(id: &str, track: &[TerrainStep]) -> Arc<TileAsset> {
    Arc::new(TileAsset::new(id).with_track(track.iter().copied()))
}
