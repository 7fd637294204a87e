// Copyright 2026 the Peloton Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tile metadata: terrain steps, statistics, and the tile asset record.

use alloc::string::String;
use alloc::vec::Vec;
use core::ops::{Add, AddAssign};

/// Suffix marking the back side of a double-sided tile.
pub const BACK_SIDE_SUFFIX: &str = "-upp";

/// One square of track, as listed in a tile's terrain-step sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TerrainStep {
    /// Level road.
    Flat,
    /// Climbing square.
    Ascent,
    /// Descending square.
    Descent,
    /// Supply zone.
    Supply,
    /// Cobblestones.
    Cobble,
    /// Slippery surface.
    Slippery,
    /// Decorative square; drawn but not counted as distance.
    Decorative,
    /// A token outside the known vocabulary; level and counted.
    Other,
}

impl TerrainStep {
    /// Parses a manifest token. Unknown tokens map to [`Other`](Self::Other).
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        match token {
            "flat" => Self::Flat,
            "asc" => Self::Ascent,
            "desc" => Self::Descent,
            "supply" => Self::Supply,
            "cobb" => Self::Cobble,
            "slip" => Self::Slippery,
            "yellow" => Self::Decorative,
            _ => Self::Other,
        }
    }

    /// Manifest token for this step.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Flat => "flat",
            Self::Ascent => "asc",
            Self::Descent => "desc",
            Self::Supply => "supply",
            Self::Cobble => "cobb",
            Self::Slippery => "slip",
            Self::Decorative => "yellow",
            Self::Other => "other",
        }
    }

    /// Vertical direction of the step: `1` up, `-1` down, `0` level.
    #[must_use]
    pub const fn rise(self) -> i32 {
        match self {
            Self::Ascent => 1,
            Self::Descent => -1,
            _ => 0,
        }
    }

    /// Whether the step counts towards the course distance.
    #[must_use]
    pub const fn is_counted(self) -> bool {
        !matches!(self, Self::Decorative)
    }
}

/// Colour theme of a tile's printed label.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Theme {
    /// Dark text on a light badge.
    #[default]
    Light,
    /// Light text on a dark badge.
    Dark,
}

impl Theme {
    /// Parses a manifest theme tag; anything but `dark` is light.
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        if token == "dark" { Self::Dark } else { Self::Light }
    }

    /// Manifest tag for this theme.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

/// Per-tile square counts by terrain kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct StatBundle {
    /// Flat squares.
    pub flat: u32,
    /// Ascent squares.
    pub asc: u32,
    /// Descent squares.
    pub desc: u32,
    /// Supply squares.
    pub supply: u32,
    /// Cobblestone squares.
    pub cobb: u32,
    /// Slippery squares.
    pub slip: u32,
}

impl Add for StatBundle {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl AddAssign for StatBundle {
    fn add_assign(&mut self, rhs: Self) {
        self.flat += rhs.flat;
        self.asc += rhs.asc;
        self.desc += rhs.desc;
        self.supply += rhs.supply;
        self.cobb += rhs.cobb;
        self.slip += rhs.slip;
    }
}

/// Immutable metadata of one tile asset.
///
/// The drawing itself lives outside the core; the chain only ever sees its
/// anchors through an [`AnchorSource`](crate::socket::AnchorSource).
#[derive(Clone, Debug, PartialEq)]
pub struct TileAsset {
    /// Manifest identifier, e.g. `"c"` or `"c-upp"`.
    pub id: String,
    /// Human label printed on the tile badge.
    pub label: String,
    /// Badge theme.
    pub theme: Theme,
    /// Ordered terrain steps. Empty for tiles that do not appear in the
    /// profile.
    pub track: Vec<TerrainStep>,
    /// Square counts per terrain kind.
    pub stats: StatBundle,
}

impl TileAsset {
    /// Creates an asset whose label equals its id, light theme, no track.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
            theme: Theme::Light,
            track: Vec::new(),
            stats: StatBundle::default(),
        }
    }

    /// Sets the label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Sets the theme.
    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Sets the terrain-step sequence.
    #[must_use]
    pub fn with_track(mut self, track: impl IntoIterator<Item = TerrainStep>) -> Self {
        self.track = track.into_iter().collect();
        self
    }

    /// Sets the statistics bundle.
    #[must_use]
    pub fn with_stats(mut self, stats: StatBundle) -> Self {
        self.stats = stats;
        self
    }

    /// Id with any back-side suffix removed. Both sides of a physical tile
    /// share this id.
    #[must_use]
    pub fn base_id(&self) -> &str {
        self.id.strip_suffix(BACK_SIDE_SUFFIX).unwrap_or(&self.id)
    }

    /// Whether this is the back side of a double-sided tile.
    #[must_use]
    pub fn is_back_side(&self) -> bool {
        self.id.ends_with(BACK_SIDE_SUFFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_round_trip_for_known_vocabulary() {
        for step in [
            TerrainStep::Flat,
            TerrainStep::Ascent,
            TerrainStep::Descent,
            TerrainStep::Supply,
            TerrainStep::Cobble,
            TerrainStep::Slippery,
            TerrainStep::Decorative,
        ] {
            assert_eq!(TerrainStep::from_token(step.token()), step);
        }
    }

    #[test]
    fn unknown_token_is_level_and_counted() {
        let step = TerrainStep::from_token("gravel");
        assert_eq!(step, TerrainStep::Other);
        assert_eq!(step.rise(), 0);
        assert!(step.is_counted());
    }

    #[test]
    fn decorative_is_not_counted() {
        assert!(!TerrainStep::Decorative.is_counted());
        assert_eq!(TerrainStep::Ascent.rise(), 1);
        assert_eq!(TerrainStep::Descent.rise(), -1);
    }

    #[test]
    fn stat_bundles_add() {
        let a = StatBundle {
            flat: 2,
            asc: 1,
            ..StatBundle::default()
        };
        let b = StatBundle {
            flat: 1,
            slip: 3,
            ..StatBundle::default()
        };
        let sum = a + b;
        assert_eq!(sum.flat, 3);
        assert_eq!(sum.asc, 1);
        assert_eq!(sum.slip, 3);
    }

    #[test]
    fn back_side_shares_base_id() {
        let front = TileAsset::new("c");
        let back = TileAsset::new("c-upp").with_theme(Theme::Dark);
        assert_eq!(front.base_id(), back.base_id());
        assert!(back.is_back_side());
        assert!(!front.is_back_side());
        assert_eq!(back.label, "c-upp");
    }
}
