// Copyright 2026 the Peloton Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Checkpoint markers bound to goal pairs on placed tiles.
//!
//! A [`Checkpoint`] holds only `(tile index, anchor key)`; it never stores a
//! world position. Positions are re-resolved against the current chain every
//! time they are asked for, so a marker can never lag behind a relayout.
//! Checkpoints whose binding stops resolving after an edit are removed by
//! [`CheckpointProjector::prune`].

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use kurbo::Point;

use crate::chain::TileChain;
use crate::error::CheckpointError;
use crate::socket::GoalPair;
use crate::view::ViewTransform;

/// Marker colour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CheckpointColor {
    /// `#f8333c`.
    #[default]
    Red,
    /// `#6bbf59`.
    Green,
    /// `#00bbf9`.
    Blue,
    /// `#f5b700`.
    Yellow,
}

impl CheckpointColor {
    /// Every colour, in picker order.
    pub const ALL: [Self; 4] = [Self::Red, Self::Green, Self::Blue, Self::Yellow];

    /// Parses a colour tag. Unknown tags fall back to red.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "green" => Self::Green,
            "blue" => Self::Blue,
            "yellow" => Self::Yellow,
            _ => Self::Red,
        }
    }

    /// Colour tag used in saved courses.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Green => "green",
            Self::Blue => "blue",
            Self::Yellow => "yellow",
        }
    }

    /// CSS hex colour.
    #[must_use]
    pub const fn hex(self) -> &'static str {
        match self {
            Self::Red => "#f8333c",
            Self::Green => "#6bbf59",
            Self::Blue => "#00bbf9",
            Self::Yellow => "#f5b700",
        }
    }
}

/// Upper-cases a label and keeps at most two characters. Empty labels
/// become `"A"`.
#[must_use]
pub fn normalize_label(label: &str) -> String {
    if label.is_empty() {
        return "A".to_string();
    }
    label.to_uppercase().chars().take(2).collect()
}

/// A checkpoint, weakly bound to a tile by position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Checkpoint {
    /// Position of the owning tile in the chain.
    pub tile_index: usize,
    /// Goal key on that tile.
    pub anchor_key: String,
    /// Marker colour.
    pub color: CheckpointColor,
    /// Normalized display label.
    pub label: String,
}

impl Checkpoint {
    /// Resolves the checkpoint's goal pair in world coordinates, or `None`
    /// if the tile or anchor no longer exists.
    #[must_use]
    pub fn resolve(&self, chain: &TileChain) -> Option<GoalPair> {
        let tile = chain.get(self.tile_index)?;
        let pair = tile.goals().get(&self.anchor_key)?;
        Some(GoalPair {
            a: tile.local_to_world(pair.a),
            b: tile.local_to_world(pair.b),
        })
    }

    /// Resolves the checkpoint's goal pair in the owning tile's local
    /// coordinates.
    #[must_use]
    pub fn resolve_local(&self, chain: &TileChain) -> Option<GoalPair> {
        chain
            .get(self.tile_index)?
            .goals()
            .get(&self.anchor_key)
            .copied()
    }
}

/// A checkpoint resolved against the current chain and view, ready to draw.
#[derive(Clone, Debug, PartialEq)]
pub struct CheckpointMarker {
    /// Position in the projector's list.
    pub index: usize,
    /// First chord endpoint, world space.
    pub a: Point,
    /// Second chord endpoint, world space.
    pub b: Point,
    /// Chord midpoint, where the disc is drawn.
    pub position: Point,
    /// Counter-rotation that keeps the label upright under the view.
    pub rotation_degrees: f64,
    /// Marker colour.
    pub color: CheckpointColor,
    /// Display label.
    pub label: String,
}

/// Ordered list of checkpoints. Removal only happens at the end, or by
/// pruning.
#[derive(Clone, Debug, Default)]
pub struct CheckpointProjector {
    checkpoints: Vec<Checkpoint>,
}

impl CheckpointProjector {
    /// Creates an empty projector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of checkpoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    /// Whether there are no checkpoints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }

    /// Checkpoint at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Checkpoint> {
        self.checkpoints.get(index)
    }

    /// Iterates checkpoints in insertion order.
    pub fn iter(&self) -> core::slice::Iter<'_, Checkpoint> {
        self.checkpoints.iter()
    }

    /// Attaches a checkpoint to goal `anchor_key` of the tile at
    /// `tile_index`. Returns its position in the list.
    ///
    /// # Errors
    ///
    /// Returns [`CheckpointError::TileOutOfRange`] or
    /// [`CheckpointError::UnknownAnchor`] if the binding does not resolve;
    /// the list is left unchanged.
    pub fn add(
        &mut self,
        chain: &TileChain,
        tile_index: usize,
        anchor_key: &str,
        color: CheckpointColor,
        label: &str,
    ) -> Result<usize, CheckpointError> {
        let tile = chain.get(tile_index).ok_or(CheckpointError::TileOutOfRange {
            index: tile_index,
            len: chain.len(),
        })?;
        if !tile.goals().contains(anchor_key) {
            return Err(CheckpointError::UnknownAnchor {
                tile_index,
                key: anchor_key.to_string(),
            });
        }
        self.checkpoints.push(Checkpoint {
            tile_index,
            anchor_key: anchor_key.to_string(),
            color,
            label: normalize_label(label),
        });
        Ok(self.checkpoints.len() - 1)
    }

    /// Removes and returns the most recently added checkpoint.
    pub fn remove_last(&mut self) -> Option<Checkpoint> {
        self.checkpoints.pop()
    }

    /// Drops every checkpoint that no longer resolves against `chain` and
    /// returns them in their original order.
    pub fn prune(&mut self, chain: &TileChain) -> Vec<Checkpoint> {
        let mut pruned = Vec::new();
        self.checkpoints.retain(|cp| {
            if cp.resolve_local(chain).is_some() {
                true
            } else {
                pruned.push(cp.clone());
                false
            }
        });
        pruned
    }

    /// Removes every checkpoint.
    pub fn clear(&mut self) {
        self.checkpoints.clear();
    }

    /// Resolves one checkpoint into a drawable marker.
    #[must_use]
    pub fn marker_for(
        &self,
        chain: &TileChain,
        index: usize,
        view: &ViewTransform,
    ) -> Option<CheckpointMarker> {
        let cp = self.checkpoints.get(index)?;
        let pair = cp.resolve(chain)?;
        Some(CheckpointMarker {
            index,
            a: pair.a,
            b: pair.b,
            position: pair.midpoint(),
            rotation_degrees: view.upright_rotation_degrees(),
            color: cp.color,
            label: cp.label.clone(),
        })
    }

    /// Re-resolves every checkpoint against the current chain and view.
    ///
    /// Checkpoints that no longer resolve are skipped; call
    /// [`prune`](Self::prune) after structural edits to drop them.
    #[must_use]
    pub fn recompute_positions(
        &self,
        chain: &TileChain,
        view: &ViewTransform,
    ) -> Vec<CheckpointMarker> {
        (0..self.checkpoints.len())
            .filter_map(|i| self.marker_for(chain, i, view))
            .collect()
    }
}

impl<'a> IntoIterator for &'a CheckpointProjector {
    type Item = &'a Checkpoint;
    type IntoIter = core::slice::Iter<'a, Checkpoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.checkpoints.iter()
    }
}
