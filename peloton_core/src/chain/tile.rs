// Copyright 2026 the Peloton Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Placed tile record.

use alloc::sync::Arc;

use kurbo::Point;

use super::id::InstanceId;
use crate::geometry::Placement;
use crate::socket::{GoalPairs, Socket};
use crate::terrain::TileAsset;

/// One tile in the chain.
///
/// Exclusively owned by [`TileChain`](super::TileChain). Only
/// [`placement`](Self::placement) and [`index`](Self::index) change after
/// creation, and only during a relayout cascade.
#[derive(Clone, Debug)]
pub struct PlacedTile {
    pub(crate) index: usize,
    pub(crate) instance: InstanceId,
    pub(crate) socket: Socket,
    pub(crate) goals: GoalPairs,
    pub(crate) placement: Placement,
    pub(crate) asset: Arc<TileAsset>,
}

impl PlacedTile {
    /// Current position in the chain.
    #[inline]
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Instance id used to namespace this placement's drawing.
    #[inline]
    #[must_use]
    pub fn instance(&self) -> InstanceId {
        self.instance
    }

    /// Entry/exit geometry in tile-local coordinates.
    #[inline]
    #[must_use]
    pub fn socket(&self) -> &Socket {
        &self.socket
    }

    /// Goal pairs in tile-local coordinates.
    #[inline]
    #[must_use]
    pub fn goals(&self) -> &GoalPairs {
        &self.goals
    }

    /// World placement.
    #[inline]
    #[must_use]
    pub fn placement(&self) -> Placement {
        self.placement
    }

    /// The asset this tile was built from.
    #[inline]
    #[must_use]
    pub fn asset(&self) -> &Arc<TileAsset> {
        &self.asset
    }

    /// Maps a tile-local point into world space.
    #[inline]
    #[must_use]
    pub fn local_to_world(&self, local: Point) -> Point {
        self.placement.local_to_world(local)
    }

    /// World position of the entry point.
    #[must_use]
    pub fn world_entry(&self) -> Point {
        self.local_to_world(self.socket.entry)
    }

    /// World position of the exit point.
    #[must_use]
    pub fn world_exit(&self) -> Point {
        self.local_to_world(self.socket.exit)
    }

    /// World tangent angle at the entry, in radians.
    #[must_use]
    pub fn world_entry_angle(&self) -> f64 {
        self.placement.rotation + self.socket.entry_angle
    }

    /// World tangent angle at the exit, in radians.
    #[must_use]
    pub fn world_exit_angle(&self) -> f64 {
        self.placement.rotation + self.socket.exit_angle
    }

    /// World position of the visual centre, if the drawing has one.
    #[must_use]
    pub fn world_center(&self) -> Option<Point> {
        self.socket.center.map(|c| self.local_to_world(c))
    }
}
