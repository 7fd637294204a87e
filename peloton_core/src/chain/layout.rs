// Copyright 2026 the Peloton Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Placement rules for the first tile and for successors.

use kurbo::Point;

use super::tile::PlacedTile;
use crate::geometry::Placement;
use crate::socket::Socket;

/// Configuration for the chain layout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutConfig {
    /// World point the first tile's entry is anchored to.
    pub origin: Point,
}

impl LayoutConfig {
    /// Anchors the course at the centre of the 4000×3000 editor stage.
    #[must_use]
    pub const fn stage() -> Self {
        Self {
            origin: Point::new(2000.0, 1500.0),
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::stage()
    }
}

/// Placement of the first tile: entry on the origin, zero rotation.
#[must_use]
pub fn first_placement(socket: &Socket, config: &LayoutConfig) -> Placement {
    Placement::anchored(socket.entry, config.origin, 0.0)
}

/// Placement of a tile following `prev`.
///
/// The rotation turns the new entry tangent onto the predecessor's world exit
/// tangent; the translation then lands the entry point on the predecessor's
/// world exit point.
#[must_use]
pub fn successor_placement(prev: &PlacedTile, socket: &Socket) -> Placement {
    let rotation = prev.world_exit_angle() - socket.entry_angle;
    Placement::anchored(socket.entry, prev.world_exit(), rotation)
}
