// Copyright 2026 the Peloton Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for chain and checkpoint edits.
//!
//! Every failure here is local and recoverable: the course is left exactly
//! as it was before the rejected call.

use alloc::string::String;
use core::fmt;

use crate::socket::AnchorKind;

/// Why a tile could not be appended or swapped into the chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlacementError {
    /// The tile drawing lacks one of the required socket anchors.
    MissingAnchor(AnchorKind),
    /// A replace targeted a position past the end of the chain.
    IndexOutOfRange {
        /// Requested position.
        index: usize,
        /// Chain length at the time of the call.
        len: usize,
    },
}

impl fmt::Display for PlacementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingAnchor(kind) => {
                write!(f, "tile is missing its `{}` anchor", kind.id())
            }
            Self::IndexOutOfRange { index, len } => {
                write!(f, "tile index {index} out of range for chain of {len}")
            }
        }
    }
}

impl core::error::Error for PlacementError {}

/// Why a checkpoint could not be attached.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CheckpointError {
    /// No tile exists at the requested position.
    TileOutOfRange {
        /// Requested tile position.
        index: usize,
        /// Chain length at the time of the call.
        len: usize,
    },
    /// The tile exists but exposes no goal pair with this key.
    UnknownAnchor {
        /// Tile position that was searched.
        tile_index: usize,
        /// The key that was not found.
        key: String,
    },
}

impl fmt::Display for CheckpointError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TileOutOfRange { index, len } => {
                write!(f, "no tile at index {index} (chain has {len})")
            }
            Self::UnknownAnchor { tile_index, key } => {
                write!(f, "tile {tile_index} has no goal anchor `{key}`")
            }
        }
    }
}

impl core::error::Error for CheckpointError {}
