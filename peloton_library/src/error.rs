// Copyright 2026 the Peloton Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type for the tile library, save files, and the editor session.

use std::fmt;
use std::path::PathBuf;

use peloton_core::error::{CheckpointError, PlacementError};
use peloton_svg::SvgError;

/// Errors from loading tiles, reading saves, or editing through a session.
#[derive(Debug)]
pub enum LibraryError {
    /// A file could not be read.
    Io {
        /// The file involved.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },
    /// Manifest or save JSON is malformed.
    Json(serde_json::Error),
    /// A tile drawing could not be parsed.
    Svg {
        /// Manifest id of the tile.
        tile_id: String,
        /// The underlying error.
        source: SvgError,
    },
    /// No tile with this id is in the library.
    UnknownTile(String),
    /// A manifest lists the same id twice; the first entry wins.
    DuplicateTile(String),
    /// The save was written by a format version this build cannot read.
    UnsupportedVersion {
        /// Version found in the file.
        found: u32,
        /// Version this build reads and writes.
        supported: u32,
    },
    /// The course refused a tile.
    Placement(PlacementError),
    /// The course refused a checkpoint.
    Checkpoint(CheckpointError),
}

impl fmt::Display for LibraryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "cannot read {}: {source}", path.display()),
            Self::Json(e) => write!(f, "malformed JSON: {e}"),
            Self::Svg { tile_id, source } => write!(f, "tile {tile_id:?}: {source}"),
            Self::UnknownTile(id) => write!(f, "unknown tile {id:?}"),
            Self::DuplicateTile(id) => write!(f, "tile {id:?} is listed more than once"),
            Self::UnsupportedVersion { found, supported } => write!(
                f,
                "save format v{found} is not supported (this build reads v{supported})"
            ),
            Self::Placement(e) => write!(f, "{e}"),
            Self::Checkpoint(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for LibraryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json(e) => Some(e),
            Self::Svg { source, .. } => Some(source),
            Self::Placement(e) => Some(e),
            Self::Checkpoint(e) => Some(e),
            Self::UnknownTile(_) | Self::DuplicateTile(_) | Self::UnsupportedVersion { .. } => None,
        }
    }
}

impl From<serde_json::Error> for LibraryError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl From<PlacementError> for LibraryError {
    fn from(e: PlacementError) -> Self {
        Self::Placement(e)
    }
}

impl From<CheckpointError> for LibraryError {
    fn from(e: CheckpointError) -> Self {
        Self::Checkpoint(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn display_messages() {
        let e = LibraryError::UnsupportedVersion {
            found: 7,
            supported: 1,
        };
        let msg = e.to_string();
        assert!(msg.contains("v7"), "got: {msg}");
        assert!(msg.contains("v1"), "got: {msg}");
        assert_eq!(
            LibraryError::UnknownTile("q".into()).to_string(),
            "unknown tile \"q\""
        );
    }

    #[test]
    fn io_error_has_source() {
        let e = LibraryError::Io {
            path: PathBuf::from("tiles/tiles.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(e.source().is_some());
        assert!(e.to_string().starts_with("cannot read tiles/tiles.json"));
    }
}
