// Copyright 2026 the Peloton Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tile library, save files, and the editor session for peloton.
//!
//! - [`TileLibrary`] loads a `tiles.json` manifest and the drawings it names,
//!   skipping broken entries rather than failing.
//! - [`CourseSave`] is the versioned JSON save format. Loading replays tiles
//!   by id and reports what it had to leave out.
//! - [`EditorSession`] edits a course by tile id and renders it.

mod error;
mod library;
mod manifest;
mod save;
mod session;

pub use error::LibraryError;
pub use library::{LibraryEntry, MANIFEST_FILE, SkippedTile, TileLibrary};
pub use manifest::{StatsRecord, TileRecord, parse_manifest};
pub use save::{CheckpointRecord, CourseSave, LoadReport, PointsRecord, SAVE_VERSION, ViewRecord};
pub use session::{CheckpointStyle, EditorSession};
