// Copyright 2026 the Peloton Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Versioned course save files.
//!
//! A save records tile ids rather than geometry; loading replays the tiles
//! through the chain so placements always come from the current drawings.
//!
//! ```json
//! {
//!   "version": 1,
//!   "name": "Stage 4",
//!   "tiles": ["a", "c", "c-upp"],
//!   "checkpoints": [{"tile_index": 1, "anchor_key": "3", "color": "blue", "label": "B"}],
//!   "points": {"sprints": 2, "koms": 1},
//!   "view": {"rotation_degrees": 15.0, "zoom_factor": 1.1}
//! }
//! ```

use serde::{Deserialize, Serialize};

use peloton_core::checkpoint::CheckpointColor;
use peloton_core::course::{Course, PointTotals};
use peloton_core::trace::Tracer;
use peloton_core::view::ViewTransform;

use crate::error::LibraryError;
use crate::library::TileLibrary;

/// Save format version written by this build.
pub const SAVE_VERSION: u32 = 1;

/// A checkpoint as stored in a save.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointRecord {
    /// Chain position of the tile at save time.
    pub tile_index: usize,
    /// Goal key on that tile.
    pub anchor_key: String,
    /// Colour tag.
    #[serde(default)]
    pub color: String,
    /// Display label.
    #[serde(default)]
    pub label: String,
}

/// Sprint and KOM totals as stored in a save.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsRecord {
    /// Intermediate sprint count.
    pub sprints: u32,
    /// King-of-the-mountain count.
    pub koms: u32,
}

/// View state as stored in a save.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewRecord {
    /// Stage rotation in degrees.
    pub rotation_degrees: f64,
    /// Zoom multiplier.
    pub zoom_factor: f64,
}

impl Default for ViewRecord {
    fn default() -> Self {
        Self {
            rotation_degrees: 0.0,
            zoom_factor: 1.0,
        }
    }
}

/// A saved course.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CourseSave {
    /// Format version; always [`SAVE_VERSION`] when written.
    pub version: u32,
    /// Course name.
    pub name: String,
    /// Tile ids in chain order.
    pub tiles: Vec<String>,
    /// Checkpoints in list order.
    #[serde(default)]
    pub checkpoints: Vec<CheckpointRecord>,
    /// Point totals, if set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<PointsRecord>,
    /// View state.
    #[serde(default)]
    pub view: ViewRecord,
}

#[derive(Deserialize)]
struct VersionProbe {
    version: u32,
}

/// What a load had to leave out.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Ids of saved tiles that were unknown or could not be placed.
    pub skipped_tiles: Vec<String>,
    /// Checkpoints that no longer resolved after tiles were skipped.
    pub dropped_checkpoints: usize,
}

impl LoadReport {
    /// Whether everything in the save was restored.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.skipped_tiles.is_empty() && self.dropped_checkpoints == 0
    }
}

impl CourseSave {
    /// Snapshot of `course`.
    #[must_use]
    pub fn capture(course: &Course) -> Self {
        let view = course.view();
        Self {
            version: SAVE_VERSION,
            name: course.name().to_owned(),
            tiles: course.chain().iter().map(|t| t.asset().id.clone()).collect(),
            checkpoints: course
                .checkpoints()
                .iter()
                .map(|cp| CheckpointRecord {
                    tile_index: cp.tile_index,
                    anchor_key: cp.anchor_key.clone(),
                    color: cp.color.tag().to_owned(),
                    label: cp.label.clone(),
                })
                .collect(),
            points: course.points().map(|p| PointsRecord {
                sprints: p.sprints,
                koms: p.koms,
            }),
            view: ViewRecord {
                rotation_degrees: view.rotation_degrees,
                zoom_factor: view.zoom,
            },
        }
    }

    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String, LibraryError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses a save, checking the version before the body.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::UnsupportedVersion`] for any version other
    /// than [`SAVE_VERSION`], or [`LibraryError::Json`] for malformed text.
    pub fn from_json(text: &str) -> Result<Self, LibraryError> {
        let probe: VersionProbe = serde_json::from_str(text)?;
        if probe.version != SAVE_VERSION {
            return Err(LibraryError::UnsupportedVersion {
                found: probe.version,
                supported: SAVE_VERSION,
            });
        }
        Ok(serde_json::from_str(text)?)
    }

    /// Replaces the contents of `course` with this save. See
    /// [`restore_traced`](Self::restore_traced).
    pub fn restore(&self, course: &mut Course, library: &TileLibrary) -> LoadReport {
        self.restore_traced(course, library, &mut Tracer::none())
    }

    /// Replaces the contents of `course` with this save.
    ///
    /// Tiles whose id is unknown, or that fail to place, are skipped.
    /// Checkpoint tile indices are shifted down past skipped tiles;
    /// checkpoints on a skipped tile, or whose anchor no longer exists, are
    /// dropped. Observers see a single load notification.
    pub fn restore_traced(
        &self,
        course: &mut Course,
        library: &TileLibrary,
        tracer: &mut Tracer<'_>,
    ) -> LoadReport {
        course.load_with(|course| {
            let mut report = LoadReport::default();
            course.reset_traced(tracer);
            course.set_name_traced(&self.name, tracer);
            course.set_points_traced(
                self.points.map(|p| PointTotals {
                    sprints: p.sprints,
                    koms: p.koms,
                }),
                tracer,
            );

            let mut remap = Vec::with_capacity(self.tiles.len());
            for id in &self.tiles {
                let placed = library.get(id).and_then(|entry| {
                    course
                        .append_traced(entry.asset.clone(), &entry.drawing, tracer)
                        .ok()
                });
                if placed.is_none() {
                    report.skipped_tiles.push(id.clone());
                }
                remap.push(placed);
            }

            for cp in &self.checkpoints {
                let added = remap.get(cp.tile_index).copied().flatten().and_then(|index| {
                    course
                        .add_checkpoint_traced(
                            index,
                            &cp.anchor_key,
                            CheckpointColor::from_tag(&cp.color),
                            &cp.label,
                            tracer,
                        )
                        .ok()
                });
                if added.is_none() {
                    report.dropped_checkpoints += 1;
                }
            }

            course.set_view_traced(
                ViewTransform::new(self.view.rotation_degrees, self.view.zoom_factor),
                tracer,
            );
            report
        })
    }
}
