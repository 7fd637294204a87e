// Copyright 2026 the Peloton Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Editor session: a tile library and a course edited by tile id.

use peloton_core::checkpoint::{Checkpoint, CheckpointColor, normalize_label};
use peloton_core::course::Course;
use peloton_core::metrics::{CourseMetrics, RacingLengthTable};
use peloton_core::profile::ProfileConfig;
use peloton_core::trace::Tracer;
use peloton_svg::{Element, SceneOptions, render_profile, render_scene};

use crate::error::LibraryError;
use crate::library::TileLibrary;
use crate::save::{CourseSave, LoadReport};

/// Colour and label applied to the next checkpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckpointStyle {
    /// Marker colour.
    pub color: CheckpointColor,
    /// Normalized label.
    pub label: String,
}

impl Default for CheckpointStyle {
    fn default() -> Self {
        Self {
            color: CheckpointColor::Red,
            label: normalize_label(""),
        }
    }
}

/// Ties a [`TileLibrary`] to a [`Course`].
#[derive(Debug)]
pub struct EditorSession {
    library: TileLibrary,
    course: Course,
    style: CheckpointStyle,
    racing: RacingLengthTable,
}

impl EditorSession {
    /// Starts an empty course over `library`.
    #[must_use]
    pub fn new(library: TileLibrary) -> Self {
        Self {
            library,
            course: Course::default(),
            style: CheckpointStyle::default(),
            racing: RacingLengthTable::default(),
        }
    }

    /// Uses `table` for racing lengths in [`metrics`](Self::metrics).
    #[must_use]
    pub fn with_racing_table(mut self, table: RacingLengthTable) -> Self {
        self.racing = table;
        self
    }

    /// The tile library.
    #[must_use]
    pub fn library(&self) -> &TileLibrary {
        &self.library
    }

    /// The course.
    #[must_use]
    pub fn course(&self) -> &Course {
        &self.course
    }

    /// The course, for edits the session does not wrap (view, name, points,
    /// observers).
    pub fn course_mut(&mut self) -> &mut Course {
        &mut self.course
    }

    /// Style for the next checkpoint.
    #[must_use]
    pub fn checkpoint_style(&self) -> &CheckpointStyle {
        &self.style
    }

    /// Sets the style for the next checkpoint. Unknown colour tags are red.
    pub fn set_checkpoint_style(&mut self, color_tag: &str, label: &str) {
        self.style = CheckpointStyle {
            color: CheckpointColor::from_tag(color_tag),
            label: normalize_label(label),
        };
    }

    /// Places tile `id` at the end of the course.
    ///
    /// # Errors
    ///
    /// See [`place_traced`](Self::place_traced).
    pub fn place(&mut self, id: &str) -> Result<usize, LibraryError> {
        self.place_traced(id, &mut Tracer::none())
    }

    /// Places tile `id` at the end of the course and returns its position.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::UnknownTile`] or [`LibraryError::Placement`].
    pub fn place_traced(&mut self, id: &str, tracer: &mut Tracer<'_>) -> Result<usize, LibraryError> {
        let entry = self.library.require(id)?;
        Ok(self
            .course
            .append_traced(entry.asset.clone(), &entry.drawing, tracer)?)
    }

    /// Removes the last tile. Returns its id.
    pub fn undo(&mut self) -> Option<String> {
        self.undo_traced(&mut Tracer::none())
    }

    /// Removes the last tile, pruning its checkpoints. Returns its id.
    pub fn undo_traced(&mut self, tracer: &mut Tracer<'_>) -> Option<String> {
        self.course
            .remove_last_traced(tracer)
            .map(|tile| tile.asset().id.clone())
    }

    /// Swaps the tile at `index` for tile `id`.
    ///
    /// # Errors
    ///
    /// See [`replace_traced`](Self::replace_traced).
    pub fn replace(&mut self, index: usize, id: &str) -> Result<Vec<Checkpoint>, LibraryError> {
        self.replace_traced(index, id, &mut Tracer::none())
    }

    /// Swaps the tile at `index` for tile `id`, relaying out the rest of the
    /// course. Returns the checkpoints that no longer resolve.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::UnknownTile`] or [`LibraryError::Placement`];
    /// the course is unchanged.
    pub fn replace_traced(
        &mut self,
        index: usize,
        id: &str,
        tracer: &mut Tracer<'_>,
    ) -> Result<Vec<Checkpoint>, LibraryError> {
        let entry = self.library.require(id)?;
        Ok(self
            .course
            .replace_traced(index, entry.asset.clone(), &entry.drawing, tracer)?)
    }

    /// Adds a checkpoint in the current style.
    ///
    /// # Errors
    ///
    /// See [`add_checkpoint_traced`](Self::add_checkpoint_traced).
    pub fn add_checkpoint(&mut self, tile_index: usize, key: &str) -> Result<usize, LibraryError> {
        self.add_checkpoint_traced(tile_index, key, &mut Tracer::none())
    }

    /// Adds a checkpoint in the current style on goal `key` of the tile at
    /// `tile_index`.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::Checkpoint`] if the tile or goal is missing.
    pub fn add_checkpoint_traced(
        &mut self,
        tile_index: usize,
        key: &str,
        tracer: &mut Tracer<'_>,
    ) -> Result<usize, LibraryError> {
        Ok(self.course.add_checkpoint_traced(
            tile_index,
            key,
            self.style.color,
            &self.style.label,
            tracer,
        )?)
    }

    /// Removes the most recent checkpoint.
    pub fn undo_checkpoint(&mut self) -> Option<Checkpoint> {
        self.course.remove_last_checkpoint()
    }

    /// Clears the course.
    pub fn reset(&mut self) {
        self.course.reset();
    }

    /// Course statistics.
    #[must_use]
    pub fn metrics(&self) -> CourseMetrics {
        self.course.metrics(&self.racing)
    }

    /// The stage SVG.
    #[must_use]
    pub fn scene(&self, options: &SceneOptions) -> Element {
        render_scene(&self.course, &self.library, options)
    }

    /// The profile SVG.
    #[must_use]
    pub fn profile(&self, config: &ProfileConfig) -> Element {
        render_profile(&self.course.profile(config), config)
    }

    /// Snapshot for saving.
    #[must_use]
    pub fn save(&self) -> CourseSave {
        CourseSave::capture(&self.course)
    }

    /// Replaces the course with `save`.
    pub fn load(&mut self, save: &CourseSave) -> LoadReport {
        save.restore(&mut self.course, &self.library)
    }
}
