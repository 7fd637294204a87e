// Copyright 2026 the Peloton Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event recording as JSON.
//!
//! [`RecorderSink`] implements [`TraceSink`] and keeps every event as a
//! `serde_json` object with an `"event"` name field. [`RecorderSink::export`]
//! writes the recording as a JSON array.

use std::io::{self, Write};

use serde_json::{Value, json};

use peloton_core::trace::{
    CascadeEvent, CheckpointEvent, CheckpointRejectedEvent, CourseRenamedEvent, CourseResetEvent,
    PointsChangedEvent, TilePlacedEvent, TileRejectedEvent, TileRemovedEvent, TileReplacedEvent,
    TraceSink, ViewChangedEvent,
};

/// A [`TraceSink`] that records events as JSON values.
#[derive(Debug, Default)]
pub struct RecorderSink {
    events: Vec<Value>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded events in arrival order.
    #[must_use]
    pub fn events(&self) -> &[Value] {
        &self.events
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Consumes the recorder and returns the events.
    #[must_use]
    pub fn into_events(self) -> Vec<Value> {
        self.events
    }

    /// Writes the recording as a pretty-printed JSON array.
    pub fn export(&self, writer: &mut dyn Write) -> io::Result<()> {
        serde_json::to_writer_pretty(writer, &self.events)?;
        Ok(())
    }

    fn checkpoint(&mut self, name: &str, e: &CheckpointEvent<'_>) {
        self.events.push(json!({
            "event": name,
            "tile_index": e.tile_index,
            "anchor_key": e.anchor_key,
            "label": e.label,
        }));
    }
}

impl TraceSink for RecorderSink {
    fn on_tile_placed(&mut self, e: &TilePlacedEvent<'_>) {
        self.events.push(json!({
            "event": "tile_placed",
            "index": e.index,
            "instance": e.instance.get(),
            "tile_id": e.tile_id,
            "rotation_degrees": e.rotation_degrees,
        }));
    }

    fn on_tile_rejected(&mut self, e: &TileRejectedEvent<'_>) {
        self.events.push(json!({
            "event": "tile_rejected",
            "tile_id": e.tile_id,
            "error": e.error.to_string(),
        }));
    }

    fn on_tile_removed(&mut self, e: &TileRemovedEvent<'_>) {
        self.events.push(json!({
            "event": "tile_removed",
            "index": e.index,
            "instance": e.instance.get(),
            "tile_id": e.tile_id,
        }));
    }

    fn on_tile_replaced(&mut self, e: &TileReplacedEvent<'_>) {
        self.events.push(json!({
            "event": "tile_replaced",
            "index": e.index,
            "old_tile_id": e.old_tile_id,
            "new_tile_id": e.new_tile_id,
            "instance": e.instance.get(),
        }));
    }

    fn on_cascade(&mut self, e: &CascadeEvent) {
        self.events.push(json!({
            "event": "cascade",
            "start": e.start,
            "end": e.end,
        }));
    }

    fn on_checkpoint_added(&mut self, e: &CheckpointEvent<'_>) {
        self.checkpoint("checkpoint_added", e);
    }

    fn on_checkpoint_rejected(&mut self, e: &CheckpointRejectedEvent<'_>) {
        self.events.push(json!({
            "event": "checkpoint_rejected",
            "error": e.error.to_string(),
        }));
    }

    fn on_checkpoint_pruned(&mut self, e: &CheckpointEvent<'_>) {
        self.checkpoint("checkpoint_pruned", e);
    }

    fn on_checkpoint_removed(&mut self, e: &CheckpointEvent<'_>) {
        self.checkpoint("checkpoint_removed", e);
    }

    fn on_view_changed(&mut self, e: &ViewChangedEvent) {
        self.events.push(json!({
            "event": "view_changed",
            "rotation_degrees": e.rotation_degrees,
            "zoom": e.zoom,
        }));
    }

    fn on_course_renamed(&mut self, e: &CourseRenamedEvent<'_>) {
        self.events.push(json!({
            "event": "course_renamed",
            "name": e.name,
        }));
    }

    fn on_points_changed(&mut self, e: &PointsChangedEvent) {
        self.events.push(json!({
            "event": "points_changed",
            "sprints": e.points.map(|p| p.sprints),
            "koms": e.points.map(|p| p.koms),
        }));
    }

    fn on_course_reset(&mut self, e: &CourseResetEvent) {
        self.events.push(json!({
            "event": "course_reset",
            "tiles_cleared": e.tiles_cleared,
            "checkpoints_cleared": e.checkpoints_cleared,
        }));
    }
}
