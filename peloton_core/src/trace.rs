// Copyright 2026 the Peloton Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for course edits.
//!
//! The core never logs. Instead, every mutation of a
//! [`Course`](crate::course::Course) reports what it did through a
//! [`TraceSink`]. All sink methods default to no-ops, so implementing only
//! the events you care about is fine.
//!
//! Course methods take a [`Tracer`], which holds at most one
//! `&mut dyn TraceSink`. Without the `trace` feature its methods are empty;
//! with it, each call is one `Option` check and a virtual call.

use crate::chain::InstanceId;
use crate::course::PointTotals;
use crate::error::{CheckpointError, PlacementError};

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted after a tile has been appended and laid out.
#[derive(Clone, Copy, Debug)]
pub struct TilePlacedEvent<'a> {
    /// Chain position of the new tile.
    pub index: usize,
    /// Instance id allocated for it.
    pub instance: InstanceId,
    /// Asset id.
    pub tile_id: &'a str,
    /// World rotation, in degrees.
    pub rotation_degrees: f64,
}

/// Emitted when a tile could not be placed.
#[derive(Clone, Copy, Debug)]
pub struct TileRejectedEvent<'a> {
    /// Asset id.
    pub tile_id: &'a str,
    /// Why placement failed.
    pub error: PlacementError,
}

/// Emitted when the last tile is removed.
#[derive(Clone, Copy, Debug)]
pub struct TileRemovedEvent<'a> {
    /// Position the tile occupied.
    pub index: usize,
    /// Instance id of the removed placement.
    pub instance: InstanceId,
    /// Asset id.
    pub tile_id: &'a str,
}

/// Emitted when a tile is swapped for another.
#[derive(Clone, Copy, Debug)]
pub struct TileReplacedEvent<'a> {
    /// Position of the swap.
    pub index: usize,
    /// Asset id of the tile that left the chain.
    pub old_tile_id: &'a str,
    /// Asset id of the tile that took its place.
    pub new_tile_id: &'a str,
    /// Instance id of the new placement.
    pub instance: InstanceId,
}

/// Emitted after a relayout cascade.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CascadeEvent {
    /// First relaid-out position.
    pub start: usize,
    /// One past the last relaid-out position (the chain length).
    pub end: usize,
}

/// A checkpoint that was added, pruned, or removed.
#[derive(Clone, Copy, Debug)]
pub struct CheckpointEvent<'a> {
    /// Tile position the checkpoint is bound to.
    pub tile_index: usize,
    /// Goal key on that tile.
    pub anchor_key: &'a str,
    /// Display label.
    pub label: &'a str,
}

/// Emitted when a checkpoint could not be attached.
#[derive(Clone, Copy, Debug)]
pub struct CheckpointRejectedEvent<'a> {
    /// Why attachment failed.
    pub error: &'a CheckpointError,
}

/// Emitted when the view transform changes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewChangedEvent {
    /// New rotation, in degrees.
    pub rotation_degrees: f64,
    /// New zoom factor.
    pub zoom: f64,
}

/// Emitted when the course is renamed.
#[derive(Clone, Copy, Debug)]
pub struct CourseRenamedEvent<'a> {
    /// The stored name, after blank names fall back to the default.
    pub name: &'a str,
}

/// Emitted when sprint and mountain point totals are set or cleared.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PointsChangedEvent {
    /// New totals; `None` when cleared.
    pub points: Option<PointTotals>,
}

/// Emitted when the course is cleared.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CourseResetEvent {
    /// Tiles that were removed.
    pub tiles_cleared: usize,
    /// Checkpoints that were removed.
    pub checkpoints_cleared: usize,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from course edits.
///
/// Every method defaults to doing nothing; implement only the events a sink
/// reports.
pub trait TraceSink {
    /// Called after a tile is appended.
    fn on_tile_placed(&mut self, e: &TilePlacedEvent<'_>) {
        _ = e;
    }

    /// Called when a tile is rejected.
    fn on_tile_rejected(&mut self, e: &TileRejectedEvent<'_>) {
        _ = e;
    }

    /// Called after the last tile is removed.
    fn on_tile_removed(&mut self, e: &TileRemovedEvent<'_>) {
        _ = e;
    }

    /// Called after a tile is replaced.
    fn on_tile_replaced(&mut self, e: &TileReplacedEvent<'_>) {
        _ = e;
    }

    /// Called after a relayout cascade.
    fn on_cascade(&mut self, e: &CascadeEvent) {
        _ = e;
    }

    /// Called after a checkpoint is attached.
    fn on_checkpoint_added(&mut self, e: &CheckpointEvent<'_>) {
        _ = e;
    }

    /// Called when a checkpoint is rejected.
    fn on_checkpoint_rejected(&mut self, e: &CheckpointRejectedEvent<'_>) {
        _ = e;
    }

    /// Called when a checkpoint no longer resolves and is dropped.
    fn on_checkpoint_pruned(&mut self, e: &CheckpointEvent<'_>) {
        _ = e;
    }

    /// Called when the last checkpoint is removed on request.
    fn on_checkpoint_removed(&mut self, e: &CheckpointEvent<'_>) {
        _ = e;
    }

    /// Called when the view transform changes.
    fn on_view_changed(&mut self, e: &ViewChangedEvent) {
        _ = e;
    }

    /// Called when the course is renamed.
    fn on_course_renamed(&mut self, e: &CourseRenamedEvent<'_>) {
        _ = e;
    }

    /// Called when the point totals change.
    fn on_points_changed(&mut self, e: &PointsChangedEvent) {
        _ = e;
    }

    /// Called when the course is reset.
    fn on_course_reset(&mut self, e: &CourseResetEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// Ignores every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Optional [`TraceSink`] handed to the `*_traced` course methods.
///
/// Use [`Tracer::none`] when nothing should be recorded. Without the `trace`
/// feature the sink is not stored and every method is empty.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`TilePlacedEvent`].
    #[inline]
    pub fn tile_placed(&mut self, e: &TilePlacedEvent<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_tile_placed(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`TileRejectedEvent`].
    #[inline]
    pub fn tile_rejected(&mut self, e: &TileRejectedEvent<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_tile_rejected(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`TileRemovedEvent`].
    #[inline]
    pub fn tile_removed(&mut self, e: &TileRemovedEvent<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_tile_removed(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`TileReplacedEvent`].
    #[inline]
    pub fn tile_replaced(&mut self, e: &TileReplacedEvent<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_tile_replaced(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`CascadeEvent`].
    #[inline]
    pub fn cascade(&mut self, e: &CascadeEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_cascade(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a checkpoint-added [`CheckpointEvent`].
    #[inline]
    pub fn checkpoint_added(&mut self, e: &CheckpointEvent<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_checkpoint_added(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`CheckpointRejectedEvent`].
    #[inline]
    pub fn checkpoint_rejected(&mut self, e: &CheckpointRejectedEvent<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_checkpoint_rejected(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a checkpoint-pruned [`CheckpointEvent`].
    #[inline]
    pub fn checkpoint_pruned(&mut self, e: &CheckpointEvent<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_checkpoint_pruned(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a checkpoint-removed [`CheckpointEvent`].
    #[inline]
    pub fn checkpoint_removed(&mut self, e: &CheckpointEvent<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_checkpoint_removed(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ViewChangedEvent`].
    #[inline]
    pub fn view_changed(&mut self, e: &ViewChangedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_view_changed(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`CourseRenamedEvent`].
    #[inline]
    pub fn course_renamed(&mut self, e: &CourseRenamedEvent<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_course_renamed(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PointsChangedEvent`].
    #[inline]
    pub fn points_changed(&mut self, e: &PointsChangedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_points_changed(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`CourseResetEvent`].
    #[inline]
    pub fn course_reset(&mut self, e: &CourseResetEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_course_reset(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::socket::AnchorKind;

    fn sample_placed() -> TilePlacedEvent<'static> {
        TilePlacedEvent {
            index: 3,
            instance: InstanceId::from_raw(7),
            tile_id: "c-upp",
            rotation_degrees: 90.0,
        }
    }

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        sink.on_tile_placed(&sample_placed());
        sink.on_tile_rejected(&TileRejectedEvent {
            tile_id: "x",
            error: PlacementError::MissingAnchor(AnchorKind::EntryDir),
        });
        sink.on_cascade(&CascadeEvent { start: 0, end: 4 });
        sink.on_course_reset(&CourseResetEvent {
            tiles_cleared: 4,
            checkpoints_cleared: 1,
        });
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.tile_placed(&sample_placed());
        tracer.cascade(&CascadeEvent { start: 1, end: 2 });
        tracer.view_changed(&ViewChangedEvent {
            rotation_degrees: 15.0,
            zoom: 1.1,
        });
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::vec::Vec;

        struct RecordingSink {
            cascades: Vec<(usize, usize)>,
        }
        impl TraceSink for RecordingSink {
            fn on_cascade(&mut self, e: &CascadeEvent) {
                self.cascades.push((e.start, e.end));
            }
        }

        let mut sink = RecordingSink {
            cascades: Vec::new(),
        };
        let mut tracer = Tracer::new(&mut sink);
        tracer.cascade(&CascadeEvent { start: 2, end: 5 });
        tracer.tile_placed(&sample_placed());
        drop(tracer);
        assert_eq!(sink.cascades, &[(2, 5)]);
    }
}
