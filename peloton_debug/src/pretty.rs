// Copyright 2026 the Peloton Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use peloton_core::trace::{
    CascadeEvent, CheckpointEvent, CheckpointRejectedEvent, CourseRenamedEvent, CourseResetEvent,
    PointsChangedEvent, TilePlacedEvent, TileRejectedEvent, TileRemovedEvent, TileReplacedEvent,
    TraceSink, ViewChangedEvent,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns its writer.
    #[must_use]
    pub fn into_writer(self) -> W {
        self.writer
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_tile_placed(&mut self, e: &TilePlacedEvent<'_>) {
        let _ = writeln!(
            self.writer,
            "[place] #{} tile={} prefix={} rot={:.1}°",
            e.index,
            e.tile_id,
            e.instance.prefix(),
            e.rotation_degrees,
        );
    }

    fn on_tile_rejected(&mut self, e: &TileRejectedEvent<'_>) {
        let _ = writeln!(self.writer, "[reject] tile={} {}", e.tile_id, e.error);
    }

    fn on_tile_removed(&mut self, e: &TileRemovedEvent<'_>) {
        let _ = writeln!(
            self.writer,
            "[remove] #{} tile={} prefix={}",
            e.index,
            e.tile_id,
            e.instance.prefix(),
        );
    }

    fn on_tile_replaced(&mut self, e: &TileReplacedEvent<'_>) {
        let _ = writeln!(
            self.writer,
            "[replace] #{} {} -> {} prefix={}",
            e.index,
            e.old_tile_id,
            e.new_tile_id,
            e.instance.prefix(),
        );
    }

    fn on_cascade(&mut self, e: &CascadeEvent) {
        let _ = writeln!(
            self.writer,
            "[cascade] tiles {}..{} ({} relaid)",
            e.start,
            e.end,
            e.end.saturating_sub(e.start),
        );
    }

    fn on_checkpoint_added(&mut self, e: &CheckpointEvent<'_>) {
        let _ = writeln!(
            self.writer,
            "[checkpoint] + {} on #{} goal-{}",
            e.label, e.tile_index, e.anchor_key,
        );
    }

    fn on_checkpoint_rejected(&mut self, e: &CheckpointRejectedEvent<'_>) {
        let _ = writeln!(self.writer, "[checkpoint] rejected: {}", e.error);
    }

    fn on_checkpoint_pruned(&mut self, e: &CheckpointEvent<'_>) {
        let _ = writeln!(
            self.writer,
            "[checkpoint] pruned {} (was on #{} goal-{})",
            e.label, e.tile_index, e.anchor_key,
        );
    }

    fn on_checkpoint_removed(&mut self, e: &CheckpointEvent<'_>) {
        let _ = writeln!(
            self.writer,
            "[checkpoint] - {} on #{} goal-{}",
            e.label, e.tile_index, e.anchor_key,
        );
    }

    fn on_view_changed(&mut self, e: &ViewChangedEvent) {
        let _ = writeln!(
            self.writer,
            "[view] rot={:.1}° zoom={:.3}",
            e.rotation_degrees, e.zoom,
        );
    }

    fn on_course_renamed(&mut self, e: &CourseRenamedEvent<'_>) {
        let _ = writeln!(self.writer, "[name] {:?}", e.name);
    }

    fn on_points_changed(&mut self, e: &PointsChangedEvent) {
        let _ = match e.points {
            Some(p) => writeln!(self.writer, "[points] sprints={} koms={}", p.sprints, p.koms),
            None => writeln!(self.writer, "[points] cleared"),
        };
    }

    fn on_course_reset(&mut self, e: &CourseResetEvent) {
        let _ = writeln!(
            self.writer,
            "[reset] tiles={} checkpoints={}",
            e.tiles_cleared, e.checkpoints_cleared,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use peloton_core::chain::InstanceId;
    use peloton_core::course::PointTotals;
    use peloton_core::error::PlacementError;
    use peloton_core::socket::AnchorKind;

    fn output(sink: PrettyPrintSink<Vec<u8>>) -> String {
        String::from_utf8(sink.into_writer()).unwrap()
    }

    #[test]
    fn pretty_print_placement() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_tile_placed(&TilePlacedEvent {
            index: 2,
            instance: InstanceId::from_raw(3),
            tile_id: "c",
            rotation_degrees: 90.0,
        });
        let output = output(sink);
        assert_eq!(output, "[place] #2 tile=c prefix=t3- rot=90.0°\n");
    }

    #[test]
    fn pretty_print_rejection_and_cascade() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_tile_rejected(&TileRejectedEvent {
            tile_id: "x",
            error: PlacementError::MissingAnchor(AnchorKind::ExitDir),
        });
        sink.on_cascade(&CascadeEvent { start: 1, end: 4 });
        let output = output(sink);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("[reject] tile=x"), "got: {output}");
        assert_eq!(lines[1], "[cascade] tiles 1..4 (3 relaid)");
    }

    #[test]
    fn pretty_print_reset() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_course_reset(&CourseResetEvent {
            tiles_cleared: 5,
            checkpoints_cleared: 2,
        });
        assert_eq!(output(sink), "[reset] tiles=5 checkpoints=2\n");
    }

    #[test]
    fn pretty_print_metadata() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_course_renamed(&CourseRenamedEvent { name: "Ronde" });
        sink.on_points_changed(&PointsChangedEvent {
            points: Some(PointTotals {
                sprints: 2,
                koms: 1,
            }),
        });
        sink.on_points_changed(&PointsChangedEvent { points: None });
        assert_eq!(
            output(sink),
            "[name] \"Ronde\"\n[points] sprints=2 koms=1\n[points] cleared\n"
        );
    }
}
