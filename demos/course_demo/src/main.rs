// Copyright 2026 the Peloton Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Builds a small course from synthetic tiles and writes it out.
//!
//! Every edit is traced to both a
//! [`PrettyPrintSink`](peloton_debug::pretty::PrettyPrintSink) on stdout and a
//! [`RecorderSink`](peloton_debug::recorder::RecorderSink). The demo then
//! writes into the directory given as the first argument (default `.`):
//!
//! - `course.svg`: the exported stage
//! - `profile.svg`: the elevation profile
//! - `course.json`: the save file
//! - `trace.json`: the recorded events

use std::error::Error;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;

use peloton_core::profile::ProfileConfig;
use peloton_core::trace::{
    CascadeEvent, CheckpointEvent, CheckpointRejectedEvent, CourseRenamedEvent, CourseResetEvent,
    PointsChangedEvent, TilePlacedEvent, TileRejectedEvent, TileRemovedEvent, TileReplacedEvent,
    TraceSink, Tracer, ViewChangedEvent,
};
use peloton_debug::pretty::PrettyPrintSink;
use peloton_debug::recorder::RecorderSink;
use peloton_library::{EditorSession, LibraryError, TileLibrary, TileRecord};
use peloton_svg::SceneOptions;

const MANIFEST: &str = r#"[
  {"id": "s", "file": "straight.svg", "label": "S", "track": ["flat", "flat", "flat", "flat"],
   "stats": {"flat": 4}},
  {"id": "r", "file": "right.svg", "label": "R", "track": ["flat", "supply"],
   "stats": {"flat": 1, "supply": 1}},
  {"id": "c", "file": "climb.svg", "label": "C", "track": ["asc", "asc", "asc", "flat", "desc", "desc"],
   "stats": {"asc": 3, "flat": 1, "desc": 2}},
  {"id": "c-upp", "file": "climb.svg", "label": "C", "theme": "dark",
   "track": ["cobb", "cobb", "slip", "flat", "yellow", "flat"],
   "stats": {"cobb": 2, "slip": 1, "flat": 2}},
  {"id": "x", "file": "broken.svg"}
]"#;

fn main() -> Result<(), Box<dyn Error>> {
    let out_dir = std::env::args().nth(1).map_or_else(|| PathBuf::from("."), PathBuf::from);
    fs::create_dir_all(&out_dir)?;

    let library = TileLibrary::from_manifest_str(MANIFEST, drawing_for)?;
    for skipped in library.skipped() {
        println!("skipped tile {}: {}", skipped.id, skipped.error);
    }
    let mut session = EditorSession::new(library);

    // -- sinks -------------------------------------------------------------
    let mut tee = Tee {
        pretty: PrettyPrintSink::new(Box::new(std::io::stdout())),
        recorder: RecorderSink::new(),
    };

    // -- edits -------------------------------------------------------------
    {
        let mut tracer = Tracer::new(&mut tee);
        session.course_mut().set_name_traced("Demo Stage", &mut tracer);
        for id in ["s", "c", "r", "s", "r", "c-upp", "s"] {
            session.place_traced(id, &mut tracer)?;
        }
        session.set_checkpoint_style("green", "k1");
        session.add_checkpoint_traced(1, "3", &mut tracer)?;
        session.set_checkpoint_style("blue", "sp");
        session.add_checkpoint_traced(3, "6", &mut tracer)?;

        // Unknown goals are refused without touching the course.
        if let Err(e) = session.add_checkpoint_traced(2, "9", &mut tracer) {
            println!("refused: {e}");
        }

        // Swap the first straight for a climb; everything after it moves.
        session.replace_traced(0, "c", &mut tracer)?;
        session.course_mut().rotate_view_traced(-15.0, &mut tracer);
    }

    // -- outputs -----------------------------------------------------------
    let scene = session.scene(&SceneOptions::export());
    fs::write(out_dir.join("course.svg"), scene.to_document_string())?;

    let profile = session.profile(&ProfileConfig::panel());
    fs::write(out_dir.join("profile.svg"), profile.to_document_string())?;

    fs::write(out_dir.join("course.json"), session.save().to_json()?)?;

    let mut writer = BufWriter::new(File::create(out_dir.join("trace.json"))?);
    tee.recorder.export(&mut writer)?;

    let m = session.metrics();
    println!(
        "{}: {} tiles, track {}, racing {}, distance {}",
        session.course().name(),
        m.total,
        m.track,
        m.racing,
        session.course().profile(&ProfileConfig::panel()).total(),
    );
    println!(
        "Wrote course.svg, profile.svg, course.json, trace.json ({} events) to {}",
        tee.recorder.len(),
        out_dir.display()
    );
    Ok(())
}

/// In-memory stand-in for reading drawings from disk.
fn drawing_for(record: &TileRecord) -> Result<String, LibraryError> {
    match record.file.as_str() {
        "straight.svg" => Ok(straight_svg()),
        "right.svg" => Ok(right_turn_svg()),
        "climb.svg" => Ok(climb_svg()),
        _ => Ok("<svg><g>".to_owned()),
    }
}

fn anchors(entry: (f64, f64), exit: (f64, f64), exit_dir: (f64, f64), center: (f64, f64)) -> String {
    format!(
        r#"<circle id="entry-point" cx="{}" cy="{}" r="6"/>
  <circle id="entry-dir" cx="{}" cy="{}" r="3"/>
  <circle id="exit-point" cx="{}" cy="{}" r="6"/>
  <circle id="exit-dir" cx="{}" cy="{}" r="3"/>
  <circle id="center-point" cx="{}" cy="{}" r="3"/>"#,
        entry.0,
        entry.1,
        entry.0 + 10.0,
        entry.1,
        exit.0,
        exit.1,
        exit_dir.0,
        exit_dir.1,
        center.0,
        center.1,
    )
}

fn goal(key: &str, x: f64, y0: f64, y1: f64) -> String {
    format!(
        r#"<circle id="goal-{key}" cx="{x}" cy="{y0}" r="2"/>
  <circle id="goal-{key}b" cx="{x}" cy="{y1}" r="2"/>"#
    )
}

fn straight_svg() -> String {
    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 400 100">
  <defs><linearGradient id="tarmac"><stop offset="0" stop-color="#555"/><stop offset="1" stop-color="#777"/></linearGradient></defs>
  <rect id="road" width="400" height="100" fill="url(#tarmac)"/>
  {}
  {}
  {}
</svg>"##,
        anchors((0.0, 50.0), (400.0, 50.0), (410.0, 50.0), (200.0, 50.0)),
        goal("3", 200.0, 0.0, 100.0),
        goal("6", 390.0, 0.0, 100.0),
    )
}

fn right_turn_svg() -> String {
    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 300 300">
  <path id="road" d="M0 0 A250 250 0 0 1 250 250 L150 250 A150 150 0 0 0 0 100 Z" fill="#666"/>
  {}
  {}
</svg>"##,
        anchors((0.0, 50.0), (200.0, 250.0), (200.0, 260.0), (130.0, 120.0)),
        goal("2", 140.0, 90.0, 180.0),
    )
}

fn climb_svg() -> String {
    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 600 100">
  <rect id="road" width="600" height="100" fill="#6a5"/>
  {}
  {}
  {}
</svg>"##,
        anchors((0.0, 50.0), (600.0, 50.0), (610.0, 50.0), (300.0, 50.0)),
        goal("3", 300.0, 0.0, 100.0),
        goal("6", 590.0, 0.0, 100.0),
    )
}

/// Forwards every event to both sinks.
struct Tee {
    pretty: PrettyPrintSink,
    recorder: RecorderSink,
}

impl TraceSink for Tee {
    fn on_tile_placed(&mut self, e: &TilePlacedEvent<'_>) {
        self.pretty.on_tile_placed(e);
        self.recorder.on_tile_placed(e);
    }

    fn on_tile_rejected(&mut self, e: &TileRejectedEvent<'_>) {
        self.pretty.on_tile_rejected(e);
        self.recorder.on_tile_rejected(e);
    }

    fn on_tile_removed(&mut self, e: &TileRemovedEvent<'_>) {
        self.pretty.on_tile_removed(e);
        self.recorder.on_tile_removed(e);
    }

    fn on_tile_replaced(&mut self, e: &TileReplacedEvent<'_>) {
        self.pretty.on_tile_replaced(e);
        self.recorder.on_tile_replaced(e);
    }

    fn on_cascade(&mut self, e: &CascadeEvent) {
        self.pretty.on_cascade(e);
        self.recorder.on_cascade(e);
    }

    fn on_checkpoint_added(&mut self, e: &CheckpointEvent<'_>) {
        self.pretty.on_checkpoint_added(e);
        self.recorder.on_checkpoint_added(e);
    }

    fn on_checkpoint_rejected(&mut self, e: &CheckpointRejectedEvent<'_>) {
        self.pretty.on_checkpoint_rejected(e);
        self.recorder.on_checkpoint_rejected(e);
    }

    fn on_checkpoint_pruned(&mut self, e: &CheckpointEvent<'_>) {
        self.pretty.on_checkpoint_pruned(e);
        self.recorder.on_checkpoint_pruned(e);
    }

    fn on_checkpoint_removed(&mut self, e: &CheckpointEvent<'_>) {
        self.pretty.on_checkpoint_removed(e);
        self.recorder.on_checkpoint_removed(e);
    }

    fn on_view_changed(&mut self, e: &ViewChangedEvent) {
        self.pretty.on_view_changed(e);
        self.recorder.on_view_changed(e);
    }

    fn on_course_renamed(&mut self, e: &CourseRenamedEvent<'_>) {
        self.pretty.on_course_renamed(e);
        self.recorder.on_course_renamed(e);
    }

    fn on_points_changed(&mut self, e: &PointsChangedEvent) {
        self.pretty.on_points_changed(e);
        self.recorder.on_points_changed(e);
    }

    fn on_course_reset(&mut self, e: &CourseResetEvent) {
        self.pretty.on_course_reset(e);
        self.recorder.on_course_reset(e);
    }
}
