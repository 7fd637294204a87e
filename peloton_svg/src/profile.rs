// Copyright 2026 the Peloton Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Elevation profile rendering.

use kurbo::Point;
use peloton_core::profile::{MarkerKind, Profile, ProfileConfig, ProfileCurve, ProfileMarker};
use peloton_core::terrain::TerrainStep;

use crate::document::{Element, number};
use crate::scene::FONT_FAMILY;

/// Text shown when no tile has terrain steps.
pub const PLACEHOLDER_TEXT: &str = "Place tiles to see profile";

/// Samples per step for the coloured stroke and the filled area.
const SAMPLES_PER_STEP: usize = 8;
const AREA_FILL: &str = "#8FD57D";
const START_FINISH_FILL: &str = "#e6e142";
const LEADER_LENGTH: f64 = 26.0;
const DISC_GAP: f64 = 6.0;
const DROP_GAP: f64 = 14.0;

/// Stroke colour for a terrain step.
#[must_use]
pub const fn step_color(kind: TerrainStep) -> &'static str {
    match kind {
        TerrainStep::Flat => "#d9d9d9",
        TerrainStep::Ascent => "#ff0000",
        TerrainStep::Descent => "#6169ff",
        TerrainStep::Supply => "#7ccbf3",
        TerrainStep::Cobble => "#8c865b",
        TerrainStep::Slippery => "#580dd8",
        TerrainStep::Decorative => "#e6e142",
        TerrainStep::Other => "#000",
    }
}

/// Renders `profile` into a standalone `<svg>` sized by `config`.
#[must_use]
pub fn render_profile(profile: &Profile, config: &ProfileConfig) -> Element {
    let root = Element::new("svg")
        .with_attr(
            "viewBox",
            format!("0 0 {} {}", number(config.width), number(config.height)),
        )
        .with_attr("width", number(config.width))
        .with_attr("height", number(config.height));
    match profile {
        Profile::Placeholder => root.with_child(
            Element::new("text")
                .with_attr("class", "placeholder")
                .with_attr("x", number(config.width / 2.0))
                .with_attr("y", number(config.height / 2.0))
                .with_attr("text-anchor", "middle")
                .with_attr("dominant-baseline", "middle")
                .with_attr("font-family", FONT_FAMILY)
                .with_text(PLACEHOLDER_TEXT),
        ),
        Profile::Curve(curve) => root
            .with_child(segments(curve))
            .with_child(markers(curve)),
    }
}

fn segments(curve: &ProfileCurve) -> Element {
    let mut group = Element::new("g").with_attr("class", "segments");
    let mut area = path_data(&curve.area_outline(SAMPLES_PER_STEP));
    area.push_str(" Z");
    group.push(
        Element::new("path")
            .with_attr("d", area)
            .with_attr("fill", AREA_FILL)
            .with_attr("fill-opacity", "0.80"),
    );
    for (i, step) in curve.steps().iter().enumerate() {
        group.push(
            Element::new("path")
                .with_attr("d", path_data(&curve.sample_step(i, SAMPLES_PER_STEP)))
                .with_attr("fill", "none")
                .with_attr("stroke", step_color(step.kind))
                .with_attr("stroke-width", "4")
                .with_attr("stroke-linecap", "round")
                .with_attr("stroke-linejoin", "round"),
        );
    }
    group
}

fn markers(curve: &ProfileCurve) -> Element {
    let config = curve.config();
    let count_y = config.count_y();
    let mut group = Element::new("g").with_attr("class", "markers").with_child(
        Element::new("line")
            .with_attr("x1", number(config.inner_pad))
            .with_attr("x2", number(config.inner_pad + config.inner_width()))
            .with_attr("y1", number(count_y))
            .with_attr("y2", number(count_y))
            .with_attr("stroke", "#000")
            .with_attr("stroke-width", "0.5")
            .with_attr("stroke-opacity", "0.25"),
    );
    for marker in curve.markers() {
        for el in marker_elements(marker, count_y) {
            group.push(el);
        }
    }
    for label in curve.count_labels() {
        group.push(
            Element::new("text")
                .with_attr("class", "count")
                .with_attr("x", number(label.x))
                .with_attr("y", number(count_y - 2.0))
                .with_attr("text-anchor", "middle")
                .with_attr("font-size", "13")
                .with_attr("font-weight", "600")
                .with_attr("font-family", FONT_FAMILY)
                .with_text(label.count.to_string()),
        );
    }
    group
}

fn marker_elements(marker: &ProfileMarker, count_y: f64) -> [Element; 4] {
    let x = number(marker.x);
    let top = marker.y - LEADER_LENGTH;
    let dot_y = number(top - DISC_GAP);
    let fill = match marker.kind {
        MarkerKind::Start | MarkerKind::Finish => START_FINISH_FILL,
        MarkerKind::Checkpoint { color, .. } => color.hex(),
    };
    let leader = Element::new("line")
        .with_attr("x1", x.as_str())
        .with_attr("x2", x.as_str())
        .with_attr("y1", number(top))
        .with_attr("y2", number(marker.y))
        .with_attr("stroke", "#000")
        .with_attr("stroke-width", "1");
    let drop = Element::new("line")
        .with_attr("x1", x.as_str())
        .with_attr("x2", x.as_str())
        .with_attr("y1", number(marker.y))
        .with_attr("y2", number(count_y - DROP_GAP))
        .with_attr("stroke", "#000")
        .with_attr("stroke-width", "0.8")
        .with_attr("stroke-dasharray", "2 3")
        .with_attr("stroke-linecap", "round");
    let disc = Element::new("circle")
        .with_attr("cx", x.as_str())
        .with_attr("cy", dot_y.as_str())
        .with_attr("r", "10")
        .with_attr("fill", fill);
    let text = Element::new("text")
        .with_attr("x", x.as_str())
        .with_attr("y", dot_y.as_str())
        .with_attr("text-anchor", "middle")
        .with_attr("dominant-baseline", "middle")
        .with_attr("dy", "0.1em")
        .with_attr("fill", "#fff")
        .with_attr("font-weight", "600")
        .with_attr("font-family", FONT_FAMILY)
        .with_attr("font-size", "14")
        .with_text(marker.label.as_str());
    [leader, drop, disc, text]
}

fn path_data(points: &[Point]) -> String {
    let mut d = String::new();
    for (i, p) in points.iter().enumerate() {
        if i > 0 {
            d.push(' ');
        }
        d.push_str(if i == 0 { "M " } else { "L " });
        d.push_str(&number(p.x));
        d.push(' ');
        d.push_str(&number(p.y));
    }
    d
}
