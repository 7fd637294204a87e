// Copyright 2026 the Peloton Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stage rendering.
//!
//! The stage document has a fixed `viewBox` and one camera group holding
//! three layers:
//!
//! ```text
//! <svg viewBox="0 0 W H">
//!   <defs>  halo filter for checkpoint markers
//!   <g id="camera" transform="matrix(..)">
//!     <g id="stage-root">        one group per placed tile
//!     <g id="label-layer">       upright tile badges
//!     <g id="checkpoint-layer">  chord lines and discs
//! ```

use kurbo::Affine;
use peloton_core::chain::PlacedTile;
use peloton_core::checkpoint::CheckpointMarker;
use peloton_core::course::Course;
use peloton_core::terrain::Theme;
use peloton_core::view::ViewportConfig;

use crate::anchors::strip_helpers;
use crate::document::{Element, number};
use crate::drawing::DrawingSource;

/// Font used for badges and marker labels.
pub const FONT_FAMILY: &str = "Oswald, sans-serif";

const HALO_FILTER_ID: &str = "cpHalo";

const BADGE_FONT_SIZE: f64 = 44.0;
const BADGE_PADDING: f64 = 8.0;
const BADGE_CHAR_WIDTH: f64 = 0.6;

const CHECKPOINT_STROKE: f64 = 8.0;
const CHECKPOINT_RADIUS: f64 = 32.0;
const CHECKPOINT_FONT_SIZE: f64 = 42.0;

/// What the rendered stage is for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RenderMode {
    /// Keeps helper anchors visible.
    #[default]
    Editor,
    /// Strips helper anchors from every tile.
    Export,
}

/// Stage rendering options.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneOptions {
    /// Whether helper anchors are kept.
    pub mode: RenderMode,
    /// Visible frame the camera fits the course into.
    pub viewport: ViewportConfig,
}

impl SceneOptions {
    /// Editor rendering on the default stage.
    #[must_use]
    pub const fn editor() -> Self {
        Self {
            mode: RenderMode::Editor,
            viewport: ViewportConfig::stage(),
        }
    }

    /// Export rendering on the default stage.
    #[must_use]
    pub const fn export() -> Self {
        Self {
            mode: RenderMode::Export,
            viewport: ViewportConfig::stage(),
        }
    }
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self::editor()
    }
}

/// Renders the course stage.
///
/// Tiles whose drawing is not found in `drawings` keep their (empty) group so
/// that group positions still match chain positions.
#[must_use]
pub fn render_scene<D: DrawingSource + ?Sized>(
    course: &Course,
    drawings: &D,
    options: &SceneOptions,
) -> Element {
    let vp = options.viewport;
    let upright = course.view().upright_rotation_degrees();

    let mut stage = Element::new("g").with_attr("id", "stage-root");
    let mut labels = Element::new("g").with_attr("id", "label-layer");
    for tile in course.chain() {
        stage.push(tile_group(tile, drawings, options.mode));
        if let Some(badge) = label_badge(tile, upright) {
            labels.push(badge);
        }
    }
    let mut checkpoints = Element::new("g").with_attr("id", "checkpoint-layer");
    for marker in course.checkpoint_markers() {
        checkpoints.push(checkpoint_group(&marker));
    }

    let camera = Element::new("g")
        .with_attr("id", "camera")
        .with_attr("transform", matrix(course.camera(&vp)))
        .with_child(stage)
        .with_child(labels)
        .with_child(checkpoints);

    Element::new("svg")
        .with_attr("viewBox", format!("0 0 {} {}", number(vp.width), number(vp.height)))
        .with_attr("width", number(vp.width))
        .with_attr("height", number(vp.height))
        .with_child(Element::new("defs").with_child(halo_filter()))
        .with_child(camera)
}

/// SVG `matrix(..)` form of an affine map.
#[must_use]
pub fn matrix(affine: Affine) -> String {
    let c = affine.as_coeffs().map(number);
    format!("matrix({} {} {} {} {} {})", c[0], c[1], c[2], c[3], c[4], c[5])
}

fn tile_group<D: DrawingSource + ?Sized>(
    tile: &PlacedTile,
    drawings: &D,
    mode: RenderMode,
) -> Element {
    let prefix = tile.instance().prefix();
    let placement = tile.placement();
    let mut group = Element::new("g")
        .with_attr("data-prefix", prefix.as_str())
        .with_attr("data-tile", tile.asset().id.as_str())
        .with_attr(
            "transform",
            format!(
                "translate({},{}) rotate({})",
                number(placement.translation.x),
                number(placement.translation.y),
                number(placement.rotation_degrees())
            ),
        );
    if let Some(drawing) = drawings.drawing(&tile.asset().id) {
        let mut svg = drawing.instantiate(tile.instance());
        if mode == RenderMode::Export {
            strip_helpers(&mut svg, &prefix);
        }
        group.push(svg);
    }
    group
}

fn label_badge(tile: &PlacedTile, upright_degrees: f64) -> Option<Element> {
    let center = tile.world_center()?;
    let asset = tile.asset();
    let (fill, ink) = match asset.theme {
        Theme::Dark => ("#000", "#fff"),
        Theme::Light => ("#fff", "#000"),
    };
    let chars = asset.label.chars().count() as f64;
    let w = chars * BADGE_FONT_SIZE * BADGE_CHAR_WIDTH + BADGE_PADDING * 2.0;
    let h = BADGE_FONT_SIZE + BADGE_PADDING * 2.0;
    let rect = Element::new("rect")
        .with_attr("x", number(-w / 2.0))
        .with_attr("y", number(-h / 2.0))
        .with_attr("width", number(w))
        .with_attr("height", number(h))
        .with_attr("rx", "3")
        .with_attr("ry", "3")
        .with_attr("fill", fill)
        .with_attr("stroke", ink)
        .with_attr("stroke-width", "0.5");
    let text = Element::new("text")
        .with_attr("text-anchor", "middle")
        .with_attr("font-size", number(BADGE_FONT_SIZE))
        .with_attr("y", number(BADGE_FONT_SIZE / 3.0))
        .with_attr("fill", ink)
        .with_attr("font-family", FONT_FAMILY)
        .with_attr("font-weight", "600")
        .with_text(asset.label.as_str());
    Some(
        Element::new("g")
            .with_attr("class", "tile-label")
            .with_attr("transform", upright_transform(center.x, center.y, upright_degrees))
            .with_child(rect)
            .with_child(text),
    )
}

fn checkpoint_group(marker: &CheckpointMarker) -> Element {
    let color = marker.color.hex();
    let line = Element::new("line")
        .with_attr("x1", number(marker.a.x))
        .with_attr("y1", number(marker.a.y))
        .with_attr("x2", number(marker.b.x))
        .with_attr("y2", number(marker.b.y))
        .with_attr("stroke", color)
        .with_attr("stroke-width", number(CHECKPOINT_STROKE))
        .with_attr("stroke-linecap", "square");
    let disc = Element::new("g")
        .with_attr(
            "transform",
            upright_transform(marker.position.x, marker.position.y, marker.rotation_degrees),
        )
        .with_child(
            Element::new("circle")
                .with_attr("r", number(CHECKPOINT_RADIUS))
                .with_attr("cx", "0")
                .with_attr("cy", "0")
                .with_attr("fill", color),
        )
        .with_child(
            Element::new("text")
                .with_attr("text-anchor", "middle")
                .with_attr("font-size", number(CHECKPOINT_FONT_SIZE))
                .with_attr("y", "16")
                .with_attr("fill", "#fff")
                .with_attr("font-weight", "600")
                .with_attr("font-family", FONT_FAMILY)
                .with_text(marker.label.as_str()),
        );
    Element::new("g")
        .with_attr("class", "checkpoint")
        .with_attr("data-index", marker.index.to_string())
        .with_child(
            Element::new("g")
                .with_attr("filter", format!("url(#{HALO_FILTER_ID})"))
                .with_child(line)
                .with_child(disc),
        )
}

fn upright_transform(x: f64, y: f64, degrees: f64) -> String {
    format!(
        "translate({}, {}) rotate({})",
        number(x),
        number(y),
        number(degrees)
    )
}

/// White outline behind checkpoint markers.
fn halo_filter() -> Element {
    Element::new("filter")
        .with_attr("id", HALO_FILTER_ID)
        .with_attr("x", "-20%")
        .with_attr("y", "-20%")
        .with_attr("width", "140%")
        .with_attr("height", "140%")
        .with_attr("color-interpolation-filters", "sRGB")
        .with_child(
            Element::new("feMorphology")
                .with_attr("in", "SourceAlpha")
                .with_attr("operator", "dilate")
                .with_attr("radius", "2")
                .with_attr("result", "spread"),
        )
        .with_child(
            Element::new("feFlood")
                .with_attr("flood-color", "#fff")
                .with_attr("flood-opacity", "1")
                .with_attr("result", "white"),
        )
        .with_child(
            Element::new("feComposite")
                .with_attr("in", "white")
                .with_attr("in2", "spread")
                .with_attr("operator", "in")
                .with_attr("result", "halo"),
        )
        .with_child(
            Element::new("feMerge")
                .with_child(Element::new("feMergeNode").with_attr("in", "halo"))
                .with_child(Element::new("feMergeNode").with_attr("in", "SourceGraphic")),
        )
}
