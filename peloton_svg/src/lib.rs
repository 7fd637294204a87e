// Copyright 2026 the Peloton Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! SVG front end for peloton.
//!
//! This crate turns tile drawings into anchors for the chain and turns a
//! [`Course`](peloton_core::course::Course) back into SVG. It provides:
//!
//! - [`Element`]: an owned SVG tree parsed with `roxmltree`
//! - [`TileDrawing`]: a pristine drawing that namespaces its ids per
//!   placement and implements [`AnchorSource`](peloton_core::socket::AnchorSource)
//! - [`render_scene`]: the stage with tiles, badges, and checkpoints
//! - [`render_profile`]: the elevation profile panel

mod anchors;
mod document;
mod drawing;
mod error;
mod namespace;
mod profile;
mod scene;

pub use anchors::{anchor_point, read_anchors, strip_helpers};
pub use document::{Descendants, Element, Node, SVG_NS, XLINK_NS, number};
pub use drawing::{DrawingSource, TileDrawing};
pub use error::SvgError;
pub use namespace::namespace_ids;
pub use profile::{PLACEHOLDER_TEXT, render_profile, step_color};
pub use scene::{FONT_FAMILY, RenderMode, SceneOptions, matrix, render_scene};
