// Copyright 2026 the Peloton Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Parsed tile drawings.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use peloton_core::chain::InstanceId;
use peloton_core::socket::{AnchorSet, AnchorSource};

use crate::anchors::read_anchors;
use crate::document::Element;
use crate::error::SvgError;
use crate::namespace::namespace_ids;

/// A tile drawing kept in its pristine, un-namespaced form.
///
/// Each placement works on its own copy from
/// [`instantiate`](Self::instantiate), so two placements of the same drawing
/// never share element ids.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileDrawing {
    root: Element,
}

impl TileDrawing {
    /// Parses SVG text.
    pub fn parse(text: &str) -> Result<Self, SvgError> {
        Element::parse_svg(text).map(|root| Self { root })
    }

    /// The pristine `<svg>` element.
    #[must_use]
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// A copy with every id namespaced for `instance`.
    #[must_use]
    pub fn instantiate(&self, instance: InstanceId) -> Element {
        let mut root = self.root.clone();
        namespace_ids(&mut root, &instance.prefix());
        root
    }

    /// Anchors of the pristine drawing.
    #[must_use]
    pub fn local_anchors(&self) -> AnchorSet {
        read_anchors(&self.root, "")
    }
}

impl AnchorSource for TileDrawing {
    fn anchors(&self, instance: InstanceId) -> AnchorSet {
        read_anchors(&self.instantiate(instance), &instance.prefix())
    }
}

/// Looks up the drawing for a tile id.
pub trait DrawingSource {
    /// The drawing registered for `tile_id`, if any.
    fn drawing(&self, tile_id: &str) -> Option<&TileDrawing>;
}

impl DrawingSource for BTreeMap<String, TileDrawing> {
    fn drawing(&self, tile_id: &str) -> Option<&TileDrawing> {
        self.get(tile_id)
    }
}

impl<S: BuildHasher> DrawingSource for HashMap<String, TileDrawing, S> {
    fn drawing(&self, tile_id: &str) -> Option<&TileDrawing> {
        self.get(tile_id)
    }
}
