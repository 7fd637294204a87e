// Copyright 2026 the Peloton Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reading helper anchors out of a drawing, and stripping them for export.

use kurbo::Point;
use peloton_core::socket::{AnchorSet, is_helper_anchor};

use crate::document::Element;

/// Local position of an anchor element.
///
/// Circles use `cx`/`cy`, other shapes `x`/`y`, lines `x1`/`y1`. Missing or
/// unparsable coordinates read as zero. Transforms are not applied.
#[must_use]
pub fn anchor_point(el: &Element) -> Point {
    let pair = [("cx", "cy"), ("x", "y"), ("x1", "y1")]
        .into_iter()
        .find(|(x, _)| el.attr(x).is_some())
        .unwrap_or(("cx", "cy"));
    Point::new(coordinate(el.attr(pair.0)), coordinate(el.attr(pair.1)))
}

fn coordinate(value: Option<&str>) -> f64 {
    value
        .map(|v| v.trim().trim_end_matches("px").trim())
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Collects every helper anchor under `root`, keyed by its id with `prefix`
/// removed.
#[must_use]
pub fn read_anchors(root: &Element, prefix: &str) -> AnchorSet {
    let mut set = AnchorSet::new();
    for el in root.descendants() {
        let Some(id) = el.id() else { continue };
        let local = id.strip_prefix(prefix).unwrap_or(id);
        if is_helper_anchor(local) {
            set.insert(local, anchor_point(el));
        }
    }
    set
}

/// Removes every helper anchor element under `root`.
pub fn strip_helpers(root: &mut Element, prefix: &str) {
    root.retain(&mut |el| {
        el.id()
            .map(|id| id.strip_prefix(prefix).unwrap_or(id))
            .is_none_or(|local| !is_helper_anchor(local))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use peloton_core::socket::AnchorKind;

    const TILE: &str = r#"<svg xmlns="http://www.w3.org/2000/svg">
  <path id="road" d="M0 0 L100 0"/>
  <circle id="t4-entry-point" cx="0" cy="50"/>
  <rect id="t4-entry-dir" x="10px" y=" 50 "/>
  <line id="t4-exit-point" x1="100" y1="50" x2="0" y2="0"/>
  <circle id="t4-exit-dir" cx="110" cy="50"/>
  <g id="t4-center-point"/>
  <circle id="t4-goal-3" cx="60" cy="10"/>
  <circle id="t4-goal-3b" cx="60" cy="90"/>
</svg>"#;

    #[test]
    fn anchors_are_read_without_prefix() {
        let root = Element::parse_svg(TILE).unwrap();
        let set = read_anchors(&root, "t4-");
        assert_eq!(set.len(), 7);
        assert_eq!(set.get_kind(AnchorKind::EntryPoint), Some(Point::new(0.0, 50.0)));
        assert_eq!(set.get_kind(AnchorKind::EntryDir), Some(Point::new(10.0, 50.0)));
        assert_eq!(set.get_kind(AnchorKind::ExitPoint), Some(Point::new(100.0, 50.0)));
        assert_eq!(set.get_kind(AnchorKind::Center), Some(Point::ZERO));
        let goals = set.goal_pairs();
        assert_eq!(goals.len(), 1);
        assert_eq!(goals.get("3").unwrap().midpoint(), Point::new(60.0, 50.0));
        assert!(set.socket().is_ok());
    }

    #[test]
    fn bad_coordinates_read_as_zero() {
        let el = Element::new("circle").with_attr("cx", "abc").with_attr("cy", "7");
        assert_eq!(anchor_point(&el), Point::new(0.0, 7.0));
        assert_eq!(anchor_point(&Element::new("g")), Point::ZERO);
    }

    #[test]
    fn strip_removes_only_helpers() {
        let mut root = Element::parse_svg(TILE).unwrap();
        strip_helpers(&mut root, "t4-");
        let ids: Vec<_> = root.descendants().filter_map(Element::id).collect();
        assert_eq!(ids, ["road"]);
    }
}
