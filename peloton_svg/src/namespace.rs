// Copyright 2026 the Peloton Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-instance id namespacing.
//!
//! Every placement of a drawing gets its own copy with each `id` prefixed by
//! the instance prefix (`t7-`). References are rewritten in the same pass so
//! gradients, clip paths, and `<use>` targets keep pointing inside their own
//! copy. References to ids the drawing does not define are left alone.

use std::collections::BTreeSet;

use crate::document::Element;

/// Prefixes every id in `root` and rewrites `url(#id)` and `#id` references
/// to match.
pub fn namespace_ids(root: &mut Element, prefix: &str) {
    let ids: BTreeSet<String> = root
        .descendants()
        .filter_map(|e| e.id().map(str::to_owned))
        .collect();
    if ids.is_empty() {
        return;
    }
    root.for_each_mut(&mut |el| {
        let mut updates = Vec::new();
        for (name, value) in el.attributes() {
            let rewritten = if name == "id" {
                Some(format!("{prefix}{value}"))
            } else if is_href(name) {
                value
                    .strip_prefix('#')
                    .filter(|id| ids.contains(*id))
                    .map(|id| format!("#{prefix}{id}"))
            } else {
                rewrite_urls(value, prefix, &ids)
            };
            if let Some(v) = rewritten {
                updates.push((name.to_owned(), v));
            }
        }
        for (name, value) in updates {
            el.set_attr(&name, value);
        }
    });
}

fn is_href(name: &str) -> bool {
    name == "href" || name == "xlink:href"
}

/// Rewrites every `url(#id)` (optionally quoted, with optional whitespace
/// inside the parentheses) whose id is in `ids`. Rewritten references drop
/// that whitespace. Returns `None` when nothing changed.
fn rewrite_urls(value: &str, prefix: &str, ids: &BTreeSet<String>) -> Option<String> {
    let mut out = String::with_capacity(value.len() + prefix.len());
    let mut rest = value;
    let mut changed = false;
    while let Some(pos) = rest.find("url(") {
        let (head, tail) = rest.split_at(pos + 4);
        out.push_str(head);
        let Some(end) = tail.find(')') else {
            rest = tail;
            break;
        };
        let inner = &tail[..end];
        let trimmed = inner.trim();
        let quote = trimmed.chars().next().filter(|c| *c == '\'' || *c == '"');
        let body = quote.map_or(trimmed, |q| trimmed.trim_matches(q).trim());
        match body.strip_prefix('#').filter(|id| ids.contains(*id)) {
            Some(id) => {
                changed = true;
                let q = quote.map(String::from).unwrap_or_default();
                out.push_str(&format!("{q}#{prefix}{id}{q}"));
            }
            None => out.push_str(inner),
        }
        out.push(')');
        rest = &tail[end + 1..];
    }
    out.push_str(rest);
    changed.then_some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drawing() -> Element {
        Element::parse_svg(
            r##"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink">
  <defs>
    <linearGradient id="grad"/>
    <clipPath id="clip"/>
  </defs>
  <rect id="road" fill="url(#grad)" clip-path="url('#clip')" stroke="url(#elsewhere)"/>
  <use xlink:href="#road"/>
  <use href="#missing"/>
  <g style="filter:url(#grad);opacity:0.5"/>
</svg>"##,
        )
        .unwrap()
    }

    #[test]
    fn ids_and_references_are_prefixed() {
        let mut root = drawing();
        namespace_ids(&mut root, "t3-");
        assert!(root.find_by_id("t3-grad").is_some());
        assert!(root.find_by_id("grad").is_none());
        let road = root.find_by_id("t3-road").unwrap();
        assert_eq!(road.attr("fill"), Some("url(#t3-grad)"));
        assert_eq!(road.attr("clip-path"), Some("url('#t3-clip')"));
        assert_eq!(road.attr("stroke"), Some("url(#elsewhere)"));
        let hrefs: Vec<_> = root
            .descendants()
            .filter(|e| e.name() == "use")
            .map(|e| e.attr("xlink:href").or(e.attr("href")).unwrap().to_owned())
            .collect();
        assert_eq!(hrefs, ["#t3-road", "#missing"]);
        let styled = root.descendants().find(|e| e.attr("style").is_some()).unwrap();
        assert_eq!(styled.attr("style"), Some("filter:url(#t3-grad);opacity:0.5"));
    }

    #[test]
    fn instances_do_not_collide() {
        let pristine = drawing();
        let mut a = pristine.clone();
        let mut b = pristine.clone();
        namespace_ids(&mut a, "t1-");
        namespace_ids(&mut b, "t2-");
        let ids_a: BTreeSet<_> = a.descendants().filter_map(Element::id).collect();
        let ids_b: BTreeSet<_> = b.descendants().filter_map(Element::id).collect();
        assert_eq!(ids_a.len(), 3);
        assert!(ids_a.is_disjoint(&ids_b));
    }

    #[test]
    fn unterminated_url_is_left_alone() {
        let ids = BTreeSet::from(["a".to_owned()]);
        assert_eq!(rewrite_urls("url(#a", "p-", &ids), None);
        assert_eq!(rewrite_urls("none", "p-", &ids), None);
        assert_eq!(
            rewrite_urls("url(#a) url(#a)", "p-", &ids).as_deref(),
            Some("url(#p-a) url(#p-a)")
        );
    }

    #[test]
    fn whitespace_inside_url_is_tolerated() {
        let ids = BTreeSet::from(["a".to_owned()]);
        assert_eq!(
            rewrite_urls("url( #a )", "p-", &ids).as_deref(),
            Some("url(#p-a)")
        );
        assert_eq!(
            rewrite_urls("fill:url( ' #a' );", "p-", &ids).as_deref(),
            Some("fill:url('#p-a');")
        );
        assert_eq!(rewrite_urls("url( #b )", "p-", &ids), None);
    }
}
