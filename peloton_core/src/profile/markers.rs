// Copyright 2026 the Peloton Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Start, finish, and checkpoint markers on the profile, and the
//! de-duplicated distance numbers printed under them.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use crate::checkpoint::CheckpointColor;

/// What a profile marker stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkerKind {
    /// First counted step.
    Start,
    /// End of the last counted step.
    Finish,
    /// A course checkpoint.
    Checkpoint {
        /// Position in the checkpoint list.
        index: usize,
        /// Marker colour.
        color: CheckpointColor,
    },
}

impl MarkerKind {
    /// Whether this is the start or finish marker.
    #[must_use]
    pub const fn is_start_or_finish(self) -> bool {
        matches!(self, Self::Start | Self::Finish)
    }

    const fn priority(self) -> u8 {
        if self.is_start_or_finish() { 2 } else { 1 }
    }
}

/// A labelled marker on the profile curve.
#[derive(Clone, Debug, PartialEq)]
pub struct ProfileMarker {
    /// What the marker stands for.
    pub kind: MarkerKind,
    /// Horizontal position, clamped to the inner frame.
    pub x: f64,
    /// Curve height at `x`.
    pub y: f64,
    /// Text drawn in the marker disc.
    pub label: String,
    /// Distance count at the marker.
    pub count: u32,
}

/// One distance number printed under the profile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CountLabel {
    /// Horizontal position.
    pub x: f64,
    /// Distance count shown.
    pub count: u32,
}

/// Collapses markers sharing a distance count into one number each.
///
/// Start and finish win over checkpoints; among equals the leftmost wins.
/// The result is sorted by x.
#[must_use]
pub fn dedupe_counts(markers: &[ProfileMarker]) -> Vec<CountLabel> {
    let mut best: BTreeMap<u32, (u8, f64)> = BTreeMap::new();
    for m in markers {
        let priority = m.kind.priority();
        best.entry(m.count)
            .and_modify(|(p, x)| {
                if priority > *p || (priority == *p && m.x < *x) {
                    *p = priority;
                    *x = m.x;
                }
            })
            .or_insert((priority, m.x));
    }
    let mut labels: Vec<_> = best
        .into_iter()
        .map(|(count, (_, x))| CountLabel { x, count })
        .collect();
    labels.sort_by(|a, b| a.x.total_cmp(&b.x));
    labels
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    fn marker(kind: MarkerKind, x: f64, count: u32) -> ProfileMarker {
        ProfileMarker {
            kind,
            x,
            y: 0.0,
            label: "?".to_string(),
            count,
        }
    }

    fn cp(index: usize) -> MarkerKind {
        MarkerKind::Checkpoint {
            index,
            color: CheckpointColor::Red,
        }
    }

    #[test]
    fn start_beats_checkpoint_on_same_count() {
        let labels = dedupe_counts(&[marker(cp(0), 5.0, 0), marker(MarkerKind::Start, 8.0, 0)]);
        assert_eq!(labels, [CountLabel { x: 8.0, count: 0 }]);
    }

    #[test]
    fn leftmost_checkpoint_wins_ties() {
        let labels = dedupe_counts(&[
            marker(cp(0), 300.0, 3),
            marker(cp(1), 250.0, 3),
            marker(MarkerKind::Finish, 792.0, 9),
        ]);
        assert_eq!(
            labels,
            [
                CountLabel { x: 250.0, count: 3 },
                CountLabel { x: 792.0, count: 9 }
            ]
        );
    }

    #[test]
    fn output_sorted_by_x() {
        let labels = dedupe_counts(&[
            marker(MarkerKind::Finish, 700.0, 4),
            marker(cp(0), 400.0, 2),
            marker(MarkerKind::Start, 8.0, 0),
        ]);
        let xs: Vec<f64> = labels.iter().map(|l| l.x).collect();
        assert_eq!(xs, [8.0, 400.0, 700.0]);
    }
}
