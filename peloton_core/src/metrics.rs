// Copyright 2026 the Peloton Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Additive course statistics.

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::chain::TileChain;
use crate::terrain::{StatBundle, Theme};

/// Tile ids whose racing length differs from their goal-derived length.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RacingLengthTable {
    /// Ids counted as one square of racing length.
    pub one: &'static [&'static str],
    /// Ids counted as two squares of racing length.
    pub two: &'static [&'static str],
}

impl RacingLengthTable {
    /// Overrides for the Flamme Rouge tile set.
    #[must_use]
    pub const fn flamme_rouge() -> Self {
        Self {
            one: &["a", "1-upp", "u", "v"],
            two: &["a-upp", "1", "u-upp", "v-upp"],
        }
    }

    /// No overrides.
    #[must_use]
    pub const fn empty() -> Self {
        Self { one: &[], two: &[] }
    }

    /// Racing length of tile `id`, falling back to `length_class`.
    #[must_use]
    pub fn racing_length(&self, id: &str, length_class: u32) -> u32 {
        if self.one.contains(&id) {
            1
        } else if self.two.contains(&id) {
            2
        } else {
            length_class
        }
    }
}

impl Default for RacingLengthTable {
    fn default() -> Self {
        Self::flamme_rouge()
    }
}

/// One badge in the course setup strip.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SetupBadge {
    /// Tile label.
    pub label: String,
    /// Whether the badge uses the dark style.
    pub dark: bool,
}

/// Course-level counts derived from the chain.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CourseMetrics {
    /// Number of placed tiles.
    pub total: usize,
    /// Tiles of length class 6.
    pub long: usize,
    /// Tiles of length class 3.
    pub medium: usize,
    /// Tiles of length class 2.
    pub turns: usize,
    /// Sum of length classes.
    pub track: u32,
    /// Sum of racing lengths.
    pub racing: u32,
    /// Setup badges in chain order.
    pub setup: Vec<SetupBadge>,
    /// Square totals summed over every tile's statistics.
    pub squares: StatBundle,
    /// Placements per physical tile; both sides share one counter.
    pub usage: BTreeMap<String, u32>,
}

impl CourseMetrics {
    /// Computes metrics for the current chain.
    #[must_use]
    pub fn compute(chain: &TileChain, table: &RacingLengthTable) -> Self {
        let mut m = Self {
            total: chain.len(),
            ..Self::default()
        };
        for tile in chain {
            let asset = tile.asset();
            let len = tile.goals().length_class();
            match len {
                6 => m.long += 1,
                3 => m.medium += 1,
                2 => m.turns += 1,
                _ => {}
            }
            m.track += len;
            m.racing += table.racing_length(&asset.id, len);
            m.setup.push(SetupBadge {
                label: asset.label.clone(),
                dark: asset.is_back_side() || asset.theme == Theme::Dark,
            });
            m.squares += asset.stats;
            *m.usage.entry(asset.base_id().to_string()).or_insert(0) += 1;
        }
        m
    }

    /// How many times the physical tile behind `id` is in use.
    #[must_use]
    pub fn usage_of(&self, id: &str) -> u32 {
        let base = id.strip_suffix(crate::terrain::BACK_SIDE_SUFFIX).unwrap_or(id);
        self.usage.get(base).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::TileAsset;
    use crate::test_support::{straight, with_goal};
    use alloc::sync::Arc;

    #[test]
    fn empty_chain_is_zero() {
        let m = CourseMetrics::compute(&TileChain::default(), &RacingLengthTable::default());
        assert_eq!(m, CourseMetrics::default());
    }

    #[test]
    fn lengths_badges_and_usage() {
        let mut chain = TileChain::default();
        let long = with_goal(with_goal(straight(600.0), "2", 10.0), "6", 500.0);
        let turn = with_goal(straight(100.0), "2", 50.0);
        let front = Arc::new(TileAsset::new("c").with_stats(StatBundle {
            flat: 6,
            ..StatBundle::default()
        }));
        let back = Arc::new(TileAsset::new("c-upp").with_label("C").with_stats(StatBundle {
            asc: 2,
            flat: 4,
            ..StatBundle::default()
        }));
        let start = Arc::new(TileAsset::new("a").with_theme(Theme::Dark));
        chain.append(start, &turn).unwrap();
        chain.append(front, &long).unwrap();
        chain.append(back, &long).unwrap();

        let m = CourseMetrics::compute(&chain, &RacingLengthTable::flamme_rouge());
        assert_eq!(m.total, 3);
        assert_eq!((m.long, m.medium, m.turns), (2, 0, 1));
        assert_eq!(m.track, 14);
        // "a" races as a single square despite its turn-sized goals.
        assert_eq!(m.racing, 13);
        assert_eq!(m.squares.flat, 10);
        assert_eq!(m.squares.asc, 2);
        assert_eq!(m.usage_of("c"), 2);
        assert_eq!(m.usage_of("c-upp"), 2);
        assert_eq!(m.usage_of("z"), 0);
        let dark: Vec<bool> = m.setup.iter().map(|b| b.dark).collect();
        assert_eq!(dark, [true, false, true]);
        assert_eq!(m.setup[2].label, "C");
    }

    #[test]
    fn racing_table_overrides() {
        let table = RacingLengthTable::flamme_rouge();
        assert_eq!(table.racing_length("1", 6), 2);
        assert_eq!(table.racing_length("1-upp", 6), 1);
        assert_eq!(table.racing_length("q", 3), 3);
        assert_eq!(RacingLengthTable::empty().racing_length("a", 2), 2);
    }
}
