// Copyright 2026 the Peloton Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ordered tile storage with append, remove-last, replace, and cascading
//! relayout.

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::ops::Range;

use understory_dirty::{CycleHandling, DirtyTracker, EagerPolicy};

use super::id::InstanceId;
use super::layout::{LayoutConfig, first_placement, successor_placement};
use super::tile::PlacedTile;
use crate::dirty;
use crate::error::PlacementError;
use crate::geometry::Placement;
use crate::socket::AnchorSource;
use crate::terrain::TileAsset;

/// The positions recomputed by one [`TileChain::evaluate`] call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cascade {
    /// Relaid-out positions, always a suffix of the chain.
    pub range: Range<usize>,
}

impl Cascade {
    /// Number of tiles that were relaid out.
    #[must_use]
    pub fn len(&self) -> usize {
        self.range.len()
    }

    /// Whether the cascade touched no tiles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }
}

/// The ordered list of placed tiles.
///
/// Every public mutation runs [`evaluate`](Self::evaluate) before returning,
/// so no tile's placement is ever observed stale relative to its predecessor.
#[derive(Debug)]
pub struct TileChain {
    tiles: Vec<PlacedTile>,
    config: LayoutConfig,
    next_instance: u32,
    dirty: DirtyTracker<u32>,
}

impl Default for TileChain {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

impl TileChain {
    /// Creates an empty chain.
    #[must_use]
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            tiles: Vec::new(),
            config,
            next_instance: 1,
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
        }
    }

    /// Layout configuration.
    #[must_use]
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Number of placed tiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether the chain is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Tile at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&PlacedTile> {
        self.tiles.get(index)
    }

    /// Last tile, if any.
    #[must_use]
    pub fn last(&self) -> Option<&PlacedTile> {
        self.tiles.last()
    }

    /// Tiles in chain order.
    #[must_use]
    pub fn tiles(&self) -> &[PlacedTile] {
        &self.tiles
    }

    /// Iterates tiles in chain order.
    pub fn iter(&self) -> core::slice::Iter<'_, PlacedTile> {
        self.tiles.iter()
    }

    fn allocate_instance(&mut self) -> InstanceId {
        let id = InstanceId(self.next_instance);
        self.next_instance += 1;
        id
    }

    /// Builds a detached tile from an asset and its anchors.
    ///
    /// An instance id is consumed even when the anchors turn out to be
    /// unusable, so ids are never handed out twice.
    fn build<S: AnchorSource + ?Sized>(
        &mut self,
        index: usize,
        asset: Arc<TileAsset>,
        source: &S,
    ) -> Result<PlacedTile, PlacementError> {
        let instance = self.allocate_instance();
        let anchors = source.anchors(instance);
        let socket = anchors.socket()?;
        Ok(PlacedTile {
            index,
            instance,
            socket,
            goals: anchors.goal_pairs(),
            placement: Placement::IDENTITY,
            asset,
        })
    }

    fn mark(&mut self, index: usize) {
        let key = key(index);
        self.dirty.mark_with(key, dirty::PLACEMENT, &EagerPolicy);
    }

    /// Appends a tile after the current last tile.
    ///
    /// Returns the new tile's index and the cascade that placed it.
    ///
    /// # Errors
    ///
    /// Returns [`PlacementError::MissingAnchor`] if the anchors do not define
    /// a socket. The chain is left unchanged.
    pub fn append<S: AnchorSource + ?Sized>(
        &mut self,
        asset: Arc<TileAsset>,
        source: &S,
    ) -> Result<(usize, Cascade), PlacementError> {
        let index = self.tiles.len();
        let tile = self.build(index, asset, source)?;
        self.tiles.push(tile);

        // The new tile depends on its predecessor for placement.
        if index > 0 {
            let _ = self
                .dirty
                .add_dependency(key(index), key(index - 1), dirty::PLACEMENT);
        }
        self.mark(index);
        Ok((index, self.evaluate()))
    }

    /// Removes and returns the last tile.
    ///
    /// Earlier tiles never depend on later ones, so no relayout is needed.
    pub fn remove_last(&mut self) -> Option<PlacedTile> {
        let tile = self.tiles.pop()?;
        self.dirty.remove_key(key(tile.index));
        Some(tile)
    }

    /// Swaps the tile at `index` for a newly built one and relays out every
    /// tile from `index` to the end.
    ///
    /// Returns the replaced tile and the cascade.
    ///
    /// # Errors
    ///
    /// Returns [`PlacementError::IndexOutOfRange`] if `index` is past the end,
    /// or [`PlacementError::MissingAnchor`] if the new anchors do not define
    /// a socket. In both cases the chain is left unchanged.
    pub fn replace<S: AnchorSource + ?Sized>(
        &mut self,
        index: usize,
        asset: Arc<TileAsset>,
        source: &S,
    ) -> Result<(PlacedTile, Cascade), PlacementError> {
        let len = self.tiles.len();
        if index >= len {
            return Err(PlacementError::IndexOutOfRange { index, len });
        }
        let tile = self.build(index, asset, source)?;
        let old = core::mem::replace(&mut self.tiles[index], tile);
        self.mark(index);
        Ok((old, self.evaluate()))
    }

    /// Removes every tile. The instance counter keeps running.
    pub fn clear(&mut self) {
        self.tiles.clear();
        self.dirty = DirtyTracker::with_cycle_handling(CycleHandling::Error);
    }

    /// Drains the placement channel and relays out the dirty suffix.
    ///
    /// Returns the recomputed range; it is empty when nothing was dirty.
    pub fn evaluate(&mut self) -> Cascade {
        let len = self.tiles.len();
        // The drain yields the marked keys and everything downstream of them,
        // so its minimum is the head of the stale suffix.
        let Some(start) = self
            .dirty
            .drain(dirty::PLACEMENT)
            .affected()
            .deterministic()
            .run()
            .map(|k| k as usize)
            .filter(|&i| i < len)
            .min()
        else {
            return Cascade { range: len..len };
        };
        self.relayout_from(start);
        Cascade { range: start..len }
    }

    /// Recomputes placements for `start..len`, each from its predecessor.
    fn relayout_from(&mut self, start: usize) {
        for i in start..self.tiles.len() {
            let placement = if i == 0 {
                first_placement(&self.tiles[0].socket, &self.config)
            } else {
                successor_placement(&self.tiles[i - 1], &self.tiles[i].socket)
            };
            let tile = &mut self.tiles[i];
            tile.placement = placement;
            tile.index = i;
        }
    }
}

impl<'a> IntoIterator for &'a TileChain {
    type Item = &'a PlacedTile;
    type IntoIter = core::slice::Iter<'a, PlacedTile>;

    fn into_iter(self) -> Self::IntoIter {
        self.tiles.iter()
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "courses hold tens of tiles, far below u32::MAX"
)]
fn key(index: usize) -> u32 {
    index as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{approx_eq, normalize_angle};
    use crate::socket::{AnchorKind, AnchorSet};
    use crate::test_support::{asset, right_turn, straight};
    use core::f64::consts::FRAC_PI_2;
    use kurbo::Point;

    const EPS: f64 = 1e-9;

    fn assert_continuous(chain: &TileChain) {
        for pair in chain.tiles().windows(2) {
            let (p, q) = (&pair[0], &pair[1]);
            assert!(
                q.world_entry().distance(p.world_exit()) < EPS,
                "seam {}→{} is open",
                p.index(),
                q.index()
            );
            assert!(
                approx_eq(
                    normalize_angle(q.world_entry_angle() - p.world_exit_angle()),
                    0.0,
                    EPS
                ),
                "tangent breaks at seam {}→{}",
                p.index(),
                q.index()
            );
        }
    }

    #[test]
    fn first_tile_sits_on_origin() {
        let mut chain = TileChain::default();
        let (index, cascade) = chain.append(asset("a"), &straight(100.0)).unwrap();
        assert_eq!(index, 0);
        assert_eq!(cascade.range, 0..1);
        let tile = chain.get(0).unwrap();
        assert_eq!(tile.placement().rotation, 0.0);
        assert!(tile.world_entry().distance(Point::new(2000.0, 1500.0)) < EPS);
    }

    #[test]
    fn appended_tiles_are_continuous() {
        let mut chain = TileChain::default();
        chain.append(asset("a"), &straight(100.0)).unwrap();
        chain.append(asset("b"), &right_turn()).unwrap();
        chain.append(asset("c"), &straight(60.0)).unwrap();
        chain.append(asset("d"), &right_turn()).unwrap();
        assert_continuous(&chain);
        // Two right turns: the last exit heads back the way we came.
        let last = chain.last().unwrap();
        assert!(approx_eq(
            normalize_angle(last.world_exit_angle()),
            core::f64::consts::PI,
            1e-9
        ));
    }

    #[test]
    fn append_only_lays_out_new_tile() {
        let mut chain = TileChain::default();
        chain.append(asset("a"), &straight(100.0)).unwrap();
        chain.append(asset("b"), &straight(100.0)).unwrap();
        let (_, cascade) = chain.append(asset("c"), &straight(100.0)).unwrap();
        assert_eq!(cascade.range, 2..3);
    }

    #[test]
    fn replay_is_deterministic() {
        let build = || {
            let mut chain = TileChain::default();
            chain.append(asset("a"), &right_turn()).unwrap();
            chain.append(asset("b"), &straight(80.0)).unwrap();
            chain.append(asset("c"), &right_turn()).unwrap();
            chain
        };
        let a = build();
        let b = build();
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.placement(), y.placement());
            assert_eq!(x.instance(), y.instance());
        }
    }

    #[test]
    fn rejected_tile_leaves_chain_unchanged() {
        let mut chain = TileChain::default();
        chain.append(asset("a"), &straight(100.0)).unwrap();
        let broken = AnchorSet::new().with("entry-point", Point::ZERO);
        let err = chain.append(asset("bad"), &broken).unwrap_err();
        assert_eq!(err, PlacementError::MissingAnchor(AnchorKind::ExitPoint));
        assert_eq!(chain.len(), 1);
        // The failed attempt still consumed an instance id.
        chain.append(asset("b"), &straight(100.0)).unwrap();
        assert_eq!(chain.get(1).unwrap().instance(), InstanceId::from_raw(3));
    }

    #[test]
    fn remove_last_keeps_survivors() {
        let mut chain = TileChain::default();
        chain.append(asset("a"), &straight(100.0)).unwrap();
        chain.append(asset("b"), &right_turn()).unwrap();
        let before = chain.get(0).unwrap().placement();
        let removed = chain.remove_last().unwrap();
        assert_eq!(removed.asset().id, "b");
        assert_eq!(chain.len(), 1);
        assert_eq!(chain.get(0).unwrap().placement(), before);
        assert!(chain.remove_last().is_some());
        assert!(chain.remove_last().is_none());
    }

    #[test]
    fn append_after_remove_relinks() {
        let mut chain = TileChain::default();
        chain.append(asset("a"), &straight(100.0)).unwrap();
        chain.append(asset("b"), &straight(100.0)).unwrap();
        chain.remove_last();
        chain.append(asset("c"), &right_turn()).unwrap();
        assert_continuous(&chain);
        // Replacing the head still cascades into the re-appended tile.
        let (_, cascade) = chain.replace(0, asset("d"), &right_turn()).unwrap();
        assert_eq!(cascade.range, 0..2);
        assert_continuous(&chain);
    }

    #[test]
    fn replace_cascades_suffix_only() {
        let mut chain = TileChain::default();
        for id in ["a", "b", "c", "d", "e"] {
            chain.append(asset(id), &straight(100.0)).unwrap();
        }
        let prefix: Vec<_> = chain.iter().take(2).map(PlacedTile::placement).collect();
        let (old, cascade) = chain.replace(2, asset("x"), &right_turn()).unwrap();
        assert_eq!(old.asset().id, "c");
        assert_eq!(cascade.range, 2..5);
        for (tile, before) in chain.iter().zip(&prefix) {
            assert_eq!(tile.placement(), *before);
        }
        assert_eq!(chain.get(2).unwrap().asset().id, "x");
        assert_continuous(&chain);
    }

    #[test]
    fn replace_head_rotates_tail_rigidly() {
        let mut chain = TileChain::default();
        chain.append(asset("a"), &straight(100.0)).unwrap();
        chain.append(asset("b"), &straight(50.0)).unwrap();
        chain.append(asset("c"), &right_turn()).unwrap();
        let spacing = |chain: &TileChain| {
            let b = chain.get(1).unwrap();
            let c = chain.get(2).unwrap();
            (b.world_entry().distance(c.world_exit()), c.placement().rotation - b.placement().rotation)
        };
        let (dist_before, rel_before) = spacing(&chain);
        let rot_before = chain.get(1).unwrap().placement().rotation;

        // Same length as the original head, but it exits turned by 90°.
        let turned = AnchorSet::new()
            .with("entry-point", Point::new(0.0, 0.0))
            .with("entry-dir", Point::new(1.0, 0.0))
            .with("exit-point", Point::new(100.0, 0.0))
            .with("exit-dir", Point::new(100.0, 1.0));
        chain.replace(0, asset("a2"), &turned).unwrap();

        let (dist_after, rel_after) = spacing(&chain);
        assert!(approx_eq(dist_before, dist_after, EPS));
        assert!(approx_eq(rel_before, rel_after, EPS));
        let rot_after = chain.get(1).unwrap().placement().rotation;
        assert!(approx_eq(rot_after - rot_before, FRAC_PI_2, EPS));
        // The seam point itself did not move.
        assert!(
            chain
                .get(1)
                .unwrap()
                .world_entry()
                .distance(Point::new(2100.0, 1500.0))
                < EPS
        );
        assert_continuous(&chain);
    }

    #[test]
    fn replace_out_of_range_is_rejected() {
        let mut chain = TileChain::default();
        chain.append(asset("a"), &straight(100.0)).unwrap();
        let err = chain.replace(3, asset("b"), &straight(10.0)).unwrap_err();
        assert_eq!(err, PlacementError::IndexOutOfRange { index: 3, len: 1 });
    }

    #[test]
    fn replace_with_broken_tile_keeps_old() {
        let mut chain = TileChain::default();
        chain.append(asset("a"), &straight(100.0)).unwrap();
        chain.append(asset("b"), &straight(100.0)).unwrap();
        let before = chain.get(1).unwrap().placement();
        assert!(chain.replace(1, asset("bad"), &AnchorSet::new()).is_err());
        assert_eq!(chain.get(1).unwrap().asset().id, "b");
        assert_eq!(chain.get(1).unwrap().placement(), before);
    }

    #[test]
    fn clear_keeps_counter_running() {
        let mut chain = TileChain::default();
        chain.append(asset("a"), &straight(100.0)).unwrap();
        chain.clear();
        assert!(chain.is_empty());
        chain.append(asset("b"), &straight(100.0)).unwrap();
        assert_eq!(chain.get(0).unwrap().instance(), InstanceId::from_raw(2));
        assert!(
            chain
                .get(0)
                .unwrap()
                .world_entry()
                .distance(Point::new(2000.0, 1500.0))
                < EPS
        );
    }

    #[test]
    fn evaluate_without_edits_is_empty() {
        let mut chain = TileChain::default();
        chain.append(asset("a"), &straight(100.0)).unwrap();
        assert!(chain.evaluate().is_empty());
    }
}
