// Copyright 2026 the Peloton Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The course state object.
//!
//! [`Course`] owns the chain, the checkpoints, the view, and the course
//! metadata. Every mutation goes through one of its methods, runs layout and
//! checkpoint pruning to completion, and then notifies observers
//! synchronously with a [`CourseChange`]. Observers therefore never see a
//! half-applied edit.

use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use kurbo::Affine;

use crate::chain::{Cascade, LayoutConfig, PlacedTile, TileChain};
use crate::checkpoint::{Checkpoint, CheckpointColor, CheckpointMarker, CheckpointProjector};
use crate::error::{CheckpointError, PlacementError};
use crate::metrics::{CourseMetrics, RacingLengthTable};
use crate::profile::{self, Profile, ProfileConfig};
use crate::socket::AnchorSource;
use crate::terrain::TileAsset;
use crate::trace::{
    CascadeEvent, CheckpointEvent, CheckpointRejectedEvent, CourseRenamedEvent, CourseResetEvent,
    PointsChangedEvent, TilePlacedEvent, TileRejectedEvent, TileRemovedEvent, TileReplacedEvent,
    Tracer, ViewChangedEvent,
};
use crate::view::{ViewTransform, ViewportConfig, camera_affine};

/// Name used when none (or only whitespace) is given.
pub const DEFAULT_NAME: &str = "Custom Stage";

/// Sprint and mountain points awarded on the course.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PointTotals {
    /// Sprint points.
    pub sprints: u32,
    /// King-of-the-mountains points.
    pub koms: u32,
}

/// What a notification is about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CourseChange {
    /// A tile was appended at `index`.
    TileAppended {
        /// Position of the new tile.
        index: usize,
    },
    /// The last tile was removed from `index`.
    TileRemoved {
        /// Position the tile occupied.
        index: usize,
        /// Checkpoints dropped with it.
        pruned: usize,
    },
    /// The tile at `index` was replaced and the suffix relaid out.
    TileReplaced {
        /// Position of the swap.
        index: usize,
        /// Checkpoints dropped because their anchor vanished.
        pruned: usize,
    },
    /// A checkpoint was added at `index` in the checkpoint list.
    CheckpointAdded {
        /// Position in the checkpoint list.
        index: usize,
    },
    /// The last checkpoint was removed.
    CheckpointRemoved {
        /// Position it occupied.
        index: usize,
    },
    /// View rotation or zoom changed.
    ViewChanged,
    /// Point totals changed.
    PointsChanged,
    /// The course was renamed.
    Renamed,
    /// Tiles, checkpoints, and view were cleared.
    Reset,
    /// The whole course was replaced by a bulk load.
    Loaded,
}

/// Receives course change notifications.
pub trait CourseObserver {
    /// Called after every completed mutation.
    fn course_changed(&mut self, course: &Course, change: CourseChange);
}

impl<F: FnMut(&Course, CourseChange)> CourseObserver for F {
    fn course_changed(&mut self, course: &Course, change: CourseChange) {
        self(course, change);
    }
}

/// Handle returned by [`Course::subscribe`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

impl fmt::Debug for ObserverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObserverId({})", self.0)
    }
}

/// The single owned course state.
pub struct Course {
    name: String,
    chain: TileChain,
    checkpoints: CheckpointProjector,
    view: ViewTransform,
    points: Option<PointTotals>,
    observers: Vec<(ObserverId, Box<dyn CourseObserver>)>,
    next_observer: u64,
}

impl fmt::Debug for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Course")
            .field("name", &self.name)
            .field("tiles", &self.chain.len())
            .field("checkpoints", &self.checkpoints.len())
            .field("view", &self.view)
            .field("points", &self.points)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

impl Default for Course {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

impl Course {
    /// Creates an empty course named [`DEFAULT_NAME`].
    #[must_use]
    pub fn new(layout: LayoutConfig) -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            chain: TileChain::new(layout),
            checkpoints: CheckpointProjector::new(),
            view: ViewTransform::IDENTITY,
            points: None,
            observers: Vec::new(),
            next_observer: 0,
        }
    }

    // -- accessors ----------------------------------------------------------

    /// Course name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The tile chain.
    #[must_use]
    pub fn chain(&self) -> &TileChain {
        &self.chain
    }

    /// The checkpoints.
    #[must_use]
    pub fn checkpoints(&self) -> &CheckpointProjector {
        &self.checkpoints
    }

    /// Current view.
    #[must_use]
    pub fn view(&self) -> ViewTransform {
        self.view
    }

    /// Point totals, if set.
    #[must_use]
    pub fn points(&self) -> Option<PointTotals> {
        self.points
    }

    /// Checkpoint markers resolved against the current chain and view.
    #[must_use]
    pub fn checkpoint_markers(&self) -> Vec<CheckpointMarker> {
        self.checkpoints.recompute_positions(&self.chain, &self.view)
    }

    /// Builds the elevation profile.
    #[must_use]
    pub fn profile(&self, config: &ProfileConfig) -> Profile {
        profile::build(&self.chain, &self.checkpoints, config)
    }

    /// Camera transform fitting the course into `viewport`.
    #[must_use]
    pub fn camera(&self, viewport: &ViewportConfig) -> Affine {
        camera_affine(&self.chain, &self.view, viewport)
    }

    /// Additive statistics.
    #[must_use]
    pub fn metrics(&self, table: &RacingLengthTable) -> CourseMetrics {
        CourseMetrics::compute(&self.chain, table)
    }

    // -- observers ----------------------------------------------------------

    /// Registers an observer. It is called after every completed mutation
    /// until [`unsubscribe`](Self::unsubscribe)d.
    pub fn subscribe(&mut self, observer: impl CourseObserver + 'static) -> ObserverId {
        let id = ObserverId(self.next_observer);
        self.next_observer += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Removes an observer. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(oid, _)| *oid != id);
        self.observers.len() != before
    }

    fn notify(&mut self, change: CourseChange) {
        let mut observers = core::mem::take(&mut self.observers);
        for (_, observer) in &mut observers {
            observer.course_changed(self, change);
        }
        self.observers = observers;
    }

    // -- tiles --------------------------------------------------------------

    /// Appends a tile. See [`append_traced`](Self::append_traced).
    ///
    /// # Errors
    ///
    /// Returns [`PlacementError::MissingAnchor`] if the tile has no socket.
    pub fn append<S: AnchorSource + ?Sized>(
        &mut self,
        asset: Arc<TileAsset>,
        source: &S,
    ) -> Result<usize, PlacementError> {
        self.append_traced(asset, source, &mut Tracer::none())
    }

    /// Appends a tile after the last one and returns its position.
    ///
    /// # Errors
    ///
    /// Returns [`PlacementError::MissingAnchor`] if the tile has no socket;
    /// the course is unchanged and observers are not notified.
    pub fn append_traced<S: AnchorSource + ?Sized>(
        &mut self,
        asset: Arc<TileAsset>,
        source: &S,
        tracer: &mut Tracer<'_>,
    ) -> Result<usize, PlacementError> {
        let tile_id = asset.id.clone();
        match self.chain.append(asset, source) {
            Ok((index, cascade)) => {
                trace_cascade(tracer, &cascade);
                if let Some(tile) = self.chain.get(index) {
                    tracer.tile_placed(&TilePlacedEvent {
                        index,
                        instance: tile.instance(),
                        tile_id: &tile_id,
                        rotation_degrees: tile.placement().rotation_degrees(),
                    });
                }
                self.notify(CourseChange::TileAppended { index });
                Ok(index)
            }
            Err(error) => {
                tracer.tile_rejected(&TileRejectedEvent {
                    tile_id: &tile_id,
                    error,
                });
                Err(error)
            }
        }
    }

    /// Removes the last tile. See [`remove_last_traced`](Self::remove_last_traced).
    pub fn remove_last(&mut self) -> Option<PlacedTile> {
        self.remove_last_traced(&mut Tracer::none())
    }

    /// Removes the last tile and any checkpoints bound to it.
    pub fn remove_last_traced(&mut self, tracer: &mut Tracer<'_>) -> Option<PlacedTile> {
        let tile = self.chain.remove_last()?;
        let pruned = self.prune(tracer).len();
        tracer.tile_removed(&TileRemovedEvent {
            index: tile.index(),
            instance: tile.instance(),
            tile_id: &tile.asset().id,
        });
        self.notify(CourseChange::TileRemoved {
            index: tile.index(),
            pruned,
        });
        Some(tile)
    }

    /// Replaces a tile. See [`replace_traced`](Self::replace_traced).
    ///
    /// # Errors
    ///
    /// See [`replace_traced`](Self::replace_traced).
    pub fn replace<S: AnchorSource + ?Sized>(
        &mut self,
        index: usize,
        asset: Arc<TileAsset>,
        source: &S,
    ) -> Result<Vec<Checkpoint>, PlacementError> {
        self.replace_traced(index, asset, source, &mut Tracer::none())
    }

    /// Replaces the tile at `index`, relays out the suffix, and prunes
    /// checkpoints whose anchor no longer exists. Returns the pruned
    /// checkpoints.
    ///
    /// # Errors
    ///
    /// Returns [`PlacementError::IndexOutOfRange`] or
    /// [`PlacementError::MissingAnchor`]; the course is unchanged and
    /// observers are not notified.
    pub fn replace_traced<S: AnchorSource + ?Sized>(
        &mut self,
        index: usize,
        asset: Arc<TileAsset>,
        source: &S,
        tracer: &mut Tracer<'_>,
    ) -> Result<Vec<Checkpoint>, PlacementError> {
        let new_id = asset.id.clone();
        let (old, cascade) = match self.chain.replace(index, asset, source) {
            Ok(done) => done,
            Err(error) => {
                tracer.tile_rejected(&TileRejectedEvent {
                    tile_id: &new_id,
                    error,
                });
                return Err(error);
            }
        };
        trace_cascade(tracer, &cascade);
        if let Some(tile) = self.chain.get(index) {
            tracer.tile_replaced(&TileReplacedEvent {
                index,
                old_tile_id: &old.asset().id,
                new_tile_id: &new_id,
                instance: tile.instance(),
            });
        }
        let pruned = self.prune(tracer);
        self.notify(CourseChange::TileReplaced {
            index,
            pruned: pruned.len(),
        });
        Ok(pruned)
    }

    fn prune(&mut self, tracer: &mut Tracer<'_>) -> Vec<Checkpoint> {
        let pruned = self.checkpoints.prune(&self.chain);
        for cp in &pruned {
            tracer.checkpoint_pruned(&checkpoint_event(cp));
        }
        pruned
    }

    // -- checkpoints --------------------------------------------------------

    /// Adds a checkpoint. See [`add_checkpoint_traced`](Self::add_checkpoint_traced).
    ///
    /// # Errors
    ///
    /// See [`add_checkpoint_traced`](Self::add_checkpoint_traced).
    pub fn add_checkpoint(
        &mut self,
        tile_index: usize,
        anchor_key: &str,
        color: CheckpointColor,
        label: &str,
    ) -> Result<usize, CheckpointError> {
        self.add_checkpoint_traced(tile_index, anchor_key, color, label, &mut Tracer::none())
    }

    /// Attaches a checkpoint to goal `anchor_key` on tile `tile_index`.
    ///
    /// # Errors
    ///
    /// Returns [`CheckpointError`] if the tile or anchor does not exist; the
    /// course is unchanged and observers are not notified.
    pub fn add_checkpoint_traced(
        &mut self,
        tile_index: usize,
        anchor_key: &str,
        color: CheckpointColor,
        label: &str,
        tracer: &mut Tracer<'_>,
    ) -> Result<usize, CheckpointError> {
        match self
            .checkpoints
            .add(&self.chain, tile_index, anchor_key, color, label)
        {
            Ok(index) => {
                if let Some(cp) = self.checkpoints.get(index) {
                    tracer.checkpoint_added(&checkpoint_event(cp));
                }
                self.notify(CourseChange::CheckpointAdded { index });
                Ok(index)
            }
            Err(error) => {
                tracer.checkpoint_rejected(&CheckpointRejectedEvent { error: &error });
                Err(error)
            }
        }
    }

    /// Removes the last checkpoint.
    pub fn remove_last_checkpoint(&mut self) -> Option<Checkpoint> {
        self.remove_last_checkpoint_traced(&mut Tracer::none())
    }

    /// Removes the last checkpoint, tracing the removal.
    pub fn remove_last_checkpoint_traced(&mut self, tracer: &mut Tracer<'_>) -> Option<Checkpoint> {
        let cp = self.checkpoints.remove_last()?;
        tracer.checkpoint_removed(&checkpoint_event(&cp));
        self.notify(CourseChange::CheckpointRemoved {
            index: self.checkpoints.len(),
        });
        Some(cp)
    }

    // -- view ---------------------------------------------------------------

    /// Replaces the view transform.
    pub fn set_view(&mut self, view: ViewTransform) {
        self.set_view_traced(view, &mut Tracer::none());
    }

    /// Replaces the view transform, tracing the change.
    pub fn set_view_traced(&mut self, view: ViewTransform, tracer: &mut Tracer<'_>) {
        self.view = view;
        tracer.view_changed(&ViewChangedEvent {
            rotation_degrees: view.rotation_degrees,
            zoom: view.zoom,
        });
        self.notify(CourseChange::ViewChanged);
    }

    /// Rotates the view by `delta` degrees.
    pub fn rotate_view(&mut self, delta: f64) {
        self.rotate_view_traced(delta, &mut Tracer::none());
    }

    /// Rotates the view by `delta` degrees, tracing the change.
    pub fn rotate_view_traced(&mut self, delta: f64, tracer: &mut Tracer<'_>) {
        let mut view = self.view;
        view.rotate_by(delta);
        self.set_view_traced(view, tracer);
    }

    /// Zooms in one step.
    pub fn zoom_in(&mut self) {
        self.zoom_in_traced(&mut Tracer::none());
    }

    /// Zooms in one step, tracing the change.
    pub fn zoom_in_traced(&mut self, tracer: &mut Tracer<'_>) {
        let mut view = self.view;
        view.zoom_in();
        self.set_view_traced(view, tracer);
    }

    /// Zooms out one step.
    pub fn zoom_out(&mut self) {
        self.zoom_out_traced(&mut Tracer::none());
    }

    /// Zooms out one step, tracing the change.
    pub fn zoom_out_traced(&mut self, tracer: &mut Tracer<'_>) {
        let mut view = self.view;
        view.zoom_out();
        self.set_view_traced(view, tracer);
    }

    /// Drops manual zoom, keeping rotation.
    pub fn fit_view(&mut self) {
        self.fit_view_traced(&mut Tracer::none());
    }

    /// Drops manual zoom, keeping rotation, and traces the change.
    pub fn fit_view_traced(&mut self, tracer: &mut Tracer<'_>) {
        let mut view = self.view;
        view.fit();
        self.set_view_traced(view, tracer);
    }

    // -- metadata -----------------------------------------------------------

    /// Renames the course. See [`set_name_traced`](Self::set_name_traced).
    pub fn set_name(&mut self, name: &str) {
        self.set_name_traced(name, &mut Tracer::none());
    }

    /// Renames the course. Blank names fall back to [`DEFAULT_NAME`].
    pub fn set_name_traced(&mut self, name: &str, tracer: &mut Tracer<'_>) {
        let trimmed = name.trim();
        self.name = if trimmed.is_empty() {
            DEFAULT_NAME.to_string()
        } else {
            trimmed.to_string()
        };
        tracer.course_renamed(&CourseRenamedEvent { name: &self.name });
        self.notify(CourseChange::Renamed);
    }

    /// Sets or clears the point totals.
    pub fn set_points(&mut self, points: Option<PointTotals>) {
        self.set_points_traced(points, &mut Tracer::none());
    }

    /// Sets or clears the point totals, tracing the change.
    pub fn set_points_traced(&mut self, points: Option<PointTotals>, tracer: &mut Tracer<'_>) {
        self.points = points;
        tracer.points_changed(&PointsChangedEvent { points });
        self.notify(CourseChange::PointsChanged);
    }

    // -- whole course -------------------------------------------------------

    /// Clears tiles, checkpoints, and view. See
    /// [`reset_traced`](Self::reset_traced).
    pub fn reset(&mut self) {
        self.reset_traced(&mut Tracer::none());
    }

    /// Clears tiles, checkpoints, and view. The name and points are kept,
    /// and instance ids keep counting up.
    pub fn reset_traced(&mut self, tracer: &mut Tracer<'_>) {
        let event = CourseResetEvent {
            tiles_cleared: self.chain.len(),
            checkpoints_cleared: self.checkpoints.len(),
        };
        self.chain.clear();
        self.checkpoints.clear();
        self.view.reset();
        tracer.course_reset(&event);
        self.notify(CourseChange::Reset);
    }

    /// Applies a batch of edits, then sends a single
    /// [`CourseChange::Loaded`] notification.
    ///
    /// The closure receives the course with observers detached, so edits made
    /// inside it do not notify individually.
    pub fn load_with<R>(&mut self, edit: impl FnOnce(&mut Self) -> R) -> R {
        let observers = core::mem::take(&mut self.observers);
        let result = edit(self);
        let mut added = core::mem::replace(&mut self.observers, observers);
        self.observers.append(&mut added);
        self.notify(CourseChange::Loaded);
        result
    }
}

fn trace_cascade(tracer: &mut Tracer<'_>, cascade: &Cascade) {
    if !cascade.is_empty() {
        tracer.cascade(&CascadeEvent {
            start: cascade.range.start,
            end: cascade.range.end,
        });
    }
}

fn checkpoint_event(cp: &Checkpoint) -> CheckpointEvent<'_> {
    CheckpointEvent {
        tile_index: cp.tile_index,
        anchor_key: &cp.anchor_key,
        label: &cp.label,
    }
}
