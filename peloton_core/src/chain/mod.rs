// Copyright 2026 the Peloton Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chain layout engine.
//!
//! The chain is the ordered list of placed tiles forming the course. Each
//! placed tile has:
//!
//! - A positional index. It is not a stable identity: it shifts when earlier
//!   tiles are removed, so consumers re-resolve by index after every edit.
//! - An [`InstanceId`] from a monotonically increasing counter, used to
//!   namespace element ids of repeated placements of the same drawing.
//! - Its [`Socket`](crate::socket::Socket) and goal pairs, fixed at creation.
//! - A computed world [`Placement`](crate::geometry::Placement).
//!
//! # Layout rule
//!
//! The first tile puts its entry point on [`LayoutConfig::origin`] with zero
//! rotation. Every later tile takes
//! `rotation = prev.rotation + prev.exit_angle - entry_angle` and the
//! translation that lands its entry point on the predecessor's world exit,
//! so position and tangent are continuous across every seam.
//!
//! # Cascades
//!
//! Placements are never patched incrementally. Appending or replacing marks
//! the edited position in the [`PLACEMENT`](crate::dirty::PLACEMENT) channel;
//! the mark propagates to every later tile and
//! [`evaluate`](TileChain::evaluate) recomputes the whole dirty suffix.

mod id;
mod layout;
mod store;
mod tile;

pub use id::InstanceId;
pub use layout::{LayoutConfig, first_placement, successor_placement};
pub use store::{Cascade, TileChain};
pub use tile::PlacedTile;
