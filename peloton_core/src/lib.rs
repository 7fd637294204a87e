// Copyright 2026 the Peloton Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tile chain layout, checkpoint projection, and elevation profiles.
//!
//! `peloton_core` composes discrete track-segment assets ("tiles") into a
//! continuous racing course. It is `no_std` compatible (with `alloc`) and
//! keeps every downstream geometric fact a pure function of the ordered tile
//! list.
//!
//! # Architecture
//!
//! Data flows one way, from the chain to its consumers:
//!
//! ```text
//!   TileAsset + AnchorSource
//!       │
//!       ▼
//!   TileChain::append / replace ──► cascade relayout (dirty suffix)
//!       │
//!       ├──► CheckpointProjector::recompute_positions() ──► CheckpointMarker
//!       │
//!       └──► profile::build() ──► Profile (curve, markers, distance counts)
//! ```
//!
//! **[`geometry`]**: Rotation helpers and the rigid [`Placement`](geometry::Placement)
//! of a tile in world space.
//!
//! **[`socket`]**: Named anchors read from a tile drawing, and the
//! entry/exit [`Socket`](socket::Socket) and goal pairs derived from them.
//!
//! **[`chain`]**: The ordered tile list. Appending places a tile so that its
//! entry meets the predecessor's exit; replacing cascades relayout through
//! every later tile.
//!
//! **[`dirty`]**: Dirty channel used to propagate relayout down the chain
//! via `understory_dirty`.
//!
//! **[`checkpoint`]**: Markers bound by `(tile index, anchor key)` and
//! resolved lazily against the current chain.
//!
//! **[`profile`]**: Elevation profile curve with distance markers.
//!
//! **[`view`]**: View rotation/zoom and the camera fit.
//!
//! **[`course`]**: The single owned course state object with synchronous
//! observer notification.
//!
//! **[`metrics`]**: Additive course statistics.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! instrumenting course edits, with a zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod chain;
pub mod checkpoint;
pub mod course;
pub mod dirty;
pub mod error;
pub mod geometry;
pub mod metrics;
pub mod profile;
pub mod socket;
pub mod terrain;
pub mod trace;
pub mod view;

#[cfg(test)]
mod test_support;
