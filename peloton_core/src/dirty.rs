// Copyright 2026 the Peloton Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! The chain uses [`understory_dirty`] to propagate relayout. Every tile
//! after the first has a dependency edge on its predecessor in the
//! [`PLACEMENT`] channel, and edits mark with
//! [`EagerPolicy`](understory_dirty::EagerPolicy), so marking tile `k` marks
//! the whole suffix `k..n`.
//!
//! # Consumption
//!
//! Callers never query dirty state directly. Every chain mutation ends with
//! [`TileChain::evaluate`](crate::chain::TileChain::evaluate), which drains
//! the channel and relays out from the lowest affected position to the end.

use understory_dirty::Channel;

/// A tile's world placement depends on its predecessor's and must be
/// recomputed.
pub const PLACEMENT: Channel = Channel::new(0);
