// Copyright 2026 the Peloton Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trace sinks for inspecting peloton edits.
//!
//! This crate provides [`TraceSink`](peloton_core::trace::TraceSink)
//! implementations for development:
//!
//! - [`pretty::PrettyPrintSink`]: one human-readable line per event.
//! - [`recorder::RecorderSink`]: events captured as JSON values and exported
//!   as a JSON array.

pub mod pretty;
pub mod recorder;
