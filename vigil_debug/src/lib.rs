// Copyright 2026 the Vigil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording, pretty-printing, and Chrome trace export for vigil
//! diagnostics.
//!
//! This crate provides [`TraceSink`](vigil_core::trace::TraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-event output.
//! - [`recorder::RecorderSink`]: compact binary recording with
//!   [`recorder::decode`] for playback.
//! - [`chrome::export`]: writes Chrome Trace Event Format JSON from recorded
//!   bytes.
//!
//! Install a sink with
//! [`ViewTree::set_trace_sink`](vigil_core::view::ViewTree::set_trace_sink)
//! and get it back with `take_trace_sink` or `trace_sink::<S>()`.

pub mod chrome;
pub mod pretty;
pub mod recorder;
