// Copyright 2026 the Vigil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for change-detection passes.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! view tree calls while it schedules frames and walks views. All method
//! bodies default to no-ops, so implementing only the events you care about
//! is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing. When **on**, each
//! method performs a single `Option` branch before dispatching.
//!
//! [`PassSummaryBuilder`] counts visits, skips, and binding commits during a
//! pass and produces a [`PassSummary`] at the end.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`): gates [`BindingCommit`] events and the
//!   corresponding `TraceSink` method.

use core::any::Any;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which kind of traversal a pass performs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PassKind {
    /// Unforced traversal started by `tick` or a scheduled frame.
    Tick,
    /// Forced traversal started by `detect_changes`.
    DetectChanges,
    /// Read-only traversal comparing bindings against the last commit.
    Verify,
}

impl PassKind {
    /// Short lowercase name, used by exporters.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Tick => "tick",
            Self::DetectChanges => "detect_changes",
            Self::Verify => "verify",
        }
    }
}

/// Why a traversal did not refresh a view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// The view is detached from ancestor-driven traversal.
    Detached,
    /// The view is `OnPush`, unmarked, and the traversal is not forced.
    Clean,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when a pass starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PassBeginEvent {
    /// Monotonic pass counter.
    pub pass_index: u64,
    /// Kind of traversal.
    pub kind: PassKind,
    /// Slot index of the view the pass starts from.
    pub root: u32,
    /// Nesting depth; `0` for passes not started from inside another pass.
    pub depth: u32,
}

/// Emitted when a pass finishes, successfully or not.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PassEndEvent {
    /// Pass counter.
    pub pass_index: u64,
    /// Kind of traversal.
    pub kind: PassKind,
    /// Whether the pass completed without error.
    pub ok: bool,
}

/// Emitted when a view is refreshed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewCheckEvent {
    /// Pass counter.
    pub pass_index: u64,
    /// Slot index of the view.
    pub view: u32,
    /// Whether the template ran in creation mode.
    pub creation: bool,
    /// Whether the traversal was forced at this view.
    pub forced: bool,
}

/// Emitted when a traversal reaches a view but does not refresh it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewSkipEvent {
    /// Pass counter.
    pub pass_index: u64,
    /// Slot index of the view.
    pub view: u32,
    /// Why the view was skipped.
    pub reason: SkipReason,
}

/// Emitted when a root is scheduled for the next frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameRequestEvent {
    /// Slot index of the root view.
    pub root: u32,
    /// `true` if a frame was already pending and this request was absorbed.
    pub coalesced: bool,
}

/// Emitted when a scheduled frame runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameEvent {
    /// Monotonic frame counter.
    pub frame_index: u64,
    /// Number of roots ticked by the frame.
    pub roots: u32,
}

/// Per-pass totals produced by [`PassSummaryBuilder`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PassSummary {
    /// Pass counter.
    pub pass_index: u64,
    /// Kind of traversal.
    pub kind: PassKind,
    /// Slot index of the view the pass started from.
    pub root: u32,
    /// Views refreshed.
    pub checked: u32,
    /// Views skipped because they were detached.
    pub skipped_detached: u32,
    /// Views skipped because they were clean `OnPush` views.
    pub skipped_clean: u32,
    /// Bindings whose new value was committed to the renderer.
    pub commits: u32,
    /// Whether the pass completed without error.
    pub ok: bool,
}

/// A single committed binding.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BindingCommit {
    /// Slot index of the view.
    pub view: u32,
    /// Binding position within the view's check function.
    pub binding_index: u32,
    /// Declaration slot the binding targets.
    pub slot: u32,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the view tree.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink: Any {
    /// Called when a pass starts.
    fn on_pass_begin(&mut self, e: &PassBeginEvent) {
        _ = e;
    }

    /// Called when a pass ends.
    fn on_pass_end(&mut self, e: &PassEndEvent) {
        _ = e;
    }

    /// Called when a view is refreshed.
    fn on_view_checked(&mut self, e: &ViewCheckEvent) {
        _ = e;
    }

    /// Called when a view is skipped.
    fn on_view_skipped(&mut self, e: &ViewSkipEvent) {
        _ = e;
    }

    /// Called when a root is scheduled.
    fn on_frame_requested(&mut self, e: &FrameRequestEvent) {
        _ = e;
    }

    /// Called when a scheduled frame runs.
    fn on_frame(&mut self, e: &FrameEvent) {
        _ = e;
    }

    /// Called with per-pass totals.
    fn on_pass_summary(&mut self, s: &PassSummary) {
        _ = s;
    }

    /// Called for each committed binding (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_binding_commit(&mut self, pass_index: u64, commit: &BindingCommit) {
        _ = (pass_index, commit);
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`PassBeginEvent`].
    #[inline]
    pub fn pass_begin(&mut self, e: &PassBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_pass_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PassEndEvent`].
    #[inline]
    pub fn pass_end(&mut self, e: &PassEndEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_pass_end(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ViewCheckEvent`].
    #[inline]
    pub fn view_checked(&mut self, e: &ViewCheckEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_view_checked(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ViewSkipEvent`].
    #[inline]
    pub fn view_skipped(&mut self, e: &ViewSkipEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_view_skipped(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`FrameRequestEvent`].
    #[inline]
    pub fn frame_requested(&mut self, e: &FrameRequestEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_frame_requested(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`FrameEvent`].
    #[inline]
    pub fn frame(&mut self, e: &FrameEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_frame(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PassSummary`].
    #[inline]
    pub fn pass_summary(&mut self, s: &PassSummary) {
        #[cfg(feature = "trace")]
        if let Some(sink) = &mut self.sink {
            sink.on_pass_summary(s);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = s;
        }
    }

    /// Emits a binding commit (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn binding_commit(&mut self, pass_index: u64, commit: &BindingCommit) {
        if let Some(s) = &mut self.sink {
            s.on_binding_commit(pass_index, commit);
        }
    }
}

// ---------------------------------------------------------------------------
// PassSummaryBuilder
// ---------------------------------------------------------------------------

/// Counts what a pass did and produces a [`PassSummary`].
#[derive(Clone, Copy, Debug)]
pub struct PassSummaryBuilder {
    summary: PassSummary,
}

impl PassSummaryBuilder {
    /// Starts counting for the given pass.
    #[must_use]
    pub const fn new(pass_index: u64, kind: PassKind, root: u32) -> Self {
        Self {
            summary: PassSummary {
                pass_index,
                kind,
                root,
                checked: 0,
                skipped_detached: 0,
                skipped_clean: 0,
                commits: 0,
                ok: false,
            },
        }
    }

    /// Pass counter of the pass being summarized.
    #[must_use]
    pub const fn pass_index(&self) -> u64 {
        self.summary.pass_index
    }

    /// Records a refreshed view.
    pub fn view_checked(&mut self) {
        self.summary.checked += 1;
    }

    /// Records a skipped view.
    pub fn view_skipped(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::Detached => self.summary.skipped_detached += 1,
            SkipReason::Clean => self.summary.skipped_clean += 1,
        }
    }

    /// Records committed bindings.
    pub fn bindings_committed(&mut self, count: u32) {
        self.summary.commits += count;
    }

    /// Consumes the builder and produces the final [`PassSummary`].
    #[must_use]
    pub const fn finish(self, ok: bool) -> PassSummary {
        let mut summary = self.summary;
        summary.ok = ok;
        summary
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        sink.on_pass_begin(&PassBeginEvent {
            pass_index: 0,
            kind: PassKind::Tick,
            root: 0,
            depth: 0,
        });
        sink.on_pass_summary(&PassSummaryBuilder::new(0, PassKind::Tick, 0).finish(true));
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.frame(&FrameEvent {
            frame_index: 1,
            roots: 2,
        });
        tracer.view_skipped(&ViewSkipEvent {
            pass_index: 0,
            view: 3,
            reason: SkipReason::Clean,
        });
    }

    #[test]
    fn summary_builder_counts() {
        let mut builder = PassSummaryBuilder::new(9, PassKind::DetectChanges, 4);
        builder.view_checked();
        builder.view_checked();
        builder.view_skipped(SkipReason::Detached);
        builder.view_skipped(SkipReason::Clean);
        builder.view_skipped(SkipReason::Clean);
        builder.bindings_committed(3);
        let summary = builder.finish(true);
        assert_eq!(summary.pass_index, 9);
        assert_eq!(summary.root, 4);
        assert_eq!(summary.checked, 2);
        assert_eq!(summary.skipped_detached, 1);
        assert_eq!(summary.skipped_clean, 2);
        assert_eq!(summary.commits, 3);
        assert!(summary.ok, "finished ok");
    }

    #[test]
    fn pass_kind_names() {
        assert_eq!(PassKind::Tick.name(), "tick");
        assert_eq!(PassKind::DetectChanges.name(), "detect_changes");
        assert_eq!(PassKind::Verify.name(), "verify");
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::vec::Vec;

        struct RecordingSink {
            views: Vec<u32>,
        }
        impl TraceSink for RecordingSink {
            fn on_view_checked(&mut self, e: &ViewCheckEvent) {
                self.views.push(e.view);
            }
        }

        let mut sink = RecordingSink { views: Vec::new() };
        let mut tracer = Tracer::new(&mut sink);
        tracer.view_checked(&ViewCheckEvent {
            pass_index: 0,
            view: 5,
            creation: true,
            forced: false,
        });
        drop(tracer);
        assert_eq!(sink.views, &[5]);
    }
}
