// Copyright 2026 the Vigil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Lines inside
//! a pass are indented by the pass nesting depth, so passes started from a
//! hook show up under the pass that ran the hook.

use std::io::Write;

use vigil_core::trace::{
    BindingCommit, FrameEvent, FrameRequestEvent, PassBeginEvent, PassEndEvent, PassSummary,
    SkipReason, TraceSink, ViewCheckEvent, ViewSkipEvent,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    depth: usize,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("depth", &self.depth)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()))
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer, depth: 0 }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer, depth: 0 }
    }

    /// Consumes the sink and returns its writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn indent(&self) -> String {
        "  ".repeat(self.depth)
    }
}

fn reason_name(reason: SkipReason) -> &'static str {
    match reason {
        SkipReason::Detached => "detached",
        SkipReason::Clean => "clean",
    }
}

impl<W: Write + 'static> TraceSink for PrettyPrintSink<W> {
    fn on_pass_begin(&mut self, e: &PassBeginEvent) {
        let _ = writeln!(
            self.writer,
            "{}[pass:begin] pass={} kind={} root={} depth={}",
            self.indent(),
            e.pass_index,
            e.kind.name(),
            e.root,
            e.depth,
        );
        self.depth += 1;
    }

    fn on_pass_end(&mut self, e: &PassEndEvent) {
        self.depth = self.depth.saturating_sub(1);
        let status = if e.ok { "ok" } else { "FAILED" };
        let _ = writeln!(
            self.writer,
            "{}[pass:end] pass={} kind={} {status}",
            self.indent(),
            e.pass_index,
            e.kind.name(),
        );
    }

    fn on_view_checked(&mut self, e: &ViewCheckEvent) {
        let mode = if e.creation { " creation" } else { "" };
        let forced = if e.forced { " forced" } else { "" };
        let _ = writeln!(
            self.writer,
            "{}[check] view={}{mode}{forced}",
            self.indent(),
            e.view,
        );
    }

    fn on_view_skipped(&mut self, e: &ViewSkipEvent) {
        let _ = writeln!(
            self.writer,
            "{}[skip] view={} reason={}",
            self.indent(),
            e.view,
            reason_name(e.reason),
        );
    }

    fn on_frame_requested(&mut self, e: &FrameRequestEvent) {
        let what = if e.coalesced { "coalesced" } else { "requested" };
        let _ = writeln!(
            self.writer,
            "{}[schedule] root={} {what}",
            self.indent(),
            e.root,
        );
    }

    fn on_frame(&mut self, e: &FrameEvent) {
        let _ = writeln!(
            self.writer,
            "[frame] frame={} roots={}",
            e.frame_index, e.roots,
        );
    }

    fn on_pass_summary(&mut self, s: &PassSummary) {
        let _ = writeln!(
            self.writer,
            "{}[summary] pass={} kind={} checked={} skipped={}+{} commits={}",
            self.indent(),
            s.pass_index,
            s.kind.name(),
            s.checked,
            s.skipped_clean,
            s.skipped_detached,
            s.commits,
        );
    }

    fn on_binding_commit(&mut self, pass_index: u64, commit: &BindingCommit) {
        let _ = writeln!(
            self.writer,
            "{}[commit] pass={pass_index} view={} binding={} slot={}",
            self.indent(),
            commit.view,
            commit.binding_index,
            commit.slot,
        );
    }
}
