// Copyright 2026 the Vigil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records. [`decode`] reads them back
//! as an iterator of [`RecordedEvent`].

use vigil_core::trace::{
    BindingCommit, FrameEvent, FrameRequestEvent, PassBeginEvent, PassEndEvent, PassKind,
    PassSummary, SkipReason, TraceSink, ViewCheckEvent, ViewSkipEvent,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_PASS_BEGIN: u8 = 1;
const TAG_PASS_END: u8 = 2;
const TAG_VIEW_CHECKED: u8 = 3;
const TAG_VIEW_SKIPPED: u8 = 4;
const TAG_FRAME_REQUESTED: u8 = 5;
const TAG_FRAME: u8 = 6;
const TAG_PASS_SUMMARY: u8 = 7;
const TAG_BINDING_COMMIT: u8 = 8;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Drops everything recorded so far.
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_bool(&mut self, v: bool) {
        self.write_u8(u8::from(v));
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_kind(&mut self, k: PassKind) {
        self.write_u8(match k {
            PassKind::Tick => 0,
            PassKind::DetectChanges => 1,
            PassKind::Verify => 2,
        });
    }

    fn write_reason(&mut self, r: SkipReason) {
        self.write_u8(match r {
            SkipReason::Detached => 0,
            SkipReason::Clean => 1,
        });
    }
}

impl TraceSink for RecorderSink {
    fn on_pass_begin(&mut self, e: &PassBeginEvent) {
        self.write_u8(TAG_PASS_BEGIN);
        self.write_u64(e.pass_index);
        self.write_kind(e.kind);
        self.write_u32(e.root);
        self.write_u32(e.depth);
    }

    fn on_pass_end(&mut self, e: &PassEndEvent) {
        self.write_u8(TAG_PASS_END);
        self.write_u64(e.pass_index);
        self.write_kind(e.kind);
        self.write_bool(e.ok);
    }

    fn on_view_checked(&mut self, e: &ViewCheckEvent) {
        self.write_u8(TAG_VIEW_CHECKED);
        self.write_u64(e.pass_index);
        self.write_u32(e.view);
        self.write_bool(e.creation);
        self.write_bool(e.forced);
    }

    fn on_view_skipped(&mut self, e: &ViewSkipEvent) {
        self.write_u8(TAG_VIEW_SKIPPED);
        self.write_u64(e.pass_index);
        self.write_u32(e.view);
        self.write_reason(e.reason);
    }

    fn on_frame_requested(&mut self, e: &FrameRequestEvent) {
        self.write_u8(TAG_FRAME_REQUESTED);
        self.write_u32(e.root);
        self.write_bool(e.coalesced);
    }

    fn on_frame(&mut self, e: &FrameEvent) {
        self.write_u8(TAG_FRAME);
        self.write_u64(e.frame_index);
        self.write_u32(e.roots);
    }

    fn on_pass_summary(&mut self, s: &PassSummary) {
        self.write_u8(TAG_PASS_SUMMARY);
        self.write_u64(s.pass_index);
        self.write_kind(s.kind);
        self.write_u32(s.root);
        self.write_u32(s.checked);
        self.write_u32(s.skipped_detached);
        self.write_u32(s.skipped_clean);
        self.write_u32(s.commits);
        self.write_bool(s.ok);
    }

    fn on_binding_commit(&mut self, pass_index: u64, commit: &BindingCommit) {
        self.write_u8(TAG_BINDING_COMMIT);
        self.write_u64(pass_index);
        self.write_u32(commit.view);
        self.write_u32(commit.binding_index);
        self.write_u32(commit.slot);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordedEvent {
    /// A [`PassBeginEvent`].
    PassBegin(PassBeginEvent),
    /// A [`PassEndEvent`].
    PassEnd(PassEndEvent),
    /// A [`ViewCheckEvent`].
    ViewChecked(ViewCheckEvent),
    /// A [`ViewSkipEvent`].
    ViewSkipped(ViewSkipEvent),
    /// A [`FrameRequestEvent`].
    FrameRequested(FrameRequestEvent),
    /// A [`FrameEvent`].
    Frame(FrameEvent),
    /// A [`PassSummary`].
    PassSummary(PassSummary),
    /// A committed binding.
    BindingCommit {
        /// Pass counter.
        pass_index: u64,
        /// The binding.
        commit: BindingCommit,
    },
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn read_u8(&mut self) -> Option<u8> {
        if self.remaining() < 1 {
            return None;
        }
        let v = self.data[self.pos];
        self.pos += 1;
        Some(v)
    }

    fn read_bool(&mut self) -> Option<bool> {
        Some(self.read_u8()? != 0)
    }

    fn read_u32(&mut self) -> Option<u32> {
        if self.remaining() < 4 {
            return None;
        }
        let v = u32::from_le_bytes(self.data[self.pos..self.pos + 4].try_into().ok()?);
        self.pos += 4;
        Some(v)
    }

    fn read_u64(&mut self) -> Option<u64> {
        if self.remaining() < 8 {
            return None;
        }
        let v = u64::from_le_bytes(self.data[self.pos..self.pos + 8].try_into().ok()?);
        self.pos += 8;
        Some(v)
    }

    fn read_kind(&mut self) -> Option<PassKind> {
        Some(match self.read_u8()? {
            0 => PassKind::Tick,
            1 => PassKind::DetectChanges,
            _ => PassKind::Verify,
        })
    }

    fn read_reason(&mut self) -> Option<SkipReason> {
        Some(match self.read_u8()? {
            0 => SkipReason::Detached,
            _ => SkipReason::Clean,
        })
    }

    fn decode_pass_begin(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PassBegin(PassBeginEvent {
            pass_index: self.read_u64()?,
            kind: self.read_kind()?,
            root: self.read_u32()?,
            depth: self.read_u32()?,
        }))
    }

    fn decode_pass_end(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PassEnd(PassEndEvent {
            pass_index: self.read_u64()?,
            kind: self.read_kind()?,
            ok: self.read_bool()?,
        }))
    }

    fn decode_view_checked(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::ViewChecked(ViewCheckEvent {
            pass_index: self.read_u64()?,
            view: self.read_u32()?,
            creation: self.read_bool()?,
            forced: self.read_bool()?,
        }))
    }

    fn decode_view_skipped(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::ViewSkipped(ViewSkipEvent {
            pass_index: self.read_u64()?,
            view: self.read_u32()?,
            reason: self.read_reason()?,
        }))
    }

    fn decode_frame_requested(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::FrameRequested(FrameRequestEvent {
            root: self.read_u32()?,
            coalesced: self.read_bool()?,
        }))
    }

    fn decode_frame(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Frame(FrameEvent {
            frame_index: self.read_u64()?,
            roots: self.read_u32()?,
        }))
    }

    fn decode_pass_summary(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PassSummary(PassSummary {
            pass_index: self.read_u64()?,
            kind: self.read_kind()?,
            root: self.read_u32()?,
            checked: self.read_u32()?,
            skipped_detached: self.read_u32()?,
            skipped_clean: self.read_u32()?,
            commits: self.read_u32()?,
            ok: self.read_bool()?,
        }))
    }

    fn decode_binding_commit(&mut self) -> Option<RecordedEvent> {
        let pass_index = self.read_u64()?;
        let commit = BindingCommit {
            view: self.read_u32()?,
            binding_index: self.read_u32()?,
            slot: self.read_u32()?,
        };
        Some(RecordedEvent::BindingCommit { pass_index, commit })
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_PASS_BEGIN => self.decode_pass_begin(),
            TAG_PASS_END => self.decode_pass_end(),
            TAG_VIEW_CHECKED => self.decode_view_checked(),
            TAG_VIEW_SKIPPED => self.decode_view_skipped(),
            TAG_FRAME_REQUESTED => self.decode_frame_requested(),
            TAG_FRAME => self.decode_frame(),
            TAG_PASS_SUMMARY => self.decode_pass_summary(),
            TAG_BINDING_COMMIT => self.decode_binding_commit(),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
