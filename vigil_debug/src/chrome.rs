// Copyright 2026 the Vigil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][spec] JSON to the given writer.
//!
//! Recordings carry no clock, so each event's timestamp is its ordinal in
//! the recording (one microsecond per event). Passes become `B`/`E` duration
//! events, nested passes nest inside the pass that started them, and
//! everything else is an instant event.
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use vigil_core::trace::SkipReason;

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();

    for (ts, recorded) in decode(bytes).enumerate() {
        let event = match recorded {
            RecordedEvent::PassBegin(e) => json!({
                "ph": "B",
                "name": e.kind.name(),
                "cat": "Pass",
                "ts": ts,
                "pid": 0,
                "tid": 0,
                "args": {
                    "pass_index": e.pass_index,
                    "root": e.root,
                    "depth": e.depth,
                }
            }),
            RecordedEvent::PassEnd(e) => json!({
                "ph": "E",
                "name": e.kind.name(),
                "cat": "Pass",
                "ts": ts,
                "pid": 0,
                "tid": 0,
                "args": {
                    "pass_index": e.pass_index,
                    "ok": e.ok,
                }
            }),
            RecordedEvent::ViewChecked(e) => json!({
                "ph": "i",
                "name": "check",
                "cat": "View",
                "ts": ts,
                "pid": 0,
                "tid": 0,
                "s": "t",
                "args": {
                    "pass_index": e.pass_index,
                    "view": e.view,
                    "creation": e.creation,
                    "forced": e.forced,
                }
            }),
            RecordedEvent::ViewSkipped(e) => json!({
                "ph": "i",
                "name": "skip",
                "cat": "View",
                "ts": ts,
                "pid": 0,
                "tid": 0,
                "s": "t",
                "args": {
                    "pass_index": e.pass_index,
                    "view": e.view,
                    "reason": match e.reason {
                        SkipReason::Detached => "detached",
                        SkipReason::Clean => "clean",
                    },
                }
            }),
            RecordedEvent::FrameRequested(e) => json!({
                "ph": "i",
                "name": "FrameRequest",
                "cat": "Scheduler",
                "ts": ts,
                "pid": 0,
                "tid": 0,
                "s": "g",
                "args": {
                    "root": e.root,
                    "coalesced": e.coalesced,
                }
            }),
            RecordedEvent::Frame(e) => json!({
                "ph": "i",
                "name": "Frame",
                "cat": "Scheduler",
                "ts": ts,
                "pid": 0,
                "tid": 0,
                "s": "g",
                "args": {
                    "frame_index": e.frame_index,
                    "roots": e.roots,
                }
            }),
            RecordedEvent::PassSummary(s) => json!({
                "ph": "i",
                "name": "PassSummary",
                "cat": "Summary",
                "ts": ts,
                "pid": 0,
                "tid": 0,
                "s": "t",
                "args": {
                    "pass_index": s.pass_index,
                    "kind": s.kind.name(),
                    "root": s.root,
                    "checked": s.checked,
                    "skipped_detached": s.skipped_detached,
                    "skipped_clean": s.skipped_clean,
                    "commits": s.commits,
                    "ok": s.ok,
                }
            }),
            RecordedEvent::BindingCommit { pass_index, commit } => json!({
                "ph": "i",
                "name": "BindingCommit",
                "cat": "Rich",
                "ts": ts,
                "pid": 0,
                "tid": 0,
                "s": "t",
                "args": {
                    "pass_index": pass_index,
                    "view": commit.view,
                    "binding_index": commit.binding_index,
                    "slot": commit.slot,
                }
            }),
        };
        events.push(event);
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderSink;
    use vigil_core::trace::{
        PassBeginEvent, PassEndEvent, PassKind, TraceSink, ViewCheckEvent, ViewSkipEvent,
    };

    #[test]
    fn export_produces_valid_json() {
        let mut rec = RecorderSink::new();
        rec.on_pass_begin(&PassBeginEvent {
            pass_index: 0,
            kind: PassKind::Tick,
            root: 0,
            depth: 0,
        });
        rec.on_view_checked(&ViewCheckEvent {
            pass_index: 0,
            view: 0,
            creation: false,
            forced: false,
        });
        rec.on_view_skipped(&ViewSkipEvent {
            pass_index: 0,
            view: 1,
            reason: SkipReason::Clean,
        });
        rec.on_pass_end(&PassEndEvent {
            pass_index: 0,
            kind: PassKind::Tick,
            ok: true,
        });

        let mut out = Vec::new();
        export(rec.as_bytes(), &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();

        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert_eq!(parsed.len(), 4);

        assert_eq!(parsed[0]["ph"], "B");
        assert_eq!(parsed[0]["name"], "tick");
        assert_eq!(parsed[1]["ph"], "i");
        assert_eq!(parsed[1]["name"], "check");
        assert_eq!(parsed[2]["args"]["reason"], "clean");
        assert_eq!(parsed[3]["ph"], "E");
        assert_eq!(parsed[3]["ts"], 3, "timestamps are ordinals");
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export(&[], &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert!(parsed.is_empty(), "no events");
    }
}
