// Copyright 2026 the Vigil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame scheduling for dirty roots.
//!
//! Marking a view dirty records its root in the [`Scheduler`] and, if no
//! frame is outstanding, asks the host for one through a [`FramePort`]. Any
//! number of marks before the frame runs coalesce into that single request.
//! When the host's frame callback fires it calls
//! [`ViewTree::run_frame`](crate::view::ViewTree::run_frame), which ticks
//! every pending root once.
//!
//! [`ManualFrames`] is a deterministic port for tests and headless hosts:
//! requests are counted and only run when [`ManualFrames::flush`] is called.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::Cell;

use crate::error::CheckError;
use crate::view::{ViewId, ViewTree};

/// Asks the host environment to call back on its next frame.
///
/// Implementations are expected to eventually call
/// [`ViewTree::run_frame`](crate::view::ViewTree::run_frame). The scheduler
/// never calls `request_frame` again until that frame has started.
pub trait FramePort {
    /// Requests one frame callback.
    fn request_frame(&mut self);
}

/// Pending roots and the outstanding-frame latch.
pub struct Scheduler {
    port: Box<dyn FramePort>,
    pending: Vec<ViewId>,
    frame_requested: bool,
    rendered: Vec<Box<dyn FnOnce()>>,
}

impl core::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Scheduler")
            .field("pending", &self.pending)
            .field("frame_requested", &self.frame_requested)
            .field("rendered", &self.rendered.len())
            .finish_non_exhaustive()
    }
}

impl Scheduler {
    /// Creates a scheduler that requests frames through `port`.
    #[must_use]
    pub fn new(port: impl FramePort + 'static) -> Self {
        Self {
            port: Box::new(port),
            pending: Vec::new(),
            frame_requested: false,
            rendered: Vec::new(),
        }
    }

    /// Records `root` for the next frame.
    ///
    /// Returns `true` if this call requested a new frame, `false` if the
    /// request was coalesced into an outstanding one.
    pub fn schedule(&mut self, root: ViewId) -> bool {
        if !self.pending.contains(&root) {
            self.pending.push(root);
        }
        if self.frame_requested {
            return false;
        }
        self.frame_requested = true;
        self.port.request_frame();
        true
    }

    /// Returns `true` while a requested frame has not started yet.
    #[must_use]
    pub fn is_frame_pending(&self) -> bool {
        self.frame_requested
    }

    /// Roots waiting for the next frame, in scheduling order.
    #[must_use]
    pub fn pending_roots(&self) -> &[ViewId] {
        &self.pending
    }

    /// Clears pending roots, the outstanding-frame latch, and any
    /// unresolved render callbacks.
    pub fn reset(&mut self) {
        self.pending.clear();
        self.frame_requested = false;
        self.rendered.clear();
    }

    /// Starts a frame: releases the latch so that marks made while the
    /// frame runs request a new one, and hands out the pending roots.
    pub(crate) fn begin_frame(&mut self) -> Vec<ViewId> {
        self.frame_requested = false;
        core::mem::take(&mut self.pending)
    }

    pub(crate) fn push_rendered(&mut self, callback: Box<dyn FnOnce()>) {
        self.rendered.push(callback);
    }

    pub(crate) fn has_rendered(&self) -> bool {
        !self.rendered.is_empty()
    }

    pub(crate) fn take_rendered(&mut self) -> Vec<Box<dyn FnOnce()>> {
        core::mem::take(&mut self.rendered)
    }
}

/// A [`FramePort`] that only counts requests.
///
/// Created by [`ManualFrames::port`]; all ports share the counters of the
/// `ManualFrames` they came from.
#[derive(Clone, Debug)]
pub struct ManualFramePort {
    outstanding: Rc<Cell<u32>>,
    total: Rc<Cell<u64>>,
}

impl FramePort for ManualFramePort {
    fn request_frame(&mut self) {
        self.outstanding.set(self.outstanding.get() + 1);
        self.total.set(self.total.get() + 1);
    }
}

/// Deterministic frame source for tests and headless hosts.
#[derive(Clone, Debug, Default)]
pub struct ManualFrames {
    outstanding: Rc<Cell<u32>>,
    total: Rc<Cell<u64>>,
}

impl ManualFrames {
    /// Creates a frame source with no outstanding requests.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a port to hand to [`ViewTree::new`].
    #[must_use]
    pub fn port(&self) -> ManualFramePort {
        ManualFramePort {
            outstanding: Rc::clone(&self.outstanding),
            total: Rc::clone(&self.total),
        }
    }

    /// Number of requests since the last [`flush`](Self::flush).
    #[must_use]
    pub fn pending(&self) -> u32 {
        self.outstanding.get()
    }

    /// Number of requests ever made.
    #[must_use]
    pub fn total_requests(&self) -> u64 {
        self.total.get()
    }

    /// Runs one frame on `tree` if any was requested.
    ///
    /// Returns `Ok(true)` if a frame ran.
    pub fn flush(&self, tree: &mut ViewTree) -> Result<bool, CheckError> {
        if self.outstanding.get() == 0 {
            return Ok(false);
        }
        self.outstanding.set(0);
        tree.run_frame()?;
        Ok(true)
    }
}
