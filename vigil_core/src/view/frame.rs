// Copyright 2026 the Vigil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Running scheduled frames.

use alloc::boxed::Box;

use crate::error::CheckError;
use crate::trace::{FrameEvent, FrameRequestEvent};

use super::store::ViewTree;

impl ViewTree {
    /// Ticks every root scheduled since the last frame.
    ///
    /// Hosts call this from the callback their [`FramePort`] arranged.
    /// Marks made while the frame runs schedule a new frame. If a root
    /// fails, it and the roots not yet ticked are scheduled again, a new
    /// frame is requested, and the error is returned; render callbacks wait
    /// for that frame.
    ///
    /// [`FramePort`]: crate::scheduler::FramePort
    pub fn run_frame(&mut self) -> Result<(), CheckError> {
        let roots = self.scheduler.begin_frame();
        let frame_index = self.frame_counter;
        self.frame_counter += 1;
        #[expect(
            clippy::cast_possible_truncation,
            reason = "root count is bounded by the u32 arena"
        )]
        let root_count = roots.len() as u32;
        self.tracer().frame(&FrameEvent {
            frame_index,
            roots: root_count,
        });
        tracing::debug!(frame = frame_index, roots = root_count, "running frame");

        for (i, root) in roots.iter().enumerate() {
            if !self.is_alive(*root) {
                continue;
            }
            if let Err(err) = self.tick(*root) {
                for rest in &roots[i..] {
                    if self.is_alive(*rest) {
                        self.schedule_root(rest.idx);
                    }
                }
                return Err(err);
            }
        }

        if !self.scheduler.is_frame_pending() {
            for callback in self.scheduler.take_rendered() {
                callback();
            }
        }
        Ok(())
    }

    /// Runs `callback` once no frame is pending: immediately if none is and
    /// no earlier callback is waiting, otherwise after the frame that leaves
    /// the tree clean. Callbacks run in registration order.
    pub fn when_rendered(&mut self, callback: impl FnOnce() + 'static) {
        if self.scheduler.is_frame_pending() || self.scheduler.has_rendered() {
            self.scheduler.push_rendered(Box::new(callback));
        } else {
            callback();
        }
    }

    /// Returns `true` while a frame has been requested but has not run.
    #[must_use]
    pub fn is_frame_pending(&self) -> bool {
        self.scheduler.is_frame_pending()
    }

    pub(crate) fn schedule_root(&mut self, root: u32) {
        let id = self.id_at(root);
        let requested = self.scheduler.schedule(id);
        self.tracer().frame_requested(&FrameRequestEvent {
            root,
            coalesced: !requested,
        });
        if requested {
            tracing::trace!(root, "requested frame");
        }
    }
}
