// Copyright 2026 the Vigil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Marking views for check and toggling attachment.

use super::flags::ViewFlags;
use super::id::{INVALID, ViewId};
use super::store::ViewTree;

impl ViewTree {
    /// Makes `view` eligible for the next traversal that reaches it, and
    /// every ancestor let such a traversal through.
    ///
    /// Does not schedule anything; see [`mark_dirty`](Self::mark_dirty).
    pub fn mark_for_check(&mut self, view: ViewId) {
        self.validate(view);
        self.mark_path(view.idx);
    }

    /// Marks `view` for check and schedules its root for the next frame.
    ///
    /// Any number of calls before that frame runs result in one frame
    /// request and one check of the root.
    pub fn mark_dirty(&mut self, view: ViewId) {
        self.validate(view);
        self.mark_path(view.idx);
        let root = self.root_idx(view.idx);
        self.schedule_root(root);
    }

    /// Excludes `view` (and therefore its subtree) from ancestor-driven and
    /// scheduled traversals. An explicit `detect_changes` on the view still
    /// checks it.
    pub fn detach(&mut self, view: ViewId) {
        self.validate(view);
        self.flags[view.idx as usize].remove(ViewFlags::ATTACHED);
        tracing::debug!(view = view.idx, "detached view");
    }

    /// Re-admits `view` to ancestor-driven traversals.
    ///
    /// The view is not marked; an `OnPush` view stays clean until something
    /// marks it.
    pub fn reattach(&mut self, view: ViewId) {
        self.validate(view);
        self.flags[view.idx as usize].insert(ViewFlags::ATTACHED);
        tracing::debug!(view = view.idx, "reattached view");
    }

    /// Sets `NEEDS_CHECK` on `idx` and `DIRTY_DESCENDANT` on every ancestor.
    pub(crate) fn mark_path(&mut self, idx: u32) {
        self.flags[idx as usize].insert(ViewFlags::NEEDS_CHECK);
        let mut p = self.parent[idx as usize];
        while p != INVALID {
            self.flags[p as usize].insert(ViewFlags::DIRTY_DESCENDANT);
            p = self.parent[p as usize];
        }
    }
}
