// Copyright 2026 the Vigil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event dispatch to listeners declared by templates.

use core::any::Any;

use crate::component::ViewLogic;

use super::id::ViewId;
use super::store::ViewTree;

impl ViewTree {
    /// Delivers `event` on the element at `slot` of `view` to its
    /// listeners, then marks the view dirty.
    ///
    /// Returns `false` (and marks nothing) if no listener matched, or if
    /// the component state the listeners need is in use by a running check.
    pub fn dispatch_event(&mut self, view: ViewId, slot: u32, event: &str) -> bool {
        self.validate(view);
        let i = view.idx as usize;
        let host = self.host[i] as usize;
        let Some(ViewLogic::Component(state)) = self.logic[host].as_mut()
        else {
            tracing::warn!(view = view.idx, slot, event, "listener state unavailable");
            return false;
        };
        let state: &mut dyn Any = &mut **state;
        let mut handled = false;
        for listener in self.listeners[i]
            .iter_mut()
            .filter(|l| l.slot == slot && l.event == event)
        {
            (listener.handler)(state);
            handled = true;
        }
        if handled {
            self.mark_dirty(view);
        }
        handled
    }
}
