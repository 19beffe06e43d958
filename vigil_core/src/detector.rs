// Copyright 2026 the Vigil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-view change-detection handle.

use crate::error::CheckError;
use crate::view::{ViewId, ViewTree};

/// Controls change detection for one view.
///
/// Hooks receive one for their own view; other code gets one from
/// [`ViewTree::change_detector`].
#[derive(Debug)]
pub struct ChangeDetectorRef<'a> {
    tree: &'a mut ViewTree,
    view: ViewId,
}

impl<'a> ChangeDetectorRef<'a> {
    pub(crate) fn new(tree: &'a mut ViewTree, view: ViewId) -> Self {
        Self { tree, view }
    }

    /// The view this handle controls.
    #[must_use]
    pub fn view(&self) -> ViewId {
        self.view
    }

    /// Checks the view and its attached subtree now. See
    /// [`ViewTree::detect_changes`].
    ///
    /// The view's own `do_check` runs too, like that of every other visited
    /// component. Called from inside that view's `do_check`, the request is
    /// folded into the check already running.
    pub fn detect_changes(&mut self) -> Result<(), CheckError> {
        self.tree.detect_changes(self.view)
    }

    /// Marks the view and its ancestors and schedules a frame. See
    /// [`ViewTree::mark_dirty`].
    pub fn mark_for_check(&mut self) {
        self.tree.mark_dirty(self.view);
    }

    /// Excludes the view from ancestor-driven traversals.
    pub fn detach(&mut self) {
        self.tree.detach(self.view);
    }

    /// Re-admits the view to ancestor-driven traversals.
    pub fn reattach(&mut self) {
        self.tree.reattach(self.view);
    }

    /// Verifies that no binding under the view changed. See
    /// [`ViewTree::check_no_changes`].
    pub fn check_no_changes(&mut self) -> Result<(), CheckError> {
        self.tree.check_no_changes(self.view)
    }

    /// The whole tree, for hooks that need to reach other views.
    pub fn tree(&mut self) -> &mut ViewTree {
        self.tree
    }
}

impl ViewTree {
    /// Returns the change detector of `view`.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn change_detector(&mut self, view: ViewId) -> ChangeDetectorRef<'_> {
        self.validate(view);
        ChangeDetectorRef::new(self, view)
    }
}
