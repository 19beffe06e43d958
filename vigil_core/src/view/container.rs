// Copyright 2026 the Vigil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Structural operations on view containers.
//!
//! Templates refresh their containers through
//! [`CheckContext`](crate::CheckContext). The methods here are for code
//! outside a check function that manipulates a container directly. Views
//! created this way carry no block id, so a container is managed either by
//! its template or by these methods, not both.

use crate::component::{Component, EmbeddedTemplate, ViewLogic, erase_template};
use crate::context::CheckContext;
use crate::error::CheckError;
use crate::render::NodeRef;

use super::flags::{CheckStrategy, NodeKind};
use super::id::{ContainerId, INVALID, ViewId};
use super::store::ViewTree;

impl ViewTree {
    /// Allocates an embedded view and links it into `container` before
    /// `before` (or last).
    pub(crate) fn create_embedded(
        &mut self,
        container: u32,
        before: u32,
        block: u32,
        template: EmbeddedTemplate,
    ) -> u32 {
        let host = self.host[container as usize];
        let idx = self.alloc_node(
            NodeKind::Embedded,
            CheckStrategy::Default,
            block,
            host,
            Some(ViewLogic::Embedded(template)),
        );
        self.link_child(container, idx, before);
        let anchor = NodeRef {
            view: self.id_at(self.parent[container as usize]),
            slot: self.key[container as usize],
        };
        let id = self.id_at(idx);
        self.renderer.create_view(id, Some(anchor));
        idx
    }

    /// Creates an embedded view at `index` of `container`.
    ///
    /// The template receives the state of the component that declared the
    /// container. The new view is checked by the next traversal that reaches
    /// the container; its ancestors are marked so that `OnPush` ancestors let
    /// that traversal through.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or `index` is past the end.
    pub fn create_embedded_view<T, F>(
        &mut self,
        container: ContainerId,
        index: usize,
        template: F,
    ) -> ViewId
    where
        T: Component,
        F: FnMut(&mut T, &mut CheckContext<'_>) -> Result<(), CheckError> + 'static,
    {
        self.validate_container(container);
        let c = container.idx;
        assert!(
            index <= self.child_count(c),
            "embedded view index out of bounds"
        );
        let before = self.child_at(c, index).unwrap_or(INVALID);
        let idx = self.create_embedded(c, before, INVALID, erase_template(template));
        self.mark_path(idx);
        self.id_at(idx)
    }

    /// Inserts an embedded view that is not in any container at `index`.
    ///
    /// # Panics
    ///
    /// Panics if a handle is stale, `index` is past the end, the view is not
    /// a free-standing embedded view, or it was declared by a different
    /// component than the container.
    pub fn insert_view(&mut self, container: ContainerId, index: usize, view: ViewId) {
        self.validate_container(container);
        self.validate(view);
        let (c, v) = (container.idx, view.idx);
        assert!(
            self.kind[v as usize] == NodeKind::Embedded && self.parent[v as usize] == INVALID,
            "only embedded views outside a container can be inserted"
        );
        assert!(
            self.host[v as usize] == self.host[c as usize],
            "embedded views can only move between containers of the same component"
        );
        assert!(
            index <= self.child_count(c),
            "embedded view index out of bounds"
        );
        let before = self.child_at(c, index).unwrap_or(INVALID);
        self.link_child(c, v, before);
        self.mark_path(v);
    }

    /// Removes the embedded view at `index` from `container` without
    /// destroying it, so it can be inserted again later.
    pub fn take_view(&mut self, container: ContainerId, index: usize) -> Option<ViewId> {
        self.validate_container(container);
        let v = self.child_at(container.idx, index)?;
        self.unlink_from_parent(v);
        Some(self.id_at(v))
    }

    /// Removes and destroys the embedded view at `index` of `container`.
    ///
    /// Returns `false` if there is no view at `index`.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or the view is being checked.
    pub fn remove_view(&mut self, container: ContainerId, index: usize) -> bool {
        self.validate_container(container);
        let Some(v) = self.child_at(container.idx, index) else {
            return false;
        };
        self.unlink_from_parent(v);
        self.destroy_subtree(v);
        true
    }

    /// Removes and destroys every embedded view of `container`.
    pub fn clear_container(&mut self, container: ContainerId) {
        while self.remove_view(container, 0) {}
    }
}
