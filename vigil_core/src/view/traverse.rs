// Copyright 2026 the Vigil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree traversal utilities.

use super::flags::NodeKind;
use super::id::{ContainerId, INVALID, ViewId};
use super::slot::Child;
use super::store::ViewTree;

/// An iterator over the direct children of a view, in declaration order.
///
/// Created by [`ViewTree::children`].
#[derive(Debug)]
pub struct Children<'a> {
    tree: &'a ViewTree,
    current: u32,
}

impl<'a> Children<'a> {
    pub(crate) fn new(tree: &'a ViewTree, first: u32) -> Self {
        Self {
            tree,
            current: first,
        }
    }
}

impl Iterator for Children<'_> {
    type Item = Child;

    fn next(&mut self) -> Option<Child> {
        if self.current == INVALID {
            return None;
        }
        let idx = self.current;
        self.current = self.tree.next_sibling[idx as usize];
        let generation = self.tree.generation[idx as usize];
        Some(match self.tree.kind[idx as usize] {
            NodeKind::Container => Child::Container(ContainerId { idx, generation }),
            _ => Child::View(ViewId { idx, generation }),
        })
    }
}

/// An iterator over the embedded views of a container, in order.
///
/// Created by [`ViewTree::embedded_views`].
#[derive(Debug)]
pub struct EmbeddedViews<'a> {
    tree: &'a ViewTree,
    current: u32,
}

impl<'a> EmbeddedViews<'a> {
    pub(crate) fn new(tree: &'a ViewTree, first: u32) -> Self {
        Self {
            tree,
            current: first,
        }
    }
}

impl Iterator for EmbeddedViews<'_> {
    type Item = ViewId;

    fn next(&mut self) -> Option<ViewId> {
        if self.current == INVALID {
            return None;
        }
        let idx = self.current;
        self.current = self.tree.next_sibling[idx as usize];
        Some(ViewId {
            idx,
            generation: self.tree.generation[idx as usize],
        })
    }
}
