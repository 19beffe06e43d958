// Copyright 2026 the Vigil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-view state bits and check strategies.

use bitflags::bitflags;

bitflags! {
    /// Change-detection state of a single view.
    ///
    /// `NEEDS_CHECK` and `DIRTY_DESCENDANT` are set by marking and cleared
    /// when a normal pass refreshes the view. `CHECKING` is only set while
    /// the view is on the active traversal path.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ViewFlags: u8 {
        /// The view has never been checked; its first check runs the
        /// template in creation mode.
        const CREATION = 1 << 0;
        /// The view was explicitly marked and must be refreshed.
        const NEEDS_CHECK = 1 << 1;
        /// Some descendant was marked; traversal must pass through.
        const DIRTY_DESCENDANT = 1 << 2;
        /// Scheduled and ancestor-driven traversals may visit the view.
        const ATTACHED = 1 << 3;
        /// The view is currently being refreshed.
        const CHECKING = 1 << 4;
        /// A check was requested while the view was being refreshed.
        const RECHECK = 1 << 5;
    }
}

/// How a component view decides whether an unforced traversal refreshes it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CheckStrategy {
    /// Refreshed on every traversal that reaches it.
    #[default]
    Default,
    /// Refreshed only when marked, when an input changed, or when the
    /// traversal is forced.
    OnPush,
}

/// What kind of node occupies an arena slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum NodeKind {
    Component,
    Embedded,
    Container,
    Free,
}

impl NodeKind {
    #[inline]
    pub(crate) const fn is_view(self) -> bool {
        matches!(self, Self::Component | Self::Embedded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_are_distinct() {
        let all = ViewFlags::all();
        assert_eq!(all.bits().count_ones(), 6, "six distinct flag bits");
    }

    #[test]
    fn only_views_are_views() {
        assert!(NodeKind::Component.is_view(), "component");
        assert!(NodeKind::Embedded.is_view(), "embedded");
        assert!(!NodeKind::Container.is_view(), "container");
        assert!(!NodeKind::Free.is_view(), "free");
    }
}
