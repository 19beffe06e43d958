// Copyright 2026 the Vigil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Declaration slots and child references.

use super::id::{ContainerId, ViewId};

/// What a view's check function declared at a slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Slot {
    /// A plain element.
    Element,
    /// A text node.
    Text,
    /// A child component view, hosted on an element at this slot.
    Component(ViewId),
    /// A view container anchor.
    Container(ContainerId),
}

impl Slot {
    /// Returns `true` if the slot is backed by an element, so that
    /// properties and listeners may target it.
    #[must_use]
    pub const fn is_element(self) -> bool {
        matches!(self, Self::Element | Self::Component(_))
    }
}

/// A direct child of a view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Child {
    /// A child view (component view, or embedded view of a container).
    View(ViewId),
    /// A view container.
    Container(ContainerId),
}
