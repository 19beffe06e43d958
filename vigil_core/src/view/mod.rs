// Copyright 2026 the Vigil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! View tree storage, topology, and change-detection traversal.

mod check;
mod container;
mod event;
mod flags;
mod frame;
mod id;
mod mark;
mod slot;
mod store;
mod traverse;

pub use flags::{CheckStrategy, ViewFlags};
pub use id::{ContainerId, INVALID, ViewId};
pub use slot::{Child, Slot};
pub use store::ViewTree;
pub use traverse::{Children, EmbeddedViews};

pub(crate) use flags::NodeKind;
