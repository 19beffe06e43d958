// Copyright 2026 the Vigil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web backend for vigil.
//!
//! This crate connects a [`ViewTree`](vigil_core::view::ViewTree) to the
//! browser:
//!
//! - [`DomRenderer`]: applies node creations and committed bindings to DOM nodes
//! - [`RafPort`]: coalesces frame requests onto `requestAnimationFrame`
//!
//! Neither type can reach the tree that owns it, so both hand control back
//! to the host through callbacks. The usual wiring keeps the tree in an
//! `Rc<RefCell<_>>` and lets the callbacks borrow it:
//!
//! ```rust,ignore
//! let tree: Rc<RefCell<Option<ViewTree>>> = Rc::default();
//!
//! let frames = Rc::clone(&tree);
//! let port = RafPort::new(move || {
//!     if let Some(tree) = frames.borrow_mut().as_mut() {
//!         let _ = tree.run_frame();
//!     }
//! });
//!
//! let events = Rc::clone(&tree);
//! let renderer = DomRenderer::new(document, mount, move |node, event| {
//!     if let Some(tree) = events.borrow_mut().as_mut() {
//!         tree.dispatch_event(node.view, node.slot, event);
//!     }
//! });
//!
//! let mut view_tree = ViewTree::new(renderer, port);
//! view_tree.render_component(App::default())?;
//! *tree.borrow_mut() = Some(view_tree);
//! ```

#![no_std]

extern crate alloc;

mod dom;
mod raf;

pub use dom::DomRenderer;
pub use raf::RafPort;
pub use vigil_core::render::Renderer;
pub use vigil_core::scheduler::FramePort;
