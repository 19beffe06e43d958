// Copyright 2026 the Vigil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Change detection for hierarchical view trees.
//!
//! `vigil_core` keeps rendered output in sync with application state. An
//! application is a tree of *views*: each component view owns a piece of
//! state and a check function (its template) that declares rendered nodes
//! and binds them to values computed from that state. A change-detection
//! pass walks the tree, re-runs check functions, and forwards only the
//! bindings whose value changed to a [`Renderer`](render::Renderer).
//!
//! The crate is `no_std` compatible (with `alloc`) and stores the tree in
//! struct-of-arrays form addressed by generational handles.
//!
//! # Architecture
//!
//! ```text
//!   event / state change
//!       │
//!       ▼
//!   ViewTree::mark_dirty() ──► Scheduler ──► FramePort::request_frame()
//!                                                  │
//!                 ┌────────────────────────────────┘
//!                 ▼
//!   ViewTree::run_frame() ──► tick(root) ──► templates ──► Renderer
//!                                  │
//!                                  ▼ (development mode)
//!                         verification pass
//! ```
//!
//! **[`view`]**: Struct-of-arrays view tree with generational handles,
//! per-view flags, embedded-view containers, and the traversal itself
//! ([`ViewTree::tick`](view::ViewTree::tick),
//! [`ViewTree::detect_changes`](view::ViewTree::detect_changes),
//! [`ViewTree::check_no_changes`](view::ViewTree::check_no_changes)).
//!
//! **[`component`]**: The [`Component`] trait: template, check strategy, and
//! lifecycle hooks.
//!
//! **[`context`]**: [`CheckContext`], the declaration and binding primitives
//! templates use.
//!
//! **[`detector`]**: [`ChangeDetectorRef`], the per-view handle for
//! `detect_changes`, `mark_for_check`, `detach`, `reattach`, and
//! `check_no_changes`.
//!
//! **[`scheduler`]**: Frame coalescing for dirty roots, the
//! [`FramePort`](scheduler::FramePort) hosts implement, and the
//! deterministic [`ManualFrames`](scheduler::ManualFrames) source.
//!
//! **[`render`]**: The [`Renderer`](render::Renderer) contract and the
//! in-memory [`MemoryRenderer`](render::MemoryRenderer).
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! pass instrumentation, with a zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! Structured logs are emitted through `tracing` at `debug` and `trace`
//! level; the crate never installs a subscriber.
//!
//! # Example
//!
//! ```
//! use vigil_core::render::MemoryRenderer;
//! use vigil_core::scheduler::ManualFrames;
//! use vigil_core::view::ViewTree;
//! use vigil_core::{CheckContext, CheckError, Component};
//!
//! struct Counter {
//!     count: u32,
//! }
//!
//! impl Component for Counter {
//!     fn template(&mut self, cx: &mut CheckContext<'_>) -> Result<(), CheckError> {
//!         if cx.creation_mode() {
//!             cx.element(0, "button")?;
//!             cx.listener(0, "click", |c: &mut Counter| c.count += 1)?;
//!             cx.text(1)?;
//!         }
//!         cx.text_binding(1, self.count)
//!     }
//! }
//!
//! let frames = ManualFrames::new();
//! let mut tree = ViewTree::new(MemoryRenderer::new(), frames.port());
//! let root = tree.render_component(Counter { count: 0 })?;
//!
//! tree.dispatch_event(root, 0, "click");
//! frames.flush(&mut tree)?;
//!
//! let renderer = tree.renderer::<MemoryRenderer>().unwrap();
//! assert_eq!(renderer.rendered_text(&tree, root), "1");
//! # Ok::<(), CheckError>(())
//! ```
//!
//! # Crate features
//!
//! - `trace` (disabled by default): Enables [`Tracer`](trace::Tracer)
//!   method bodies. Without this feature, all trace calls compile to nothing.
//! - `trace-rich` (disabled by default, implies `trace`): Adds per-binding
//!   commit events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod component;
pub mod config;
pub mod context;
pub mod detector;
pub mod error;
pub mod render;
pub mod scheduler;
pub mod trace;
pub mod value;
pub mod view;

pub use component::Component;
pub use config::TreeConfig;
pub use context::CheckContext;
pub use detector::ChangeDetectorRef;
pub use error::{BindingLocation, CheckError};
pub use value::BindingValue;
