// Copyright 2026 the Vigil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Components and helpers shared by the integration tests.

#![allow(dead_code, reason = "each test binary uses a subset of the fixtures")]

use std::cell::Cell;
use std::rc::Rc;

use vigil_core::render::MemoryRenderer;
use vigil_core::scheduler::ManualFrames;
use vigil_core::view::{CheckStrategy, ContainerId, Slot, ViewId, ViewTree};
use vigil_core::{ChangeDetectorRef, CheckContext, CheckError, Component};

/// Shared hook counter.
pub(crate) type Count = Rc<Cell<u32>>;

pub(crate) fn count() -> Count {
    Rc::new(Cell::new(0))
}

/// `{{ value }}`
pub(crate) struct Label {
    pub(crate) value: String,
    pub(crate) strategy: CheckStrategy,
    pub(crate) checks: Count,
}

impl Label {
    pub(crate) fn new(value: &str, strategy: CheckStrategy, checks: &Count) -> Self {
        Self {
            value: value.into(),
            strategy,
            checks: Rc::clone(checks),
        }
    }
}

impl Component for Label {
    fn template(&mut self, cx: &mut CheckContext<'_>) -> Result<(), CheckError> {
        if cx.creation_mode() {
            cx.text(0)?;
        }
        cx.text_binding(0, self.value.as_str())
    }

    fn strategy(&self) -> CheckStrategy {
        self.strategy
    }

    fn tag(&self) -> &'static str {
        "label"
    }

    fn do_check(&mut self, _cd: &mut ChangeDetectorRef<'_>) -> Result<(), CheckError> {
        self.checks.set(self.checks.get() + 1);
        Ok(())
    }
}

/// `<button (click)="value += 1">` followed by `{{ value }}`
pub(crate) struct Counter {
    pub(crate) value: i64,
    pub(crate) strategy: CheckStrategy,
    pub(crate) checks: Count,
}

impl Counter {
    pub(crate) fn new(strategy: CheckStrategy, checks: &Count) -> Self {
        Self {
            value: 0,
            strategy,
            checks: Rc::clone(checks),
        }
    }
}

impl Component for Counter {
    fn template(&mut self, cx: &mut CheckContext<'_>) -> Result<(), CheckError> {
        if cx.creation_mode() {
            cx.element(0, "button")?;
            cx.listener(0, "click", |counter: &mut Self| counter.value += 1)?;
            cx.text(1)?;
        }
        cx.text_binding(1, self.value)
    }

    fn strategy(&self) -> CheckStrategy {
        self.strategy
    }

    fn tag(&self) -> &'static str {
        "counter"
    }

    fn do_check(&mut self, _cd: &mut ChangeDetectorRef<'_>) -> Result<(), CheckError> {
        self.checks.set(self.checks.get() + 1);
        Ok(())
    }
}

/// Hosts one component at slot 0 and counts its own checks.
pub(crate) struct Host<C: Component> {
    pub(crate) child: Option<C>,
    pub(crate) strategy: CheckStrategy,
    pub(crate) checks: Count,
}

impl<C: Component> Host<C> {
    pub(crate) fn new(child: C, strategy: CheckStrategy, checks: &Count) -> Self {
        Self {
            child: Some(child),
            strategy,
            checks: Rc::clone(checks),
        }
    }
}

impl<C: Component> Component for Host<C> {
    fn template(&mut self, cx: &mut CheckContext<'_>) -> Result<(), CheckError> {
        if cx.creation_mode()
            && let Some(child) = self.child.take()
        {
            cx.component(0, child)?;
        }
        Ok(())
    }

    fn strategy(&self) -> CheckStrategy {
        self.strategy
    }

    fn tag(&self) -> &'static str {
        "host"
    }

    fn do_check(&mut self, _cd: &mut ChangeDetectorRef<'_>) -> Result<(), CheckError> {
        self.checks.set(self.checks.get() + 1);
        Ok(())
    }
}

/// A tree over a [`MemoryRenderer`] with manually flushed frames.
pub(crate) fn tree() -> (ViewTree, ManualFrames) {
    let frames = ManualFrames::new();
    let tree = ViewTree::new(MemoryRenderer::new(), frames.port());
    (tree, frames)
}

/// Text content rendered under `view`.
pub(crate) fn text(tree: &ViewTree, view: ViewId) -> String {
    tree.renderer::<MemoryRenderer>()
        .map(|renderer| renderer.rendered_text(tree, view))
        .unwrap_or_default()
}

/// The component view declared at `slot` of `view`.
pub(crate) fn child(tree: &ViewTree, view: ViewId, slot: u32) -> ViewId {
    match tree.slot(view, slot) {
        Some(Slot::Component(child)) => child,
        other => panic!("slot {slot} of {view:?} holds {other:?}, not a component"),
    }
}

/// `@if (show) { {{ value }} }` in a container at slot 0.
pub(crate) struct Conditional {
    pub(crate) show: bool,
    pub(crate) value: i64,
}

impl Component for Conditional {
    fn template(&mut self, cx: &mut CheckContext<'_>) -> Result<(), CheckError> {
        if cx.creation_mode() {
            cx.container(0)?;
        }
        cx.container_refresh_start(0)?;
        if self.show {
            cx.embedded_view(0, |state: &mut Self, cx: &mut CheckContext<'_>| {
                if cx.creation_mode() {
                    cx.text(0)?;
                }
                cx.text_binding(0, state.value)
            })?;
        }
        cx.container_refresh_end()
    }
}

/// The container declared at `slot` of `view`.
pub(crate) fn container(tree: &ViewTree, view: ViewId, slot: u32) -> ContainerId {
    match tree.slot(view, slot) {
        Some(Slot::Container(container)) => container,
        other => panic!("slot {slot} of {view:?} holds {other:?}, not a container"),
    }
}
