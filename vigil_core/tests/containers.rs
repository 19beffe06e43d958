// Copyright 2026 the Vigil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! View containers: template-driven refreshes and direct manipulation.

mod common;

use std::rc::Rc;

use common::{Conditional, Count, Host, child, container, count, text, tree};
use vigil_core::render::MemoryRenderer;
use vigil_core::view::{CheckStrategy, ViewFlags};
use vigil_core::{CheckContext, CheckError, Component};

/// `@for (item of items) { {{ item }} }`
struct List {
    items: Vec<String>,
}

impl List {
    fn new(items: &[&str]) -> Self {
        Self {
            items: items.iter().map(|item| (*item).into()).collect(),
        }
    }
}

impl Component for List {
    fn template(&mut self, cx: &mut CheckContext<'_>) -> Result<(), CheckError> {
        if cx.creation_mode() {
            cx.container(0)?;
        }
        cx.container_refresh_start(0)?;
        for index in 0..self.items.len() {
            cx.embedded_view(0, move |list: &mut Self, cx: &mut CheckContext<'_>| {
                if cx.creation_mode() {
                    cx.text(0)?;
                }
                let item = list.items.get(index).map(String::as_str);
                cx.text_binding(0, item.unwrap_or_default())
            })?;
        }
        cx.container_refresh_end()
    }
}

/// `@switch (case)` with one block per case.
struct Switch {
    case: u32,
}

impl Component for Switch {
    fn template(&mut self, cx: &mut CheckContext<'_>) -> Result<(), CheckError> {
        if cx.creation_mode() {
            cx.container(0)?;
        }
        cx.container_refresh_start(0)?;
        let word = match self.case {
            0 => "zero",
            1 => "one",
            _ => "many",
        };
        cx.embedded_view(self.case.min(2), move |_: &mut Self, cx: &mut CheckContext<'_>| {
            if cx.creation_mode() {
                cx.text(0)?;
            }
            cx.text_binding(0, word)
        })?;
        cx.container_refresh_end()
    }
}

/// A click counter whose button lives in an embedded view.
struct Clicks {
    clicks: u32,
}

impl Component for Clicks {
    fn template(&mut self, cx: &mut CheckContext<'_>) -> Result<(), CheckError> {
        if cx.creation_mode() {
            cx.container(0)?;
        }
        cx.container_refresh_start(0)?;
        cx.embedded_view(0, |clicks: &mut Self, cx: &mut CheckContext<'_>| {
            if cx.creation_mode() {
                cx.element(0, "button")?;
                cx.listener(0, "click", |clicks: &mut Self| clicks.clicks += 1)?;
                cx.text(1)?;
            }
            cx.text_binding(1, clicks.clicks)
        })?;
        cx.container_refresh_end()
    }

    fn strategy(&self) -> CheckStrategy {
        CheckStrategy::OnPush
    }
}

/// Records its own destruction.
struct Dropper {
    drops: Count,
}

impl Component for Dropper {
    fn template(&mut self, _cx: &mut CheckContext<'_>) -> Result<(), CheckError> {
        Ok(())
    }

    fn on_destroy(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}

/// `@if (show) { <dropper/> }`
struct Guarded {
    show: bool,
    drops: Count,
}

impl Component for Guarded {
    fn template(&mut self, cx: &mut CheckContext<'_>) -> Result<(), CheckError> {
        if cx.creation_mode() {
            cx.container(0)?;
        }
        cx.container_refresh_start(0)?;
        if self.show {
            cx.embedded_view(0, |guarded: &mut Self, cx: &mut CheckContext<'_>| {
                if cx.creation_mode() {
                    let drops = Rc::clone(&guarded.drops);
                    cx.component(0, Dropper { drops })?;
                }
                Ok(())
            })?;
        }
        cx.container_refresh_end()
    }
}

/// An `OnPush` component whose container is filled from outside.
struct Outlet;

impl Component for Outlet {
    fn template(&mut self, cx: &mut CheckContext<'_>) -> Result<(), CheckError> {
        if cx.creation_mode() {
            cx.container(0)?;
        }
        Ok(())
    }

    fn strategy(&self) -> CheckStrategy {
        CheckStrategy::OnPush
    }
}

fn word(
    word: &'static str,
) -> impl FnMut(&mut Outlet, &mut CheckContext<'_>) -> Result<(), CheckError> {
    move |_: &mut Outlet, cx: &mut CheckContext<'_>| {
        if cx.creation_mode() {
            cx.text(0)?;
        }
        cx.text_binding(0, word)
    }
}

#[test]
fn conditional_block_comes_and_goes() {
    let (mut tree, _frames) = tree();
    let root = tree
        .render_component(Conditional {
            show: true,
            value: 1,
        })
        .unwrap();
    let slot = container(&tree, root, 0);
    assert_eq!(text(&tree, root), "1");
    assert_eq!(tree.container_len(slot), 1);
    let first = tree.embedded_views(slot).next().unwrap();

    tree.component_mut::<Conditional>(root).unwrap().show = false;
    tree.tick(root).unwrap();
    assert_eq!(text(&tree, root), "");
    assert_eq!(tree.container_len(slot), 0);
    assert!(!tree.is_alive(first), "hidden block destroyed");

    tree.component_mut::<Conditional>(root).unwrap().show = true;
    tree.tick(root).unwrap();
    assert_eq!(text(&tree, root), "1");
    assert_eq!(
        tree.renderer::<MemoryRenderer>().unwrap().live_views(),
        2,
        "root and one embedded view"
    );
}

#[test]
fn loop_keeps_views_by_position() {
    let (mut tree, _frames) = tree();
    let root = tree.render_component(List::new(&["a", "b", "c"])).unwrap();
    let slot = container(&tree, root, 0);
    assert_eq!(text(&tree, root), "abc");
    let before: Vec<_> = tree.embedded_views(slot).collect();

    tree.component_mut::<List>(root).unwrap().items = List::new(&["a", "x", "c", "d"]).items;
    tree.tick(root).unwrap();
    assert_eq!(text(&tree, root), "axcd");
    let after: Vec<_> = tree.embedded_views(slot).collect();
    assert_eq!(after[..3], before[..], "existing positions are reused");

    tree.component_mut::<List>(root).unwrap().items.truncate(1);
    tree.tick(root).unwrap();
    assert_eq!(text(&tree, root), "a");
    assert!(
        after[1..].iter().all(|view| !tree.is_alive(*view)),
        "tail destroyed"
    );
}

#[test]
fn different_block_replaces_view() {
    let (mut tree, _frames) = tree();
    let root = tree.render_component(Switch { case: 0 }).unwrap();
    let slot = container(&tree, root, 0);
    let zero = tree.embedded_views(slot).next().unwrap();
    assert_eq!(text(&tree, root), "zero");

    tree.component_mut::<Switch>(root).unwrap().case = 1;
    tree.tick(root).unwrap();
    assert_eq!(text(&tree, root), "one");
    assert!(!tree.is_alive(zero), "old block destroyed");
    assert_eq!(tree.container_len(slot), 1);
}

#[test]
fn verifier_reports_structural_changes() {
    let (mut tree, _frames) = tree();
    let root = tree
        .render_component(Conditional {
            show: true,
            value: 1,
        })
        .unwrap();

    tree.component_mut::<Conditional>(root).unwrap().show = false;
    let err = tree.check_no_changes(root).unwrap_err();
    assert!(
        matches!(err, CheckError::StructureChanged { container: c } if c == container(&tree, root, 0)),
        "removal detected: {err}"
    );
    assert_eq!(text(&tree, root), "1", "nothing destroyed");

    let root = tree
        .render_component(Conditional {
            show: false,
            value: 1,
        })
        .unwrap();
    tree.component_mut::<Conditional>(root).unwrap().show = true;
    assert!(
        matches!(
            tree.check_no_changes(root),
            Err(CheckError::StructureChanged { .. })
        ),
        "addition detected"
    );
}

#[test]
fn embedded_listener_updates_host_state() {
    let (mut tree, frames) = tree();
    let root = tree.render_component(Clicks { clicks: 0 }).unwrap();
    let slot = container(&tree, root, 0);
    let view = tree.embedded_views(slot).next().unwrap();
    assert_eq!(tree.host_component(view), root);
    assert_eq!(tree.parent(view), Some(root));
    assert_eq!(tree.container_of(view), Some(slot));

    assert!(tree.dispatch_event(view, 0, "click"), "listener ran");
    assert_eq!(tree.component::<Clicks>(root).unwrap().clicks, 1);
    frames.flush(&mut tree).unwrap();
    assert_eq!(text(&tree, root), "1", "OnPush host let the marked view through");
}

#[test]
fn mark_for_check_on_embedded_view_reaches_onpush_ancestors() {
    let (mut tree, frames) = tree();
    let root = tree
        .render_component(Host::new(
            Host::new(
                Conditional {
                    show: true,
                    value: 1,
                },
                CheckStrategy::OnPush,
                &count(),
            ),
            CheckStrategy::Default,
            &count(),
        ))
        .unwrap();
    let conditional = child(&tree, child(&tree, root, 0), 0);
    let view = tree
        .embedded_views(container(&tree, conditional, 0))
        .next()
        .unwrap();

    tree.component_mut::<Conditional>(conditional).unwrap().value = 2;
    tree.tick(root).unwrap();
    assert_eq!(text(&tree, root), "1");

    tree.change_detector(view).mark_for_check();
    frames.flush(&mut tree).unwrap();
    assert_eq!(text(&tree, root), "2");
}

#[test]
fn hiding_a_block_destroys_its_components() {
    let (mut tree, _frames) = tree();
    let drops = count();
    let root = tree
        .render_component(Guarded {
            show: true,
            drops: Rc::clone(&drops),
        })
        .unwrap();
    assert_eq!(drops.get(), 0);

    tree.component_mut::<Guarded>(root).unwrap().show = false;
    tree.tick(root).unwrap();
    assert_eq!(drops.get(), 1, "on_destroy ran");

    tree.destroy_view(root);
    assert_eq!(drops.get(), 1, "nothing left to destroy");
    assert!(tree.roots().is_empty(), "root gone");
}

#[test]
fn direct_container_manipulation() {
    let (mut tree, _frames) = tree();
    let root = tree.render_component(Outlet).unwrap();
    let slot = container(&tree, root, 0);

    let a = tree.create_embedded_view(slot, 0, word("a"));
    tree.create_embedded_view(slot, 1, word("b"));
    tree.create_embedded_view(slot, 1, word("c"));
    assert!(
        tree.flags(root).contains(ViewFlags::DIRTY_DESCENDANT),
        "new views mark the OnPush host"
    );
    tree.tick(root).unwrap();
    assert_eq!(text(&tree, root), "acb");

    assert_eq!(tree.take_view(slot, 0), Some(a));
    assert_eq!(tree.container_of(a), None, "free-standing");
    assert_eq!(text(&tree, root), "cb");
    tree.insert_view(slot, 2, a);
    assert_eq!(text(&tree, root), "cba");

    assert!(tree.remove_view(slot, 2), "removed");
    assert!(!tree.is_alive(a), "removed views are destroyed");
    assert!(!tree.remove_view(slot, 5), "nothing at 5");

    tree.clear_container(slot);
    assert_eq!(tree.container_len(slot), 0);
    assert_eq!(text(&tree, root), "");
}
