// Copyright 2026 the Vigil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Traversal properties over generated tree shapes.

mod common;

use std::rc::Rc;

use common::{Count, count, text, tree};
use proptest::prelude::*;
use vigil_core::render::MemoryRenderer;
use vigil_core::scheduler::ManualFrames;
use vigil_core::view::{CheckStrategy, Slot, ViewId, ViewTree};
use vigil_core::{ChangeDetectorRef, CheckContext, CheckError, Component};

#[derive(Clone, Debug)]
struct Shape {
    on_push: bool,
    children: Vec<Shape>,
}

fn shape() -> impl Strategy<Value = Shape> {
    let leaf = any::<bool>().prop_map(|on_push| Shape {
        on_push,
        children: Vec::new(),
    });
    leaf.prop_recursive(3, 24, 3, |inner| {
        (any::<bool>(), prop::collection::vec(inner, 0..3))
            .prop_map(|(on_push, children)| Shape { on_push, children })
    })
}

/// `{{ value }}` followed by its children.
struct Node {
    value: u32,
    strategy: CheckStrategy,
    checks: Count,
    children: Vec<Node>,
}

impl Component for Node {
    fn template(&mut self, cx: &mut CheckContext<'_>) -> Result<(), CheckError> {
        if cx.creation_mode() {
            cx.text(0)?;
            for (slot, child) in (1..).zip(self.children.drain(..)) {
                cx.component(slot, child)?;
            }
        }
        cx.text_binding(0, self.value)
    }

    fn strategy(&self) -> CheckStrategy {
        self.strategy
    }

    fn do_check(&mut self, _cd: &mut ChangeDetectorRef<'_>) -> Result<(), CheckError> {
        self.checks.set(self.checks.get() + 1);
        Ok(())
    }
}

/// Per node in pre-order: its check counter and whether every node from the
/// root down to it is `Default`.
type Probes = Vec<(Count, bool)>;

fn build(shape: &Shape, default_path: bool, probes: &mut Probes) -> Node {
    let strategy = if shape.on_push {
        CheckStrategy::OnPush
    } else {
        CheckStrategy::Default
    };
    let always = default_path && !shape.on_push;
    let checks = count();
    probes.push((Rc::clone(&checks), always));
    let children = shape
        .children
        .iter()
        .map(|child| build(child, always, probes))
        .collect();
    Node {
        value: 0,
        strategy,
        checks,
        children,
    }
}

fn views(tree: &ViewTree, view: ViewId, out: &mut Vec<ViewId>) {
    out.push(view);
    for (_, slot) in tree.slots(view) {
        if let Slot::Component(child) = slot {
            views(tree, child, out);
        }
    }
}

/// Renders `shape` with a `Default` root.
fn render(shape: &Shape) -> (ViewTree, ManualFrames, Vec<ViewId>, Probes) {
    let (mut tree, frames) = tree();
    let mut probes = Vec::new();
    let root = Shape {
        on_push: false,
        children: shape.children.clone(),
    };
    let root = tree
        .render_component(build(&root, true, &mut probes))
        .unwrap();
    let mut ids = Vec::new();
    views(&tree, root, &mut ids);
    (tree, frames, ids, probes)
}

fn commits(tree: &ViewTree) -> u64 {
    tree.renderer::<MemoryRenderer>().unwrap().commits()
}

fn counts(probes: &Probes) -> Vec<u32> {
    probes.iter().map(|(checks, _)| checks.get()).collect()
}

proptest! {
    #[test]
    fn repeated_tick_is_idempotent(shape in shape()) {
        let (mut tree, _frames, ids, probes) = render(&shape);
        let root = ids[0];
        prop_assert_eq!(ids.len(), probes.len());
        prop_assert!(counts(&probes).iter().all(|&n| n == 1), "every node checked on init");

        let before = (commits(&tree), text(&tree, root));
        tree.tick(root).unwrap();
        prop_assert_eq!((commits(&tree), text(&tree, root)), before);
        for (checks, always) in &probes {
            prop_assert_eq!(checks.get(), if *always { 2 } else { 1 });
        }
    }

    #[test]
    fn unmarked_writes_reach_only_default_paths(shape in shape(), pick in any::<prop::sample::Index>()) {
        let (mut tree, _frames, ids, probes) = render(&shape);
        let i = pick.index(ids.len());
        tree.component_mut::<Node>(ids[i]).unwrap().value = 7;
        let before = text(&tree, ids[0]);
        tree.tick(ids[0]).unwrap();
        prop_assert_eq!(text(&tree, ids[0]) != before, probes[i].1);
    }

    #[test]
    fn marks_coalesce_into_one_check(
        shape in shape(),
        pick in any::<prop::sample::Index>(),
        marks in 1_usize..20,
    ) {
        let (mut tree, frames, ids, probes) = render(&shape);
        let i = pick.index(ids.len());
        tree.component_mut::<Node>(ids[i]).unwrap().value = 7;
        let before = counts(&probes);
        for _ in 0..marks {
            tree.change_detector(ids[i]).mark_for_check();
        }
        prop_assert_eq!(frames.pending(), 1);

        frames.flush(&mut tree).unwrap();
        prop_assert_eq!(probes[i].0.get(), before[i] + 1);
        prop_assert_eq!(tree.bindings(ids[i]).first().map(ToString::to_string), Some("7".into()));
        prop_assert!(!frames.flush(&mut tree).unwrap(), "no further frame");
    }

    #[test]
    fn verifier_round_trip(shape in shape(), pick in any::<prop::sample::Index>()) {
        let (mut tree, _frames, ids, _probes) = render(&shape);
        let root = ids[0];
        prop_assert!(tree.check_no_changes(root).is_ok());

        let i = pick.index(ids.len());
        tree.component_mut::<Node>(ids[i]).unwrap().value = 7;
        let err = tree.check_no_changes(root).unwrap_err();
        let message = err.to_string();
        prop_assert!(message.ends_with("Previous value: '0'. Current value: '7'."), "{}", message);
    }
}
