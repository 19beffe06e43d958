// Copyright 2026 the Vigil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Invalid check-function invocations and structural misuse.

mod common;

use common::{Host, Label, child, count, tree};
use vigil_core::view::{CheckStrategy, ViewFlags};
use vigil_core::{CheckContext, CheckError, Component};

/// Declares its text on every run instead of only in creation mode.
struct AlwaysCreates;

impl Component for AlwaysCreates {
    fn template(&mut self, cx: &mut CheckContext<'_>) -> Result<(), CheckError> {
        cx.text(0)
    }
}

/// Binds a slot it never declared.
struct Undeclared;

impl Component for Undeclared {
    fn template(&mut self, cx: &mut CheckContext<'_>) -> Result<(), CheckError> {
        if cx.creation_mode() {
            cx.element(0, "div")?;
        }
        cx.text_binding(0, "not a text node")
    }
}

/// Opens a container refresh and never closes it.
struct Unclosed;

impl Component for Unclosed {
    fn template(&mut self, cx: &mut CheckContext<'_>) -> Result<(), CheckError> {
        if cx.creation_mode() {
            cx.container(0)?;
        }
        cx.container_refresh_start(0)
    }
}

/// Closes a container refresh it never opened.
struct Unopened;

impl Component for Unopened {
    fn template(&mut self, cx: &mut CheckContext<'_>) -> Result<(), CheckError> {
        cx.container_refresh_end()
    }
}

#[test]
fn creation_primitive_outside_creation_mode() {
    let (mut tree, _frames) = tree();
    let root = tree.create_root(AlwaysCreates);
    let err = tree.tick(root).unwrap_err();
    assert_eq!(
        err,
        CheckError::CreationOnly {
            view: root,
            slot: 0,
            primitive: "text",
        }
    );
    assert!(
        !tree.flags(root).contains(ViewFlags::CREATION),
        "a failed run does not return to creation mode"
    );
}

#[test]
fn binding_to_wrong_kind_of_slot() {
    let (mut tree, _frames) = tree();
    let err = tree.render_component(Undeclared).unwrap_err();
    assert!(
        matches!(err, CheckError::UnknownSlot { slot: 0, .. }),
        "unexpected error: {err}"
    );
}

#[test]
fn unbalanced_container_brackets() {
    let (mut tree, _frames) = tree();
    assert!(
        matches!(
            tree.render_component(Unclosed),
            Err(CheckError::InvalidInvocation { .. })
        ),
        "unclosed refresh"
    );
    assert!(
        matches!(
            tree.render_component(Unopened),
            Err(CheckError::InvalidInvocation { .. })
        ),
        "unopened refresh"
    );
}

#[test]
#[should_panic(expected = "stale ViewId")]
fn destroyed_view_handle_panics() {
    let (mut tree, _frames) = tree();
    let root = tree
        .render_component(Label::new("one", CheckStrategy::Default, &count()))
        .unwrap();
    tree.destroy_view(root);
    tree.detach(root);
}

#[test]
#[should_panic(expected = "component views are destroyed with the view that declared them")]
fn declared_component_cannot_be_destroyed_alone() {
    let (mut tree, _frames) = tree();
    let root = tree
        .render_component(Host::new(
            Label::new("one", CheckStrategy::Default, &count()),
            CheckStrategy::Default,
            &count(),
        ))
        .unwrap();
    let label = child(&tree, root, 0);
    tree.destroy_view(label);
}

#[test]
fn destroying_root_frees_its_subtree() {
    let (mut tree, _frames) = tree();
    let root = tree
        .render_component(Host::new(
            Label::new("one", CheckStrategy::Default, &count()),
            CheckStrategy::Default,
            &count(),
        ))
        .unwrap();
    let label = child(&tree, root, 0);
    tree.destroy_view(root);
    assert!(!tree.is_alive(root), "root freed");
    assert!(!tree.is_alive(label), "child freed");

    let next = tree
        .render_component(Label::new("two", CheckStrategy::Default, &count()))
        .unwrap();
    assert_ne!(next, root, "reused slots get a new generation");
    assert_eq!(common::text(&tree, next), "two");
}
