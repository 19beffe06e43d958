// Copyright 2026 the Vigil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The primitives a check function uses to declare and bind.
//!
//! A [`CheckContext`] is handed to [`Component::template`] and to embedded
//! templates for the duration of one run. In creation mode the template
//! declares its nodes at numbered slots; in every mode it evaluates its
//! bindings in a fixed order. A binding only reaches the renderer when its
//! value differs from the one committed last time.
//!
//! ```rust,ignore
//! fn template(&mut self, cx: &mut CheckContext<'_>) -> Result<(), CheckError> {
//!     if cx.creation_mode() {
//!         cx.text(0)?;
//!         cx.component(1, Child::default())?;
//!     }
//!     cx.text_binding(0, self.count)?;
//!     cx.input(1, self.name.clone(), |child: &mut Child, name| child.name = name)
//! }
//! ```
//!
//! Dynamic content goes through a view container. Between
//! [`container_refresh_start`](CheckContext::container_refresh_start) and
//! [`container_refresh_end`](CheckContext::container_refresh_end), each
//! [`embedded_view`](CheckContext::embedded_view) call claims the next
//! position. A view already there with the same block id is kept; anything
//! else is replaced, and views past the last claimed position are destroyed.
//! Because matching is positional, an embedded template may capture its
//! position (for example a list index) by value.

use alloc::boxed::Box;
use alloc::string::ToString;

use crate::component::{Component, Listener, erase_handler, erase_template};
use crate::error::{BindingLocation, CheckError};
use crate::render::NodeRef;
use crate::value::BindingValue;
use crate::view::{
    CheckStrategy, ContainerId, INVALID, NodeKind, Slot, ViewFlags, ViewId, ViewTree,
};

#[derive(Clone, Copy, Debug)]
struct OpenContainer {
    idx: u32,
    cursor: usize,
}

/// Declaration and binding primitives for one run of a check function.
pub struct CheckContext<'a> {
    tree: &'a mut ViewTree,
    view: u32,
    verify: bool,
    creation: bool,
    binding_index: u32,
    open: Option<OpenContainer>,
    commits: u32,
    #[cfg_attr(
        not(feature = "trace-rich"),
        expect(dead_code, reason = "only read by binding commit events")
    )]
    pass_index: u64,
}

impl core::fmt::Debug for CheckContext<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CheckContext")
            .field("view", &self.view)
            .field("verify", &self.verify)
            .field("creation", &self.creation)
            .field("binding_index", &self.binding_index)
            .field("open", &self.open)
            .finish_non_exhaustive()
    }
}

impl<'a> CheckContext<'a> {
    pub(crate) fn new(
        tree: &'a mut ViewTree,
        view: u32,
        verify: bool,
        creation: bool,
        pass_index: u64,
    ) -> Self {
        Self {
            tree,
            view,
            verify,
            creation,
            binding_index: 0,
            open: None,
            commits: 0,
            pass_index,
        }
    }

    /// The view being checked.
    #[must_use]
    pub fn view(&self) -> ViewId {
        self.tree.id_at(self.view)
    }

    /// The component view whose state this template reads.
    #[must_use]
    pub fn host(&self) -> ViewId {
        self.tree.id_at(self.tree.host[self.view as usize])
    }

    /// `true` on the view's first check, when nodes must be declared.
    #[must_use]
    pub fn creation_mode(&self) -> bool {
        self.creation
    }

    /// `true` while a verification pass runs the template.
    #[must_use]
    pub fn is_verifying(&self) -> bool {
        self.verify
    }

    /// Bindings committed so far by this run.
    pub(crate) fn commits(&self) -> u32 {
        self.commits
    }

    /// Fails if a container refresh was left open.
    pub(crate) fn finish(&mut self) -> Result<(), CheckError> {
        if self.open.take().is_some() {
            return Err(self.invalid("container refresh was not closed"));
        }
        Ok(())
    }

    // -- Creation-only primitives --

    /// Declares an element at `slot`.
    pub fn element(&mut self, slot: u32, tag: &str) -> Result<(), CheckError> {
        self.require_creation(slot, "element")?;
        self.tree.declare_slot(self.view, slot, Slot::Element)?;
        let node = self.node(slot);
        self.tree.renderer.create_element(node, tag);
        Ok(())
    }

    /// Declares a text node at `slot`.
    pub fn text(&mut self, slot: u32) -> Result<(), CheckError> {
        self.require_creation(slot, "text")?;
        self.tree.declare_slot(self.view, slot, Slot::Text)?;
        let node = self.node(slot);
        self.tree.renderer.create_text(node);
        Ok(())
    }

    /// Registers an event handler on the element at `slot`.
    ///
    /// The handler receives the host component's state. After it runs the
    /// view is marked dirty and its root scheduled.
    pub fn listener<T, F>(&mut self, slot: u32, event: &str, handler: F) -> Result<(), CheckError>
    where
        T: Component,
        F: FnMut(&mut T) + 'static,
    {
        self.require_creation(slot, "listener")?;
        match self.tree.slot_entry(self.view, slot) {
            Some(entry) if entry.is_element() => {}
            _ => return Err(self.unknown(slot, "an element")),
        }
        self.tree.listeners[self.view as usize].push(Listener {
            slot,
            event: event.into(),
            handler: erase_handler(handler),
        });
        let node = self.node(slot);
        self.tree.renderer.listen(node, event);
        Ok(())
    }

    /// Declares a child component at `slot` and returns its view.
    ///
    /// The child is checked after this template finishes, in declaration
    /// order with the view's other children.
    pub fn component<C: Component>(&mut self, slot: u32, state: C) -> Result<ViewId, CheckError> {
        self.require_creation(slot, "component")?;
        self.require_free(slot)?;
        let node = self.node(slot);
        self.tree.renderer.create_element(node, state.tag());
        let child = self
            .tree
            .create_component_view(self.view, Some(node), slot, Box::new(state));
        let id = self.tree.id_at(child);
        self.tree.declare_slot(self.view, slot, Slot::Component(id))?;
        Ok(id)
    }

    /// Declares a view container at `slot`.
    pub fn container(&mut self, slot: u32) -> Result<ContainerId, CheckError> {
        self.require_creation(slot, "container")?;
        self.require_free(slot)?;
        let host = self.tree.host[self.view as usize];
        let idx = self.tree.alloc_node(
            NodeKind::Container,
            CheckStrategy::Default,
            slot,
            host,
            None,
        );
        self.tree.link_child(self.view, idx, INVALID);
        let id = self.tree.container_at(idx);
        self.tree.declare_slot(self.view, slot, Slot::Container(id))?;
        let node = self.node(slot);
        self.tree.renderer.create_anchor(node);
        Ok(id)
    }

    // -- Bindings --

    /// Binds the content of the text node at `slot`.
    pub fn text_binding(
        &mut self,
        slot: u32,
        value: impl Into<BindingValue>,
    ) -> Result<(), CheckError> {
        if self.tree.slot_entry(self.view, slot) != Some(Slot::Text) {
            return Err(self.unknown(slot, "a text node"));
        }
        if let Some(value) = self.bind(slot, value.into())? {
            let node = self.node(slot);
            let text = value.to_string();
            self.tree.renderer.set_text(node, &text);
        }
        Ok(())
    }

    /// Binds a property of the element at `slot`.
    pub fn property(
        &mut self,
        slot: u32,
        name: &str,
        value: impl Into<BindingValue>,
    ) -> Result<(), CheckError> {
        match self.tree.slot_entry(self.view, slot) {
            Some(entry) if entry.is_element() => {}
            _ => return Err(self.unknown(slot, "an element")),
        }
        if let Some(value) = self.bind(slot, value.into())? {
            let node = self.node(slot);
            self.tree.renderer.set_property(node, name, &value);
        }
        Ok(())
    }

    /// Binds an input of the child component at `slot`.
    ///
    /// When the value changed, `apply` writes it into the child's state and
    /// the child is marked as needing a check, so an `OnPush` child is
    /// refreshed when the traversal reaches it.
    pub fn input<C, V>(
        &mut self,
        slot: u32,
        value: V,
        apply: impl FnOnce(&mut C, V),
    ) -> Result<(), CheckError>
    where
        C: Component,
        V: Into<BindingValue> + Clone,
    {
        let Some(Slot::Component(child)) = self.tree.slot_entry(self.view, slot) else {
            return Err(self.unknown(slot, "a component"));
        };
        if !self.verify && self.tree.component::<C>(child).is_none() {
            return Err(self.invalid("input target is not the expected component"));
        }
        if self.bind(slot, value.clone().into())?.is_none() {
            return Ok(());
        }
        if let Some(state) = self.tree.component_mut::<C>(child) {
            apply(state, value);
        }
        self.tree.flags[child.idx as usize] |= ViewFlags::NEEDS_CHECK;
        Ok(())
    }

    // -- Containers --

    /// Opens a refresh of the container at `slot`.
    pub fn container_refresh_start(&mut self, slot: u32) -> Result<(), CheckError> {
        if self.open.is_some() {
            return Err(self.invalid("a container refresh is already open"));
        }
        let Some(Slot::Container(container)) = self.tree.slot_entry(self.view, slot) else {
            return Err(self.unknown(slot, "a container"));
        };
        self.open = Some(OpenContainer {
            idx: container.idx,
            cursor: 0,
        });
        Ok(())
    }

    /// Claims the next position of the open container for an embedded view
    /// with `block_id`, creating it if needed.
    ///
    /// `template` is only stored when a view is created; a kept view goes on
    /// running the template it was created with.
    pub fn embedded_view<T, F>(&mut self, block_id: u32, template: F) -> Result<ViewId, CheckError>
    where
        T: Component,
        F: FnMut(&mut T, &mut CheckContext<'_>) -> Result<(), CheckError> + 'static,
    {
        let Some(open) = self.open else {
            return Err(self.invalid("embedded_view called outside a container refresh"));
        };
        let container = self.tree.container_at(open.idx);
        let before = match self.tree.child_at(open.idx, open.cursor) {
            Some(existing) if self.tree.key[existing as usize] == block_id => {
                self.advance();
                return Ok(self.tree.id_at(existing));
            }
            Some(existing) => {
                if self.verify {
                    return Err(CheckError::StructureChanged { container });
                }
                self.tree.unlink_from_parent(existing);
                self.tree.destroy_subtree(existing);
                self.tree
                    .child_at(open.idx, open.cursor)
                    .unwrap_or(INVALID)
            }
            None => {
                if self.verify {
                    return Err(CheckError::StructureChanged { container });
                }
                INVALID
            }
        };
        let idx = self
            .tree
            .create_embedded(open.idx, before, block_id, erase_template(template));
        self.advance();
        tracing::trace!(view = idx, container = open.idx, block_id, "created embedded view");
        Ok(self.tree.id_at(idx))
    }

    /// Closes the open container refresh, destroying views that were not
    /// claimed.
    pub fn container_refresh_end(&mut self) -> Result<(), CheckError> {
        let Some(open) = self.open.take() else {
            return Err(self.invalid("container_refresh_end without a matching start"));
        };
        while let Some(stale) = self.tree.child_at(open.idx, open.cursor) {
            if self.verify {
                return Err(CheckError::StructureChanged {
                    container: self.tree.container_at(open.idx),
                });
            }
            self.tree.unlink_from_parent(stale);
            self.tree.destroy_subtree(stale);
        }
        Ok(())
    }

    // -- Internals --

    /// Records a binding value. Returns the value when it must be committed
    /// to the renderer.
    fn bind(&mut self, slot: u32, value: BindingValue) -> Result<Option<BindingValue>, CheckError> {
        let index = self.binding_index;
        self.binding_index += 1;
        let location = BindingLocation {
            view: self.view(),
            binding_index: index,
            slot,
        };
        let bindings = &mut self.tree.bindings[self.view as usize];
        let i = index as usize;
        if self.verify {
            return match bindings.get(i) {
                Some(previous) if *previous == value => Ok(None),
                previous => Err(CheckError::ExpressionChanged {
                    location,
                    previous: previous.cloned().unwrap_or_default(),
                    current: value,
                }),
            };
        }
        match bindings.get_mut(i) {
            Some(previous) if *previous == value => return Ok(None),
            Some(previous) => *previous = value.clone(),
            None => bindings.push(value.clone()),
        }
        self.commits += 1;
        tracing::trace!(view = self.view, binding = index, slot, "binding committed");
        #[cfg(feature = "trace-rich")]
        {
            let pass_index = self.pass_index;
            let commit = crate::trace::BindingCommit {
                view: self.view,
                binding_index: index,
                slot,
            };
            self.tree.tracer().binding_commit(pass_index, &commit);
        }
        Ok(Some(value))
    }

    fn advance(&mut self) {
        if let Some(open) = &mut self.open {
            open.cursor += 1;
        }
    }

    fn node(&self, slot: u32) -> NodeRef {
        NodeRef {
            view: self.view(),
            slot,
        }
    }

    fn require_creation(&self, slot: u32, primitive: &'static str) -> Result<(), CheckError> {
        if self.creation {
            Ok(())
        } else {
            Err(CheckError::CreationOnly {
                view: self.view(),
                slot,
                primitive,
            })
        }
    }

    fn require_free(&self, slot: u32) -> Result<(), CheckError> {
        if self.tree.slot_entry(self.view, slot).is_some() {
            return Err(self.invalid("slot declared twice"));
        }
        Ok(())
    }

    fn unknown(&self, slot: u32, expected: &'static str) -> CheckError {
        CheckError::UnknownSlot {
            view: self.view(),
            slot,
            expected,
        }
    }

    fn invalid(&self, reason: &'static str) -> CheckError {
        CheckError::InvalidInvocation {
            view: self.view(),
            reason,
        }
    }
}
