// Copyright 2026 the Vigil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays view storage with allocation, topology, and state queries.

use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;
use core::any::Any;

use crate::component::{Component, Listener, ViewLogic};
use crate::config::TreeConfig;
use crate::error::CheckError;
use crate::render::{NodeRef, Renderer};
use crate::scheduler::{FramePort, Scheduler};
use crate::trace::{TraceSink, Tracer};
use crate::value::BindingValue;

use super::flags::{CheckStrategy, NodeKind, ViewFlags};
use super::id::{ContainerId, INVALID, ViewId};
use super::slot::Slot;
use super::traverse::{Children, EmbeddedViews};

/// Struct-of-arrays storage for every view and container of an application.
///
/// Nodes are addressed by [`ViewId`] and [`ContainerId`] handles. Internally
/// each node occupies a slot in parallel arrays. Destroyed nodes are recycled
/// via a free list, and generation counters prevent stale handle access.
///
/// A component view's children are the component views and containers its
/// template declared; a container's children are its embedded views. Both
/// lists are kept in declaration (or insertion) order, which is the order
/// traversal visits them.
pub struct ViewTree {
    // -- Topology --
    pub(crate) parent: Vec<u32>,
    pub(crate) first_child: Vec<u32>,
    pub(crate) next_sibling: Vec<u32>,
    pub(crate) prev_sibling: Vec<u32>,

    // -- Per-node state --
    pub(crate) kind: Vec<NodeKind>,
    pub(crate) flags: Vec<ViewFlags>,
    pub(crate) strategy: Vec<CheckStrategy>,
    /// Declaring slot for component views and containers, block id for
    /// embedded views.
    pub(crate) key: Vec<u32>,
    /// Component view whose state templates and listeners of this node see.
    pub(crate) host: Vec<u32>,
    pub(crate) logic: Vec<Option<ViewLogic>>,
    pub(crate) bindings: Vec<Vec<BindingValue>>,
    pub(crate) slots: Vec<Vec<Option<Slot>>>,
    pub(crate) listeners: Vec<Vec<Listener>>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,

    // -- Collaborators --
    pub(crate) renderer: Box<dyn Renderer>,
    pub(crate) scheduler: Scheduler,
    pub(crate) sink: Option<Box<dyn TraceSink>>,
    pub(crate) config: TreeConfig,

    // -- Pass bookkeeping --
    pub(crate) pass_counter: u64,
    pub(crate) frame_counter: u64,
    pub(crate) depth: u32,
}

impl core::fmt::Debug for ViewTree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ViewTree")
            .field("len", &self.len)
            .field("free", &self.free_list.len())
            .field("scheduler", &self.scheduler)
            .field("config", &self.config)
            .field("depth", &self.depth)
            .finish_non_exhaustive()
    }
}

impl ViewTree {
    /// Creates an empty tree with the default (development) configuration.
    #[must_use]
    pub fn new(renderer: impl Renderer, port: impl FramePort + 'static) -> Self {
        Self::with_config(TreeConfig::default(), renderer, port)
    }

    /// Creates an empty tree with the given configuration.
    #[must_use]
    pub fn with_config(
        config: TreeConfig,
        renderer: impl Renderer,
        port: impl FramePort + 'static,
    ) -> Self {
        Self {
            parent: Vec::new(),
            first_child: Vec::new(),
            next_sibling: Vec::new(),
            prev_sibling: Vec::new(),
            kind: Vec::new(),
            flags: Vec::new(),
            strategy: Vec::new(),
            key: Vec::new(),
            host: Vec::new(),
            logic: Vec::new(),
            bindings: Vec::new(),
            slots: Vec::new(),
            listeners: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            renderer: Box::new(renderer),
            scheduler: Scheduler::new(port),
            sink: None,
            config,
            pass_counter: 0,
            frame_counter: 0,
            depth: 0,
        }
    }

    /// Returns the tree's configuration.
    #[must_use]
    pub fn config(&self) -> TreeConfig {
        self.config
    }

    // -- Allocation API --

    /// Creates a root component view and returns its handle.
    ///
    /// The view starts attached and in creation mode; nothing is rendered
    /// until it is first checked.
    pub fn create_root<C: Component>(&mut self, component: C) -> ViewId {
        let idx = self.create_component_view(INVALID, None, INVALID, Box::new(component));
        tracing::debug!(view = idx, "created root view");
        self.id_at(idx)
    }

    /// Creates a root component view and runs its first check.
    pub fn render_component<C: Component>(&mut self, component: C) -> Result<ViewId, CheckError> {
        let root = self.create_root(component);
        self.tick(root)?;
        Ok(root)
    }

    /// Destroys a view and everything under it.
    ///
    /// Each destroyed component's [`Component::on_destroy`] runs before its
    /// children are destroyed, and the renderer is told to release every
    /// destroyed view's nodes.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale, if the view is a component view
    /// declared by another view (those live and die with their declaring
    /// view), or if any view in the subtree is being checked.
    pub fn destroy_view(&mut self, view: ViewId) {
        self.validate(view);
        let idx = view.idx;
        let p = self.parent[idx as usize];
        assert!(
            p == INVALID || self.kind[p as usize] == NodeKind::Container,
            "component views are destroyed with the view that declared them"
        );
        if p != INVALID {
            self.unlink_from_parent(idx);
        }
        self.destroy_subtree(idx);
    }

    /// Returns whether the given handle refers to a live view.
    #[must_use]
    pub fn is_alive(&self, view: ViewId) -> bool {
        self.is_live(view.idx, view.generation) && self.kind[view.idx as usize].is_view()
    }

    /// Returns whether the given handle refers to a live container.
    #[must_use]
    pub fn is_container_alive(&self, container: ContainerId) -> bool {
        self.is_live(container.idx, container.generation)
            && self.kind[container.idx as usize] == NodeKind::Container
    }

    // -- Topology queries --

    /// Returns the nearest ancestor view, skipping the container an embedded
    /// view sits in.
    #[must_use]
    pub fn parent(&self, view: ViewId) -> Option<ViewId> {
        self.validate(view);
        let mut p = self.parent[view.idx as usize];
        while p != INVALID && !self.kind[p as usize].is_view() {
            p = self.parent[p as usize];
        }
        (p != INVALID).then(|| self.id_at(p))
    }

    /// Returns the container an embedded view currently sits in.
    #[must_use]
    pub fn container_of(&self, view: ViewId) -> Option<ContainerId> {
        self.validate(view);
        let p = self.parent[view.idx as usize];
        (p != INVALID && self.kind[p as usize] == NodeKind::Container)
            .then(|| self.container_at(p))
    }

    /// Returns the component view whose state `view`'s template reads: the
    /// view itself for component views, the declaring component for
    /// embedded views.
    #[must_use]
    pub fn host_component(&self, view: ViewId) -> ViewId {
        self.validate(view);
        self.id_at(self.host[view.idx as usize])
    }

    /// Returns an iterator over the direct children of a view.
    #[must_use]
    pub fn children(&self, view: ViewId) -> Children<'_> {
        self.validate(view);
        Children::new(self, self.first_child[view.idx as usize])
    }

    /// Returns an iterator over the embedded views of a container.
    #[must_use]
    pub fn embedded_views(&self, container: ContainerId) -> EmbeddedViews<'_> {
        self.validate_container(container);
        EmbeddedViews::new(self, self.first_child[container.idx as usize])
    }

    /// Number of embedded views in a container.
    #[must_use]
    pub fn container_len(&self, container: ContainerId) -> usize {
        self.validate_container(container);
        self.child_count(container.idx)
    }

    /// Returns the root component views (those with no parent).
    #[must_use]
    pub fn roots(&self) -> Vec<ViewId> {
        (0..self.len)
            .filter(|&idx| {
                self.parent[idx as usize] == INVALID
                    && self.kind[idx as usize] == NodeKind::Component
            })
            .map(|idx| self.id_at(idx))
            .collect()
    }

    /// Returns the root component view above `view`.
    #[must_use]
    pub fn root_of(&self, view: ViewId) -> ViewId {
        self.validate(view);
        self.id_at(self.root_idx(view.idx))
    }

    // -- State queries --

    /// Returns the change-detection flags of a view.
    #[must_use]
    pub fn flags(&self, view: ViewId) -> ViewFlags {
        self.validate(view);
        self.flags[view.idx as usize]
    }

    /// Returns the check strategy of a view.
    #[must_use]
    pub fn strategy(&self, view: ViewId) -> CheckStrategy {
        self.validate(view);
        self.strategy[view.idx as usize]
    }

    /// Returns whether ancestor-driven traversals may visit the view.
    #[must_use]
    pub fn is_attached(&self, view: ViewId) -> bool {
        self.flags(view).contains(ViewFlags::ATTACHED)
    }

    /// Returns the declared slots of a view in slot order.
    pub fn slots(&self, view: ViewId) -> impl Iterator<Item = (u32, Slot)> + '_ {
        self.validate(view);
        self.slots[view.idx as usize]
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.map(|s| (slot_index(i), s)))
    }

    /// Returns what a view declared at `slot`.
    #[must_use]
    pub fn slot(&self, view: ViewId, slot: u32) -> Option<Slot> {
        self.validate(view);
        self.slot_entry(view.idx, slot)
    }

    /// Returns the last committed values of a view's bindings, in
    /// evaluation order.
    #[must_use]
    pub fn bindings(&self, view: ViewId) -> &[BindingValue] {
        self.validate(view);
        &self.bindings[view.idx as usize]
    }

    // -- Component access --

    /// Returns the state of a component view.
    ///
    /// Returns `None` if the view is embedded, holds a different component
    /// type, or is currently running its own hooks or template.
    #[must_use]
    pub fn component<T: Component>(&self, view: ViewId) -> Option<&T> {
        self.validate(view);
        match &self.logic[view.idx as usize] {
            Some(ViewLogic::Component(c)) => {
                let any: &dyn Any = &**c;
                any.downcast_ref()
            }
            _ => None,
        }
    }

    /// Returns the state of a component view mutably.
    ///
    /// Mutating state does not mark anything; call
    /// [`mark_dirty`](Self::mark_dirty) if the view should be refreshed.
    #[must_use]
    pub fn component_mut<T: Component>(&mut self, view: ViewId) -> Option<&mut T> {
        self.validate(view);
        match &mut self.logic[view.idx as usize] {
            Some(ViewLogic::Component(c)) => {
                let any: &mut dyn Any = &mut **c;
                any.downcast_mut()
            }
            _ => None,
        }
    }

    /// Finds the first component view of type `T` at or under `under`, in
    /// pre-order.
    #[must_use]
    pub fn find_component<T: Component>(&self, under: ViewId) -> Option<ViewId> {
        self.validate(under);
        let mut stack = vec![under.idx];
        let mut children = Vec::new();
        while let Some(idx) = stack.pop() {
            if let Some(ViewLogic::Component(c)) = &self.logic[idx as usize] {
                let any: &dyn Any = &**c;
                if any.is::<T>() {
                    return Some(self.id_at(idx));
                }
            }
            children.clear();
            let mut child = self.first_child[idx as usize];
            while child != INVALID {
                children.push(child);
                child = self.next_sibling[child as usize];
            }
            stack.extend(children.iter().rev());
        }
        None
    }

    // -- Collaborators --

    /// Returns the renderer if it is an `R`.
    #[must_use]
    pub fn renderer<R: Renderer>(&self) -> Option<&R> {
        let any: &dyn Any = &*self.renderer;
        any.downcast_ref()
    }

    /// Returns the renderer mutably if it is an `R`.
    #[must_use]
    pub fn renderer_mut<R: Renderer>(&mut self) -> Option<&mut R> {
        let any: &mut dyn Any = &mut *self.renderer;
        any.downcast_mut()
    }

    /// Returns the frame scheduler.
    #[must_use]
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Returns the frame scheduler mutably.
    pub fn scheduler_mut(&mut self) -> &mut Scheduler {
        &mut self.scheduler
    }

    /// Installs a trace sink, replacing any previous one.
    pub fn set_trace_sink(&mut self, sink: impl TraceSink) {
        self.sink = Some(Box::new(sink));
    }

    /// Removes and returns the installed trace sink.
    pub fn take_trace_sink(&mut self) -> Option<Box<dyn TraceSink>> {
        self.sink.take()
    }

    /// Returns the installed trace sink if it is an `S`.
    #[must_use]
    pub fn trace_sink<S: TraceSink>(&self) -> Option<&S> {
        let any: &dyn Any = self.sink.as_deref()?;
        any.downcast_ref()
    }

    // -- Internal: allocation --

    pub(crate) fn tracer(&mut self) -> Tracer<'_> {
        match self.sink.as_deref_mut() {
            Some(sink) => Tracer::new(sink),
            None => Tracer::none(),
        }
    }

    pub(crate) fn alloc_node(
        &mut self,
        kind: NodeKind,
        strategy: CheckStrategy,
        key: u32,
        host: u32,
        logic: Option<ViewLogic>,
    ) -> u32 {
        let flags = if kind.is_view() {
            ViewFlags::CREATION | ViewFlags::ATTACHED
        } else {
            ViewFlags::empty()
        };
        let idx = if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot. The generation was bumped when it was freed.
            let i = idx as usize;
            self.parent[i] = INVALID;
            self.first_child[i] = INVALID;
            self.next_sibling[i] = INVALID;
            self.prev_sibling[i] = INVALID;
            self.kind[i] = kind;
            self.flags[i] = flags;
            self.strategy[i] = strategy;
            self.key[i] = key;
            self.host[i] = host;
            self.logic[i] = logic;
            idx
        } else {
            let idx = self.len;
            self.len += 1;
            self.parent.push(INVALID);
            self.first_child.push(INVALID);
            self.next_sibling.push(INVALID);
            self.prev_sibling.push(INVALID);
            self.kind.push(kind);
            self.flags.push(flags);
            self.strategy.push(strategy);
            self.key.push(key);
            self.host.push(host);
            self.logic.push(logic);
            self.bindings.push(Vec::new());
            self.slots.push(Vec::new());
            self.listeners.push(Vec::new());
            self.generation.push(0);
            idx
        };
        // Component views host themselves.
        if kind == NodeKind::Component {
            self.host[idx as usize] = idx;
        }
        idx
    }

    /// Allocates a component view, links it under `parent` (if any), and
    /// announces it to the renderer.
    pub(crate) fn create_component_view(
        &mut self,
        parent: u32,
        host_node: Option<NodeRef>,
        key: u32,
        component: Box<dyn Component>,
    ) -> u32 {
        let strategy = component.strategy();
        let idx = self.alloc_node(
            NodeKind::Component,
            strategy,
            key,
            INVALID,
            Some(ViewLogic::Component(component)),
        );
        if parent != INVALID {
            self.link_child(parent, idx, INVALID);
        }
        let id = self.id_at(idx);
        self.renderer.create_view(id, host_node);
        idx
    }

    pub(crate) fn destroy_subtree(&mut self, idx: u32) {
        let i = idx as usize;
        assert!(
            !self.flags[i].contains(ViewFlags::CHECKING),
            "cannot destroy a view while it is being checked"
        );
        if let Some(ViewLogic::Component(c)) = self.logic[i].as_mut() {
            c.on_destroy();
        }
        let mut child = self.first_child[i];
        while child != INVALID {
            let next = self.next_sibling[child as usize];
            self.destroy_subtree(child);
            child = next;
        }
        if self.kind[i].is_view() {
            let id = self.id_at(idx);
            self.renderer.destroy_view(id);
            tracing::trace!(view = idx, "destroyed view");
        }
        self.free_node(idx);
    }

    fn free_node(&mut self, idx: u32) {
        let i = idx as usize;
        self.parent[i] = INVALID;
        self.first_child[i] = INVALID;
        self.next_sibling[i] = INVALID;
        self.prev_sibling[i] = INVALID;
        self.kind[i] = NodeKind::Free;
        self.flags[i] = ViewFlags::empty();
        self.key[i] = INVALID;
        self.host[i] = INVALID;
        self.logic[i] = None;
        self.bindings[i] = Vec::new();
        self.slots[i] = Vec::new();
        self.listeners[i] = Vec::new();
        // Bump generation so old handles immediately fail validation.
        self.generation[i] += 1;
        self.free_list.push(idx);
    }

    // -- Internal: topology --

    /// Links `child` under `parent` before `before`, or last if `before` is
    /// [`INVALID`].
    pub(crate) fn link_child(&mut self, parent: u32, child: u32, before: u32) {
        let (p, c) = (parent as usize, child as usize);
        debug_assert!(self.parent[c] == INVALID, "child already has a parent");
        self.parent[c] = parent;
        if before == INVALID {
            self.next_sibling[c] = INVALID;
            if self.first_child[p] == INVALID {
                self.prev_sibling[c] = INVALID;
                self.first_child[p] = child;
            } else {
                let mut last = self.first_child[p];
                while self.next_sibling[last as usize] != INVALID {
                    last = self.next_sibling[last as usize];
                }
                self.next_sibling[last as usize] = child;
                self.prev_sibling[c] = last;
            }
        } else {
            let s = before as usize;
            self.next_sibling[c] = before;
            self.prev_sibling[c] = self.prev_sibling[s];
            if self.prev_sibling[s] != INVALID {
                self.next_sibling[self.prev_sibling[s] as usize] = child;
            } else {
                // `before` was the first child.
                self.first_child[p] = child;
            }
            self.prev_sibling[s] = child;
        }
    }

    /// Removes a node from its parent's sibling list.
    pub(crate) fn unlink_from_parent(&mut self, idx: u32) {
        let i = idx as usize;
        let p = self.parent[i] as usize;
        let prev = self.prev_sibling[i];
        let next = self.next_sibling[i];

        if prev != INVALID {
            self.next_sibling[prev as usize] = next;
        } else {
            self.first_child[p] = next;
        }
        if next != INVALID {
            self.prev_sibling[next as usize] = prev;
        }

        self.parent[i] = INVALID;
        self.prev_sibling[i] = INVALID;
        self.next_sibling[i] = INVALID;
    }

    /// Returns the `index`-th child of `parent`.
    pub(crate) fn child_at(&self, parent: u32, index: usize) -> Option<u32> {
        let mut child = self.first_child[parent as usize];
        for _ in 0..index {
            if child == INVALID {
                return None;
            }
            child = self.next_sibling[child as usize];
        }
        (child != INVALID).then_some(child)
    }

    pub(crate) fn child_count(&self, parent: u32) -> usize {
        let mut count = 0;
        let mut child = self.first_child[parent as usize];
        while child != INVALID {
            count += 1;
            child = self.next_sibling[child as usize];
        }
        count
    }

    /// Children of `parent` with their generations, so that a walk can
    /// skip nodes destroyed while it ran.
    pub(crate) fn child_snapshot(&self, parent: u32) -> Vec<(u32, u32)> {
        let mut out = Vec::new();
        let mut child = self.first_child[parent as usize];
        while child != INVALID {
            out.push((child, self.generation[child as usize]));
            child = self.next_sibling[child as usize];
        }
        out
    }

    pub(crate) fn root_idx(&self, mut idx: u32) -> u32 {
        while self.parent[idx as usize] != INVALID {
            idx = self.parent[idx as usize];
        }
        idx
    }

    // -- Internal: slots --

    pub(crate) fn slot_entry(&self, idx: u32, slot: u32) -> Option<Slot> {
        self.slots[idx as usize]
            .get(slot as usize)
            .copied()
            .flatten()
    }

    pub(crate) fn declare_slot(&mut self, idx: u32, slot: u32, entry: Slot) -> Result<(), CheckError> {
        let view = self.id_at(idx);
        let table = &mut self.slots[idx as usize];
        let s = slot as usize;
        if table.len() <= s {
            table.resize(s + 1, None);
        }
        if table[s].is_some() {
            return Err(CheckError::InvalidInvocation {
                view,
                reason: "slot declared twice",
            });
        }
        table[s] = Some(entry);
        Ok(())
    }

    // -- Internal: handles --

    #[inline]
    pub(crate) fn is_live(&self, idx: u32, generation: u32) -> bool {
        idx < self.len
            && self.generation[idx as usize] == generation
            && self.kind[idx as usize] != NodeKind::Free
    }

    #[inline]
    pub(crate) fn id_at(&self, idx: u32) -> ViewId {
        ViewId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    #[inline]
    pub(crate) fn container_at(&self, idx: u32) -> ContainerId {
        ContainerId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Panics if the handle does not refer to a live view.
    pub(crate) fn validate(&self, view: ViewId) {
        assert!(self.is_alive(view), "stale ViewId: {view:?}");
    }

    /// Panics if the handle does not refer to a live container.
    pub(crate) fn validate_container(&self, container: ContainerId) {
        assert!(
            self.is_container_alive(container),
            "stale ContainerId: {container:?}"
        );
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "slot tables are only ever grown to a u32 slot index"
)]
fn slot_index(i: usize) -> u32 {
    i as u32
}
