// Copyright 2026 the Vigil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render contract for platform integrations.
//!
//! The view tree never touches a real presentation tree. Check functions
//! declare nodes and bindings through [`CheckContext`](crate::CheckContext),
//! and the tree forwards the resulting creations and committed values to a
//! [`Renderer`]. Every node is addressed by a [`NodeRef`]: the view that
//! declared it plus its declaration slot.
//!
//! Backend crates implement [`Renderer`] over a native tree (for example the
//! DOM). [`MemoryRenderer`] keeps everything in a map and is what tests and
//! headless hosts use.

use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::value::BindingValue;
use crate::view::{Slot, ViewId, ViewTree};

/// Address of a rendered node: the declaring view and its slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeRef {
    /// The view whose check function declared the node.
    pub view: ViewId,
    /// Declaration slot within that view.
    pub slot: u32,
}

/// Applies node creations and committed binding values to a presentation
/// tree.
///
/// Calls arrive in declaration order within a view, and only for bindings
/// whose value actually changed. Verification passes never call the
/// renderer.
pub trait Renderer: core::any::Any {
    /// A view was allocated. `host` is the node it renders into: the host
    /// element of a component view, the anchor of the container holding an
    /// embedded view, or `None` for a root.
    fn create_view(&mut self, view: ViewId, host: Option<NodeRef>) {
        _ = (view, host);
    }

    /// Creates an element node.
    fn create_element(&mut self, node: NodeRef, tag: &str);

    /// Creates an empty text node.
    fn create_text(&mut self, node: NodeRef);

    /// Creates the anchor of a view container.
    fn create_anchor(&mut self, node: NodeRef) {
        _ = node;
    }

    /// Replaces the content of a text node.
    fn set_text(&mut self, node: NodeRef, value: &str);

    /// Sets a property on an element node.
    fn set_property(&mut self, node: NodeRef, name: &str, value: &BindingValue);

    /// Starts forwarding `event` from an element node.
    fn listen(&mut self, node: NodeRef, event: &str);

    /// Releases every node declared by `view`.
    fn destroy_view(&mut self, view: ViewId);
}

/// A node held by [`MemoryRenderer`].
#[derive(Clone, Debug, PartialEq)]
pub enum MemoryNode {
    /// An element with its properties and listened events.
    Element {
        /// Tag name.
        tag: String,
        /// Properties in first-set order.
        properties: Vec<(String, BindingValue)>,
        /// Events with a listener.
        listeners: Vec<String>,
    },
    /// A text node.
    Text(String),
    /// A container anchor.
    Anchor,
}

/// In-memory [`Renderer`] for tests and headless hosts.
#[derive(Debug, Default)]
pub struct MemoryRenderer {
    nodes: HashMap<NodeRef, MemoryNode>,
    views: usize,
    commits: u64,
}

impl MemoryRenderer {
    /// Creates an empty renderer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the node at `node`, if it exists.
    #[must_use]
    pub fn node(&self, node: NodeRef) -> Option<&MemoryNode> {
        self.nodes.get(&node)
    }

    /// Returns the content of a text node.
    #[must_use]
    pub fn text(&self, node: NodeRef) -> Option<&str> {
        match self.nodes.get(&node) {
            Some(MemoryNode::Text(text)) => Some(text),
            _ => None,
        }
    }

    /// Returns a property of an element node.
    #[must_use]
    pub fn property(&self, node: NodeRef, name: &str) -> Option<&BindingValue> {
        match self.nodes.get(&node) {
            Some(MemoryNode::Element { properties, .. }) => properties
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v),
            _ => None,
        }
    }

    /// Number of live nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if no nodes are live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of views created and not yet destroyed.
    #[must_use]
    pub fn live_views(&self) -> usize {
        self.views
    }

    /// Number of text and property writes received so far.
    #[must_use]
    pub fn commits(&self) -> u64 {
        self.commits
    }

    /// Concatenates every text node reachable from `root`, in declaration
    /// order, descending into child components and embedded views.
    #[must_use]
    pub fn rendered_text(&self, tree: &ViewTree, root: ViewId) -> String {
        let mut out = String::new();
        self.collect_text(tree, root, &mut out);
        out
    }

    fn collect_text(&self, tree: &ViewTree, view: ViewId, out: &mut String) {
        for (slot, entry) in tree.slots(view) {
            match entry {
                Slot::Text => {
                    if let Some(text) = self.text(NodeRef { view, slot }) {
                        out.push_str(text);
                    }
                }
                Slot::Element => {}
                Slot::Component(child) => self.collect_text(tree, child, out),
                Slot::Container(container) => {
                    for embedded in tree.embedded_views(container) {
                        self.collect_text(tree, embedded, out);
                    }
                }
            }
        }
    }
}

impl Renderer for MemoryRenderer {
    fn create_view(&mut self, view: ViewId, host: Option<NodeRef>) {
        _ = (view, host);
        self.views += 1;
    }

    fn create_element(&mut self, node: NodeRef, tag: &str) {
        self.nodes.insert(
            node,
            MemoryNode::Element {
                tag: tag.into(),
                properties: Vec::new(),
                listeners: Vec::new(),
            },
        );
    }

    fn create_text(&mut self, node: NodeRef) {
        self.nodes.insert(node, MemoryNode::Text(String::new()));
    }

    fn create_anchor(&mut self, node: NodeRef) {
        self.nodes.insert(node, MemoryNode::Anchor);
    }

    fn set_text(&mut self, node: NodeRef, value: &str) {
        self.commits += 1;
        if let Some(MemoryNode::Text(text)) = self.nodes.get_mut(&node) {
            text.clear();
            text.push_str(value);
        }
    }

    fn set_property(&mut self, node: NodeRef, name: &str, value: &BindingValue) {
        self.commits += 1;
        if let Some(MemoryNode::Element { properties, .. }) = self.nodes.get_mut(&node) {
            match properties.iter_mut().find(|(n, _)| n == name) {
                Some((_, slot)) => *slot = value.clone(),
                None => properties.push((name.into(), value.clone())),
            }
        }
    }

    fn listen(&mut self, node: NodeRef, event: &str) {
        if let Some(MemoryNode::Element { listeners, .. }) = self.nodes.get_mut(&node) {
            listeners.push(event.into());
        }
    }

    fn destroy_view(&mut self, view: ViewId) {
        self.views = self.views.saturating_sub(1);
        self.nodes.retain(|node, _| node.view != view);
    }
}
