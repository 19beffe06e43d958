// Copyright 2026 the Vigil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DOM renderer.
//!
//! [`DomRenderer`] gives every view its own wrapper element
//! (`<vigil-view style="display: contents">`) and appends the view's nodes
//! to it in declaration order. A root view's wrapper goes into the mount
//! element, a component view's wrapper into its host element, and an
//! embedded view's wrapper right before the container's anchor comment.
//!
//! Properties are written as attributes. `true` sets an empty attribute,
//! `false` and `Null` remove it.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use hashbrown::HashMap;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Comment, Document, Element, Event, Node};

use vigil_core::BindingValue;
use vigil_core::render::{NodeRef, Renderer};
use vigil_core::view::ViewId;

type ListenerClosure = Closure<dyn FnMut(Event)>;

/// Callback receiving DOM events forwarded from listened elements.
type EventHandler = Rc<dyn Fn(NodeRef, &str)>;

struct Listener {
    target: Element,
    event: String,
    closure: ListenerClosure,
}

/// Renders a view tree into a DOM subtree.
pub struct DomRenderer {
    document: Document,
    mount: Element,
    /// Wrapper element of each live view.
    views: HashMap<ViewId, Element>,
    nodes: HashMap<NodeRef, Node>,
    listeners: HashMap<ViewId, Vec<Listener>>,
    on_event: EventHandler,
}

impl DomRenderer {
    /// Creates a renderer that mounts root views under `mount`.
    ///
    /// `on_event` is called with the listening node and the event name for
    /// every DOM event a check function asked to listen for. It usually
    /// forwards to [`ViewTree::dispatch_event`].
    ///
    /// [`ViewTree::dispatch_event`]: vigil_core::view::ViewTree::dispatch_event
    pub fn new(
        document: Document,
        mount: Element,
        on_event: impl Fn(NodeRef, &str) + 'static,
    ) -> Self {
        Self {
            document,
            mount,
            views: HashMap::new(),
            nodes: HashMap::new(),
            listeners: HashMap::new(),
            on_event: Rc::new(on_event),
        }
    }

    /// Returns the mount element.
    #[must_use]
    pub fn mount(&self) -> &Element {
        &self.mount
    }

    /// Returns the DOM node rendered for `node`, if it exists.
    #[must_use]
    pub fn node(&self, node: NodeRef) -> Option<&Node> {
        self.nodes.get(&node)
    }

    /// Returns the wrapper element of `view`, if it exists.
    #[must_use]
    pub fn view_element(&self, view: ViewId) -> Option<&Element> {
        self.views.get(&view)
    }

    fn append(&mut self, node: NodeRef, dom: Node) {
        let Some(wrapper) = self.views.get(&node.view) else {
            tracing::warn!(view = node.view.index(), slot = node.slot, "node for unknown view");
            return;
        };
        if let Err(err) = wrapper.append_child(&dom) {
            report("append_child", &err);
            return;
        }
        self.nodes.insert(node, dom);
    }

    fn element(&self, node: NodeRef) -> Option<&Element> {
        self.nodes.get(&node).and_then(|n| n.dyn_ref::<Element>())
    }
}

impl Renderer for DomRenderer {
    fn create_view(&mut self, view: ViewId, host: Option<NodeRef>) {
        let wrapper = match self.document.create_element("vigil-view") {
            Ok(el) => el,
            Err(err) => {
                report("create_element", &err);
                return;
            }
        };
        let _ = wrapper.set_attribute("style", "display: contents");

        let placed = match host.and_then(|h| self.nodes.get(&h)) {
            None if host.is_some() => {
                tracing::warn!(view = view.index(), "host node missing; view not placed");
                Ok(())
            }
            None => self.mount.append_child(&wrapper).map(drop),
            Some(anchor) if anchor.dyn_ref::<Comment>().is_some() => match anchor.parent_node() {
                Some(parent) => parent.insert_before(&wrapper, Some(anchor)).map(drop),
                None => Ok(()),
            },
            Some(element) => element.append_child(&wrapper).map(drop),
        };
        if let Err(err) = placed {
            report("place view", &err);
        }
        self.views.insert(view, wrapper);
    }

    fn create_element(&mut self, node: NodeRef, tag: &str) {
        match self.document.create_element(tag) {
            Ok(el) => self.append(node, el.into()),
            Err(err) => report("create_element", &err),
        }
    }

    fn create_text(&mut self, node: NodeRef) {
        let text = self.document.create_text_node("");
        self.append(node, text.into());
    }

    fn create_anchor(&mut self, node: NodeRef) {
        let anchor = self.document.create_comment("vigil-container");
        self.append(node, anchor.into());
    }

    fn set_text(&mut self, node: NodeRef, value: &str) {
        if let Some(dom) = self.nodes.get(&node) {
            dom.set_text_content(Some(value));
        }
    }

    fn set_property(&mut self, node: NodeRef, name: &str, value: &BindingValue) {
        let Some(element) = self.element(node) else {
            return;
        };
        let result = match attribute_value(value) {
            Some(text) => element.set_attribute(name, &text),
            None => element.remove_attribute(name),
        };
        if let Err(err) = result {
            report("set_attribute", &err);
        }
    }

    fn listen(&mut self, node: NodeRef, event: &str) {
        let Some(target) = self.element(node).cloned() else {
            return;
        };
        let handler = Rc::clone(&self.on_event);
        let name = event.to_string();
        let closure = Closure::wrap(Box::new(move |_event: Event| {
            handler(node, &name);
        }) as Box<dyn FnMut(Event)>);
        if let Err(err) =
            target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        {
            report("add_event_listener", &err);
            return;
        }
        self.listeners.entry(node.view).or_default().push(Listener {
            target,
            event: event.to_string(),
            closure,
        });
    }

    fn destroy_view(&mut self, view: ViewId) {
        for listener in self.listeners.remove(&view).unwrap_or_default() {
            let _ = listener.target.remove_event_listener_with_callback(
                &listener.event,
                listener.closure.as_ref().unchecked_ref(),
            );
        }
        self.nodes.retain(|node, _| node.view != view);
        if let Some(wrapper) = self.views.remove(&view) {
            wrapper.remove();
        }
    }
}

impl core::fmt::Debug for DomRenderer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DomRenderer")
            .field("views", &self.views.len())
            .field("nodes", &self.nodes.len())
            .field("listeners", &self.listeners.values().map(Vec::len).sum::<usize>())
            .finish_non_exhaustive()
    }
}

/// Attribute text for a property value, or `None` to remove the attribute.
fn attribute_value(value: &BindingValue) -> Option<String> {
    match value {
        BindingValue::Null | BindingValue::Bool(false) => None,
        BindingValue::Bool(true) => Some(String::new()),
        other => Some(other.to_string()),
    }
}

fn report(op: &'static str, err: &JsValue) {
    tracing::warn!(op, error = ?err, "DOM operation failed");
}
