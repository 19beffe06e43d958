// Copyright 2026 the Vigil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The component contract.
//!
//! A component is the state behind a component view plus its check
//! function ([`Component::template`]) and lifecycle hooks. Hooks run only
//! when the view is actually refreshed, in this order:
//!
//! ```text
//!   on_init (first check only)
//!   do_check
//!   template
//!   after_content_checked
//!   <children>
//!   after_view_checked
//! ```
//!
//! Verification passes run the template only.

use alloc::boxed::Box;
use core::any::Any;

use crate::context::CheckContext;
use crate::detector::ChangeDetectorRef;
use crate::error::CheckError;
use crate::view::CheckStrategy;

/// State and check function of a component view.
pub trait Component: Any {
    /// Declares nodes (in creation mode) and evaluates bindings.
    ///
    /// Runs once per refresh. On the view's first check
    /// [`CheckContext::creation_mode`] is `true` and the creation-only
    /// primitives are available; afterwards only bindings and container
    /// refreshes are.
    fn template(&mut self, cx: &mut CheckContext<'_>) -> Result<(), CheckError>;

    /// Check strategy of views created for this component.
    fn strategy(&self) -> CheckStrategy {
        CheckStrategy::Default
    }

    /// Tag used for the host element the parent creates for this component.
    fn tag(&self) -> &'static str {
        core::any::type_name::<Self>()
    }

    /// Called before the first refresh.
    fn on_init(&mut self, cd: &mut ChangeDetectorRef<'_>) -> Result<(), CheckError> {
        _ = cd;
        Ok(())
    }

    /// Called before every refresh, after `on_init`.
    fn do_check(&mut self, cd: &mut ChangeDetectorRef<'_>) -> Result<(), CheckError> {
        _ = cd;
        Ok(())
    }

    /// Called after the template ran, before children are checked.
    fn after_content_checked(&mut self) {}

    /// Called after all children were checked.
    fn after_view_checked(&mut self) {}

    /// Called once when the view is destroyed, before its children.
    fn on_destroy(&mut self) {}
}

/// Type-erased embedded-view template. Receives the host component's state.
pub(crate) type EmbeddedTemplate =
    Box<dyn FnMut(&mut dyn Any, &mut CheckContext<'_>) -> Result<(), CheckError>>;

/// Type-erased event handler. Receives the host component's state.
pub(crate) type Handler = Box<dyn FnMut(&mut dyn Any)>;

/// What runs when a view is refreshed.
pub(crate) enum ViewLogic {
    Component(Box<dyn Component>),
    Embedded(EmbeddedTemplate),
}

impl core::fmt::Debug for ViewLogic {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Component(c) => f.debug_tuple("Component").field(&c.tag()).finish(),
            Self::Embedded(_) => f.debug_tuple("Embedded").finish_non_exhaustive(),
        }
    }
}

/// A registered event listener.
pub(crate) struct Listener {
    pub(crate) slot: u32,
    pub(crate) event: alloc::string::String,
    pub(crate) handler: Handler,
}

impl core::fmt::Debug for Listener {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Listener")
            .field("slot", &self.slot)
            .field("event", &self.event)
            .finish_non_exhaustive()
    }
}

/// Wraps a typed embedded template so it can be stored per view.
pub(crate) fn erase_template<T, F>(mut template: F) -> EmbeddedTemplate
where
    T: Component,
    F: FnMut(&mut T, &mut CheckContext<'_>) -> Result<(), CheckError> + 'static,
{
    Box::new(template_signature(move |state, cx| {
        match state.downcast_mut::<T>() {
            Some(state) => template(state, cx),
            None => Err(CheckError::InvalidInvocation {
                view: cx.view(),
                reason: "embedded template host has a different component type",
            }),
        }
    }))
}

/// Wraps a typed event handler so it can be stored per view.
pub(crate) fn erase_handler<T, F>(mut handler: F) -> Handler
where
    T: Component,
    F: FnMut(&mut T) + 'static,
{
    Box::new(move |state: &mut dyn Any| {
        if let Some(state) = state.downcast_mut::<T>() {
            handler(state);
        }
    })
}

/// Pins the higher-ranked signature of an erased template closure.
fn template_signature<F>(f: F) -> F
where
    F: FnMut(&mut dyn Any, &mut CheckContext<'_>) -> Result<(), CheckError>,
{
    f
}
