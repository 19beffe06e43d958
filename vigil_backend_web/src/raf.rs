// Copyright 2026 the Vigil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `requestAnimationFrame` frame port.
//!
//! [`RafPort`] is the [`FramePort`] a browser host hands to its view tree.
//! Unlike a free-running animation loop it registers a callback only when
//! asked, and at most one request is ever outstanding.

use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use core::cell::{Cell, RefCell};

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

use vigil_core::scheduler::FramePort;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = "requestAnimationFrame")]
    fn request_animation_frame(callback: &JsValue) -> i32;

    #[wasm_bindgen(js_name = "cancelAnimationFrame")]
    fn cancel_animation_frame(id: i32);
}

type RafClosure = Closure<dyn FnMut(f64)>;

/// A [`FramePort`] backed by `requestAnimationFrame`.
///
/// The callback passed to [`RafPort::new`] runs once per granted frame and
/// is expected to call [`ViewTree::run_frame`]. Clones share the same
/// outstanding request, so a clone kept by the host can
/// [`cancel`](Self::cancel) what the tree's copy requested.
///
/// [`ViewTree::run_frame`]: vigil_core::view::ViewTree::run_frame
#[derive(Clone)]
pub struct RafPort {
    inner: Rc<RafInner>,
}

struct RafInner {
    /// The JS closure registered with `requestAnimationFrame`.
    ///
    /// Holds only a weak reference back to this struct, so dropping the last
    /// `RafPort` frees both.
    closure: RefCell<Option<RafClosure>>,

    /// Runs the frame.
    callback: RefCell<Box<dyn FnMut()>>,

    /// Whether a request is outstanding.
    pending: Cell<bool>,

    /// Number of frames that actually ran.
    frames: Cell<u64>,

    /// ID of the outstanding request, for [`cancel_animation_frame`].
    raf_id: Cell<i32>,
}

impl RafPort {
    /// Creates a port with no outstanding request.
    pub fn new(callback: impl FnMut() + 'static) -> Self {
        let inner = Rc::new(RafInner {
            closure: RefCell::new(None),
            callback: RefCell::new(Box::new(callback)),
            pending: Cell::new(false),
            frames: Cell::new(0),
            raf_id: Cell::new(0),
        });

        let weak: Weak<RafInner> = Rc::downgrade(&inner);
        let closure = Closure::wrap(Box::new(move |_timestamp_ms: f64| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            if !inner.pending.replace(false) {
                return;
            }
            inner.frames.set(inner.frames.get() + 1);
            // A frame that marks more views calls back into `request`; the
            // latch is already clear, so that registers the next frame.
            match inner.callback.try_borrow_mut() {
                Ok(mut callback) => callback(),
                Err(_) => tracing::warn!("frame callback re-entered; frame dropped"),
            }
        }) as Box<dyn FnMut(f64)>);
        *inner.closure.borrow_mut() = Some(closure);

        Self { inner }
    }

    /// Returns `true` while a frame is requested and has not run yet.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.inner.pending.get()
    }

    /// Number of frames that ran through this port.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.inner.frames.get()
    }

    /// Cancels the outstanding request, if any.
    ///
    /// The tree still believes a frame is on its way; call
    /// [`Scheduler::reset`](vigil_core::scheduler::Scheduler::reset) or
    /// request again to recover.
    pub fn cancel(&self) {
        if self.inner.pending.replace(false) {
            cancel_animation_frame(self.inner.raf_id.get());
        }
    }

    fn request(&self) {
        if self.inner.pending.get() {
            return;
        }
        if let Some(ref closure) = *self.inner.closure.borrow() {
            let id = request_animation_frame(closure.as_ref().unchecked_ref());
            self.inner.raf_id.set(id);
            self.inner.pending.set(true);
        }
    }
}

impl FramePort for RafPort {
    fn request_frame(&mut self) {
        self.request();
    }
}

impl Drop for RafInner {
    fn drop(&mut self) {
        if self.pending.get() {
            cancel_animation_frame(self.raf_id.get());
        }
    }
}

impl core::fmt::Debug for RafPort {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RafPort")
            .field("pending", &self.inner.pending.get())
            .field("frames", &self.inner.frames.get())
            .finish_non_exhaustive()
    }
}
