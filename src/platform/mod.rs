//! Platform abstraction layer
//!
//! Display-refresh frame scheduling: a `FrameLoop` invokes its callback once
//! per frame on whatever `FrameScheduler` the host provides, until stopped.
//! Browsers use `requestAnimationFrame`; tests and the native demo fire frames
//! by hand.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// Callback for one frame, given the host timestamp in milliseconds
pub type FrameCallback = Box<dyn FnOnce(f64)>;

/// One-shot frame requests at the host's refresh cadence
pub trait FrameScheduler {
    /// Run `callback` on the next frame; returns a handle for cancellation
    fn request_frame(&self, callback: FrameCallback) -> Option<i32>;
    /// Drop a request that hasn't fired yet
    fn cancel_frame(&self, handle: i32);
}

impl<T: FrameScheduler + ?Sized> FrameScheduler for Rc<T> {
    fn request_frame(&self, callback: FrameCallback) -> Option<i32> {
        (**self).request_frame(callback)
    }

    fn cancel_frame(&self, handle: i32) {
        (**self).cancel_frame(handle)
    }
}

struct LoopShared<S> {
    scheduler: S,
    on_frame: RefCell<Box<dyn FnMut(f64)>>,
    stopped: Cell<bool>,
    pending: Cell<Option<i32>>,
}

/// Repeatedly runs a frame callback until `stop()` or drop
///
/// Once stopped, the callback never runs again, even if the scheduler
/// delivers a request it failed to cancel.
pub struct FrameLoop<S: FrameScheduler + 'static> {
    shared: Rc<LoopShared<S>>,
}

impl<S: FrameScheduler + 'static> FrameLoop<S> {
    /// Schedule the first frame and keep rescheduling after each one
    pub fn start(scheduler: S, on_frame: impl FnMut(f64) + 'static) -> Self {
        let shared = Rc::new(LoopShared {
            scheduler,
            on_frame: RefCell::new(Box::new(on_frame)),
            stopped: Cell::new(false),
            pending: Cell::new(None),
        });
        schedule(&shared);
        log::info!("Frame loop started");
        Self { shared }
    }

    /// Cancel the pending frame; no further callbacks run
    pub fn stop(&self) {
        if self.shared.stopped.replace(true) {
            return;
        }
        if let Some(handle) = self.shared.pending.take() {
            self.shared.scheduler.cancel_frame(handle);
        }
        log::info!("Frame loop stopped");
    }

    pub fn is_running(&self) -> bool {
        !self.shared.stopped.get()
    }
}

impl<S: FrameScheduler + 'static> Drop for FrameLoop<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Request the next frame; the request only holds a weak handle to the loop
fn schedule<S: FrameScheduler + 'static>(shared: &Rc<LoopShared<S>>) {
    let weak: Weak<LoopShared<S>> = Rc::downgrade(shared);
    let handle = shared.scheduler.request_frame(Box::new(move |time| {
        let Some(shared) = weak.upgrade() else {
            return;
        };
        shared.pending.set(None);
        if shared.stopped.get() {
            return;
        }

        (*shared.on_frame.borrow_mut())(time);

        if !shared.stopped.get() {
            schedule(&shared);
        }
    }));

    if handle.is_none() {
        log::warn!("Frame request rejected; loop halted");
        shared.stopped.set(true);
    }
    shared.pending.set(handle);
}

/// Scheduler that runs queued frames only when told to
#[derive(Default)]
pub struct ManualScheduler {
    next_handle: Cell<i32>,
    queue: RefCell<Vec<(i32, FrameCallback)>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests waiting for the next `fire`
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Run everything queued before this call; returns how many ran
    ///
    /// Requests made during the run wait for the next `fire`.
    pub fn fire(&self, time: f64) -> usize {
        let due = std::mem::take(&mut *self.queue.borrow_mut());
        let count = due.len();
        for (_, callback) in due {
            callback(time);
        }
        count
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&self, callback: FrameCallback) -> Option<i32> {
        let handle = self.next_handle.get() + 1;
        self.next_handle.set(handle);
        self.queue.borrow_mut().push((handle, callback));
        Some(handle)
    }

    fn cancel_frame(&self, handle: i32) {
        self.queue.borrow_mut().retain(|(h, _)| *h != handle);
    }
}

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserScheduler;

#[cfg(target_arch = "wasm32")]
mod browser {
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;

    use super::{FrameCallback, FrameScheduler};

    /// `requestAnimationFrame` on the page's window
    pub struct BrowserScheduler {
        window: web_sys::Window,
    }

    impl BrowserScheduler {
        pub fn new() -> Option<Self> {
            web_sys::window().map(|window| Self { window })
        }
    }

    impl FrameScheduler for BrowserScheduler {
        fn request_frame(&self, callback: FrameCallback) -> Option<i32> {
            let closure = Closure::once_into_js(move |time: f64| callback(time));
            let function: &js_sys::Function = closure.unchecked_ref();
            self.window.request_animation_frame(function).ok()
        }

        fn cancel_frame(&self, handle: i32) {
            let _ = self.window.cancel_animation_frame(handle);
        }
    }
}
