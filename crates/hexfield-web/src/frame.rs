use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

type FrameClosure = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// requestAnimationFrame loop. The callback returns `false` to stop;
/// dropping the loop cancels any pending frame.
pub struct FrameLoop {
    window: web::Window,
    handle: Rc<Cell<Option<i32>>>,
    closure: FrameClosure,
}

impl FrameLoop {
    pub fn start<F>(window: web::Window, mut tick: F) -> Result<Self, JsValue>
    where
        F: FnMut(f64) -> bool + 'static,
    {
        let handle: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
        let closure: FrameClosure = Rc::new(RefCell::new(None));

        let weak = Rc::downgrade(&closure);
        let handle_inner = handle.clone();
        let window_inner = window.clone();
        *closure.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
            handle_inner.set(None);
            if !tick(ts) {
                return;
            }
            let Some(slot) = weak.upgrade() else {
                return;
            };
            let slot = slot.borrow();
            if let Some(cb) = slot.as_ref() {
                match window_inner.request_animation_frame(cb.as_ref().unchecked_ref()) {
                    Ok(id) => handle_inner.set(Some(id)),
                    Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
                }
            }
        }) as Box<dyn FnMut(f64)>));

        {
            let slot = closure.borrow();
            if let Some(cb) = slot.as_ref() {
                handle.set(Some(
                    window.request_animation_frame(cb.as_ref().unchecked_ref())?,
                ));
            }
        }
        Ok(Self {
            window,
            handle,
            closure,
        })
    }

    /// Cancel the pending frame. Must not be called from inside the tick.
    pub fn cancel(&mut self) {
        if let Some(id) = self.handle.take() {
            let _ = self.window.cancel_animation_frame(id);
        }
        self.closure.borrow_mut().take();
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.cancel();
    }
}
