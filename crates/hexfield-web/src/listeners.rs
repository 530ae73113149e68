//! Subscriptions that unsubscribe themselves when dropped, so tearing down a
//! mounted background never leaves handlers attached to the page.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Minimum visible fraction before the container counts as on screen.
const INTERSECTION_THRESHOLD: f64 = 0.01;

pub struct EventListener {
    target: web::EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(web::Event)>,
}

impl EventListener {
    pub fn new<F>(
        target: &web::EventTarget,
        event: &'static str,
        handler: F,
    ) -> Result<Self, JsValue>
    where
        F: FnMut(web::Event) + 'static,
    {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::Event)>);
        target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            event,
            closure,
        })
    }
}

impl Drop for EventListener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
    }
}

/// Reports the container's size whenever the layout changes it.
pub struct ResizeWatch {
    observer: web::ResizeObserver,
    _closure: Closure<dyn FnMut(js_sys::Array)>,
}

impl ResizeWatch {
    pub fn new<F>(target: &web::Element, mut on_resize: F) -> Result<Self, JsValue>
    where
        F: FnMut() + 'static,
    {
        let closure = Closure::wrap(Box::new(move |_entries: js_sys::Array| on_resize())
            as Box<dyn FnMut(js_sys::Array)>);
        let observer = web::ResizeObserver::new(closure.as_ref().unchecked_ref())?;
        observer.observe(target);
        Ok(Self {
            observer,
            _closure: closure,
        })
    }
}

impl Drop for ResizeWatch {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

/// Reports whether the container intersects the viewport.
pub struct VisibilityWatch {
    observer: web::IntersectionObserver,
    _closure: Closure<dyn FnMut(js_sys::Array)>,
}

impl VisibilityWatch {
    pub fn new<F>(target: &web::Element, mut on_change: F) -> Result<Self, JsValue>
    where
        F: FnMut(bool) + 'static,
    {
        let closure = Closure::wrap(Box::new(move |entries: js_sys::Array| {
            let visible = crate::input::any_visible(entries.iter().filter_map(|e| {
                e.dyn_into::<web::IntersectionObserverEntry>()
                    .ok()
                    .map(|entry| entry.is_intersecting())
            }));
            on_change(visible);
        }) as Box<dyn FnMut(js_sys::Array)>);
        let init = web::IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(INTERSECTION_THRESHOLD));
        let observer =
            web::IntersectionObserver::new_with_options(closure.as_ref().unchecked_ref(), &init)?;
        observer.observe(target);
        Ok(Self {
            observer,
            _closure: closure,
        })
    }
}

impl Drop for VisibilityWatch {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}
