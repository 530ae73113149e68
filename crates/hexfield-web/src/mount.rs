//! Wires a [`Lifecycle`] to one container element: backend probing, page
//! events, observers and the animation frame loop.

use crate::backend::{self, Host, WebBackend};
use crate::dom;
use crate::frame::FrameLoop;
use crate::input;
use crate::listeners::{EventListener, ResizeWatch, VisibilityWatch};
use anyhow::anyhow;
use hexfield_core::{BackendKind, FrameOutcome, HexFieldConfig, HostHints, Lifecycle};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

type SharedLifecycle = Rc<RefCell<Lifecycle<WebBackend>>>;

pub struct Mounted {
    lifecycle: SharedLifecycle,
    frame_loop: Option<FrameLoop>,
    listeners: Vec<EventListener>,
    resize: Option<ResizeWatch>,
    visibility: Option<VisibilityWatch>,
}

impl Mounted {
    pub fn set_paused(&self, paused: bool) {
        self.lifecycle.borrow_mut().set_external_pause(paused);
    }

    pub fn backend(&self) -> Option<BackendKind> {
        self.lifecycle.borrow().backend_kind()
    }

    pub fn is_running(&self) -> bool {
        self.lifecycle.borrow().is_running()
    }

    /// Stop the loop, detach every listener and release the backend.
    pub fn dispose(&mut self) {
        if let Some(mut frame_loop) = self.frame_loop.take() {
            frame_loop.cancel();
        }
        self.listeners.clear();
        self.resize = None;
        self.visibility = None;
        self.lifecycle.borrow_mut().dispose();
    }
}

impl Drop for Mounted {
    fn drop(&mut self) {
        self.dispose();
    }
}

fn js_err(e: wasm_bindgen::JsValue) -> anyhow::Error {
    anyhow!(format!("{:?}", e))
}

pub async fn mount(container: web::HtmlElement, config: HexFieldConfig) -> anyhow::Result<Mounted> {
    let window = web::window().ok_or_else(|| anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow!("no document"))?;

    let hints = HostHints {
        reduced_motion: dom::prefers_reduced_motion(&window),
        low_power: dom::device_hints(&window).is_low_power(),
    };
    let host = Host {
        document: document.clone(),
        container: container.clone(),
    };
    let surface = dom::container_surface(&window, &container);
    let requested = config.backend;
    let mut lifecycle = Lifecycle::new(config, hints);

    let backend = backend::probe(&host, requested, &surface)
        .await
        .ok_or_else(|| anyhow!("no rendering backend available"))?;
    lifecycle.mount(backend, surface, dom::viewport_width(&window))?;
    lifecycle.set_document_hidden(dom::document_hidden(&document));
    log::info!(
        "hexfield mounted: {} backend, {} points",
        lifecycle.backend_kind().map_or("none", BackendKind::name),
        lifecycle.lattice().len()
    );
    let lifecycle: SharedLifecycle = Rc::new(RefCell::new(lifecycle));

    let mut listeners = Vec::with_capacity(4);
    let container_target: &web::EventTarget = container.as_ref();
    {
        let lc = lifecycle.clone();
        let el = container.clone();
        listeners.push(
            EventListener::new(container_target, "pointermove", move |ev| {
                let Some(ev) = ev.dyn_ref::<web::PointerEvent>() else {
                    return;
                };
                let mut lc = lc.borrow_mut();
                if !input::steers_glow(&ev.pointer_type()) {
                    lc.pointer_left();
                    return;
                }
                let rect = el.get_bounding_client_rect();
                let local = input::local_pointer(
                    ev.client_x() as f64,
                    ev.client_y() as f64,
                    rect.left(),
                    rect.top(),
                );
                if input::inside(local, rect.width() as f32, rect.height() as f32) {
                    lc.pointer_moved(local);
                } else {
                    lc.pointer_left();
                }
            })
            .map_err(js_err)?,
        );
    }
    {
        let lc = lifecycle.clone();
        listeners.push(
            EventListener::new(container_target, "pointerleave", move |_| {
                lc.borrow_mut().pointer_left();
            })
            .map_err(js_err)?,
        );
    }
    {
        let lc = lifecycle.clone();
        let doc = document.clone();
        listeners.push(
            EventListener::new(document.as_ref(), "visibilitychange", move |_| {
                lc.borrow_mut().set_document_hidden(dom::document_hidden(&doc));
            })
            .map_err(js_err)?,
        );
    }

    // Container size changes come from the observer; the window listener
    // catches viewport changes that only move the profile breakpoint.
    let request_resize = {
        let lc = lifecycle.clone();
        let win = window.clone();
        let el = container.clone();
        move || {
            let surface = dom::container_surface(&win, &el);
            lc.borrow_mut()
                .request_resize(dom::now_ms(&win), surface, dom::viewport_width(&win));
        }
    };
    let resize = match ResizeWatch::new(container.as_ref(), request_resize.clone()) {
        Ok(watch) => Some(watch),
        Err(e) => {
            log::warn!("ResizeObserver unavailable: {:?}", e);
            None
        }
    };
    listeners.push(
        EventListener::new(window.as_ref(), "resize", move |_| request_resize())
            .map_err(js_err)?,
    );

    let visibility = {
        let lc = lifecycle.clone();
        match VisibilityWatch::new(container.as_ref(), move |visible| {
            lc.borrow_mut().set_offscreen(!visible);
        }) {
            Ok(watch) => Some(watch),
            Err(e) => {
                log::warn!("IntersectionObserver unavailable: {:?}", e);
                None
            }
        }
    };

    let frame_loop = {
        let lc = lifecycle.clone();
        FrameLoop::start(window.clone(), move |now_ms| {
            let Ok(mut lc) = lc.try_borrow_mut() else {
                return true;
            };
            match lc.frame(now_ms) {
                FrameOutcome::Failed(kind) => {
                    let surface = *lc.surface();
                    match backend::degrade(&host, kind, &surface) {
                        Some(next) => lc.replace_backend(next),
                        None => {
                            log::error!("no fallback left after {} failed", kind.name());
                            lc.dispose();
                            return false;
                        }
                    }
                    true
                }
                FrameOutcome::Inactive => false,
                _ => true,
            }
        })
        .map_err(js_err)?
    };

    Ok(Mounted {
        lifecycle,
        frame_loop: Some(frame_loop),
        listeners,
        resize,
        visibility,
    })
}
