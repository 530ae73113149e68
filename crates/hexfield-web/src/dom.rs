use crate::input;
use hexfield_core::{DeviceHints, SurfaceSize};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

const CANVAS_STYLE: &str =
    "position:absolute;inset:0;width:100%;height:100%;display:block;pointer-events:none;";

/// Create a fresh canvas layered over `container`. GPU and 2D contexts are
/// exclusive per canvas, so every backend attempt gets its own.
pub fn create_canvas(
    document: &web::Document,
    container: &web::HtmlElement,
) -> Result<web::HtmlCanvasElement, JsValue> {
    let canvas: web::HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
    canvas.set_attribute("style", CANVAS_STYLE)?;
    canvas.set_attribute("aria-hidden", "true")?;
    container.append_child(&canvas)?;
    Ok(canvas)
}

pub fn container_surface(window: &web::Window, container: &web::HtmlElement) -> SurfaceSize {
    let rect = container.get_bounding_client_rect();
    input::surface_from_rect(rect.width(), rect.height(), window.device_pixel_ratio())
}

/// Maintain the canvas backing store at CSS size * DPR.
pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement, surface: &SurfaceSize) {
    let (w, h) = (surface.physical_width(), surface.physical_height());
    if canvas.width() != w {
        canvas.set_width(w);
    }
    if canvas.height() != h {
        canvas.set_height(h);
    }
}

pub fn viewport_width(window: &web::Window) -> f32 {
    window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0) as f32
}

pub fn prefers_reduced_motion(window: &web::Window) -> bool {
    matches!(
        window.match_media("(prefers-reduced-motion: reduce)"),
        Ok(Some(mql)) if mql.matches()
    )
}

pub fn device_hints(window: &web::Window) -> DeviceHints {
    let navigator = window.navigator();
    let memory = js_sys::Reflect::get(&navigator, &JsValue::from_str("deviceMemory"))
        .ok()
        .and_then(|v| v.as_f64());
    input::device_hints(navigator.hardware_concurrency(), memory)
}

pub fn document_hidden(document: &web::Document) -> bool {
    document.hidden()
}

pub fn now_ms(window: &web::Window) -> f64 {
    window.performance().map_or(0.0, |p| p.now())
}
