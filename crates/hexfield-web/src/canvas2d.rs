use crate::dom::sync_canvas_backing_size;
use glam::Vec2;
use hexfield_core::{BackendKind, DotCanvas, RenderError, SurfaceSize};
use std::f64::consts::TAU;
use wasm_bindgen::JsCast;
use web_sys as web;

fn css_rgb(rgba: [f32; 4]) -> [u8; 3] {
    let c = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    [c(rgba[0]), c(rgba[1]), c(rgba[2])]
}

/// Canvas 2D drawing target for the CPU backends.
pub struct Canvas2dTarget {
    canvas: web::HtmlCanvasElement,
    ctx: web::CanvasRenderingContext2d,
    fill_rgb: Option<[u8; 3]>,
}

impl Canvas2dTarget {
    /// `kind` names the backend in errors; both CPU backends draw through this.
    pub fn new(canvas: web::HtmlCanvasElement, kind: BackendKind) -> Result<Self, RenderError> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| RenderError::unavailable(kind, format!("{e:?}")))?
            .ok_or_else(|| RenderError::unavailable(kind, "2d context already taken"))?
            .dyn_into::<web::CanvasRenderingContext2d>()
            .map_err(|_| RenderError::unavailable(kind, "not a 2d context"))?;
        Ok(Self {
            canvas,
            ctx,
            fill_rgb: None,
        })
    }

    fn set_fill(&mut self, rgb: [u8; 3]) {
        if self.fill_rgb != Some(rgb) {
            self.ctx
                .set_fill_style_str(&format!("rgb({},{},{})", rgb[0], rgb[1], rgb[2]));
            self.fill_rgb = Some(rgb);
        }
    }
}

impl DotCanvas for Canvas2dTarget {
    fn begin_frame(&mut self, surface: &SurfaceSize, background: [f32; 4]) {
        sync_canvas_backing_size(&self.canvas, surface);
        let dpr = surface.dpr as f64;
        // resizing the backing store resets context state
        self.fill_rgb = None;
        let _ = self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
        self.ctx.set_global_alpha(background[3] as f64);
        self.set_fill(css_rgb(background));
        self.ctx
            .fill_rect(0.0, 0.0, surface.css_width as f64, surface.css_height as f64);
    }

    fn fill_dot(&mut self, center: Vec2, radius: f32, rgba: [f32; 4]) {
        self.set_fill(css_rgb(rgba));
        self.ctx.set_global_alpha(rgba[3] as f64);
        self.ctx.begin_path();
        if self
            .ctx
            .arc(center.x as f64, center.y as f64, radius as f64, 0.0, TAU)
            .is_ok()
        {
            self.ctx.fill();
        }
    }

    fn end_frame(&mut self) {
        self.ctx.set_global_alpha(1.0);
    }
}
