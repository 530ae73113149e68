//! Backend construction and the degradation ladder for the browser.

use crate::canvas2d::Canvas2dTarget;
use crate::dom;
use hexfield_core::render::gpu::{HexTilingBackend, PointCloudBackend};
use hexfield_core::{
    BackendKind, CanvasRenderer, Frame, LatticePoint, PerformanceProfile, RenderError,
    RendererBackend, StaticRenderer, SurfaceSize,
};
use web_sys as web;

/// A backend together with the canvas it owns. Disposing removes the canvas.
pub struct WebBackend {
    inner: Box<dyn RendererBackend>,
    canvas: web::HtmlCanvasElement,
}

impl RendererBackend for WebBackend {
    fn kind(&self) -> BackendKind {
        self.inner.kind()
    }

    fn upload_lattice(&mut self, lattice: &[LatticePoint], profile: &PerformanceProfile) {
        self.inner.upload_lattice(lattice, profile);
    }

    fn resize(&mut self, surface: &SurfaceSize) {
        dom::sync_canvas_backing_size(&self.canvas, surface);
        self.inner.resize(surface);
    }

    fn render_frame(&mut self, frame: &Frame<'_>) -> Result<(), RenderError> {
        self.inner.render_frame(frame)
    }

    fn dispose(&mut self) {
        self.inner.dispose();
        self.canvas.remove();
    }
}

/// Where new canvases are attached.
#[derive(Clone)]
pub struct Host {
    pub document: web::Document,
    pub container: web::HtmlElement,
}

impl Host {
    fn canvas(
        &self,
        kind: BackendKind,
        surface: &SurfaceSize,
    ) -> Result<web::HtmlCanvasElement, RenderError> {
        let canvas = dom::create_canvas(&self.document, &self.container)
            .map_err(|e| RenderError::unavailable(kind, format!("{e:?}")))?;
        dom::sync_canvas_backing_size(&canvas, surface);
        Ok(canvas)
    }
}

/// Build a CPU backend. These never wait on the browser, so they can be
/// swapped in from inside the frame loop.
pub fn create_cpu(
    host: &Host,
    kind: BackendKind,
    surface: &SurfaceSize,
) -> Result<WebBackend, RenderError> {
    let canvas = host.canvas(kind, surface)?;
    let inner: Result<Box<dyn RendererBackend>, RenderError> =
        Canvas2dTarget::new(canvas.clone(), kind).and_then(|target| match kind {
            BackendKind::Canvas2d => {
                Ok(Box::new(CanvasRenderer::new(target)) as Box<dyn RendererBackend>)
            }
            BackendKind::Static => {
                Ok(Box::new(StaticRenderer::new(target)) as Box<dyn RendererBackend>)
            }
            other => Err(RenderError::unavailable(other, "not a canvas backend")),
        });
    match inner {
        Ok(inner) => Ok(WebBackend { inner, canvas }),
        Err(e) => {
            canvas.remove();
            Err(e)
        }
    }
}

pub async fn create(
    host: &Host,
    kind: BackendKind,
    surface: &SurfaceSize,
) -> Result<WebBackend, RenderError> {
    if !kind.is_gpu() {
        return create_cpu(host, kind, surface);
    }
    let canvas = host.canvas(kind, surface)?;
    let target = wgpu::SurfaceTarget::Canvas(canvas.clone());
    let inner: Result<Box<dyn RendererBackend>, RenderError> = match kind {
        BackendKind::PointCloud => PointCloudBackend::new(target, surface)
            .await
            .map(|b| Box::new(b) as Box<dyn RendererBackend>),
        _ => HexTilingBackend::new(target, surface)
            .await
            .map(|b| Box::new(b) as Box<dyn RendererBackend>),
    };
    match inner {
        Ok(inner) => Ok(WebBackend { inner, canvas }),
        Err(e) => {
            canvas.remove();
            Err(e)
        }
    }
}

/// Walk the ladder from `requested` and return the first backend that comes up.
pub async fn probe(
    host: &Host,
    requested: BackendKind,
    surface: &SurfaceSize,
) -> Option<WebBackend> {
    for kind in requested.ladder() {
        match create(host, kind, surface).await {
            Ok(backend) => {
                log::info!("using {} backend", kind.name());
                return Some(backend);
            }
            Err(e) => log::warn!("{e}; trying next backend"),
        }
    }
    None
}

/// Synchronous replacement after a render failure. GPU rungs are skipped
/// since a failing device is unlikely to recover within the same page.
pub fn degrade(host: &Host, failed: BackendKind, surface: &SurfaceSize) -> Option<WebBackend> {
    failed
        .ladder()
        .skip(1)
        .filter(|k| !k.is_gpu())
        .find_map(|kind| match create_cpu(host, kind, surface) {
            Ok(backend) => Some(backend),
            Err(e) => {
                log::warn!("{e}");
                None
            }
        })
}
