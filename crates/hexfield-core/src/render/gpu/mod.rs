//! wgpu backends. Both own a [`GpuContext`] bound to their surface.

mod helpers;
mod points;
mod tiling;

pub use points::PointCloudBackend;
pub use tiling::HexTilingBackend;

use super::BackendKind;
use crate::constants::BACKGROUND_COLOR;
use crate::error::RenderError;
use crate::surface::SurfaceSize;

pub struct GpuContext {
    kind: BackendKind,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
}

impl GpuContext {
    /// Probe an adapter for `target`. Failures map to `ContextUnavailable`.
    pub async fn new(
        kind: BackendKind,
        target: impl Into<wgpu::SurfaceTarget<'static>>,
        size: &SurfaceSize,
    ) -> Result<Self, RenderError> {
        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(target)
            .map_err(|e| RenderError::unavailable(kind, e.to_string()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| RenderError::unavailable(kind, "no compatible adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    // WebGL2 cannot satisfy the default limits
                    required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                        .using_resolution(adapter.limits()),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: Some("hexfield_device"),
                },
                None,
            )
            .await
            .map_err(|e| RenderError::unavailable(kind, format!("request_device: {e}")))?;

        let caps = surface.get_capabilities(&adapter);
        // blend in non-sRGB space so colors match the 2D canvas
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| RenderError::unavailable(kind, "surface reports no formats"))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.physical_width(),
            height: size.physical_height(),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        log::info!(
            "{} backend on {:?} ({}x{}, {:?})",
            kind.name(),
            adapter.get_info().backend,
            config.width,
            config.height,
            format
        );

        Ok(Self {
            kind,
            surface,
            device,
            queue,
            config,
        })
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub fn resize(&mut self, size: &SurfaceSize) {
        let (width, height) = (size.physical_width(), size.physical_height());
        if width == self.config.width && height == self.config.height {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }

    /// Next swapchain texture. `Ok(None)` skips this frame.
    pub fn acquire(&mut self) -> Result<Option<wgpu::SurfaceTexture>, RenderError> {
        match self.surface.get_current_texture() {
            Ok(frame) => Ok(Some(frame)),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                // one reconfigure attempt before giving up on this backend
                self.surface.configure(&self.device, &self.config);
                match self.surface.get_current_texture() {
                    Ok(frame) => Ok(Some(frame)),
                    Err(e) => {
                        log::error!("{} surface unrecoverable: {e}", self.kind.name());
                        Err(RenderError::SurfaceLost)
                    }
                }
            }
            Err(wgpu::SurfaceError::OutOfMemory) => Err(RenderError::OutOfMemory),
            Err(_) => Ok(None),
        }
    }

    pub fn destroy(&self) {
        self.device.destroy();
    }
}

pub(crate) fn clear_color() -> wgpu::Color {
    wgpu::Color {
        r: BACKGROUND_COLOR[0] as f64,
        g: BACKGROUND_COLOR[1] as f64,
        b: BACKGROUND_COLOR[2] as f64,
        a: BACKGROUND_COLOR[3] as f64,
    }
}
