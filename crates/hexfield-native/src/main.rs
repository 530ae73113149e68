//! Native preview window. Drives the same lifecycle as the browser build with
//! winit events so the GPU backends can be iterated on outside a page.
//!
//! Usage: `hexfield-native [config.json]`

use anyhow::Context;
use glam::Vec2;
use hexfield_core::render::gpu::{HexTilingBackend, PointCloudBackend};
use hexfield_core::{
    BackendKind, DeviceHints, FrameOutcome, HexFieldConfig, HostHints, Lifecycle,
    RendererBackend, SurfaceSize,
};
use instant::Instant;
use std::sync::Arc;
use winit::dpi::PhysicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{Window, WindowBuilder};

type NativeLifecycle = Lifecycle<Box<dyn RendererBackend>>;

fn load_config() -> anyhow::Result<HexFieldConfig> {
    let Some(path) = std::env::args().nth(1) else {
        return Ok(HexFieldConfig::default());
    };
    let json = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
    HexFieldConfig::from_json(&json).with_context(|| format!("parsing {path}"))
}

fn surface_for(size: PhysicalSize<u32>, scale_factor: f64) -> SurfaceSize {
    let sf = scale_factor as f32;
    SurfaceSize::new(size.width as f32 / sf, size.height as f32 / sf, sf)
}

fn host_hints() -> HostHints {
    let cores = std::thread::available_parallelism()
        .ok()
        .map(|n| n.get() as u32);
    HostHints {
        reduced_motion: false,
        low_power: DeviceHints {
            cores,
            memory_gb: None,
        }
        .is_low_power(),
    }
}

async fn create_backend(
    kind: BackendKind,
    window: Arc<Window>,
    surface: &SurfaceSize,
) -> anyhow::Result<Box<dyn RendererBackend>> {
    let backend: Box<dyn RendererBackend> = match kind {
        BackendKind::HexTiling => Box::new(HexTilingBackend::new(window, surface).await?),
        _ => Box::new(PointCloudBackend::new(window, surface).await?),
    };
    Ok(backend)
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .init();

    let config = load_config()?;
    let kind = if config.backend.is_gpu() {
        config.backend
    } else {
        log::warn!(
            "{} backend is browser-only; previewing points instead",
            config.backend.name()
        );
        BackendKind::PointCloud
    };

    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title("hexfield preview")
            .with_inner_size(winit::dpi::LogicalSize::new(1280.0, 800.0))
            .build(&event_loop)?,
    );

    let surface = surface_for(window.inner_size(), window.scale_factor());
    let backend = pollster::block_on(create_backend(kind, window.clone(), &surface))?;
    let mut lifecycle: NativeLifecycle = Lifecycle::new(config, host_hints());
    lifecycle.mount(backend, surface, surface.css_width)?;
    log::info!(
        "previewing {} backend with {} points",
        kind.name(),
        lifecycle.lattice().len()
    );

    let start = Instant::now();
    let now_ms = move || start.elapsed().as_secs_f64() * 1000.0;

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::Resized(size) => {
                let surface = surface_for(size, window.scale_factor());
                lifecycle.request_resize(now_ms(), surface, surface.css_width);
                window.request_redraw();
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                let surface = surface_for(window.inner_size(), scale_factor);
                lifecycle.request_resize(now_ms(), surface, surface.css_width);
            }
            WindowEvent::CursorMoved { position, .. } => {
                let sf = window.scale_factor();
                lifecycle.pointer_moved(Vec2::new(
                    (position.x / sf) as f32,
                    (position.y / sf) as f32,
                ));
            }
            WindowEvent::CursorLeft { .. } => lifecycle.pointer_left(),
            WindowEvent::Occluded(occluded) => {
                lifecycle.set_document_hidden(occluded);
                window.request_redraw();
            }
            WindowEvent::CloseRequested => {
                lifecycle.dispose();
                elwt.exit();
            }
            _ => {}
        },
        Event::AboutToWait => match lifecycle.frame(now_ms()) {
            FrameOutcome::Rendered | FrameOutcome::Skipped => {
                elwt.set_control_flow(ControlFlow::Poll);
                window.request_redraw();
            }
            FrameOutcome::Paused => elwt.set_control_flow(ControlFlow::Wait),
            FrameOutcome::Inactive => elwt.exit(),
            FrameOutcome::Failed(kind) => {
                log::error!("{} backend failed; closing preview", kind.name());
                lifecycle.dispose();
                elwt.exit();
            }
        },
        _ => {}
    })?;
    Ok(())
}
