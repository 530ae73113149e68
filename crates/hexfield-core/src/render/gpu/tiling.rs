use super::helpers::{encode_pass, make_pipeline, uniform_binding, UniformBinding};
use super::GpuContext;
use crate::error::RenderError;
use crate::lattice::LatticePoint;
use crate::profile::PerformanceProfile;
use crate::render::{BackendKind, Frame, RendererBackend, TilingUniforms};
use crate::surface::SurfaceSize;

struct TilingResources {
    ctx: GpuContext,
    pipeline: wgpu::RenderPipeline,
    uniforms: UniformBinding,
}

/// Full-screen procedural hex grid; ignores the lattice.
pub struct HexTilingBackend {
    res: Option<TilingResources>,
}

impl HexTilingBackend {
    pub async fn new(
        target: impl Into<wgpu::SurfaceTarget<'static>>,
        size: &SurfaceSize,
    ) -> Result<Self, RenderError> {
        let ctx = GpuContext::new(BackendKind::HexTiling, target, size).await?;
        let device = ctx.device();
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("tiling_shader"),
            source: wgpu::ShaderSource::Wgsl(crate::TILING_WGSL.into()),
        });
        let uniforms = uniform_binding(
            device,
            "tiling_uniforms",
            std::mem::size_of::<TilingUniforms>() as u64,
            wgpu::ShaderStages::FRAGMENT,
        );
        let pipeline = make_pipeline(
            device,
            "tiling_pipeline",
            &uniforms.layout,
            &shader,
            "vs_fullscreen",
            &[],
            ctx.format(),
            None,
        );
        Ok(Self {
            res: Some(TilingResources {
                ctx,
                pipeline,
                uniforms,
            }),
        })
    }
}

impl RendererBackend for HexTilingBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::HexTiling
    }

    fn upload_lattice(&mut self, _lattice: &[LatticePoint], _profile: &PerformanceProfile) {}

    fn resize(&mut self, surface: &SurfaceSize) {
        if let Some(res) = self.res.as_mut() {
            res.ctx.resize(surface);
        }
    }

    fn render_frame(&mut self, frame: &Frame<'_>) -> Result<(), RenderError> {
        let res = self.res.as_mut().ok_or(RenderError::Disposed)?;
        let uniforms = TilingUniforms::from_frame(frame);
        res.ctx
            .queue()
            .write_buffer(&res.uniforms.buffer, 0, bytemuck::bytes_of(&uniforms));

        let Some(output) = res.ctx.acquire()? else {
            return Ok(());
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let commands = encode_pass(res.ctx.device(), &view, "tiling_pass", |rpass| {
            rpass.set_pipeline(&res.pipeline);
            rpass.set_bind_group(0, &res.uniforms.bind_group, &[]);
            rpass.draw(0..3, 0..1);
        });
        res.ctx.queue().submit(Some(commands));
        output.present();
        Ok(())
    }

    fn dispose(&mut self) {
        if let Some(res) = self.res.take() {
            res.uniforms.buffer.destroy();
            res.ctx.destroy();
        }
    }
}
