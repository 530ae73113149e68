use super::helpers::{encode_pass, make_pipeline, uniform_binding, UniformBinding};
use super::GpuContext;
use crate::error::RenderError;
use crate::lattice::LatticePoint;
use crate::profile::PerformanceProfile;
use crate::render::{BackendKind, Frame, PointInstance, PointUniforms, RendererBackend};
use crate::surface::SurfaceSize;
use wgpu::util::DeviceExt;

struct PointResources {
    ctx: GpuContext,
    pipeline: wgpu::RenderPipeline,
    uniforms: UniformBinding,
    quad_vb: wgpu::Buffer,
    instance_vb: Option<wgpu::Buffer>,
    instance_count: u32,
}

/// Instanced soft dots, one quad per lattice point; the lattice is uploaded once.
pub struct PointCloudBackend {
    res: Option<PointResources>,
}

impl PointCloudBackend {
    pub async fn new(
        target: impl Into<wgpu::SurfaceTarget<'static>>,
        size: &SurfaceSize,
    ) -> Result<Self, RenderError> {
        let ctx = GpuContext::new(BackendKind::PointCloud, target, size).await?;
        let device = ctx.device();

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("points_shader"),
            source: wgpu::ShaderSource::Wgsl(crate::POINTS_WGSL.into()),
        });
        let uniforms = uniform_binding(
            device,
            "points_uniforms",
            std::mem::size_of::<PointUniforms>() as u64,
            wgpu::ShaderStages::VERTEX_FRAGMENT,
        );
        // two triangles spanning [-1, 1]
        let quad_vertices: [f32; 12] = [
            -1.0, -1.0, 1.0, -1.0, 1.0, 1.0, -1.0, -1.0, 1.0, 1.0, -1.0, 1.0,
        ];
        let quad_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("points_quad_vb"),
            contents: bytemuck::cast_slice(&quad_vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let vertex_buffers = [
            // slot 0: quad corners
            wgpu::VertexBufferLayout {
                array_stride: (std::mem::size_of::<f32>() * 2) as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x2,
                    offset: 0,
                    shader_location: 0,
                }],
            },
            // slot 1: lattice instances
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<PointInstance>() as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &[
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x2,
                        offset: 0,
                        shader_location: 1,
                    },
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32,
                        offset: 8,
                        shader_location: 2,
                    },
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32,
                        offset: 12,
                        shader_location: 3,
                    },
                ],
            },
        ];
        let pipeline = make_pipeline(
            device,
            "points_pipeline",
            &uniforms.layout,
            &shader,
            "vs_main",
            &vertex_buffers,
            ctx.format(),
            Some(wgpu::BlendState::ALPHA_BLENDING),
        );

        Ok(Self {
            res: Some(PointResources {
                ctx,
                pipeline,
                uniforms,
                quad_vb,
                instance_vb: None,
                instance_count: 0,
            }),
        })
    }
}

impl RendererBackend for PointCloudBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::PointCloud
    }

    fn upload_lattice(&mut self, lattice: &[LatticePoint], _profile: &PerformanceProfile) {
        let Some(res) = self.res.as_mut() else {
            return;
        };
        if let Some(old) = res.instance_vb.take() {
            old.destroy();
        }
        res.instance_count = lattice.len() as u32;
        if lattice.is_empty() {
            return;
        }
        let instances: Vec<PointInstance> = lattice.iter().map(PointInstance::from).collect();
        res.instance_vb = Some(res.ctx.device().create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("points_instance_vb"),
                contents: bytemuck::cast_slice(&instances),
                usage: wgpu::BufferUsages::VERTEX,
            },
        ));
    }

    fn resize(&mut self, surface: &SurfaceSize) {
        if let Some(res) = self.res.as_mut() {
            res.ctx.resize(surface);
        }
    }

    fn render_frame(&mut self, frame: &Frame<'_>) -> Result<(), RenderError> {
        let res = self.res.as_mut().ok_or(RenderError::Disposed)?;
        let uniforms = PointUniforms::from_frame(frame);
        res.ctx
            .queue()
            .write_buffer(&res.uniforms.buffer, 0, bytemuck::bytes_of(&uniforms));

        let Some(output) = res.ctx.acquire()? else {
            return Ok(());
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let commands = encode_pass(res.ctx.device(), &view, "points_pass", |rpass| {
            if let Some(instance_vb) = res.instance_vb.as_ref() {
                rpass.set_pipeline(&res.pipeline);
                rpass.set_bind_group(0, &res.uniforms.bind_group, &[]);
                rpass.set_vertex_buffer(0, res.quad_vb.slice(..));
                rpass.set_vertex_buffer(1, instance_vb.slice(..));
                rpass.draw(0..6, 0..res.instance_count);
            }
        });
        res.ctx.queue().submit(Some(commands));
        output.present();
        Ok(())
    }

    fn dispose(&mut self) {
        if let Some(res) = self.res.take() {
            if let Some(vb) = res.instance_vb {
                vb.destroy();
            }
            res.quad_vb.destroy();
            res.uniforms.buffer.destroy();
            res.ctx.destroy();
        }
    }
}
