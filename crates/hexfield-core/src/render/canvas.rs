use super::{BackendKind, DotCanvas, Frame, RendererBackend};
use crate::constants::{
    ALPHA_CULL, BACKGROUND_COLOR, DOT_COLOR, GLOW_ALPHA_GAIN, GLOW_RADIUS_GAIN,
    SHIMMER_ALPHA_GAIN, SHIMMER_RADIUS_GAIN, SHIMMER_RATE, SHIMMER_RING_PHASE,
};
use crate::error::RenderError;
use crate::lattice::{DotStyle, LatticePoint};
use crate::profile::PerformanceProfile;
use crate::surface::SurfaceSize;
use glam::Vec2;

/// Immediate-mode dot renderer: one filled circle per visible lattice point.
pub struct CanvasRenderer<C: DotCanvas> {
    target: C,
    style: DotStyle,
    // dense per-point glow, rebuilt from the focus set each frame
    glow: Vec<f32>,
    disposed: bool,
}

impl<C: DotCanvas> CanvasRenderer<C> {
    pub fn new(target: C) -> Self {
        Self {
            target,
            style: DotStyle::new(0.0),
            glow: Vec::new(),
            disposed: false,
        }
    }

    pub fn target(&self) -> &C {
        &self.target
    }
}

/// Alpha and radius of one dot after shimmer and pointer glow.
pub fn shade_dot(
    style: &DotStyle,
    p: &LatticePoint,
    elapsed: f32,
    shimmer: f32,
    glow: f32,
    glow_strength: f32,
) -> (f32, f32) {
    let mut alpha = style.base_alpha(p);
    let mut radius = style.base_radius(p);

    if shimmer > 0.0 {
        let s = (elapsed * SHIMMER_RATE + p.ring as f32 * SHIMMER_RING_PHASE).sin() * shimmer;
        radius += s * SHIMMER_RADIUS_GAIN;
        alpha += s * SHIMMER_ALPHA_GAIN;
    }
    if glow > 0.0 {
        alpha += glow * glow_strength * GLOW_ALPHA_GAIN;
        radius += glow * GLOW_RADIUS_GAIN;
    }
    (alpha.clamp(0.0, 1.0), radius.max(0.0))
}

impl<C: DotCanvas> RendererBackend for CanvasRenderer<C> {
    fn kind(&self) -> BackendKind {
        BackendKind::Canvas2d
    }

    fn upload_lattice(&mut self, lattice: &[LatticePoint], profile: &PerformanceProfile) {
        self.style = DotStyle::new(profile.dot_size);
        self.glow.clear();
        self.glow.resize(lattice.len(), 0.0);
    }

    fn resize(&mut self, _surface: &SurfaceSize) {}

    fn render_frame(&mut self, frame: &Frame<'_>) -> Result<(), RenderError> {
        if self.disposed {
            return Err(RenderError::Disposed);
        }
        let state = frame.interaction;
        if self.glow.len() != frame.lattice.len() {
            self.glow.resize(frame.lattice.len(), 0.0);
        }
        self.glow.iter_mut().for_each(|g| *g = 0.0);
        for f in &state.focus {
            if let Some(slot) = self.glow.get_mut(f.index) {
                *slot = f.glow;
            }
        }

        let rotation = Vec2::from_angle(state.idle_angle);
        self.target.begin_frame(frame.surface, BACKGROUND_COLOR);
        for (i, p) in frame.lattice.iter().enumerate() {
            let (alpha, radius) = shade_dot(
                &self.style,
                p,
                state.elapsed,
                state.shimmer,
                self.glow[i],
                frame.config.glow_strength,
            );
            if alpha < ALPHA_CULL || radius <= 0.0 {
                continue;
            }
            let center = frame.transform.to_css(rotation.rotate(p.pos));
            self.target
                .fill_dot(center, radius, [DOT_COLOR[0], DOT_COLOR[1], DOT_COLOR[2], alpha]);
        }
        self.target.end_frame();
        Ok(())
    }

    fn dispose(&mut self) {
        if !self.disposed {
            self.disposed = true;
            self.glow = Vec::new();
            self.target.release();
        }
    }
}
