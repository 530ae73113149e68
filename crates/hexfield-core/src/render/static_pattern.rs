use super::{BackendKind, DotCanvas, Frame, RendererBackend};
use crate::constants::{BACKGROUND_COLOR, DOT_COLOR, STATIC_MIN_OPACITY, STATIC_OPACITY_FALLOFF};
use crate::error::RenderError;
use crate::lattice::{DotStyle, LatticePoint};
use crate::profile::PerformanceProfile;
use crate::surface::SurfaceSize;

/// Last rung of the degradation ladder: the lattice drawn once, no animation.
pub struct StaticRenderer<C: DotCanvas> {
    target: C,
    style: DotStyle,
    dirty: bool,
    disposed: bool,
}

impl<C: DotCanvas> StaticRenderer<C> {
    pub fn new(target: C) -> Self {
        Self {
            target,
            style: DotStyle::new(0.0),
            dirty: true,
            disposed: false,
        }
    }

    pub fn target(&self) -> &C {
        &self.target
    }

    /// True when the next frame will redraw.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

#[inline]
pub fn static_opacity(radial: f32) -> f32 {
    (1.0 - radial * STATIC_OPACITY_FALLOFF).max(STATIC_MIN_OPACITY)
}

impl<C: DotCanvas> RendererBackend for StaticRenderer<C> {
    fn kind(&self) -> BackendKind {
        BackendKind::Static
    }

    fn upload_lattice(&mut self, _lattice: &[LatticePoint], profile: &PerformanceProfile) {
        self.style = DotStyle::new(profile.dot_size);
        self.dirty = true;
    }

    fn resize(&mut self, _surface: &SurfaceSize) {
        self.dirty = true;
    }

    fn render_frame(&mut self, frame: &Frame<'_>) -> Result<(), RenderError> {
        if self.disposed {
            return Err(RenderError::Disposed);
        }
        if !self.dirty {
            return Ok(());
        }
        self.target.begin_frame(frame.surface, BACKGROUND_COLOR);
        for p in frame.lattice {
            let center = frame.transform.to_css(p.pos);
            let rgba = [DOT_COLOR[0], DOT_COLOR[1], DOT_COLOR[2], static_opacity(p.radial)];
            self.target.fill_dot(center, self.style.dot_size, rgba);
        }
        self.target.end_frame();
        self.dirty = false;
        Ok(())
    }

    fn dispose(&mut self) {
        if !self.disposed {
            self.disposed = true;
            self.target.release();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opacity_fades_outward_with_floor() {
        assert_eq!(static_opacity(0.0), 1.0);
        assert!((static_opacity(0.5) - 0.6).abs() < 1e-6);
        assert!((static_opacity(1.0) - 0.2).abs() < 1e-6);
        assert_eq!(static_opacity(5.0), STATIC_MIN_OPACITY);
    }
}
