//! Renderer backends share one contract; the lifecycle owns exactly one at a time.

mod canvas;
#[cfg(feature = "gpu")]
pub mod gpu;
mod static_pattern;
mod uniforms;

pub use canvas::*;
pub use static_pattern::*;
pub use uniforms::*;

use crate::animation::InteractionState;
use crate::config::HexFieldConfig;
use crate::error::RenderError;
use crate::lattice::LatticePoint;
use crate::profile::PerformanceProfile;
use crate::surface::{LatticeTransform, SurfaceSize};
use glam::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BackendKind {
    #[serde(rename = "tiling", alias = "grid")]
    HexTiling,
    #[default]
    #[serde(rename = "points", alias = "neura")]
    PointCloud,
    #[serde(rename = "canvas")]
    Canvas2d,
    #[serde(rename = "static")]
    Static,
}

impl BackendKind {
    pub fn name(self) -> &'static str {
        match self {
            BackendKind::HexTiling => "tiling",
            BackendKind::PointCloud => "points",
            BackendKind::Canvas2d => "canvas",
            BackendKind::Static => "static",
        }
    }

    /// Next rung down when this backend cannot be created or keeps failing.
    pub fn fallback(self) -> Option<BackendKind> {
        match self {
            BackendKind::HexTiling | BackendKind::PointCloud => Some(BackendKind::Canvas2d),
            BackendKind::Canvas2d => Some(BackendKind::Static),
            BackendKind::Static => None,
        }
    }

    /// This kind followed by every fallback, ending in `Static`.
    pub fn ladder(self) -> impl Iterator<Item = BackendKind> {
        std::iter::successors(Some(self), |k| k.fallback())
    }

    pub fn is_gpu(self) -> bool {
        matches!(self, BackendKind::HexTiling | BackendKind::PointCloud)
    }
}

/// Everything a backend needs to draw one frame.
pub struct Frame<'a> {
    pub lattice: &'a [LatticePoint],
    pub interaction: &'a InteractionState,
    pub profile: &'a PerformanceProfile,
    pub surface: &'a SurfaceSize,
    pub transform: &'a LatticeTransform,
    pub config: &'a HexFieldConfig,
    pub time: f32,
}

pub trait RendererBackend {
    fn kind(&self) -> BackendKind;

    /// Called whenever the lattice or the profile changes.
    fn upload_lattice(&mut self, lattice: &[LatticePoint], profile: &PerformanceProfile);

    fn resize(&mut self, surface: &SurfaceSize);

    fn render_frame(&mut self, frame: &Frame<'_>) -> Result<(), RenderError>;

    /// Release every resource. Called at most once by the lifecycle.
    fn dispose(&mut self);
}

impl<B: RendererBackend + ?Sized> RendererBackend for Box<B> {
    fn kind(&self) -> BackendKind {
        (**self).kind()
    }

    fn upload_lattice(&mut self, lattice: &[LatticePoint], profile: &PerformanceProfile) {
        (**self).upload_lattice(lattice, profile)
    }

    fn resize(&mut self, surface: &SurfaceSize) {
        (**self).resize(surface)
    }

    fn render_frame(&mut self, frame: &Frame<'_>) -> Result<(), RenderError> {
        (**self).render_frame(frame)
    }

    fn dispose(&mut self) {
        (**self).dispose()
    }
}

/// Immediate-mode drawing target for the CPU backends. Positions are CSS pixels.
pub trait DotCanvas {
    fn begin_frame(&mut self, surface: &SurfaceSize, background: [f32; 4]);

    fn fill_dot(&mut self, center: Vec2, radius: f32, rgba: [f32; 4]);

    fn end_frame(&mut self) {}

    /// Drop any platform resources held by the target.
    fn release(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_ladder_ends_in_static() {
        for kind in [
            BackendKind::HexTiling,
            BackendKind::PointCloud,
            BackendKind::Canvas2d,
            BackendKind::Static,
        ] {
            assert_eq!(kind.ladder().last(), Some(BackendKind::Static));
            assert_eq!(kind.ladder().next(), Some(kind));
        }
        let tiling: Vec<_> = BackendKind::HexTiling.ladder().collect();
        assert_eq!(
            tiling,
            vec![BackendKind::HexTiling, BackendKind::Canvas2d, BackendKind::Static]
        );
    }

    #[test]
    fn names_round_trip_through_serde() {
        for kind in [
            BackendKind::HexTiling,
            BackendKind::PointCloud,
            BackendKind::Canvas2d,
            BackendKind::Static,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.name()));
        }
        let grid: BackendKind = serde_json::from_str("\"grid\"").unwrap();
        assert_eq!(grid, BackendKind::HexTiling);
    }
}
