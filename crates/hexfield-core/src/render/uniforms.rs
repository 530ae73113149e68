// GPU-facing layouts. Field order and padding must match the WGSL structs.

use super::Frame;
use crate::lattice::LatticePoint;

/// Per-instance data for the point-cloud backend.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointInstance {
    pub pos: [f32; 2],
    pub radial: f32,
    pub ring: f32,
}

impl From<&LatticePoint> for PointInstance {
    fn from(p: &LatticePoint) -> Self {
        Self {
            pos: p.pos.to_array(),
            radial: p.radial,
            ring: p.ring as f32,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointUniforms {
    pub resolution: [f32; 2],
    /// Lattice units to device pixels.
    pub scale: f32,
    pub time: f32,
    /// Lattice units, screen aligned.
    pub pointer: [f32; 2],
    pub pointer_active: f32,
    pub idle_angle: f32,
    pub parallax: [f32; 2],
    pub dot_size: f32,
    pub glow_strength: f32,
    pub glow_radius: f32,
    pub ripple_speed: f32,
    pub ripple_freq: f32,
    pub ripple_amount: f32,
    pub twinkle: f32,
    pub spacing: f32,
    pub _pad: [f32; 2],
}

impl PointUniforms {
    pub fn from_frame(frame: &Frame<'_>) -> Self {
        let s = frame.interaction;
        let dpr = frame.surface.dpr;
        Self {
            resolution: [
                frame.surface.physical_width() as f32,
                frame.surface.physical_height() as f32,
            ],
            scale: frame.transform.scale * dpr,
            time: frame.time,
            pointer: s.pointer.map_or([0.0; 2], |p| p.to_array()),
            pointer_active: if s.pointer_active() { 1.0 } else { 0.0 },
            idle_angle: s.idle_angle,
            parallax: s.parallax.to_array(),
            dot_size: frame.profile.dot_size * dpr,
            glow_strength: frame.config.glow_strength,
            glow_radius: s.glow_radius,
            ripple_speed: frame.config.ripple_speed,
            ripple_freq: frame.config.ripple_freq,
            ripple_amount: s.ripple,
            twinkle: s.twinkle,
            spacing: frame.profile.spacing,
            _pad: [0.0; 2],
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TilingUniforms {
    pub resolution: [f32; 2],
    pub time: f32,
    pub hex_size: f32,
    /// Device pixels, origin top-left.
    pub pointer_px: [f32; 2],
    pub line_width: f32,
    pub glow: f32,
    pub parallax: [f32; 2],
    pub shimmer: f32,
    pub breathe_speed: f32,
    pub reduced_motion: f32,
    pub pointer_active: f32,
    pub _pad: [f32; 2],
}

impl TilingUniforms {
    pub fn from_frame(frame: &Frame<'_>) -> Self {
        let s = frame.interaction;
        let res = [
            frame.surface.physical_width() as f32,
            frame.surface.physical_height() as f32,
        ];
        let pointer_px = s.pointer_ndc.map_or([0.0; 2], |ndc| {
            [(ndc.x + 1.0) * 0.5 * res[0], (1.0 - ndc.y) * 0.5 * res[1]]
        });
        Self {
            resolution: res,
            time: frame.time,
            hex_size: frame.config.hex_size,
            pointer_px,
            line_width: frame.config.line_width,
            glow: frame.config.grid_glow,
            parallax: s.parallax.to_array(),
            shimmer: s.shimmer,
            breathe_speed: frame.config.breathe_speed,
            reduced_motion: if frame.profile.motion { 0.0 } else { 1.0 },
            pointer_active: if s.pointer_active() { 1.0 } else { 0.0 },
            _pad: [0.0; 2],
        }
    }
}
