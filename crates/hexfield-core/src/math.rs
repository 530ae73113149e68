//! Small scalar helpers shared by the CPU renderers and mirrored in WGSL.

use glam::Vec2;

/// Cubic Hermite interpolation `3t² − 2t³` of `x` between the two edges.
///
/// Mirrors the WGSL builtin: `edge0 > edge1` yields a falling curve.
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let span = edge1 - edge0;
    if span == 0.0 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / span).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
pub fn dist_sq(a: Vec2, b: Vec2) -> f32 {
    (a - b).length_squared()
}

/// Pointer glow: 1 at the pointer, smoothly 0 at `radius` and beyond.
#[inline]
pub fn glow_falloff(distance: f32, radius: f32) -> f32 {
    if radius <= 0.0 {
        return 0.0;
    }
    smoothstep(0.0, radius, radius - distance)
}

/// One step of exponential smoothing toward `target`.
#[inline]
pub fn ease_toward(current: Vec2, target: Vec2, factor: f32) -> Vec2 {
    current + (target - current) * factor
}

/// Stateless hash in `[0, 1)`; same constants as `hash2` in the shaders.
#[inline]
pub fn hash2(p: Vec2) -> f32 {
    let q = fract(p * 0.318_309_9 + Vec2::new(0.71, 0.113));
    fract1(23.3 * q.dot(q + Vec2::splat(0.37)))
}

#[inline]
fn fract(v: Vec2) -> Vec2 {
    v - v.floor()
}

#[inline]
fn fract1(x: f32) -> f32 {
    x - x.floor()
}
