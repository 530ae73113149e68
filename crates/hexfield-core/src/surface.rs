use crate::constants::{LATTICE_FILL, MAX_DEVICE_PIXEL_RATIO, SQRT3};
use glam::Vec2;

/// Drawing surface size: container CSS size and the (capped) device pixel ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceSize {
    pub css_width: f32,
    pub css_height: f32,
    pub dpr: f32,
}

impl SurfaceSize {
    pub fn new(css_width: f32, css_height: f32, dpr: f32) -> Self {
        let dpr = if dpr.is_finite() && dpr > 0.0 {
            dpr.min(MAX_DEVICE_PIXEL_RATIO)
        } else {
            1.0
        };
        Self {
            css_width: sanitize_extent(css_width),
            css_height: sanitize_extent(css_height),
            dpr,
        }
    }

    /// Backing store width in device pixels, never below 1.
    pub fn physical_width(&self) -> u32 {
        ((self.css_width * self.dpr).round() as u32).max(1)
    }

    pub fn physical_height(&self) -> u32 {
        ((self.css_height * self.dpr).round() as u32).max(1)
    }

    /// True when the container has not been laid out yet.
    pub fn is_degenerate(&self) -> bool {
        self.css_width < 1.0 || self.css_height < 1.0
    }

    pub fn css_center(&self) -> Vec2 {
        Vec2::new(self.css_width, self.css_height) * 0.5
    }

    pub fn min_dimension(&self) -> f32 {
        self.css_width.min(self.css_height)
    }

    /// CSS pixel position to normalized device coordinates (+y up).
    pub fn css_to_ndc(&self, css: Vec2) -> Vec2 {
        let w = self.css_width.max(1.0);
        let h = self.css_height.max(1.0);
        Vec2::new(css.x / w * 2.0 - 1.0, 1.0 - css.y / h * 2.0)
    }
}

fn sanitize_extent(v: f32) -> f32 {
    if v.is_finite() {
        v.max(0.0)
    } else {
        0.0
    }
}

/// Lattice units to CSS pixels: centered and uniformly scaled.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LatticeTransform {
    pub center: Vec2,
    pub scale: f32,
}

impl LatticeTransform {
    /// Scale so the outer ring's corners, `sqrt(3) * rings * spacing` out,
    /// touch `LATTICE_FILL / 2` of the smaller container side.
    pub fn fit(surface: &SurfaceSize, rings: u32, spacing: f32) -> Self {
        let extent = SQRT3 * rings.max(1) as f32 * spacing;
        let scale = if extent > 0.0 {
            surface.min_dimension() * LATTICE_FILL * 0.5 / extent
        } else {
            1.0
        };
        Self {
            center: surface.css_center(),
            scale,
        }
    }

    #[inline]
    pub fn to_css(&self, lattice: Vec2) -> Vec2 {
        self.center + lattice * self.scale
    }

    #[inline]
    pub fn to_lattice(&self, css: Vec2) -> Vec2 {
        if self.scale == 0.0 {
            return Vec2::ZERO;
        }
        (css - self.center) / self.scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dpr_is_capped_and_physical_size_clamped() {
        let s = SurfaceSize::new(0.2, 300.0, 3.0);
        assert_eq!(s.dpr, MAX_DEVICE_PIXEL_RATIO);
        assert_eq!(s.physical_width(), 1);
        assert_eq!(s.physical_height(), 600);
        assert!(s.is_degenerate());
    }

    #[test]
    fn bogus_inputs_fall_back() {
        let s = SurfaceSize::new(f32::NAN, -5.0, 0.0);
        assert_eq!(s.dpr, 1.0);
        assert_eq!(s.css_width, 0.0);
        assert_eq!(s.css_height, 0.0);
        assert_eq!(s.physical_width(), 1);
    }

    #[test]
    fn ndc_corners() {
        let s = SurfaceSize::new(200.0, 100.0, 1.0);
        assert_eq!(s.css_to_ndc(Vec2::ZERO), Vec2::new(-1.0, 1.0));
        assert_eq!(s.css_to_ndc(Vec2::new(200.0, 100.0)), Vec2::new(1.0, -1.0));
        assert_eq!(s.css_to_ndc(Vec2::new(100.0, 50.0)), Vec2::ZERO);
    }

    #[test]
    fn transform_fits_lattice_inside_fill_circle() {
        let s = SurfaceSize::new(1000.0, 400.0, 1.0);
        let t = LatticeTransform::fit(&s, 13, 22.0);
        let lattice = crate::lattice::build_lattice(13, 22.0, 0.0).unwrap();
        let reach = lattice
            .iter()
            .map(|p| (t.to_css(p.pos) - t.center).length())
            .fold(0.0f32, f32::max);
        let limit = 400.0 * LATTICE_FILL * 0.5;
        assert!(reach <= limit + 1e-2, "{reach} > {limit}");
        assert!(reach > limit - 0.1);
        let back = t.to_lattice(t.to_css(Vec2::new(3.0, -7.0)));
        assert!((back - Vec2::new(3.0, -7.0)).length() < 1e-4);
    }
}
