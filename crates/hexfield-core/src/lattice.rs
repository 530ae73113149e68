//! Concentric hexagonal lattice generation and the per-instance lattice cache.

use crate::constants::{
    ALPHA_INNER, ALPHA_OUTER, AXIAL_DIRECTIONS, LATTICE_CACHE_CAPACITY, RADIUS_INNER_BONUS,
    SQRT3, SQRT3_HALF,
};
use crate::error::LatticeError;
use crate::math::lerp;
use fnv::FnvHashMap;
use glam::Vec2;
use std::sync::Arc;

/// One renderable dot, in lattice units (before scaling to pixels).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LatticePoint {
    pub pos: Vec2,
    /// Hex distance from the origin; 0 is the center point.
    pub ring: u32,
    /// `ring / rings`, 0 for the center.
    pub radial: f32,
}

/// Styling inputs for the derived per-point attributes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DotStyle {
    pub dot_size: f32,
    pub alpha_inner: f32,
    pub alpha_outer: f32,
}

impl DotStyle {
    pub fn new(dot_size: f32) -> Self {
        Self {
            dot_size,
            alpha_inner: ALPHA_INNER,
            alpha_outer: ALPHA_OUTER,
        }
    }

    /// Inner rings bright, outer rings dim; linear in the radial fraction.
    #[inline]
    pub fn base_alpha(&self, p: &LatticePoint) -> f32 {
        lerp(self.alpha_inner, self.alpha_outer, p.radial)
    }

    /// Inner rings drawn fractionally larger.
    #[inline]
    pub fn base_radius(&self, p: &LatticePoint) -> f32 {
        self.dot_size + (1.0 - p.radial) * RADIUS_INNER_BONUS
    }
}

/// Hex distance of axial `(q, r)` from the origin.
#[inline]
pub fn hex_distance(q: i32, r: i32) -> u32 {
    (q.unsigned_abs() + r.unsigned_abs() + (q + r).unsigned_abs()) / 2
}

#[inline]
pub fn axial_to_cartesian(q: i32, r: i32, spacing: f32) -> Vec2 {
    let (q, r) = (q as f32, r as f32);
    Vec2::new(spacing * (SQRT3 * q + SQRT3_HALF * r), spacing * (1.5 * r))
}

/// Number of innermost rings left out for a given ring count and ratio.
#[inline]
pub fn hollow_rings(rings: u32, hollow_ratio: f32) -> u32 {
    (rings as f32 * hollow_ratio).round().max(0.0) as u32
}

/// Points on ring `k`: 1 for the center, `6k` otherwise.
#[inline]
pub fn ring_len(k: u32) -> usize {
    if k == 0 {
        1
    } else {
        6 * k as usize
    }
}

/// Expected size of `build_lattice(rings, _, hollow_ratio)`.
pub fn lattice_len(rings: u32, hollow_ratio: f32) -> usize {
    let hollow = hollow_rings(rings, hollow_ratio);
    let first = if hollow == 0 { 0 } else { hollow + 1 };
    (first..=rings).map(ring_len).sum()
}

/// Build concentric hex rings around the origin.
///
/// Output order is ring-major, then side-major, then step-major, and depends
/// only on the three arguments.
pub fn build_lattice(
    rings: u32,
    spacing: f32,
    hollow_ratio: f32,
) -> Result<Vec<LatticePoint>, LatticeError> {
    if !(spacing.is_finite() && spacing > 0.0) {
        return Err(LatticeError::InvalidSpacing(spacing));
    }
    if !(0.0..1.0).contains(&hollow_ratio) {
        return Err(LatticeError::InvalidHollowRatio(hollow_ratio));
    }

    let hollow = hollow_rings(rings, hollow_ratio);
    let mut points = Vec::with_capacity(lattice_len(rings, hollow_ratio));
    if hollow == 0 {
        points.push(LatticePoint {
            pos: Vec2::ZERO,
            ring: 0,
            radial: 0.0,
        });
    }

    for k in (hollow + 1)..=rings {
        let radial = k as f32 / rings as f32;
        let (mut q, mut r) = (k as i32, 0i32);
        for (dq, dr) in AXIAL_DIRECTIONS {
            for _ in 0..k {
                points.push(LatticePoint {
                    pos: axial_to_cartesian(q, r, spacing),
                    ring: k,
                    radial,
                });
                q += dq;
                r += dr;
            }
        }
    }
    Ok(points)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LatticeKey {
    pub rings: u32,
    spacing_bits: u32,
    hollow_bits: u32,
}

impl LatticeKey {
    pub fn new(rings: u32, spacing: f32, hollow_ratio: f32) -> Self {
        // -0.0 and 0.0 build the same lattice
        let hollow_ratio = if hollow_ratio == 0.0 { 0.0 } else { hollow_ratio };
        Self {
            rings,
            spacing_bits: spacing.to_bits(),
            hollow_bits: hollow_ratio.to_bits(),
        }
    }

    pub fn spacing(&self) -> f32 {
        f32::from_bits(self.spacing_bits)
    }

    pub fn hollow_ratio(&self) -> f32 {
        f32::from_bits(self.hollow_bits)
    }
}

/// Bounded least-recently-used cache of built lattices.
///
/// Owned by a single mounted instance; hits hand out the same shared slice.
pub struct LatticeCache {
    entries: FnvHashMap<LatticeKey, (Arc<[LatticePoint]>, u64)>,
    capacity: usize,
    clock: u64,
}

impl Default for LatticeCache {
    fn default() -> Self {
        Self::new(LATTICE_CACHE_CAPACITY)
    }
}

impl LatticeCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: FnvHashMap::default(),
            capacity: capacity.max(1),
            clock: 0,
        }
    }

    pub fn get_or_build(
        &mut self,
        rings: u32,
        spacing: f32,
        hollow_ratio: f32,
    ) -> Result<Arc<[LatticePoint]>, LatticeError> {
        let key = LatticeKey::new(rings, spacing, hollow_ratio);
        self.clock += 1;
        if let Some((points, stamp)) = self.entries.get_mut(&key) {
            *stamp = self.clock;
            return Ok(points.clone());
        }

        let points: Arc<[LatticePoint]> = build_lattice(rings, spacing, hollow_ratio)?.into();
        if self.entries.len() >= self.capacity {
            self.evict_oldest();
        }
        self.entries.insert(key, (points.clone(), self.clock));
        Ok(points)
    }

    pub fn contains(&self, rings: u32, spacing: f32, hollow_ratio: f32) -> bool {
        self.entries
            .contains_key(&LatticeKey::new(rings, spacing, hollow_ratio))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn evict_oldest(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, (_, stamp))| *stamp)
            .map(|(key, _)| *key);
        if let Some(key) = oldest {
            self.entries.remove(&key);
        }
    }
}
