//! Property-based invariant tests for lattice generation and the focus set.
//!
//! Verifies:
//! 1. Cardinality matches `lattice_len` for any rings / hollow ratio
//! 2. No point sits inside the hollow radius
//! 3. Every ring present has exactly 6k points
//! 4. Identical arguments give identical output
//! 5. Focus set never exceeds min(focus_count, sampled points) and is sorted
//! 6. Glow is within [0, 1] and non-increasing with distance
//! 7. Lattice cache never grows past capacity
//! 8. Every point's ring tag equals its hex distance, positions are
//!    unique, and the lattice is centred on the origin

use glam::Vec2;
use hexfield_core::math::{glow_falloff, smoothstep};
use hexfield_core::*;
use proptest::prelude::*;
use smallvec::SmallVec;
use std::collections::HashSet;

/// Recover integer axial coordinates from a position built with `spacing`.
fn to_axial(pos: Vec2, spacing: f32) -> (i32, i32) {
    let r = pos.y / (1.5 * spacing);
    let q = (pos.x / spacing - SQRT3_HALF * r) / SQRT3;
    (q.round() as i32, r.round() as i32)
}

fn arb_hollow() -> impl Strategy<Value = f32> {
    prop_oneof![Just(0.0f32), Just(DEFAULT_HOLLOW_RATIO), 0.0f32..0.95]
}

proptest! {
    #[test]
    fn cardinality_matches_closed_form(
        rings in 0u32..24,
        spacing in 0.5f32..40.0,
        hollow in arb_hollow(),
    ) {
        let pts = build_lattice(rings, spacing, hollow).unwrap();
        prop_assert_eq!(pts.len(), lattice_len(rings, hollow));
        if hollow == 0.0 {
            prop_assert_eq!(pts.len() as u32, 1 + 3 * rings * (rings + 1));
        }
    }

    #[test]
    fn hollow_interior_is_empty(rings in 1u32..24, hollow in 0.05f32..0.95) {
        let h = hollow_rings(rings, hollow);
        let pts = build_lattice(rings, 1.0, hollow).unwrap();
        prop_assert!(pts.iter().all(|p| h == 0 || p.ring > h));
    }

    #[test]
    fn rings_have_six_k_points(rings in 1u32..20) {
        let pts = build_lattice(rings, 3.0, 0.0).unwrap();
        for k in 1..=rings {
            prop_assert_eq!(pts.iter().filter(|p| p.ring == k).count(), 6 * k as usize);
        }
    }

    #[test]
    fn generation_is_deterministic(
        rings in 0u32..16,
        spacing in 0.5f32..40.0,
        hollow in arb_hollow(),
    ) {
        prop_assert_eq!(
            build_lattice(rings, spacing, hollow).unwrap(),
            build_lattice(rings, spacing, hollow).unwrap()
        );
    }

    #[test]
    fn focus_set_is_bounded_and_sorted(
        rings in 0u32..16,
        stride in 1usize..4,
        count in 0usize..80,
        px in -300.0f32..300.0,
        py in -300.0f32..300.0,
    ) {
        let lattice = build_lattice(rings, 18.0, 0.0).unwrap();
        let mut out = SmallVec::new();
        collect_focus(&mut out, &lattice, Vec2::new(px, py), stride, count, 99.0);
        let sampled = lattice.len().div_ceil(stride);
        prop_assert!(out.len() <= count.min(sampled));
        prop_assert_eq!(out.len(), count.min(sampled));
        prop_assert!(out.windows(2).all(|w| w[0].dist_sq <= w[1].dist_sq));
        prop_assert!(out.iter().all(|f| f.index % stride == 0));
    }

    #[test]
    fn glow_is_monotone(radius in 0.1f32..200.0, a in 0.0f32..300.0, b in 0.0f32..300.0) {
        let (near, far) = if a <= b { (a, b) } else { (b, a) };
        let g_near = glow_falloff(near, radius);
        let g_far = glow_falloff(far, radius);
        prop_assert!((0.0..=1.0).contains(&g_near));
        prop_assert!(g_near + 1e-6 >= g_far);
        prop_assert!(smoothstep(0.0, radius, radius - far) == g_far);
    }

    #[test]
    fn cache_respects_capacity(keys in proptest::collection::vec((1u32..10, 1u8..4), 1..40)) {
        let mut cache = LatticeCache::new(3);
        for (rings, s) in keys {
            cache.get_or_build(rings, s as f32 * 5.0, 0.0).unwrap();
            prop_assert!(cache.len() <= 3);
        }
    }

    #[test]
    fn rings_are_concentric_hexagons(
        rings in 0u32..20,
        spacing in 0.5f32..40.0,
        hollow in arb_hollow(),
    ) {
        let pts = build_lattice(rings, spacing, hollow).unwrap();
        let mut seen = HashSet::new();
        for p in &pts {
            let (q, r) = to_axial(p.pos, spacing);
            prop_assert!((axial_to_cartesian(q, r, spacing) - p.pos).length() < 1e-3 * spacing);
            prop_assert_eq!(hex_distance(q, r), p.ring);
            prop_assert!(seen.insert((q, r)), "duplicate axial ({}, {})", q, r);
        }
        if !pts.is_empty() {
            let centroid = pts.iter().map(|p| p.pos).sum::<Vec2>() / pts.len() as f32;
            prop_assert!(centroid.length() < 1e-3 * spacing * (rings.max(1) as f32));
        }
    }
}
