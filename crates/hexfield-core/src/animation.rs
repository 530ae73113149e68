//! Animation clock, pointer easing and the per-frame focus set.

use crate::config::HexFieldConfig;
use crate::constants::{PARALLAX_YAW, POINTER_EASING};
use crate::lattice::LatticePoint;
use crate::math::{dist_sq, ease_toward, glow_falloff};
use crate::profile::PerformanceProfile;
use glam::Vec2;
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Pointer position in the two frames the renderers need.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerSample {
    /// Lattice units relative to the lattice center, unrotated.
    pub lattice: Vec2,
    /// Normalized device coordinates of the container, +y up.
    pub ndc: Vec2,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameInput {
    pub pointer: Option<PointerSample>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FocusPoint {
    /// Index into the lattice slice.
    pub index: usize,
    pub dist_sq: f32,
    pub glow: f32,
}

/// Motion amounts taken from the mount config.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionTuning {
    pub idle_speed_rad: f32,
    pub parallax: f32,
    pub shimmer: f32,
    pub twinkle: f32,
}

impl From<&HexFieldConfig> for MotionTuning {
    fn from(config: &HexFieldConfig) -> Self {
        Self {
            idle_speed_rad: config.idle_speed_rad(),
            parallax: config.parallax,
            shimmer: config.shimmer,
            twinkle: config.noise_amount,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct InteractionState {
    pub elapsed: f32,
    pub pointer: Option<Vec2>,
    pub pointer_ndc: Option<Vec2>,
    /// Smoothed pointer in NDC; drifts back to the center when the pointer leaves.
    pub eased: Vec2,
    pub parallax: Vec2,
    pub idle_angle: f32,
    pub shimmer: f32,
    pub ripple: f32,
    pub twinkle: f32,
    pub breathe: f32,
    /// Nearest sampled points, closest first.
    pub focus: SmallVec<[FocusPoint; 64]>,
    pub glow_radius: f32,
}

impl Default for InteractionState {
    fn default() -> Self {
        Self {
            elapsed: 0.0,
            pointer: None,
            pointer_ndc: None,
            eased: Vec2::ZERO,
            parallax: Vec2::ZERO,
            idle_angle: 0.0,
            shimmer: 0.0,
            ripple: 0.0,
            twinkle: 0.0,
            breathe: 0.0,
            focus: SmallVec::new(),
            glow_radius: 0.0,
        }
    }
}

impl InteractionState {
    pub fn pointer_active(&self) -> bool {
        self.pointer.is_some()
    }

    /// Glow for one lattice index, 0 when it is not in the focus set.
    pub fn glow_for(&self, index: usize) -> f32 {
        self.focus
            .iter()
            .find(|f| f.index == index)
            .map_or(0.0, |f| f.glow)
    }
}

pub struct AnimationController {
    state: InteractionState,
    tuning: MotionTuning,
    profile: PerformanceProfile,
    pointer_seen: bool,
}

impl AnimationController {
    pub fn new(tuning: MotionTuning, profile: PerformanceProfile) -> Self {
        Self {
            state: InteractionState::default(),
            tuning,
            profile,
            pointer_seen: false,
        }
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn profile(&self) -> &PerformanceProfile {
        &self.profile
    }

    pub fn set_profile(&mut self, profile: PerformanceProfile) {
        self.profile = profile;
    }

    /// Forget the clock and pointer history, as on a fresh mount.
    pub fn reset(&mut self) {
        self.state = InteractionState::default();
        self.pointer_seen = false;
    }

    /// Advance by `dt` seconds. Never called while paused.
    pub fn tick(
        &mut self,
        dt: f32,
        input: &FrameInput,
        lattice: &[LatticePoint],
    ) -> &InteractionState {
        let motion = self.profile.motion;
        let s = &mut self.state;
        s.elapsed += dt.max(0.0);

        s.pointer = input.pointer.map(|p| p.lattice);
        s.pointer_ndc = input.pointer.map(|p| p.ndc);

        let target = s.pointer_ndc.unwrap_or(Vec2::ZERO);
        if !self.pointer_seen && s.pointer_ndc.is_some() {
            self.pointer_seen = true;
            s.eased = target;
        } else {
            s.eased = ease_toward(s.eased, target, POINTER_EASING);
        }
        s.parallax = s.eased * self.tuning.parallax;

        let gate = if motion { 1.0 } else { 0.0 };
        s.idle_angle = gate * (self.tuning.idle_speed_rad * s.elapsed + s.eased.x * PARALLAX_YAW);
        s.shimmer = gate * self.tuning.shimmer;
        s.twinkle = gate * self.tuning.twinkle;
        s.ripple = gate;
        s.breathe = gate;

        s.glow_radius = self.profile.glow_radius();
        s.focus.clear();
        if let Some(pointer) = s.pointer {
            let local = Vec2::from_angle(-s.idle_angle).rotate(pointer);
            collect_focus(
                &mut s.focus,
                lattice,
                local,
                self.profile.sample_stride,
                self.profile.focus_count,
                s.glow_radius,
            );
        }
        &self.state
    }
}

struct HeapEntry {
    dist_sq: f32,
    index: usize,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.dist_sq
            .total_cmp(&other.dist_sq)
            .then(self.index.cmp(&other.index))
    }
}

/// Keep the `count` sampled points closest to `pointer` with a bounded max-heap.
pub fn collect_focus(
    out: &mut SmallVec<[FocusPoint; 64]>,
    lattice: &[LatticePoint],
    pointer: Vec2,
    stride: usize,
    count: usize,
    glow_radius: f32,
) {
    out.clear();
    if count == 0 {
        return;
    }
    let mut heap: BinaryHeap<HeapEntry> = BinaryHeap::with_capacity(count + 1);
    for (index, p) in lattice.iter().enumerate().step_by(stride.max(1)) {
        let d = dist_sq(p.pos, pointer);
        if heap.len() < count {
            heap.push(HeapEntry { dist_sq: d, index });
        } else if heap.peek().is_some_and(|top| d < top.dist_sq) {
            heap.pop();
            heap.push(HeapEntry { dist_sq: d, index });
        }
    }
    out.extend(heap.into_sorted_vec().into_iter().map(|e| FocusPoint {
        index: e.index,
        dist_sq: e.dist_sq,
        glow: glow_falloff(e.dist_sq.sqrt(), glow_radius),
    }));
}
