//! Viewport and device driven performance tiers.

use serde::{Deserialize, Serialize};

pub const NARROW_BREAKPOINT_PX: f32 = 480.0;
pub const MEDIUM_BREAKPOINT_PX: f32 = 900.0;
pub const LOW_POWER_CORES: u32 = 2;
pub const LOW_POWER_MEMORY_GB: f32 = 2.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PerfTier {
    Narrow,
    Medium,
    Wide,
}

/// Config-level spelling of the tier override.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerfMode {
    #[default]
    Auto,
    Low,
    #[serde(alias = "med")]
    Medium,
    #[serde(alias = "hi")]
    High,
}

impl PerfMode {
    pub fn tier(self) -> Option<PerfTier> {
        match self {
            PerfMode::Auto => None,
            PerfMode::Low => Some(PerfTier::Narrow),
            PerfMode::Medium => Some(PerfTier::Medium),
            PerfMode::High => Some(PerfTier::Wide),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PerformanceProfile {
    pub tier: PerfTier,
    pub rings: u32,
    pub dot_size: f32,
    pub spacing: f32,
    /// Only every n-th point is considered for the pointer focus set.
    pub sample_stride: usize,
    pub focus_count: usize,
    /// False under reduced motion: no idle rotation, shimmer, ripple or breathing.
    pub motion: bool,
}

impl PerformanceProfile {
    pub fn for_tier(tier: PerfTier, motion: bool) -> Self {
        let (rings, dot_size, spacing, sample_stride, focus_count) = match tier {
            PerfTier::Narrow => (7, 2.5, 14.0, 3, 35),
            PerfTier::Medium => (10, 3.0, 18.0, 2, 45),
            PerfTier::Wide => (13, 3.5, 22.0, 1, 60),
        };
        Self {
            tier,
            rings,
            dot_size,
            spacing,
            sample_stride,
            focus_count,
            motion,
        }
    }

    /// Apply explicit ring count / dot size from the mount config.
    pub fn with_overrides(mut self, rings: Option<u32>, dot_size: Option<f32>) -> Self {
        if let Some(rings) = rings {
            self.rings = rings;
        }
        if let Some(dot_size) = dot_size.filter(|d| d.is_finite() && *d > 0.0) {
            self.dot_size = dot_size;
        }
        self
    }

    pub fn glow_radius(&self) -> f32 {
        self.spacing * crate::constants::GLOW_RADIUS_MULTIPLIER
    }
}

/// Hardware hints reported by the host; unknown values never count as low power.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DeviceHints {
    pub cores: Option<u32>,
    pub memory_gb: Option<f32>,
}

impl DeviceHints {
    pub fn is_low_power(&self) -> bool {
        self.cores.is_some_and(|c| c <= LOW_POWER_CORES)
            || self.memory_gb.is_some_and(|m| m <= LOW_POWER_MEMORY_GB)
    }
}

pub fn tier_for_width(viewport_width: f32) -> PerfTier {
    if viewport_width < NARROW_BREAKPOINT_PX {
        PerfTier::Narrow
    } else if viewport_width < MEDIUM_BREAKPOINT_PX {
        PerfTier::Medium
    } else {
        PerfTier::Wide
    }
}

/// Pick the active profile. An explicit override beats low power, which beats width.
pub fn select_profile(
    viewport_width: f32,
    override_tier: Option<PerfTier>,
    reduced_motion: bool,
    low_power: bool,
) -> PerformanceProfile {
    let tier = match override_tier {
        Some(tier) => tier,
        None if low_power => PerfTier::Narrow,
        None => tier_for_width(viewport_width),
    };
    PerformanceProfile::for_tier(tier, !reduced_motion)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breakpoints() {
        assert_eq!(tier_for_width(0.0), PerfTier::Narrow);
        assert_eq!(tier_for_width(479.9), PerfTier::Narrow);
        assert_eq!(tier_for_width(480.0), PerfTier::Medium);
        assert_eq!(tier_for_width(899.0), PerfTier::Medium);
        assert_eq!(tier_for_width(900.0), PerfTier::Wide);
    }

    #[test]
    fn override_beats_low_power() {
        let p = select_profile(300.0, Some(PerfTier::Wide), false, true);
        assert_eq!(p.tier, PerfTier::Wide);
        assert_eq!(p.rings, 13);
    }

    #[test]
    fn reduced_motion_keeps_tier() {
        let p = select_profile(1600.0, None, true, false);
        assert_eq!(p.tier, PerfTier::Wide);
        assert!(!p.motion);
    }

    #[test]
    fn device_hints() {
        assert!(!DeviceHints::default().is_low_power());
        assert!(DeviceHints { cores: Some(2), memory_gb: None }.is_low_power());
        assert!(DeviceHints { cores: Some(8), memory_gb: Some(1.0) }.is_low_power());
        assert!(!DeviceHints { cores: Some(8), memory_gb: Some(8.0) }.is_low_power());
    }

    #[test]
    fn overrides_ignore_invalid_dot_size() {
        let p = PerformanceProfile::for_tier(PerfTier::Medium, true)
            .with_overrides(Some(4), Some(-1.0));
        assert_eq!(p.rings, 4);
        assert_eq!(p.dot_size, 3.0);
    }

    #[test]
    fn perf_mode_parses_aliases() {
        let m: PerfMode = serde_json::from_str("\"hi\"").unwrap();
        assert_eq!(m, PerfMode::High);
        let m: PerfMode = serde_json::from_str("\"med\"").unwrap();
        assert_eq!(m.tier(), Some(PerfTier::Medium));
        assert_eq!(PerfMode::Auto.tier(), None);
    }
}
