use crate::constants::DEFAULT_HOLLOW_RATIO;
use crate::error::ConfigError;
use crate::profile::PerfMode;
use crate::render::BackendKind;
use serde::{Deserialize, Serialize};

/// Mount-time options. Every key is optional in JSON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HexFieldConfig {
    /// Overrides the profile's ring count.
    pub rings: Option<u32>,
    /// Overrides the profile's dot radius (px).
    pub dot_size: Option<f32>,
    pub hollow_ratio: f32,
    pub glow_strength: f32,
    /// Idle rotation speed in degrees per second.
    pub idle_speed_deg: f32,
    pub shimmer: f32,
    pub ripple_speed: f32,
    pub ripple_freq: f32,
    pub noise_amount: f32,
    pub hex_size: f32,
    pub line_width: f32,
    pub grid_glow: f32,
    pub breathe_speed: f32,
    pub parallax: f32,
    pub perf_mode: PerfMode,
    pub paused: bool,
    pub backend: BackendKind,
    pub freeze_on_reduced_motion: bool,
}

impl Default for HexFieldConfig {
    fn default() -> Self {
        Self {
            rings: None,
            dot_size: None,
            hollow_ratio: DEFAULT_HOLLOW_RATIO,
            glow_strength: 0.8,
            idle_speed_deg: 0.18,
            shimmer: 0.12,
            ripple_speed: 0.7,
            ripple_freq: 0.35,
            noise_amount: 0.25,
            hex_size: 0.9,
            line_width: 0.06,
            grid_glow: 1.2,
            breathe_speed: 0.6,
            parallax: 0.28,
            perf_mode: PerfMode::Auto,
            paused: false,
            backend: BackendKind::PointCloud,
            freeze_on_reduced_motion: false,
        }
    }
}

impl HexFieldConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: HexFieldConfig = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    /// Parse, falling back to defaults on malformed input.
    pub fn from_json_or_default(json: Option<&str>) -> Self {
        match json.map(str::trim).filter(|s| !s.is_empty()) {
            None => Self::default(),
            Some(json) => Self::from_json(json).unwrap_or_else(|err| {
                log::warn!("{err}; using default config");
                Self::default()
            }),
        }
    }

    pub fn idle_speed_rad(&self) -> f32 {
        self.idle_speed_deg.to_radians()
    }

    /// Clamp every field into its usable range.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        clamp_field("hollowRatio", &mut self.hollow_ratio, 0.0, 0.95, defaults.hollow_ratio);
        clamp_field("glowStrength", &mut self.glow_strength, 0.0, 1.0, defaults.glow_strength);
        clamp_field("idleSpeedDeg", &mut self.idle_speed_deg, -45.0, 45.0, defaults.idle_speed_deg);
        clamp_field("shimmer", &mut self.shimmer, 0.0, 1.0, defaults.shimmer);
        clamp_field("rippleSpeed", &mut self.ripple_speed, 0.0, 10.0, defaults.ripple_speed);
        clamp_field("rippleFreq", &mut self.ripple_freq, 0.0, 10.0, defaults.ripple_freq);
        clamp_field("noiseAmount", &mut self.noise_amount, 0.0, 1.0, defaults.noise_amount);
        clamp_field("hexSize", &mut self.hex_size, 0.1, 8.0, defaults.hex_size);
        clamp_field("lineWidth", &mut self.line_width, 0.005, 0.5, defaults.line_width);
        clamp_field("gridGlow", &mut self.grid_glow, 0.0, 4.0, defaults.grid_glow);
        clamp_field("breatheSpeed", &mut self.breathe_speed, 0.0, 4.0, defaults.breathe_speed);
        clamp_field("parallax", &mut self.parallax, 0.0, 1.0, defaults.parallax);
        if let Some(rings) = self.rings {
            if rings > 64 {
                log::warn!("rings {rings} out of range, clamped to 64");
                self.rings = Some(64);
            }
        }
        if let Some(dot) = self.dot_size {
            if !(dot.is_finite() && dot > 0.0) {
                log::warn!("dotSize {dot} ignored");
                self.dot_size = None;
            }
        }
        self
    }
}

fn clamp_field(name: &str, value: &mut f32, min: f32, max: f32, fallback: f32) {
    if !value.is_finite() {
        log::warn!("{name} is not finite, using {fallback}");
        *value = fallback;
    } else if *value < min || *value > max {
        let clamped = value.clamp(min, max);
        log::warn!("{name} {value} out of range, clamped to {clamped}");
        *value = clamped;
    }
}
