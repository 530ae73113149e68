// Shared visual and interaction tuning constants used by every frontend.

// Lattice geometry
pub const SQRT3: f32 = 1.732_050_8;
pub const SQRT3_HALF: f32 = SQRT3 * 0.5;
// Side directions for a ring walk that starts at axial (k, 0); each side is k steps.
pub const AXIAL_DIRECTIONS: [(i32, i32); 6] = [(-1, 1), (-1, 0), (0, -1), (1, -1), (1, 0), (0, 1)];
pub const DEFAULT_HOLLOW_RATIO: f32 = 0.18; // inner hole as a share of the ring count

// Dot styling (alpha in 0..1)
pub const ALPHA_INNER: f32 = 230.0 / 255.0;
pub const ALPHA_OUTER: f32 = 70.0 / 255.0;
pub const RADIUS_INNER_BONUS: f32 = 0.65; // extra px on the innermost ring
pub const ALPHA_CULL: f32 = 0.5 / 255.0; // below this a dot would round to fully transparent
pub const DOT_COLOR: [f32; 3] = [130.0 / 255.0, 1.0, 250.0 / 255.0];
pub const BACKGROUND_COLOR: [f32; 4] = [10.0 / 255.0, 10.0 / 255.0, 10.0 / 255.0, 1.0];

// Shimmer (canvas backend)
pub const SHIMMER_RATE: f32 = 0.9; // rad/sec
pub const SHIMMER_RING_PHASE: f32 = 0.6; // rad per ring
pub const SHIMMER_RADIUS_GAIN: f32 = 0.6;
pub const SHIMMER_ALPHA_GAIN: f32 = 18.0 / 255.0;

// Focus glow
pub const GLOW_RADIUS_MULTIPLIER: f32 = 5.5; // glow radius in lattice spacings
pub const GLOW_ALPHA_GAIN: f32 = 170.0 / 255.0;
pub const GLOW_RADIUS_GAIN: f32 = 1.2;

// Pointer easing and parallax
pub const POINTER_EASING: f32 = 0.08; // fraction of the remaining gap closed per frame
pub const PARALLAX_YAW: f32 = 0.06; // rad of extra rotation at the container edge

// Frame pacing
pub const MAX_FRAME_DT_SEC: f32 = 0.1;
pub const RESIZE_DEBOUNCE_MS: f64 = 100.0;
pub const INTERSECTION_THRESHOLD: f64 = 0.01;

// Surface sizing
pub const MAX_DEVICE_PIXEL_RATIO: f32 = 2.0;
pub const LATTICE_FILL: f32 = 0.70; // share of the container's min dimension

// Static fallback
pub const STATIC_MIN_OPACITY: f32 = 0.1;
pub const STATIC_OPACITY_FALLOFF: f32 = 0.8;

// Lattice cache
pub const LATTICE_CACHE_CAPACITY: usize = 8;
