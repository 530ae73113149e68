//! Platform-agnostic core of the hexfield background effect.
//!
//! Everything here is free of browser and windowing APIs so it can be unit
//! tested on the host. The web and native frontends own the surfaces and feed
//! host signals (pointer, resize, visibility) into a [`Lifecycle`], which
//! drives the [`AnimationController`] and the active [`RendererBackend`].

pub mod animation;
pub mod config;
pub mod constants;
pub mod error;
pub mod lattice;
pub mod lifecycle;
pub mod math;
pub mod profile;
pub mod render;
pub mod surface;

pub use animation::*;
pub use config::*;
pub use constants::*;
pub use error::*;
pub use lattice::*;
pub use lifecycle::*;
pub use profile::*;
pub use render::*;
pub use surface::*;

// Shaders bundled as string constants
pub static POINTS_WGSL: &str = include_str!("../shaders/points.wgsl");
pub static TILING_WGSL: &str = include_str!("../shaders/tiling.wgsl");
