// Pure helpers for translating DOM input into lifecycle calls.
// Kept free of web-sys so the host-side tests can include this file directly.

use glam::Vec2;
use hexfield_core::{DeviceHints, SurfaceSize};

/// Pointer types that should not steer the glow. Touch drags scroll the page
/// instead, and a lingering contact point would pin the glow in place.
pub fn steers_glow(pointer_type: &str) -> bool {
    !pointer_type.eq_ignore_ascii_case("touch")
}

/// Client coordinates relative to the container's top-left corner, in CSS pixels.
#[inline]
pub fn local_pointer(client_x: f64, client_y: f64, rect_left: f64, rect_top: f64) -> Vec2 {
    Vec2::new((client_x - rect_left) as f32, (client_y - rect_top) as f32)
}

#[inline]
pub fn inside(local: Vec2, css_width: f32, css_height: f32) -> bool {
    local.x >= 0.0 && local.y >= 0.0 && local.x <= css_width && local.y <= css_height
}

/// Surface for a container rect; missing or bogus DPR is handled by `SurfaceSize`.
pub fn surface_from_rect(width: f64, height: f64, device_pixel_ratio: f64) -> SurfaceSize {
    SurfaceSize::new(width as f32, height as f32, device_pixel_ratio as f32)
}

/// `navigator.hardwareConcurrency` reports 0 when unknown; `deviceMemory`
/// is absent outside Chromium.
pub fn device_hints(hardware_concurrency: f64, device_memory: Option<f64>) -> DeviceHints {
    let cores = (hardware_concurrency.is_finite() && hardware_concurrency >= 1.0)
        .then_some(hardware_concurrency as u32);
    let memory_gb = device_memory.filter(|m| m.is_finite() && *m > 0.0).map(|m| m as f32);
    DeviceHints { cores, memory_gb }
}

/// Any intersecting entry means the container is at least partly on screen.
pub fn any_visible(entries: impl IntoIterator<Item = bool>) -> bool {
    entries.into_iter().any(|v| v)
}
