// Host-side tests for pure input functions.
// The web crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod input {
    include!("../src/input.rs");
}

use glam::Vec2;
use input::*;

#[test]
fn touch_pointers_do_not_steer() {
    assert!(steers_glow("mouse"));
    assert!(steers_glow("pen"));
    assert!(!steers_glow("touch"));
    assert!(!steers_glow("Touch"));
}

#[test]
fn pointer_is_relative_to_container() {
    let p = local_pointer(250.0, 130.5, 200.0, 100.0);
    assert_eq!(p, Vec2::new(50.0, 30.5));
    assert!(inside(p, 100.0, 40.0));
    assert!(!inside(Vec2::new(-1.0, 10.0), 100.0, 40.0));
    assert!(!inside(Vec2::new(10.0, 41.0), 100.0, 40.0));
}

#[test]
fn rect_surface_caps_dpr_and_fixes_garbage() {
    let s = surface_from_rect(800.0, 600.0, 3.0);
    assert_eq!(s.dpr, 2.0);
    assert_eq!(s.physical_width(), 1600);
    let s = surface_from_rect(800.0, 600.0, f64::NAN);
    assert_eq!(s.dpr, 1.0);
    let s = surface_from_rect(0.0, 0.0, 1.0);
    assert!(s.is_degenerate());
    assert_eq!(s.physical_width(), 1);
}

#[test]
fn device_hints_ignore_unknown_values() {
    let hints = device_hints(0.0, None);
    assert_eq!(hints.cores, None);
    assert_eq!(hints.memory_gb, None);
    assert!(!hints.is_low_power());

    assert!(device_hints(2.0, None).is_low_power());
    assert!(device_hints(8.0, Some(1.0)).is_low_power());
    assert!(!device_hints(8.0, Some(8.0)).is_low_power());
    assert_eq!(device_hints(8.0, Some(f64::NAN)).memory_gb, None);
}

#[test]
fn any_intersecting_entry_counts_as_visible() {
    assert!(!any_visible([]));
    assert!(!any_visible([false, false]));
    assert!(any_visible([false, true]));
}
