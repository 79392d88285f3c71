// Host-side tests for pure input functions.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod input {
    include!("../src/input.rs");
}
mod constants {
    include!("../src/constants.rs");
}

use glam::Vec2;
use input::*;

#[test]
fn rect_center_maps_to_origin() {
    let ndc = ndc_from_client(
        Vec2::new(150.0, 100.0),
        Vec2::new(100.0, 50.0),
        Vec2::new(100.0, 100.0),
    );
    assert!(ndc.length() < 1e-6);
}

#[test]
fn corners_map_to_unit_square_with_y_up() {
    let origin = Vec2::new(10.0, 20.0);
    let size = Vec2::new(200.0, 100.0);
    assert_eq!(ndc_from_client(origin, origin, size), Vec2::new(-1.0, 1.0));
    assert_eq!(ndc_from_client(origin + size, origin, size), Vec2::new(1.0, -1.0));
}

#[test]
fn pointer_outside_the_rect_is_clamped() {
    let ndc = ndc_from_client(Vec2::new(-500.0, 900.0), Vec2::ZERO, Vec2::new(100.0, 100.0));
    assert_eq!(ndc, Vec2::new(-1.0, -1.0));
}

#[test]
fn empty_rect_yields_origin() {
    assert_eq!(ndc_from_client(Vec2::new(5.0, 5.0), Vec2::ZERO, Vec2::ZERO), Vec2::ZERO);
}

#[test]
fn backing_size_clamps_pixel_ratio() {
    let css = Vec2::new(400.0, 300.0);
    assert_eq!(backing_size(css, 1.0), (400, 300));
    assert_eq!(backing_size(css, 3.0), (600, 450));
    assert_eq!(backing_size(css, 0.5), (400, 300));
    assert_eq!(backing_size(css, f64::NAN), (400, 300));
    assert_eq!(backing_size(Vec2::ZERO, 2.0), (1, 1));
}

#[test]
fn frame_delta_starts_at_zero_and_uses_seconds() {
    assert_eq!(frame_delta(None, 1234.0), 0.0);
    assert!((frame_delta(Some(1000.0), 1016.0) - 0.016).abs() < 1e-6);
    assert_eq!(frame_delta(Some(2000.0), 1000.0), 0.0);
}

#[test]
fn worker_and_host_agree_on_dom_constants() {
    assert_eq!(constants::HOST_ELEMENT_ID, "hero");
    assert!(constants::WORKER_SCRIPT_URL.ends_with("worker.js"));
    assert_ne!(constants::SCENE_PLACEHOLDER, constants::SCENE_LIVE);
}
