// Host-side tests for the window pointer tracker.
// app-native is a binary crate, so the pure module is included directly.

#![allow(dead_code)]
mod pointer {
    include!("../src/pointer.rs");
}

use glam::Vec2;
use pointer::PointerTracker;

#[test]
fn starts_centered_with_no_clicks() {
    let mut tracker = PointerTracker::new(800, 600);
    let update = tracker.resized(800, 600);
    assert!(update.ndc.length() < 1e-6);
    assert_eq!(update.clicks, 0);
    assert_eq!((update.width, update.height), (800, 600));
}

#[test]
fn cursor_moves_map_to_ndc_with_y_up() {
    let mut tracker = PointerTracker::new(800, 600);
    assert_eq!(tracker.moved(0.0, 0.0).ndc, Vec2::new(-1.0, 1.0));
    assert_eq!(tracker.moved(800.0, 600.0).ndc, Vec2::new(1.0, -1.0));
    assert_eq!(tracker.moved(-50.0, 5000.0).ndc, Vec2::new(-1.0, -1.0));
}

#[test]
fn click_reports_one_click_at_last_position() {
    let mut tracker = PointerTracker::new(400, 400);
    let moved = tracker.moved(300.0, 100.0);
    let clicked = tracker.clicked();
    assert_eq!(clicked.clicks, 1);
    assert_eq!(clicked.ndc, moved.ndc);
    assert_eq!(tracker.moved(300.0, 100.0).clicks, 0);
}

#[test]
fn resize_keeps_cursor_and_updates_size() {
    let mut tracker = PointerTracker::new(400, 400);
    tracker.moved(200.0, 200.0);
    let update = tracker.resized(800, 400);
    assert_eq!((update.width, update.height), (800, 400));
    assert!((update.ndc.x - -0.5).abs() < 1e-6);
    assert!(update.ndc.y.abs() < 1e-6);
}

#[test]
fn minimized_window_yields_origin() {
    let mut tracker = PointerTracker::new(400, 400);
    tracker.moved(10.0, 10.0);
    let update = tracker.resized(0, 0);
    assert_eq!(update.ndc, Vec2::ZERO);
    assert_eq!((update.width, update.height), (0, 0));
}
