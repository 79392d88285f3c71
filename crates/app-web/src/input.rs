use app_core::{clamp_pixel_ratio, ndc_from_pixels};
use glam::Vec2;

/// Map a client-space pointer position to normalized device coordinates
/// relative to an element rect. +Y is up; the result is clamped to `[-1, 1]`.
#[inline]
pub fn ndc_from_client(client: Vec2, rect_origin: Vec2, rect_size: Vec2) -> Vec2 {
    ndc_from_pixels(client - rect_origin, rect_size)
}

/// Physical backing size for a CSS size at the given device pixel ratio.
#[inline]
pub fn backing_size(css_size: Vec2, device_pixel_ratio: f64) -> (u32, u32) {
    let dpr = clamp_pixel_ratio(device_pixel_ratio);
    let w = (css_size.x.max(0.0) as f64 * dpr).round() as u32;
    let h = (css_size.y.max(0.0) as f64 * dpr).round() as u32;
    (w.max(1), h.max(1))
}

/// Elapsed seconds between two animation-frame timestamps in milliseconds.
/// The first frame has no predecessor and advances nothing.
#[inline]
pub fn frame_delta(previous_ms: Option<f64>, now_ms: f64) -> f32 {
    match previous_ms {
        Some(prev) if now_ms.is_finite() && prev.is_finite() => {
            ((now_ms - prev) / 1000.0).max(0.0) as f32
        }
        _ => 0.0,
    }
}
