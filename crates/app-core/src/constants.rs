use crate::color::Rgb;
use glam::Vec3;

// Shared tuning constants used by both web and native frontends.

// Accent palette; index 0 is the accent shown on first mount
pub const ACCENT_PALETTE: [Rgb; 4] = [
    Rgb::css("#4060ff"), // blue
    Rgb::css("#20ffa0"), // mint
    Rgb::css("#ff4060"), // red
    Rgb::css("#ffcc00"), // yellow
];
pub const PALETTE_SIZE: usize = ACCENT_PALETTE.len();
pub const NEUTRAL_COLOR: Rgb = Rgb::WHITE;

// Capability gate: tiers at or above this run the animation
pub const TIER_THRESHOLD: u8 = 2;

// Entity factory
pub const CONNECTOR_COUNT: usize = 9;
pub const SPAWN_HALF_EXTENT: f32 = 5.0; // random spawn cube is [-5, 5] per axis

// Per-frame forces
pub const RESTORING_COEFF: f32 = 0.08; // impulse = -position * coeff
pub const MAX_FRAME_DELTA: f32 = 0.1; // seconds; guards against stalls
pub const COLOR_SMOOTH_TIME: f32 = 0.2;

// Rigid bodies
pub const GRAVITY: Vec3 = Vec3::ZERO;
pub const CONNECTOR_RADIUS: f32 = 0.66;
pub const CONNECTOR_LINEAR_DAMPING: f32 = 4.0;
pub const CONNECTOR_ANGULAR_DAMPING: f32 = 1.0;
pub const CONNECTOR_FRICTION: f32 = 0.1;
pub const POINTER_RADIUS: f32 = 1.0;

// Visual sizing
pub const MESH_RADIUS: f32 = 0.45; // 0.9 sphere at half scale
pub const MATERIAL_METALNESS: f32 = 0.2;
pub const ACCENT_LIGHT_INTENSITY: f32 = 4.0;
pub const ACCENT_LIGHT_DISTANCE: f32 = 2.5;

// Camera
pub const CAMERA_POSITION: [f32; 3] = [0.0, 0.0, 15.0];
pub const CAMERA_FOV_DEG: f32 = 17.5;
pub const CAMERA_NEAR: f32 = 1.0;
pub const CAMERA_FAR: f32 = 20.0;
pub const PIXEL_RATIO_MIN: f64 = 1.0;
pub const PIXEL_RATIO_MAX: f64 = 1.5;

// Static fallback for insufficient devices
pub const FALLBACK_IMAGE_SRC: &str = "/images/hero.webp";
pub const FALLBACK_IMAGE_WIDTH: u32 = 924;
pub const FALLBACK_IMAGE_HEIGHT: u32 = 768;
pub const FALLBACK_IMAGE_ALT: &str = "Hero";
pub const FALLBACK_DESCRIPTION: &str = "Your GPU is not powerful enough to run this animation.";

#[inline]
pub fn camera_position_vec3() -> Vec3 {
    Vec3::new(CAMERA_POSITION[0], CAMERA_POSITION[1], CAMERA_POSITION[2])
}

/// Clamp a reported device pixel ratio to the range the renderer supports.
#[inline]
pub fn clamp_pixel_ratio(dpr: f64) -> f64 {
    if dpr.is_finite() {
        dpr.clamp(PIXEL_RATIO_MIN, PIXEL_RATIO_MAX)
    } else {
        PIXEL_RATIO_MIN
    }
}
