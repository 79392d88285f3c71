//! Camera and viewport types shared by both frontends.
//!
//! These avoid platform APIs. The scene uses [`Viewport`] to map normalized
//! pointer coordinates into world units; the renderer uses the matrices.

use crate::constants::{camera_position_vec3, CAMERA_FAR, CAMERA_FOV_DEG, CAMERA_NEAR};
use glam::{Mat4, Vec2, Vec3};

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    /// The fixed hero camera looking down -Z at the origin.
    pub fn hero(aspect: f32) -> Self {
        Self {
            eye: camera_position_vec3(),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect: if aspect.is_finite() && aspect > 0.0 { aspect } else { 1.0 },
            fovy_radians: CAMERA_FOV_DEG.to_radians(),
            znear: CAMERA_NEAR,
            zfar: CAMERA_FAR,
        }
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }
    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// Visible extents of the plane through `target` facing the camera.
    pub fn viewport(&self) -> Viewport {
        let distance = (self.eye - self.target).length();
        let height = 2.0 * (self.fovy_radians / 2.0).tan() * distance;
        Viewport {
            width: height * self.aspect,
            height,
        }
    }
}

/// World-space size of the visible area at the scene's focal plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    /// Map normalized device coordinates (`[-1, 1]`, +Y up) onto the z = 0 plane.
    pub fn project(&self, ndc: Vec2) -> Vec3 {
        Vec3::new(ndc.x * self.width / 2.0, ndc.y * self.height / 2.0, 0.0)
    }
}

/// Map a pixel position inside a `size` rectangle (origin top-left, +Y down)
/// to normalized device coordinates with +Y up, clamped to `[-1, 1]`.
pub fn ndc_from_pixels(position: Vec2, size: Vec2) -> Vec2 {
    if size.x <= 0.0 || size.y <= 0.0 {
        return Vec2::ZERO;
    }
    let local = position / size;
    Vec2::new(local.x * 2.0 - 1.0, 1.0 - local.y * 2.0).clamp(Vec2::splat(-1.0), Vec2::ONE)
}
