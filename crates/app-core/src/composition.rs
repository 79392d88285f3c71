//! Fixed scene composition: lights, ambient occlusion and the image-based
//! environment built from four circular light panels. None of this is
//! configurable at runtime.

use glam::{Quat, Vec3};
use std::f32::consts::{FRAC_PI_2, FRAC_PI_3};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpotLight {
    pub position: Vec3,
    pub angle: f32,
    pub penumbra: f32,
    pub intensity: f32,
    pub casts_shadow: bool,
}

/// Screen-space ambient occlusion settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AoPass {
    pub radius: f32,
    pub distance_falloff: f32,
    pub intensity: f32,
    pub multisampling: u32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lightformer {
    pub intensity: f32,
    /// Euler angles, applied X then Y then Z.
    pub rotation: Vec3,
    pub position: Vec3,
    pub scale: f32,
}

/// A lightformer resolved into world space for the shader.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanelLight {
    pub center: Vec3,
    pub normal: Vec3,
    pub radius: f32,
    pub intensity: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Environment {
    pub resolution: u32,
    pub group_rotation: Vec3,
    pub panels: [Lightformer; 4],
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Composition {
    pub clear_color: [f32; 4],
    pub ambient_intensity: f32,
    pub spot: SpotLight,
    pub ao: AoPass,
    pub environment: Environment,
}

pub const COMPOSITION: Composition = Composition {
    clear_color: [0.0, 0.0, 0.0, 0.0],
    ambient_intensity: 0.4,
    spot: SpotLight {
        position: Vec3::new(10.0, 10.0, 10.0),
        angle: 0.15,
        penumbra: 1.0,
        intensity: 1.0,
        casts_shadow: true,
    },
    ao: AoPass {
        radius: 1.0,
        distance_falloff: 1.0,
        intensity: 4.0,
        multisampling: 8,
    },
    environment: Environment {
        resolution: 256,
        group_rotation: Vec3::new(-FRAC_PI_3, 0.0, 1.0),
        panels: [
            Lightformer {
                intensity: 4.0,
                rotation: Vec3::new(FRAC_PI_2, 0.0, 0.0),
                position: Vec3::new(0.0, 5.0, -9.0),
                scale: 2.0,
            },
            Lightformer {
                intensity: 2.0,
                rotation: Vec3::new(0.0, FRAC_PI_2, 0.0),
                position: Vec3::new(-5.0, 1.0, -1.0),
                scale: 2.0,
            },
            Lightformer {
                intensity: 2.0,
                rotation: Vec3::new(0.0, FRAC_PI_2, 0.0),
                position: Vec3::new(-5.0, -1.0, -1.0),
                scale: 2.0,
            },
            Lightformer {
                intensity: 2.0,
                rotation: Vec3::new(0.0, -FRAC_PI_2, 0.0),
                position: Vec3::new(10.0, 1.0, 0.0),
                scale: 8.0,
            },
        ],
    },
};

#[inline]
fn euler_xyz(r: Vec3) -> Quat {
    Quat::from_rotation_x(r.x) * Quat::from_rotation_y(r.y) * Quat::from_rotation_z(r.z)
}

impl SpotLight {
    /// Unit direction from the light toward the origin.
    pub fn direction(&self) -> Vec3 {
        (-self.position).normalize_or_zero()
    }

    /// Cosines of the inner (full intensity) and outer cone edges.
    pub fn cone_cosines(&self) -> (f32, f32) {
        let outer = self.angle;
        let inner = outer * (1.0 - self.penumbra.clamp(0.0, 1.0));
        (inner.cos(), outer.cos())
    }
}

impl Environment {
    /// Panels in world space. Circles face +Z in their local frame.
    pub fn panel_lights(&self) -> [PanelLight; 4] {
        let group = euler_xyz(self.group_rotation);
        self.panels.map(|p| {
            let local = euler_xyz(p.rotation);
            PanelLight {
                center: group * p.position,
                normal: (group * local * Vec3::Z).normalize_or_zero(),
                radius: p.scale,
                intensity: p.intensity,
            }
        })
    }
}
