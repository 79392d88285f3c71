//! Unit UV sphere shared by every connector instance.

use crate::scene::SphereInstance;

pub const SPHERE_SEGMENTS: u32 = 30;
pub const SPHERE_RINGS: u32 = 30;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// Per-instance data matching `VsIn` locations 2 and 3 in the scene shader.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    pub center_radius: [f32; 4],
    pub color_roughness: [f32; 4],
}

impl From<&SphereInstance> for InstanceRaw {
    fn from(s: &SphereInstance) -> Self {
        Self {
            center_radius: [s.position.x, s.position.y, s.position.z, s.radius],
            color_roughness: [s.color[0], s.color[1], s.color[2], s.roughness],
        }
    }
}

/// Radius-1 sphere centered on the origin. Seam and pole vertices are
/// duplicated so every ring has `segments + 1` entries.
pub fn uv_sphere(segments: u32, rings: u32) -> (Vec<MeshVertex>, Vec<u16>) {
    let segments = segments.max(3);
    let rings = rings.max(2);
    let mut vertices = Vec::with_capacity(((segments + 1) * (rings + 1)) as usize);
    for r in 0..=rings {
        let phi = std::f32::consts::PI * r as f32 / rings as f32;
        let (sin_phi, cos_phi) = phi.sin_cos();
        for s in 0..=segments {
            let theta = std::f32::consts::TAU * s as f32 / segments as f32;
            let (sin_theta, cos_theta) = theta.sin_cos();
            let n = [cos_theta * sin_phi, cos_phi, sin_theta * sin_phi];
            vertices.push(MeshVertex {
                position: n,
                normal: n,
            });
        }
    }

    let stride = segments + 1;
    let mut indices = Vec::with_capacity((segments * rings * 6) as usize);
    for r in 0..rings {
        for s in 0..segments {
            let a = (r * stride + s) as u16;
            let b = ((r + 1) * stride + s) as u16;
            let c = a + 1;
            let d = b + 1;
            // counter-clockwise seen from outside
            indices.extend_from_slice(&[a, c, b, c, d, b]);
        }
    }
    (vertices, indices)
}

pub(crate) const VERTEX_LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
    array_stride: std::mem::size_of::<MeshVertex>() as u64,
    step_mode: wgpu::VertexStepMode::Vertex,
    attributes: &[
        wgpu::VertexAttribute {
            format: wgpu::VertexFormat::Float32x3,
            offset: 0,
            shader_location: 0,
        },
        wgpu::VertexAttribute {
            format: wgpu::VertexFormat::Float32x3,
            offset: 12,
            shader_location: 1,
        },
    ],
};

pub(crate) const INSTANCE_LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
    array_stride: std::mem::size_of::<InstanceRaw>() as u64,
    step_mode: wgpu::VertexStepMode::Instance,
    attributes: &[
        wgpu::VertexAttribute {
            format: wgpu::VertexFormat::Float32x4,
            offset: 0,
            shader_location: 2,
        },
        wgpu::VertexAttribute {
            format: wgpu::VertexFormat::Float32x4,
            offset: 16,
            shader_location: 3,
        },
    ],
};
