use super::helpers;
use super::targets::RenderTargets;
use crate::composition::AoPass;
use crate::state::Camera;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct AoUniforms {
    inv_proj: [[f32; 4]; 4],
    resolution: [f32; 2],
    proj_scale: f32,
    radius: f32,
    falloff: f32,
    intensity: f32,
    encode_srgb: f32,
    _pad: f32,
}

impl AoUniforms {
    pub(crate) fn new(
        camera: &Camera,
        pass: &AoPass,
        width: u32,
        height: u32,
        encode_srgb: bool,
    ) -> Self {
        let h = height.max(1) as f32;
        Self {
            inv_proj: camera.projection_matrix().inverse().to_cols_array_2d(),
            resolution: [width.max(1) as f32, h],
            proj_scale: h / (2.0 * (camera.fovy_radians / 2.0).tan()),
            radius: pass.radius,
            falloff: pass.distance_falloff,
            intensity: pass.intensity,
            encode_srgb: if encode_srgb { 1.0 } else { 0.0 },
            _pad: 0.0,
        }
    }
}

pub(crate) struct AoResources {
    pub(crate) bgl: wgpu::BindGroupLayout,
    pub(crate) uniform_buffer: wgpu::Buffer,
    pub(crate) pipeline: wgpu::RenderPipeline,
}

pub(crate) fn create_ao_resources(
    device: &wgpu::Device,
    shader: &wgpu::ShaderModule,
    swap_format: wgpu::TextureFormat,
) -> AoResources {
    let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("ao_bgl"),
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Float { filterable: false },
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Depth,
                },
                count: None,
            },
            helpers::uniform_entry(2, wgpu::ShaderStages::FRAGMENT),
        ],
    });
    let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("ao_uniforms"),
        size: std::mem::size_of::<AoUniforms>() as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("pl_ao"),
        bind_group_layouts: &[&bgl],
        push_constant_ranges: &[],
    });
    let pipeline =
        helpers::make_post_pipeline(device, &layout, shader, "fs_composite", swap_format);
    AoResources {
        bgl,
        uniform_buffer,
        pipeline,
    }
}

impl AoResources {
    /// Must be rebuilt whenever the targets are recreated.
    pub(crate) fn bind_group(
        &self,
        device: &wgpu::Device,
        targets: &RenderTargets,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("ao_bg"),
            layout: &self.bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&targets.color_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&targets.depth_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: self.uniform_buffer.as_entire_binding(),
                },
            ],
        })
    }
}

pub(crate) fn composite(
    encoder: &mut wgpu::CommandEncoder,
    target: &wgpu::TextureView,
    pipeline: &wgpu::RenderPipeline,
    bind_group: &wgpu::BindGroup,
) {
    let mut r = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some("ao_composite"),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: target,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
    });
    r.set_pipeline(pipeline);
    r.set_bind_group(0, bind_group, &[]);
    r.draw(0..3, 0..1);
}
