//! `wgpu` renderer that runs inside the background context.
//!
//! Pass 1 draws the connector spheres as instances of one unit mesh into an
//! HDR color target with depth. Pass 2 reads both targets, applies screen-space
//! ambient occlusion and tonemapping, and writes the swapchain while keeping
//! uncovered pixels fully transparent.

mod ao;
mod helpers;
pub mod mesh;
mod targets;

use crate::capability::{estimate_tier, DeviceKind, GpuProfile, TierReport};
use crate::composition::{Composition, COMPOSITION};
use crate::constants::MATERIAL_METALNESS;
use crate::error::CapabilityError;
use crate::scene::SceneFrame;
use crate::state::Camera;
use mesh::{InstanceRaw, MeshVertex, SPHERE_RINGS, SPHERE_SEGMENTS};
use targets::RenderTargets;
use wgpu::util::DeviceExt;

pub const MAX_POINT_LIGHTS: usize = 4;

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PanelPacked {
    pub center_radius: [f32; 4],
    pub normal_intensity: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointPacked {
    pub pos_distance: [f32; 4],
    pub color_intensity: [f32; 4],
}

/// Mirrors `struct Scene` in `scene.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub camera_ambient: [f32; 4],
    pub spot_pos_intensity: [f32; 4],
    pub spot_dir_cos_outer: [f32; 4],
    pub spot_params: [f32; 4],
    pub panels: [PanelPacked; 4],
    pub points: [PointPacked; MAX_POINT_LIGHTS],
    pub counts: [u32; 4],
}

impl SceneUniforms {
    pub fn new(frame: &SceneFrame, camera: &Camera, composition: &Composition) -> Self {
        let view_proj = camera.projection_matrix() * camera.view_matrix();
        let spot = &composition.spot;
        let dir = spot.direction();
        let (cos_inner, cos_outer) = spot.cone_cosines();
        let panels = composition.environment.panel_lights().map(|p| PanelPacked {
            center_radius: [p.center.x, p.center.y, p.center.z, p.radius],
            normal_intensity: [p.normal.x, p.normal.y, p.normal.z, p.intensity],
        });
        let mut points = [PointPacked::default(); MAX_POINT_LIGHTS];
        let count = frame.point_lights.len().min(MAX_POINT_LIGHTS);
        for (slot, light) in points.iter_mut().zip(&frame.point_lights) {
            *slot = PointPacked {
                pos_distance: [
                    light.position.x,
                    light.position.y,
                    light.position.z,
                    light.distance,
                ],
                color_intensity: [light.color[0], light.color[1], light.color[2], light.intensity],
            };
        }
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            camera_ambient: [
                camera.eye.x,
                camera.eye.y,
                camera.eye.z,
                composition.ambient_intensity,
            ],
            spot_pos_intensity: [
                spot.position.x,
                spot.position.y,
                spot.position.z,
                spot.intensity,
            ],
            spot_dir_cos_outer: [dir.x, dir.y, dir.z, cos_outer],
            spot_params: [cos_inner, MATERIAL_METALNESS, 0.0, 0.0],
            panels,
            points,
            counts: [count as u32, 0, 0, 0],
        }
    }
}

/// Summarize an adapter for tier estimation.
pub fn gpu_profile(adapter: &wgpu::Adapter) -> GpuProfile {
    let info = adapter.get_info();
    let device_kind = match info.device_type {
        wgpu::DeviceType::Cpu => DeviceKind::Cpu,
        wgpu::DeviceType::IntegratedGpu => DeviceKind::Integrated,
        wgpu::DeviceType::DiscreteGpu => DeviceKind::Discrete,
        wgpu::DeviceType::VirtualGpu => DeviceKind::Virtual,
        wgpu::DeviceType::Other => DeviceKind::Other,
    };
    GpuProfile {
        name: info.name,
        device_kind,
        max_texture_dimension_2d: adapter.limits().max_texture_dimension_2d,
    }
}

/// One-shot capability query against the default adapter.
pub async fn probe_tier(instance: &wgpu::Instance) -> Result<TierReport, CapabilityError> {
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: None,
            force_fallback_adapter: false,
        })
        .await
        .ok_or(CapabilityError::NoAdapter)?;
    let profile = gpu_profile(&adapter);
    let report = estimate_tier(&profile);
    log::info!(
        "[gate] adapter '{}' ({:?}, max tex {}) -> tier {}",
        profile.name,
        profile.device_kind,
        profile.max_texture_dimension_2d,
        report.tier
    );
    Ok(report)
}

pub struct Renderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    encode_srgb: bool,

    scene_pipeline: wgpu::RenderPipeline,
    scene_uniforms: wgpu::Buffer,
    scene_bind_group: wgpu::BindGroup,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    instance_buffer: wgpu::Buffer,
    instance_capacity: usize,

    targets: RenderTargets,
    ao: ao::AoResources,
    ao_bind_group: wgpu::BindGroup,
}

impl Renderer {
    pub async fn new(
        instance: &wgpu::Instance,
        surface: wgpu::Surface<'static>,
        width: u32,
        height: u32,
    ) -> anyhow::Result<Self> {
        let width = width.max(1);
        let height = height.max(1);
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No GPU adapter for surface"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;

        let caps = surface.get_capabilities(&adapter);
        let format = helpers::pick_surface_format(&caps.formats)
            .ok_or_else(|| anyhow::anyhow!("Surface reports no formats"))?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: helpers::pick_alpha_mode(&caps.alpha_modes),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        log::info!(
            "[render] surface {}x{} {:?} alpha={:?}",
            width,
            height,
            format,
            config.alpha_mode
        );

        let scene_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(crate::SCENE_WGSL.into()),
        });
        let ao_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("ao_shader"),
            source: wgpu::ShaderSource::Wgsl(crate::AO_WGSL.into()),
        });

        let scene_uniforms = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("scene_uniforms"),
            size: std::mem::size_of::<SceneUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let scene_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("scene_bgl"),
            entries: &[helpers::uniform_entry(0, wgpu::ShaderStages::VERTEX_FRAGMENT)],
        });
        let scene_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scene_bg"),
            layout: &scene_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: scene_uniforms.as_entire_binding(),
            }],
        });
        let scene_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl_scene"),
            bind_group_layouts: &[&scene_bgl],
            push_constant_ranges: &[],
        });
        let scene_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("scene_pipeline"),
            layout: Some(&scene_layout),
            vertex: wgpu::VertexState {
                module: &scene_shader,
                entry_point: Some("vs_main"),
                buffers: &[mesh::VERTEX_LAYOUT, mesh::INSTANCE_LAYOUT],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: helpers::DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            // The AO pass reads depth per pixel, so the scene stays single-sampled.
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &scene_shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: helpers::HDR_FORMAT,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });

        let (vertices, indices): (Vec<MeshVertex>, Vec<u16>) =
            mesh::uv_sphere(SPHERE_SEGMENTS, SPHERE_RINGS);
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("sphere_vb"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("sphere_ib"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let instance_capacity = 16;
        let instance_buffer = create_instance_buffer(&device, instance_capacity);

        let targets = RenderTargets::new(&device, width, height);
        let ao = ao::create_ao_resources(&device, &ao_shader, format);
        let ao_bind_group = ao.bind_group(&device, &targets);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            encode_srgb: !format.is_srgb(),
            scene_pipeline,
            scene_uniforms,
            scene_bind_group,
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
            instance_buffer,
            instance_capacity,
            targets,
            ao,
            ao_bind_group,
        })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 || (width, height) == self.size() {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.targets.recreate(&self.device, width, height);
        self.ao_bind_group = self.ao.bind_group(&self.device, &self.targets);
        log::debug!("[render] resized to {}x{}", width, height);
    }

    /// Re-apply the current configuration after the surface was lost.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    pub fn render(
        &mut self,
        frame: &SceneFrame,
        camera: &Camera,
    ) -> Result<(), wgpu::SurfaceError> {
        let instances: Vec<InstanceRaw> =
            frame.spheres.iter().map(InstanceRaw::from).collect();
        if instances.len() > self.instance_capacity {
            self.instance_capacity = instances.len().next_power_of_two();
            self.instance_buffer = create_instance_buffer(&self.device, self.instance_capacity);
        }
        self.queue
            .write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));
        let uniforms = SceneUniforms::new(frame, camera, &COMPOSITION);
        self.queue
            .write_buffer(&self.scene_uniforms, 0, bytemuck::bytes_of(&uniforms));
        let (width, height) = self.size();
        let ao_uniforms =
            ao::AoUniforms::new(camera, &COMPOSITION.ao, width, height, self.encode_srgb);
        self.queue
            .write_buffer(&self.ao.uniform_buffer, 0, bytemuck::bytes_of(&ao_uniforms));

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame_encoder"),
            });

        {
            let [r, g, b, a] = frame.clear_color;
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.targets.color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.targets.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            if !instances.is_empty() {
                pass.set_pipeline(&self.scene_pipeline);
                pass.set_bind_group(0, &self.scene_bind_group, &[]);
                pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
                pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
                pass.draw_indexed(0..self.index_count, 0, 0..instances.len() as u32);
            }
        }

        ao::composite(&mut encoder, &view, &self.ao.pipeline, &self.ao_bind_group);

        self.queue.submit(Some(encoder.finish()));
        output.present();
        Ok(())
    }
}

fn create_instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("instance_vb"),
        size: (std::mem::size_of::<InstanceRaw>() * capacity.max(1)) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}
