use super::helpers::{self, DEPTH_FORMAT, HDR_FORMAT};

/// Offscreen targets written by the scene pass and read by the AO composite.
///
/// - `color_*` holds linear HDR scene color with coverage in alpha.
/// - `depth_*` is sampled with `textureLoad` to rebuild view-space positions.
pub(crate) struct RenderTargets {
    pub(crate) color_tex: wgpu::Texture,
    pub(crate) color_view: wgpu::TextureView,
    pub(crate) depth_tex: wgpu::Texture,
    pub(crate) depth_view: wgpu::TextureView,
}

impl RenderTargets {
    pub(crate) fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let (color_tex, color_view) =
            helpers::create_texture(device, "scene_color", width, height, HDR_FORMAT);
        let (depth_tex, depth_view) =
            helpers::create_texture(device, "scene_depth", width, height, DEPTH_FORMAT);
        Self {
            color_tex,
            color_view,
            depth_tex,
            depth_view,
        }
    }

    pub(crate) fn recreate(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.color_tex.destroy();
        self.depth_tex.destroy();
        *self = Self::new(device, width, height);
    }
}
