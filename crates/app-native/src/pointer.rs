use app_core::{ndc_from_pixels, PointerUpdate};
use glam::Vec2;

/// Cursor position and physical window size as last reported by winit.
#[derive(Clone, Copy, Debug, Default)]
pub struct PointerTracker {
    position: Vec2,
    size: (u32, u32),
}

impl PointerTracker {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            position: Vec2::new(width as f32, height as f32) * 0.5,
            size: (width, height),
        }
    }

    pub fn moved(&mut self, x: f64, y: f64) -> PointerUpdate {
        self.position = Vec2::new(x as f32, y as f32);
        self.update(0)
    }

    pub fn clicked(&mut self) -> PointerUpdate {
        self.update(1)
    }

    pub fn resized(&mut self, width: u32, height: u32) -> PointerUpdate {
        self.size = (width, height);
        self.update(0)
    }

    fn update(&self, clicks: u32) -> PointerUpdate {
        let (width, height) = self.size;
        PointerUpdate {
            ndc: ndc_from_pixels(self.position, Vec2::new(width as f32, height as f32)),
            clicks,
            width,
            height,
        }
    }
}
