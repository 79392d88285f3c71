//! Background-side state machine shared by the web worker and the native
//! render thread. Pointer updates and clicks are queued by the message
//! handler and consumed by the next tick; after `stop` no tick runs.

use crate::message::PointerUpdate;
use crate::physics::PhysicsBackend;
use crate::scene::{FrameInput, PhysicsScene, SceneFrame};
use crate::state::Camera;
use glam::Vec2;
use rand::Rng;

pub struct WorkerRuntime<P: PhysicsBackend, R: Rng> {
    scene: PhysicsScene<P, R>,
    camera: Camera,
    pointer: Vec2,
    pending_clicks: u32,
    size: (u32, u32),
    stopped: bool,
}

impl<P: PhysicsBackend, R: Rng> WorkerRuntime<P, R> {
    pub fn new(scene: PhysicsScene<P, R>, width: u32, height: u32) -> Self {
        let mut camera = Camera::hero(1.0);
        camera.set_aspect(width, height);
        Self {
            scene,
            camera,
            pointer: Vec2::ZERO,
            pending_clicks: 0,
            size: (width, height),
            stopped: false,
        }
    }

    pub fn scene(&self) -> &PhysicsScene<P, R> {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn apply(&mut self, update: PointerUpdate) {
        if self.stopped {
            return;
        }
        self.pointer = update.ndc;
        self.pending_clicks = self.pending_clicks.saturating_add(update.clicks);
        if update.width > 0 && update.height > 0 && (update.width, update.height) != self.size {
            self.size = (update.width, update.height);
            self.camera.set_aspect(update.width, update.height);
        }
    }

    pub fn stop(&mut self) {
        if !self.stopped {
            log::info!("[worker] runtime stopped");
        }
        self.stopped = true;
    }

    /// Run one frame. Returns `None` once stopped.
    pub fn tick(&mut self, delta: f32) -> Option<SceneFrame> {
        if self.stopped {
            return None;
        }
        for _ in 0..std::mem::take(&mut self.pending_clicks) {
            self.scene.advance_accent();
        }
        let input = FrameInput {
            delta,
            pointer_ndc: self.pointer,
            viewport: self.camera.viewport(),
        };
        Some(self.scene.tick(&input))
    }
}
