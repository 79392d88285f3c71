//! Render worker bridge: owns one background context per mount and the
//! one-shot handoff of the render surface into it.
//!
//! Spawn and transfer failures are absorbed here. The bridge then stays in
//! placeholder mode for the rest of its life; nothing is retried and nothing
//! reaches the page as an error.

use crate::composition::{Composition, COMPOSITION};
use crate::constants::CONNECTOR_COUNT;
use crate::entities::{shuffle_at, ConnectorSet};
use crate::error::BridgeError;
use crate::message::{HostMessage, PointerUpdate, SurfaceHandoff, WorkerMessage};
use glam::Vec3;
use std::f32::consts::TAU;

/// A running background execution context.
pub trait BackgroundContext {
    type Surface;

    fn post(&mut self, message: HostMessage<Self::Surface>) -> Result<(), BridgeError>;

    /// Stop the context. Must be safe to call more than once.
    fn terminate(&mut self);
}

/// Creates background contexts; one call per mount.
pub trait ContextSpawner {
    type Context: BackgroundContext;

    fn spawn(&mut self) -> Result<Self::Context, BridgeError>;
}

pub type SurfaceOf<S> = <<S as ContextSpawner>::Context as BackgroundContext>::Surface;

/// Unexecuted description of the scene, shown until the context is ready.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneDescription {
    pub connectors: ConnectorSet,
    pub composition: Composition,
}

impl SceneDescription {
    /// Initial palette laid out on a fixed ring so it needs no randomness.
    pub fn placeholder() -> Self {
        let mut positions = [Vec3::ZERO; CONNECTOR_COUNT];
        for (i, p) in positions.iter_mut().enumerate() {
            let a = i as f32 / CONNECTOR_COUNT as f32 * TAU;
            *p = Vec3::new(a.cos() * 1.5, a.sin() * 1.5, 0.0);
        }
        Self {
            connectors: shuffle_at(0, &positions),
            composition: COMPOSITION,
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum BridgeView<'a> {
    Placeholder(&'a SceneDescription),
    Live,
}

pub struct RenderBridge<C: BackgroundContext> {
    context: Option<C>,
    placeholder: SceneDescription,
    ready: bool,
}

impl<C: BackgroundContext> RenderBridge<C> {
    /// Spawn a context and hand the surface to it.
    pub fn start<S>(spawner: &mut S, handoff: SurfaceHandoff<C::Surface>) -> Self
    where
        S: ContextSpawner<Context = C>,
    {
        let placeholder = SceneDescription::placeholder();
        let mut context = match spawner.spawn() {
            Ok(c) => c,
            Err(e) => {
                log::warn!("[bridge] {e}; keeping placeholder");
                return Self {
                    context: None,
                    placeholder,
                    ready: false,
                };
            }
        };
        log::info!(
            "[bridge] context spawned; handing off {}x{} surface",
            handoff.width,
            handoff.height
        );
        if let Err(e) = context.post(HostMessage::Surface(handoff)) {
            log::warn!("[bridge] {e}; keeping placeholder");
            context.terminate();
            return Self {
                context: None,
                placeholder,
                ready: false,
            };
        }
        Self {
            context: Some(context),
            placeholder,
            ready: false,
        }
    }

    /// A bridge whose surface could not be obtained at all.
    pub fn degraded(reason: &BridgeError) -> Self {
        log::warn!("[bridge] {reason}; keeping placeholder");
        Self {
            context: None,
            placeholder: SceneDescription::placeholder(),
            ready: false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.context.is_some()
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn view(&self) -> BridgeView<'_> {
        if self.ready && self.context.is_some() {
            BridgeView::Live
        } else {
            BridgeView::Placeholder(&self.placeholder)
        }
    }

    pub fn on_worker_message(&mut self, message: WorkerMessage) {
        match message {
            WorkerMessage::Ready => {
                if self.context.is_some() && !self.ready {
                    log::info!("[bridge] background context ready");
                    self.ready = true;
                }
            }
        }
    }

    /// Forward pointer state; dropped when no context is alive.
    pub fn forward_pointer(&mut self, update: PointerUpdate) {
        if let Some(ctx) = self.context.as_mut() {
            if let Err(e) = ctx.post(HostMessage::Pointer(update)) {
                log::debug!("[bridge] pointer update dropped: {e}");
            }
        }
    }

    /// Terminate the context. A no-op when already stopped or never started.
    pub fn stop(&mut self) {
        if let Some(mut ctx) = self.context.take() {
            _ = ctx.post(HostMessage::Terminate);
            ctx.terminate();
            self.ready = false;
            log::info!("[bridge] background context terminated");
        }
    }
}

impl<C: BackgroundContext> Drop for RenderBridge<C> {
    fn drop(&mut self) {
        self.stop();
    }
}
