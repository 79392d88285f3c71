//! Host mount: the outward-facing state machine.
//!
//! `Unresolved` renders nothing. Once the capability resolves the mount moves
//! to `Insufficient` (static fallback, no worker ever) or `Sufficient`
//! (exactly one bridge). Transitions only go forward while mounted.

use crate::bridge::{BridgeView, ContextSpawner, RenderBridge, SurfaceOf};
use crate::capability::{CapabilityClass, Resolution};
use crate::constants::{
    FALLBACK_DESCRIPTION, FALLBACK_IMAGE_ALT, FALLBACK_IMAGE_HEIGHT, FALLBACK_IMAGE_SRC,
    FALLBACK_IMAGE_WIDTH,
};
use crate::error::BridgeError;
use crate::message::{PointerUpdate, SurfaceHandoff, WorkerMessage};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostState {
    Unresolved,
    Insufficient,
    Sufficient,
}

/// Static image shown to devices below the tier threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FallbackImage {
    pub src: &'static str,
    pub width: u32,
    pub height: u32,
    pub alt: &'static str,
    /// Text for non-visual consumers.
    pub description: &'static str,
}

pub const FALLBACK_IMAGE: FallbackImage = FallbackImage {
    src: FALLBACK_IMAGE_SRC,
    width: FALLBACK_IMAGE_WIDTH,
    height: FALLBACK_IMAGE_HEIGHT,
    alt: FALLBACK_IMAGE_ALT,
    description: FALLBACK_DESCRIPTION,
};

#[derive(Debug, PartialEq)]
pub enum HostView<'a> {
    Nothing,
    Fallback(&'static FallbackImage),
    Animation(BridgeView<'a>),
}

pub struct HostMount<S: ContextSpawner> {
    spawner: S,
    state: HostState,
    bridge: Option<RenderBridge<S::Context>>,
}

impl<S: ContextSpawner> HostMount<S> {
    pub fn new(spawner: S) -> Self {
        Self {
            spawner,
            state: HostState::Unresolved,
            bridge: None,
        }
    }

    pub fn state(&self) -> HostState {
        self.state
    }

    pub fn spawner(&self) -> &S {
        &self.spawner
    }

    pub fn bridge(&self) -> Option<&RenderBridge<S::Context>> {
        self.bridge.as_ref()
    }

    /// Apply the capability resolution. `acquire_surface` is only called on
    /// the sufficient path, right before the bridge starts.
    pub fn on_capability<F>(&mut self, resolution: Resolution, acquire_surface: F) -> HostState
    where
        F: FnOnce() -> Result<SurfaceHandoff<SurfaceOf<S>>, BridgeError>,
    {
        if self.state != HostState::Unresolved {
            log::debug!("[host] ignoring resolution in state {:?}", self.state);
            return self.state;
        }
        let tier = match resolution {
            Resolution::Resolved(t) => t,
            Resolution::Failed => return self.state,
        };
        match tier.class() {
            CapabilityClass::Insufficient => {
                log::info!("[host] tier {} below threshold; showing fallback", tier.get());
                self.state = HostState::Insufficient;
            }
            CapabilityClass::Sufficient => {
                log::info!("[host] tier {}; starting render bridge", tier.get());
                let bridge = match acquire_surface() {
                    Ok(handoff) => RenderBridge::start(&mut self.spawner, handoff),
                    Err(e) => RenderBridge::degraded(&e),
                };
                self.bridge = Some(bridge);
                self.state = HostState::Sufficient;
            }
        }
        self.state
    }

    pub fn on_worker_message(&mut self, message: WorkerMessage) {
        if let Some(b) = self.bridge.as_mut() {
            b.on_worker_message(message);
        }
    }

    pub fn forward_pointer(&mut self, update: PointerUpdate) {
        if let Some(b) = self.bridge.as_mut() {
            b.forward_pointer(update);
        }
    }

    pub fn view(&self) -> HostView<'_> {
        match self.state {
            HostState::Unresolved => HostView::Nothing,
            HostState::Insufficient => HostView::Fallback(&FALLBACK_IMAGE),
            HostState::Sufficient => match self.bridge.as_ref() {
                Some(b) => HostView::Animation(b.view()),
                None => HostView::Nothing,
            },
        }
    }

    /// Terminate the owned worker, if any. Safe to call repeatedly.
    pub fn unmount(&mut self) {
        if let Some(mut b) = self.bridge.take() {
            b.stop();
        }
    }
}

impl<S: ContextSpawner> Drop for HostMount<S> {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// A place in the page/window that holds at most one mount. Remounting
/// always tears the previous instance down first.
pub struct HostSlot<S: ContextSpawner> {
    current: Option<HostMount<S>>,
}

impl<S: ContextSpawner> HostSlot<S> {
    pub fn new() -> Self {
        Self { current: None }
    }

    pub fn mount(&mut self, spawner: S) -> &mut HostMount<S> {
        self.unmount();
        self.current.insert(HostMount::new(spawner))
    }

    pub fn unmount(&mut self) {
        if let Some(mut m) = self.current.take() {
            m.unmount();
        }
    }

    pub fn current(&self) -> Option<&HostMount<S>> {
        self.current.as_ref()
    }

    pub fn current_mut(&mut self) -> Option<&mut HostMount<S>> {
        self.current.as_mut()
    }
}

impl<S: ContextSpawner> Default for HostSlot<S> {
    fn default() -> Self {
        Self::new()
    }
}
