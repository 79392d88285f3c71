pub mod bridge;
pub mod capability;
pub mod color;
pub mod composition;
pub mod constants;
pub mod entities;
pub mod error;
pub mod host;
pub mod message;
pub mod physics;
#[cfg(feature = "render")]
pub mod render;
pub mod runtime;
pub mod scene;
pub mod state;

pub static SCENE_WGSL: &str = include_str!("../shaders/scene.wgsl");
pub static AO_WGSL: &str = include_str!("../shaders/ao.wgsl");

pub use bridge::{
    BackgroundContext, BridgeView, ContextSpawner, RenderBridge, SceneDescription, SurfaceOf,
};
pub use capability::{
    estimate_tier, CapabilityClass, CapabilityGate, CapabilityTier, DeviceKind, GpuProfile,
    Resolution, TierReport, SESSION_GATE,
};
pub use color::{DampedColor, Rgb};
pub use composition::{Composition, COMPOSITION};
pub use constants::*;
pub use entities::{
    materials, shuffle, shuffle_at, AccentCycle, ConnectorSet, ConnectorSpec, Material,
    MaterialSpec,
};
pub use error::{BridgeError, CapabilityError, ColorError};
pub use host::{FallbackImage, HostMount, HostSlot, HostState, HostView, FALLBACK_IMAGE};
pub use message::{
    HostMessage, MessageKind, PointerUpdate, SurfaceHandoff, WorkerMessage, POINTER_WORDS,
};
pub use physics::{BodyDesc, BodyKind, PhysicsBackend, RapierWorld};
#[cfg(feature = "render")]
pub use render::Renderer;
pub use runtime::WorkerRuntime;
pub use scene::{FrameInput, PhysicsScene, PointLight, SceneFrame, SphereInstance};
pub use state::{ndc_from_pixels, Camera, Viewport};
