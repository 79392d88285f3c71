//! The physics scene that runs inside the background context.
//!
//! Owns the physics backend, the live connector set and the pointer proxy.
//! Each [`PhysicsScene::tick`] moves the proxy, applies the restoring
//! impulses, eases displayed colors, steps the engine and reports a
//! [`SceneFrame`] for the renderer.

use crate::color::{DampedColor, Rgb};
use crate::composition::COMPOSITION;
use crate::constants::{
    ACCENT_LIGHT_DISTANCE, ACCENT_LIGHT_INTENSITY, COLOR_SMOOTH_TIME, CONNECTOR_COUNT,
    MAX_FRAME_DELTA, MESH_RADIUS, NEUTRAL_COLOR, RESTORING_COEFF,
};
use crate::entities::{shuffle, AccentCycle, ConnectorSpec};
use crate::physics::{BodyDesc, PhysicsBackend};
use crate::state::Viewport;
use glam::{Vec2, Vec3};
use rand::Rng;

/// Impulse that pulls a body at `position` back toward the origin.
#[inline]
pub fn restoring_impulse(position: Vec3) -> Vec3 {
    -position * RESTORING_COEFF
}

/// Clamp a frame delta into `[0, MAX_FRAME_DELTA]`; NaN counts as zero.
#[inline]
pub fn clamp_delta(delta: f32) -> f32 {
    if delta.is_nan() {
        0.0
    } else {
        delta.clamp(0.0, MAX_FRAME_DELTA)
    }
}

/// A live connector: factory spec, engine handle, eased display color.
#[derive(Clone, Debug)]
pub struct Connector<H> {
    pub body: H,
    pub spec: ConnectorSpec,
    pub displayed: DampedColor,
}

/// The single kinematic body that follows the pointer.
#[derive(Clone, Copy, Debug)]
pub struct PointerProxy<H> {
    pub body: H,
}

/// Per-frame input to the tick.
#[derive(Clone, Copy, Debug)]
pub struct FrameInput {
    pub delta: f32,
    pub pointer_ndc: Vec2,
    pub viewport: Viewport,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SphereInstance {
    pub position: Vec3,
    pub radius: f32,
    /// Linear-space color.
    pub color: [f32; 3],
    pub roughness: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    /// Linear-space color.
    pub color: [f32; 3],
    pub intensity: f32,
    pub distance: f32,
}

/// Renderer input for one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SceneFrame {
    pub clear_color: [f32; 4],
    pub spheres: Vec<SphereInstance>,
    pub point_lights: Vec<PointLight>,
}

pub struct PhysicsScene<P: PhysicsBackend, R: Rng> {
    physics: P,
    rng: R,
    accent: AccentCycle,
    pointer: PointerProxy<P::Handle>,
    connectors: Vec<Connector<P::Handle>>,
    generation: u64,
}

impl<P: PhysicsBackend, R: Rng> PhysicsScene<P, R> {
    /// Spawn the pointer proxy and the initial connector set.
    pub fn new(mut physics: P, rng: R) -> Self {
        let pointer = PointerProxy {
            body: physics.spawn(&BodyDesc::pointer()),
        };
        let mut scene = Self {
            physics,
            rng,
            accent: AccentCycle::default(),
            pointer,
            connectors: Vec::with_capacity(CONNECTOR_COUNT),
            generation: 0,
        };
        scene.rematerialize();
        log::info!(
            "[scene] spawned {} connectors, accent={}",
            scene.connectors.len(),
            scene.accent.index()
        );
        scene
    }

    pub fn accent(&self) -> usize {
        self.accent.index()
    }

    pub fn connectors(&self) -> &[Connector<P::Handle>] {
        &self.connectors
    }

    pub fn pointer(&self) -> PointerProxy<P::Handle> {
        self.pointer
    }

    pub fn physics(&self) -> &P {
        &self.physics
    }

    /// How many times the connector set has been materialized.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Click handler: advance the accent and rebuild the connector set.
    pub fn advance_accent(&mut self) {
        let n = self.accent.advance();
        log::info!("[scene] accent -> {}", n);
        self.rematerialize();
    }

    /// Drop every connector body and spawn a fresh set from the factory.
    fn rematerialize(&mut self) {
        let previous: Vec<DampedColor> =
            self.connectors.iter().map(|c| c.displayed).collect();
        for c in self.connectors.drain(..) {
            self.physics.despawn(c.body);
        }
        let specs = shuffle(self.accent.index(), &mut self.rng);
        for (i, spec) in specs.into_iter().enumerate() {
            let body = self.physics.spawn(&BodyDesc::connector(spec.position));
            let displayed = previous
                .get(i)
                .copied()
                .unwrap_or_else(|| DampedColor::new(NEUTRAL_COLOR));
            self.connectors.push(Connector {
                body,
                spec,
                displayed,
            });
        }
        self.generation += 1;
    }

    /// One simulation + composition step.
    pub fn tick(&mut self, input: &FrameInput) -> SceneFrame {
        let dt = clamp_delta(input.delta);

        let target = input.viewport.project(input.pointer_ndc);
        self.physics
            .set_next_kinematic_translation(self.pointer.body, target);

        for c in &mut self.connectors {
            if let Some(pos) = self.physics.translation(c.body) {
                self.physics.apply_impulse(c.body, restoring_impulse(pos));
            }
            c.displayed.step(c.spec.color(), COLOR_SMOOTH_TIME, dt);
        }

        self.physics.step(dt);
        self.frame()
    }

    /// Snapshot of what should be drawn right now.
    pub fn frame(&self) -> SceneFrame {
        let mut spheres = Vec::with_capacity(self.connectors.len());
        let mut point_lights = Vec::new();
        for c in &self.connectors {
            let position = self.physics.translation(c.body).unwrap_or(c.spec.position);
            spheres.push(SphereInstance {
                position,
                radius: MESH_RADIUS,
                color: c.displayed.current().to_linear().to_array(),
                roughness: c.spec.roughness,
            });
            if c.spec.is_accent() {
                point_lights.push(PointLight {
                    position,
                    color: c.spec.color().to_linear().to_array(),
                    intensity: ACCENT_LIGHT_INTENSITY,
                    distance: ACCENT_LIGHT_DISTANCE,
                });
            }
        }
        SceneFrame {
            clear_color: COMPOSITION.clear_color,
            spheres,
            point_lights,
        }
    }

    /// Target colors of the live set, in slot order.
    pub fn target_colors(&self) -> Vec<Rgb> {
        self.connectors.iter().map(|c| c.spec.color()).collect()
    }
}
