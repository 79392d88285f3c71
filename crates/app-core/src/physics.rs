//! Engine-agnostic physics seam.
//!
//! The scene only needs spawn/despawn, translation reads, impulses and
//! kinematic targets. [`PhysicsBackend`] names exactly that; [`RapierWorld`]
//! implements it on `rapier3d`, which owns all body state. The scene keeps
//! the returned handles as non-owning arena indices.

use crate::constants::{
    CONNECTOR_ANGULAR_DAMPING, CONNECTOR_FRICTION, CONNECTOR_LINEAR_DAMPING, CONNECTOR_RADIUS,
    GRAVITY, POINTER_RADIUS,
};
use glam::Vec3;
use rapier3d::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyKind {
    Dynamic,
    /// Position driven from outside; forces do not move it.
    KinematicPosition,
}

/// Everything needed to spawn one ball-shaped body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyDesc {
    pub kind: BodyKind,
    pub position: Vec3,
    pub radius: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub friction: f32,
}

impl BodyDesc {
    pub fn connector(position: Vec3) -> Self {
        Self {
            kind: BodyKind::Dynamic,
            position,
            radius: CONNECTOR_RADIUS,
            linear_damping: CONNECTOR_LINEAR_DAMPING,
            angular_damping: CONNECTOR_ANGULAR_DAMPING,
            friction: CONNECTOR_FRICTION,
        }
    }

    pub fn pointer() -> Self {
        Self {
            kind: BodyKind::KinematicPosition,
            position: Vec3::ZERO,
            radius: POINTER_RADIUS,
            linear_damping: 0.0,
            angular_damping: 0.0,
            friction: 0.5,
        }
    }
}

pub trait PhysicsBackend {
    type Handle: Copy + Eq + std::fmt::Debug;

    fn spawn(&mut self, desc: &BodyDesc) -> Self::Handle;
    fn despawn(&mut self, handle: Self::Handle);
    fn translation(&self, handle: Self::Handle) -> Option<Vec3>;
    fn apply_impulse(&mut self, handle: Self::Handle, impulse: Vec3);
    fn set_next_kinematic_translation(&mut self, handle: Self::Handle, target: Vec3);
    fn step(&mut self, dt: f32);
    fn gravity(&self) -> Vec3;
    fn body_count(&self) -> usize;
    fn kind(&self, handle: Self::Handle) -> Option<BodyKind>;
}

/// `rapier3d` world with gravity disabled.
pub struct RapierWorld {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
}

impl RapierWorld {
    pub fn new() -> Self {
        Self {
            gravity: vector![GRAVITY.x, GRAVITY.y, GRAVITY.z],
            integration_parameters: IntegrationParameters::default(),
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
        }
    }

    /// Linear velocity of a body.
    pub fn linvel(&self, handle: RigidBodyHandle) -> Option<Vec3> {
        self.bodies.get(handle).map(|b| {
            let v = b.linvel();
            Vec3::new(v.x, v.y, v.z)
        })
    }
}

impl Default for RapierWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsBackend for RapierWorld {
    type Handle = RigidBodyHandle;

    fn spawn(&mut self, desc: &BodyDesc) -> RigidBodyHandle {
        let builder = match desc.kind {
            BodyKind::Dynamic => RigidBodyBuilder::dynamic(),
            BodyKind::KinematicPosition => RigidBodyBuilder::kinematic_position_based(),
        };
        let body = builder
            .translation(vector![desc.position.x, desc.position.y, desc.position.z])
            .linear_damping(desc.linear_damping)
            .angular_damping(desc.angular_damping)
            .build();
        let handle = self.bodies.insert(body);
        let collider = ColliderBuilder::ball(desc.radius)
            .friction(desc.friction)
            .build();
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);
        handle
    }

    fn despawn(&mut self, handle: RigidBodyHandle) {
        self.bodies.remove(
            handle,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    fn translation(&self, handle: RigidBodyHandle) -> Option<Vec3> {
        self.bodies.get(handle).map(|b| {
            let t = b.translation();
            Vec3::new(t.x, t.y, t.z)
        })
    }

    fn apply_impulse(&mut self, handle: RigidBodyHandle, impulse: Vec3) {
        if let Some(b) = self.bodies.get_mut(handle) {
            b.apply_impulse(vector![impulse.x, impulse.y, impulse.z], true);
        }
    }

    fn set_next_kinematic_translation(&mut self, handle: RigidBodyHandle, target: Vec3) {
        if let Some(b) = self.bodies.get_mut(handle) {
            b.set_next_kinematic_translation(vector![target.x, target.y, target.z]);
        }
    }

    fn step(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        self.integration_parameters.dt = dt;
        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );
    }

    fn gravity(&self) -> Vec3 {
        Vec3::new(self.gravity.x, self.gravity.y, self.gravity.z)
    }

    fn body_count(&self) -> usize {
        self.bodies.len()
    }

    fn kind(&self, handle: RigidBodyHandle) -> Option<BodyKind> {
        self.bodies.get(handle).map(|b| {
            if b.is_kinematic() {
                BodyKind::KinematicPosition
            } else {
                BodyKind::Dynamic
            }
        })
    }
}
