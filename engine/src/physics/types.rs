//! Physics boundary types
//!
//! Value types exchanged with the rigid-body service. The service owns all
//! body state; the simulation only ever holds handles and per-tick snapshots.

pub use glam::{Quat, Vec3};

use static_assertions::assert_impl_all;

/// Opaque handle to a rigid body owned by the physics service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(pub u32);

/// Identifies what a ray or contact touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColliderId {
    /// The collider attached to a dynamic body
    Body(BodyHandle),
    /// A static collider (terrain, planet surface, props)
    Static(u32),
}

impl ColliderId {
    /// The body handle, if the collider belongs to a dynamic body.
    pub fn body(&self) -> Option<BodyHandle> {
        match self {
            ColliderId::Body(handle) => Some(*handle),
            ColliderId::Static(_) => None,
        }
    }
}

/// Result of a successful raycast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Distance from ray origin to the hit point (meters)
    pub distance: f32,
    /// World-space hit point
    pub point: Vec3,
    /// Surface normal at the hit point (normalized)
    pub normal: Vec3,
    /// What was hit
    pub collider: ColliderId,
}

/// Read-only copy of a body's state for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodySnapshot {
    pub handle: BodyHandle,
    pub position: Vec3,
    pub velocity: Vec3,
    pub rotation: Quat,
    /// Mass in kilograms (always > 0)
    pub mass: f32,
}

/// Creation parameters for a dynamic body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyDesc {
    pub position: Vec3,
    pub velocity: Vec3,
    pub rotation: Quat,
    /// Mass in kilograms
    pub mass: f32,
    /// Radius of the body's bounding sphere collider (meters)
    pub radius: f32,
}

impl Default for BodyDesc {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            mass: 1.0,
            radius: 0.5,
        }
    }
}

impl BodyDesc {
    /// Sphere body at `position` with the given mass and radius.
    pub fn sphere(position: Vec3, mass: f32, radius: f32) -> Self {
        Self {
            position,
            mass,
            radius,
            ..Default::default()
        }
    }

    /// Builder: initial rotation.
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Builder: initial linear velocity.
    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }
}

/// A contact reported by the physics service during a step.
///
/// Contact events catch thin seams and edges that foot raycasts miss, so the
/// ground detector treats a recent event as evidence of support.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionEvent {
    /// The dynamic body involved in the contact
    pub body: BodyHandle,
    /// The other collider
    pub other: ColliderId,
    /// Contact normal pointing away from `other`, toward `body`
    pub normal: Vec3,
    /// World-space contact point
    pub point: Vec3,
}

assert_impl_all!(RayHit: Copy, Send, Sync);
assert_impl_all!(BodySnapshot: Copy, Send, Sync);
assert_impl_all!(CollisionEvent: Copy, Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collider_body_accessor() {
        assert_eq!(ColliderId::Body(BodyHandle(3)).body(), Some(BodyHandle(3)));
        assert_eq!(ColliderId::Static(7).body(), None);
    }

    #[test]
    fn test_body_desc_builders() {
        let desc = BodyDesc::sphere(Vec3::X, 80.0, 0.4)
            .with_velocity(Vec3::Y)
            .with_rotation(Quat::from_rotation_y(1.0));
        assert_eq!(desc.position, Vec3::X);
        assert_eq!(desc.mass, 80.0);
        assert_eq!(desc.radius, 0.4);
        assert_eq!(desc.velocity, Vec3::Y);
        assert_ne!(desc.rotation, Quat::IDENTITY);
    }
}
