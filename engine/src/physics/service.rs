//! Rigid-body service boundary
//!
//! The simulation core consumes a physics engine through [`PhysicsService`]
//! and never reimplements it. Every query returns an `Option` so callers are
//! forced to handle "nothing there" explicitly; writes to unknown handles are
//! ignored by implementations.
//!
//! [`NullPhysics`] stands in for an absent or uninitialised engine: every
//! probe reports no hit and every write is a no-op.

use glam::{Quat, Vec3};

use super::types::{BodyDesc, BodyHandle, BodySnapshot, CollisionEvent, RayHit};

/// Operations the simulation needs from a rigid-body engine.
pub trait PhysicsService {
    /// Create a dynamic body and return its handle.
    fn create_body(&mut self, desc: BodyDesc) -> BodyHandle;

    /// Release a body. Returns `false` if the handle was unknown.
    fn remove_body(&mut self, handle: BodyHandle) -> bool;

    /// Snapshot of a body's current state.
    fn body(&self, handle: BodyHandle) -> Option<BodySnapshot>;

    /// Cast a ray and return the closest hit within `max_distance`.
    ///
    /// # Arguments
    /// * `origin` - Ray start in world space
    /// * `direction` - Ray direction (normalized)
    /// * `max_distance` - Maximum distance to search (meters)
    /// * `exclude` - Body whose collider is ignored (usually the caster)
    fn cast_ray(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        exclude: Option<BodyHandle>,
    ) -> Option<RayHit>;

    /// Apply an instantaneous impulse (kg·m/s).
    fn apply_impulse(&mut self, handle: BodyHandle, impulse: Vec3);

    /// Accumulate a force (N) applied over the next step.
    fn add_force(&mut self, handle: BodyHandle, force: Vec3);

    /// Overwrite the linear velocity.
    fn set_linear_velocity(&mut self, handle: BodyHandle, velocity: Vec3);

    /// Overwrite the position.
    fn set_position(&mut self, handle: BodyHandle, position: Vec3);

    /// Overwrite the orientation.
    fn set_rotation(&mut self, handle: BodyHandle, rotation: Quat);

    /// Contacts observed since the previous drain.
    fn drain_collision_events(&mut self) -> Vec<CollisionEvent>;

    /// Advance the engine by `dt` seconds.
    fn step(&mut self, dt: f32);
}

/// Physics service used when no engine is attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPhysics;

impl PhysicsService for NullPhysics {
    fn create_body(&mut self, _desc: BodyDesc) -> BodyHandle {
        BodyHandle(u32::MAX)
    }

    fn remove_body(&mut self, _handle: BodyHandle) -> bool {
        false
    }

    fn body(&self, _handle: BodyHandle) -> Option<BodySnapshot> {
        None
    }

    fn cast_ray(
        &self,
        _origin: Vec3,
        _direction: Vec3,
        _max_distance: f32,
        _exclude: Option<BodyHandle>,
    ) -> Option<RayHit> {
        None
    }

    fn apply_impulse(&mut self, _handle: BodyHandle, _impulse: Vec3) {}

    fn add_force(&mut self, _handle: BodyHandle, _force: Vec3) {}

    fn set_linear_velocity(&mut self, _handle: BodyHandle, _velocity: Vec3) {}

    fn set_position(&mut self, _handle: BodyHandle, _position: Vec3) {}

    fn set_rotation(&mut self, _handle: BodyHandle, _rotation: Quat) {}

    fn drain_collision_events(&mut self) -> Vec<CollisionEvent> {
        Vec::new()
    }

    fn step(&mut self, _dt: f32) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_physics_reports_nothing() {
        let mut physics = NullPhysics;
        let handle = physics.create_body(BodyDesc::default());
        assert!(physics.body(handle).is_none());
        assert!(physics.cast_ray(Vec3::ZERO, -Vec3::Y, 100.0, None).is_none());
        physics.apply_impulse(handle, Vec3::Y);
        physics.step(1.0 / 60.0);
        assert!(physics.drain_collision_events().is_empty());
        assert!(!physics.remove_body(handle));
    }
}
