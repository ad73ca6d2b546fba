//! Reference physics world
//!
//! A small brute-force rigid-body world implementing [`PhysicsService`].
//! It exists so the simulation can run headless (tests, the sandbox binary)
//! without a production engine. Hosts embedding the core plug their own
//! engine in through the same trait.
//!
//! # Model
//!
//! - Dynamic bodies are spheres with mass; no body-body contacts
//! - Static colliders are spheres (planets) and AABBs (terrain blocks)
//! - Semi-implicit Euler: forces → velocity → position
//! - Penetration against statics is resolved by pushing the body out along
//!   the contact normal and removing the inward velocity component; every
//!   resolved contact is reported as a [`CollisionEvent`]

use std::collections::BTreeMap;

use glam::{Quat, Vec3};
use log::trace;

use super::collision::{aabb_surface_normal, ray_aabb_intersect, ray_sphere_intersect, sphere_aabb_penetration};
use super::service::PhysicsService;
use super::types::{BodyDesc, BodyHandle, BodySnapshot, ColliderId, CollisionEvent, RayHit};

/// A static collider shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StaticShape {
    /// Solid sphere, e.g. a planet
    Sphere { center: Vec3, radius: f32 },
    /// Axis-aligned box, e.g. a ledge or building block
    Aabb { min: Vec3, max: Vec3 },
}

#[derive(Debug, Clone, Copy)]
struct Body {
    position: Vec3,
    velocity: Vec3,
    rotation: Quat,
    mass: f32,
    radius: f32,
    force: Vec3,
}

/// Brute-force physics world with sphere bodies and static colliders.
#[derive(Debug, Clone, Default)]
pub struct SimplePhysicsWorld {
    bodies: BTreeMap<BodyHandle, Body>,
    statics: Vec<(u32, StaticShape)>,
    events: Vec<CollisionEvent>,
    next_body: u32,
    next_static: u32,
}

impl SimplePhysicsWorld {
    /// Create an empty world.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a static collider and return its id.
    pub fn add_static(&mut self, shape: StaticShape) -> u32 {
        let id = self.next_static;
        self.next_static += 1;
        self.statics.push((id, shape));
        id
    }

    /// Convenience: add a static planet sphere.
    pub fn add_planet(&mut self, center: Vec3, radius: f32) -> u32 {
        self.add_static(StaticShape::Sphere { center, radius })
    }

    /// Number of live dynamic bodies.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Radius of a body's sphere collider.
    pub fn body_radius(&self, handle: BodyHandle) -> Option<f32> {
        self.bodies.get(&handle).map(|b| b.radius)
    }

    fn ray_vs_static(
        shape: &StaticShape,
        origin: Vec3,
        direction: Vec3,
    ) -> Option<(f32, Vec3)> {
        match *shape {
            StaticShape::Sphere { center, radius } => {
                let t = ray_sphere_intersect(origin, direction, center, radius)?;
                let point = origin + direction * t;
                let normal = (point - center).try_normalize().unwrap_or(-direction);
                Some((t, normal))
            }
            StaticShape::Aabb { min, max } => {
                let t = ray_aabb_intersect(origin, direction, min, max)?;
                let point = origin + direction * t;
                Some((t, aabb_surface_normal(point, min, max)))
            }
        }
    }

    fn resolve_static_contacts(&mut self) {
        for (handle, body) in self.bodies.iter_mut() {
            for (id, shape) in &self.statics {
                let contact = match *shape {
                    StaticShape::Sphere { center, radius } => {
                        let offset = body.position - center;
                        let dist = offset.length();
                        let overlap = radius + body.radius - dist;
                        if overlap <= 0.0 {
                            None
                        } else {
                            let normal = if dist > 1e-6 { offset / dist } else { Vec3::Y };
                            Some((overlap, normal))
                        }
                    }
                    StaticShape::Aabb { min, max } => {
                        sphere_aabb_penetration(body.position, body.radius, min, max)
                    }
                };

                let Some((depth, normal)) = contact else {
                    continue;
                };

                body.position += normal * depth;
                let inward = body.velocity.dot(normal);
                if inward < 0.0 {
                    body.velocity -= normal * inward;
                }

                self.events.push(CollisionEvent {
                    body: *handle,
                    other: ColliderId::Static(*id),
                    normal,
                    point: body.position - normal * body.radius,
                });
            }
        }
    }
}

impl PhysicsService for SimplePhysicsWorld {
    fn create_body(&mut self, desc: BodyDesc) -> BodyHandle {
        let handle = BodyHandle(self.next_body);
        self.next_body += 1;
        self.bodies.insert(
            handle,
            Body {
                position: desc.position,
                velocity: desc.velocity,
                rotation: desc.rotation.normalize(),
                mass: desc.mass.max(0.001),
                radius: desc.radius.max(0.0),
                force: Vec3::ZERO,
            },
        );
        trace!("created body {:?} at {:?}", handle, desc.position);
        handle
    }

    fn remove_body(&mut self, handle: BodyHandle) -> bool {
        self.bodies.remove(&handle).is_some()
    }

    fn body(&self, handle: BodyHandle) -> Option<BodySnapshot> {
        self.bodies.get(&handle).map(|b| BodySnapshot {
            handle,
            position: b.position,
            velocity: b.velocity,
            rotation: b.rotation,
            mass: b.mass,
        })
    }

    fn cast_ray(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        exclude: Option<BodyHandle>,
    ) -> Option<RayHit> {
        let direction = direction.try_normalize()?;
        let mut best: Option<RayHit> = None;

        let mut consider = |distance: f32, normal: Vec3, collider: ColliderId| {
            if distance > max_distance {
                return;
            }
            if best.is_none_or(|hit| distance < hit.distance) {
                best = Some(RayHit {
                    distance,
                    point: origin + direction * distance,
                    normal,
                    collider,
                });
            }
        };

        for (id, shape) in &self.statics {
            if let Some((t, normal)) = Self::ray_vs_static(shape, origin, direction) {
                consider(t, normal, ColliderId::Static(*id));
            }
        }

        for (handle, body) in &self.bodies {
            if Some(*handle) == exclude {
                continue;
            }
            if let Some(t) = ray_sphere_intersect(origin, direction, body.position, body.radius) {
                let point = origin + direction * t;
                let normal = (point - body.position).try_normalize().unwrap_or(-direction);
                consider(t, normal, ColliderId::Body(*handle));
            }
        }

        best
    }

    fn apply_impulse(&mut self, handle: BodyHandle, impulse: Vec3) {
        if let Some(body) = self.bodies.get_mut(&handle) {
            body.velocity += impulse / body.mass;
        }
    }

    fn add_force(&mut self, handle: BodyHandle, force: Vec3) {
        if let Some(body) = self.bodies.get_mut(&handle) {
            body.force += force;
        }
    }

    fn set_linear_velocity(&mut self, handle: BodyHandle, velocity: Vec3) {
        if let Some(body) = self.bodies.get_mut(&handle) {
            body.velocity = velocity;
        }
    }

    fn set_position(&mut self, handle: BodyHandle, position: Vec3) {
        if let Some(body) = self.bodies.get_mut(&handle) {
            body.position = position;
        }
    }

    fn set_rotation(&mut self, handle: BodyHandle, rotation: Quat) {
        if let Some(body) = self.bodies.get_mut(&handle) {
            body.rotation = rotation.normalize();
        }
    }

    fn drain_collision_events(&mut self) -> Vec<CollisionEvent> {
        std::mem::take(&mut self.events)
    }

    fn step(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }

        for body in self.bodies.values_mut() {
            body.velocity += body.force / body.mass * dt;
            body.position += body.velocity * dt;
            body.force = Vec3::ZERO;
        }

        self.resolve_static_contacts();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ray_hits_planet_surface() {
        let mut world = SimplePhysicsWorld::new();
        let planet = world.add_planet(Vec3::ZERO, 100.0);

        let hit = world
            .cast_ray(Vec3::new(0.0, 110.0, 0.0), -Vec3::Y, 50.0, None)
            .expect("ray should hit the planet");
        assert_relative_eq!(hit.distance, 10.0, epsilon = 1e-3);
        assert_relative_eq!(hit.normal.y, 1.0, epsilon = 1e-5);
        assert_eq!(hit.collider, ColliderId::Static(planet));
    }

    #[test]
    fn test_ray_respects_max_distance() {
        let mut world = SimplePhysicsWorld::new();
        world.add_planet(Vec3::ZERO, 100.0);
        assert!(world.cast_ray(Vec3::new(0.0, 110.0, 0.0), -Vec3::Y, 5.0, None).is_none());
    }

    #[test]
    fn test_ray_excludes_caster() {
        let mut world = SimplePhysicsWorld::new();
        let caster = world.create_body(BodyDesc::sphere(Vec3::ZERO, 1.0, 1.0));
        let other = world.create_body(BodyDesc::sphere(Vec3::new(0.0, 0.0, -10.0), 1.0, 1.0));

        let hit = world
            .cast_ray(Vec3::ZERO, -Vec3::Z, 50.0, Some(caster))
            .expect("should hit the other body");
        assert_eq!(hit.collider, ColliderId::Body(other));
        assert_relative_eq!(hit.distance, 9.0, epsilon = 1e-4);
    }

    #[test]
    fn test_impulse_divides_by_mass() {
        let mut world = SimplePhysicsWorld::new();
        let h = world.create_body(BodyDesc::sphere(Vec3::ZERO, 4.0, 0.5));
        world.apply_impulse(h, Vec3::new(8.0, 0.0, 0.0));
        let body = world.body(h).expect("body exists");
        assert_relative_eq!(body.velocity.x, 2.0);
    }

    #[test]
    fn test_force_integrates_over_step() {
        let mut world = SimplePhysicsWorld::new();
        let h = world.create_body(BodyDesc::sphere(Vec3::ZERO, 2.0, 0.5));
        world.add_force(h, Vec3::new(0.0, 0.0, 4.0));
        world.step(0.5);
        let body = world.body(h).expect("body exists");
        assert_relative_eq!(body.velocity.z, 1.0);
        assert_relative_eq!(body.position.z, 0.5);

        // Force is cleared after the step
        world.step(0.5);
        assert_relative_eq!(world.body(h).expect("body exists").velocity.z, 1.0);
    }

    #[test]
    fn test_resting_contact_emits_event_and_stops_sinking() {
        let mut world = SimplePhysicsWorld::new();
        world.add_planet(Vec3::ZERO, 10.0);
        let h = world.create_body(
            BodyDesc::sphere(Vec3::new(0.0, 10.4, 0.0), 1.0, 0.5).with_velocity(Vec3::new(0.0, -3.0, 0.0)),
        );

        world.step(1.0 / 60.0);

        let body = world.body(h).expect("body exists");
        assert_relative_eq!(body.position.y, 10.5, epsilon = 1e-4);
        assert!(body.velocity.y >= 0.0);

        let events = world.drain_collision_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].body, h);
        assert!(world.drain_collision_events().is_empty());
    }

    #[test]
    fn test_remove_body() {
        let mut world = SimplePhysicsWorld::new();
        let h = world.create_body(BodyDesc::default());
        assert_eq!(world.body_count(), 1);
        assert!(world.remove_body(h));
        assert!(!world.remove_body(h));
        assert!(world.body(h).is_none());
    }
}
