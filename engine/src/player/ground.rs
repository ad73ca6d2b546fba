//! Ground Detection
//!
//! Decides whether a character stands on something, using three foot probes
//! cast along the local gravity direction plus the physics engine's own
//! contact events as a fallback.
//!
//! # Probe layout
//!
//! ```text
//!        body center
//!            |
//!   left  center  right      <- origins, `probe_lift` above the feet
//!    |      |      |
//!    v      v      v          cast along gravity for lift + reach
//! ```
//!
//! Raycasts miss thin seams and box edges that the engine's contact solver
//! still catches, so a contact seen within the grace window also counts as
//! support. Both paths require the character not to be falling fast.

use glam::Vec3;
use log::trace;

use crate::config::GroundProbeConfig;
use crate::gravity::GravityField;
use crate::math::{any_perpendicular, normalize_or, project_on_plane, LOCAL_RIGHT};
use crate::physics::{BodyHandle, BodySnapshot, PhysicsService, RayHit};

/// Raw results of the three foot probes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FootProbes {
    pub left: Option<RayHit>,
    pub right: Option<RayHit>,
    pub center: Option<RayHit>,
}

impl FootProbes {
    /// Iterate over the probes that hit.
    pub fn hits(&self) -> impl Iterator<Item = &RayHit> {
        [&self.left, &self.right, &self.center]
            .into_iter()
            .filter_map(Option::as_ref)
    }

    pub fn hit_count(&self) -> usize {
        self.hits().count()
    }

    /// The hit nearest its probe origin.
    pub fn closest(&self) -> Option<RayHit> {
        self.hits()
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
            .copied()
    }
}

/// Aggregated ground state for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundProbeResult {
    pub probes: FootProbes,
    pub is_grounded: bool,
    /// Normalized average of hit normals, or up when nothing hit
    pub surface_normal: Vec3,
    pub closest_hit: Option<RayHit>,
    /// Grounded only because of a recent contact event
    pub from_contact: bool,
}

impl GroundProbeResult {
    /// Result for a body that could not be probed at all.
    pub fn airborne(up: Vec3) -> Self {
        Self {
            probes: FootProbes::default(),
            is_grounded: false,
            surface_normal: up,
            closest_hit: None,
            from_contact: false,
        }
    }
}

/// Multi-probe ground detector with contact-event fallback.
#[derive(Debug, Clone)]
pub struct GroundDetector {
    config: GroundProbeConfig,
    /// Seconds since the last supporting contact event, if any
    contact_age: Option<f32>,
}

impl GroundDetector {
    pub fn new(config: GroundProbeConfig) -> Self {
        Self {
            config,
            contact_age: None,
        }
    }

    pub fn config(&self) -> &GroundProbeConfig {
        &self.config
    }

    /// Advance the contact timer by one tick.
    pub fn advance(&mut self, dt: f32) {
        if let Some(age) = self.contact_age.as_mut() {
            *age += dt;
        }
    }

    /// Record a contact reported by the physics engine.
    ///
    /// Only contacts whose normal is within the configured slope of `up`
    /// count; walls and ceilings are ignored.
    pub fn record_contact(&mut self, normal: Vec3, up: Vec3) {
        if normal.dot(up) >= self.config.min_contact_alignment {
            self.contact_age = Some(0.0);
        }
    }

    /// Check if a supporting contact was seen within the grace window.
    pub fn has_recent_contact(&self) -> bool {
        self.contact_age
            .is_some_and(|age| age <= self.config.contact_grace)
    }

    /// Cast a single foot probe.
    ///
    /// # Arguments
    /// * `physics` - Service to query
    /// * `origin` - Probe start in world space
    /// * `direction` - Probe direction (normalized)
    /// * `max_distance` - Probe length in meters
    /// * `exclude` - The character's own body
    pub fn cast_foot(
        physics: &dyn PhysicsService,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        exclude: Option<BodyHandle>,
    ) -> Option<RayHit> {
        physics.cast_ray(origin, direction, max_distance, exclude)
    }

    /// Probe beneath a character and decide whether it is grounded.
    ///
    /// # Arguments
    /// * `physics` - Service to query
    /// * `gravity` - Field defining "down" at the body
    /// * `body` - This tick's snapshot of the character's body
    /// * `height` - Character height (body center sits at half height)
    /// * `radius` - Character radius, scales the lateral probe offset
    pub fn check_grounded(
        &self,
        physics: &dyn PhysicsService,
        gravity: &GravityField,
        body: &BodySnapshot,
        height: f32,
        radius: f32,
    ) -> GroundProbeResult {
        let down = gravity.direction(body.position);
        let up = -down;

        let body_right = body.rotation * LOCAL_RIGHT;
        let lateral = normalize_or(project_on_plane(body_right, up), any_perpendicular(up));
        let offset = lateral * radius * self.config.lateral_offset;

        let feet = body.position + down * (height * 0.5);
        let center_origin = feet + up * self.config.probe_lift;
        let max_distance = self.config.probe_lift + self.config.probe_reach;
        let exclude = Some(body.handle);

        let probes = FootProbes {
            left: Self::cast_foot(physics, center_origin - offset, down, max_distance, exclude),
            right: Self::cast_foot(physics, center_origin + offset, down, max_distance, exclude),
            center: Self::cast_foot(physics, center_origin, down, max_distance, exclude),
        };

        let normal_sum: Vec3 = probes.hits().map(|hit| hit.normal).sum();
        let surface_normal = normalize_or(normal_sum, up);

        let falling_speed = body.velocity.dot(down);
        let slow_enough = falling_speed < self.config.max_grounded_fall_speed;
        let probe_support = probes.hit_count() > 0;
        let contact_support = self.has_recent_contact();

        let is_grounded = slow_enough && (probe_support || contact_support);
        let from_contact = is_grounded && !probe_support;

        trace!(
            "ground check {:?}: hits={} contact={} falling={:.2} grounded={}",
            body.handle,
            probes.hit_count(),
            contact_support,
            falling_speed,
            is_grounded
        );

        GroundProbeResult {
            probes,
            is_grounded,
            surface_normal,
            closest_hit: probes.closest(),
            from_contact,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{BodyDesc, NullPhysics, SimplePhysicsWorld, StaticShape};
    use approx::assert_abs_diff_eq;
    use glam::Quat;

    const HEIGHT: f32 = 1.8;
    const RADIUS: f32 = 0.4;

    fn flat_world() -> SimplePhysicsWorld {
        let mut world = SimplePhysicsWorld::new();
        world.add_static(StaticShape::Aabb {
            min: Vec3::new(-50.0, -1.0, -50.0),
            max: Vec3::new(50.0, 0.0, 50.0),
        });
        world
    }

    fn standing_body(world: &mut SimplePhysicsWorld, velocity: Vec3) -> BodySnapshot {
        let handle = world.create_body(
            BodyDesc::sphere(Vec3::new(0.0, HEIGHT * 0.5, 0.0), 80.0, HEIGHT * 0.5)
                .with_velocity(velocity),
        );
        world.body(handle).expect("body exists")
    }

    fn far_gravity() -> GravityField {
        GravityField::new(Vec3::new(0.0, -10_000.0, 0.0), 9.81)
    }

    #[test]
    fn test_flat_ground_all_probes_hit() {
        let mut world = flat_world();
        let body = standing_body(&mut world, Vec3::ZERO);
        let detector = GroundDetector::new(GroundProbeConfig::default());

        let result = detector.check_grounded(&world, &far_gravity(), &body, HEIGHT, RADIUS);

        assert!(result.is_grounded);
        assert!(!result.from_contact);
        assert_eq!(result.probes.hit_count(), 3);
        assert_abs_diff_eq!(result.surface_normal.dot(Vec3::Y), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_fast_fall_is_not_grounded() {
        let mut world = flat_world();
        let body = standing_body(&mut world, Vec3::new(0.0, -5.0, 0.0));
        let detector = GroundDetector::new(GroundProbeConfig::default());

        let result = detector.check_grounded(&world, &far_gravity(), &body, HEIGHT, RADIUS);
        assert!(!result.is_grounded);
        assert!(result.closest_hit.is_some());
    }

    #[test]
    fn test_high_above_ground_is_airborne() {
        let mut world = flat_world();
        let handle = world.create_body(BodyDesc::sphere(Vec3::new(0.0, 10.0, 0.0), 80.0, 0.9));
        let body = world.body(handle).expect("body exists");
        let detector = GroundDetector::new(GroundProbeConfig::default());

        let result = detector.check_grounded(&world, &far_gravity(), &body, HEIGHT, RADIUS);
        assert!(!result.is_grounded);
        assert!(result.closest_hit.is_none());
        assert_abs_diff_eq!(result.surface_normal.dot(Vec3::Y), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_recent_contact_grounds_without_probe_hits() {
        let mut world = SimplePhysicsWorld::new();
        let handle = world.create_body(BodyDesc::sphere(Vec3::new(0.0, 10.0, 0.0), 80.0, 0.9));
        let body = world.body(handle).expect("body exists");
        let mut detector = GroundDetector::new(GroundProbeConfig::default());
        let gravity = far_gravity();

        detector.record_contact(Vec3::Y, Vec3::Y);
        detector.advance(0.05);
        let result = detector.check_grounded(&world, &gravity, &body, HEIGHT, RADIUS);
        assert!(result.is_grounded);
        assert!(result.from_contact);

        detector.advance(0.2);
        let result = detector.check_grounded(&world, &gravity, &body, HEIGHT, RADIUS);
        assert!(!result.is_grounded);
    }

    #[test]
    fn test_ceiling_contact_is_ignored() {
        let mut detector = GroundDetector::new(GroundProbeConfig::default());
        detector.record_contact(Vec3::NEG_Y, Vec3::Y);
        assert!(!detector.has_recent_contact());
    }

    #[test]
    fn test_wall_contact_is_ignored() {
        let mut detector = GroundDetector::new(GroundProbeConfig::default());
        detector.record_contact(Vec3::new(1.0, 0.2, 0.0).normalize(), Vec3::Y);
        assert!(!detector.has_recent_contact());

        // A 45° ramp still supports
        detector.record_contact(Vec3::new(1.0, 1.0, 0.0).normalize(), Vec3::Y);
        assert!(detector.has_recent_contact());
    }

    #[test]
    fn test_null_physics_reports_no_ground() {
        let physics = NullPhysics;
        let body = BodySnapshot {
            handle: BodyHandle(0),
            position: Vec3::new(0.0, 1.0, 0.0),
            velocity: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            mass: 80.0,
        };
        let detector = GroundDetector::new(GroundProbeConfig::default());
        let result = detector.check_grounded(&physics, &far_gravity(), &body, HEIGHT, RADIUS);
        assert!(!result.is_grounded);
    }

    #[test]
    fn test_sloped_normals_are_averaged() {
        let probes = FootProbes {
            left: Some(RayHit {
                distance: 0.2,
                point: Vec3::ZERO,
                normal: Vec3::new(1.0, 1.0, 0.0).normalize(),
                collider: crate::physics::ColliderId::Static(0),
            }),
            right: Some(RayHit {
                distance: 0.1,
                point: Vec3::ZERO,
                normal: Vec3::new(-1.0, 1.0, 0.0).normalize(),
                collider: crate::physics::ColliderId::Static(0),
            }),
            center: None,
        };
        let sum: Vec3 = probes.hits().map(|h| h.normal).sum();
        assert_abs_diff_eq!(normalize_or(sum, Vec3::X).y, 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(probes.closest().expect("has hits").distance, 0.1);
    }
}
