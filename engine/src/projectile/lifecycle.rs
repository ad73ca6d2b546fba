//! Projectile lifecycle
//!
//! A guided projectile is a small state machine:
//!
//! ```text
//! Launched ──(ignition delay)──▶ Armed ──(fuse / impact / ground / age)──▶ Detonated
//!     └───────────────────────(age > lifetime)─────────────────────────────▲
//! ```
//!
//! - **Launched**: unpowered coast away from the launcher
//! - **Armed**: ignition impulse along the facing, then thrust and guidance
//!   every tick; proximity, impact and ground checks are live
//! - **Detonated**: terminal. The `detonated` guard makes detonation
//!   idempotent, so several triggers firing in one tick still produce one
//!   explosion and one resource release.

use glam::Vec3;
use log::{debug, info};

use crate::config::{ProjectileConfig, SimConfig};
use crate::gravity::GravityField;
use crate::guidance::{
    homing_update, validate_lock, LockConditions, LockStatus, TargetId, TargetRegistry, TargetState,
};
use crate::math::{normalize_or, LOCAL_FORWARD};
use crate::physics::{BodyHandle, PhysicsService};

/// Identifier of a projectile within a simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectileId(pub u32);

/// Lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectilePhase {
    Launched,
    Armed,
    Detonated,
}

/// What triggered a detonation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetonationReason {
    /// Within fuse radius of the locked target
    Proximity,
    /// Forward probe found something in the flight path
    Impact,
    /// Ground probe found the surface beneath
    GroundProximity,
    /// Self-destruct after the lifetime ceiling
    LifetimeExpired,
}

/// A detonation produced by [`Projectile::update`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detonation {
    pub projectile: ProjectileId,
    pub body: BodyHandle,
    pub position: Vec3,
    pub reason: DetonationReason,
    pub target: Option<TargetId>,
}

/// A live guided projectile.
///
/// Pose and velocity belong to the physics body; this holds only the
/// lifecycle state.
#[derive(Debug, Clone)]
pub struct Projectile {
    id: ProjectileId,
    body: BodyHandle,
    phase: ProjectilePhase,
    /// Seconds since launch
    age: f32,
    /// Thrust force once armed (N)
    thrust: f32,
    target: Option<TargetId>,
    lifetime: f32,
    fuse_radius: f32,
    detonated: bool,
    last_position: Vec3,
}

impl Projectile {
    /// Wrap a freshly created physics body.
    pub fn new(
        id: ProjectileId,
        body: BodyHandle,
        position: Vec3,
        target: Option<TargetId>,
        config: &ProjectileConfig,
    ) -> Self {
        Self {
            id,
            body,
            phase: ProjectilePhase::Launched,
            age: 0.0,
            thrust: config.thrust,
            target,
            lifetime: config.lifetime,
            fuse_radius: config.fuse_radius,
            detonated: false,
            last_position: position,
        }
    }

    pub fn id(&self) -> ProjectileId {
        self.id
    }

    pub fn body(&self) -> BodyHandle {
        self.body
    }

    pub fn phase(&self) -> ProjectilePhase {
        self.phase
    }

    pub fn age(&self) -> f32 {
        self.age
    }

    pub fn is_armed(&self) -> bool {
        self.phase == ProjectilePhase::Armed
    }

    pub fn is_detonated(&self) -> bool {
        self.detonated
    }

    pub fn thrust(&self) -> f32 {
        self.thrust
    }

    pub fn target(&self) -> Option<TargetId> {
        self.target
    }

    pub fn lifetime(&self) -> f32 {
        self.lifetime
    }

    /// Override the self-destruct age.
    pub fn set_lifetime(&mut self, lifetime: f32) {
        self.lifetime = lifetime;
    }

    pub fn fuse_radius(&self) -> f32 {
        self.fuse_radius
    }

    /// Last position seen from the physics service.
    pub fn last_position(&self) -> Vec3 {
        self.last_position
    }

    /// Mark the projectile detonated.
    ///
    /// # Returns
    /// The detonation record the first time; `None` on every later call.
    pub fn detonate(&mut self, reason: DetonationReason, position: Vec3) -> Option<Detonation> {
        if self.detonated {
            return None;
        }
        self.detonated = true;
        self.phase = ProjectilePhase::Detonated;
        info!("projectile {:?} detonated ({:?}) at {:?}", self.id, reason, position);
        Some(Detonation {
            projectile: self.id,
            body: self.body,
            position,
            reason,
            target: self.target,
        })
    }

    /// Sample the locked target, dropping the lock if it is gone.
    fn track_target(
        &mut self,
        physics: &dyn PhysicsService,
        targets: &TargetRegistry,
        position: Vec3,
        conditions: &LockConditions,
    ) -> Option<TargetState> {
        let id = self.target?;
        match validate_lock(targets, physics, id, position, conditions, Some(self.body)) {
            LockStatus::Held(state) => Some(state),
            LockStatus::Blind => None,
            LockStatus::Lost(loss) => {
                debug!("projectile {:?} lost lock on {:?}: {:?}", self.id, id, loss);
                self.target = None;
                None
            }
        }
    }

    /// Advance one tick.
    ///
    /// # Arguments
    /// * `physics` - Service owning the body
    /// * `gravity` - Field pulling the projectile
    /// * `targets` - Registry the lock refers into
    /// * `config` - Guidance and projectile tuning
    /// * `dt` - Tick duration in seconds
    ///
    /// # Returns
    /// A detonation if one happened this tick.
    pub fn update(
        &mut self,
        physics: &mut dyn PhysicsService,
        gravity: &GravityField,
        targets: &TargetRegistry,
        config: &SimConfig,
        dt: f32,
    ) -> Option<Detonation> {
        if self.detonated {
            return None;
        }
        self.age += dt;

        let Some(body) = physics.body(self.body) else {
            // Body gone: only the counted age can still end this projectile
            return if self.age >= self.lifetime {
                self.detonate(DetonationReason::LifetimeExpired, self.last_position)
            } else {
                None
            };
        };
        self.last_position = body.position;

        gravity.apply_gravity(physics, &body, dt);
        let gravity_dir = gravity.direction(body.position);
        let up = -gravity_dir;

        let mut trigger: Option<DetonationReason> = None;

        if self.phase == ProjectilePhase::Launched && self.age >= config.projectile.ignition_delay {
            let facing = normalize_or(body.rotation * LOCAL_FORWARD, normalize_or(body.velocity, LOCAL_FORWARD));
            physics.apply_impulse(self.body, facing * config.projectile.ignition_impulse * body.mass);
            self.phase = ProjectilePhase::Armed;
            debug!("projectile {:?} armed after {:.2}s", self.id, self.age);
        }

        if self.phase == ProjectilePhase::Armed {
            let conditions = LockConditions::from_config(&config.guidance);
            let target = self.track_target(physics, targets, body.position, &conditions);

            homing_update(
                physics,
                &body,
                target.as_ref(),
                gravity_dir * gravity.strength(),
                up,
                &config.guidance,
                self.thrust,
                config.projectile.max_speed,
            );

            if target.is_some_and(|t| t.position.distance(body.position) <= self.fuse_radius) {
                trigger = Some(DetonationReason::Proximity);
            }

            let speed = body.velocity.length();
            if trigger.is_none() && speed > 1e-3 {
                let reach = speed * dt + config.projectile.forward_probe;
                if physics
                    .cast_ray(body.position, body.velocity / speed, reach, Some(self.body))
                    .is_some()
                {
                    trigger = Some(DetonationReason::Impact);
                }
            }

            if trigger.is_none()
                && physics
                    .cast_ray(body.position, gravity_dir, config.projectile.ground_proximity, Some(self.body))
                    .is_some()
            {
                trigger = Some(DetonationReason::GroundProximity);
            }
        }

        if trigger.is_none() && self.age >= self.lifetime {
            trigger = Some(DetonationReason::LifetimeExpired);
        }

        trigger.and_then(|reason| self.detonate(reason, body.position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guidance::{FixedTarget, TargetKind};
    use crate::math::look_rotation;
    use crate::physics::{BodyDesc, SimplePhysicsWorld, StaticShape};

    const DT: f32 = 1.0 / 60.0;

    fn space() -> GravityField {
        GravityField::new(Vec3::new(0.0, -1.0e6, 0.0), 0.0)
    }

    fn launch(world: &mut SimplePhysicsWorld, velocity: Vec3, target: Option<TargetId>) -> Projectile {
        let config = ProjectileConfig::default();
        let body = world.create_body(
            BodyDesc::sphere(Vec3::ZERO, config.mass, config.radius)
                .with_velocity(velocity)
                .with_rotation(look_rotation(velocity, Vec3::Y)),
        );
        Projectile::new(ProjectileId(0), body, Vec3::ZERO, target, &config)
    }

    fn run(projectile: &mut Projectile, world: &mut SimplePhysicsWorld, targets: &TargetRegistry, config: &SimConfig, ticks: usize) -> Vec<Detonation> {
        let gravity = space();
        let mut detonations = Vec::new();
        for _ in 0..ticks {
            if let Some(d) = projectile.update(world, &gravity, targets, config, DT) {
                detonations.push(d);
            }
            world.step(DT);
        }
        detonations
    }

    #[test]
    fn test_arms_after_ignition_delay() {
        let mut world = SimplePhysicsWorld::new();
        let config = SimConfig::default();
        let mut projectile = launch(&mut world, Vec3::new(0.0, 0.0, -30.0), None);

        run(&mut projectile, &mut world, &TargetRegistry::new(), &config, 10);
        assert_eq!(projectile.phase(), ProjectilePhase::Launched);

        run(&mut projectile, &mut world, &TargetRegistry::new(), &config, 20);
        assert_eq!(projectile.phase(), ProjectilePhase::Armed);
        let body = world.body(projectile.body()).expect("body exists");
        assert!(body.velocity.length() > 30.0 + config.projectile.ignition_impulse * 0.9);
    }

    #[test]
    fn test_lifetime_expiry() {
        let mut world = SimplePhysicsWorld::new();
        let mut config = SimConfig::default();
        config.projectile.lifetime = 0.5;
        let mut projectile = launch(&mut world, Vec3::new(0.0, 0.0, -30.0), None);
        projectile.set_lifetime(0.5);

        let detonations = run(&mut projectile, &mut world, &TargetRegistry::new(), &config, 60);
        assert_eq!(detonations.len(), 1);
        assert_eq!(detonations[0].reason, DetonationReason::LifetimeExpired);
        assert!(projectile.is_detonated());
    }

    #[test]
    fn test_detonate_is_idempotent() {
        let mut world = SimplePhysicsWorld::new();
        let mut projectile = launch(&mut world, Vec3::NEG_Z, None);
        assert!(projectile.detonate(DetonationReason::Impact, Vec3::ZERO).is_some());
        assert!(projectile.detonate(DetonationReason::LifetimeExpired, Vec3::ZERO).is_none());
        assert_eq!(projectile.phase(), ProjectilePhase::Detonated);
    }

    #[test]
    fn test_impact_with_wall() {
        let mut world = SimplePhysicsWorld::new();
        world.add_static(StaticShape::Aabb {
            min: Vec3::new(-10.0, -10.0, -41.0),
            max: Vec3::new(10.0, 10.0, -40.0),
        });
        let config = SimConfig::default();
        let mut projectile = launch(&mut world, Vec3::new(0.0, 0.0, -40.0), None);

        let detonations = run(&mut projectile, &mut world, &TargetRegistry::new(), &config, 120);
        assert_eq!(detonations.len(), 1);
        assert_eq!(detonations[0].reason, DetonationReason::Impact);
    }

    #[test]
    fn test_proximity_fuse_on_locked_target() {
        let mut world = SimplePhysicsWorld::new();
        let mut registry = TargetRegistry::new();
        let target = registry.register(TargetKind::Prop, Box::new(FixedTarget { position: Vec3::new(0.0, 0.0, -60.0) }));
        let config = SimConfig::default();
        let mut projectile = launch(&mut world, Vec3::new(0.0, 0.0, -40.0), Some(target));

        let detonations = run(&mut projectile, &mut world, &registry, &config, 240);
        assert_eq!(detonations.len(), 1);
        assert_eq!(detonations[0].reason, DetonationReason::Proximity);
        assert_eq!(detonations[0].target, Some(target));
    }

    #[test]
    fn test_removed_target_drops_lock() {
        let mut world = SimplePhysicsWorld::new();
        let mut registry = TargetRegistry::new();
        let target = registry.register(TargetKind::Prop, Box::new(FixedTarget { position: Vec3::new(0.0, 0.0, -300.0) }));
        let config = SimConfig::default();
        let mut projectile = launch(&mut world, Vec3::new(0.0, 0.0, -40.0), Some(target));

        run(&mut projectile, &mut world, &registry, &config, 30);
        assert_eq!(projectile.target(), Some(target));

        registry.remove(target);
        run(&mut projectile, &mut world, &registry, &config, 1);
        assert_eq!(projectile.target(), None);
        assert!(!projectile.is_detonated());
    }

    #[test]
    fn test_target_behind_launcher_is_still_reached() {
        let mut world = SimplePhysicsWorld::new();
        let mut registry = TargetRegistry::new();
        let target = registry.register(TargetKind::Prop, Box::new(FixedTarget { position: Vec3::new(0.0, 0.0, 60.0) }));
        let config = SimConfig::default();
        let mut projectile = launch(&mut world, Vec3::new(0.0, 0.0, -30.0), Some(target));

        let detonations = run(&mut projectile, &mut world, &registry, &config, 360);
        assert_eq!(detonations.len(), 1);
        assert_eq!(detonations[0].reason, DetonationReason::Proximity);
        assert!(detonations[0].position.distance(Vec3::new(0.0, 0.0, 60.0)) <= config.projectile.fuse_radius);
    }
}
