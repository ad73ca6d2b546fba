//! Guided projectile management.
//!
//! Owns the collection of live projectiles and provides fire / update /
//! cancel / iterate. Detonated projectiles are removed after the update
//! pass, so the list is never mutated while it is being iterated.

use glam::Vec3;
use log::{debug, warn};

use super::effects::{EffectsSpawner, ExplosionOptions};
use super::lifecycle::{Detonation, Projectile, ProjectileId};
use crate::config::SimConfig;
use crate::error::SimError;
use crate::gravity::GravityField;
use crate::guidance::{TargetId, TargetRegistry};
use crate::math::{look_rotation, normalize_or, LOCAL_FORWARD};
use crate::physics::{BodyDesc, BodyHandle, PhysicsService};

/// Launch parameters for [`ProjectileSystem::fire`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileSpawn {
    pub position: Vec3,
    /// Launch direction (normalized on use)
    pub direction: Vec3,
    /// Muzzle speed in m/s
    pub speed: f32,
    pub target: Option<TargetId>,
    /// Used to keep the body's roll stable
    pub up: Vec3,
}

impl ProjectileSpawn {
    pub fn new(position: Vec3, direction: Vec3, speed: f32) -> Self {
        Self {
            position,
            direction,
            speed,
            target: None,
            up: Vec3::Y,
        }
    }

    pub fn with_target(mut self, target: TargetId) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_up(mut self, up: Vec3) -> Self {
        self.up = up;
        self
    }
}

/// Manages the full lifecycle of guided projectiles.
#[derive(Debug)]
pub struct ProjectileSystem {
    projectiles: Vec<Projectile>,
    next_id: u32,
    /// Maximum number of simultaneously live projectiles.
    pub max_projectiles: usize,
}

impl ProjectileSystem {
    pub fn new(max_projectiles: usize) -> Self {
        Self {
            projectiles: Vec::new(),
            next_id: 0,
            max_projectiles,
        }
    }

    /// Create a physics body and start tracking it.
    ///
    /// # Arguments
    /// * `physics` - Service that will own the body
    /// * `spawn` - Launch parameters
    /// * `config` - Mass, radius, lifetime and fuse tuning
    ///
    /// # Returns
    /// The new projectile's id, or [`SimError::ProjectileCapReached`] when
    /// the live limit is hit.
    pub fn fire(
        &mut self,
        physics: &mut dyn PhysicsService,
        spawn: ProjectileSpawn,
        config: &SimConfig,
    ) -> Result<ProjectileId, SimError> {
        if self.projectiles.len() >= self.max_projectiles {
            warn!("projectile cap of {} reached, launch refused", self.max_projectiles);
            return Err(SimError::ProjectileCapReached {
                max: self.max_projectiles,
            });
        }

        let direction = normalize_or(spawn.direction, LOCAL_FORWARD);
        let body = physics.create_body(
            BodyDesc::sphere(spawn.position, config.projectile.mass, config.projectile.radius)
                .with_rotation(look_rotation(direction, spawn.up))
                .with_velocity(direction * spawn.speed),
        );

        let id = ProjectileId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.projectiles
            .push(Projectile::new(id, body, spawn.position, spawn.target, &config.projectile));
        debug!("projectile {:?} fired from {:?} (target {:?})", id, spawn.position, spawn.target);
        Ok(id)
    }

    /// Advance every projectile one tick.
    ///
    /// Each detonation spawns exactly one explosion and releases the
    /// projectile's body.
    ///
    /// # Returns
    /// The detonations that happened this tick.
    pub fn update(
        &mut self,
        physics: &mut dyn PhysicsService,
        gravity: &GravityField,
        targets: &TargetRegistry,
        effects: &mut dyn EffectsSpawner,
        config: &SimConfig,
        dt: f32,
    ) -> Vec<Detonation> {
        let mut detonations = Vec::new();
        for projectile in &mut self.projectiles {
            if let Some(detonation) = projectile.update(physics, gravity, targets, config, dt) {
                detonations.push(detonation);
            }
        }

        for detonation in &detonations {
            effects.spawn_explosion(
                detonation.position,
                &ExplosionOptions {
                    projectile: detonation.projectile,
                    radius: config.projectile.explosion_radius,
                    reason: detonation.reason,
                },
            );
            physics.remove_body(detonation.body);
        }
        self.projectiles.retain(|p| !p.is_detonated());

        detonations
    }

    /// Remove a projectile without detonating it.
    ///
    /// # Returns
    /// `true` if the projectile was live.
    pub fn cancel(&mut self, physics: &mut dyn PhysicsService, id: ProjectileId) -> bool {
        let Some(index) = self.projectiles.iter().position(|p| p.id() == id) else {
            return false;
        };
        let projectile = self.projectiles.swap_remove(index);
        physics.remove_body(projectile.body());
        true
    }

    /// Remove every projectile, releasing their bodies.
    pub fn clear(&mut self, physics: &mut dyn PhysicsService) {
        for projectile in self.projectiles.drain(..) {
            physics.remove_body(projectile.body());
        }
    }

    pub fn get(&self, id: ProjectileId) -> Option<&Projectile> {
        self.projectiles.iter().find(|p| p.id() == id)
    }

    /// Id of the projectile driving `body`, if any.
    pub fn by_body(&self, body: BodyHandle) -> Option<ProjectileId> {
        self.projectiles.iter().find(|p| p.body() == body).map(Projectile::id)
    }

    pub fn active_count(&self) -> usize {
        self.projectiles.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Projectile> {
        self.projectiles.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projectile::effects::RecordingEffects;
    use crate::projectile::lifecycle::DetonationReason;
    use crate::physics::SimplePhysicsWorld;

    const DT: f32 = 1.0 / 60.0;

    fn no_gravity() -> GravityField {
        GravityField::new(Vec3::new(0.0, -1.0e6, 0.0), 0.0)
    }

    #[test]
    fn test_fire_respects_cap() {
        let mut world = SimplePhysicsWorld::new();
        let config = SimConfig::default();
        let mut system = ProjectileSystem::new(2);

        let spawn = ProjectileSpawn::new(Vec3::ZERO, Vec3::NEG_Z, 30.0);
        assert!(system.fire(&mut world, spawn, &config).is_ok());
        assert!(system.fire(&mut world, spawn, &config).is_ok());
        assert_eq!(
            system.fire(&mut world, spawn, &config),
            Err(SimError::ProjectileCapReached { max: 2 })
        );
        assert_eq!(system.active_count(), 2);
        assert_eq!(world.body_count(), 2);
    }

    #[test]
    fn test_fire_sets_body_state() {
        let mut world = SimplePhysicsWorld::new();
        let config = SimConfig::default();
        let mut system = ProjectileSystem::new(4);

        let id = system
            .fire(&mut world, ProjectileSpawn::new(Vec3::ONE, Vec3::new(2.0, 0.0, 0.0), 25.0), &config)
            .expect("under cap");
        let projectile = system.get(id).expect("tracked");
        let body = world.body(projectile.body()).expect("body exists");
        assert_eq!(body.position, Vec3::ONE);
        assert!(body.velocity.abs_diff_eq(Vec3::new(25.0, 0.0, 0.0), 1e-4));
        assert!((body.rotation * LOCAL_FORWARD).abs_diff_eq(Vec3::X, 1e-5));
        assert_eq!(system.by_body(projectile.body()), Some(id));
    }

    #[test]
    fn test_detonation_spawns_one_explosion_and_releases_body() {
        let mut world = SimplePhysicsWorld::new();
        let mut config = SimConfig::default();
        config.projectile.lifetime = 0.2;
        let mut system = ProjectileSystem::new(4);
        let mut effects = RecordingEffects::new();
        let targets = TargetRegistry::new();
        let gravity = no_gravity();

        system
            .fire(&mut world, ProjectileSpawn::new(Vec3::ZERO, Vec3::NEG_Z, 30.0), &config)
            .expect("under cap");

        let mut detonations = Vec::new();
        for _ in 0..60 {
            detonations.extend(system.update(&mut world, &gravity, &targets, &mut effects, &config, DT));
            world.step(DT);
        }

        assert_eq!(detonations.len(), 1);
        assert_eq!(detonations[0].reason, DetonationReason::LifetimeExpired);
        assert_eq!(effects.len(), 1);
        assert_eq!(effects.explosions[0].1.radius, config.projectile.explosion_radius);
        assert_eq!(system.active_count(), 0);
        assert_eq!(world.body_count(), 0);
    }

    #[test]
    fn test_cancel_releases_without_explosion() {
        let mut world = SimplePhysicsWorld::new();
        let config = SimConfig::default();
        let mut system = ProjectileSystem::new(4);
        let id = system
            .fire(&mut world, ProjectileSpawn::new(Vec3::ZERO, Vec3::NEG_Z, 30.0), &config)
            .expect("under cap");

        assert!(system.cancel(&mut world, id));
        assert!(!system.cancel(&mut world, id));
        assert_eq!(world.body_count(), 0);
    }

    #[test]
    fn test_clear() {
        let mut world = SimplePhysicsWorld::new();
        let config = SimConfig::default();
        let mut system = ProjectileSystem::new(4);
        for _ in 0..3 {
            system
                .fire(&mut world, ProjectileSpawn::new(Vec3::ZERO, Vec3::NEG_Z, 30.0), &config)
                .expect("under cap");
        }
        system.clear(&mut world);
        assert_eq!(system.active_count(), 0);
        assert_eq!(world.body_count(), 0);
    }
}
