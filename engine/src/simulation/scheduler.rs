//! Simulation scheduler
//!
//! Owns the physics service, the characters and the projectile list, and
//! runs one fixed-order tick:
//!
//! 1. Every character's locomotion pipeline
//! 2. Every projectile's guidance and lifecycle (detonated ones are removed
//!    after the pass)
//! 3. One physics step
//! 4. Contact events routed to the characters' ground detectors

use std::collections::BTreeMap;

use glam::{Quat, Vec3};
use log::{debug, info, trace};

use super::context::SimContext;
use super::pose::{EntityRef, Pose};
use crate::config::SimConfig;
use crate::error::{ConfigError, SimError};
use crate::gravity::FluidVolume;
use crate::guidance::{
    acquire_lock, hitscan, BodyTarget, HitscanShot, LockConditions, TargetId, TargetKind,
    TargetSource,
};
use crate::math::{normalize_or, LOCAL_FORWARD};
use crate::physics::{BodySnapshot, PhysicsService};
use crate::player::{Character, CharacterDesc, CharacterId, CharacterInput, CharacterStep};
use crate::projectile::{
    Detonation, EffectsSpawner, NoEffects, ProjectileId, ProjectileSpawn, ProjectileSystem,
};

/// Gap between a shooter's body and a freshly spawned projectile (m)
const MUZZLE_CLEARANCE: f32 = 0.1;

/// What happened during one tick.
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    pub character_steps: Vec<(CharacterId, CharacterStep)>,
    pub detonations: Vec<Detonation>,
}

/// A complete simulation: context, entities and collaborators.
pub struct Simulation<P: PhysicsService, E: EffectsSpawner = NoEffects> {
    context: SimContext,
    physics: P,
    effects: E,
    characters: BTreeMap<CharacterId, Character>,
    projectiles: ProjectileSystem,
    next_character: u32,
    tick_count: u64,
}

impl<P: PhysicsService, E: EffectsSpawner> Simulation<P, E> {
    /// Build a simulation around a physics service and effects spawner.
    ///
    /// # Returns
    /// [`ConfigError::Invalid`] if `config` fails validation.
    pub fn new(config: SimConfig, physics: P, effects: E) -> Result<Self, ConfigError> {
        let max_projectiles = config.projectile.max_projectiles;
        Ok(Self {
            context: SimContext::new(config)?,
            physics,
            effects,
            characters: BTreeMap::new(),
            projectiles: ProjectileSystem::new(max_projectiles),
            next_character: 0,
            tick_count: 0,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.context.config
    }

    pub fn context(&self) -> &SimContext {
        &self.context
    }

    pub fn physics(&self) -> &P {
        &self.physics
    }

    pub fn physics_mut(&mut self) -> &mut P {
        &mut self.physics
    }

    pub fn effects(&self) -> &E {
        &self.effects
    }

    pub fn effects_mut(&mut self) -> &mut E {
        &mut self.effects
    }

    pub fn projectiles(&self) -> &ProjectileSystem {
        &self.projectiles
    }

    /// Number of completed ticks.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    // ========================================================================
    // World setup
    // ========================================================================

    /// Move the gravity center. Takes effect on the next tick.
    pub fn set_gravity_center(&mut self, center: Vec3) {
        debug!("gravity center moved to {:?}", center);
        self.context.gravity.set_center(center);
    }

    /// Add a fluid volume in which bodies become buoyant.
    pub fn add_fluid(&mut self, volume: FluidVolume) {
        self.context.gravity.add_fluid(volume);
    }

    // ========================================================================
    // Characters
    // ========================================================================

    /// Spawn a character and its physics body.
    pub fn add_character(&mut self, desc: &CharacterDesc) -> CharacterId {
        let id = CharacterId(self.next_character);
        self.next_character = self.next_character.wrapping_add(1);
        let character = Character::spawn(id, desc, &self.context.config, &mut self.physics);
        self.characters.insert(id, character);
        id
    }

    /// Remove a character, its body and any targets that tracked it.
    pub fn remove_character(&mut self, id: CharacterId) -> Result<(), SimError> {
        let character = self.characters.remove(&id).ok_or(SimError::UnknownCharacter(id))?;
        let body = character.body();
        let stale: Vec<TargetId> = self
            .context
            .targets
            .ids()
            .filter(|&target| self.context.targets.body(target) == Some(body))
            .collect();
        for target in stale {
            self.context.targets.remove(target);
        }
        self.physics.remove_body(body);
        debug!("removed character {:?}", id);
        Ok(())
    }

    pub fn character(&self, id: CharacterId) -> Option<&Character> {
        self.characters.get(&id)
    }

    pub fn character_ids(&self) -> impl Iterator<Item = CharacterId> + '_ {
        self.characters.keys().copied()
    }

    /// Replace a character's input for the next tick.
    pub fn set_input(&mut self, id: CharacterId, input: CharacterInput) -> Result<(), SimError> {
        self.characters
            .get_mut(&id)
            .ok_or(SimError::UnknownCharacter(id))?
            .set_input(input);
        Ok(())
    }

    fn character_body(&self, id: CharacterId) -> Result<(&Character, BodySnapshot), SimError> {
        let character = self.characters.get(&id).ok_or(SimError::UnknownCharacter(id))?;
        let body = self
            .physics
            .body(character.body())
            .ok_or(SimError::UnknownBody(character.body()))?;
        Ok((character, body))
    }

    /// Camera orientation of a character (body rotation plus view pitch).
    pub fn view_rotation(&self, id: CharacterId) -> Option<Quat> {
        let (character, body) = self.character_body(id).ok()?;
        Some(character.view_rotation(body.rotation))
    }

    // ========================================================================
    // Targets
    // ========================================================================

    /// Register an arbitrary target source.
    pub fn register_target(&mut self, kind: TargetKind, source: Box<dyn TargetSource>) -> TargetId {
        self.context.targets.register(kind, source)
    }

    /// Make a character lockable.
    pub fn register_character_target(&mut self, id: CharacterId) -> Result<TargetId, SimError> {
        let body = self
            .characters
            .get(&id)
            .ok_or(SimError::UnknownCharacter(id))?
            .body();
        Ok(self
            .context
            .targets
            .register(TargetKind::Player, Box::new(BodyTarget { body })))
    }

    pub fn remove_target(&mut self, id: TargetId) -> bool {
        self.context.targets.remove(id)
    }

    /// Try to lock a target along a character's view direction.
    pub fn acquire_target(&self, shooter: CharacterId) -> Result<Option<TargetId>, SimError> {
        let (character, body) = self.character_body(shooter)?;
        let facing = character.view_rotation(body.rotation) * LOCAL_FORWARD;
        Ok(acquire_lock(
            &self.context.targets,
            &self.physics,
            body.position,
            facing,
            &LockConditions::from_config(&self.context.config.guidance),
            Some(character.body()),
        ))
    }

    // ========================================================================
    // Weapons
    // ========================================================================

    /// Launch a guided projectile.
    pub fn fire_missile(&mut self, spawn: ProjectileSpawn) -> Result<ProjectileId, SimError> {
        self.projectiles
            .fire(&mut self.physics, spawn, &self.context.config)
    }

    /// Launch a guided projectile from a character along its view direction.
    pub fn fire_missile_from(
        &mut self,
        shooter: CharacterId,
        speed: f32,
        target: Option<TargetId>,
    ) -> Result<ProjectileId, SimError> {
        let (character, body) = self.character_body(shooter)?;
        let facing = normalize_or(character.view_rotation(body.rotation) * LOCAL_FORWARD, LOCAL_FORWARD);
        let offset = character.height() * 0.5 + self.context.config.projectile.radius + MUZZLE_CLEARANCE;
        let up = self.context.gravity.up(body.position);

        let mut spawn = ProjectileSpawn::new(body.position + facing * offset, facing, speed).with_up(up);
        spawn.target = target;
        self.fire_missile(spawn)
    }

    /// Fire an instantaneous round along a character's view direction.
    pub fn hitscan_from(
        &self,
        shooter: CharacterId,
        muzzle_speed: f32,
        max_distance: f32,
    ) -> Result<HitscanShot, SimError> {
        let (character, body) = self.character_body(shooter)?;
        let facing = character.view_rotation(body.rotation) * LOCAL_FORWARD;
        Ok(hitscan(
            &self.physics,
            body.position,
            facing,
            muzzle_speed,
            self.context.gravity.acceleration(body.position),
            max_distance,
            Some(character.body()),
        ))
    }

    // ========================================================================
    // Tick
    // ========================================================================

    /// Advance the simulation by `dt` seconds.
    pub fn tick(&mut self, dt: f32) -> TickReport {
        let mut report = TickReport::default();

        for character in self.characters.values_mut() {
            if let Some(step) = character.update(&mut self.physics, &self.context.gravity, dt) {
                report.character_steps.push((character.id(), step));
            }
        }

        report.detonations = self.projectiles.update(
            &mut self.physics,
            &self.context.gravity,
            &self.context.targets,
            &mut self.effects,
            &self.context.config,
            dt,
        );

        self.physics.step(dt);
        self.route_contacts();

        self.tick_count += 1;
        if !report.detonations.is_empty() {
            info!(
                "tick {}: {} detonation(s), {} projectile(s) live",
                self.tick_count,
                report.detonations.len(),
                self.projectiles.active_count()
            );
        }
        report
    }

    /// Advance by the configured fixed timestep.
    pub fn step(&mut self) -> TickReport {
        let dt = self.context.config.fixed_dt();
        self.tick(dt)
    }

    fn route_contacts(&mut self) {
        for event in self.physics.drain_collision_events() {
            let Some(character) = self.characters.values_mut().find(|c| c.body() == event.body) else {
                continue;
            };
            let up = self.context.gravity.up(event.point);
            trace!("contact for {:?}: normal {:?}", character.id(), event.normal);
            character.record_contact(event.normal, up);
        }
    }

    /// Current pose of every character and projectile.
    pub fn poses(&self) -> Vec<(EntityRef, Pose)> {
        let characters = self.characters.values().filter_map(|c| {
            let body = self.physics.body(c.body())?;
            Some((EntityRef::Character(c.id()), pose_of(&body)))
        });
        let projectiles = self.projectiles.iter().filter_map(|p| {
            let body = self.physics.body(p.body())?;
            Some((EntityRef::Projectile(p.id()), pose_of(&body)))
        });
        characters.chain(projectiles).collect()
    }
}

fn pose_of(body: &BodySnapshot) -> Pose {
    Pose {
        position: body.position,
        rotation: body.rotation,
    }
}
