//! Character Controller
//!
//! One locomotion-capable entity and its per-tick pipeline. The stages run
//! in a fixed order and each composes with the previous one's writes to the
//! physics body instead of overwriting them:
//!
//! 1. Gravity (or buoyancy) impulse
//! 2. Ground probes
//! 3. Orientation (look input, surface alignment)
//! 4. Locomotion (movement and jump impulses)
//! 5. Ground position correction

use glam::{Quat, Vec3};
use log::{debug, trace};

use crate::config::SimConfig;
use crate::gravity::{GravityField, GravityRegime};
use crate::physics::{BodyDesc, BodyHandle, BodySnapshot, PhysicsService};

use super::correction::PositionCorrector;
use super::ground::{GroundDetector, GroundProbeResult};
use super::input::CharacterInput;
use super::locomotion::{LocomotionIntegrator, MovementRegime};
use super::orientation::OrientationAligner;
use super::CharacterId;

/// Spawn parameters for a character.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharacterDesc {
    pub position: Vec3,
    pub rotation: Quat,
    /// Standing height in meters (body center sits at half height)
    pub height: f32,
    /// Horizontal radius in meters
    pub radius: f32,
    /// Mass in kilograms
    pub mass: f32,
}

impl Default for CharacterDesc {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            height: 1.8,
            radius: 0.4,
            mass: 80.0,
        }
    }
}

impl CharacterDesc {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Builder: initial rotation.
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Physics body for this character: a sphere whose bottom is the feet.
    pub fn body_desc(&self) -> BodyDesc {
        BodyDesc::sphere(self.position, self.mass, self.height * 0.5).with_rotation(self.rotation)
    }
}

/// Summary of one character tick, for hosts and tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharacterStep {
    pub regime: MovementRegime,
    pub ground: GroundProbeResult,
    pub jumped: bool,
    /// Position change applied by ground correction
    pub correction: Option<Vec3>,
}

/// A locomotion-capable entity bound to a physics body.
#[derive(Debug, Clone)]
pub struct Character {
    id: CharacterId,
    body: BodyHandle,
    height: f32,
    radius: f32,
    correction_strength: f32,
    ground: GroundDetector,
    aligner: OrientationAligner,
    locomotion: LocomotionIntegrator,
    corrector: PositionCorrector,
    input: CharacterInput,
    regime: MovementRegime,
    last_step: Option<CharacterStep>,
}

impl Character {
    /// Spawn a character's body and build its pipeline.
    pub fn spawn(
        id: CharacterId,
        desc: &CharacterDesc,
        config: &SimConfig,
        physics: &mut dyn PhysicsService,
    ) -> Self {
        let body = physics.create_body(desc.body_desc());
        debug!("spawned character {:?} as body {:?} at {:?}", id, body, desc.position);
        Self::attach(id, body, desc, config)
    }

    /// Build a character around an existing physics body.
    pub fn attach(id: CharacterId, body: BodyHandle, desc: &CharacterDesc, config: &SimConfig) -> Self {
        Self {
            id,
            body,
            height: desc.height,
            radius: desc.radius,
            correction_strength: config.correction.strength,
            ground: GroundDetector::new(config.ground.clone()),
            aligner: OrientationAligner::new(config.alignment.clone()),
            locomotion: LocomotionIntegrator::new(config.locomotion.clone()),
            corrector: PositionCorrector::new(config.correction.clone()),
            input: CharacterInput::default(),
            regime: MovementRegime::Airborne,
            last_step: None,
        }
    }

    pub fn id(&self) -> CharacterId {
        self.id
    }

    pub fn body(&self) -> BodyHandle {
        self.body
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn regime(&self) -> MovementRegime {
        self.regime
    }

    pub fn is_grounded(&self) -> bool {
        self.regime == MovementRegime::Grounded
    }

    /// Result of the most recent tick.
    pub fn last_step(&self) -> Option<&CharacterStep> {
        self.last_step.as_ref()
    }

    /// Replace the input snapshot used by the next tick.
    pub fn set_input(&mut self, input: CharacterInput) {
        self.input = input;
    }

    pub fn input(&self) -> &CharacterInput {
        &self.input
    }

    /// Camera orientation: body rotation plus the grounded view pitch.
    pub fn view_rotation(&self, body_rotation: Quat) -> Quat {
        self.aligner.view_rotation(body_rotation)
    }

    /// Feed a physics contact into the ground detector.
    pub fn record_contact(&mut self, normal: Vec3, up: Vec3) {
        self.ground.record_contact(normal, up);
    }

    /// Run the full locomotion pipeline for one tick.
    ///
    /// # Returns
    /// `None` if the physics service no longer knows the body; the
    /// character is skipped for this tick.
    pub fn update(
        &mut self,
        physics: &mut dyn PhysicsService,
        gravity: &GravityField,
        dt: f32,
    ) -> Option<CharacterStep> {
        let Some(snapshot) = physics.body(self.body) else {
            trace!("character {:?} has no body, skipping", self.id);
            return None;
        };

        self.ground.advance(dt);

        // 1. Gravity
        let gravity_regime = gravity.apply_gravity(physics, &snapshot, dt);
        let gravity_dir = gravity.direction(snapshot.position);
        let up = -gravity_dir;

        // 2. Ground
        let ground = self
            .ground
            .check_grounded(physics, gravity, &snapshot, self.height, self.radius);

        let regime = if gravity_regime == GravityRegime::Buoyant {
            MovementRegime::Buoyant
        } else if ground.is_grounded && !self.locomotion.jump_in_progress() {
            MovementRegime::Grounded
        } else {
            MovementRegime::Airborne
        };
        if regime != self.regime {
            debug!("character {:?}: {:?} -> {:?}", self.id, self.regime, regime);
        }
        self.regime = regime;
        let grounded = regime == MovementRegime::Grounded;

        // 3. Orientation
        let (yaw, pitch) = self.input.take_look();
        let rotation = self.aligner.apply_look(snapshot.rotation, yaw, pitch, grounded);
        let rotation = self.aligner.update(rotation, ground.surface_normal, grounded, dt);
        physics.set_rotation(self.body, rotation);

        // 4. Locomotion, on top of this tick's gravity impulse
        let current = physics.body(self.body).unwrap_or(snapshot);
        let moving = BodySnapshot { rotation, ..current };
        let outcome = self.locomotion.integrate(
            physics,
            &moving,
            &self.input,
            regime,
            ground.surface_normal,
            up,
            dt,
        );

        // 5. Ground correction
        let correction = match ground.closest_hit {
            Some(hit) if grounded && !outcome.jumped => self.corrector.adjust_to_ground(
                physics,
                &moving,
                &hit,
                self.height,
                gravity_dir,
                self.correction_strength,
            ),
            _ => None,
        };

        let step = CharacterStep {
            regime,
            ground,
            jumped: outcome.jumped,
            correction,
        };
        self.last_step = Some(step);
        Some(step)
    }
}
