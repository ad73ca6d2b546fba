//! Radial gravity field
//!
//! Gravity points from any position toward a single center that may move
//! between ticks. "Up" is re-derived every query, so entities walking around
//! a planet keep a locally correct frame without any global up axis.
//!
//! # Regimes
//!
//! - **Normal**: acceleration `strength` toward the center plus a small
//!   velocity damping
//! - **Buoyant**: inside a registered [`FluidVolume`] gravity is skipped;
//!   buoyancy pushes against the gravity direction and drag opposes velocity

use std::cell::Cell;

use glam::Vec3;
use log::trace;

use super::fluid::FluidVolume;
use crate::config::GravityConfig;
use crate::physics::{BodySnapshot, PhysicsService};

/// Which force model [`GravityField::apply_gravity`] used for a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GravityRegime {
    Normal,
    Buoyant,
}

/// Spherical gravity toward a movable center.
#[derive(Debug, Clone)]
pub struct GravityField {
    center: Vec3,
    strength: f32,
    center_epsilon: f32,
    velocity_damping: f32,
    buoyancy: f32,
    fluid_drag: f32,
    fluids: Vec<FluidVolume>,
    /// Last well-defined direction, returned for queries at the center
    last_direction: Cell<Vec3>,
}

impl Default for GravityField {
    fn default() -> Self {
        Self::from_config(&GravityConfig::default())
    }
}

impl GravityField {
    /// Create a field with default tuning around `center`.
    ///
    /// # Arguments
    /// * `center` - World position everything falls toward
    /// * `strength` - Acceleration magnitude in m/s²
    pub fn new(center: Vec3, strength: f32) -> Self {
        Self {
            center,
            strength,
            ..Default::default()
        }
    }

    /// Create a field from configuration.
    pub fn from_config(config: &GravityConfig) -> Self {
        Self {
            center: config.center,
            strength: config.strength,
            center_epsilon: config.center_epsilon,
            velocity_damping: config.velocity_damping,
            buoyancy: config.buoyancy,
            fluid_drag: config.fluid_drag,
            fluids: Vec::new(),
            last_direction: Cell::new(Vec3::NEG_Y),
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    /// Move the gravity center. Takes effect on the next query.
    pub fn set_center(&mut self, center: Vec3) {
        self.center = center;
    }

    pub fn strength(&self) -> f32 {
        self.strength
    }

    /// Register a fluid volume for the buoyant regime.
    pub fn add_fluid(&mut self, volume: FluidVolume) {
        self.fluids.push(volume);
    }

    pub fn fluids(&self) -> &[FluidVolume] {
        &self.fluids
    }

    /// Unit vector from `position` toward the center.
    ///
    /// Positions within the center epsilon have no defined direction; the
    /// previous valid direction is returned for them instead.
    pub fn direction(&self, position: Vec3) -> Vec3 {
        let to_center = self.center - position;
        let distance = to_center.length();
        if !distance.is_finite() || distance < self.center_epsilon {
            return self.last_direction.get();
        }
        let dir = to_center / distance;
        self.last_direction.set(dir);
        dir
    }

    /// Unit vector pointing away from the center.
    pub fn up(&self, position: Vec3) -> Vec3 {
        -self.direction(position)
    }

    /// Gravity acceleration vector at `position` (m/s²).
    pub fn acceleration(&self, position: Vec3) -> Vec3 {
        self.direction(position) * self.strength
    }

    /// Check if `position` lies inside any registered fluid volume.
    pub fn in_fluid(&self, position: Vec3) -> bool {
        self.fluids.iter().any(|fluid| fluid.contains(position))
    }

    /// Apply one tick of gravity (or buoyancy) to a body as an impulse.
    ///
    /// # Arguments
    /// * `physics` - Service owning the body
    /// * `body` - This tick's snapshot of the body
    /// * `dt` - Tick duration in seconds
    ///
    /// # Returns
    /// The regime the body is in this tick.
    pub fn apply_gravity(
        &self,
        physics: &mut dyn PhysicsService,
        body: &BodySnapshot,
        dt: f32,
    ) -> GravityRegime {
        let dir = self.direction(body.position);
        let mass = body.mass;

        if self.in_fluid(body.position) {
            let buoyancy = -dir * self.strength * self.buoyancy * mass * dt;
            let drag = -body.velocity * self.fluid_drag * mass * dt;
            physics.apply_impulse(body.handle, buoyancy + drag);
            trace!("body {:?} buoyant at {:?}", body.handle, body.position);
            GravityRegime::Buoyant
        } else {
            let pull = dir * self.strength * mass * dt;
            let damping = -body.velocity * self.velocity_damping * mass * dt;
            physics.apply_impulse(body.handle, pull + damping);
            GravityRegime::Normal
        }
    }
}
