//! Explosion effects seam
//!
//! Detonations are reported to an [`EffectsSpawner`]; rendering, audio and
//! damage live behind it.

use glam::Vec3;

use super::lifecycle::{DetonationReason, ProjectileId};

/// Parameters handed to the effects collaborator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExplosionOptions {
    pub projectile: ProjectileId,
    /// Blast radius in meters
    pub radius: f32,
    pub reason: DetonationReason,
}

/// Receives explosions.
pub trait EffectsSpawner {
    fn spawn_explosion(&mut self, position: Vec3, options: &ExplosionOptions);
}

/// Discards every explosion.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoEffects;

impl EffectsSpawner for NoEffects {
    fn spawn_explosion(&mut self, _position: Vec3, _options: &ExplosionOptions) {}
}

/// Keeps a log of explosions, for tools and tests.
#[derive(Debug, Default, Clone)]
pub struct RecordingEffects {
    pub explosions: Vec<(Vec3, ExplosionOptions)>,
}

impl RecordingEffects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.explosions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.explosions.is_empty()
    }

    /// Take the recorded explosions, leaving the log empty.
    pub fn drain(&mut self) -> Vec<(Vec3, ExplosionOptions)> {
        std::mem::take(&mut self.explosions)
    }
}

impl EffectsSpawner for RecordingEffects {
    fn spawn_explosion(&mut self, position: Vec3, options: &ExplosionOptions) {
        self.explosions.push((position, *options));
    }
}
