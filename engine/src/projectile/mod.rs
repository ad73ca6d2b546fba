//! Projectile module
//!
//! Guided projectiles from launch to detonation.
//!
//! # Submodules
//!
//! - [`lifecycle`] - Per-projectile state machine and detonation checks
//! - [`system`] - The live projectile list, firing and cleanup
//! - [`effects`] - The explosion collaborator seam

pub mod effects;
pub mod lifecycle;
pub mod system;

pub use effects::{EffectsSpawner, ExplosionOptions, NoEffects, RecordingEffects};
pub use lifecycle::{Detonation, DetonationReason, Projectile, ProjectileId, ProjectilePhase};
pub use system::{ProjectileSpawn, ProjectileSystem};
