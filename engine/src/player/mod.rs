//! Player Module
//!
//! Locomotion for characters walking on spherical worlds.
//!
//! # Components
//!
//! - [`Character`] - One entity and its fixed per-tick pipeline
//! - [`GroundDetector`] - Three foot probes plus contact-event fallback
//! - [`OrientationAligner`] - Surface alignment and grounded/airborne look regimes
//! - [`LocomotionIntegrator`] - Regime-specific acceleration, damping and jumping
//!   - Includes coyote time and a jump guard window
//! - [`PositionCorrector`] - Bounded snapping to the ground surface
//! - [`CharacterInput`] - Per-tick input snapshot

pub mod controller;
pub mod correction;
pub mod ground;
pub mod input;
pub mod locomotion;
pub mod orientation;

pub use controller::{Character, CharacterDesc, CharacterStep};
pub use correction::PositionCorrector;
pub use ground::{FootProbes, GroundDetector, GroundProbeResult};
pub use input::CharacterInput;
pub use locomotion::{LocomotionIntegrator, LocomotionOutcome, MovementRegime};
pub use orientation::{align_to_surface, on_leave_ground, OrientationAligner};

/// Identifier of a character within a simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CharacterId(pub u32);
