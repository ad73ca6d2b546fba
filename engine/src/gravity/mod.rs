//! Gravity module
//!
//! Radial gravity toward a movable center, with a buoyant branch for
//! registered fluid volumes.
//!
//! # Components
//!
//! - [`GravityField`] - Direction/up queries and per-tick gravity impulses
//! - [`FluidVolume`] - Regions that switch bodies into the buoyant regime
//! - [`GravityRegime`] - Which force model applied to a body this tick

pub mod field;
pub mod fluid;

pub use field::{GravityField, GravityRegime};
pub use fluid::FluidVolume;
