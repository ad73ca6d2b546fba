//! Simulation module
//!
//! Ties the components into one tick-driven world.
//!
//! # Submodules
//!
//! - [`context`] - Tuning, gravity field and target registry
//! - [`scheduler`] - [`Simulation`], entity bookkeeping and the tick order
//! - [`pose`] - Per-entity poses handed to a renderer

pub mod context;
pub mod pose;
pub mod scheduler;

pub use context::SimContext;
pub use pose::{EntityRef, Pose};
pub use scheduler::{Simulation, TickReport};
