//! Gravwell Engine Library
//!
//! Simulation core for characters walking on small spherical worlds and for
//! guided munitions flying between them. Rendering, input devices and the
//! rigid-body solver are collaborators behind narrow seams.
//!
//! # Modules
//!
//! - [`config`] - Tunable constants, JSON overrides and validation
//! - [`physics`] - The [`PhysicsService`] boundary and a reference world
//! - [`gravity`] - Spherical gravity field and fluid buoyancy
//! - [`player`] - Ground detection, orientation, locomotion and correction
//! - [`guidance`] - Intercept, proportional navigation, ballistics, lock-on
//! - [`projectile`] - Guided projectile lifecycle and scheduling
//! - [`simulation`] - Context object and fixed-order tick
//!
//! # Example
//!
//! ```no_run
//! use gravwell_engine::config::SimConfig;
//! use gravwell_engine::physics::SimplePhysicsWorld;
//! use gravwell_engine::player::{CharacterDesc, CharacterInput};
//! use gravwell_engine::projectile::NoEffects;
//! use gravwell_engine::simulation::Simulation;
//! use glam::Vec3;
//!
//! let mut world = SimplePhysicsWorld::new();
//! world.add_planet(Vec3::ZERO, 50.0);
//!
//! let mut sim = Simulation::new(SimConfig::default(), world, NoEffects)?;
//! let walker = sim.add_character(&CharacterDesc::at(Vec3::new(0.0, 51.0, 0.0)));
//! sim.set_input(walker, CharacterInput { forward: 1.0, ..Default::default() })?;
//!
//! for _ in 0..60 {
//!     sim.step();
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod error;
pub mod gravity;
pub mod guidance;
pub mod logging;
pub mod math;
pub mod physics;
pub mod player;
pub mod projectile;
pub mod simulation;

pub use config::SimConfig;
pub use error::{ConfigError, SimError};
pub use gravity::{FluidVolume, GravityField};
pub use physics::{NullPhysics, PhysicsService, SimplePhysicsWorld};
pub use player::{Character, CharacterDesc, CharacterId, CharacterInput};
pub use projectile::{EffectsSpawner, ProjectileId, ProjectileSpawn};
pub use simulation::{EntityRef, Pose, SimContext, Simulation, TickReport};
