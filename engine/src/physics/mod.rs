//! Physics module
//!
//! The rigid-body engine is an external collaborator: the simulation core
//! talks to it only through [`PhysicsService`] and holds nothing but handles
//! and per-tick snapshots.
//!
//! # Unit System
//!
//! **1 unit = 1 meter** (SI units throughout): meters, m/s, m/s², kg, N.
//!
//! # Submodules
//!
//! - [`types`] - Handles, snapshots, ray hits and contact events
//! - [`service`] - The [`PhysicsService`] trait and the no-op [`NullPhysics`]
//! - [`collision`] - Ray/sphere/AABB narrow-phase primitives
//! - [`world`] - [`SimplePhysicsWorld`], a brute-force reference engine

pub mod collision;
pub mod service;
pub mod types;
pub mod world;

pub use service::{NullPhysics, PhysicsService};
pub use types::{BodyDesc, BodyHandle, BodySnapshot, ColliderId, CollisionEvent, RayHit};
pub use world::{SimplePhysicsWorld, StaticShape};
