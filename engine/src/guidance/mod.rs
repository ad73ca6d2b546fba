//! Guidance module
//!
//! Aiming and steering math for guided munitions and direct-fire weapons.
//!
//! # Submodules
//!
//! - [`intercept`] - Lead prediction for constant-velocity targets
//! - [`navigation`] - Proportional navigation
//! - [`ballistics`] - Drop compensation and launch-angle solving
//! - [`homing`] - Per-tick powered steering
//! - [`targets`] - Target registry, capability traits and lock-on
//! - [`hitscan`] - Instantaneous shots
//!
//! Every solver that can fail returns `Option`; callers pick the fallback
//! (direct pursuit, unguided flight).

pub mod ballistics;
pub mod hitscan;
pub mod homing;
pub mod intercept;
pub mod navigation;
pub mod targets;

pub use ballistics::{ballistic_launch_angle, ballistic_launch_direction, gravity_compensated_aim};
pub use hitscan::{hitscan, HitscanShot};
pub use homing::{homing_update, steer, HomingCommand};
pub use intercept::{intercept_time, lead_target};
pub use navigation::proportional_navigation;
pub use targets::{
    acquire_lock, line_of_sight, validate_lock, BodyTarget, FixedTarget, LockConditions, LockLoss,
    LockStatus, PositionSource, TargetId, TargetKind, TargetLookup, TargetRegistry, TargetSource,
    TargetState, VelocitySource,
};
