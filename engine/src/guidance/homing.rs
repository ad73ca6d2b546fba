//! Powered homing
//!
//! One tick of thrust steering for a guided projectile:
//!
//! 1. Start from the velocity-aligned thrust direction
//! 2. Bend it by the proportional-navigation command, scaled by the
//!    tracking strength
//! 3. Blend in the gravity-compensated aim at the (led) target
//! 4. Apply thrust, cap speed, face the body along its velocity
//!
//! When navigation has nothing to say (not closing, or the target is
//! behind) the projectile falls back to pure pursuit and thrusts straight
//! at the compensated aim point, which turns it around.
//!
//! Without a target sample the projectile keeps thrusting along its
//! velocity (unguided).

use glam::Vec3;

use super::ballistics::gravity_compensated_aim;
use super::intercept::lead_target;
use super::navigation::proportional_navigation;
use super::targets::TargetState;
use crate::config::GuidanceConfig;
use crate::math::{look_rotation, normalize_or, LOCAL_FORWARD};
use crate::physics::{BodySnapshot, PhysicsService};

/// Steering decided for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HomingCommand {
    /// Unit thrust direction
    pub thrust_direction: Vec3,
    /// Proportional-navigation lateral acceleration (zero when unguided)
    pub lateral_acceleration: Vec3,
    /// Point the seeker aimed at, if guided
    pub aim_point: Option<Vec3>,
}

/// Compute the thrust direction for a projectile.
///
/// # Arguments
/// * `position` / `velocity` / `facing` - Projectile state
/// * `target` - This tick's target sample, if guided
/// * `gravity` - Gravity acceleration vector at the projectile
/// * `config` - Navigation gain, tracking strength and gravity bias
pub fn steer(
    position: Vec3,
    velocity: Vec3,
    facing: Vec3,
    target: Option<&TargetState>,
    gravity: Vec3,
    config: &GuidanceConfig,
) -> HomingCommand {
    let velocity_dir = normalize_or(velocity, normalize_or(facing, LOCAL_FORWARD));

    let Some(target) = target else {
        return HomingCommand {
            thrust_direction: velocity_dir,
            lateral_acceleration: Vec3::ZERO,
            aim_point: None,
        };
    };

    let speed = velocity.length();
    let lateral = proportional_navigation(
        position,
        velocity,
        target.position,
        target.velocity,
        config.navigation_gain,
    );
    let tracked = normalize_or(velocity_dir + lateral * config.tracking_strength, velocity_dir);

    let aim_point = target
        .velocity
        .and_then(|v| lead_target(position, target.position, v, speed))
        .unwrap_or(target.position);
    let to_aim = aim_point - position;
    let compensated = gravity_compensated_aim(position, to_aim, speed, gravity, to_aim.length());

    // Pure pursuit once navigation gives no command or the aim is behind us
    let pursuit = lateral == Vec3::ZERO || tracked.dot(compensated) < 0.0;
    let thrust_direction = if pursuit {
        compensated
    } else {
        normalize_or(tracked.lerp(compensated, config.gravity_bias), tracked)
    };

    HomingCommand {
        thrust_direction,
        lateral_acceleration: lateral,
        aim_point: Some(aim_point),
    }
}

/// Run one powered homing tick against the physics body.
///
/// The speed cap is a braking impulse on the body's current velocity, so
/// impulses applied earlier in the tick (gravity, ignition) are kept. Only
/// the part of the motion the motor can drive is capped; descent along
/// `up` is left to gravity.
///
/// # Arguments
/// * `physics` - Service owning the projectile body
/// * `body` - Snapshot taken at the start of the tick
/// * `target` - Target sample, or `None` for unguided thrust
/// * `gravity` - Gravity acceleration vector at the projectile
/// * `up` - Local up, used to keep the body's roll stable
/// * `guidance` - Navigation tuning
/// * `thrust` - Motor force in newtons
/// * `max_speed` - Speed cap in m/s
#[allow(clippy::too_many_arguments)]
pub fn homing_update(
    physics: &mut dyn PhysicsService,
    body: &BodySnapshot,
    target: Option<&TargetState>,
    gravity: Vec3,
    up: Vec3,
    guidance: &GuidanceConfig,
    thrust: f32,
    max_speed: f32,
) -> HomingCommand {
    let facing = body.rotation * LOCAL_FORWARD;
    let command = steer(body.position, body.velocity, facing, target, gravity, guidance);

    physics.add_force(body.handle, command.thrust_direction * thrust);

    let current = physics.body(body.handle).unwrap_or(*body);
    let velocity = current.velocity;
    let falling = up * velocity.dot(up).min(0.0);
    let driven = velocity - falling;
    let driven_speed = driven.length();
    if driven_speed > max_speed {
        let braking = driven * (max_speed / driven_speed - 1.0);
        physics.apply_impulse(body.handle, braking * current.mass);
    }

    let heading = physics.body(body.handle).map_or(velocity, |b| b.velocity);
    if heading.length_squared() > 1e-6 {
        physics.set_rotation(body.handle, look_rotation(heading, up));
    }

    command
}
