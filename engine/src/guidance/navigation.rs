//! Proportional navigation
//!
//! Commands a lateral acceleration proportional to how fast the line of
//! sight to the target is rotating:
//!
//! ```text
//! Ω = (r × v_rel) / |r|²
//! a = N · Vc · (Ω × r̂)
//! ```
//!
//! where `Vc` is the closing speed. Without a target velocity the target is
//! treated as stationary, which reduces to a pure-pursuit angle-rate
//! approximation.

use glam::Vec3;

/// Below this range the line of sight is undefined.
pub const MIN_RANGE: f32 = 0.1;

/// Lateral acceleration command toward the target.
///
/// # Arguments
/// * `self_pos` / `self_vel` - Pursuer state
/// * `target_pos` - Target position
/// * `target_vel` - Target velocity, when the target exposes one
/// * `gain` - Navigation constant `N` (typically 3-5)
///
/// # Returns
/// The zero vector when range is under [`MIN_RANGE`] or the pursuer is not
/// closing on the target.
pub fn proportional_navigation(
    self_pos: Vec3,
    self_vel: Vec3,
    target_pos: Vec3,
    target_vel: Option<Vec3>,
    gain: f32,
) -> Vec3 {
    let los = target_pos - self_pos;
    let range = los.length();
    if !range.is_finite() || range < MIN_RANGE {
        return Vec3::ZERO;
    }
    let los_dir = los / range;

    let relative_vel = target_vel.unwrap_or(Vec3::ZERO) - self_vel;
    let closing_speed = -relative_vel.dot(los_dir);
    if closing_speed <= 0.0 {
        return Vec3::ZERO;
    }

    let los_rate = los.cross(relative_vel) / (range * range);
    let command = gain * closing_speed * los_rate.cross(los_dir);

    if command.is_finite() { command } else { Vec3::ZERO }
}
