//! Ballistic aiming
//!
//! Closed-form helpers for unpowered (or briefly powered) rounds under a
//! locally uniform gravity:
//!
//! - [`gravity_compensated_aim`] raises an aim direction to cancel the drop
//!   accumulated over the time of flight
//! - [`ballistic_launch_angle`] solves the projectile-range equation for
//!   the flatter of the two launch elevations
//! - [`ballistic_launch_direction`] turns that elevation into a world
//!   direction on a spherical world
//!
//! Over the short distances involved gravity is treated as constant along
//! the flight path.

use std::f32::consts::FRAC_PI_2;

use glam::Vec3;

use crate::math::{any_perpendicular, normalize_or, project_on_plane, LOCAL_FORWARD};

/// Aim direction that cancels gravity drop over `distance`.
///
/// # Arguments
/// * `origin` - Muzzle position
/// * `direction` - Intended line of fire
/// * `muzzle_speed` - Round speed in m/s
/// * `gravity` - Gravity acceleration vector (m/s²)
/// * `distance` - Distance to the aim point along `direction`
///
/// # Returns
/// The normalized launch direction. With no usable speed the intended
/// direction is returned unchanged.
pub fn gravity_compensated_aim(
    origin: Vec3,
    direction: Vec3,
    muzzle_speed: f32,
    gravity: Vec3,
    distance: f32,
) -> Vec3 {
    let direction = normalize_or(direction, LOCAL_FORWARD);
    if !muzzle_speed.is_finite() || muzzle_speed <= 0.0 || !distance.is_finite() || distance <= 0.0 {
        return direction;
    }

    let time_of_flight = distance / muzzle_speed;
    let drop = 0.5 * gravity * time_of_flight * time_of_flight;
    let aim_point = origin + direction * distance - drop;

    normalize_or(aim_point - origin, direction)
}

/// Flatter launch elevation that reaches a point `range` away horizontally
/// and `height_diff` above the muzzle.
///
/// # Arguments
/// * `range` - Horizontal distance in meters (>= 0)
/// * `height_diff` - Target height relative to the muzzle
/// * `velocity` - Launch speed in m/s
/// * `gravity_magnitude` - Gravity in m/s²
///
/// # Returns
/// Elevation in radians, or `None` if the target is out of reach at that
/// speed.
pub fn ballistic_launch_angle(
    range: f32,
    height_diff: f32,
    velocity: f32,
    gravity_magnitude: f32,
) -> Option<f32> {
    let inputs_valid = [range, height_diff, velocity, gravity_magnitude]
        .iter()
        .all(|v| v.is_finite());
    if !inputs_valid || range < 0.0 || velocity <= 0.0 || gravity_magnitude < 0.0 {
        return None;
    }

    if gravity_magnitude < 1e-6 {
        return Some(height_diff.atan2(range));
    }

    let v2 = velocity * velocity;
    let g = gravity_magnitude;

    if range < 1e-4 {
        // Straight up or down
        return if height_diff <= 0.0 {
            Some(-FRAC_PI_2)
        } else if v2 >= 2.0 * g * height_diff {
            Some(FRAC_PI_2)
        } else {
            None
        };
    }

    let discriminant = v2 * v2 - g * (g * range * range + 2.0 * height_diff * v2);
    if discriminant < 0.0 {
        return None;
    }

    Some(((v2 - discriminant.sqrt()) / (g * range)).atan())
}

/// World-space launch direction toward `target` on a spherical world.
///
/// Elevation is measured from the local horizontal plane defined by `up`.
pub fn ballistic_launch_direction(
    origin: Vec3,
    target: Vec3,
    velocity: f32,
    up: Vec3,
    gravity_magnitude: f32,
) -> Option<Vec3> {
    let up = normalize_or(up, Vec3::Y);
    let offset = target - origin;
    let height_diff = offset.dot(up);
    let horizontal = project_on_plane(offset, up);
    let bearing = normalize_or(horizontal, any_perpendicular(up));

    let angle = ballistic_launch_angle(horizontal.length(), height_diff, velocity, gravity_magnitude)?;
    Some(bearing * angle.cos() + up * angle.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f32::consts::FRAC_PI_4;

    /// Semi-implicit Euler flight; returns height when horizontal range is reached.
    fn height_at_range(direction: Vec3, speed: f32, gravity: Vec3, range: f32) -> f32 {
        let mut position = Vec3::ZERO;
        let mut velocity = direction * speed;
        let dt = 0.0005;
        for _ in 0..200_000 {
            velocity += gravity * dt;
            position += velocity * dt;
            if position.x >= range {
                break;
            }
        }
        position.y
    }

    #[test]
    fn test_launch_angle_in_range() {
        let angle = ballistic_launch_angle(100.0, 0.0, 50.0, 10.0).expect("in range");
        assert!(angle.is_finite());
        assert!(angle > 0.0 && angle <= FRAC_PI_4);
        assert_abs_diff_eq!(angle, 0.2058, epsilon = 1e-3);
    }

    #[test]
    fn test_launch_angle_out_of_range() {
        assert!(ballistic_launch_angle(1000.0, 0.0, 50.0, 10.0).is_none());
    }

    #[test]
    fn test_launch_angle_rejects_bad_input() {
        assert!(ballistic_launch_angle(-5.0, 0.0, 50.0, 10.0).is_none());
        assert!(ballistic_launch_angle(100.0, 0.0, 0.0, 10.0).is_none());
        assert!(ballistic_launch_angle(f32::NAN, 0.0, 50.0, 10.0).is_none());
    }

    #[test]
    fn test_launch_angle_without_gravity_is_direct() {
        let angle = ballistic_launch_angle(100.0, 100.0, 50.0, 0.0).expect("direct");
        assert_abs_diff_eq!(angle, FRAC_PI_4, epsilon = 1e-6);
    }

    #[test]
    fn test_launch_angle_lands_on_target() {
        let angle = ballistic_launch_angle(100.0, 0.0, 50.0, 10.0).expect("in range");
        let direction = Vec3::new(angle.cos(), angle.sin(), 0.0);
        let y = height_at_range(direction, 50.0, Vec3::new(0.0, -10.0, 0.0), 100.0);
        assert_abs_diff_eq!(y, 0.0, epsilon = 0.1);
    }

    #[test]
    fn test_launch_direction_on_sphere() {
        let up = Vec3::X;
        let direction = ballistic_launch_direction(Vec3::ZERO, Vec3::new(0.0, 0.0, -100.0), 50.0, up, 10.0)
            .expect("in range");
        assert_abs_diff_eq!(direction.length(), 1.0, epsilon = 1e-5);
        assert!(direction.x > 0.0);
        assert!(direction.z < 0.0);
    }

    #[test]
    fn test_compensated_aim_raises_against_gravity() {
        let aim = gravity_compensated_aim(Vec3::ZERO, Vec3::X, 100.0, Vec3::new(0.0, -10.0, 0.0), 200.0);
        // t = 2 s, drop = 20 m
        assert!(aim.abs_diff_eq(Vec3::new(200.0, 20.0, 0.0).normalize(), 1e-5));
    }

    #[test]
    fn test_compensated_aim_without_speed_is_unchanged() {
        let aim = gravity_compensated_aim(Vec3::ZERO, Vec3::X * 3.0, 0.0, Vec3::NEG_Y * 10.0, 50.0);
        assert_eq!(aim, Vec3::X);
    }
}
