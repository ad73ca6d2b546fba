//! Intercept prediction
//!
//! Where to aim a constant-speed projectile so it meets a target moving at
//! constant velocity. Solves
//!
//! ```text
//! |target + v·t − shooter| = s·t
//! (v·v − s²)·t² + 2(d·v)·t + d·d = 0      with d = target − shooter
//! ```
//!
//! for the smallest positive `t`. A target already at the shooter is the
//! one exception: it is intercepted at `t = 0`, whatever the speeds.

use glam::Vec3;

/// Below this the quadratic term is treated as zero (target speed equals
/// projectile speed) and the equation is solved as linear.
const QUADRATIC_EPSILON: f32 = 1e-6;

/// Smallest positive time at which a projectile of `projectile_speed`
/// fired from `shooter_pos` meets the target.
///
/// Returns `Some(0.0)` when the target coincides with the shooter, and
/// `None` when no real, positive solution exists.
pub fn intercept_time(
    shooter_pos: Vec3,
    target_pos: Vec3,
    target_vel: Vec3,
    projectile_speed: f32,
) -> Option<f32> {
    let d = target_pos - shooter_pos;
    let c = d.length_squared();
    if c < QUADRATIC_EPSILON {
        // Already on top of the target
        return Some(0.0);
    }
    if !projectile_speed.is_finite() || projectile_speed <= 0.0 {
        return None;
    }

    let a = target_vel.length_squared() - projectile_speed * projectile_speed;
    let b = 2.0 * d.dot(target_vel);

    if a.abs() < QUADRATIC_EPSILON {
        // b·t + c = 0
        if b.abs() < QUADRATIC_EPSILON {
            return None;
        }
        let t = -c / b;
        return (t > 0.0).then_some(t);
    }

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrt_disc = discriminant.sqrt();
    let t1 = (-b - sqrt_disc) / (2.0 * a);
    let t2 = (-b + sqrt_disc) / (2.0 * a);

    [t1, t2]
        .into_iter()
        .filter(|t| t.is_finite() && *t > 0.0)
        .min_by(f32::total_cmp)
}

/// Predicted target position at the intercept time.
///
/// # Arguments
/// * `shooter_pos` - Where the projectile starts
/// * `target_pos` - Target position now
/// * `target_vel` - Target velocity (assumed constant)
/// * `projectile_speed` - Projectile speed (assumed constant)
///
/// # Returns
/// `None` when the target cannot be caught at that speed; callers fall
/// back to direct pursuit.
pub fn lead_target(
    shooter_pos: Vec3,
    target_pos: Vec3,
    target_vel: Vec3,
    projectile_speed: f32,
) -> Option<Vec3> {
    let t = intercept_time(shooter_pos, target_pos, target_vel, projectile_speed)?;
    Some(target_pos + target_vel * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_stationary_target() {
        let lead = lead_target(Vec3::ZERO, Vec3::new(100.0, 0.0, 0.0), Vec3::ZERO, 10.0)
            .expect("stationary target is always reachable");
        assert_abs_diff_eq!(lead.x, 100.0, epsilon = 1e-3);
        assert_abs_diff_eq!(lead.y, 0.0, epsilon = 1e-3);
        let t = intercept_time(Vec3::ZERO, Vec3::new(100.0, 0.0, 0.0), Vec3::ZERO, 10.0)
            .expect("solvable");
        assert_abs_diff_eq!(t, 10.0, epsilon = 1e-3);
    }

    #[test]
    fn test_receding_faster_than_projectile() {
        let lead = lead_target(Vec3::ZERO, Vec3::new(100.0, 0.0, 0.0), Vec3::new(20.0, 0.0, 0.0), 10.0);
        assert!(lead.is_none());
    }

    #[test]
    fn test_negative_discriminant() {
        // Fast crossing target: the quadratic has no real roots
        let lead = lead_target(Vec3::ZERO, Vec3::new(100.0, 0.0, 0.0), Vec3::new(0.0, 20.0, 0.0), 10.0);
        assert!(lead.is_none());
    }

    #[test]
    fn test_crossing_target_is_led() {
        let target = Vec3::new(100.0, 0.0, 0.0);
        let velocity = Vec3::new(0.0, 10.0, 0.0);
        let speed = 50.0;
        let lead = lead_target(Vec3::ZERO, target, velocity, speed).expect("catchable");
        assert!(lead.y > 0.0);

        // Projectile and target arrive together
        let t = intercept_time(Vec3::ZERO, target, velocity, speed).expect("catchable");
        assert_abs_diff_eq!(lead.length(), speed * t, epsilon = 1e-2);
    }

    #[test]
    fn test_equal_speeds_use_linear_solution() {
        // Target approaching at projectile speed: meet halfway
        let t = intercept_time(Vec3::ZERO, Vec3::new(100.0, 0.0, 0.0), Vec3::new(-10.0, 0.0, 0.0), 10.0)
            .expect("head-on");
        assert_abs_diff_eq!(t, 5.0, epsilon = 1e-3);
    }

    #[test]
    fn test_coincident_target_is_intercepted_now() {
        let here = Vec3::new(3.0, -2.0, 7.0);
        assert_eq!(intercept_time(here, here, Vec3::new(50.0, 0.0, 0.0), 10.0), Some(0.0));
        assert_eq!(intercept_time(here, here, Vec3::ZERO, 0.0), Some(0.0));
        assert_eq!(lead_target(here, here, Vec3::new(50.0, 0.0, 0.0), 10.0), Some(here));
    }

    #[test]
    fn test_zero_speed_has_no_solution() {
        assert!(intercept_time(Vec3::ZERO, Vec3::X * 10.0, Vec3::ZERO, 0.0).is_none());
    }
}
