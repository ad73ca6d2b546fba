//! Guidance Tests - Lead Prediction, Navigation and Ballistics
//!
//! Closed-form checks for the aiming math shared by homing missiles and
//! direct-fire weapons.

use approx::assert_abs_diff_eq;
use glam::Vec3;
use rstest::rstest;

use gravwell_engine::guidance::{
    ballistic_launch_angle, ballistic_launch_direction, intercept_time, lead_target,
    proportional_navigation,
};

// ============================================================================
// Lead Prediction
// ============================================================================

#[test]
fn test_lead_stationary_target_is_target() {
    let lead = lead_target(Vec3::ZERO, Vec3::new(100.0, 0.0, 0.0), Vec3::ZERO, 10.0)
        .expect("stationary target is reachable");
    assert!(lead.abs_diff_eq(Vec3::new(100.0, 0.0, 0.0), 1e-3));
}

#[test]
fn test_lead_receding_faster_than_projectile() {
    let lead = lead_target(Vec3::ZERO, Vec3::new(100.0, 0.0, 0.0), Vec3::new(20.0, 0.0, 0.0), 10.0);
    assert!(lead.is_none());
}

#[test]
fn test_lead_approaching_target() {
    let t = intercept_time(Vec3::ZERO, Vec3::new(100.0, 0.0, 0.0), Vec3::new(-10.0, 0.0, 0.0), 10.0)
        .expect("closing target is reachable");
    assert_abs_diff_eq!(t, 5.0, epsilon = 1e-3);
}

#[test]
fn test_lead_crossing_target_is_consistent() {
    let shooter = Vec3::ZERO;
    let target = Vec3::new(0.0, 0.0, -200.0);
    let velocity = Vec3::new(15.0, 0.0, 0.0);
    let speed = 80.0;

    let t = intercept_time(shooter, target, velocity, speed).expect("reachable");
    let lead = lead_target(shooter, target, velocity, speed).expect("reachable");

    assert!(lead.abs_diff_eq(target + velocity * t, 1e-3));
    assert_abs_diff_eq!(lead.distance(shooter), speed * t, epsilon = 1e-2);
}

#[rstest]
#[case(Vec3::new(-10.0, 0.0, 0.0), true)]
#[case(Vec3::new(10.0, 0.0, 0.0), false)]
fn test_lead_equal_speed(#[case] velocity: Vec3, #[case] reachable: bool) {
    let t = intercept_time(Vec3::ZERO, Vec3::new(100.0, 0.0, 0.0), velocity, 10.0);
    assert_eq!(t.is_some(), reachable);
}

// ============================================================================
// Proportional Navigation
// ============================================================================

#[test]
fn test_pn_zero_inside_min_range() {
    let command = proportional_navigation(
        Vec3::ZERO,
        Vec3::new(0.0, 0.0, -50.0),
        Vec3::new(0.05, 0.0, 0.0),
        Some(Vec3::new(0.0, 30.0, 0.0)),
        4.0,
    );
    assert_eq!(command, Vec3::ZERO);
}

#[test]
fn test_pn_zero_when_not_closing() {
    let command = proportional_navigation(
        Vec3::ZERO,
        Vec3::new(0.0, 0.0, -10.0),
        Vec3::new(5.0, 0.0, -100.0),
        Some(Vec3::new(0.0, 0.0, -50.0)),
        4.0,
    );
    assert_eq!(command, Vec3::ZERO);
}

#[test]
fn test_pn_zero_on_collision_course() {
    let command = proportional_navigation(
        Vec3::ZERO,
        Vec3::new(0.0, 0.0, -50.0),
        Vec3::new(0.0, 0.0, -100.0),
        None,
        4.0,
    );
    assert!(command.abs_diff_eq(Vec3::ZERO, 1e-6));
}

#[test]
fn test_pn_turns_toward_crossing_target() {
    let command = proportional_navigation(
        Vec3::ZERO,
        Vec3::new(0.0, 0.0, -50.0),
        Vec3::new(0.0, 0.0, -100.0),
        Some(Vec3::new(10.0, 0.0, 0.0)),
        4.0,
    );
    assert!(command.x > 0.0);
    assert_abs_diff_eq!(command.y, 0.0, epsilon = 1e-6);
}

// ============================================================================
// Ballistics
// ============================================================================

#[test]
fn test_ballistic_angle_level_ground() {
    let angle = ballistic_launch_angle(100.0, 0.0, 50.0, 10.0).expect("in range");
    assert_abs_diff_eq!(angle, 0.2058, epsilon = 1e-3);
}

#[test]
fn test_ballistic_angle_out_of_range() {
    assert!(ballistic_launch_angle(1000.0, 0.0, 50.0, 10.0).is_none());
}

#[test]
fn test_ballistic_angle_without_gravity_points_at_target() {
    let angle = ballistic_launch_angle(100.0, 100.0, 50.0, 0.0).expect("always reachable");
    assert_abs_diff_eq!(angle, std::f32::consts::FRAC_PI_4, epsilon = 1e-5);
}

#[test]
fn test_ballistic_direction_on_tilted_up() {
    let up = Vec3::X;
    let direction = ballistic_launch_direction(Vec3::ZERO, Vec3::new(0.0, 0.0, -100.0), 50.0, up, 10.0)
        .expect("in range");

    assert_abs_diff_eq!(direction.length(), 1.0, epsilon = 1e-5);
    assert_abs_diff_eq!(direction.x.asin(), 0.2058, epsilon = 1e-3);
    assert!(direction.z < 0.0);
}
