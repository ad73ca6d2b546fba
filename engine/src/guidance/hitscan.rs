//! Instantaneous hit-scan shots
//!
//! A hit-scan round resolves in the tick it is fired. A ranging cast along
//! the line of aim gives the distance used for drop compensation; the
//! impact is then resolved with a second cast along the compensated
//! (launch) direction, so anything in the way of the raised barrel is hit
//! first.

use glam::Vec3;

use super::ballistics::gravity_compensated_aim;
use crate::math::{normalize_or, LOCAL_FORWARD};
use crate::physics::{BodyHandle, PhysicsService, RayHit};

/// Outcome of one hit-scan shot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitscanShot {
    /// Barrel direction after drop compensation (for tracers and effects)
    pub launch_direction: Vec3,
    /// Time the round would have spent in flight (seconds)
    pub time_of_flight: f32,
    pub impact: Option<RayHit>,
}

/// Fire a hit-scan round.
///
/// # Arguments
/// * `physics` - Service used for the impact cast
/// * `origin` - Muzzle position
/// * `direction` - Line of aim
/// * `muzzle_speed` - Round speed in m/s (used for drop and flight time)
/// * `gravity` - Gravity acceleration vector at the muzzle
/// * `max_distance` - Weapon range
/// * `exclude` - The shooter's body
pub fn hitscan(
    physics: &dyn PhysicsService,
    origin: Vec3,
    direction: Vec3,
    muzzle_speed: f32,
    gravity: Vec3,
    max_distance: f32,
    exclude: Option<BodyHandle>,
) -> HitscanShot {
    let direction = normalize_or(direction, LOCAL_FORWARD);
    let range = physics
        .cast_ray(origin, direction, max_distance, exclude)
        .map_or(max_distance, |hit| hit.distance);

    let launch_direction = gravity_compensated_aim(origin, direction, muzzle_speed, gravity, range);
    let impact = physics.cast_ray(origin, launch_direction, max_distance, exclude);
    let distance = impact.map_or(range, |hit| hit.distance);

    let time_of_flight = if muzzle_speed > 0.0 {
        distance / muzzle_speed
    } else {
        0.0
    };

    HitscanShot {
        launch_direction,
        time_of_flight,
        impact,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{ColliderId, NullPhysics, SimplePhysicsWorld, StaticShape};
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_hitscan_hits_wall() {
        let mut world = SimplePhysicsWorld::new();
        let wall = world.add_static(StaticShape::Aabb {
            min: Vec3::new(-5.0, -5.0, -101.0),
            max: Vec3::new(5.0, 5.0, -100.0),
        });

        let shot = hitscan(&world, Vec3::ZERO, Vec3::NEG_Z, 400.0, Vec3::new(0.0, -9.81, 0.0), 500.0, None);
        let impact = shot.impact.expect("wall in range");
        assert_eq!(impact.collider, ColliderId::Static(wall));
        assert_abs_diff_eq!(impact.distance, 100.0, epsilon = 1e-2);
        assert_abs_diff_eq!(shot.time_of_flight, 0.25, epsilon = 1e-4);
        assert!(shot.launch_direction.y > 0.0);
        assert!(impact.point.y > 0.0);
    }

    #[test]
    fn test_hitscan_resolves_along_raised_barrel() {
        let mut world = SimplePhysicsWorld::new();
        world.add_static(StaticShape::Aabb {
            min: Vec3::new(-5.0, -5.0, -101.0),
            max: Vec3::new(5.0, 5.0, -100.0),
        });
        // Only the drop-compensated line passes through this ledge
        let ledge = world.add_static(StaticShape::Aabb {
            min: Vec3::new(-5.0, 8.0, -50.5),
            max: Vec3::new(5.0, 12.0, -49.5),
        });

        let shot = hitscan(&world, Vec3::ZERO, Vec3::NEG_Z, 50.0, Vec3::new(0.0, -9.81, 0.0), 500.0, None);
        let impact = shot.impact.expect("ledge in the way");
        assert_eq!(impact.collider, ColliderId::Static(ledge));
        assert!(impact.point.y > 8.0);
        assert!(shot.time_of_flight < 2.0);
    }

    #[test]
    fn test_hitscan_miss_uses_full_range() {
        let shot = hitscan(&NullPhysics, Vec3::ZERO, Vec3::X, 100.0, Vec3::new(0.0, -10.0, 0.0), 300.0, None);
        assert!(shot.impact.is_none());
        assert_abs_diff_eq!(shot.time_of_flight, 3.0, epsilon = 1e-5);
    }
}
