//! Narrow-phase collision primitives
//!
//! Ray and overlap tests used by [`SimplePhysicsWorld`](super::world::SimplePhysicsWorld).
//! There is no broad phase here: callers test every shape.
//!
//! # Ray-AABB Intersection
//!
//! The slab method finds entry and exit times against each pair of
//! axis-aligned planes; the box is hit when the latest entry precedes the
//! earliest exit.
//!
//! # Example
//!
//! ```ignore
//! use gravwell_engine::physics::collision::{ray_sphere_intersect, ray_aabb_intersect};
//! use glam::Vec3;
//!
//! let t = ray_sphere_intersect(Vec3::new(0.0, 10.0, 0.0), -Vec3::Y, Vec3::ZERO, 5.0);
//! assert_eq!(t, Some(5.0));
//! ```

use glam::Vec3;

/// Ray-AABB intersection using the slab method.
///
/// # Arguments
///
/// * `ray_origin` - Starting point of the ray
/// * `ray_dir` - Direction of the ray (must be normalized)
/// * `aabb_min` - Minimum corner of the AABB
/// * `aabb_max` - Maximum corner of the AABB
///
/// # Returns
///
/// * `Some(t)` - Distance along the ray to the entry point, or `0.0` when the
///   origin is inside the box
/// * `None` - No intersection in front of the origin
pub fn ray_aabb_intersect(
    ray_origin: Vec3,
    ray_dir: Vec3,
    aabb_min: Vec3,
    aabb_max: Vec3,
) -> Option<f32> {
    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;

    for axis in 0..3 {
        let origin = ray_origin[axis];
        let dir = ray_dir[axis];
        let (lo, hi) = (aabb_min[axis], aabb_max[axis]);

        if dir.abs() < 1e-10 {
            // Parallel to this slab: must already be between the planes
            if origin < lo || origin > hi {
                return None;
            }
            continue;
        }

        let inv = 1.0 / dir;
        let t1 = (lo - origin) * inv;
        let t2 = (hi - origin) * inv;
        t_enter = t_enter.max(t1.min(t2));
        t_exit = t_exit.min(t1.max(t2));
    }

    if t_exit < t_enter || t_exit < 0.0 {
        return None;
    }

    Some(t_enter.max(0.0))
}

/// Outward normal of the AABB face closest to `point`.
///
/// The point is mapped into unit-cube space and the dominant axis wins.
pub fn aabb_surface_normal(point: Vec3, aabb_min: Vec3, aabb_max: Vec3) -> Vec3 {
    let center = (aabb_min + aabb_max) * 0.5;
    let half_extents = ((aabb_max - aabb_min) * 0.5).max(Vec3::splat(1e-6));
    let local = (point - center) / half_extents;
    let abs = local.abs();

    if abs.x >= abs.y && abs.x >= abs.z {
        Vec3::new(local.x.signum(), 0.0, 0.0)
    } else if abs.y >= abs.z {
        Vec3::new(0.0, local.y.signum(), 0.0)
    } else {
        Vec3::new(0.0, 0.0, local.z.signum())
    }
}

/// Ray-sphere intersection.
///
/// Returns the distance to the first surface crossing in front of the
/// origin, or `0.0` when the origin starts inside the sphere.
pub fn ray_sphere_intersect(
    ray_origin: Vec3,
    ray_dir: Vec3,
    center: Vec3,
    radius: f32,
) -> Option<f32> {
    let offset = ray_origin - center;
    let b = offset.dot(ray_dir);
    let c = offset.length_squared() - radius * radius;

    if c <= 0.0 {
        return Some(0.0);
    }
    // Outside and pointing away
    if b > 0.0 {
        return None;
    }

    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }

    let t = -b - discriminant.sqrt();
    Some(t.max(0.0))
}

/// Closest point on an AABB to `point` (the point itself when inside).
pub fn closest_point_on_aabb(point: Vec3, aabb_min: Vec3, aabb_max: Vec3) -> Vec3 {
    point.clamp(aabb_min, aabb_max)
}

/// Penetration of a sphere into an AABB.
///
/// Returns `(depth, normal)` with the normal pointing out of the box toward
/// the sphere center, or `None` when they do not overlap.
pub fn sphere_aabb_penetration(
    center: Vec3,
    radius: f32,
    aabb_min: Vec3,
    aabb_max: Vec3,
) -> Option<(f32, Vec3)> {
    let closest = closest_point_on_aabb(center, aabb_min, aabb_max);
    let delta = center - closest;
    let dist_sq = delta.length_squared();

    if dist_sq > radius * radius {
        return None;
    }

    if dist_sq > 1e-12 {
        let dist = dist_sq.sqrt();
        return Some((radius - dist, delta / dist));
    }

    // Center inside the box: push out through the nearest face
    let normal = aabb_surface_normal(center, aabb_min, aabb_max);
    let face_distance = if normal.x != 0.0 {
        if normal.x > 0.0 { aabb_max.x - center.x } else { center.x - aabb_min.x }
    } else if normal.y != 0.0 {
        if normal.y > 0.0 { aabb_max.y - center.y } else { center.y - aabb_min.y }
    } else if normal.z > 0.0 {
        aabb_max.z - center.z
    } else {
        center.z - aabb_min.z
    };
    Some((face_distance + radius, normal))
}
