//! Vector helpers shared by the locomotion and guidance pipelines.
//!
//! # Body axes
//!
//! Every body uses the same local frame: `-Z` forward, `+Y` up, `+X` right.
//! A body's rotation maps these local axes into world space.

use glam::{Mat3, Quat, Vec3};

/// Local forward axis of every body.
pub const LOCAL_FORWARD: Vec3 = Vec3::NEG_Z;
/// Local up axis of every body.
pub const LOCAL_UP: Vec3 = Vec3::Y;
/// Local right axis of every body.
pub const LOCAL_RIGHT: Vec3 = Vec3::X;

/// Squared length below which a vector is treated as degenerate.
pub const DEGENERATE_LENGTH_SQ: f32 = 1e-8;

/// Normalize `v`, or return `fallback` when `v` is near zero or non-finite.
pub fn normalize_or(v: Vec3, fallback: Vec3) -> Vec3 {
    if v.is_finite() && v.length_squared() > DEGENERATE_LENGTH_SQ {
        v.normalize()
    } else {
        fallback
    }
}

/// Remove the component of `v` along `normal` (normal must be unit length).
pub fn project_on_plane(v: Vec3, normal: Vec3) -> Vec3 {
    v - normal * v.dot(normal)
}

/// Any unit vector perpendicular to `v`.
pub fn any_perpendicular(v: Vec3) -> Vec3 {
    let reference = if v.x.abs() < 0.9 { Vec3::X } else { Vec3::Z };
    normalize_or(v.cross(reference), Vec3::Z)
}

/// Rotation whose local `-Z` points along `forward` and whose local `+Y`
/// is as close to `up` as possible.
///
/// Falls back to a perpendicular up when `forward` and `up` are parallel.
pub fn look_rotation(forward: Vec3, up: Vec3) -> Quat {
    let forward = normalize_or(forward, LOCAL_FORWARD);
    let mut right = forward.cross(up);
    if right.length_squared() < DEGENERATE_LENGTH_SQ {
        right = forward.cross(any_perpendicular(forward));
    }
    let right = right.normalize();
    let true_up = right.cross(forward);
    Quat::from_mat3(&Mat3::from_cols(right, true_up, -forward)).normalize()
}

/// Angle between two directions in radians (`0` if either is degenerate).
pub fn angle_between(a: Vec3, b: Vec3) -> f32 {
    match (a.try_normalize(), b.try_normalize()) {
        (Some(a), Some(b)) => a.dot(b).clamp(-1.0, 1.0).acos(),
        _ => 0.0,
    }
}
