//! Fluid volumes
//!
//! Regions where gravity is replaced by buoyancy and drag. A planet's ocean
//! is a sphere volume slightly larger than the planet's solid surface.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A registered fluid region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FluidVolume {
    /// Everything within `radius` of `center`
    Sphere { center: Vec3, radius: f32 },
    /// Axis-aligned box
    Aabb { min: Vec3, max: Vec3 },
}

impl FluidVolume {
    /// Ocean shell around a planet: the sphere up to `surface_radius`.
    pub fn ocean(center: Vec3, surface_radius: f32) -> Self {
        FluidVolume::Sphere {
            center,
            radius: surface_radius,
        }
    }

    /// Check if a point is inside the volume (boundary counts as inside).
    pub fn contains(&self, point: Vec3) -> bool {
        match *self {
            FluidVolume::Sphere { center, radius } => {
                point.distance_squared(center) <= radius * radius
            }
            FluidVolume::Aabb { min, max } => {
                point.cmpge(min).all() && point.cmple(max).all()
            }
        }
    }
}
