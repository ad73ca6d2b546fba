//! Render-facing pose output.

use glam::{Quat, Vec3};
use static_assertions::assert_impl_all;

use crate::player::CharacterId;
use crate::projectile::ProjectileId;

/// Which simulated entity a pose belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityRef {
    Character(CharacterId),
    Projectile(ProjectileId),
}

/// World-space pose of one entity after a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

assert_impl_all!(Pose: Copy, Send, Sync);
assert_impl_all!(EntityRef: Copy, Send, Sync);
