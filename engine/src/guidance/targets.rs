//! Guidance targets and lock-on
//!
//! Guidance never owns what it chases. Targets live in a [`TargetRegistry`]
//! and are referenced by [`TargetId`]; each tick the id is looked up again
//! and the lock is dropped as soon as the registry no longer knows it.
//!
//! # Capabilities
//!
//! A target exposes its position through [`PositionSource`] and, when it
//! can, its velocity through [`VelocitySource`]. Guidance degrades when a
//! capability is missing:
//!
//! | Missing        | Effect                                 |
//! |----------------|----------------------------------------|
//! | registry entry | lock dropped                           |
//! | position       | unguided flight this tick, lock kept   |
//! | velocity       | pursuit approximation instead of PN    |

use std::collections::BTreeMap;

use glam::Vec3;
use log::debug;

use crate::config::GuidanceConfig;
use crate::math::angle_between;
use crate::physics::{BodyHandle, PhysicsService};

/// Something whose position can be sampled each tick.
pub trait PositionSource {
    fn position(&self, physics: &dyn PhysicsService) -> Option<Vec3>;
}

/// Something whose velocity can be sampled each tick.
pub trait VelocitySource {
    fn velocity(&self, physics: &dyn PhysicsService) -> Option<Vec3>;
}

/// A registry entry's capabilities.
pub trait TargetSource: PositionSource {
    /// Velocity capability, when the target has one.
    fn velocity_source(&self) -> Option<&dyn VelocitySource> {
        None
    }

    /// Physics body backing the target, used to recognise it in line-of-sight casts.
    fn body(&self) -> Option<BodyHandle> {
        None
    }
}

/// Target backed by a dynamic physics body (players, vehicles).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyTarget {
    pub body: BodyHandle,
}

impl PositionSource for BodyTarget {
    fn position(&self, physics: &dyn PhysicsService) -> Option<Vec3> {
        physics.body(self.body).map(|b| b.position)
    }
}

impl VelocitySource for BodyTarget {
    fn velocity(&self, physics: &dyn PhysicsService) -> Option<Vec3> {
        physics.body(self.body).map(|b| b.velocity)
    }
}

impl TargetSource for BodyTarget {
    fn velocity_source(&self) -> Option<&dyn VelocitySource> {
        Some(self)
    }

    fn body(&self) -> Option<BodyHandle> {
        Some(self.body)
    }
}

/// Target fixed in the world (props, structures). Has no velocity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedTarget {
    pub position: Vec3,
}

impl PositionSource for FixedTarget {
    fn position(&self, _physics: &dyn PhysicsService) -> Option<Vec3> {
        Some(self.position)
    }
}

impl TargetSource for FixedTarget {}

/// What a target is, fixed when it is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    Player,
    Vehicle,
    Prop,
}

/// Identifier of a registry entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(pub u32);

/// Target state sampled for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetState {
    pub position: Vec3,
    pub velocity: Option<Vec3>,
}

/// Result of looking a target up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TargetLookup {
    /// The registry no longer has the id
    Missing,
    /// The entry exists but could not report a position this tick
    Unavailable,
    Found(TargetState),
}

struct TargetEntry {
    kind: TargetKind,
    source: Box<dyn TargetSource>,
}

/// Registry of lockable targets.
#[derive(Default)]
pub struct TargetRegistry {
    entries: BTreeMap<TargetId, TargetEntry>,
    next_id: u32,
}

impl std::fmt::Debug for TargetRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(id, entry)| (id, entry.kind)))
            .finish()
    }
}

impl TargetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a target and return its id.
    pub fn register(&mut self, kind: TargetKind, source: Box<dyn TargetSource>) -> TargetId {
        let id = TargetId(self.next_id);
        self.next_id += 1;
        self.entries.insert(id, TargetEntry { kind, source });
        debug!("registered target {:?} as {:?}", id, kind);
        id
    }

    /// Remove a target. Returns `false` if it was not registered.
    pub fn remove(&mut self, id: TargetId) -> bool {
        self.entries.remove(&id).is_some()
    }

    pub fn contains(&self, id: TargetId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn kind(&self, id: TargetId) -> Option<TargetKind> {
        self.entries.get(&id).map(|e| e.kind)
    }

    /// Body backing a target, if any.
    pub fn body(&self, id: TargetId) -> Option<BodyHandle> {
        self.entries.get(&id).and_then(|e| e.source.body())
    }

    pub fn ids(&self) -> impl Iterator<Item = TargetId> + '_ {
        self.entries.keys().copied()
    }

    /// Sample a target's current state.
    pub fn lookup(&self, id: TargetId, physics: &dyn PhysicsService) -> TargetLookup {
        let Some(entry) = self.entries.get(&id) else {
            return TargetLookup::Missing;
        };
        let Some(position) = entry.source.position(physics) else {
            return TargetLookup::Unavailable;
        };
        let velocity = entry
            .source
            .velocity_source()
            .and_then(|source| source.velocity(physics));
        TargetLookup::Found(TargetState { position, velocity })
    }
}

/// Geometric conditions for holding a lock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LockConditions {
    pub max_range: f32,
    /// Maximum off-boresight angle for acquisition (radians)
    pub cone: f32,
    pub require_line_of_sight: bool,
    /// Occluders closer than `range - tolerance` block the lock
    pub los_tolerance: f32,
}

impl LockConditions {
    pub fn from_config(config: &GuidanceConfig) -> Self {
        Self {
            max_range: config.lock_range,
            cone: config.lock_cone,
            require_line_of_sight: config.require_line_of_sight,
            los_tolerance: config.los_tolerance,
        }
    }
}

/// Why a lock was lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockLoss {
    Missing,
    OutOfRange,
    Occluded,
}

/// Per-tick lock check result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LockStatus {
    /// Lock holds and the target was sampled
    Held(TargetState),
    /// Lock holds but the target cannot be sampled this tick
    Blind,
    /// Lock must be dropped
    Lost(LockLoss),
}

/// Check if nothing but the target itself lies between `from` and `to`.
pub fn line_of_sight(
    physics: &dyn PhysicsService,
    from: Vec3,
    to: Vec3,
    target_body: Option<BodyHandle>,
    exclude: Option<BodyHandle>,
    tolerance: f32,
) -> bool {
    let offset = to - from;
    let range = offset.length();
    if range < 1e-4 {
        return true;
    }
    match physics.cast_ray(from, offset / range, range, exclude) {
        None => true,
        Some(hit) => {
            hit.distance >= range - tolerance
                || (target_body.is_some() && hit.collider.body() == target_body)
        }
    }
}

/// Pick the target closest to the boresight that satisfies `conditions`.
///
/// # Arguments
/// * `registry` - Candidate targets
/// * `physics` - Used for sampling and line-of-sight casts
/// * `shooter_pos` - Where the lock originates
/// * `facing` - Boresight direction
/// * `conditions` - Range, cone and line-of-sight limits
/// * `exclude` - The shooter's own body
pub fn acquire_lock(
    registry: &TargetRegistry,
    physics: &dyn PhysicsService,
    shooter_pos: Vec3,
    facing: Vec3,
    conditions: &LockConditions,
    exclude: Option<BodyHandle>,
) -> Option<TargetId> {
    let mut best: Option<(TargetId, f32)> = None;

    for id in registry.ids() {
        let target_body = registry.body(id);
        if target_body.is_some() && target_body == exclude {
            continue;
        }
        let TargetLookup::Found(state) = registry.lookup(id, physics) else {
            continue;
        };

        let offset = state.position - shooter_pos;
        if offset.length() > conditions.max_range {
            continue;
        }
        let off_boresight = angle_between(facing, offset);
        if off_boresight > conditions.cone {
            continue;
        }
        if conditions.require_line_of_sight
            && !line_of_sight(physics, shooter_pos, state.position, target_body, exclude, conditions.los_tolerance)
        {
            continue;
        }

        if best.is_none_or(|(_, angle)| off_boresight < angle) {
            best = Some((id, off_boresight));
        }
    }

    if let Some((id, angle)) = best {
        debug!("lock acquired on {:?} ({:.3} rad off boresight)", id, angle);
    }
    best.map(|(id, _)| id)
}

/// Re-check an existing lock for this tick.
///
/// The acquisition cone is not re-applied: once locked, a seeker may turn
/// to follow its target.
pub fn validate_lock(
    registry: &TargetRegistry,
    physics: &dyn PhysicsService,
    id: TargetId,
    from: Vec3,
    conditions: &LockConditions,
    exclude: Option<BodyHandle>,
) -> LockStatus {
    let state = match registry.lookup(id, physics) {
        TargetLookup::Missing => return LockStatus::Lost(LockLoss::Missing),
        TargetLookup::Unavailable => return LockStatus::Blind,
        TargetLookup::Found(state) => state,
    };

    if state.position.distance(from) > conditions.max_range {
        return LockStatus::Lost(LockLoss::OutOfRange);
    }
    if conditions.require_line_of_sight
        && !line_of_sight(physics, from, state.position, registry.body(id), exclude, conditions.los_tolerance)
    {
        return LockStatus::Lost(LockLoss::Occluded);
    }

    LockStatus::Held(state)
}
