//! Simulation Configuration
//!
//! Every tuned constant in the core lives here as a reconfigurable default.
//! The numbers encode game feel (damping, interpolation, probe offsets,
//! thrust gains), not a physical model, so hosts are free to override any
//! of them.
//!
//! Overrides are read from JSON; every field is optional and falls back to
//! its default:
//!
//! ```ignore
//! use gravwell_engine::config::SimConfig;
//!
//! let config = SimConfig::from_json_str(r#"{ "locomotion": { "walk_speed": 4.0 } }"#)?;
//! assert_eq!(config.locomotion.run_speed, 10.0);
//! ```

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use static_assertions::const_assert;

use crate::error::ConfigError;

/// Default tuning values.
pub mod defaults {
    /// Fixed simulation tick rate (Hz)
    pub const TICK_RATE: f32 = 60.0;

    /// Gravity acceleration toward the center (m/s²)
    pub const GRAVITY_STRENGTH: f32 = 9.81;
    /// Minimum distance to the gravity center for a defined direction (m)
    pub const GRAVITY_CENTER_EPSILON: f32 = 1e-4;
    /// Passive velocity damping while under gravity (1/s)
    pub const GRAVITY_VELOCITY_DAMPING: f32 = 0.02;
    /// Buoyancy as a multiple of gravity strength
    pub const BUOYANCY: f32 = 1.2;
    /// Fluid drag (1/s)
    pub const FLUID_DRAG: f32 = 2.0;

    /// Height above the feet that ground probes start from (m)
    pub const PROBE_LIFT: f32 = 0.1;
    /// How far below the feet ground probes reach (m)
    pub const PROBE_REACH: f32 = 0.35;
    /// Left/right probe offset as a fraction of body radius
    pub const PROBE_LATERAL_OFFSET: f32 = 0.7;
    /// Downward speed above which the entity cannot count as grounded (m/s)
    pub const MAX_GROUNDED_FALL_SPEED: f32 = 2.0;
    /// How long a contact event keeps the entity grounded (s)
    pub const CONTACT_GRACE: f32 = 0.15;
    /// Minimum `normal · up` for a contact to count as ground (about 60°)
    pub const MIN_CONTACT_ALIGNMENT: f32 = 0.5;

    /// Alignment interpolation factor while continuously grounded
    pub const GROUNDED_ALIGN_LERP: f32 = 0.15;
    /// Alignment interpolation factor right after landing
    pub const LANDING_ALIGN_LERP: f32 = 0.05;
    /// Duration of the soft landing alignment (s)
    pub const LANDING_WINDOW: f32 = 0.25;
    /// View pitch limit while grounded (rad, ~89°)
    pub const MAX_VIEW_PITCH: f32 = 1.553;

    /// Walking speed (m/s)
    pub const WALK_SPEED: f32 = 5.0;
    /// Running speed (m/s)
    pub const RUN_SPEED: f32 = 10.0;
    /// Horizontal speed clamp as a multiple of the nominal speed
    pub const MAX_SPEED_FACTOR: f32 = 1.5;
    /// Grounded acceleration (m/s²)
    pub const GROUND_ACCELERATION: f32 = 50.0;
    /// Grounded deceleration without input (m/s²)
    pub const GROUND_DECELERATION: f32 = 30.0;
    /// Air-control acceleration (m/s²)
    pub const AIR_ACCELERATION: f32 = 10.0;
    /// Passive tangential damping while airborne (1/s)
    pub const AIR_DAMPING: f32 = 1.5;
    /// Swimming acceleration (m/s²)
    pub const BUOYANT_ACCELERATION: f32 = 12.0;
    /// Swimming drag (1/s)
    pub const BUOYANT_DRAG: f32 = 3.0;
    /// Swimming speed limit as a fraction of walk speed
    pub const BUOYANT_SPEED_FRACTION: f32 = 0.5;
    /// Extra acceleration against gravity while ascending in fluid (m/s²)
    pub const ASCEND_ACCELERATION: f32 = 14.0;
    /// Jump launch speed along up (m/s)
    pub const JUMP_VELOCITY: f32 = 8.0;
    /// Time before another jump may trigger (s)
    pub const JUMP_GUARD: f32 = 0.3;
    /// Grace period after leaving ground during which jumping is allowed (s)
    pub const COYOTE_TIME: f32 = 0.1;

    /// Extra gap kept between feet and ground (m)
    pub const CORRECTION_CLEARANCE: f32 = 0.02;
    /// Corrections smaller than this are ignored (m)
    pub const MIN_CORRECTION: f32 = 0.01;
    /// Corrections larger than this are treated as teleports and ignored (m)
    pub const MAX_CORRECTION: f32 = 2.0;
    /// Largest position change applied in one tick (m)
    pub const MAX_CORRECTION_STEP: f32 = 0.25;
    /// Fraction of the correction applied per tick
    pub const CORRECTION_STRENGTH: f32 = 0.35;

    /// Proportional navigation constant
    pub const NAVIGATION_GAIN: f32 = 4.0;
    /// How strongly the navigation command bends the thrust direction (s²/m)
    pub const TRACKING_STRENGTH: f32 = 0.05;
    /// Blend of gravity-compensated aim into the thrust direction
    pub const GRAVITY_BIAS: f32 = 0.25;
    /// Maximum lock-on range (m)
    pub const LOCK_RANGE: f32 = 400.0;
    /// Maximum off-boresight angle for lock acquisition (rad)
    pub const LOCK_CONE: f32 = 0.5;
    /// Slack when comparing line-of-sight hits to target range (m)
    pub const LOS_TOLERANCE: f32 = 1.0;

    /// Missile thrust force (N)
    pub const THRUST: f32 = 600.0;
    /// Missile speed cap (m/s)
    pub const MAX_SPEED: f32 = 120.0;
    /// Unpowered coast time before ignition (s)
    pub const IGNITION_DELAY: f32 = 0.35;
    /// Velocity kick applied along facing at ignition (m/s)
    pub const IGNITION_IMPULSE: f32 = 20.0;
    /// Self-destruct age (s)
    pub const LIFETIME: f32 = 12.0;
    /// Proximity fuse radius (m)
    pub const FUSE_RADIUS: f32 = 3.0;
    /// Forward impact probe length beyond this tick's travel (m)
    pub const FORWARD_PROBE: f32 = 1.5;
    /// Ground proximity trigger distance (m)
    pub const GROUND_PROXIMITY: f32 = 0.75;
    /// Missile mass (kg)
    pub const PROJECTILE_MASS: f32 = 10.0;
    /// Missile collider radius (m)
    pub const PROJECTILE_RADIUS: f32 = 0.2;
    /// Explosion radius handed to the effects spawner (m)
    pub const EXPLOSION_RADIUS: f32 = 6.0;
    /// Maximum simultaneously active projectiles
    pub const MAX_PROJECTILES: usize = 32;
}

const_assert!(defaults::MIN_CORRECTION < defaults::MAX_CORRECTION);
const_assert!(defaults::LANDING_ALIGN_LERP < defaults::GROUNDED_ALIGN_LERP);
const_assert!(defaults::WALK_SPEED <= defaults::RUN_SPEED);

/// Radial gravity and fluid tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GravityConfig {
    /// Initial gravity center (world space)
    pub center: Vec3,
    pub strength: f32,
    pub center_epsilon: f32,
    pub velocity_damping: f32,
    pub buoyancy: f32,
    pub fluid_drag: f32,
}

impl Default for GravityConfig {
    fn default() -> Self {
        Self {
            center: Vec3::ZERO,
            strength: defaults::GRAVITY_STRENGTH,
            center_epsilon: defaults::GRAVITY_CENTER_EPSILON,
            velocity_damping: defaults::GRAVITY_VELOCITY_DAMPING,
            buoyancy: defaults::BUOYANCY,
            fluid_drag: defaults::FLUID_DRAG,
        }
    }
}

/// Foot probe geometry and grounding thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundProbeConfig {
    pub probe_lift: f32,
    pub probe_reach: f32,
    pub lateral_offset: f32,
    pub max_grounded_fall_speed: f32,
    pub contact_grace: f32,
    /// Contacts steeper than this (`normal · up` below it) are walls
    pub min_contact_alignment: f32,
}

impl Default for GroundProbeConfig {
    fn default() -> Self {
        Self {
            probe_lift: defaults::PROBE_LIFT,
            probe_reach: defaults::PROBE_REACH,
            lateral_offset: defaults::PROBE_LATERAL_OFFSET,
            max_grounded_fall_speed: defaults::MAX_GROUNDED_FALL_SPEED,
            contact_grace: defaults::CONTACT_GRACE,
            min_contact_alignment: defaults::MIN_CONTACT_ALIGNMENT,
        }
    }
}

/// Surface alignment tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentConfig {
    pub grounded_lerp: f32,
    pub landing_lerp: f32,
    pub landing_window: f32,
    pub max_view_pitch: f32,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            grounded_lerp: defaults::GROUNDED_ALIGN_LERP,
            landing_lerp: defaults::LANDING_ALIGN_LERP,
            landing_window: defaults::LANDING_WINDOW,
            max_view_pitch: defaults::MAX_VIEW_PITCH,
        }
    }
}

/// Movement tuning for the three locomotion regimes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    pub walk_speed: f32,
    pub run_speed: f32,
    pub max_speed_factor: f32,
    pub ground_acceleration: f32,
    pub ground_deceleration: f32,
    pub air_acceleration: f32,
    pub air_damping: f32,
    pub buoyant_acceleration: f32,
    pub buoyant_drag: f32,
    pub buoyant_speed_fraction: f32,
    pub ascend_acceleration: f32,
    pub jump_velocity: f32,
    pub jump_guard: f32,
    pub coyote_time: f32,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            walk_speed: defaults::WALK_SPEED,
            run_speed: defaults::RUN_SPEED,
            max_speed_factor: defaults::MAX_SPEED_FACTOR,
            ground_acceleration: defaults::GROUND_ACCELERATION,
            ground_deceleration: defaults::GROUND_DECELERATION,
            air_acceleration: defaults::AIR_ACCELERATION,
            air_damping: defaults::AIR_DAMPING,
            buoyant_acceleration: defaults::BUOYANT_ACCELERATION,
            buoyant_drag: defaults::BUOYANT_DRAG,
            buoyant_speed_fraction: defaults::BUOYANT_SPEED_FRACTION,
            ascend_acceleration: defaults::ASCEND_ACCELERATION,
            jump_velocity: defaults::JUMP_VELOCITY,
            jump_guard: defaults::JUMP_GUARD,
            coyote_time: defaults::COYOTE_TIME,
        }
    }
}

/// Ground snapping band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrectionConfig {
    pub clearance: f32,
    pub min_correction: f32,
    pub max_correction: f32,
    pub max_step: f32,
    pub strength: f32,
}

impl Default for CorrectionConfig {
    fn default() -> Self {
        Self {
            clearance: defaults::CORRECTION_CLEARANCE,
            min_correction: defaults::MIN_CORRECTION,
            max_correction: defaults::MAX_CORRECTION,
            max_step: defaults::MAX_CORRECTION_STEP,
            strength: defaults::CORRECTION_STRENGTH,
        }
    }
}

/// Homing and lock-on tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuidanceConfig {
    pub navigation_gain: f32,
    pub tracking_strength: f32,
    pub gravity_bias: f32,
    pub lock_range: f32,
    pub lock_cone: f32,
    pub require_line_of_sight: bool,
    pub los_tolerance: f32,
}

impl Default for GuidanceConfig {
    fn default() -> Self {
        Self {
            navigation_gain: defaults::NAVIGATION_GAIN,
            tracking_strength: defaults::TRACKING_STRENGTH,
            gravity_bias: defaults::GRAVITY_BIAS,
            lock_range: defaults::LOCK_RANGE,
            lock_cone: defaults::LOCK_CONE,
            require_line_of_sight: true,
            los_tolerance: defaults::LOS_TOLERANCE,
        }
    }
}

/// Guided projectile tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileConfig {
    pub thrust: f32,
    pub max_speed: f32,
    pub ignition_delay: f32,
    pub ignition_impulse: f32,
    pub lifetime: f32,
    pub fuse_radius: f32,
    pub forward_probe: f32,
    pub ground_proximity: f32,
    pub mass: f32,
    pub radius: f32,
    pub explosion_radius: f32,
    pub max_projectiles: usize,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            thrust: defaults::THRUST,
            max_speed: defaults::MAX_SPEED,
            ignition_delay: defaults::IGNITION_DELAY,
            ignition_impulse: defaults::IGNITION_IMPULSE,
            lifetime: defaults::LIFETIME,
            fuse_radius: defaults::FUSE_RADIUS,
            forward_probe: defaults::FORWARD_PROBE,
            ground_proximity: defaults::GROUND_PROXIMITY,
            mass: defaults::PROJECTILE_MASS,
            radius: defaults::PROJECTILE_RADIUS,
            explosion_radius: defaults::EXPLOSION_RADIUS,
            max_projectiles: defaults::MAX_PROJECTILES,
        }
    }
}

/// Complete tuning for a simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub tick_rate: f32,
    pub gravity: GravityConfig,
    pub ground: GroundProbeConfig,
    pub alignment: AlignmentConfig,
    pub locomotion: LocomotionConfig,
    pub correction: CorrectionConfig,
    pub guidance: GuidanceConfig,
    pub projectile: ProjectileConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_rate: defaults::TICK_RATE,
            gravity: GravityConfig::default(),
            ground: GroundProbeConfig::default(),
            alignment: AlignmentConfig::default(),
            locomotion: LocomotionConfig::default(),
            correction: CorrectionConfig::default(),
            guidance: GuidanceConfig::default(),
            projectile: ProjectileConfig::default(),
        }
    }
}

fn check_non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be finite and >= 0, got {value}")))
    }
}

fn check_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be finite and > 0, got {value}")))
    }
}

fn check_unit_interval(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must lie in [0, 1], got {value}")))
    }
}

impl SimConfig {
    /// Parse a (possibly partial) JSON override and validate it.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a JSON override file.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Fixed timestep derived from the tick rate (s).
    pub fn fixed_dt(&self) -> f32 {
        1.0 / self.tick_rate
    }

    /// Reject values that would make the simulation diverge or misbehave.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_positive("tick_rate", self.tick_rate)?;

        let g = &self.gravity;
        if !g.center.is_finite() {
            return Err(ConfigError::invalid("gravity.center", "must be finite"));
        }
        check_non_negative("gravity.strength", g.strength)?;
        check_positive("gravity.center_epsilon", g.center_epsilon)?;
        check_non_negative("gravity.velocity_damping", g.velocity_damping)?;
        check_non_negative("gravity.buoyancy", g.buoyancy)?;
        check_non_negative("gravity.fluid_drag", g.fluid_drag)?;

        let p = &self.ground;
        check_non_negative("ground.probe_lift", p.probe_lift)?;
        check_positive("ground.probe_reach", p.probe_reach)?;
        check_unit_interval("ground.lateral_offset", p.lateral_offset)?;
        check_non_negative("ground.max_grounded_fall_speed", p.max_grounded_fall_speed)?;
        check_non_negative("ground.contact_grace", p.contact_grace)?;
        check_unit_interval("ground.min_contact_alignment", p.min_contact_alignment)?;

        let a = &self.alignment;
        check_unit_interval("alignment.grounded_lerp", a.grounded_lerp)?;
        check_unit_interval("alignment.landing_lerp", a.landing_lerp)?;
        check_non_negative("alignment.landing_window", a.landing_window)?;
        check_positive("alignment.max_view_pitch", a.max_view_pitch)?;

        let l = &self.locomotion;
        check_positive("locomotion.walk_speed", l.walk_speed)?;
        check_positive("locomotion.run_speed", l.run_speed)?;
        if l.max_speed_factor < 1.0 || !l.max_speed_factor.is_finite() {
            return Err(ConfigError::invalid("locomotion.max_speed_factor", "must be >= 1"));
        }
        check_non_negative("locomotion.ground_acceleration", l.ground_acceleration)?;
        check_non_negative("locomotion.ground_deceleration", l.ground_deceleration)?;
        check_non_negative("locomotion.air_acceleration", l.air_acceleration)?;
        check_non_negative("locomotion.air_damping", l.air_damping)?;
        check_non_negative("locomotion.buoyant_acceleration", l.buoyant_acceleration)?;
        check_non_negative("locomotion.buoyant_drag", l.buoyant_drag)?;
        check_unit_interval("locomotion.buoyant_speed_fraction", l.buoyant_speed_fraction)?;
        check_non_negative("locomotion.ascend_acceleration", l.ascend_acceleration)?;
        check_non_negative("locomotion.jump_velocity", l.jump_velocity)?;
        check_non_negative("locomotion.jump_guard", l.jump_guard)?;
        check_non_negative("locomotion.coyote_time", l.coyote_time)?;

        let c = &self.correction;
        check_non_negative("correction.clearance", c.clearance)?;
        check_non_negative("correction.min_correction", c.min_correction)?;
        check_positive("correction.max_correction", c.max_correction)?;
        if c.min_correction >= c.max_correction {
            return Err(ConfigError::invalid(
                "correction.min_correction",
                "must be smaller than correction.max_correction",
            ));
        }
        check_positive("correction.max_step", c.max_step)?;
        check_unit_interval("correction.strength", c.strength)?;

        let gd = &self.guidance;
        check_non_negative("guidance.navigation_gain", gd.navigation_gain)?;
        check_non_negative("guidance.tracking_strength", gd.tracking_strength)?;
        check_unit_interval("guidance.gravity_bias", gd.gravity_bias)?;
        check_positive("guidance.lock_range", gd.lock_range)?;
        check_positive("guidance.lock_cone", gd.lock_cone)?;
        check_non_negative("guidance.los_tolerance", gd.los_tolerance)?;

        let pr = &self.projectile;
        check_non_negative("projectile.thrust", pr.thrust)?;
        check_positive("projectile.max_speed", pr.max_speed)?;
        check_non_negative("projectile.ignition_delay", pr.ignition_delay)?;
        check_non_negative("projectile.ignition_impulse", pr.ignition_impulse)?;
        check_positive("projectile.lifetime", pr.lifetime)?;
        check_non_negative("projectile.fuse_radius", pr.fuse_radius)?;
        check_non_negative("projectile.forward_probe", pr.forward_probe)?;
        check_non_negative("projectile.ground_proximity", pr.ground_proximity)?;
        check_positive("projectile.mass", pr.mass)?;
        check_non_negative("projectile.radius", pr.radius)?;
        check_non_negative("projectile.explosion_radius", pr.explosion_radius)?;
        if pr.max_projectiles == 0 {
            return Err(ConfigError::invalid("projectile.max_projectiles", "must be at least 1"));
        }

        Ok(())
    }
}
