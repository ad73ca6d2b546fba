//! Orientation Alignment
//!
//! Keeps a character's body "up" matched to the surface it stands on.
//!
//! # Rotation regimes
//!
//! - **Grounded**: look yaw rotates the body about its local up; look pitch
//!   is held separately on the view only, so the body never tilts off the
//!   surface
//! - **Airborne** (including swimming): there is no stable up to decompose
//!   against, so yaw and pitch both rotate the body in full 3DOF
//!
//! Switching regimes is seamless: on takeoff the accumulated view pitch is
//! folded into the body about its right axis ([`on_leave_ground`]); on
//! landing the body is slerped toward the surface with a softer factor for a
//! short window to avoid a visible snap.

use glam::{Quat, Vec3};
use log::debug;

use crate::config::AlignmentConfig;
use crate::math::{
    any_perpendicular, look_rotation, normalize_or, project_on_plane, DEGENERATE_LENGTH_SQ,
    LOCAL_FORWARD, LOCAL_UP,
};

/// Rotate `orientation` toward one whose up matches `surface_normal`.
///
/// The body's forward is kept as close as possible: it is projected onto the
/// surface tangent plane. If the body looks straight along the normal, world
/// forward is projected instead (then world right, for a normal along `-Z`).
///
/// # Arguments
/// * `orientation` - Current body orientation
/// * `surface_normal` - Target up direction
/// * `lerp_factor` - Slerp fraction in `[0, 1]` applied this call
pub fn align_to_surface(orientation: Quat, surface_normal: Vec3, lerp_factor: f32) -> Quat {
    let current_up = orientation * LOCAL_UP;
    let normal = normalize_or(surface_normal, current_up);

    let mut tangent_forward = project_on_plane(orientation * LOCAL_FORWARD, normal);
    if tangent_forward.length_squared() < DEGENERATE_LENGTH_SQ {
        tangent_forward = project_on_plane(LOCAL_FORWARD, normal);
    }
    if tangent_forward.length_squared() < DEGENERATE_LENGTH_SQ {
        tangent_forward = any_perpendicular(normal);
    }

    let target = look_rotation(tangent_forward.normalize(), normal);
    orientation
        .slerp(target, lerp_factor.clamp(0.0, 1.0))
        .normalize()
}

/// Fold a view-only pitch into the body when leaving the ground.
///
/// Rotates `orientation` about its own right axis by `accumulated_pitch`.
///
/// # Returns
/// The new body orientation and the reset view pitch (always `0.0`).
pub fn on_leave_ground(orientation: Quat, accumulated_pitch: f32) -> (Quat, f32) {
    let folded = orientation * Quat::from_rotation_x(accumulated_pitch);
    (folded.normalize(), 0.0)
}

/// Per-character orientation state machine.
#[derive(Debug, Clone)]
pub struct OrientationAligner {
    config: AlignmentConfig,
    /// View pitch decoupled from the body while grounded (radians)
    view_pitch: f32,
    /// Remaining soft-landing time (seconds)
    landing_remaining: f32,
    was_grounded: bool,
}

impl OrientationAligner {
    pub fn new(config: AlignmentConfig) -> Self {
        Self {
            config,
            view_pitch: 0.0,
            landing_remaining: 0.0,
            was_grounded: false,
        }
    }

    /// View pitch held separately from the body (grounded regime only).
    pub fn view_pitch(&self) -> f32 {
        self.view_pitch
    }

    pub fn is_landing(&self) -> bool {
        self.landing_remaining > 0.0
    }

    /// Orientation the camera should use: body plus decoupled view pitch.
    pub fn view_rotation(&self, body: Quat) -> Quat {
        (body * Quat::from_rotation_x(self.view_pitch)).normalize()
    }

    /// Apply this tick's look input to the body.
    ///
    /// # Arguments
    /// * `orientation` - Current body orientation
    /// * `yaw` - Yaw delta in radians (positive turns left)
    /// * `pitch` - Pitch delta in radians (positive looks up)
    /// * `grounded` - Current rotation regime
    pub fn apply_look(&mut self, orientation: Quat, yaw: f32, pitch: f32, grounded: bool) -> Quat {
        if grounded {
            let limit = self.config.max_view_pitch;
            self.view_pitch = (self.view_pitch + pitch).clamp(-limit, limit);
            (orientation * Quat::from_rotation_y(yaw)).normalize()
        } else {
            (orientation * Quat::from_rotation_y(yaw) * Quat::from_rotation_x(pitch)).normalize()
        }
    }

    /// Run one tick of surface alignment, handling regime transitions.
    ///
    /// # Arguments
    /// * `orientation` - Body orientation after look input
    /// * `surface_normal` - Detected surface normal (or local up)
    /// * `grounded` - Whether the character is grounded this tick
    /// * `dt` - Tick duration in seconds
    pub fn update(&mut self, orientation: Quat, surface_normal: Vec3, grounded: bool, dt: f32) -> Quat {
        let mut orientation = orientation;

        if self.was_grounded && !grounded {
            let (folded, pitch) = on_leave_ground(orientation, self.view_pitch);
            debug!("left ground, folded view pitch {:.3} rad into body", self.view_pitch);
            orientation = folded;
            self.view_pitch = pitch;
            self.landing_remaining = 0.0;
        } else if !self.was_grounded && grounded {
            debug!("landed, soft alignment for {:.2}s", self.config.landing_window);
            self.landing_remaining = self.config.landing_window;
        }
        self.was_grounded = grounded;

        if !grounded {
            return orientation;
        }

        let factor = if self.landing_remaining > 0.0 {
            self.config.landing_lerp
        } else {
            self.config.grounded_lerp
        };
        self.landing_remaining = (self.landing_remaining - dt).max(0.0);

        align_to_surface(orientation, surface_normal, factor)
    }
}
