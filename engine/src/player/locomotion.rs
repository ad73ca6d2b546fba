//! Locomotion Integrator
//!
//! Converts a character's input into velocity changes for the current
//! movement regime. Movement is relative to the body's facing, kept tangent
//! to the local surface.
//!
//! # Physics Model
//!
//! - Grounded: accelerate toward `direction * speed` at 50 m/s², decelerate
//!   at 30 m/s² without input, clamp tangential speed to 1.5x nominal
//! - Airborne: weak air control (10 m/s²) and tangential damping
//! - Buoyant: weaker acceleration, strong drag, total speed capped at half
//!   walk speed; "ascend" pushes against gravity
//!
//! Velocity changes are written back as impulses so they compose with the
//! gravity impulse applied earlier in the same tick.
//!
//! # Jumping
//!
//! Allowed while grounded (or within coyote time after walking off a ledge)
//! and never while swimming. A jump starts a guard window during which the
//! character cannot jump again and does not count as grounded.

use glam::{Quat, Vec3};
use log::debug;

use crate::config::LocomotionConfig;
use crate::math::{normalize_or, project_on_plane, LOCAL_FORWARD, LOCAL_RIGHT};
use crate::physics::{BodySnapshot, PhysicsService};

use super::input::CharacterInput;

/// Which movement model applies this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementRegime {
    Grounded,
    Airborne,
    Buoyant,
}

/// What the integrator did this tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LocomotionOutcome {
    /// Velocity change applied (m/s), excluding jump and ascend
    pub velocity_change: Vec3,
    pub jumped: bool,
}

/// Move `current` toward `target` by at most `max_delta`.
fn approach(current: Vec3, target: Vec3, max_delta: f32) -> Vec3 {
    let diff = target - current;
    let distance = diff.length();
    if distance <= max_delta || distance < 1e-6 {
        target
    } else {
        current + diff / distance * max_delta
    }
}

/// Reduce the length of `v` by `amount`, stopping at zero.
fn decelerate(v: Vec3, amount: f32) -> Vec3 {
    let speed = v.length();
    if speed <= amount || speed < 1e-3 {
        Vec3::ZERO
    } else {
        v / speed * (speed - amount)
    }
}

/// Per-character locomotion state (jump guard and coyote timers).
#[derive(Debug, Clone)]
pub struct LocomotionIntegrator {
    config: LocomotionConfig,
    jump_guard_remaining: f32,
    coyote_remaining: f32,
}

impl LocomotionIntegrator {
    pub fn new(config: LocomotionConfig) -> Self {
        Self {
            config,
            jump_guard_remaining: 0.0,
            coyote_remaining: 0.0,
        }
    }

    pub fn config(&self) -> &LocomotionConfig {
        &self.config
    }

    /// Check if a recent jump is still within its guard window.
    pub fn jump_in_progress(&self) -> bool {
        self.jump_guard_remaining > 0.0
    }

    pub fn coyote_remaining(&self) -> f32 {
        self.coyote_remaining
    }

    /// Nominal tangential speed for the input's run flag.
    pub fn nominal_speed(&self, input: &CharacterInput) -> f32 {
        if input.run {
            self.config.run_speed
        } else {
            self.config.walk_speed
        }
    }

    /// Check if a jump would be accepted in `regime` right now.
    pub fn can_jump(&self, regime: MovementRegime) -> bool {
        !self.jump_in_progress()
            && match regime {
                MovementRegime::Grounded => true,
                MovementRegime::Airborne => self.coyote_remaining > 0.0,
                MovementRegime::Buoyant => false,
            }
    }

    /// Velocity after one tick of movement input, before jump/ascend.
    ///
    /// # Arguments
    /// * `velocity` - Current body velocity
    /// * `rotation` - Current body orientation (defines forward/right)
    /// * `input` - This tick's input
    /// * `regime` - Movement regime
    /// * `surface_normal` - Ground normal (grounded) used as the tangent plane
    /// * `up` - Gravity up at the body
    /// * `dt` - Tick duration in seconds
    #[allow(clippy::too_many_arguments)]
    pub fn next_velocity(
        &self,
        velocity: Vec3,
        rotation: Quat,
        input: &CharacterInput,
        regime: MovementRegime,
        surface_normal: Vec3,
        up: Vec3,
        dt: f32,
    ) -> Vec3 {
        let body_forward = rotation * LOCAL_FORWARD;
        let body_right = rotation * LOCAL_RIGHT;
        let speed = self.nominal_speed(input);

        match regime {
            MovementRegime::Grounded => {
                let normal = normalize_or(surface_normal, up);
                let forward = normalize_or(project_on_plane(body_forward, normal), Vec3::ZERO);
                let right = normalize_or(project_on_plane(body_right, normal), Vec3::ZERO);
                let wish = (forward * input.forward_axis() + right * input.right_axis())
                    .clamp_length_max(1.0);

                let tangential = project_on_plane(velocity, normal);
                let normal_part = velocity - tangential;

                let tangential = if wish.length_squared() > 1e-6 {
                    approach(tangential, wish * speed, self.config.ground_acceleration * dt)
                } else {
                    decelerate(tangential, self.config.ground_deceleration * dt)
                };
                let tangential = tangential.clamp_length_max(speed * self.config.max_speed_factor);

                tangential + normal_part
            }
            MovementRegime::Airborne => {
                let forward = normalize_or(project_on_plane(body_forward, up), Vec3::ZERO);
                let right = normalize_or(project_on_plane(body_right, up), Vec3::ZERO);
                let wish = (forward * input.forward_axis() + right * input.right_axis())
                    .clamp_length_max(1.0);

                let tangential = project_on_plane(velocity, up);
                let vertical = velocity - tangential;

                let damping = (1.0 - self.config.air_damping * dt).max(0.0);
                let tangential = (tangential + wish * self.config.air_acceleration * dt) * damping;

                tangential + vertical
            }
            MovementRegime::Buoyant => {
                let wish = (body_forward * input.forward_axis() + body_right * input.right_axis())
                    .clamp_length_max(1.0);

                let drag = (1.0 - self.config.buoyant_drag * dt).max(0.0);
                let swum = (velocity + wish * self.config.buoyant_acceleration * dt) * drag;

                swum.clamp_length_max(self.config.walk_speed * self.config.buoyant_speed_fraction)
            }
        }
    }

    /// Run one tick of locomotion for a body.
    ///
    /// `body` must reflect impulses already applied this tick (gravity), and
    /// carry the orientation produced by alignment.
    #[allow(clippy::too_many_arguments)]
    pub fn integrate(
        &mut self,
        physics: &mut dyn PhysicsService,
        body: &BodySnapshot,
        input: &CharacterInput,
        regime: MovementRegime,
        surface_normal: Vec3,
        up: Vec3,
        dt: f32,
    ) -> LocomotionOutcome {
        self.jump_guard_remaining = (self.jump_guard_remaining - dt).max(0.0);
        if regime == MovementRegime::Grounded {
            self.coyote_remaining = self.config.coyote_time;
        } else {
            self.coyote_remaining = (self.coyote_remaining - dt).max(0.0);
        }

        let next = self.next_velocity(body.velocity, body.rotation, input, regime, surface_normal, up, dt);
        let velocity_change = next - body.velocity;
        if velocity_change.is_finite() && velocity_change.length_squared() > 0.0 {
            physics.apply_impulse(body.handle, velocity_change * body.mass);
        }

        if regime == MovementRegime::Buoyant && input.ascend {
            physics.apply_impulse(body.handle, up * self.config.ascend_acceleration * body.mass * dt);
        }

        let mut jumped = false;
        if input.jump && self.can_jump(regime) {
            // Cancel any downward speed so every jump reaches the same height
            let vertical = next.dot(up).min(0.0);
            let jump_change = up * (self.config.jump_velocity - vertical);
            physics.apply_impulse(body.handle, jump_change * body.mass);

            self.jump_guard_remaining = self.config.jump_guard;
            self.coyote_remaining = 0.0;
            jumped = true;
            debug!("body {:?} jumped ({:?})", body.handle, regime);
        }

        LocomotionOutcome {
            velocity_change,
            jumped,
        }
    }
}
