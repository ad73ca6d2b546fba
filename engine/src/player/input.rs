//! Per-tick character input
//!
//! The core is agnostic to where input comes from (keyboard, gamepad,
//! network); hosts fill a [`CharacterInput`] snapshot each tick.

/// Input snapshot for one character for one tick.
///
/// Axes are in `[-1, 1]`; out-of-range values are clamped when read.
/// Look deltas are in radians and consumed by the tick that reads them.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CharacterInput {
    /// +1 forward, -1 backward
    pub forward: f32,
    /// +1 right, -1 left
    pub right: f32,
    /// Use run speed instead of walk speed
    pub run: bool,
    /// Request a jump
    pub jump: bool,
    /// Swim upward while in fluid
    pub ascend: bool,
    /// Yaw change this tick (radians, positive turns left)
    pub yaw_delta: f32,
    /// Pitch change this tick (radians, positive looks up)
    pub pitch_delta: f32,
}

impl CharacterInput {
    /// Movement input along the body's forward axis.
    pub fn forward_axis(&self) -> f32 {
        clamp_axis(self.forward)
    }

    /// Movement input along the body's right axis.
    pub fn right_axis(&self) -> f32 {
        clamp_axis(self.right)
    }

    /// Check if any movement axis is non-zero.
    pub fn has_movement(&self) -> bool {
        self.forward_axis() != 0.0 || self.right_axis() != 0.0
    }

    /// Take the look deltas, leaving zero behind.
    pub fn take_look(&mut self) -> (f32, f32) {
        let look = (finite_or_zero(self.yaw_delta), finite_or_zero(self.pitch_delta));
        self.yaw_delta = 0.0;
        self.pitch_delta = 0.0;
        look
    }
}

fn clamp_axis(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

fn finite_or_zero(value: f32) -> f32 {
    if value.is_finite() { value } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axes_are_clamped() {
        let input = CharacterInput {
            forward: 3.0,
            right: f32::NAN,
            ..Default::default()
        };
        assert_eq!(input.forward_axis(), 1.0);
        assert_eq!(input.right_axis(), 0.0);
        assert!(input.has_movement());
    }

    #[test]
    fn test_take_look_consumes() {
        let mut input = CharacterInput {
            yaw_delta: 0.2,
            pitch_delta: -0.1,
            ..Default::default()
        };
        assert_eq!(input.take_look(), (0.2, -0.1));
        assert_eq!(input.take_look(), (0.0, 0.0));
    }
}
