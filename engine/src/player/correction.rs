//! Position Correction
//!
//! Nudges a grounded character toward its ideal standing height above the
//! detected ground, so it neither sinks into slopes and steps nor floats
//! above them. Corrections outside a plausible band are ignored (too small
//! to matter, or so large they would read as a teleport), and the part that
//! is applied is capped per tick.

use glam::Vec3;
use log::trace;

use crate::config::CorrectionConfig;
use crate::physics::{BodySnapshot, PhysicsService, RayHit};

/// Bounded ground-snapping corrector.
#[derive(Debug, Clone)]
pub struct PositionCorrector {
    config: CorrectionConfig,
}

impl PositionCorrector {
    pub fn new(config: CorrectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CorrectionConfig {
        &self.config
    }

    /// Position change for this tick, without applying it.
    ///
    /// Only the component along the gravity axis is corrected; lateral
    /// offsets between the probe hit and the body are ignored.
    ///
    /// # Arguments
    /// * `position` - Current body center
    /// * `hit` - Closest foot-probe hit
    /// * `height` - Character height (center sits at half height)
    /// * `gravity_dir` - Unit gravity direction at the body
    /// * `strength` - Fraction of the correction to apply this tick
    ///
    /// # Returns
    /// `None` when the correction falls outside the accepted band.
    pub fn correction(
        &self,
        position: Vec3,
        hit: &RayHit,
        height: f32,
        gravity_dir: Vec3,
        strength: f32,
    ) -> Option<Vec3> {
        let up = -gravity_dir;
        let ideal = hit.point + up * (height * 0.5 + self.config.clearance);
        let along_up = (ideal - position).dot(up);
        let magnitude = along_up.abs();

        if !magnitude.is_finite()
            || magnitude < self.config.min_correction
            || magnitude > self.config.max_correction
        {
            return None;
        }

        let step = up * along_up * strength.clamp(0.0, 1.0);
        Some(step.clamp_length_max(self.config.max_step))
    }

    /// Apply this tick's correction to the body.
    ///
    /// # Returns
    /// The position change applied, or `None` if nothing was moved.
    pub fn adjust_to_ground(
        &self,
        physics: &mut dyn PhysicsService,
        body: &BodySnapshot,
        closest_hit: &RayHit,
        height: f32,
        gravity_dir: Vec3,
        strength: f32,
    ) -> Option<Vec3> {
        let step = self.correction(body.position, closest_hit, height, gravity_dir, strength)?;
        physics.set_position(body.handle, body.position + step);
        trace!("corrected {:?} by {:?}", body.handle, step);
        Some(step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{BodyDesc, ColliderId, SimplePhysicsWorld};
    use approx::assert_abs_diff_eq;
    use rstest::rstest;

    const HEIGHT: f32 = 1.8;

    fn ground_hit_at(y: f32) -> RayHit {
        RayHit {
            distance: 0.1,
            point: Vec3::new(0.0, y, 0.0),
            normal: Vec3::Y,
            collider: ColliderId::Static(0),
        }
    }

    fn corrector() -> PositionCorrector {
        PositionCorrector::new(CorrectionConfig::default())
    }

    #[test]
    fn test_sunk_body_is_lifted_partially() {
        // Ideal center: 0.9 + 0.02 = 0.92; body sits 0.2 too low
        let step = corrector()
            .correction(Vec3::new(0.0, 0.72, 0.0), &ground_hit_at(0.0), HEIGHT, Vec3::NEG_Y, 0.35)
            .expect("within band");
        assert_abs_diff_eq!(step.y, 0.2 * 0.35, epsilon = 1e-5);
        assert_abs_diff_eq!(step.x, 0.0);
    }

    #[test]
    fn test_floating_body_is_lowered() {
        let step = corrector()
            .correction(Vec3::new(0.0, 1.12, 0.0), &ground_hit_at(0.0), HEIGHT, Vec3::NEG_Y, 0.5)
            .expect("within band");
        assert!(step.y < 0.0);
    }

    #[test]
    fn test_negligible_correction_ignored() {
        let result = corrector().correction(Vec3::new(0.0, 0.915, 0.0), &ground_hit_at(0.0), HEIGHT, Vec3::NEG_Y, 0.35);
        assert!(result.is_none());
    }

    #[test]
    fn test_teleport_sized_correction_ignored() {
        let result = corrector().correction(Vec3::new(0.0, -5.0, 0.0), &ground_hit_at(0.0), HEIGHT, Vec3::NEG_Y, 0.35);
        assert!(result.is_none());
    }

    #[rstest]
    #[case(0.3)]
    #[case(1.0)]
    #[case(1.9)]
    fn test_step_never_exceeds_cap(#[case] sink: f32) {
        let config = CorrectionConfig::default();
        let corrector = PositionCorrector::new(config.clone());
        let position = Vec3::new(0.0, 0.92 - sink, 0.0);
        if let Some(step) = corrector.correction(position, &ground_hit_at(0.0), HEIGHT, Vec3::NEG_Y, 1.0) {
            assert!(step.length() <= config.max_step + 1e-6);
        }
    }

    #[test]
    fn test_lateral_probe_offset_is_ignored() {
        let hit = RayHit {
            point: Vec3::new(0.3, 0.0, 0.0),
            ..ground_hit_at(0.0)
        };
        let step = corrector()
            .correction(Vec3::new(0.0, 0.72, 0.0), &hit, HEIGHT, Vec3::NEG_Y, 1.0)
            .expect("within band");
        assert_abs_diff_eq!(step.x, 0.0);
    }

    #[test]
    fn test_adjust_moves_body() {
        let mut world = SimplePhysicsWorld::new();
        let handle = world.create_body(BodyDesc::sphere(Vec3::new(0.0, 0.72, 0.0), 80.0, 0.9));
        let body = world.body(handle).expect("body exists");

        let step = corrector().adjust_to_ground(&mut world, &body, &ground_hit_at(0.0), HEIGHT, Vec3::NEG_Y, 0.35);
        assert!(step.is_some());
        let after = world.body(handle).expect("body exists");
        assert!(after.position.y > 0.72);
    }
}
