//! Capsule half-height control and overhead clearance checks.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::config::LocomotionConfig;
use crate::interp::interp_constant_to;
use crate::physics::{GeometryProbe, PhysicsBody};

/// Half-height bookkeeping for the collision capsule.
///
/// Every write goes through [`CapsuleHeightState::set_half_height`], which
/// keeps the value inside `[min_half_height, max_half_height]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapsuleHeightState {
    half_height: f32,
    /// Dynamic crouch target, recomputed by the anticipatory resolver.
    target_half_height: f32,
    min_half_height: f32,
    max_half_height: f32,
    /// Units per second.
    interp_speed: f32,
}

impl CapsuleHeightState {
    pub fn new(config: &LocomotionConfig) -> Self {
        Self {
            half_height: config.max_capsule_half_height,
            target_half_height: config.crouching_capsule_half_height,
            min_half_height: config.min_capsule_half_height,
            max_half_height: config.max_capsule_half_height,
            interp_speed: config.capsule_interp_speed,
        }
    }

    #[inline]
    pub fn half_height(&self) -> f32 {
        self.half_height
    }

    #[inline]
    pub fn target_half_height(&self) -> f32 {
        self.target_half_height
    }

    #[inline]
    pub fn bounds(&self) -> (f32, f32) {
        (self.min_half_height, self.max_half_height)
    }

    /// Set the half-height, clamped to the configured bounds.
    pub fn set_half_height(&mut self, half_height: f32) {
        self.half_height = half_height.clamp(self.min_half_height, self.max_half_height);
    }

    pub fn set_target_half_height(&mut self, target: f32) {
        self.target_half_height = target;
    }

    /// Approach the crouch target at the configured constant rate.
    pub fn approach_target(&mut self, delta_time: f32) {
        let next = interp_constant_to(
            self.half_height,
            self.target_half_height,
            delta_time,
            self.interp_speed,
        );
        self.set_half_height(next);
    }

    /// Write the current half-height to the physics collision shape.
    pub fn apply_to<B: PhysicsBody + ?Sized>(&self, body: &mut B) {
        body.set_capsule_half_height(self.half_height);
    }
}

/// Whether a crouched character has room to stand back up.
///
/// Sweeps a sphere up from the top of the capsule through the height the
/// capsule would gain by growing to its maximum half-height.
pub fn can_uncrouch<P: GeometryProbe + ?Sized>(
    probe: &P,
    location: Vec3,
    half_height: f32,
    config: &LocomotionConfig,
) -> bool {
    let growth = (config.max_capsule_half_height - half_height) * 2.0
        + config.uncrouch_clearance_margin;

    let start = location + Vec3::Y * half_height;
    let end = start + Vec3::Y * (growth - config.uncrouch_probe_radius);

    match probe.sweep_sphere(config.uncrouch_probe_radius, start, end) {
        Some(hit) => {
            log::debug!(
                "uncrouch blocked at {:?} (normal {:?})",
                hit.impact_point,
                hit.impact_normal
            );
            false
        }
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockWorld;

    #[test]
    fn test_half_height_is_clamped() {
        let config = LocomotionConfig::default();
        let mut capsule = CapsuleHeightState::new(&config);

        capsule.set_half_height(500.0);
        assert_eq!(capsule.half_height(), config.max_capsule_half_height);

        capsule.set_half_height(-3.0);
        assert_eq!(capsule.half_height(), config.min_capsule_half_height);
    }

    #[test]
    fn test_approach_target_constant_rate() {
        let config = LocomotionConfig {
            capsule_interp_speed: 20.0,
            ..Default::default()
        };
        let mut capsule = CapsuleHeightState::new(&config);
        capsule.set_half_height(88.0);
        capsule.set_target_half_height(40.0);

        capsule.approach_target(0.5);
        assert_eq!(capsule.half_height(), 78.0);

        for _ in 0..20 {
            capsule.approach_target(0.5);
        }
        assert_eq!(capsule.half_height(), 40.0);
    }

    #[test]
    fn test_target_below_minimum_still_clamps_height() {
        let config = LocomotionConfig {
            capsule_interp_speed: 1000.0,
            ..Default::default()
        };
        let mut capsule = CapsuleHeightState::new(&config);
        capsule.set_target_half_height(0.0);
        capsule.approach_target(1.0);
        assert_eq!(capsule.half_height(), config.min_capsule_half_height);
    }

    #[test]
    fn test_uncrouch_column_geometry() {
        let config = LocomotionConfig::default();
        let world = MockWorld::default();
        let location = Vec3::new(0.0, 40.0, 0.0);

        assert!(can_uncrouch(&world, location, 40.0, &config));

        let sweeps = world.sweeps();
        assert_eq!(sweeps.len(), 1);
        let sweep = sweeps[0];
        assert_eq!(sweep.radius, 20.0);
        assert_eq!(sweep.from, Vec3::new(0.0, 80.0, 0.0));
        // (100 - 40) * 2 + 10 - 20 = 110 above the capsule top
        assert_eq!(sweep.to, Vec3::new(0.0, 190.0, 0.0));
    }

    #[test]
    fn test_uncrouch_refused_on_any_hit() {
        let config = LocomotionConfig::default();
        let world = MockWorld::with_ceiling(150.0);
        assert!(!can_uncrouch(&world, Vec3::new(0.0, 40.0, 0.0), 40.0, &config));
    }
}
