//! Anticipatory crouch height.
//!
//! While low, the character looks for ceilings both directly overhead and a
//! short distance ahead in the direction it is heading, and shrinks its
//! crouch target so the capsule fits under them before it gets there.
//!
//! Two columns are swept upward from the nominal crouch top:
//!
//! ```text
//!            current      intended
//!              ||            |
//!   ceiling ---||------------|----   <- lowest acceptable impact wins
//!              ||            |
//!   feet + crouch height ----+----
//!              <- radius + anticipation ->
//! ```

use glam::Vec3;

use crate::config::LocomotionConfig;
use crate::physics::{GeometryProbe, PhysicsBody, SweepHit};

use super::capsule::CapsuleHeightState;
use super::state::MovementState;

/// Outcome of one resolver pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CrouchTarget {
    /// A ceiling limits the crouch to this half-height.
    Limited(f32),
    /// Nothing acceptable overhead; use the nominal crouch half-height.
    Nominal,
    /// The ceiling would require a half-height below the minimum. The
    /// previous target is kept.
    Rejected(f32),
}

impl CrouchTarget {
    pub fn apply(self, capsule: &mut CapsuleHeightState, config: &LocomotionConfig) {
        match self {
            CrouchTarget::Limited(half_height) => capsule.set_target_half_height(half_height),
            CrouchTarget::Nominal => {
                capsule.set_target_half_height(config.crouching_capsule_half_height)
            }
            CrouchTarget::Rejected(half_height) => {
                log::debug!(
                    "discarding crouch target {half_height}, keeping {}",
                    capsule.target_half_height()
                );
            }
        }
    }
}

/// Probe ahead of and above the body and pick a crouch half-height.
pub fn resolve_crouch_target<P, B>(
    probe: &P,
    body: &B,
    state: MovementState,
    config: &LocomotionConfig,
) -> CrouchTarget
where
    P: GeometryProbe + ?Sized,
    B: PhysicsBody + ?Sized,
{
    let crouch_half_height = config.crouching_capsule_half_height;
    let feet = body.feet_height();

    let (heading, anticipation) = match state {
        MovementState::Sliding => (body.velocity(), config.slide_anticipation),
        MovementState::Crouching => (body.last_input_vector(), config.crouch_anticipation),
        _ => (Vec3::ZERO, config.crouch_anticipation),
    };

    let mut offset = heading.normalize_or_zero();
    offset.y = 0.0;
    offset *= body.capsule_radius() + anticipation;

    let mut current_start = body.location();
    current_start.y = feet + crouch_half_height;
    let intended_start = current_start + offset;

    let intended_end = intended_start + Vec3::Y * crouch_half_height;
    let current_end = Vec3::new(current_start.x, intended_end.y, current_start.z);

    let intended = probe
        .sweep_sphere(config.intended_probe_radius, intended_start, intended_end)
        .filter(|hit| is_ceiling(hit, config.max_ceiling_angle));
    let current = probe
        .sweep_sphere(config.current_probe_radius, current_start, current_end)
        .filter(|hit| is_ceiling(hit, config.max_ceiling_angle));

    let impact_height = match (intended, current) {
        (Some(a), Some(b)) => a.impact_point.y.min(b.impact_point.y),
        (Some(hit), None) | (None, Some(hit)) => hit.impact_point.y,
        (None, None) => return CrouchTarget::Nominal,
    };

    let half_height = ((impact_height - feet - config.ceiling_clearance) / 2.0).ceil();
    if half_height < config.min_capsule_half_height {
        return CrouchTarget::Rejected(half_height);
    }

    log::trace!("crouch limited by ceiling at {impact_height}, half-height {half_height}");
    CrouchTarget::Limited(half_height)
}

/// Accept surfaces whose normal is within `max_angle` degrees of straight down.
fn is_ceiling(hit: &SweepHit, max_angle: f32) -> bool {
    let cosine = Vec3::NEG_Y.dot(hit.impact_normal).clamp(-1.0, 1.0);
    cosine.acos().to_degrees() < max_angle
}
