//! Character body configuration.
//!
//! Values use world units (centimetres) and seconds. Speeds, friction and
//! acceleration limits are not configured here; the locomotion layer writes
//! those into the body at runtime.

use serde::{Deserialize, Serialize};

/// Configuration for the walking/falling character body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyConfig {
    // ========================================================================
    // Capsule
    // ========================================================================
    /// Capsule radius.
    pub radius: f32,

    /// Capsule half-height at spawn, center to tip.
    pub half_height: f32,

    // ========================================================================
    // Physics
    // ========================================================================
    /// Mass used to turn forces into acceleration.
    pub mass: f32,

    /// Downward acceleration while falling (units/second²).
    pub gravity: f32,

    /// Multiplier applied to ground friction while braking.
    pub braking_friction_factor: f32,

    /// Fraction of the input acceleration available in the air.
    pub air_control: f32,

    /// Speeds below this snap to zero while braking.
    pub brake_to_stop_speed: f32,

    // ========================================================================
    // Floors and steps
    // ========================================================================
    /// Minimum floor normal Y to count as walkable. 0.71 is about 45 degrees.
    pub walkable_floor_normal: f32,

    /// How far a walking body is pulled down to stay on the floor.
    pub floor_snap_distance: f32,

    /// Tallest ledge a walking body steps onto.
    pub max_step_height: f32,

    // ========================================================================
    // Collision
    // ========================================================================
    /// Maximum collision planes per slide move.
    pub max_clip_planes: usize,

    /// Overbounce factor for velocity clipping (prevents sticking).
    pub overbounce: f32,

    /// Longest step a single update integrates.
    pub max_delta_time: f32,
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            radius: 34.0,
            half_height: 100.0,

            mass: 100.0,
            gravity: 980.0,
            braking_friction_factor: 2.0,
            air_control: 0.05,
            brake_to_stop_speed: 10.0,

            walkable_floor_normal: 0.71,
            floor_snap_distance: 20.0,
            max_step_height: 45.0,

            max_clip_planes: 5,
            overbounce: 1.001,
            max_delta_time: 0.066,
        }
    }
}

impl BodyConfig {
    /// Floaty tuning: half gravity and more air control.
    pub fn low_gravity() -> Self {
        Self {
            gravity: 490.0,
            air_control: 0.3,
            ..Default::default()
        }
    }

    /// Whether a surface with this normal can be walked on.
    #[inline]
    pub fn is_walkable(&self, normal_y: f32) -> bool {
        normal_y >= self.walkable_floor_normal
    }
}
