//! First-person camera: field of view, eye height and view angles.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::interp::interp_to;

/// Pitch is kept just short of straight up/down.
pub const MAX_PITCH: f32 = 89.0;

/// Camera state driven by the character.
///
/// Angles are in degrees. Yaw 0 looks down +X; positive pitch looks up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraRig {
    pub fov: f32,
    pub target_fov: f32,
    /// Vertical offset of the eye above the capsule center.
    pub eye_height: f32,
    pub pitch: f32,
    pub yaw: f32,
}

impl CameraRig {
    pub fn new(fov: f32, eye_height: f32) -> Self {
        Self {
            fov,
            target_fov: fov,
            eye_height,
            pitch: 0.0,
            yaw: 0.0,
        }
    }

    /// Ease the field of view toward its target.
    pub fn update_fov(&mut self, delta_time: f32, speed: f32) {
        self.fov = interp_to(self.fov, self.target_fov, delta_time, speed);
    }

    pub fn add_pitch(&mut self, degrees: f32) {
        self.pitch = (self.pitch + degrees).clamp(-MAX_PITCH, MAX_PITCH);
    }

    pub fn add_yaw(&mut self, degrees: f32) {
        self.yaw = (self.yaw + degrees).rem_euclid(360.0);
    }

    /// Horizontal forward direction.
    pub fn forward(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.to_radians().sin_cos();
        Vec3::new(cos_yaw, 0.0, sin_yaw)
    }

    /// Horizontal right direction.
    pub fn right(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.to_radians().sin_cos();
        Vec3::new(-sin_yaw, 0.0, cos_yaw)
    }

    /// Full look direction including pitch.
    pub fn look_direction(&self) -> Vec3 {
        let (sin_pitch, cos_pitch) = self.pitch.to_radians().sin_cos();
        let (sin_yaw, cos_yaw) = self.yaw.to_radians().sin_cos();
        Vec3::new(cos_pitch * cos_yaw, sin_pitch, cos_pitch * sin_yaw)
    }

    /// World-space eye position for a capsule centered at `location`.
    pub fn eye_position(&self, location: Vec3) -> Vec3 {
        location + Vec3::Y * self.eye_height
    }
}
