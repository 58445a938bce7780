//! Down-slope force applied while sliding.

use glam::Vec3;

use crate::physics::FloorHit;

/// Force pushing a sliding body down the slope described by `normal`.
///
/// Flat ground (a normal exactly equal to up) produces no force. Otherwise
/// the force points along the steepest descent within the slope plane and
/// scales with `1 - dot(up, normal)`.
pub fn slide_force(normal: Vec3, multiplier: f32) -> Vec3 {
    if normal == Vec3::Y {
        return Vec3::ZERO;
    }

    let across = Vec3::Y.cross(normal);
    let downhill = across.cross(normal).normalize_or_zero();
    let steepness = (1.0 - Vec3::Y.dot(normal)).clamp(0.0, 1.0);

    downhill * steepness * multiplier
}

/// Slide force for an optional floor sample. No floor, no force.
pub fn floor_slide_force(floor: Option<FloorHit>, multiplier: f32) -> Vec3 {
    floor.map_or(Vec3::ZERO, |floor| slide_force(floor.normal, multiplier))
}
