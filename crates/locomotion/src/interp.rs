//! Scalar interpolation helpers shared by the camera, capsule and timelines.

/// Squared distance below which an interpolation snaps to its target.
const SNAP_EPSILON_SQ: f32 = 1.0e-8;

/// Linear interpolation between `a` and `b`.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Ease `current` toward `target`, covering a fraction of the remaining
/// distance proportional to `speed * delta_time`.
///
/// A non-positive speed jumps straight to the target.
pub fn interp_to(current: f32, target: f32, delta_time: f32, speed: f32) -> f32 {
    if speed <= 0.0 {
        return target;
    }

    let distance = target - current;
    if distance * distance < SNAP_EPSILON_SQ {
        return target;
    }

    current + distance * (delta_time * speed).clamp(0.0, 1.0)
}

/// Move `current` toward `target` by at most `speed * delta_time`.
pub fn interp_constant_to(current: f32, target: f32, delta_time: f32, speed: f32) -> f32 {
    if speed <= 0.0 {
        return target;
    }

    let distance = target - current;
    if distance * distance < SNAP_EPSILON_SQ {
        return target;
    }

    let step = speed * delta_time;
    current + distance.clamp(-step, step)
}
