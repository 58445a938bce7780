//! Slide move collision response.
//!
//! The body is traced along its velocity; whenever it hits something the
//! velocity is clipped against the surface and the remaining time is spent
//! sliding along it.

use glam::Vec3;

use crate::collision::{CollisionWorld, ContentFlags, TraceShape};

use super::config::BodyConfig;

/// Hard cap on the planes tracked in one move.
const MAX_CLIP_PLANES: usize = 5;

/// Outcome of a slide move.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SlideMoveResult {
    /// The full move completed without touching anything.
    pub clear: bool,
    /// First surface hit, if any.
    pub first_normal: Option<Vec3>,
}

/// Remove the part of `velocity` going into a surface.
pub fn clip_velocity(velocity: Vec3, normal: Vec3, overbounce: f32) -> Vec3 {
    let backoff = velocity.dot(normal);
    let adjusted = if backoff < 0.0 {
        backoff * overbounce
    } else {
        backoff / overbounce
    };
    velocity - normal * adjusted
}

/// Move `position` along `velocity` for `delta_time`, sliding along
/// whatever gets in the way.
pub fn slide_move(
    world: &CollisionWorld,
    position: &mut Vec3,
    velocity: &mut Vec3,
    shape: TraceShape,
    delta_time: f32,
    config: &BodyConfig,
) -> SlideMoveResult {
    let mut result = SlideMoveResult::default();
    let mut time_remaining = delta_time;
    let original_velocity = *velocity;
    let mut planes = [Vec3::ZERO; MAX_CLIP_PLANES];
    let mut num_planes = 0;

    for _ in 0..config.max_clip_planes.min(MAX_CLIP_PLANES) {
        if velocity.length_squared() < 1.0e-4 || time_remaining <= 0.0 {
            break;
        }

        let target = *position + *velocity * time_remaining;
        let trace = world.trace(*position, target, shape, ContentFlags::MASK_CHARACTER);

        if !trace.hit_something() {
            *position = trace.end_position;
            result.clear = num_planes == 0;
            return result;
        }

        *position = trace.end_position;
        time_remaining *= 1.0 - trace.fraction;

        if trace.all_solid {
            *velocity = Vec3::ZERO;
            return result;
        }

        let normal = trace.normal_or_up();
        result.first_normal.get_or_insert(normal);
        if num_planes < MAX_CLIP_PLANES {
            planes[num_planes] = normal;
            num_planes += 1;
        }

        // Find a clipped velocity that goes into none of the planes
        let mut resolved = None;
        for i in 0..num_planes {
            let clipped = clip_velocity(*velocity, planes[i], config.overbounce);
            let valid = (0..num_planes)
                .filter(|&j| j != i)
                .all(|j| clipped.dot(planes[j]) >= -0.01);
            if valid {
                resolved = Some(clipped);
                break;
            }
        }

        match resolved {
            Some(clipped) => *velocity = clipped,
            None if num_planes >= 2 => {
                // Slide along the crease between the first two planes
                let crease = planes[0].cross(planes[1]).normalize_or_zero();
                *velocity = crease * original_velocity.dot(crease);
            }
            None => {
                *velocity = Vec3::ZERO;
                return result;
            }
        }
    }

    result
}

/// Slide move that also tries stepping up onto low ledges.
pub fn step_slide_move(
    world: &CollisionWorld,
    position: &mut Vec3,
    velocity: &mut Vec3,
    shape: TraceShape,
    delta_time: f32,
    config: &BodyConfig,
) -> SlideMoveResult {
    let start_position = *position;
    let start_velocity = *velocity;

    let result = slide_move(world, position, velocity, shape, delta_time, config);
    let blocked_by_wall = result
        .first_normal
        .is_some_and(|normal| !config.is_walkable(normal.y));
    if result.clear || !blocked_by_wall {
        return result;
    }

    let flat_distance = (*position - start_position).with_y(0.0).length_squared();

    let up = world.trace(
        start_position,
        start_position + Vec3::Y * config.max_step_height,
        shape,
        ContentFlags::MASK_CHARACTER,
    );
    if up.all_solid {
        return result;
    }

    let mut stepped_position = up.end_position;
    let mut stepped_velocity = start_velocity;
    slide_move(
        world,
        &mut stepped_position,
        &mut stepped_velocity,
        shape,
        delta_time,
        config,
    );

    let down = world.trace(
        stepped_position,
        stepped_position - Vec3::Y * (config.max_step_height + 1.0),
        shape,
        ContentFlags::MASK_CHARACTER,
    );
    let landed = down.hit_something() && config.is_walkable(down.normal_or_up().y);
    if !landed {
        return result;
    }
    stepped_position = down.end_position;

    let stepped_distance = (stepped_position - start_position).with_y(0.0).length_squared();
    if stepped_distance > flat_distance {
        log::trace!(
            "stepped up {:.1} units",
            stepped_position.y - start_position.y
        );
        *position = stepped_position;
        *velocity = stepped_velocity.with_y(0.0);
    }

    result
}
