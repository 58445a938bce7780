//! Contract between the locomotion core and the physics engine.
//!
//! The core never integrates motion or tests geometry itself. It asks a
//! [`GeometryProbe`] and a [`FloorQuery`] about the world, and steers a
//! [`PhysicsBody`] by writing its speed limits, velocity and forces.

use glam::Vec3;

/// Vertical capsule dimensions.
///
/// `half_height` is measured from the capsule center to the tip of either
/// cap, so the feet sit at `center.y - half_height`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Capsule {
    pub radius: f32,
    pub half_height: f32,
}

/// First blocking contact of a sphere sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepHit {
    /// Contact point on the blocking surface.
    pub impact_point: Vec3,
    /// Surface normal at the contact, pointing away from the surface.
    pub impact_normal: Vec3,
}

/// Walkable (or at least blocking) surface below a capsule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloorHit {
    pub impact_point: Vec3,
    pub normal: Vec3,
}

/// Synchronous sweep queries against static geometry.
///
/// Implementations exclude the querying character from the results.
pub trait GeometryProbe {
    /// Sweep a sphere from `from` to `to`, reporting the first blocking hit.
    fn sweep_sphere(&self, radius: f32, from: Vec3, to: Vec3) -> Option<SweepHit>;
}

/// Floor lookup for a capsule at a given location.
pub trait FloorQuery {
    fn find_floor(&self, location: Vec3, capsule: Capsule) -> Option<FloorHit>;
}

/// Movement component the character drives.
pub trait PhysicsBody {
    /// Capsule center in world space.
    fn location(&self) -> Vec3;

    fn velocity(&self) -> Vec3;
    fn set_velocity(&mut self, velocity: Vec3);

    /// Add a continuous force for the current tick.
    fn add_force(&mut self, force: Vec3);

    /// Whether the body is walking on a floor (not falling).
    fn is_grounded(&self) -> bool;

    /// Movement input consumed by the most recent integration step.
    fn last_input_vector(&self) -> Vec3;

    /// Queue movement input for the next integration step.
    fn add_movement_input(&mut self, direction: Vec3, scale: f32);

    /// Launch a jump if the body is grounded.
    fn jump(&mut self);

    fn capsule_radius(&self) -> f32;
    fn capsule_half_height(&self) -> f32;
    fn set_capsule_half_height(&mut self, half_height: f32);

    fn set_max_walk_speed(&mut self, speed: f32);
    fn set_braking_deceleration(&mut self, deceleration: f32);
    fn set_ground_friction(&mut self, friction: f32);
    fn set_max_acceleration(&mut self, acceleration: f32);
    fn set_jump_velocity(&mut self, velocity: f32);

    fn capsule(&self) -> Capsule {
        Capsule {
            radius: self.capsule_radius(),
            half_height: self.capsule_half_height(),
        }
    }

    /// World-space height of the capsule bottom.
    fn feet_height(&self) -> f32 {
        self.location().y - self.capsule_half_height()
    }
}
