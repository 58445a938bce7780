//! Walking/falling character body.
//!
//! [`CharacterBody`] is the movement component the locomotion layer steers.
//! It accumulates movement input and forces between updates, then integrates
//! one step against the [`CollisionWorld`]:
//!
//! 1. Push out of any geometry the capsule was resized into
//! 2. Consume input (clamped to unit length) and accumulated forces
//! 3. Walking: friction, braking and acceleration, then a stepping slide move
//!    in the floor plane and a snap back down onto the floor
//! 4. Falling: gravity and limited air control, then a slide move and a
//!    landing check

use glam::Vec3;
use serde::{Deserialize, Serialize};
use stride_locomotion::physics::{FloorHit, PhysicsBody};

use crate::collision::{CollisionWorld, ContentFlags, TraceShape, FLOOR_PROBE_DISTANCE};

use super::config::BodyConfig;
use super::slide_move::{slide_move, step_slide_move};

/// How far down `spawn_at` looks for a floor.
const SPAWN_PROBE_DISTANCE: f32 = 1000.0;

/// Longest braking substep.
const MAX_BRAKING_SUBSTEP: f32 = 1.0 / 33.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementMode {
    #[default]
    Walking,
    Falling,
}

/// Capsule-shaped character body.
#[derive(Debug, Clone)]
pub struct CharacterBody {
    config: BodyConfig,
    location: Vec3,
    velocity: Vec3,
    mode: MovementMode,
    floor: Option<FloorHit>,
    radius: f32,
    half_height: f32,

    // Written by the locomotion layer
    max_walk_speed: f32,
    braking_deceleration: f32,
    ground_friction: f32,
    max_acceleration: f32,
    jump_velocity: f32,

    // Accumulated between updates
    pending_input: Vec3,
    pending_force: Vec3,
    last_input: Vec3,
}

impl CharacterBody {
    /// Body with its capsule center at `location`, falling until it finds a floor.
    pub fn new(config: BodyConfig, location: Vec3) -> Self {
        Self {
            radius: config.radius,
            half_height: config.half_height,
            config,
            location,
            velocity: Vec3::ZERO,
            mode: MovementMode::Falling,
            floor: None,
            max_walk_speed: 600.0,
            braking_deceleration: 2048.0,
            ground_friction: 8.0,
            max_acceleration: 2048.0,
            jump_velocity: 420.0,
            pending_input: Vec3::ZERO,
            pending_force: Vec3::ZERO,
            last_input: Vec3::ZERO,
        }
    }

    /// Drop the body from `location` onto the floor below it.
    pub fn spawn_at(&mut self, location: Vec3, world: &CollisionWorld) {
        self.location = location;
        self.velocity = Vec3::ZERO;
        self.mode = if self.snap_to_floor(world, SPAWN_PROBE_DISTANCE) {
            MovementMode::Walking
        } else {
            log::warn!("no floor below spawn point {location:?}");
            MovementMode::Falling
        };
    }

    /// Integrate one step.
    pub fn update(&mut self, delta_time: f32, world: &CollisionWorld) {
        let delta_time = delta_time.min(self.config.max_delta_time);
        if delta_time <= 0.0 {
            return;
        }

        let shape = self.shape();
        if world.point_in_solid(self.location, shape, ContentFlags::MASK_CHARACTER) {
            let resolved =
                world.resolve_penetration(self.location, shape, ContentFlags::MASK_CHARACTER);
            log::debug!("pushed out of geometry: {:?} -> {resolved:?}", self.location);
            self.location = resolved;
        }

        let input = self.pending_input.with_y(0.0).clamp_length_max(1.0);
        self.pending_input = Vec3::ZERO;
        self.last_input = input;
        let acceleration = input * self.max_acceleration;

        self.velocity += self.pending_force / self.config.mass * delta_time;
        self.pending_force = Vec3::ZERO;

        match self.mode {
            MovementMode::Walking => self.walk(delta_time, acceleration, world),
            MovementMode::Falling => self.fall(delta_time, acceleration, world),
        }
    }

    fn walk(&mut self, delta_time: f32, acceleration: Vec3, world: &CollisionWorld) {
        self.calc_velocity(delta_time, acceleration);

        // Stay in the floor plane
        let normal = self.floor.map_or(Vec3::Y, |floor| floor.normal);
        self.velocity -= normal * self.velocity.dot(normal);

        let shape = self.shape();
        step_slide_move(
            world,
            &mut self.location,
            &mut self.velocity,
            shape,
            delta_time,
            &self.config,
        );

        if !self.snap_to_floor(world, self.config.floor_snap_distance) {
            log::debug!("left the floor at {:?}", self.location);
            self.mode = MovementMode::Falling;
        }
    }

    fn fall(&mut self, delta_time: f32, acceleration: Vec3, world: &CollisionWorld) {
        let horizontal = self.velocity.with_y(0.0);
        let speed_limit = horizontal.length().max(self.max_walk_speed);
        let horizontal = (horizontal + acceleration * self.config.air_control * delta_time)
            .clamp_length_max(speed_limit);
        self.velocity = horizontal.with_y(self.velocity.y - self.config.gravity * delta_time);

        let descending = self.velocity.y <= 0.0;
        let shape = self.shape();
        slide_move(
            world,
            &mut self.location,
            &mut self.velocity,
            shape,
            delta_time,
            &self.config,
        );

        if descending && self.snap_to_floor(world, FLOOR_PROBE_DISTANCE) {
            log::debug!("landed at {:?}", self.location);
            self.velocity.y = 0.0;
            self.mode = MovementMode::Walking;
        }
    }

    /// Friction, braking and acceleration toward the max walk speed.
    fn calc_velocity(&mut self, delta_time: f32, acceleration: Vec3) {
        let max_speed = self.max_walk_speed;
        let speed = self.velocity.length();
        let over_max = speed > max_speed;
        let has_input = acceleration.length_squared() > 1.0e-8;

        if !has_input || over_max {
            let before = self.velocity;
            let friction = self.ground_friction * self.config.braking_friction_factor;
            self.apply_braking(delta_time, friction, self.braking_deceleration);

            // Pushing forward never brakes below the max speed
            if over_max && has_input && self.velocity.length() < max_speed {
                self.velocity = before.normalize_or_zero() * max_speed;
            }
        } else {
            // Friction bends the velocity toward the input direction
            let direction = acceleration.normalize();
            let turn = (delta_time * self.ground_friction).min(1.0);
            self.velocity -= (self.velocity - direction * speed) * turn;
        }

        if has_input {
            let limit = if over_max { self.velocity.length() } else { max_speed };
            self.velocity = (self.velocity + acceleration * delta_time).clamp_length_max(limit);
        }
    }

    fn apply_braking(&mut self, delta_time: f32, friction: f32, deceleration: f32) {
        if self.velocity == Vec3::ZERO || (friction <= 0.0 && deceleration <= 0.0) {
            return;
        }

        let reverse = -self.velocity.normalize_or_zero() * deceleration.max(0.0);
        let mut remaining = delta_time;
        while remaining > 1.0e-6 {
            let step = remaining.min(MAX_BRAKING_SUBSTEP);
            remaining -= step;

            let before = self.velocity;
            self.velocity += (-friction * self.velocity + reverse) * step;
            if self.velocity.dot(before) <= 0.0 {
                self.velocity = Vec3::ZERO;
                return;
            }
        }

        if self.velocity.length() < self.config.brake_to_stop_speed {
            self.velocity = Vec3::ZERO;
        }
    }

    /// Pull the body down onto a walkable floor within `distance`.
    fn snap_to_floor(&mut self, world: &CollisionWorld, distance: f32) -> bool {
        let shape = self.shape();
        let trace = world.trace(
            self.location,
            self.location - Vec3::Y * distance,
            shape,
            ContentFlags::MASK_CHARACTER,
        );

        let normal = trace.normal_or_up();
        if !trace.hit_something() || !self.config.is_walkable(normal.y) {
            self.floor = None;
            return false;
        }

        self.location = trace.end_position;
        self.floor = Some(FloorHit {
            impact_point: trace
                .hit_point
                .unwrap_or(self.location - Vec3::Y * shape.half_height()),
            normal,
        });
        true
    }

    /// Collision shape at the current size.
    pub fn shape(&self) -> TraceShape {
        TraceShape::Capsule {
            radius: self.radius,
            half_height: self.half_height,
        }
    }

    #[inline]
    pub fn mode(&self) -> MovementMode {
        self.mode
    }

    #[inline]
    pub fn floor(&self) -> Option<FloorHit> {
        self.floor
    }

    #[inline]
    pub fn config(&self) -> &BodyConfig {
        &self.config
    }

    #[inline]
    pub fn max_walk_speed(&self) -> f32 {
        self.max_walk_speed
    }

    #[inline]
    pub fn braking_deceleration(&self) -> f32 {
        self.braking_deceleration
    }

    #[inline]
    pub fn ground_friction(&self) -> f32 {
        self.ground_friction
    }

    /// Horizontal speed.
    pub fn ground_speed(&self) -> f32 {
        self.velocity.with_y(0.0).length()
    }
}

impl PhysicsBody for CharacterBody {
    fn location(&self) -> Vec3 {
        self.location
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    fn add_force(&mut self, force: Vec3) {
        self.pending_force += force;
    }

    fn is_grounded(&self) -> bool {
        self.mode == MovementMode::Walking
    }

    fn last_input_vector(&self) -> Vec3 {
        self.last_input
    }

    fn add_movement_input(&mut self, direction: Vec3, scale: f32) {
        self.pending_input += direction * scale;
    }

    fn jump(&mut self) {
        if self.mode != MovementMode::Walking {
            return;
        }
        self.velocity.y = self.jump_velocity;
        self.mode = MovementMode::Falling;
        self.floor = None;
        log::debug!("jump at {:?}", self.location);
    }

    fn capsule_radius(&self) -> f32 {
        self.radius
    }

    /// A capsule is never shorter than a sphere of its radius.
    fn capsule_half_height(&self) -> f32 {
        self.shape().half_height()
    }

    fn set_capsule_half_height(&mut self, half_height: f32) {
        let before = self.capsule_half_height();
        self.half_height = half_height;
        // Keep the feet planted while walking
        if self.mode == MovementMode::Walking {
            self.location.y += self.capsule_half_height() - before;
        }
    }

    fn set_max_walk_speed(&mut self, speed: f32) {
        self.max_walk_speed = speed;
    }

    fn set_braking_deceleration(&mut self, deceleration: f32) {
        self.braking_deceleration = deceleration;
    }

    fn set_ground_friction(&mut self, friction: f32) {
        self.ground_friction = friction;
    }

    fn set_max_acceleration(&mut self, acceleration: f32) {
        self.max_acceleration = acceleration;
    }

    fn set_jump_velocity(&mut self, velocity: f32) {
        self.jump_velocity = velocity;
    }
}

#[cfg(test)]
mod tests {
    use glam::Quat;
    use stride_locomotion::movement::slide_force;

    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn floor_world() -> CollisionWorld {
        let mut world = CollisionWorld::new();
        world.add_box(
            Vec3::new(0.0, -10.0, 0.0),
            Vec3::new(1000.0, 10.0, 1000.0),
            ContentFlags::SOLID,
        );
        world
    }

    fn walking_body(world: &CollisionWorld) -> CharacterBody {
        let mut body = CharacterBody::new(BodyConfig::default(), Vec3::ZERO);
        body.set_max_walk_speed(400.0);
        body.set_max_acceleration(1024.0);
        body.set_ground_friction(4.0);
        body.set_braking_deceleration(256.0);
        body.set_jump_velocity(300.0);
        body.spawn_at(Vec3::new(0.0, 150.0, 0.0), world);
        body
    }

    #[test]
    fn test_spawn_lands_on_floor() {
        let world = floor_world();
        let body = walking_body(&world);

        assert!(body.is_grounded());
        assert!(body.feet_height().abs() < 0.5, "feet at {}", body.feet_height());
        assert!(body.floor().is_some());
    }

    #[test]
    fn test_spawn_over_void_falls() {
        let world = CollisionWorld::new();
        let mut body = CharacterBody::new(BodyConfig::default(), Vec3::ZERO);
        body.spawn_at(Vec3::new(0.0, 150.0, 0.0), &world);
        assert_eq!(body.mode(), MovementMode::Falling);
    }

    #[test]
    fn test_accelerates_to_max_walk_speed() {
        let world = floor_world();
        let mut body = walking_body(&world);

        for _ in 0..120 {
            body.add_movement_input(Vec3::X, 1.0);
            body.update(DT, &world);
        }

        let speed = body.ground_speed();
        assert!(speed > 390.0 && speed <= 400.01, "speed {speed}");
        assert!(body.location().x > 300.0);
        assert!(body.is_grounded());
        assert_eq!(body.last_input_vector(), Vec3::X);
    }

    #[test]
    fn test_input_is_clamped_to_unit_length() {
        let world = floor_world();
        let mut body = walking_body(&world);

        body.add_movement_input(Vec3::X, 3.0);
        body.add_movement_input(Vec3::Z, 4.0);
        body.update(DT, &world);

        assert!((body.last_input_vector().length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_braking_stops_body() {
        let world = floor_world();
        let mut body = walking_body(&world);
        body.set_velocity(Vec3::new(400.0, 0.0, 0.0));

        for _ in 0..90 {
            body.update(DT, &world);
        }
        assert_eq!(body.velocity(), Vec3::ZERO);
    }

    #[test]
    fn test_low_friction_brakes_slower() {
        let world = floor_world();
        let mut grippy = walking_body(&world);
        let mut slick = walking_body(&world);
        slick.set_ground_friction(0.5);
        slick.set_braking_deceleration(128.0);

        for body in [&mut grippy, &mut slick] {
            body.set_velocity(Vec3::new(600.0, 0.0, 0.0));
            for _ in 0..10 {
                body.update(DT, &world);
            }
        }
        assert!(slick.ground_speed() > grippy.ground_speed());
    }

    #[test]
    fn test_jump_and_land() {
        let world = floor_world();
        let mut body = walking_body(&world);
        let start_height = body.location().y;

        body.jump();
        assert!(!body.is_grounded());

        for _ in 0..12 {
            body.update(DT, &world);
        }
        assert!(body.location().y > start_height + 20.0);

        for _ in 0..60 {
            body.update(DT, &world);
        }
        assert!(body.is_grounded());
        assert!((body.location().y - start_height).abs() < 0.5);
    }

    #[test]
    fn test_jump_requires_floor() {
        let world = CollisionWorld::new();
        let mut body = CharacterBody::new(BodyConfig::default(), Vec3::new(0.0, 500.0, 0.0));
        body.set_jump_velocity(300.0);
        body.jump();
        assert_eq!(body.velocity(), Vec3::ZERO);
    }

    #[test]
    fn test_walks_off_ledge() {
        let mut world = CollisionWorld::new();
        world.add_box(
            Vec3::new(0.0, -10.0, 0.0),
            Vec3::new(100.0, 10.0, 100.0),
            ContentFlags::SOLID,
        );
        let mut body = walking_body(&world);
        body.set_velocity(Vec3::new(400.0, 0.0, 0.0));

        for _ in 0..30 {
            body.add_movement_input(Vec3::X, 1.0);
            body.update(DT, &world);
        }
        assert_eq!(body.mode(), MovementMode::Falling);
        assert!(body.velocity().y < 0.0);
    }

    #[test]
    fn test_resize_keeps_feet_planted() {
        let world = floor_world();
        let mut body = walking_body(&world);
        let feet = body.feet_height();

        body.set_capsule_half_height(40.0);
        assert_eq!(body.capsule_half_height(), 40.0);
        assert!((body.feet_height() - feet).abs() < 1e-3);

        // Shorter than the radius is still a full sphere
        body.set_capsule_half_height(10.0);
        assert_eq!(body.capsule_half_height(), 34.0);
        assert!((body.feet_height() - feet).abs() < 1e-3);
    }

    #[test]
    fn test_slide_force_pushes_downhill() {
        let mut world = CollisionWorld::new();
        world.add_oriented_box(
            Vec3::new(0.0, -10.0, 0.0),
            Vec3::new(2000.0, 10.0, 2000.0),
            Quat::from_rotation_z(25.0_f32.to_radians()),
            ContentFlags::SOLID,
        );
        let mut body = walking_body(&world);
        body.set_max_walk_speed(800.0);
        body.set_ground_friction(0.5);
        body.set_braking_deceleration(128.0);
        assert!(body.is_grounded());

        for _ in 0..30 {
            let normal = body.floor().map_or(Vec3::Y, |floor| floor.normal);
            body.add_force(slide_force(normal, 1_600_000.0));
            body.update(DT, &world);
        }

        assert!(body.velocity().x < -50.0, "velocity {:?}", body.velocity());
        assert!(body.location().x < 0.0);
        assert!(body.is_grounded());
    }
}
