//! Scripted collaborators for unit tests.

use std::cell::RefCell;
use std::ops::Range;

use glam::Vec3;

use crate::physics::{Capsule, FloorHit, FloorQuery, GeometryProbe, PhysicsBody, SweepHit};

/// A sphere sweep as issued by the code under test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepRecord {
    pub radius: f32,
    pub from: Vec3,
    pub to: Vec3,
}

/// Horizontal ceiling slab, unbounded along Z and bounded along X.
#[derive(Debug, Clone, PartialEq)]
pub struct Ceiling {
    pub height: f32,
    pub x_range: Range<f32>,
    pub normal: Vec3,
}

impl Ceiling {
    pub fn region(height: f32, x_range: Range<f32>) -> Self {
        Self {
            height,
            x_range,
            normal: Vec3::NEG_Y,
        }
    }

    pub fn everywhere(height: f32) -> Self {
        Self::region(height, f32::NEG_INFINITY..f32::INFINITY)
    }

    pub fn with_normal(mut self, normal: Vec3) -> Self {
        self.normal = normal;
        self
    }
}

/// World made of ceiling slabs over an infinite floor at `y = 0`.
///
/// Sweeps are treated as vertical columns at the start point's X. A sweep
/// hits a slab when the sphere's top reaches it anywhere along the column,
/// including at the start. The impact point sits on the slab.
#[derive(Debug)]
pub struct MockWorld {
    ceilings: Vec<Ceiling>,
    floor_normal: Option<Vec3>,
    sweeps: RefCell<Vec<SweepRecord>>,
}

impl Default for MockWorld {
    fn default() -> Self {
        Self {
            ceilings: Vec::new(),
            floor_normal: Some(Vec3::Y),
            sweeps: RefCell::new(Vec::new()),
        }
    }
}

impl MockWorld {
    pub fn with_ceiling(height: f32) -> Self {
        Self::default().with(Ceiling::everywhere(height))
    }

    pub fn with(mut self, ceiling: Ceiling) -> Self {
        self.ceilings.push(ceiling);
        self
    }

    pub fn with_floor_normal(mut self, normal: Vec3) -> Self {
        self.floor_normal = Some(normal);
        self
    }

    pub fn without_floor(mut self) -> Self {
        self.floor_normal = None;
        self
    }

    /// Sweeps issued so far, in call order.
    pub fn sweeps(&self) -> Vec<SweepRecord> {
        self.sweeps.borrow().clone()
    }

    pub fn clear_sweeps(&self) {
        self.sweeps.borrow_mut().clear();
    }
}

impl GeometryProbe for MockWorld {
    fn sweep_sphere(&self, radius: f32, from: Vec3, to: Vec3) -> Option<SweepHit> {
        self.sweeps.borrow_mut().push(SweepRecord { radius, from, to });

        let top = from.y.max(to.y) + radius;
        self.ceilings
            .iter()
            .filter(|ceiling| ceiling.x_range.contains(&from.x) && top >= ceiling.height)
            .min_by(|a, b| a.height.total_cmp(&b.height))
            .map(|ceiling| SweepHit {
                impact_point: Vec3::new(from.x, ceiling.height, from.z),
                impact_normal: ceiling.normal,
            })
    }
}

impl FloorQuery for MockWorld {
    fn find_floor(&self, location: Vec3, capsule: Capsule) -> Option<FloorHit> {
        self.floor_normal.map(|normal| FloorHit {
            impact_point: Vec3::new(location.x, location.y - capsule.half_height, location.z),
            normal,
        })
    }
}

/// Movement component that records what it is told and never integrates.
#[derive(Debug, Clone)]
pub struct MockBody {
    pub location: Vec3,
    pub velocity: Vec3,
    pub grounded: bool,
    pub last_input: Vec3,
    pub pending_input: Vec3,
    pub radius: f32,
    pub half_height: f32,
    pub max_walk_speed: f32,
    pub braking_deceleration: f32,
    pub ground_friction: f32,
    pub max_acceleration: f32,
    pub jump_velocity: f32,
    pub forces: Vec<Vec3>,
    pub jumps: u32,
}

impl MockBody {
    /// Standing body with its capsule center at `location`.
    pub fn grounded_at(location: Vec3) -> Self {
        Self {
            location,
            velocity: Vec3::ZERO,
            grounded: true,
            last_input: Vec3::ZERO,
            pending_input: Vec3::ZERO,
            radius: 34.0,
            half_height: 100.0,
            max_walk_speed: 0.0,
            braking_deceleration: 0.0,
            ground_friction: 0.0,
            max_acceleration: 0.0,
            jump_velocity: 0.0,
            forces: Vec::new(),
            jumps: 0,
        }
    }
}

impl PhysicsBody for MockBody {
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
        self.forces.push(force);
    }

    fn is_grounded(&self) -> bool {
        self.grounded
    }

    fn last_input_vector(&self) -> Vec3 {
        self.last_input
    }

    fn add_movement_input(&mut self, direction: Vec3, scale: f32) {
        self.pending_input += direction * scale;
    }

    fn jump(&mut self) {
        self.jumps += 1;
    }

    fn capsule_radius(&self) -> f32 {
        self.radius
    }

    fn capsule_half_height(&self) -> f32 {
        self.half_height
    }

    fn set_capsule_half_height(&mut self, half_height: f32) {
        // Feet stay on the floor while grounded
        if self.grounded {
            self.location.y += half_height - self.half_height;
        }
        self.half_height = half_height;
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
