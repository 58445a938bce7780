//! Level geometry and spawn points.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use stride_physics::{CollisionWorld, ContentFlags};

/// Slope of the test arena ramp (degrees).
pub const RAMP_ANGLE: f32 = 20.0;

/// Height of the underside of the test arena crawl space.
pub const CRAWL_SPACE_HEIGHT: f32 = 120.0;

/// A level containing collision geometry and spawn points.
#[derive(Debug)]
pub struct Level {
    /// Level identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Collision world for physics.
    pub collision: CollisionWorld,

    /// Player spawn points.
    pub spawn_points: Vec<SpawnPoint>,
}

/// Where a player enters the level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnPoint {
    pub name: String,

    /// Point above the floor the player is dropped from.
    pub position: Vec3,

    /// Initial yaw (degrees). Zero faces +X.
    pub facing: f32,
}

impl SpawnPoint {
    pub fn new(name: &str, position: Vec3, facing: f32) -> Self {
        Self {
            name: name.to_string(),
            position,
            facing,
        }
    }
}

impl Level {
    /// Create an empty level.
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            collision: CollisionWorld::new(),
            spawn_points: Vec::new(),
        }
    }

    /// Walled arena with three lanes:
    ///
    /// - z = 0: open floor
    /// - z = -1000: a ramp falling toward -X, for slides
    /// - z = +1000: a slab overhead, too low to stand under
    pub fn test_arena() -> Self {
        let mut level = Self::new("test_arena", "Test Arena");
        let collision = &mut level.collision;

        // Floor with its top at y = 0
        collision.add_box(
            Vec3::new(0.0, -10.0, 0.0),
            Vec3::new(3000.0, 10.0, 3000.0),
            ContentFlags::SOLID,
        );

        // Walls
        let wall_height = 400.0;
        let wall_thickness = 20.0;
        let arena_size = 3000.0;
        for (center, half_extents) in [
            (
                Vec3::new(0.0, wall_height / 2.0, -arena_size),
                Vec3::new(arena_size, wall_height / 2.0, wall_thickness),
            ),
            (
                Vec3::new(0.0, wall_height / 2.0, arena_size),
                Vec3::new(arena_size, wall_height / 2.0, wall_thickness),
            ),
            (
                Vec3::new(arena_size, wall_height / 2.0, 0.0),
                Vec3::new(wall_thickness, wall_height / 2.0, arena_size),
            ),
            (
                Vec3::new(-arena_size, wall_height / 2.0, 0.0),
                Vec3::new(wall_thickness, wall_height / 2.0, arena_size),
            ),
        ] {
            collision.add_box(center, half_extents, ContentFlags::SOLID);
        }

        // Ramp rising toward +X, its low edge meeting the floor
        let angle = RAMP_ANGLE.to_radians();
        let rotation = Quat::from_rotation_z(angle);
        let ramp_half = Vec3::new(600.0, 20.0, 300.0);
        let top_center = Vec3::new(1000.0, ramp_half.x * angle.sin(), -1000.0);
        collision.add_oriented_box(
            top_center - rotation * Vec3::new(0.0, ramp_half.y, 0.0),
            ramp_half,
            rotation,
            ContentFlags::SOLID,
        );

        // Crawl space slab
        collision.add_box(
            Vec3::new(0.0, CRAWL_SPACE_HEIGHT + 20.0, 1000.0),
            Vec3::new(300.0, 20.0, 200.0),
            ContentFlags::SOLID,
        );

        // Keeps the camera out of the crawl space roof
        collision.add_box(
            Vec3::new(0.0, CRAWL_SPACE_HEIGHT + 60.0, 1000.0),
            Vec3::new(300.0, 20.0, 200.0),
            ContentFlags::CAMERA_CLIP,
        );

        let ramp_top_x = 1400.0;
        let ramp_top_y = top_center.y + (ramp_top_x - top_center.x) * angle.tan();
        level.spawn_points = vec![
            SpawnPoint::new("open", Vec3::new(0.0, 150.0, 0.0), 0.0),
            SpawnPoint::new(
                "ramp",
                Vec3::new(ramp_top_x, ramp_top_y + 150.0, -1000.0),
                180.0,
            ),
            SpawnPoint::new("crawl", Vec3::new(-600.0, 150.0, 1000.0), 0.0),
        ];

        level
    }

    /// Spawn point by index, wrapping around.
    pub fn get_player_spawn(&self, index: usize) -> Option<&SpawnPoint> {
        if self.spawn_points.is_empty() {
            return None;
        }
        self.spawn_points.get(index % self.spawn_points.len())
    }

    /// Spawn point by name.
    pub fn find_spawn(&self, name: &str) -> Option<&SpawnPoint> {
        self.spawn_points.iter().find(|spawn| spawn.name == name)
    }

    pub fn player_spawn_count(&self) -> usize {
        self.spawn_points.len()
    }
}
