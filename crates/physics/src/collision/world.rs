//! Collision world containing the static level geometry.
//!
//! All queries treat positions as shape centers. A shape counts as blocked
//! only when it penetrates a brush deeper than [`PENETRATION_TOLERANCE`], so a
//! capsule resting on a floor can still slide along it.

use glam::{Quat, Vec3};
use parry3d::math::{Isometry, Point, Real, Vector};
use parry3d::query::PointQuery;
use parry3d::shape::SharedShape;
use stride_locomotion::physics::{Capsule, FloorHit, FloorQuery, GeometryProbe, SweepHit};

use super::flags::ContentFlags;
use super::trace::{TraceResult, TraceShape};

/// Penetration depth below which shapes are considered merely touching.
pub const PENETRATION_TOLERANCE: f32 = 0.01;

/// Distance a trace backs off from the surface it hit.
pub const SKIN_WIDTH: f32 = 0.05;

/// How far below the capsule the floor query looks.
pub const FLOOR_PROBE_DISTANCE: f32 = 4.0;

/// Binary search refinement steps once a blocked sample is found.
const REFINE_ITERATIONS: usize = 12;

/// A piece of collision geometry in the world.
#[derive(Debug, Clone)]
pub struct CollisionBrush {
    pub id: u32,
    pub shape: SharedShape,
    /// Position and orientation in world space.
    pub transform: Isometry<Real>,
    pub contents: ContentFlags,
}

/// Deepest contact between a query shape and the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overlap {
    /// Point on the brush surface.
    pub point: Vec3,
    /// Brush surface normal, pointing toward the query shape.
    pub normal: Vec3,
    pub depth: f32,
    pub contents: ContentFlags,
}

/// Static level geometry.
#[derive(Debug, Default)]
pub struct CollisionWorld {
    brushes: Vec<CollisionBrush>,
    next_id: u32,
}

impl CollisionWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an axis-aligned box.
    pub fn add_box(&mut self, center: Vec3, half_extents: Vec3, contents: ContentFlags) -> u32 {
        self.add_oriented_box(center, half_extents, Quat::IDENTITY, contents)
    }

    /// Add a rotated box, e.g. a ramp.
    pub fn add_oriented_box(
        &mut self,
        center: Vec3,
        half_extents: Vec3,
        rotation: Quat,
        contents: ContentFlags,
    ) -> u32 {
        let id = self.next_id;
        self.next_id += 1;

        let (axis, angle) = rotation.to_axis_angle();
        let scaled_axis = axis * angle;
        let transform = Isometry::new(
            Vector::new(center.x, center.y, center.z),
            Vector::new(scaled_axis.x, scaled_axis.y, scaled_axis.z),
        );

        self.brushes.push(CollisionBrush {
            id,
            shape: SharedShape::cuboid(half_extents.x, half_extents.y, half_extents.z),
            transform,
            contents,
        });

        id
    }

    pub fn clear(&mut self) {
        self.brushes.clear();
    }

    pub fn brush_count(&self) -> usize {
        self.brushes.len()
    }

    pub fn brushes(&self) -> &[CollisionBrush] {
        &self.brushes
    }

    /// Deepest penetration of `shape` at `position`, if any.
    ///
    /// Depth is measured from the closest point of the shape's core segment,
    /// so it stays correct however far the shape has sunk into a brush.
    pub fn overlap(&self, position: Vec3, shape: TraceShape, mask: ContentFlags) -> Option<Overlap> {
        let radius = shape.radius();
        let core = Vec3::Y * (shape.half_height() - radius).max(0.0);
        let (bottom, top) = (position - core, position + core);

        let mut deepest: Option<Overlap> = None;
        for brush in &self.brushes {
            if !mask.intersects(brush.contents) {
                continue;
            }

            let closest = closest_on_segment(brush, bottom, top);
            let depth = radius - closest.distance;
            if depth <= PENETRATION_TOLERANCE {
                continue;
            }
            if deepest.map_or(true, |current| depth > current.depth) {
                deepest = Some(Overlap {
                    point: closest.surface,
                    normal: closest.normal,
                    depth,
                    contents: brush.contents,
                });
            }
        }

        deepest
    }

    /// Whether `shape` at `position` penetrates solid geometry.
    pub fn point_in_solid(&self, position: Vec3, shape: TraceShape, mask: ContentFlags) -> bool {
        self.overlap(position, shape, mask).is_some()
    }

    /// Push `shape` out of any geometry it penetrates.
    pub fn resolve_penetration(&self, position: Vec3, shape: TraceShape, mask: ContentFlags) -> Vec3 {
        let mut resolved = position;
        for _ in 0..4 {
            match self.overlap(resolved, shape, mask) {
                Some(overlap) => resolved += overlap.normal * (overlap.depth + SKIN_WIDTH),
                None => break,
            }
        }
        resolved
    }

    /// Sweep `shape` from `start` to `end`.
    ///
    /// The path is sampled at half the shape radius so thin brushes are not
    /// stepped over, then the first blocked sample is refined by bisection.
    pub fn trace(&self, start: Vec3, end: Vec3, shape: TraceShape, mask: ContentFlags) -> TraceResult {
        if let Some(overlap) = self.overlap(start, shape, mask) {
            return TraceResult {
                fraction: 0.0,
                end_position: start,
                hit_point: Some(overlap.point),
                hit_normal: Some(overlap.normal),
                hit_contents: overlap.contents,
                started_in_solid: true,
                all_solid: true,
            };
        }

        let delta = end - start;
        let distance = delta.length();
        if distance < 1.0e-4 {
            return TraceResult::no_hit(start);
        }

        let step = (shape.radius() * 0.5).max(0.5);
        let samples = (distance / step).ceil().max(1.0) as usize;

        let mut lo = 0.0_f32;
        let mut blocked = None;
        for sample in 1..=samples {
            let t = sample as f32 / samples as f32;
            if self.point_in_solid(start + delta * t, shape, mask) {
                blocked = Some(t);
                break;
            }
            lo = t;
        }

        let Some(mut hi) = blocked else {
            return TraceResult::no_hit(end);
        };

        for _ in 0..REFINE_ITERATIONS {
            let mid = (lo + hi) * 0.5;
            if self.point_in_solid(start + delta * mid, shape, mask) {
                hi = mid;
            } else {
                lo = mid;
            }
        }

        let fraction = (lo - SKIN_WIDTH / distance).max(0.0);
        let contact = self.overlap(start + delta * hi, shape, mask);

        TraceResult {
            fraction,
            end_position: start + delta * fraction,
            hit_point: contact.map(|overlap| overlap.point),
            hit_normal: Some(contact.map_or(-delta / distance, |overlap| overlap.normal)),
            hit_contents: contact.map_or(ContentFlags::SOLID, |overlap| overlap.contents),
            started_in_solid: false,
            all_solid: false,
        }
    }
}

impl GeometryProbe for CollisionWorld {
    fn sweep_sphere(&self, radius: f32, from: Vec3, to: Vec3) -> Option<SweepHit> {
        let trace = self.trace(from, to, TraceShape::Sphere { radius }, ContentFlags::MASK_CHARACTER);
        if !trace.hit_something() {
            return None;
        }

        Some(SweepHit {
            impact_point: trace.hit_point.unwrap_or(trace.end_position),
            impact_normal: trace.normal_or_up(),
        })
    }
}

impl FloorQuery for CollisionWorld {
    fn find_floor(&self, location: Vec3, capsule: Capsule) -> Option<FloorHit> {
        let shape = TraceShape::Capsule {
            radius: capsule.radius,
            half_height: capsule.half_height,
        };
        let end = location - Vec3::Y * FLOOR_PROBE_DISTANCE;
        let trace = self.trace(location, end, shape, ContentFlags::MASK_CHARACTER);
        if !trace.hit_something() {
            return None;
        }

        Some(FloorHit {
            impact_point: trace
                .hit_point
                .unwrap_or(trace.end_position - Vec3::Y * shape.half_height()),
            normal: trace.normal_or_up(),
        })
    }
}

/// Iterations of the ternary search along a capsule core.
const SEGMENT_SEARCH_ITERATIONS: usize = 32;

/// Point of a core segment nearest to (or deepest inside) a brush.
#[derive(Debug, Clone, Copy)]
struct SegmentContact {
    /// Signed distance to the brush surface, negative inside.
    distance: f32,
    surface: Vec3,
    /// Brush outward normal at `surface`.
    normal: Vec3,
}

fn point_contact(brush: &CollisionBrush, point: Vec3) -> SegmentContact {
    let projection = brush.shape.project_point(
        &brush.transform,
        &Point::new(point.x, point.y, point.z),
        false,
    );
    let surface = Vec3::new(projection.point.x, projection.point.y, projection.point.z);
    let offset = point - surface;

    let (distance, normal) = if projection.is_inside {
        (-offset.length(), -offset)
    } else {
        (offset.length(), offset)
    };

    SegmentContact {
        distance,
        surface,
        normal: normal.try_normalize().unwrap_or(Vec3::Y),
    }
}

/// Signed distance to a convex brush is convex along a line, so a ternary
/// search finds the closest point of the segment.
fn closest_on_segment(brush: &CollisionBrush, a: Vec3, b: Vec3) -> SegmentContact {
    if a.distance_squared(b) < 1.0e-8 {
        return point_contact(brush, a);
    }

    let mut lo = 0.0_f32;
    let mut hi = 1.0_f32;
    for _ in 0..SEGMENT_SEARCH_ITERATIONS {
        let m1 = lo + (hi - lo) / 3.0;
        let m2 = hi - (hi - lo) / 3.0;
        let near = point_contact(brush, a.lerp(b, m1));
        let far = point_contact(brush, a.lerp(b, m2));
        if near.distance <= far.distance {
            hi = m2;
        } else {
            lo = m1;
        }
    }

    let mut best = point_contact(brush, a.lerp(b, (lo + hi) * 0.5));
    for end in [a, b] {
        let candidate = point_contact(brush, end);
        if candidate.distance < best.distance {
            best = candidate;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAPSULE: TraceShape = TraceShape::Capsule {
        radius: 34.0,
        half_height: 88.0,
    };

    fn create_test_world() -> CollisionWorld {
        let mut world = CollisionWorld::new();

        // Floor with its top at y = 0
        world.add_box(
            Vec3::new(0.0, -10.0, 0.0),
            Vec3::new(1000.0, 10.0, 1000.0),
            ContentFlags::SOLID,
        );

        // Ceiling slab with its underside at y = 200
        world.add_box(
            Vec3::new(0.0, 210.0, 0.0),
            Vec3::new(100.0, 10.0, 100.0),
            ContentFlags::SOLID,
        );

        // Wall facing -X at x = 400
        world.add_box(
            Vec3::new(410.0, 100.0, 0.0),
            Vec3::new(10.0, 100.0, 500.0),
            ContentFlags::SOLID,
        );

        world
    }

    #[test]
    fn test_sweep_sphere_hits_ceiling() {
        let world = create_test_world();
        let hit = world
            .sweep_sphere(20.0, Vec3::new(0.0, 100.0, 0.0), Vec3::new(0.0, 300.0, 0.0))
            .expect("ceiling should block the sweep");

        assert!((hit.impact_point.y - 200.0).abs() < 0.5, "{hit:?}");
        assert!(hit.impact_normal.dot(Vec3::NEG_Y) > 0.99, "{hit:?}");
    }

    #[test]
    fn test_sweep_sphere_stops_short_of_ceiling() {
        let world = create_test_world();
        let hit = world.sweep_sphere(20.0, Vec3::new(0.0, 100.0, 0.0), Vec3::new(0.0, 170.0, 0.0));
        assert!(hit.is_none());
    }

    #[test]
    fn test_sweep_sphere_starting_inside_reports_hit() {
        let world = create_test_world();
        let hit = world
            .sweep_sphere(20.0, Vec3::new(0.0, 190.0, 0.0), Vec3::new(0.0, 250.0, 0.0))
            .expect("overlapping start should block");

        assert!((hit.impact_point.y - 200.0).abs() < 0.5, "{hit:?}");
        assert!(hit.impact_normal.dot(Vec3::NEG_Y) > 0.99);
    }

    #[test]
    fn test_resting_capsule_is_not_in_solid() {
        let world = create_test_world();
        let resting = Vec3::new(0.0, 88.0, 500.0);
        assert!(!world.point_in_solid(resting, CAPSULE, ContentFlags::MASK_CHARACTER));

        let sunk = Vec3::new(0.0, 80.0, 500.0);
        assert!(world.point_in_solid(sunk, CAPSULE, ContentFlags::MASK_CHARACTER));
    }

    #[test]
    fn test_deep_penetration_is_detected() {
        let world = create_test_world();
        // Core bottom 4 below the floor top, well past a shallow contact
        let overlap = world
            .overlap(Vec3::new(0.0, 50.0, 500.0), CAPSULE, ContentFlags::MASK_CHARACTER)
            .expect("sunk capsule overlaps the floor");
        assert!((overlap.depth - 38.0).abs() < 0.1, "{overlap:?}");
        assert!(overlap.normal.dot(Vec3::Y) > 0.999);
        assert!(overlap.point.y.abs() < 0.1);

        // Core entirely inside the floor slab
        let buried = Vec3::new(0.0, -10.0, 500.0);
        let sphere = TraceShape::Sphere { radius: 5.0 };
        assert!(world.point_in_solid(buried, sphere, ContentFlags::MASK_CHARACTER));
    }

    #[test]
    fn test_long_drop_lands_on_floor() {
        let world = create_test_world();
        let result = world.trace(
            Vec3::new(0.0, 150.0, 500.0),
            Vec3::new(0.0, -850.0, 500.0),
            CAPSULE,
            ContentFlags::MASK_CHARACTER,
        );

        assert!(result.hit_something());
        assert!((result.end_position.y - 88.0).abs() < 0.5, "{result:?}");
        assert!(result.normal_or_up().dot(Vec3::Y) > 0.999);
    }

    #[test]
    fn test_trace_capsule_stops_at_wall() {
        let world = create_test_world();
        let start = Vec3::new(200.0, 90.0, 300.0);
        let result = world.trace(
            start,
            Vec3::new(600.0, 90.0, 300.0),
            CAPSULE,
            ContentFlags::MASK_CHARACTER,
        );

        assert!(result.hit_something());
        assert!(!result.started_in_solid);
        assert!(result.end_position.x < 400.0 - 34.0 + 0.1);
        assert!(result.end_position.x > 400.0 - 34.0 - 1.0);
        assert!(result.normal_or_up().dot(Vec3::NEG_X) > 0.99);
    }

    #[test]
    fn test_find_floor_flat() {
        let world = create_test_world();
        let capsule = Capsule {
            radius: 34.0,
            half_height: 88.0,
        };

        let floor = world
            .find_floor(Vec3::new(0.0, 89.0, 500.0), capsule)
            .expect("floor right below");
        assert!(floor.normal.dot(Vec3::Y) > 0.999);
        assert!(floor.impact_point.y.abs() < 0.5);

        assert!(world.find_floor(Vec3::new(0.0, 150.0, 500.0), capsule).is_none());
    }

    #[test]
    fn test_find_floor_on_ramp() {
        let mut world = CollisionWorld::new();
        let angle = 20.0_f32.to_radians();
        world.add_oriented_box(
            Vec3::new(0.0, -10.0, 0.0),
            Vec3::new(500.0, 10.0, 500.0),
            Quat::from_rotation_z(angle),
            ContentFlags::SOLID,
        );

        let capsule = Capsule {
            radius: 34.0,
            half_height: 88.0,
        };
        // Surface height at x = 0 is 0; the lowest point of a capsule resting
        // on the slope touches at a slightly offset spot
        let rest_height = 88.0 - 34.0 + 34.0 / angle.cos() + 1.0;
        let floor = world
            .find_floor(Vec3::new(0.0, rest_height, 0.0), capsule)
            .expect("ramp below");

        assert!((floor.normal.y - angle.cos()).abs() < 1e-2, "{floor:?}");
        assert!(floor.normal.x < 0.0);
    }

    #[test]
    fn test_resolve_penetration() {
        let world = create_test_world();
        let sunk = Vec3::new(0.0, 70.0, 500.0);
        let resolved = world.resolve_penetration(sunk, CAPSULE, ContentFlags::MASK_CHARACTER);

        assert!(resolved.y >= 88.0);
        assert!(!world.point_in_solid(resolved, CAPSULE, ContentFlags::MASK_CHARACTER));
    }

    #[test]
    fn test_content_mask_filtering() {
        let mut world = CollisionWorld::new();
        world.add_box(
            Vec3::new(0.0, 150.0, 0.0),
            Vec3::new(100.0, 10.0, 100.0),
            ContentFlags::TRIGGER,
        );
        world.add_box(
            Vec3::new(0.0, 250.0, 0.0),
            Vec3::new(100.0, 10.0, 100.0),
            ContentFlags::SOLID,
        );
        assert_eq!(world.brush_count(), 2);

        let hit = world
            .sweep_sphere(5.0, Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.0, 400.0, 0.0))
            .expect("solid slab blocks");
        assert!((hit.impact_point.y - 240.0).abs() < 0.5);
    }
}
