//! Trace results and shapes for collision queries.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::flags::ContentFlags;

/// Result of sweeping a shape through the world.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceResult {
    /// How far along the path the shape got before touching something.
    ///
    /// `1.0` means the full distance was clear, `0.0` that the shape was
    /// already blocked at the start.
    pub fraction: f32,

    /// Shape center at `fraction` along the path.
    pub end_position: Vec3,

    /// Contact point on the blocking surface.
    pub hit_point: Option<Vec3>,

    /// Surface normal at the contact, pointing out of the blocking brush.
    pub hit_normal: Option<Vec3>,

    /// Contents of the blocking brush.
    pub hit_contents: ContentFlags,

    /// The shape overlapped geometry at the start of the trace.
    pub started_in_solid: bool,

    /// The shape could not move at all.
    pub all_solid: bool,
}

impl Default for TraceResult {
    fn default() -> Self {
        Self::no_hit(Vec3::ZERO)
    }
}

impl TraceResult {
    pub fn no_hit(end_position: Vec3) -> Self {
        Self {
            fraction: 1.0,
            end_position,
            hit_point: None,
            hit_normal: None,
            hit_contents: ContentFlags::EMPTY,
            started_in_solid: false,
            all_solid: false,
        }
    }

    #[inline]
    pub fn hit_something(&self) -> bool {
        self.fraction < 1.0
    }

    /// Hit normal, defaulting to up if none.
    #[inline]
    pub fn normal_or_up(&self) -> Vec3 {
        self.hit_normal.unwrap_or(Vec3::Y)
    }
}

/// Shape swept by a trace. Positions passed alongside it are shape centers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TraceShape {
    /// Vertical capsule. `half_height` runs from the center to either tip.
    Capsule { radius: f32, half_height: f32 },

    /// Sphere probe.
    Sphere { radius: f32 },
}

impl TraceShape {
    pub fn radius(&self) -> f32 {
        match self {
            Self::Capsule { radius, .. } | Self::Sphere { radius } => *radius,
        }
    }

    /// Distance from the center to the lowest point of the shape.
    pub fn half_height(&self) -> f32 {
        match self {
            Self::Capsule {
                radius,
                half_height,
            } => half_height.max(*radius),
            Self::Sphere { radius } => *radius,
        }
    }

    /// Local-space bounding box.
    pub fn bounding_box(&self) -> (Vec3, Vec3) {
        let extent = Vec3::new(self.radius(), self.half_height(), self.radius());
        (-extent, extent)
    }
}
