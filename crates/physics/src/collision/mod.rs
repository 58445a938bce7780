//! Collision detection against static level geometry.
//!
//! - [`CollisionWorld`]: box brushes plus the trace, overlap and floor queries
//! - [`TraceResult`]: output of a sweep
//! - [`TraceShape`]: capsule or sphere being swept
//!
//! The world implements the locomotion probe traits, so the character can
//! query it directly.

mod flags;
mod trace;
mod world;

pub use flags::ContentFlags;
pub use trace::{TraceResult, TraceShape};
pub use world::{
    CollisionBrush, CollisionWorld, Overlap, FLOOR_PROBE_DISTANCE, PENETRATION_TOLERANCE,
    SKIN_WIDTH,
};
