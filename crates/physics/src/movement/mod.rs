//! Character body movement.
//!
//! [`CharacterBody`] walks and falls through the [`CollisionWorld`] using
//! capsule traces:
//!
//! - Ground movement with friction, braking and acceleration
//! - Gravity and limited air control
//! - Multi-plane collision sliding
//! - Stair stepping
//!
//! Speed limits, friction and jump strength are written by the locomotion
//! layer through [`PhysicsBody`](stride_locomotion::physics::PhysicsBody).
//!
//! [`CollisionWorld`]: crate::collision::CollisionWorld

mod body;
mod config;
mod slide_move;

pub use body::{CharacterBody, MovementMode};
pub use config::BodyConfig;
pub use slide_move::{clip_velocity, slide_move, step_slide_move, SlideMoveResult};
