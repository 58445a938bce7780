//! Stride physics
//!
//! Capsule collision and character movement backing the locomotion core.
//!
//! # Architecture
//!
//! - **Collision**: static brushes, shape traces and overlap queries built on
//!   parry3d. [`CollisionWorld`] answers the locomotion core's sphere sweeps
//!   and floor lookups.
//! - **Movement**: [`CharacterBody`] integrates walking and falling against
//!   the collision world and is the body the locomotion core steers.
//!
//! Positions are capsule centers throughout. Units are centimetres, with Y up.

pub mod collision;
pub mod movement;

pub use collision::{CollisionWorld, ContentFlags, TraceResult, TraceShape};
pub use movement::{BodyConfig, CharacterBody, MovementMode};
