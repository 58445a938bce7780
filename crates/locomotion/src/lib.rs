//! Stride Locomotion
//!
//! First-person movement modes for a single local player: standing,
//! crouching, running and sliding, with the camera and collision capsule
//! easing between them.
//!
//! # Architecture
//!
//! - **Movement**: the state machine, slide force, capsule height control and
//!   the anticipatory crouch resolver
//! - **Character**: the per-frame driver gluing movement, camera, timelines
//!   and timers together
//! - **Physics**: the traits a physics engine implements so the character can
//!   query geometry and steer a body
//!
//! The crate does no collision or integration of its own. Everything it
//! learns about the world comes through [`GeometryProbe`] and [`FloorQuery`],
//! and everything it changes goes through [`PhysicsBody`].

pub mod camera;
pub mod character;
pub mod config;
pub mod interp;
pub mod movement;
pub mod physics;
pub mod timeline;
pub mod timer;

#[cfg(test)]
mod testing;

pub use camera::CameraRig;
pub use character::{Character, CharacterEvent};
pub use config::{ConfigError, LocomotionConfig, MovementParameters};
pub use movement::{CrouchTarget, Intent, MovementState, Transition};
pub use physics::{Capsule, FloorHit, FloorQuery, GeometryProbe, PhysicsBody, SweepHit};
pub use timeline::{Curve, CurveKey, KeyedCurve, Timeline};
pub use timer::{TimerHandle, TimerManager};
