//! Stride game layer
//!
//! Headless harness around the locomotion core:
//!
//! - Level geometry and spawn points
//! - Player input and button edge detection
//! - Players pairing a locomotion character with a physics body
//! - The fixed-step simulation loop
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        Simulation tick                        │
//! │  ┌─────────┐    ┌────────────────┐    ┌───────────────────┐  │
//! │  │ Input   │───►│ Character      │───►│ CharacterBody     │  │
//! │  │ events  │    │ (states, FOV,  │    │ (walk/fall against│  │
//! │  └─────────┘    │ capsule, eye)  │    │ CollisionWorld)   │  │
//! │                 └────────────────┘    └───────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod input;
pub mod level;
pub mod player;
pub mod simulation;

pub use input::{ActionInput, InputEvent, InputTracker, MovementInput, PlayerInput};
pub use level::{Level, SpawnPoint};
pub use player::{EntityId, Player};
pub use simulation::{Simulation, SimulationConfig};

// Re-export the crates a caller needs to configure a simulation
pub use stride_locomotion::{ConfigError, LocomotionConfig, MovementState};
pub use stride_physics::{BodyConfig, CollisionWorld, ContentFlags};
