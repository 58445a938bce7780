//! Movement modes and the geometry that goes with them.

mod anticipate;
mod capsule;
mod slide;
mod state;

pub use anticipate::{resolve_crouch_target, CrouchTarget};
pub use capsule::{can_uncrouch, CapsuleHeightState};
pub use slide::{floor_slide_force, slide_force};
pub use state::{Action, Intent, MovementState, Transition, TransitionInputs};
