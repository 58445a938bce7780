//! Player input handling.
//!
//! Raw per-frame input carries held keys and mouse motion. The locomotion
//! character wants press and release events instead, so an [`InputTracker`]
//! compares each frame's buttons with the previous frame's.

use serde::{Deserialize, Serialize};

/// Degrees of rotation per mouse pixel at sensitivity 1.
const DEGREES_PER_PIXEL: f32 = 0.022;

/// Raw player input for a single frame.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerInput {
    /// Movement keys pressed.
    pub movement: MovementInput,

    /// Mouse delta this frame (pixels). Positive Y is down.
    pub mouse_delta: (f32, f32),

    /// Action buttons held.
    pub actions: ActionInput,

    /// Frame number this input was generated.
    pub frame: u32,
}

/// Movement key states.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct MovementInput {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

/// Action button states.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionInput {
    pub fire: bool,
    pub jump: bool,
    /// Held crouch.
    pub crouch: bool,
    /// Crouch toggle, flips on each press.
    pub crouch_toggle: bool,
    pub run: bool,
}

/// Discrete action produced by a button edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    CrouchPressed,
    CrouchReleased,
    ToggleCrouch,
    RunPressed,
    RunReleased,
    Jump,
    Fire,
}

impl PlayerInput {
    /// Forward and strafe axes, each in `-1..=1`.
    ///
    /// Diagonals are not normalized here; the body clamps its input length.
    pub fn axes(&self) -> (f32, f32) {
        let axis = |positive: bool, negative: bool| match (positive, negative) {
            (true, false) => 1.0,
            (false, true) => -1.0,
            _ => 0.0,
        };
        (
            axis(self.movement.forward, self.movement.backward),
            axis(self.movement.right, self.movement.left),
        )
    }

    /// Pitch and yaw deltas (degrees) for the mouse motion this frame.
    ///
    /// Pitch comes out positive for downward motion; the character's invert
    /// factor turns that into looking down.
    pub fn look(&self, mouse_sensitivity: f32) -> (f32, f32) {
        let scale = mouse_sensitivity * DEGREES_PER_PIXEL;
        (self.mouse_delta.1 * scale, self.mouse_delta.0 * scale)
    }

    /// Check if any movement input is active.
    pub fn has_movement(&self) -> bool {
        self.movement.forward || self.movement.backward || self.movement.left || self.movement.right
    }
}

/// Turns held buttons into press/release events.
#[derive(Debug, Clone, Default)]
pub struct InputTracker {
    previous: ActionInput,
}

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events for the buttons that changed since the last call.
    pub fn update(&mut self, actions: ActionInput) -> Vec<InputEvent> {
        let previous = std::mem::replace(&mut self.previous, actions);
        let mut events = Vec::new();

        match (previous.crouch, actions.crouch) {
            (false, true) => events.push(InputEvent::CrouchPressed),
            (true, false) => events.push(InputEvent::CrouchReleased),
            _ => {}
        }
        if actions.crouch_toggle && !previous.crouch_toggle {
            events.push(InputEvent::ToggleCrouch);
        }
        match (previous.run, actions.run) {
            (false, true) => events.push(InputEvent::RunPressed),
            (true, false) => events.push(InputEvent::RunReleased),
            _ => {}
        }
        if actions.jump && !previous.jump {
            events.push(InputEvent::Jump);
        }
        if actions.fire && !previous.fire {
            events.push(InputEvent::Fire);
        }

        events
    }

    /// Forget held buttons, e.g. after a respawn.
    pub fn reset(&mut self) {
        self.previous = ActionInput::default();
    }
}
