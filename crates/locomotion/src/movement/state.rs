//! Movement states and the transition table between them.
//!
//! Each state has its own handler that looks at the current intents and
//! physical facts and returns the [`Transition`] to take, if any. Handlers
//! are pure: the side effects of a transition are described by its ordered
//! [`Action`] list and carried out by the character.

use serde::{Deserialize, Serialize};

/// The four locomotion modes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementState {
    #[default]
    Standing,
    Crouching,
    Running,
    Sliding,
}

impl MovementState {
    pub const ALL: [MovementState; 4] = [
        MovementState::Standing,
        MovementState::Crouching,
        MovementState::Running,
        MovementState::Sliding,
    ];

    /// Crouching and sliding both use the dynamic crouch capsule.
    #[inline]
    pub fn is_low(self) -> bool {
        matches!(self, MovementState::Crouching | MovementState::Sliding)
    }

    /// Pick the transition for this frame.
    pub fn next_transition(self, inputs: &TransitionInputs) -> Option<Transition> {
        match self {
            MovementState::Sliding => sliding(inputs),
            MovementState::Running => running(inputs),
            MovementState::Crouching => crouching(inputs),
            MovementState::Standing => standing(inputs),
        }
    }
}

/// Held input requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    pub wants_to_run: bool,
    pub wants_to_crouch: bool,
}

/// Everything a state handler may look at.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransitionInputs {
    pub intent: Intent,
    /// Walking on a floor. `false` means airborne.
    pub grounded: bool,
    /// Overhead clearance allows leaving the crouch.
    pub can_uncrouch: bool,
    /// Slide speed dropped below the minimum.
    pub slide_stalled: bool,
}

/// Entry and exit side effects, executed in order by the character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    BeginCrouch,
    EndCrouch,
    BeginRun,
    EndRun,
    BeginSlide,
    EndSlide,
}

/// A state change together with the actions that realise it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    /// Standing -> Crouching.
    Crouch,
    /// Crouching -> Standing.
    Stand,
    /// Standing -> Running.
    Run,
    /// Standing or Crouching -> Running, leaving the crouch first.
    RiseToRun,
    /// Running -> Standing.
    StopRunning,
    /// Running -> Crouching while airborne.
    DropToCrouch,
    /// Running -> Sliding.
    Slide,
    /// Sliding -> Crouching.
    EndSlide,
}

impl Transition {
    pub fn target(self) -> MovementState {
        match self {
            Transition::Crouch | Transition::DropToCrouch | Transition::EndSlide => {
                MovementState::Crouching
            }
            Transition::Stand | Transition::StopRunning => MovementState::Standing,
            Transition::Run | Transition::RiseToRun => MovementState::Running,
            Transition::Slide => MovementState::Sliding,
        }
    }

    pub fn actions(self) -> &'static [Action] {
        match self {
            Transition::Crouch => &[Action::BeginCrouch],
            Transition::Stand => &[Action::EndCrouch],
            Transition::Run => &[Action::BeginRun],
            Transition::RiseToRun => &[Action::EndCrouch, Action::BeginRun],
            Transition::StopRunning => &[Action::EndRun],
            Transition::DropToCrouch => &[Action::EndRun, Action::BeginCrouch],
            Transition::Slide => &[Action::BeginSlide],
            Transition::EndSlide => &[Action::EndSlide, Action::BeginCrouch],
        }
    }
}

fn sliding(inputs: &TransitionInputs) -> Option<Transition> {
    inputs.slide_stalled.then_some(Transition::EndSlide)
}

fn running(inputs: &TransitionInputs) -> Option<Transition> {
    if inputs.intent.wants_to_crouch {
        if inputs.grounded {
            Some(Transition::Slide)
        } else {
            Some(Transition::DropToCrouch)
        }
    } else if !inputs.intent.wants_to_run {
        Some(Transition::StopRunning)
    } else {
        None
    }
}

fn crouching(inputs: &TransitionInputs) -> Option<Transition> {
    if !inputs.can_uncrouch {
        return None;
    }

    if inputs.intent.wants_to_run {
        // Holding run while airborne keeps the crouch rather than standing up
        inputs.grounded.then_some(Transition::RiseToRun)
    } else if !inputs.intent.wants_to_crouch {
        Some(Transition::Stand)
    } else {
        None
    }
}

fn standing(inputs: &TransitionInputs) -> Option<Transition> {
    match (inputs.intent.wants_to_crouch, inputs.intent.wants_to_run) {
        (true, true) => Some(Transition::RiseToRun),
        (true, false) => Some(Transition::Crouch),
        (false, true) => Some(Transition::Run),
        (false, false) => None,
    }
}
