//! Per-frame locomotion driver.
//!
//! [`Character`] owns everything a single first-person player needs between
//! frames: the movement state, held intents, camera, capsule bookkeeping,
//! the two crouch timelines and the slide timeout. The physics body and the
//! world are borrowed for the duration of each call.
//!
//! # Frame order
//!
//! 1. Slide upkeep and state transitions
//! 2. Field of view easing
//! 3. While crouching or sliding: anticipatory crouch target, then capsule approach
//! 4. Eye-height and half-height timelines
//! 5. Deferred timers

use serde::{Deserialize, Serialize};

use crate::camera::CameraRig;
use crate::config::LocomotionConfig;
use crate::interp::lerp;
use crate::movement::{
    can_uncrouch, floor_slide_force, resolve_crouch_target, Action, CapsuleHeightState, Intent,
    MovementState, Transition, TransitionInputs,
};
use crate::physics::{FloorQuery, GeometryProbe, PhysicsBody};
use crate::timeline::{KeyedCurve, Timeline};
use crate::timer::{TimerHandle, TimerManager};

/// Events scheduled on the character's timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterEvent {
    SlideTimeout,
}

/// A first-person character's locomotion state.
#[derive(Debug, Clone)]
pub struct Character {
    config: LocomotionConfig,
    state: MovementState,
    intent: Intent,
    camera: CameraRig,
    capsule: CapsuleHeightState,
    eye_timeline: Timeline,
    half_height_timeline: Timeline,
    timers: TimerManager<CharacterEvent>,
    slide_timeout: Option<TimerHandle>,
}

impl Character {
    /// Character with linear crouch curves lasting `crouch_transition_time`.
    pub fn new(config: LocomotionConfig) -> Self {
        let curve = KeyedCurve::linear(config.crouch_transition_time);
        Self::with_curves(config, curve.clone(), curve)
    }

    /// Character with authored eye-height and half-height curves.
    pub fn with_curves(
        config: LocomotionConfig,
        eye_curve: KeyedCurve,
        half_height_curve: KeyedCurve,
    ) -> Self {
        Self {
            camera: CameraRig::new(config.camera_fov, config.base_eye_height),
            capsule: CapsuleHeightState::new(&config),
            eye_timeline: Timeline::new(eye_curve),
            half_height_timeline: Timeline::new(half_height_curve),
            timers: TimerManager::new(),
            slide_timeout: None,
            state: MovementState::Standing,
            intent: Intent::default(),
            config,
        }
    }

    /// Push the initial tuning into the body and reset the camera.
    pub fn begin_play<B: PhysicsBody + ?Sized>(&mut self, body: &mut B) {
        let params = self.config.parameters(MovementState::Standing);
        body.set_max_walk_speed(params.max_speed);
        body.set_braking_deceleration(params.braking_deceleration);
        body.set_ground_friction(params.ground_friction);
        body.set_max_acceleration(self.config.max_acceleration);
        body.set_jump_velocity(self.config.jump_velocity);

        self.capsule.set_half_height(self.config.max_capsule_half_height);
        self.capsule
            .set_target_half_height(self.config.crouching_capsule_half_height);
        self.capsule.apply_to(body);

        self.camera.eye_height = self.config.base_eye_height;
        self.camera.fov = self.config.camera_fov;
        self.camera.target_fov = self.config.camera_fov;

        log::debug!("character ready: {:?}", self.state);
    }

    /// Advance one frame.
    pub fn tick<B, W>(&mut self, delta_time: f32, body: &mut B, world: &W)
    where
        B: PhysicsBody + ?Sized,
        W: GeometryProbe + FloorQuery + ?Sized,
    {
        self.update_state(body, world);

        self.camera
            .update_fov(delta_time, self.config.fov_interp_speed);

        if self.state.is_low() {
            resolve_crouch_target(world, &*body, self.state, &self.config)
                .apply(&mut self.capsule, &self.config);
            self.capsule.approach_target(delta_time);
            self.capsule.apply_to(body);
        }

        self.tick_timelines(delta_time, body);
        self.tick_timers(delta_time, body);
    }

    fn update_state<B, W>(&mut self, body: &mut B, world: &W)
    where
        B: PhysicsBody + ?Sized,
        W: GeometryProbe + FloorQuery + ?Sized,
    {
        let mut slide_stalled = false;
        if self.state == MovementState::Sliding {
            let floor = world.find_floor(body.location(), body.capsule());
            body.add_force(floor_slide_force(floor, self.config.slide_force_multiplier));

            let velocity = body.velocity();
            let speed = velocity.length();
            if speed < self.config.min_slide_speed {
                slide_stalled = true;
            } else if speed > self.config.max_slide_speed {
                body.set_velocity(velocity.normalize_or_zero() * self.config.run_speed);
                log::trace!("slide speed {speed} capped to {}", self.config.run_speed);
            }
        }

        let can_uncrouch = self.state != MovementState::Crouching
            || can_uncrouch(world, body.location(), body.capsule_half_height(), &self.config);

        let inputs = TransitionInputs {
            intent: self.intent,
            grounded: body.is_grounded(),
            can_uncrouch,
            slide_stalled,
        };

        if let Some(transition) = self.state.next_transition(&inputs) {
            self.apply_transition(transition, body);
        }
    }

    fn apply_transition<B: PhysicsBody + ?Sized>(&mut self, transition: Transition, body: &mut B) {
        log::debug!(
            "{:?} -> {:?} via {transition:?}",
            self.state,
            transition.target()
        );

        for &action in transition.actions() {
            self.run_action(action, body);
        }
        self.state = transition.target();
    }

    fn run_action<B: PhysicsBody + ?Sized>(&mut self, action: Action, body: &mut B) {
        let config = &self.config;
        match action {
            Action::BeginCrouch => {
                body.set_max_walk_speed(config.parameters(MovementState::Crouching).max_speed);
                self.eye_timeline.play();
                self.half_height_timeline.play();
            }
            Action::EndCrouch => {
                body.set_max_walk_speed(config.parameters(MovementState::Standing).max_speed);
                self.eye_timeline.reverse();
                self.half_height_timeline.reverse();
            }
            Action::BeginRun => {
                let params = config.parameters(MovementState::Running);
                body.set_max_walk_speed(params.max_speed);
                self.intent.wants_to_crouch = false;
                self.camera.target_fov = params.target_fov;
            }
            Action::EndRun => {
                let params = config.parameters(MovementState::Standing);
                body.set_max_walk_speed(params.max_speed);
                self.camera.target_fov = params.target_fov;
            }
            Action::BeginSlide => {
                let params = config.parameters(MovementState::Sliding);
                let velocity = body.velocity();
                body.set_velocity(velocity);
                body.set_braking_deceleration(params.braking_deceleration);
                body.set_ground_friction(params.ground_friction);

                if let Some(stale) = self.slide_timeout.take() {
                    self.timers.clear_timer(stale);
                }
                self.slide_timeout = Some(
                    self.timers
                        .set_timer(config.max_slide_time, CharacterEvent::SlideTimeout),
                );

                self.eye_timeline.play();
                self.half_height_timeline.play();
            }
            Action::EndSlide => {
                if let Some(handle) = self.slide_timeout.take() {
                    self.timers.clear_timer(handle);
                }
                let params = config.parameters(MovementState::Standing);
                body.set_braking_deceleration(params.braking_deceleration);
                body.set_ground_friction(params.ground_friction);
            }
        }
    }

    fn tick_timelines<B: PhysicsBody + ?Sized>(&mut self, delta_time: f32, body: &mut B) {
        if let Some(progress) = self.eye_timeline.tick(delta_time) {
            self.camera.eye_height = lerp(
                self.config.base_eye_height,
                self.config.crouched_eye_height,
                progress,
            );
        }

        if let Some(progress) = self.half_height_timeline.tick(delta_time) {
            self.capsule.set_half_height(lerp(
                self.config.standing_capsule_half_height,
                self.config.crouching_capsule_half_height,
                progress,
            ));
            self.capsule.apply_to(body);
        }
    }

    fn tick_timers<B: PhysicsBody + ?Sized>(&mut self, delta_time: f32, body: &mut B) {
        for event in self.timers.tick(delta_time) {
            match event {
                CharacterEvent::SlideTimeout => {
                    // The handle went stale when the timer fired
                    self.slide_timeout = None;
                    if self.state == MovementState::Sliding {
                        log::debug!("slide timed out after {}s", self.config.max_slide_time);
                        self.apply_transition(Transition::EndSlide, body);
                    }
                }
            }
        }
    }

    // ========================================================================
    // Input
    // ========================================================================

    /// Forward/backward axis. Backward input is scaled down.
    pub fn move_forward<B: PhysicsBody + ?Sized>(&self, body: &mut B, axis: f32) {
        if axis == 0.0 || self.state == MovementState::Sliding {
            return;
        }
        let mut scale = axis;
        if scale < 0.0 {
            scale *= self.config.parameters(self.state).move_back_multiplier;
        }
        body.add_movement_input(self.camera.forward(), scale);
    }

    /// Strafe axis.
    pub fn move_right<B: PhysicsBody + ?Sized>(&self, body: &mut B, axis: f32) {
        if axis == 0.0 || self.state == MovementState::Sliding {
            return;
        }
        let scale = axis * self.config.parameters(self.state).strafe_multiplier;
        body.add_movement_input(self.camera.right(), scale);
    }

    pub fn look_up(&mut self, axis: f32) {
        self.camera.add_pitch(axis * self.config.invert_camera);
    }

    pub fn turn(&mut self, axis: f32) {
        self.camera.add_yaw(axis);
    }

    pub fn crouch_pressed(&mut self) {
        self.intent.wants_to_crouch = true;
    }

    pub fn crouch_released(&mut self) {
        self.intent.wants_to_crouch = false;
    }

    pub fn toggle_crouch(&mut self) {
        self.intent.wants_to_crouch = !self.intent.wants_to_crouch;
    }

    pub fn run_pressed(&mut self) {
        self.intent.wants_to_run = true;
    }

    pub fn run_released(&mut self) {
        self.intent.wants_to_run = false;
    }

    pub fn jump<B: PhysicsBody + ?Sized>(&self, body: &mut B) {
        body.jump();
    }

    /// Weapons are not part of locomotion.
    pub fn fire(&self) {}

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    pub fn state(&self) -> MovementState {
        self.state
    }

    #[inline]
    pub fn intent(&self) -> Intent {
        self.intent
    }

    #[inline]
    pub fn config(&self) -> &LocomotionConfig {
        &self.config
    }

    #[inline]
    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    #[inline]
    pub fn fov(&self) -> f32 {
        self.camera.fov
    }

    #[inline]
    pub fn eye_height(&self) -> f32 {
        self.camera.eye_height
    }

    #[inline]
    pub fn capsule(&self) -> &CapsuleHeightState {
        &self.capsule
    }

    #[inline]
    pub fn half_height(&self) -> f32 {
        self.capsule.half_height()
    }

    pub fn eye_timeline(&self) -> &Timeline {
        &self.eye_timeline
    }

    pub fn half_height_timeline(&self) -> &Timeline {
        &self.half_height_timeline
    }

    /// Seconds until a running slide is forced to end.
    pub fn slide_time_remaining(&self) -> Option<f32> {
        self.slide_timeout
            .and_then(|handle| self.timers.remaining(handle))
    }
}
