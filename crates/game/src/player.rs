//! Player entity: a locomotion character driving a physics body.

use glam::Vec3;
use stride_locomotion::{Character, LocomotionConfig, MovementState, PhysicsBody};
use stride_physics::{BodyConfig, CharacterBody, CollisionWorld};

use crate::input::{InputEvent, InputTracker, PlayerInput};
use crate::level::SpawnPoint;

/// Unique identifier for entities.
pub type EntityId = u32;

/// A player in the game.
#[derive(Debug, Clone)]
pub struct Player {
    /// Unique player ID.
    pub id: EntityId,

    /// Player name/handle.
    pub name: String,

    character: Character,
    body: CharacterBody,
    input: InputTracker,
}

impl Player {
    /// Create a player standing at `spawn`.
    pub fn new(
        id: EntityId,
        name: String,
        locomotion: &LocomotionConfig,
        body: &BodyConfig,
        spawn: &SpawnPoint,
        world: &CollisionWorld,
    ) -> Self {
        let mut player = Self {
            id,
            name,
            character: Character::new(locomotion.clone()),
            body: CharacterBody::new(body.clone(), spawn.position),
            input: InputTracker::new(),
        };
        player.place(spawn, world);
        player
    }

    /// Start over at `spawn` with fresh locomotion state.
    pub fn respawn(&mut self, spawn: &SpawnPoint, world: &CollisionWorld) {
        self.character = Character::new(self.character.config().clone());
        self.body = CharacterBody::new(self.body.config().clone(), spawn.position);
        self.input.reset();
        self.place(spawn, world);
    }

    fn place(&mut self, spawn: &SpawnPoint, world: &CollisionWorld) {
        self.body.spawn_at(spawn.position, world);
        self.character.begin_play(&mut self.body);
        self.character.turn(spawn.facing);
        log::info!(
            "player {} ({}) spawned at {} {:?}",
            self.id,
            self.name,
            spawn.name,
            self.body.location()
        );
    }

    /// Feed one frame of input to the character.
    pub fn handle_input(&mut self, input: &PlayerInput, mouse_sensitivity: f32) {
        let (pitch, yaw) = input.look(mouse_sensitivity);
        self.character.look_up(pitch);
        self.character.turn(yaw);

        for event in self.input.update(input.actions) {
            log::trace!("player {}: {event:?}", self.id);
            match event {
                InputEvent::CrouchPressed => self.character.crouch_pressed(),
                InputEvent::CrouchReleased => self.character.crouch_released(),
                InputEvent::ToggleCrouch => self.character.toggle_crouch(),
                InputEvent::RunPressed => self.character.run_pressed(),
                InputEvent::RunReleased => self.character.run_released(),
                InputEvent::Jump => self.character.jump(&mut self.body),
                InputEvent::Fire => self.character.fire(),
            }
        }

        let (forward, right) = input.axes();
        self.character.move_forward(&mut self.body, forward);
        self.character.move_right(&mut self.body, right);
    }

    /// Run the character, then integrate the body.
    pub fn tick(&mut self, delta_time: f32, world: &CollisionWorld) {
        self.character.tick(delta_time, &mut self.body, world);
        self.body.update(delta_time, world);
    }

    #[inline]
    pub fn character(&self) -> &Character {
        &self.character
    }

    #[inline]
    pub fn body(&self) -> &CharacterBody {
        &self.body
    }

    /// Capsule center.
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.body.location()
    }

    #[inline]
    pub fn velocity(&self) -> Vec3 {
        self.body.velocity()
    }

    #[inline]
    pub fn state(&self) -> MovementState {
        self.character.state()
    }

    /// Camera position.
    pub fn eye_position(&self) -> Vec3 {
        self.character.camera().eye_position(self.body.location())
    }

    #[inline]
    pub fn look_direction(&self) -> Vec3 {
        self.character.camera().look_direction()
    }

    #[inline]
    pub fn on_ground(&self) -> bool {
        self.body.is_grounded()
    }
}
