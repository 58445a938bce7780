//! Game simulation - the fixed-step loop.
//!
//! Each tick feeds every player its input, runs the locomotion character and
//! then integrates the physics body against the level.

use std::path::Path;

use serde::{Deserialize, Serialize};
use stride_locomotion::{ConfigError, LocomotionConfig};
use stride_physics::BodyConfig;

use crate::input::PlayerInput;
use crate::level::Level;
use crate::player::{EntityId, Player};

/// Simulation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Simulation tick rate (ticks per second).
    pub tick_rate: u32,

    /// Mouse sensitivity.
    pub mouse_sensitivity: f32,

    /// Locomotion tuning shared by every player.
    pub locomotion: LocomotionConfig,

    /// Physics body tuning shared by every player.
    pub body: BodyConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60,
            mouse_sensitivity: 2.0,
            locomotion: LocomotionConfig::default(),
            body: BodyConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Parse a TOML document with optional `[locomotion]` and `[body]` tables.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_rate == 0 {
            return Err(ConfigError::Invalid("tick_rate must be positive".into()));
        }
        if self.body.radius <= 0.0 || self.body.mass <= 0.0 {
            return Err(ConfigError::Invalid(
                "body radius and mass must be positive".into(),
            ));
        }
        self.locomotion.validate()
    }

    /// Get the time step per tick in seconds.
    pub fn delta_time(&self) -> f32 {
        1.0 / self.tick_rate as f32
    }
}

/// The game simulation.
#[derive(Debug)]
pub struct Simulation {
    /// Current frame/tick number.
    pub frame: u64,

    /// Simulation configuration.
    pub config: SimulationConfig,

    /// Current level.
    pub level: Level,

    /// All players in the game.
    pub players: Vec<Player>,

    /// Next entity ID to assign.
    next_entity_id: EntityId,
}

impl Simulation {
    /// Create a new simulation with the given configuration and level.
    pub fn new(config: SimulationConfig, level: Level) -> Self {
        Self {
            frame: 0,
            config,
            level,
            players: Vec::new(),
            next_entity_id: 1,
        }
    }

    /// Create a simulation with default configuration and test arena.
    pub fn test() -> Self {
        Self::new(SimulationConfig::default(), Level::test_arena())
    }

    /// Add a player at the next spawn point in rotation.
    ///
    /// Returns `None` if the level has no spawn points.
    pub fn add_player(&mut self, name: &str) -> Option<EntityId> {
        let spawn = self.level.get_player_spawn(self.players.len())?.name.clone();
        self.add_player_at(name, &spawn)
    }

    /// Add a player at a named spawn point.
    pub fn add_player_at(&mut self, name: &str, spawn_name: &str) -> Option<EntityId> {
        let spawn = self.level.find_spawn(spawn_name)?;

        let id = self.next_entity_id;
        self.next_entity_id += 1;

        let player = Player::new(
            id,
            name.to_string(),
            &self.config.locomotion,
            &self.config.body,
            spawn,
            &self.level.collision,
        );
        self.players.push(player);
        Some(id)
    }

    /// Remove a player from the simulation.
    pub fn remove_player(&mut self, player_id: EntityId) {
        self.players.retain(|p| p.id != player_id);
    }

    /// Get a player by ID.
    pub fn get_player(&self, player_id: EntityId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    /// Get a mutable reference to a player by ID.
    pub fn get_player_mut(&mut self, player_id: EntityId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == player_id)
    }

    /// Advance the simulation by one tick.
    ///
    /// `inputs` is indexed by player position in `players`; missing entries
    /// count as no input.
    pub fn tick(&mut self, inputs: &[PlayerInput]) {
        let delta_time = self.config.delta_time();
        let idle = PlayerInput::default();

        for (i, player) in self.players.iter_mut().enumerate() {
            let input = inputs.get(i).unwrap_or(&idle);
            player.handle_input(input, self.config.mouse_sensitivity);
            player.tick(delta_time, &self.level.collision);

            log::trace!(
                "frame {} player {}: {:?} at {:?}",
                self.frame,
                player.id,
                player.state(),
                player.position()
            );
        }

        self.frame += 1;
    }

    /// Get the delta time for this simulation.
    pub fn delta_time(&self) -> f32 {
        self.config.delta_time()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use stride_locomotion::MovementState;

    use super::*;

    #[test]
    fn test_simulation_creation() {
        let sim = Simulation::test();
        assert_eq!(sim.frame, 0);
        assert!(sim.players.is_empty());
        assert!((sim.delta_time() - 1.0 / 60.0).abs() < 1e-6);
    }

    #[test]
    fn test_add_player() {
        let mut sim = Simulation::test();

        let id = sim.add_player("Player1").expect("arena has spawns");
        assert!(id > 0);
        assert_eq!(sim.players.len(), 1);

        let player = sim.get_player(id).unwrap();
        assert_eq!(player.name, "Player1");
        assert!(player.on_ground());

        sim.remove_player(id);
        assert!(sim.get_player(id).is_none());
    }

    #[test]
    fn test_add_player_at_unknown_spawn() {
        let mut sim = Simulation::test();
        assert!(sim.add_player_at("Lost", "nowhere").is_none());

        let mut empty = Simulation::new(SimulationConfig::default(), Level::new("empty", "Empty"));
        assert!(empty.add_player("Nobody").is_none());
    }

    #[test]
    fn test_tick_advances_frame() {
        let mut sim = Simulation::test();
        sim.add_player("Test");

        sim.tick(&[PlayerInput::default()]);
        assert_eq!(sim.frame, 1);

        sim.tick(&[]);
        assert_eq!(sim.frame, 2);
    }

    #[test]
    fn test_movement_input() {
        let mut sim = Simulation::test();
        let id = sim.add_player("Test").unwrap();

        let start_pos = sim.get_player(id).unwrap().position();

        let mut input = PlayerInput::default();
        input.movement.forward = true;

        for _ in 0..60 {
            sim.tick(&[input.clone()]);
        }

        let end_pos = sim.get_player(id).unwrap().position();
        let distance = (end_pos - start_pos).length();

        assert!(distance > 100.0, "Player should have moved, distance={}", distance);
    }

    #[test]
    fn test_crouch_toggle() {
        let mut sim = Simulation::test();
        let id = sim.add_player_at("Test", "open").unwrap();

        let mut input = PlayerInput::default();
        input.actions.crouch_toggle = true;
        sim.tick(&[input.clone()]);
        assert_eq!(sim.get_player(id).unwrap().state(), MovementState::Crouching);

        // Still held: no second toggle
        sim.tick(&[input.clone()]);
        assert_eq!(sim.get_player(id).unwrap().state(), MovementState::Crouching);

        input.actions.crouch_toggle = false;
        sim.tick(&[input.clone()]);
        input.actions.crouch_toggle = true;
        sim.tick(&[input]);
        assert_eq!(sim.get_player(id).unwrap().state(), MovementState::Standing);
    }

    #[test]
    fn test_determinism() {
        let inputs: Vec<_> = (0..100)
            .map(|i| {
                let mut input = PlayerInput::default();
                input.movement.forward = i % 2 == 0;
                input.movement.right = i % 3 == 0;
                input.actions.jump = i % 10 == 0;
                input.actions.run = i > 20;
                input.actions.crouch = i > 60;
                input
            })
            .collect();

        let run = || {
            let mut sim = Simulation::test();
            sim.add_player("Test");
            for input in &inputs {
                sim.tick(&[input.clone()]);
            }
            let player = sim.get_player(1).unwrap();
            (player.position(), player.state(), player.character().fov())
        };

        let (pos1, state1, fov1) = run();
        let (pos2, state2, fov2) = run();

        assert!(
            (pos1 - pos2).length() < 0.0001,
            "Simulations should be deterministic: {:?} vs {:?}",
            pos1,
            pos2
        );
        assert_eq!(state1, state2);
        assert_eq!(fov1, fov2);
    }

    #[test]
    fn test_config_from_toml() {
        let config = SimulationConfig::from_toml_str(
            r#"
            tick_rate = 120

            [locomotion]
            run_speed = 900.0

            [body]
            gravity = 490.0
            "#,
        )
        .unwrap();

        assert_eq!(config.tick_rate, 120);
        assert_eq!(config.locomotion.run_speed, 900.0);
        assert_eq!(config.locomotion.crouch_speed, 300.0);
        assert_eq!(config.body.gravity, 490.0);
        assert_eq!(config.mouse_sensitivity, 2.0);
    }

    #[test]
    fn test_config_rejects_zero_tick_rate() {
        let err = SimulationConfig::from_toml_str("tick_rate = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = SimulationConfig::from_toml_str(
            "[locomotion]\nmin_slide_speed = 900.0\nmax_slide_speed = 100.0",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
