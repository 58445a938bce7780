//! Locomotion tuning.
//!
//! Every constant the character uses lives in [`LocomotionConfig`], built once
//! per character and never mutated afterwards. Values are world units
//! (centimetre scale), seconds and degrees.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::movement::MovementState;

/// Errors produced while loading or validating a [`LocomotionConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse locomotion config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid locomotion config: {0}")]
    Invalid(String),
}

/// Configuration for the locomotion state machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    // ========================================================================
    // Camera
    // ========================================================================
    /// Field of view outside of running (degrees).
    pub camera_fov: f32,

    /// Field of view while running (degrees).
    pub running_fov: f32,

    /// Interpolation speed of the field of view toward its target.
    pub fov_interp_speed: f32,

    /// Pitch input multiplier. `-1.0` inverts the vertical look axis.
    pub invert_camera: f32,

    /// Camera height above the capsule center when standing.
    pub base_eye_height: f32,

    /// Camera height above the capsule center when crouched.
    pub crouched_eye_height: f32,

    // ========================================================================
    // Capsule
    // ========================================================================
    /// Upper bound of the capsule half-height.
    pub max_capsule_half_height: f32,

    /// Lower bound of the capsule half-height.
    pub min_capsule_half_height: f32,

    /// Half-height the crouch timeline eases away from.
    pub standing_capsule_half_height: f32,

    /// Nominal crouching half-height.
    pub crouching_capsule_half_height: f32,

    /// Maximum rate (units/second) the capsule approaches its crouch target.
    pub capsule_interp_speed: f32,

    /// Duration of the default crouch curves (seconds).
    pub crouch_transition_time: f32,

    // ========================================================================
    // Speeds
    // ========================================================================
    /// Walking max speed.
    pub default_speed: f32,

    /// Running max speed. Also the speed a too-fast slide is reset to.
    pub run_speed: f32,

    /// Crouching max speed.
    pub crouch_speed: f32,

    /// Strafe input scale outside of running.
    pub default_strafe_multiplier: f32,

    /// Strafe input scale while running.
    pub run_strafe_multiplier: f32,

    /// Backward input scale outside of running.
    pub default_move_back_multiplier: f32,

    /// Backward input scale while running.
    pub run_move_back_multiplier: f32,

    /// Maximum acceleration handed to the movement component.
    pub max_acceleration: f32,

    /// Vertical launch speed of a jump.
    pub jump_velocity: f32,

    // ========================================================================
    // Friction
    // ========================================================================
    pub default_braking_deceleration: f32,
    pub default_ground_friction: f32,
    pub sliding_braking_deceleration: f32,
    pub sliding_ground_friction: f32,

    // ========================================================================
    // Sliding
    // ========================================================================
    /// Scale of the down-slope force applied while sliding.
    pub slide_force_multiplier: f32,

    /// Slides slower than this end on the next tick.
    pub min_slide_speed: f32,

    /// Slides faster than this are reset to `run_speed`.
    pub max_slide_speed: f32,

    /// Slides end after this many seconds regardless of speed.
    pub max_slide_time: f32,

    // ========================================================================
    // Probes
    // ========================================================================
    /// Sphere radius of the overhead uncrouch sweep.
    pub uncrouch_probe_radius: f32,

    /// Extra length added to the uncrouch clearance column.
    pub uncrouch_clearance_margin: f32,

    /// Look-ahead distance beyond the capsule radius while crouching.
    pub crouch_anticipation: f32,

    /// Look-ahead distance beyond the capsule radius while sliding.
    pub slide_anticipation: f32,

    /// Sphere radius of the look-ahead ceiling sweep.
    pub intended_probe_radius: f32,

    /// Sphere radius of the overhead ceiling sweep.
    pub current_probe_radius: f32,

    /// Ceilings tilted further than this from horizontal are ignored (degrees).
    pub max_ceiling_angle: f32,

    /// Gap kept between the capsule top and a detected ceiling.
    pub ceiling_clearance: f32,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            // Camera
            camera_fov: 90.0,
            running_fov: 100.0,
            fov_interp_speed: 1.0,
            invert_camera: -1.0,
            base_eye_height: 64.0,
            crouched_eye_height: 40.0,

            // Capsule
            max_capsule_half_height: 100.0,
            min_capsule_half_height: 10.0,
            standing_capsule_half_height: 88.0,
            crouching_capsule_half_height: 40.0,
            capsule_interp_speed: 1.0,
            crouch_transition_time: 1.0,

            // Speeds
            default_speed: 400.0,
            run_speed: 800.0,
            crouch_speed: 300.0,
            default_strafe_multiplier: 0.85,
            run_strafe_multiplier: 0.6,
            default_move_back_multiplier: 0.7,
            run_move_back_multiplier: 0.6,
            max_acceleration: 1024.0,
            jump_velocity: 300.0,

            // Friction
            default_braking_deceleration: 256.0,
            default_ground_friction: 4.0,
            sliding_braking_deceleration: 128.0,
            sliding_ground_friction: 0.5,

            // Sliding
            slide_force_multiplier: 800_000.0,
            min_slide_speed: 10.0,
            max_slide_speed: 800.0,
            max_slide_time: 5.0,

            // Probes
            uncrouch_probe_radius: 20.0,
            uncrouch_clearance_margin: 10.0,
            crouch_anticipation: 50.0,
            slide_anticipation: 100.0,
            intended_probe_radius: 1.0,
            current_probe_radius: 15.0,
            max_ceiling_angle: 30.0,
            ceiling_clearance: 5.0,
        }
    }
}

/// Per-state movement parameter set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementParameters {
    pub max_speed: f32,
    pub braking_deceleration: f32,
    pub ground_friction: f32,
    pub strafe_multiplier: f32,
    pub move_back_multiplier: f32,
    pub target_fov: f32,
}

impl LocomotionConfig {
    /// Snappier tuning with short transitions.
    pub fn arcade() -> Self {
        Self {
            run_speed: 1000.0,
            max_slide_speed: 1000.0,
            max_acceleration: 2048.0,
            fov_interp_speed: 4.0,
            capsule_interp_speed: 120.0,
            crouch_transition_time: 0.25,
            max_slide_time: 2.0,
            ..Default::default()
        }
    }

    /// Slower tuning with long, heavy transitions.
    pub fn tactical() -> Self {
        Self {
            default_speed: 300.0,
            run_speed: 550.0,
            crouch_speed: 150.0,
            max_slide_speed: 550.0,
            running_fov: 95.0,
            crouch_transition_time: 0.6,
            capsule_interp_speed: 60.0,
            max_slide_time: 1.5,
            slide_force_multiplier: 400_000.0,
            ..Default::default()
        }
    }

    /// Parse a TOML document. Missing keys take their default value.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Check the ordering constraints the state machine relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let values = [
            ("camera_fov", self.camera_fov),
            ("running_fov", self.running_fov),
            ("fov_interp_speed", self.fov_interp_speed),
            ("invert_camera", self.invert_camera),
            ("base_eye_height", self.base_eye_height),
            ("crouched_eye_height", self.crouched_eye_height),
            ("max_capsule_half_height", self.max_capsule_half_height),
            ("min_capsule_half_height", self.min_capsule_half_height),
            ("standing_capsule_half_height", self.standing_capsule_half_height),
            ("crouching_capsule_half_height", self.crouching_capsule_half_height),
            ("capsule_interp_speed", self.capsule_interp_speed),
            ("crouch_transition_time", self.crouch_transition_time),
            ("default_speed", self.default_speed),
            ("run_speed", self.run_speed),
            ("crouch_speed", self.crouch_speed),
            ("default_strafe_multiplier", self.default_strafe_multiplier),
            ("run_strafe_multiplier", self.run_strafe_multiplier),
            ("default_move_back_multiplier", self.default_move_back_multiplier),
            ("run_move_back_multiplier", self.run_move_back_multiplier),
            ("max_acceleration", self.max_acceleration),
            ("jump_velocity", self.jump_velocity),
            ("default_braking_deceleration", self.default_braking_deceleration),
            ("default_ground_friction", self.default_ground_friction),
            ("sliding_braking_deceleration", self.sliding_braking_deceleration),
            ("sliding_ground_friction", self.sliding_ground_friction),
            ("slide_force_multiplier", self.slide_force_multiplier),
            ("min_slide_speed", self.min_slide_speed),
            ("max_slide_speed", self.max_slide_speed),
            ("max_slide_time", self.max_slide_time),
            ("uncrouch_probe_radius", self.uncrouch_probe_radius),
            ("uncrouch_clearance_margin", self.uncrouch_clearance_margin),
            ("crouch_anticipation", self.crouch_anticipation),
            ("slide_anticipation", self.slide_anticipation),
            ("intended_probe_radius", self.intended_probe_radius),
            ("current_probe_radius", self.current_probe_radius),
            ("max_ceiling_angle", self.max_ceiling_angle),
            ("ceiling_clearance", self.ceiling_clearance),
        ];
        if let Some((name, value)) = values.iter().find(|(_, value)| !value.is_finite()) {
            return Err(ConfigError::Invalid(format!("{name} must be finite, got {value}")));
        }
        let rates = [
            ("fov_interp_speed", self.fov_interp_speed),
            ("capsule_interp_speed", self.capsule_interp_speed),
            ("max_acceleration", self.max_acceleration),
            ("default_braking_deceleration", self.default_braking_deceleration),
            ("default_ground_friction", self.default_ground_friction),
            ("sliding_braking_deceleration", self.sliding_braking_deceleration),
            ("sliding_ground_friction", self.sliding_ground_friction),
            ("uncrouch_probe_radius", self.uncrouch_probe_radius),
            ("uncrouch_clearance_margin", self.uncrouch_clearance_margin),
        ];
        if let Some((name, value)) = rates.iter().find(|(_, value)| *value < 0.0) {
            return Err(ConfigError::Invalid(format!("{name} must not be negative, got {value}")));
        }
        if self.min_capsule_half_height <= 0.0 {
            return Err(ConfigError::Invalid(
                "min_capsule_half_height must be positive".into(),
            ));
        }
        let heights = [
            self.min_capsule_half_height,
            self.crouching_capsule_half_height,
            self.standing_capsule_half_height,
            self.max_capsule_half_height,
        ];
        if heights.windows(2).any(|pair| pair[0] > pair[1]) {
            return Err(ConfigError::Invalid(format!(
                "capsule half-heights must satisfy min <= crouching <= standing <= max, got {heights:?}"
            )));
        }
        if self.min_slide_speed >= self.max_slide_speed {
            return Err(ConfigError::Invalid(format!(
                "min_slide_speed ({}) must be below max_slide_speed ({})",
                self.min_slide_speed, self.max_slide_speed
            )));
        }
        if self.max_slide_time <= 0.0 || self.crouch_transition_time <= 0.0 {
            return Err(ConfigError::Invalid(
                "max_slide_time and crouch_transition_time must be positive".into(),
            ));
        }
        if self.default_speed <= 0.0 || self.run_speed <= 0.0 || self.crouch_speed <= 0.0 {
            return Err(ConfigError::Invalid("movement speeds must be positive".into()));
        }
        Ok(())
    }

    /// Parameter set for a movement state.
    ///
    /// Sliding keeps the running max speed and field of view; only its
    /// braking and friction differ.
    pub fn parameters(&self, state: MovementState) -> MovementParameters {
        let default = MovementParameters {
            max_speed: self.default_speed,
            braking_deceleration: self.default_braking_deceleration,
            ground_friction: self.default_ground_friction,
            strafe_multiplier: self.default_strafe_multiplier,
            move_back_multiplier: self.default_move_back_multiplier,
            target_fov: self.camera_fov,
        };

        match state {
            MovementState::Standing => default,
            MovementState::Crouching => MovementParameters {
                max_speed: self.crouch_speed,
                ..default
            },
            MovementState::Running => MovementParameters {
                max_speed: self.run_speed,
                strafe_multiplier: self.run_strafe_multiplier,
                move_back_multiplier: self.run_move_back_multiplier,
                target_fov: self.running_fov,
                ..default
            },
            MovementState::Sliding => MovementParameters {
                max_speed: self.run_speed,
                braking_deceleration: self.sliding_braking_deceleration,
                ground_friction: self.sliding_ground_friction,
                target_fov: self.running_fov,
                ..default
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = LocomotionConfig::default();
        assert!(config.validate().is_ok());
        assert!(LocomotionConfig::arcade().validate().is_ok());
        assert!(LocomotionConfig::tactical().validate().is_ok());
    }

    #[test]
    fn test_parameters_per_state() {
        let config = LocomotionConfig::default();

        assert_eq!(config.parameters(MovementState::Standing).max_speed, 400.0);
        assert_eq!(config.parameters(MovementState::Crouching).max_speed, 300.0);
        assert_eq!(config.parameters(MovementState::Running).max_speed, 800.0);
        assert_eq!(config.parameters(MovementState::Running).target_fov, 100.0);
        assert_eq!(config.parameters(MovementState::Running).strafe_multiplier, 0.6);

        let sliding = config.parameters(MovementState::Sliding);
        assert_eq!(sliding.ground_friction, 0.5);
        assert_eq!(sliding.braking_deceleration, 128.0);
    }

    #[test]
    fn test_parse_partial_toml() {
        let config = LocomotionConfig::from_toml_str(
            r#"
                run_speed = 900.0
                max_slide_speed = 950.0
            "#,
        )
        .unwrap();
        assert_eq!(config.run_speed, 900.0);
        assert_eq!(config.max_slide_speed, 950.0);
        assert_eq!(config.crouch_speed, 300.0);
    }

    #[test]
    fn test_reject_inverted_heights() {
        let result = LocomotionConfig::from_toml_str("crouching_capsule_half_height = 95.0");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_reject_slide_speed_bounds() {
        let result = LocomotionConfig::from_toml_str("min_slide_speed = 900.0");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_reject_negative_interp_speed() {
        let result = LocomotionConfig::from_toml_str("capsule_interp_speed = -1.0");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_reject_non_finite() {
        let result = LocomotionConfig::from_toml_str("min_capsule_half_height = nan");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));

        let result = LocomotionConfig::from_toml_str("max_capsule_half_height = inf");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_reject_malformed_toml() {
        let result = LocomotionConfig::from_toml_str("run_speed = \"fast\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = LocomotionConfig::from_file(Path::new("/nonexistent/stride.toml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
