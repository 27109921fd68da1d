use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest grid that still leaves room to steer
pub const MIN_GRID_SIZE: usize = 5;

/// Reasons a [`GameConfig`] is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("grid size {size} is below the minimum of {min}")]
    GridTooSmall { size: usize, min: usize },
    #[error("initial snake length {length} does not fit on a {grid_size}x{grid_size} grid")]
    SnakeDoesNotFit { length: usize, grid_size: usize },
    #[error("minimum speed must be greater than zero")]
    ZeroMinSpeed,
    #[error("speed step must be greater than zero")]
    ZeroSpeedStep,
    #[error("minimum speed {min_ms}ms exceeds initial speed {initial_ms}ms")]
    MinSpeedAboveInitial { min_ms: u64, initial_ms: u64 },
    #[error("obstacle interval must be greater than zero")]
    ZeroObstacleInterval,
}

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width and height of the square game grid
    pub grid_size: usize,
    /// Initial length of the snake
    pub initial_snake_length: usize,

    /// Tick interval at the start of a session, in milliseconds
    pub initial_speed_ms: u64,
    /// How much the tick interval shrinks per food eaten
    pub speed_step_ms: u64,
    /// The tick interval never drops below this
    pub min_speed_ms: u64,

    /// An obstacle appears every time the score reaches a multiple of this
    pub obstacle_every: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: 20,
            initial_snake_length: 3,
            initial_speed_ms: 150,
            speed_step_ms: 5,
            min_speed_ms: 50,
            obstacle_every: 3,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(grid_size: usize) -> Self {
        Self {
            grid_size,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10)
    }

    /// Load a configuration from a JSON file. Missing fields take their
    /// default values.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: GameConfig =
            serde_json::from_str(&json).context("Failed to parse game config")?;
        Ok(config)
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size < MIN_GRID_SIZE {
            return Err(ConfigError::GridTooSmall {
                size: self.grid_size,
                min: MIN_GRID_SIZE,
            });
        }

        // The snake starts at the centre and trails to the left.
        let room_behind_head = self.grid_size / 2 + 1;
        if self.initial_snake_length == 0 || self.initial_snake_length > room_behind_head {
            return Err(ConfigError::SnakeDoesNotFit {
                length: self.initial_snake_length,
                grid_size: self.grid_size,
            });
        }

        if self.min_speed_ms == 0 {
            return Err(ConfigError::ZeroMinSpeed);
        }

        if self.speed_step_ms == 0 {
            return Err(ConfigError::ZeroSpeedStep);
        }

        if self.min_speed_ms > self.initial_speed_ms {
            return Err(ConfigError::MinSpeedAboveInitial {
                min_ms: self.min_speed_ms,
                initial_ms: self.initial_speed_ms,
            });
        }

        if self.obstacle_every == 0 {
            return Err(ConfigError::ZeroObstacleInterval);
        }

        Ok(())
    }
}
