//! Core game logic module for NCB Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! The terminal front end in [`crate::modes`] only feeds it direction requests and
//! timer ticks, and reads the state back out for drawing.

pub mod config;
pub mod direction;
pub mod discount;
pub mod engine;
pub mod rules;
pub mod session;
pub mod spawner;
pub mod state;

// Re-export commonly used types
pub use config::{ConfigError, GameConfig};
pub use direction::Direction;
pub use discount::{NCB_TIERS, NcbTier, discount_for};
pub use engine::{GameEngine, StepInfo, StepResult};
pub use session::{EndReason, GameSummary, Session, SessionPhase, TickOutcome};
pub use spawner::Spawner;
pub use state::{CollisionType, GameState, Obstacle, ObstacleKind, Occupancy, Position, Snake};
