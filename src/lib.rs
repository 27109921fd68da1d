//! NCB Snake - Snake themed around insurance No Claims Bonus discounts
//!
//! This library provides:
//! - Core game logic (game module): grid state, spawning, rules, the NCB
//!   discount table and the session state machine
//! - High score persistence (persistence module)
//! - Terminal input translation (input module)
//! - TUI rendering (render module)
//! - The interactive game loop (modes module)

pub mod game;
pub mod input;
pub mod modes;
pub mod persistence;
pub mod render;
