//! Terminal input module.
//!
//! Maps `crossterm` key events into [`crate::types::GameAction`]. Each key press
//! is one action; there is no auto-repeat handling beyond what the terminal
//! itself sends.

pub mod map;

pub use token_tetris_types as types;

pub use map::{handle_key_event, should_quit};
