//! Token Tetris (workspace facade crate).
//!
//! Re-exports the workspace crates under one name, `token_tetris::{core,engine,input,term,types}`,
//! and provides the file logger used by the terminal runner.

pub mod logging;

pub use token_tetris_core as core;
pub use token_tetris_engine as engine;
pub use token_tetris_input as input;
pub use token_tetris_term as term;
pub use token_tetris_types as types;
