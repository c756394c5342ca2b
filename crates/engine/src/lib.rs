//! Real-time driver for the Token Tetris core
//!
//! The core crate only knows how to turn one state into the next. This crate
//! adds time and sharing:
//!
//! - [`config`]: `EngineConfig`, read from `TOKEN_TETRIS_*` environment variables
//! - [`clock`]: the reference clock for forced descents
//! - [`scheduler`]: the tokio drop loop
//! - [`session`]: `GameSession`, a mutex-guarded controller plus drop loop lifecycle
//!
//! # Example
//!
//! ```no_run
//! use token_tetris_engine::{EngineConfig, GameSession};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut session = GameSession::new(&EngineConfig::from_env())?;
//!     session.on_game_over(|score| println!("final score {}", score));
//!     session.start_game();
//!     Ok(())
//! }
//! ```

pub mod clock;
pub mod config;
pub mod scheduler;
pub mod session;

pub use token_tetris_core as core;
pub use token_tetris_types as types;

pub use clock::DropClock;
pub use config::EngineConfig;
pub use scheduler::{
    lock_controller, notify_game_over, run_drop_loop, spawn_drop_loop, GameOverHook,
    SharedController,
};
pub use session::GameSession;
