//! Core game logic module - pure, deterministic, and testable
//!
//! This crate contains the game rules and state transitions for Token Tetris.
//! It has **no dependencies** on timers, terminals or any other I/O:
//!
//! - **Pure**: every action maps a [`GameState`] to a new one; the input is never mutated
//! - **Deterministic**: randomness comes in through [`RandomSource`], so a seed or a
//!   fixed [`PieceSequence`] replays the same game
//! - **Testable**: each rule lives in a small module with its own tests
//!
//! # Module Structure
//!
//! - [`catalog`]: the seven tetromino shapes, colors and code tokens
//! - [`board`]: 10x20 grid with collision checks, merging and line clearing
//! - [`piece`]: the falling piece, movement and rotation with horizontal kicks
//! - [`rng`]: injectable random source and piece selection
//! - [`scoring`]: line-clear points, level and drop interval
//! - [`game_state`]: the action reducer
//! - [`controller`]: owner of the live state, RNG and game-over hook
//! - [`snapshot`]: serializable read-only view for renderers
//!
//! # Game Rules
//!
//! - **Uniform randomizer**: each new piece is one of the 7 kinds with equal probability
//! - **Simple rotation**: clockwise only, trying horizontal kicks `0, -1, +1, -2, +2`
//! - **Immediate lock**: a piece locks as soon as it cannot move down
//! - **Scoring**: 100/300/500/800 times the level, plus 2 points per hard-dropped row
//! - **Levels**: one level per 10 lines, each 10% faster, never below 100ms
//!
//! # Example
//!
//! ```
//! use token_tetris_core::{GameController, PieceSequence};
//! use token_tetris_types::{GameAction, GameStatus, PieceKind};
//!
//! let mut game = GameController::new(PieceSequence::new(vec![PieceKind::O]));
//! game.dispatch(GameAction::StartGame);
//! game.dispatch(GameAction::MoveRight);
//! assert_eq!(game.dispatch(GameAction::HardDrop), GameStatus::Active);
//!
//! // O spawns at row 0 and falls 18 rows.
//! assert_eq!(game.state().score(), 36);
//! ```

pub mod board;
pub mod catalog;
pub mod controller;
pub mod game_state;
pub mod piece;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use token_tetris_types as types;

// Re-export commonly used types for convenience
pub use board::{check_collision, clear_lines, merge_piece_to_board, Board, LineClear};
pub use catalog::{definition, get_shape, Shape, TetrominoDef, CATALOG};
pub use controller::{GameController, GameOverCallback, Outcome};
pub use game_state::{GameState, LockEvent};
pub use piece::{create_piece, Piece};
pub use rng::{pick_random_type, PieceSequence, RandomSource, SimpleRng};
pub use scoring::{calculate_drop_score, calculate_level, calculate_line_score, get_drop_interval_ms};
pub use snapshot::{GameSnapshot, PieceSnapshot};
