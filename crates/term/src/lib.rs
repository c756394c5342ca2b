//! Terminal rendering for Token Tetris.
//!
//! Renders a [`GameSnapshot`](crate::core::GameSnapshot) into a framebuffer of
//! styled characters and flushes it with crossterm. No widget toolkit; each
//! board cell is a colored block labelled with its piece's code token.

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use token_tetris_core as core;
pub use token_tetris_types as types;

pub use fb::{CellStyle, FrameBuffer, Glyph};
pub use game_view::{AnchorY, GameView, Viewport};
pub use renderer::{changed_spans, encode_frame, Span, TerminalRenderer};
