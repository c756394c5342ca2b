//! Game state module - the immutable game snapshot and its transitions
//!
//! [`GameState`] ties together the board, the falling and queued pieces, and
//! the score/level/lines counters. Every transition takes `&self` and returns
//! a brand new state, so a state value never changes once built. Transitions
//! that spawn pieces take the random source as a parameter.
//!
//! Actions that need a running game (movement, rotation, drops) are no-ops
//! unless the state is [`GameStatus::Active`]; they return an equal state.

use log::{debug, info, trace};
use serde::Serialize;

use crate::board::Board;
use crate::piece::{create_piece, Piece};
use crate::rng::{pick_random_type, RandomSource};
use crate::scoring::{
    calculate_drop_score, calculate_level, calculate_line_score, get_drop_interval_ms,
};
use crate::types::{GameAction, GameStatus, INITIAL_DROP_MS};

/// What the most recent lock did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LockEvent {
    pub lines_cleared: u32,
    /// Points from the line clear alone.
    pub line_clear_score: u32,
    /// Points from the hard drop distance (0 for a soft-drop lock).
    pub drop_bonus: u32,
    pub level_up: bool,
}

impl LockEvent {
    pub fn total_score(&self) -> u32 {
        self.line_clear_score.saturating_add(self.drop_bonus)
    }
}

/// Complete game state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    current: Option<Piece>,
    next: Option<Piece>,
    score: u32,
    level: u32,
    lines: u32,
    game_over: bool,
    paused: bool,
    /// Milliseconds between forced descents at the current level.
    drop_interval_ms: u32,
    /// Drop interval at level 1; restored by every restart.
    initial_drop_ms: u32,
    /// Set by the transition that locked a piece, cleared by every other one.
    last_lock: Option<LockEvent>,
}

impl GameState {
    /// Create an idle game (no pieces yet) with the given level-1 drop interval
    pub fn new(initial_drop_ms: u32) -> Self {
        Self {
            board: Board::new(),
            current: None,
            next: None,
            score: 0,
            level: 1,
            lines: 0,
            game_over: false,
            paused: false,
            drop_interval_ms: get_drop_interval_ms(initial_drop_ms, 1),
            initial_drop_ms,
            last_lock: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_piece(&self) -> Option<&Piece> {
        self.current.as_ref()
    }

    pub fn next_piece(&self) -> Option<&Piece> {
        self.next.as_ref()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn drop_interval_ms(&self) -> u32 {
        self.drop_interval_ms
    }

    pub fn initial_drop_ms(&self) -> u32 {
        self.initial_drop_ms
    }

    pub fn last_lock(&self) -> Option<LockEvent> {
        self.last_lock
    }

    pub fn status(&self) -> GameStatus {
        if self.game_over {
            GameStatus::GameOver
        } else if self.current.is_none() {
            GameStatus::Idle
        } else if self.paused {
            GameStatus::Paused
        } else {
            GameStatus::Active
        }
    }

    /// Replace the board (for replays and hand-built positions).
    pub fn with_board(self, board: Board) -> Self {
        Self { board, ..self }
    }

    /// Replace the falling and queued pieces (for replays and hand-built positions).
    pub fn with_pieces(self, current: Option<Piece>, next: Option<Piece>) -> Self {
        Self {
            current,
            next,
            ..self
        }
    }

    /// Set the cleared-line total, deriving level and drop interval from it.
    pub fn with_lines(self, lines: u32) -> Self {
        let level = calculate_level(lines);
        Self {
            lines,
            level,
            drop_interval_ms: get_drop_interval_ms(self.initial_drop_ms, level),
            ..self
        }
    }

    pub fn with_score(self, score: u32) -> Self {
        Self { score, ..self }
    }

    /// Apply a game action, returning the resulting state
    pub fn apply<R: RandomSource + ?Sized>(&self, action: GameAction, rng: &mut R) -> GameState {
        if action.requires_active() && self.status() != GameStatus::Active {
            return self.successor();
        }
        match action {
            GameAction::StartGame => self.start(rng),
            GameAction::TogglePause => self.toggle_pause(),
            GameAction::MoveLeft => self.move_left(),
            GameAction::MoveRight => self.move_right(),
            GameAction::MoveDown => self.move_down(rng),
            GameAction::Rotate => self.rotate(),
            GameAction::HardDrop => self.hard_drop(rng),
        }
    }

    /// Reset board and counters and spawn the current and next pieces.
    ///
    /// Valid from any state; this is also how a finished game restarts.
    pub fn start<R: RandomSource + ?Sized>(&self, rng: &mut R) -> GameState {
        let mut next = GameState::new(self.initial_drop_ms);
        let current = create_piece(pick_random_type(rng));
        let queued = create_piece(pick_random_type(rng));
        debug!(
            "start: current={} next={}",
            current.kind().as_str(),
            queued.kind().as_str()
        );
        next.current = Some(current);
        next.next = Some(queued);
        info!("game started (drop interval {}ms)", next.drop_interval_ms);
        next
    }

    /// Active <-> Paused. Idle and finished games are left alone.
    pub fn toggle_pause(&self) -> GameState {
        let mut next = self.successor();
        match self.status() {
            GameStatus::Active => next.paused = true,
            GameStatus::Paused => next.paused = false,
            GameStatus::Idle | GameStatus::GameOver => {}
        }
        next
    }

    pub fn move_left(&self) -> GameState {
        self.shift(-1)
    }

    pub fn move_right(&self) -> GameState {
        self.shift(1)
    }

    /// Move the piece one row down, or lock it if it cannot descend.
    pub fn move_down<R: RandomSource + ?Sized>(&self, rng: &mut R) -> GameState {
        let mut next = self.successor();
        let Some(piece) = self.active_piece() else {
            return next;
        };

        if self.board.check_collision(&piece, (0, 1)) {
            next.lock(piece, 0, rng);
        } else {
            next.current = Some(piece.moved(0, 1));
        }
        next
    }

    /// Rotate clockwise with the five-offset wall kick.
    pub fn rotate(&self) -> GameState {
        let mut next = self.successor();
        let Some(piece) = self.active_piece() else {
            return next;
        };

        if let Some(rotated) = piece.try_rotate(&self.board) {
            next.current = Some(rotated);
        }
        next
    }

    /// Drop straight to the lowest legal row and lock immediately.
    pub fn hard_drop<R: RandomSource + ?Sized>(&self, rng: &mut R) -> GameState {
        let mut next = self.successor();
        let Some(piece) = self.active_piece() else {
            return next;
        };

        let distance = piece.drop_distance(&self.board);
        next.lock(piece.moved(0, distance as i8), distance as u32, rng);
        next
    }

    /// The falling piece, only while the game is running.
    fn active_piece(&self) -> Option<Piece> {
        match self.status() {
            GameStatus::Active => self.current,
            _ => None,
        }
    }

    /// Copy of this state as the base for the next transition.
    fn successor(&self) -> GameState {
        GameState {
            last_lock: None,
            ..self.clone()
        }
    }

    fn shift(&self, dx: i8) -> GameState {
        let mut next = self.successor();
        let Some(piece) = self.active_piece() else {
            return next;
        };

        if !self.board.check_collision(&piece, (dx, 0)) {
            next.current = Some(piece.moved(dx, 0));
        }
        next
    }

    /// Merge, clear, score, promote the queued piece and check for game over.
    fn lock<R: RandomSource + ?Sized>(&mut self, piece: Piece, drop_distance: u32, rng: &mut R) {
        let cleared = self.board.merge_piece(&piece).clear_lines();
        let lines_cleared = cleared.lines_cleared();
        self.board = cleared.board;

        let level_before = self.level;
        self.lines = self.lines.saturating_add(lines_cleared as u32);
        self.level = calculate_level(self.lines);

        let line_clear_score = calculate_line_score(lines_cleared, level_before);
        let drop_bonus = calculate_drop_score(drop_distance);
        self.score = self
            .score
            .saturating_add(line_clear_score)
            .saturating_add(drop_bonus);

        let level_up = self.level > level_before;
        if level_up {
            self.drop_interval_ms = get_drop_interval_ms(self.initial_drop_ms, self.level);
            info!(
                "level {} reached, drop interval {}ms",
                self.level, self.drop_interval_ms
            );
        }

        trace!(
            "lock {} at ({}, {}): lines={} points={} bonus={}",
            piece.kind().as_str(),
            piece.x(),
            piece.y(),
            lines_cleared,
            line_clear_score,
            drop_bonus
        );

        let spawned = self
            .next
            .take()
            .unwrap_or_else(|| create_piece(pick_random_type(rng)));
        self.next = Some(create_piece(pick_random_type(rng)));

        if self.board.check_collision(&spawned, (0, 0)) {
            self.game_over = true;
            self.current = None;
            info!(
                "game over: score={} level={} lines={}",
                self.score, self.level, self.lines
            );
        } else {
            self.current = Some(spawned);
        }

        self.last_lock = Some(LockEvent {
            lines_cleared: lines_cleared as u32,
            line_clear_score,
            drop_bonus,
            level_up,
        });
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(INITIAL_DROP_MS)
    }
}
