//! Controller module - single owner of the live game
//!
//! [`GameController`] holds the current [`GameState`] and the random source,
//! runs every action through the pure reducer and swaps in the result. Callers
//! only ever get `&GameState` or an owned [`GameSnapshot`] back.
//!
//! [`GameController::dispatch`] runs the game-over callback itself. Owners that
//! share the controller behind a lock use [`GameController::step`] instead and
//! run their callback once the lock is released.

use std::fmt;

use crate::game_state::GameState;
use crate::rng::{RandomSource, SimpleRng};
use crate::snapshot::GameSnapshot;
use crate::types::{GameAction, GameStatus};

/// Called once with the final score when a game ends.
pub type GameOverCallback = Box<dyn FnMut(u32) + Send>;

/// Result of one action, as reported by [`GameController::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub status: GameStatus,
    /// Final score, set only by the action that ended the game.
    pub game_over: Option<u32>,
}

pub struct GameController<R = SimpleRng> {
    state: GameState,
    rng: R,
    on_game_over: Option<GameOverCallback>,
}

impl<R: RandomSource> GameController<R> {
    /// Idle controller with the default level-1 drop interval.
    pub fn new(rng: R) -> Self {
        Self::from_state(GameState::default(), rng)
    }

    pub fn with_initial_drop(rng: R, initial_drop_ms: u32) -> Self {
        Self::from_state(GameState::new(initial_drop_ms), rng)
    }

    /// Resume from an existing state (replays, hand-built positions).
    pub fn from_state(state: GameState, rng: R) -> Self {
        Self {
            state,
            rng,
            on_game_over: None,
        }
    }

    /// Register the hook invoked with the final score on every game over.
    pub fn set_game_over_callback(&mut self, callback: impl FnMut(u32) + Send + 'static) {
        self.on_game_over = Some(Box::new(callback));
    }

    /// Remove the registered hook, leaving the controller without one.
    pub fn take_game_over_callback(&mut self) -> Option<GameOverCallback> {
        self.on_game_over.take()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn status(&self) -> GameStatus {
        self.state.status()
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::from(&self.state)
    }

    /// Apply an action and replace the state with the result.
    ///
    /// Does not run the game-over callback.
    pub fn step(&mut self, action: GameAction) -> Outcome {
        let next = self.state.apply(action, &mut self.rng);
        let ended = !self.state.game_over() && next.game_over();
        self.state = next;

        Outcome {
            status: self.state.status(),
            game_over: ended.then(|| self.state.score()),
        }
    }

    /// [`step`](Self::step), then run the game-over callback if this action
    /// ended the game.
    pub fn dispatch(&mut self, action: GameAction) -> GameStatus {
        let outcome = self.step(action);
        if let (Some(score), Some(callback)) = (outcome.game_over, self.on_game_over.as_mut()) {
            callback(score);
        }
        outcome.status
    }

    pub fn start_game(&mut self) -> GameStatus {
        self.dispatch(GameAction::StartGame)
    }

    pub fn toggle_pause(&mut self) -> GameStatus {
        self.dispatch(GameAction::TogglePause)
    }

    pub fn move_left(&mut self) -> GameStatus {
        self.dispatch(GameAction::MoveLeft)
    }

    pub fn move_right(&mut self) -> GameStatus {
        self.dispatch(GameAction::MoveRight)
    }

    pub fn move_down(&mut self) -> GameStatus {
        self.dispatch(GameAction::MoveDown)
    }

    pub fn rotate(&mut self) -> GameStatus {
        self.dispatch(GameAction::Rotate)
    }

    pub fn hard_drop(&mut self) -> GameStatus {
        self.dispatch(GameAction::HardDrop)
    }
}

impl Default for GameController<SimpleRng> {
    fn default() -> Self {
        Self::new(SimpleRng::default())
    }
}

impl<R> fmt::Debug for GameController<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameController")
            .field("state", &self.state)
            .field("has_game_over_callback", &self.on_game_over.is_some())
            .finish_non_exhaustive()
    }
}
