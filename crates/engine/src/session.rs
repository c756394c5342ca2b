//! Game session - the controller shared between callers and the drop loop
//!
//! A [`GameSession`] owns the [`GameController`] behind a mutex and keeps the
//! drop loop in step with the game status: after every action the loop is
//! started if the game is Active and aborted otherwise. The game-over callback
//! runs once the controller lock has been released, whichever side ended the
//! game.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use anyhow::{Context, Result};
use log::debug;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::config::EngineConfig;
use crate::core::{GameController, GameSnapshot, Outcome, RandomSource, SimpleRng};
use crate::scheduler::{
    lock_controller, notify_game_over, spawn_drop_loop, GameOverHook, SharedController,
};
use crate::types::{GameAction, GameStatus};

pub struct GameSession<R = SimpleRng>
where
    R: RandomSource + Send + 'static,
{
    controller: SharedController<R>,
    game_over: GameOverHook,
    runtime: Handle,
    tick: Duration,
    drop_loop: Option<JoinHandle<()>>,
}

impl GameSession<SimpleRng> {
    /// Idle session seeded and timed from `config`.
    ///
    /// Fails when called outside a tokio runtime.
    pub fn new(config: &EngineConfig) -> Result<Self> {
        let controller =
            GameController::with_initial_drop(SimpleRng::new(config.seed), config.initial_drop_ms);
        Self::with_controller(controller, config.tick())
    }
}

impl<R> GameSession<R>
where
    R: RandomSource + Send + 'static,
{
    /// Wrap an existing controller. An Active controller gets its drop loop
    /// right away, and a callback already set on it is moved to the session.
    pub fn with_controller(mut controller: GameController<R>, tick: Duration) -> Result<Self> {
        let runtime = Handle::try_current().context("game session needs a tokio runtime")?;
        let status = controller.status();
        let game_over = Arc::new(Mutex::new(controller.take_game_over_callback()));
        let mut session = Self {
            controller: Arc::new(Mutex::new(controller)),
            game_over,
            runtime,
            tick,
            drop_loop: None,
        };
        session.sync_loop(status);
        Ok(session)
    }

    /// Register the callback invoked with the final score when a game ends.
    pub fn on_game_over(&self, callback: impl FnMut(u32) + Send + 'static) {
        *self.game_over.lock().unwrap_or_else(PoisonError::into_inner) = Some(Box::new(callback));
    }

    pub fn dispatch(&mut self, action: GameAction) -> GameStatus {
        let Outcome { status, game_over } = lock_controller(&self.controller).step(action);
        if let Some(score) = game_over {
            notify_game_over(&self.game_over, score);
        }
        if action == GameAction::StartGame {
            // A new game always gets a fresh reference clock.
            self.stop_loop();
        }
        self.sync_loop(status);
        status
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

    pub fn snapshot(&self) -> GameSnapshot {
        lock_controller(&self.controller).snapshot()
    }

    pub fn status(&self) -> GameStatus {
        lock_controller(&self.controller).status()
    }

    /// Whether a drop loop task is currently alive.
    pub fn is_loop_running(&self) -> bool {
        self.drop_loop
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    /// Stop the drop loop. The game state is left as it is.
    pub fn shutdown(&mut self) {
        self.stop_loop();
    }

    fn sync_loop(&mut self, status: GameStatus) {
        if status == GameStatus::Active {
            if !self.is_loop_running() {
                debug!("spawning drop loop");
                self.drop_loop = Some(spawn_drop_loop(
                    &self.runtime,
                    Arc::clone(&self.controller),
                    Arc::clone(&self.game_over),
                    self.tick,
                ));
            }
        } else {
            self.stop_loop();
        }
    }

    fn stop_loop(&mut self) {
        if let Some(handle) = self.drop_loop.take() {
            handle.abort();
        }
    }
}

impl<R> fmt::Debug for GameSession<R>
where
    R: RandomSource + Send + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameSession")
            .field("status", &self.status())
            .field("tick", &self.tick)
            .field("loop_running", &self.is_loop_running())
            .finish_non_exhaustive()
    }
}

impl<R> Drop for GameSession<R>
where
    R: RandomSource + Send + 'static,
{
    fn drop(&mut self) {
        self.stop_loop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_game_over_callback_can_read_the_game() {
        use crate::core::{create_piece, Board, GameState, PieceSequence};
        use crate::types::{PieceKind, Rgb, BOARD_WIDTH};

        let mut board = Board::new();
        for y in 0..2 {
            for x in 0..BOARD_WIDTH as i8 - 1 {
                board.set(x, y, Some(Rgb::new(3, 3, 3)));
            }
        }
        let state = GameState::default()
            .with_board(board)
            .with_pieces(
                Some(create_piece(PieceKind::I).moved(0, 10)),
                Some(create_piece(PieceKind::O)),
            )
            .with_score(200);
        let mut controller =
            GameController::from_state(state, PieceSequence::new(vec![PieceKind::O]));

        let seen = Arc::new(Mutex::new(Vec::new()));
        {
            let seen = Arc::clone(&seen);
            controller.set_game_over_callback(move |score| seen.lock().unwrap().push(score));
        }
        let mut session = GameSession::with_controller(controller, Duration::from_millis(16))
            .unwrap();
        {
            let game = Arc::downgrade(&session.controller);
            let seen = Arc::clone(&seen);
            session.on_game_over(move |score| {
                // Blocking lock: the session has already let go of it.
                let game = game.upgrade().unwrap();
                let final_score = lock_controller(&game).state().score();
                seen.lock().unwrap().push(score + final_score);
            });
        }

        assert_eq!(session.hard_drop(), GameStatus::GameOver);
        // 9 rows of hard drop bonus; the replaced callback never ran.
        assert_eq!(*seen.lock().unwrap(), vec![218 + 218]);
    }

    #[test]
    fn test_new_outside_runtime_fails() {
        tokio_test::assert_err!(GameSession::new(&EngineConfig::default()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_follows_status() {
        let mut session = GameSession::new(&EngineConfig::default()).unwrap();
        assert_eq!(session.status(), GameStatus::Idle);
        assert!(!session.is_loop_running());

        session.start_game();
        assert!(session.is_loop_running());

        session.toggle_pause();
        assert!(!session.is_loop_running());

        session.toggle_pause();
        assert!(session.is_loop_running());

        session.shutdown();
        assert!(!session.is_loop_running());
        assert_eq!(session.status(), GameStatus::Active);
    }
}
