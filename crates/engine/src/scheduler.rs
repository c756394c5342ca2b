//! Drop loop - forces the falling piece down once per drop interval
//!
//! The loop runs as a tokio task while the game is Active. It polls at a fixed
//! tick, compares a [`DropClock`] against the current drop interval and calls
//! `move_down` through the shared controller lock. It exits on its own as soon
//! as it sees any other status; [`GameSession`](crate::GameSession) respawns
//! it when the game becomes Active again.
//!
//! The game-over callback sits in its own [`GameOverHook`] slot and only runs
//! after the controller guard has been dropped, so it may lock the controller.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use log::debug;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::clock::DropClock;
use crate::core::{GameController, GameOverCallback, Outcome, RandomSource};
use crate::types::{GameAction, GameStatus};

pub type SharedController<R> = Arc<Mutex<GameController<R>>>;

/// Game-over callback slot shared by a session and its drop loop.
pub type GameOverHook = Arc<Mutex<Option<GameOverCallback>>>;

/// Lock the controller, recovering from a poisoned mutex.
///
/// The guarded value is always a whole state replaced in one assignment, so a
/// panic elsewhere cannot leave it half-updated.
pub fn lock_controller<R>(
    controller: &Mutex<GameController<R>>,
) -> MutexGuard<'_, GameController<R>> {
    controller.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Run the callback in `hook` with the final score.
///
/// Must be called without the controller lock held. The callback is taken out
/// of the slot while it runs; one registered in the meantime wins.
pub fn notify_game_over(hook: &Mutex<Option<GameOverCallback>>, score: u32) {
    let taken = hook.lock().unwrap_or_else(PoisonError::into_inner).take();
    let Some(mut callback) = taken else {
        return;
    };
    callback(score);
    hook.lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert(callback);
}

/// Spawn the drop loop on `runtime`.
pub fn spawn_drop_loop<R>(
    runtime: &Handle,
    controller: SharedController<R>,
    hook: GameOverHook,
    tick: Duration,
) -> JoinHandle<()>
where
    R: RandomSource + Send + 'static,
{
    runtime.spawn(run_drop_loop(controller, hook, tick))
}

/// Poll every `tick` until the game is no longer Active.
pub async fn run_drop_loop<R>(controller: SharedController<R>, hook: GameOverHook, tick: Duration)
where
    R: RandomSource + Send + 'static,
{
    let mut ticker = tokio::time::interval(tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut clock = DropClock::new();
    debug!("drop loop started (tick {:?})", tick);

    loop {
        ticker.tick().await;

        let outcome = {
            let mut game = lock_controller(&controller);
            match game.status() {
                GameStatus::Active if clock.is_due(game.state().drop_interval_ms()) => {
                    clock.reset();
                    game.step(GameAction::MoveDown)
                }
                status => Outcome {
                    status,
                    game_over: None,
                },
            }
        };

        if let Some(score) = outcome.game_over {
            notify_game_over(&hook, score);
        }
        if outcome.status != GameStatus::Active {
            debug!("drop loop stopped ({})", outcome.status.as_str());
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{create_piece, Board, GameState, PieceSequence};
    use crate::types::{PieceKind, Rgb, BOARD_WIDTH};

    fn shared(kinds: Vec<PieceKind>) -> SharedController<PieceSequence> {
        Arc::new(Mutex::new(GameController::new(PieceSequence::new(kinds))))
    }

    fn piece_y(controller: &SharedController<PieceSequence>) -> Option<i8> {
        lock_controller(controller)
            .state()
            .current_piece()
            .map(|piece| piece.y())
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_exits_when_idle() {
        let controller = shared(vec![PieceKind::O]);
        let handle = spawn_drop_loop(
            &Handle::current(),
            Arc::clone(&controller),
            GameOverHook::default(),
            Duration::from_millis(16),
        );
        tokio_test::assert_ok!(handle.await);
        assert_eq!(lock_controller(&controller).status(), GameStatus::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_descends_once_per_interval() {
        let controller = shared(vec![PieceKind::O]);
        lock_controller(&controller).start_game();
        let handle = spawn_drop_loop(
            &Handle::current(),
            Arc::clone(&controller),
            GameOverHook::default(),
            Duration::from_millis(16),
        );

        tokio::time::sleep(Duration::from_millis(990)).await;
        assert_eq!(piece_y(&controller), Some(0));

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(piece_y(&controller), Some(1));

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(piece_y(&controller), Some(2));

        // Pausing behind the loop's back makes it exit at the next tick.
        lock_controller(&controller).toggle_pause();
        tokio_test::assert_ok!(handle.await);
        assert_eq!(piece_y(&controller), Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_game_over_callback_runs_after_lock_is_released() {
        let mut board = Board::new();
        for y in 0..2 {
            for x in 0..BOARD_WIDTH as i8 - 1 {
                board.set(x, y, Some(Rgb::new(0x80, 0x80, 0x80)));
            }
        }
        let state = GameState::default()
            .with_board(board)
            .with_pieces(
                Some(create_piece(PieceKind::I).moved(0, 19)),
                Some(create_piece(PieceKind::O)),
            )
            .with_score(640);
        let controller = Arc::new(Mutex::new(GameController::from_state(
            state,
            PieceSequence::new(vec![PieceKind::O]),
        )));

        let seen = Arc::new(Mutex::new(Vec::new()));
        let hook = GameOverHook::default();
        {
            let game = Arc::downgrade(&controller);
            let seen = Arc::clone(&seen);
            *hook.lock().unwrap() = Some(Box::new(move |score| {
                let status = game
                    .upgrade()
                    .and_then(|game| game.try_lock().ok().map(|game| game.status()));
                seen.lock().unwrap().push((score, status));
            }));
        }

        let handle = spawn_drop_loop(
            &Handle::current(),
            Arc::clone(&controller),
            Arc::clone(&hook),
            Duration::from_millis(16),
        );
        tokio_test::assert_ok!(handle.await);

        assert_eq!(*seen.lock().unwrap(), vec![(640, Some(GameStatus::GameOver))]);
        // The callback is back in its slot for the next game.
        assert!(hook.lock().unwrap().is_some());
    }

    #[test]
    fn test_hook_registered_during_callback_wins() {
        let hook = GameOverHook::default();
        let calls = Arc::new(Mutex::new(Vec::new()));
        {
            let inner = Arc::clone(&hook);
            let calls = Arc::clone(&calls);
            *hook.lock().unwrap() = Some(Box::new(move |score| {
                calls.lock().unwrap().push(score);
                let calls = Arc::clone(&calls);
                *inner.lock().unwrap() = Some(Box::new(move |score| {
                    calls.lock().unwrap().push(score + 1);
                }));
            }));
        }

        notify_game_over(&hook, 10);
        notify_game_over(&hook, 20);
        assert_eq!(*calls.lock().unwrap(), vec![10, 21]);
    }

    #[test]
    fn test_poisoned_lock_is_recovered() {
        let controller = shared(vec![PieceKind::T]);
        let poison = Arc::clone(&controller);
        let _ = std::thread::spawn(move || {
            let _guard = poison.lock().unwrap();
            panic!("poison the controller");
        })
        .join();

        assert!(controller.is_poisoned());
        assert_eq!(lock_controller(&controller).start_game(), GameStatus::Active);
    }
}
