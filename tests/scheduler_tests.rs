//! Drop loop tests, driven by paused tokio time

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use token_tetris::core::{create_piece, Board, GameController, GameState, PieceSequence};
use token_tetris::engine::GameSession;
use token_tetris::types::{GameStatus, PieceKind, Rgb, BOARD_WIDTH};

const TICK: Duration = Duration::from_millis(16);

fn o_session() -> GameSession<PieceSequence> {
    let controller = GameController::new(PieceSequence::new(vec![PieceKind::O]));
    tokio_test::assert_ok!(GameSession::with_controller(controller, TICK))
}

fn piece_y(session: &GameSession<PieceSequence>) -> Option<i8> {
    session.snapshot().current_piece.map(|piece| piece.y)
}

async fn sleep_ms(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

#[tokio::test(start_paused = true)]
async fn test_descends_once_per_interval() {
    let mut session = o_session();
    session.start_game();
    assert_eq!(piece_y(&session), Some(0));

    sleep_ms(990).await;
    assert_eq!(piece_y(&session), Some(0));

    sleep_ms(30).await;
    assert_eq!(piece_y(&session), Some(1));

    sleep_ms(1000).await;
    assert_eq!(piece_y(&session), Some(2));
}

#[tokio::test(start_paused = true)]
async fn test_no_descent_while_paused_and_resume_after() {
    let mut session = o_session();
    session.start_game();
    sleep_ms(1020).await;
    assert_eq!(piece_y(&session), Some(1));

    assert_eq!(session.toggle_pause(), GameStatus::Paused);
    assert!(!session.is_loop_running());
    sleep_ms(5000).await;
    assert_eq!(piece_y(&session), Some(1));

    // Resuming starts a fresh reference clock.
    assert_eq!(session.toggle_pause(), GameStatus::Active);
    sleep_ms(990).await;
    assert_eq!(piece_y(&session), Some(1));
    sleep_ms(50).await;
    assert_eq!(piece_y(&session), Some(2));
}

#[tokio::test(start_paused = true)]
async fn test_manual_move_down_keeps_loop_clock() {
    let mut session = o_session();
    session.start_game();

    sleep_ms(500).await;
    session.move_down();
    assert_eq!(piece_y(&session), Some(1));

    // The loop still fires on its original schedule.
    sleep_ms(520).await;
    assert_eq!(piece_y(&session), Some(2));
}

#[tokio::test(start_paused = true)]
async fn test_game_over_from_loop_fires_callback_once() {
    let mut board = Board::new();
    for y in 0..2 {
        for x in 0..BOARD_WIDTH as i8 - 1 {
            board.set(x, y, Some(Rgb::new(0x80, 0x80, 0x80)));
        }
    }
    let state = GameState::default()
        .with_board(board)
        .with_pieces(
            Some(create_piece(PieceKind::I).moved(0, 10)),
            Some(create_piece(PieceKind::O)),
        )
        .with_score(700);
    let controller = GameController::from_state(state, PieceSequence::new(vec![PieceKind::O]));
    let mut session = GameSession::with_controller(controller, TICK).unwrap();
    assert!(session.is_loop_running());

    let calls = Arc::new(AtomicU32::new(0));
    let last_score = Arc::new(AtomicU32::new(0));
    {
        let calls = Arc::clone(&calls);
        let last_score = Arc::clone(&last_score);
        session.on_game_over(move |score| {
            calls.fetch_add(1, Ordering::SeqCst);
            last_score.store(score, Ordering::SeqCst);
        });
    }

    // Nine descents to the floor, then the lock on the tenth.
    sleep_ms(11_000).await;
    assert_eq!(session.status(), GameStatus::GameOver);
    assert!(!session.is_loop_running());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(last_score.load(Ordering::SeqCst), 700);

    sleep_ms(5_000).await;
    session.hard_drop();
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // A new game brings the loop back.
    assert_eq!(session.start_game(), GameStatus::Active);
    assert!(session.is_loop_running());
    assert_eq!(session.snapshot().score, 0);
}

#[tokio::test(start_paused = true)]
async fn test_level_up_speeds_up_loop() {
    let mut board = Board::new();
    for y in 18..20 {
        for x in 0..BOARD_WIDTH as i8 {
            if x != 4 && x != 5 {
                board.set(x, y, Some(Rgb::new(0x80, 0x80, 0x80)));
            }
        }
    }
    let state = GameState::default()
        .with_board(board)
        .with_lines(9)
        .with_pieces(
            Some(create_piece(PieceKind::O).moved(0, 18)),
            Some(create_piece(PieceKind::O)),
        );
    let controller = GameController::from_state(state, PieceSequence::new(vec![PieceKind::O]));
    let session = GameSession::with_controller(controller, TICK).unwrap();

    // First forced descent locks the O and clears two rows.
    sleep_ms(1020).await;
    let snap = session.snapshot();
    assert_eq!(snap.level, 2);
    assert_eq!(snap.drop_interval_ms, 900);
    assert_eq!(piece_y(&session), Some(0));

    // Next descent comes 900ms after the lock.
    sleep_ms(890).await;
    assert_eq!(piece_y(&session), Some(0));
    sleep_ms(30).await;
    assert_eq!(piece_y(&session), Some(1));
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_stops_loop_but_keeps_state() {
    let mut session = o_session();
    session.start_game();
    session.shutdown();
    sleep_ms(3000).await;
    assert_eq!(session.status(), GameStatus::Active);
    assert_eq!(piece_y(&session), Some(0));
}
