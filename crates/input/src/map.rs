//! Keyboard bindings for the terminal runner.
//!
//! | Action      | Keys                      |
//! |-------------|---------------------------|
//! | moveLeft    | Left, `h`, `a`            |
//! | moveRight   | Right, `l`, `d`           |
//! | moveDown    | Down, `j`, `s`            |
//! | rotate      | Up, `k`, `w`              |
//! | hardDrop    | Space                     |
//! | togglePause | `p`, Esc                  |
//! | startGame   | Enter, `n`                |
//! | quit        | `q`, Ctrl-C               |
//!
//! Letters match in either case. Any other chord with Ctrl is ignored.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::types::GameAction;

/// The game action bound to `key`, if any.
pub fn handle_key_event(key: KeyEvent) -> Option<GameAction> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }

    let action = match key.code {
        KeyCode::Left => GameAction::MoveLeft,
        KeyCode::Right => GameAction::MoveRight,
        KeyCode::Down => GameAction::MoveDown,
        KeyCode::Up => GameAction::Rotate,
        KeyCode::Esc => GameAction::TogglePause,
        KeyCode::Enter => GameAction::StartGame,
        KeyCode::Char(c) => return letter_action(c.to_ascii_lowercase()),
        _ => return None,
    };
    Some(action)
}

fn letter_action(c: char) -> Option<GameAction> {
    let action = match c {
        'h' | 'a' => GameAction::MoveLeft,
        'l' | 'd' => GameAction::MoveRight,
        'j' | 's' => GameAction::MoveDown,
        'k' | 'w' => GameAction::Rotate,
        ' ' => GameAction::HardDrop,
        'p' => GameAction::TogglePause,
        'n' => GameAction::StartGame,
        _ => return None,
    };
    Some(action)
}

/// `q` in either case, or Ctrl-C.
pub fn should_quit(key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char(c) if key.modifiers.contains(KeyModifiers::CONTROL) => {
            c.eq_ignore_ascii_case(&'c')
        }
        KeyCode::Char(c) => c.eq_ignore_ascii_case(&'q'),
        _ => false,
    }
}
