use serde::Serialize;

use crate::game_state::{GameState, LockEvent};
use crate::piece::Piece;
use crate::types::{Cell, GameStatus, PieceKind, Rgb, BOARD_HEIGHT, BOARD_WIDTH};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PieceSnapshot {
    pub kind: PieceKind,
    pub shape: Vec<Vec<u8>>,
    pub x: i8,
    pub y: i8,
    pub color: Rgb,
    pub token: &'static str,
}

impl PieceSnapshot {
    /// Absolute board coordinates of the occupied sub-cells.
    pub fn cells(&self) -> impl Iterator<Item = (i8, i8)> + '_ {
        self.shape.iter().enumerate().flat_map(move |(dy, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, &bit)| bit != 0)
                .map(move |(dx, _)| (self.x + dx as i8, self.y + dy as i8))
        })
    }
}

impl From<&Piece> for PieceSnapshot {
    fn from(value: &Piece) -> Self {
        Self {
            kind: value.kind(),
            shape: value.shape().matrix(),
            x: value.x(),
            y: value.y(),
            color: value.color(),
            token: value.token(),
        }
    }
}

/// Read-only view of a game, as handed to renderers and other observers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub board: [[Cell; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
    pub current_piece: Option<PieceSnapshot>,
    pub next_piece: Option<PieceSnapshot>,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub game_over: bool,
    pub is_paused: bool,
    pub status: GameStatus,
    pub drop_interval_ms: u32,
    pub last_lock: Option<LockEvent>,
}

impl From<&GameState> for GameSnapshot {
    fn from(state: &GameState) -> Self {
        Self {
            board: state.board().to_grid(),
            current_piece: state.current_piece().map(PieceSnapshot::from),
            next_piece: state.next_piece().map(PieceSnapshot::from),
            score: state.score(),
            level: state.level(),
            lines: state.lines(),
            game_over: state.game_over(),
            is_paused: state.paused(),
            status: state.status(),
            drop_interval_ms: state.drop_interval_ms(),
            last_lock: state.last_lock(),
        }
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self::from(&GameState::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::PieceSequence;

    #[test]
    fn snapshot_mirrors_state() {
        let mut seq = PieceSequence::new(vec![PieceKind::L, PieceKind::S]);
        let state = GameState::default().start(&mut seq);
        let snap = GameSnapshot::from(&state);

        assert_eq!(snap.status, GameStatus::Active);
        assert_eq!(snap.current_piece.as_ref().unwrap().kind, PieceKind::L);
        assert_eq!(snap.next_piece.as_ref().unwrap().kind, PieceKind::S);
        assert_eq!(snap.level, 1);
        assert_eq!(snap.drop_interval_ms, 1000);
    }

    #[test]
    fn piece_snapshot_cells_match_piece() {
        let piece = crate::piece::create_piece(PieceKind::J).moved(1, 4);
        let snap = PieceSnapshot::from(&piece);
        let from_snap: Vec<_> = snap.cells().collect();
        let from_piece: Vec<_> = piece.cells().collect();
        assert_eq!(from_snap, from_piece);
    }

    #[test]
    fn snapshot_serializes_with_camel_case_keys() {
        let mut seq = PieceSequence::new(vec![PieceKind::I]);
        let state = GameState::default().start(&mut seq);
        let json = serde_json::to_value(GameSnapshot::from(&state)).unwrap();

        for key in [
            "board",
            "currentPiece",
            "nextPiece",
            "score",
            "level",
            "lines",
            "gameOver",
            "isPaused",
        ] {
            assert!(json.get(key).is_some(), "missing {}", key);
        }
        assert_eq!(json["status"], "active");
        assert_eq!(json["currentPiece"]["color"], "#00f0f0");
        assert_eq!(json["currentPiece"]["token"], "fn");
        assert_eq!(json["board"].as_array().unwrap().len(), 20);
        assert!(json["board"][19][0].is_null());
    }
}
