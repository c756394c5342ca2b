//! Piece module - the falling tetromino and its movement rules
//!
//! A [`Piece`] is a value: every move or rotation returns a new piece, and the
//! board is only ever consulted, never changed, while a piece is in flight.

use crate::board::Board;
use crate::catalog::{definition, Shape};
use crate::types::{PieceKind, Rgb, BOARD_HEIGHT, BOARD_WIDTH, WALL_KICK_OFFSETS};

/// A tetromino with its own shape, position, color and display token
///
/// Pieces only come out of the catalog: the sole constructor is
/// [`Piece::new`], and every other instance is derived by moving or rotating
/// one.
///
/// ```compile_fail
/// use token_tetris_core::{create_piece, Piece};
/// use token_tetris_types::PieceKind;
///
/// let _ = Piece { x: 0, ..create_piece(PieceKind::I) };
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    kind: PieceKind,
    shape: Shape,
    x: i8,
    y: i8,
    color: Rgb,
    token: &'static str,
}

impl Piece {
    /// Instantiate `kind` from the catalog, centered horizontally on row 0.
    pub fn new(kind: PieceKind) -> Self {
        let def = definition(kind);
        let x = (BOARD_WIDTH as i8 - def.shape.width() as i8) / 2;
        Self {
            kind,
            shape: def.shape,
            x,
            y: 0,
            color: def.color,
            token: def.token,
        }
    }

    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    /// Current orientation.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Column of the shape's top-left anchor.
    pub fn x(&self) -> i8 {
        self.x
    }

    /// Row of the shape's top-left anchor.
    pub fn y(&self) -> i8 {
        self.y
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    /// Display label drawn inside each occupied cell.
    pub fn token(&self) -> &'static str {
        self.token
    }

    /// Absolute board coordinates of the occupied sub-cells.
    pub fn cells(&self) -> impl Iterator<Item = (i8, i8)> + '_ {
        self.shape.cells().map(move |(dx, dy)| (self.x + dx, self.y + dy))
    }

    /// The same piece shifted by `(dx, dy)`.
    pub fn moved(&self, dx: i8, dy: i8) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// The same piece, rotated clockwise in place (no collision check).
    pub fn rotated(&self) -> Self {
        Self {
            shape: self.shape.rotated_cw(),
            ..*self
        }
    }

    /// Rotate clockwise, trying the horizontal kicks `0, -1, +1, -2, +2`.
    ///
    /// Returns the first rotated placement that fits, or `None` if all five
    /// collide.
    pub fn try_rotate(&self, board: &Board) -> Option<Self> {
        let rotated = self.rotated();
        WALL_KICK_OFFSETS
            .iter()
            .find(|&&dx| !board.check_collision(&rotated, (dx, 0)))
            .map(|&dx| rotated.moved(dx, 0))
    }

    /// Largest `d` such that the piece still fits `d` rows further down.
    ///
    /// Bounded by the board height: the floor always collides.
    pub fn drop_distance(&self, board: &Board) -> u8 {
        let mut d: i8 = 0;
        while d < BOARD_HEIGHT as i8 && !board.check_collision(self, (0, d + 1)) {
            d += 1;
        }
        d as u8
    }
}

/// Instantiate a catalog piece at its spawn position.
pub fn create_piece(kind: PieceKind) -> Piece {
    Piece::new(kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_is_centered_on_top_row() {
        assert_eq!(create_piece(PieceKind::I).x, 3);
        assert_eq!(create_piece(PieceKind::O).x, 4);
        assert_eq!(create_piece(PieceKind::T).x, 3);
        for kind in PieceKind::ALL {
            assert_eq!(create_piece(kind).y, 0);
        }
    }

    #[test]
    fn piece_carries_catalog_data() {
        let piece = create_piece(PieceKind::Z);
        let def = definition(PieceKind::Z);
        assert_eq!(piece.shape, def.shape);
        assert_eq!(piece.color, def.color);
        assert_eq!(piece.token, def.token);
    }

    #[test]
    fn rotate_in_open_space_needs_no_kick() {
        let board = Board::new();
        let piece = create_piece(PieceKind::T).moved(0, 5);
        let rotated = piece.try_rotate(&board).unwrap();
        assert_eq!((rotated.x, rotated.y), (piece.x, piece.y));
        assert_eq!(rotated.shape, piece.shape.rotated_cw());
    }

    #[test]
    fn four_rotations_in_open_space_restore_piece() {
        let board = Board::new();
        let start = create_piece(PieceKind::S).moved(0, 8);
        let mut piece = start;
        for _ in 0..4 {
            piece = piece.try_rotate(&board).unwrap();
        }
        assert_eq!(piece, start);
    }

    #[test]
    fn rotation_kicks_off_right_wall() {
        let board = Board::new();
        // Vertical I one column off the right wall: the bar needs x <= 6.
        let vertical = create_piece(PieceKind::I).rotated().moved(5, 10);
        let rotated = vertical.try_rotate(&board).unwrap();
        assert_eq!(rotated.x, 6);
        assert_eq!(rotated.y, 10);
        assert_eq!(rotated.shape.width(), 4);
    }

    #[test]
    fn rotation_flush_against_right_wall_fails() {
        let board = Board::new();
        let vertical = create_piece(PieceKind::I).rotated().moved(6, 10);
        // Kicks stop at two columns, so x=7 (the closest) still overflows.
        assert_eq!(vertical.try_rotate(&board), None);
    }

    #[test]
    fn rotation_rejected_when_every_kick_collides() {
        let mut board = Board::new();
        let vertical = create_piece(PieceKind::I).rotated().moved(-3, 10);
        // Block columns 1 and 4 on the rotation row so no horizontal placement
        // at x in {-2, -1, 0, 1, 2} fits.
        board.set(1, 10, Some(Rgb::new(9, 9, 9)));
        board.set(4, 10, Some(Rgb::new(9, 9, 9)));
        assert!(!board.check_collision(&vertical, (0, 0)));
        assert_eq!(vertical.try_rotate(&board), None);
    }

    #[test]
    fn kick_order_prefers_left_before_right() {
        let mut board = Board::new();
        // T at x=3,y=5; rotated shape occupies x..=x+1. Block the unkicked spot.
        let piece = create_piece(PieceKind::T).moved(0, 5);
        board.set(3, 5, Some(Rgb::new(9, 9, 9)));
        let rotated = piece.try_rotate(&board).unwrap();
        assert_eq!(rotated.x, piece.x - 1);
    }

    #[test]
    fn drop_distance_on_empty_board() {
        let board = Board::new();
        assert_eq!(create_piece(PieceKind::I).drop_distance(&board), 19);
        assert_eq!(create_piece(PieceKind::O).drop_distance(&board), 18);
    }
}
