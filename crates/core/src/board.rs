//! Board module - manages the game grid
//!
//! The board is a 10x20 grid where each cell is empty or holds the color of
//! the piece that locked there. Uses a flat array so a board is a cheap `Copy`
//! value: every operation that changes the grid returns a new board and leaves
//! its input untouched.
//!
//! Coordinates: (x, y) where x ranges 0..9 (left to right), y ranges 0..19
//! (top to bottom).

use arrayvec::ArrayVec;

use crate::piece::Piece;
use crate::types::{Cell, BOARD_HEIGHT, BOARD_WIDTH};

/// Total number of cells on the board
const BOARD_SIZE: usize = (BOARD_WIDTH as usize) * (BOARD_HEIGHT as usize);

/// The game board - 10 columns x 20 rows using flat array storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [Cell; BOARD_SIZE],
}

/// Outcome of [`Board::clear_lines`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineClear {
    /// Board after removing full rows and refilling from the top.
    pub board: Board,
    /// Indices (in the input board) of the removed rows, bottom to top.
    pub rows: ArrayVec<u8, { BOARD_HEIGHT as usize }>,
}

impl LineClear {
    pub fn lines_cleared(&self) -> usize {
        self.rows.len()
    }
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_SIZE],
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH as i8 || y < 0 || y >= BOARD_HEIGHT as i8 {
            return None;
        }
        Some((y as usize) * (BOARD_WIDTH as usize) + (x as usize))
    }

    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    pub fn height(&self) -> u8 {
        BOARD_HEIGHT
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// One row of cells, counted from the top; `None` below the floor.
    pub fn row(&self, y: usize) -> Option<&[Cell]> {
        self.rows().nth(y)
    }

    /// Iterate rows from top to bottom.
    pub fn rows(&self) -> impl DoubleEndedIterator<Item = &[Cell]> + ExactSizeIterator {
        self.cells.chunks_exact(BOARD_WIDTH as usize)
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        self.row(y)
            .is_some_and(|row| row.iter().all(|cell| cell.is_some()))
    }

    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Whether `piece`, shifted by `offset`, would overlap a wall, the floor
    /// or an occupied cell.
    ///
    /// Sub-cells above the board (y < 0) never collide with content, so pieces
    /// can poke out of the top while spawning; the walls and floor are still
    /// enforced for them.
    pub fn check_collision(&self, piece: &Piece, offset: (i8, i8)) -> bool {
        let (ox, oy) = offset;
        piece.cells().any(|(x, y)| {
            let x = x + ox;
            let y = y + oy;
            if x < 0 || x >= BOARD_WIDTH as i8 || y >= BOARD_HEIGHT as i8 {
                return true;
            }
            y >= 0 && self.is_occupied(x, y)
        })
    }

    /// Return a new board with `piece` written in at its position, in its color.
    ///
    /// Sub-cells outside the grid are dropped.
    pub fn merge_piece(&self, piece: &Piece) -> Board {
        let mut merged = *self;
        for (x, y) in piece.cells() {
            merged.set(x, y, Some(piece.color()));
        }
        merged
    }

    /// Remove every full row and refill the same number of empty rows at the top.
    ///
    /// Uses a bottom-up two-pointer pass over a fresh board.
    pub fn clear_lines(&self) -> LineClear {
        let width = BOARD_WIDTH as usize;
        let mut out = Board::new();
        let mut rows = ArrayVec::new();
        let mut write_y = BOARD_HEIGHT as usize;

        for (read_y, row) in self.rows().enumerate().rev() {
            if row.iter().all(|cell| cell.is_some()) {
                rows.push(read_y as u8);
            } else {
                write_y -= 1;
                let dst = write_y * width;
                out.cells[dst..dst + width].copy_from_slice(row);
            }
        }

        LineClear { board: out, rows }
    }

    /// Convert to a fixed 2D grid (top row first)
    pub fn to_grid(&self) -> [[Cell; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize] {
        let mut grid = [[None; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize];
        for (out, row) in grid.iter_mut().zip(self.rows()) {
            out.copy_from_slice(row);
        }
        grid
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Free-function form of [`Board::check_collision`].
pub fn check_collision(piece: &Piece, board: &Board, offset: (i8, i8)) -> bool {
    board.check_collision(piece, offset)
}

/// Free-function form of [`Board::merge_piece`].
pub fn merge_piece_to_board(piece: &Piece, board: &Board) -> Board {
    board.merge_piece(piece)
}

/// Free-function form of [`Board::clear_lines`].
pub fn clear_lines(board: &Board) -> LineClear {
    board.clear_lines()
}
