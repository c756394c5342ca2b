//! Catalog module - the seven tetromino definitions
//!
//! Each definition pairs a shape matrix with a color and a display token (a
//! short label rendered inside every occupied cell). The catalog is a static
//! table; pieces copy what they need out of it and rotation always builds a
//! new [`Shape`].

use crate::types::{PieceKind, Rgb};

/// Largest matrix side of any tetromino orientation.
pub const SHAPE_MAX: usize = 4;

/// Binary shape matrix of a tetromino (row-major, at most 4x4).
///
/// Only the top-left `rows x cols` region is meaningful; everything outside it
/// is always empty. Shapes are built by the catalog alone; callers get them
/// through [`get_shape`] and derive the other orientations with
/// [`Shape::rotated_cw`].
///
/// ```compile_fail
/// use token_tetris_core::Shape;
///
/// let _ = Shape::new(5, 1, [[1; 4]; 4]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    rows: u8,
    cols: u8,
    cells: [[bool; SHAPE_MAX]; SHAPE_MAX],
}

impl Shape {
    /// Build a shape from a `rows x cols` matrix of 0/1 values.
    pub(crate) const fn new(rows: u8, cols: u8, bits: [[u8; SHAPE_MAX]; SHAPE_MAX]) -> Self {
        let mut cells = [[false; SHAPE_MAX]; SHAPE_MAX];
        let mut r = 0;
        while r < rows as usize {
            let mut c = 0;
            while c < cols as usize {
                cells[r][c] = bits[r][c] != 0;
                c += 1;
            }
            r += 1;
        }
        Self { rows, cols, cells }
    }

    /// Number of matrix rows.
    pub fn height(&self) -> u8 {
        self.rows
    }

    /// Number of matrix columns.
    pub fn width(&self) -> u8 {
        self.cols
    }

    pub fn is_filled(&self, col: u8, row: u8) -> bool {
        col < self.cols && row < self.rows && self.cells[row as usize][col as usize]
    }

    /// Occupied sub-cells as `(dx, dy)` offsets from the top-left anchor.
    pub fn cells(&self) -> impl Iterator<Item = (i8, i8)> + '_ {
        (0..self.rows).flat_map(move |r| {
            (0..self.cols)
                .filter(move |&c| self.cells[r as usize][c as usize])
                .map(move |c| (c as i8, r as i8))
        })
    }

    /// Rotate 90° clockwise: transpose, then reverse each resulting row.
    pub fn rotated_cw(&self) -> Shape {
        let mut cells = [[false; SHAPE_MAX]; SHAPE_MAX];
        let rows = self.cols as usize;
        let cols = self.rows as usize;
        for (r, out_row) in cells.iter_mut().enumerate().take(rows) {
            for (c, out) in out_row.iter_mut().enumerate().take(cols) {
                *out = self.cells[cols - 1 - c][r];
            }
        }
        Shape {
            rows: self.cols,
            cols: self.rows,
            cells,
        }
    }

    /// The matrix as nested rows of 0/1 (for snapshots and display).
    pub fn matrix(&self) -> Vec<Vec<u8>> {
        (0..self.rows as usize)
            .map(|r| {
                (0..self.cols as usize)
                    .map(|c| u8::from(self.cells[r][c]))
                    .collect()
            })
            .collect()
    }
}

/// Static catalog entry for one tetromino type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TetrominoDef {
    pub kind: PieceKind,
    pub shape: Shape,
    pub color: Rgb,
    pub token: &'static str,
}

/// Catalog table, indexed by [`PieceKind::index`].
pub static CATALOG: [TetrominoDef; 7] = [
    TetrominoDef {
        kind: PieceKind::I,
        shape: Shape::new(1, 4, [[1, 1, 1, 1], [0; 4], [0; 4], [0; 4]]),
        color: Rgb::new(0x00, 0xf0, 0xf0),
        token: "fn",
    },
    TetrominoDef {
        kind: PieceKind::O,
        shape: Shape::new(2, 2, [[1, 1, 0, 0], [1, 1, 0, 0], [0; 4], [0; 4]]),
        color: Rgb::new(0xf0, 0xf0, 0x00),
        token: "{}",
    },
    TetrominoDef {
        kind: PieceKind::T,
        shape: Shape::new(2, 3, [[0, 1, 0, 0], [1, 1, 1, 0], [0; 4], [0; 4]]),
        color: Rgb::new(0xa0, 0x00, 0xf0),
        token: "let",
    },
    TetrominoDef {
        kind: PieceKind::S,
        shape: Shape::new(2, 3, [[0, 1, 1, 0], [1, 1, 0, 0], [0; 4], [0; 4]]),
        color: Rgb::new(0x00, 0xf0, 0x00),
        token: "mut",
    },
    TetrominoDef {
        kind: PieceKind::Z,
        shape: Shape::new(2, 3, [[1, 1, 0, 0], [0, 1, 1, 0], [0; 4], [0; 4]]),
        color: Rgb::new(0xf0, 0x00, 0x00),
        token: "use",
    },
    TetrominoDef {
        kind: PieceKind::L,
        shape: Shape::new(2, 3, [[0, 0, 1, 0], [1, 1, 1, 0], [0; 4], [0; 4]]),
        color: Rgb::new(0xf0, 0xa0, 0x00),
        token: "pub",
    },
    TetrominoDef {
        kind: PieceKind::J,
        shape: Shape::new(2, 3, [[1, 0, 0, 0], [1, 1, 1, 0], [0; 4], [0; 4]]),
        color: Rgb::new(0x00, 0x00, 0xf0),
        token: "impl",
    },
];

/// Look up the catalog entry for a kind.
pub fn definition(kind: PieceKind) -> &'static TetrominoDef {
    &CATALOG[kind.index()]
}

/// Spawn shape for a kind.
pub fn get_shape(kind: PieceKind) -> Shape {
    definition(kind).shape
}
