//! Board module - manages one player's 8x8 grid
//!
//! The board is an 8x8 occupancy grid. Uses a flat array for better cache locality and
//! zero-allocation. Coordinates: (x, y) where x is the column (0..7, left to right) and
//! y is the row (0..7, top to bottom).
//!
//! # Wire encoding
//!
//! [`Board::encode`] produces a 64-byte ASCII string, row-major (`y * 8 + x`), one byte per
//! cell: `'0'` for empty, `'1'` for occupied. [`Board::decode`] is its exact inverse and
//! rejects any other length or byte.

use arrayvec::ArrayVec;
use thiserror::Error;

use crate::pieces::Shape;
use crate::types::{BOARD_CELLS, BOARD_SIZE};

/// Full row and column indices found on a board
pub type LineSet = ArrayVec<usize, { BOARD_SIZE as usize }>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardDecodeError {
    #[error("encoded board has {0} cells, expected 64")]
    Length(usize),
    #[error("invalid cell byte {byte:#04x} at index {index}")]
    Cell { index: usize, byte: u8 },
}

/// The game board - 8 columns x 8 rows using flat array storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    /// Flat array of cells, row-major order (y * SIZE + x)
    cells: [bool; BOARD_CELLS],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [false; BOARD_CELLS],
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= BOARD_SIZE as i8 || y < 0 || y >= BOARD_SIZE as i8 {
            return None;
        }
        Some((y as usize) * (BOARD_SIZE as usize) + (x as usize))
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<bool> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, occupied: bool) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = occupied;
                true
            }
            None => false,
        }
    }

    /// Check if position is within bounds and empty
    pub fn is_valid(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(false))
    }

    /// Check if position is within bounds and filled
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(true))
    }

    /// Whether `shape` fits with its top-left corner at (x, y).
    ///
    /// Every occupied cell of the shape must land in bounds on an empty cell. A shape with no
    /// occupied cells always fits.
    pub fn can_place(&self, shape: &Shape, x: i8, y: i8) -> bool {
        shape
            .offsets()
            .all(|(dx, dy)| self.is_valid(x + dx, y + dy))
    }

    /// Stamp `shape` onto the board at (x, y).
    ///
    /// Callers must check [`Board::can_place`] first. Cells that would fall out of bounds are
    /// skipped rather than wrapped.
    pub fn place(&mut self, shape: &Shape, x: i8, y: i8) {
        debug_assert!(self.can_place(shape, x, y));
        for (dx, dy) in shape.offsets() {
            self.set(x + dx, y + dy, true);
        }
    }

    /// Whether `shape` fits at any of the 64 origins
    pub fn fits_anywhere(&self, shape: &Shape) -> bool {
        let size = BOARD_SIZE as i8;
        (0..size).any(|y| (0..size).any(|x| self.can_place(shape, x, y)))
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= BOARD_SIZE as usize {
            return false;
        }
        let start = y * BOARD_SIZE as usize;
        let end = start + BOARD_SIZE as usize;
        self.cells[start..end].iter().all(|&cell| cell)
    }

    /// Check if a column is completely filled
    pub fn is_col_full(&self, x: usize) -> bool {
        if x >= BOARD_SIZE as usize {
            return false;
        }
        let width = BOARD_SIZE as usize;
        (0..BOARD_SIZE as usize).all(|y| self.cells[y * width + x])
    }

    /// Indices of all full rows, top to bottom
    pub fn full_rows(&self) -> LineSet {
        (0..BOARD_SIZE as usize)
            .filter(|&y| self.is_row_full(y))
            .collect()
    }

    /// Indices of all full columns, left to right
    pub fn full_cols(&self) -> LineSet {
        (0..BOARD_SIZE as usize)
            .filter(|&x| self.is_col_full(x))
            .collect()
    }

    /// Empty every cell that belongs to one of `rows` or one of `cols`.
    ///
    /// Unlike a falling-block game, nothing shifts: remaining cells keep their position.
    pub fn clear_lines(&mut self, rows: &[usize], cols: &[usize]) {
        let width = BOARD_SIZE as usize;
        for &y in rows.iter().filter(|&&y| y < width) {
            for cell in &mut self.cells[y * width..(y + 1) * width] {
                *cell = false;
            }
        }
        for &x in cols.iter().filter(|&&x| x < width) {
            for y in 0..width {
                self.cells[y * width + x] = false;
            }
        }
    }

    /// Number of occupied cells
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&cell| cell).count()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|&cell| !cell)
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.cells = [false; BOARD_CELLS];
    }

    /// Encode as 64 ASCII bytes, row-major, `'0'`/`'1'` per cell
    pub fn encode(&self) -> String {
        self.cells
            .iter()
            .map(|&cell| if cell { '1' } else { '0' })
            .collect()
    }

    /// Decode the output of [`Board::encode`]
    pub fn decode(encoded: &str) -> Result<Self, BoardDecodeError> {
        let bytes = encoded.as_bytes();
        if bytes.len() != BOARD_CELLS {
            return Err(BoardDecodeError::Length(bytes.len()));
        }

        let mut cells = [false; BOARD_CELLS];
        for (index, (&byte, cell)) in bytes.iter().zip(cells.iter_mut()).enumerate() {
            *cell = match byte {
                b'0' => false,
                b'1' => true,
                _ => return Err(BoardDecodeError::Cell { index, byte }),
            };
        }
        Ok(Self { cells })
    }

    /// Build a board from 8 row strings using `#` for occupied and `.` for empty.
    ///
    /// Intended for tests and fixtures; any character other than `#` counts as empty and short
    /// rows are padded with empty cells.
    pub fn from_rows(rows: &[&str]) -> Self {
        let mut board = Self::new();
        for (y, row) in rows.iter().take(BOARD_SIZE as usize).enumerate() {
            for (x, ch) in row.chars().take(BOARD_SIZE as usize).enumerate() {
                board.set(x as i8, y as i8, ch == '#');
            }
        }
        board
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
