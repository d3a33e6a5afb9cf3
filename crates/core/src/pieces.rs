//! Pieces module - the fixed shape catalog and piece instances
//!
//! The catalog is an immutable static table indexed by [`ShapeId`]. A [`Piece`] only carries
//! its instance id and shape id; the cell matrix is always derived through [`get_shape`], never
//! stored or sent over the wire.

use std::fmt;

use uuid::Uuid;

use crate::types::ShapeId;

/// Largest footprint of any catalog shape (3x3)
pub const SHAPE_MAX: usize = 3;

/// Cell matrix of a catalog shape, rows top to bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    width: u8,
    height: u8,
    cells: [[bool; SHAPE_MAX]; SHAPE_MAX],
}

impl Shape {
    const fn new(width: u8, height: u8, rows: [[u8; SHAPE_MAX]; SHAPE_MAX]) -> Self {
        let mut cells = [[false; SHAPE_MAX]; SHAPE_MAX];
        let mut r = 0;
        while r < SHAPE_MAX {
            let mut c = 0;
            while c < SHAPE_MAX {
                cells[r][c] = rows[r][c] == 1;
                c += 1;
            }
            r += 1;
        }
        Self {
            width,
            height,
            cells,
        }
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    /// Whether the cell at (column, row) of the matrix is filled
    pub fn is_filled(&self, col: usize, row: usize) -> bool {
        row < SHAPE_MAX && col < SHAPE_MAX && self.cells[row][col]
    }

    /// Offsets `(dx, dy)` of every filled cell relative to the top-left corner
    pub fn offsets(&self) -> impl Iterator<Item = (i8, i8)> + '_ {
        (0..self.height as usize).flat_map(move |r| {
            (0..self.width as usize)
                .filter(move |&c| self.cells[r][c])
                .map(move |c| (c as i8, r as i8))
        })
    }

    /// Number of filled cells
    pub fn cell_count(&self) -> usize {
        self.offsets().count()
    }
}

static CATALOG: [Shape; 9] = [
    // 1x1
    Shape::new(1, 1, [[1, 0, 0], [0, 0, 0], [0, 0, 0]]),
    // 2x1
    Shape::new(2, 1, [[1, 1, 0], [0, 0, 0], [0, 0, 0]]),
    // 1x2
    Shape::new(1, 2, [[1, 0, 0], [1, 0, 0], [0, 0, 0]]),
    // 3x1
    Shape::new(3, 1, [[1, 1, 1], [0, 0, 0], [0, 0, 0]]),
    // 1x3
    Shape::new(1, 3, [[1, 0, 0], [1, 0, 0], [1, 0, 0]]),
    // 2x2
    Shape::new(2, 2, [[1, 1, 0], [1, 1, 0], [0, 0, 0]]),
    // L
    Shape::new(2, 3, [[1, 0, 0], [1, 0, 0], [1, 1, 0]]),
    // T
    Shape::new(3, 2, [[1, 1, 1], [0, 1, 0], [0, 0, 0]]),
    // Z
    Shape::new(3, 2, [[1, 1, 0], [0, 1, 1], [0, 0, 0]]),
];

/// Look up the cell matrix for a shape id
pub fn get_shape(id: ShapeId) -> &'static Shape {
    &CATALOG[id.index()]
}

/// Opaque unique token identifying one generated piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceId(Uuid);

impl PieceId {
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a token previously produced by `to_string`
    pub fn parse(s: &str) -> Option<Self> {
        Uuid::parse_str(s).ok().map(Self)
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

/// One placeable piece instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub id: PieceId,
    pub shape_id: ShapeId,
}

impl Piece {
    pub fn new(id: PieceId, shape_id: ShapeId) -> Self {
        Self { id, shape_id }
    }

    /// Derived cell matrix
    pub fn shape(&self) -> &'static Shape {
        get_shape(self.shape_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_footprints() {
        let expected = [
            (ShapeId::Mono, 1, 1, 1),
            (ShapeId::Domino2x1, 2, 1, 2),
            (ShapeId::Domino1x2, 1, 2, 2),
            (ShapeId::Tromino3x1, 3, 1, 3),
            (ShapeId::Tromino1x3, 1, 3, 3),
            (ShapeId::Square, 2, 2, 4),
            (ShapeId::L, 2, 3, 4),
            (ShapeId::T, 3, 2, 4),
            (ShapeId::Z, 3, 2, 4),
        ];
        for (id, w, h, cells) in expected {
            let shape = get_shape(id);
            assert_eq!(shape.width(), w, "{:?}", id);
            assert_eq!(shape.height(), h, "{:?}", id);
            assert_eq!(shape.cell_count(), cells, "{:?}", id);
        }
    }

    #[test]
    fn test_offsets_are_row_major() {
        let offsets: Vec<_> = get_shape(ShapeId::Z).offsets().collect();
        assert_eq!(offsets, vec![(0, 0), (1, 0), (1, 1), (2, 1)]);

        let offsets: Vec<_> = get_shape(ShapeId::L).offsets().collect();
        assert_eq!(offsets, vec![(0, 0), (0, 1), (0, 2), (1, 2)]);
    }

    #[test]
    fn test_piece_id_display_parses_back() {
        let id = PieceId::new_random();
        assert_eq!(PieceId::parse(&id.to_string()), Some(id));
        assert_eq!(PieceId::parse("not-a-token"), None);
    }
}
