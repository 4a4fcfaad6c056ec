use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// ============================================================================
// Shape Catalog
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Shape {
    I,
    O,
    T,
    L,
    J,
    Z,
    S,
}

impl Shape {
    pub const ALL: [Shape; 7] = [
        Shape::I,
        Shape::O,
        Shape::T,
        Shape::L,
        Shape::J,
        Shape::Z,
        Shape::S,
    ];

    /// Spawn orientation, one slice per row.
    pub fn rows(&self) -> &'static [&'static [u8]] {
        match self {
            Shape::I => &[&[1, 1, 1, 1]],
            Shape::O => &[&[1, 1], &[1, 1]],
            Shape::T => &[&[1, 1, 1], &[0, 1, 0]],
            Shape::L => &[&[1, 1, 1], &[1, 0, 0]],
            Shape::J => &[&[1, 1, 1], &[0, 0, 1]],
            Shape::Z => &[&[1, 1, 0], &[0, 1, 1]],
            Shape::S => &[&[0, 1, 1], &[1, 1, 0]],
        }
    }

    pub fn matrix(&self) -> Matrix {
        Matrix::from_rows(self.rows())
    }

    /// Fill color as an RGB triple.
    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            Shape::I => (0xcc, 0x00, 0x33),
            Shape::O => (0x66, 0xcc, 0x33),
            Shape::T => (0x00, 0x66, 0xff),
            Shape::L => (0xff, 0xcc, 0x00),
            Shape::J => (0x66, 0xcc, 0xff),
            Shape::Z => (0xff, 0x66, 0x99),
            Shape::S => (0xff, 0x66, 0x00),
        }
    }

    /// Position in the catalog, 0..7.
    pub fn index(&self) -> usize {
        match self {
            Shape::I => 0,
            Shape::O => 1,
            Shape::T => 2,
            Shape::L => 3,
            Shape::J => 4,
            Shape::Z => 5,
            Shape::S => 6,
        }
    }

    pub fn from_index(index: usize) -> Option<Shape> {
        Shape::ALL.get(index).copied()
    }

    /// Numeric grid value for this shape. 0 is reserved for empty cells.
    pub fn cell_value(&self) -> u8 {
        self.index() as u8 + 1
    }

    pub fn from_cell_value(value: u8) -> Option<Shape> {
        (value as usize).checked_sub(1).and_then(Shape::from_index)
    }

    fn random(rng: &mut impl Rng) -> Self {
        Shape::ALL[rng.gen_range(0..Shape::ALL.len())]
    }
}

// ============================================================================
// Occupancy Matrix
// ============================================================================

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Matrix {
    cells: Vec<Vec<bool>>,
}

impl Matrix {
    /// Builds a matrix from 0/1 rows.
    ///
    /// # Panics
    ///
    /// Panics if the rows differ in length.
    pub(crate) fn from_rows(rows: &[&[u8]]) -> Self {
        let width = rows.first().map_or(0, |row| row.len());
        assert!(
            rows.iter().all(|row| row.len() == width),
            "matrix rows must all have the same length"
        );
        Self {
            cells: rows
                .iter()
                .map(|row| row.iter().map(|&v| v != 0).collect())
                .collect(),
        }
    }

    pub fn height(&self) -> usize {
        self.cells.len()
    }

    pub fn width(&self) -> usize {
        self.cells.first().map_or(0, Vec::len)
    }

    pub fn is_set(&self, row: usize, col: usize) -> bool {
        self.cells
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(false)
    }

    /// `(row, col)` of every occupied cell, row-major.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .filter(|&(_, &set)| set)
                .map(move |(c, _)| (r, c))
        })
    }

    /// Quarter turn clockwise: transpose, then reverse each row.
    /// Cell `(r, c)` lands on `(c, height - 1 - r)`.
    pub fn rotated(&self) -> Self {
        let height = self.height();
        let cells = (0..self.width())
            .map(|c| (0..height).rev().map(|r| self.cells[r][c]).collect())
            .collect();
        Self { cells }
    }
}

// ============================================================================
// Piece
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Position {
    pub col: i32,
    pub row: i32,
}

/// The active falling piece: an occupancy matrix anchored at its top-left.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Piece {
    pub shape: Shape,
    pub matrix: Matrix,
    pub position: Position,
}

impl Piece {
    pub fn new_at(shape: Shape, col: i32, row: i32) -> Self {
        Self {
            shape,
            matrix: shape.matrix(),
            position: Position { col, row },
        }
    }

    /// Places `shape` horizontally centered on row 0 of a grid `cols` wide.
    pub fn spawn(shape: Shape, cols: usize) -> Self {
        let width = shape.matrix().width();
        let col = (cols / 2) as i32 - width.div_ceil(2) as i32;
        Self::new_at(shape, col, 0)
    }

    /// Absolute grid positions of every occupied cell.
    pub fn blocks(&self) -> impl Iterator<Item = Position> + '_ {
        self.matrix.occupied().map(|(r, c)| Position {
            col: self.position.col + c as i32,
            row: self.position.row + r as i32,
        })
    }

    pub fn moved(&self, dx: i32, dy: i32) -> Self {
        Self {
            position: Position {
                col: self.position.col + dx,
                row: self.position.row + dy,
            },
            ..self.clone()
        }
    }

    pub fn rotated(&self) -> Self {
        Self {
            matrix: self.matrix.rotated(),
            ..self.clone()
        }
    }
}

// ============================================================================
// Piece Provider Trait
// ============================================================================

pub trait PieceProvider {
    fn next_shape(&mut self) -> Shape;

    /// Draws the next shape and positions it at the spawn point.
    fn spawn(&mut self, cols: usize) -> Piece {
        Piece::spawn(self.next_shape(), cols)
    }
}

/// Uniform draw over the catalog.
pub struct RandomPieceProvider {
    rng: StdRng,
}

impl RandomPieceProvider {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::new, Self::seeded)
    }
}

impl Default for RandomPieceProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceProvider for RandomPieceProvider {
    fn next_shape(&mut self) -> Shape {
        Shape::random(&mut self.rng)
    }
}

pub struct SequencePieceProvider {
    shapes: Vec<Shape>,
    index: usize,
}

impl SequencePieceProvider {
    pub fn new(shapes: Vec<Shape>) -> Self {
        assert!(!shapes.is_empty(), "sequence needs at least one shape");
        Self { shapes, index: 0 }
    }
}

impl PieceProvider for SequencePieceProvider {
    fn next_shape(&mut self) -> Shape {
        let shape = self.shapes[self.index % self.shapes.len()];
        self.index += 1;
        shape
    }
}
