//! Fixed-size playfield and the collision test every move goes through.
//!
//! Coordinates are `(col, row)` with row 0 at the top.

use crate::piece::{Piece, Shape};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum CellState {
    #[default]
    Empty,
    Filled(Shape),
}

impl CellState {
    pub fn is_filled(&self) -> bool {
        matches!(self, CellState::Filled(_))
    }

    /// 0 for empty, shape index + 1 otherwise.
    pub fn value(&self) -> u8 {
        match self {
            CellState::Empty => 0,
            CellState::Filled(shape) => shape.cell_value(),
        }
    }

    pub fn from_value(value: u8) -> Self {
        Shape::from_cell_value(value).map_or(CellState::Empty, CellState::Filled)
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Grid {
    cols: usize,
    cells: Vec<Vec<CellState>>,
}

impl Grid {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            cells: vec![vec![CellState::Empty; cols]; rows],
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    pub fn get(&self, col: usize, row: usize) -> Option<CellState> {
        self.cells.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Numeric view of a cell; out-of-range reads as empty.
    pub fn value(&self, col: usize, row: usize) -> u8 {
        self.get(col, row).map_or(0, |cell| cell.value())
    }

    pub fn is_occupied(&self, col: usize, row: usize) -> bool {
        self.get(col, row).is_some_and(|cell| cell.is_filled())
    }

    /// Writes one cell. Writes outside the grid are dropped.
    pub fn set_cell(&mut self, col: usize, row: usize, cell: CellState) {
        if let Some(slot) = self.cells.get_mut(row).and_then(|r| r.get_mut(col)) {
            *slot = cell;
        }
    }

    pub fn row(&self, row: usize) -> &[CellState] {
        &self.cells[row]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[CellState]> {
        self.cells.iter().map(Vec::as_slice)
    }

    pub fn is_row_full(&self, row: usize) -> bool {
        self.cells
            .get(row)
            .is_some_and(|r| r.iter().all(CellState::is_filled))
    }

    pub fn row_has_blocks(&self, row: usize) -> bool {
        self.cells
            .get(row)
            .is_some_and(|r| r.iter().any(CellState::is_filled))
    }

    pub fn filled_count(&self) -> usize {
        self.cells.iter().flatten().filter(|c| c.is_filled()).count()
    }

    pub fn clear(&mut self) {
        for row in &mut self.cells {
            row.fill(CellState::Empty);
        }
    }

    /// Writes the piece's occupied cells with its shape. Cells that fall
    /// outside the grid are skipped.
    pub fn merge(&mut self, piece: &Piece) {
        for block in piece.blocks() {
            if block.col >= 0 && block.row >= 0 {
                self.set_cell(
                    block.col as usize,
                    block.row as usize,
                    CellState::Filled(piece.shape),
                );
            }
        }
    }

    /// Removes every full row, scanning bottom to top, and refills from the
    /// top with empty rows. Returns how many rows were removed.
    pub fn clear_full_rows(&mut self) -> u32 {
        let mut cleared = 0;
        let mut row = self.rows();

        while row > 0 {
            if self.is_row_full(row - 1) {
                self.cells.remove(row - 1);
                self.cells.insert(0, vec![CellState::Empty; self.cols]);
                cleared += 1;
                // the row above has shifted into this slot; check it again
            } else {
                row -= 1;
            }
        }

        cleared
    }
}

/// True when any occupied cell of `piece` lies outside the grid or on a
/// filled cell.
pub fn collides(grid: &Grid, piece: &Piece) -> bool {
    piece.blocks().any(|block| {
        if block.col < 0 || block.row < 0 {
            return true;
        }
        let (col, row) = (block.col as usize, block.row as usize);
        col >= grid.cols() || row >= grid.rows() || grid.is_occupied(col, row)
    })
}
