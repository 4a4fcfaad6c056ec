use std::time::Duration;

use tracing::{debug, info};

use crate::config::{GameConfig, DEFAULT_COLS, DEFAULT_ROWS, POINTS_PER_ROW};
use crate::grid::{collides, CellState, Grid};
use crate::piece::{Piece, PieceProvider, RandomPieceProvider, Shape};

// ============================================================================
// Types
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Intent {
    MoveLeft,
    MoveRight,
    SoftDrop,
    Rotate,
}

/// What a landed piece did to the board.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Landing {
    pub rows_cleared: u32,
    /// The replacement piece overlaps the stack at its spawn point.
    pub spawn_blocked: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveOutcome {
    Moved,
    Blocked,
    Landed(Landing),
}

impl MoveOutcome {
    pub fn landing(&self) -> Option<Landing> {
        match self {
            MoveOutcome::Landed(landing) => Some(*landing),
            _ => None,
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum GameEvent {
    PieceMoved,
    PieceRotated,
    PieceLocked,
    PieceSpawned(Shape),
    RowsCleared(u32),
    ScoreChanged(u32),
    SpeedUp(Duration),
    Started,
    Paused,
    Resumed,
    GameOver,
}

// ============================================================================
// Game
// ============================================================================

/// Board state: the grid, the active piece and the score.
pub struct Game {
    pub grid: Grid,
    pub current_piece: Piece,
    pub score: u32,
    points_per_row: u32,
    piece_provider: Box<dyn PieceProvider>,
    events: Vec<GameEvent>,
}

impl Game {
    pub fn from_config(config: &GameConfig, mut provider: Box<dyn PieceProvider>) -> Self {
        let current_piece = provider.spawn(config.cols);

        Self {
            grid: Grid::new(config.cols, config.rows),
            current_piece,
            score: 0,
            points_per_row: config.points_per_row,
            piece_provider: provider,
            events: Vec::new(),
        }
    }

    /// Plays on a prepared board, drawing later pieces at random.
    pub fn with_grid(grid: Grid, current_piece: Piece) -> Self {
        Self::with_grid_and_provider(grid, current_piece, Box::new(RandomPieceProvider::new()))
    }

    pub fn with_grid_and_provider(
        grid: Grid,
        current_piece: Piece,
        provider: Box<dyn PieceProvider>,
    ) -> Self {
        Self {
            grid,
            current_piece,
            score: 0,
            points_per_row: POINTS_PER_ROW,
            piece_provider: provider,
            events: Vec::new(),
        }
    }

    pub(crate) fn set_points_per_row(&mut self, points: u32) {
        self.points_per_row = points;
    }

    pub fn is_valid_position(&self, piece: &Piece) -> bool {
        !collides(&self.grid, piece)
    }

    /// Translates the active piece, reverting on collision. A blocked
    /// straight-down move lands the piece.
    pub fn move_piece(&mut self, dx: i32, dy: i32) -> MoveOutcome {
        let moved = self.current_piece.moved(dx, dy);
        if self.is_valid_position(&moved) {
            self.current_piece = moved;
            self.events.push(GameEvent::PieceMoved);
            return MoveOutcome::Moved;
        }

        if dy > 0 && dx == 0 {
            MoveOutcome::Landed(self.land())
        } else {
            MoveOutcome::Blocked
        }
    }

    /// Quarter turn clockwise in place. No wall kicks: a blocked rotation
    /// leaves the piece untouched.
    pub fn rotate_piece(&mut self) -> bool {
        let rotated = self.current_piece.rotated();
        if self.is_valid_position(&rotated) {
            self.current_piece = rotated;
            self.events.push(GameEvent::PieceRotated);
            true
        } else {
            false
        }
    }

    pub fn soft_drop(&mut self) -> MoveOutcome {
        self.move_piece(0, 1)
    }

    pub fn apply(&mut self, intent: Intent) -> MoveOutcome {
        match intent {
            Intent::MoveLeft => self.move_piece(-1, 0),
            Intent::MoveRight => self.move_piece(1, 0),
            Intent::SoftDrop => self.soft_drop(),
            Intent::Rotate => {
                if self.rotate_piece() {
                    MoveOutcome::Moved
                } else {
                    MoveOutcome::Blocked
                }
            }
        }
    }

    /// Merges the active piece, clears full rows, scores them and spawns
    /// the next piece.
    pub fn land(&mut self) -> Landing {
        self.lock_piece();
        let rows_cleared = self.clear_rows();
        if rows_cleared > 0 {
            self.add_score(rows_cleared);
        }
        let spawn_blocked = !self.spawn_next_piece();

        Landing {
            rows_cleared,
            spawn_blocked,
        }
    }

    fn lock_piece(&mut self) {
        self.grid.merge(&self.current_piece);
        debug!(
            shape = ?self.current_piece.shape,
            col = self.current_piece.position.col,
            row = self.current_piece.position.row,
            "piece locked"
        );
        self.events.push(GameEvent::PieceLocked);
    }

    pub fn clear_rows(&mut self) -> u32 {
        let cleared = self.grid.clear_full_rows();
        if cleared > 0 {
            info!(rows = cleared, "rows cleared");
            self.events.push(GameEvent::RowsCleared(cleared));
        }
        cleared
    }

    /// Flat bonus per row, no multi-row multiplier.
    pub fn add_score(&mut self, rows: u32) {
        self.score = self
            .score
            .saturating_add(rows.saturating_mul(self.points_per_row));
        self.events.push(GameEvent::ScoreChanged(self.score));
    }

    /// Replaces the active piece. Returns false if the new piece collides
    /// where it spawned.
    pub fn spawn_next_piece(&mut self) -> bool {
        self.current_piece = self.piece_provider.spawn(self.grid.cols());
        debug!(shape = ?self.current_piece.shape, "piece spawned");
        self.events.push(GameEvent::PieceSpawned(self.current_piece.shape));
        self.is_valid_position(&self.current_piece)
    }

    /// Empties the grid, zeroes the score and spawns a fresh piece.
    pub fn reset(&mut self) {
        self.grid.clear();
        self.score = 0;
        self.events.clear();
        self.spawn_next_piece();
        self.events.push(GameEvent::ScoreChanged(0));
    }

    pub fn top_row_blocked(&self) -> bool {
        self.grid.row_has_blocks(0)
    }

    /// Returns the visual grid state with the current piece overlaid
    pub fn render_grid(&self) -> Vec<Vec<CellState>> {
        let mut visual: Vec<Vec<CellState>> =
            self.grid.iter_rows().map(<[CellState]>::to_vec).collect();

        for block in self.current_piece.blocks() {
            if block.col < 0 || block.row < 0 {
                continue;
            }
            if let Some(cell) = visual
                .get_mut(block.row as usize)
                .and_then(|row| row.get_mut(block.col as usize))
            {
                *cell = CellState::Filled(self.current_piece.shape);
            }
        }

        visual
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Takes and clears all pending events
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

// ============================================================================
// Test Helpers
// ============================================================================

pub mod test_helpers {
    use super::*;

    pub fn empty_grid() -> Grid {
        Grid::new(DEFAULT_COLS, DEFAULT_ROWS)
    }

    pub fn fill_row(grid: &mut Grid, row: usize) {
        for col in 0..grid.cols() {
            grid.set_cell(col, row, CellState::Filled(Shape::T));
        }
    }

    pub fn fill_row_with_gap(grid: &mut Grid, row: usize, gap_col: usize) {
        for col in 0..grid.cols() {
            if col != gap_col {
                grid.set_cell(col, row, CellState::Filled(Shape::T));
            }
        }
    }
}
