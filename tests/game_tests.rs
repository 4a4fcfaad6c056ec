//! Board-level game logic through the public API.
//!
//! Test categories:
//! - Piece movement and collision
//! - Rotation
//! - Landing, line clearing and scoring
//! - Spawning and blocked spawns
//! - State consistency (render_grid matches actual state)

use blockdrop::game::{test_helpers::*, Game, GameEvent, Intent, Landing, MoveOutcome};
use blockdrop::grid::CellState;
use blockdrop::piece::{Piece, Position, SequencePieceProvider, Shape};

fn game_with(grid: blockdrop::grid::Grid, piece: Piece, next: Vec<Shape>) -> Game {
    Game::with_grid_and_provider(grid, piece, Box::new(SequencePieceProvider::new(next)))
}

/// Soft-drops until the piece lands, returning the landing.
fn drop_until_landed(game: &mut Game) -> Landing {
    for _ in 0..64 {
        if let MoveOutcome::Landed(landing) = game.soft_drop() {
            return landing;
        }
    }
    panic!("piece never landed");
}

// ============================================================================
// Piece Movement Tests
// ============================================================================

mod piece_movement {
    use super::*;

    #[test]
    fn piece_moves_left_right_and_down() {
        let mut game = Game::with_grid(empty_grid(), Piece::new_at(Shape::O, 4, 5));

        assert_eq!(game.move_piece(-1, 0), MoveOutcome::Moved);
        assert_eq!(game.current_piece.position, Position { col: 3, row: 5 });

        assert_eq!(game.move_piece(1, 0), MoveOutcome::Moved);
        assert_eq!(game.move_piece(0, 1), MoveOutcome::Moved);
        assert_eq!(game.current_piece.position, Position { col: 4, row: 6 });
    }

    #[test]
    fn left_wall_blocks_without_merging() {
        let mut game = Game::with_grid(empty_grid(), Piece::new_at(Shape::I, 0, 0));

        assert_eq!(game.move_piece(-1, 0), MoveOutcome::Blocked);

        assert_eq!(game.current_piece.position, Position { col: 0, row: 0 });
        assert_eq!(game.current_piece.shape, Shape::I);
        assert_eq!(game.grid.filled_count(), 0);
    }

    #[test]
    fn right_wall_blocks() {
        // O piece is 2 wide, so max col is 8
        let mut game = Game::with_grid(empty_grid(), Piece::new_at(Shape::O, 8, 5));

        assert_eq!(game.apply(Intent::MoveRight), MoveOutcome::Blocked);
        assert_eq!(game.current_piece.position.col, 8);
    }

    #[test]
    fn sideways_into_filled_cell_is_blocked() {
        let mut grid = empty_grid();
        grid.set_cell(6, 10, CellState::Filled(Shape::Z));
        let mut game = Game::with_grid(grid, Piece::new_at(Shape::O, 4, 9));

        assert_eq!(game.move_piece(1, 0), MoveOutcome::Blocked);
        assert_eq!(game.current_piece.position.col, 4);
        assert_eq!(game.grid.filled_count(), 1);
    }

    #[test]
    fn blocked_diagonal_move_does_not_land() {
        let mut game = Game::with_grid(empty_grid(), Piece::new_at(Shape::O, 4, 18));

        assert_eq!(game.move_piece(1, 1), MoveOutcome::Blocked);
        assert_eq!(game.grid.filled_count(), 0);
    }

    #[test]
    fn move_emits_event() {
        let mut game = Game::with_grid(empty_grid(), Piece::new_at(Shape::O, 4, 0));
        game.take_events();

        game.move_piece(-1, 0);

        assert!(game.take_events().contains(&GameEvent::PieceMoved));
    }
}

// ============================================================================
// Rotation Tests
// ============================================================================

mod rotation {
    use super::*;

    #[test]
    fn t_piece_rotates_clockwise() {
        let mut game = Game::with_grid(empty_grid(), Piece::new_at(Shape::T, 4, 5));

        assert!(game.rotate_piece());
        assert_eq!(game.current_piece.matrix, Shape::T.matrix().rotated());
        assert_eq!(game.current_piece.position, Position { col: 4, row: 5 });
    }

    #[test]
    fn four_rotations_restore_the_piece() {
        let mut game = Game::with_grid(empty_grid(), Piece::new_at(Shape::L, 4, 5));
        let original = game.current_piece.clone();

        for _ in 0..4 {
            assert!(game.rotate_piece());
        }

        assert_eq!(game.current_piece, original);
    }

    #[test]
    fn blocked_rotation_is_reverted() {
        // vertical I would reach rows 19..=22
        let mut game = Game::with_grid(empty_grid(), Piece::new_at(Shape::I, 0, 19));

        assert!(!game.rotate_piece());
        assert_eq!(game.current_piece.matrix, Shape::I.matrix());
    }

    #[test]
    fn rotation_next_to_wall_is_not_kicked() {
        // vertical I at the right wall turns into a row that sticks out
        let mut piece = Piece::new_at(Shape::I, 9, 5);
        piece.matrix = piece.matrix.rotated();
        let mut game = Game::with_grid(empty_grid(), piece.clone());

        assert!(!game.rotate_piece());
        assert_eq!(game.current_piece, piece);
    }

    #[test]
    fn o_piece_rotation_keeps_its_cells() {
        let mut game = Game::with_grid(empty_grid(), Piece::new_at(Shape::O, 4, 5));
        let before: Vec<Position> = game.current_piece.blocks().collect();

        assert!(game.rotate_piece());

        let after: Vec<Position> = game.current_piece.blocks().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn rotation_emits_event() {
        let mut game = Game::with_grid(empty_grid(), Piece::new_at(Shape::T, 4, 5));
        game.take_events();

        game.apply(Intent::Rotate);

        assert!(game.take_events().contains(&GameEvent::PieceRotated));
    }
}

// ============================================================================
// Landing Tests
// ============================================================================

mod landing {
    use super::*;

    #[test]
    fn repeated_soft_drops_merge_and_spawn() {
        let mut game = game_with(empty_grid(), Piece::spawn(Shape::O, 10), vec![Shape::T]);

        let mut moves = 0;
        let landing = loop {
            match game.soft_drop() {
                MoveOutcome::Moved => moves += 1,
                MoveOutcome::Landed(landing) => break landing,
                MoveOutcome::Blocked => panic!("straight down never reports Blocked"),
            }
        };

        assert_eq!(moves, 18);
        assert_eq!(landing, Landing::default());
        for (col, row) in [(4, 18), (5, 18), (4, 19), (5, 19)] {
            assert_eq!(game.grid.get(col, row), Some(CellState::Filled(Shape::O)));
        }
        assert_eq!(game.current_piece, Piece::spawn(Shape::T, 10));
    }

    #[test]
    fn merged_cells_store_shape_index_plus_one() {
        let mut game = game_with(empty_grid(), Piece::new_at(Shape::I, 0, 19), vec![Shape::O]);

        game.soft_drop();

        for col in 0..4 {
            assert_eq!(game.grid.value(col, 19), 1);
        }
        assert_eq!(game.grid.value(4, 19), 0);
    }

    #[test]
    fn landing_emits_lock_and_spawn_events() {
        let mut game = game_with(empty_grid(), Piece::new_at(Shape::O, 4, 18), vec![Shape::S]);
        game.take_events();

        game.soft_drop();

        let events = game.take_events();
        assert!(events.contains(&GameEvent::PieceLocked));
        assert!(events.contains(&GameEvent::PieceSpawned(Shape::S)));
    }

    #[test]
    fn landing_on_stack() {
        let mut grid = empty_grid();
        grid.set_cell(4, 19, CellState::Filled(Shape::J));
        let mut game = game_with(grid, Piece::new_at(Shape::O, 4, 10), vec![Shape::O]);

        drop_until_landed(&mut game);

        assert!(game.grid.is_occupied(4, 17));
        assert!(game.grid.is_occupied(5, 18));
        assert!(!game.grid.is_occupied(5, 19));
    }
}

// ============================================================================
// Line Clearing & Scoring Tests
// ============================================================================

mod line_clearing {
    use super::*;

    #[test]
    fn landing_completes_two_rows() {
        let mut grid = empty_grid();
        for col in (0..10).filter(|c| *c != 4 && *c != 5) {
            grid.set_cell(col, 19, CellState::Filled(Shape::T));
            grid.set_cell(col, 18, CellState::Filled(Shape::T));
        }
        grid.set_cell(0, 17, CellState::Filled(Shape::Z));
        let mut game = game_with(grid, Piece::new_at(Shape::O, 4, 0), vec![Shape::I]);
        game.take_events();

        let landing = drop_until_landed(&mut game);

        assert_eq!(landing.rows_cleared, 2);
        assert!(!landing.spawn_blocked);
        assert_eq!(game.score, 200);
        assert_eq!(game.grid.filled_count(), 1);
        assert_eq!(game.grid.get(0, 19), Some(CellState::Filled(Shape::Z)));

        let events = game.take_events();
        assert!(events.contains(&GameEvent::RowsCleared(2)));
        assert!(events.contains(&GameEvent::ScoreChanged(200)));
    }

    #[test]
    fn single_row_is_cleared() {
        let mut grid = empty_grid();
        fill_row(&mut grid, 19);
        let mut game = Game::with_grid(grid, Piece::new_at(Shape::I, 0, 0));

        assert_eq!(game.clear_rows(), 1);
        assert_eq!(game.grid.filled_count(), 0);
    }

    #[test]
    fn incomplete_row_not_cleared() {
        let mut grid = empty_grid();
        fill_row_with_gap(&mut grid, 19, 5);
        let mut game = Game::with_grid(grid, Piece::new_at(Shape::I, 0, 0));

        assert_eq!(game.clear_rows(), 0);
        assert_eq!(game.grid.filled_count(), 9);
        assert!(game.take_events().is_empty());
    }

    #[test]
    fn score_is_flat_per_row() {
        let mut game = Game::with_grid(empty_grid(), Piece::new_at(Shape::O, 4, 0));

        game.add_score(1);
        assert_eq!(game.score, 100);

        game.add_score(4);
        assert_eq!(game.score, 500);
    }

    #[test]
    fn reset_clears_board_and_score() {
        let mut grid = empty_grid();
        fill_row_with_gap(&mut grid, 19, 0);
        let mut game = game_with(grid, Piece::new_at(Shape::O, 4, 0), vec![Shape::J]);
        game.add_score(3);

        game.reset();

        assert_eq!(game.score, 0);
        assert_eq!(game.grid.filled_count(), 0);
        assert_eq!(game.current_piece, Piece::spawn(Shape::J, 10));
    }
}

// ============================================================================
// Spawn Tests
// ============================================================================

mod spawning {
    use super::*;

    #[test]
    fn spawn_blocked_by_stack() {
        let mut grid = empty_grid();
        for col in 3..7 {
            grid.set_cell(col, 0, CellState::Filled(Shape::T));
            grid.set_cell(col, 1, CellState::Filled(Shape::T));
        }
        let mut game = game_with(grid, Piece::new_at(Shape::O, 0, 10), vec![Shape::O]);

        assert!(!game.spawn_next_piece());
    }

    #[test]
    fn landing_reports_blocked_spawn() {
        let mut grid = empty_grid();
        grid.set_cell(4, 1, CellState::Filled(Shape::L));
        let mut game = game_with(grid, Piece::new_at(Shape::O, 0, 18), vec![Shape::O]);

        let landing = drop_until_landed(&mut game);

        assert!(landing.spawn_blocked);
        assert!(!game.top_row_blocked());
    }

    #[test]
    fn spawned_pieces_follow_provider() {
        let mut game = game_with(
            empty_grid(),
            Piece::new_at(Shape::O, 4, 0),
            vec![Shape::S, Shape::Z, Shape::I],
        );

        for expected in [Shape::S, Shape::Z, Shape::I, Shape::S] {
            assert!(game.spawn_next_piece());
            assert_eq!(game.current_piece.shape, expected);
            assert_eq!(game.current_piece.position.row, 0);
        }
    }
}

// ============================================================================
// Render Grid Consistency Tests
// ============================================================================

mod render_consistency {
    use super::*;

    #[test]
    fn render_grid_includes_current_piece() {
        let game = Game::with_grid(empty_grid(), Piece::new_at(Shape::O, 4, 5));

        let visual = game.render_grid();

        assert_eq!(visual[5][4], CellState::Filled(Shape::O));
        assert_eq!(visual[5][5], CellState::Filled(Shape::O));
        assert_eq!(visual[6][4], CellState::Filled(Shape::O));
        assert_eq!(visual[6][5], CellState::Filled(Shape::O));
        assert_eq!(game.grid.filled_count(), 0);
    }

    #[test]
    fn render_grid_includes_locked_cells() {
        let mut grid = empty_grid();
        grid.set_cell(0, 19, CellState::Filled(Shape::T));
        let game = Game::with_grid(grid, Piece::new_at(Shape::O, 4, 0));

        let visual = game.render_grid();

        assert_eq!(visual[19][0], CellState::Filled(Shape::T));
        assert_eq!(visual.len(), 20);
        assert!(visual.iter().all(|row| row.len() == 10));
    }

    #[test]
    fn render_grid_matches_after_line_clear() {
        let mut grid = empty_grid();
        fill_row(&mut grid, 19);
        grid.set_cell(0, 18, CellState::Filled(Shape::J));
        let mut game = Game::with_grid(grid, Piece::new_at(Shape::O, 4, 0));

        game.clear_rows();
        let visual = game.render_grid();

        assert_eq!(visual[19][0], CellState::Filled(Shape::J));
        assert_eq!(visual[19][9], CellState::Empty);
    }
}
