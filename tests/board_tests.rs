//! Board tests - grid rules and the live board

use tetris_ai::core::{Board, Grid, Tetromino};
use tetris_ai::types::{PieceKind, Rotation, BOARD_HEIGHT, BOARD_WIDTH, EMPTY};

fn fill_row(grid: &mut Grid, y: i32, except: Option<i32>) {
    for x in 0..i32::from(grid.width()) {
        if Some(x) != except {
            grid.set(x, y, 1);
        }
    }
}

#[test]
fn test_new_grid_is_empty() {
    let grid = Grid::new(BOARD_WIDTH, BOARD_HEIGHT);
    assert_eq!(grid.cells().len(), 200);
    assert!(grid.cells().iter().all(|&c| c == EMPTY));
    assert_eq!(grid.count_full_rows(), 0);
}

#[test]
fn test_out_of_bounds_access_is_ignored() {
    let mut grid = Grid::new(10, 20);
    assert_eq!(grid.get(-1, 0), None);
    assert_eq!(grid.get(0, 20), None);
    assert!(!grid.set(10, 0, 1));
    assert!(!grid.set(0, -1, 1));
    assert_eq!(grid.occupied_count(), 0);
}

#[test]
fn test_clear_keeps_partial_rows_in_order() {
    let mut grid = Grid::new(10, 20);
    fill_row(&mut grid, 19, None);
    fill_row(&mut grid, 18, Some(0));
    fill_row(&mut grid, 17, None);
    grid.set(4, 16, 5);
    let partial = grid.row(18).to_vec();

    assert_eq!(grid.clear_full_rows(), 2);
    assert_eq!(grid.count_full_rows(), 0);
    assert_eq!(grid.row(19), partial.as_slice());
    assert_eq!(grid.get(4, 18), Some(5));
    assert_eq!(grid.occupied_count(), 9 + 1);
}

#[test]
fn test_piece_never_blocks_itself() {
    let grid = Grid::new(10, 20);
    for kind in PieceKind::ALL {
        for rotation in Rotation::ALL {
            let mut piece = Tetromino::new(kind, 3, 5);
            piece.rotation = rotation;
            assert!(grid.can_place(&piece, 0, 0, rotation), "{kind:?} {rotation:?}");
        }
    }
}

#[test]
fn test_lock_overflow_writes_visible_cells() {
    let mut grid = Grid::new(10, 20);
    let piece = Tetromino::new(PieceKind::T, 3, -1);
    assert!(!grid.lock_piece(&piece));
    assert_eq!(grid.row(0)[3..6], [3, 3, 3]);
    assert_eq!(grid.occupied_count(), 3);
}

#[test]
fn test_rotation_into_the_floor_is_rejected() {
    let mut board = Board::new(10, 20, 1);
    assert!(board.spawn());
    assert!(board.hard_drop() > 0);

    // Every clockwise turn reaches one row lower than the flat spawn shape
    let before = *board.active().unwrap();
    assert!(!board.rotate_cw());
    assert_eq!(*board.active().unwrap(), before);
}

#[test]
fn test_hard_drop_then_lock() {
    let mut board = Board::new(10, 20, 12345);
    assert!(board.spawn());
    board.move_left();
    board.hard_drop();
    assert!(board.lock_current());
    assert!(board.active().is_none());
    assert_eq!(board.grid().occupied_count(), 4);
    assert!((0..10).any(|x| board.grid().is_occupied(x, 19)));
}

#[test]
fn test_actions_without_piece_are_noops() {
    let mut board = Board::new(10, 20, 1);
    assert!(!board.move_left());
    assert!(!board.rotate_cw());
    assert!(!board.soft_drop_step());
    assert_eq!(board.hard_drop(), 0);
    assert!(board.lock_current());
    assert_eq!(board.grid().occupied_count(), 0);
}

#[test]
fn test_snapshot_is_detached() {
    let mut board = Board::new(10, 20, 3);
    assert!(board.spawn());
    let snapshot = board.snapshot();
    board.hard_drop();
    board.lock_current();

    assert_eq!(snapshot.grid.occupied_count(), 0);
    assert!(snapshot.visible_active_cells().is_empty());
    assert_eq!(snapshot.piece_id, 1);
}
