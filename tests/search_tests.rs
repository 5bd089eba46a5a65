//! Evaluator and move search scenarios

use tetris_ai::core::Grid;
use tetris_ai::engine::{evaluate, find_best_move, BoardFeatures, MoveCandidate, MoveSearch};
use tetris_ai::types::{PieceKind, Rotation};

/// Bottom `rows` rows full except `gap`
fn stack_with_gap(rows: i32, gap: i32) -> Grid {
    let mut grid = Grid::new(10, 20);
    for y in (20 - rows)..20 {
        for x in 0..10 {
            if x != gap {
                grid.set(x, y, 2);
            }
        }
    }
    grid
}

#[test]
fn test_empty_board_features_are_zero() {
    let grid = Grid::new(10, 20);
    assert_eq!(BoardFeatures::measure(&grid), BoardFeatures::default());
    assert_eq!(evaluate(&grid, 0), 0);
}

#[test]
fn test_more_lines_score_higher() {
    let grid = Grid::new(10, 20);
    let scores: Vec<i32> = (0..=3).map(|lines| evaluate(&grid, lines)).collect();
    assert!(scores.windows(2).all(|w| w[1] > w[0]));
    assert_eq!(evaluate(&grid, 4) - evaluate(&grid, 3), 40 + 200);
}

#[test]
fn test_four_line_well_is_taken() {
    let grid = stack_with_gap(4, 9);
    let search = MoveSearch::default();

    let best = search.best_move(&grid, PieceKind::I).unwrap();
    assert_eq!(best.candidate, MoveCandidate::new(7, Rotation::East));
    assert_eq!(best.lines, 4);
    assert_eq!(best.score, 4 * 40 + 200);
}

#[test]
fn test_search_leaves_live_grid_untouched() {
    let grid = stack_with_gap(4, 9);
    let copy = grid.clone();
    let _ = find_best_move(&grid, PieceKind::I);
    let _ = find_best_move(&grid, PieceKind::T);
    assert_eq!(grid, copy);
}

#[test]
fn test_o_piece_on_empty_board() {
    let grid = Grid::new(10, 20);
    let best = MoveSearch::default().best_move(&grid, PieceKind::O).unwrap();
    // Flush against either wall ties; the first enumerated column wins
    assert_eq!(best.candidate, MoveCandidate::new(-1, Rotation::North));
    let right = MoveSearch::default()
        .score(&grid, PieceKind::O, MoveCandidate::new(7, Rotation::North))
        .unwrap();
    assert_eq!(right.score, best.score);
}

#[test]
fn test_every_candidate_is_in_range() {
    let grid = stack_with_gap(6, 4);
    let search = MoveSearch::default();
    for kind in PieceKind::ALL {
        let mut seen = 0;
        for scored in search.candidates(&grid, kind) {
            assert!(scored.candidate.is_valid_for(kind, 10));
            seen += 1;
        }
        assert!(seen > 0, "{kind:?}");
    }
}
