//! Move search - exhaustive placement enumeration
//!
//! For every distinct rotation of the piece and every column in
//! `[-3, width + 2]`, a trial piece is dropped from above the board onto a
//! private copy of the grid, locked, and scored by the [`Evaluator`]. The
//! rows a placement fills are counted before they are cleared, so the clear
//! itself is rewarded.
//!
//! Enumeration order is rotation ascending, then column ascending; a later
//! candidate only wins with a strictly higher score.

use std::ops::RangeInclusive;

use tetris_ai_core::{Grid, Tetromino};
use tetris_ai_types::{PieceKind, Rotation, SEARCH_MIN_LANDING_Y, SEARCH_START_Y};

use crate::evaluator::Evaluator;

/// Target column and rotation for one piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MoveCandidate {
    pub x: i32,
    pub rotation: Rotation,
}

impl MoveCandidate {
    pub fn new(x: i32, rotation: Rotation) -> Self {
        Self { x, rotation }
    }

    /// Columns the search tries on a board of the given width
    pub fn column_range(width: u16) -> RangeInclusive<i32> {
        -3..=i32::from(width) + 2
    }

    pub fn column_in_range(&self, width: u16) -> bool {
        Self::column_range(width).contains(&self.x)
    }

    /// Column in range and rotation below the kind's distinct rotation count
    pub fn is_valid_for(&self, kind: PieceKind, width: u16) -> bool {
        self.column_in_range(width) && self.rotation.index() < usize::from(kind.max_rotations())
    }
}

/// A candidate with the outcome of its simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredMove {
    pub candidate: MoveCandidate,
    pub score: i32,
    /// Full rows right after the lock, before clearing
    pub lines: usize,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MoveSearch {
    evaluator: Evaluator,
}

impl MoveSearch {
    pub fn new(evaluator: Evaluator) -> Self {
        Self { evaluator }
    }

    /// Drop a trial piece for `candidate` from the search start row
    ///
    /// `None` when it collides at the start or never enters the board.
    pub fn land(grid: &Grid, kind: PieceKind, candidate: MoveCandidate) -> Option<Tetromino> {
        let mut piece = Tetromino {
            kind,
            rotation: candidate.rotation,
            x: candidate.x,
            y: SEARCH_START_Y,
        };
        if !grid.can_place(&piece, 0, 0, piece.rotation) {
            return None;
        }
        piece.y = grid.landing_y(&piece);
        (piece.y >= SEARCH_MIN_LANDING_Y).then_some(piece)
    }

    /// Play `candidate` on a copy of `grid`: land, lock, count, clear
    ///
    /// Returns the settled copy and the number of rows the lock filled.
    pub fn simulate(grid: &Grid, kind: PieceKind, candidate: MoveCandidate) -> Option<(Grid, usize)> {
        let piece = Self::land(grid, kind, candidate)?;
        let mut trial = grid.clone();
        trial.lock_piece(&piece);
        let lines = trial.count_full_rows();
        trial.clear_full_rows();
        Some((trial, lines))
    }

    pub fn score(&self, grid: &Grid, kind: PieceKind, candidate: MoveCandidate) -> Option<ScoredMove> {
        let (settled, lines) = Self::simulate(grid, kind, candidate)?;
        Some(ScoredMove {
            candidate,
            score: self.evaluator.evaluate(&settled, lines),
            lines,
        })
    }

    /// Every valid candidate in enumeration order
    pub fn candidates<'a>(
        &'a self,
        grid: &'a Grid,
        kind: PieceKind,
    ) -> impl Iterator<Item = ScoredMove> + 'a {
        let rotations = Rotation::ALL
            .into_iter()
            .take(usize::from(kind.max_rotations()));
        rotations.flat_map(move |rotation| {
            MoveCandidate::column_range(grid.width())
                .filter_map(move |x| self.score(grid, kind, MoveCandidate::new(x, rotation)))
        })
    }

    pub fn best_move(&self, grid: &Grid, kind: PieceKind) -> Option<ScoredMove> {
        let mut best: Option<ScoredMove> = None;
        for scored in self.candidates(grid, kind) {
            if best.map_or(true, |b| scored.score > b.score) {
                best = Some(scored);
            }
        }
        best
    }

    pub fn find_best_move(&self, grid: &Grid, kind: PieceKind) -> Option<MoveCandidate> {
        self.best_move(grid, kind).map(|s| s.candidate)
    }
}

/// Best placement with the default evaluator weights
pub fn find_best_move(grid: &Grid, kind: PieceKind) -> Option<MoveCandidate> {
    MoveSearch::default().find_best_move(grid, kind)
}
