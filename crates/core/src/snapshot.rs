//! Read-only board views for renderers and planners

use arrayvec::ArrayVec;

use crate::board::Grid;
use crate::pieces::Tetromino;
use crate::types::{Cell, PieceKind, EMPTY};

/// Point-in-time copy of a board
///
/// Owns its own grid, so holding a snapshot never borrows the live board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSnapshot {
    pub grid: Grid,
    pub active: Option<Tetromino>,
    pub next: PieceKind,
    pub piece_id: u32,
}

impl BoardSnapshot {
    pub fn width(&self) -> u16 {
        self.grid.width()
    }

    pub fn height(&self) -> u16 {
        self.grid.height()
    }

    /// Active piece minos that are inside the visible grid
    pub fn visible_active_cells(&self) -> ArrayVec<(i32, i32), 4> {
        let mut out = ArrayVec::new();
        if let Some(piece) = &self.active {
            for (x, y) in piece.cells() {
                if y >= 0 {
                    out.push((x, y));
                }
            }
        }
        out
    }

    /// Grid rows with the active piece painted in, top row first
    pub fn composed_rows(&self) -> Vec<Vec<Cell>> {
        let mut rows = self.grid.to_rows();
        if let Some(piece) = &self.active {
            let color = piece.color_id();
            for (x, y) in self.visible_active_cells() {
                if let Some(cell) = rows
                    .get_mut(y as usize)
                    .and_then(|row| row.get_mut(x as usize))
                {
                    *cell = color;
                }
            }
        }
        rows
    }

    /// ASCII rendering: `.` for empty, the color tag digit otherwise
    pub fn render_ascii(&self) -> String {
        let mut out = String::with_capacity(
            (usize::from(self.width()) + 1) * usize::from(self.height()),
        );
        for row in self.composed_rows() {
            for cell in row {
                out.push(if cell == EMPTY {
                    '.'
                } else {
                    char::from(b'0' + cell)
                });
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;

    #[test]
    fn active_piece_is_painted_over_grid() {
        let mut board = Board::new(4, 4, 1);
        assert!(board.spawn());
        board.hard_drop();
        let snap = board.snapshot();
        assert_eq!(snap.visible_active_cells().len(), 4);
        let painted = snap
            .composed_rows()
            .iter()
            .flatten()
            .filter(|&&c| c != EMPTY)
            .count();
        assert_eq!(painted, 4);
        assert_eq!(snap.grid.occupied_count(), 0);
    }

    #[test]
    fn buffer_cells_are_not_visible() {
        let mut board = Board::new(10, 20, 1);
        assert!(board.spawn());
        let snap = board.snapshot();
        // spawn shapes sit entirely in the two buffer rows
        assert!(snap.visible_active_cells().is_empty());
        assert_eq!(snap.render_ascii().lines().count(), 20);
    }
}
