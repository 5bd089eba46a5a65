//! Board module - the grid rule set and the live board
//!
//! [`Grid`] owns the cells and is the one implementation of the placement rules
//! (collision, locking, line clearing). The move search clones a `Grid` and runs
//! the same rules on the copy, so it never touches the live cells.
//!
//! [`Board`] wraps a grid with the active piece and the piece generator and
//! exposes the operations a session drives every tick.
//!
//! Coordinates: `(x, y)` with `x` growing rightwards and `y` growing downwards;
//! row 0 is the visible top. Rows above the top (`y < 0`) form the spawn buffer:
//! a piece may overlap it freely, but nothing is ever stored there.

use crate::pieces::Tetromino;
use crate::rng::PieceGenerator;
use crate::snapshot::BoardSnapshot;
use crate::types::{Cell, PieceKind, Rotation, EMPTY, MIN_BOARD_DIM};

/// Fixed-size cell grid, flat row-major storage (`y * width + x`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create an empty grid
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![EMPTY; usize::from(width) * usize::from(height)],
        }
    }

    /// Build a grid from rows, top row first
    ///
    /// Returns `None` for an empty or ragged row set.
    ///
    /// # Examples
    ///
    /// ```
    /// use tetris_ai_core::Grid;
    ///
    /// let grid = Grid::from_rows(&[vec![0, 0, 0, 0], vec![1, 1, 0, 1]]).unwrap();
    /// assert_eq!(grid.width(), 4);
    /// assert_eq!(grid.height(), 2);
    /// assert_eq!(grid.get(3, 1), Some(1));
    /// ```
    pub fn from_rows(rows: &[Vec<Cell>]) -> Option<Self> {
        let width = rows.first()?.len();
        if width == 0 || rows.iter().any(|row| row.len() != width) {
            return None;
        }
        Some(Self {
            width: u16::try_from(width).ok()?,
            height: u16::try_from(rows.len()).ok()?,
            cells: rows.concat(),
        })
    }

    #[inline(always)]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= i32::from(self.width) || y >= i32::from(self.height) {
            return None;
        }
        Some(y as usize * usize::from(self.width) + x as usize)
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Cell at `(x, y)`, `None` when out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    /// Set the cell at `(x, y)`; returns false when out of bounds
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        matches!(self.get(x, y), Some(c) if c != EMPTY)
    }

    /// Flat row-major view of every cell
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// One row, top row is 0
    pub fn row(&self, y: usize) -> &[Cell] {
        let w = usize::from(self.width);
        &self.cells[y * w..(y + 1) * w]
    }

    /// Rows from top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.cells.chunks(usize::from(self.width).max(1))
    }

    /// Copy out as nested rows, top row first
    pub fn to_rows(&self) -> Vec<Vec<Cell>> {
        self.rows().map(<[Cell]>::to_vec).collect()
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != EMPTY).count()
    }

    /// Zero every cell
    pub fn clear(&mut self) {
        self.cells.fill(EMPTY);
    }

    /// Whether `piece`, shifted by `(dx, dy)` and turned to `rotation`, fits
    ///
    /// Every mino must be inside `[0, width)` horizontally and above the floor.
    /// Minos in the spawn buffer (`y < 0`) are always allowed; the rest must land
    /// on empty cells.
    pub fn can_place(&self, piece: &Tetromino, dx: i32, dy: i32, rotation: Rotation) -> bool {
        let moved = Tetromino {
            rotation,
            x: piece.x + dx,
            y: piece.y + dy,
            ..*piece
        };
        moved.cells().iter().all(|&(x, y)| {
            if x < 0 || x >= i32::from(self.width) || y >= i32::from(self.height) {
                return false;
            }
            y < 0 || !self.is_occupied(x, y)
        })
    }

    /// Write the visible minos of `piece` with its color tag
    ///
    /// Returns false when any mino is still in the spawn buffer; the visible
    /// part is written regardless.
    pub fn lock_piece(&mut self, piece: &Tetromino) -> bool {
        let color = piece.color_id();
        let mut clean = true;
        for (x, y) in piece.cells() {
            if y < 0 {
                clean = false;
                continue;
            }
            self.set(x, y, color);
        }
        clean
    }

    /// A row is full when no column is empty
    pub fn is_row_full(&self, y: usize) -> bool {
        y < usize::from(self.height) && self.row(y).iter().all(|&c| c != EMPTY)
    }

    pub fn count_full_rows(&self) -> usize {
        (0..usize::from(self.height))
            .filter(|&y| self.is_row_full(y))
            .count()
    }

    /// Remove all full rows, compacting the rest downward; returns rows removed
    ///
    /// Two-pointer scan from the bottom: surviving rows are copied down to the
    /// write cursor and the vacated rows at the top are zero-filled.
    pub fn clear_full_rows(&mut self) -> usize {
        let width = usize::from(self.width);
        let height = usize::from(self.height);
        let mut write_y = height;
        let mut cleared = 0;

        for read_y in (0..height).rev() {
            if self.is_row_full(read_y) {
                cleared += 1;
                continue;
            }
            write_y -= 1;
            if write_y != read_y {
                let src = read_y * width;
                self.cells.copy_within(src..src + width, write_y * width);
            }
        }

        self.cells[..write_y * width].fill(EMPTY);
        cleared
    }

    /// Row `piece` would come to rest in if dropped straight down
    pub fn landing_y(&self, piece: &Tetromino) -> i32 {
        let mut dy = 0;
        while self.can_place(piece, 0, dy + 1, piece.rotation) {
            dy += 1;
        }
        piece.y + dy
    }
}

/// Live board: grid, active piece and piece supply
#[derive(Debug, Clone)]
pub struct Board {
    grid: Grid,
    active: Option<Tetromino>,
    generator: PieceGenerator,
    /// Increments on every successful spawn
    piece_id: u32,
}

impl Board {
    /// # Panics
    ///
    /// Panics if either dimension is below `MIN_BOARD_DIM`.
    pub fn new(width: u16, height: u16, seed: u32) -> Self {
        Self::with_generator(width, height, PieceGenerator::new(seed))
    }

    /// `None` when either dimension is below `MIN_BOARD_DIM`
    pub fn try_new(width: u16, height: u16, seed: u32) -> Option<Self> {
        (width >= MIN_BOARD_DIM && height >= MIN_BOARD_DIM).then(|| Self::new(width, height, seed))
    }

    /// # Panics
    ///
    /// Panics if either dimension is below `MIN_BOARD_DIM`.
    pub fn with_generator(width: u16, height: u16, generator: PieceGenerator) -> Self {
        assert!(
            width >= MIN_BOARD_DIM && height >= MIN_BOARD_DIM,
            "board {width}x{height} is smaller than {MIN_BOARD_DIM}x{MIN_BOARD_DIM}"
        );
        Self {
            grid: Grid::new(width, height),
            active: None,
            generator,
            piece_id: 0,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[cfg(test)]
    pub(crate) fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn width(&self) -> u16 {
        self.grid.width
    }

    pub fn height(&self) -> u16 {
        self.grid.height
    }

    pub fn active(&self) -> Option<&Tetromino> {
        self.active.as_ref()
    }

    pub fn piece_id(&self) -> u32 {
        self.piece_id
    }

    /// Kind the next spawn will use
    pub fn next_kind(&self) -> PieceKind {
        self.generator.peek()
    }

    /// Spawn a new active piece from the generator
    ///
    /// Returns false and leaves no active piece when the spawn position collides.
    pub fn spawn(&mut self) -> bool {
        let piece = Tetromino::spawn(self.generator.draw(), self.grid.width);
        if !self.grid.can_place(&piece, 0, 0, piece.rotation) {
            self.active = None;
            return false;
        }
        self.active = Some(piece);
        self.piece_id = self.piece_id.wrapping_add(1);
        true
    }

    /// Check a hypothetical displacement of `piece` against the grid (pure)
    pub fn can_move(&self, piece: &Tetromino, dx: i32, dy: i32, rotation: Rotation) -> bool {
        self.grid.can_place(piece, dx, dy, rotation)
    }

    fn try_shift(&mut self, dx: i32, dy: i32) -> bool {
        let Some(piece) = self.active.as_mut() else {
            return false;
        };
        if !self.grid.can_place(piece, dx, dy, piece.rotation) {
            return false;
        }
        piece.x += dx;
        piece.y += dy;
        true
    }

    pub fn move_left(&mut self) -> bool {
        self.try_shift(-1, 0)
    }

    pub fn move_right(&mut self) -> bool {
        self.try_shift(1, 0)
    }

    /// Rotate clockwise in place; a colliding rotation is rejected, never kicked
    pub fn rotate_cw(&mut self) -> bool {
        let Some(piece) = self.active.as_mut() else {
            return false;
        };
        let next = piece.rotation.rotate_cw();
        if !self.grid.can_place(piece, 0, 0, next) {
            return false;
        }
        piece.rotation = next;
        true
    }

    /// Move down one row; false means the piece has landed (or there is none)
    pub fn soft_drop_step(&mut self) -> bool {
        self.try_shift(0, 1)
    }

    /// Drop to the landing row without locking; returns rows travelled
    pub fn hard_drop(&mut self) -> u32 {
        let mut rows = 0;
        while self.soft_drop_step() {
            rows += 1;
        }
        rows
    }

    /// Lock the active piece into the grid and clear it
    ///
    /// Returns false on overflow (a mino above the visible top). With no active
    /// piece this is a no-op that reports success.
    pub fn lock_current(&mut self) -> bool {
        match self.active.take() {
            Some(piece) => self.grid.lock_piece(&piece),
            None => true,
        }
    }

    /// Remove full rows; returns how many were removed
    pub fn clear_full_lines(&mut self) -> usize {
        self.grid.clear_full_rows()
    }

    /// Empty the grid and drop the active piece; does not spawn
    pub fn reset(&mut self) {
        self.grid.clear();
        self.active = None;
    }

    /// Immutable copy of the board for rendering or planning
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            grid: self.grid.clone(),
            active: self.active,
            next: self.generator.peek(),
            piece_id: self.piece_id,
        }
    }
}
