//! Pieces module - the piece catalog
//!
//! Every kind is defined by one 4x4 occupancy matrix for rotation 0. The other
//! three rotations are derived by turning the matrix clockwise, and all 28
//! matrices are computed at compile time.
//!
//! Rotation is kick-free: a rotation that would collide is rejected, never offset.

use crate::types::{PieceKind, Rotation, SPAWN_Y};

/// 4x4 occupancy matrix, indexed `[row][col]`; 1 = occupied
pub type ShapeMatrix = [[u8; 4]; 4];

/// Offset of a single mino relative to piece origin, as (col, row)
pub type MinoOffset = (i8, i8);

/// Shape of a piece - 4 mino offsets from piece origin, in row-major order
pub type PieceShape = [MinoOffset; 4];

/// Rotation 0 matrices, in [`PieceKind::ALL`] order
const BASE_MATRICES: [ShapeMatrix; 7] = [
    // I
    [[0, 0, 0, 0], [1, 1, 1, 1], [0, 0, 0, 0], [0, 0, 0, 0]],
    // O
    [[0, 1, 1, 0], [0, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
    // T
    [[0, 1, 0, 0], [1, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
    // S
    [[0, 1, 1, 0], [1, 1, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
    // Z
    [[1, 1, 0, 0], [0, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
    // J
    [[1, 0, 0, 0], [1, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
    // L
    [[0, 0, 1, 0], [1, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
];

const fn rotate_matrix_cw(m: &ShapeMatrix) -> ShapeMatrix {
    let mut out = [[0u8; 4]; 4];
    let mut y = 0;
    while y < 4 {
        let mut x = 0;
        while x < 4 {
            out[x][3 - y] = m[y][x];
            x += 1;
        }
        y += 1;
    }
    out
}

const fn build_matrices() -> [[ShapeMatrix; 4]; 7] {
    let mut all = [[[[0u8; 4]; 4]; 4]; 7];
    let mut k = 0;
    while k < 7 {
        all[k][0] = BASE_MATRICES[k];
        let mut r = 1;
        while r < 4 {
            all[k][r] = rotate_matrix_cw(&all[k][r - 1]);
            r += 1;
        }
        k += 1;
    }
    all
}

const fn matrix_offsets(m: &ShapeMatrix) -> PieceShape {
    let mut out = [(0i8, 0i8); 4];
    let mut n = 0;
    let mut row = 0;
    while row < 4 {
        let mut col = 0;
        while col < 4 {
            if m[row][col] != 0 && n < 4 {
                out[n] = (col as i8, row as i8);
                n += 1;
            }
            col += 1;
        }
        row += 1;
    }
    out
}

const fn build_shapes(matrices: &[[ShapeMatrix; 4]; 7]) -> [[PieceShape; 4]; 7] {
    let mut all = [[[(0i8, 0i8); 4]; 4]; 7];
    let mut k = 0;
    while k < 7 {
        let mut r = 0;
        while r < 4 {
            all[k][r] = matrix_offsets(&matrices[k][r]);
            r += 1;
        }
        k += 1;
    }
    all
}

static MATRICES: [[ShapeMatrix; 4]; 7] = build_matrices();
static SHAPES: [[PieceShape; 4]; 7] = build_shapes(&build_matrices());

/// Get the occupancy matrix for a piece kind and rotation
pub fn shape_matrix(kind: PieceKind, rotation: Rotation) -> &'static ShapeMatrix {
    &MATRICES[kind.index()][rotation.index()]
}

/// Get the shape (mino offsets) for a piece kind and rotation
pub fn get_shape(kind: PieceKind, rotation: Rotation) -> PieceShape {
    SHAPES[kind.index()][rotation.index()]
}

/// Column at which new pieces spawn on a board of the given width
pub fn spawn_x(width: u16) -> i32 {
    i32::from(width) / 2 - 2
}

/// A positioned piece: kind, rotation and the board position of its 4x4 matrix origin
///
/// `y` may be negative while the piece is still partly above the visible grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tetromino {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i32,
    pub y: i32,
}

impl Tetromino {
    /// Create a piece at an explicit position, in rotation 0
    pub fn new(kind: PieceKind, x: i32, y: i32) -> Self {
        Self {
            kind,
            rotation: Rotation::North,
            x,
            y,
        }
    }

    /// Create a new piece at the spawn position of a board with the given width
    pub fn spawn(kind: PieceKind, width: u16) -> Self {
        Self::new(kind, spawn_x(width), SPAWN_Y)
    }

    /// Get the shape (mino offsets) for current rotation
    pub fn shape(&self) -> PieceShape {
        get_shape(self.kind, self.rotation)
    }

    /// Get the occupancy matrix for current rotation
    pub fn matrix(&self) -> &'static ShapeMatrix {
        shape_matrix(self.kind, self.rotation)
    }

    /// Absolute board coordinates of the four minos
    pub fn cells(&self) -> [(i32, i32); 4] {
        self.shape()
            .map(|(dx, dy)| (self.x + i32::from(dx), self.y + i32::from(dy)))
    }

    /// Topmost occupied row in board coordinates
    pub fn top(&self) -> i32 {
        self.cells().iter().map(|&(_, y)| y).min().unwrap_or(self.y)
    }

    pub fn color_id(&self) -> u8 {
        self.kind.color_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_rotation_has_four_minos() {
        for kind in PieceKind::ALL {
            for rotation in Rotation::ALL {
                let filled: u32 = shape_matrix(kind, rotation)
                    .iter()
                    .flatten()
                    .map(|&c| u32::from(c))
                    .sum();
                assert_eq!(filled, 4, "{:?} {:?}", kind, rotation);
            }
        }
    }

    #[test]
    fn i_piece_turns_into_column_two() {
        assert_eq!(
            get_shape(PieceKind::I, Rotation::North),
            [(0, 1), (1, 1), (2, 1), (3, 1)]
        );
        assert_eq!(
            get_shape(PieceKind::I, Rotation::East),
            [(2, 0), (2, 1), (2, 2), (2, 3)]
        );
    }

    #[test]
    fn four_clockwise_turns_restore_the_base_matrix() {
        for kind in PieceKind::ALL {
            let mut m = *shape_matrix(kind, Rotation::North);
            for _ in 0..4 {
                m = rotate_matrix_cw(&m);
            }
            assert_eq!(&m, shape_matrix(kind, Rotation::North));
        }
    }

    #[test]
    fn spawn_is_centered_two_rows_up() {
        let piece = Tetromino::spawn(PieceKind::T, 10);
        assert_eq!(piece.x, 3);
        assert_eq!(piece.y, -2);
        assert_eq!(piece.rotation, Rotation::North);
    }

    #[test]
    fn cells_are_offset_by_position() {
        let piece = Tetromino::new(PieceKind::O, 2, 5);
        assert_eq!(piece.cells(), [(3, 5), (4, 5), (3, 6), (4, 6)]);
        assert_eq!(piece.top(), 5);
    }
}
