//! Core board engine - pure, deterministic, and testable
//!
//! This crate holds the game rules and nothing else. It has no I/O, no timers
//! and no threads, so the same code drives live play, the move search and
//! headless tests.
//!
//! # Module Structure
//!
//! - [`pieces`]: the seven piece shapes, their four rotations, color tags
//! - [`rng`]: seeded 7-bag piece generator
//! - [`board`]: [`Grid`] (collision, lock, line clear) and the live [`Board`]
//! - [`snapshot`]: owned read-only copies of a board
//! - [`scoring`]: line-clear points and gravity interval per level
//!
//! # Game Rules
//!
//! - **Spawn**: pieces appear horizontally centered, two rows above the visible
//!   top, in rotation 0.
//! - **Spawn buffer**: minos above row 0 never collide; locking while any mino
//!   is still up there is an overflow and ends the game.
//! - **Rotation**: clockwise only, no wall kicks.
//! - **Line clear**: full rows vanish and everything above falls by the number
//!   of rows removed.
//!
//! # Example
//!
//! ```
//! use tetris_ai_core::Board;
//!
//! let mut board = Board::new(10, 20, 12345);
//! assert!(board.spawn());
//!
//! board.move_right();
//! board.rotate_cw();
//! board.hard_drop();
//! assert!(board.lock_current());
//!
//! assert_eq!(board.clear_full_lines(), 0);
//! assert_eq!(board.grid().occupied_count(), 4);
//! ```

pub mod board;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use tetris_ai_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, Grid};
pub use pieces::{get_shape, shape_matrix, spawn_x, ShapeMatrix, Tetromino};
pub use rng::{PieceGenerator, SimpleRng};
pub use scoring::{drop_interval_ms, line_clear_score};
pub use snapshot::BoardSnapshot;
