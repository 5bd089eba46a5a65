//! AI engine - board evaluation, move search and staged execution
//!
//! Everything here is pure computation on top of `tetris-ai-core`. The search
//! never mutates the live board: it borrows the grid immutably and runs each
//! candidate on its own clone.
//!
//! - [`evaluator`]: weighted heuristic over a settled grid
//! - [`search`]: exhaustive rotation x column enumeration
//! - [`pilot`]: turns a plan into one intent per throttled tick
//!
//! # Example
//!
//! ```
//! use tetris_ai_core::Grid;
//! use tetris_ai_engine::{find_best_move, MoveCandidate};
//! use tetris_ai_types::{PieceKind, Rotation};
//!
//! let grid = Grid::new(10, 20);
//! let best = find_best_move(&grid, PieceKind::O).unwrap();
//! assert_eq!(best, MoveCandidate::new(-1, Rotation::North));
//! ```

pub mod evaluator;
pub mod pilot;
pub mod search;

pub use evaluator::{evaluate, BoardFeatures, Evaluator, EvaluatorWeights};
pub use pilot::{ai_cadence, external_cadence, Pilot};
pub use search::{find_best_move, MoveCandidate, MoveSearch, ScoredMove};
