//! Falling-block puzzle engine with a heuristic AI player (workspace facade crate).
//!
//! The implementation lives in dedicated crates under `crates/`; this package
//! re-exports them under short names and ships the headless runner.

pub use tetris_ai_adapter as adapter;
pub use tetris_ai_core as core;
pub use tetris_ai_engine as engine;
pub use tetris_ai_ledger as ledger;
pub use tetris_ai_session as session;
pub use tetris_ai_types as types;
