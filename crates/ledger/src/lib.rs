//! Score ledger - persistent top-N high-score table
//!
//! One [`Ledger`] is built explicitly and handed to every session that should
//! record scores (wrap it in an `Arc` to share it). Sessions only ever see
//! failures as a `false` outcome: a broken score file never stops a game.
//!
//! # Storage
//!
//! The default [`JsonFileStore`] keeps a human-readable JSON array:
//!
//! ```json
//! [
//!   { "playerName": "Alice", "score": 1000 },
//!   { "playerName": "Bob", "score": 800 }
//! ]
//! ```
//!
//! # Rules
//!
//! - At most 10 entries, best first; ties keep the earlier entry ahead
//! - A score qualifies when the table is not full or it beats the last entry
//! - Zero never qualifies
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use tetris_ai_ledger::{Ledger, LedgerConfig, MemoryStore};
//!
//! let ledger = Ledger::with_store(Arc::new(MemoryStore::new()), &LedgerConfig::default()).unwrap();
//! assert!(ledger.submit("Ada", 1200));
//! assert_eq!(ledger.highest_score(), Some(1200));
//! ```

pub mod entry;
pub mod ledger;
pub mod store;

pub use entry::{ScoreEntry, DEFAULT_PLAYER_NAME};
pub use ledger::{Ledger, LedgerConfig, SubmitHandle};
pub use store::{JsonFileStore, MemoryStore, ScoreStore};
