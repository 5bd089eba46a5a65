//! Game sessions
//!
//! A [`Session`] owns one board and runs the five-state machine over it:
//! human play, local AI play, advisor-driven play, paused and game over.
//! Sessions are synchronous; the ledger and advisor they may hold do their
//! own I/O off the caller's thread.
//!
//! # Example
//!
//! ```
//! use tetris_ai_session::{Session, SessionConfig};
//! use tetris_ai_types::{PlayerType, UiState};
//!
//! let config = SessionConfig::default().with_player(PlayerType::Ai);
//! let mut session = Session::new(config).unwrap();
//! session.start();
//! for _ in 0..100 {
//!     session.tick();
//! }
//! assert_eq!(session.ui_state(), UiState::Playing);
//! assert!(session.board().piece_id() > 1);
//! ```

pub mod config;
pub mod pair;
pub mod session;
pub mod state;

pub use config::{ConfigError, SessionConfig};
pub use pair::SessionPair;
pub use session::{Session, SessionSnapshot};
pub use state::SessionState;
