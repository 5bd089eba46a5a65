//! Two-player pairing
//!
//! Both sessions draw the same piece sequence from independent generators
//! and report to the same ledger. Nothing else is shared.

use std::sync::Arc;

use tetris_ai_ledger::Ledger;
use tetris_ai_types::UiState;

use crate::config::{ConfigError, SessionConfig};
use crate::session::Session;

pub struct SessionPair {
    pub left: Session,
    pub right: Session,
}

impl SessionPair {
    /// Pair two configurations; the right side adopts the left side's seed
    pub fn new(
        left: SessionConfig,
        mut right: SessionConfig,
        ledger: Option<Arc<Ledger>>,
    ) -> Result<Self, ConfigError> {
        right.seed = left.seed;
        let mut left = Session::new(left)?;
        let mut right = Session::new(right)?;
        if let Some(ledger) = ledger {
            left = left.with_ledger(Arc::clone(&ledger));
            right = right.with_ledger(ledger);
        }
        Ok(Self { left, right })
    }

    pub fn sessions_mut(&mut self) -> [&mut Session; 2] {
        [&mut self.left, &mut self.right]
    }

    pub fn start(&mut self) {
        for session in self.sessions_mut() {
            session.start();
        }
    }

    pub fn tick(&mut self) {
        for session in self.sessions_mut() {
            session.tick();
        }
    }

    pub fn toggle_pause(&mut self) {
        for session in self.sessions_mut() {
            session.toggle_pause();
        }
    }

    pub fn restart(&mut self) {
        for session in self.sessions_mut() {
            session.restart();
        }
    }

    /// True once both sides have topped out
    pub fn is_over(&self) -> bool {
        self.left.ui_state() == UiState::GameOver && self.right.ui_state() == UiState::GameOver
    }
}
