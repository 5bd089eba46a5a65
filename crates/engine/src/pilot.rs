//! Pilot - staged execution of a planned placement
//!
//! A plan is made once per piece and then played out one intent at a time:
//! rotate until the target rotation is reached, shift toward the target
//! column, then hard drop. A throttle counter spaces intents out over ticks.
//!
//! The pilot does not care where a plan comes from; the local search and the
//! external advisor both feed it through [`Pilot::set_plan`].

use log::debug;
use tetris_ai_core::{Board, Tetromino};
use tetris_ai_types::{
    GameAction, AI_TICKS_FAST, AI_TICKS_NORMAL, EXTERNAL_TICKS_FAST, EXTERNAL_TICKS_NORMAL,
    FAST_CADENCE_LEVEL,
};

use crate::search::{MoveCandidate, MoveSearch};

/// Ticks between local AI intents at a level
pub fn ai_cadence(level: u32) -> u32 {
    if level >= FAST_CADENCE_LEVEL {
        AI_TICKS_FAST
    } else {
        AI_TICKS_NORMAL
    }
}

/// Ticks between advisor-driven intents at a level
pub fn external_cadence(level: u32) -> u32 {
    if level >= FAST_CADENCE_LEVEL {
        EXTERNAL_TICKS_FAST
    } else {
        EXTERNAL_TICKS_NORMAL
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pilot {
    plan: Option<MoveCandidate>,
    /// Piece id the current plan was made for
    planned_for: Option<u32>,
    ticks: u32,
}

impl Pilot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plan(&self) -> Option<MoveCandidate> {
        self.plan
    }

    pub fn planned_for(&self) -> Option<u32> {
        self.planned_for
    }

    /// True until a plan has been recorded for `piece_id`
    pub fn needs_plan(&self, piece_id: u32) -> bool {
        self.planned_for != Some(piece_id)
    }

    /// Record the plan for a piece; `None` means no candidate was found
    pub fn set_plan(&mut self, piece_id: u32, plan: Option<MoveCandidate>) {
        self.plan = plan;
        self.planned_for = Some(piece_id);
    }

    /// Plan the active piece with `search` unless already planned
    ///
    /// Returns true when a search actually ran.
    pub fn plan_with(&mut self, board: &Board, search: &MoveSearch) -> bool {
        let Some(piece) = board.active() else {
            return false;
        };
        if !self.needs_plan(board.piece_id()) {
            return false;
        }
        let plan = search.find_best_move(board.grid(), piece.kind);
        match plan {
            Some(p) => debug!(
                "planned piece {} ({}): x={} rotation={}",
                board.piece_id(),
                piece.kind.as_str(),
                p.x,
                p.rotation.index()
            ),
            None => debug!("no placement for piece {}", board.piece_id()),
        }
        self.set_plan(board.piece_id(), plan);
        true
    }

    /// Drop the plan after a lock so the next piece gets a fresh one
    pub fn on_piece_placed(&mut self) {
        self.plan = None;
        self.planned_for = None;
    }

    pub fn reset(&mut self) {
        self.on_piece_placed();
        self.ticks = 0;
    }

    /// Count a tick; true once every `every` ticks
    pub fn throttle(&mut self, every: u32) -> bool {
        self.ticks += 1;
        if self.ticks >= every {
            self.ticks = 0;
            true
        } else {
            false
        }
    }

    pub fn reset_throttle(&mut self) {
        self.ticks = 0;
    }

    /// Next intent toward the plan for `piece`
    pub fn next_intent(&self, piece: &Tetromino) -> Option<GameAction> {
        let plan = self.plan?;
        if piece.rotation != plan.rotation {
            return Some(GameAction::RotateCw);
        }
        Some(match piece.x.cmp(&plan.x) {
            std::cmp::Ordering::Less => GameAction::MoveRight,
            std::cmp::Ordering::Greater => GameAction::MoveLeft,
            std::cmp::Ordering::Equal => GameAction::HardDrop,
        })
    }
}
