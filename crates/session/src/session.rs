//! Game session - board, scoring and the state machine driving them
//!
//! The owner calls [`Session::tick`] at the drop interval and forwards player
//! input to [`Session::handle`]. Everything else (planning, advisor polling,
//! line clears, game over, score submission) happens inside those two calls.

use std::sync::Arc;

use log::{debug, info, warn};
use tetris_ai_adapter::{AdvisorRequest, MoveAdvisor};
use tetris_ai_core::{line_clear_score, Board, BoardSnapshot};
use tetris_ai_engine::{ai_cadence, external_cadence, MoveCandidate, MoveSearch, Pilot};
use tetris_ai_ledger::{Ledger, SubmitHandle};
use tetris_ai_types::{GameAction, PlayerType, UiState};

use crate::config::{ConfigError, SessionConfig};
use crate::state::SessionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    GameOver,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub board: BoardSnapshot,
    pub ui_state: UiState,
    pub player: PlayerType,
    pub level: u32,
    pub score: u32,
    /// Score of the last finished game, kept after submission zeroes `score`
    pub final_score: Option<u32>,
    pub lines: u32,
}

pub struct Session {
    config: SessionConfig,
    board: Board,
    state: SessionState,
    search: MoveSearch,
    score: u32,
    final_score: Option<u32>,
    lines: u32,
    last_cleared: usize,
    ledger: Option<Arc<Ledger>>,
    advisor: Option<Box<dyn MoveAdvisor>>,
    /// Set when the advisor answered with a move the board cannot use
    advice_rejected: bool,
    submission: Option<SubmitHandle>,
}

impl Session {
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            board: Board::new(config.width, config.height, config.seed),
            state: SessionState::initial(config.player),
            search: MoveSearch::default(),
            score: 0,
            final_score: None,
            lines: 0,
            last_cleared: 0,
            ledger: None,
            advisor: None,
            advice_rejected: false,
            submission: None,
            config,
        })
    }

    /// Record finished games in `ledger`
    pub fn with_ledger(mut self, ledger: Arc<Ledger>) -> Self {
        self.ledger = Some(ledger);
        self
    }

    /// Advisor consulted while the external player is active
    pub fn with_advisor(mut self, advisor: Box<dyn MoveAdvisor>) -> Self {
        self.set_advisor(advisor);
        self
    }

    pub fn set_advisor(&mut self, advisor: Box<dyn MoveAdvisor>) {
        self.advisor = Some(advisor);
        self.advice_rejected = false;
    }

    pub fn with_search(mut self, search: MoveSearch) -> Self {
        self.search = search;
        self
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn ui_state(&self) -> UiState {
        self.state.ui_state()
    }

    /// Pilot of the automated player, also while paused
    pub fn pilot(&self) -> Option<&Pilot> {
        self.state.pilot()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn final_score(&self) -> Option<u32> {
        self.final_score
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn drop_interval_ms(&self) -> u32 {
        tetris_ai_core::drop_interval_ms(self.config.level)
    }

    /// Lines cleared by the most recent placement; reading resets it
    pub fn take_last_cleared(&mut self) -> usize {
        std::mem::take(&mut self.last_cleared)
    }

    /// Submission started when the last game ended, if any
    pub fn take_submission(&mut self) -> Option<SubmitHandle> {
        self.submission.take()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            board: self.board.snapshot(),
            ui_state: self.ui_state(),
            player: self.config.player,
            level: self.config.level,
            score: self.score,
            final_score: self.final_score,
            lines: self.lines,
        }
    }

    /// Spawn the first piece; only meaningful in a playing state
    pub fn start(&mut self) {
        let state = std::mem::take(&mut self.state);
        self.state = match state {
            SessionState::Playing => {
                let flow = self.ensure_piece();
                self.after(flow, SessionState::Playing)
            }
            SessionState::AiPlaying(mut pilot) => {
                pilot.reset();
                let flow = self.ensure_piece();
                if flow == Flow::Continue {
                    pilot.plan_with(&self.board, &self.search);
                }
                self.after(flow, SessionState::AiPlaying(pilot))
            }
            SessionState::ExternalPlaying(mut pilot) => {
                pilot.reset();
                let flow = self.ensure_piece();
                self.after(flow, SessionState::ExternalPlaying(pilot))
            }
            other => other,
        };
        info!("session started as {}", self.state.name());
    }

    /// Advance one gravity step; paused and finished sessions ignore it
    pub fn tick(&mut self) {
        let state = std::mem::take(&mut self.state);
        self.state = match state {
            SessionState::Playing => {
                let flow = self.gravity(None);
                self.after(flow, SessionState::Playing)
            }
            SessionState::AiPlaying(mut pilot) => {
                let flow = self.ai_tick(&mut pilot);
                self.after(flow, SessionState::AiPlaying(pilot))
            }
            SessionState::ExternalPlaying(mut pilot) => {
                let flow = self.external_tick(&mut pilot);
                self.after(flow, SessionState::ExternalPlaying(pilot))
            }
            other => other,
        };
    }

    /// Apply a player action; ignored while paused or after game over
    ///
    /// Automated states accept actions too, which lets a human nudge the
    /// piece between the pilot's intents.
    pub fn handle(&mut self, action: GameAction) {
        let state = std::mem::take(&mut self.state);
        self.state = match state {
            SessionState::Playing => {
                let flow = self.apply(action, None);
                self.after(flow, SessionState::Playing)
            }
            SessionState::AiPlaying(mut pilot) => {
                let flow = self.apply(action, Some(&mut pilot));
                if flow == Flow::Continue {
                    pilot.plan_with(&self.board, &self.search);
                }
                self.after(flow, SessionState::AiPlaying(pilot))
            }
            SessionState::ExternalPlaying(mut pilot) => {
                let flow = self.apply(action, Some(&mut pilot));
                self.after(flow, SessionState::ExternalPlaying(pilot))
            }
            other => other,
        };
    }

    pub fn toggle_pause(&mut self) {
        let state = std::mem::take(&mut self.state);
        self.state = match state {
            SessionState::Paused(Some(target)) => *target,
            SessionState::Paused(None) => SessionState::initial(self.config.player),
            SessionState::GameOver => SessionState::GameOver,
            active => SessionState::Paused(Some(Box::new(active))),
        };
        info!("session now {}", self.state.name());
    }

    /// Fresh board and score, back in the configured player's state
    pub fn restart(&mut self) {
        self.clear_progress();
        self.state = SessionState::initial(self.config.player);
        info!("session restarted");
        self.start();
    }

    /// Empty the board and zero the score without leaving the current state
    ///
    /// Pilots lose their plans; a playing session spawns on its next tick.
    pub fn reset(&mut self) {
        self.clear_progress();
        if let Some(pilot) = self.state.pilot_mut() {
            pilot.reset();
        }
        info!("session reset in {}", self.state.name());
    }

    /// Submit the running score to the ledger now and zero it
    ///
    /// Blocks up to the ledger's submit timeout. False without a ledger or
    /// when the score does not make the table.
    pub fn submit_score(&mut self) -> bool {
        let Some(ledger) = self.ledger.clone() else {
            return false;
        };
        if self.score == 0 {
            return false;
        }
        let score = std::mem::take(&mut self.score);
        ledger.submit(&self.config.player_name, score)
    }

    fn clear_progress(&mut self) {
        self.score = 0;
        self.final_score = None;
        self.lines = 0;
        self.last_cleared = 0;
        self.advice_rejected = false;
        self.board.reset();
        if let Some(advisor) = self.advisor.as_mut() {
            advisor.reset();
        }
    }

    fn ensure_piece(&mut self) -> Flow {
        if self.board.active().is_some() || self.board.spawn() {
            Flow::Continue
        } else {
            Flow::GameOver
        }
    }

    fn after(&mut self, flow: Flow, keep: SessionState) -> SessionState {
        match flow {
            Flow::Continue => keep,
            Flow::GameOver => self.enter_game_over(),
        }
    }

    fn enter_game_over(&mut self) -> SessionState {
        info!(
            "game over: score {} lines {} pieces {}",
            self.score,
            self.lines,
            self.board.piece_id()
        );
        self.final_score = Some(self.score);
        if self.score > 0 {
            if let Some(ledger) = &self.ledger {
                let score = std::mem::take(&mut self.score);
                self.submission = Some(ledger.submit_async(&self.config.player_name, score));
            }
        }
        SessionState::GameOver
    }

    fn record_clear(&mut self, cleared: usize) {
        self.last_cleared = cleared;
        if cleared > 0 {
            self.lines += cleared as u32;
            self.score += line_clear_score(cleared, self.config.level);
            debug!("cleared {cleared} lines, score {}", self.score);
        }
    }

    /// Lock the active piece, clear lines and spawn the next one
    fn settle(&mut self, pilot: Option<&mut Pilot>) -> Flow {
        if let Some(pilot) = pilot {
            pilot.on_piece_placed();
        }
        if !self.board.lock_current() {
            return Flow::GameOver;
        }
        let cleared = self.board.clear_full_lines();
        self.record_clear(cleared);
        if !self.board.spawn() {
            return Flow::GameOver;
        }
        Flow::Continue
    }

    fn gravity(&mut self, pilot: Option<&mut Pilot>) -> Flow {
        if self.board.active().is_none() {
            return self.ensure_piece();
        }
        if self.board.soft_drop_step() {
            return Flow::Continue;
        }
        self.settle(pilot)
    }

    fn apply(&mut self, action: GameAction, pilot: Option<&mut Pilot>) -> Flow {
        if self.board.active().is_none() {
            return Flow::Continue;
        }
        match action {
            GameAction::MoveLeft => {
                self.board.move_left();
            }
            GameAction::MoveRight => {
                self.board.move_right();
            }
            GameAction::RotateCw => {
                self.board.rotate_cw();
            }
            GameAction::SoftDrop => {
                self.board.soft_drop_step();
            }
            GameAction::HardDrop => {
                self.board.hard_drop();
                return self.settle(pilot);
            }
        }
        Flow::Continue
    }

    fn act(&mut self, pilot: &mut Pilot) -> Flow {
        let intent = self.board.active().and_then(|piece| pilot.next_intent(piece));
        match intent {
            Some(action) => {
                debug!("pilot intent {}", action.as_str());
                self.apply(action, Some(pilot))
            }
            None => Flow::Continue,
        }
    }

    fn ai_tick(&mut self, pilot: &mut Pilot) -> Flow {
        pilot.plan_with(&self.board, &self.search);
        if pilot.throttle(ai_cadence(self.config.level)) && self.act(pilot) == Flow::GameOver {
            return Flow::GameOver;
        }
        let flow = self.gravity(Some(&mut *pilot));
        if flow == Flow::Continue {
            pilot.plan_with(&self.board, &self.search);
        }
        flow
    }

    /// The board only moves while the advisor is up and has placed the active piece
    ///
    /// A piece is spawned first even while the advisor is down, as in
    /// `start`: the request describes the active piece.
    fn external_tick(&mut self, pilot: &mut Pilot) -> Flow {
        if self.ensure_piece() == Flow::GameOver {
            return Flow::GameOver;
        }
        self.consult_advisor(pilot);
        if !self.advisor_available() || pilot.needs_plan(self.board.piece_id()) {
            pilot.reset_throttle();
            return Flow::Continue;
        }
        if pilot.throttle(external_cadence(self.config.level)) && self.act(pilot) == Flow::GameOver {
            return Flow::GameOver;
        }
        self.gravity(Some(&mut *pilot))
    }

    fn advisor_available(&self) -> bool {
        !self.advice_rejected && self.advisor.as_ref().is_some_and(|a| a.is_available())
    }

    /// Ask the advisor for the active piece's placement until one is accepted
    fn consult_advisor(&mut self, pilot: &mut Pilot) {
        if self.board.active().is_none() || !pilot.needs_plan(self.board.piece_id()) {
            return;
        }
        let piece_id = self.board.piece_id();
        let width = self.board.width();
        let request = AdvisorRequest::from_board(&self.board);
        let Some(advisor) = self.advisor.as_mut() else {
            return;
        };
        let Some(advice) = advisor.advise(&request) else {
            return;
        };
        let candidate = MoveCandidate::new(advice.op_x, advice.rotation());
        if candidate.column_in_range(width) {
            debug!(
                "advisor plan for piece {piece_id}: x={} rotation={}",
                candidate.x,
                candidate.rotation.index()
            );
            self.advice_rejected = false;
            pilot.set_plan(piece_id, Some(candidate));
        } else {
            if !self.advice_rejected {
                warn!("advisor column {} outside the board, ignoring", advice.op_x);
            }
            self.advice_rejected = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tetris_ai_adapter::AdvisorMove;
    use tetris_ai_ledger::{LedgerConfig, MemoryStore};
    use tetris_ai_types::Rotation;

    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    /// Advisor whose availability and answer the test controls
    struct ScriptedAdvisor {
        up: Arc<AtomicBool>,
        calls: Arc<AtomicUsize>,
        reply: AdvisorMove,
    }

    impl MoveAdvisor for ScriptedAdvisor {
        fn advise(&mut self, _request: &AdvisorRequest) -> Option<AdvisorMove> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.up.load(Ordering::SeqCst).then_some(self.reply)
        }

        fn is_available(&self) -> bool {
            self.up.load(Ordering::SeqCst)
        }

        fn reset(&mut self) {}
    }

    /// Advisor that stays reachable but stops answering after `answers` replies
    struct StallingAdvisor {
        answers: usize,
        reply: AdvisorMove,
    }

    impl MoveAdvisor for StallingAdvisor {
        fn advise(&mut self, _request: &AdvisorRequest) -> Option<AdvisorMove> {
            if self.answers == 0 {
                return None;
            }
            self.answers -= 1;
            Some(self.reply)
        }

        fn is_available(&self) -> bool {
            true
        }

        fn reset(&mut self) {}
    }

    fn config(player: PlayerType) -> SessionConfig {
        SessionConfig::default().with_player(player)
    }

    fn scripted(up: bool, reply: AdvisorMove) -> (ScriptedAdvisor, Arc<AtomicBool>, Arc<AtomicUsize>) {
        let flag = Arc::new(AtomicBool::new(up));
        let calls = Arc::new(AtomicUsize::new(0));
        let advisor = ScriptedAdvisor {
            up: flag.clone(),
            calls: calls.clone(),
            reply,
        };
        (advisor, flag, calls)
    }

    #[test]
    fn start_spawns_first_piece() {
        let mut session = Session::new(config(PlayerType::Human)).unwrap();
        assert!(session.board().active().is_none());
        session.start();
        assert!(session.board().active().is_some());
        assert_eq!(session.ui_state(), UiState::Playing);
    }

    #[test]
    fn human_hard_drop_locks_and_spawns() {
        let mut session = Session::new(config(PlayerType::Human)).unwrap();
        session.start();
        session.handle(GameAction::HardDrop);
        assert_eq!(session.board().grid().occupied_count(), 4);
        assert_eq!(session.board().piece_id(), 2);
    }

    #[test]
    fn human_piece_falls_one_row_per_tick() {
        let mut session = Session::new(config(PlayerType::Human)).unwrap();
        session.start();
        let y = session.board().active().unwrap().y;
        session.tick();
        assert_eq!(session.board().active().unwrap().y, y + 1);
    }

    #[test]
    fn ai_plans_on_start() {
        let mut session = Session::new(config(PlayerType::Ai)).unwrap();
        session.start();
        let pilot = session.pilot().unwrap();
        assert_eq!(pilot.planned_for(), Some(1));
        assert!(pilot.plan().is_some());
    }

    #[test]
    fn pause_suspends_and_resumes_with_plan() {
        let mut session = Session::new(config(PlayerType::Ai)).unwrap();
        session.start();
        session.tick();
        let before = session.pilot().cloned();
        let board = session.board().snapshot();

        session.toggle_pause();
        assert_eq!(session.ui_state(), UiState::Paused);
        session.tick();
        session.handle(GameAction::HardDrop);
        assert_eq!(session.board().snapshot(), board);

        session.toggle_pause();
        assert!(matches!(session.state(), SessionState::AiPlaying(_)));
        assert_eq!(session.pilot().cloned(), before);
    }

    #[test]
    fn external_without_answer_freezes_board() {
        let (advisor, _, calls) = scripted(false, AdvisorMove { op_x: 0, op_rotate: 0 });
        let mut session = Session::new(config(PlayerType::External))
            .unwrap()
            .with_advisor(Box::new(advisor));
        session.start();
        let frozen = session.board().snapshot();
        for _ in 0..25 {
            session.tick();
        }
        assert_eq!(session.board().snapshot(), frozen);
        assert_eq!(calls.load(Ordering::SeqCst), 25);
    }

    #[test]
    fn external_without_advisor_stays_frozen() {
        let mut session = Session::new(config(PlayerType::External)).unwrap();
        session.start();
        let frozen = session.board().snapshot();
        for _ in 0..10 {
            session.tick();
        }
        assert_eq!(session.board().snapshot(), frozen);
        assert_eq!(session.ui_state(), UiState::Playing);
    }

    #[test]
    fn external_follows_advice_when_available() {
        let (advisor, up, _) = scripted(false, AdvisorMove { op_x: 0, op_rotate: 1 });
        let mut session = Session::new(config(PlayerType::External))
            .unwrap()
            .with_advisor(Box::new(advisor));
        session.start();
        session.tick();
        let frozen = session.board().snapshot();
        assert_eq!(session.board().piece_id(), 1);

        up.store(true, Ordering::SeqCst);
        session.tick();
        assert_eq!(
            session.pilot().unwrap().plan(),
            Some(MoveCandidate::new(0, Rotation::East))
        );
        assert_ne!(session.board().snapshot(), frozen);

        for _ in 0..40 {
            session.tick();
        }
        assert!(session.board().piece_id() > 1);
    }

    #[test]
    fn external_waits_for_each_piece_plan() {
        let advisor = StallingAdvisor {
            answers: 1,
            reply: AdvisorMove { op_x: 0, op_rotate: 0 },
        };
        let mut session = Session::new(config(PlayerType::External))
            .unwrap()
            .with_advisor(Box::new(advisor));
        session.start();
        for _ in 0..200 {
            if session.board().piece_id() >= 2 {
                break;
            }
            session.tick();
        }
        assert_eq!(session.board().piece_id(), 2);
        assert_eq!(session.board().grid().occupied_count(), 4);

        let waiting = session.board().snapshot();
        for _ in 0..60 {
            session.tick();
        }
        assert_eq!(session.board().snapshot(), waiting);
        assert!(session.pilot().unwrap().needs_plan(2));
        assert_eq!(session.ui_state(), UiState::Playing);
    }

    #[test]
    fn external_reset_spawns_then_waits_for_advisor() {
        let (advisor, _, calls) = scripted(false, AdvisorMove { op_x: 0, op_rotate: 0 });
        let mut session = Session::new(config(PlayerType::External))
            .unwrap()
            .with_advisor(Box::new(advisor));
        session.start();
        session.reset();
        assert!(session.board().active().is_none());

        session.tick();
        assert_eq!(session.board().piece_id(), 2);
        let frozen = session.board().snapshot();
        for _ in 0..10 {
            session.tick();
        }
        assert_eq!(session.board().snapshot(), frozen);
        assert_eq!(session.board().piece_id(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 11);
    }

    #[test]
    fn external_rejects_out_of_range_column() {
        let (advisor, _, _) = scripted(true, AdvisorMove { op_x: 40, op_rotate: 0 });
        let mut session = Session::new(config(PlayerType::External))
            .unwrap()
            .with_advisor(Box::new(advisor));
        session.start();
        let frozen = session.board().snapshot();
        for _ in 0..5 {
            session.tick();
        }
        assert_eq!(session.board().snapshot(), frozen);
        assert!(session.pilot().unwrap().plan().is_none());
    }

    #[test]
    fn stacking_without_clears_ends_the_game() {
        let mut session = Session::new(config(PlayerType::Human)).unwrap();
        session.start();
        for _ in 0..200 {
            session.handle(GameAction::HardDrop);
            if session.ui_state() == UiState::GameOver {
                break;
            }
        }
        assert_eq!(session.ui_state(), UiState::GameOver);

        let grid = session.board().snapshot();
        session.tick();
        session.handle(GameAction::MoveLeft);
        session.toggle_pause();
        assert_eq!(session.ui_state(), UiState::GameOver);
        assert_eq!(session.board().snapshot(), grid);
    }

    #[test]
    fn restart_returns_to_configured_player() {
        let mut session = Session::new(config(PlayerType::Ai)).unwrap();
        session.start();
        session.toggle_pause();
        session.restart();
        assert!(matches!(session.state(), SessionState::AiPlaying(_)));
        assert_eq!(session.score(), 0);
        assert_eq!(session.board().grid().occupied_count(), 0);
        assert!(session.board().active().is_some());
    }

    #[test]
    fn reset_keeps_state_and_clears_board() {
        let mut session = Session::new(config(PlayerType::Human)).unwrap();
        session.start();
        session.handle(GameAction::HardDrop);
        session.toggle_pause();
        session.reset();
        assert_eq!(session.ui_state(), UiState::Paused);
        assert_eq!(session.board().grid().occupied_count(), 0);

        session.toggle_pause();
        session.tick();
        assert!(session.board().active().is_some());
    }

    #[test]
    fn ai_clears_lines_and_scores() {
        let mut session = Session::new(config(PlayerType::Ai)).unwrap();
        session.start();
        for _ in 0..3000 {
            session.tick();
            if session.lines() > 0 || session.ui_state() == UiState::GameOver {
                break;
            }
        }
        assert!(session.lines() > 0);
        assert!(session.score() > 0);
        assert_eq!(session.score() % 100, 0);
    }

    #[test]
    fn last_cleared_reads_once() {
        let mut session = Session::new(config(PlayerType::Human)).unwrap();
        session.record_clear(2);
        assert_eq!(session.score(), 300 * 6);
        assert_eq!(session.take_last_cleared(), 2);
        assert_eq!(session.take_last_cleared(), 0);
    }

    #[test]
    fn game_over_submits_positive_score() {
        let store = Arc::new(MemoryStore::new());
        let ledger = Arc::new(Ledger::with_store(store.clone(), &LedgerConfig::default()).unwrap());
        let mut session = Session::new(config(PlayerType::Human))
            .unwrap()
            .with_ledger(ledger.clone());
        session.start();
        session.record_clear(1);
        for _ in 0..200 {
            session.handle(GameAction::HardDrop);
            if session.ui_state() == UiState::GameOver {
                break;
            }
        }
        assert_eq!(session.ui_state(), UiState::GameOver);
        assert_eq!(session.final_score(), Some(600));
        assert_eq!(session.score(), 0);

        let handle = session.take_submission().unwrap();
        assert!(handle.wait(Duration::from_secs(5)));
        assert_eq!(ledger.highest_score(), Some(600));
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn zero_score_is_not_submitted() {
        let ledger = Arc::new(
            Ledger::with_store(Arc::new(MemoryStore::new()), &LedgerConfig::default()).unwrap(),
        );
        let mut session = Session::new(config(PlayerType::Human))
            .unwrap()
            .with_ledger(ledger);
        session.start();
        for _ in 0..200 {
            session.handle(GameAction::HardDrop);
        }
        assert_eq!(session.ui_state(), UiState::GameOver);
        assert!(session.take_submission().is_none());
        assert!(!session.submit_score());
    }
}
