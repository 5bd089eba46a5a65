//! Session state variants

use tetris_ai_engine::Pilot;
use tetris_ai_types::{PlayerType, UiState};

/// Exactly one of these is active per session
///
/// The automated variants carry their pilot, so a paused session resumes
/// with the plan it had.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Human control
    Playing,
    /// Local search drives the piece
    AiPlaying(Pilot),
    /// The external advisor drives the piece
    ExternalPlaying(Pilot),
    /// Suspended; holds the state to resume, if one was captured
    Paused(Option<Box<SessionState>>),
    GameOver,
}

impl SessionState {
    /// Fresh playing variant for a player type
    pub fn initial(player: PlayerType) -> Self {
        match player {
            PlayerType::Human => SessionState::Playing,
            PlayerType::Ai => SessionState::AiPlaying(Pilot::new()),
            PlayerType::External => SessionState::ExternalPlaying(Pilot::new()),
        }
    }

    pub fn ui_state(&self) -> UiState {
        match self {
            SessionState::Playing
            | SessionState::AiPlaying(_)
            | SessionState::ExternalPlaying(_) => UiState::Playing,
            SessionState::Paused(_) => UiState::Paused,
            SessionState::GameOver => UiState::GameOver,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Playing => "playing",
            SessionState::AiPlaying(_) => "ai_playing",
            SessionState::ExternalPlaying(_) => "external_playing",
            SessionState::Paused(_) => "paused",
            SessionState::GameOver => "game_over",
        }
    }

    /// Pilot of the active or paused automated variant
    pub fn pilot(&self) -> Option<&Pilot> {
        match self {
            SessionState::AiPlaying(p) | SessionState::ExternalPlaying(p) => Some(p),
            SessionState::Paused(Some(target)) => target.pilot(),
            _ => None,
        }
    }

    pub(crate) fn pilot_mut(&mut self) -> Option<&mut Pilot> {
        match self {
            SessionState::AiPlaying(p) | SessionState::ExternalPlaying(p) => Some(p),
            SessionState::Paused(Some(target)) => target.pilot_mut(),
            _ => None,
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState::Playing
    }
}
