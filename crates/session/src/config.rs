//! Session configuration

use std::fmt;
use std::time::Duration;

use tetris_ai_core::drop_interval_ms;
use tetris_ai_ledger::DEFAULT_PLAYER_NAME;
use tetris_ai_types::{
    PlayerType, BOARD_HEIGHT, BOARD_WIDTH, DEFAULT_LEVEL, MAX_LEVEL, MIN_BOARD_DIM, MIN_LEVEL,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    BoardTooSmall { width: u16, height: u16 },
    LevelOutOfRange(u32),
    InvalidValue { var: &'static str, value: String },
}

impl ConfigError {
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::BoardTooSmall { .. } => "board_too_small",
            ConfigError::LevelOutOfRange(_) => "level_out_of_range",
            ConfigError::InvalidValue { .. } => "invalid_value",
        }
    }

    pub fn message(&self) -> String {
        match self {
            ConfigError::BoardTooSmall { width, height } => {
                format!("board {width}x{height} is smaller than {MIN_BOARD_DIM}x{MIN_BOARD_DIM}")
            }
            ConfigError::LevelOutOfRange(level) => {
                format!("level {level} outside {MIN_LEVEL}..={MAX_LEVEL}")
            }
            ConfigError::InvalidValue { var, value } => format!("{var}: cannot parse {value:?}"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub width: u16,
    pub height: u16,
    /// Difficulty level; drives gravity and automated-player cadence
    pub level: u32,
    pub player: PlayerType,
    pub seed: u32,
    /// Name recorded with submitted scores
    pub player_name: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
            level: DEFAULT_LEVEL,
            player: PlayerType::Human,
            seed: 1,
            player_name: DEFAULT_PLAYER_NAME.to_string(),
        }
    }
}

fn parse_var<T: std::str::FromStr>(var: &'static str) -> Result<Option<T>, ConfigError> {
    match std::env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { var, value: raw }),
        Err(_) => Ok(None),
    }
}

impl SessionConfig {
    /// Create from environment variables, falling back to defaults for unset ones
    ///
    /// - `TETRIS_WIDTH`, `TETRIS_HEIGHT`: board size (default 10x20)
    /// - `TETRIS_LEVEL`: 1..=10 (default 6)
    /// - `TETRIS_PLAYER`: `human`, `ai` or `external`
    /// - `TETRIS_SEED`: piece generator seed (default 1)
    /// - `TETRIS_PLAYER_NAME`: name for the score table
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(width) = parse_var("TETRIS_WIDTH")? {
            config.width = width;
        }
        if let Some(height) = parse_var("TETRIS_HEIGHT")? {
            config.height = height;
        }
        if let Some(level) = parse_var("TETRIS_LEVEL")? {
            config.level = level;
        }
        if let Some(seed) = parse_var("TETRIS_SEED")? {
            config.seed = seed;
        }
        if let Ok(raw) = std::env::var("TETRIS_PLAYER") {
            config.player = PlayerType::from_str(&raw).ok_or(ConfigError::InvalidValue {
                var: "TETRIS_PLAYER",
                value: raw,
            })?;
        }
        if let Ok(name) = std::env::var("TETRIS_PLAYER_NAME") {
            if !name.trim().is_empty() {
                config.player_name = name.trim().to_string();
            }
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width < MIN_BOARD_DIM || self.height < MIN_BOARD_DIM {
            return Err(ConfigError::BoardTooSmall {
                width: self.width,
                height: self.height,
            });
        }
        if !(MIN_LEVEL..=MAX_LEVEL).contains(&self.level) {
            return Err(ConfigError::LevelOutOfRange(self.level));
        }
        Ok(())
    }

    /// Interval at which the game loop should call `tick`
    pub fn drop_interval(&self) -> Duration {
        Duration::from_millis(u64::from(drop_interval_ms(self.level)))
    }

    pub fn with_player(mut self, player: PlayerType) -> Self {
        self.player = player;
        self
    }
}
