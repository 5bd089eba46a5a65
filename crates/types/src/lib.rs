//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (board engine, AI search, session state machine, advisor protocol).
//!
//! # Board Dimensions
//!
//! Default playfield dimensions (sessions may configure others):
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19, row 0 is the top)
//! - **Spawn position**: horizontally centered at `width / 2 - 2`, two rows above the top
//!
//! # Timing
//!
//! The session is ticked once per gravity interval. The interval is derived from the
//! configured level:
//!
//! | Level | Interval |
//! |-------|----------|
//! | 1 | 700ms |
//! | 2 | 650ms |
//! | 6 | 450ms |
//! | 10+ | 250ms |
//!
//! # Examples
//!
//! ```
//! use tetris_ai_types::{GameAction, PieceKind, Rotation, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! let piece = PieceKind::T;
//! assert_eq!(piece.color_id(), 3);
//! assert_eq!(PieceKind::from_color_id(3), Some(PieceKind::T));
//!
//! let rotated = Rotation::North.rotate_cw();
//! assert_eq!(rotated, Rotation::East);
//! assert_eq!(rotated.index(), 1);
//!
//! assert_eq!(GameAction::HardDrop.as_str(), "hardDrop");
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 20);
//! ```

/// Default board width in cells (10 columns)
pub const BOARD_WIDTH: u16 = 10;

/// Default board height in cells (20 rows)
pub const BOARD_HEIGHT: u16 = 20;

/// Smallest width or height a board may be constructed with
pub const MIN_BOARD_DIM: u16 = 4;

/// Row at which new pieces spawn (two rows above the visible top)
pub const SPAWN_Y: i32 = -2;

/// Row at which the AI search starts its trial pieces
pub const SEARCH_START_Y: i32 = -4;

/// Lowest row a searched placement may land at and still count as entering the board
pub const SEARCH_MIN_LANDING_Y: i32 = -3;

/// Gravity interval at level 1 (700ms per row)
pub const BASE_DROP_MS: u32 = 700;

/// Gravity speed-up per level (50ms)
pub const DROP_STEP_MS: u32 = 50;

/// Lowest configurable level
pub const MIN_LEVEL: u32 = 1;

/// Highest level that still speeds up gravity
pub const MAX_LEVEL: u32 = 10;

/// Level used when none is configured
pub const DEFAULT_LEVEL: u32 = 6;

/// From this level on, automated players act at their fast cadence
pub const FAST_CADENCE_LEVEL: u32 = 8;

/// Ticks between AI intents at normal and fast cadence
pub const AI_TICKS_NORMAL: u32 = 2;
pub const AI_TICKS_FAST: u32 = 1;

/// Ticks between advisor-driven intents at normal and fast cadence
pub const EXTERNAL_TICKS_NORMAL: u32 = 3;
pub const EXTERNAL_TICKS_FAST: u32 = 2;

/// Line clear scoring table
///
/// Base points for clearing N lines at level 1:
/// - 0 lines: 0 points
/// - 1 line: 100 points
/// - 2 lines: 300 points
/// - 3 lines: 600 points
/// - 4 lines: 1000 points
///
/// Points are multiplied by the level.
pub const LINE_SCORES: [u32; 5] = [0, 100, 300, 600, 1000];

/// A cell on the game grid
///
/// - `0`: Empty cell
/// - `1..=7`: Cell filled by a locked piece, holding that piece's color tag
pub type Cell = u8;

/// The empty cell value
pub const EMPTY: Cell = 0;

/// The seven tetromino piece kinds
///
/// Each piece has a distinct shape and color tag:
/// - **I** (1): horizontal bar
/// - **O** (2): 2x2 square
/// - **T** (3): T-shaped
/// - **S** (4): S-shaped
/// - **Z** (5): Z-shaped (mirror of S)
/// - **J** (6): J-shaped
/// - **L** (7): L-shaped (mirror of J)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// Every kind, in catalog (color tag) order
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Position of this kind in [`PieceKind::ALL`]
    pub const fn index(self) -> usize {
        match self {
            PieceKind::I => 0,
            PieceKind::O => 1,
            PieceKind::T => 2,
            PieceKind::S => 3,
            PieceKind::Z => 4,
            PieceKind::J => 5,
            PieceKind::L => 6,
        }
    }

    /// Color/identity tag written into the grid when this kind locks (1..=7)
    pub const fn color_id(self) -> Cell {
        self.index() as Cell + 1
    }

    /// Reverse of [`PieceKind::color_id`]
    ///
    /// # Examples
    ///
    /// ```
    /// use tetris_ai_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_color_id(1), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_color_id(7), Some(PieceKind::L));
    /// assert_eq!(PieceKind::from_color_id(0), None);
    /// assert_eq!(PieceKind::from_color_id(8), None);
    /// ```
    pub fn from_color_id(id: Cell) -> Option<Self> {
        match id {
            1..=7 => Some(Self::ALL[(id - 1) as usize]),
            _ => None,
        }
    }

    /// Number of distinct rotation states worth searching
    ///
    /// The square looks the same in every rotation, and the line, S and Z
    /// pieces repeat after a half turn.
    pub const fn max_rotations(self) -> u8 {
        match self {
            PieceKind::O => 1,
            PieceKind::I | PieceKind::S | PieceKind::Z => 2,
            PieceKind::T | PieceKind::J | PieceKind::L => 4,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::O => "o",
            PieceKind::T => "t",
            PieceKind::S => "s",
            PieceKind::Z => "z",
            PieceKind::J => "j",
            PieceKind::L => "l",
        }
    }
}

/// Rotation states
///
/// - **North**: Spawn orientation (index 0)
/// - **East**: Rotated 90° clockwise (index 1)
/// - **South**: Rotated 180° (index 2)
/// - **West**: Rotated 270° clockwise (index 3)
///
/// The rotation cycle goes: North → East → South → West → North
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rotation {
    North,
    East,
    South,
    West,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [
        Rotation::North,
        Rotation::East,
        Rotation::South,
        Rotation::West,
    ];

    /// Rotation index (0..=3)
    pub const fn index(self) -> usize {
        match self {
            Rotation::North => 0,
            Rotation::East => 1,
            Rotation::South => 2,
            Rotation::West => 3,
        }
    }

    /// Rotation for an index, wrapping modulo 4
    ///
    /// # Examples
    ///
    /// ```
    /// use tetris_ai_types::Rotation;
    ///
    /// assert_eq!(Rotation::from_index(0), Rotation::North);
    /// assert_eq!(Rotation::from_index(3), Rotation::West);
    /// assert_eq!(Rotation::from_index(5), Rotation::East);
    /// ```
    pub const fn from_index(index: usize) -> Self {
        Self::ALL[index % 4]
    }

    /// Rotate clockwise (90°)
    ///
    /// # Examples
    ///
    /// ```
    /// use tetris_ai_types::Rotation;
    ///
    /// assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
    /// assert_eq!(Rotation::East.rotate_cw(), Rotation::South);
    /// assert_eq!(Rotation::South.rotate_cw(), Rotation::West);
    /// assert_eq!(Rotation::West.rotate_cw(), Rotation::North);
    /// ```
    pub const fn rotate_cw(self) -> Self {
        Self::from_index(self.index() + 1)
    }
}

/// Intents accepted by a session
///
/// These are used by human input, the local AI and the external advisor alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Rotate piece 90° clockwise (no wall kicks)
    RotateCw,
    /// Drop piece one cell down
    SoftDrop,
    /// Drop piece to its landing row, then lock it
    HardDrop,
}

impl GameAction {
    /// Convert to camelCase string for logs
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::RotateCw => "rotateCw",
            GameAction::SoftDrop => "softDrop",
            GameAction::HardDrop => "hardDrop",
        }
    }
}

/// Who controls a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlayerType {
    #[default]
    Human,
    Ai,
    External,
}

impl PlayerType {
    /// Parse player type from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tetris_ai_types::PlayerType;
    ///
    /// assert_eq!(PlayerType::from_str("AI"), Some(PlayerType::Ai));
    /// assert_eq!(PlayerType::from_str("human"), Some(PlayerType::Human));
    /// assert_eq!(PlayerType::from_str("external"), Some(PlayerType::External));
    /// assert_eq!(PlayerType::from_str("robot"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "human" => Some(PlayerType::Human),
            "ai" => Some(PlayerType::Ai),
            "external" | "server" => Some(PlayerType::External),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerType::Human => "human",
            PlayerType::Ai => "ai",
            PlayerType::External => "external",
        }
    }
}

/// UI-facing session state tag
///
/// AI and advisor-driven play both report [`UiState::Playing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UiState {
    Playing,
    Paused,
    GameOver,
}

impl UiState {
    pub fn as_str(&self) -> &'static str {
        match self {
            UiState::Playing => "playing",
            UiState::Paused => "paused",
            UiState::GameOver => "game_over",
        }
    }
}
