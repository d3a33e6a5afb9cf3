//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (rules engine, client session, store adapter).
//!
//! # Board Dimensions
//!
//! Each player owns an 8x8 board:
//!
//! - **Width**: 8 columns (indexed 0-7)
//! - **Height**: 8 rows (indexed 0-7)
//! - **Tray**: 3 pending pieces per player
//!
//! # Match Rules
//!
//! Timing values are in milliseconds:
//!
//! | Field | Value | Description |
//! |-------|-------|-------------|
//! | `win_score` | 100 | First player to reach it wins |
//! | `stalemate_penalty` | 10 | Points lost on a board wipe |
//! | `stalemate_freeze_ms` | 3000 | Board freeze after a board wipe |
//! | `attack_line_threshold` | 3 | Lines in one turn needed to arm an attack |
//! | `attack_lock_ms` | 7000 | How long an attack locks a tray slot |
//! | `liveness_warning_ms` | 5000 | Opponent silence before "connection degraded" |
//! | `liveness_timeout_ms` | 10000 | Opponent silence before claiming the match |
//! | `heartbeat_interval_ms` | 1000 | Own `lastSeen` write interval |
//! | `liveness_check_interval_ms` | 500 | Opponent `lastSeen` check interval |
//!
//! # Examples
//!
//! ```
//! use gridlock_types::{MatchStatus, PlayerSlot, RulesConfig, ShapeId, BOARD_SIZE};
//!
//! let shape = ShapeId::from_str("L").unwrap();
//! assert_eq!(shape, ShapeId::L);
//!
//! assert_eq!(PlayerSlot::Player1.opponent(), PlayerSlot::Player2);
//! assert!(MatchStatus::Waiting.can_transition_to(MatchStatus::Playing));
//!
//! assert_eq!(RulesConfig::STANDARD.win_score, 100);
//! assert_eq!(BOARD_SIZE, 8);
//! ```

use std::fmt;

/// Board edge length in cells (8 columns, 8 rows)
pub const BOARD_SIZE: u8 = 8;

/// Total number of cells on a board
pub const BOARD_CELLS: usize = (BOARD_SIZE as usize) * (BOARD_SIZE as usize);

/// Number of slots in a player's tray
pub const TRAY_SIZE: usize = 3;

/// Number of shapes in the fixed catalog
pub const SHAPE_COUNT: usize = 9;

/// Milliseconds since the Unix epoch (or since any fixed origin shared by a match)
pub type Millis = u64;

/// Tunable match rules, passed by reference into the rules engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RulesConfig {
    pub win_score: u32,
    pub stalemate_penalty: u32,
    pub stalemate_freeze_ms: Millis,
    pub attack_line_threshold: u32,
    pub attack_lock_ms: Millis,
    pub liveness_warning_ms: Millis,
    pub liveness_timeout_ms: Millis,
    pub heartbeat_interval_ms: Millis,
    pub liveness_check_interval_ms: Millis,
}

impl RulesConfig {
    pub const STANDARD: RulesConfig = RulesConfig {
        win_score: 100,
        stalemate_penalty: 10,
        stalemate_freeze_ms: 3000,
        attack_line_threshold: 3,
        attack_lock_ms: 7000,
        liveness_warning_ms: 5000,
        liveness_timeout_ms: 10_000,
        heartbeat_interval_ms: 1000,
        liveness_check_interval_ms: 500,
    };
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// The nine shapes of the piece catalog
///
/// Naming follows the footprint (columns x rows) for the straight pieces:
/// - **Mono**: single cell
/// - **Domino2x1** / **Domino1x2**: horizontal / vertical domino
/// - **Tromino3x1** / **Tromino1x3**: horizontal / vertical bar of three
/// - **Square**: 2x2 block
/// - **L**, **T**, **Z**: four-cell tetrominoes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShapeId {
    Mono,
    Domino2x1,
    Domino1x2,
    Tromino3x1,
    Tromino1x3,
    Square,
    L,
    T,
    Z,
}

impl ShapeId {
    /// All shapes in catalog order
    pub const ALL: [ShapeId; SHAPE_COUNT] = [
        ShapeId::Mono,
        ShapeId::Domino2x1,
        ShapeId::Domino1x2,
        ShapeId::Tromino3x1,
        ShapeId::Tromino1x3,
        ShapeId::Square,
        ShapeId::L,
        ShapeId::T,
        ShapeId::Z,
    ];

    /// Parse a shape id from its wire name (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use gridlock_types::ShapeId;
    ///
    /// assert_eq!(ShapeId::from_str("1x1"), Some(ShapeId::Mono));
    /// assert_eq!(ShapeId::from_str("3x1"), Some(ShapeId::Tromino3x1));
    /// assert_eq!(ShapeId::from_str("z"), Some(ShapeId::Z));
    /// assert_eq!(ShapeId::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "1x1" => Some(ShapeId::Mono),
            "2x1" => Some(ShapeId::Domino2x1),
            "1x2" => Some(ShapeId::Domino1x2),
            "3x1" => Some(ShapeId::Tromino3x1),
            "1x3" => Some(ShapeId::Tromino1x3),
            "2x2" => Some(ShapeId::Square),
            "l" => Some(ShapeId::L),
            "t" => Some(ShapeId::T),
            "z" => Some(ShapeId::Z),
            _ => None,
        }
    }

    /// Wire name of the shape
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeId::Mono => "1x1",
            ShapeId::Domino2x1 => "2x1",
            ShapeId::Domino1x2 => "1x2",
            ShapeId::Tromino3x1 => "3x1",
            ShapeId::Tromino1x3 => "1x3",
            ShapeId::Square => "2x2",
            ShapeId::L => "L",
            ShapeId::T => "T",
            ShapeId::Z => "Z",
        }
    }

    /// Position in [`ShapeId::ALL`]
    pub fn index(&self) -> usize {
        *self as usize
    }
}

/// Which side of the match a player state belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerSlot {
    Player1,
    Player2,
}

impl PlayerSlot {
    pub fn opponent(&self) -> Self {
        match self {
            PlayerSlot::Player1 => PlayerSlot::Player2,
            PlayerSlot::Player2 => PlayerSlot::Player1,
        }
    }

    /// Field-path prefix of this player's namespace
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerSlot::Player1 => "player1",
            PlayerSlot::Player2 => "player2",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "player1" => Some(PlayerSlot::Player1),
            "player2" => Some(PlayerSlot::Player2),
            _ => None,
        }
    }
}

/// Match lifecycle
///
/// The only legal transitions are `Waiting -> Playing` and `Playing -> Finished`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MatchStatus {
    Waiting,
    Playing,
    Finished,
}

impl MatchStatus {
    pub fn can_transition_to(&self, next: MatchStatus) -> bool {
        matches!(
            (self, next),
            (MatchStatus::Waiting, MatchStatus::Playing)
                | (MatchStatus::Playing, MatchStatus::Finished)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Waiting => "waiting",
            MatchStatus::Playing => "playing",
            MatchStatus::Finished => "finished",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "waiting" => Some(MatchStatus::Waiting),
            "playing" => Some(MatchStatus::Playing),
            "finished" => Some(MatchStatus::Finished),
            _ => None,
        }
    }
}

/// Opaque per-session participant identifier issued by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Whether a match is played against the shared store or entirely in-process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchMode {
    Solo,
    Multiplayer,
}

impl MatchMode {
    pub fn is_multiplayer(&self) -> bool {
        matches!(self, MatchMode::Multiplayer)
    }
}
