//! Partial-update vocabulary shared by every synchronization backend
//!
//! An [`UpdateSet`] is a batch of dotted-path field writes (`player1.score`, `status`, ...)
//! applied atomically, optionally guarded by a status precondition. The in-process mutator
//! ([`crate::MatchState::apply_update`]) and the shared-store adapter accept exactly the same
//! sets, so the rules engine never knows which one it is talking to.

use thiserror::Error;

use crate::attack::Attack;
use crate::board::Board;
use crate::tray::Tray;
use crate::types::{MatchStatus, Millis, ParticipantId, PlayerSlot};

/// Field of a player namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerField {
    Participant,
    Board,
    Pieces,
    Score,
    IncomingAttack,
    LockedUntil,
    LastSeen,
}

impl PlayerField {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerField::Participant => "uid",
            PlayerField::Board => "board",
            PlayerField::Pieces => "pieces",
            PlayerField::Score => "score",
            PlayerField::IncomingAttack => "incomingAttack",
            PlayerField::LockedUntil => "lockedUntil",
            PlayerField::LastSeen => "lastSeen",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "uid" => Some(PlayerField::Participant),
            "board" => Some(PlayerField::Board),
            "pieces" => Some(PlayerField::Pieces),
            "score" => Some(PlayerField::Score),
            "incomingAttack" => Some(PlayerField::IncomingAttack),
            "lockedUntil" => Some(PlayerField::LockedUntil),
            "lastSeen" => Some(PlayerField::LastSeen),
            _ => None,
        }
    }
}

/// Address of one writable field of a match record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldPath {
    Player(PlayerSlot, PlayerField),
    Status,
    Winner,
    StartedAt,
}

impl FieldPath {
    /// Dotted path, e.g. `player2.incomingAttack`
    pub fn to_dotted(&self) -> String {
        match self {
            FieldPath::Player(slot, field) => format!("{}.{}", slot.as_str(), field.as_str()),
            FieldPath::Status => "status".to_string(),
            FieldPath::Winner => "winner".to_string(),
            FieldPath::StartedAt => "startedAt".to_string(),
        }
    }

    pub fn parse(path: &str) -> Option<Self> {
        match path.split_once('.') {
            Some((slot, field)) => Some(FieldPath::Player(
                PlayerSlot::from_str(slot)?,
                PlayerField::from_str(field)?,
            )),
            None => match path {
                "status" => Some(FieldPath::Status),
                "winner" => Some(FieldPath::Winner),
                "startedAt" => Some(FieldPath::StartedAt),
                _ => None,
            },
        }
    }
}

/// One typed field write
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    Participant(PlayerSlot, Option<ParticipantId>),
    Board(PlayerSlot, Board),
    Pieces(PlayerSlot, Tray),
    Score(PlayerSlot, u32),
    IncomingAttack(PlayerSlot, Option<Attack>),
    LockedUntil(PlayerSlot, Millis),
    LastSeen(PlayerSlot, Millis),
    Status(MatchStatus),
    Winner(Option<ParticipantId>),
    StartedAt(Millis),
}

impl FieldUpdate {
    pub fn path(&self) -> FieldPath {
        match self {
            FieldUpdate::Participant(slot, _) => FieldPath::Player(*slot, PlayerField::Participant),
            FieldUpdate::Board(slot, _) => FieldPath::Player(*slot, PlayerField::Board),
            FieldUpdate::Pieces(slot, _) => FieldPath::Player(*slot, PlayerField::Pieces),
            FieldUpdate::Score(slot, _) => FieldPath::Player(*slot, PlayerField::Score),
            FieldUpdate::IncomingAttack(slot, _) => {
                FieldPath::Player(*slot, PlayerField::IncomingAttack)
            }
            FieldUpdate::LockedUntil(slot, _) => FieldPath::Player(*slot, PlayerField::LockedUntil),
            FieldUpdate::LastSeen(slot, _) => FieldPath::Player(*slot, PlayerField::LastSeen),
            FieldUpdate::Status(_) => FieldPath::Status,
            FieldUpdate::Winner(_) => FieldPath::Winner,
            FieldUpdate::StartedAt(_) => FieldPath::StartedAt,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpdateError {
    #[error("precondition failed: expected status {expected:?}, found {actual:?}")]
    PreconditionFailed {
        expected: MatchStatus,
        actual: MatchStatus,
    },
    #[error("illegal status transition {from:?} -> {to:?}")]
    InvalidTransition { from: MatchStatus, to: MatchStatus },
    #[error("winner can only be recorded when the match finishes")]
    WinnerWithoutFinish,
}

/// Atomic batch of field writes
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UpdateSet {
    precondition: Option<MatchStatus>,
    fields: Vec<FieldUpdate>,
}

impl UpdateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply the set only if the match status equals `status` at commit time
    pub fn require_status(mut self, status: MatchStatus) -> Self {
        self.precondition = Some(status);
        self
    }

    pub fn with(mut self, field: FieldUpdate) -> Self {
        self.push(field);
        self
    }

    /// Add a write; a later write to the same path replaces the earlier one
    pub fn push(&mut self, field: FieldUpdate) {
        let path = field.path();
        self.fields.retain(|f| f.path() != path);
        self.fields.push(field);
    }

    pub fn precondition(&self) -> Option<MatchStatus> {
        self.precondition
    }

    pub fn fields(&self) -> &[FieldUpdate] {
        &self.fields
    }

    pub fn get(&self, path: FieldPath) -> Option<&FieldUpdate> {
        self.fields.iter().find(|f| f.path() == path)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Dotted paths in write order
    pub fn paths(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.path().to_dotted()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dotted_paths_round_trip() {
        let paths = [
            FieldPath::Player(PlayerSlot::Player1, PlayerField::Score),
            FieldPath::Player(PlayerSlot::Player2, PlayerField::IncomingAttack),
            FieldPath::Player(PlayerSlot::Player2, PlayerField::Participant),
            FieldPath::Status,
            FieldPath::Winner,
            FieldPath::StartedAt,
        ];
        for path in paths {
            assert_eq!(FieldPath::parse(&path.to_dotted()), Some(path));
        }
        assert_eq!(
            FieldPath::Player(PlayerSlot::Player1, PlayerField::Score).to_dotted(),
            "player1.score"
        );
        assert_eq!(FieldPath::parse("player3.score"), None);
        assert_eq!(FieldPath::parse("player1.shape"), None);
        assert_eq!(FieldPath::parse("createdAt"), None);
    }

    #[test]
    fn test_push_replaces_same_path() {
        let set = UpdateSet::new()
            .with(FieldUpdate::Score(PlayerSlot::Player1, 8))
            .with(FieldUpdate::Board(PlayerSlot::Player1, Board::new()))
            .with(FieldUpdate::Score(PlayerSlot::Player1, 0));

        assert_eq!(set.fields().len(), 2);
        assert_eq!(
            set.get(FieldPath::Player(PlayerSlot::Player1, PlayerField::Score)),
            Some(&FieldUpdate::Score(PlayerSlot::Player1, 0))
        );
        assert_eq!(set.paths(), vec!["player1.board", "player1.score"]);
    }
}
