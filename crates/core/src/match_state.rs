//! Match state module - both player states plus the shared status/winner fields
//!
//! Each [`PlayerState`] has exactly one writer: the client of the participant that owns it.
//! The match-level `status`/`winner` fields are the exception; they move through the guarded
//! status machine of [`MatchStatus`] so that only the first claim of a finished match commits.

use crate::attack::Attack;
use crate::board::Board;
use crate::rng::PieceGenerator;
use crate::tray::Tray;
use crate::types::{MatchMode, MatchStatus, Millis, ParticipantId, PlayerSlot};
use crate::update::{FieldUpdate, UpdateError, UpdateSet};

/// Participant id used for the empty seat of a solo match
pub const SOLO_OPPONENT_ID: &str = "bot";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerState {
    /// Owner of this seat; `None` while a waiting match has no second player
    pub participant: Option<ParticipantId>,
    pub board: Board,
    pub tray: Tray,
    pub score: u32,
    pub incoming_attack: Option<Attack>,
    /// Board-wide freeze after a stalemate wipe
    pub locked_until: Millis,
    pub last_seen: Millis,
}

impl PlayerState {
    pub fn new(participant: Option<ParticipantId>, tray: Tray, now: Millis) -> Self {
        Self {
            participant,
            board: Board::new(),
            tray,
            score: 0,
            incoming_attack: None,
            locked_until: 0,
            last_seen: now,
        }
    }

    pub fn is_frozen(&self, now: Millis) -> bool {
        now < self.locked_until
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchState {
    pub player1: PlayerState,
    pub player2: PlayerState,
    pub status: MatchStatus,
    pub winner: Option<ParticipantId>,
    pub created_at: Millis,
    pub started_at: Option<Millis>,
}

impl MatchState {
    /// A multiplayer match waiting for its second participant
    pub fn new_waiting(host: ParticipantId, generator: &mut PieceGenerator, now: Millis) -> Self {
        Self {
            player1: PlayerState::new(Some(host), generator.generate_tray(), now),
            player2: PlayerState::new(None, generator.generate_tray(), now),
            status: MatchStatus::Waiting,
            winner: None,
            created_at: now,
            started_at: None,
        }
    }

    /// A single-player match, already playing; the second seat is an idle placeholder
    pub fn new_solo(me: ParticipantId, generator: &mut PieceGenerator, now: Millis) -> Self {
        Self {
            player1: PlayerState::new(Some(me), generator.generate_tray(), now),
            player2: PlayerState::new(
                Some(ParticipantId::new(SOLO_OPPONENT_ID)),
                Tray::empty(),
                now,
            ),
            status: MatchStatus::Playing,
            winner: None,
            created_at: now,
            started_at: Some(now),
        }
    }

    pub fn player(&self, slot: PlayerSlot) -> &PlayerState {
        match slot {
            PlayerSlot::Player1 => &self.player1,
            PlayerSlot::Player2 => &self.player2,
        }
    }

    pub fn player_mut(&mut self, slot: PlayerSlot) -> &mut PlayerState {
        match slot {
            PlayerSlot::Player1 => &mut self.player1,
            PlayerSlot::Player2 => &mut self.player2,
        }
    }

    /// Seat held by `participant`, if any
    pub fn slot_of(&self, participant: &ParticipantId) -> Option<PlayerSlot> {
        [PlayerSlot::Player1, PlayerSlot::Player2]
            .into_iter()
            .find(|&slot| self.player(slot).participant.as_ref() == Some(participant))
    }

    pub fn is_finished(&self) -> bool {
        self.status == MatchStatus::Finished
    }

    pub fn mode(&self) -> MatchMode {
        match &self.player2.participant {
            Some(p) if p.as_str() == SOLO_OPPONENT_ID => MatchMode::Solo,
            _ => MatchMode::Multiplayer,
        }
    }

    /// Apply an update set atomically.
    ///
    /// Either every field is written or, on error, the state is left untouched. The status
    /// precondition is checked against the state before the set is applied.
    pub fn apply_update(&mut self, update: &UpdateSet) -> Result<(), UpdateError> {
        if let Some(expected) = update.precondition() {
            if self.status != expected {
                return Err(UpdateError::PreconditionFailed {
                    expected,
                    actual: self.status,
                });
            }
        }

        let mut next = self.clone();
        for field in update.fields() {
            next.apply_field(field)?;
        }
        if next.winner.is_some() && next.winner != self.winner && !next.is_finished() {
            return Err(UpdateError::WinnerWithoutFinish);
        }

        *self = next;
        Ok(())
    }

    fn apply_field(&mut self, field: &FieldUpdate) -> Result<(), UpdateError> {
        match field {
            FieldUpdate::Participant(slot, id) => self.player_mut(*slot).participant = id.clone(),
            FieldUpdate::Board(slot, board) => self.player_mut(*slot).board = *board,
            FieldUpdate::Pieces(slot, tray) => self.player_mut(*slot).tray = *tray,
            FieldUpdate::Score(slot, score) => self.player_mut(*slot).score = *score,
            FieldUpdate::IncomingAttack(slot, attack) => {
                self.player_mut(*slot).incoming_attack = *attack
            }
            FieldUpdate::LockedUntil(slot, t) => self.player_mut(*slot).locked_until = *t,
            FieldUpdate::LastSeen(slot, t) => self.player_mut(*slot).last_seen = *t,
            FieldUpdate::Status(status) => {
                if !self.status.can_transition_to(*status) {
                    return Err(UpdateError::InvalidTransition {
                        from: self.status,
                        to: *status,
                    });
                }
                self.status = *status;
            }
            FieldUpdate::Winner(winner) => self.winner = winner.clone(),
            FieldUpdate::StartedAt(t) => self.started_at = Some(*t),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn waiting() -> MatchState {
        let mut gen = PieceGenerator::new(1);
        MatchState::new_waiting(ParticipantId::new("alice"), &mut gen, 1_000)
    }

    #[test]
    fn test_new_waiting() {
        let state = waiting();
        assert_eq!(state.status, MatchStatus::Waiting);
        assert_eq!(state.player1.tray.remaining(), 3);
        assert_eq!(state.player2.tray.remaining(), 3);
        assert!(state.player2.participant.is_none());
        assert_eq!(state.mode(), MatchMode::Multiplayer);
        assert_eq!(
            state.slot_of(&ParticipantId::new("alice")),
            Some(PlayerSlot::Player1)
        );
    }

    #[test]
    fn test_new_solo() {
        let mut gen = PieceGenerator::new(1);
        let state = MatchState::new_solo(ParticipantId::new("me"), &mut gen, 0);
        assert_eq!(state.status, MatchStatus::Playing);
        assert!(state.player2.tray.is_empty());
        assert_eq!(state.mode(), MatchMode::Solo);
    }

    #[test]
    fn test_join_transition() {
        let mut state = waiting();
        let join = UpdateSet::new()
            .require_status(MatchStatus::Waiting)
            .with(FieldUpdate::Participant(
                PlayerSlot::Player2,
                Some(ParticipantId::new("bob")),
            ))
            .with(FieldUpdate::Status(MatchStatus::Playing))
            .with(FieldUpdate::StartedAt(2_000));

        state.apply_update(&join).unwrap();
        assert_eq!(state.status, MatchStatus::Playing);
        assert_eq!(state.started_at, Some(2_000));

        // A second joiner loses the race.
        let err = state.apply_update(&join).unwrap_err();
        assert_eq!(
            err,
            UpdateError::PreconditionFailed {
                expected: MatchStatus::Waiting,
                actual: MatchStatus::Playing
            }
        );
    }

    #[test]
    fn test_failed_update_leaves_state_untouched() {
        let mut state = waiting();
        let before = state.clone();
        let bad = UpdateSet::new()
            .with(FieldUpdate::Score(PlayerSlot::Player1, 50))
            .with(FieldUpdate::Status(MatchStatus::Finished));

        assert!(matches!(
            state.apply_update(&bad),
            Err(UpdateError::InvalidTransition { .. })
        ));
        assert_eq!(state, before);
    }

    #[test]
    fn test_winner_requires_finish() {
        let mut state = waiting();
        let bad = UpdateSet::new().with(FieldUpdate::Winner(Some(ParticipantId::new("alice"))));
        assert_eq!(
            state.apply_update(&bad),
            Err(UpdateError::WinnerWithoutFinish)
        );
    }

    #[test]
    fn test_only_first_finish_claim_commits() {
        let mut gen = PieceGenerator::new(1);
        let mut state = MatchState::new_solo(ParticipantId::new("me"), &mut gen, 0);
        let claim = |who: &str| {
            UpdateSet::new()
                .require_status(MatchStatus::Playing)
                .with(FieldUpdate::Status(MatchStatus::Finished))
                .with(FieldUpdate::Winner(Some(ParticipantId::new(who))))
        };

        state.apply_update(&claim("me")).unwrap();
        assert!(state.apply_update(&claim("bot")).is_err());
        assert_eq!(state.winner, Some(ParticipantId::new("me")));
    }
}
