//! Matchmaking over the document store
//!
//! Look for the oldest match still `waiting`. Its host rejoins as player1. Anyone else claims
//! player2 with one write guarded on `status == waiting`, so of two concurrent joiners only one
//! gets the seat. With nothing waiting, a new match is created and the caller hosts it.

use log::{info, warn};
use serde_json::Value;
use thiserror::Error;

use crate::core::{FieldUpdate, MatchState, PieceGenerator, UpdateSet};
use crate::protocol::{update_to_fields, DecodeError, MatchRecord};
use crate::store::{DocumentStore, Precondition, StoreError};
use crate::types::{MatchStatus, Millis, ParticipantId, PlayerSlot};

#[derive(Debug, Error)]
pub enum MatchmakingError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("claim could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A seat in a match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchTicket {
    pub match_id: String,
    pub role: PlayerSlot,
    /// Match state as of joining
    pub state: MatchState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchmakingOutcome {
    /// New match, waiting for an opponent
    Created(MatchTicket),
    /// Claimed player2 of a waiting match
    Joined(MatchTicket),
    /// Back in a match this participant is already hosting
    Rejoined(MatchTicket),
    /// Another joiner claimed the seat first; try again
    Raced,
}

impl MatchmakingOutcome {
    pub fn ticket(&self) -> Option<&MatchTicket> {
        match self {
            MatchmakingOutcome::Created(t)
            | MatchmakingOutcome::Joined(t)
            | MatchmakingOutcome::Rejoined(t) => Some(t),
            MatchmakingOutcome::Raced => None,
        }
    }

    pub fn into_ticket(self) -> Option<MatchTicket> {
        match self {
            MatchmakingOutcome::Created(t)
            | MatchmakingOutcome::Joined(t)
            | MatchmakingOutcome::Rejoined(t) => Some(t),
            MatchmakingOutcome::Raced => None,
        }
    }
}

/// The player2 claim written by a joiner
pub fn join_update(me: &ParticipantId, now: Millis) -> UpdateSet {
    UpdateSet::new()
        .require_status(MatchStatus::Waiting)
        .with(FieldUpdate::Participant(PlayerSlot::Player2, Some(me.clone())))
        .with(FieldUpdate::LastSeen(PlayerSlot::Player2, now))
        .with(FieldUpdate::Status(MatchStatus::Playing))
        .with(FieldUpdate::StartedAt(now))
}

pub async fn find_match(
    store: &dyn DocumentStore,
    me: &ParticipantId,
    generator: &mut PieceGenerator,
    now: Millis,
) -> Result<MatchmakingOutcome, MatchmakingError> {
    let waiting = Value::from(MatchStatus::Waiting.as_str());
    let found = store.query_eq("status", &waiting, 1).await?;

    let Some(doc) = found.into_iter().next() else {
        let state = MatchState::new_waiting(me.clone(), generator, now);
        let match_id = store.create(MatchRecord::from(&state).to_value()?).await?;
        info!("{} created match {}", me, match_id);
        return Ok(MatchmakingOutcome::Created(MatchTicket {
            match_id,
            role: PlayerSlot::Player1,
            state,
        }));
    };

    let mut state = MatchRecord::from_value(doc.data)?.to_state()?;
    if state.player1.participant.as_ref() == Some(me) {
        info!("{} rejoined match {}", me, doc.id);
        return Ok(MatchmakingOutcome::Rejoined(MatchTicket {
            match_id: doc.id,
            role: PlayerSlot::Player1,
            state,
        }));
    }

    let claim = join_update(me, now);
    let precondition = Precondition::new("status", MatchStatus::Waiting.as_str());
    match store
        .update(&doc.id, update_to_fields(&claim)?, Some(precondition))
        .await
    {
        Ok(()) => {}
        Err(err) if err.is_precondition_failed() => {
            warn!("{} lost the race for match {}", me, doc.id);
            return Ok(MatchmakingOutcome::Raced);
        }
        Err(err) => return Err(err.into()),
    }

    // The guard held at commit, so the local copy takes the same writes.
    if let Err(err) = state.apply_update(&claim) {
        warn!("match {} joined but local copy diverged: {}", doc.id, err);
    }
    info!("{} joined match {} as player2", me, doc.id);
    Ok(MatchmakingOutcome::Joined(MatchTicket {
        match_id: doc.id,
        role: PlayerSlot::Player2,
        state,
    }))
}
