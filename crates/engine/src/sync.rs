//! Synchronization seam between a client session and wherever the match state lives.
//!
//! Both implementations accept the same [`UpdateSet`] vocabulary:
//! - [`LocalSync`]: solo play, a single in-process mutator over an owned [`MatchState`]
//! - `StoreSync` (adapter crate): multiplayer, partial writes against the shared document store

use std::error::Error as StdError;

use thiserror::Error;

use crate::core::{MatchState, UpdateError, UpdateSet};

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("update rejected: {0}")]
    Rejected(#[from] UpdateError),
    #[error("update could not be encoded: {0}")]
    Encode(#[source] Box<dyn StdError + Send + Sync>),
    #[error("sync transport closed")]
    Closed,
}

impl SyncError {
    /// Wrap a backend encoding failure, keeping it as the source
    pub fn encode(err: impl StdError + Send + Sync + 'static) -> Self {
        SyncError::Encode(Box::new(err))
    }
}

pub trait MatchSync {
    /// Submit a partial update. Multiplayer backends return before the write lands.
    fn apply_update(&mut self, update: UpdateSet) -> Result<(), SyncError>;

    /// Next full snapshot pushed since the last poll, if any. Never blocks.
    fn poll_snapshot(&mut self) -> Option<MatchState>;
}

/// In-process match state for single-player mode
#[derive(Debug, Clone)]
pub struct LocalSync {
    state: MatchState,
    dirty: bool,
}

impl LocalSync {
    pub fn new(state: MatchState) -> Self {
        Self {
            state,
            dirty: false,
        }
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }
}

impl MatchSync for LocalSync {
    fn apply_update(&mut self, update: UpdateSet) -> Result<(), SyncError> {
        self.state.apply_update(&update)?;
        self.dirty = true;
        Ok(())
    }

    fn poll_snapshot(&mut self) -> Option<MatchState> {
        if !self.dirty {
            return None;
        }
        self.dirty = false;
        Some(self.state.clone())
    }
}

impl<T: MatchSync + ?Sized> MatchSync for Box<T> {
    fn apply_update(&mut self, update: UpdateSet) -> Result<(), SyncError> {
        (**self).apply_update(update)
    }

    fn poll_snapshot(&mut self) -> Option<MatchState> {
        (**self).poll_snapshot()
    }
}
