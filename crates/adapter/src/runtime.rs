//! Adapter runtime integration.
//!
//! Bridges the synchronous client loop with the async store: the runtime owns the tokio
//! worker threads, matchmaking runs to completion on it, and every connected [`StoreSync`]
//! keeps its background tasks there.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use log::info;
use tokio::runtime::Runtime;

use crate::core::PieceGenerator;
use crate::engine::ClientSession;
use crate::matchmaking::{find_match, MatchTicket, MatchmakingOutcome};
use crate::memory::InMemoryStore;
use crate::store::DocumentStore;
use crate::sync::StoreSync;
use crate::types::{Millis, ParticipantId, RulesConfig};

/// Raced claims retried before giving up
const JOIN_ATTEMPTS: usize = 3;

pub struct MatchRuntime {
    rt: Runtime,
    store: Arc<dyn DocumentStore>,
}

impl MatchRuntime {
    pub fn new(store: Arc<dyn DocumentStore>) -> Result<Self> {
        let rt = Runtime::new().context("failed to create tokio runtime")?;
        Ok(Self { rt, store })
    }

    pub fn in_memory() -> Result<Self> {
        Self::new(Arc::new(InMemoryStore::new()))
    }

    pub fn store(&self) -> Arc<dyn DocumentStore> {
        Arc::clone(&self.store)
    }

    /// One matchmaking attempt
    pub fn find_match(
        &self,
        me: &ParticipantId,
        generator: &mut PieceGenerator,
        now: Millis,
    ) -> Result<MatchmakingOutcome> {
        let store = Arc::clone(&self.store);
        let outcome = self
            .rt
            .block_on(async { find_match(store.as_ref(), me, generator, now).await })?;
        Ok(outcome)
    }

    /// Open a session on a seat obtained from matchmaking
    pub fn connect(
        &self,
        me: ParticipantId,
        ticket: MatchTicket,
        generator: PieceGenerator,
        rules: RulesConfig,
    ) -> Result<ClientSession<StoreSync>> {
        let store = Arc::clone(&self.store);
        let sync = self
            .rt
            .block_on(StoreSync::connect(store, ticket.match_id.clone()))
            .with_context(|| format!("failed to subscribe to match {}", ticket.match_id))?;
        info!(
            "{} connected to match {} as {}",
            me,
            ticket.match_id,
            ticket.role.as_str()
        );
        Ok(ClientSession::new(
            me,
            ticket.role,
            ticket.state,
            sync,
            generator,
            rules,
        ))
    }

    /// Find (or host) a match and connect to it, retrying lost join races
    pub fn join(
        &self,
        me: ParticipantId,
        seed: u32,
        now: Millis,
        rules: RulesConfig,
    ) -> Result<ClientSession<StoreSync>> {
        let mut generator = PieceGenerator::new(seed);
        for attempt in 1..=JOIN_ATTEMPTS {
            if let Some(ticket) = self.find_match(&me, &mut generator, now)?.into_ticket() {
                return self.connect(me, ticket, generator, rules);
            }
            info!("{}: join attempt {} raced, retrying", me, attempt);
        }
        bail!("{} could not claim a seat after {} attempts", me, JOIN_ATTEMPTS)
    }

    /// Wait for every write `session` has queued to reach the store
    pub fn flush(&self, session: &ClientSession<StoreSync>) {
        self.rt.block_on(session.sync().flush());
    }
}
