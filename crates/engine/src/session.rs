//! Client session - one participant's view of a match and the loop that keeps it current
//!
//! The session owns the local optimistic copy of the match, the client-only lock table and the
//! liveness schedule. Every write goes through [`ClientSession::commit`]: the update is applied
//! to the local view first and then handed to the [`MatchSync`] backend, whose failures are
//! logged and otherwise ignored.

use log::{info, warn};

use crate::core::{
    plan_turn, Attack, FieldUpdate, Lock, MatchState, PieceGenerator, SlotLocks, TurnPlan,
    UpdateSet,
};
use crate::liveness::LivenessMonitor;
use crate::place::PlaceError;
use crate::sync::{LocalSync, MatchSync};
use crate::types::{MatchMode, MatchStatus, Millis, ParticipantId, PlayerSlot, RulesConfig};

/// Fold a pushed snapshot into the local view.
///
/// The local player's board, tray, score and freeze are written only by this client, so they
/// are kept. Everything else comes from the snapshot, except that the match status never moves
/// backwards.
pub fn merge_snapshot(local: &mut MatchState, snapshot: &MatchState, me: PlayerSlot) {
    let opponent = me.opponent();
    *local.player_mut(opponent) = snapshot.player(opponent).clone();

    let theirs = snapshot.player(me);
    let mine = local.player_mut(me);
    mine.incoming_attack = theirs.incoming_attack;
    mine.last_seen = mine.last_seen.max(theirs.last_seen);

    if snapshot.status >= local.status {
        local.status = snapshot.status;
        local.winner = snapshot.winner.clone();
    }
    local.created_at = snapshot.created_at;
    if snapshot.started_at.is_some() {
        local.started_at = snapshot.started_at;
    }
}

/// What happened during one [`ClientSession::tick`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Snapshots merged
    pub snapshots: usize,
    /// Lock installed by acknowledging an incoming attack
    pub lock: Option<Lock>,
    pub heartbeat: bool,
    pub claimed: bool,
    pub degraded: bool,
}

pub struct ClientSession<S: MatchSync> {
    me: ParticipantId,
    role: PlayerSlot,
    view: MatchState,
    locks: SlotLocks,
    generator: PieceGenerator,
    liveness: LivenessMonitor,
    rules: RulesConfig,
    sync: S,
    last_acked_attack: Option<Attack>,
}

impl ClientSession<LocalSync> {
    /// Start a single-player match held entirely in memory
    pub fn solo(me: ParticipantId, seed: u32, now: Millis, rules: RulesConfig) -> Self {
        let mut generator = PieceGenerator::new(seed);
        let state = MatchState::new_solo(me.clone(), &mut generator, now);
        let sync = LocalSync::new(state.clone());
        info!("solo match started for {} (seed {})", me, seed);
        Self::new(me, PlayerSlot::Player1, state, sync, generator, rules)
    }
}

impl<S: MatchSync> ClientSession<S> {
    pub fn new(
        me: ParticipantId,
        role: PlayerSlot,
        initial: MatchState,
        sync: S,
        generator: PieceGenerator,
        rules: RulesConfig,
    ) -> Self {
        Self {
            me,
            role,
            view: initial,
            locks: SlotLocks::new(),
            generator,
            liveness: LivenessMonitor::new(),
            rules,
            sync,
            last_acked_attack: None,
        }
    }

    pub fn me(&self) -> &ParticipantId {
        &self.me
    }

    pub fn role(&self) -> PlayerSlot {
        self.role
    }

    pub fn mode(&self) -> MatchMode {
        self.view.mode()
    }

    /// Local optimistic view of the match
    pub fn view(&self) -> &MatchState {
        &self.view
    }

    pub fn locks(&self) -> &SlotLocks {
        &self.locks
    }

    pub fn rules(&self) -> &RulesConfig {
        &self.rules
    }

    pub fn sync(&self) -> &S {
        &self.sync
    }

    pub fn sync_mut(&mut self) -> &mut S {
        &mut self.sync
    }

    pub fn status(&self) -> MatchStatus {
        self.view.status
    }

    pub fn winner(&self) -> Option<&ParticipantId> {
        self.view.winner.as_ref()
    }

    pub fn is_degraded(&self) -> bool {
        self.liveness.is_degraded()
    }

    pub fn is_frozen(&self, now: Millis) -> bool {
        self.view.player(self.role).is_frozen(now)
    }

    pub fn is_slot_locked(&self, slot: usize, now: Millis) -> bool {
        self.locks.is_locked(slot, now)
    }

    /// Place the piece in tray `slot` at (x, y) and commit the resulting turn.
    ///
    /// Rejections leave the view untouched.
    pub fn place(
        &mut self,
        slot: usize,
        x: i8,
        y: i8,
        now: Millis,
    ) -> Result<TurnPlan, PlaceError> {
        if self.view.status != MatchStatus::Playing {
            return Err(PlaceError::NotPlayable);
        }
        if self.is_frozen(now) {
            return Err(PlaceError::Frozen);
        }
        if self.locks.is_locked(slot, now) {
            return Err(PlaceError::SlotLocked);
        }

        let plan = plan_turn(
            &self.view,
            self.role,
            slot,
            x,
            y,
            now,
            &mut self.generator,
            &self.rules,
        )?;

        if plan.won {
            info!("{} reached {} points and wins", self.me, plan.score);
        }
        if plan.wiped {
            info!("{} has no legal move, board wiped", self.me);
        }
        self.commit(plan.update.clone());
        Ok(plan)
    }

    /// Merge pushed snapshots, acknowledge attacks, expire locks and run the liveness schedule.
    pub fn tick(&mut self, now: Millis) -> TickReport {
        let mut report = TickReport::default();

        while let Some(snapshot) = self.sync.poll_snapshot() {
            merge_snapshot(&mut self.view, &snapshot, self.role);
            report.snapshots += 1;
        }

        if let Some(attack) = self.view.player(self.role).incoming_attack {
            if self.last_acked_attack == Some(attack) {
                // Stale snapshot from before our acknowledgement landed.
                self.view.player_mut(self.role).incoming_attack = None;
            } else {
                let slot = self.generator.pick_slot();
                report.lock = self.locks.apply_attack(&attack, slot, now);
                self.last_acked_attack = Some(attack);
                info!(
                    "{} hit by {} attack, slot {} locked for {}ms",
                    self.me,
                    attack.kind.as_str(),
                    slot,
                    attack.duration_ms
                );
                self.commit(UpdateSet::new().with(FieldUpdate::IncomingAttack(self.role, None)));
            }
        }

        self.locks.prune(now);

        let liveness = self.liveness.poll(&self.view, self.role, now, &self.rules);
        report.degraded = liveness.degraded;
        if let Some(heartbeat) = liveness.heartbeat {
            report.heartbeat = self.commit(heartbeat);
        }
        if let Some(claim) = liveness.claim {
            report.claimed = self.commit(claim);
        }

        report
    }

    /// Apply `update` to the local view, then hand it to the sync backend.
    ///
    /// Returns false when the local view refused the update; nothing is sent in that case.
    pub fn commit(&mut self, update: UpdateSet) -> bool {
        if let Err(err) = self.view.apply_update(&update) {
            warn!("{}: local update {:?} refused: {}", self.me, update.paths(), err);
            return false;
        }
        if let Err(err) = self.sync.apply_update(update) {
            warn!("{}: sync update failed: {}", self.me, err);
        }
        true
    }
}
