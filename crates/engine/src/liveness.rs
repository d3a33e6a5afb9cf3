//! Liveness monitor - heartbeats and opponent-timeout arbitration (multiplayer only)
//!
//! Two independent schedules run off the same `poll(now)` call:
//! - every `heartbeat_interval_ms` the client writes its own `lastSeen`
//! - every `liveness_check_interval_ms` it inspects the opponent's `lastSeen`
//!
//! Silence past `liveness_warning_ms` raises the cosmetic "degraded" flag. Silence past
//! `liveness_timeout_ms` produces a victory claim. The claim is guarded on `status == playing`,
//! so when both clients time each other out only the first claim to reach the store commits.
//!
//! Silence is counted from the later of the opponent's `lastSeen` and the match start, so time a
//! host spent waiting for an opponent never counts. The first check runs one check interval after
//! the monitor first sees the match playing.

use log::info;

use crate::core::{FieldUpdate, MatchState, UpdateSet};
use crate::types::{MatchStatus, Millis, PlayerSlot, RulesConfig};

/// What the session should do after a liveness poll
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LivenessReport {
    /// Own `lastSeen` write, due now
    pub heartbeat: Option<UpdateSet>,
    /// Guarded `status = finished, winner = me` write
    pub claim: Option<UpdateSet>,
    /// Opponent silent for longer than the warning threshold
    pub degraded: bool,
    /// Opponent silence measured by this poll, if a check ran
    pub opponent_silence: Option<Millis>,
}

#[derive(Debug, Clone, Default)]
pub struct LivenessMonitor {
    next_heartbeat_at: Millis,
    next_check_at: Millis,
    degraded: bool,
    claimed: bool,
    armed: bool,
}

impl LivenessMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last computed degraded flag
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    pub fn poll(
        &mut self,
        state: &MatchState,
        me: PlayerSlot,
        now: Millis,
        rules: &RulesConfig,
    ) -> LivenessReport {
        let mut report = LivenessReport {
            degraded: self.degraded,
            ..LivenessReport::default()
        };
        if !state.mode().is_multiplayer() || state.status != MatchStatus::Playing {
            self.degraded = false;
            report.degraded = false;
            return report;
        }

        if !self.armed {
            self.armed = true;
            self.next_check_at = now.saturating_add(rules.liveness_check_interval_ms);
        }

        if now >= self.next_heartbeat_at {
            self.next_heartbeat_at = now.saturating_add(rules.heartbeat_interval_ms);
            report.heartbeat = Some(UpdateSet::new().with(FieldUpdate::LastSeen(me, now)));
        }

        if now >= self.next_check_at {
            self.next_check_at = now.saturating_add(rules.liveness_check_interval_ms);
            let last_seen = state
                .player(me.opponent())
                .last_seen
                .max(state.started_at.unwrap_or(0));
            // Zero means the opponent never reported.
            if last_seen > 0 {
                let silence = now.saturating_sub(last_seen);
                self.degraded = silence > rules.liveness_warning_ms;
                report.degraded = self.degraded;
                report.opponent_silence = Some(silence);

                if silence > rules.liveness_timeout_ms && !self.claimed {
                    info!(
                        "opponent silent for {}ms, claiming match as {:?}",
                        silence, me
                    );
                    self.claimed = true;
                    report.claim = Some(
                        UpdateSet::new()
                            .require_status(MatchStatus::Playing)
                            .with(FieldUpdate::Status(MatchStatus::Finished))
                            .with(FieldUpdate::Winner(state.player(me).participant.clone())),
                    );
                }
            }
        }

        report
    }
}
