//! Attack module - outgoing lock attacks and incoming tray-slot locks
//!
//! A turn that clears enough lines arms an [`Attack`] on the opponent's player state. The
//! opponent's own client later acknowledges it by installing a [`Lock`] on one random tray
//! slot. Locks are plain expiring values: a lock whose `expires_at` has passed is treated as
//! absent on every read, no timer callback is needed.

use crate::types::{Millis, RulesConfig, TRAY_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttackKind {
    Lock,
}

impl AttackKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttackKind::Lock => "lock",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "lock" => Some(AttackKind::Lock),
            _ => None,
        }
    }
}

/// Pending attack written into the victim's `incomingAttack` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Attack {
    pub kind: AttackKind,
    pub duration_ms: Millis,
    pub timestamp: Millis,
}

/// The attack a turn clearing `lines` lines sends to the opponent, if any
pub fn attack_for_lines(lines: u32, now: Millis, rules: &RulesConfig) -> Option<Attack> {
    if lines < rules.attack_line_threshold {
        return None;
    }
    Some(Attack {
        kind: AttackKind::Lock,
        duration_ms: rules.attack_lock_ms,
        timestamp: now,
    })
}

/// A disabled tray slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Lock {
    pub slot: usize,
    pub expires_at: Millis,
}

impl Lock {
    pub fn is_active(&self, now: Millis) -> bool {
        now < self.expires_at
    }
}

/// Client-local lock table, at most one lock per tray slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SlotLocks {
    locks: [Option<Lock>; TRAY_SIZE],
}

impl SlotLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock `slot` until `expires_at`.
    ///
    /// Re-arming a slot replaces its expiry; locks never stack on one slot.
    pub fn arm(&mut self, slot: usize, expires_at: Millis) -> Option<Lock> {
        let entry = self.locks.get_mut(slot)?;
        let lock = Lock { slot, expires_at };
        *entry = Some(lock);
        Some(lock)
    }

    /// Install the lock an incoming attack asks for on the given slot
    pub fn apply_attack(&mut self, attack: &Attack, slot: usize, now: Millis) -> Option<Lock> {
        match attack.kind {
            AttackKind::Lock => self.arm(slot, now.saturating_add(attack.duration_ms)),
        }
    }

    pub fn is_locked(&self, slot: usize, now: Millis) -> bool {
        self.locks
            .get(slot)
            .and_then(|l| l.as_ref())
            .map(|l| l.is_active(now))
            .unwrap_or(false)
    }

    /// Locks still in force at `now`
    pub fn active(&self, now: Millis) -> impl Iterator<Item = &Lock> + '_ {
        self.locks
            .iter()
            .flatten()
            .filter(move |l| l.is_active(now))
    }

    /// Drop expired entries
    pub fn prune(&mut self, now: Millis) {
        for entry in &mut self.locks {
            if entry.map(|l| !l.is_active(now)).unwrap_or(false) {
                *entry = None;
            }
        }
    }

    pub fn clear(&mut self) {
        self.locks = [None; TRAY_SIZE];
    }
}
