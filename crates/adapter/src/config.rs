//! Client configuration from `GRIDLOCK_*` environment variables

use std::env;

use crate::types::{MatchMode, RulesConfig};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub mode: MatchMode,
    /// Generator seed; derived from the clock when unset
    pub seed: Option<u32>,
    pub rules: RulesConfig,
    /// Client loop period
    pub tick_ms: u64,
    /// Placement budget for the headless bot
    pub max_turns: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            mode: MatchMode::Solo,
            seed: None,
            rules: RulesConfig::STANDARD,
            tick_ms: 50,
            max_turns: 500,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset or unparsable values keep their defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let parse = |key: &str| lookup(key).and_then(|s| s.trim().parse::<u64>().ok());
        let defaults = Self::default();

        let mode = match lookup("GRIDLOCK_MODE")
            .map(|s| s.trim().to_ascii_lowercase())
            .as_deref()
        {
            Some("multiplayer") | Some("duel") => MatchMode::Multiplayer,
            _ => MatchMode::Solo,
        };

        let seed = lookup("GRIDLOCK_SEED").and_then(|s| s.trim().parse::<u32>().ok());

        let mut rules = defaults.rules;
        if let Some(ms) = parse("GRIDLOCK_HEARTBEAT_MS").filter(|&ms| ms > 0) {
            rules.heartbeat_interval_ms = ms;
        }
        if let Some(ms) = parse("GRIDLOCK_CHECK_MS").filter(|&ms| ms > 0) {
            rules.liveness_check_interval_ms = ms;
        }

        Self {
            mode,
            seed,
            rules,
            tick_ms: parse("GRIDLOCK_TICK_MS").unwrap_or(defaults.tick_ms),
            max_turns: parse("GRIDLOCK_MAX_TURNS")
                .map(|n| n as usize)
                .unwrap_or(defaults.max_turns),
        }
    }
}
