//! Headless match runner (default binary).
//!
//! Plays one match with the greedy placement bot: a solo match held in memory, or, with
//! `GRIDLOCK_MODE=multiplayer`, two bot clients sharing one match over the in-memory store.
//! Set `RUST_LOG=debug` to follow every turn.

use std::thread;
use std::time::Duration;

use anyhow::Result;
use log::{debug, info, warn};

use gridlock::adapter::{AnonymousIdentity, ClientConfig, IdentityProvider, MatchRuntime};
use gridlock::engine::{best_placement, ClientSession, Clock, MatchSync, SystemClock};
use gridlock::types::{MatchMode, MatchStatus, Millis, ParticipantId};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ClientConfig::from_env();
    let clock = SystemClock;
    let seed = config.seed.unwrap_or_else(|| clock.now_ms() as u32);
    info!("starting {:?} match (seed {})", config.mode, seed);

    match config.mode {
        MatchMode::Solo => run_solo(&config, &clock, seed),
        MatchMode::Multiplayer => run_duel(&config, &clock, seed),
    }
}

fn sign_in() -> ParticipantId {
    let mut identity = AnonymousIdentity::new();
    identity
        .current()
        .cloned()
        .unwrap_or_else(|| identity.sign_in())
}

/// Place the best available piece. Returns whether a piece was placed.
fn bot_step<S: MatchSync>(session: &mut ClientSession<S>, now: Millis) -> bool {
    if session.status() != MatchStatus::Playing || session.is_frozen(now) {
        return false;
    }
    let me = session.view().player(session.role());
    let Some(best) = best_placement(&me.board, &me.tray, session.locks(), now) else {
        return false;
    };

    match session.place(best.slot, best.x, best.y, now) {
        Ok(plan) => {
            debug!(
                "{}: slot {} at ({}, {}) cleared {} -> score {}",
                session.me(),
                best.slot,
                best.x,
                best.y,
                plan.result.score.cleared_cells,
                plan.score
            );
            true
        }
        Err(err) => {
            warn!("{}: placement refused: {}", session.me(), err);
            false
        }
    }
}

fn run_solo(config: &ClientConfig, clock: &dyn Clock, seed: u32) -> Result<()> {
    let mut session = ClientSession::solo(sign_in(), seed, clock.now_ms(), config.rules);
    let tick = Duration::from_millis(config.tick_ms);

    let mut turns = 0;
    while turns < config.max_turns && session.status() == MatchStatus::Playing {
        let now = clock.now_ms();
        session.tick(now);
        if bot_step(&mut session, now) {
            turns += 1;
        }
        thread::sleep(tick);
    }

    let score = session.view().player1.score;
    match session.winner() {
        Some(winner) => println!("{} won with {} points after {} turns", winner, score, turns),
        None => println!("no winner after {} turns, score {}", turns, score),
    }
    Ok(())
}

fn run_duel(config: &ClientConfig, clock: &dyn Clock, seed: u32) -> Result<()> {
    let runtime = MatchRuntime::in_memory()?;
    let mut host = runtime.join(sign_in(), seed, clock.now_ms(), config.rules)?;
    let mut guest = runtime.join(
        sign_in(),
        seed.wrapping_add(1),
        clock.now_ms(),
        config.rules,
    )?;
    let tick = Duration::from_millis(config.tick_ms);

    let mut turns = 0;
    while turns < config.max_turns {
        let now = clock.now_ms();
        for session in [&mut host, &mut guest] {
            let report = session.tick(now);
            if let Some(lock) = report.lock {
                debug!("{}: slot {} locked", session.me(), lock.slot);
            }
            if bot_step(session, now) {
                turns += 1;
            }
        }
        if host.status() == MatchStatus::Finished && guest.status() == MatchStatus::Finished {
            break;
        }
        thread::sleep(tick);
    }
    runtime.flush(&host);
    runtime.flush(&guest);

    let view = host.view();
    println!(
        "{} {} - {} {}",
        host.me(),
        view.player1.score,
        view.player2.score,
        guest.me()
    );
    match view.winner.as_ref() {
        Some(winner) => println!("{} wins after {} turns", winner, turns),
        None => println!("no winner after {} turns", turns),
    }
    Ok(())
}
