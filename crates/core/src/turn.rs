//! Turn module - placement resolution and the per-turn update plan
//!
//! [`resolve_turn`] is the pure rules step: place, clear, score, refill, stalemate check.
//! [`plan_turn`] wraps it with the match-level consequences (win, attack, board-wipe penalty)
//! and produces the single [`UpdateSet`] the acting client commits.

use log::debug;
use thiserror::Error;

use crate::attack::{attack_for_lines, Attack};
use crate::board::{Board, LineSet};
use crate::match_state::MatchState;
use crate::pieces::Piece;
use crate::rng::PieceGenerator;
use crate::scoring::{apply_stalemate_penalty, calculate_score, is_winning_score, ScoreResult};
use crate::tray::Tray;
use crate::types::{MatchMode, MatchStatus, Millis, PlayerSlot, RulesConfig};
use crate::update::{FieldUpdate, UpdateSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TurnError {
    #[error("match is not in progress")]
    NotPlaying,
    #[error("board is frozen until {until}")]
    Frozen { until: Millis },
    #[error("tray slot {0} is empty")]
    EmptySlot(usize),
    #[error("piece does not fit at ({x}, {y})")]
    IllegalPlacement { x: i8, y: i8 },
}

/// Outcome of placing one piece
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnResult {
    pub placed: Piece,
    /// Board after the clear
    pub board: Board,
    /// Tray after consumption and any refill
    pub tray: Tray,
    pub rows: LineSet,
    pub cols: LineSet,
    pub score: ScoreResult,
    pub refilled: bool,
    /// No remaining tray piece fits anywhere on `board`
    pub stalemate: bool,
}

impl TurnResult {
    /// Rows plus columns cleared
    pub fn lines(&self) -> u32 {
        self.score.lines
    }
}

/// Whether at least one tray piece fits somewhere. An empty tray always counts as movable.
pub fn has_legal_move(board: &Board, tray: &Tray) -> bool {
    if tray.is_empty() {
        return true;
    }
    tray.pieces().any(|(_, piece)| board.fits_anywhere(piece.shape()))
}

/// Place the piece in `slot` at (x, y), clear full lines and refill the tray when it runs dry.
///
/// Fails without touching anything when the slot is empty or the piece does not fit.
pub fn resolve_turn(
    board: &Board,
    tray: &Tray,
    slot: usize,
    x: i8,
    y: i8,
    generator: &mut PieceGenerator,
) -> Result<TurnResult, TurnError> {
    let piece = *tray.get(slot).ok_or(TurnError::EmptySlot(slot))?;
    if !board.can_place(piece.shape(), x, y) {
        return Err(TurnError::IllegalPlacement { x, y });
    }

    let mut board = *board;
    let mut tray = *tray;
    board.place(piece.shape(), x, y);
    tray.take(slot);

    // Rows and columns are detected on the same board, before either is cleared.
    let rows = board.full_rows();
    let cols = board.full_cols();
    let score = calculate_score(rows.len(), cols.len());
    board.clear_lines(&rows, &cols);

    let refilled = tray.refill_if_empty(generator);
    let stalemate = !has_legal_move(&board, &tray);

    Ok(TurnResult {
        placed: piece,
        board,
        tray,
        rows,
        cols,
        score,
        refilled,
        stalemate,
    })
}

/// A resolved turn together with everything the acting client must write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnPlan {
    pub result: TurnResult,
    /// Score after the turn (post-penalty when a wipe applied)
    pub score: u32,
    /// Board after the turn (empty when a wipe applied)
    pub board: Board,
    pub won: bool,
    pub wiped: bool,
    /// Attack sent to the opponent
    pub attack: Option<Attack>,
    pub update: UpdateSet,
}

/// Resolve a turn for `actor` against `state` and build its update set.
///
/// The update is guarded on `status == playing`, so a turn racing a finished match is refused
/// by whichever authority commits it. A winning turn skips the board-wipe penalty.
#[allow(clippy::too_many_arguments)]
pub fn plan_turn(
    state: &MatchState,
    actor: PlayerSlot,
    slot: usize,
    x: i8,
    y: i8,
    now: Millis,
    generator: &mut PieceGenerator,
    rules: &RulesConfig,
) -> Result<TurnPlan, TurnError> {
    if state.status != MatchStatus::Playing {
        return Err(TurnError::NotPlaying);
    }
    let me = state.player(actor);
    if me.is_frozen(now) {
        return Err(TurnError::Frozen {
            until: me.locked_until,
        });
    }

    let result = resolve_turn(&me.board, &me.tray, slot, x, y, generator)?;

    let raw_score = me.score.saturating_add(result.score.delta);
    let won = is_winning_score(raw_score, rules);
    let wiped = result.stalemate && !won;

    let mut update = UpdateSet::new().require_status(MatchStatus::Playing);
    let (board, score) = if wiped {
        update.push(FieldUpdate::LockedUntil(
            actor,
            now.saturating_add(rules.stalemate_freeze_ms),
        ));
        (Board::new(), apply_stalemate_penalty(raw_score, rules))
    } else {
        (result.board, raw_score)
    };
    update.push(FieldUpdate::Board(actor, board));
    update.push(FieldUpdate::Pieces(actor, result.tray));
    update.push(FieldUpdate::Score(actor, score));

    if won {
        update.push(FieldUpdate::Status(MatchStatus::Finished));
        update.push(FieldUpdate::Winner(me.participant.clone()));
    }

    let attack = match state.mode() {
        MatchMode::Multiplayer => attack_for_lines(result.lines(), now, rules),
        MatchMode::Solo => None,
    };
    if let Some(attack) = attack {
        update.push(FieldUpdate::IncomingAttack(actor.opponent(), Some(attack)));
    }

    debug!(
        "turn {:?}: {} at ({}, {}) lines={} delta={} score={} won={} wiped={}",
        actor,
        result.placed.shape_id.as_str(),
        x,
        y,
        result.lines(),
        result.score.delta,
        score,
        won,
        wiped
    );

    Ok(TurnPlan {
        result,
        score,
        board,
        won,
        wiped,
        attack,
        update,
    })
}
