use crate::core::{cleared_cells, Board, SlotLocks, Tray, TurnError};
use crate::types::{Millis, BOARD_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceError {
    NotPlayable,
    Frozen,
    SlotLocked,
    EmptySlot,
    Illegal,
}

impl PlaceError {
    pub fn code(self) -> &'static str {
        match self {
            PlaceError::NotPlayable => "not_playable",
            PlaceError::Frozen | PlaceError::SlotLocked => "locked",
            PlaceError::EmptySlot | PlaceError::Illegal => "invalid_place",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            PlaceError::NotPlayable => "match is not in progress",
            PlaceError::Frozen => "board is frozen after a wipe",
            PlaceError::SlotLocked => "tray slot is locked by an attack",
            PlaceError::EmptySlot => "tray slot is empty",
            PlaceError::Illegal => "piece does not fit at the target cell",
        }
    }
}

impl std::fmt::Display for PlaceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

impl std::error::Error for PlaceError {}

impl From<TurnError> for PlaceError {
    fn from(err: TurnError) -> Self {
        match err {
            TurnError::NotPlaying => PlaceError::NotPlayable,
            TurnError::Frozen { .. } => PlaceError::Frozen,
            TurnError::EmptySlot(_) => PlaceError::EmptySlot,
            TurnError::IllegalPlacement { .. } => PlaceError::Illegal,
        }
    }
}

/// A legal move and the number of cells it would clear
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub slot: usize,
    pub x: i8,
    pub y: i8,
    pub cleared: u32,
}

/// Greedy move choice for the headless bot.
///
/// Picks the placement clearing the most cells. Ties go to the lowest slot, then to the first
/// origin in row-major order. Locked slots are skipped.
pub fn best_placement(
    board: &Board,
    tray: &Tray,
    locks: &SlotLocks,
    now: Millis,
) -> Option<Placement> {
    let mut best: Option<Placement> = None;

    for (slot, piece) in tray.pieces() {
        if locks.is_locked(slot, now) {
            continue;
        }
        let shape = piece.shape();
        for y in 0..BOARD_SIZE as i8 {
            for x in 0..BOARD_SIZE as i8 {
                if !board.can_place(shape, x, y) {
                    continue;
                }
                let mut trial = *board;
                trial.place(shape, x, y);
                let cleared = cleared_cells(trial.full_rows().len(), trial.full_cols().len());

                if best.map(|b| cleared > b.cleared).unwrap_or(true) {
                    best = Some(Placement {
                        slot,
                        x,
                        y,
                        cleared,
                    });
                }
            }
        }
    }

    best
}
