//! Scoring module - line-clear arithmetic
//!
//! Score comes only from cleared cells. Placing a piece that completes no line scores nothing,
//! whatever its size.

use crate::types::{RulesConfig, BOARD_SIZE};

/// Score calculation result for one turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreResult {
    /// Cells removed by the clear (row/column intersections counted once)
    pub cleared_cells: u32,
    /// Full rows plus full columns
    pub lines: u32,
    /// Points awarded for the turn
    pub delta: u32,
}

/// Cells removed by clearing `rows` full rows and `cols` full columns.
///
/// Inclusion-exclusion: each row/column intersection would otherwise be counted twice.
pub fn cleared_cells(rows: usize, cols: usize) -> u32 {
    let size = BOARD_SIZE as u32;
    let rows = rows as u32;
    let cols = cols as u32;
    rows * size + cols * size - rows * cols
}

/// Calculate the score of a turn that completed `rows` rows and `cols` columns
pub fn calculate_score(rows: usize, cols: usize) -> ScoreResult {
    let cleared = cleared_cells(rows, cols);
    ScoreResult {
        cleared_cells: cleared,
        lines: (rows + cols) as u32,
        delta: if cleared > 0 { cleared } else { 0 },
    }
}

/// Score after a board-wipe penalty, floored at zero
pub fn apply_stalemate_penalty(score: u32, rules: &RulesConfig) -> u32 {
    score.saturating_sub(rules.stalemate_penalty)
}

/// Whether `score` reaches the target
pub fn is_winning_score(score: u32, rules: &RulesConfig) -> bool {
    score >= rules.win_score
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_row() {
        let result = calculate_score(1, 0);
        assert_eq!(result.cleared_cells, 8);
        assert_eq!(result.delta, 8);
        assert_eq!(result.lines, 1);
    }

    #[test]
    fn test_row_and_column_share_one_cell() {
        assert_eq!(cleared_cells(1, 1), 15);
        assert_eq!(cleared_cells(2, 1), 22);
        assert_eq!(cleared_cells(2, 2), 28);
        assert_eq!(cleared_cells(8, 8), 64);
    }

    #[test]
    fn test_no_clear_no_score() {
        assert_eq!(calculate_score(0, 0), ScoreResult::default());
    }

    #[test]
    fn test_penalty_floors_at_zero() {
        let rules = RulesConfig::STANDARD;
        assert_eq!(apply_stalemate_penalty(25, &rules), 15);
        assert_eq!(apply_stalemate_penalty(4, &rules), 0);
    }

    #[test]
    fn test_win_threshold() {
        let rules = RulesConfig::STANDARD;
        assert!(is_winning_score(100, &rules));
        assert!(is_winning_score(107, &rules));
        assert!(!is_winning_score(99, &rules));
    }
}
