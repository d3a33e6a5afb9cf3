//! Core rules engine - pure, deterministic, and testable
//!
//! This crate contains all the game rules and match-state logic.
//! It has **no dependencies** on rendering, networking, timers or I/O, making it:
//!
//! - **Deterministic**: The same seed produces the same tray shapes
//! - **Testable**: Every rule is a plain function over plain values
//! - **Portable**: The same engine drives solo play and both multiplayer clients
//! - **Clock-free**: Timed rules take an explicit `now` in milliseconds
//!
//! # Module Structure
//!
//! - [`board`]: 8x8 occupancy grid with placement legality, line detection and wire encoding
//! - [`pieces`]: The nine-shape catalog and piece instances
//! - [`rng`]: Seeded generator for tray batches
//! - [`tray`]: Three-slot tray with all-or-nothing refill
//! - [`scoring`]: Cleared-cell arithmetic, penalty and win threshold
//! - [`turn`]: Turn resolution and the per-turn update plan
//! - [`attack`]: Lock attacks and expiring tray-slot locks
//! - [`match_state`]: Player/match state and the atomic update mutator
//! - [`update`]: Dotted-path partial-update vocabulary
//!
//! # Game Rules
//!
//! - **Placement**: A piece fits when every filled cell lands in bounds on an empty cell
//! - **Clears**: Full rows and full columns are cleared together; score is the number of
//!   cleared cells with row/column intersections counted once
//! - **Refill**: The tray refills with three fresh pieces only once all three are placed
//! - **Board wipe**: When no tray piece fits anywhere, the board empties, the player loses 10
//!   points and the board freezes for 3 seconds
//! - **Attack**: Clearing 3+ lines in one turn locks a random opponent tray slot for 7 seconds
//! - **Win**: First to 100 points
//!
//! # Example
//!
//! ```
//! use gridlock_core::{plan_turn, MatchState, PieceGenerator};
//! use gridlock_types::{ParticipantId, PlayerSlot, RulesConfig};
//!
//! let rules = RulesConfig::STANDARD;
//! let mut generator = PieceGenerator::new(12345);
//! let mut state = MatchState::new_solo(ParticipantId::new("me"), &mut generator, 0);
//!
//! // Any catalog piece fits in the top-left corner of an empty board.
//! let plan = plan_turn(&state, PlayerSlot::Player1, 0, 0, 0, 10, &mut generator, &rules).unwrap();
//! state.apply_update(&plan.update).unwrap();
//!
//! assert_eq!(state.player1.tray.remaining(), 2);
//! assert_eq!(state.player1.score, 0); // placing alone never scores
//! ```

pub mod attack;
pub mod board;
pub mod match_state;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod tray;
pub mod turn;
pub mod update;

pub use gridlock_types as types;

// Re-export commonly used types for convenience
pub use attack::{attack_for_lines, Attack, AttackKind, Lock, SlotLocks};
pub use board::{Board, BoardDecodeError, LineSet};
pub use match_state::{MatchState, PlayerState, SOLO_OPPONENT_ID};
pub use pieces::{get_shape, Piece, PieceId, Shape};
pub use rng::{PieceGenerator, SimpleRng};
pub use scoring::{calculate_score, cleared_cells, ScoreResult};
pub use tray::Tray;
pub use turn::{has_legal_move, plan_turn, resolve_turn, TurnError, TurnPlan, TurnResult};
pub use update::{FieldPath, FieldUpdate, PlayerField, UpdateError, UpdateSet};
