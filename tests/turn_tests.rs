//! Turn tests - scoring, refill, board wipe, attacks and the win condition

use gridlock::core::{
    plan_turn, resolve_turn, AttackKind, Board, FieldPath, FieldUpdate, MatchState, Piece,
    PieceGenerator, PieceId, PlayerField, Tray, TurnPlan,
};
use gridlock::types::{MatchStatus, Millis, ParticipantId, PlayerSlot, RulesConfig, ShapeId};

const RULES: RulesConfig = RulesConfig::STANDARD;

fn tray_of(shapes: [Option<ShapeId>; 3]) -> Tray {
    Tray::from_slots(shapes.map(|s| s.map(|id| Piece::new(PieceId::new_random(), id))))
}

fn duel() -> MatchState {
    let mut gen = PieceGenerator::new(1);
    let mut state = MatchState::new_waiting(ParticipantId::new("alice"), &mut gen, 0);
    state.player2.participant = Some(ParticipantId::new("bob"));
    state.status = MatchStatus::Playing;
    state
}

fn solo() -> MatchState {
    let mut gen = PieceGenerator::new(1);
    MatchState::new_solo(ParticipantId::new("alice"), &mut gen, 0)
}

fn set_player1(mut state: MatchState, rows: &[&str], tray: Tray, score: u32) -> MatchState {
    state.player1.board = Board::from_rows(rows);
    state.player1.tray = tray;
    state.player1.score = score;
    state
}

fn play(state: &MatchState, slot: usize, x: i8, y: i8, now: Millis) -> TurnPlan {
    let mut gen = PieceGenerator::new(77);
    plan_turn(state, PlayerSlot::Player1, slot, x, y, now, &mut gen, &RULES).unwrap()
}

/// Row 0 is one cell short; after it clears, no 2x2 hole exists anywhere
const NO_SQUARE_ROOM: [&str; 8] = [
    "#######.", ".######.", "#.##.###", "##.##.##", "###.##.#", ".#.#####", "####.#.#",
    "#.#.####",
];

// ============== Scoring ==============

#[test]
fn test_single_row_scores_eight() {
    // 3x1 at row 0 fills columns 0-2; columns 3-7 already occupied.
    let state = set_player1(
        duel(),
        &["...#####"],
        tray_of([Some(ShapeId::Tromino3x1), Some(ShapeId::Mono), Some(ShapeId::Mono)]),
        0,
    );
    let plan = play(&state, 0, 0, 0, 1_000);

    assert_eq!(plan.result.score.cleared_cells, 8);
    assert_eq!(plan.result.score.delta, 8);
    assert_eq!(plan.score, 8);
    assert!(plan.board.is_empty(), "row 0 is zeroed");
    assert!(plan.result.tray.get(0).is_none(), "slot emptied");
    assert_eq!(plan.result.tray.remaining(), 2);
    assert!(!plan.result.refilled);
}

#[test]
fn test_row_and_column_intersection_counted_once() {
    let state = set_player1(
        duel(),
        &[
            "#.......", "#.......", "#.......", "#.......", "#.......", "#.......", "#.......",
            ".#######",
        ],
        tray_of([Some(ShapeId::Mono), Some(ShapeId::Mono), None]),
        10,
    );
    let plan = play(&state, 0, 0, 7, 1_000);

    assert_eq!(plan.result.rows.as_slice(), &[7]);
    assert_eq!(plan.result.cols.as_slice(), &[0]);
    assert_eq!(plan.result.score.cleared_cells, 15);
    assert_eq!(plan.score, 25);
    assert!(plan.board.is_empty());
}

#[test]
fn test_placement_without_clear_scores_nothing() {
    let state = set_player1(
        duel(),
        &[],
        tray_of([Some(ShapeId::Square), Some(ShapeId::L), None]),
        40,
    );
    let plan = play(&state, 1, 4, 4, 1_000);
    assert_eq!(plan.result.score.delta, 0);
    assert_eq!(plan.score, 40);
    assert_eq!(plan.board.occupied_count(), 4);
    assert!(plan.update.get(FieldPath::Status).is_none());
}

#[test]
fn test_refill_after_last_piece() {
    let mut gen = PieceGenerator::new(5);
    let tray = tray_of([None, None, Some(ShapeId::Mono)]);
    let result = resolve_turn(&Board::new(), &tray, 2, 0, 0, &mut gen).unwrap();
    assert!(result.refilled);
    assert_eq!(result.tray.remaining(), 3);

    let tray = tray_of([Some(ShapeId::Mono), None, Some(ShapeId::Mono)]);
    let result = resolve_turn(&Board::new(), &tray, 2, 0, 0, &mut gen).unwrap();
    assert!(!result.refilled);
    assert_eq!(result.tray.remaining(), 1);
}

#[test]
fn test_illegal_placement_changes_nothing() {
    let state = set_player1(
        duel(),
        &["#......."],
        tray_of([Some(ShapeId::Mono), None, None]),
        0,
    );
    let mut gen = PieceGenerator::new(1);
    assert!(plan_turn(&state, PlayerSlot::Player1, 0, 0, 0, 5, &mut gen, &RULES).is_err());
    assert!(plan_turn(&state, PlayerSlot::Player1, 0, 8, 0, 5, &mut gen, &RULES).is_err());
    assert!(plan_turn(&state, PlayerSlot::Player1, 1, 3, 3, 5, &mut gen, &RULES).is_err());
}

// ============== Board wipe ==============

#[test]
fn test_stalemate_wipes_board_with_penalty_and_freeze() {
    let state = set_player1(
        duel(),
        &NO_SQUARE_ROOM,
        tray_of([Some(ShapeId::Mono), Some(ShapeId::Square), None]),
        20,
    );
    let plan = play(&state, 0, 7, 0, 10_000);

    assert!(plan.result.stalemate);
    assert!(plan.wiped);
    assert!(plan.board.is_empty());
    assert_eq!(plan.score, 18, "20 + 8 - 10");
    assert_eq!(
        plan.update.get(FieldPath::Player(PlayerSlot::Player1, PlayerField::LockedUntil)),
        Some(&FieldUpdate::LockedUntil(PlayerSlot::Player1, 13_000))
    );

    let mut after = state.clone();
    after.apply_update(&plan.update).unwrap();
    assert!(after.player1.board.is_empty());
    assert!(after.player1.is_frozen(12_999));
    assert!(!after.player1.is_frozen(13_000));

    let mut gen = PieceGenerator::new(1);
    assert!(plan_turn(&after, PlayerSlot::Player1, 1, 0, 0, 12_999, &mut gen, &RULES).is_err());
    assert!(plan_turn(&after, PlayerSlot::Player1, 1, 0, 0, 13_000, &mut gen, &RULES).is_ok());
}

#[test]
fn test_penalty_floors_at_zero() {
    let rows = [
        ".######.", ".######.", "#.##.###", "##.##.##", "###.##.#", ".#.#####", "####.#.#",
        "#.#.####",
    ];
    let state = set_player1(
        duel(),
        &rows,
        tray_of([Some(ShapeId::Mono), Some(ShapeId::Square), None]),
        4,
    );
    // Filling one of two holes completes nothing.
    let plan = play(&state, 0, 0, 0, 0);
    assert_eq!(plan.result.score.delta, 0);
    assert!(plan.wiped);
    assert_eq!(plan.score, 0);
}

// ============== Attacks ==============

fn three_rows_short() -> MatchState {
    set_player1(
        duel(),
        &["#######.", "#######.", "#######."],
        tray_of([Some(ShapeId::Tromino1x3), Some(ShapeId::Domino1x2), Some(ShapeId::Mono)]),
        0,
    )
}

#[test]
fn test_three_lines_arm_attack() {
    let state = three_rows_short();
    let plan = play(&state, 0, 7, 0, 2_000);

    assert_eq!(plan.result.lines(), 3);
    let attack = plan.attack.expect("three lines attack");
    assert_eq!(attack.kind, AttackKind::Lock);
    assert_eq!(attack.duration_ms, 7_000);
    assert_eq!(attack.timestamp, 2_000);

    let mut after = state.clone();
    after.apply_update(&plan.update).unwrap();
    assert_eq!(after.player2.incoming_attack, Some(attack));
    assert!(after.player1.incoming_attack.is_none());
}

#[test]
fn test_two_lines_do_not_attack() {
    let state = three_rows_short();
    let plan = play(&state, 1, 7, 0, 2_000);
    assert_eq!(plan.result.lines(), 2);
    assert!(plan.attack.is_none());
    assert!(plan
        .update
        .get(FieldPath::Player(PlayerSlot::Player2, PlayerField::IncomingAttack))
        .is_none());
}

#[test]
fn test_solo_never_attacks() {
    let mut state = three_rows_short();
    let base = solo();
    state.player2 = base.player2;
    let plan = play(&state, 0, 7, 0, 2_000);
    assert_eq!(plan.result.lines(), 3);
    assert!(plan.attack.is_none());
}

// ============== Win ==============

fn one_row_short(score: u32) -> MatchState {
    set_player1(
        duel(),
        &["...#####"],
        tray_of([Some(ShapeId::Tromino3x1), Some(ShapeId::Mono), None]),
        score,
    )
}

#[test]
fn test_reaching_100_wins() {
    let state = one_row_short(92);
    let plan = play(&state, 0, 0, 0, 1_000);
    assert!(plan.won);

    let mut after = state.clone();
    after.apply_update(&plan.update).unwrap();
    assert_eq!(after.player1.score, 100);
    assert_eq!(after.status, MatchStatus::Finished);
    assert_eq!(after.winner, Some(ParticipantId::new("alice")));

    let mut gen = PieceGenerator::new(1);
    assert!(plan_turn(&after, PlayerSlot::Player1, 1, 5, 5, 2_000, &mut gen, &RULES).is_err());
}

#[test]
fn test_99_does_not_win() {
    let state = one_row_short(91);
    let plan = play(&state, 0, 0, 0, 1_000);
    assert!(!plan.won);
    assert_eq!(plan.score, 99);
    assert!(plan.update.get(FieldPath::Status).is_none());
    assert!(plan.update.get(FieldPath::Winner).is_none());
}

#[test]
fn test_win_takes_precedence_over_wipe() {
    let state = set_player1(
        duel(),
        &NO_SQUARE_ROOM,
        tray_of([Some(ShapeId::Mono), Some(ShapeId::Square), None]),
        95,
    );
    let plan = play(&state, 0, 7, 0, 1_000);

    assert!(plan.result.stalemate);
    assert!(plan.won);
    assert!(!plan.wiped);
    assert_eq!(plan.score, 103);
    assert!(!plan.board.is_empty());
    assert!(plan
        .update
        .get(FieldPath::Player(PlayerSlot::Player1, PlayerField::LockedUntil))
        .is_none());
}

#[test]
fn test_turn_update_is_guarded_on_playing() {
    let state = one_row_short(92);
    let plan = play(&state, 0, 0, 0, 1_000);
    assert_eq!(plan.update.precondition(), Some(MatchStatus::Playing));

    // A racing finish lands first: the stale turn is refused as a whole.
    let mut raced = state.clone();
    raced.status = MatchStatus::Finished;
    raced.winner = Some(ParticipantId::new("bob"));
    assert!(raced.apply_update(&plan.update).is_err());
    assert_eq!(raced.player1.score, 92);
    assert_eq!(raced.winner, Some(ParticipantId::new("bob")));
}
