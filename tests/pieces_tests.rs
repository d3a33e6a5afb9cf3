//! Pieces tests - catalog, generator and tray refill

use std::collections::HashSet;

use gridlock::core::{get_shape, PieceGenerator, Tray};
use gridlock::types::{ShapeId, SHAPE_COUNT, TRAY_SIZE};

// ============== Catalog Tests ==============

#[test]
fn test_catalog_cell_counts() {
    let counts: Vec<usize> = ShapeId::ALL
        .iter()
        .map(|&id| get_shape(id).cell_count())
        .collect();
    assert_eq!(counts, vec![1, 2, 2, 3, 3, 4, 4, 4, 4]);
}

#[test]
fn test_catalog_footprints() {
    let dims = |id| {
        let s = get_shape(id);
        (s.width(), s.height())
    };
    assert_eq!(dims(ShapeId::Domino2x1), (2, 1));
    assert_eq!(dims(ShapeId::Domino1x2), (1, 2));
    assert_eq!(dims(ShapeId::Tromino3x1), (3, 1));
    assert_eq!(dims(ShapeId::Tromino1x3), (1, 3));
    assert_eq!(dims(ShapeId::L), (2, 3));
    assert_eq!(dims(ShapeId::Z), (3, 2));
}

#[test]
fn test_shape_ids_round_trip() {
    for id in ShapeId::ALL {
        assert_eq!(ShapeId::from_str(id.as_str()), Some(id));
    }
    assert_eq!(ShapeId::from_str("S"), None);
}

// ============== Generator Tests ==============

#[test]
fn test_generator_is_deterministic_per_seed() {
    let shapes = |seed| {
        let mut gen = PieceGenerator::new(seed);
        (0..50).map(|_| gen.next_shape()).collect::<Vec<_>>()
    };
    assert_eq!(shapes(99), shapes(99));
    assert_ne!(shapes(99), shapes(100));
}

#[test]
fn test_generator_covers_catalog() {
    let mut gen = PieceGenerator::new(3);
    let seen: HashSet<ShapeId> = (0..500).map(|_| gen.next_shape()).collect();
    assert_eq!(seen.len(), SHAPE_COUNT);
}

#[test]
fn test_batch_instance_ids_are_unique() {
    let mut gen = PieceGenerator::new(3);
    let batch = gen.generate_batch(30);
    assert_eq!(batch.len(), 30);
    let ids: HashSet<_> = batch.iter().map(|p| p.id).collect();
    assert_eq!(ids.len(), 30);
}

#[test]
fn test_pick_slot_in_range() {
    let mut gen = PieceGenerator::new(8);
    let seen: HashSet<usize> = (0..200).map(|_| gen.pick_slot()).collect();
    assert_eq!(seen, (0..TRAY_SIZE).collect());
}

// ============== Tray Tests ==============

#[test]
fn test_refill_only_when_all_slots_empty() {
    let mut gen = PieceGenerator::new(4);
    let mut tray = gen.generate_tray();
    assert_eq!(tray.remaining(), 3);

    for slot in 0..TRAY_SIZE - 1 {
        tray.take(slot);
        assert!(!tray.refill_if_empty(&mut gen));
        assert_eq!(tray.remaining(), TRAY_SIZE - 1 - slot);
    }

    tray.take(TRAY_SIZE - 1);
    assert!(tray.is_empty());
    assert!(tray.refill_if_empty(&mut gen));
    assert_eq!(tray.remaining(), 3);
}

#[test]
fn test_empty_tray() {
    let tray = Tray::empty();
    assert!(tray.is_empty());
    assert!(tray.get(0).is_none());
    assert_eq!(tray.pieces().count(), 0);
}
