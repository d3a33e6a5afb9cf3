//! Tray module - a player's three pending pieces
//!
//! A slot empties only when its piece is placed. The tray refills as a whole, and only once all
//! three slots are empty at the same time.

use crate::pieces::Piece;
use crate::rng::PieceGenerator;
use crate::types::TRAY_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Tray {
    slots: [Option<Piece>; TRAY_SIZE],
}

impl Tray {
    /// A tray with every slot consumed
    pub fn empty() -> Self {
        Self {
            slots: [None; TRAY_SIZE],
        }
    }

    pub fn from_slots(slots: [Option<Piece>; TRAY_SIZE]) -> Self {
        Self { slots }
    }

    pub fn slots(&self) -> &[Option<Piece>; TRAY_SIZE] {
        &self.slots
    }

    /// Piece in `slot`, if the slot exists and is not consumed
    pub fn get(&self, slot: usize) -> Option<&Piece> {
        self.slots.get(slot).and_then(|p| p.as_ref())
    }

    /// Remove and return the piece in `slot`
    pub fn take(&mut self, slot: usize) -> Option<Piece> {
        self.slots.get_mut(slot).and_then(|p| p.take())
    }

    /// Remaining pieces in slot order, with their slot index
    pub fn pieces(&self) -> impl Iterator<Item = (usize, &Piece)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.as_ref().map(|p| (i, p)))
    }

    pub fn remaining(&self) -> usize {
        self.slots.iter().filter(|p| p.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|p| p.is_none())
    }

    /// Refill all slots from `generator` if every slot is empty.
    ///
    /// Returns whether a refill happened. A partially filled tray is never topped up.
    pub fn refill_if_empty(&mut self, generator: &mut PieceGenerator) -> bool {
        if !self.is_empty() {
            return false;
        }
        *self = generator.generate_tray();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_empties_only_that_slot() {
        let mut gen = PieceGenerator::new(11);
        let mut tray = gen.generate_tray();
        let second = *tray.get(1).unwrap();

        assert_eq!(tray.take(1), Some(second));
        assert_eq!(tray.take(1), None);
        assert_eq!(tray.remaining(), 2);
        assert!(tray.get(0).is_some());
        assert!(tray.get(2).is_some());
        assert_eq!(tray.take(7), None);
    }

    #[test]
    fn test_refill_waits_for_all_three() {
        let mut gen = PieceGenerator::new(11);
        let mut tray = gen.generate_tray();

        tray.take(0);
        assert!(!tray.refill_if_empty(&mut gen));
        tray.take(2);
        assert!(!tray.refill_if_empty(&mut gen));
        assert_eq!(tray.remaining(), 1);

        tray.take(1);
        assert!(tray.refill_if_empty(&mut gen));
        assert_eq!(tray.remaining(), 3);
    }

    #[test]
    fn test_pieces_reports_slot_indices() {
        let mut gen = PieceGenerator::new(2);
        let mut tray = gen.generate_tray();
        tray.take(1);
        let slots: Vec<usize> = tray.pieces().map(|(i, _)| i).collect();
        assert_eq!(slots, vec![0, 2]);
    }
}
