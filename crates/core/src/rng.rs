//! RNG module - tray batch generation
//!
//! Every piece of a batch is sampled independently and uniformly from the nine catalog shapes.
//! There is deliberately no bag, no repeat limit and no guarantee that a batch fits the board.
//!
//! Also provides a simple LCG so that games can be replayed from a seed.

use crate::pieces::{Piece, PieceId};
use crate::tray::Tray;
use crate::types::{ShapeId, SHAPE_COUNT, TRAY_SIZE};

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Scales the full 32-bit output instead of taking a remainder; the low bits of an LCG
    /// cycle with a short period.
    pub fn next_range(&mut self, max: u32) -> u32 {
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Current internal state (a seed that continues this sequence)
    pub fn state(&self) -> u32 {
        self.state
    }
}

/// Produces tray batches and random tray slot picks
#[derive(Debug, Clone)]
pub struct PieceGenerator {
    rng: SimpleRng,
}

impl PieceGenerator {
    pub fn new(seed: u32) -> Self {
        Self {
            rng: SimpleRng::new(seed),
        }
    }

    /// Sample one shape uniformly from the catalog
    pub fn next_shape(&mut self) -> ShapeId {
        ShapeId::ALL[self.rng.next_range(SHAPE_COUNT as u32) as usize]
    }

    /// `n` independently sampled pieces, each with a fresh instance id
    pub fn generate_batch(&mut self, n: usize) -> Vec<Piece> {
        (0..n)
            .map(|_| Piece::new(PieceId::new_random(), self.next_shape()))
            .collect()
    }

    /// A full tray of freshly generated pieces
    pub fn generate_tray(&mut self) -> Tray {
        let mut slots = [None; TRAY_SIZE];
        for (slot, piece) in slots.iter_mut().zip(self.generate_batch(TRAY_SIZE)) {
            *slot = Some(piece);
        }
        Tray::from_slots(slots)
    }

    /// Uniformly chosen tray slot index
    pub fn pick_slot(&mut self) -> usize {
        self.rng.next_range(TRAY_SIZE as u32) as usize
    }

    /// Get the current RNG state (for restarting with the same sequence)
    pub fn seed(&self) -> u32 {
        self.rng.state()
    }
}

impl Default for PieceGenerator {
    fn default() -> Self {
        Self::new(1)
    }
}
