//! RNG module - injectable randomness for piece generation
//!
//! Piece types are drawn uniformly at random. The source of randomness is a
//! trait so hosts can plug in their own generator and tests can replay exact
//! piece sequences.

use crate::types::PieceKind;

/// Source of random numbers for piece generation.
pub trait RandomSource {
    /// Generate the next random u32.
    fn next_u32(&mut self) -> u32;

    /// Generate a value in `[0, max)`.
    ///
    /// Uses the high bits of `next_u32` (multiply-shift), which are the
    /// well-distributed ones for an LCG.
    fn next_range(&mut self, max: u32) -> u32 {
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_u32(&mut self) -> u32 {
        (**self).next_u32()
    }

    fn next_range(&mut self, max: u32) -> u32 {
        (**self).next_range(max)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn next_u32(&mut self) -> u32 {
        (**self).next_u32()
    }

    fn next_range(&mut self, max: u32) -> u32 {
        (**self).next_range(max)
    }
}

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
}

impl RandomSource for SimpleRng {
    fn next_u32(&mut self) -> u32 {
        // a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Replays a fixed list of piece kinds, cycling when exhausted.
///
/// Meant for tests and replays that need an exact piece order.
#[derive(Debug, Clone)]
pub struct PieceSequence {
    kinds: Vec<PieceKind>,
    pos: usize,
}

impl PieceSequence {
    /// # Panics
    ///
    /// Panics if `kinds` is empty.
    pub fn new(kinds: impl Into<Vec<PieceKind>>) -> Self {
        let kinds = kinds.into();
        assert!(!kinds.is_empty(), "piece sequence must not be empty");
        Self { kinds, pos: 0 }
    }
}

impl RandomSource for PieceSequence {
    fn next_u32(&mut self) -> u32 {
        let kind = self.kinds[self.pos % self.kinds.len()];
        self.pos += 1;
        kind.index() as u32
    }

    fn next_range(&mut self, max: u32) -> u32 {
        match max {
            0 => 0,
            max => self.next_u32() % max,
        }
    }
}

/// Pick one of the seven piece kinds uniformly at random.
pub fn pick_random_type<R: RandomSource + ?Sized>(rng: &mut R) -> PieceKind {
    let i = rng.next_range(PieceKind::ALL.len() as u32) as usize;
    PieceKind::ALL[i]
}
