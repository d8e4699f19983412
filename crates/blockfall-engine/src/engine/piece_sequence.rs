use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;

use crate::PieceKind;

/// A finite, seeded stream of pieces drawn uniformly from the seven kinds.
///
/// The same seed and length always produce the same pieces.
///
/// # Example
///
/// ```
/// use blockfall_engine::PieceSequence;
///
/// let first: Vec<_> = PieceSequence::new(42, 10).collect();
/// let second: Vec<_> = PieceSequence::new(42, 10).collect();
///
/// assert_eq!(first.len(), 10);
/// assert_eq!(first, second);
/// ```
#[derive(Debug, Clone)]
pub struct PieceSequence {
    rng: Pcg32,
    remaining: usize,
}

impl PieceSequence {
    #[must_use]
    pub fn new(seed: u64, length: usize) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            remaining: length,
        }
    }

    /// Number of pieces not yet drawn.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.remaining
    }
}

impl Iterator for PieceSequence {
    type Item = PieceKind;

    fn next(&mut self) -> Option<Self::Item> {
        self.remaining = self.remaining.checked_sub(1)?;
        Some(self.rng.random())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for PieceSequence {}
