//! Deterministic random source shared by scheduler callbacks
//!
//! The whole generator state is a single `u64`. Every draw keys a fresh
//! `ChaCha8Rng` from that state, takes one word as output and the next word
//! as the new state. Saving `seed()` and restoring it with `set_seed()`
//! therefore replays every future draw exactly.

use rand::seq::SliceRandom;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededRandom {
    state: u64,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Seed from OS entropy
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// Current generator state; the next draw continues from here
    pub fn seed(&self) -> u64 {
        self.state
    }

    pub fn set_seed(&mut self, seed: u64) {
        self.state = seed;
    }

    /// Float in `[0, 1)`
    pub fn next_f64(&mut self) -> f64 {
        self.gen::<f64>()
    }

    /// Integer in the inclusive range `[min, max]`
    ///
    /// Bounds given in the wrong order are swapped rather than rejected.
    pub fn int(&mut self, min: i64, max: i64) -> i64 {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        self.gen_range(lo..=hi)
    }

    /// `true` with the given probability. Always consumes exactly one draw.
    pub fn chance(&mut self, probability: f64) -> bool {
        let roll = self.next_f64();
        roll < probability
    }

    /// Uniformly chosen element, `None` for an empty slice
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(self)
    }

    /// New vector holding a permutation of `items`; the input is untouched
    pub fn shuffle<T: Clone>(&mut self, items: &[T]) -> Vec<T> {
        let mut shuffled = items.to_vec();
        shuffled.as_mut_slice().shuffle(self);
        shuffled
    }
}

impl RngCore for SeededRandom {
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        let mut rng = ChaCha8Rng::seed_from_u64(self.state);
        let output = rng.next_u64();
        self.state = rng.next_u64();
        output
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}
