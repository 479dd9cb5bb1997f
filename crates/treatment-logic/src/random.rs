//! Seeded pseudo-random number generator
//!
//! Deterministic PRNG for reproducible sessions. Every group gets its own
//! generator, and every (round, purpose) pair inside a group gets its own
//! derived stream, so no draw is ever shared between groups or reused.
//! Uses a simple but effective xorshift algorithm.

use serde::{Deserialize, Serialize};

/// What a derived stream is used for inside one group-round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Purpose {
    /// Round-1 split into high and low roles
    Roles,
    /// Per-round split into subgroups A and B
    Pairing,
    /// Computer-control, override dice and tie-break draws at the vote round
    Treatment,
}

impl Purpose {
    fn tag(self) -> u64 {
        match self {
            Purpose::Roles => 1,
            Purpose::Pairing => 2,
            Purpose::Treatment => 3,
        }
    }
}

/// Expand a short numeric seed into the 32-byte session seed.
pub fn seed_from_u64(value: u64) -> [u8; 32] {
    let mut seed = [0u8; 32];
    for (i, chunk) in seed.chunks_mut(8).enumerate() {
        let word = value.rotate_left(i as u32 * 16) ^ (i as u64);
        chunk.copy_from_slice(&word.to_le_bytes());
    }
    seed
}

/// Seeded random number generator
///
/// Deterministic: same seed + group + round + purpose = same sequence
#[derive(Clone, Debug)]
pub struct SeededRng {
    state: u64,
}

impl SeededRng {
    /// Create a new RNG from a 32-byte session seed and a group index
    pub fn for_group(seed: &[u8; 32], group_index: u32) -> Self {
        // Combine seed bytes into initial state
        let mut state = 0u64;
        for (i, chunk) in seed.chunks(8).enumerate() {
            let mut bytes = [0u8; 8];
            bytes[..chunk.len()].copy_from_slice(chunk);
            state ^= u64::from_le_bytes(bytes).wrapping_add(i as u64);
        }

        // Mix in group index
        state ^= (group_index as u64).wrapping_mul(0x517cc1b727220a95);

        // Warm up the generator
        let mut rng = Self::from_state(state);
        for _ in 0..8 {
            rng.next_u64();
        }

        rng
    }

    /// Derive the stream for one round and purpose of this group
    pub fn for_round(&self, round: u32, purpose: Purpose) -> Self {
        let mut new_state = self.state;
        new_state ^= (round as u64).wrapping_mul(0x9e3779b97f4a7c15);
        new_state ^= purpose.tag().wrapping_mul(0xbf58476d1ce4e5b9);

        let mut rng = Self::from_state(new_state);
        rng.next_u64(); // Mix
        rng
    }

    // xorshift has a fixed point at zero
    fn from_state(state: u64) -> Self {
        let state = if state == 0 { 0x853c49e6748fea9b } else { state };
        Self { state }
    }

    /// Generate next u64
    pub fn next_u64(&mut self) -> u64 {
        // xorshift64*
        self.state ^= self.state >> 12;
        self.state ^= self.state << 25;
        self.state ^= self.state >> 27;
        self.state.wrapping_mul(0x2545f4914f6cdd1d)
    }

    /// Generate next u32
    pub fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    /// Fair coin: Bernoulli(0.5)
    pub fn next_bool(&mut self) -> bool {
        self.next_u64() >> 63 == 1
    }

    /// Uniform value in [0, max), without modulo bias
    pub fn next_below(&mut self, max: u32) -> u32 {
        if max <= 1 {
            return 0;
        }
        let zone = u32::MAX - (u32::MAX % max);
        loop {
            let value = self.next_u32();
            if value < zone {
                return value % max;
            }
        }
    }
}
