// Deterministic random source for lyric composition.
//
// Provides `LyricRng`, an xoshiro256++ generator (Blackman & Vigna, 2019)
// seeded through SplitMix64, and the `RandomSource` trait the composer draws
// from. The composer only ever asks one question of its randomness: "give me
// a uniform integer below `bound`". Everything it needs (uniform start-word
// choice, cumulative-weight edge selection) is expressed in terms of that
// single operation, so tests can substitute a `ScriptedSource` that replays a
// fixed list of draws and get byte-identical songs.
//
// Used by `lyricist_compose` (composer, plain Markov walk, CLI seeding).
//
// **Determinism.** Given the same seed, `LyricRng` produces the same stream on
// every platform. No floating point is used on the integer path.

use serde::{Deserialize, Serialize};

/// A source of uniform integer draws.
///
/// Implementors must return a value in `[0, bound)` for every `bound > 0`.
/// Callers never pass `bound == 0`.
pub trait RandomSource {
    /// Draw a uniform integer in `[0, bound)`.
    fn below(&mut self, bound: u64) -> u64;

    /// Draw a uniform index into a collection of length `len`.
    fn index(&mut self, len: usize) -> usize {
        self.below(len as u64) as usize
    }
}

/// Xoshiro256++ PRNG, the composer's default randomness.
///
/// Each composition session owns its own `LyricRng`; two generators built from
/// the same seed yield identical songs over the same model.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LyricRng {
    s: [u64; 4],
}

impl LyricRng {
    /// Create a new generator seeded from a `u64`.
    ///
    /// SplitMix64 expands the seed into the 256-bit internal state.
    pub fn new(seed: u64) -> Self {
        let mut sm = seed;
        Self {
            s: [
                splitmix64(&mut sm),
                splitmix64(&mut sm),
                splitmix64(&mut sm),
                splitmix64(&mut sm),
            ],
        }
    }

    /// Generate the next `u64` in the sequence.
    pub fn next_u64(&mut self) -> u64 {
        let result = (self.s[0].wrapping_add(self.s[3]))
            .rotate_left(23)
            .wrapping_add(self.s[0]);

        let t = self.s[1] << 17;

        self.s[2] ^= self.s[0];
        self.s[3] ^= self.s[1];
        self.s[1] ^= self.s[2];
        self.s[0] ^= self.s[3];

        self.s[2] ^= t;
        self.s[3] = self.s[3].rotate_left(45);

        result
    }

    /// Generate a uniform random integer in `[low, high)`.
    ///
    /// Uses rejection sampling to avoid modulo bias.
    /// Panics if `low >= high`.
    pub fn range_u64(&mut self, low: u64, high: u64) -> u64 {
        assert!(low < high, "range_u64: low must be less than high");
        let range = high - low;
        if range.is_power_of_two() {
            return low + (self.next_u64() & (range - 1));
        }
        let threshold = range.wrapping_neg() % range; // = (2^64 - range) % range
        loop {
            let r = self.next_u64();
            if r >= threshold {
                return low + (r % range);
            }
        }
    }
}

impl RandomSource for LyricRng {
    fn below(&mut self, bound: u64) -> u64 {
        self.range_u64(0, bound)
    }
}

/// Replays a fixed list of draws, reduced modulo the requested bound.
///
/// When the list runs out it starts again from the beginning. An empty list
/// always draws 0.
#[derive(Clone, Debug, Default)]
pub struct ScriptedSource {
    draws: Vec<u64>,
    pos: usize,
}

impl ScriptedSource {
    pub fn new(draws: Vec<u64>) -> Self {
        Self { draws, pos: 0 }
    }

    /// Number of draws consumed so far.
    pub fn consumed(&self) -> usize {
        self.pos
    }
}

impl RandomSource for ScriptedSource {
    fn below(&mut self, bound: u64) -> u64 {
        if self.draws.is_empty() {
            self.pos += 1;
            return 0;
        }
        let value = self.draws[self.pos % self.draws.len()];
        self.pos += 1;
        value % bound
    }
}

/// SplitMix64, used only to expand a `u64` seed into xoshiro state.
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}
