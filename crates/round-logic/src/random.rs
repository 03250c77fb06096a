//! Injectable sources of uniform randomness
//!
//! Every draw the round engine makes (door colors, correct doors, the
//! partner's truth and follow draws) goes through a [`RandomSource`], so a
//! run can be reproduced from a seed or steered draw-by-draw in tests.

/// Source of uniform draws in `[0, 1)`.
///
/// Implementations must be deterministic given their construction inputs;
/// there is no ambient global randomness anywhere in the engine.
pub trait RandomSource {
    /// Next uniform draw in `[0, 1)`.
    fn uniform(&mut self) -> f64;

    /// Uniform index in `[0, n)`. Returns 0 when `n` is 0.
    fn pick(&mut self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        let index = (self.uniform() * n as f64) as usize;
        index.min(n - 1)
    }

    /// Bernoulli draw with success probability `p`.
    fn bernoulli(&mut self, p: f64) -> bool {
        self.uniform() < p
    }
}

/// Seeded pseudo-random source
///
/// Deterministic xorshift64* generator: same seed + stream = same sequence.
#[derive(Clone, Debug)]
pub struct SeededRng {
    state: u64,
}

impl SeededRng {
    /// Create a new source from a 32-byte seed and a stream index
    /// (e.g. a session counter, so runs sharing a seed still differ).
    pub fn new(seed: &[u8; 32], stream: u32) -> Self {
        // Combine seed bytes into initial state
        let mut state = 0u64;
        for (i, chunk) in seed.chunks(8).enumerate() {
            let mut bytes = [0u8; 8];
            bytes[..chunk.len()].copy_from_slice(chunk);
            state ^= u64::from_le_bytes(bytes).wrapping_add(i as u64);
        }

        // Mix in stream index
        state ^= (stream as u64).wrapping_mul(0x517cc1b727220a95);

        // Warm up the generator
        let mut rng = Self { state };
        for _ in 0..8 {
            rng.next_u64();
        }

        rng
    }

    /// Generate next u64
    pub fn next_u64(&mut self) -> u64 {
        // xorshift64*
        self.state ^= self.state >> 12;
        self.state ^= self.state << 25;
        self.state ^= self.state >> 27;
        self.state.wrapping_mul(0x2545f4914f6cdd1d)
    }
}

impl RandomSource for SeededRng {
    fn uniform(&mut self) -> f64 {
        // Top 53 bits give a uniform double in [0, 1)
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }
}

/// Scripted source for deterministic tests.
///
/// Yields a fixed sequence of draws, either once or cycling forever.
#[derive(Clone, Debug)]
pub struct SequenceSource {
    draws: Vec<f64>,
    cursor: usize,
    repeating: bool,
}

impl SequenceSource {
    /// Source that yields `draws` once, in order.
    ///
    /// # Panics
    /// Panics if asked for a draw after the script is exhausted; a test
    /// script that runs dry is a bug in the test.
    pub fn new(draws: Vec<f64>) -> Self {
        Self { draws, cursor: 0, repeating: false }
    }

    /// Source that cycles through `draws` forever.
    ///
    /// # Panics
    /// Panics if `draws` is empty.
    pub fn repeating(draws: Vec<f64>) -> Self {
        assert!(!draws.is_empty(), "repeating script must not be empty");
        Self { draws, cursor: 0, repeating: true }
    }
}

impl RandomSource for SequenceSource {
    fn uniform(&mut self) -> f64 {
        if self.repeating && self.cursor == self.draws.len() {
            self.cursor = 0;
        }
        assert!(
            self.cursor < self.draws.len(),
            "SequenceSource exhausted after {} draws",
            self.draws.len()
        );
        let value = self.draws[self.cursor];
        self.cursor += 1;
        value
    }
}
