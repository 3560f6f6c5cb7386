use rand::{rngs::StdRng, Rng, SeedableRng};

/// Source of uniformly distributed indices used to pick secret words
pub trait RandomSource {
    /// Return an index in `0..len`. Callers guarantee `len > 0`.
    fn pick_index(&mut self, len: usize) -> usize;
}

/// Production source backed by the thread-local generator
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn pick_index(&mut self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// Deterministic source for reproducible sessions
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn pick_index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

/// Replays a fixed script of indices, wrapping each into range
#[derive(Debug, Clone)]
pub struct SequenceRandom {
    script: Vec<usize>,
    cursor: usize,
}

impl SequenceRandom {
    pub fn new(script: Vec<usize>) -> Self {
        Self { script, cursor: 0 }
    }
}

impl RandomSource for SequenceRandom {
    fn pick_index(&mut self, len: usize) -> usize {
        if self.script.is_empty() {
            return 0;
        }
        let value = self.script[self.cursor % self.script.len()];
        self.cursor += 1;
        value % len
    }
}
