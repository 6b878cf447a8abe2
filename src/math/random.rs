//! Seeded 64-bit random stream and the sampling primitives built on it
//!
//! Every helper reduces a single `next_u64` draw modulo a bound, so the exact
//! sequence of calls determines the output. Callers must keep draw order stable
//! to reproduce a pattern.

use rand::{RngCore, SeedableRng, rngs::StdRng};

/// Deterministic random stream owned by the generation pipeline
///
/// The stream is never global: the solver and the shuffle pass receive it by
/// mutable reference, in a fixed order.
pub struct RandomSource {
    rng: StdRng,
}

impl RandomSource {
    /// Create a stream from a seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draw the next raw 64-bit value
    pub fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    /// Draw a value in `0..bound` by modulo reduction
    ///
    /// A zero bound yields 0 without consuming a draw.
    pub fn below(&mut self, bound: usize) -> usize {
        if bound == 0 {
            return 0;
        }
        (self.next_u64() % bound as u64) as usize
    }

    /// Draw a permutation of `0..N` reached by `iterations` random transpositions
    ///
    /// Starts from the identity. Each step picks `a`, then resamples `b` until it
    /// differs from `a`, and swaps the two positions. The result is not uniform:
    /// an even number of steps only ever produces even permutations.
    pub fn permutation<const N: usize>(&mut self, iterations: usize) -> [usize; N] {
        let mut permutation: [usize; N] = std::array::from_fn(|index| index);
        if N < 2 {
            return permutation;
        }

        for _ in 0..iterations {
            let a = self.below(N);
            let mut b = self.below(N);
            while b == a {
                b = self.below(N);
            }
            permutation.swap(a, b);
        }

        permutation
    }

    /// Draw `count` palette entries independently, duplicates allowed
    pub fn choose_with_replacement<T: Copy>(&mut self, palette: &[T], count: usize) -> Vec<T> {
        let mut chosen = Vec::with_capacity(count);
        if palette.is_empty() {
            return chosen;
        }

        for _ in 0..count {
            let index = self.below(palette.len());
            if let Some(&entry) = palette.get(index) {
                chosen.push(entry);
            }
        }
        chosen
    }

    /// Weighted coin flip that is true with probability `numerator / denominator`
    ///
    /// A zero denominator is always false and consumes no draw.
    pub fn weighted_bool(&mut self, numerator: u64, denominator: u64) -> bool {
        if denominator == 0 {
            return false;
        }
        self.next_u64() % denominator < numerator
    }
}
