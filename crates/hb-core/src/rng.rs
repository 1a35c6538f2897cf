//! Random number generation
//!
//! Uses a seeded ChaCha RNG so sessions and tests are reproducible.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Game random number generator
///
/// Keeps its seed so a session can report how to replay it.
#[derive(Debug, Clone)]
pub struct GameRng {
    rng: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create a new RNG with a random seed
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// 0..n-1, or 0 when `n <= 0`
    pub fn rn2(&mut self, n: i32) -> i32 {
        if n <= 0 {
            return 0;
        }
        self.rng.gen_range(0..n)
    }

    /// 1..=n, or 0 when `n <= 0`
    pub fn randint1(&mut self, n: i32) -> i32 {
        if n <= 0 {
            return 0;
        }
        self.rng.gen_range(1..=n)
    }

    /// True with probability 1/n
    pub fn one_in(&mut self, n: i32) -> bool {
        self.rn2(n) == 0
    }

    /// True with probability percent/100
    pub fn percent(&mut self, percent: i32) -> bool {
        self.rn2(100) < percent
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rn2_bounds() {
        let mut rng = GameRng::new(42);
        for _ in 0..1000 {
            let n = rng.rn2(10);
            assert!((0..10).contains(&n));
        }
    }

    #[test]
    fn test_randint1_bounds() {
        let mut rng = GameRng::new(42);
        for _ in 0..1000 {
            let n = rng.randint1(6);
            assert!((1..=6).contains(&n));
        }
    }

    #[test]
    fn test_reproducibility() {
        let mut rng1 = GameRng::new(42);
        let mut rng2 = GameRng::new(42);
        for _ in 0..100 {
            assert_eq!(rng1.rn2(100), rng2.rn2(100));
        }
    }

    #[test]
    fn test_degenerate_inputs() {
        let mut rng = GameRng::new(42);
        assert_eq!(rng.rn2(0), 0);
        assert_eq!(rng.rn2(-5), 0);
        assert_eq!(rng.randint1(0), 0);
        assert!(!rng.percent(0));
        assert!(rng.one_in(1));
    }
}
