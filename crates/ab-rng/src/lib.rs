//! Seeded random number generation for dungeon building.
//!
//! Wraps a ChaCha8 stream behind the bounded-integer calls the generator is
//! written against. Reproducibility matters more than statistical strength
//! here: the same seed must always produce the same level.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Game random number generator.
///
/// All bounded calls treat a non-positive bound as "no choice to make" and
/// return 0 rather than panicking, so callers can pass depth-derived
/// expressions without guarding them.
#[derive(Debug, Clone)]
pub struct GameRng {
    rng: ChaCha8Rng,
    seed: u64,
}

/// An opaque copy of the full generator state.
///
/// Taking a snapshot before reseeding and restoring it afterwards is how the
/// town builder keeps its fixed layout from disturbing the main stream.
#[derive(Debug, Clone)]
pub struct RngSnapshot(ChaCha8Rng);

// Serialize the seed only; a restored game re-derives its stream.
impl Serialize for GameRng {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.seed.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for GameRng {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let seed = u64::deserialize(deserializer)?;
        Ok(GameRng::new(seed))
    }
}

impl GameRng {
    /// Create a new RNG with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create a new RNG with a random seed.
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// The seed this RNG was created (or last reseeded) with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Copy the full stream state.
    pub fn snapshot(&self) -> RngSnapshot {
        RngSnapshot(self.rng.clone())
    }

    /// Restore a previously taken snapshot.
    pub fn restore(&mut self, snapshot: RngSnapshot) {
        self.rng = snapshot.0;
    }

    /// Replace the stream with one derived from `seed`.
    ///
    /// Used together with [`snapshot`](Self::snapshot)/[`restore`](Self::restore)
    /// when a builder needs a layout that is stable across sessions.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self.seed = seed;
    }

    /// Random value in `[0, n)`; 0 when `n <= 0`.
    pub fn randint0(&mut self, n: i32) -> i32 {
        if n <= 0 {
            return 0;
        }
        self.rng.gen_range(0..n)
    }

    /// Random value in `[1, n]`; 0 when `n <= 0`.
    pub fn randint1(&mut self, n: i32) -> i32 {
        if n <= 0 {
            return 0;
        }
        self.rng.gen_range(1..=n)
    }

    /// Random value in `[a, b]` inclusive; `a` when the range is empty.
    pub fn rand_range(&mut self, a: i32, b: i32) -> i32 {
        if a >= b {
            return a;
        }
        self.rng.gen_range(a..=b)
    }

    /// Random value in `[center - spread, center + spread]`.
    pub fn rand_spread(&mut self, center: i32, spread: i32) -> i32 {
        center - spread + self.randint0(1 + 2 * spread)
    }

    /// Random value from an approximate normal distribution with the given
    /// mean and standard deviation.
    ///
    /// Integer Irwin-Hall: the sum of twelve 16-bit uniforms has a standard
    /// deviation of one full 16-bit unit, which scales directly by `stand`.
    pub fn rand_normal(&mut self, mean: i32, stand: i32) -> i32 {
        let mut sum: i64 = 0;
        for _ in 0..12 {
            sum += i64::from(self.randint0(65536));
        }
        let offset = (sum - 6 * 65535) * i64::from(stand) / 65536;
        mean + offset as i32
    }

    /// True with probability `1/n`.
    pub fn one_in(&mut self, n: i32) -> bool {
        self.randint0(n) == 0
    }

    /// Shuffle a slice in place (Knuth shuffle).
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.randint0(i as i32 + 1) as usize;
            items.swap(i, j);
        }
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
    fn test_randint0_bounds() {
        let mut rng = GameRng::new(42);
        for _ in 0..1000 {
            let n = rng.randint0(10);
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
    fn test_rand_range_bounds() {
        let mut rng = GameRng::new(42);
        for _ in 0..1000 {
            let n = rng.rand_range(3, 4);
            assert!(n == 3 || n == 4);
        }
        assert_eq!(rng.rand_range(5, 5), 5);
        assert_eq!(rng.rand_range(7, 2), 7);
    }

    #[test]
    fn test_rand_spread_bounds() {
        let mut rng = GameRng::new(42);
        for _ in 0..1000 {
            let n = rng.rand_spread(33, 10);
            assert!((23..=43).contains(&n));
        }
    }

    #[test]
    fn test_rand_normal_center() {
        let mut rng = GameRng::new(42);
        let total: i64 = (0..10_000).map(|_| i64::from(rng.rand_normal(50, 10))).sum();
        let mean = total / 10_000;
        assert!((48..=52).contains(&mean), "mean drifted to {mean}");
    }

    #[test]
    fn test_zero_inputs() {
        let mut rng = GameRng::new(42);
        assert_eq!(rng.randint0(0), 0);
        assert_eq!(rng.randint1(0), 0);
        assert_eq!(rng.randint0(-3), 0);
        assert!(rng.one_in(1));
    }

    #[test]
    fn test_reproducibility() {
        let mut a = GameRng::new(42);
        let mut b = GameRng::new(42);
        for _ in 0..100 {
            assert_eq!(a.randint0(100), b.randint0(100));
        }
    }

    #[test]
    fn test_snapshot_restore() {
        let mut rng = GameRng::new(42);
        rng.randint0(100);

        let saved = rng.snapshot();
        let expected: Vec<i32> = (0..16).map(|_| rng.randint0(1000)).collect();

        // A detour through a fixed-seed stream must not disturb the main one.
        rng.reseed(0xDEAD_BEEF);
        let town_a: Vec<i32> = (0..16).map(|_| rng.randint0(1000)).collect();
        rng.reseed(0xDEAD_BEEF);
        let town_b: Vec<i32> = (0..16).map(|_| rng.randint0(1000)).collect();
        assert_eq!(town_a, town_b);

        rng.restore(saved);
        let replayed: Vec<i32> = (0..16).map(|_| rng.randint0(1000)).collect();
        assert_eq!(expected, replayed);
    }

    #[test]
    fn test_shuffle_permutes() {
        let mut rng = GameRng::new(7);
        let mut items: Vec<i32> = (0..32).collect();
        rng.shuffle(&mut items);
        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..32).collect::<Vec<_>>());
    }
}
