use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Seeded random number generator for reproducible simulations
#[derive(Clone)]
pub struct SimRng {
    rng: ChaCha8Rng,
    seed: u64,
}

impl SimRng {
    /// Create a new SimRng with an optional seed
    /// If seed is None, generates a random seed
    pub fn new(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(random_seed);
        let rng = ChaCha8Rng::seed_from_u64(seed);
        SimRng { rng, seed }
    }

    /// Independent stream of the generator seeded with `seed`.
    /// Every sweep task gets its own stream so results do not depend on
    /// which worker picked the task up.
    pub fn for_stream(seed: u64, stream: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rng.set_stream(stream);
        SimRng { rng, seed }
    }

    /// Get the seed used for this RNG
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generate a position in range [1, count]
    pub fn position(&mut self, count: u32) -> u32 {
        self.rng.gen_range(1..=count)
    }
}

/// Fresh seed from the thread-local entropy source
pub fn random_seed() -> u64 {
    rand::thread_rng().gen()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_produces_same_sequence() {
        let mut rng1 = SimRng::new(Some(12345));
        let mut rng2 = SimRng::new(Some(12345));

        for _ in 0..100 {
            assert_eq!(rng1.position(60), rng2.position(60), "Same seed should produce same sequence");
        }
    }

    #[test]
    fn test_different_streams_produce_different_sequences() {
        let mut rng1 = SimRng::for_stream(42, 0);
        let mut rng2 = SimRng::for_stream(42, 1);

        let mut same_count = 0;
        for _ in 0..100 {
            if rng1.position(1_000_000) == rng2.position(1_000_000) {
                same_count += 1;
            }
        }
        assert!(same_count < 5, "Different streams should produce different sequences");
    }

    #[test]
    fn test_stream_is_reproducible() {
        let mut rng1 = SimRng::for_stream(7, 3);
        let mut rng2 = SimRng::for_stream(7, 3);
        for _ in 0..100 {
            assert_eq!(rng1.position(99), rng2.position(99));
        }
        assert_eq!(rng1.seed(), 7);
    }

    #[test]
    fn test_position_range() {
        let mut rng = SimRng::new(Some(123));
        let mut seen_low = false;
        let mut seen_high = false;
        for _ in 0..1000 {
            let val = rng.position(10);
            assert!((1..=10).contains(&val), "position should be in [1, count]");
            seen_low |= val == 1;
            seen_high |= val == 10;
        }
        assert!(seen_low && seen_high, "both ends of the range should be reachable");
    }
}
