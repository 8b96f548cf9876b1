//! Benchmark utilities for the counting Bloom filter
pub mod utils {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// `count` random byte strings of `len` bytes from a seeded RNG.
    pub fn generate_elements(count: usize, len: usize, seed: u64) -> Vec<Vec<u8>> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..count)
            .map(|_| {
                let mut element = vec![0u8; len];
                rng.fill(&mut element[..]);
                element
            })
            .collect()
    }

    /// Elements sharing a 16-byte prefix and differing only in a counter suffix.
    pub fn generate_shared_prefix_elements(count: usize, seed: u64) -> Vec<Vec<u8>> {
        let mut rng = StdRng::seed_from_u64(seed);
        let prefix: [u8; 16] = rng.gen();

        (0..count)
            .map(|i| {
                let mut element = Vec::with_capacity(20);
                element.extend_from_slice(&prefix);
                element.extend_from_slice(&(i as u32).to_be_bytes());
                element
            })
            .collect()
    }
}
