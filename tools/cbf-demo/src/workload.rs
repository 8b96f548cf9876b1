//! Random element sets for the demo run.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Elements to insert, and elements guaranteed never to be inserted.
#[derive(Debug, Clone)]
pub struct Workload {
    pub existing: Vec<Vec<u8>>,
    pub absent: Vec<Vec<u8>>,
}

impl Workload {
    /// Generate `count` existing and up to `count` absent elements of
    /// `element_size` bytes each.
    ///
    /// Absent elements that collide with an existing one are dropped, so
    /// with tiny element sizes the absent set can come out short.
    pub fn generate(count: usize, element_size: usize, seed: Option<u64>) -> Self {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let existing: Vec<Vec<u8>> = (0..count).map(|_| random_element(&mut rng, element_size)).collect();
        let lookup: HashSet<&[u8]> = existing.iter().map(Vec::as_slice).collect();

        let absent = (0..count)
            .map(|_| random_element(&mut rng, element_size))
            .filter(|element| !lookup.contains(element.as_slice()))
            .collect();

        Self { existing, absent }
    }
}

fn random_element(rng: &mut StdRng, len: usize) -> Vec<u8> {
    let mut element = vec![0u8; len];
    rng.fill(&mut element[..]);
    element
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_workload_is_deterministic() {
        let a = Workload::generate(100, 16, Some(7));
        let b = Workload::generate(100, 16, Some(7));

        assert_eq!(a.existing, b.existing);
        assert_eq!(a.absent, b.absent);
        assert_eq!(a.existing.len(), 100);
        assert!(a.existing.iter().all(|e| e.len() == 16));
    }

    #[test]
    fn test_absent_never_overlaps_existing() {
        // 1-byte elements collide constantly
        let workload = Workload::generate(500, 1, Some(3));
        let existing: HashSet<_> = workload.existing.iter().collect();

        assert!(workload.absent.len() < 500);
        assert!(workload.absent.iter().all(|e| !existing.contains(e)));
    }
}
