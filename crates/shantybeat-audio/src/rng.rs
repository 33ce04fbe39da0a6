//! Deterministic RNG using PCG32 with BLAKE3 seed derivation.
//!
//! Every voice draws from its own stream, derived from the request seed and
//! the voice name, so adding or removing one voice never changes another.

use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};
use rand_pcg::Pcg32;

/// Creates a PCG32 RNG from a 32-bit seed.
///
/// The seed is duplicated into both halves of the 64-bit PCG state.
pub fn create_rng(seed: u32) -> Pcg32 {
    let seed64 = (seed as u64) | ((seed as u64) << 32);
    Pcg32::seed_from_u64(seed64)
}

/// Derives an independent seed for a named component (e.g. `"drums"`).
pub fn derive_component_seed(base_seed: u32, key: &str) -> u32 {
    let mut input = Vec::with_capacity(4 + key.len());
    input.extend_from_slice(&base_seed.to_le_bytes());
    input.extend_from_slice(key.as_bytes());

    let hash = blake3::hash(&input);
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&hash.as_bytes()[0..4]);
    u32::from_le_bytes(bytes)
}

/// Creates the RNG for a named component.
pub fn create_component_rng(base_seed: u32, key: &str) -> Pcg32 {
    create_rng(derive_component_seed(base_seed, key))
}

/// Draws one standard normal sample.
pub fn gaussian(rng: &mut Pcg32) -> f64 {
    StandardNormal.sample(rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_rng_determinism() {
        let mut rng1 = create_rng(42);
        let mut rng2 = create_rng(42);

        let values1: Vec<f64> = (0..100).map(|_| rng1.gen()).collect();
        let values2: Vec<f64> = (0..100).map(|_| rng2.gen()).collect();

        assert_eq!(values1, values2);
    }

    #[test]
    fn test_component_seeds_are_independent() {
        let drums = derive_component_seed(7, "drums");
        let claps = derive_component_seed(7, "hand_claps");
        assert_ne!(drums, claps);
        assert_eq!(drums, derive_component_seed(7, "drums"));
        assert_ne!(drums, derive_component_seed(8, "drums"));
    }

    #[test]
    fn test_gaussian_is_roughly_standard() {
        let mut rng = create_rng(1);
        let draws: Vec<f64> = (0..20_000).map(|_| gaussian(&mut rng)).collect();
        let mean = draws.iter().sum::<f64>() / draws.len() as f64;
        let var = draws.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / draws.len() as f64;
        assert!(mean.abs() < 0.05, "mean {}", mean);
        assert!((var - 1.0).abs() < 0.1, "variance {}", var);
    }
}
