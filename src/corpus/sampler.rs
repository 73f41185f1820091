//! @ai:module:intent Reproducible per-function selection of call occurrences
//! @ai:module:layer domain
//! @ai:module:public_api CorpusSampler
//! @ai:module:stateless false

use crate::config::CorpusConfig;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// @ai:intent Selects a bounded subset of each function's occurrences from one seeded source
pub struct CorpusSampler {
    rng: StdRng,
    completion_probability: f64,
    max_per_function: usize,
}

impl CorpusSampler {
    /// @ai:intent Create a sampler seeded for reproducible draws
    /// @ai:pre 0 <= completion_probability <= 1
    /// @ai:effects pure
    pub fn new(seed: u64, completion_probability: f64, max_per_function: usize) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            completion_probability,
            max_per_function,
        }
    }

    /// @ai:intent Create a sampler from corpus configuration
    /// @ai:effects pure
    pub fn from_config(config: &CorpusConfig) -> Self {
        Self::new(
            config.seed,
            config.completion_probability,
            config.max_completions_per_function,
        )
    }

    /// @ai:intent Number of occurrences to draw from a function with `count` of them
    /// @ai:effects pure
    pub fn sample_size(&self, count: usize) -> usize {
        let scaled = (count as f64 * self.completion_probability).floor() as usize;
        scaled.min(self.max_per_function)
    }

    /// @ai:intent Draw without replacement; the shared generator advances on every call
    /// @ai:effects state:write
    pub fn sample<T: Clone>(&mut self, items: &[T]) -> Vec<T> {
        let amount = self.sample_size(items.len());

        if amount == 0 {
            return Vec::new();
        }

        rand::seq::index::sample(&mut self.rng, items.len(), amount)
            .into_iter()
            .map(|i| items[i].clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_size_is_bounded() {
        let sampler = CorpusSampler::new(42, 0.5, 3);
        assert_eq!(sampler.sample_size(1), 0);
        assert_eq!(sampler.sample_size(5), 2);
        assert_eq!(sampler.sample_size(100), 3);
    }

    #[test]
    fn test_full_probability_selects_everything_under_cap() {
        let mut sampler = CorpusSampler::new(42, 1.0, 3);
        let mut picked = sampler.sample(&[1, 2, 3]);
        picked.sort();
        assert_eq!(picked, vec![1, 2, 3]);
    }

    #[test]
    fn test_selection_without_replacement() {
        let mut sampler = CorpusSampler::new(7, 1.0, 10);
        let items: Vec<u32> = (0..10).collect();
        let mut picked = sampler.sample(&items);
        picked.sort();
        picked.dedup();
        assert_eq!(picked.len(), 10);
    }

    #[test]
    fn test_same_seed_same_draws() {
        let items: Vec<u32> = (0..50).collect();

        let mut first = CorpusSampler::new(99, 0.2, 5);
        let mut second = CorpusSampler::new(99, 0.2, 5);

        for _ in 0..4 {
            assert_eq!(first.sample(&items), second.sample(&items));
        }
    }

    #[test]
    fn test_zero_probability_selects_nothing() {
        let mut sampler = CorpusSampler::new(1, 0.0, 3);
        assert!(sampler.sample(&[1, 2, 3]).is_empty());
    }
}
