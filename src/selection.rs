//! Parent selection.
//!
//! Both strategies read a frozen population slice and return an index into
//! it. Fitness here is the chromosome's `1 / (1 + conflicts)`, so higher is
//! better and every weight is strictly positive.
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"
//! - Goldberg & Deb (1991), "A Comparative Analysis of Selection Schemes
//!   Used in Genetic Algorithms"

use crate::chromosome::Chromosome;
use rand::seq::index;
use rand::Rng;

/// Tournament selection: sample `k` distinct individuals, return the fittest.
///
/// `k` is clamped to the population size. Ties go to the earliest sampled
/// contestant.
///
/// # Complexity
/// O(k) per selection
///
/// # Panics
/// Panics if `population` is empty.
pub fn tournament<R: Rng>(population: &[Chromosome], k: usize, rng: &mut R) -> usize {
    assert!(
        !population.is_empty(),
        "cannot select from empty population"
    );

    let k = k.clamp(1, population.len());
    let mut contestants = index::sample(rng, population.len(), k).into_iter();
    let mut best_idx = contestants
        .next()
        .expect("sample of k >= 1 indices is non-empty");
    for idx in contestants {
        if population[idx].fitness() > population[best_idx].fitness() {
            best_idx = idx;
        }
    }
    best_idx
}

/// Fitness-proportionate selection over a fixed population.
///
/// Cumulative weights are built once per generation so each spin is a
/// binary search.
///
/// # Complexity
/// O(n) to build, O(log n) per selection
#[derive(Debug, Clone)]
pub struct RouletteWheel {
    cumulative: Vec<f64>,
}

impl RouletteWheel {
    /// Builds the wheel for `population`.
    ///
    /// # Panics
    /// Panics if `population` is empty.
    pub fn new(population: &[Chromosome]) -> Self {
        assert!(
            !population.is_empty(),
            "cannot select from empty population"
        );

        let cumulative = population
            .iter()
            .scan(0.0, |acc, c| {
                *acc += c.fitness();
                Some(*acc)
            })
            .collect();
        Self { cumulative }
    }

    /// Sum of all fitness values.
    pub fn total(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// Picks an index with probability `fitness / total`.
    pub fn spin<R: Rng>(&self, rng: &mut R) -> usize {
        let threshold = rng.random_range(0.0..self.total());
        let idx = self.cumulative.partition_point(|&c| c <= threshold);
        idx.min(self.cumulative.len() - 1) // floating-point fallback
    }
}

/// One-off roulette selection. Prefer [`RouletteWheel`] when spinning
/// repeatedly over the same population.
pub fn roulette<R: Rng>(population: &[Chromosome], rng: &mut R) -> usize {
    RouletteWheel::new(population).spin(rng)
}
