//! Genetic operators for column-per-row chromosomes.
//!
//! # Crossover
//!
//! - [`segment_crossover`]: Copy parent1, overwrite a random inclusive row
//!   segment with parent2's columns.
//!
//! # Mutation
//!
//! - [`reset_mutation`]: Independently re-draw each column with a fixed
//!   probability.
//!
//! Both operators produce genes in `0..board_size` and leave the chromosome
//! with freshly derived metrics.

use crate::chromosome::{Chromosome, QUEENS};
use rand::seq::index;
use rand::Rng;

/// Segment crossover producing a single child.
///
/// With probability `crossover_prob`, two distinct rows `start < end` are
/// drawn and the child takes parent2's columns on rows `start..=end`.
/// Otherwise the child is an exact copy of parent1.
///
/// # Complexity
/// O(1): at most [`QUEENS`] genes are copied.
pub fn segment_crossover<R: Rng>(
    parent1: &Chromosome,
    parent2: &Chromosome,
    crossover_prob: f64,
    rng: &mut R,
) -> Chromosome {
    let mut genes = *parent1.genes();
    if rng.random_range(0.0..1.0) < crossover_prob {
        let (start, end) = random_segment(rng);
        genes[start..=end].copy_from_slice(&parent2.genes()[start..=end]);
    }
    Chromosome::new(genes, parent1.board_size())
}

/// Per-gene reset mutation.
///
/// Each row independently receives a uniformly random column with
/// probability `mutation_prob`. Metrics are re-derived once afterwards.
pub fn reset_mutation<R: Rng>(
    chromosome: &mut Chromosome,
    mutation_prob: f64,
    rng: &mut R,
) {
    chromosome.update_genes(|genes, board_size| {
        for gene in genes.iter_mut() {
            if rng.random_range(0.0..1.0) < mutation_prob {
                *gene = rng.random_range(0..board_size);
            }
        }
    });
}

/// Produces one random chromosome with uniform columns.
pub fn random_chromosome<R: Rng>(board_size: usize, rng: &mut R) -> Chromosome {
    let genes: [usize; QUEENS] = std::array::from_fn(|_| rng.random_range(0..board_size));
    Chromosome::new(genes, board_size)
}

/// Two distinct rows, returned in ascending order.
fn random_segment<R: Rng>(rng: &mut R) -> (usize, usize) {
    let picks = index::sample(rng, QUEENS, 2);
    let (a, b) = (picks.index(0), picks.index(1));
    (a.min(b), a.max(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;
    use proptest::prelude::*;

    const SOLVED: [usize; QUEENS] = [0, 4, 7, 5, 2, 6, 1, 3];

    #[test]
    fn test_crossover_prob_zero_copies_parent1() {
        let p1 = Chromosome::new(SOLVED, 8);
        let p2 = Chromosome::new([7; QUEENS], 8);
        let mut rng = create_rng(42);
        for _ in 0..100 {
            let child = segment_crossover(&p1, &p2, 0.0, &mut rng);
            assert_eq!(child, p1);
        }
    }

    #[test]
    fn test_crossover_prob_one_takes_contiguous_segment() {
        let p1 = Chromosome::new([0; QUEENS], 10);
        let p2 = Chromosome::new([9; QUEENS], 10);
        let mut rng = create_rng(42);
        for _ in 0..100 {
            let child = segment_crossover(&p1, &p2, 1.0, &mut rng);
            let taken: Vec<usize> = (0..QUEENS).filter(|&i| child.genes()[i] == 9).collect();
            // At least two rows, and contiguous.
            assert!(taken.len() >= 2, "segment too short: {taken:?}");
            assert_eq!(taken.last().unwrap() - taken[0] + 1, taken.len());
            assert_eq!(child.board_size(), 10);
        }
    }

    #[test]
    fn test_random_segment_distinct_sorted() {
        let mut rng = create_rng(9);
        let mut seen_full = false;
        for _ in 0..2000 {
            let (start, end) = random_segment(&mut rng);
            assert!(start < end && end < QUEENS);
            seen_full |= start == 0 && end == QUEENS - 1;
        }
        assert!(seen_full, "segment [0, 7] never drawn");
    }

    #[test]
    fn test_mutation_prob_zero_is_identity() {
        let mut c = Chromosome::new(SOLVED, 8);
        let mut rng = create_rng(42);
        reset_mutation(&mut c, 0.0, &mut rng);
        assert_eq!(c.genes(), &SOLVED);
        assert_eq!(c.conflicts(), 0);
    }

    #[test]
    fn test_mutation_prob_one_rederives_metrics() {
        let mut rng = create_rng(42);
        for _ in 0..50 {
            let mut c = Chromosome::new(SOLVED, 8);
            reset_mutation(&mut c, 1.0, &mut rng);
            assert_eq!(c, Chromosome::new(*c.genes(), 8));
        }
    }

    #[test]
    fn test_random_chromosome_in_range() {
        let mut rng = create_rng(1);
        for _ in 0..100 {
            let c = random_chromosome(11, &mut rng);
            assert!(c.genes().iter().all(|&g| g < 11));
            assert_eq!(c.board_size(), 11);
        }
    }

    proptest! {
        #[test]
        fn prop_crossover_bounds(
            seed in any::<u64>(),
            prob in 0.0f64..=1.0,
            (n, g1, g2) in (8usize..20).prop_flat_map(|n| {
                (Just(n), proptest::array::uniform8(0..n), proptest::array::uniform8(0..n))
            })
        ) {
            let mut rng = create_rng(seed);
            let p1 = Chromosome::new(g1, n);
            let p2 = Chromosome::new(g2, n);
            let child = segment_crossover(&p1, &p2, prob, &mut rng);
            prop_assert!(child.genes().iter().all(|&g| g < n));
            for i in 0..QUEENS {
                let g = child.genes()[i];
                prop_assert!(g == g1[i] || g == g2[i]);
            }
        }

        #[test]
        fn prop_mutation_stays_in_range(
            seed in any::<u64>(),
            prob in 0.0f64..=1.0,
            n in 8usize..20
        ) {
            let mut rng = create_rng(seed);
            let mut c = random_chromosome(n, &mut rng);
            reset_mutation(&mut c, prob, &mut rng);
            prop_assert!(c.genes().iter().all(|&g| g < n));
            prop_assert_eq!(c.fitness(), 1.0 / (1.0 + c.conflicts() as f64));
        }
    }
}
