//! Candidate placements of eight queens.
//!
//! A [`Chromosome`] stores one column per row. Rows are implicit (gene index),
//! so two queens can never share a row; conflicts are column and diagonal
//! clashes only.

use std::cmp::Ordering;
use std::fmt;

/// Number of queens placed, independent of the board width.
///
/// The board is `board_size` columns wide, but only rows `0..QUEENS` carry a
/// queen.
pub const QUEENS: usize = 8;

/// A candidate placement with cached conflict and fitness metrics.
///
/// Metrics are derived on construction and re-derived after every gene edit,
/// so a chromosome can never be observed with stale values.
///
/// # Examples
///
/// ```
/// use u_queens::Chromosome;
///
/// let solved = Chromosome::new([0, 4, 7, 5, 2, 6, 1, 3], 8);
/// assert_eq!(solved.conflicts(), 0);
/// assert_eq!(solved.fitness(), 1.0);
///
/// let stacked = Chromosome::new([0; 8], 8);
/// assert_eq!(stacked.conflicts(), 28);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawChromosome")
)]
pub struct Chromosome {
    genes: [usize; QUEENS],
    board_size: usize,
    conflicts: usize,
    fitness: f64,
}

impl Chromosome {
    /// Creates a chromosome and computes its metrics.
    ///
    /// Genes are trusted to lie in `0..board_size`; this is checked in debug
    /// builds only.
    pub fn new(genes: [usize; QUEENS], board_size: usize) -> Self {
        debug_assert!(
            genes.iter().all(|&g| g < board_size),
            "gene out of range for board size {board_size}: {genes:?}"
        );
        let mut chromosome = Self {
            genes,
            board_size,
            conflicts: 0,
            fitness: 0.0,
        };
        chromosome.derive_metrics();
        chromosome
    }

    /// Column of the queen on each row.
    pub fn genes(&self) -> &[usize; QUEENS] {
        &self.genes
    }

    /// Board width this chromosome was built for.
    pub fn board_size(&self) -> usize {
        self.board_size
    }

    /// Number of attacking queen pairs.
    pub fn conflicts(&self) -> usize {
        self.conflicts
    }

    /// `1 / (1 + conflicts)`, in `(0, 1]`.
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    /// Returns `true` if no two queens attack each other.
    pub fn is_solution(&self) -> bool {
        self.conflicts == 0
    }

    /// Comparator ranking fitter chromosomes first.
    ///
    /// Note the inversion relative to plain numeric order: `Less` means
    /// `a` has the *higher* fitness. Sorting with this comparator yields the
    /// best chromosome at index 0.
    pub fn fitter_first(a: &Chromosome, b: &Chromosome) -> Ordering {
        b.fitness.total_cmp(&a.fitness)
    }

    /// Applies an edit to the genes, then re-derives the metrics once.
    pub(crate) fn update_genes<F>(&mut self, edit: F)
    where
        F: FnOnce(&mut [usize; QUEENS], usize),
    {
        edit(&mut self.genes, self.board_size);
        self.derive_metrics();
    }

    fn derive_metrics(&mut self) {
        self.conflicts = count_conflicts(&self.genes);
        self.fitness = 1.0 / (1.0 + self.conflicts as f64);
    }
}

impl fmt::Display for Chromosome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} (conflicts={}, fitness={:.4})",
            self.genes, self.conflicts, self.fitness
        )
    }
}

/// Wire form of a [`Chromosome`]. Cached metrics in the input are ignored
/// and re-derived from the genes.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
pub struct RawChromosome {
    genes: [usize; QUEENS],
    board_size: usize,
}

#[cfg(feature = "serde")]
#[derive(Debug, thiserror::Error)]
#[error("gene {column} on row {row} is outside a board of size {board_size}")]
pub struct GeneOutOfRange {
    row: usize,
    column: usize,
    board_size: usize,
}

#[cfg(feature = "serde")]
impl TryFrom<RawChromosome> for Chromosome {
    type Error = GeneOutOfRange;

    fn try_from(raw: RawChromosome) -> Result<Self, Self::Error> {
        if let Some((row, &column)) = raw
            .genes
            .iter()
            .enumerate()
            .find(|&(_, &g)| g >= raw.board_size)
        {
            return Err(GeneOutOfRange {
                row,
                column,
                board_size: raw.board_size,
            });
        }
        Ok(Chromosome::new(raw.genes, raw.board_size))
    }
}

/// Counts unordered pairs sharing a column or a diagonal.
///
/// A pair cannot satisfy both conditions (that would need equal rows), so
/// each pair contributes at most one.
fn count_conflicts(genes: &[usize; QUEENS]) -> usize {
    let mut conflicts = 0;
    for i in 0..QUEENS {
        for j in (i + 1)..QUEENS {
            let (a, b) = (genes[i], genes[j]);
            if a == b || a.abs_diff(b) == j - i {
                conflicts += 1;
            }
        }
    }
    conflicts
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_solution() {
        let c = Chromosome::new([0, 4, 7, 5, 2, 6, 1, 3], 8);
        assert_eq!(c.conflicts(), 0);
        assert_eq!(c.fitness(), 1.0);
        assert!(c.is_solution());
    }

    #[test]
    fn test_known_solution_on_wider_board() {
        let c = Chromosome::new([0, 4, 7, 5, 2, 6, 1, 3], 12);
        assert_eq!(c.conflicts(), 0);
        assert_eq!(c.board_size(), 12);
    }

    #[test]
    fn test_same_column_everywhere() {
        let c = Chromosome::new([0; QUEENS], 8);
        assert_eq!(c.conflicts(), 28);
        assert!((c.fitness() - 1.0 / 29.0).abs() < 1e-15);
        assert!(!c.is_solution());
    }

    #[test]
    fn test_main_diagonal() {
        // Every pair shares the diagonal.
        let c = Chromosome::new([0, 1, 2, 3, 4, 5, 6, 7], 8);
        assert_eq!(c.conflicts(), 28);
    }

    #[test]
    fn test_moved_queen_clashes() {
        // Row 6 moved onto row 7's column, which also puts it on row 2's
        // diagonal.
        let base = Chromosome::new([0, 4, 7, 5, 2, 6, 1, 3], 8);
        assert_eq!(base.conflicts(), 0);
        let c = Chromosome::new([0, 4, 7, 5, 2, 6, 3, 3], 8);
        assert_eq!(c.conflicts(), 2);
    }

    #[test]
    fn test_update_genes_rederives_metrics() {
        let mut c = Chromosome::new([0; QUEENS], 8);
        c.update_genes(|genes, _| *genes = [0, 4, 7, 5, 2, 6, 1, 3]);
        assert_eq!(c.conflicts(), 0);
        assert_eq!(c.fitness(), 1.0);
    }

    #[test]
    fn test_fitter_first_sorts_best_to_front() {
        let mut pop = vec![
            Chromosome::new([0; QUEENS], 8),
            Chromosome::new([0, 4, 7, 5, 2, 6, 1, 3], 8),
            Chromosome::new([0, 4, 7, 5, 2, 6, 3, 3], 8),
        ];
        pop.sort_by(Chromosome::fitter_first);
        assert_eq!(pop[0].conflicts(), 0);
        assert_eq!(pop[2].conflicts(), 28);
        assert_eq!(
            Chromosome::fitter_first(&pop[0], &pop[1]),
            Ordering::Less
        );
    }

    #[test]
    fn test_display() {
        let c = Chromosome::new([0, 4, 7, 5, 2, 6, 1, 3], 8);
        assert_eq!(
            c.to_string(),
            "[0, 4, 7, 5, 2, 6, 1, 3] (conflicts=0, fitness=1.0000)"
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_rederives_metrics() {
        let json = r#"{"genes":[0,0,0,0,0,0,0,0],"board_size":8,"conflicts":0,"fitness":1.0}"#;
        let c: Chromosome = serde_json::from_str(json).unwrap();
        assert_eq!(c.conflicts(), 28);
        assert!(!c.is_solution());
        assert_eq!(c, Chromosome::new([0; QUEENS], 8));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_roundtrip_without_metrics() {
        let c = Chromosome::new([0, 4, 7, 5, 2, 6, 1, 3], 10);
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(serde_json::from_str::<Chromosome>(&json).unwrap(), c);

        let bare: Chromosome =
            serde_json::from_str(r#"{"genes":[0,4,7,5,2,6,3,3],"board_size":8}"#).unwrap();
        assert_eq!(bare.conflicts(), 2);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_rejects_out_of_range_gene() {
        let err = serde_json::from_str::<Chromosome>(r#"{"genes":[0,4,7,5,2,6,1,8],"board_size":8}"#)
            .unwrap_err();
        assert!(
            err.to_string()
                .contains("gene 8 on row 7 is outside a board of size 8"),
            "unexpected error: {err}"
        );
    }

    proptest! {
        #[test]
        fn prop_metrics_consistent(
            (n, genes) in (8usize..16).prop_flat_map(|n| {
                (Just(n), proptest::array::uniform8(0..n))
            })
        ) {
            let c = Chromosome::new(genes, n);
            prop_assert!(c.conflicts() <= 28);
            prop_assert_eq!(c.fitness(), 1.0 / (1.0 + c.conflicts() as f64));
            prop_assert!(c.fitness() > 0.0 && c.fitness() <= 1.0);
            prop_assert_eq!(c.is_solution(), c.fitness() == 1.0);
        }

        #[test]
        fn prop_mirror_preserves_conflicts(genes in proptest::array::uniform8(0usize..8)) {
            let mirrored = genes.map(|g| 7 - g);
            prop_assert_eq!(
                Chromosome::new(genes, 8).conflicts(),
                Chromosome::new(mirrored, 8).conflicts()
            );
        }
    }
}
