//! GA configuration.
//!
//! [`GaConfig`] holds all parameters that control the evolutionary loop.

use crate::chromosome::QUEENS;
use thiserror::Error;

/// Reasons a [`GaConfig`] is rejected by [`GaConfig::validate`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("board_size must be at least {min}, got {got}")]
    BoardTooSmall { min: usize, got: usize },

    #[error("population_size must be at least 1")]
    EmptyPopulation,

    #[error("elite_size ({elite}) exceeds population_size ({population})")]
    EliteExceedsPopulation { elite: usize, population: usize },

    #[error("{name} must lie in [0, 1], got {value}")]
    ProbabilityOutOfRange { name: &'static str, value: f64 },

    #[error("generations must be at least 1")]
    ZeroGenerations,

    #[error("tournament_size must be at least 1")]
    ZeroTournamentSize,

    #[error("time_limit_ms must be positive or None")]
    ZeroTimeLimit,

    #[error("mutation_boost must be finite and at least 1, got {0}")]
    InvalidMutationBoost(f64),

    #[error("seed population has {got} chromosomes, expected {expected}")]
    PopulationSizeMismatch { expected: usize, got: usize },

    #[error("seed chromosome built for board size {got}, expected {expected}")]
    BoardSizeMismatch { expected: usize, got: usize },
}

/// Configuration for the 8-queens genetic algorithm.
///
/// # Defaults
///
/// ```
/// use u_queens::GaConfig;
///
/// let config = GaConfig::default();
/// assert_eq!(config.board_size, 8);
/// assert_eq!(config.population_size, 100);
/// assert_eq!(config.generations, 1000);
/// assert_eq!(config.elite_size, 5);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_queens::GaConfig;
///
/// let config = GaConfig::new(12)
///     .with_population_size(200)
///     .with_mutation_prob(0.1)
///     .with_elite_size(10)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GaConfig {
    /// Board width N. Genes take values in `0..board_size`.
    pub board_size: usize,

    /// Number of chromosomes per generation.
    pub population_size: usize,

    /// Initial per-gene mutation probability (0.0–1.0).
    ///
    /// The engine raises its working copy of this value on stagnation.
    pub mutation_prob: f64,

    /// Probability of applying segment crossover to a pair of parents.
    ///
    /// When crossover is not applied, the child copies the first parent.
    pub crossover_prob: f64,

    /// Maximum number of generations.
    pub generations: usize,

    /// Number of fittest chromosomes copied unchanged into each generation.
    pub elite_size: usize,

    /// Contestants per tournament, drawn without replacement.
    pub tournament_size: usize,

    /// Consecutive non-improving generations before mutation is boosted.
    pub stagnation_limit: usize,

    /// Multiplier applied to the mutation probability on stagnation.
    pub mutation_boost: f64,

    /// Upper bound for the boosted mutation probability.
    pub max_mutation_prob: f64,

    /// Whether to produce children in parallel (requires the `parallel`
    /// feature; ignored otherwise).
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,

    /// Optional wall-clock time limit in milliseconds.
    ///
    /// Checked at the start of each generation, so the actual runtime may
    /// exceed it by one generation's worth of work.
    pub time_limit_ms: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            board_size: QUEENS,
            population_size: 100,
            mutation_prob: 0.05,
            crossover_prob: 0.8,
            generations: 1000,
            elite_size: 5,
            tournament_size: 3,
            stagnation_limit: 100,
            mutation_boost: 1.1,
            max_mutation_prob: 0.5,
            parallel: false,
            seed: None,
            time_limit_ms: None,
        }
    }
}

impl GaConfig {
    /// Default configuration for a board of the given width.
    pub fn new(board_size: usize) -> Self {
        Self {
            board_size,
            ..Self::default()
        }
    }

    /// Sets the board width.
    pub fn with_board_size(mut self, n: usize) -> Self {
        self.board_size = n;
        self
    }

    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the initial mutation probability.
    pub fn with_mutation_prob(mut self, p: f64) -> Self {
        self.mutation_prob = p;
        self
    }

    /// Sets the crossover probability.
    pub fn with_crossover_prob(mut self, p: f64) -> Self {
        self.crossover_prob = p;
        self
    }

    /// Sets the generation budget.
    pub fn with_generations(mut self, n: usize) -> Self {
        self.generations = n;
        self
    }

    /// Sets the number of elites.
    pub fn with_elite_size(mut self, n: usize) -> Self {
        self.elite_size = n;
        self
    }

    /// Sets the tournament size.
    pub fn with_tournament_size(mut self, k: usize) -> Self {
        self.tournament_size = k;
        self
    }

    /// Sets the stagnation limit that triggers mutation boosts.
    pub fn with_stagnation_limit(mut self, limit: usize) -> Self {
        self.stagnation_limit = limit;
        self
    }

    /// Sets the multiplier applied to the mutation probability on stagnation.
    pub fn with_mutation_boost(mut self, factor: f64) -> Self {
        self.mutation_boost = factor;
        self
    }

    /// Sets the upper bound for the boosted mutation probability.
    pub fn with_max_mutation_prob(mut self, p: f64) -> Self {
        self.max_mutation_prob = p;
        self
    }

    /// Enables or disables parallel child production.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the wall-clock time limit in milliseconds.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board_size < QUEENS {
            return Err(ConfigError::BoardTooSmall {
                min: QUEENS,
                got: self.board_size,
            });
        }
        if self.population_size == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        if self.elite_size > self.population_size {
            return Err(ConfigError::EliteExceedsPopulation {
                elite: self.elite_size,
                population: self.population_size,
            });
        }
        for (name, value) in [
            ("mutation_prob", self.mutation_prob),
            ("crossover_prob", self.crossover_prob),
            ("max_mutation_prob", self.max_mutation_prob),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ProbabilityOutOfRange { name, value });
            }
        }
        if !self.mutation_boost.is_finite() || self.mutation_boost < 1.0 {
            return Err(ConfigError::InvalidMutationBoost(self.mutation_boost));
        }
        if self.generations == 0 {
            return Err(ConfigError::ZeroGenerations);
        }
        if self.tournament_size == 0 {
            return Err(ConfigError::ZeroTournamentSize);
        }
        if self.time_limit_ms == Some(0) {
            return Err(ConfigError::ZeroTimeLimit);
        }
        Ok(())
    }
}
