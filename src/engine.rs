//! Generational loop for the 8-queens GA.
//!
//! [`Engine`] owns the population and drives the evolutionary process:
//! initialization → elitism → selection → crossover → mutation → repeat,
//! until a conflict-free placement appears or the budget runs out.

use crate::chromosome::Chromosome;
use crate::config::{ConfigError, GaConfig};
use crate::operators::{random_chromosome, reset_mutation, segment_crossover};
use crate::random::create_rng;
use crate::selection::{tournament, RouletteWheel};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RunStatus {
    /// A conflict-free placement was found.
    Converged,
    /// The generation budget was used up.
    BudgetExhausted,
    /// The cancellation flag was raised.
    Cancelled,
    /// The wall-clock limit elapsed.
    TimedOut,
}

/// Result of a GA run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunResult {
    /// The best chromosome found during the entire run.
    pub best: Chromosome,

    /// Total number of generations completed.
    pub generations: usize,

    /// Why the loop ended.
    pub status: RunStatus,

    /// Conflicts of the best-ever chromosome after each generation.
    pub conflicts_history: Vec<usize>,
}

/// Per-child parameters, copied into each breeding task.
#[derive(Debug, Clone, Copy)]
struct BreedParams {
    tournament_size: usize,
    crossover_prob: f64,
    mutation_prob: f64,
}

/// Genetic algorithm engine for placing eight queens on an N×N board.
///
/// The random source is injected: any [`Rng`] works, and [`Engine::new`]
/// defaults to a seeded [`StdRng`].
///
/// # Usage
///
/// ```
/// use u_queens::{Engine, GaConfig};
///
/// let config = GaConfig::new(8).with_generations(50).with_seed(42);
/// let mut engine = Engine::new(config);
/// let best = engine.run_with_progress(|generation, fitness, conflicts| {
///     assert!(generation >= 1);
///     assert_eq!(fitness, 1.0 / (1.0 + conflicts as f64));
/// });
/// assert_eq!(best.genes().len(), 8);
/// assert!(engine.history().len() <= 50);
/// ```
#[derive(Debug, Clone)]
pub struct Engine<R: Rng = StdRng> {
    config: GaConfig,
    mutation_prob: f64,
    population: Vec<Chromosome>,
    best: Chromosome,
    stagnation_counter: usize,
    history: Vec<usize>,
    generation: usize,
    rng: R,
}

impl Engine<StdRng> {
    /// Builds an engine seeded from `config.seed`, or from entropy when unset.
    ///
    /// # Panics
    /// Panics if the configuration is invalid (call [`GaConfig::validate`] or
    /// [`Engine::try_new`] to get a descriptive error).
    pub fn new(config: GaConfig) -> Self {
        Self::try_new(config).expect("invalid GaConfig")
    }

    /// Fallible variant of [`Engine::new`].
    pub fn try_new(config: GaConfig) -> Result<Self, ConfigError> {
        let rng = match config.seed {
            Some(seed) => create_rng(seed),
            None => create_rng(rand::random()),
        };
        Self::try_with_rng(config, rng)
    }
}

impl<R: Rng> Engine<R> {
    /// Builds an engine drawing all randomness from `rng`.
    ///
    /// `config.seed` is ignored.
    ///
    /// # Panics
    /// Panics if the configuration is invalid.
    pub fn with_rng(config: GaConfig, rng: R) -> Self {
        Self::try_with_rng(config, rng).expect("invalid GaConfig")
    }

    /// Fallible variant of [`Engine::with_rng`].
    pub fn try_with_rng(config: GaConfig, mut rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let population = (0..config.population_size)
            .map(|_| random_chromosome(config.board_size, &mut rng))
            .collect();
        Ok(Self::assemble(config, population, rng))
    }

    /// Builds an engine from a caller-supplied initial population.
    ///
    /// The population must hold exactly `population_size` chromosomes built
    /// for `board_size`.
    pub fn try_with_population(
        config: GaConfig,
        population: Vec<Chromosome>,
        rng: R,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if population.len() != config.population_size {
            return Err(ConfigError::PopulationSizeMismatch {
                expected: config.population_size,
                got: population.len(),
            });
        }
        if let Some(c) = population
            .iter()
            .find(|c| c.board_size() != config.board_size)
        {
            return Err(ConfigError::BoardSizeMismatch {
                expected: config.board_size,
                got: c.board_size(),
            });
        }
        Ok(Self::assemble(config, population, rng))
    }

    fn assemble(config: GaConfig, population: Vec<Chromosome>, rng: R) -> Self {
        let best = find_best(&population).clone();
        debug!(
            "initial population of {} on {}x{} board, best conflicts {}",
            population.len(),
            config.board_size,
            config.board_size,
            best.conflicts()
        );
        Self {
            mutation_prob: config.mutation_prob,
            history: Vec::new(),
            config,
            population,
            best,
            stagnation_counter: 0,
            generation: 0,
            rng,
        }
    }

    /// The configuration this engine was built with.
    pub fn config(&self) -> &GaConfig {
        &self.config
    }

    /// The current generation's chromosomes.
    pub fn population(&self) -> &[Chromosome] {
        &self.population
    }

    /// The fittest chromosome seen so far.
    pub fn best(&self) -> &Chromosome {
        &self.best
    }

    /// Best-ever conflicts after each completed generation.
    pub fn history(&self) -> &[usize] {
        &self.history
    }

    /// Current (possibly boosted) mutation probability.
    pub fn mutation_prob(&self) -> f64 {
        self.mutation_prob
    }

    /// Consecutive generations without a best-ever improvement.
    pub fn stagnation_counter(&self) -> usize {
        self.stagnation_counter
    }

    /// Number of completed generations.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Tournament selection over the current population.
    pub fn tournament_selection(&mut self) -> &Chromosome {
        let idx = tournament(&self.population, self.config.tournament_size, &mut self.rng);
        &self.population[idx]
    }

    /// Fitness-proportionate selection over the current population.
    pub fn roulette_selection(&mut self) -> &Chromosome {
        let idx = RouletteWheel::new(&self.population).spin(&mut self.rng);
        &self.population[idx]
    }

    /// Segment crossover using this engine's crossover probability.
    pub fn crossover(&mut self, parent1: &Chromosome, parent2: &Chromosome) -> Chromosome {
        segment_crossover(parent1, parent2, self.config.crossover_prob, &mut self.rng)
    }

    /// Per-gene reset mutation using the current mutation probability.
    pub fn mutate(&mut self, chromosome: &mut Chromosome) {
        reset_mutation(chromosome, self.mutation_prob, &mut self.rng);
    }

    /// Advances one generation.
    ///
    /// Elites are copied unchanged; every other slot is filled by a child
    /// whose parents both come from the population being replaced.
    pub fn evolve_population(&mut self) {
        let mut next_gen = self.elites();
        let wheel = RouletteWheel::new(&self.population);
        let children = self.breed(self.config.population_size - next_gen.len(), &wheel);
        next_gen.extend(children);

        self.population = next_gen;
        self.generation += 1;
        self.update_best();
    }

    /// Runs to completion without progress reporting.
    pub fn run(&mut self) -> Chromosome {
        self.run_with_progress(|_, _, _| {})
    }

    /// Runs to completion, calling `on_generation(generation, best_fitness,
    /// best_conflicts)` after every generation.
    pub fn run_with_progress<F>(&mut self, on_generation: F) -> Chromosome
    where
        F: FnMut(usize, f64, usize),
    {
        self.run_with_cancel(on_generation, None).best
    }

    /// Runs with an optional cancellation token.
    ///
    /// If `cancel` is `Some` and the flag is set to `true`, the loop stops
    /// before starting the next generation and returns the best chromosome
    /// found so far. The time limit from the configuration is checked at the
    /// same point.
    pub fn run_with_cancel<F>(
        &mut self,
        mut on_generation: F,
        cancel: Option<Arc<AtomicBool>>,
    ) -> RunResult
    where
        F: FnMut(usize, f64, usize),
    {
        let start = Instant::now();
        let time_limit = self.config.time_limit_ms.map(Duration::from_millis);
        let mut status = RunStatus::BudgetExhausted;

        while self.generation < self.config.generations {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    status = RunStatus::Cancelled;
                    break;
                }
            }
            if let Some(limit) = time_limit {
                if start.elapsed() >= limit {
                    status = RunStatus::TimedOut;
                    break;
                }
            }

            self.evolve_population();
            self.history.push(self.best.conflicts());
            debug!(
                "generation {}: best fitness = {:.4}, conflicts = {}",
                self.generation,
                self.best.fitness(),
                self.best.conflicts()
            );

            on_generation(self.generation, self.best.fitness(), self.best.conflicts());

            if self.best.is_solution() {
                status = RunStatus::Converged;
                break;
            }
        }

        match status {
            RunStatus::Converged => {
                info!("solution found at generation {}: {}", self.generation, self.best)
            }
            other => info!(
                "stopped ({other:?}) after {} generations, best {}",
                self.generation, self.best
            ),
        }

        RunResult {
            best: self.best.clone(),
            generations: self.generation,
            status,
            conflicts_history: self.history.clone(),
        }
    }

    /// The `elite_size` fittest chromosomes, in no particular order.
    fn elites(&self) -> Vec<Chromosome> {
        let k = self.config.elite_size;
        if k == 0 {
            return Vec::with_capacity(self.config.population_size);
        }
        let mut ranked: Vec<&Chromosome> = self.population.iter().collect();
        if k < ranked.len() {
            // Partition so the first k entries are the fittest.
            ranked.select_nth_unstable_by(k - 1, |a, b| Chromosome::fitter_first(a, b));
            ranked.truncate(k);
        }
        let mut elites = Vec::with_capacity(self.config.population_size);
        elites.extend(ranked.into_iter().cloned());
        elites
    }

    /// Produces `count` children from the current population.
    fn breed(&mut self, count: usize, wheel: &RouletteWheel) -> Vec<Chromosome> {
        let params = BreedParams {
            tournament_size: self.config.tournament_size,
            crossover_prob: self.config.crossover_prob,
            mutation_prob: self.mutation_prob,
        };

        #[cfg(feature = "parallel")]
        if self.config.parallel {
            // One seed per slot, drawn in order, keeps runs reproducible.
            let seeds: Vec<u64> = (0..count).map(|_| self.rng.random()).collect();
            let population = &self.population;
            return seeds
                .into_par_iter()
                .map(|seed| produce_child(population, wheel, params, &mut create_rng(seed)))
                .collect();
        }

        (0..count)
            .map(|_| produce_child(&self.population, wheel, params, &mut self.rng))
            .collect()
    }

    fn update_best(&mut self) {
        let gen_best = find_best(&self.population);
        if gen_best.fitness() > self.best.fitness() {
            self.best = gen_best.clone();
            self.stagnation_counter = 0;
            return;
        }

        self.stagnation_counter += 1;
        if self.stagnation_counter >= self.config.stagnation_limit {
            let boosted =
                (self.mutation_prob * self.config.mutation_boost).min(self.config.max_mutation_prob);
            debug!(
                "stagnated for {} generations, mutation_prob {:.4} -> {:.4}",
                self.stagnation_counter, self.mutation_prob, boosted
            );
            self.mutation_prob = boosted;
        }
    }
}

/// Tournament parent, roulette parent, crossover, mutation.
fn produce_child<R: Rng>(
    population: &[Chromosome],
    wheel: &RouletteWheel,
    params: BreedParams,
    rng: &mut R,
) -> Chromosome {
    let parent1 = &population[tournament(population, params.tournament_size, rng)];
    let parent2 = &population[wheel.spin(rng)];
    let mut child = segment_crossover(parent1, parent2, params.crossover_prob, rng);
    reset_mutation(&mut child, params.mutation_prob, rng);
    child
}

/// Find the chromosome with the highest fitness.
fn find_best(population: &[Chromosome]) -> &Chromosome {
    population
        .iter()
        .min_by(|a, b| Chromosome::fitter_first(a, b))
        .expect("population must not be empty")
}

// ============================================================================
// Tests
// ============================================================================
