//! Genetic-algorithm search for non-attacking queen placements.
//!
//! Places eight queens on an N×N board (N ≥ 8), one per row, so that no two
//! share a column or a diagonal. The board width only widens the column
//! range; the queen count and the number of occupied rows stay at
//! [`QUEENS`].
//!
//! # Key Types
//!
//! - [`Chromosome`]: One column per row, with cached conflicts and fitness
//! - [`GaConfig`]: Algorithm parameters (population, rates, elitism, budget)
//! - [`Engine`]: Owns the population and executes the evolutionary loop
//! - [`RunResult`]: Final best chromosome with run statistics
//!
//! # Submodules
//!
//! - [`selection`]: Tournament and roulette-wheel parent selection
//! - [`operators`]: Segment crossover and per-gene reset mutation
//! - [`random`]: Seeded generator construction
//!
//! # Example
//!
//! ```
//! use u_queens::{Engine, GaConfig, RunStatus};
//!
//! let config = GaConfig::new(10).with_seed(7).with_generations(200);
//! let mut engine = Engine::new(config);
//! let result = engine.run_with_cancel(|_, _, _| {}, None);
//!
//! if result.status == RunStatus::Converged {
//!     assert_eq!(result.best.conflicts(), 0);
//! }
//! assert_eq!(result.generations, result.conflicts_history.len());
//! ```
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*

mod chromosome;
mod config;
mod engine;
pub mod operators;
pub mod random;
pub mod selection;

pub use chromosome::{Chromosome, QUEENS};
pub use config::{ConfigError, GaConfig};
pub use engine::{Engine, RunResult, RunStatus};
