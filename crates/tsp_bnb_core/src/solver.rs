use tsp_bnb_derive::CliValue;

use crate::{
    DistanceMatrix, Error, Result,
    algo::{Pruning, iterative, recursive, sequential},
};

/// Traversal used to explore the search tree. All strategies return the same
/// optimum; they differ only in how work is spread over threads.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, CliValue)]
#[cli_value(option = "strategy")]
pub enum Strategy {
    #[cli(alias = "seq")]
    Sequential,
    #[cli(alias = "recursive")]
    ParallelRecursive,
    #[cli(alias = "iterative")]
    ParallelIterative,
}

impl Strategy {
    pub const ALL: [Self; 3] = [
        Self::Sequential,
        Self::ParallelRecursive,
        Self::ParallelIterative,
    ];

    pub fn is_parallel(self) -> bool {
        !matches!(self, Self::Sequential)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolveConfig {
    pub strategy: Strategy,
    /// Worker threads for the parallel strategies. Ignored by `Sequential`.
    pub workers: usize,
    pub pruning: Pruning,
}

impl SolveConfig {
    pub fn new(strategy: Strategy, workers: usize) -> Self {
        Self {
            strategy,
            workers,
            pruning: Pruning::Enabled,
        }
    }

    pub fn pruning(mut self, pruning: Pruning) -> Self {
        self.pruning = pruning;
        self
    }
}

/// Length of the shortest closed tour through every city, starting and
/// ending at city 0. `+inf` when no finite tour exists.
#[tsp_bnb_derive::timer("solver")]
pub fn solve_matrix(matrix: &DistanceMatrix, config: &SolveConfig) -> Result<f64> {
    if config.strategy.is_parallel() && config.workers == 0 {
        return Err(Error::invalid_input(format!(
            "{} needs at least one worker",
            config.strategy
        )));
    }

    log::debug!(
        "solver: start n={} strategy={} workers={} pruning={:?}",
        matrix.n(),
        config.strategy,
        config.workers,
        config.pruning
    );

    let best = match config.strategy {
        Strategy::Sequential => sequential::search(matrix, config.pruning),
        Strategy::ParallelRecursive => recursive::search(matrix, config.workers, config.pruning),
        Strategy::ParallelIterative => iterative::search(matrix, config.workers, config.pruning),
    }?;

    log::debug!("solver: complete n={} best={best}", matrix.n());
    Ok(best)
}

/// Validates `distances` and solves it with pruning enabled.
pub fn solve(distances: &[Vec<f64>], strategy: Strategy, workers: usize) -> Result<f64> {
    let matrix = DistanceMatrix::from_rows(distances)?;
    solve_matrix(&matrix, &SolveConfig::new(strategy, workers))
}
