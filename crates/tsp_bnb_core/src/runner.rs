//! Runs every requested (strategy, workers) combination against one matrix
//! and checks that they all agree on the optimum.

use std::{
    fmt,
    time::{Duration, Instant},
};

use crate::{DistanceMatrix, Error, Result, SolveConfig, Strategy, algo::Pruning, solve_matrix};

const AGREEMENT_TOLERANCE: f64 = 1e-9;

#[derive(Clone, Debug, PartialEq)]
pub struct BenchmarkPlan {
    pub strategies: Vec<Strategy>,
    pub workers: Vec<usize>,
    pub repeat: usize,
    pub pruning: Pruning,
}

impl BenchmarkPlan {
    /// Configurations in run order. `Sequential` runs once, with one worker,
    /// whatever the worker list says.
    pub fn configs(&self) -> Vec<SolveConfig> {
        self.strategies
            .iter()
            .flat_map(|&strategy| {
                let workers = if strategy.is_parallel() {
                    self.workers.clone()
                } else {
                    vec![1]
                };
                workers
                    .into_iter()
                    .map(move |w| SolveConfig::new(strategy, w))
            })
            .map(|config| config.pruning(self.pruning))
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RunReport {
    pub strategy: Strategy,
    pub workers: usize,
    pub best: f64,
    pub runs: usize,
    pub total: Duration,
}

impl RunReport {
    pub fn mean(&self) -> Duration {
        match u32::try_from(self.runs) {
            Ok(0) | Err(_) => self.total,
            Ok(runs) => self.total / runs,
        }
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut best = ryu::Buffer::new();
        write!(
            f,
            "{} {} {} {:.3} {}",
            self.strategy,
            self.workers,
            best.format(self.best),
            self.mean().as_secs_f64() * 1_000.0,
            self.runs
        )
    }
}

/// Solves `matrix` with every configuration of `plan`, `plan.repeat` times
/// each. Fails if any run disagrees with the first result.
#[tsp_bnb_derive::timer("runner")]
pub fn run_benchmark(matrix: &DistanceMatrix, plan: &BenchmarkPlan) -> Result<Vec<RunReport>> {
    if plan.repeat == 0 {
        return Err(Error::invalid_input("benchmark repeat must be at least 1"));
    }

    let mut reference: Option<f64> = None;
    let mut reports = Vec::new();

    for config in plan.configs() {
        let start = Instant::now();
        let mut best = f64::NAN;
        for run in 0..plan.repeat {
            let length = solve_matrix(matrix, &config)?;
            match reference {
                None => reference = Some(length),
                Some(expected) if !same_length(expected, length) => {
                    return Err(Error::other(format!(
                        "{} with {} workers returned {length} on run {run}, expected {expected}",
                        config.strategy, config.workers
                    )));
                }
                Some(_) => {}
            }
            best = length;
        }

        let report = RunReport {
            strategy: config.strategy,
            workers: config.workers,
            best,
            runs: plan.repeat,
            total: start.elapsed(),
        };
        log::info!(
            "runner: strategy={} workers={} best={} mean_ms={:.3}",
            report.strategy,
            report.workers,
            report.best,
            report.mean().as_secs_f64() * 1_000.0
        );
        reports.push(report);
    }

    Ok(reports)
}

fn same_length(a: f64, b: f64) -> bool {
    a == b || (a - b).abs() <= AGREEMENT_TOLERANCE * a.abs().max(1.0)
}
