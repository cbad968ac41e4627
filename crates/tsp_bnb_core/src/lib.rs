//! Exact branch-and-bound solver for the symmetric travelling salesman problem
//! on small dense distance matrices (up to 32 cities).
//!
//! Three interchangeable strategies explore the same search tree: a
//! sequential depth-first search, a fork-join search on a rayon pool and a
//! work-pool search with explicit quiescence detection. The parallel
//! strategies prune against one [`SharedBound`].

mod algo;
mod error;
mod io;
pub mod logging;
mod model;
pub mod runner;
mod solver;

pub(crate) use io::options;

pub use algo::{
    Pruning,
    bound::{BoundView, SharedBound},
};
pub use error::{Error, Result};
pub use io::input::{InputFormat, MatrixInput, shuffle_cities};
pub use io::options::{LogFormat, LogLevel, SolverOptions, StrategyChoice};
pub use io::output::write_reports;
pub use model::{
    city_set::{CitySet, Members},
    matrix::DistanceMatrix,
    path::PathState,
};
pub use solver::{SolveConfig, Strategy, solve, solve_matrix};
