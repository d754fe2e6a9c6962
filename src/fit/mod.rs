// Least-squares fitting engine
//
// Given per-group samples of (explanatory row, response) pairs, solves the
// linear least-squares problem, reports the uncentered R^2 and a 95%
// Student-t half-width per coefficient.
//
// Degradation:
// - empty, non-finite or rank-deficient design -> no model
// - too few rows or singular X'X              -> model and R^2, no intervals
//
// Linear algebra is nalgebra (SVD for the solve, inverse of X'X for the
// intervals); the critical value comes from statrs.

mod error;
mod estimator;
mod outcome;
mod sample;
mod statistics;

pub use error::{SampleError, StatsError};
pub use estimator::{estimate, Model};
pub use outcome::{fit_group, GroupFit};
pub use sample::{Aggregator, Sample};
pub use statistics::{critical_value, r_squared, stats, FitStatistics, CONFIDENCE};
