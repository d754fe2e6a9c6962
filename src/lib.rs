//! benchls - least squares fits over parameterized benchmarks
//!
//! Benchmark names such as `BenchmarkSort1000-4` carry parameters. This
//! library pulls those parameters out with a named-capture pattern, turns
//! them into explanatory variables through small user formulas, and fits a
//! linear model per benchmark group with 95% confidence intervals on each
//! coefficient.
//!
//! The two core pieces are usable on their own:
//! - [`expr`]: a restricted arithmetic formula compiler and evaluator
//! - [`fit`]: SVD least squares, R^2 and Student-t intervals

pub mod bench_parse;
pub mod cli;
pub mod config;
pub mod csv_output;
pub mod expr;
pub mod fit;
pub mod html_output;
pub mod json_output;
pub mod pipeline;
pub mod report;
