// Error types for sample accumulation and fit statistics

use thiserror::Error;

/// A row did not match the width of the sample it was appended to
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SampleError {
    #[error("row has {found} explanatory value(s), sample width is {expected}")]
    WidthMismatch { expected: usize, found: usize },

    #[error("explanatory buffer of {values} value(s) does not hold {rows} row(s) of width {width}")]
    ShapeMismatch {
        values: usize,
        rows: usize,
        width: usize,
    },
}

/// Confidence intervals could not be computed for a fitted group
///
/// Distinct from an estimation failure: the coefficients exist, only their
/// uncertainty is undefined.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StatsError {
    #[error("insufficient degrees of freedom: {rows} observation(s) for {width} coefficient(s)")]
    InsufficientDegreesOfFreedom { rows: usize, width: usize },

    #[error("X'X is singular")]
    SingularGramMatrix,

    #[error("model has {coefficients} coefficient(s) but the sample has {width} column(s)")]
    DimensionMismatch { coefficients: usize, width: usize },
}
