// Goodness of fit and coefficient confidence intervals

use super::{Model, Sample, StatsError};
use nalgebra::DMatrix;
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Two-sided confidence level of the reported intervals
pub const CONFIDENCE: f64 = 0.95;

/// R^2 and 95% half-widths for a fitted model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitStatistics {
    pub r_squared: f64,
    /// One half-width per coefficient, in term order
    pub half_widths: Vec<f64>,
    pub degrees_of_freedom: usize,
}

/// Residual and total sums of squares
///
/// The total is taken about zero, not about the mean of y: the model has no
/// implicit intercept, so R^2 is the uncentered variant.
fn sums_of_squares(model: &Model, sample: &Sample) -> (f64, f64) {
    sample
        .iter_rows()
        .fold((0.0, 0.0), |(rss, tss), (row, y)| {
            let residual = y - model.predict(row);
            (rss + residual * residual, tss + y * y)
        })
}

/// Uncentered coefficient of determination, `1 - RSS / sum(y^2)`
///
/// An all-zero response gives a non-finite value; it is reported, not
/// rejected.
pub fn r_squared(model: &Model, sample: &Sample) -> f64 {
    let (rss, tss) = sums_of_squares(model, sample);
    1.0 - rss / tss
}

/// Student-t quantile for a two-sided 95% interval with `df` degrees of freedom
///
/// Zero degrees of freedom has no distribution and yields NaN.
pub fn critical_value(df: usize) -> f64 {
    StudentsT::new(0.0, 1.0, df as f64)
        .map(|t| t.inverse_cdf(1.0 - (1.0 - CONFIDENCE) / 2.0))
        .unwrap_or(f64::NAN)
}

/// R^2 plus per-coefficient half-widths `t * sqrt(mse * (X'X)^-1[i,i])`
pub fn stats(model: &Model, sample: &Sample) -> Result<FitStatistics, StatsError> {
    let (rows, width) = (sample.rows(), sample.width());
    if model.len() != width {
        return Err(StatsError::DimensionMismatch {
            coefficients: model.len(),
            width,
        });
    }
    if rows <= width {
        return Err(StatsError::InsufficientDegreesOfFreedom { rows, width });
    }

    let (rss, tss) = sums_of_squares(model, sample);
    let df = rows - width;
    let mse = rss / df as f64;

    let x = DMatrix::from_row_slice(rows, width, sample.explanatory());
    let gram = x.transpose() * &x;
    let inverse = gram.try_inverse().ok_or(StatsError::SingularGramMatrix)?;

    let t = critical_value(df);
    let half_widths = (0..width)
        .map(|i| t * (mse * inverse[(i, i)]).sqrt())
        .collect();

    Ok(FitStatistics {
        r_squared: 1.0 - rss / tss,
        half_widths,
        degrees_of_freedom: df,
    })
}
