// Least-squares estimation via singular value decomposition
//
// The design matrix is decomposed as X = U S V^T and beta solved as
// V S^-1 U^T y. A design whose numerical rank is below its width has no
// unique solution and yields no model rather than an arbitrary one.

use super::Sample;
use nalgebra::{DMatrix, DVector};
use serde::Serialize;
use tracing::debug;

/// Upper bound on SVD sweeps before giving up on convergence
const MAX_SVD_ITERATIONS: usize = 10_000;

/// Fitted coefficients, one per explanatory term in term order
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Model {
    coefficients: Vec<f64>,
}

impl Model {
    pub fn new(coefficients: Vec<f64>) -> Self {
        Self { coefficients }
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }

    /// Predicted response for one explanatory row
    pub fn predict(&self, row: &[f64]) -> f64 {
        self.coefficients.iter().zip(row).map(|(b, x)| b * x).sum()
    }
}

/// Solve min ||X beta - y||^2 for `sample`
///
/// Returns `None` when the sample is empty or has no columns, holds a
/// non-finite value, the decomposition does not converge, or the design is
/// rank deficient. Rank uses the tolerance `max(rows, width) * s_max * eps`.
pub fn estimate(sample: &Sample) -> Option<Model> {
    let (rows, width) = (sample.rows(), sample.width());
    if rows == 0 || width == 0 {
        debug!(rows, width, "empty design matrix");
        return None;
    }

    let finite = sample
        .explanatory()
        .iter()
        .chain(sample.response())
        .all(|v| v.is_finite());
    if !finite {
        debug!(rows, width, "sample contains non-finite values");
        return None;
    }

    let x = DMatrix::from_row_slice(rows, width, sample.explanatory());
    let y = DVector::from_column_slice(sample.response());

    let Some(svd) = x.try_svd(true, true, f64::EPSILON, MAX_SVD_ITERATIONS) else {
        debug!(rows, width, "SVD did not converge");
        return None;
    };

    let tolerance = svd.singular_values.max() * rows.max(width) as f64 * f64::EPSILON;
    let rank = svd.rank(tolerance);
    if rank < width {
        debug!(rows, width, rank, "design matrix is rank deficient");
        return None;
    }

    match svd.solve(&y, tolerance) {
        Ok(beta) => Some(Model::new(beta.iter().copied().collect())),
        Err(reason) => {
            debug!(reason, "SVD solve failed");
            None
        }
    }
}
