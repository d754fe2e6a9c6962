// Per-group fit outcome: estimation plus statistics, with failures kept apart
//
// Estimation failure and statistics failure degrade differently in the
// report, so they are separate variants rather than one error.

use super::{estimate, r_squared, stats, Model, Sample, StatsError};

/// Result of fitting one group
#[derive(Debug, Clone, PartialEq)]
pub enum GroupFit {
    /// The solver produced no coefficients
    NoModel {
        /// Observations in the sample
        rows: usize,
    },

    /// Coefficients exist; intervals may still be unavailable
    Fitted {
        model: Model,
        r_squared: f64,
        /// Per-coefficient 95% half-widths, or why they are undefined
        half_widths: Result<Vec<f64>, StatsError>,
        rows: usize,
    },
}

impl GroupFit {
    pub fn model(&self) -> Option<&Model> {
        match self {
            GroupFit::NoModel { .. } => None,
            GroupFit::Fitted { model, .. } => Some(model),
        }
    }

    pub fn rows(&self) -> usize {
        match self {
            GroupFit::NoModel { rows } | GroupFit::Fitted { rows, .. } => *rows,
        }
    }

    /// Why confidence intervals are missing, if a model exists without them
    pub fn stats_error(&self) -> Option<&StatsError> {
        match self {
            GroupFit::Fitted {
                half_widths: Err(e),
                ..
            } => Some(e),
            _ => None,
        }
    }
}

/// Estimate coefficients for `sample` and compute their statistics
///
/// R^2 is reported whenever a model exists, even if the intervals are not.
pub fn fit_group(sample: &Sample) -> GroupFit {
    let rows = sample.rows();
    let Some(model) = estimate(sample) else {
        return GroupFit::NoModel { rows };
    };

    match stats(&model, sample) {
        Ok(fit) => GroupFit::Fitted {
            model,
            r_squared: fit.r_squared,
            half_widths: Ok(fit.half_widths),
            rows,
        },
        Err(e) => GroupFit::Fitted {
            r_squared: r_squared(&model, sample),
            model,
            half_widths: Err(e),
            rows,
        },
    }
}
