//! JSON output format for fit reports

use crate::fit::GroupFit;
use crate::report::FitReport;
use anyhow::{Context, Result};
use serde::Serialize;

/// One explanatory term of a fitted group
#[derive(Debug, Clone, Serialize)]
pub struct JsonTerm {
    /// Term source as written on the command line
    pub term: String,
    pub coefficient: f64,
    /// 95% half-width; absent when intervals are unavailable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub half_width: Option<f64>,
}

/// Fit result for a single group
#[derive(Debug, Clone, Serialize)]
pub struct JsonGroupFit {
    pub group: String,
    pub response: String,
    pub rows: usize,
    /// Empty when no model could be estimated
    pub terms: Vec<JsonTerm>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r_squared: Option<f64>,
    /// Why the intervals are missing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats_error: Option<String>,
}

/// JSON output formatter
#[derive(Debug)]
pub struct JsonOutput {
    groups: Vec<JsonGroupFit>,
}

impl JsonOutput {
    pub fn new(report: &FitReport) -> Self {
        let groups = report
            .groups
            .iter()
            .map(|(group, fit)| Self::convert(report, group, fit))
            .collect();
        Self { groups }
    }

    fn convert(report: &FitReport, group: &str, fit: &GroupFit) -> JsonGroupFit {
        let mut json = JsonGroupFit {
            group: group.to_string(),
            response: report.response.clone(),
            rows: fit.rows(),
            terms: Vec::new(),
            r_squared: None,
            stats_error: fit.stats_error().map(ToString::to_string),
        };

        if let GroupFit::Fitted {
            model,
            r_squared,
            half_widths,
            ..
        } = fit
        {
            json.r_squared = Some(*r_squared);
            json.terms = report
                .terms
                .iter()
                .zip(model.coefficients())
                .enumerate()
                .map(|(i, (term, &coefficient))| JsonTerm {
                    term: term.clone(),
                    coefficient,
                    half_width: half_widths.as_ref().ok().and_then(|h| h.get(i).copied()),
                })
                .collect();
        }
        json
    }

    pub fn groups(&self) -> &[JsonGroupFit] {
        &self.groups
    }

    /// Pretty-printed JSON array, one object per group
    pub fn to_json(&self) -> Result<String> {
        let mut json =
            serde_json::to_string_pretty(&self.groups).context("failed to serialize fit report")?;
        json.push('\n');
        Ok(json)
    }
}
