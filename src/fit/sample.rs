// Per-group samples and the aggregator that fills them
//
// A Sample stores the design matrix row-major in one flat buffer next to
// the response vector. The Aggregator is the only writer: it evaluates the
// explanatory programs and the response program for one observation and
// appends the row only if every program evaluated.

use super::SampleError;
use crate::expr::{Binding, EvalFault, Program};
use std::collections::BTreeMap;

/// Explanatory rows and responses for one group
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sample {
    width: usize,
    x: Vec<f64>,
    y: Vec<f64>,
}

impl Sample {
    /// Empty sample with `width` explanatory columns
    pub fn new(width: usize) -> Self {
        Self {
            width,
            x: Vec::new(),
            y: Vec::new(),
        }
    }

    /// Sample over existing buffers; `x` is row-major with `y.len()` rows
    pub fn from_parts(width: usize, x: Vec<f64>, y: Vec<f64>) -> Result<Self, SampleError> {
        if x.len() != y.len() * width {
            return Err(SampleError::ShapeMismatch {
                values: x.len(),
                rows: y.len(),
                width,
            });
        }
        Ok(Self { width, x, y })
    }

    /// Append one observation
    pub fn push_row(&mut self, explanatory: &[f64], response: f64) -> Result<(), SampleError> {
        if explanatory.len() != self.width {
            return Err(SampleError::WidthMismatch {
                expected: self.width,
                found: explanatory.len(),
            });
        }
        self.x.extend_from_slice(explanatory);
        self.y.push(response);
        Ok(())
    }

    /// Number of explanatory columns
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of observations
    pub fn rows(&self) -> usize {
        self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    /// Row-major explanatory buffer of length `rows * width`
    pub fn explanatory(&self) -> &[f64] {
        &self.x
    }

    pub fn response(&self) -> &[f64] {
        &self.y
    }

    /// Iterate over `(explanatory row, response)` pairs
    pub fn iter_rows(&self) -> impl Iterator<Item = (&[f64], f64)> {
        let width = self.width;
        self.y
            .iter()
            .enumerate()
            .map(move |(i, &y)| (&self.x[i * width..(i + 1) * width], y))
    }
}

/// Accumulates observations into per-group samples
#[derive(Debug)]
pub struct Aggregator<'p> {
    explanatory: &'p [Program],
    response: &'p Program,
    groups: BTreeMap<String, Sample>,
    row: Vec<f64>,
}

impl<'p> Aggregator<'p> {
    pub fn new(explanatory: &'p [Program], response: &'p Program) -> Self {
        Self {
            explanatory,
            response,
            groups: BTreeMap::new(),
            row: Vec::with_capacity(explanatory.len()),
        }
    }

    /// Evaluate one observation and append it to `group`
    ///
    /// `binding` must hold every captured variable plus the response value
    /// under [`RESPONSE_VAR`](crate::expr::RESPONSE_VAR). Coverage is checked
    /// once up front; on any fault nothing is appended.
    pub fn record(&mut self, group: &str, binding: &Binding) -> Result<(), EvalFault> {
        for program in self.explanatory.iter().chain(std::iter::once(self.response)) {
            binding.covers(program)?;
        }

        self.row.clear();
        for program in self.explanatory {
            self.row.push(program.evaluate(binding)?);
        }
        let response = self.response.evaluate(binding)?;

        let width = self.explanatory.len();
        let sample = self
            .groups
            .entry(group.to_string())
            .or_insert_with(|| Sample::new(width));
        sample.x.extend_from_slice(&self.row);
        sample.y.push(response);
        Ok(())
    }

    /// Number of groups with at least one observation
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Samples keyed by group, in sorted group order
    pub fn finish(self) -> BTreeMap<String, Sample> {
        self.groups
    }
}
