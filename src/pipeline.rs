//! Benchmark set to per-group fits
//!
//! The pattern's named captures become formula variables. Every benchmark
//! name the pattern matches contributes one observation per run to the group
//! named by whatever the match did not cover.

use crate::bench_parse::{parse_set, BenchSet};
use crate::config::{FitConfig, ResponseMetric};
use crate::expr::{compile, compile_list, Binding, Program, SymbolTable, RESPONSE_VAR};
use crate::fit::{fit_group, Aggregator, GroupFit, Sample};
use crate::report::FitReport;
use anyhow::{bail, Context, Result};
use regex::Regex;
use std::collections::BTreeMap;
use std::io::BufRead;
use tracing::{debug, error, warn};

/// Compiled pattern and formulas
#[derive(Debug, Clone)]
pub struct Transforms {
    pub pattern: Regex,
    pub symbols: SymbolTable,
    pub explanatory: Vec<Program>,
    pub response: Program,
}

impl Transforms {
    /// Compile `config`; any error here stops the run before input is read
    pub fn compile(config: &FitConfig) -> Result<Self> {
        let pattern = config
            .pattern()
            .with_context(|| format!("invalid vars pattern {:?}", config.vars))?;
        let symbols = SymbolTable::from_pattern(&pattern)
            .with_context(|| format!("invalid vars pattern {:?}", config.vars))?;

        let explanatory = compile_list(&config.xtransform, &symbols)
            .with_context(|| format!("invalid xtransform {:?}", config.xtransform))?;
        let response = compile(&config.ytransform, &symbols.with_response())
            .with_context(|| format!("invalid ytransform {:?}", config.ytransform))?;

        for program in &explanatory {
            debug!(source = program.source(), postfix = %program.postfix(), "explanatory term");
        }
        debug!(source = response.source(), postfix = %response.postfix(), "response");

        Ok(Self {
            pattern,
            symbols,
            explanatory,
            response,
        })
    }

    /// Read benchmarks from `input`, group them and fit every group
    pub fn fit<R: BufRead>(&self, input: R, metric: ResponseMetric) -> Result<FitReport> {
        let benches = parse_set(input).context("failed to parse benchmark input")?;
        debug!(names = benches.len(), runs = benches.run_count(), "parsed benchmarks");

        let samples = collect_samples(self, &benches, metric)?;
        let groups = fit_samples(&samples);
        Ok(FitReport::new(self.response.source(), self.terms(), groups))
    }

    /// Explanatory term sources in column order
    pub fn terms(&self) -> Vec<String> {
        self.explanatory
            .iter()
            .map(|p| p.source().to_string())
            .collect()
    }
}

/// How a benchmark name relates to the vars pattern
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    /// The pattern does not match
    Unmatched,

    /// A capture is missing or is not a number
    NonNumeric { variable: String, text: String },

    Matched { group: String, binding: Binding },
}

/// Group id and captured variables for one benchmark name
///
/// The group id is `name` with the matched text cut out, so
/// `BenchmarkSort1000-4` under `(?P<N>\d+)-\d+$` lands in `BenchmarkSort`
/// with `N = 1000`.
pub fn extract(pattern: &Regex, name: &str) -> Extraction {
    let Some(caps) = pattern.captures(name) else {
        return Extraction::Unmatched;
    };

    let mut binding = Binding::new();
    for variable in pattern.capture_names().flatten() {
        let text = caps.name(variable).map(|m| m.as_str()).unwrap_or_default();
        match text.parse::<f64>() {
            Ok(value) => {
                binding.insert(variable, value);
            }
            Err(_) => {
                return Extraction::NonNumeric {
                    variable: variable.to_string(),
                    text: text.to_string(),
                }
            }
        }
    }

    let whole = caps.get(0).map_or(0..0, |m| m.range());
    let group = format!("{}{}", &name[..whole.start], &name[whole.end..]);
    Extraction::Matched { group, binding }
}

/// Evaluate every matching run into per-group samples
///
/// Unmatched names are ignored, non-numeric captures and runs missing the
/// response metric are skipped with a log line. A malformed program aborts.
pub fn collect_samples(
    transforms: &Transforms,
    benches: &BenchSet,
    metric: ResponseMetric,
) -> Result<BTreeMap<String, Sample>> {
    let mut aggregator = Aggregator::new(&transforms.explanatory, &transforms.response);

    for (name, runs) in benches.iter() {
        let (group, binding) = match extract(&transforms.pattern, name) {
            Extraction::Unmatched => {
                debug!(name, "benchmark name does not match vars pattern");
                continue;
            }
            Extraction::NonNumeric { variable, text } => {
                warn!(name, %variable, %text, "non numeric capture, skipping");
                continue;
            }
            Extraction::Matched { group, binding } => (group, binding),
        };

        for run in runs {
            let Some(y) = metric.select(run) else {
                debug!(name, metric = %metric, "run did not measure response metric, skipping");
                continue;
            };

            let mut observation = binding.clone();
            observation.insert(RESPONSE_VAR, y);

            if let Err(fault) = aggregator.record(&group, &observation) {
                if !fault.is_recoverable() {
                    error!(name, %fault, "formula evaluation failed");
                    bail!(fault);
                }
                warn!(name, %fault, "skipping observation");
            }
        }
    }

    if aggregator.group_count() == 0 {
        warn!(pattern = %transforms.pattern, "no observations collected; check --vars and --response");
    }
    Ok(aggregator.finish())
}

/// Fit every group in sorted order
pub fn fit_samples(samples: &BTreeMap<String, Sample>) -> Vec<(String, GroupFit)> {
    samples
        .iter()
        .map(|(group, sample)| {
            let fit = fit_group(sample);
            match &fit {
                GroupFit::NoModel { rows } => {
                    warn!(%group, rows = *rows, width = sample.width(), "no model could be estimated");
                }
                GroupFit::Fitted {
                    half_widths: Err(e),
                    ..
                } => {
                    warn!(%group, reason = %e, "confidence intervals unavailable");
                }
                GroupFit::Fitted { .. } => debug!(%group, rows = sample.rows(), "fitted"),
            }
            (group.clone(), fit)
        })
        .collect()
}

/// Compile `config`, read benchmarks from `input` and fit every group
///
/// Formulas are compiled before any input is read, so a bad formula fails
/// without consuming stdin.
pub fn run<R: BufRead>(config: &FitConfig, input: R) -> Result<FitReport> {
    Transforms::compile(config)?.fit(input, config.response)
}
