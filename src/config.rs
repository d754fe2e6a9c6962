//! Fit configuration
//!
//! Settings come from three layers: built-in defaults, an optional TOML file
//! and command-line flags (applied in `cli`). This module owns the first two.
//!
//! ```toml
//! vars = '(?P<M>\d+)x(?P<N>\d+)-\d+$'
//! xtransform = "math.Log(M), math.Log(N), 1.0"
//! ytransform = "math.Log(Y)"
//! response = "NsPerOp"
//! format = "text"
//! ```

use crate::bench_parse::Benchmark;
use crate::cli::OutputFormat;
use anyhow::{Context, Result};
use clap::ValueEnum;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

pub const DEFAULT_VARS: &str = r"/?(?P<N>\d+)-\d+$";
pub const DEFAULT_XTRANSFORM: &str = "N, 1.0";
pub const DEFAULT_YTRANSFORM: &str = "Y";

/// Benchmark measurement used as the response variable `Y`
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize,
)]
#[value(rename_all = "verbatim")]
pub enum ResponseMetric {
    /// Nanoseconds per operation
    #[default]
    NsPerOp,
    /// Bytes allocated per operation
    AllocedBytesPerOp,
    /// Allocations per operation
    AllocsPerOp,
    /// Throughput in MB/s
    MBPerS,
}

impl ResponseMetric {
    pub fn name(self) -> &'static str {
        match self {
            ResponseMetric::NsPerOp => "NsPerOp",
            ResponseMetric::AllocedBytesPerOp => "AllocedBytesPerOp",
            ResponseMetric::AllocsPerOp => "AllocsPerOp",
            ResponseMetric::MBPerS => "MBPerS",
        }
    }

    /// The metric's value for one run, if the run measured it
    pub fn select(self, bench: &Benchmark) -> Option<f64> {
        match self {
            ResponseMetric::NsPerOp => bench.ns_per_op,
            ResponseMetric::AllocedBytesPerOp => bench.alloced_bytes_per_op.map(|b| b as f64),
            ResponseMetric::AllocsPerOp => bench.allocs_per_op.map(|a| a as f64),
            ResponseMetric::MBPerS => bench.mb_per_s,
        }
    }
}

impl fmt::Display for ResponseMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything needed to turn a benchmark file into a report
///
/// # Example
/// ```
/// use benchls::config::{FitConfig, ResponseMetric};
///
/// let config = FitConfig::from_toml_str(r#"xtransform = "math.Log(N) * N, 1.0""#).unwrap();
/// assert_eq!(config.xtransform, "math.Log(N) * N, 1.0");
/// assert_eq!(config.response, ResponseMetric::NsPerOp);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FitConfig {
    /// Pattern whose named captures become formula variables
    pub vars: String,

    /// Comma separated explanatory terms
    pub xtransform: String,

    /// Response transform over `Y` and the captured variables
    pub ytransform: String,

    pub response: ResponseMetric,

    pub format: OutputFormat,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            vars: DEFAULT_VARS.to_string(),
            xtransform: DEFAULT_XTRANSFORM.to_string(),
            ytransform: DEFAULT_YTRANSFORM.to_string(),
            response: ResponseMetric::default(),
            format: OutputFormat::default(),
        }
    }
}

impl FitConfig {
    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid benchls configuration")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Defaults, or the contents of `path` when given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Compiled form of `vars`
    pub fn pattern(&self) -> Result<Regex, regex::Error> {
        Regex::new(&self.vars)
    }

    /// Check the settings that can be checked without compiling formulas
    pub fn validate(&self) -> Result<(), String> {
        if let Err(e) = self.pattern() {
            return Err(format!("vars is not a valid regular expression: {}", e));
        }

        if self.xtransform.trim().is_empty() {
            return Err("xtransform must name at least one explanatory term".to_string());
        }

        if self.ytransform.trim().is_empty() {
            return Err("ytransform must not be empty".to_string());
        }

        Ok(())
    }
}
