//! Parsing of `go test -bench` output
//!
//! A benchmark line looks like:
//!
//! ```text
//! BenchmarkSort1000-4    10000    180906 ns/op    8224 B/op    2 allocs/op
//! ```
//!
//! The name must start with `Benchmark`, the second field is the iteration
//! count, and the rest are `value unit` pairs. Only the four units below are
//! understood; anything else is ignored so newer `go test` output still
//! parses. Lines that are not benchmarks (`PASS`, `ok ...`, logs) are skipped.

use serde::Serialize;
use std::collections::BTreeMap;
use std::io::BufRead;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BenchParseError {
    #[error("not a benchmark line")]
    NotBenchmark,

    #[error("invalid iteration count {0:?}")]
    InvalidIterations(String),

    #[error("failed to read benchmark input: {0}")]
    Io(#[from] std::io::Error),
}

/// One benchmark run
///
/// Metrics are `None` when the line did not report them, which is distinct
/// from a measured zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Benchmark {
    pub name: String,
    pub iterations: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ns_per_op: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mb_per_s: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alloced_bytes_per_op: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allocs_per_op: Option<u64>,
}

/// Parse a single line of benchmark output
pub fn parse_line(line: &str) -> Result<Benchmark, BenchParseError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 2 || !fields[0].starts_with("Benchmark") {
        return Err(BenchParseError::NotBenchmark);
    }

    let iterations = fields[1]
        .parse::<u64>()
        .map_err(|_| BenchParseError::InvalidIterations(fields[1].to_string()))?;

    let mut bench = Benchmark {
        name: fields[0].to_string(),
        iterations,
        ..Benchmark::default()
    };

    for pair in fields[2..].chunks_exact(2) {
        let (quantity, unit) = (pair[0], pair[1]);
        match unit {
            "ns/op" => bench.ns_per_op = quantity.parse().ok().or(bench.ns_per_op),
            "MB/s" => bench.mb_per_s = quantity.parse().ok().or(bench.mb_per_s),
            "B/op" => {
                bench.alloced_bytes_per_op = quantity.parse().ok().or(bench.alloced_bytes_per_op)
            }
            "allocs/op" => bench.allocs_per_op = quantity.parse().ok().or(bench.allocs_per_op),
            _ => {}
        }
    }

    Ok(bench)
}

/// All runs in an input, keyed by benchmark name
///
/// Runs of the same name keep their input order; names iterate sorted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct BenchSet {
    runs: BTreeMap<String, Vec<Benchmark>>,
}

impl BenchSet {
    pub fn insert(&mut self, bench: Benchmark) {
        self.runs.entry(bench.name.clone()).or_default().push(bench);
    }

    pub fn get(&self, name: &str) -> Option<&[Benchmark]> {
        self.runs.get(name).map(Vec::as_slice)
    }

    /// Number of distinct benchmark names
    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Total runs across all names
    pub fn run_count(&self) -> usize {
        self.runs.values().map(Vec::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Benchmark])> {
        self.runs
            .iter()
            .map(|(name, runs)| (name.as_str(), runs.as_slice()))
    }
}

/// Parse every benchmark line from `reader`
pub fn parse_set<R: BufRead>(reader: R) -> Result<BenchSet, BenchParseError> {
    let mut set = BenchSet::default();
    for line in reader.lines() {
        match parse_line(&line?) {
            Ok(bench) => set.insert(bench),
            Err(BenchParseError::Io(e)) => return Err(BenchParseError::Io(e)),
            Err(_) => continue,
        }
    }
    Ok(set)
}
