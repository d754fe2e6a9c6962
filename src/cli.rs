//! CLI argument parsing for benchls

use crate::config::{FitConfig, ResponseMetric};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Output format for the fit report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Aligned text table (default)
    #[default]
    Text,
    /// HTML table
    Html,
    /// CSV with one coefficient and half-width column per term
    Csv,
    /// JSON array of group results
    Json,
}

const EXAMPLE: &str = "\
Example:
   benchls --vars='(?P<M>\\d+)x(?P<N>\\d+)-\\d+$' \\
           --xt='math.Log(M), math.Log(N), 1.0' --yt='math.Log(Y)' bench.txt";

#[derive(Parser, Debug)]
#[command(name = "benchls")]
#[command(version)]
#[command(about = "Least squares fit on groups of parameterized benchmarks", long_about = None)]
#[command(after_help = EXAMPLE)]
pub struct Cli {
    /// Output of `go test -bench` ("-" or omitted reads stdin)
    #[arg(value_name = "BENCH_TXT")]
    pub input: Option<PathBuf>,

    /// Where to find named input variables in the benchmark names
    /// [default: /?(?P<N>\d+)-\d+$]
    #[arg(long, value_name = "REGEX")]
    pub vars: Option<String>,

    /// How to construct the explanatory variables from the input variables,
    /// separated by commas [default: "N, 1.0"]
    #[arg(long = "xtransform", visible_alias = "xt", value_name = "EXPRS")]
    pub xtransform: Option<String>,

    /// How to transform the response variable [default: Y]
    #[arg(long = "ytransform", visible_alias = "yt", value_name = "EXPR")]
    pub ytransform: Option<String>,

    /// Benchmark field to use as the response variable [default: NsPerOp]
    #[arg(long, value_enum, value_name = "FIELD")]
    pub response: Option<ResponseMetric>,

    /// Report format [default: text]
    #[arg(long, value_enum, conflicts_with = "html")]
    pub format: Option<OutputFormat>,

    /// Print results as an HTML table (same as --format html)
    #[arg(long)]
    pub html: bool,

    /// TOML file with defaults for the options above
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable debug logging (compiled programs, skipped runs)
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Input path, or `None` for stdin
    pub fn input_path(&self) -> Option<&PathBuf> {
        self.input.as_ref().filter(|p| p.as_os_str() != "-")
    }

    /// Config file values overridden by any flags given on the command line
    pub fn fit_config(&self) -> Result<FitConfig> {
        let mut config = FitConfig::load(self.config.as_deref())?;

        if let Some(vars) = &self.vars {
            config.vars = vars.clone();
        }
        if let Some(xtransform) = &self.xtransform {
            config.xtransform = xtransform.clone();
        }
        if let Some(ytransform) = &self.ytransform {
            config.ytransform = ytransform.clone();
        }
        if let Some(response) = self.response {
            config.response = response;
        }
        if let Some(format) = self.format {
            config.format = format;
        }
        if self.html {
            config.format = OutputFormat::Html;
        }

        config
            .validate()
            .map_err(anyhow::Error::msg)
            .context("invalid configuration")?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["benchls", "bench.txt"]);
        assert_eq!(cli.input, Some(PathBuf::from("bench.txt")));
        assert!(!cli.html);
        assert!(!cli.debug);

        let config = cli.fit_config().unwrap();
        assert_eq!(config, FitConfig::default());
    }

    #[test]
    fn test_cli_stdin() {
        let cli = Cli::parse_from(["benchls"]);
        assert!(cli.input_path().is_none());
        let cli = Cli::parse_from(["benchls", "-"]);
        assert!(cli.input_path().is_none());
    }

    #[test]
    fn test_cli_short_aliases() {
        let cli = Cli::parse_from([
            "benchls",
            "--xt",
            "math.Log(N) * N, 1.0",
            "--yt",
            "math.Log(Y)",
            "bench.txt",
        ]);
        let config = cli.fit_config().unwrap();
        assert_eq!(config.xtransform, "math.Log(N) * N, 1.0");
        assert_eq!(config.ytransform, "math.Log(Y)");
    }

    #[test]
    fn test_cli_response_and_format() {
        let cli = Cli::parse_from([
            "benchls",
            "--response",
            "AllocedBytesPerOp",
            "--format",
            "json",
            "bench.txt",
        ]);
        let config = cli.fit_config().unwrap();
        assert_eq!(config.response, ResponseMetric::AllocedBytesPerOp);
        assert_eq!(config.format, OutputFormat::Json);
    }

    #[test]
    fn test_cli_html_flag() {
        let cli = Cli::parse_from(["benchls", "--html", "bench.txt"]);
        assert_eq!(cli.fit_config().unwrap().format, OutputFormat::Html);
    }

    #[test]
    fn test_cli_html_conflicts_with_format() {
        let result = Cli::try_parse_from(["benchls", "--html", "--format", "csv", "bench.txt"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_rejects_unknown_response() {
        let result = Cli::try_parse_from(["benchls", "--response", "Seconds", "bench.txt"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_rejects_extra_inputs() {
        let result = Cli::try_parse_from(["benchls", "a.txt", "b.txt"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_overrides_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "xtransform = \"N*N, N, 1.0\"").unwrap();
        writeln!(file, "response = \"MBPerS\"").unwrap();

        let path = file.path().to_str().unwrap();
        let cli = Cli::parse_from(["benchls", "--config", path, "--response", "NsPerOp"]);
        let config = cli.fit_config().unwrap();
        assert_eq!(config.xtransform, "N*N, N, 1.0");
        assert_eq!(config.response, ResponseMetric::NsPerOp);
    }

    #[test]
    fn test_cli_invalid_vars() {
        let cli = Cli::parse_from(["benchls", "--vars", "(?P<N>", "bench.txt"]);
        assert!(cli.fit_config().is_err());
    }
}
