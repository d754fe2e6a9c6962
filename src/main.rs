use anyhow::{Context, Result};
use benchls::{cli::Cli, pipeline::Transforms};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufReader, Write};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber on stderr
///
/// Warnings (skipped benchmarks, groups without a model) are shown by
/// default; `--debug` turns on everything and `RUST_LOG` refines either.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracing(args.debug);

    let config = args.fit_config()?;

    // Formulas first: a bad formula is reported before the input is touched
    let transforms = Transforms::compile(&config)?;

    let report = match args.input_path() {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            transforms.fit(BufReader::new(file), config.response)?
        }
        None => transforms.fit(io::stdin().lock(), config.response)?,
    };

    let rendered = report.render(config.format)?;
    let mut stdout = io::stdout().lock();
    stdout
        .write_all(rendered.as_bytes())
        .context("failed to write report")?;
    stdout.flush().context("failed to write report")?;

    Ok(())
}
