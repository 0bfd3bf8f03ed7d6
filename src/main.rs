use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use revenue_predictor::cli::Cli;

// Entry point
// 1. Resolve config (file, env, flags)
// 2. Load the pipeline; stop here if it is missing
// 3. Predict once, run the form, or evaluate against the CSV

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("revenue_predictor=info".parse()?))
        .init();

    let cli = Cli::parse();

    cli.run().context("revenue-predictor failed")?;

    Ok(())
}
