//! Promise conformance runner
//!
//! Runs the conformance matrices against the reference runtime and
//! prints the report. Exits with status 1 when any case fails.

use clap::Parser;
use promise_conformance::{reference, HarnessError, OutputFormat, RunConfig};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "promise-conformance")]
#[command(
    about = "Context-preservation conformance matrices for patched promises",
    long_about = None
)]
#[command(version)]
struct Cli {
    /// JSON run configuration
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Report format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Keep alternate constructor slots but run none of their cases
    #[arg(long)]
    no_alternates: bool,

    /// Skip the "no handler" case of instance-method matrices
    #[arg(long)]
    no_undefined: bool,

    /// Print only totals, not each failure
    #[arg(short, long)]
    quiet: bool,

    /// Log every registered and executed case
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_config(cli: &Cli) -> Result<RunConfig, HarnessError> {
    let mut config = match &cli.config {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    };
    if cli.no_alternates {
        config = config.without_alternates();
    }
    if cli.no_undefined {
        config.no_undefined = true;
    }
    if let Some(format) = cli.format {
        config.format = format;
    }
    if cli.quiet {
        config.detailed = false;
    }
    Ok(config)
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };

    let report = reference::run_reference(&config);
    let output = match config.format {
        OutputFormat::Text if config.detailed => Ok(report.detailed_summary()),
        OutputFormat::Text => Ok(report.summary()),
        OutputFormat::Json => report.to_json().map_err(HarnessError::from),
    };
    match output {
        Ok(text) => println!("{}", text),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    }

    if !report.is_success() {
        std::process::exit(1);
    }
}
