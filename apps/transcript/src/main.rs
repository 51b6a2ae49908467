//! `transcript` binary entry point.

use clap::Parser;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use transcript::cli::{self, Cli};
use transcript::config::{AppConfig, LoggingConfig};
use transcript::error::CliError;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("transcript error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let config = AppConfig::load(cli.config.as_deref())?;
    init_tracing(&config.logging, cli.quiet, cli.verbose)?;
    match &config.source {
        Some(path) => debug!(path = %path.display(), "loaded configuration"),
        None => debug!("using default configuration"),
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    cli::run(cli, &config, &mut out)
}

/// Install the global subscriber. `RUST_LOG` wins over flags and config.
fn init_tracing(logging: &LoggingConfig, quiet: bool, verbose: bool) -> Result<(), CliError> {
    let level = if quiet {
        "error"
    } else if verbose {
        "info"
    } else {
        logging.level.as_str()
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    let result = if logging.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.map_err(|error| CliError::Logging(error.to_string()))
}
