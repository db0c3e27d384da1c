//! depinspect - workspace dependency inspector CLI
//!
//! Reports outdated dependencies across npm, Composer, PyPI and Pub
//! manifests, and rewrites them with `--update`.

use clap::Parser;
use depinspect::cli::CliArgs;
use depinspect::config::Config;
use depinspect::error::{AppError, IoError};
use depinspect::logging;
use depinspect::orchestrator::Orchestrator;
use depinspect::output::{create_formatter, OutputConfig};
use std::io::{self, Write};
use std::process::ExitCode;
use tracing::debug;

/// Exit code when the run finished but some manifests or lookups failed
const EXIT_PARTIAL: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    logging::init(args.verbose, args.quiet);

    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    if !args.path.exists() {
        return Err(AppError::from(IoError::directory_not_found(&args.path)).into());
    }

    let config = Config::resolve(&args).map_err(AppError::from)?;
    debug!(
        version = env!("CARGO_PKG_VERSION"),
        root = %config.root.display(),
        apply = config.apply,
        dry_run = config.dry_run,
        offline = config.offline,
        "starting"
    );

    let output_config = OutputConfig::from_cli(&args);
    let show_progress = output_config.shows_progress();

    let orchestrator = Orchestrator::new(config)?;
    let result = orchestrator.run_with_progress(show_progress).await;

    let formatter = create_formatter(output_config);
    let mut stdout = io::stdout().lock();
    formatter.format(&result, &mut stdout)?;
    stdout.flush()?;

    if result.has_errors() {
        Ok(ExitCode::from(EXIT_PARTIAL))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
