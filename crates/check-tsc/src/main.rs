//! check-tsc: run tsc in check-only mode and print what it reports.

mod cli;
mod config;
mod logging;
mod orchestrator;
mod output;

use clap::Parser;
use cli::Args;
use config::CheckConfig;
use miette::{IntoDiagnostic, Result};
use output::Formatter;
use std::io::Write;
use tracing::debug;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init();

    let config = CheckConfig::from_args(&args);
    let mut stdout = std::io::stdout().lock();

    // Handle tsc version command
    if args.tsc_version {
        let text = match orchestrator::version(&config).await {
            Ok(text) => text,
            Err(e) => Formatter::format_error(&e),
        };
        stdout.write_all(text.as_bytes()).into_diagnostic()?;
        return Ok(());
    }

    // Any failure to start tsc ends up here. tsc's own exit code does not
    // change ours.
    match orchestrator::run(&config).await {
        Ok(report) => {
            debug!(exit_code = ?report.exit_code, "check finished");
            stdout.write_all(report.text.as_bytes()).into_diagnostic()?;
            if config.timings {
                eprint!("{}", Formatter::format_timing(report.elapsed));
            }
        }
        Err(e) => {
            stdout
                .write_all(Formatter::format_error(&e).as_bytes())
                .into_diagnostic()?;
        }
    }

    stdout.flush().into_diagnostic()?;
    Ok(())
}
