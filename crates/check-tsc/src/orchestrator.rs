//! Main orchestration logic.

use crate::config::CheckConfig;
use crate::output::Formatter;
use std::time::Duration;
use thiserror::Error;
use tsc_runner::TscError;
use tracing::{debug, info};

/// Orchestration errors.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// tsc could not be started.
    #[error(transparent)]
    Tsc(#[from] TscError),

    /// The captured run could not be rendered.
    #[error("failed to format output: {0}")]
    FormatFailed(#[from] serde_json::Error),
}

/// What one check produced for the user.
#[derive(Debug)]
pub struct CheckReport {
    /// Formatted stdout text.
    pub text: String,
    /// tsc's own exit code; reported, never propagated.
    pub exit_code: Option<i32>,
    /// Time spent waiting on tsc.
    pub elapsed: Duration,
}

/// Runs one check and formats the captured output.
pub async fn run(config: &CheckConfig) -> Result<CheckReport, OrchestratorError> {
    let runner = config.build_runner()?;
    debug!(workspace = %config.workspace, output = ?config.output, "running check");

    let output = runner.run().await?;
    if !output.success() {
        info!(exit_code = ?output.exit_code, "tsc reported a non-zero exit");
    }

    let text = Formatter::new(config.output).format(&output)?;
    Ok(CheckReport {
        text,
        exit_code: output.exit_code,
        elapsed: output.elapsed,
    })
}

/// Reports the tsc version behind the configured launcher.
pub async fn version(config: &CheckConfig) -> Result<String, OrchestratorError> {
    let runner = config.build_runner()?;
    let version = runner.version().await?;
    Ok(format!(
        "tsc {}\npath: {}\n",
        version,
        runner.command().program()
    ))
}
