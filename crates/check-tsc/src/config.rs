//! Configuration resolution.

use crate::cli::{Args, OutputFormat};
use camino::{Utf8Path, Utf8PathBuf};
use tsc_runner::{Launcher, TscCommand, TscError, TscRunner};

/// Settings for one check, resolved from flags and environment.
#[derive(Debug, Clone)]
pub struct CheckConfig {
    /// Absolute project directory.
    pub workspace: Utf8PathBuf,
    /// Optional tsconfig override.
    pub tsconfig: Option<Utf8PathBuf>,
    /// How tsc is located when no explicit path is given.
    pub launcher: Launcher,
    /// Explicit tsc executable, absolute unless it is a bare PATH name.
    pub tsc_path: Option<Utf8PathBuf>,
    /// Output format.
    pub output: OutputFormat,
    /// Whether to report elapsed time.
    pub timings: bool,
    /// Pass-through tsc arguments.
    pub tsc_args: Vec<String>,
}

impl CheckConfig {
    /// Resolves the configuration for a parsed command line.
    pub fn from_args(args: &Args) -> Self {
        let workspace = absolutize(&args.workspace);

        // tsc runs with the workspace as its cwd, so a relative path must be
        // pinned to our cwd first. A bare name is left for PATH lookup.
        let tsc_path = args.tsc_path.as_deref().map(|path| {
            let command = TscCommand::from_path(path);
            let program = command.program();
            if program.components().count() > 1 {
                absolutize(program)
            } else {
                program.to_owned()
            }
        });

        let timings = args.timings || read_env_bool("CHECK_TSC_TIMINGS").unwrap_or(false);

        Self {
            workspace,
            tsconfig: args.tsconfig.clone(),
            launcher: args.launcher.into(),
            tsc_path,
            output: args.output,
            timings,
            tsc_args: args.tsc_args.clone(),
        }
    }

    /// Resolves the launcher and builds the runner.
    pub fn build_runner(&self) -> Result<TscRunner, TscError> {
        let command = match &self.tsc_path {
            Some(path) => TscCommand::new(path.clone(), Vec::new()),
            None => TscCommand::resolve(self.launcher, &self.workspace)?,
        };

        Ok(
            TscRunner::new(command, self.workspace.clone(), self.tsconfig.clone())
                .with_extra_args(self.tsc_args.clone()),
        )
    }
}

fn absolutize(path: &Utf8Path) -> Utf8PathBuf {
    if path.is_absolute() {
        return path.to_owned();
    }
    std::env::current_dir()
        .ok()
        .and_then(|p| Utf8PathBuf::try_from(p).ok())
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|| path.to_owned())
}

pub(crate) fn read_env_bool(name: &str) -> Option<bool> {
    let value = std::env::var(name).ok()?;
    parse_bool(&value)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
