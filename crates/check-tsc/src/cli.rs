//! CLI argument parsing.

use camino::Utf8PathBuf;
use clap::{Parser, ValueEnum};
use tsc_runner::Launcher;

/// Run tsc in check-only mode and print its output.
#[derive(Debug, Parser)]
#[command(name = "check-tsc")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Project directory tsc runs in
    #[arg(long, default_value = ".")]
    pub workspace: Utf8PathBuf,

    /// Path to tsconfig.json (passed as --project)
    #[arg(long)]
    pub tsconfig: Option<Utf8PathBuf>,

    /// How to launch tsc
    #[arg(long, value_enum, default_value = "npx")]
    pub launcher: LauncherArg,

    /// Run this tsc executable directly instead of the launcher
    #[arg(long = "tsc-path")]
    pub tsc_path: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "raw")]
    pub output: OutputFormat,

    /// Print how long tsc took
    #[arg(long)]
    pub timings: bool,

    /// Show tsc version and launcher path
    #[arg(long = "tsc-version")]
    pub tsc_version: bool,

    /// Extra arguments passed to tsc after the check flags
    #[arg(last = true)]
    pub tsc_args: Vec<String>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Labeled STDOUT/STDERR blocks (default)
    #[default]
    Raw,
    /// JSON object with captured streams and parsed diagnostics
    Json,
    /// Machine-readable (one line per diagnostic)
    Machine,
}

/// Launcher options.
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum LauncherArg {
    /// `npx tsc` (default)
    #[default]
    Npx,
    /// `node_modules/.bin/tsc` in the workspace
    Local,
}

impl From<LauncherArg> for Launcher {
    fn from(arg: LauncherArg) -> Self {
        match arg {
            LauncherArg::Npx => Launcher::Npx,
            LauncherArg::Local => Launcher::Local,
        }
    }
}
