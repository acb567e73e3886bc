//! Output formatting.

use crate::cli::OutputFormat;
use serde::Serialize;
use std::fmt::Display;
use std::time::Duration;
use tsc_runner::{parse_tsc_output, DiagnosticSeverity, TscDiagnostic, TscRunOutput};

/// JSON shape of one run.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    /// tsc exit code, `null` if it was killed.
    pub exit_code: Option<i32>,
    /// Captured stdout.
    pub stdout: &'a str,
    /// Captured stderr.
    pub stderr: &'a str,
    /// Diagnostics parsed from stdout.
    pub diagnostics: Vec<TscDiagnostic>,
}

/// Formats a tsc run for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a captured run.
    pub fn format(&self, output: &TscRunOutput) -> Result<String, serde_json::Error> {
        match self.format {
            OutputFormat::Raw => Ok(Self::format_raw(output)),
            OutputFormat::Json => Self::format_json(output),
            OutputFormat::Machine => Ok(Self::format_machine(output)),
        }
    }

    /// Formats the catch-all failure line.
    pub fn format_error(error: &dyn Display) -> String {
        format!("Error: {}\n", error)
    }

    /// Formats the elapsed-time line.
    pub fn format_timing(elapsed: Duration) -> String {
        format!("tsc finished in {:.2}s\n", elapsed.as_secs_f64())
    }

    /// The two labeled blocks, streams copied verbatim.
    fn format_raw(output: &TscRunOutput) -> String {
        format!(
            "STDOUT:\n{}\n\nSTDERR:\n{}\n",
            output.stdout, output.stderr
        )
    }

    fn format_json(output: &TscRunOutput) -> Result<String, serde_json::Error> {
        let report = JsonReport {
            exit_code: output.exit_code,
            stdout: &output.stdout,
            stderr: &output.stderr,
            diagnostics: parse_tsc_output(&output.stdout),
        };
        let mut json = serde_json::to_string_pretty(&report)?;
        json.push('\n');
        Ok(json)
    }

    fn format_machine(output: &TscRunOutput) -> String {
        let diagnostics = parse_tsc_output(&output.stdout);
        let mut out = String::new();
        let mut errors = 0;
        let mut warnings = 0;

        for diag in &diagnostics {
            match diag.severity {
                DiagnosticSeverity::Error => errors += 1,
                DiagnosticSeverity::Warning => warnings += 1,
                DiagnosticSeverity::Message => {}
            }

            let file = diag.file.as_ref().map(|f| f.as_str()).unwrap_or("");
            // Machine lines stay single-line.
            let message = diag.message.replace('\n', " ");
            out.push_str(&format!(
                "{} {:?} {}:{} {:?} {:?}\n",
                diag.severity.as_str(),
                file,
                diag.line,
                diag.column,
                diag.code,
                message
            ));
        }

        out.push_str(&format!(
            "COMPLETED {} ERRORS {} WARNINGS\n",
            errors, warnings
        ));
        out
    }
}
