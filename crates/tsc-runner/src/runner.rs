//! tsc process runner.

use camino::{Utf8Path, Utf8PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

/// Flags that put tsc in check-only mode with unformatted diagnostics.
pub const CHECK_ARGS: [&str; 3] = ["--noEmit", "--pretty", "false"];

#[cfg(windows)]
const LOCAL_TSC: &str = "node_modules/.bin/tsc.cmd";
#[cfg(not(windows))]
const LOCAL_TSC: &str = "node_modules/.bin/tsc";

/// Error types for tsc runner.
#[derive(Debug, Error)]
pub enum TscError {
    /// Failed to spawn the tsc process.
    #[error("failed to spawn tsc: {0}")]
    SpawnFailed(#[from] std::io::Error),

    /// tsc process exited with error.
    #[error("tsc exited with code {code}: {stderr}")]
    ProcessFailed { code: i32, stderr: String },

    /// Launcher executable not found.
    #[error("{0} not found")]
    NotFound(String),

    /// tsconfig not found.
    #[error("tsconfig not found at: {0}")]
    TsconfigNotFound(Utf8PathBuf),

    /// Working directory does not exist.
    #[error("working directory not found: {0}")]
    WorkspaceNotFound(Utf8PathBuf),
}

/// How the tsc executable is located.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Launcher {
    /// `npx tsc`, resolved from PATH.
    #[default]
    Npx,
    /// The project's own `node_modules/.bin/tsc`.
    Local,
}

/// The executable to spawn plus any arguments that precede the check flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TscCommand {
    program: Utf8PathBuf,
    prefix: Vec<String>,
}

impl TscCommand {
    /// Creates a command from an explicit program and leading arguments.
    pub fn new(program: impl Into<Utf8PathBuf>, prefix: Vec<String>) -> Self {
        Self {
            program: program.into(),
            prefix,
        }
    }

    /// Resolves the launcher against PATH or the project directory.
    pub fn resolve(launcher: Launcher, project_root: &Utf8Path) -> Result<Self, TscError> {
        match launcher {
            Launcher::Npx => {
                let npx = which::which("npx")
                    .ok()
                    .and_then(|p| Utf8PathBuf::try_from(p).ok())
                    .ok_or_else(|| TscError::NotFound("npx".into()))?;
                debug!(path = %npx, "resolved npx");
                Ok(Self::new(npx, vec!["tsc".to_string()]))
            }
            Launcher::Local => {
                let local = project_root.join(LOCAL_TSC);
                if !local.exists() {
                    return Err(TscError::NotFound(local.to_string()));
                }
                debug!(path = %local, "resolved local tsc");
                Ok(Self::new(local, Vec::new()))
            }
        }
    }

    /// Uses a user-supplied tsc binary, expanding a leading `~`.
    pub fn from_path(path: &str) -> Self {
        let expanded = shellexpand::tilde(path);
        Self::new(expanded.into_owned(), Vec::new())
    }

    /// The executable that will be spawned.
    pub fn program(&self) -> &Utf8Path {
        &self.program
    }

    /// Arguments placed before the check flags.
    pub fn prefix(&self) -> &[String] {
        &self.prefix
    }
}

/// Captured result of one tsc invocation.
#[derive(Debug, Clone, Default)]
pub struct TscRunOutput {
    /// Exit code, `None` if the process was killed by a signal.
    pub exit_code: Option<i32>,
    /// Decoded standard output.
    pub stdout: String,
    /// Decoded standard error.
    pub stderr: String,
    /// Wall time from spawn to exit.
    pub elapsed: Duration,
}

impl TscRunOutput {
    /// Whether tsc reported a clean check.
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// The tsc runner.
pub struct TscRunner {
    /// What to spawn.
    command: TscCommand,
    /// Project root directory, used as the working directory.
    project_root: Utf8PathBuf,
    /// Optional tsconfig path override.
    tsconfig_path: Option<Utf8PathBuf>,
    /// Arguments appended after the check flags.
    extra_args: Vec<String>,
}

impl TscRunner {
    /// Creates a new tsc runner.
    pub fn new(
        command: TscCommand,
        project_root: Utf8PathBuf,
        tsconfig_path: Option<Utf8PathBuf>,
    ) -> Self {
        Self {
            command,
            project_root,
            tsconfig_path,
            extra_args: Vec::new(),
        }
    }

    /// Appends pass-through arguments to every check invocation.
    pub fn with_extra_args(mut self, extra_args: Vec<String>) -> Self {
        self.extra_args = extra_args;
        self
    }

    pub fn command(&self) -> &TscCommand {
        &self.command
    }

    pub fn project_root(&self) -> &Utf8Path {
        &self.project_root
    }

    /// Resolve the tsconfig override, if any, against the project root.
    fn resolve_tsconfig_path(&self) -> Result<Option<Utf8PathBuf>, TscError> {
        let Some(path) = &self.tsconfig_path else {
            return Ok(None);
        };

        let candidate = if path.is_relative() {
            self.project_root.join(path)
        } else {
            path.clone()
        };

        if candidate.exists() {
            Ok(Some(candidate))
        } else {
            Err(TscError::TsconfigNotFound(candidate))
        }
    }

    /// Builds the full argument vector for a check run.
    pub fn check_args(&self) -> Result<Vec<String>, TscError> {
        let mut args = self.command.prefix.clone();
        args.extend(CHECK_ARGS.iter().map(|s| s.to_string()));
        if let Some(tsconfig) = self.resolve_tsconfig_path()? {
            args.push("--project".to_string());
            args.push(tsconfig.into_string());
        }
        args.extend(self.extra_args.iter().cloned());
        Ok(args)
    }

    fn ensure_project_root(&self) -> Result<(), TscError> {
        if self.project_root.is_dir() {
            Ok(())
        } else {
            Err(TscError::WorkspaceNotFound(self.project_root.clone()))
        }
    }

    /// Runs the check and waits for tsc to exit.
    ///
    /// A non-zero exit is not an error here: type errors are part of the
    /// captured output. Only failing to start the process is.
    pub async fn run(&self) -> Result<TscRunOutput, TscError> {
        self.ensure_project_root()?;
        let args = self.check_args()?;

        debug!(program = %self.command.program, ?args, cwd = %self.project_root, "spawning tsc");
        let start = Instant::now();
        let output = Command::new(&self.command.program)
            .args(&args)
            .current_dir(&self.project_root)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;
        let elapsed = start.elapsed();

        let result = TscRunOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            elapsed,
        };
        debug!(
            exit_code = ?result.exit_code,
            stdout_bytes = result.stdout.len(),
            stderr_bytes = result.stderr.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "tsc exited"
        );

        Ok(result)
    }

    /// Gets the version reported by the resolved tsc.
    pub async fn version(&self) -> Result<String, TscError> {
        self.ensure_project_root()?;

        let output = Command::new(&self.command.program)
            .args(&self.command.prefix)
            .arg("--version")
            .current_dir(&self.project_root)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TscError::ProcessFailed {
                code: output.status.code().unwrap_or(-1),
                stderr: stderr.to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let version = stdout.trim();
        Ok(version
            .strip_prefix("Version ")
            .unwrap_or(version)
            .to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn temp_root() -> (tempfile::TempDir, Utf8PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::try_from(dir.path().to_path_buf()).unwrap();
        (dir, root)
    }

    #[cfg(unix)]
    fn shell(script: &str) -> TscCommand {
        TscCommand::new(
            "sh",
            vec!["-c".to_string(), script.to_string(), "tsc".to_string()],
        )
    }

    #[test]
    fn test_check_args_default() {
        let runner = TscRunner::new(
            TscCommand::new("npx", vec!["tsc".to_string()]),
            Utf8PathBuf::from("."),
            None,
        );
        assert_eq!(
            runner.check_args().unwrap(),
            vec!["tsc", "--noEmit", "--pretty", "false"]
        );
    }

    #[test]
    fn test_check_args_with_tsconfig_and_extra() {
        let (_dir, root) = temp_root();
        std::fs::write(root.join("tsconfig.app.json"), "{}").unwrap();

        let runner = TscRunner::new(
            TscCommand::new("tsc", Vec::new()),
            root.clone(),
            Some(Utf8PathBuf::from("tsconfig.app.json")),
        )
        .with_extra_args(vec!["--strict".to_string()]);

        let expected_project = root.join("tsconfig.app.json").into_string();
        assert_eq!(
            runner.check_args().unwrap(),
            vec![
                "--noEmit",
                "--pretty",
                "false",
                "--project",
                expected_project.as_str(),
                "--strict"
            ]
        );
    }

    #[test]
    fn test_missing_tsconfig() {
        let (_dir, root) = temp_root();
        let runner = TscRunner::new(
            TscCommand::new("tsc", Vec::new()),
            root.clone(),
            Some(Utf8PathBuf::from("missing.json")),
        );
        let err = runner.check_args().unwrap_err();
        assert!(matches!(err, TscError::TsconfigNotFound(p) if p == root.join("missing.json")));
    }

    #[test]
    fn test_local_launcher_missing() {
        let (_dir, root) = temp_root();
        let err = TscCommand::resolve(Launcher::Local, &root).unwrap_err();
        assert!(matches!(err, TscError::NotFound(_)));
    }

    #[test]
    fn test_local_launcher_found() {
        let (_dir, root) = temp_root();
        let bin = root.join(LOCAL_TSC);
        std::fs::create_dir_all(bin.parent().unwrap()).unwrap();
        std::fs::write(&bin, "").unwrap();

        let command = TscCommand::resolve(Launcher::Local, &root).unwrap();
        assert_eq!(command.program(), bin.as_path());
        assert!(command.prefix().is_empty());
    }

    #[test]
    fn test_from_path_expands_tilde() {
        let command = TscCommand::from_path("~/bin/tsc");
        assert!(!command.program().as_str().starts_with('~'));
        assert!(command.program().as_str().ends_with("bin/tsc"));
    }

    #[tokio::test]
    async fn test_missing_workspace() {
        let runner = TscRunner::new(
            TscCommand::new("tsc", Vec::new()),
            Utf8PathBuf::from("/definitely/not/a/real/project/dir"),
            None,
        );
        let err = runner.run().await.unwrap_err();
        assert!(matches!(err, TscError::WorkspaceNotFound(_)));
        assert!(err.to_string().starts_with("working directory not found"));
    }

    #[tokio::test]
    async fn test_missing_program() {
        let (_dir, root) = temp_root();
        let runner = TscRunner::new(
            TscCommand::new("check-tsc-no-such-binary", Vec::new()),
            root,
            None,
        );
        let err = runner.run().await.unwrap_err();
        assert!(matches!(err, TscError::SpawnFailed(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_captures_streams_and_nonzero_exit() {
        let (_dir, root) = temp_root();
        let runner = TscRunner::new(
            shell("echo \"args: $*\"; echo oops >&2; exit 2"),
            root,
            None,
        );

        let output = runner.run().await.unwrap();
        assert_eq!(output.exit_code, Some(2));
        assert!(!output.success());
        assert_eq!(output.stdout, "args: --noEmit --pretty false\n");
        assert_eq!(output.stderr, "oops\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_uses_project_root_as_cwd() {
        let (_dir, root) = temp_root();
        std::fs::write(root.join("marker.ts"), "").unwrap();
        let runner = TscRunner::new(shell("ls"), root, None);

        let output = runner.run().await.unwrap();
        assert!(output.success());
        assert_eq!(output.stdout, "marker.ts\n");
        assert_eq!(output.stderr, "");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_version_strips_prefix() {
        let (_dir, root) = temp_root();
        let runner = TscRunner::new(shell("echo 'Version 5.4.5'"), root, None);
        assert_eq!(runner.version().await.unwrap(), "5.4.5");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_version_failure() {
        let (_dir, root) = temp_root();
        let runner = TscRunner::new(shell("echo broken >&2; exit 3"), root, None);
        let err = runner.version().await.unwrap_err();
        assert!(matches!(err, TscError::ProcessFailed { code: 3, ref stderr } if stderr == "broken\n"));
    }
}
