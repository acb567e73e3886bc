//! tsc process runner for TypeScript type-checking.
//!
//! This crate spawns the TypeScript compiler in check-only mode
//! (`tsc --noEmit --pretty false`) inside a project directory and captures what
//! it prints. By default tsc is launched through `npx`, which picks up the
//! project's own TypeScript install.
//!
//! # Example
//!
//! ```ignore
//! use tsc_runner::{Launcher, TscCommand, TscRunner};
//! use camino::Utf8PathBuf;
//!
//! #[tokio::main]
//! async fn main() {
//!     let project_root = Utf8PathBuf::from("/path/to/project");
//!     let command = TscCommand::resolve(Launcher::Npx, &project_root).unwrap();
//!     let runner = TscRunner::new(command, project_root, None);
//!
//!     let output = runner.run().await.unwrap();
//!     println!("STDOUT:\n{}", output.stdout);
//!     println!("\nSTDERR:\n{}", output.stderr);
//! }
//! ```

mod parser;
mod runner;

pub use parser::{parse_tsc_output, DiagnosticSeverity, TscDiagnostic};
pub use runner::{Launcher, TscCommand, TscError, TscRunOutput, TscRunner, CHECK_ARGS};
