//! CLI module for fixbind
//!
//! This module provides the command-line interface over `fixbind.toml` manifests.
//!
//! ## Commands
//!
//! - `check` - Compare every suite's fixture directory with its registered cases
//! - `list` - Print the cases each suite expands to
//! - `run` - Run every case (pytest-style)
//!
//! ## Modules
//!
//! - `commands` - `check` and `list`
//! - `test_runner` - Case execution and reporting
//! - `test_interfaces` - Process boundary for fixture execution
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;
pub mod test_interfaces;
pub mod test_runner;

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

use crate::manifest::{DEFAULT_MANIFEST, LoadedManifest, ManifestSuite};
use crate::version::FIXBIND_VERSION;

use test_interfaces::CommandExecutor;
use test_runner::{ConsoleReporter, JsonReporter, RunOptions};

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
    /// Manifest could not be loaded or resolved
    pub const USAGE: ExitCode = ExitCode(2);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Bind fixture directories to test cases and check they stay in sync
#[derive(Parser, Debug)]
#[command(name = "fixbind")]
#[command(version = FIXBIND_VERSION)]
#[command(about = "Bind fixture directories to test cases and check they stay in sync", long_about = None)]
pub struct Cli {
    /// Manifest describing the suites
    #[arg(long, global = true, value_name = "FILE", env = "FIXBIND_MANIFEST", default_value = DEFAULT_MANIFEST)]
    pub manifest: PathBuf,

    /// Directory suite roots are resolved against (default: from the manifest)
    #[arg(long, global = true, value_name = "DIR", env = "FIXBIND_PROJECT_ROOT")]
    pub project_root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check that every fixture has a registered case and vice versa
    Check {
        /// Only these suites (default: all)
        #[arg(short, long = "suite", value_name = "NAME")]
        suites: Vec<String>,
    },

    /// List the cases each suite expands to
    List {
        /// Only these suites (default: all)
        #[arg(short, long = "suite", value_name = "NAME")]
        suites: Vec<String>,
        /// Also show excluded fixtures and why
        #[arg(long)]
        skipped: bool,
    },

    /// Run every case (pytest-style)
    Run {
        /// Only these suites (default: all)
        #[arg(short, long = "suite", value_name = "NAME")]
        suites: Vec<String>,
        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
        /// Stop on first failure
        #[arg(short = 'x', long = "exitfirst")]
        stop_on_fail: bool,
        /// Filter cases by keyword
        #[arg(short = 'k', value_name = "EXPR")]
        filter: Option<String>,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Console)]
        format: OutputFormat,
    },
}

/// Report format for `fixbind run`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Console,
    Json,
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    let loaded = LoadedManifest::load(&cli.manifest, cli.project_root.as_deref())
        .map_err(|e| CliError::new(commands::render_diagnostic(e), ExitCode::USAGE))?;

    match cli.command {
        Command::Check { suites } => commands::check(&select(&loaded, &suites)?),
        Command::List { suites, skipped } => commands::list(&select(&loaded, &suites)?, skipped),
        Command::Run {
            suites,
            verbose,
            stop_on_fail,
            filter,
            format,
        } => {
            let suites = select(&loaded, &suites)?;
            let options = RunOptions {
                verbose,
                stop_on_fail,
                filter,
            };
            match format {
                OutputFormat::Console => {
                    let mut reporter = ConsoleReporter::new(verbose);
                    test_runner::run_tests(&suites, &options, &CommandExecutor, &mut reporter)
                }
                OutputFormat::Json => {
                    let mut reporter = JsonReporter::new(io::stdout().lock());
                    test_runner::run_tests(&suites, &options, &CommandExecutor, &mut reporter)
                }
            }
        }
    }
}

fn select(loaded: &LoadedManifest, names: &[String]) -> CliResult<Vec<ManifestSuite>> {
    loaded
        .suites(names)
        .map_err(|e| CliError::new(commands::render_diagnostic(e), ExitCode::USAGE))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_check() {
        let cli = Cli::try_parse_from(["fixbind", "check"]).unwrap();
        assert_eq!(cli.manifest, PathBuf::from(DEFAULT_MANIFEST));
        assert!(matches!(cli.command, Command::Check { ref suites } if suites.is_empty()));
    }

    #[test]
    fn test_cli_parse_global_manifest() {
        let cli = Cli::try_parse_from(["fixbind", "list", "--manifest", "conf/suites.toml", "--skipped"]).unwrap();
        assert_eq!(cli.manifest, PathBuf::from("conf/suites.toml"));
        assert!(matches!(cli.command, Command::List { skipped: true, .. }));
    }

    #[test]
    fn test_cli_parse_run() {
        let cli = Cli::try_parse_from([
            "fixbind",
            "run",
            "-s",
            "type_parameter",
            "-s",
            "scripts",
            "-v",
            "-x",
            "-k",
            "reified",
            "--format",
            "json",
        ])
        .unwrap();
        if let Command::Run {
            suites,
            verbose,
            stop_on_fail,
            filter,
            format,
        } = cli.command
        {
            assert_eq!(suites, vec!["type_parameter", "scripts"]);
            assert!(verbose);
            assert!(stop_on_fail);
            assert_eq!(filter.as_deref(), Some("reified"));
            assert_eq!(format, OutputFormat::Json);
        } else {
            panic!("Expected Run command");
        }
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["fixbind"]).is_err());
    }

    #[test]
    fn test_missing_manifest_is_usage_error() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli::try_parse_from([
            "fixbind",
            "--manifest",
            dir.path().join("absent.toml").to_str().unwrap(),
            "check",
        ])
        .unwrap();
        let err = execute(cli).unwrap_err();
        assert_eq!(err.exit_code, ExitCode::USAGE);
    }
}
