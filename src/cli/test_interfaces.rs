//! Test runner I/O boundary interfaces
//!
//! The runner never executes fixtures itself. It dispatches each fixture through a [`TestExecutor`],
//! which lets `fixbind run` shell out to a real backend while tests plug in an in-process fake.

use std::path::Path;
use std::process::Command;

use thiserror::Error;

use crate::configurator::Configurator;
use crate::manifest::ManifestSuite;

/// Errors that occur while executing one fixture
#[derive(Debug, Error)]
pub enum TestError {
    #[error("no command configured for suite `{0}`; set [runner].command or the suite's `command`")]
    NoCommand(String),

    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{status}\n{output}")]
    Failed { status: String, output: String },
}

/// Execute one fixture under one configurator and capture the output.
pub trait TestExecutor {
    /// Run `fixture` for `suite` with `configurator`. Returns the captured output on success.
    fn execute(&self, suite: &ManifestSuite, fixture: &Path, configurator: &Configurator) -> Result<String, TestError>;
}

/// Placeholder for the fixture path in a command template.
pub const FIXTURE_PLACEHOLDER: &str = "{fixture}";
/// Placeholder for the configurator name in a command template.
pub const CONFIGURATOR_PLACEHOLDER: &str = "{configurator}";
/// Placeholder for the suite name in a command template.
pub const SUITE_PLACEHOLDER: &str = "{suite}";

/// Runs the suite's command once per fixture.
///
/// Placeholders in every argument are substituted; when no argument mentions `{fixture}` the fixture
/// path is appended. The child process also sees `FIXBIND_FIXTURE`, `FIXBIND_SUITE`,
/// `FIXBIND_CONFIGURATOR` and one `FIXBIND_OPTION_<KEY>` per configurator option.
pub struct CommandExecutor;

impl CommandExecutor {
    /// Expand a command template into the argument vector for one fixture.
    pub fn expand(template: &[String], suite: &str, fixture: &Path, configurator: &Configurator) -> Vec<String> {
        let fixture_str = fixture.to_string_lossy();
        let mut args: Vec<String> = template
            .iter()
            .map(|arg| {
                arg.replace(FIXTURE_PLACEHOLDER, &fixture_str)
                    .replace(CONFIGURATOR_PLACEHOLDER, configurator.name())
                    .replace(SUITE_PLACEHOLDER, suite)
            })
            .collect();
        if !template.iter().any(|arg| arg.contains(FIXTURE_PLACEHOLDER)) {
            args.push(fixture_str.into_owned());
        }
        args
    }

    /// Environment variable name for a configurator option (`jvm-target` -> `FIXBIND_OPTION_JVM_TARGET`).
    pub fn option_env_name(key: &str) -> String {
        let key: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
            .collect();
        format!("FIXBIND_OPTION_{key}")
    }
}

impl TestExecutor for CommandExecutor {
    fn execute(&self, suite: &ManifestSuite, fixture: &Path, configurator: &Configurator) -> Result<String, TestError> {
        let suite_name = suite.definition.name();
        if suite.command.is_empty() {
            return Err(TestError::NoCommand(suite_name.to_string()));
        }
        let args = Self::expand(&suite.command, suite_name, fixture, configurator);
        let Some((program, rest)) = args.split_first() else {
            return Err(TestError::NoCommand(suite_name.to_string()));
        };

        let mut command = Command::new(program);
        command
            .args(rest)
            .env("FIXBIND_FIXTURE", fixture)
            .env("FIXBIND_SUITE", suite_name)
            .env("FIXBIND_CONFIGURATOR", configurator.name());
        for (key, value) in configurator.options() {
            command.env(Self::option_env_name(key), value);
        }

        tracing::debug!(program = %program, args = ?rest, "running fixture command");

        let output = command.output().map_err(|source| TestError::Spawn {
            program: program.clone(),
            source,
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let combined = format!("{}\n{}", stdout, stderr).trim().to_string();

        if output.status.success() {
            Ok(combined)
        } else {
            Err(TestError::Failed {
                status: output.status.to_string(),
                output: combined,
            })
        }
    }
}
