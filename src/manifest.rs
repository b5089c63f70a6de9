//! `fixbind.toml` manifests.
//!
//! A manifest is the registration table in file form: every `[[suite]]` row names a fixture directory,
//! its pattern and exclusions, the configurator to run it with, and optionally the test cases an adapter
//! has registered for it. The CLI turns each row into a [`SuiteDefinition`] and runs its cases.
//!
//! Suite roots are relative to the project root, which is, in order of precedence:
//! 1. an explicit override (`--project-root` / `FIXBIND_PROJECT_ROOT`),
//! 2. `project_root` in the manifest, relative to the manifest's directory,
//! 3. the manifest's directory.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use fixbind_core::{ExclusionSet, FixturePattern, PatternError, StalePolicy};
use miette::Diagnostic;
use serde::Deserialize;
use thiserror::Error;

use crate::configurator::Configurator;
use crate::registry::RegisteredSet;
use crate::suite::SuiteDefinition;

/// Default manifest file name.
pub const DEFAULT_MANIFEST: &str = "fixbind.toml";

/// Errors raised while loading or validating a manifest.
#[derive(Debug, Error, Diagnostic)]
pub enum ManifestError {
    #[error("cannot read manifest {}: {source}", path.display())]
    #[diagnostic(code(fixbind::manifest::read))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid manifest {}: {source}", path.display())]
    #[diagnostic(code(fixbind::manifest::parse))]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("suite `{name}` is declared more than once")]
    #[diagnostic(code(fixbind::manifest::duplicate_suite))]
    DuplicateSuite { name: String },

    #[error("suite `{suite}` sets both `pattern` and `extension`")]
    #[diagnostic(code(fixbind::manifest::pattern_conflict), help("keep one of them"))]
    PatternConflict { suite: String },

    #[error("suite `{suite}` needs a `pattern` or an `extension`")]
    #[diagnostic(code(fixbind::manifest::missing_pattern), help("for `<name>.kt` fixtures use `extension = \"kt\"`"))]
    MissingPattern { suite: String },

    #[error("suite `{suite}`: {source}")]
    #[diagnostic(code(fixbind::manifest::invalid_pattern))]
    InvalidPattern {
        suite: String,
        #[source]
        source: PatternError,
    },

    #[error("no suite named `{name}` in the manifest")]
    #[diagnostic(code(fixbind::manifest::unknown_suite))]
    UnknownSuite { name: String },
}

/// Raw manifest as written on disk.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub project_root: Option<PathBuf>,
    #[serde(default)]
    pub runner: RunnerConfig,
    #[serde(default, rename = "suite")]
    pub suites: Vec<SuiteEntry>,
}

/// Defaults for `fixbind run`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunnerConfig {
    /// Command executed once per fixture; see [`crate::cli::test_interfaces::CommandExecutor`].
    #[serde(default)]
    pub command: Vec<String>,
}

/// One `[[suite]]` row.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SuiteEntry {
    pub name: String,
    pub root: PathBuf,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub extension: Option<String>,
    #[serde(default)]
    pub excluded_pattern: Option<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default = "default_recursive")]
    pub recursive: bool,
    #[serde(default)]
    pub stale: StalePolicy,
    /// Metadata paths of registered test cases; `None` means the suite makes no claim to check.
    #[serde(default)]
    pub registered: Option<Vec<String>>,
    #[serde(default)]
    pub command: Option<Vec<String>>,
    pub configurator: Configurator,
}

fn default_recursive() -> bool {
    true
}

/// A suite ready to run, resolved against the project root.
#[derive(Debug, Clone)]
pub struct ManifestSuite {
    pub definition: SuiteDefinition,
    pub registered: Option<RegisteredSet>,
    pub command: Vec<String>,
}

/// A parsed manifest plus the paths it was resolved against.
#[derive(Debug)]
pub struct LoadedManifest {
    pub path: PathBuf,
    pub project_root: PathBuf,
    pub manifest: Manifest,
}

impl LoadedManifest {
    /// Read and parse a manifest file.
    pub fn load(path: &Path, project_root_override: Option<&Path>) -> Result<Self, ManifestError> {
        let text = fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path, project_root_override)
    }

    /// Parse manifest text as if it had been read from `path`.
    pub fn parse(text: &str, path: &Path, project_root_override: Option<&Path>) -> Result<Self, ManifestError> {
        let manifest: Manifest = toml::from_str(text).map_err(|source| ManifestError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let manifest_dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let project_root = match (project_root_override, &manifest.project_root) {
            (Some(explicit), _) => explicit.to_path_buf(),
            (None, Some(relative)) => manifest_dir.join(relative),
            (None, None) => manifest_dir,
        };

        tracing::debug!(manifest = %path.display(), project_root = %project_root.display(), suites = manifest.suites.len(), "loaded manifest");

        Ok(Self {
            path: path.to_path_buf(),
            project_root,
            manifest,
        })
    }

    /// Resolve the selected suites (all of them when `selected` is empty), in manifest order.
    pub fn suites(&self, selected: &[String]) -> Result<Vec<ManifestSuite>, ManifestError> {
        let mut names = HashSet::new();
        for entry in &self.manifest.suites {
            if !names.insert(entry.name.as_str()) {
                return Err(ManifestError::DuplicateSuite {
                    name: entry.name.clone(),
                });
            }
        }
        if let Some(unknown) = selected.iter().find(|name| !names.contains(name.as_str())) {
            return Err(ManifestError::UnknownSuite { name: unknown.clone() });
        }

        self.manifest
            .suites
            .iter()
            .filter(|entry| selected.is_empty() || selected.contains(&entry.name))
            .map(|entry| self.resolve(entry))
            .collect()
    }

    fn resolve(&self, entry: &SuiteEntry) -> Result<ManifestSuite, ManifestError> {
        let invalid = |source| ManifestError::InvalidPattern {
            suite: entry.name.clone(),
            source,
        };

        let pattern = match (&entry.pattern, &entry.extension) {
            (Some(_), Some(_)) => {
                return Err(ManifestError::PatternConflict {
                    suite: entry.name.clone(),
                });
            }
            (Some(pattern), None) => FixturePattern::new(pattern).map_err(invalid)?,
            (None, Some(ext)) => FixturePattern::extension(ext),
            (None, None) => {
                return Err(ManifestError::MissingPattern {
                    suite: entry.name.clone(),
                });
            }
        };

        let mut exclusions = ExclusionSet::from_entries(&entry.exclude);
        if let Some(excluded) = &entry.excluded_pattern {
            exclusions = exclusions.with_excluded_pattern(excluded).map_err(invalid)?;
        }

        let registered = entry
            .registered
            .as_ref()
            .map(|paths| RegisteredSet::from_metadata_paths(&pattern, paths));

        let definition = SuiteDefinition::new(
            entry.name.clone(),
            self.project_root.join(&entry.root),
            pattern,
            entry.configurator.clone(),
        )
        .with_exclusions(exclusions)
        .recursive(entry.recursive)
        .stale_policy(entry.stale);

        let command = entry
            .command
            .clone()
            .unwrap_or_else(|| self.manifest.runner.command.clone());

        Ok(ManifestSuite {
            definition,
            registered,
            command,
        })
    }
}
