//! Exclusion sets.
//!
//! Adapter authors carve known-broken or intentionally skipped fixtures out of completeness checking.
//! An entry is either an identifier (`broken`), a relative file path (`broken.kt`) or a relative
//! directory (`legacy`), which excludes everything beneath it. An optional excluded-name pattern drops
//! any fixture whose base name matches it.

use std::collections::BTreeSet;
use std::fmt;

use crate::normalize_relative;
use crate::pattern::{FixturePattern, PatternError};

/// Why a fixture was left out of an enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The fixture's identifier or relative path is listed literally.
    Excluded(String),
    /// The fixture lives under an excluded directory.
    ExcludedDirectory(String),
    /// The fixture's base name matches the excluded-name pattern.
    ExcludedPattern(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Excluded(entry) => write!(f, "excluded by `{entry}`"),
            SkipReason::ExcludedDirectory(entry) => write!(f, "inside excluded directory `{entry}`"),
            SkipReason::ExcludedPattern(pattern) => write!(f, "name matches excluded pattern `{pattern}`"),
        }
    }
}

/// Read-only set of exclusions for one fixture directory.
#[derive(Debug, Clone, Default)]
pub struct ExclusionSet {
    entries: BTreeSet<String>,
    excluded_pattern: Option<FixturePattern>,
}

impl ExclusionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from literal identifiers or relative paths.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for entry in entries {
            set.insert(entry.as_ref());
        }
        set
    }

    /// Add one literal entry. Empty entries (after normalization) are ignored.
    pub fn insert(&mut self, entry: &str) {
        let normalized = normalize_relative(entry);
        if !normalized.is_empty() {
            self.entries.insert(normalized);
        }
    }

    /// Exclude every fixture whose base name matches `pattern`.
    pub fn with_excluded_pattern(mut self, pattern: &str) -> Result<Self, PatternError> {
        self.excluded_pattern = Some(FixturePattern::new(pattern)?);
        Ok(self)
    }

    pub fn excluded_pattern(&self) -> Option<&FixturePattern> {
        self.excluded_pattern.as_ref()
    }

    /// Literal entries in sorted order.
    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.excluded_pattern.is_none()
    }

    /// Decide whether a fixture is excluded.
    ///
    /// ## Parameters
    /// - `relative_path`: `/`-separated path of the fixture file relative to the fixture root.
    /// - `identifier`: the fixture's full identifier (see [`FixturePattern::identifier_for_relative`]).
    ///
    /// ## Returns
    /// - `Some(reason)` for the first matching rule: literal entry, then ancestor directory, then the
    ///   excluded-name pattern; `None` when the fixture is kept.
    pub fn reason_for(&self, relative_path: &str, identifier: &str) -> Option<SkipReason> {
        let relative_path = normalize_relative(relative_path);

        if self.entries.contains(identifier) {
            return Some(SkipReason::Excluded(identifier.to_string()));
        }
        if self.entries.contains(&relative_path) {
            return Some(SkipReason::Excluded(relative_path));
        }

        let mut ancestor = relative_path.as_str();
        while let Some((parent, _)) = ancestor.rsplit_once('/') {
            if self.entries.contains(parent) {
                return Some(SkipReason::ExcludedDirectory(parent.to_string()));
            }
            ancestor = parent;
        }

        let pattern = self.excluded_pattern.as_ref()?;
        let base_name = relative_path.rsplit('/').next().unwrap_or(relative_path.as_str());
        if pattern.matches(base_name) {
            return Some(SkipReason::ExcludedPattern(pattern.as_str().to_string()));
        }
        None
    }
}
