//! Fixture name patterns.
//!
//! A [`FixturePattern`] decides which base names in a fixture directory are fixtures, and extracts the
//! identifier each fixture is known by. Patterns are matched against the base name only, never the full
//! path, so the same pattern works at every nesting depth.

use std::fmt;

use regex::Regex;
use thiserror::Error;

/// Error raised when a fixture pattern is not a valid regular expression.
#[derive(Debug, Error)]
#[error("invalid fixture pattern `{pattern}`: {source}")]
pub struct PatternError {
    pub pattern: String,
    #[source]
    pub source: regex::Error,
}

/// Matching rule applied to fixture base names.
///
/// When the regex has a first capture group that participates in the match, the captured text is the
/// fixture's base identifier. Otherwise the base name minus its last extension is used.
#[derive(Clone)]
pub struct FixturePattern {
    regex: Regex,
}

impl FixturePattern {
    /// Compile a pattern from regex source.
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        let regex = Regex::new(pattern).map_err(|source| PatternError {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self { regex })
    }

    /// Pattern for `<identifier>.<ext>` files, i.e. `^(.+)\.<ext>$`.
    ///
    /// ## Examples
    /// ```rust
    /// use fixbind_core::FixturePattern;
    ///
    /// let pattern = FixturePattern::extension("kt");
    /// assert_eq!(pattern.as_str(), r"^(.+)\.kt$");
    /// assert_eq!(pattern.identifier_for("regular.kt").as_deref(), Some("regular"));
    /// assert_eq!(pattern.identifier_for("regular.txt"), None);
    /// ```
    pub fn extension(ext: &str) -> Self {
        let ext = ext.trim_start_matches('.');
        let source = format!(r"^(.+)\.{}$", regex::escape(ext));
        // An escaped literal inside a fixed template always compiles.
        #[allow(clippy::expect_used)]
        let regex = Regex::new(&source).expect("INVARIANT: escaped extension pattern is valid");
        Self { regex }
    }

    /// The regex source this pattern was built from.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Check whether a base name is a fixture.
    pub fn matches(&self, base_name: &str) -> bool {
        self.regex.is_match(base_name)
    }

    /// Derive the base identifier of a fixture, or `None` when the base name does not match.
    pub fn identifier_for(&self, base_name: &str) -> Option<String> {
        let captures = self.regex.captures(base_name)?;
        let identifier = match captures.get(1) {
            Some(group) => group.as_str().to_string(),
            None => strip_extension(base_name).to_string(),
        };
        Some(identifier)
    }

    /// Derive the full identifier for a `/`-separated path relative to the fixture root.
    ///
    /// The directory part is kept so that fixtures with the same base name in different subdirectories
    /// stay distinct: `nested/foo.kt` becomes `nested/foo`.
    pub fn identifier_for_relative(&self, relative_path: &str) -> Option<String> {
        let normalized = crate::normalize_relative(relative_path);
        let (dir, base_name) = match normalized.rsplit_once('/') {
            Some((dir, base)) => (Some(dir), base),
            None => (None, normalized.as_str()),
        };
        let base_identifier = self.identifier_for(base_name)?;
        Some(match dir {
            Some(dir) => format!("{dir}/{base_identifier}"),
            None => base_identifier,
        })
    }
}

impl fmt::Debug for FixturePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FixturePattern").field(&self.regex.as_str()).finish()
    }
}

impl fmt::Display for FixturePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.regex.as_str())
    }
}

fn strip_extension(base_name: &str) -> &str {
    match base_name.rfind('.') {
        Some(0) | None => base_name,
        Some(idx) => &base_name[..idx],
    }
}
