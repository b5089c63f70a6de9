//! Error taxonomy for fixture binding.
//!
//! Each failure is local to the one test case that produced it:
//! - [`EnumerateError::DirectoryNotFound`] fails the suite before any case is built,
//! - [`FixtureNotFound`] fails one dispatched case,
//! - [`FixbindError::CompletenessMismatch`] fails the dedicated completeness case.
//!
//! Faults raised by a test routine never pass through these types: the dispatcher hands the routine's
//! outcome back untouched.

use std::path::PathBuf;

use fixbind_core::{CompletenessMismatch, PatternError};
use miette::Diagnostic;
use thiserror::Error;

use crate::manifest::ManifestError;

/// Errors raised while enumerating a fixture directory.
#[derive(Debug, Error, Diagnostic)]
pub enum EnumerateError {
    #[error("fixture directory not found: {}", path.display())]
    #[diagnostic(
        code(fixbind::directory_not_found),
        help("suite roots are resolved against the project root; check the path and the working directory")
    )]
    DirectoryNotFound { path: PathBuf },

    #[error("fixtures `{first}` and `{second}` in {} share the identifier `{identifier}`", root.display())]
    #[diagnostic(
        code(fixbind::duplicate_identifier),
        help("one registration would cover both files; narrow the pattern or exclude one of them")
    )]
    DuplicateIdentifier {
        root: PathBuf,
        identifier: String,
        first: String,
        second: String,
    },

    #[error("failed to walk fixture directory {}: {source}", root.display())]
    #[diagnostic(code(fixbind::walk))]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// A dispatched fixture path does not exist (or is not a file).
#[derive(Debug, Error, Diagnostic)]
#[error("fixture not found: {}", path.display())]
#[diagnostic(
    code(fixbind::fixture_not_found),
    help("the fixture was removed or renamed after its test case was registered")
)]
pub struct FixtureNotFound {
    pub path: PathBuf,
}

/// Top-level error for suite registration and completeness checking.
#[derive(Debug, Error, Diagnostic)]
pub enum FixbindError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Enumerate(#[from] EnumerateError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    FixtureNotFound(#[from] FixtureNotFound),

    #[error("suite `{suite}`: {} is out of sync with its registered tests\n{mismatch}", root.display())]
    #[diagnostic(
        code(fixbind::completeness_mismatch),
        help("register a test for each missing fixture (or exclude it) and drop the stale registrations")
    )]
    CompletenessMismatch {
        suite: String,
        root: PathBuf,
        mismatch: CompletenessMismatch,
    },

    #[error(transparent)]
    #[diagnostic(code(fixbind::invalid_pattern))]
    Pattern(#[from] PatternError),

    #[error("suite `{suite}`: fixtures `{first}` and `{second}` both map to test case `{case_name}`")]
    #[diagnostic(
        code(fixbind::duplicate_test_name),
        help("rename one of the fixtures or exclude it; test names are derived from file names")
    )]
    DuplicateTestName {
        suite: String,
        case_name: String,
        first: String,
        second: String,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Manifest(#[from] ManifestError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mismatch_message_lists_identifiers() {
        let err = FixbindError::CompletenessMismatch {
            suite: "type_parameter".to_string(),
            root: PathBuf::from("testData/typeParameter"),
            mismatch: CompletenessMismatch {
                missing: vec!["reified".to_string()],
                stale: vec![],
            },
        };
        let msg = err.to_string();
        assert!(msg.starts_with("suite `type_parameter`: testData/typeParameter is out of sync"));
        assert!(msg.ends_with("missing:\n  reified"));
    }

    #[test]
    fn test_fixture_not_found_message() {
        let err = FixtureNotFound {
            path: PathBuf::from("missing.kt"),
        };
        assert_eq!(err.to_string(), "fixture not found: missing.kt");
    }
}
