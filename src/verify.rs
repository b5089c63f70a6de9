//! Completeness checking against a real fixture directory.
//!
//! Thin layer over [`fixbind_core::completeness`]: feeds it an enumerated [`FixtureSet`] and a
//! [`RegisteredSet`], applies the suite's stale policy, and logs what it finds.

use fixbind_core::CompletenessReport;

use crate::error::FixbindError;
use crate::fixture::FixtureSet;
use crate::registry::RegisteredSet;
use crate::suite::SuiteDefinition;

/// Compare an enumerated fixture set with a registered test set.
///
/// Registered identifiers that name an excluded fixture are reported as `excused`, not stale.
#[tracing::instrument(skip_all, fields(root = %fixtures.root().display(), registered = registered.len()))]
pub fn verify(fixtures: &FixtureSet, registered: &RegisteredSet) -> CompletenessReport {
    let report = fixbind_core::verify(fixtures.identifiers(), registered.iter(), fixtures.skipped_identifiers());
    tracing::debug!(
        discovered = report.discovered,
        missing = report.missing.len(),
        stale = report.stale.len(),
        excused = report.excused.len(),
        "verified fixture set"
    );
    report
}

/// Assert that every fixture of `suite` has a registered test and vice versa.
///
/// This is the body of a suite's `all_files_present` case.
///
/// ## Errors
/// - [`FixbindError::Enumerate`] when the fixture directory is missing or unreadable.
/// - [`FixbindError::CompletenessMismatch`] when fixtures are missing a test, or (under
///   [`fixbind_core::StalePolicy::Error`]) registered tests have no fixture.
pub fn assert_all_fixtures_registered<C>(
    suite: &SuiteDefinition<C>,
    registered: &RegisteredSet,
) -> Result<CompletenessReport, FixbindError> {
    let fixtures = suite.enumerate()?;
    let report = verify(&fixtures, registered);

    match report.into_result(suite.policy()) {
        Ok(report) => {
            if !report.stale.is_empty() {
                tracing::warn!(
                    suite = suite.name(),
                    stale = ?report.stale,
                    "registered tests without a fixture"
                );
            }
            Ok(report)
        }
        Err(mismatch) => Err(FixbindError::CompletenessMismatch {
            suite: suite.name().to_string(),
            root: suite.root().to_path_buf(),
            mismatch,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configurator::Configurator;
    use fixbind_core::{FixturePattern, StalePolicy};
    use std::fs;

    fn suite_with(files: &[&str]) -> (tempfile::TempDir, SuiteDefinition) {
        let dir = tempfile::tempdir().unwrap();
        for file in files {
            let path = dir.path().join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "").unwrap();
        }
        let suite = SuiteDefinition::new("s", dir.path(), FixturePattern::extension("kt"), Configurator::new("fir"));
        (dir, suite)
    }

    #[test]
    fn test_warn_policy_passes_with_stale() {
        let (_dir, suite) = suite_with(&["a.kt"]);
        let suite = suite.stale_policy(StalePolicy::Warn);
        let report = assert_all_fixtures_registered(&suite, &RegisteredSet::from_identifiers(["a", "gone"])).unwrap();
        assert_eq!(report.stale, vec!["gone"]);
    }

    #[test]
    fn test_warn_policy_failure_still_lists_stale() {
        let (_dir, suite) = suite_with(&["a.kt", "c.kt"]);
        let suite = suite.stale_policy(StalePolicy::Warn);
        let err = assert_all_fixtures_registered(&suite, &RegisteredSet::from_identifiers(["a", "gone"])).unwrap_err();
        match err {
            FixbindError::CompletenessMismatch { mismatch, .. } => {
                assert_eq!(mismatch.missing, vec!["c"]);
                assert_eq!(mismatch.stale, vec!["gone"]);
                assert!(mismatch.to_string().contains("stale:\n  gone"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_excluded_registration_is_excused() {
        let (_dir, suite) = suite_with(&["a.kt", "legacy/old.kt"]);
        let suite = suite.exclude("legacy");
        let report =
            assert_all_fixtures_registered(&suite, &RegisteredSet::from_identifiers(["a", "legacy/old"])).unwrap();
        assert_eq!(report.excused, vec!["legacy/old"]);
    }

    #[test]
    fn test_missing_directory_is_enumerate_error() {
        let (dir, _) = suite_with(&[]);
        let suite = SuiteDefinition::new(
            "s",
            dir.path().join("absent"),
            FixturePattern::extension("kt"),
            Configurator::new("fir"),
        );
        assert!(matches!(
            assert_all_fixtures_registered(&suite, &RegisteredSet::new()),
            Err(FixbindError::Enumerate(_))
        ));
    }
}
