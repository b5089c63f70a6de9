//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::fmt::Write as _;

use fixbind_core::CompletenessReport;

use crate::error::FixbindError;
use crate::manifest::ManifestSuite;
use crate::suite::{CaseKind, TestCase};
use crate::verify::assert_all_fixtures_registered;

use super::{CliError, CliResult, ExitCode};

/// Render any diagnostic the way miette's fancy handler prints it.
pub(crate) fn render_diagnostic(err: impl miette::Diagnostic + Send + Sync + 'static) -> String {
    format!("{:?}", miette::Report::new(err))
}

// ============================================================================
// check
// ============================================================================

/// Outcome of checking one suite.
#[derive(Debug)]
pub enum SuiteCheck {
    /// The suite declares no registered cases, so there is nothing to compare against.
    Unregistered,
    Complete(CompletenessReport),
    Failed(FixbindError),
}

/// Check every suite's fixture directory against its registered cases.
pub fn check_suites(suites: &[ManifestSuite]) -> Vec<(String, SuiteCheck)> {
    suites
        .iter()
        .map(|suite| {
            let name = suite.definition.name().to_string();
            let check = match &suite.registered {
                None => SuiteCheck::Unregistered,
                Some(registered) => match assert_all_fixtures_registered(&suite.definition, registered) {
                    Ok(report) => SuiteCheck::Complete(report),
                    Err(e) => SuiteCheck::Failed(e),
                },
            };
            (name, check)
        })
        .collect()
}

/// `fixbind check`: print one line per suite and fail if any suite is out of sync.
pub fn check(suites: &[ManifestSuite]) -> CliResult<ExitCode> {
    let mut failed = 0;
    for (name, check) in check_suites(suites) {
        match check {
            SuiteCheck::Unregistered => println!("{name}: \x1b[33mno registered cases\x1b[0m"),
            SuiteCheck::Complete(report) => {
                let mut line = format!("{name}: \x1b[32mok\x1b[0m ({} fixture(s)", report.discovered);
                if !report.excused.is_empty() {
                    let _ = write!(line, ", {} excused", report.excused.len());
                }
                if !report.stale.is_empty() {
                    let _ = write!(line, ", {} stale tolerated", report.stale.len());
                }
                line.push(')');
                println!("{line}");
            }
            SuiteCheck::Failed(err) => {
                failed += 1;
                eprintln!("{}", render_diagnostic(err));
            }
        }
    }

    if failed == 0 {
        Ok(ExitCode::SUCCESS)
    } else {
        Err(CliError::failure(format!("{failed} suite(s) out of sync")))
    }
}

// ============================================================================
// list
// ============================================================================

/// Render the case table for `fixbind list`.
pub fn format_case_listing(suite: &ManifestSuite, cases: &[TestCase], show_skipped: bool) -> CliResult<String> {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({} case(s))", suite.definition.name(), cases.len());
    for case in cases {
        match &case.kind {
            CaseKind::AllFilesPresent => {
                let _ = writeln!(out, "  {}", case.name);
            }
            CaseKind::Fixture(fixture) => {
                let _ = writeln!(out, "  {}  {}", case.name, fixture.relative_path());
            }
        }
    }

    if show_skipped {
        let fixtures = suite
            .definition
            .enumerate()
            .map_err(|e| CliError::failure(render_diagnostic(e)))?;
        for skipped in fixtures.skipped() {
            let _ = writeln!(
                out,
                "  skipped  {}  ({})",
                skipped.fixture.relative_path(),
                skipped.reason
            );
        }
    }
    Ok(out)
}

/// `fixbind list`: print each suite's cases in the order they run.
pub fn list(suites: &[ManifestSuite], show_skipped: bool) -> CliResult<ExitCode> {
    for suite in suites {
        let cases = suite
            .definition
            .cases()
            .map_err(|e| CliError::failure(render_diagnostic(e)))?;
        print!("{}", format_case_listing(suite, &cases, show_skipped)?);
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::configurator::Configurator;
    use crate::registry::RegisteredSet;
    use crate::suite::SuiteDefinition;
    use fixbind_core::FixturePattern;
    use std::fs;

    fn manifest_suite(dir: &std::path::Path, registered: Option<&[&str]>) -> ManifestSuite {
        let definition = SuiteDefinition::new("tp", dir, FixturePattern::extension("kt"), Configurator::new("fir"))
            .exclude("legacy");
        ManifestSuite {
            definition,
            registered: registered.map(|ids| RegisteredSet::from_identifiers(ids.iter().copied())),
            command: Vec::new(),
        }
    }

    #[test]
    fn test_check_suites_outcomes() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.kt"), "").unwrap();
        fs::write(dir.path().join("b.kt"), "").unwrap();

        let suites = vec![
            manifest_suite(dir.path(), None),
            manifest_suite(dir.path(), Some(&["a", "b"])),
            manifest_suite(dir.path(), Some(&["a"])),
        ];
        let results = check_suites(&suites);
        assert!(matches!(results[0].1, SuiteCheck::Unregistered));
        assert!(matches!(&results[1].1, SuiteCheck::Complete(r) if r.discovered == 2));
        match &results[2].1 {
            SuiteCheck::Failed(FixbindError::CompletenessMismatch { mismatch, .. }) => {
                assert_eq!(mismatch.missing, vec!["b"]);
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert!(check(&suites).is_err());
    }

    #[test]
    fn test_listing_shows_cases_and_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("legacy")).unwrap();
        fs::write(dir.path().join("legacy/old.kt"), "").unwrap();
        fs::write(dir.path().join("regular.kt"), "").unwrap();

        let suite = manifest_suite(dir.path(), None);
        let cases = suite.definition.cases().unwrap();
        let listing = format_case_listing(&suite, &cases, true).unwrap();
        assert_eq!(
            listing,
            "tp (2 case(s))\n  all_files_present\n  regular  regular.kt\n  skipped  legacy/old.kt  (inside excluded directory `legacy`)\n"
        );
    }
}
