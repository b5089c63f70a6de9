//! Data-driven suite registration.
//!
//! A [`SuiteDefinition`] is one row of the registration table: a fixture directory, its pattern and
//! exclusions, whether to recurse, the configurator to run every fixture with, and how strictly to treat
//! stale registrations. [`SuiteDefinition::cases`] turns that row into N+1 independent test cases: the
//! completeness check plus one case per fixture.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use fixbind_core::{ExclusionSet, FixturePattern, StalePolicy};

use crate::configurator::Configurator;
use crate::error::{EnumerateError, FixbindError};
use crate::fixture::{Fixture, FixtureSet, enumerate};

/// Case name of the completeness check in every suite.
pub const ALL_FILES_PRESENT: &str = "all_files_present";

/// One fixture directory bound to one configurator.
#[derive(Debug, Clone)]
pub struct SuiteDefinition<C = Configurator> {
    name: String,
    root: PathBuf,
    pattern: FixturePattern,
    exclusions: ExclusionSet,
    recursive: bool,
    configurator: Arc<C>,
    stale_policy: StalePolicy,
}

impl<C> SuiteDefinition<C> {
    /// Create a recursive suite with no exclusions and [`StalePolicy::Error`].
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>, pattern: FixturePattern, configurator: C) -> Self {
        Self::with_shared_configurator(name, root, pattern, Arc::new(configurator))
    }

    /// Like [`SuiteDefinition::new`], reusing a configurator already shared with other suites.
    pub fn with_shared_configurator(
        name: impl Into<String>,
        root: impl Into<PathBuf>,
        pattern: FixturePattern,
        configurator: Arc<C>,
    ) -> Self {
        Self {
            name: name.into(),
            root: root.into(),
            pattern,
            exclusions: ExclusionSet::new(),
            recursive: true,
            configurator,
            stale_policy: StalePolicy::default(),
        }
    }

    pub fn with_exclusions(mut self, exclusions: ExclusionSet) -> Self {
        self.exclusions = exclusions;
        self
    }

    /// Add one literal exclusion (identifier, relative file or relative directory).
    pub fn exclude(mut self, entry: &str) -> Self {
        self.exclusions.insert(entry);
        self
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn stale_policy(mut self, policy: StalePolicy) -> Self {
        self.stale_policy = policy;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn pattern(&self) -> &FixturePattern {
        &self.pattern
    }

    pub fn exclusions(&self) -> &ExclusionSet {
        &self.exclusions
    }

    pub fn is_recursive(&self) -> bool {
        self.recursive
    }

    pub fn configurator(&self) -> &C {
        &self.configurator
    }

    pub fn shared_configurator(&self) -> Arc<C> {
        Arc::clone(&self.configurator)
    }

    pub fn policy(&self) -> StalePolicy {
        self.stale_policy
    }

    /// Resolve a metadata path (relative to the suite root) to a fixture path.
    pub fn fixture_path(&self, metadata_path: &str) -> PathBuf {
        self.root.join(metadata_path)
    }

    /// Enumerate this suite's fixture directory.
    pub fn enumerate(&self) -> Result<FixtureSet, EnumerateError> {
        enumerate(&self.root, &self.pattern, &self.exclusions, self.recursive)
    }

    /// Build the suite's test cases: the completeness check first, then one case per fixture in path order.
    ///
    /// ## Errors
    /// - [`FixbindError::Enumerate`] when the fixture directory cannot be enumerated.
    /// - [`FixbindError::DuplicateTestName`] when two fixtures (or a fixture and the completeness check)
    ///   derive the same case name.
    pub fn cases(&self) -> Result<Vec<TestCase>, FixbindError> {
        let fixtures = self.enumerate()?;
        let mut seen: HashMap<String, String> = HashMap::new();
        seen.insert(ALL_FILES_PRESENT.to_string(), format!("<{ALL_FILES_PRESENT}>"));

        let mut cases = Vec::with_capacity(fixtures.len() + 1);
        cases.push(TestCase {
            suite: self.name.clone(),
            name: ALL_FILES_PRESENT.to_string(),
            kind: CaseKind::AllFilesPresent,
        });

        for fixture in fixtures {
            let case_name = fixture.case_name();
            if let Some(first) = seen.get(&case_name) {
                return Err(FixbindError::DuplicateTestName {
                    suite: self.name.clone(),
                    case_name,
                    first: first.clone(),
                    second: fixture.relative_path().to_string(),
                });
            }
            seen.insert(case_name.clone(), fixture.relative_path().to_string());
            cases.push(TestCase {
                suite: self.name.clone(),
                name: case_name,
                kind: CaseKind::Fixture(fixture),
            });
        }

        Ok(cases)
    }
}

/// What a test case does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseKind {
    /// Compare the fixture directory with the registered test set.
    AllFilesPresent,
    /// Dispatch one fixture to the execution routine.
    Fixture(Fixture),
}

/// One independently runnable test case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    pub suite: String,
    pub name: String,
    pub kind: CaseKind,
}

impl TestCase {
    /// Fully qualified name, e.g. `type_parameter::nested::foo`.
    pub fn qualified_name(&self) -> String {
        format!("{}::{}", self.suite, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn suite_in(dir: &Path) -> SuiteDefinition {
        SuiteDefinition::new("type_parameter", dir, FixturePattern::extension("kt"), Configurator::new("fir"))
    }

    #[test]
    fn test_cases_are_n_plus_one() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["regular.kt", "reified.kt", "multipleBounds.kt", "notes.txt"] {
            fs::write(dir.path().join(name), "").unwrap();
        }
        let cases = suite_in(dir.path()).cases().unwrap();
        let names: Vec<String> = cases.iter().map(TestCase::qualified_name).collect();
        assert_eq!(
            names,
            vec![
                "type_parameter::all_files_present",
                "type_parameter::multiple_bounds",
                "type_parameter::regular",
                "type_parameter::reified",
            ]
        );
        assert_eq!(cases[0].kind, CaseKind::AllFilesPresent);
    }

    #[test]
    fn test_duplicate_case_names_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a-b.kt"), "").unwrap();
        fs::write(dir.path().join("a_b.kt"), "").unwrap();
        let err = suite_in(dir.path()).cases().unwrap_err();
        match err {
            FixbindError::DuplicateTestName {
                case_name, first, second, ..
            } => {
                assert_eq!(case_name, "a_b");
                assert_eq!(first, "a-b.kt");
                assert_eq!(second, "a_b.kt");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_fixture_cannot_shadow_completeness_case() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("allFilesPresent.kt"), "").unwrap();
        assert!(matches!(
            suite_in(dir.path()).cases(),
            Err(FixbindError::DuplicateTestName { .. })
        ));
    }

    #[test]
    fn test_builder_settings() {
        let suite = suite_in(Path::new("data"))
            .exclude("broken")
            .recursive(false)
            .stale_policy(StalePolicy::Warn);
        assert!(!suite.is_recursive());
        assert_eq!(suite.policy(), StalePolicy::Warn);
        assert_eq!(suite.exclusions().entries().collect::<Vec<_>>(), vec!["broken"]);
        assert_eq!(suite.fixture_path("regular.kt"), Path::new("data").join("regular.kt"));
        assert_eq!(suite.configurator().name(), "fir");
    }

    #[test]
    fn test_shared_configurator_is_not_copied() {
        let cfg = Arc::new(Configurator::new("fir"));
        let a = SuiteDefinition::with_shared_configurator("a", "a", FixturePattern::extension("kt"), Arc::clone(&cfg));
        let b = SuiteDefinition::with_shared_configurator("b", "b", FixturePattern::extension("kt"), Arc::clone(&cfg));
        assert!(Arc::ptr_eq(&a.shared_configurator(), &b.shared_configurator()));
    }
}
