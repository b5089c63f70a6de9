//! Fixture enumeration.
//!
//! Walks a fixture directory, keeps the files whose base name matches a [`FixturePattern`], sets aside
//! the ones an [`ExclusionSet`] carves out, and returns an immutable, path-sorted snapshot.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use fixbind_core::naming::{module_path_for, test_name_for};
use fixbind_core::{ExclusionSet, FixturePattern, SkipReason};
use walkdir::WalkDir;

use crate::error::EnumerateError;

/// One fixture file discovered on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixture {
    path: PathBuf,
    relative_path: String,
    identifier: String,
    test_name: String,
    module_path: Vec<String>,
}

impl Fixture {
    /// Build a fixture from its root, `/`-separated relative path and identifier.
    pub fn new(root: &Path, relative_path: &str, identifier: impl Into<String>) -> Self {
        let identifier = identifier.into();
        let (dir, base_identifier) = match identifier.rsplit_once('/') {
            Some((dir, base)) => (dir, base),
            None => ("", identifier.as_str()),
        };
        let test_name = test_name_for(base_identifier);
        let module_path = module_path_for(dir);
        Self {
            path: root.join(relative_path),
            relative_path: relative_path.to_string(),
            test_name,
            module_path,
            identifier,
        }
    }

    /// Path of the fixture file (root joined with the relative path).
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `/`-separated path relative to the fixture root, e.g. `nested/foo.kt`.
    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    /// Logical identifier: relative directory plus the name without extension, e.g. `nested/foo`.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Sanitized test name of the fixture's own file, e.g. `foo`.
    pub fn test_name(&self) -> &str {
        &self.test_name
    }

    /// Sanitized directory segments, e.g. `["nested"]`.
    pub fn module_path(&self) -> &[String] {
        &self.module_path
    }

    /// Test name qualified by its module path, e.g. `nested::foo`.
    pub fn case_name(&self) -> String {
        let mut segments: Vec<&str> = self.module_path.iter().map(String::as_str).collect();
        segments.push(&self.test_name);
        segments.join("::")
    }
}

/// A fixture that matched the pattern but was excluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFixture {
    pub fixture: Fixture,
    pub reason: SkipReason,
}

/// Snapshot of one enumeration.
#[derive(Debug, Clone)]
pub struct FixtureSet {
    root: PathBuf,
    fixtures: Vec<Fixture>,
    skipped: Vec<SkippedFixture>,
}

impl FixtureSet {
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Kept fixtures, sorted by relative path.
    pub fn fixtures(&self) -> &[Fixture] {
        &self.fixtures
    }

    /// Excluded fixtures with their reasons, sorted by relative path.
    pub fn skipped(&self) -> &[SkippedFixture] {
        &self.skipped
    }

    pub fn len(&self) -> usize {
        self.fixtures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fixtures.is_empty()
    }

    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.fixtures.iter().map(Fixture::identifier)
    }

    pub fn skipped_identifiers(&self) -> impl Iterator<Item = &str> {
        self.skipped.iter().map(|s| s.fixture.identifier())
    }
}

impl IntoIterator for FixtureSet {
    type Item = Fixture;
    type IntoIter = std::vec::IntoIter<Fixture>;

    fn into_iter(self) -> Self::IntoIter {
        self.fixtures.into_iter()
    }
}

/// Enumerate the fixtures under `root`.
///
/// ## Parameters
/// - `root`: fixture directory; must exist.
/// - `pattern`: applied to base names only.
/// - `exclusions`: literal entries and an optional excluded-name pattern.
/// - `recursive`: walk subdirectories when `true`, only direct children otherwise.
///
/// ## Errors
/// - [`EnumerateError::DirectoryNotFound`] when `root` is missing or not a directory.
/// - [`EnumerateError::Walk`] when the traversal itself fails (permissions, I/O).
#[tracing::instrument(skip_all, fields(root = %root.display(), recursive = recursive))]
pub fn enumerate(
    root: &Path,
    pattern: &FixturePattern,
    exclusions: &ExclusionSet,
    recursive: bool,
) -> Result<FixtureSet, EnumerateError> {
    if !root.is_dir() {
        return Err(EnumerateError::DirectoryNotFound {
            path: root.to_path_buf(),
        });
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut fixtures = Vec::new();
    let mut skipped = Vec::new();

    for entry in WalkDir::new(root).min_depth(1).max_depth(max_depth) {
        let entry = entry.map_err(|source| EnumerateError::Walk {
            root: root.to_path_buf(),
            source,
        })?;
        if !entry.path().is_file() {
            continue;
        }
        let Some(base_name) = entry.file_name().to_str() else {
            tracing::debug!(path = %entry.path().display(), "skipping non-UTF-8 file name");
            continue;
        };
        if !pattern.matches(base_name) {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        let relative_path = relative_string(relative);
        let Some(identifier) = pattern.identifier_for_relative(&relative_path) else {
            continue;
        };

        let fixture = Fixture::new(root, &relative_path, identifier);
        match exclusions.reason_for(&relative_path, fixture.identifier()) {
            Some(reason) => skipped.push(SkippedFixture { fixture, reason }),
            None => fixtures.push(fixture),
        }
    }

    fixtures.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    skipped.sort_by(|a, b| a.fixture.relative_path.cmp(&b.fixture.relative_path));

    let mut by_identifier: HashMap<&str, &str> = HashMap::with_capacity(fixtures.len());
    for fixture in &fixtures {
        if let Some(first) = by_identifier.insert(fixture.identifier(), fixture.relative_path()) {
            return Err(EnumerateError::DuplicateIdentifier {
                root: root.to_path_buf(),
                identifier: fixture.identifier.clone(),
                first: first.to_string(),
                second: fixture.relative_path.clone(),
            });
        }
    }

    tracing::debug!(matched = fixtures.len(), skipped = skipped.len(), "enumerated fixtures");

    Ok(FixtureSet {
        root: root.to_path_buf(),
        fixtures,
        skipped,
    })
}

fn relative_string(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "// fixture\n").unwrap();
    }

    #[test]
    fn test_fixture_names() {
        let fixture = Fixture::new(Path::new("data"), "Nested/multipleBounds.kt", "Nested/multipleBounds");
        assert_eq!(fixture.test_name(), "multiple_bounds");
        assert_eq!(fixture.module_path(), ["nested".to_string()]);
        assert_eq!(fixture.case_name(), "nested::multiple_bounds");
        assert_eq!(fixture.path(), Path::new("data").join("Nested/multipleBounds.kt"));
    }

    #[test]
    fn test_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = enumerate(&missing, &FixturePattern::extension("kt"), &ExclusionSet::new(), true).unwrap_err();
        assert!(matches!(err, EnumerateError::DirectoryNotFound { path } if path == missing));
    }

    #[test]
    fn test_root_must_be_directory() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "file.kt");
        let err = enumerate(
            &dir.path().join("file.kt"),
            &FixturePattern::extension("kt"),
            &ExclusionSet::new(),
            true,
        )
        .unwrap_err();
        assert!(matches!(err, EnumerateError::DirectoryNotFound { .. }));
    }

    #[test]
    fn test_sorted_by_full_relative_path() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a/x.kt");
        touch(dir.path(), "a.kt");
        touch(dir.path(), "b.kt");
        let set = enumerate(dir.path(), &FixturePattern::extension("kt"), &ExclusionSet::new(), true).unwrap();
        let rels: Vec<&str> = set.fixtures().iter().map(Fixture::relative_path).collect();
        assert_eq!(rels, vec!["a.kt", "a/x.kt", "b.kt"]);
    }

    #[test]
    fn test_directories_are_never_fixtures() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("looks_like.kt")).unwrap();
        touch(dir.path(), "real.kt");
        let set = enumerate(dir.path(), &FixturePattern::extension("kt"), &ExclusionSet::new(), true).unwrap();
        assert_eq!(set.identifiers().collect::<Vec<_>>(), vec!["real"]);
    }

    #[test]
    fn test_shared_identifier_rejected() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a.kt");
        touch(dir.path(), "a.kts");
        touch(dir.path(), "b.kts");
        let pattern = FixturePattern::new(r"^(.+)\.kts?$").unwrap();
        let err = enumerate(dir.path(), &pattern, &ExclusionSet::new(), true).unwrap_err();
        match err {
            EnumerateError::DuplicateIdentifier {
                identifier, first, second, ..
            } => {
                assert_eq!(identifier, "a");
                assert_eq!(first, "a.kt");
                assert_eq!(second, "a.kts");
            }
            other => panic!("unexpected error: {other}"),
        }

        // Excluding one of the pair resolves the clash.
        let exclusions = ExclusionSet::from_entries(["a.kts"]);
        let set = enumerate(dir.path(), &pattern, &exclusions, true).unwrap();
        assert_eq!(set.identifiers().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
