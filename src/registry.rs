//! Registered test sets: the identifiers an adapter claims to cover.

use std::collections::BTreeSet;

use fixbind_core::{FixturePattern, normalize_relative};

/// Identifiers for which an adapter declares an executable test case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisteredSet {
    identifiers: BTreeSet<String>,
}

impl RegisteredSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from fixture identifiers such as `regular` or `nested/foo`.
    pub fn from_identifiers<I, S>(identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for id in identifiers {
            set.insert(id.as_ref());
        }
        set
    }

    /// Build from per-test metadata paths such as `regular.kt` or `nested/foo.kt`.
    ///
    /// Each path goes through the suite pattern to get its identifier. A path the pattern does not
    /// match is kept literally, so it surfaces as stale instead of disappearing.
    pub fn from_metadata_paths<I, S>(pattern: &FixturePattern, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let identifiers = paths.into_iter().map(|path| {
            let path = path.as_ref();
            pattern
                .identifier_for_relative(path)
                .unwrap_or_else(|| normalize_relative(path))
        });
        Self::from_identifiers(identifiers)
    }

    pub fn insert(&mut self, identifier: &str) -> bool {
        self.identifiers.insert(normalize_relative(identifier))
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.identifiers.contains(identifier)
    }

    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }

    /// Identifiers in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.identifiers.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for RegisteredSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_identifiers(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_paths_become_identifiers() {
        let pattern = FixturePattern::extension("kt");
        let set = RegisteredSet::from_metadata_paths(&pattern, ["multipleBounds.kt", "nested/regular.kt"]);
        assert!(set.contains("multipleBounds"));
        assert!(set.contains("nested/regular"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_unmatched_metadata_path_kept_literally() {
        let pattern = FixturePattern::extension("kt");
        let set = RegisteredSet::from_metadata_paths(&pattern, ["notes.txt"]);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["notes.txt"]);
    }

    #[test]
    fn test_identifiers_normalized_and_deduplicated() {
        let set: RegisteredSet = ["./a", "a", "b/"].into_iter().collect();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
