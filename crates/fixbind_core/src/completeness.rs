//! Completeness diff between a fixture directory and a registered test set.
//!
//! The verifier is a pure function of three identifier sets:
//! - `discovered`: fixtures found on disk (after exclusions),
//! - `registered`: identifiers the adapter declares a test case for,
//! - `excused`: fixtures found on disk but excluded.
//!
//! `missing = discovered − registered` and `stale = registered − discovered − excused`. A registered
//! test for an excluded fixture is neither missing nor stale: the file is still there, it is only
//! carved out of checking.
//!
//! ## Notes
//!
//! - Inputs are collected into ordered sets, so duplicates and input order never change the result.
//! - Severity of `stale` is gated by [`StalePolicy`]; `missing` always fails.

use std::collections::BTreeSet;
use std::fmt;

/// How registered tests without a backing fixture are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum StalePolicy {
    /// Stale registrations fail the completeness check.
    #[default]
    Error,
    /// Stale registrations are reported but do not fail the check.
    Warn,
    /// Stale registrations are dropped from the outcome.
    Ignore,
}

/// Result of comparing discovered fixtures with registered tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletenessReport {
    /// Fixtures on disk with no registered test, sorted.
    pub missing: Vec<String>,
    /// Registered tests whose fixture no longer exists, sorted.
    pub stale: Vec<String>,
    /// Registered tests whose fixture exists but is excluded, sorted.
    pub excused: Vec<String>,
    /// Number of distinct discovered fixtures.
    pub discovered: usize,
    /// Number of distinct registered identifiers.
    pub registered: usize,
}

impl CompletenessReport {
    /// `true` when both `missing` and `stale` are empty.
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty() && self.stale.is_empty()
    }

    /// Turn the report into a pass/fail verdict under `policy`.
    ///
    /// ## Returns
    /// - `Ok(report)` when nothing is missing and stale entries are tolerated by the policy. Under
    ///   [`StalePolicy::Ignore`] the returned report has `stale` cleared; under [`StalePolicy::Warn`] it
    ///   keeps them so callers can log them.
    /// - `Err(mismatch)` otherwise, carrying every missing identifier and, unless the policy is
    ///   [`StalePolicy::Ignore`], every stale one (tolerated or not).
    pub fn into_result(mut self, policy: StalePolicy) -> Result<CompletenessReport, CompletenessMismatch> {
        if policy == StalePolicy::Ignore {
            self.stale.clear();
        }
        let stale_fails = policy == StalePolicy::Error && !self.stale.is_empty();
        if self.missing.is_empty() && !stale_fails {
            return Ok(self);
        }
        Err(CompletenessMismatch {
            missing: self.missing,
            stale: self.stale,
        })
    }
}

/// Drift between a fixture directory and its registered tests.
///
/// The rendered form is stable and sorted so CI logs diff cleanly between runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletenessMismatch {
    pub missing: Vec<String>,
    pub stale: Vec<String>,
}

impl fmt::Display for CompletenessMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} fixture(s) without a registered test, {} registered test(s) without a fixture",
            self.missing.len(),
            self.stale.len()
        )?;
        if !self.missing.is_empty() {
            write!(f, "\nmissing:")?;
            for id in &self.missing {
                write!(f, "\n  {id}")?;
            }
        }
        if !self.stale.is_empty() {
            write!(f, "\nstale:")?;
            for id in &self.stale {
                write!(f, "\n  {id}")?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for CompletenessMismatch {}

/// Compare discovered fixture identifiers with registered test identifiers.
///
/// ## Parameters
/// - `discovered`: identifiers of fixtures found on disk (already filtered by exclusions).
/// - `registered`: identifiers the adapter claims to cover.
/// - `excused`: identifiers of fixtures found on disk but excluded.
///
/// ## Returns
/// - (`CompletenessReport`): sorted `missing`, `stale` and `excused` lists plus set sizes.
pub fn verify<D, R, E>(discovered: D, registered: R, excused: E) -> CompletenessReport
where
    D: IntoIterator,
    D::Item: AsRef<str>,
    R: IntoIterator,
    R::Item: AsRef<str>,
    E: IntoIterator,
    E::Item: AsRef<str>,
{
    let discovered: BTreeSet<String> = discovered.into_iter().map(|s| s.as_ref().to_string()).collect();
    let registered: BTreeSet<String> = registered.into_iter().map(|s| s.as_ref().to_string()).collect();
    let excused_all: BTreeSet<String> = excused.into_iter().map(|s| s.as_ref().to_string()).collect();

    let missing = discovered.difference(&registered).cloned().collect();
    let stale = registered
        .iter()
        .filter(|id| !discovered.contains(*id) && !excused_all.contains(*id))
        .cloned()
        .collect();
    let excused = registered
        .iter()
        .filter(|id| !discovered.contains(*id) && excused_all.contains(*id))
        .cloned()
        .collect();

    CompletenessReport {
        missing,
        stale,
        excused,
        discovered: discovered.len(),
        registered: registered.len(),
    }
}
