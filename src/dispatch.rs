//! Test dispatch.
//!
//! The dispatcher binds one fixture path and one configurator, checks the fixture still exists, and
//! hands off to the shared execution routine. Whatever the routine returns comes back unchanged;
//! whatever it panics with unwinds through untouched.

use std::fmt;
use std::path::Path;

use crate::error::FixtureNotFound;
use crate::suite::SuiteDefinition;

/// Shared execution entry point: run one fixture under one configurator.
///
/// Any `Fn(&Path, &C) -> R` is a routine, so plain functions and closures work directly.
pub trait TestRoutine<C: ?Sized> {
    type Outcome;

    fn run_test(&self, fixture: &Path, configurator: &C) -> Self::Outcome;
}

impl<C, F, R> TestRoutine<C> for F
where
    C: ?Sized,
    F: Fn(&Path, &C) -> R,
{
    type Outcome = R;

    fn run_test(&self, fixture: &Path, configurator: &C) -> R {
        self(fixture, configurator)
    }
}

/// Dispatch one fixture to `routine`.
///
/// ## Errors
/// - [`FixtureNotFound`] when `fixture` does not exist or is not a file; the routine is not called.
#[tracing::instrument(skip_all, fields(fixture = %fixture.display()))]
pub fn dispatch<C, T>(fixture: &Path, configurator: &C, routine: &T) -> Result<T::Outcome, FixtureNotFound>
where
    C: ?Sized,
    T: TestRoutine<C> + ?Sized,
{
    if !fixture.is_file() {
        return Err(FixtureNotFound {
            path: fixture.to_path_buf(),
        });
    }
    tracing::debug!("dispatching fixture");
    Ok(routine.run_test(fixture, configurator))
}

/// Dispatch a fixture named by its metadata path (relative to the suite root) with the suite's configurator.
pub fn dispatch_case<C, T>(
    suite: &SuiteDefinition<C>,
    metadata_path: &str,
    routine: &T,
) -> Result<T::Outcome, FixtureNotFound>
where
    T: TestRoutine<C> + ?Sized,
{
    let path = suite.fixture_path(metadata_path);
    dispatch(&path, suite.configurator(), routine)
}

/// Verdict of a routine outcome inside a `#[test]` function.
///
/// Mirrors how the standard test harness treats return values: `()` passes, `Ok(())` passes, `Err(e)`
/// fails with `e`'s `Debug` rendering.
pub trait CaseOutcome {
    fn finish(self);
}

impl CaseOutcome for () {
    fn finish(self) {}
}

impl<E: fmt::Debug> CaseOutcome for Result<(), E> {
    #[allow(clippy::panic)]
    fn finish(self) {
        if let Err(err) = self {
            panic!("Error: {err:?}");
        }
    }
}
