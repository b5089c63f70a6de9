//! Adapter macro: registers a fixture directory as ordinary `#[test]` functions.

/// Declare a fixture adapter module.
///
/// Expands to a module with one `#[test]` per listed fixture plus `all_files_present`, which fails when
/// the directory gains a fixture nobody registered (or loses one that is still listed). The suite and
/// routine expressions are evaluated afresh inside every test, so cases share no state.
///
/// ```no_run
/// use std::path::Path;
/// use fixbind::{Configurator, FixturePattern, SuiteDefinition};
///
/// fn check_fixture(path: &Path, configurator: &Configurator) -> Result<(), String> {
///     let _ = (path, configurator);
///     Ok(())
/// }
///
/// fixbind::fixture_adapter! {
///     mod type_parameter {
///         suite: SuiteDefinition::new(
///             "type_parameter",
///             "testData/typeParameter",
///             FixturePattern::extension("kt"),
///             Configurator::new("fir"),
///         ),
///         routine: check_fixture,
///         cases: {
///             multiple_bounds => "multipleBounds.kt",
///             regular => "regular.kt",
///             reified => "reified.kt",
///         },
///     }
/// }
/// # fn main() {}
/// ```
#[macro_export]
macro_rules! fixture_adapter {
    (
        $(#[$meta:meta])*
        mod $module:ident {
            suite: $suite:expr,
            routine: $routine:expr,
            cases: {
                $( $test:ident => $file:literal ),* $(,)?
            } $(,)?
        }
    ) => {
        $(#[$meta])*
        mod $module {
            #[allow(unused_imports)]
            use super::*;

            #[test]
            fn all_files_present() {
                let suite = $suite;
                let files: &[&str] = &[$($file),*];
                let registered = $crate::RegisteredSet::from_metadata_paths(suite.pattern(), files);
                if let Err(err) = $crate::assert_all_fixtures_registered(&suite, &registered) {
                    panic!("{}", err);
                }
            }

            $(
                #[test]
                fn $test() {
                    let suite = $suite;
                    let routine = $routine;
                    match $crate::dispatch_case(&suite, $file, &routine) {
                        Ok(outcome) => $crate::CaseOutcome::finish(outcome),
                        Err(err) => panic!("{}", err),
                    }
                }
            )*
        }
    };
}
