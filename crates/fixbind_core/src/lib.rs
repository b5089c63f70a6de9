//! Provide the pure, deterministic pieces of fixture binding: name patterns, exclusions, test-name
//! derivation and the completeness diff between a fixture directory and a registered test set.
//!
//! This crate is intentionally small and dependency-light. Both the `fixbind` library (which owns the
//! filesystem walk and dispatch) and any generated or hand-written adapter can use it to agree on:
//! - which base names count as fixtures and what identifier each one has,
//! - which fixtures are carved out of completeness checking, and why,
//! - how an identifier becomes a valid Rust test name,
//! - what "missing" and "stale" mean when the two sides drift apart.
//!
//! ## Notes
//!
//! - This is a “semantic core” crate: **no IO**, no global state, no logging.
//! - Paths are handled as `/`-separated strings relative to a fixture root so results are identical on
//!   every platform.
//!
//! ## Examples
//! ```rust
//! use fixbind_core::completeness::{verify, StalePolicy};
//!
//! let report = verify(["a", "b", "c"], ["a", "b"], std::iter::empty::<&str>());
//! let err = report.into_result(StalePolicy::Error).unwrap_err();
//! assert_eq!(err.missing, vec!["c".to_string()]);
//! assert!(err.stale.is_empty());
//! ```

pub mod completeness;
pub mod exclusion;
pub mod naming;
pub mod pattern;

pub use completeness::{CompletenessMismatch, CompletenessReport, StalePolicy, verify};
pub use exclusion::{ExclusionSet, SkipReason};
pub use naming::{is_rust_keyword, test_name_for};
pub use pattern::{FixturePattern, PatternError};

/// Normalize a relative path into the canonical `/`-separated form used for identifiers and exclusions.
///
/// Leading `./`, trailing `/` and Windows separators are removed so `"./legacy\\old/"` and `"legacy/old"`
/// compare equal.
pub fn normalize_relative(path: &str) -> String {
    let unified = path.replace('\\', "/");
    let segments: Vec<&str> = unified
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect();
    segments.join("/")
}
