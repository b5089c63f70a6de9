#![forbid(unsafe_code)]
//! Fixture-driven test binding.
//!
//! A directory of fixture files becomes a suite of independent test cases: one per fixture, plus a
//! completeness check (`all_files_present`) that fails as soon as the directory and the registered
//! cases drift apart. Fixtures are dispatched to a shared execution routine together with a
//! configurator value, so the same directory can be run under several configurations.
//!
//! Path-free semantics (patterns, exclusions, naming, set comparison) live in `fixbind_core`; this
//! crate adds directory walking, dispatch, manifests and the `fixbind` CLI.
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module
//!   enforces `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **Adapter tests**: code expanded from [`fixture_adapter!`] runs inside `#[test]` functions and reports
//!   failures by panicking, like any other test.
//!
//! - **True invariants**: If a panic represents a logic error, use `.expect("INVARIANT: reason")` with a
//!   clear explanation.

pub mod cli;
pub mod configurator;
pub mod dispatch;
pub mod error;
pub mod fixture;
mod macros;
pub mod manifest;
pub mod registry;
pub mod suite;
pub mod verify;
pub mod version;

pub use fixbind_core::{
    CompletenessMismatch, CompletenessReport, ExclusionSet, FixturePattern, PatternError, SkipReason, StalePolicy,
};

pub use configurator::Configurator;
pub use dispatch::{CaseOutcome, TestRoutine, dispatch, dispatch_case};
pub use error::{EnumerateError, FixbindError, FixtureNotFound};
pub use fixture::{Fixture, FixtureSet, SkippedFixture, enumerate};
pub use manifest::{LoadedManifest, ManifestError, ManifestSuite};
pub use registry::RegisteredSet;
pub use suite::{ALL_FILES_PRESENT, CaseKind, SuiteDefinition, TestCase};
pub use verify::{assert_all_fixtures_registered, verify};
