//! Test runner implementation (pytest-style)
//!
//! Runs every case of every selected manifest suite: the `all_files_present` completeness check and
//! one dispatched case per fixture. Cases share nothing, so each one passes or fails on its own.
//!
//! ## TestReporter Trait
//!
//! The test runner uses a `TestReporter` trait to separate reporting from
//! execution. `ConsoleReporter` prints pytest-style progress, `JsonReporter`
//! emits one JSON object per event for CI tooling.
//!
//! ## I/O Boundaries
//!
//! Fixture execution goes through the `TestExecutor` trait in `test_interfaces.rs`,
//! so the run loop can be exercised without spawning processes.

use std::io::Write;
use std::path::Path;
use std::time::{Duration, Instant};

use serde_json::json;

use crate::configurator::Configurator;
use crate::dispatch::dispatch;
use crate::manifest::ManifestSuite;
use crate::suite::{CaseKind, TestCase};
use crate::verify::assert_all_fixtures_registered;

use super::test_interfaces::TestExecutor;
use super::{CliError, CliResult, ExitCode};

// ============================================================================
// Test Reporter Trait
// ============================================================================

/// Trait for reporting test execution results.
///
/// Implement this trait to customize test output format (JSON, TAP, etc.)
pub trait TestReporter {
    /// Called when a suite's cases could not be built (missing directory, duplicate names)
    fn on_suite_error(&mut self, suite: &str, error: &str);

    /// Called when test collection is complete
    fn on_collection_complete(&mut self, test_count: usize);

    /// Called when a test run begins
    fn on_test_start(&mut self, _case: &TestCase) {}

    /// Called when a test completes
    fn on_test_complete(&mut self, case: &TestCase, result: &TestResult);

    /// Called when all tests have completed
    fn on_run_complete(&mut self, summary: &TestSummary);
}

/// Summary of test run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TestSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    /// Suites whose cases could not be collected
    pub errors: usize,
    pub duration: Duration,
}

impl TestSummary {
    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.errors == 0
    }
}

/// Result of running a single test
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestResult {
    Passed(Duration),
    Failed(Duration, String),
    Skipped(String),
}

impl TestResult {
    fn status(&self) -> &'static str {
        match self {
            TestResult::Passed(_) => "passed",
            TestResult::Failed(_, _) => "failed",
            TestResult::Skipped(_) => "skipped",
        }
    }
}

/// Options for `fixbind run`
#[derive(Debug, Default, Clone)]
pub struct RunOptions {
    pub verbose: bool,
    pub stop_on_fail: bool,
    /// Keep only cases whose qualified name contains this keyword
    pub filter: Option<String>,
}

/// Default console reporter (pytest-style)
#[derive(Default)]
pub struct ConsoleReporter {
    pub verbose: bool,
    failures: Vec<(String, String)>,
    suite_errors: Vec<(String, String)>,
}

impl ConsoleReporter {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            ..Self::default()
        }
    }
}

impl TestReporter for ConsoleReporter {
    fn on_suite_error(&mut self, suite: &str, error: &str) {
        eprintln!("\x1b[31mERROR\x1b[0m collecting suite `{}`", suite);
        self.suite_errors.push((suite.to_string(), error.to_string()));
    }

    fn on_collection_complete(&mut self, test_count: usize) {
        println!("\x1b[1m=================== test session starts ===================\x1b[0m");
        if test_count == 0 {
            println!("No tests collected");
        } else {
            println!("collected {} item(s)", test_count);
        }
        println!();
    }

    fn on_test_complete(&mut self, case: &TestCase, result: &TestResult) {
        let status = match result {
            TestResult::Passed(d) => {
                if self.verbose {
                    format!("\x1b[32mPASSED\x1b[0m ({:.0}ms)", d.as_millis())
                } else {
                    "\x1b[32mPASSED\x1b[0m".to_string()
                }
            }
            TestResult::Failed(d, _) => {
                if self.verbose {
                    format!("\x1b[31mFAILED\x1b[0m ({:.0}ms)", d.as_millis())
                } else {
                    "\x1b[31mFAILED\x1b[0m".to_string()
                }
            }
            TestResult::Skipped(reason) => {
                if reason.is_empty() {
                    "\x1b[33mSKIPPED\x1b[0m".to_string()
                } else {
                    format!("\x1b[33mSKIPPED\x1b[0m ({})", reason)
                }
            }
        };
        println!("{} {}", case.qualified_name(), status);

        if let TestResult::Failed(_, msg) = result {
            self.failures.push((case.qualified_name(), msg.clone()));
        }
    }

    fn on_run_complete(&mut self, summary: &TestSummary) {
        if !self.suite_errors.is_empty() {
            println!();
            println!("\x1b[1;31m=================== ERRORS ===================\x1b[0m");
            for (suite, error) in &self.suite_errors {
                println!();
                println!("\x1b[1m___________ {} ___________\x1b[0m", suite);
                println!();
                println!("{}", error);
            }
        }

        if !self.failures.is_empty() {
            println!();
            println!("\x1b[1;31m=================== FAILURES ===================\x1b[0m");
            for (name, msg) in &self.failures {
                println!();
                println!("\x1b[1m___________ {} ___________\x1b[0m", name);
                println!();
                for line in msg.lines() {
                    println!("    {}", line);
                }
            }
        }

        println!();
        let summary_color = if summary.is_success() {
            "\x1b[1;32m"
        } else {
            "\x1b[1;31m"
        };

        let mut parts = Vec::new();
        if summary.passed > 0 {
            parts.push(format!("{} passed", summary.passed));
        }
        if summary.failed > 0 {
            parts.push(format!("{} failed", summary.failed));
        }
        if summary.skipped > 0 {
            parts.push(format!("{} skipped", summary.skipped));
        }
        if summary.errors > 0 {
            parts.push(format!("{} error(s)", summary.errors));
        }
        if parts.is_empty() {
            parts.push("no tests ran".to_string());
        }

        println!(
            "{}=================== {} in {:.2}s ===================\x1b[0m",
            summary_color,
            parts.join(", "),
            summary.duration.as_secs_f64()
        );
    }
}

/// Whole milliseconds, saturating at `u64::MAX`.
fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// JSON-lines reporter: one object per collected error, finished case, and run summary.
pub struct JsonReporter<W: Write> {
    out: W,
}

impl<W: Write> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, value: serde_json::Value) {
        if let Err(e) = writeln!(self.out, "{}", value) {
            tracing::warn!("failed to write report line: {}", e);
        }
    }
}

impl<W: Write> TestReporter for JsonReporter<W> {
    fn on_suite_error(&mut self, suite: &str, error: &str) {
        self.emit(json!({ "event": "suite_error", "suite": suite, "message": error }));
    }

    fn on_collection_complete(&mut self, test_count: usize) {
        self.emit(json!({ "event": "collected", "count": test_count }));
    }

    fn on_test_complete(&mut self, case: &TestCase, result: &TestResult) {
        let (duration_ms, message) = match result {
            TestResult::Passed(d) => (Some(millis(*d)), None),
            TestResult::Failed(d, msg) => (Some(millis(*d)), Some(msg.as_str())),
            TestResult::Skipped(reason) => (None, Some(reason.as_str())),
        };
        self.emit(json!({
            "event": "case",
            "suite": case.suite,
            "name": case.name,
            "status": result.status(),
            "duration_ms": duration_ms,
            "message": message,
        }));
    }

    fn on_run_complete(&mut self, summary: &TestSummary) {
        self.emit(json!({
            "event": "summary",
            "total": summary.total,
            "passed": summary.passed,
            "failed": summary.failed,
            "skipped": summary.skipped,
            "errors": summary.errors,
            "duration_ms": millis(summary.duration),
        }));
    }
}

/// Run all cases of `suites` and report through `reporter`.
pub fn run_suites(
    suites: &[ManifestSuite],
    options: &RunOptions,
    executor: &dyn TestExecutor,
    reporter: &mut dyn TestReporter,
) -> TestSummary {
    let start_time = Instant::now();
    let mut summary = TestSummary::default();

    let mut collected: Vec<(&ManifestSuite, Vec<TestCase>)> = Vec::new();
    for suite in suites {
        match suite.definition.cases() {
            Ok(cases) => {
                let cases: Vec<TestCase> = cases
                    .into_iter()
                    .filter(|case| match &options.filter {
                        Some(keyword) => case.qualified_name().contains(keyword.as_str()),
                        None => true,
                    })
                    .collect();
                summary.total += cases.len();
                collected.push((suite, cases));
            }
            Err(e) => {
                summary.errors += 1;
                reporter.on_suite_error(suite.definition.name(), &e.to_string());
            }
        }
    }

    reporter.on_collection_complete(summary.total);

    'suites: for (suite, cases) in &collected {
        for case in cases {
            reporter.on_test_start(case);
            let result = run_single_case(suite, case, executor);
            match &result {
                TestResult::Passed(_) => summary.passed += 1,
                TestResult::Failed(_, _) => summary.failed += 1,
                TestResult::Skipped(_) => summary.skipped += 1,
            }
            reporter.on_test_complete(case, &result);

            if options.stop_on_fail && matches!(result, TestResult::Failed(_, _)) {
                break 'suites;
            }
        }
    }

    summary.duration = start_time.elapsed();
    reporter.on_run_complete(&summary);
    summary
}

/// Run the suites and map the summary onto an exit code.
pub fn run_tests(
    suites: &[ManifestSuite],
    options: &RunOptions,
    executor: &dyn TestExecutor,
    reporter: &mut dyn TestReporter,
) -> CliResult<ExitCode> {
    let summary = run_suites(suites, options, executor, reporter);
    if summary.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        // Summary already printed
        Err(CliError::new("", ExitCode::FAILURE))
    }
}

fn run_single_case(suite: &ManifestSuite, case: &TestCase, executor: &dyn TestExecutor) -> TestResult {
    let start = Instant::now();

    match &case.kind {
        CaseKind::AllFilesPresent => {
            let Some(registered) = &suite.registered else {
                return TestResult::Skipped("no registered cases declared".to_string());
            };
            match assert_all_fixtures_registered(&suite.definition, registered) {
                Ok(_) => TestResult::Passed(start.elapsed()),
                Err(e) => TestResult::Failed(start.elapsed(), e.to_string()),
            }
        }
        CaseKind::Fixture(fixture) => {
            let routine = |path: &Path, configurator: &Configurator| executor.execute(suite, path, configurator);
            match dispatch(fixture.path(), suite.definition.configurator(), &routine) {
                Ok(Ok(_)) => TestResult::Passed(start.elapsed()),
                Ok(Err(e)) => TestResult::Failed(start.elapsed(), e.to_string()),
                Err(e) => TestResult::Failed(start.elapsed(), e.to_string()),
            }
        }
    }
}
