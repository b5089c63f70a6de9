//! Adapter macro against the checked-in `tests/fixtures/type_parameter` directory.

use std::fs;
use std::path::Path;

use fixbind::{Configurator, FixturePattern, SuiteDefinition, TestCase};

const TYPE_PARAMETER_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/type_parameter");

fn type_parameter_suite(configurator: &str) -> SuiteDefinition {
    SuiteDefinition::new(
        "type_parameter",
        TYPE_PARAMETER_DIR,
        FixturePattern::extension("kt"),
        Configurator::new(configurator).with_option("directive", "TYPE_PARAMETER"),
    )
}

/// Every fixture declares the type parameter it is about in a trailing directive comment.
fn check_type_parameter(path: &Path, configurator: &Configurator) -> Result<(), String> {
    let source = fs::read_to_string(path).map_err(|e| e.to_string())?;
    let directive = configurator.option("directive").ok_or("configurator has no directive")?;
    let marker = format!("// {directive}: ");
    let name = source
        .lines()
        .find_map(|line| line.strip_prefix(marker.as_str()))
        .ok_or_else(|| format!("{} has no `{marker}` line", path.display()))?;
    if source.contains(&format!("<{name}>")) || source.contains(&format!("<reified {name}>")) {
        Ok(())
    } else {
        Err(format!("type parameter `{name}` not declared in {}", path.display()))
    }
}

fixbind::fixture_adapter! {
    mod fir_type_parameter {
        suite: type_parameter_suite("fir"),
        routine: check_type_parameter,
        cases: {
            multiple_bounds => "multipleBounds.kt",
            regular => "regular.kt",
            reified => "reified.kt",
        },
    }
}

fixbind::fixture_adapter! {
    mod descriptors_type_parameter {
        suite: type_parameter_suite("descriptors"),
        routine: check_type_parameter,
        cases: {
            multiple_bounds => "multipleBounds.kt",
            regular => "regular.kt",
            reified => "reified.kt",
        },
    }
}

#[test]
fn adapter_names_match_derived_case_names() {
    let names: Vec<String> = type_parameter_suite("fir")
        .cases()
        .unwrap()
        .iter()
        .map(TestCase::qualified_name)
        .collect();
    assert_eq!(
        names,
        vec![
            "type_parameter::all_files_present",
            "type_parameter::multiple_bounds",
            "type_parameter::regular",
            "type_parameter::reified",
        ]
    );
}

#[test]
fn incomplete_registration_is_reported() {
    let suite = type_parameter_suite("fir");
    let registered = fixbind::RegisteredSet::from_metadata_paths(suite.pattern(), ["regular.kt", "removed.kt"]);
    let err = fixbind::assert_all_fixtures_registered(&suite, &registered).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("multipleBounds"), "{message}");
    assert!(message.contains("removed"), "{message}");
}
