//! Manifest loading against the demo manifest and the checked-in fixtures.

use std::path::Path;

use fixbind::LoadedManifest;
use fixbind::cli::commands::{SuiteCheck, check_suites, format_case_listing};

fn demo() -> LoadedManifest {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/fixbind.toml");
    LoadedManifest::load(&path, None).unwrap()
}

#[test]
fn demo_manifest_suites_are_complete() {
    let suites = demo().suites(&[]).unwrap();
    assert_eq!(suites.len(), 2);
    assert_eq!(suites[0].command, vec!["grep", "-q", "TYPE_PARAMETER", "{fixture}"]);

    for (name, check) in check_suites(&suites) {
        match check {
            SuiteCheck::Complete(report) => assert_eq!(report.discovered, 3, "{name}"),
            other => panic!("{name}: {other:?}"),
        }
    }
}

#[test]
fn demo_listing() {
    let suites = demo().suites(&["descriptors_type_parameter".to_string()]).unwrap();
    let cases = suites[0].definition.cases().unwrap();
    let listing = format_case_listing(&suites[0], &cases, false).unwrap();
    insta::assert_snapshot!(listing.trim_end(), @r"
    descriptors_type_parameter (4 case(s))
      all_files_present
      multiple_bounds  multipleBounds.kt
      regular  regular.kt
      reified  reified.kt
    ");
}
