//! Layering guardrails to keep `fixbind_core` free of IO.
//!
//! The core crate holds path-free semantics only. Directory walking, manifests and the CLI belong to the
//! `fixbind` crate. This test scans `crates/fixbind_core/Cargo.toml` and fails if an IO or CLI crate
//! appears in its `[dependencies]`.

const FORBIDDEN_IN_CORE: &[&str] = &[
    "walkdir",
    "tempfile",
    "toml",
    "serde_json",
    "clap",
    "miette",
    "tracing-subscriber",
    "fixbind",
];

#[test]
fn core_does_not_depend_on_io_crates() {
    let manifest = include_str!("../crates/fixbind_core/Cargo.toml");
    let mut in_dependencies = false;

    for raw_line in manifest.lines() {
        let line = raw_line.trim();
        // Track when we enter/exit the `[dependencies]` table.
        if line.starts_with('[') {
            in_dependencies = line == "[dependencies]";
            continue;
        }

        if !in_dependencies || line.is_empty() || line.starts_with('#') {
            continue;
        }

        // Strip inline comments for robustness.
        let line_no_comment = line.split('#').next().unwrap_or("").trim();
        let name = line_no_comment.split('=').next().unwrap_or("").trim();
        if FORBIDDEN_IN_CORE.contains(&name) {
            panic!("`{name}` must not appear in fixbind_core's [dependencies]; keep IO in the fixbind crate");
        }
    }
}

#[test]
fn core_sources_do_not_touch_the_filesystem() {
    let sources = [
        include_str!("../crates/fixbind_core/src/lib.rs"),
        include_str!("../crates/fixbind_core/src/pattern.rs"),
        include_str!("../crates/fixbind_core/src/exclusion.rs"),
        include_str!("../crates/fixbind_core/src/naming.rs"),
        include_str!("../crates/fixbind_core/src/completeness.rs"),
    ];
    for source in sources {
        assert!(!source.contains("std::fs"), "fixbind_core must not use std::fs");
    }
}
