//! Test-name derivation.
//!
//! Fixture identifiers come from file names and can be anything: `multipleBounds`, `kt-1234`,
//! `2d_array`, `fn`. Test cases need valid, unique-looking Rust identifiers, so every identifier is folded
//! to `snake_case` with non-identifier characters replaced by `_`. Names that would still be invalid
//! (empty, leading digit, Rust keyword) get the [`TEST_PREFIX`].

/// Prefix used to disambiguate names that are not valid identifiers on their own.
pub const TEST_PREFIX: &str = "test_";

/// Reserved + strict keywords in Rust (all editions).
pub const RUST_KEYWORDS: &[&str] = &[
    "as", "break", "const", "continue", "crate", "else", "enum", "extern", "false", "fn", "for", "if", "impl", "in",
    "let", "loop", "match", "mod", "move", "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super",
    "trait", "true", "type", "unsafe", "use", "where", "while", "async", "await", "dyn", "abstract", "become", "box",
    "do", "final", "gen", "macro", "override", "priv", "typeof", "unsized", "virtual", "yield", "try",
];

/// Check whether an identifier is a Rust keyword.
pub fn is_rust_keyword(name: &str) -> bool {
    RUST_KEYWORDS.contains(&name)
}

/// Derive the test name for one identifier segment.
///
/// ## Examples
/// ```rust
/// use fixbind_core::test_name_for;
///
/// assert_eq!(test_name_for("multipleBounds"), "multiple_bounds");
/// assert_eq!(test_name_for("kt-1234"), "kt_1234");
/// assert_eq!(test_name_for("2dArray"), "test_2d_array");
/// assert_eq!(test_name_for("fn"), "test_fn");
/// ```
pub fn test_name_for(identifier: &str) -> String {
    let snake = to_snake_case(identifier);
    let needs_prefix = match snake.chars().next() {
        None => true,
        Some(first) => first.is_ascii_digit() || is_rust_keyword(&snake),
    };
    if needs_prefix { format!("{TEST_PREFIX}{snake}") } else { snake }
}

/// Derive module segments for a `/`-separated relative directory (`"Nested/deep-dir"` -> `["nested", "deep_dir"]`).
pub fn module_path_for(relative_dir: &str) -> Vec<String> {
    crate::normalize_relative(relative_dir)
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(test_name_for)
        .collect()
}

fn to_snake_case(identifier: &str) -> String {
    let chars: Vec<char> = identifier.chars().collect();
    let mut out = String::with_capacity(identifier.len() + 4);

    for (i, &ch) in chars.iter().enumerate() {
        if ch.is_ascii_alphanumeric() {
            if ch.is_ascii_uppercase() {
                let prev = i.checked_sub(1).map(|p| chars[p]);
                let next = chars.get(i + 1).copied();
                // Word boundary: `aB`, `1B`, or the last capital of an acronym (`HTTPServer` -> `http_server`).
                let boundary = match prev {
                    Some(p) if p.is_ascii_lowercase() || p.is_ascii_digit() => true,
                    Some(p) if p.is_ascii_uppercase() => next.is_some_and(|n| n.is_ascii_lowercase()),
                    _ => false,
                };
                if boundary && !out.ends_with('_') && !out.is_empty() {
                    out.push('_');
                }
                out.push(ch.to_ascii_lowercase());
            } else {
                out.push(ch);
            }
        } else if !out.ends_with('_') && !out.is_empty() {
            out.push('_');
        }
    }

    while out.ends_with('_') {
        out.pop();
    }
    out
}
