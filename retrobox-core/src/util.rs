use std::sync::LazyLock;

use regex::Regex;

static RE_FORBIDDEN_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[\\/:*?"<>|]"#).expect("static pattern"));
static RE_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static pattern"));

/// Literal some exports write instead of leaving a cell empty.
pub const NONE_LITERAL: &str = "None";

/// Derive a stable identifier from a display name.
///
/// Transliterates to ASCII, removes characters forbidden in file names,
/// trims, then collapses whitespace runs to `_`. The output is a fixed point:
/// `sanitize(sanitize(x)) == sanitize(x)`.
pub fn sanitize(name: &str) -> String {
    let ascii = deunicode::deunicode(name);
    let allowed = RE_FORBIDDEN_CHARS.replace_all(&ascii, "");
    RE_WHITESPACE.replace_all(allowed.trim(), "_").into_owned()
}

/// True for a missing identity key: absent, empty, or the literal `None`.
pub fn is_none_like(value: Option<&str>) -> bool {
    match value {
        None => true,
        Some(v) => v.is_empty() || v == NONE_LITERAL,
    }
}

/// Normalize a raw cell from a CSV source or database column.
///
/// Trims whitespace and surrounding quotes; empty cells and the `NULL`
/// marker become `None`.
pub fn normalize_cell(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_matches('"').trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("null") {
        None
    } else {
        Some(trimmed.to_string())
    }
}
