//! Per-line front-matter rewriting.

use super::quote::quote_value;
use once_cell::sync::Lazy;
use regex::Regex;

static FRONT_MATTER_KEY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<key>[A-Za-z0-9_\-]+):\s*(?P<value>.*)$").expect("valid front matter regex")
});

const COMMENTS_KEY: &str = "comments";
const QUOTED_KEYS: &[&str] = &["title", "description"];

/// Normalizes every line of a front-matter region.
///
/// The output always has the same number of lines as the input.
pub fn normalize_front_matter_lines<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    lines
        .iter()
        .map(|line| normalize_front_matter_line(line.as_ref()))
        .collect()
}

/// Normalizes one `key: value` line; other lines are returned unchanged.
pub fn normalize_front_matter_line(line: &str) -> String {
    let Some(caps) = FRONT_MATTER_KEY_RE.captures(line) else {
        return line.to_string();
    };
    let key = &caps["key"];
    let value = &caps["value"];

    if key.eq_ignore_ascii_case(COMMENTS_KEY) {
        return format!("{key}: {}", coerce_comments_flag(value));
    }

    let quoted_key = QUOTED_KEYS
        .iter()
        .any(|candidate| key.eq_ignore_ascii_case(candidate));
    if quoted_key || value.contains(':') {
        return format!("{key}: {}", quote_value(value));
    }

    line.to_string()
}

/// Coerces a `comments` value to a lowercase boolean.
///
/// Anything other than `true`/`false` (in any casing) becomes `true`.
pub fn coerce_comments_flag(value: &str) -> &'static str {
    match value.trim().to_lowercase().as_str() {
        "false" => "false",
        _ => "true",
    }
}
