//! Value quoting rule for front-matter scalars.

/// Returns the value to emit after `key: `.
///
/// Rules, applied to the trimmed value in order:
/// - already wrapped in matching `"` or `'` quotes: kept as-is.
/// - `true`/`false`/`null` in any casing: lowercased, unquoted.
/// - contains `:` or a newline, starts with `#`, or has edge spaces:
///   wrapped in double quotes with inner `"` escaped as `\"`.
/// - anything else: kept unquoted.
pub fn quote_value(raw: &str) -> String {
    let value = raw.trim();
    if is_quoted(value) {
        return value.to_string();
    }

    let lowered = value.to_lowercase();
    if matches!(lowered.as_str(), "true" | "false" | "null") {
        return lowered;
    }

    if needs_quotes(value) {
        return format!("\"{}\"", value.replace('"', "\\\""));
    }
    value.to_string()
}

fn is_quoted(value: &str) -> bool {
    value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\'')))
}

fn needs_quotes(value: &str) -> bool {
    value.contains(':')
        || value.starts_with(' ')
        || value.ends_with(' ')
        || value.contains('\n')
        || value.starts_with('#')
}
