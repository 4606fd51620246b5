//! Front-matter block detection and boundary handling.

use super::lines::normalize_front_matter_lines;
use crate::model::notebook::{CellType, Notebook};
use log::debug;

/// Number of leading lines searched for `title:` during detection.
pub const TITLE_SCAN_LINES: usize = 3;
/// Size of the candidate region when the block has no `---` opener.
pub const HEAD_SCAN_LINES: usize = 6;

const DELIMITER: &str = "---";
const TITLE_MARKER: &str = "title:";

/// Returns whether `source` looks like it opens with front matter.
///
/// True when the left-trimmed text starts with `---`, or when `title:`
/// appears in any of the first [`TITLE_SCAN_LINES`] lines.
pub fn has_front_matter(source: &str) -> bool {
    source.trim_start().starts_with(DELIMITER)
        || split_lines(source)
            .into_iter()
            .take(TITLE_SCAN_LINES)
            .any(|line| line.contains(TITLE_MARKER))
}

/// Rewrites the front-matter region of a first-cell source.
///
/// - `---` opener with a closing `---`: only the lines in between are
///   normalized; a trailing newline on the input is preserved.
/// - `---` opener without a closer: every line is normalized and no closing
///   delimiter is synthesized.
/// - no opener: only the first [`HEAD_SCAN_LINES`] lines are normalized.
pub fn normalize_front_matter_source(source: &str) -> String {
    let lines = split_lines(source);

    let opens_with_delimiter = lines.first().is_some_and(|line| line.trim() == DELIMITER);
    if !opens_with_delimiter {
        let split = lines.len().min(HEAD_SCAN_LINES);
        let mut out = normalize_front_matter_lines(&lines[..split]);
        out.extend(lines[split..].iter().map(|line| line.to_string()));
        return out.join("\n");
    }

    let closing = lines
        .iter()
        .skip(1)
        .position(|line| *line == DELIMITER)
        .map(|offset| offset + 1);

    match closing {
        Some(end) => {
            let mut out = Vec::with_capacity(lines.len());
            out.push(DELIMITER.to_string());
            out.extend(normalize_front_matter_lines(&lines[1..end]));
            out.push(DELIMITER.to_string());
            out.extend(lines[end + 1..].iter().map(|line| line.to_string()));

            let mut text = out.join("\n");
            if source.ends_with('\n') {
                text.push('\n');
            }
            text
        }
        None => normalize_front_matter_lines(&lines).join("\n"),
    }
}

/// Splits `text` into lines without their terminators.
///
/// Breaks on `\n`, `\r\n`, a lone `\r`, `\x0b`, `\x0c`, `\x1c`..`\x1e`,
/// `\u{85}`, `\u{2028}` and `\u{2029}`. A trailing terminator does not
/// produce an empty last line.
fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((index, ch)) = chars.next() {
        if !is_line_break(ch) {
            continue;
        }
        lines.push(&text[start..index]);
        start = index + ch.len_utf8();
        if ch == '\r' {
            if let Some(&(next, '\n')) = chars.peek() {
                chars.next();
                start = next + 1;
            }
        }
    }
    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}

fn is_line_break(ch: char) -> bool {
    matches!(
        ch,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Detects and normalizes front matter in the notebook's first cell.
///
/// Returns whether the notebook changed. Retagging the cell as markdown is a
/// change on its own; a rewrite that reproduces the same text is not.
pub fn normalize_first_cell(notebook: &mut Notebook) -> bool {
    let Some(first) = notebook.cells.first_mut() else {
        return false;
    };

    let text = first.source.text();
    if !has_front_matter(&text) {
        return false;
    }

    let mut changed = false;
    if first.cell_type != CellType::Markdown {
        debug!(
            "event=front_matter_retag module=frontmatter status=ok from={:?}",
            first.cell_type
        );
        first.cell_type = CellType::Markdown;
        changed = true;
    }

    let normalized = normalize_front_matter_source(&text);
    if normalized != text {
        first.source.replace_text(normalized);
        changed = true;
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::{has_front_matter, normalize_front_matter_source, split_lines};

    #[test]
    fn detects_delimiter_after_leading_whitespace() {
        assert!(has_front_matter("\n  ---\ntitle: x\n---"));
        assert!(has_front_matter("----"));
    }

    #[test]
    fn detects_title_in_first_three_lines_only() {
        assert!(has_front_matter("# Heading\n\nsubtitle: ok"));
        assert!(!has_front_matter("a\nb\nc\ntitle: late"));
        assert!(!has_front_matter("print('hello')"));
        assert!(!has_front_matter(""));
    }

    #[test]
    fn closed_block_keeps_body_and_trailing_newline() {
        let source = "---\ntitle: A: B\nlayout: post\n---\nbody: text\n";
        assert_eq!(
            normalize_front_matter_source(source),
            "---\ntitle: \"A: B\"\nlayout: post\n---\nbody: text\n"
        );
    }

    #[test]
    fn closed_block_without_trailing_newline() {
        let source = "---\ncomments: YES\n---";
        assert_eq!(normalize_front_matter_source(source), "---\ncomments: true\n---");
    }

    #[test]
    fn opener_is_canonicalized_when_padded() {
        let source = "--- \ntitle: x\n---\n";
        assert_eq!(normalize_front_matter_source(source), "---\ntitle: x\n---\n");
    }

    #[test]
    fn unclosed_block_normalizes_every_line() {
        let source = "---\ntitle: X\nnote: a: b\n";
        assert_eq!(
            normalize_front_matter_source(source),
            "---\ntitle: X\nnote: \"a: b\""
        );
    }

    #[test]
    fn headless_block_limits_rewrite_to_first_lines() {
        let source = "title: A: B\n1\n2\n3\n4\n5\nlate: c: d";
        assert_eq!(
            normalize_front_matter_source(source),
            "title: \"A: B\"\n1\n2\n3\n4\n5\nlate: c: d"
        );
    }

    #[test]
    fn split_lines_handles_every_terminator() {
        assert_eq!(split_lines(""), Vec::<&str>::new());
        assert_eq!(split_lines("a\n"), vec!["a"]);
        assert_eq!(split_lines("a\n\n"), vec!["a", ""]);
        assert_eq!(split_lines("a\r\nb\rc\nd"), vec!["a", "b", "c", "d"]);
        assert_eq!(split_lines("a\u{2028}b\x0cc"), vec!["a", "b", "c"]);
        assert_eq!(split_lines("\r\n"), vec![""]);
    }

    #[test]
    fn classic_mac_line_endings_are_normalized() {
        let source = "---\rtitle: A: B\r---\rbody";
        assert!(has_front_matter(source));
        assert_eq!(
            normalize_front_matter_source(source),
            "---\ntitle: \"A: B\"\n---\nbody"
        );
    }

    #[test]
    fn title_detection_counts_carriage_return_lines() {
        assert!(!has_front_matter("a\rb\rc\rtitle: late"));
        assert!(has_front_matter("a\rtitle: early"));
    }
}
