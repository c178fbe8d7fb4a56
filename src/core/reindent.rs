//! Multi-line payload reindentation.
//!
//! A decoded credential payload (typically a JSON document) gets embedded
//! verbatim inside a YAML literal block scalar. The block scalar's own
//! indentation already covers the first line, so only interior and final
//! lines need a prefix: interior lines sit one level deeper than the
//! final line, which aligns with the enclosing structure's closing level.

/// Reflow `text` for embedding at the given indentation levels.
///
/// A single-line input is returned unchanged. For multi-line input the
/// first line is left as-is, interior lines are prefixed with
/// `middle_indent` spaces, and the last line with `last_indent` spaces.
pub fn reindent(text: &str, middle_indent: usize, last_indent: usize) -> String {
    let lines: Vec<&str> = text.lines().collect();
    if lines.len() <= 1 {
        return lines.first().copied().unwrap_or_default().to_string();
    }

    let middle = " ".repeat(middle_indent);
    let last = " ".repeat(last_indent);
    let mut out = String::with_capacity(text.len() + lines.len() * middle_indent);

    for (i, line) in lines.iter().enumerate() {
        if i == 0 {
            out.push_str(line);
        } else if i == lines.len() - 1 {
            out.push('\n');
            out.push_str(&last);
            out.push_str(line);
        } else {
            out.push('\n');
            out.push_str(&middle);
            out.push_str(line);
        }
    }

    out
}
