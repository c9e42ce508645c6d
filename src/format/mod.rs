//! Markdown normalization for backend responses
//!
//! Backends return markdown of wildly varying hygiene: fences without
//! language tags, blank padding inside code blocks, headings jammed against
//! paragraphs. [`format_response`] normalizes all of it with a fixed-order
//! pipeline:
//!
//! 1. Fenced code blocks: missing language tag becomes `text`, enclosed code
//!    is trimmed of leading/trailing blank lines.
//! 2. Inline code spans outside fences: interior whitespace trimmed.
//! 3. Headings get exactly one blank line on each side.
//! 4. List items get a separating blank line before the marker.
//! 5. Blockquote lines get one blank line on each side.
//! 6. Runs of three or more newlines collapse to two.
//! 7. The result is trimmed.
//!
//! The pipeline is idempotent: running it on its own output is a no-op.
//! Malformed markdown (an unmatched fence, say) degrades gracefully; this
//! function never fails.

use regex::Regex;

/// Normalize raw backend text into clean markdown.
///
/// Empty input yields an empty string.
pub fn format_response(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    // Strip leading whitespace up front: the final trim would otherwise
    // expose a marker (`>`, `#`, `-`) at the start of the first line that
    // the line rules never saw, and a second run would classify it.
    let raw = raw.trim_start();

    let fence_re = match Regex::new(r"(?s)```(\w+)?\n(.*?)```") {
        Ok(re) => re,
        Err(e) => {
            tracing::warn!("[Format] Failed to compile fence regex: {}", e);
            return raw.trim().to_string();
        }
    };

    // Split into fenced and prose segments so the prose rules never touch
    // code. Text after an unmatched opening fence stays prose.
    let mut out = String::new();
    let mut last_end = 0;
    for caps in fence_re.captures_iter(raw) {
        let Some(whole) = caps.get(0) else { continue };
        out.push_str(&format_prose(&raw[last_end..whole.start()]));

        let language = caps.get(1).map(|m| m.as_str()).unwrap_or("text");
        let code = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        out.push_str(&format!("```{}\n{}\n```", language, trim_blank_lines(code)));

        last_end = whole.end();
    }
    out.push_str(&format_prose(&raw[last_end..]));

    collapse_newline_runs(&out).trim().to_string()
}

/// Drop leading and trailing blank lines from fenced code, preserving
/// interior blank lines and the indentation of every remaining line.
fn trim_blank_lines(code: &str) -> String {
    let lines: Vec<&str> = code.split('\n').collect();
    let start = lines
        .iter()
        .position(|l| !l.trim().is_empty())
        .unwrap_or(lines.len());
    let end = lines
        .iter()
        .rposition(|l| !l.trim().is_empty())
        .map(|i| i + 1)
        .unwrap_or(start);
    lines[start..end].join("\n")
}

/// Apply the prose rules (inline spans, heading/list/blockquote spacing) to
/// a segment that contains no fenced code.
fn format_prose(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let text = trim_inline_spans(text);

    let mut out: Vec<String> = Vec::new();
    for line in text.split('\n') {
        if is_heading(line) || is_blockquote(line) {
            ensure_blank_separator(&mut out);
            out.push(line.to_string());
            out.push(String::new());
        } else if is_list_item(line) {
            ensure_blank_separator(&mut out);
            out.push(line.to_string());
        } else {
            out.push(line.to_string());
        }
    }
    out.join("\n")
}

/// Trim interior whitespace inside single-backtick code spans.
///
/// Spans touching another backtick are left alone (they belong to a
/// double-backtick delimiter, not a span), as are spans whose interior is
/// all whitespace: collapsing one to ```` `` ```` would create a new
/// delimiter and re-pair the remaining backticks on the next run.
fn trim_inline_spans(text: &str) -> String {
    let span_re = match Regex::new(r"`([^`\n]+)`") {
        Ok(re) => re,
        Err(e) => {
            tracing::warn!("[Format] Failed to compile inline span regex: {}", e);
            return text.to_string();
        }
    };

    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut last_end = 0;
    for caps in span_re.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };

        let backtick_before = whole.start() > 0 && bytes[whole.start() - 1] == b'`';
        let backtick_after = bytes.get(whole.end()) == Some(&b'`');
        let trimmed = caps[1].trim();

        out.push_str(&text[last_end..whole.start()]);
        if backtick_before || backtick_after || trimmed.is_empty() {
            out.push_str(whole.as_str());
        } else {
            out.push('`');
            out.push_str(trimmed);
            out.push('`');
        }
        last_end = whole.end();
    }
    out.push_str(&text[last_end..]);
    out
}

/// Push an empty line unless the previous line is already blank (or the
/// segment starts here).
fn ensure_blank_separator(out: &mut Vec<String>) {
    if out.last().is_some_and(|l| !l.is_empty()) {
        out.push(String::new());
    }
}

/// A markdown heading: one to six `#` characters followed by whitespace.
fn is_heading(line: &str) -> bool {
    let hashes = line.chars().take_while(|&c| c == '#').count();
    (1..=6).contains(&hashes)
        && line[hashes..]
            .chars()
            .next()
            .is_some_and(|c| c.is_whitespace())
}

fn is_blockquote(line: &str) -> bool {
    line.starts_with('>')
}

/// A list item at column zero: `-`, `*`, `+`, or a decimal ordinal like
/// `12.`, each followed by whitespace.
fn is_list_item(line: &str) -> bool {
    if let Some(rest) = line
        .strip_prefix('-')
        .or_else(|| line.strip_prefix('*'))
        .or_else(|| line.strip_prefix('+'))
    {
        return rest.chars().next().is_some_and(|c| c.is_whitespace());
    }

    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    digits > 0
        && line[digits..].starts_with('.')
        && line[digits + 1..]
            .chars()
            .next()
            .is_some_and(|c| c.is_whitespace())
}

/// Collapse runs of three or more newlines down to exactly two.
fn collapse_newline_runs(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut newlines = 0;
    for c in text.chars() {
        if c == '\n' {
            newlines += 1;
            if newlines <= 2 {
                out.push(c);
            }
        } else {
            newlines = 0;
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_idempotent(input: &str) {
        let once = format_response(input);
        assert_eq!(format_response(&once), once, "not idempotent for {input:?}");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(format_response(""), "");
    }

    #[test]
    fn test_fence_language_defaults_to_text() {
        assert_eq!(
            format_response("```\nlet x = 1;\n```"),
            "```text\nlet x = 1;\n```"
        );
    }

    #[test]
    fn test_fence_language_preserved() {
        assert_eq!(
            format_response("```rust\nlet x = 1;\n```"),
            "```rust\nlet x = 1;\n```"
        );
    }

    #[test]
    fn test_trailing_blank_lines_inside_fence_trimmed() {
        assert_eq!(
            format_response("```js\nconst x=1;\n\n\n```"),
            "```js\nconst x=1;\n```"
        );
    }

    #[test]
    fn test_interior_blank_line_and_indentation_kept() {
        let input = "```python\n\ndef f():\n    pass\n\n\ndef g():\n    pass\n\n```";
        // Edge blanks go; the interior run is collapsed to one blank line by
        // the newline-run rule; indentation is untouched.
        assert_eq!(
            format_response(input),
            "```python\ndef f():\n    pass\n\ndef g():\n    pass\n```"
        );
    }

    #[test]
    fn test_inline_span_whitespace_trimmed() {
        assert_eq!(
            format_response("Use ` cargo build ` to compile."),
            "Use `cargo build` to compile."
        );
    }

    #[test]
    fn test_inline_span_inside_fence_untouched() {
        let input = "```md\nUse ` spaced ` here\n```";
        assert_eq!(format_response(input), "```md\nUse ` spaced ` here\n```");
    }

    #[test]
    fn test_heading_gets_blank_lines() {
        assert_eq!(
            format_response("intro\n## Section\nbody"),
            "intro\n\n## Section\n\nbody"
        );
    }

    #[test]
    fn test_hash_without_space_is_not_heading() {
        assert_eq!(format_response("a\n#tag\nb"), "a\n#tag\nb");
    }

    #[test]
    fn test_list_items_separated() {
        assert_eq!(
            format_response("Options:\n- first\n- second"),
            "Options:\n\n- first\n\n- second"
        );
    }

    #[test]
    fn test_ordered_list_marker() {
        assert_eq!(format_response("Steps:\n1. go\n2. stop"), "Steps:\n\n1. go\n\n2. stop");
    }

    #[test]
    fn test_blockquote_surrounded() {
        assert_eq!(
            format_response("said:\n> quoted\nafter"),
            "said:\n\n> quoted\n\nafter"
        );
    }

    #[test]
    fn test_newline_runs_collapsed() {
        assert_eq!(format_response("a\n\n\n\n\nb"), "a\n\nb");
    }

    #[test]
    fn test_result_trimmed() {
        assert_eq!(format_response("  \n\nhello\n\n  "), "hello");
    }

    #[test]
    fn test_unmatched_fence_degrades_to_prose() {
        let input = "before\n```rust\nlet x = 1;";
        let output = format_response(input);
        assert!(output.contains("```rust"));
        assert!(output.contains("let x = 1;"));
    }

    #[test]
    fn test_leading_whitespace_marker_classified_on_first_run() {
        // The trimmed first line is a blockquote; it must get its blank line
        // on the first pass, not the second.
        assert_eq!(format_response(" > q\nafter"), "> q\n\nafter");
        assert_idempotent(" > q\nafter");
        assert_eq!(format_response("  # Title\nbody"), "# Title\n\nbody");
        assert_idempotent("\n\n- item\ntext");
    }

    #[test]
    fn test_whitespace_only_span_left_verbatim() {
        // Collapsing ` ` to `` would mint a double-backtick delimiter that
        // pairs with a later lone backtick.
        assert_eq!(format_response("x `\t` +x1a`"), "x `\t` +x1a`");
        assert_idempotent("x `\t` +x1a`\r");
        assert_idempotent("a ` ` b ` c ` d`");
    }

    #[test]
    fn test_span_adjacent_to_backtick_left_verbatim() {
        assert_eq!(format_response("see `` a `` here"), "see `` a `` here");
        assert_idempotent("see `` a `` here");
        assert_eq!(format_response("`a``b`"), "`a``b`");
    }

    #[test]
    fn test_idempotent_on_varied_inputs() {
        let samples = [
            "",
            "plain text",
            "# Title\nbody\n- a\n- b\n\n```py\n\nx = 1\n\n```\ntail",
            "```\ncode\n```",
            "> q1\n> q2\nafter ` span ` end",
            "### deep\n\n\n\n1. one\n2. two\n```js\nlet a;\n\n\n```\n\n\n#### done",
            "broken ``` fence\nstill fine",
            "`a`  `  b  `\n* star item\n+ plus item",
            "   ## padded heading\nbody",
            " \t* item after pure whitespace",
            "`` ` `` doc about a backtick",
            "lone ` backtick and ` span ` after",
        ];
        for sample in samples {
            assert_idempotent(sample);
        }
    }

    #[test]
    fn test_mixed_document_stable_shape() {
        let input = "Intro\n## Usage\n```\ncargo run\n\n```\nNotes:\n- fast\n- small";
        let expected = "Intro\n\n## Usage\n\n```text\ncargo run\n```\nNotes:\n\n- fast\n\n- small";
        assert_eq!(format_response(input), expected);
        assert_idempotent(input);
    }
}
