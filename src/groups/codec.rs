//! Decoding and re-encoding of the `groups = ...` clause of a marker annotation.
//!
//! Two textual forms are recognized:
//!
//! - bracket list: `groups = {"smoke", "fast"}`
//! - single quoted: `groups = "smoke"`
//!
//! Everything outside the matched clause is treated as opaque text and kept
//! byte-for-byte on rewrite. Nested braces, `}` inside a group name and
//! clauses spanning several lines are not supported.

use std::sync::LazyLock;

use regex_lite::{Match, Regex};

use crate::error::GroupError;

/// Bracket list form, greedy up to the last `}` on the line.
static BRACKET_LIST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"groups\s*=\s*\{.*\}").expect("Invalid regex"));

/// Single quoted form. The value may not contain `)` or `,`.
static SINGLE_QUOTED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"groups\s*=\s*"[^),]*""#).expect("Invalid regex"));

/// Textual form of a groups clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupEncodingForm {
    /// `groups = {"a", "b"}`
    BracketList,
    /// `groups = "a"`
    SingleQuoted,
}

/// Report which groups form a line uses, bracket list taking precedence.
pub fn detect_form(text: &str) -> Option<GroupEncodingForm> {
    if BRACKET_LIST_RE.is_match(text) {
        Some(GroupEncodingForm::BracketList)
    } else if SINGLE_QUOTED_RE.is_match(text) {
        Some(GroupEncodingForm::SingleQuoted)
    } else {
        None
    }
}

/// Extract the ordered group list from a marker annotation.
///
/// Entries keep their written order. Duplicates and empty entries are kept
/// as they are.
pub fn decode_groups(text: &str) -> Result<Vec<String>, GroupError> {
    if let Some(m) = BRACKET_LIST_RE.find(text) {
        let (open, close) = brace_span(&m);
        let inner = &text[open + 1..close - 1];
        return Ok(inner
            .split(',')
            .map(|piece| piece.trim().replace('"', ""))
            .collect());
    }

    if let Some(m) = SINGLE_QUOTED_RE.find(text) {
        let clause = m.as_str();
        // The pattern guarantees at least two quotes in the clause.
        let first = clause.find('"').unwrap_or(0);
        let last = clause.rfind('"').unwrap_or(clause.len());
        let value = clause.get(first + 1..last).unwrap_or_default();
        return Ok(vec![value.replace('"', "")]);
    }

    Err(GroupError::Parse(text.to_string()))
}

/// Rewrite the groups clause of `line` to hold `groups`.
///
/// A bracket list keeps everything outside its braces. A single quoted clause
/// is replaced as a whole by a bracket list clause.
pub fn encode_groups(line: &str, groups: &[String]) -> Result<String, GroupError> {
    if let Some(m) = BRACKET_LIST_RE.find(line) {
        let (open, close) = brace_span(&m);
        let mut out = String::with_capacity(line.len());
        out.push_str(&line[..open]);
        out.push_str(&format_bracket_list(groups));
        out.push_str(&line[close..]);
        return Ok(out);
    }

    if let Some(m) = SINGLE_QUOTED_RE.find(line) {
        let mut out = String::with_capacity(line.len());
        out.push_str(&line[..m.start()]);
        out.push_str("groups = ");
        out.push_str(&format_bracket_list(groups));
        out.push_str(&line[m.end()..]);
        return Ok(out);
    }

    Err(GroupError::UnrecognizedForm(line.to_string()))
}

/// Format a group list as `{"a", "b"}`.
pub fn format_bracket_list(groups: &[String]) -> String {
    let quoted: Vec<String> = groups.iter().map(|g| format!("\"{}\"", g)).collect();
    format!("{{{}}}", quoted.join(", "))
}

/// Replace the annotation text of a line, keeping its indentation and line
/// terminator.
///
/// Indentation is everything before the first occurrence of `marker` (or the
/// leading whitespace if the marker is gone). The terminator is everything
/// from the first `\r` or `\n`.
pub fn rewrite_annotation_line(line: &str, new_annotation: &str, marker: &str) -> String {
    let leading = match line.find(marker) {
        Some(idx) => &line[..idx],
        None => {
            let trimmed = line.trim_start();
            &line[..line.len() - trimmed.len()]
        }
    };
    let trailing = line
        .find(['\r', '\n'])
        .map(|idx| &line[idx..])
        .unwrap_or("");

    format!("{}{}{}", leading, new_annotation, trailing)
}

/// Absolute byte offsets of the opening `{` and one past the closing `}`
/// of a bracket list match.
fn brace_span(m: &Match<'_>) -> (usize, usize) {
    let open = m.as_str().find('{').unwrap_or(0);
    (m.start() + open, m.end())
}
