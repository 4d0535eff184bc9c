//! Small text helpers shared by the passes.
//!
//! All columns are counted in characters (Unicode scalar values), not bytes
//! and not UTF-16 code units.

use once_cell::sync::Lazy;
use regex::Regex;

static WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z_][A-Za-z0-9_]*").expect("word pattern is valid"));

/// Number of characters in `s`.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Convert a byte offset inside `line` to a character column.
pub fn char_column(line: &str, byte_offset: usize) -> usize {
    line[..byte_offset].chars().count()
}

/// Number of leading whitespace characters (any Unicode whitespace).
pub fn indent_len(line: &str) -> usize {
    char_len(line) - char_len(line.trim_start())
}

/// Visual indentation width: one per leading space, four per leading tab.
///
/// Stops at the first character that is neither.
pub fn indent_width(line: &str) -> usize {
    line.chars()
        .map_while(|ch| match ch {
            ' ' => Some(1),
            '\t' => Some(4),
            _ => None,
        })
        .sum()
}

/// Find the identifier on `line` whose span contains `col`.
///
/// The end of a word counts as inside it, so a cursor placed right after
/// `foo` still selects `foo`. Returns the word and its start/end columns.
pub fn word_at(line: &str, col: usize) -> Option<(&str, usize, usize)> {
    WORD_RE.find_iter(line).find_map(|m| {
        let start = char_column(line, m.start());
        let end = start + char_len(m.as_str());
        (start <= col && col <= end).then_some((m.as_str(), start, end))
    })
}
