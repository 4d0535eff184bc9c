//! Lint passes over raw source text.
//!
//! Three independent passes, each a pure function of the text:
//!
//! - [`check_whitespace`]: tabs and odd indentation
//! - [`check_block_headers`]: block headers must be followed by a deeper line
//! - [`check_brackets`]: bracket balance, skipping quoted strings
//!
//! [`lint`] runs all three and concatenates their findings.

use std::fmt;

use crate::keywords::is_block_header;
use crate::text::{char_len, indent_len};

/// Severity of a lint finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Definitely wrong.
    Error,
    /// Style problem.
    Warning,
}

impl Severity {
    /// Numeric code as used on the wire (error = 1, warning = 2).
    pub const fn code(self) -> u32 {
        match self {
            Self::Error => 1,
            Self::Warning => 2,
        }
    }
}

/// A 0-based line and character column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineCol {
    /// 0-based line.
    pub line: u32,
    /// 0-based character column.
    pub col: u32,
}

impl LineCol {
    /// Create a new position.
    pub const fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }
}

/// A half-open range between two positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineRange {
    /// Inclusive start.
    pub start: LineCol,
    /// Exclusive end.
    pub end: LineCol,
}

impl LineRange {
    /// A range within a single line.
    pub const fn on_line(line: u32, start_col: u32, end_col: u32) -> Self {
        Self {
            start: LineCol::new(line, start_col),
            end: LineCol::new(line, end_col),
        }
    }
}

/// What a lint finding is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintKind {
    /// A tab character somewhere on the line.
    TabIndentation,
    /// Leading spaces not a multiple of two.
    OddIndentation,
    /// The next non-blank line after a header is not indented deeper.
    ExpectedIndentedBlock,
    /// A header is the last non-blank line of the file.
    HeaderWithoutBlock,
    /// A closing bracket that does not match the innermost open one.
    UnmatchedClosing(char),
    /// An opening bracket never closed.
    Unclosed(char),
}

impl LintKind {
    /// Severity attached to this kind of finding.
    pub const fn severity(self) -> Severity {
        match self {
            Self::TabIndentation | Self::OddIndentation => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for LintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TabIndentation => write!(f, "Tab indentation detected; use 2 spaces."),
            Self::OddIndentation => write!(f, "Indentation should be a multiple of 2 spaces."),
            Self::ExpectedIndentedBlock => {
                write!(f, "Expected an indented block after this header.")
            }
            Self::HeaderWithoutBlock => write!(f, "Header without following block."),
            Self::UnmatchedClosing(ch) => write!(f, "Unmatched closing '{ch}'."),
            Self::Unclosed(ch) => write!(f, "Unclosed '{ch}'."),
        }
    }
}

/// A single lint finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lint {
    /// What was found.
    pub kind: LintKind,
    /// Where it was found.
    pub range: LineRange,
}

impl Lint {
    const fn new(kind: LintKind, range: LineRange) -> Self {
        Self { kind, range }
    }

    /// Severity of this finding.
    pub const fn severity(&self) -> Severity {
        self.kind.severity()
    }

    /// Human-readable message.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

/// Run every lint pass over `source`.
pub fn lint(source: &str) -> Vec<Lint> {
    let mut lints = check_whitespace(source);
    lints.extend(check_block_headers(source));
    lints.extend(check_brackets(source));
    lints
}

/// Flag tab characters and odd indentation.
///
/// A line containing a tab gets one warning covering the whole line and is
/// not checked further. Whitespace-only lines are ignored.
pub fn check_whitespace(source: &str) -> Vec<Lint> {
    let mut lints = Vec::new();

    for (line_num, line) in source.lines().enumerate() {
        let line_num = line_num as u32;

        if line.contains('\t') {
            let end = char_len(line).max(1) as u32;
            lints.push(Lint::new(
                LintKind::TabIndentation,
                LineRange::on_line(line_num, 0, end),
            ));
            continue;
        }

        let rest = line.trim_start_matches(' ');
        if rest.is_empty() {
            continue;
        }
        // Spaces are single-byte, so the byte difference is the column.
        let indent = line.len() - rest.len();
        if indent % 2 != 0 {
            lints.push(Lint::new(
                LintKind::OddIndentation,
                LineRange::on_line(line_num, 0, indent as u32),
            ));
        }
    }

    lints
}

/// Require a deeper-indented line after every block header.
pub fn check_block_headers(source: &str) -> Vec<Lint> {
    let lines: Vec<&str> = source.lines().collect();
    let mut lints = Vec::new();

    for (line_num, line) in lines.iter().enumerate() {
        if !is_block_header(line.trim_start()) {
            continue;
        }

        let header_indent = indent_len(line);
        let range = LineRange::on_line(line_num as u32, 0, char_len(line) as u32);

        let next = lines[line_num + 1..]
            .iter()
            .find(|next| !next.trim_start().is_empty());

        match next {
            None => lints.push(Lint::new(LintKind::HeaderWithoutBlock, range)),
            Some(next) if indent_len(next) <= header_indent => {
                lints.push(Lint::new(LintKind::ExpectedIndentedBlock, range));
            }
            Some(_) => {}
        }
    }

    lints
}

const fn opener_for(closer: char) -> Option<char> {
    match closer {
        ')' => Some('('),
        ']' => Some('['),
        '}' => Some('{'),
        _ => None,
    }
}

/// Check bracket balance, ignoring brackets inside quoted strings.
///
/// Strings open with `'` or `"` and close at the next unescaped matching
/// quote. String state carries over line breaks.
pub fn check_brackets(source: &str) -> Vec<Lint> {
    let mut lints = Vec::new();
    let mut stack: Vec<(char, u32, u32)> = Vec::new();
    let mut in_string: Option<char> = None;
    let mut escaped = false;

    for (line_num, line) in source.lines().enumerate() {
        let line_num = line_num as u32;

        for (col, ch) in line.chars().enumerate() {
            let col = col as u32;

            if let Some(quote) = in_string {
                if escaped {
                    escaped = false;
                } else if ch == '\\' {
                    escaped = true;
                } else if ch == quote {
                    in_string = None;
                }
                continue;
            }

            match ch {
                '"' | '\'' => in_string = Some(ch),
                '(' | '[' | '{' => stack.push((ch, line_num, col)),
                ')' | ']' | '}' => {
                    let expected = opener_for(ch);
                    if stack.last().map(|&(open, _, _)| open) == expected {
                        stack.pop();
                    } else {
                        lints.push(Lint::new(
                            LintKind::UnmatchedClosing(ch),
                            LineRange::on_line(line_num, col, col + 1),
                        ));
                    }
                }
                _ => {}
            }
        }
    }

    lints.extend(stack.into_iter().map(|(open, line, col)| {
        Lint::new(LintKind::Unclosed(open), LineRange::on_line(line, col, col + 1))
    }));

    lints
}
