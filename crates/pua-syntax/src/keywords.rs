//! Reserved words and block-header detection.

use once_cell::sync::Lazy;
use regex::Regex;

/// File extension of pua source files (without the dot).
pub const FILE_EXTENSION: &str = "pua";

/// Every reserved word of the language.
pub const KEYWORDS: &[&str] = &[
    "if", "elif", "else", "while", "for", "in", "break", "continue", "yield", "with", "as", "try",
    "except", "finally", "local", "global", "import", "from", "fn", "return", "del", "throw",
    "print", "gc", "and", "or", "not", "has", "true", "false", "nil",
];

/// Keywords that open a block and must be followed by a more-indented line.
pub const BLOCK_KEYWORDS: &[&str] = &[
    "if", "elif", "else", "while", "for", "with", "try", "except", "finally", "fn",
];

static HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    let alternation = BLOCK_KEYWORDS.join("|");
    Regex::new(&format!(r"^(?:{alternation})\b")).expect("block keyword pattern is valid")
});

/// Check whether a line (leading whitespace already stripped) starts a block.
///
/// The keyword must be a whole word: `if(x)` is a header, `iffy = 1` is not.
pub fn is_block_header(stripped: &str) -> bool {
    HEADER_RE.is_match(stripped)
}
