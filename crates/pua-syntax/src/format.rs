//! Indentation-normalizing formatter.
//!
//! Nesting levels are inferred from the visual indentation of each line and
//! re-emitted as two spaces per level. Lines inside a `[[ ... ]]` multi-line
//! string are copied through untouched.
//!
//! Formatting is idempotent: `format_source(&format_source(x)) == format_source(x)`.

use crate::text::indent_width;

/// Token opening a multi-line string.
pub const FENCE_OPEN: &str = "[[";

/// Token closing a multi-line string.
pub const FENCE_CLOSE: &str = "]]";

const INDENT_UNIT: &str = "  ";

/// Scan `line` left to right and return the fence state after it.
///
/// Outside a fence only [`FENCE_OPEN`] is recognized; inside only
/// [`FENCE_CLOSE`]. Matched tokens are consumed whole.
pub fn update_fence_state(line: &str, mut in_fence: bool) -> bool {
    // Both tokens are ASCII, so byte-wise matching never splits a character.
    let bytes = line.as_bytes();
    let mut i = 0;
    while i + 1 < bytes.len() {
        let pair = &bytes[i..i + 2];
        if !in_fence && pair == FENCE_OPEN.as_bytes() {
            in_fence = true;
            i += 2;
        } else if in_fence && pair == FENCE_CLOSE.as_bytes() {
            in_fence = false;
            i += 2;
        } else {
            i += 1;
        }
    }
    in_fence
}

/// Reformat a whole document.
///
/// The output ends with a newline exactly when the input does.
pub fn format_source(source: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut levels: Vec<usize> = vec![0];
    let mut in_fence = false;

    for raw in source.lines() {
        let line = raw.trim_end_matches('\r');

        if in_fence {
            out.push(line.to_string());
            in_fence = update_fence_state(line, in_fence);
            continue;
        }

        let content = line.trim_start();
        if content.is_empty() {
            out.push(String::new());
            continue;
        }

        let width = indent_width(line);
        let top = levels.last().copied().unwrap_or(0);
        if width > top {
            levels.push(width);
        } else {
            while levels.len() > 1 && levels.last().is_some_and(|&level| level > width) {
                levels.pop();
            }
        }

        let normalized = format!("{}{content}", INDENT_UNIT.repeat(levels.len() - 1));
        in_fence = update_fence_state(&normalized, in_fence);
        out.push(normalized);
    }

    let mut formatted = out.join("\n");
    if source.ends_with('\n') {
        formatted.push('\n');
    } else {
        // Unterminated whitespace-only lines were emptied; drop them
        let kept = formatted.trim_end_matches('\n').len();
        formatted.truncate(kept);
    }
    formatted
}
