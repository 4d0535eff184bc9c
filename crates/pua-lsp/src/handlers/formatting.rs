//! Whole-document formatting handler.

use lsp_types::{Position, Range, TextEdit};
use pua_syntax::format_source;

/// Handle a document formatting request.
///
/// Returns a single edit replacing the entire document, even if nothing
/// changes. The end position lies one line past the last line so that the
/// final line is always covered.
pub fn handle_formatting(source: &str) -> Vec<TextEdit> {
    let line_count = source.lines().count() as u32;
    vec![TextEdit {
        range: Range {
            start: Position::new(0, 0),
            end: Position::new(line_count + 1, 0),
        },
        new_text: format_source(source),
    }]
}
