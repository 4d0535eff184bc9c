//! Shared utility functions for LSP handlers.
//!
//! Conversions from `pua-syntax` positions to protocol types. Columns stay
//! character based on both sides.

use lsp_types::{Position, Range};
use pua_syntax::{LineRange, Symbol};

/// Convert a lint range to a protocol range.
pub fn to_lsp_range(range: LineRange) -> Range {
    Range {
        start: Position::new(range.start.line, range.start.col),
        end: Position::new(range.end.line, range.end.col),
    }
}

/// Range covering a symbol's name on its declaration line.
pub fn symbol_name_range(symbol: &Symbol) -> Range {
    Range {
        start: Position::new(symbol.line, symbol.col),
        end: Position::new(symbol.line, symbol.end_col()),
    }
}
