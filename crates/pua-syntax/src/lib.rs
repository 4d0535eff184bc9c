//! Heuristic source analysis for the pua scripting language.
//!
//! This crate holds the pure, protocol-agnostic passes used by the language
//! server. Nothing here builds a syntax tree: every pass is a line-by-line
//! or character-by-character scan, trading precision for speed.
//!
//! # Features
//!
//! - Symbol extraction (function and variable declaration sites)
//! - Lint passes (whitespace, block headers, bracket/string balance)
//! - Indentation-normalizing formatter
//!
//! # Example
//!
//! ```
//! use pua_syntax::{collect_symbols, format_source, lint, SymbolKind};
//!
//! let source = "fn add(a, b)\n    return a + b\n";
//!
//! let symbols = collect_symbols(source);
//! assert_eq!(symbols.len(), 1);
//! assert_eq!(symbols[0].kind, SymbolKind::Function);
//!
//! assert!(lint(source).is_empty());
//! assert_eq!(format_source(source), "fn add(a, b)\n  return a + b\n");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod format;
mod keywords;
mod lint;
mod symbols;
pub mod text;

pub use format::{format_source, update_fence_state, FENCE_CLOSE, FENCE_OPEN};
pub use keywords::{is_block_header, BLOCK_KEYWORDS, FILE_EXTENSION, KEYWORDS};
pub use lint::{
    check_block_headers, check_brackets, check_whitespace, lint, LineCol, LineRange, Lint,
    LintKind, Severity,
};
pub use symbols::{collect_symbols, Symbol, SymbolKind};
