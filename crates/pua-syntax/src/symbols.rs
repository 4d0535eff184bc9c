//! Declaration-site extraction.
//!
//! A single top-to-bottom pass over physical lines. Each line is tested
//! against two anchored patterns:
//!
//! - `fn <name>(` declares a function
//! - `<name> =` declares a variable
//!
//! This is pattern matching, not parsing. Declarations split across lines
//! are missed, and any line that merely starts like an assignment is
//! reported as one: `x == y` on its own line yields a variable `x`.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::text::{char_column, char_len};

static FUNC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*fn\s+([A-Za-z_][A-Za-z0-9_]*)\s*\(").expect("function pattern is valid")
});

static ASSIGN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([A-Za-z_][A-Za-z0-9_]*)\s*=").expect("assignment pattern is valid")
});

/// What kind of declaration a symbol came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    /// `fn name(...)`
    Function,
    /// `name = ...`
    Variable,
}

/// A declaration site found by [`collect_symbols`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    /// The declared identifier.
    pub name: String,
    /// 0-based line of the declaration.
    pub line: u32,
    /// 0-based character column where the identifier starts.
    pub col: u32,
    /// Declaration kind.
    pub kind: SymbolKind,
}

impl Symbol {
    /// Column just past the end of the identifier.
    pub fn end_col(&self) -> u32 {
        self.col + char_len(&self.name) as u32
    }
}

/// Collect declared symbols from `source`, in line order.
///
/// Only the first declaration of each `(name, kind)` pair is kept.
pub fn collect_symbols(source: &str) -> Vec<Symbol> {
    let mut symbols = Vec::new();
    let mut seen: HashSet<(String, SymbolKind)> = HashSet::new();

    for (line_num, line) in source.lines().enumerate() {
        let found = FUNC_RE
            .captures(line)
            .map(|caps| (caps, SymbolKind::Function))
            .or_else(|| ASSIGN_RE.captures(line).map(|caps| (caps, SymbolKind::Variable)));

        let Some((caps, kind)) = found else {
            continue;
        };
        let Some(ident) = caps.get(1) else {
            continue;
        };

        let name = ident.as_str().to_string();
        if seen.insert((name.clone(), kind)) {
            symbols.push(Symbol {
                name,
                line: line_num as u32,
                col: char_column(line, ident.start()) as u32,
                kind,
            });
        }
    }

    symbols
}
