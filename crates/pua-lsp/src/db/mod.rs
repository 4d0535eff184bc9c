//! Derived data computed from document and workspace contents.
//!
//! The symbol index is an owned value held by the main loop. It is rebuilt
//! in full on initialize, save, close and workspace folder changes, and
//! patched per document on open and change.

mod index;

pub use index::{IndexEntry, RebuildStats, SymbolIndex};
