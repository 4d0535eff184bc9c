//! LSP request and notification handlers.
//!
//! Each handler works on plain document text plus the workspace index and
//! returns protocol values; decoding and error mapping happen in the main
//! loop.

pub mod utils;

pub mod completion;
pub mod definition;
pub mod diagnostics;
pub mod formatting;
pub mod symbols;
