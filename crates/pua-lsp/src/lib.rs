//! Language Server Protocol implementation for pua.
//!
//! This crate provides an LSP server for `.pua` files, enabling IDE features like:
//! - Lint diagnostics (indentation, block headers, bracket balance)
//! - Autocompletion for keywords and workspace symbols
//! - Go-to-definition across the workspace
//! - Document symbols (outline view)
//! - Whole-document formatting
//!
//! # Architecture
//!
//! - **Transport**: `Content-Length` framed JSON-RPC over any byte streams
//! - **Main loop**: reads one message, handles it, writes the results
//! - **Dispatch**: decodes params into typed requests and notifications
//! - **Handlers**: turn `pua-syntax` results into protocol values
//!
//! # Example
//!
//! ```no_run
//! let code = pua_lsp::start_stdio().unwrap_or(1);
//! std::process::exit(code);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod db;
pub mod dispatch;
pub mod error;
pub mod handlers;
pub mod lifecycle;
pub mod main_loop;
pub mod message;
pub mod transport;
pub mod workspace;

mod server;
mod vfs;

pub use config::ServerConfig;
pub use error::{HandlerError, TransportError};
pub use main_loop::run_main_loop;
pub use message::{Message, RequestId};
pub use server::{initialize_result, server_capabilities, start_stdio, Server};
pub use vfs::{Document, Vfs};

/// LSP server version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
