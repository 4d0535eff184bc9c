//! Main LSP server implementation.

use std::io::{BufRead, BufWriter, Write};

use lsp_types::{
    CompletionOptions, InitializeResult, OneOf, SaveOptions, ServerCapabilities, ServerInfo,
    TextDocumentSyncCapability, TextDocumentSyncKind, TextDocumentSyncOptions,
    TextDocumentSyncSaveOptions, WorkspaceFoldersServerCapabilities, WorkspaceServerCapabilities,
};

use crate::config::ServerConfig;
use crate::error::TransportError;
use crate::main_loop::run_main_loop;

/// Capabilities advertised in the `initialize` response.
pub fn server_capabilities() -> ServerCapabilities {
    ServerCapabilities {
        text_document_sync: Some(TextDocumentSyncCapability::Options(TextDocumentSyncOptions {
            open_close: Some(true),
            change: Some(TextDocumentSyncKind::FULL),
            save: Some(TextDocumentSyncSaveOptions::SaveOptions(SaveOptions {
                include_text: Some(true),
            })),
            ..Default::default()
        })),
        completion_provider: Some(CompletionOptions {
            resolve_provider: Some(false),
            ..Default::default()
        }),
        definition_provider: Some(OneOf::Left(true)),
        document_symbol_provider: Some(OneOf::Left(true)),
        document_formatting_provider: Some(OneOf::Left(true)),
        workspace: Some(WorkspaceServerCapabilities {
            workspace_folders: Some(WorkspaceFoldersServerCapabilities {
                supported: Some(true),
                change_notifications: Some(OneOf::Left(true)),
            }),
            file_operations: None,
        }),
        ..Default::default()
    }
}

/// Full `initialize` result for `config`.
pub fn initialize_result(config: &ServerConfig) -> InitializeResult {
    InitializeResult {
        capabilities: server_capabilities(),
        server_info: Some(ServerInfo {
            name: config.name.clone(),
            version: Some(config.version.clone()),
        }),
    }
}

/// The LSP server.
#[derive(Debug, Default)]
pub struct Server {
    config: ServerConfig,
}

impl Server {
    /// Create a server with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve one session over the given streams and return the exit code.
    pub fn run<R: BufRead, W: Write>(self, reader: R, writer: W) -> Result<i32, TransportError> {
        tracing::info!(
            "Starting {} v{} ({} files)",
            self.config.name,
            self.config.version,
            self.config.file_extension
        );

        let code = run_main_loop(reader, writer, self.config)?;

        tracing::info!("Server shutdown complete");
        Ok(code)
    }
}

/// Start the LSP server using stdio transport.
pub fn start_stdio() -> Result<i32, TransportError> {
    tracing::info!("Starting LSP server on stdio");

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    Server::new().run(stdin.lock(), BufWriter::new(stdout.lock()))
}
