//! Main event loop for the LSP server.
//!
//! Strictly sequential: read one message, handle it completely, write
//! whatever it produced, repeat. All state is owned by [`MainLoopState`];
//! nothing runs in the background.

use std::io::{BufRead, Write};

use lsp_server::{ErrorCode, Notification};
use lsp_types::notification::{Notification as _, PublishDiagnostics};
use lsp_types::{
    DidChangeTextDocumentParams, DidChangeWorkspaceFoldersParams, DidCloseTextDocumentParams,
    DidOpenTextDocumentParams, DidSaveTextDocumentParams, PublishDiagnosticsParams, Uri,
};
use serde::Serialize;

use crate::config::ServerConfig;
use crate::db::SymbolIndex;
use crate::dispatch::{ClientNotification, ClientRequest, InitializeArgs};
use crate::error::{HandlerError, TransportError};
use crate::handlers::completion::handle_completion;
use crate::handlers::definition::handle_goto_definition;
use crate::handlers::diagnostics::build_diagnostics;
use crate::handlers::formatting::handle_formatting;
use crate::handlers::symbols::handle_document_symbols;
use crate::lifecycle::Lifecycle;
use crate::message::{Message, Request, Response};
use crate::server::initialize_result;
use crate::transport::{read_message, write_message};
use crate::vfs::Vfs;
use crate::workspace::WorkspaceRoots;

/// State managed by the main loop.
#[derive(Debug)]
pub struct MainLoopState {
    /// Server settings.
    pub config: ServerConfig,
    /// Open documents.
    pub vfs: Vfs,
    /// Symbols across open documents and workspace files.
    pub index: SymbolIndex,
    /// Indexed workspace directories.
    pub roots: WorkspaceRoots,
    /// Initialize/shutdown/exit tracking.
    pub lifecycle: Lifecycle,
    /// Messages produced while handling the current message.
    outbox: Vec<Message>,
}

impl MainLoopState {
    /// Create a new main loop state.
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            vfs: Vfs::new(),
            index: SymbolIndex::new(),
            roots: WorkspaceRoots::new(),
            lifecycle: Lifecycle::new(),
            outbox: Vec::new(),
        }
    }

    /// Drain the messages queued for the client.
    pub fn take_outgoing(&mut self) -> Vec<Message> {
        std::mem::take(&mut self.outbox)
    }

    /// Handle an LSP message.
    pub fn handle_message(&mut self, msg: Message) {
        match msg {
            Message::Request(req) => self.handle_request(req),
            Message::Notification(notif) => self.handle_notification(notif),
            Message::Response(resp) => {
                // We never send requests to the client
                tracing::debug!("Ignoring client response for id {}", resp.id);
            }
        }
    }

    /// Handle an LSP request (exactly one response).
    fn handle_request(&mut self, req: Request) {
        let Request { id, method, params } = req;

        let result =
            ClientRequest::parse(&method, params).and_then(|request| self.dispatch_request(request));

        let response = match result {
            Ok(value) => Response::new_ok(id, value),
            Err(e) => {
                tracing::error!("Request {} (id {}) failed: {}", method, id, e);
                Response::new_err(id, ErrorCode::InternalError, e.to_string())
            }
        };
        self.send(Message::Response(response));
    }

    fn dispatch_request(&mut self, request: ClientRequest) -> Result<serde_json::Value, HandlerError> {
        match request {
            ClientRequest::Initialize(args) => self.on_initialize(&args),
            ClientRequest::Shutdown => {
                tracing::info!("Shutdown requested");
                self.lifecycle.shutdown();
                Ok(serde_json::Value::Null)
            }
            ClientRequest::Completion(params) => {
                let text = self.document_text(&params.text_document_position.text_document.uri);
                to_json(handle_completion(&text, &self.index))
            }
            ClientRequest::GotoDefinition(params) => {
                let uri = &params.text_document_position_params.text_document.uri;
                let document = self.vfs.get(uri);
                to_json(handle_goto_definition(&params, document, &self.index))
            }
            ClientRequest::DocumentSymbol(params) => {
                let text = self.document_text(&params.text_document.uri);
                to_json(handle_document_symbols(&text))
            }
            ClientRequest::Formatting(params) => {
                let text = self.document_text(&params.text_document.uri);
                to_json(handle_formatting(&text))
            }
            ClientRequest::Other(method) => {
                tracing::debug!("Unhandled request: {}", method);
                Ok(serde_json::Value::Null)
            }
        }
    }

    /// Handle the initialize request.
    fn on_initialize(&mut self, args: &InitializeArgs) -> Result<serde_json::Value, HandlerError> {
        self.roots = WorkspaceRoots::from_uris(args.root_uris());
        self.lifecycle.initialize();
        tracing::info!("Initialized with {} workspace root(s)", self.roots.len());

        self.reindex();
        to_json(initialize_result(&self.config))
    }

    /// Handle an LSP notification. Failures are logged and dropped.
    fn handle_notification(&mut self, notif: Notification) {
        let Notification { method, params } = notif;

        match ClientNotification::parse(&method, params) {
            Ok(notification) => self.dispatch_notification(notification),
            Err(e) => tracing::warn!("Dropping notification {}: {}", method, e),
        }
    }

    fn dispatch_notification(&mut self, notification: ClientNotification) {
        match notification {
            ClientNotification::Initialized => tracing::info!("Client initialized"),
            ClientNotification::Exit => {
                tracing::info!("Exit notification received");
                self.lifecycle.exit();
            }
            ClientNotification::DidOpen(params) => self.on_did_open(params),
            ClientNotification::DidChange(params) => self.on_did_change(params),
            ClientNotification::DidSave(params) => self.on_did_save(params),
            ClientNotification::DidClose(params) => self.on_did_close(&params),
            ClientNotification::DidChangeWorkspaceFolders(params) => {
                self.on_did_change_workspace_folders(&params);
            }
            ClientNotification::Other(method) => {
                tracing::debug!("Unhandled notification: {}", method);
            }
        }
    }

    /// Handle textDocument/didOpen notification.
    fn on_did_open(&mut self, params: DidOpenTextDocumentParams) {
        let doc = params.text_document;
        tracing::info!("Document opened: {}", doc.uri.as_str());

        self.vfs.open(doc.uri.clone(), &doc.text, doc.version);
        self.index.update_document(&doc.uri, &doc.text);
        self.publish_diagnostics(&doc.uri);
    }

    /// Handle textDocument/didChange notification.
    fn on_did_change(&mut self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;

        // Full sync: the last change carries the whole text
        let Some(change) = params.content_changes.into_iter().last() else {
            return;
        };

        tracing::debug!("Document changed: {}", uri.as_str());
        self.replace_text(&uri, &change.text, params.text_document.version);
    }

    /// Handle textDocument/didSave notification.
    fn on_did_save(&mut self, params: DidSaveTextDocumentParams) {
        let uri = params.text_document.uri;
        tracing::debug!("Document saved: {}", uri.as_str());

        match params.text {
            Some(text) => {
                let version = self.vfs.get(&uri).map_or(0, |doc| doc.version());
                self.replace_text(&uri, &text, version);
            }
            None => self.publish_diagnostics(&uri),
        }

        self.reindex();
    }

    /// Handle textDocument/didClose notification.
    fn on_did_close(&mut self, params: &DidCloseTextDocumentParams) {
        let uri = &params.text_document.uri;
        tracing::info!("Document closed: {}", uri.as_str());

        self.vfs.close(uri);
        self.send_diagnostics(uri, Vec::new());
        self.reindex();
    }

    /// Handle workspace/didChangeWorkspaceFolders notification.
    fn on_did_change_workspace_folders(&mut self, params: &DidChangeWorkspaceFoldersParams) {
        for folder in &params.event.removed {
            self.roots.remove(folder.uri.as_str());
        }
        for folder in &params.event.added {
            self.roots.add(folder.uri.as_str());
        }
        self.reindex();
    }

    /// Store new text, patch the index for that document, publish.
    fn replace_text(&mut self, uri: &Uri, text: &str, version: i32) {
        self.vfs.update(uri, text, version);
        self.index.update_document(uri, text);
        self.publish_diagnostics(uri);
    }

    /// Full index rebuild from open documents and workspace roots.
    fn reindex(&mut self) {
        let stats = self
            .index
            .rebuild(&self.vfs, &self.roots, &self.config.file_extension);
        if stats.skipped > 0 {
            tracing::warn!(
                "{} workspace file(s) could not be read and were left out of the index",
                stats.skipped
            );
        }
    }

    /// Stored text, or empty text for a document that is not open.
    fn document_text(&self, uri: &Uri) -> String {
        self.vfs.get_content(uri).unwrap_or_default()
    }

    /// Lint an open document and publish the result.
    fn publish_diagnostics(&mut self, uri: &Uri) {
        if !self.vfs.contains(uri) {
            tracing::debug!("Not publishing for unopened document {}", uri.as_str());
            return;
        }
        let text = self.document_text(uri);

        let diagnostics = build_diagnostics(&text, &self.config.name);
        tracing::debug!(
            "Publishing {} diagnostics for {}",
            diagnostics.len(),
            uri.as_str()
        );
        self.send_diagnostics(uri, diagnostics);
    }

    /// Queue a publishDiagnostics notification.
    fn send_diagnostics(&mut self, uri: &Uri, diagnostics: Vec<lsp_types::Diagnostic>) {
        let params = PublishDiagnosticsParams {
            uri: uri.clone(),
            diagnostics,
            version: None,
        };

        let notif = Notification::new(PublishDiagnostics::METHOD.to_string(), params);
        self.send(Message::Notification(notif));
    }

    fn send(&mut self, msg: Message) {
        self.outbox.push(msg);
    }
}

fn to_json<T: Serialize>(value: T) -> Result<serde_json::Value, HandlerError> {
    serde_json::to_value(value).map_err(HandlerError::Serialize)
}

/// Run the main event loop until `exit` or end of input.
///
/// Returns the process exit code, or the write error that ended the session.
pub fn run_main_loop<R: BufRead, W: Write>(
    mut reader: R,
    mut writer: W,
    config: ServerConfig,
) -> Result<i32, TransportError> {
    let mut state = MainLoopState::new(config);

    tracing::info!("Main loop started");

    while !state.lifecycle.is_exited() {
        let msg = match read_message(&mut reader) {
            Ok(Some(msg)) => msg,
            Ok(None) => {
                tracing::info!("Input closed");
                break;
            }
            Err(TransportError::Malformed(e)) => {
                tracing::warn!("Skipping malformed message: {}", e);
                continue;
            }
            Err(e) => {
                tracing::error!("Failed to read message: {}", e);
                break;
            }
        };

        state.handle_message(msg);

        for out in state.take_outgoing() {
            write_message(&mut writer, &out)?;
        }
    }

    let code = state.lifecycle.exit_code();
    tracing::info!("Main loop ended (exit code {})", code);
    Ok(code)
}
