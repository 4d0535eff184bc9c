//! Typed decoding of incoming requests and notifications.
//!
//! `params` are converted into per-method structures here so handlers never
//! touch raw JSON.

use lsp_types::notification::{
    DidChangeTextDocument, DidChangeWorkspaceFolders, DidCloseTextDocument, DidOpenTextDocument,
    DidSaveTextDocument, Exit, Initialized, Notification as _,
};
use lsp_types::request::{
    Completion, DocumentSymbolRequest, Formatting, GotoDefinition, Initialize, Request as _,
    Shutdown,
};
use lsp_types::{
    CompletionParams, DidChangeTextDocumentParams, DidChangeWorkspaceFoldersParams,
    DidCloseTextDocumentParams, DidOpenTextDocumentParams, DidSaveTextDocumentParams,
    DocumentFormattingParams, DocumentSymbolParams, GotoDefinitionParams,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::HandlerError;

/// The subset of `initialize` params the server reads.
///
/// Decoded leniently: every field is optional and unknown fields are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InitializeArgs {
    /// Workspace folders announced by the client.
    pub workspace_folders: Option<Vec<FolderRef>>,
    /// Legacy single root.
    pub root_uri: Option<String>,
}

/// A workspace folder entry; only the URI matters.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FolderRef {
    /// Folder URI.
    pub uri: Option<String>,
}

impl InitializeArgs {
    /// Root URIs: the workspace folders, or `rootUri` when no folder has one.
    pub fn root_uris(&self) -> Vec<String> {
        let folders: Vec<String> = self
            .workspace_folders
            .iter()
            .flatten()
            .filter_map(|f| f.uri.clone())
            .filter(|uri| !uri.is_empty())
            .collect();

        if folders.is_empty() {
            self.root_uri.iter().filter(|u| !u.is_empty()).cloned().collect()
        } else {
            folders
        }
    }
}

/// A request the server understands.
#[derive(Debug)]
pub enum ClientRequest {
    /// `initialize`
    Initialize(InitializeArgs),
    /// `shutdown`
    Shutdown,
    /// `textDocument/completion`
    Completion(CompletionParams),
    /// `textDocument/definition`
    GotoDefinition(GotoDefinitionParams),
    /// `textDocument/documentSymbol`
    DocumentSymbol(DocumentSymbolParams),
    /// `textDocument/formatting`
    Formatting(DocumentFormattingParams),
    /// Any other method; answered with `null`.
    Other(String),
}

impl ClientRequest {
    /// Decode a request from its method name and params.
    pub fn parse(method: &str, params: serde_json::Value) -> Result<Self, HandlerError> {
        match method {
            Initialize::METHOD => {
                if params.is_null() {
                    Ok(Self::Initialize(InitializeArgs::default()))
                } else {
                    decode(method, params).map(Self::Initialize)
                }
            }
            Shutdown::METHOD => Ok(Self::Shutdown),
            Completion::METHOD => decode(method, params).map(Self::Completion),
            GotoDefinition::METHOD => decode(method, params).map(Self::GotoDefinition),
            DocumentSymbolRequest::METHOD => decode(method, params).map(Self::DocumentSymbol),
            Formatting::METHOD => decode(method, params).map(Self::Formatting),
            _ => Ok(Self::Other(method.to_string())),
        }
    }
}

/// A notification the server understands.
#[derive(Debug)]
pub enum ClientNotification {
    /// `initialized`
    Initialized,
    /// `exit`
    Exit,
    /// `textDocument/didOpen`
    DidOpen(DidOpenTextDocumentParams),
    /// `textDocument/didChange`
    DidChange(DidChangeTextDocumentParams),
    /// `textDocument/didSave`
    DidSave(DidSaveTextDocumentParams),
    /// `textDocument/didClose`
    DidClose(DidCloseTextDocumentParams),
    /// `workspace/didChangeWorkspaceFolders`
    DidChangeWorkspaceFolders(DidChangeWorkspaceFoldersParams),
    /// Any other method; ignored.
    Other(String),
}

impl ClientNotification {
    /// Decode a notification from its method name and params.
    pub fn parse(method: &str, params: serde_json::Value) -> Result<Self, HandlerError> {
        match method {
            Initialized::METHOD => Ok(Self::Initialized),
            Exit::METHOD => Ok(Self::Exit),
            DidOpenTextDocument::METHOD => decode(method, params).map(Self::DidOpen),
            DidChangeTextDocument::METHOD => decode(method, params).map(Self::DidChange),
            DidSaveTextDocument::METHOD => decode(method, params).map(Self::DidSave),
            DidCloseTextDocument::METHOD => decode(method, params).map(Self::DidClose),
            DidChangeWorkspaceFolders::METHOD => {
                decode(method, params).map(Self::DidChangeWorkspaceFolders)
            }
            _ => Ok(Self::Other(method.to_string())),
        }
    }
}

fn decode<T: DeserializeOwned>(method: &str, params: serde_json::Value) -> Result<T, HandlerError> {
    serde_json::from_value(params).map_err(|source| HandlerError::InvalidParams {
        method: method.to_string(),
        source,
    })
}
