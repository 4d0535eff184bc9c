//! Virtual File System for document management.
//!
//! The VFS holds the in-memory text of every open document. Synchronization
//! is whole-document only: each change replaces the stored text.

use lsp_types::Uri;
use ropey::Rope;
use std::collections::HashMap;

/// A document in the virtual file system.
#[derive(Debug)]
pub struct Document {
    /// The document content as a rope for line lookups.
    content: Rope,
    /// The version reported by the client.
    version: i32,
}

impl Document {
    /// Create a new document with the given content.
    pub fn new(content: &str, version: i32) -> Self {
        Self {
            content: Rope::from_str(content),
            version,
        }
    }

    /// Get the document content as a string.
    pub fn text(&self) -> String {
        self.content.to_string()
    }

    /// Get the document version.
    pub const fn version(&self) -> i32 {
        self.version
    }

    /// Get one line without its line terminator, or `None` past the end.
    pub fn line(&self, line: usize) -> Option<String> {
        let slice = self.content.get_line(line)?;
        let text = slice.to_string();
        Some(text.trim_end_matches(|c: char| c == '\r' || c == '\n').to_string())
    }

    /// Replace the content wholesale.
    pub fn update(&mut self, content: &str, version: i32) {
        self.content = Rope::from_str(content);
        self.version = version;
    }
}

/// Virtual file system for managing open documents.
#[derive(Debug, Default)]
pub struct Vfs {
    /// Open documents indexed by URI.
    documents: HashMap<Uri, Document>,
}

impl Vfs {
    /// Create a new empty VFS.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a document, replacing any previous entry for the URI.
    pub fn open(&mut self, uri: Uri, content: &str, version: i32) {
        self.documents.insert(uri, Document::new(content, version));
    }

    /// Close a document. Returns whether it was open.
    pub fn close(&mut self, uri: &Uri) -> bool {
        self.documents.remove(uri).is_some()
    }

    /// Replace a document's content, storing it if it was not open.
    pub fn update(&mut self, uri: &Uri, content: &str, version: i32) {
        match self.documents.get_mut(uri) {
            Some(doc) => doc.update(content, version),
            None => self.open(uri.clone(), content, version),
        }
    }

    /// Get a document by URI.
    pub fn get(&self, uri: &Uri) -> Option<&Document> {
        self.documents.get(uri)
    }

    /// Whether the URI is open.
    pub fn contains(&self, uri: &Uri) -> bool {
        self.documents.contains_key(uri)
    }

    /// Get document content as a string.
    pub fn get_content(&self, uri: &Uri) -> Option<String> {
        self.documents.get(uri).map(Document::text)
    }

    /// Iterate over all open documents.
    pub fn iter(&self) -> impl Iterator<Item = (&Uri, &Document)> {
        self.documents.iter()
    }

    /// Number of open documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether no document is open.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
