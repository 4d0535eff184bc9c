//! Workspace symbol index.

use lsp_types::Uri;
use pua_syntax::{collect_symbols, Symbol, SymbolKind};
use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;

use crate::vfs::Vfs;
use crate::workspace::{path_to_uri, uri_to_path, WorkspaceRoots};

/// One declaration of a name, with the document it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    /// Document that declares the symbol.
    pub uri: Uri,
    /// The declaration.
    pub symbol: Symbol,
}

/// Counters reported by a full rebuild.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RebuildStats {
    /// Open documents scanned.
    pub documents: usize,
    /// On-disk files scanned.
    pub files: usize,
    /// On-disk files that could not be read.
    pub skipped: usize,
    /// Total entries in the index afterwards.
    pub symbols: usize,
}

/// Name → declarations across open documents and workspace files.
///
/// Within one document at most one entry per `(name, kind)` exists; across
/// documents every declaration is kept.
#[derive(Debug, Default)]
pub struct SymbolIndex {
    entries: BTreeMap<String, Vec<IndexEntry>>,
    generation: u64,
}

impl SymbolIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of full rebuilds performed so far.
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Clear and rescan open documents, then every source file under `roots`.
    ///
    /// Files that are open are taken from `vfs` rather than disk. Unreadable
    /// files are skipped.
    pub fn rebuild(&mut self, vfs: &Vfs, roots: &WorkspaceRoots, extension: &str) -> RebuildStats {
        self.entries.clear();
        let mut stats = RebuildStats::default();

        for (uri, doc) in vfs.iter() {
            self.update_document(uri, &doc.text());
            stats.documents += 1;
        }

        let open_paths: HashSet<PathBuf> =
            vfs.iter().map(|(uri, _)| uri_to_path(uri.as_str())).collect();

        for path in roots.source_files(extension) {
            let canonical = path.canonicalize().unwrap_or_else(|_| path.clone());
            if open_paths.contains(&path) || open_paths.contains(&canonical) {
                continue;
            }

            let Some(uri) = path_to_uri(&canonical) else {
                tracing::debug!("No URI for {}", path.display());
                stats.skipped += 1;
                continue;
            };

            match std::fs::read(&path) {
                Ok(bytes) => {
                    self.update_document(&uri, &String::from_utf8_lossy(&bytes));
                    stats.files += 1;
                }
                Err(e) => {
                    tracing::debug!("Skipping unreadable file {}: {}", path.display(), e);
                    stats.skipped += 1;
                }
            }
        }

        self.generation += 1;
        stats.symbols = self.len();
        tracing::info!(
            "Workspace index rebuilt: {} open documents, {} files, {} skipped, {} symbols",
            stats.documents,
            stats.files,
            stats.skipped,
            stats.symbols
        );
        stats
    }

    /// Replace every entry for `uri` with a fresh scan of `text`.
    pub fn update_document(&mut self, uri: &Uri, text: &str) {
        self.remove_document(uri);
        for symbol in collect_symbols(text) {
            self.entries
                .entry(symbol.name.clone())
                .or_default()
                .push(IndexEntry {
                    uri: uri.clone(),
                    symbol,
                });
        }
    }

    /// Drop every entry that came from `uri`.
    pub fn remove_document(&mut self, uri: &Uri) {
        self.entries.retain(|_, entries| {
            entries.retain(|e| e.uri != *uri);
            !entries.is_empty()
        });
    }

    /// Find the declaration of `name`, preferring one inside `current`.
    ///
    /// Remaining ties are broken by URI text.
    pub fn find_definition(&self, name: &str, current: &Uri) -> Option<&IndexEntry> {
        self.entries
            .get(name)?
            .iter()
            .min_by(|a, b| {
                (a.uri != *current)
                    .cmp(&(b.uri != *current))
                    .then_with(|| a.uri.as_str().cmp(b.uri.as_str()))
            })
    }

    /// All declarations of `name`.
    pub fn get(&self, name: &str) -> &[IndexEntry] {
        self.entries.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// Distinct names with a kind: `Function` if any declaration is one.
    pub fn names(&self) -> impl Iterator<Item = (&str, SymbolKind)> {
        self.entries.iter().map(|(name, entries)| {
            let kind = if entries.iter().any(|e| e.symbol.kind == SymbolKind::Function) {
                SymbolKind::Function
            } else {
                SymbolKind::Variable
            };
            (name.as_str(), kind)
        })
    }

    /// Total number of entries.
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Whether the index holds nothing.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
