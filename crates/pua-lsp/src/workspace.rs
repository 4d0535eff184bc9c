//! Workspace roots and on-disk source discovery.

use lsp_types::Uri;
use std::path::{Path, PathBuf};

/// Convert a `file://` URI to a filesystem path.
///
/// Anything that is not a `file://` URI is returned verbatim as a path.
#[cfg(not(windows))]
pub fn uri_to_path(uri: &str) -> PathBuf {
    match uri.strip_prefix("file://") {
        Some(rest) => PathBuf::from(percent_decode(rest)),
        None => PathBuf::from(uri),
    }
}

/// Convert a `file://` URI to a filesystem path (Windows version).
#[cfg(windows)]
pub fn uri_to_path(uri: &str) -> PathBuf {
    match uri.strip_prefix("file://") {
        // Handle Windows paths like file:///C:/...
        Some(rest) => {
            let decoded = percent_decode(rest);
            let trimmed = decoded.strip_prefix('/').unwrap_or(&decoded);
            PathBuf::from(trimmed)
        }
        None => PathBuf::from(uri),
    }
}

fn percent_decode(s: &str) -> String {
    urlencoding::decode(s).map_or_else(|_| s.to_string(), |d| d.into_owned())
}

/// Build a `file://` URI for `path`, resolving it to its canonical form first.
pub fn path_to_uri(path: &Path) -> Option<Uri> {
    let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    let text = canonical.to_string_lossy();

    #[cfg(windows)]
    let text = {
        let slashed = text.replace('\\', "/");
        let trimmed = slashed.strip_prefix("//?/").unwrap_or(&slashed).to_string();
        format!("/{trimmed}")
    };

    let encoded: Vec<_> = text
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect();

    format!("file://{}", encoded.join("/")).parse().ok()
}

/// Ordered set of workspace root directories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkspaceRoots {
    roots: Vec<PathBuf>,
}

impl WorkspaceRoots {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the set from root URIs, keeping first-seen order.
    pub fn from_uris<I, S>(uris: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut roots = Self::new();
        for uri in uris {
            roots.add(uri.as_ref());
        }
        roots
    }

    /// Add the root named by `uri`. Returns `false` if it was already present.
    pub fn add(&mut self, uri: &str) -> bool {
        let path = uri_to_path(uri);
        if self.roots.contains(&path) {
            return false;
        }
        tracing::info!("Workspace root added: {}", path.display());
        self.roots.push(path);
        true
    }

    /// Remove the root named by `uri`. Returns whether anything was removed.
    pub fn remove(&mut self, uri: &str) -> bool {
        let path = uri_to_path(uri);
        let before = self.roots.len();
        self.roots.retain(|root| *root != path);
        let removed = self.roots.len() != before;
        if removed {
            tracing::info!("Workspace root removed: {}", path.display());
        }
        removed
    }

    /// Iterate over roots in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.roots.iter().map(PathBuf::as_path)
    }

    /// Number of roots.
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    /// Whether there are no roots.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// All regular files under every root whose extension is `extension`.
    ///
    /// Missing roots and unreadable entries are skipped.
    pub fn source_files(&self, extension: &str) -> Vec<PathBuf> {
        let mut files = Vec::new();
        for root in &self.roots {
            if !root.is_dir() {
                tracing::debug!("Skipping workspace root {}: not a directory", root.display());
                continue;
            }
            walk_sources(root, extension, &mut files);
        }
        files
    }
}

/// Recursive directory walk. Symlinked directories are not followed.
fn walk_sources(dir: &Path, extension: &str, files: &mut Vec<PathBuf>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!("Cannot read directory {}: {}", dir.display(), e);
            return;
        }
    };

    for entry in entries.flatten() {
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        let path = entry.path();
        if file_type.is_dir() {
            walk_sources(&path, extension, files);
        } else if path.extension().is_some_and(|ext| ext == extension) {
            files.push(path);
        }
    }
}
