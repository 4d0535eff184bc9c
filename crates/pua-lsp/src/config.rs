//! Server configuration.

/// Static settings for one server process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Name reported in `serverInfo` and used as the diagnostic source.
    pub name: String,
    /// Version reported in `serverInfo`.
    pub version: String,
    /// Extension (without the dot) of files picked up by the workspace scan.
    pub file_extension: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "pua-lsp".to_string(),
            version: crate::VERSION.to_string(),
            file_extension: pua_syntax::FILE_EXTENSION.to_string(),
        }
    }
}
