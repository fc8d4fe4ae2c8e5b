//! File-handling error types.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum FilesError {
    /// A path given by the caller does not exist.
    #[error("path not found: {path}")]
    SourceNotFound { path: PathBuf },

    /// A file was given where a markdown file was expected.
    #[error("not a markdown file: {path}")]
    NotMarkdown { path: PathBuf },

    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid mapping file {path}: {source}")]
    MappingFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid exclude pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}
