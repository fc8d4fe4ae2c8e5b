//! Extraction error types.

use std::path::PathBuf;

/// Source-resolution failure during extraction.
///
/// Content-shape issues never produce these; a document with zero diagrams
/// is a valid empty result. Only I/O failures on the composed
/// "extract from path" entry points are errors.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The source document does not exist.
    #[error("source not found: {path}")]
    SourceNotFound { path: PathBuf },

    /// The source exists but could not be read (permissions, encoding, ...).
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
