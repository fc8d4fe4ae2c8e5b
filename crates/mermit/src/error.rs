//! CLI error types.

use mermit_config::ConfigError;
use mermit_extract::ExtractError;
use mermit_files::FilesError;
use mermit_gist::GistError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Extract(#[from] ExtractError),

    #[error("{0}")]
    Files(#[from] FilesError),

    #[error("{0}")]
    Gist(#[from] GistError),

    #[error("{0}")]
    Validation(String),

    /// Some diagrams failed while the rest were processed.
    #[error("{failed} of {total} diagrams failed to render")]
    PartialFailure { failed: usize, total: usize },
}
