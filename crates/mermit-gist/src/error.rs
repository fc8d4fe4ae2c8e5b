//! Gist fetching error types.

#[derive(Debug, thiserror::Error)]
pub enum GistError {
    /// The input does not look like a gist URL at all.
    #[error("invalid GitHub Gist URL: {url}")]
    InvalidUrl { url: String },

    /// The gist ID does not exist (HTTP 404).
    #[error("gist not found: {id}")]
    NotFound { id: String },

    /// The gist is private or the token was rejected (HTTP 401/403).
    #[error("access denied to gist {id}, it may be private (provide a GitHub token)")]
    AccessDenied { id: String },

    /// The unauthenticated rate limit was hit (HTTP 403 with rate text).
    #[error("GitHub API rate limit exceeded, consider using a GitHub token")]
    RateLimited,

    /// Transport failure or unexpected HTTP status.
    #[error("network error while fetching gist: {0}")]
    Network(String),

    #[error("invalid JSON response from GitHub API: {0}")]
    Format(#[from] serde_json::Error),

    /// Saving a fetched file to the scratch directory failed.
    #[error("failed to save gist file {filename}: {source}")]
    Save {
        filename: String,
        #[source]
        source: std::io::Error,
    },
}
