//! Rendering error types.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Rendering an empty diagram is refused before any backend work.
    #[error("diagram source is empty")]
    EmptySource,

    /// The rendering tool could not be launched at all.
    #[error("failed to launch '{command}': {source} (is @mermaid-js/mermaid-cli installed?)")]
    ToolNotFound {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The rendering tool ran and reported failure.
    #[error("mermaid-cli failed (exit {status}): {stderr}")]
    ToolFailed { status: i32, stderr: String },

    /// The rendering tool exceeded its deadline and was killed.
    #[error("rendering timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// The remote API rejected the diagram or could not be reached.
    #[error("{0}")]
    Api(String),

    /// Filesystem trouble around the output artifact.
    #[error("i/o error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backend reported success but produced no usable artifact.
    #[error("rendered output missing or empty: {path}")]
    EmptyOutput { path: PathBuf },
}
