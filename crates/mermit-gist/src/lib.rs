//! GitHub Gist support for mermit.
//!
//! Recognizes gist URLs, extracts gist IDs and downloads the markdown
//! files of a gist into a temporary directory so the rest of the
//! pipeline can treat them like local sources.

mod error;
mod fetch;
mod url;

pub use error::GistError;
pub use fetch::{GIST_API_VERSION, GistFiles, fetch_gist_files};
pub use url::{is_gist_url, parse_gist_id};
