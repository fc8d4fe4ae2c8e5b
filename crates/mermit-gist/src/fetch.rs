//! Downloading markdown files from a gist via the GitHub API.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use tempfile::TempDir;
use tracing::{debug, info};
use ureq::Agent;

use crate::error::GistError;
use crate::url::{is_gist_url, parse_gist_id};

/// API version header sent with every request.
pub const GIST_API_VERSION: &str = "2022-11-28";

const API_BASE: &str = "https://api.github.com/gists";
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// One file entry in the gist API response.
#[derive(Debug, Deserialize)]
struct GistFile {
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct Gist {
    /// Keyed by filename; `BTreeMap` gives alphabetical processing order.
    #[serde(default)]
    files: BTreeMap<String, GistFile>,
}

/// Markdown files downloaded from a gist.
///
/// The backing temporary directory is removed when this is dropped, so
/// keep the value alive while the paths are in use.
#[derive(Debug)]
pub struct GistFiles {
    dir: TempDir,
    files: Vec<PathBuf>,
}

impl GistFiles {
    /// Paths of the saved markdown files, alphabetically sorted.
    #[must_use]
    pub fn paths(&self) -> &[PathBuf] {
        &self.files
    }

    /// Directory holding the saved files.
    #[must_use]
    pub fn dir(&self) -> &std::path::Path {
        self.dir.path()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

fn is_markdown(filename: &str) -> bool {
    let lowered = filename.to_lowercase();
    lowered.ends_with(".md") || lowered.ends_with(".markdown")
}

/// Filenames come from the API response; anything that could resolve
/// outside the scratch directory is rejected.
fn safe_filename(filename: &str) -> bool {
    !filename.is_empty()
        && !filename.contains(['/', '\\'])
        && filename != "."
        && filename != ".."
}

fn fetch_gist(agent: &Agent, id: &str, token: Option<&str>) -> Result<Gist, GistError> {
    let url = format!("{API_BASE}/{id}");
    debug!(url = %url, "fetching gist");

    let mut request = agent
        .get(&url)
        .header("Accept", "application/vnd.github+json")
        .header("X-GitHub-Api-Version", GIST_API_VERSION);
    if let Some(token) = token {
        request = request.header("Authorization", &format!("Bearer {token}"));
    }

    let response = request
        .call()
        .map_err(|e| GistError::Network(e.to_string()))?;

    let status = response.status().as_u16();
    let mut body = response.into_body();

    if status >= 400 {
        let error_body = body
            .read_to_string()
            .unwrap_or_else(|_| String::from("(unable to read error body)"));
        return Err(match status {
            404 => GistError::NotFound { id: id.to_owned() },
            403 if error_body.to_lowercase().contains("rate limit") => GistError::RateLimited,
            401 | 403 => GistError::AccessDenied { id: id.to_owned() },
            _ => GistError::Network(format!("HTTP {status}: {error_body}")),
        });
    }

    let raw = body
        .read_to_string()
        .map_err(|e| GistError::Network(e.to_string()))?;
    Ok(serde_json::from_str(&raw)?)
}

/// Fetch the markdown files of a gist into a temporary directory.
///
/// Non-markdown files in the gist are ignored; a gist with no markdown
/// files yields an empty result rather than an error. A token raises
/// rate limits and grants access to private gists.
pub fn fetch_gist_files(gist_url: &str, token: Option<&str>) -> Result<GistFiles, GistError> {
    if !is_gist_url(gist_url) {
        return Err(GistError::InvalidUrl {
            url: gist_url.to_owned(),
        });
    }
    let id = parse_gist_id(gist_url).ok_or_else(|| GistError::InvalidUrl {
        url: gist_url.to_owned(),
    })?;

    let agent: Agent = Agent::config_builder()
        .timeout_global(Some(FETCH_TIMEOUT))
        .http_status_as_error(false)
        .build()
        .into();
    let gist = fetch_gist(&agent, &id, token)?;

    let dir = tempfile::Builder::new()
        .prefix("mermit_gist_")
        .tempdir()
        .map_err(|e| GistError::Save {
            filename: String::from("(scratch directory)"),
            source: e,
        })?;

    let mut files = Vec::new();
    for (filename, file) in &gist.files {
        if !is_markdown(filename) {
            continue;
        }
        if !safe_filename(filename) {
            tracing::warn!(file = %filename, "skipping gist file with unsafe name");
            continue;
        }
        let path = dir.path().join(filename);
        std::fs::write(&path, &file.content).map_err(|e| GistError::Save {
            filename: filename.clone(),
            source: e,
        })?;
        files.push(path);
    }

    info!(gist = %id, count = files.len(), "fetched gist markdown files");
    Ok(GistFiles { dir, files })
}
