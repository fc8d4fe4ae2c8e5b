//! Source-to-artifact mapping persistence.
//!
//! Each run records which artifacts were generated from which source into
//! `diagram_mappings.json` inside the output directory. The index page is
//! generated from the same records.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::FilesError;

/// Name of the mapping file inside an output directory.
pub const MAPPING_FILENAME: &str = "diagram_mappings.json";

/// Mapping between one source file and its generated diagram artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagramMapping {
    /// Source markdown file.
    pub source_file: PathBuf,
    /// Generated artifact paths, in diagram order.
    pub diagram_files: Vec<PathBuf>,
    /// When the artifacts were generated.
    pub timestamp: DateTime<Utc>,
}

impl DiagramMapping {
    /// Mapping stamped with the current time.
    #[must_use]
    pub fn new(source_file: PathBuf, diagram_files: Vec<PathBuf>) -> Self {
        Self {
            source_file,
            diagram_files,
            timestamp: Utc::now(),
        }
    }
}

/// Write mappings to `diagram_mappings.json` in `output_dir`, creating the
/// directory if needed.
pub fn save_mappings(mappings: &[DiagramMapping], output_dir: &Path) -> Result<(), FilesError> {
    crate::ensure_output_dir(output_dir)?;
    let path = output_dir.join(MAPPING_FILENAME);

    let json = serde_json::to_string_pretty(mappings).map_err(|source| {
        FilesError::MappingFormat {
            path: path.clone(),
            source,
        }
    })?;
    fs::write(&path, json).map_err(|source| FilesError::Write { path, source })
}

/// Load mappings from `diagram_mappings.json` in `output_dir`.
pub fn load_mappings(output_dir: &Path) -> Result<Vec<DiagramMapping>, FilesError> {
    let path = output_dir.join(MAPPING_FILENAME);
    if !path.exists() {
        return Err(FilesError::SourceNotFound { path });
    }

    let json = fs::read_to_string(&path).map_err(|source| FilesError::Read {
        path: path.clone(),
        source,
    })?;
    serde_json::from_str(&json).map_err(|source| FilesError::MappingFormat { path, source })
}
