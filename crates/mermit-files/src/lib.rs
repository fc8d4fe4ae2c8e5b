//! File handling for mermit.
//!
//! Everything around the extraction core that touches the filesystem:
//! discovery of markdown sources, deterministic output filenames, the
//! `diagram_mappings.json` source-to-artifact record, linked markdown
//! copies, and the generated `index.html` gallery.

mod discover;
mod error;
mod index;
mod linked;
mod mapping;
mod naming;

pub use discover::{find_markdown_files, markdown_files_from_path};
pub use error::FilesError;
pub use index::generate_index_html;
pub use linked::create_linked_markdown;
pub use mapping::{DiagramMapping, MAPPING_FILENAME, load_mappings, save_mappings};
pub use naming::{output_filename, project_name};

use std::fs;
use std::path::Path;

/// Create `dir` (and parents) if it does not exist.
pub fn ensure_output_dir(dir: &Path) -> Result<(), FilesError> {
    fs::create_dir_all(dir).map_err(|source| FilesError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}
