//! `mermit clean` command implementation.

use std::path::PathBuf;

use clap::Args;
use mermit_config::CliSettings;
use mermit_files::{MAPPING_FILENAME, load_mappings};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the clean command.
#[derive(Args)]
pub struct CleanArgs {
    /// Path to configuration file (default: auto-discover mermit.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory to clean (overrides config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Skip the confirmation prompt.
    #[arg(short, long)]
    yes: bool,
}

impl CleanArgs {
    /// Execute the clean command: remove generated artifacts.
    ///
    /// Only files recorded in the mapping file are removed, plus the
    /// mapping file and index page themselves. Unknown files in the
    /// output directory are left alone.
    ///
    /// # Errors
    ///
    /// Returns an error when configuration loading or deletion fails.
    pub fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            output_dir: self.output_dir.clone(),
            ..CliSettings::default()
        };
        let config = super::load_config(self.config.as_deref(), &cli_settings)?;
        let output_dir = config.output_dir();

        if !output_dir.is_dir() {
            output.warning(&format!("Nothing to clean: {}", output_dir.display()));
            return Ok(());
        }
        // No mapping file means nothing mermit-generated to delete.
        let mappings = match load_mappings(&output_dir) {
            Ok(mappings) => mappings,
            Err(mermit_files::FilesError::SourceNotFound { .. }) => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        let mut targets: Vec<PathBuf> = mappings
            .iter()
            .flat_map(|mapping| mapping.diagram_files.iter().cloned())
            .filter(|path| path.is_file())
            .collect();
        for generated in [MAPPING_FILENAME, "index.html"] {
            let path = output_dir.join(generated);
            if path.is_file() {
                targets.push(path);
            }
        }

        if targets.is_empty() {
            output.success("Nothing to clean");
            return Ok(());
        }

        output.info(&format!(
            "Will delete {} file(s) from {}",
            targets.len(),
            output_dir.display()
        ));
        if !self.yes && !output.confirm("Continue?") {
            output.warning("Aborted");
            return Ok(());
        }

        let mut deleted = 0usize;
        for path in &targets {
            match std::fs::remove_file(path) {
                Ok(()) => {
                    tracing::debug!(path = %path.display(), "deleted");
                    deleted += 1;
                }
                Err(e) => output.warning(&format!("Could not delete {}: {e}", path.display())),
            }
        }

        output.success(&format!("Deleted {deleted} file(s)"));
        Ok(())
    }
}
