//! `mermit scan` command implementation.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use clap::Args;
use mermit_config::CliSettings;
use mermit_files::markdown_files_from_path;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the scan command.
#[derive(Args)]
pub struct ScanArgs {
    /// Markdown file or directory to scan.
    #[arg(default_value = ".")]
    input: String,

    /// Path to configuration file (default: auto-discover mermit.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Do not recurse into subdirectories.
    #[arg(long)]
    no_recursive: bool,

    /// Extra glob patterns to exclude from discovery (repeatable).
    #[arg(long)]
    exclude: Vec<String>,
}

impl ScanArgs {
    /// Execute the scan command: list diagrams without rendering anything.
    ///
    /// # Errors
    ///
    /// Returns an error when configuration loading or discovery fails.
    pub fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            recursive: self.no_recursive.then_some(false),
            ..CliSettings::default()
        };
        let config = super::load_config(self.config.as_deref(), &cli_settings)?;

        let mut exclude = config.discover.exclude.clone();
        exclude.extend(self.exclude.iter().cloned());
        let sources =
            markdown_files_from_path(Path::new(&self.input), config.discover.recursive, &exclude)?;

        if sources.is_empty() {
            output.warning("No markdown files found");
            return Ok(());
        }

        let scanner = super::scanner_from_config(&config);
        let mut records = Vec::new();
        for source in &sources {
            let text = match std::fs::read_to_string(source) {
                Ok(text) => text,
                Err(e) => {
                    output.warning(&format!("Skipped {}: {e}", source.display()));
                    continue;
                }
            };
            let outcome = scanner.scan(&text, source);
            for region in &outcome.skipped {
                output.warning(&format!(
                    "{}:{}  unterminated mermaid fence (ignored)",
                    source.display(),
                    region.start_line
                ));
            }
            records.extend(outcome.records);
        }

        let mut type_counts: BTreeMap<&str, usize> = BTreeMap::new();
        for record in &records {
            let title = record
                .diagram_title
                .as_deref()
                .or(record.preceding_header.as_deref());
            let label = title.map_or(String::new(), |t| format!("  \"{t}\""));
            output.info(&format!(
                "{}:{}-{}  {}{label}",
                record.source.display(),
                record.start_line,
                record.end_line,
                record.diagram_type,
            ));
            *type_counts.entry(record.diagram_type.as_str()).or_insert(0) += 1;
        }

        output.separator();
        if records.is_empty() {
            output.success("No mermaid diagrams found");
            return Ok(());
        }
        for (diagram_type, count) in &type_counts {
            output.detail(&format!("  {diagram_type}: {count}"));
        }
        output.success(&format!(
            "{} diagram(s) in {} file(s)",
            records.len(),
            sources.len()
        ));
        Ok(())
    }
}
