//! `mermit generate` command implementation.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, ValueEnum};
use mermit_config::{Backend, CliSettings};
use mermit_files::{
    DiagramMapping, create_linked_markdown, ensure_output_dir, generate_index_html,
    markdown_files_from_path, output_filename, save_mappings,
};
use mermit_gist::{GistFiles, fetch_gist_files, is_gist_url};
use mermit_render::{
    DiagramRenderer, InkRenderer, MmdcRenderer, OutputFormat, RenderJob, render_all,
};

use crate::error::CliError;
use crate::output::Output;

/// Backend choice on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum BackendArg {
    /// mermaid-cli subprocess (needs Node.js).
    Local,
    /// mermaid.ink HTTP API.
    Ink,
}

impl From<BackendArg> for Backend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Local => Self::Local,
            BackendArg::Ink => Self::Ink,
        }
    }
}

/// Arguments for the generate command.
#[derive(Args)]
pub struct GenerateArgs {
    /// Markdown file, directory, or GitHub Gist URL.
    #[arg(default_value = ".")]
    input: String,

    /// Path to configuration file (default: auto-discover mermit.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory for rendered diagrams (overrides config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format: png or svg (overrides config).
    #[arg(short, long)]
    format: Option<String>,

    /// Rendering backend (overrides config).
    #[arg(short, long)]
    backend: Option<BackendArg>,

    /// mermaid.ink instance URL (overrides config).
    #[arg(long)]
    ink_url: Option<String>,

    /// Do not recurse into subdirectories.
    #[arg(long)]
    no_recursive: bool,

    /// Per-diagram rendering timeout in seconds (overrides config).
    #[arg(long)]
    timeout: Option<u64>,

    /// Extra glob patterns to exclude from discovery (repeatable).
    #[arg(long)]
    exclude: Vec<String>,

    /// Also write `{stem}_linked.md` copies with fences replaced by
    /// image links.
    #[arg(short, long)]
    linked: bool,

    /// GitHub token for private gists and higher rate limits.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    github_token: Option<String>,
}

impl GenerateArgs {
    /// Execute the generate command.
    ///
    /// # Errors
    ///
    /// Returns an error when configuration, discovery, or output writing
    /// fails, and [`CliError::PartialFailure`] when some diagrams could
    /// not be extracted or rendered.
    pub fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            output_dir: self.output_dir.clone(),
            format: self.format.clone(),
            backend: self.backend.map(Backend::from),
            ink_url: self.ink_url.clone(),
            recursive: self.no_recursive.then_some(false),
            timeout_secs: self.timeout,
        };
        let config = super::load_config(self.config.as_deref(), &cli_settings)?;

        // Gist downloads live in a scratch directory that is removed when
        // this guard drops, so it stays alive until the end of the run.
        let mut gist_files: Option<GistFiles> = None;
        let sources: Vec<PathBuf> = if is_gist_url(&self.input) {
            output.info(&format!("Fetching gist: {}", self.input));
            let fetched = fetch_gist_files(&self.input, self.github_token.as_deref())?;
            let paths = fetched.paths().to_vec();
            gist_files = Some(fetched);
            paths
        } else {
            let mut exclude = config.discover.exclude.clone();
            exclude.extend(self.exclude.iter().cloned());
            markdown_files_from_path(Path::new(&self.input), config.discover.recursive, &exclude)?
        };

        if sources.is_empty() {
            output.warning("No markdown files found");
            return Ok(());
        }
        output.info(&format!("Scanning {} markdown file(s)", sources.len()));

        let scanner = super::scanner_from_config(&config);
        let batch = scanner.extract_many(&sources);
        for failure in &batch.failures {
            output.warning(&format!("Skipped {}: {}", failure.path.display(), failure.error));
        }

        if batch.records.is_empty() {
            if !batch.failures.is_empty() {
                return Err(CliError::Validation(format!(
                    "{} source file(s) could not be read",
                    batch.failures.len()
                )));
            }
            output.success("No mermaid diagrams found");
            return Ok(());
        }
        output.info(&format!("Found {} diagram(s)", batch.records.len()));

        let format = OutputFormat::parse(&config.output.format).ok_or_else(|| {
            CliError::Validation(format!("unsupported output format '{}'", config.output.format))
        })?;
        let output_dir = config.output_dir();
        ensure_output_dir(&output_dir)?;

        let timeout = Duration::from_secs(config.render.timeout_secs);
        let renderer: Box<dyn DiagramRenderer> = match config.render.backend {
            Backend::Local => Box::new(
                MmdcRenderer::new(timeout)
                    .scale(config.render.scale)
                    .width(config.render.width),
            ),
            Backend::Ink => {
                let mut renderer = InkRenderer::with_base_url(&config.render.ink_url, timeout);
                if config.render.theme != "default" {
                    renderer = renderer.theme(&config.render.theme);
                }
                Box::new(renderer)
            }
        };

        let jobs: Vec<RenderJob> = batch
            .records
            .iter()
            .enumerate()
            .map(|(job_index, record)| RenderJob {
                index: job_index,
                source: record.content.clone(),
                output_path: output_dir.join(output_filename(
                    &record.source,
                    record.index,
                    &record.diagram_type,
                    format.as_str(),
                )),
            })
            .collect();

        output.info(&format!("Rendering to {}", output_dir.display()));
        let result = render_all(&jobs, renderer.as_ref(), format);

        for error in &result.errors {
            let record = &batch.records[error.index];
            output.error(&format!(
                "Failed {} (line {}): {}",
                record.source.display(),
                record.start_line,
                error.error
            ));
        }
        let rendered: HashSet<usize> = result.rendered.iter().map(|r| r.index).collect();

        // One mapping per source, listing its artifacts in diagram order.
        let mut mappings: Vec<DiagramMapping> = Vec::new();
        for (job_index, record) in batch.records.iter().enumerate() {
            if mappings.last().is_none_or(|m| m.source_file != record.source) {
                mappings.push(DiagramMapping::new(record.source.clone(), Vec::new()));
            }
            if rendered.contains(&job_index)
                && let Some(mapping) = mappings.last_mut()
            {
                mapping.diagram_files.push(jobs[job_index].output_path.clone());
            }
        }
        save_mappings(&mappings, &output_dir)?;
        generate_index_html(&mappings, &output_dir)?;

        if self.linked && gist_files.is_none() {
            write_linked(&output, &batch.records, &jobs, &rendered)?;
        }

        output.separator();
        let total = batch.records.len();
        let failed = result.errors.len();
        if failed > 0 {
            output.warning(&format!(
                "Rendered {} of {total} diagram(s)",
                result.rendered.len()
            ));
            return Err(CliError::PartialFailure { failed, total });
        }
        if !batch.failures.is_empty() {
            return Err(CliError::Validation(format!(
                "{} source file(s) could not be read",
                batch.failures.len()
            )));
        }
        output.success(&format!(
            "Rendered {total} diagram(s) from {} file(s)",
            mappings.len()
        ));
        Ok(())
    }
}

/// Write linked markdown for every source whose diagrams all rendered.
///
/// Linked output pairs fences with artifacts by position, so a source
/// with a failed render in the middle is skipped rather than written
/// with misaligned links.
fn write_linked(
    output: &Output,
    records: &[mermit_extract::DiagramRecord],
    jobs: &[RenderJob],
    rendered: &HashSet<usize>,
) -> Result<(), CliError> {
    let mut job_index = 0;
    while job_index < records.len() {
        let source = &records[job_index].source;
        let end = records[job_index..]
            .iter()
            .position(|r| &r.source != source)
            .map_or(records.len(), |offset| job_index + offset);

        if (job_index..end).all(|i| rendered.contains(&i)) {
            let files: Vec<PathBuf> = (job_index..end)
                .map(|i| jobs[i].output_path.clone())
                .collect();
            let linked = create_linked_markdown(source, &files)?;
            output.detail(&format!("Linked markdown: {}", linked.display()));
        } else {
            output.warning(&format!(
                "Skipping linked markdown for {} (render failures)",
                source.display()
            ));
        }
        job_index = end;
    }
    Ok(())
}
