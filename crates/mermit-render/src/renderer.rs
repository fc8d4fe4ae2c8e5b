//! Renderer trait and parallel batch rendering.

use std::path::PathBuf;

use rayon::prelude::*;

use crate::error::RenderError;
use crate::format::OutputFormat;

/// A diagram rendering backend.
///
/// Implementations take diagram source text and write an image artifact;
/// they are opaque to the extraction pipeline and selected by
/// configuration.
pub trait DiagramRenderer: Sync {
    /// Render `source` into `output_path` in the given format.
    fn render(
        &self,
        source: &str,
        output_path: &std::path::Path,
        format: OutputFormat,
    ) -> Result<(), RenderError>;
}

/// One diagram to render in a batch.
#[derive(Debug, Clone)]
pub struct RenderJob {
    /// Position in the batch; reported back on success and failure.
    pub index: usize,
    pub source: String,
    pub output_path: PathBuf,
}

/// A successfully rendered artifact.
#[derive(Debug)]
pub struct RenderedArtifact {
    pub index: usize,
    pub path: PathBuf,
}

/// Failure of a single job within a batch.
#[derive(Debug, thiserror::Error)]
#[error("diagram {index}: {error}")]
pub struct RenderJobError {
    pub index: usize,
    #[source]
    pub error: RenderError,
}

/// Result of batch rendering with partial failures.
#[derive(Debug)]
pub struct PartialRenderResult {
    /// Successfully rendered artifacts, in job order.
    pub rendered: Vec<RenderedArtifact>,
    /// Errors for jobs that failed, in job order.
    pub errors: Vec<RenderJobError>,
}

/// Render all jobs in parallel on the global rayon pool.
///
/// Jobs are independent, so parallel execution is safe; results are
/// reassembled in job order for deterministic output regardless of
/// completion order.
#[must_use]
pub fn render_all(
    jobs: &[RenderJob],
    renderer: &dyn DiagramRenderer,
    format: OutputFormat,
) -> PartialRenderResult {
    if jobs.is_empty() {
        return PartialRenderResult {
            rendered: Vec::new(),
            errors: Vec::new(),
        };
    }

    let results: Vec<Result<RenderedArtifact, RenderJobError>> = jobs
        .par_iter()
        .map(|job| {
            renderer
                .render(&job.source, &job.output_path, format)
                .map(|()| RenderedArtifact {
                    index: job.index,
                    path: job.output_path.clone(),
                })
                .map_err(|error| RenderJobError {
                    index: job.index,
                    error,
                })
        })
        .collect();

    let mut rendered = Vec::with_capacity(results.len());
    let mut errors = Vec::new();
    for result in results {
        match result {
            Ok(artifact) => rendered.push(artifact),
            Err(error) => errors.push(error),
        }
    }
    PartialRenderResult { rendered, errors }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    /// Backend that fails on sources containing "bad".
    struct FakeRenderer;

    impl DiagramRenderer for FakeRenderer {
        fn render(
            &self,
            source: &str,
            _output_path: &Path,
            _format: OutputFormat,
        ) -> Result<(), RenderError> {
            if source.contains("bad") {
                Err(RenderError::EmptySource)
            } else {
                Ok(())
            }
        }
    }

    fn job(index: usize, source: &str) -> RenderJob {
        RenderJob {
            index,
            source: source.to_owned(),
            output_path: PathBuf::from(format!("out_{index}.png")),
        }
    }

    #[test]
    fn test_empty_batch() {
        let result = render_all(&[], &FakeRenderer, OutputFormat::Png);
        assert!(result.rendered.is_empty());
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_partial_failure_keeps_order() {
        let jobs = vec![job(0, "pie"), job(1, "bad"), job(2, "gantt")];
        let result = render_all(&jobs, &FakeRenderer, OutputFormat::Png);

        let ok: Vec<usize> = result.rendered.iter().map(|r| r.index).collect();
        assert_eq!(ok, vec![0, 2]);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].index, 1);
    }

    #[test]
    fn test_all_succeed() {
        let jobs: Vec<_> = (0..8).map(|i| job(i, "flowchart TD")).collect();
        let result = render_all(&jobs, &FakeRenderer, OutputFormat::Svg);

        let ok: Vec<usize> = result.rendered.iter().map(|r| r.index).collect();
        assert_eq!(ok, (0..8).collect::<Vec<_>>());
        assert!(result.errors.is_empty());
    }
}
