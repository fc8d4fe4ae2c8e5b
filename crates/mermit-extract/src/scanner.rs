//! Line-oriented fence scanner.
//!
//! A single linear pass over the document tracks fence state and emits a
//! [`DiagramRecord`] for every correctly terminated fence pair whose
//! opening tag equals `mermaid` (case-insensitive, trimmed). All other
//! fences are tracked so their bodies are skipped, but never emitted.
//! Fences do not nest: once inside a fence, open-looking lines are content
//! until the matching close.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::classify::Classifier;
use crate::error::ExtractError;
use crate::record::{DiagramRecord, SkipReason, SkippedRegion};
use crate::title;

/// Minimum marker run length for a fence line.
const MIN_FENCE_LEN: usize = 3;

/// Tag that marks a fence as diagram-bearing.
const DIAGRAM_TAG: &str = "mermaid";

/// A parsed fence marker line.
#[derive(Debug, Clone, Copy)]
struct FenceLine<'a> {
    marker: u8,
    len: usize,
    tag: &'a str,
}

/// Parse a line as a fence marker: a run of three or more backticks or
/// tildes at the start of the line, optionally followed by a tag, with
/// nothing else. Returns `None` for ordinary text, including prose that
/// merely mentions a tag word.
fn parse_fence_line(line: &str) -> Option<FenceLine<'_>> {
    let trimmed = line.trim_end();
    let marker = *trimmed.as_bytes().first()?;
    if marker != b'`' && marker != b'~' {
        return None;
    }

    let rest = trimmed.trim_start_matches(marker as char);
    let len = trimmed.len() - rest.len();
    if len < MIN_FENCE_LEN {
        return None;
    }

    let tag = rest.trim();
    // An info string containing the fence character is not a fence line.
    if tag.contains(marker as char) {
        return None;
    }

    Some(FenceLine { marker, len, tag })
}

/// Whether `line` closes a fence opened by `open`: same marker character,
/// same or greater length, and no trailing tag.
fn closes(open: FenceLine<'_>, line: FenceLine<'_>) -> bool {
    line.marker == open.marker && line.len >= open.len && line.tag.is_empty()
}

/// An open fence awaiting its close.
struct OpenFence<'a> {
    fence: FenceLine<'a>,
    start_idx: usize,
    body: Vec<&'a str>,
}

impl<'a> OpenFence<'a> {
    fn new(fence: FenceLine<'a>, start_idx: usize) -> Self {
        Self {
            fence,
            start_idx,
            body: Vec::new(),
        }
    }

    fn is_diagram(&self) -> bool {
        self.fence.tag.eq_ignore_ascii_case(DIAGRAM_TAG)
    }
}

/// Join body lines and strip fully-blank leading/trailing lines. Internal
/// blank lines and indentation are preserved.
fn trim_blank_edges(body: &[&str]) -> String {
    let Some(start) = body.iter().position(|l| !l.trim().is_empty()) else {
        return String::new();
    };
    let end = body.iter().rposition(|l| !l.trim().is_empty()).unwrap_or(start);
    body[start..=end].join("\n")
}

/// Result of scanning one document: emitted records plus diagnostics for
/// malformed regions that were skipped, never raised.
#[derive(Debug)]
pub struct ScanOutcome {
    pub records: Vec<DiagramRecord>,
    pub skipped: Vec<SkippedRegion>,
}

/// Failure to read one source in a batch extraction.
#[derive(Debug)]
pub struct ExtractFailure {
    pub path: PathBuf,
    pub error: ExtractError,
}

/// Result of a batch extraction with skip-and-continue semantics.
///
/// Records keep input order across sources; `index` numbering is local to
/// each source. One unreadable file lands in `failures` without aborting
/// the rest of the batch.
#[derive(Debug)]
pub struct ExtractBatch {
    pub records: Vec<DiagramRecord>,
    pub failures: Vec<ExtractFailure>,
}

/// Mermaid fence scanner.
///
/// Stateless between calls; extraction is idempotent and re-extracting
/// unchanged text yields byte-identical records.
///
/// # Example
///
/// ```
/// use mermit_extract::{Classifier, ClassifyRule, Scanner};
///
/// let scanner = Scanner::new()
///     .with_classifier(Classifier::with_rules(vec![ClassifyRule::new("timeline", "timeline")]));
/// let records = scanner.extract("```mermaid\ntimeline\n```\n", "notes.md");
/// assert_eq!(records[0].diagram_type, "timeline");
/// ```
#[derive(Debug, Default)]
pub struct Scanner {
    classifier: Classifier,
}

impl Scanner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the default classification vocabulary.
    #[must_use]
    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Scan a document, returning records and skip diagnostics.
    pub fn scan(&self, text: &str, source: impl AsRef<Path>) -> ScanOutcome {
        let source = source.as_ref();
        let lines: Vec<&str> = text.lines().collect();

        let mut records = Vec::new();
        let mut skipped = Vec::new();
        let mut index = 0usize;

        let mut open: Option<OpenFence<'_>> = None;

        for (i, line) in lines.iter().enumerate() {
            match open.take() {
                None => {
                    if let Some(fence) = parse_fence_line(line) {
                        open = Some(OpenFence::new(fence, i));
                    }
                }
                Some(mut block) => {
                    let is_close =
                        parse_fence_line(line).is_some_and(|c| closes(block.fence, c));
                    if !is_close {
                        block.body.push(line);
                        open = Some(block);
                        continue;
                    }
                    if block.is_diagram() {
                        let content = trim_blank_edges(&block.body);
                        let diagram_type = self.classifier.classify(&content).to_owned();
                        let diagram_title = title::diagram_title(&content, &diagram_type);
                        records.push(DiagramRecord {
                            content,
                            source: source.to_path_buf(),
                            start_line: to_line_no(block.start_idx),
                            end_line: to_line_no(i),
                            diagram_type,
                            index,
                            preceding_header: title::preceding_header(&lines, block.start_idx),
                            diagram_title,
                        });
                        index += 1;
                    }
                }
            }
        }

        // Unterminated fence: boundary undefined, discard rather than guess.
        if let Some(block) = open
            && block.is_diagram()
        {
            tracing::debug!(
                source = %source.display(),
                line = to_line_no(block.start_idx),
                "skipping unterminated mermaid fence"
            );
            skipped.push(SkippedRegion {
                start_line: to_line_no(block.start_idx),
                reason: SkipReason::UnterminatedFence,
            });
        }

        ScanOutcome { records, skipped }
    }

    /// Extract all diagram records from in-memory text.
    pub fn extract(&self, text: &str, source: impl AsRef<Path>) -> Vec<DiagramRecord> {
        self.scan(text, source).records
    }

    /// Extract from a file on disk.
    ///
    /// A missing file is [`ExtractError::SourceNotFound`]; a readable file
    /// with zero diagrams is `Ok(vec![])`.
    pub fn extract_path(&self, path: impl AsRef<Path>) -> Result<Vec<DiagramRecord>, ExtractError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ExtractError::SourceNotFound {
                path: path.to_path_buf(),
            },
            _ => ExtractError::Read {
                path: path.to_path_buf(),
                source: e,
            },
        })?;
        Ok(self.extract(&text, path))
    }

    /// Extract from many files, skip-and-continue.
    ///
    /// Sources are scanned in parallel (no shared mutable state exists
    /// between per-document scans) and results are reassembled in input
    /// order, so the output is deterministic.
    pub fn extract_many<P: AsRef<Path> + Sync>(&self, paths: &[P]) -> ExtractBatch {
        let results: Vec<Result<Vec<DiagramRecord>, ExtractFailure>> = paths
            .par_iter()
            .map(|path| {
                self.extract_path(path).map_err(|error| ExtractFailure {
                    path: path.as_ref().to_path_buf(),
                    error,
                })
            })
            .collect();

        let mut records = Vec::new();
        let mut failures = Vec::new();
        for result in results {
            match result {
                Ok(found) => records.extend(found),
                Err(failure) => failures.push(failure),
            }
        }
        ExtractBatch { records, failures }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn to_line_no(idx: usize) -> u32 {
    (idx + 1) as u32
}

/// Extract with the default classifier. See [`Scanner::extract`].
pub fn extract(text: &str, source: impl AsRef<Path>) -> Vec<DiagramRecord> {
    Scanner::new().extract(text, source)
}

/// Extract from a file with the default classifier. See [`Scanner::extract_path`].
pub fn extract_path(path: impl AsRef<Path>) -> Result<Vec<DiagramRecord>, ExtractError> {
    Scanner::new().extract_path(path)
}
