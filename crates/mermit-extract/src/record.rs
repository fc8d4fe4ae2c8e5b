//! Extracted diagram records and scan diagnostics.

use std::path::PathBuf;

/// A single Mermaid diagram extracted from a markdown document.
///
/// Records are created only by the scanner and never mutated afterwards.
/// Within one extraction call, `index` values are contiguous from 0 in
/// document order, and `end_line > start_line` always holds (the opening
/// and closing fence lines are distinct).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramRecord {
    /// Raw text strictly between the fences. Leading/trailing blank lines
    /// are stripped, internal whitespace preserved. May be empty.
    pub content: String,
    /// Path or logical name of the originating document.
    pub source: PathBuf,
    /// 1-based line number of the opening fence marker.
    pub start_line: u32,
    /// 1-based line number of the closing fence marker.
    pub end_line: u32,
    /// Classification label, or [`UNKNOWN_TYPE`](crate::UNKNOWN_TYPE).
    pub diagram_type: String,
    /// 0-based ordinal among emitted records of the same source.
    pub index: usize,
    /// Nearest markdown heading above the opening fence, if any.
    pub preceding_header: Option<String>,
    /// Best-effort title mined from the diagram body, if any.
    pub diagram_title: Option<String>,
}

/// Why a region of the document was skipped during scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// A mermaid fence was opened but never closed before end of input.
    UnterminatedFence,
}

/// A malformed region skipped by the scanner.
///
/// Skips are diagnostics, not errors: the scanner degrades gracefully on
/// malformed input and callers may log these if desired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRegion {
    /// 1-based line number where the skipped region starts.
    pub start_line: u32,
    pub reason: SkipReason,
}
