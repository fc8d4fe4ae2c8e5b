//! Mermaid diagram extraction from markdown documents.
//!
//! This crate provides the extraction core for mermit:
//! - [`Scanner`]: line-oriented fence scanner producing [`DiagramRecord`]s
//! - [`Classifier`]: diagram-type classification from first-line prefixes
//! - Batch extraction across many files with skip-and-continue semantics
//!
//! Extraction is a pure, single-pass computation over in-memory text.
//! Content-shape problems (empty blocks, unknown types, unterminated
//! fences) never raise; only source-resolution failures surface as
//! [`ExtractError`].
//!
//! # Example
//!
//! ```
//! use mermit_extract::extract;
//!
//! let markdown = "```mermaid\nflowchart TD\n    A --> B\n```\n";
//! let records = extract(markdown, "docs/arch.md");
//!
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0].diagram_type, "flowchart");
//! assert_eq!(records[0].index, 0);
//! ```

mod classify;
mod error;
mod record;
mod scanner;
mod title;

pub use classify::{Classifier, ClassifyRule, UNKNOWN_TYPE};
pub use error::ExtractError;
pub use record::{DiagramRecord, SkipReason, SkippedRegion};
pub use scanner::{ExtractBatch, ExtractFailure, ScanOutcome, Scanner, extract, extract_path};
