//! Linked-markdown rewriting.
//!
//! Produces a `{stem}_linked.md` copy of a source document in which every
//! mermaid fence is replaced by a wiki-style image link to its rendered
//! artifact. Fence locations come from the scanner's records (line
//! ranges), not a second ad-hoc parse.

use std::fs;
use std::path::{Path, PathBuf};

use mermit_extract::extract;

use crate::error::FilesError;

/// Wiki-style link for a rendered diagram, relative to the source's
/// directory when possible.
fn image_link(diagram: &Path, source_dir: &Path) -> String {
    let target = diagram.strip_prefix(source_dir).unwrap_or(diagram);
    format!("![[{}]]", target.display())
}

/// Rewrite `source` with its mermaid fences replaced by image links.
///
/// `diagram_files` pairs with the extracted diagrams by index; when fewer
/// artifacts than diagrams exist (render failures), the remaining fences
/// are left untouched. Returns the path of the written `_linked` file.
pub fn create_linked_markdown(
    source: &Path,
    diagram_files: &[PathBuf],
) -> Result<PathBuf, FilesError> {
    let text = fs::read_to_string(source).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => FilesError::SourceNotFound {
            path: source.to_path_buf(),
        },
        _ => FilesError::Read {
            path: source.to_path_buf(),
            source: e,
        },
    })?;

    let records = extract(&text, source);
    let source_dir = source.parent().unwrap_or_else(|| Path::new(""));

    // Replacement spans, 1-based inclusive line ranges in document order.
    let spans: Vec<(u32, u32, String)> = records
        .iter()
        .zip(diagram_files)
        .map(|(record, file)| {
            (
                record.start_line,
                record.end_line,
                image_link(file, source_dir),
            )
        })
        .collect();

    let mut output = String::with_capacity(text.len());
    let mut spans_iter = spans.iter().peekable();

    for (i, line) in text.lines().enumerate() {
        let lineno = u32::try_from(i + 1).unwrap_or(u32::MAX);
        if let Some((start, end, link)) = spans_iter.peek() {
            if lineno == *start {
                output.push_str(link);
                output.push('\n');
                continue;
            }
            if lineno > *start && lineno <= *end {
                if lineno == *end {
                    spans_iter.next();
                }
                continue;
            }
        }
        output.push_str(line);
        output.push('\n');
    }
    if !text.ends_with('\n') {
        output.pop();
    }

    let stem = source
        .file_stem()
        .map_or_else(|| "document".into(), |s| s.to_string_lossy());
    let extension = source
        .extension()
        .map_or_else(|| "md".into(), |s| s.to_string_lossy());
    let out_path = source_dir.join(format!("{stem}_linked.{extension}"));

    fs::write(&out_path, output).map_err(|source| FilesError::Write {
        path: out_path.clone(),
        source,
    })?;
    Ok(out_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_fence_replaced_with_link() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("doc.md");
        fs::write(
            &source,
            "# Title\n\n```mermaid\nflowchart TD\n    A --> B\n```\n\nAfter.\n",
        )
        .unwrap();

        let artifact = dir.path().join("doc_0_flowchart.png");
        let linked = create_linked_markdown(&source, &[artifact]).unwrap();

        assert_eq!(linked, dir.path().join("doc_linked.md"));
        let content = fs::read_to_string(&linked).unwrap();
        assert_eq!(
            content,
            "# Title\n\n![[doc_0_flowchart.png]]\n\nAfter.\n"
        );
    }

    #[test]
    fn test_multiple_fences_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("multi.md");
        fs::write(
            &source,
            "```mermaid\npie\n```\nmiddle\n```mermaid\ngantt\n```\n",
        )
        .unwrap();

        let a = dir.path().join("multi_0_pie.png");
        let b = dir.path().join("multi_1_gantt.png");
        create_linked_markdown(&source, &[a, b]).unwrap();

        let content = fs::read_to_string(dir.path().join("multi_linked.md")).unwrap();
        assert_eq!(
            content,
            "![[multi_0_pie.png]]\nmiddle\n![[multi_1_gantt.png]]\n"
        );
    }

    #[test]
    fn test_code_fences_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("mixed.md");
        fs::write(
            &source,
            "```rust\nfn main() {}\n```\n```mermaid\npie\n```\n",
        )
        .unwrap();

        let artifact = dir.path().join("mixed_0_pie.png");
        create_linked_markdown(&source, &[artifact]).unwrap();

        let content = fs::read_to_string(dir.path().join("mixed_linked.md")).unwrap();
        assert_eq!(content, "```rust\nfn main() {}\n```\n![[mixed_0_pie.png]]\n");
    }

    #[test]
    fn test_more_fences_than_artifacts_leaves_rest() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("partial.md");
        fs::write(&source, "```mermaid\npie\n```\n```mermaid\ngantt\n```\n").unwrap();

        let artifact = dir.path().join("partial_0_pie.png");
        create_linked_markdown(&source, &[artifact]).unwrap();

        let content = fs::read_to_string(dir.path().join("partial_linked.md")).unwrap();
        assert_eq!(
            content,
            "![[partial_0_pie.png]]\n```mermaid\ngantt\n```\n"
        );
    }

    #[test]
    fn test_missing_source_is_error() {
        let err = create_linked_markdown(Path::new("/nonexistent/doc.md"), &[]).unwrap_err();
        assert!(matches!(err, FilesError::SourceNotFound { .. }));
    }

    #[test]
    fn test_artifact_outside_source_dir_uses_full_path() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("doc.md");
        fs::write(&source, "```mermaid\npie\n```\n").unwrap();

        let artifact = PathBuf::from("/elsewhere/out.png");
        create_linked_markdown(&source, &[artifact]).unwrap();

        let content = fs::read_to_string(dir.path().join("doc_linked.md")).unwrap();
        assert_eq!(content, "![[/elsewhere/out.png]]\n");
    }
}
