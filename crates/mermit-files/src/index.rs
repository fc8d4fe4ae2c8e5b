//! HTML index generation.
//!
//! Writes an `index.html` gallery into the output directory: one section
//! per source file, with a card grid of its rendered diagrams.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::error::FilesError;
use crate::mapping::DiagramMapping;

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Mermaid Diagram Index</title>
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            line-height: 1.6;
            max-width: 1200px;
            margin: 0 auto;
            padding: 20px;
            background-color: #f5f5f5;
        }
        h1 { color: #333; border-bottom: 3px solid #007acc; padding-bottom: 10px; }
        .source-section {
            background: white;
            margin: 20px 0;
            padding: 20px;
            border-radius: 8px;
            box-shadow: 0 2px 4px rgba(0,0,0,0.1);
        }
        .source-header { display: flex; justify-content: space-between; align-items: center; }
        .source-file { font-size: 1.2em; font-weight: bold; color: #007acc; }
        .timestamp { color: #666; font-size: 0.9em; }
        .diagrams-grid {
            display: grid;
            grid-template-columns: repeat(auto-fill, minmax(300px, 1fr));
            gap: 20px;
            margin-top: 15px;
        }
        .diagram-card { border: 1px solid #ddd; border-radius: 4px; padding: 10px; background: #fafafa; }
        .diagram-card img { max-width: 100%; height: auto; border-radius: 4px; }
        .diagram-filename { margin-top: 8px; font-size: 0.9em; color: #555; word-break: break-all; }
        .no-diagrams { color: #999; font-style: italic; }
    </style>
</head>
<body>
    <h1>Mermaid Diagram Index</h1>
"#;

const PAGE_FOOT: &str = "</body>\n</html>\n";

/// Escape HTML special characters.
#[must_use]
fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

/// Render the index page for `mappings` into a string.
#[must_use]
pub fn render_index(mappings: &[DiagramMapping]) -> String {
    let mut html = String::from(PAGE_HEAD);

    if mappings.is_empty() {
        html.push_str("    <p class=\"no-diagrams\">No diagrams generated yet.</p>\n");
    }

    for mapping in mappings {
        let source_name = mapping
            .source_file
            .file_name()
            .map_or_else(|| mapping.source_file.to_string_lossy(), |n| n.to_string_lossy());
        let timestamp = mapping.timestamp.format("%Y-%m-%d %H:%M:%S UTC");

        let _ = write!(
            html,
            r#"    <div class="source-section">
        <div class="source-header">
            <div class="source-file">{}</div>
            <div class="timestamp">{timestamp}</div>
        </div>
        <div><strong>Source:</strong> <code>{}</code></div>
"#,
            escape_html(&source_name),
            escape_html(&mapping.source_file.to_string_lossy()),
        );

        if mapping.diagram_files.is_empty() {
            html.push_str("        <p class=\"no-diagrams\">No diagrams found.</p>\n");
        } else {
            html.push_str("        <div class=\"diagrams-grid\">\n");
            for file in &mapping.diagram_files {
                // Artifacts sit next to index.html, link by filename.
                let name = file
                    .file_name()
                    .map_or_else(|| file.to_string_lossy(), |n| n.to_string_lossy());
                let escaped = escape_html(&name);
                let _ = write!(
                    html,
                    r#"            <div class="diagram-card">
                <img src="{escaped}" alt="{escaped}">
                <div class="diagram-filename">{escaped}</div>
            </div>
"#,
                );
            }
            html.push_str("        </div>\n");
        }
        html.push_str("    </div>\n");
    }

    html.push_str(PAGE_FOOT);
    html
}

/// Write `index.html` for `mappings` into `output_dir`.
pub fn generate_index_html(
    mappings: &[DiagramMapping],
    output_dir: &Path,
) -> Result<(), FilesError> {
    crate::ensure_output_dir(output_dir)?;
    let path = output_dir.join("index.html");
    fs::write(&path, render_index(mappings)).map_err(|source| FilesError::Write { path, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn mapping(source: &str, files: &[&str]) -> DiagramMapping {
        DiagramMapping::new(
            PathBuf::from(source),
            files.iter().map(PathBuf::from).collect(),
        )
    }

    #[test]
    fn test_empty_index() {
        let html = render_index(&[]);
        assert!(html.contains("No diagrams generated yet."));
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.ends_with("</html>\n"));
    }

    #[test]
    fn test_index_lists_diagrams() {
        let html = render_index(&[mapping(
            "docs/arch.md",
            &["out/arch_0_flowchart.png", "out/arch_1_pie.png"],
        )]);

        assert!(html.contains("arch.md"));
        assert!(html.contains(r#"<img src="arch_0_flowchart.png""#));
        assert!(html.contains(r#"<img src="arch_1_pie.png""#));
    }

    #[test]
    fn test_index_escapes_html() {
        let html = render_index(&[mapping("docs/<script>.md", &[])]);
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>.md"));
    }

    #[test]
    fn test_mapping_without_files() {
        let html = render_index(&[mapping("docs/empty.md", &[])]);
        assert!(html.contains("No diagrams found."));
    }

    #[test]
    fn test_generate_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        generate_index_html(&[], dir.path()).unwrap();

        let content = fs::read_to_string(dir.path().join("index.html")).unwrap();
        assert!(content.contains("Mermaid Diagram Index"));
    }
}
