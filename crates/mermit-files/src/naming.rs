//! Output filename and project naming.

use std::path::Path;

/// Build the output filename for a rendered diagram:
/// `"{stem}_{index}_{diagram_type}.{extension}"`.
///
/// The triple `(source, index, diagram_type)` is stable across runs for
/// unchanged input, so re-rendering overwrites the same artifact.
#[must_use]
pub fn output_filename(source: &Path, index: usize, diagram_type: &str, extension: &str) -> String {
    let stem = source
        .file_stem()
        .map_or_else(|| "diagram".into(), |s| s.to_string_lossy());
    format!("{stem}_{index}_{diagram_type}.{extension}")
}

/// Project name for a source file: the directory `levels_up` levels above
/// it. Falls back to the immediate parent when the path is too shallow.
#[must_use]
pub fn project_name(source: &Path, levels_up: usize) -> String {
    let mut dir = source.parent();
    for _ in 1..levels_up {
        match dir.and_then(Path::parent) {
            Some(parent) if parent.file_name().is_some() => dir = Some(parent),
            _ => break,
        }
    }

    dir.and_then(Path::file_name)
        .or_else(|| source.parent().and_then(Path::file_name))
        .map_or_else(|| "project".to_owned(), |n| n.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    #[test]
    fn test_output_filename_format() {
        assert_eq!(
            output_filename(Path::new("architecture.md"), 0, "flowchart", "png"),
            "architecture_0_flowchart.png"
        );
        assert_eq!(
            output_filename(Path::new("docs/api.markdown"), 3, "sequenceDiagram", "svg"),
            "api_3_sequenceDiagram.svg"
        );
    }

    #[test]
    fn test_output_filename_unknown_type() {
        assert_eq!(
            output_filename(Path::new("notes.md"), 1, "unknown", "png"),
            "notes_1_unknown.png"
        );
    }

    #[test]
    fn test_project_name_levels() {
        let path = PathBuf::from("/home/dev/projects/myapp/docs/file.md");
        assert_eq!(project_name(&path, 1), "docs");
        assert_eq!(project_name(&path, 2), "myapp");
        assert_eq!(project_name(&path, 3), "projects");
    }

    #[test]
    fn test_project_name_shallow_path_falls_back() {
        let path = PathBuf::from("docs/file.md");
        assert_eq!(project_name(&path, 5), "docs");
    }
}
