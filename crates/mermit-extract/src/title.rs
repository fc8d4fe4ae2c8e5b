//! Heading and title mining for extracted diagrams.
//!
//! Both helpers are best-effort: they feed output naming and the HTML
//! index, and return `None` whenever nothing convincing is found.

use std::sync::LazyLock;

use regex::Regex;

/// How far above the opening fence to look for a heading.
const HEADER_LOOKBACK: usize = 10;

static BRACKET_TEXT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[([^\]]+)\]").unwrap());
static QUOTED_TEXT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#""([^"]+)""#).unwrap());
static PARTICIPANT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)participant\s+(\w+)").unwrap());
static PIE_TITLE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)title\s+(.+)$").unwrap());
static CLASS_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"class\s+(\w+)|^(\w+)\s*[:{]").unwrap());
static ENTITY_NAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^([A-Z_]+)\s+[|}]").unwrap());

/// Diagram declaration keywords whose line is skipped when mining a title.
const DECLARATION_PREFIXES: &[&str] = &[
    "flowchart",
    "graph",
    "sequencediagram",
    "gantt",
    "classdiagram",
    "statediagram",
    "erdiagram",
];

/// Find the markdown heading immediately above a fence.
///
/// Walks backwards from the line before `fence_idx` (0-based), skipping
/// blanks. Stops at the first non-blank line: a `#` heading yields its
/// text, anything else means the fence has no attached heading.
pub(crate) fn preceding_header(lines: &[&str], fence_idx: usize) -> Option<String> {
    let lookback_floor = fence_idx.saturating_sub(HEADER_LOOKBACK);

    for i in (lookback_floor..fence_idx).rev() {
        let line = lines[i].trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with('#') {
            let text = line.trim_start_matches('#').trim();
            return (!text.is_empty()).then(|| text.to_owned());
        }
        break;
    }
    None
}

/// Mine a descriptive title out of the diagram body.
///
/// Different grammars store titles differently; falls back to the first
/// bracketed or quoted text anywhere in the body.
pub(crate) fn diagram_title(content: &str, diagram_type: &str) -> Option<String> {
    let lines: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    let first = lines.first()?;

    // Skip the declaration line itself when present.
    let lowered = first.to_lowercase();
    let body = if DECLARATION_PREFIXES.iter().any(|p| lowered.starts_with(p)) {
        &lines[1..]
    } else {
        &lines[..]
    };
    if body.is_empty() {
        return None;
    }

    let typed = match diagram_type {
        "flowchart" => body
            .iter()
            .find_map(|l| BRACKET_TEXT.captures(l))
            .map(|c| c[1].trim().to_owned()),
        "sequenceDiagram" => title_directive(body).or_else(|| {
            body.iter()
                .find_map(|l| PARTICIPANT.captures(l))
                .map(|c| c[1].trim().to_owned())
        }),
        "gantt" => title_directive(body),
        "pie" => body
            .iter()
            .filter(|l| l.to_lowercase().contains("title"))
            .find_map(|l| PIE_TITLE.captures(l))
            .map(|c| c[1].trim().to_owned()),
        "classDiagram" => body.iter().find_map(|l| {
            let caps = CLASS_NAME.captures(l)?;
            let name = caps.get(1).or_else(|| caps.get(2))?;
            Some(name.as_str().trim().to_owned())
        }),
        "erDiagram" => body
            .iter()
            .find_map(|l| ENTITY_NAME.captures(l))
            .map(|c| c[1].trim().to_owned()),
        _ => None,
    };

    typed.or_else(|| {
        body.iter().find_map(|l| {
            BRACKET_TEXT
                .captures(l)
                .or_else(|| QUOTED_TEXT.captures(l))
                .map(|c| c[1].trim().to_owned())
        })
    })
}

/// Extract the value of a `title ...` / `title: ...` directive line.
fn title_directive(lines: &[&str]) -> Option<String> {
    lines.iter().find_map(|l| {
        let rest = l.strip_prefix("title")?;
        let title = rest.trim_start_matches(':').trim();
        (!title.is_empty()).then(|| title.to_owned())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_header_directly_above() {
        let lines = vec!["# Architecture", "", "```mermaid", "flowchart TD", "```"];
        assert_eq!(preceding_header(&lines, 2), Some("Architecture".to_owned()));
    }

    #[test]
    fn test_header_strips_all_hash_levels() {
        let lines = vec!["### Deep Section", "```mermaid"];
        assert_eq!(preceding_header(&lines, 1), Some("Deep Section".to_owned()));
    }

    #[test]
    fn test_header_blocked_by_other_content() {
        let lines = vec!["# Title", "some paragraph", "```mermaid"];
        assert_eq!(preceding_header(&lines, 2), None);
    }

    #[test]
    fn test_header_none_at_document_start() {
        let lines = vec!["```mermaid", "flowchart TD", "```"];
        assert_eq!(preceding_header(&lines, 0), None);
    }

    #[test]
    fn test_header_outside_lookback_ignored() {
        let mut lines = vec!["# Far Away"];
        lines.extend(std::iter::repeat_n("", 12));
        lines.push("```mermaid");
        assert_eq!(preceding_header(&lines, lines.len() - 1), None);
    }

    #[test]
    fn test_empty_header_is_none() {
        let lines = vec!["##", "```mermaid"];
        assert_eq!(preceding_header(&lines, 1), None);
    }

    #[test]
    fn test_flowchart_title_from_first_node() {
        let content = "flowchart TD\n    A[Start Process] --> B[End]";
        assert_eq!(
            diagram_title(content, "flowchart"),
            Some("Start Process".to_owned())
        );
    }

    #[test]
    fn test_sequence_title_directive() {
        let content = "sequenceDiagram\n    title Login Flow\n    Alice->>Bob: hi";
        assert_eq!(
            diagram_title(content, "sequenceDiagram"),
            Some("Login Flow".to_owned())
        );
    }

    #[test]
    fn test_sequence_falls_back_to_participant() {
        let content = "sequenceDiagram\n    participant Alice\n    Alice->>Bob: hi";
        assert_eq!(
            diagram_title(content, "sequenceDiagram"),
            Some("Alice".to_owned())
        );
    }

    #[test]
    fn test_gantt_title_with_colon() {
        let content = "gantt\n    title: Release Plan\n    section A";
        assert_eq!(
            diagram_title(content, "gantt"),
            Some("Release Plan".to_owned())
        );
    }

    #[test]
    fn test_pie_title() {
        let content = "pie\n    title Pet Adoption\n    \"Dogs\": 10";
        assert_eq!(diagram_title(content, "pie"), Some("Pet Adoption".to_owned()));
    }

    #[test]
    fn test_class_diagram_first_class() {
        let content = "classDiagram\n    class Animal\n    Animal : +name";
        assert_eq!(
            diagram_title(content, "classDiagram"),
            Some("Animal".to_owned())
        );
    }

    #[test]
    fn test_er_diagram_first_entity() {
        let content = "erDiagram\n    CUSTOMER ||--o{ ORDER : places";
        assert_eq!(
            diagram_title(content, "erDiagram"),
            Some("CUSTOMER".to_owned())
        );
    }

    #[test]
    fn test_generic_fallback_quoted_text() {
        let content = "mindmap\n    root(\"Big Idea\")";
        assert_eq!(diagram_title(content, "mindmap"), Some("Big Idea".to_owned()));
    }

    #[test]
    fn test_no_title_found() {
        let content = "gitGraph\n    commit\n    commit";
        assert_eq!(diagram_title(content, "gitGraph"), None);
    }

    #[test]
    fn test_empty_content_has_no_title() {
        assert_eq!(diagram_title("", "unknown"), None);
    }
}
