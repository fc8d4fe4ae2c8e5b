//! Diagram-type classification from first-line prefixes.
//!
//! Mermaid declares the diagram grammar on the first non-blank line of a
//! block (`flowchart TD`, `sequenceDiagram`, ...). Classification is a
//! starts-with match against an ordered rule table, checked in a fixed
//! priority order since diagram headers carry trailing tokens.

/// Sentinel label for bodies that match no rule (or are empty).
pub const UNKNOWN_TYPE: &str = "unknown";

/// Builtin vocabulary, in priority order. Prefixes are lowercase; matching
/// lowercases the candidate line first.
const BUILTIN_RULES: &[(&str, &str)] = &[
    ("flowchart", "flowchart"),
    ("graph", "flowchart"),
    ("sequencediagram", "sequenceDiagram"),
    ("classdiagram", "classDiagram"),
    ("statediagram", "stateDiagram"),
    ("erdiagram", "erDiagram"),
    ("journey", "journey"),
    ("gantt", "gantt"),
    ("pie", "pie"),
    ("gitgraph", "gitGraph"),
    ("mindmap", "mindmap"),
];

/// A single classification rule: lowercase prefix and the label it yields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifyRule {
    pub prefix: String,
    pub label: String,
}

impl ClassifyRule {
    /// Create a rule. The prefix is lowercased; the label is kept as-is.
    pub fn new(prefix: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into().to_lowercase(),
            label: label.into(),
        }
    }
}

/// Diagram-type classifier.
///
/// The vocabulary is data, not logic: [`Classifier::default`] carries the
/// builtin Mermaid table, and callers may prepend their own rules (e.g.
/// from configuration) which take precedence on prefix collisions.
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Vec<ClassifyRule>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self {
            rules: BUILTIN_RULES
                .iter()
                .map(|&(prefix, label)| ClassifyRule::new(prefix, label))
                .collect(),
        }
    }
}

impl Classifier {
    /// Classifier with `extra` rules checked ahead of the builtin table.
    #[must_use]
    pub fn with_rules(extra: Vec<ClassifyRule>) -> Self {
        let mut classifier = Self { rules: extra };
        classifier.rules.extend(Self::default().rules);
        classifier
    }

    /// Classify a diagram body by its first non-blank line.
    ///
    /// Returns [`UNKNOWN_TYPE`] for empty bodies and unmatched prefixes;
    /// an unknown type is a valid label, not an error.
    #[must_use]
    pub fn classify(&self, body: &str) -> &str {
        let Some(first) = body.lines().map(str::trim).find(|l| !l.is_empty()) else {
            return UNKNOWN_TYPE;
        };
        let lowered = first.to_lowercase();

        self.rules
            .iter()
            .find(|rule| lowered.starts_with(&rule.prefix))
            .map_or(UNKNOWN_TYPE, |rule| rule.label.as_str())
    }
}
