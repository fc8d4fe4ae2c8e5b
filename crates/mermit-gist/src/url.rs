//! Gist URL recognition and ID extraction.

use std::sync::LazyLock;

use regex::Regex;

/// Matches gist URLs with or without scheme, username and `.git` suffix.
static GIST_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:https?://)?gist\.github\.com/(?:[a-zA-Z0-9_-]+/)?[a-f0-9]+(?:\.git)?/?$")
        .unwrap()
});

/// Extracts the hex gist ID, ignoring an optional leading username.
static GIST_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"gist\.github\.com/(?:[a-zA-Z0-9_-]+/)?([a-f0-9]+)").unwrap());

/// Check whether a string is a GitHub Gist URL.
///
/// Accepts `https://gist.github.com/user/<id>`, the anonymous form
/// without a username, the scheme-less form and a trailing `.git`.
#[must_use]
pub fn is_gist_url(url: &str) -> bool {
    GIST_URL.is_match(url.trim())
}

/// Extract the gist ID from a gist URL.
///
/// Returns `None` when the URL does not contain a recognizable ID.
#[must_use]
pub fn parse_gist_id(url: &str) -> Option<String> {
    let cleaned = url.trim().trim_end_matches('/');
    let cleaned = cleaned.strip_suffix(".git").unwrap_or(cleaned);
    GIST_ID
        .captures(cleaned)
        .map(|captures| captures[1].to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_is_gist_url_with_username() {
        assert!(is_gist_url("https://gist.github.com/alice/abc123def456"));
    }

    #[test]
    fn test_is_gist_url_anonymous() {
        assert!(is_gist_url("https://gist.github.com/abc123def456"));
    }

    #[test]
    fn test_is_gist_url_without_scheme() {
        assert!(is_gist_url("gist.github.com/alice/abc123"));
    }

    #[test]
    fn test_is_gist_url_git_suffix() {
        assert!(is_gist_url("https://gist.github.com/alice/abc123.git"));
    }

    #[test]
    fn test_is_gist_url_rejects_repo() {
        assert!(!is_gist_url("https://github.com/user/repo"));
    }

    #[test]
    fn test_is_gist_url_rejects_plain_path() {
        assert!(!is_gist_url("./docs/readme.md"));
        assert!(!is_gist_url(""));
    }

    #[test]
    fn test_parse_gist_id_with_username() {
        assert_eq!(
            parse_gist_id("https://gist.github.com/alice/abc123def456"),
            Some(String::from("abc123def456"))
        );
    }

    #[test]
    fn test_parse_gist_id_anonymous() {
        assert_eq!(
            parse_gist_id("https://gist.github.com/abc123def456"),
            Some(String::from("abc123def456"))
        );
    }

    #[test]
    fn test_parse_gist_id_strips_git_and_slash() {
        assert_eq!(
            parse_gist_id("https://gist.github.com/alice/abc123.git/"),
            Some(String::from("abc123"))
        );
    }

    #[test]
    fn test_parse_gist_id_rejects_other_hosts() {
        assert_eq!(parse_gist_id("https://github.com/user/abc123"), None);
    }
}
