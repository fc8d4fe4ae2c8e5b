//! Environment variable expansion for configuration strings.
//!
//! Supports `${VAR}` (errors if unset) and `${VAR:-default}`. Bare
//! `$VAR` without braces is left alone.

use crate::ConfigError;

/// Expand environment variable references in a string.
///
/// Returns the original string unchanged if no `${}` patterns are
/// present.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    let expanded = shellexpand::env_with_context(value, |var| {
        std::env::var(var).map(Some)
    })
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", e.var_name),
    })?;
    Ok(expanded.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_expansion_needed() {
        let result = expand_env("plain/path", "output.dir").unwrap();
        assert_eq!(result, "plain/path");
    }

    #[test]
    fn test_expand_simple_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("MERMIT_TEST_VAR", "diagrams");
        }
        let result = expand_env("${MERMIT_TEST_VAR}/out", "output.dir").unwrap();
        assert_eq!(result, "diagrams/out");
        unsafe {
            std::env::remove_var("MERMIT_TEST_VAR");
        }
    }

    #[test]
    fn test_expand_with_default() {
        unsafe {
            std::env::remove_var("MERMIT_UNSET_VAR");
        }
        let result = expand_env("${MERMIT_UNSET_VAR:-fallback}", "output.dir").unwrap();
        assert_eq!(result, "fallback");
    }

    #[test]
    fn test_unset_var_errors() {
        unsafe {
            std::env::remove_var("MERMIT_MISSING_VAR");
        }
        let result = expand_env("${MERMIT_MISSING_VAR}", "render.ink_url");
        assert!(matches!(result, Err(ConfigError::EnvVar { .. })));
    }
}
