//! Configuration management for mermit.
//!
//! Parses `mermit.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].

use serde::Deserialize;
use std::path::{Path, PathBuf};

mod expand;

use expand::expand_env;

/// Configuration filename to search for.
pub const CONFIG_FILENAME: &str = "mermit.toml";

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Clone, Default)]
pub struct CliSettings {
    /// Override output directory.
    pub output_dir: Option<PathBuf>,
    /// Override output format (`png` or `svg`).
    pub format: Option<String>,
    /// Override rendering backend (`local` or `ink`).
    pub backend: Option<Backend>,
    /// Override mermaid.ink instance URL.
    pub ink_url: Option<String>,
    /// Override recursive discovery flag.
    pub recursive: Option<bool>,
    /// Override rendering timeout.
    pub timeout_secs: Option<u64>,
}

impl CliSettings {
    /// Check if all override fields are None (no overrides specified).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.output_dir.is_none()
            && self.format.is_none()
            && self.backend.is_none()
            && self.ink_url.is_none()
            && self.recursive.is_none()
            && self.timeout_secs.is_none()
    }
}

/// Rendering backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// mermaid-cli subprocess, needs Node.js.
    #[default]
    Local,
    /// mermaid.ink HTTP API.
    Ink,
}

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub output: OutputConfig,
    pub render: RenderConfig,
    pub discover: DiscoverConfig,
    pub classify: ClassifyConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Output artifact configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory where rendered diagrams and the index are written.
    pub dir: String,
    /// Output image format (`png` or `svg`).
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: "./diagrams".to_string(),
            format: "png".to_string(),
        }
    }
}

/// Rendering configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub backend: Backend,
    /// mermaid.ink instance URL.
    pub ink_url: String,
    /// Mermaid theme name.
    pub theme: String,
    /// Device scale factor for local rendering.
    pub scale: u32,
    /// Page width for local rendering.
    pub width: u32,
    /// Per-diagram rendering timeout.
    pub timeout_secs: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            ink_url: "https://mermaid.ink".to_string(),
            theme: "default".to_string(),
            scale: 3,
            width: 2400,
            timeout_secs: 60,
        }
    }
}

/// Markdown discovery configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DiscoverConfig {
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Glob patterns to exclude, matched against relative paths.
    pub exclude: Vec<String>,
}

impl Default for DiscoverConfig {
    fn default() -> Self {
        Self {
            recursive: true,
            exclude: Vec::new(),
        }
    }
}

/// Extra classification rules, checked before the built-in vocabulary.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ClassifyConfig {
    pub rules: Vec<ClassifyRuleConfig>,
}

/// One prefix-to-label classification rule.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifyRuleConfig {
    /// First-line prefix, matched case-insensitively.
    pub prefix: String,
    /// Diagram type label to assign.
    pub label: String,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for {field}: {message}")]
    Invalid { field: String, message: String },

    #[error("environment variable error in {field}: {message}")]
    EnvVar { field: String, message: String },
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise,
    /// searches for `mermit.toml` in the current directory and parents
    /// and falls back to defaults when none exists.
    ///
    /// CLI settings are applied after loading, so CLI arguments take
    /// precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit `config_path` doesn't exist,
    /// parsing fails, or a value fails validation.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;
        Ok(config)
    }

    /// Load and parse a specific config file, expanding env vars.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.output.dir = expand_env(&config.output.dir, "output.dir")?;
        config.render.ink_url = expand_env(&config.render.ink_url, "render.ink_url")?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(output_dir) = &settings.output_dir {
            self.output.dir = output_dir.display().to_string();
        }
        if let Some(format) = &settings.format {
            self.output.format.clone_from(format);
        }
        if let Some(backend) = settings.backend {
            self.render.backend = backend;
        }
        if let Some(ink_url) = &settings.ink_url {
            self.render.ink_url.clone_from(ink_url);
        }
        if let Some(recursive) = settings.recursive {
            self.discover.recursive = recursive;
        }
        if let Some(timeout_secs) = settings.timeout_secs {
            self.render.timeout_secs = timeout_secs;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.output.format != "png" && self.output.format != "svg" {
            return Err(ConfigError::Invalid {
                field: "output.format".to_string(),
                message: format!("expected 'png' or 'svg', got '{}'", self.output.format),
            });
        }
        if self.render.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "render.timeout_secs".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Search for config file in current directory and parents.
    #[must_use]
    pub fn discover_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        Self::discover_config_from(&current)
    }

    /// Search for config file starting from a specific directory.
    #[must_use]
    pub fn discover_config_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Output directory as a path.
    #[must_use]
    pub fn output_dir(&self) -> PathBuf {
        PathBuf::from(&self.output.dir)
    }

    /// Classifier rules as `(prefix, label)` pairs.
    #[must_use]
    pub fn classify_rules(&self) -> Vec<(String, String)> {
        self.classify
            .rules
            .iter()
            .map(|rule| (rule.prefix.clone(), rule.label.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.output.dir, "./diagrams");
        assert_eq!(config.output.format, "png");
        assert_eq!(config.render.backend, Backend::Local);
        assert_eq!(config.render.ink_url, "https://mermaid.ink");
        assert_eq!(config.render.scale, 3);
        assert_eq!(config.render.width, 2400);
        assert_eq!(config.render.timeout_secs, 60);
        assert!(config.discover.recursive);
        assert!(config.discover.exclude.is_empty());
        assert!(config.classify.rules.is_empty());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
            [output]
            dir = "out"
            format = "svg"

            [render]
            backend = "ink"
            theme = "dark"
            timeout_secs = 10

            [discover]
            recursive = false
            exclude = ["**/node_modules/**"]

            [[classify.rules]]
            prefix = "timeline"
            label = "timeline"
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.output.dir, "out");
        assert_eq!(config.output.format, "svg");
        assert_eq!(config.render.backend, Backend::Ink);
        assert_eq!(config.render.theme, "dark");
        assert_eq!(config.render.timeout_secs, 10);
        assert!(!config.discover.recursive);
        assert_eq!(config.discover.exclude, vec!["**/node_modules/**"]);
        assert_eq!(config.classify.rules.len(), 1);
        assert_eq!(config.classify.rules[0].prefix, "timeline");
        assert_eq!(config.classify.rules[0].label, "timeline");
        // Unset sections keep their defaults.
        assert_eq!(config.render.scale, 3);
    }

    #[test]
    fn test_load_explicit_missing_file() {
        let result = Config::load(Some(Path::new("/nonexistent/mermit.toml")), None);
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_from_file_sets_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[output]\ndir = \"rendered\"\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(config.output.dir, "rendered");
        assert_eq!(config.config_path.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn test_discover_in_parent() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b");
        std::fs::create_dir_all(&nested).unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "").unwrap();

        let found = Config::discover_config_from(&nested).unwrap();
        assert_eq!(found, path);
    }

    #[test]
    fn test_cli_settings_override() {
        let settings = CliSettings {
            output_dir: Some(PathBuf::from("cli-out")),
            format: Some("svg".to_string()),
            backend: Some(Backend::Ink),
            ink_url: None,
            recursive: Some(false),
            timeout_secs: Some(5),
        };
        assert!(!settings.is_empty());

        let mut config = Config::default();
        config.apply_cli_settings(&settings);
        assert_eq!(config.output.dir, "cli-out");
        assert_eq!(config.output.format, "svg");
        assert_eq!(config.render.backend, Backend::Ink);
        assert_eq!(config.render.ink_url, "https://mermaid.ink");
        assert!(!config.discover.recursive);
        assert_eq!(config.render.timeout_secs, 5);
    }

    #[test]
    fn test_validate_rejects_bad_format() {
        let mut config = Config::default();
        config.output.format = "jpeg".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.render.timeout_secs = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn test_env_expansion_in_output_dir() {
        unsafe {
            std::env::set_var("MERMIT_CFG_TEST_DIR", "expanded");
        }
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[output]\ndir = \"${MERMIT_CFG_TEST_DIR}/out\"\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(config.output.dir, "expanded/out");
        unsafe {
            std::env::remove_var("MERMIT_CFG_TEST_DIR");
        }
    }
}
