//! CLI command implementations.

pub mod clean;
pub mod generate;
pub mod scan;

pub use clean::CleanArgs;
pub use generate::GenerateArgs;
pub use scan::ScanArgs;

use mermit_config::{CliSettings, Config};
use mermit_extract::{Classifier, ClassifyRule, Scanner};

use crate::error::CliError;

/// Build a scanner with any extra classifier rules from the config.
fn scanner_from_config(config: &Config) -> Scanner {
    let rules: Vec<ClassifyRule> = config
        .classify_rules()
        .into_iter()
        .map(|(prefix, label)| ClassifyRule::new(prefix, label))
        .collect();
    if rules.is_empty() {
        Scanner::new()
    } else {
        Scanner::new().with_classifier(Classifier::with_rules(rules))
    }
}

/// Load config with CLI overrides applied.
fn load_config(
    config_path: Option<&std::path::Path>,
    settings: &CliSettings,
) -> Result<Config, CliError> {
    let settings = (!settings.is_empty()).then_some(settings);
    Ok(Config::load(config_path, settings)?)
}
