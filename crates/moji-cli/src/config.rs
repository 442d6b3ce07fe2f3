//! JSON configuration file loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use moji_model::AppConfig;

/// Read, override and validate a configuration file.
///
/// `input` and `output` replace the configured file paths before
/// validation, so a configuration without paths is accepted when both are
/// given on the command line.
///
/// # Errors
///
/// Fails when the file is missing or unreadable, is not valid JSON for
/// [`AppConfig`], or does not pass [`AppConfig::validate`].
pub fn load_config(path: &Path, input: Option<PathBuf>, output: Option<PathBuf>) -> Result<AppConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("read configuration file {}", path.display()))?;
    let config = parse_config(&contents)
        .with_context(|| format!("parse configuration file {}", path.display()))?
        .with_overrides(input, output);
    config
        .validate()
        .with_context(|| format!("invalid configuration in {}", path.display()))?;
    Ok(config)
}

/// Parse a configuration document without validating it.
///
/// # Errors
///
/// Returns the `serde_json` error for malformed documents.
pub fn parse_config(contents: &str) -> serde_json::Result<AppConfig> {
    serde_json::from_str(contents)
}
