//! Screen configuration loading: TOML in, validated `ScreenConfig` out.
//!
//! Every table is optional in the file; missing tables and keys take the
//! defaults from `trendscreen_core::config`. Validation runs once here, so a
//! bad period or weight table fails before any ticker is touched.

use std::path::Path;

use anyhow::{Context, Result};
use trendscreen_core::config::ScreenConfig;

/// Content hash of a screen configuration.
pub type ConfigHash = String;

/// Parse and validate a TOML document.
pub fn parse_config(toml_str: &str) -> Result<ScreenConfig> {
    let config: ScreenConfig = toml::from_str(toml_str).context("failed to parse screen config TOML")?;
    config.validate().context("invalid screen config")?;
    Ok(config)
}

/// Read, parse and validate a TOML config file.
pub fn load_config(path: &Path) -> Result<ScreenConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    parse_config(&text).with_context(|| format!("in config file {}", path.display()))
}

/// The default configuration rendered as TOML.
pub fn default_config_toml() -> Result<String> {
    toml::to_string_pretty(&ScreenConfig::default()).context("failed to serialize default config")
}

/// Deterministic BLAKE3 hash of the config's canonical JSON form.
///
/// Two runs with equal configs carry the same hash in their reports.
pub fn fingerprint(config: &ScreenConfig) -> Result<ConfigHash> {
    let json = serde_json::to_string(config).context("failed to serialize screen config")?;
    let hash = blake3::hash(json.as_bytes());
    Ok(format!("{}", hash.to_hex()))
}
