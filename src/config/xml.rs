//! XML configuration support (quick-xml + serde).
//!
//! <config>
//!   <log_level>normal</log_level>
//!   <log_file>/path/to/fstree.log</log_file>
//!   <json_logs>false</json_logs>
//! </config>
//!
//! Unknown elements are rejected so typos surface instead of being ignored.
//! A missing file means defaults; no template is written.

use anyhow::{Context, Result, bail};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::paths::default_config_path;
use super::types::{Config, LogLevel};

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    log_level: Option<String>,
    log_file: Option<String>,
    #[serde(default, deserialize_with = "de_bool_trimmed_opt")]
    json_logs: Option<bool>,
}

// Accept surrounding whitespace around booleans.
fn de_bool_trimmed_opt<'de, D>(deserializer: D) -> std::result::Result<Option<bool>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s
            .parse::<bool>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("expected true/false, got '{s}'"))),
    }
}

fn xml_to_config(parsed: XmlConfig) -> Result<Config> {
    let mut cfg = Config::default();

    if let Some(s) = parsed.log_level.as_deref() {
        if !s.trim().is_empty() {
            cfg.log_level = s.parse::<LogLevel>().map_err(anyhow::Error::msg)?;
        }
    }
    if let Some(s) = parsed.log_file.as_deref() {
        let trimmed = s.trim();
        if !trimmed.is_empty() {
            cfg.log_file = Some(PathBuf::from(trimmed));
        }
    }
    cfg.json_logs = parsed.json_logs.unwrap_or(false);

    Ok(cfg)
}

/// Load a Config from a specific XML file.
pub fn load_config_from_xml_path(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read config xml '{}'", path.display()))?;
    let parsed: XmlConfig = from_xml_str(&contents)
        .with_context(|| format!("parse config xml '{}'", path.display()))?;
    xml_to_config(parsed).with_context(|| format!("invalid value in config xml '{}'", path.display()))
}

/// Load the effective file config.
///
/// `$FSTREE_CONFIG` must point at an existing file; the default location may
/// be absent, in which case defaults are returned.
pub fn load_config() -> Result<Config> {
    let explicit = std::env::var_os(super::CONFIG_ENV_VAR).is_some();
    let path = default_config_path()?;
    if !path.exists() {
        if explicit {
            bail!("config file named by {} does not exist: {}", super::CONFIG_ENV_VAR, path.display());
        }
        debug!(path = %path.display(), "No config file; using defaults");
        return Ok(Config::default());
    }
    debug!(path = %path.display(), "Loading config");
    load_config_from_xml_path(&path)
}
