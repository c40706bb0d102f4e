//! Optional on-disk configuration.
//!
//! Values here are defaults; command-line flags win. Relative paths are
//! taken relative to the config file so a config can travel with its
//! entries manifest.
use crate::report::OutputFormat;
use crate::scan::PackOrder;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_SCHEMA_VERSION: u32 = 1;
const CONFIG_DIR_NAME: &str = "new-packs";
const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub schema_version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entries_manifest: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scratch_root: Option<PathBuf>,
    #[serde(default)]
    pub keep_scratch: bool,
    #[serde(default)]
    pub order: PackOrder,
    #[serde(default)]
    pub output: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema_version: CONFIG_SCHEMA_VERSION,
            entries_manifest: None,
            scratch_root: None,
            keep_scratch: false,
            order: PackOrder::default(),
            output: OutputFormat::default(),
        }
    }
}

/// `<config dir>/new-packs/config.json`, when the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Load the explicit config, else the default location if present, else defaults.
pub fn load_effective(explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        return load_config(path);
    }
    match default_config_path() {
        Some(path) if path.is_file() => load_config(&path),
        _ => Ok(Config::default()),
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let bytes = fs::read(path).with_context(|| format!("read config {}", path.display()))?;
    let mut config: Config = serde_json::from_slice(&bytes).context("parse config JSON")?;
    validate_config(&config)?;
    if let Some(base) = path.parent() {
        config.entries_manifest = config.entries_manifest.map(|p| base.join(p));
        config.scratch_root = config.scratch_root.map(|p| base.join(p));
    }
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

pub fn validate_config(config: &Config) -> Result<()> {
    if config.schema_version != CONFIG_SCHEMA_VERSION {
        return Err(anyhow!(
            "unsupported config schema_version {}",
            config.schema_version
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_and_resolves_relative_paths() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("config.json");
        fs::write(
            &path,
            r#"{
  "schema_version": 1,
  "entries_manifest": "entries.json",
  "scratch_root": "/var/tmp/scratch",
  "keep_scratch": true,
  "order": "created",
  "output": "json"
}"#,
        )
        .expect("write config");

        let config = load_config(&path).expect("load");
        assert_eq!(config.entries_manifest, Some(temp.path().join("entries.json")));
        assert_eq!(config.scratch_root, Some(PathBuf::from("/var/tmp/scratch")));
        assert!(config.keep_scratch);
        assert_eq!(config.order, PackOrder::Created);
        assert_eq!(config.output, OutputFormat::Json);
    }

    #[test]
    fn omitted_fields_take_defaults() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("config.json");
        fs::write(&path, r#"{"schema_version": 1}"#).expect("write config");
        assert_eq!(load_config(&path).expect("load"), Config::default());
    }

    #[test]
    fn rejects_unknown_schema_version() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("config.json");
        fs::write(&path, r#"{"schema_version": 7}"#).expect("write config");
        let err = load_config(&path).expect_err("schema mismatch");
        assert!(err.to_string().contains("schema_version 7"));
    }

    #[test]
    fn rejects_unknown_fields() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("config.json");
        fs::write(&path, r#"{"schema_version": 1, "sort": "id"}"#).expect("write config");
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        assert!(load_effective(Some(&temp.path().join("absent.json"))).is_err());
    }

    #[test]
    fn default_config_round_trips() {
        let text = serde_json::to_string_pretty(&Config::default()).expect("serialize");
        let parsed: Config = serde_json::from_str(&text).expect("parse");
        assert_eq!(parsed, Config::default());
    }
}
