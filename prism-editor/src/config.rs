//! Editor configuration file.

use anyhow::Context;
use prism_core::HistoryConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// File extension recommended for editor config files.
pub const CONFIG_FILE_EXT: &str = "prism.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorConfig {
    #[serde(default)]
    pub history: HistoryConfig,

    /// Style applied to generations, and to style transfers that name none.
    #[serde(default)]
    pub default_style: Option<String>,

    /// `tracing` filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_log_filter() -> String {
    "info".into()
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history: HistoryConfig::default(),
            default_style: None,
            log_filter: default_log_filter(),
        }
    }
}

/// Load and validate a config file.
pub fn load_config(path: impl AsRef<Path>) -> anyhow::Result<EditorConfig> {
    let path = path.as_ref();
    let data =
        fs::read_to_string(path).with_context(|| format!("read config: {}", path.display()))?;
    let config: EditorConfig = serde_json::from_str(&data).context("parse config json")?;
    config
        .history
        .validate()
        .with_context(|| format!("invalid config: {}", path.display()))?;

    tracing::debug!(path = %path.display(), "config loaded");
    Ok(config)
}

/// Save a config file as pretty JSON.
pub fn save_config(path: impl AsRef<Path>, config: &EditorConfig) -> anyhow::Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create parent dir: {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(config).context("serialize config to json")?;
    fs::write(path, json).with_context(|| format!("write config: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_uses_defaults() {
        let config: EditorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, EditorConfig::default());
        assert_eq!(config.history.capacity, 50);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn test_config_roundtrip() {
        let config = EditorConfig {
            history: HistoryConfig { capacity: 12 },
            default_style: Some("film noir".into()),
            log_filter: "prism_editor=debug".into(),
        };
        let path = Path::new("target/test_config.prism.json");
        save_config(path, &config).unwrap();
        assert_eq!(load_config(path).unwrap(), config);
    }

    #[test]
    fn test_zero_capacity_rejected_on_load() {
        let path = Path::new("target/test_zero_capacity.prism.json");
        fs::create_dir_all("target").unwrap();
        fs::write(path, r#"{"history":{"capacity":0}}"#).unwrap();

        let err = load_config(path).unwrap_err();
        assert!(err.to_string().starts_with("invalid config"));
    }
}
