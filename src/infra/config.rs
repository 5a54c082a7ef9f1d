use std::fs;
use std::path::{Path, PathBuf};

use brick_review_adapters::{DEFAULT_BASE_URL, DEFAULT_COLOR_MAPPING_PATH};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CONFIG_PATH_ENV: &str = "BRICK_REVIEW_CONFIG";
pub const API_URL_ENV: &str = "BRICK_REVIEW_API_URL";
pub const DEFAULT_CONFIG_FILE: &str = "brick-review.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelMode {
    #[default]
    Text,
    Quick,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    pub color_mapping_path: String,
    pub save_notice_ms: u64,
    pub auto_advance: bool,
    pub label_mode: LabelMode,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            color_mapping_path: DEFAULT_COLOR_MAPPING_PATH.to_string(),
            save_notice_ms: 3000,
            auto_advance: true,
            label_mode: LabelMode::Text,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Defaults, then the config file if there is one, then env overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let explicit = std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from);
        let mut config = match explicit {
            Some(path) => Self::from_file(&path)?,
            None => {
                let local = Path::new(DEFAULT_CONFIG_FILE);
                if local.is_file() {
                    Self::from_file(local)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_overrides(std::env::var(API_URL_ENV).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn apply_overrides(&mut self, api_url: Option<String>) {
        if let Some(url) = api_url.filter(|url| !url.trim().is_empty()) {
            self.api_base_url = url.trim().to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn default_config_targets_local_backend() {
        let config = AppConfig::default();
        assert_eq!(config.api_base_url, "http://127.0.0.1:8000/api");
        assert_eq!(config.color_mapping_path, "/color_mapping");
        assert_eq!(config.save_notice_ms, 3000);
        assert!(config.auto_advance);
        assert_eq!(config.label_mode, LabelMode::Text);
    }

    #[test]
    fn file_values_override_defaults_and_missing_keys_keep_them() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"{{"api_base_url": "http://review.local/api", "label_mode": "quick"}}"#
        )
        .expect("write config");

        let config = AppConfig::from_file(file.path()).expect("config should parse");
        assert_eq!(config.api_base_url, "http://review.local/api");
        assert_eq!(config.label_mode, LabelMode::Quick);
        assert_eq!(config.save_notice_ms, 3000);
    }

    #[test]
    fn invalid_file_reports_parse_error() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "{{not json").expect("write config");

        let error = AppConfig::from_file(file.path()).expect_err("should fail");
        assert!(matches!(error, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_file_reports_read_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let error = AppConfig::from_file(&dir.path().join("absent.json")).expect_err("should fail");
        assert!(matches!(error, ConfigError::Read { .. }));
    }

    #[test]
    fn env_url_override_ignores_blank_values() {
        let mut config = AppConfig::default();
        config.apply_overrides(Some("  ".to_string()));
        assert_eq!(config.api_base_url, DEFAULT_BASE_URL);

        config.apply_overrides(Some("http://other:9000/api".to_string()));
        assert_eq!(config.api_base_url, "http://other:9000/api");
    }
}
