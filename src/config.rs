use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::services::loader::ReadinessPolicy;

pub const DEFAULT_API_URL: &str = "https://dragonball-api.com/api/";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub api: ApiConfig,

    pub loader: LoaderConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: String,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            worker_threads: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Root of the REST API. Endpoint paths are joined onto it, so it should
    /// end with a slash.
    pub base_url: String,

    pub user_agent: String,

    /// Request timeout in seconds (default: 30)
    pub request_timeout_seconds: u64,

    /// Items requested per page by the paging helpers.
    pub page_size: u32,

    /// Upper bound on pages walked by the paging helpers.
    pub max_pages: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            user_agent: concat!("dbroster/", env!("CARGO_PKG_VERSION")).to_string(),
            request_timeout_seconds: 30,
            page_size: 10,
            max_pages: 50,
        }
    }
}

impl ApiConfig {
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    pub readiness: ReadinessPolicy,
}

impl Config {
    /// Loads the first config file found on the search path, or defaults.
    ///
    /// Runs before logging is set up, so the file it came from is returned
    /// for the caller to report.
    pub fn load() -> Result<(Self, Option<PathBuf>)> {
        let source = Self::locate(&Self::config_paths());
        let config = match &source {
            Some(path) => Self::load_from_path(path)?,
            None => Self::default(),
        };
        Ok((config, source))
    }

    fn locate(paths: &[PathBuf]) -> Option<PathBuf> {
        paths.iter().find(|path| path.exists()).cloned()
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        paths.push(Self::default_config_path());

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("dbroster").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".dbroster").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.api.base_url)
            .with_context(|| format!("Invalid API base URL: {}", self.api.base_url))?;

        if self.api.page_size == 0 {
            anyhow::bail!("api.page_size must be > 0");
        }

        if self.api.max_pages == 0 {
            anyhow::bail!("api.max_pages must be > 0");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.api.base_url, DEFAULT_API_URL);
        assert_eq!(config.api.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.loader.readiness, ReadinessPolicy::NonEmpty);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[api]"));
        assert!(toml_str.contains("[loader]"));
        assert!(toml_str.contains("readiness = \"non-empty\""));
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [general]
            log_level = "debug"

            [loader]
            readiness = "completed"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.loader.readiness, ReadinessPolicy::Completed);

        assert_eq!(config.api.base_url, DEFAULT_API_URL);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.api.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.api.page_size = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.api.max_pages = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn locate_picks_first_existing_path() {
        let dir =
            std::env::temp_dir().join(format!("dbroster-locate-test-{}", std::process::id()));
        let missing = dir.join("missing.toml");
        let present = dir.join("config.toml");
        let later = dir.join("later.toml");
        Config::default().save_to_path(&present).unwrap();
        Config::default().save_to_path(&later).unwrap();

        let paths = vec![missing.clone(), present.clone(), later];
        assert_eq!(Config::locate(&paths), Some(present));
        assert_eq!(Config::locate(&[missing]), None);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let path = std::env::temp_dir()
            .join(format!("dbroster-config-test-{}", std::process::id()))
            .join("config.toml");

        let mut config = Config::default();
        config.api.page_size = 25;
        config.save_to_path(&path).unwrap();

        let loaded = Config::load_from_path(&path).unwrap();
        assert_eq!(loaded.api.page_size, 25);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
