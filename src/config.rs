// src/config.rs - Configuration: defaults, optional TOML file, .env and environment overrides
use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::pagination::MAX_PAGE_SIZE;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub list: ListConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// `None` keeps the HTTP client's own default.
    pub request_timeout_seconds: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ListConfig {
    pub page_size: u32,
    pub debounce_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SessionConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api".to_string(),
            request_timeout_seconds: None,
        }
    }
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            debounce_ms: 500,
        }
    }
}

impl ListConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(".warehouse-session.json"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

pub fn load_config() -> Result<Config> {
    load_env_file()?;

    let mut config = if let Ok(config_file) = env::var("CONFIG_FILE") {
        Config::from_toml_file(Path::new(&config_file))?
    } else {
        Config::default()
    };

    override_with_env(&mut config)?;

    config.validate()
        .context("Configuration validation failed")?;

    Ok(config)
}

pub fn load_env_file() -> Result<()> {
    if let Ok(env_file) = env::var("ENV_FILE") {
        dotenvy::from_filename(&env_file)
            .with_context(|| format!("Failed to load environment file: {}", env_file))?;
    } else if Path::new(".env").exists() {
        dotenvy::dotenv().context("Failed to load .env file")?;
    }
    Ok(())
}

fn override_with_env(config: &mut Config) -> Result<()> {
    apply_overrides(config, |key| env::var(key).ok())
}

fn apply_overrides<F>(config: &mut Config, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup("WAREHOUSE_API_URL") {
        config.api.base_url = url;
    }
    if let Some(timeout_str) = lookup("WAREHOUSE_API_TIMEOUT") {
        let timeout = timeout_str
            .parse::<u64>()
            .with_context(|| format!("WAREHOUSE_API_TIMEOUT is not a number: {}", timeout_str))?;
        config.api.request_timeout_seconds = Some(timeout);
    }
    if let Some(size_str) = lookup("WAREHOUSE_PAGE_SIZE") {
        if let Ok(size) = size_str.parse::<u32>() {
            config.list.page_size = size;
        }
    }
    if let Some(debounce_str) = lookup("WAREHOUSE_DEBOUNCE_MS") {
        if let Ok(debounce) = debounce_str.parse::<u64>() {
            config.list.debounce_ms = debounce;
        }
    }
    if let Some(path) = lookup("WAREHOUSE_SESSION_FILE") {
        config.session.path = PathBuf::from(path);
    }
    if let Some(level) = lookup("RUST_LOG") {
        config.logging.level = level;
    }

    Ok(())
}

impl Config {
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let config_str = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        let base_url = self.api.base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(anyhow::anyhow!(
                "api.base_url must start with http:// or https:// (got '{}')",
                self.api.base_url
            ));
        }

        if self.list.page_size == 0 || self.list.page_size > MAX_PAGE_SIZE {
            return Err(anyhow::anyhow!(
                "list.page_size must be between 1 and {} (got {})",
                MAX_PAGE_SIZE,
                self.list.page_size
            ));
        }

        if self.api.request_timeout_seconds == Some(0) {
            return Err(anyhow::anyhow!("api.request_timeout_seconds must be positive"));
        }

        Ok(())
    }

    pub fn print_startup_info(&self) {
        log::debug!("API: {}", self.api.base_url);
        log::debug!(
            "Lists: {} per page, {}ms search debounce",
            self.list.page_size,
            self.list.debounce_ms
        );
        log::debug!("Session file: {}", self.session.path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:5000/api");
        assert_eq!(config.api.request_timeout_seconds, None);
        assert_eq!(config.list.page_size, 10);
        assert_eq!(config.list.debounce(), Duration::from_millis(500));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();

        config.api.base_url = "localhost:5000".to_string();
        assert!(config.validate().is_err());

        config.api.base_url = "https://wms.example.com/api".to_string();
        assert!(config.validate().is_ok());

        config.list.page_size = 0;
        assert!(config.validate().is_err());

        config.list.page_size = 25;
        config.api.request_timeout_seconds = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_loading() -> Result<()> {
        let toml_content = r#"
        [api]
        base_url = "http://10.0.0.5:8080/api"
        request_timeout_seconds = 15

        [list]
        page_size = 25
        "#;

        let temp_file = NamedTempFile::new()?;
        fs::write(temp_file.path(), toml_content.as_bytes())?;

        let config = Config::from_toml_file(temp_file.path())?;
        assert_eq!(config.api.base_url, "http://10.0.0.5:8080/api");
        assert_eq!(config.api.request_timeout_seconds, Some(15));
        assert_eq!(config.list.page_size, 25);
        // Sections and keys left out keep their defaults.
        assert_eq!(config.list.debounce_ms, 500);
        assert_eq!(config.logging.level, "info");

        Ok(())
    }

    #[test]
    fn test_env_override() -> Result<()> {
        let vars: HashMap<&str, &str> = [
            ("WAREHOUSE_API_URL", "http://staging/api"),
            ("WAREHOUSE_API_TIMEOUT", "30"),
            ("WAREHOUSE_PAGE_SIZE", "50"),
            ("WAREHOUSE_DEBOUNCE_MS", "250"),
            ("WAREHOUSE_SESSION_FILE", "/tmp/session.json"),
            ("RUST_LOG", "debug"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        apply_overrides(&mut config, |key| vars.get(key).map(|v| v.to_string()))?;

        assert_eq!(config.api.base_url, "http://staging/api");
        assert_eq!(config.api.request_timeout_seconds, Some(30));
        assert_eq!(config.list.page_size, 50);
        assert_eq!(config.list.debounce_ms, 250);
        assert_eq!(config.session.path, PathBuf::from("/tmp/session.json"));
        assert_eq!(config.logging.level, "debug");
        Ok(())
    }

    #[test]
    fn test_bad_timeout_is_rejected() {
        let mut config = Config::default();
        let result = apply_overrides(&mut config, |key| {
            (key == "WAREHOUSE_API_TIMEOUT").then(|| "soon".to_string())
        });
        assert!(result.is_err());
    }
}
