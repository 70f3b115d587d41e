use crate::constants::{DEFAULT_SERVER_URL, ENV_RESPONSE_MODE, ENV_SERVER_URL};
use crate::errors::{ReviewBotError, ReviewBotResult};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
    str::FromStr,
    sync::RwLock,
};

/// How a successful `/feedback` reply is interpreted. Picked once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResponseMode {
    /// Opaque body, offered as a `feedback.html` attachment.
    #[default]
    Download,
    /// JSON object, one bot message per entry.
    Structured,
}

impl FromStr for ResponseMode {
    type Err = ReviewBotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "download" | "binary" => Ok(ResponseMode::Download),
            "structured" | "json" => Ok(ResponseMode::Structured),
            other => Err(ReviewBotError::config_error(format!(
                "Unknown response mode: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server_url: String,
    pub response_mode: ResponseMode,
    pub download_dir: PathBuf,
    pub request_timeout_secs: Option<u64>,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            response_mode: ResponseMode::Download,
            download_dir: default_download_dir(),
            request_timeout_secs: None,
            log_level: "info".to_string(),
        }
    }
}

fn default_download_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

static CONFIG: Lazy<RwLock<Config>> = Lazy::new(|| RwLock::new(Config::default()));

/// Loads (or creates) the config file, applies environment overrides and
/// installs the result as the process config.
pub fn initialize_config() -> ReviewBotResult<()> {
    let config_path = get_config_path()?;
    let mut config = load_or_create(&config_path)?;
    apply_overrides(&mut config, |key| env::var(key).ok())?;
    validate_config(&config)?;

    *CONFIG.write().unwrap_or_else(|e| e.into_inner()) = config;
    Ok(())
}

fn get_config_path() -> ReviewBotResult<PathBuf> {
    let home_dir = dirs::home_dir()
        .ok_or_else(|| ReviewBotError::config_error("Could not determine home directory"))?;

    Ok(home_dir.join(".config").join("reviewbot").join("config.json"))
}

pub(crate) fn load_or_create(config_path: &Path) -> ReviewBotResult<Config> {
    if config_path.exists() {
        let config_str = fs::read_to_string(config_path).map_err(|e| {
            ReviewBotError::config_error(format!("Failed to read config file: {}", e))
        })?;

        return serde_json::from_str(&config_str)
            .map_err(|e| ReviewBotError::config_error(format!("Failed to parse config: {}", e)));
    }

    let config = Config::default();
    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            ReviewBotError::config_error(format!("Failed to create config directory: {}", e))
        })?;
    }

    let config_str = serde_json::to_string_pretty(&config)
        .map_err(|e| ReviewBotError::config_error(format!("Failed to serialize config: {}", e)))?;

    fs::write(config_path, config_str)
        .map_err(|e| ReviewBotError::config_error(format!("Failed to write config file: {}", e)))?;

    Ok(config)
}

pub(crate) fn apply_overrides<F>(config: &mut Config, lookup: F) -> ReviewBotResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_SERVER_URL) {
        config.server_url = url;
    }
    if let Some(mode) = lookup(ENV_RESPONSE_MODE) {
        config.response_mode = mode.parse()?;
    }
    Ok(())
}

pub fn validate_config(config: &Config) -> ReviewBotResult<()> {
    let url = config.server_url.trim();
    if url.is_empty() {
        return Err(ReviewBotError::config_error("server_url is required"));
    }

    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ReviewBotError::config_error(format!(
            "server_url must be an http(s) URL, got {}",
            url
        )));
    }

    if config.request_timeout_secs == Some(0) {
        return Err(ReviewBotError::config_error(
            "request_timeout_secs must be greater than 0",
        ));
    }

    if config.log_level.trim().is_empty() {
        return Err(ReviewBotError::config_error("log_level is required"));
    }

    Ok(())
}

pub fn get_config() -> Config {
    CONFIG.read().unwrap_or_else(|e| e.into_inner()).clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_validate_config_valid() {
        let config = Config::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_config_invalid_empty_server_url() {
        let mut config = Config::default();
        config.server_url = "  ".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_config_invalid_scheme() {
        let mut config = Config::default();
        config.server_url = "ftp://example.com".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_config_invalid_timeout() {
        let mut config = Config::default();
        config.request_timeout_secs = Some(0);
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_load_or_create_writes_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let config = load_or_create(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.server_url, DEFAULT_SERVER_URL);
        assert_eq!(config.response_mode, ResponseMode::Download);

        let reloaded = load_or_create(&path).unwrap();
        assert_eq!(reloaded.server_url, config.server_url);
    }

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"response_mode": "structured"}"#).unwrap();

        let config = load_or_create(&path).unwrap();
        assert_eq!(config.response_mode, ResponseMode::Structured);
        assert_eq!(config.server_url, DEFAULT_SERVER_URL);
        assert_eq!(config.request_timeout_secs, None);
    }

    #[test]
    fn test_load_rejects_garbage() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "not json").unwrap();

        assert!(matches!(
            load_or_create(&path),
            Err(ReviewBotError::Config(_))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        apply_overrides(&mut config, |key| match key {
            ENV_SERVER_URL => Some("https://review.example.com".to_string()),
            ENV_RESPONSE_MODE => Some("JSON".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.server_url, "https://review.example.com");
        assert_eq!(config.response_mode, ResponseMode::Structured);
    }

    #[test]
    fn test_env_override_bad_mode() {
        let mut config = Config::default();
        let result = apply_overrides(&mut config, |key| {
            (key == ENV_RESPONSE_MODE).then(|| "xml".to_string())
        });
        assert!(result.is_err());
    }
}
