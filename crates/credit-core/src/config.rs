//! Client configuration
//!
//! Config is loaded with a two-layer resolution:
//! 1. Check for override in data dir (~/.local/share/credit-lens/config/credit.toml)
//!    or an explicit path
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! `CREDIT_API_URL` overrides the API base URL after the file is read.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/credit.toml");

/// Environment variable overriding the API base URL
pub const API_URL_ENV: &str = "CREDIT_API_URL";

/// Application directory name under the platform data dir
pub const APP_DIR: &str = "credit-lens";

/// Connection settings for the credit API
#[derive(Debug, Clone, PartialEq)]
pub struct ApiSettings {
    pub base_url: String,
    /// Bound on a whole request, connect included
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout: Duration::from_secs(15),
            connect_timeout: Duration::from_secs(5),
        }
    }
}

/// Resolved client settings
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api: ApiSettings,
    /// Directory holding the persisted session record
    pub session_dir: PathBuf,
    /// Base score for the mock forecast when the session has none
    pub default_base_score: i32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api: ApiSettings::default(),
            session_dir: default_data_dir(),
            default_base_score: 720,
        }
    }
}

impl Settings {
    /// Load settings from the override location (or embedded defaults) and
    /// apply environment overrides
    pub fn load(override_path: Option<&Path>) -> Result<Self> {
        let mut settings = load_config(override_path)?;
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                debug!("Using {} = {}", API_URL_ENV, url);
                settings.api.base_url = url;
            }
        }
        Ok(settings)
    }
}

/// Platform data directory for the client
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from(".").join(APP_DIR))
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join(APP_DIR).join("config").join("credit.toml"))
}

/// Load configuration (override first, then default)
fn load_config(override_path: Option<&Path>) -> Result<Settings> {
    let path = override_path
        .map(Path::to_path_buf)
        .or_else(default_config_path);

    let content = match path {
        Some(ref path) if path.exists() => {
            debug!("Loading config from {}", path.display());
            fs::read_to_string(path)
                .map_err(|e| Error::Config(format!("Failed to read config: {}", e)))?
        }
        _ => DEFAULT_CONFIG.to_string(),
    };

    parse_config(&content)
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    api: Option<RawApi>,
    storage: Option<RawStorage>,
    forecast: Option<RawForecast>,
}

#[derive(Debug, Deserialize)]
struct RawApi {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
    connect_timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawStorage {
    session_dir: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct RawForecast {
    default_base_score: Option<i32>,
}

/// A zero timeout would fail every request immediately
fn timeout_from_secs(key: &str, secs: u64) -> Result<Duration> {
    if secs == 0 {
        return Err(Error::Config(format!("[api] {} must be at least 1", key)));
    }
    Ok(Duration::from_secs(secs))
}

/// Parse config from TOML content
fn parse_config(content: &str) -> Result<Settings> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut settings = Settings::default();

    if let Some(api) = raw.api {
        if let Some(url) = api.base_url {
            settings.api.base_url = url;
        }
        if let Some(timeout) = api.timeout_secs {
            settings.api.timeout = timeout_from_secs("timeout_secs", timeout)?;
        }
        if let Some(timeout) = api.connect_timeout_secs {
            settings.api.connect_timeout = timeout_from_secs("connect_timeout_secs", timeout)?;
        }
    }

    if let Some(dir) = raw.storage.and_then(|s| s.session_dir) {
        settings.session_dir = dir;
    }

    if let Some(score) = raw.forecast.and_then(|f| f.default_base_score) {
        settings.default_base_score = score;
    }

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_default_config() {
        let settings = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(settings.api.base_url, "http://localhost:8000");
        assert_eq!(settings.api.timeout, Duration::from_secs(15));
        assert_eq!(settings.api.connect_timeout, Duration::from_secs(5));
        assert_eq!(settings.default_base_score, 720);
        assert_eq!(settings.session_dir, default_data_dir());
    }

    #[test]
    fn test_parse_partial_config() {
        let settings = parse_config(
            r#"
            [api]
            base_url = "https://credit.example.com"

            [storage]
            session_dir = "/tmp/credit"
            "#,
        )
        .unwrap();
        assert_eq!(settings.api.base_url, "https://credit.example.com");
        assert_eq!(settings.api.timeout, Duration::from_secs(15));
        assert_eq!(settings.session_dir, PathBuf::from("/tmp/credit"));
        assert_eq!(settings.default_base_score, 720);
    }

    #[test]
    fn test_parse_invalid_config() {
        let result = parse_config("[api\nbase_url = 1");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_zero_timeouts_rejected() {
        let result = parse_config("[api]\ntimeout_secs = 0\n");
        match result {
            Err(Error::Config(msg)) => assert!(msg.contains("timeout_secs")),
            other => panic!("expected config error, got {:?}", other),
        }

        let result = parse_config("[api]\nconnect_timeout_secs = 0\n");
        assert!(matches!(result, Err(Error::Config(ref m)) if m.contains("connect_timeout_secs")));

        let settings = parse_config("[api]\ntimeout_secs = 1\nconnect_timeout_secs = 1\n").unwrap();
        assert_eq!(settings.api.timeout, Duration::from_secs(1));
    }

    #[test]
    fn test_load_from_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credit.toml");
        fs::write(&path, "[forecast]\ndefault_base_score = 650\n").unwrap();

        let settings = load_config(Some(&path)).unwrap();
        assert_eq!(settings.default_base_score, 650);
    }

    #[test]
    fn test_missing_explicit_path_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_config(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(settings.api.base_url, "http://localhost:8000");
    }
}
