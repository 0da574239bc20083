//! Runtime configuration.
//!
//! Sources, lowest precedence first: built-in defaults, the TOML file,
//! environment variables, then command-line overrides applied by the
//! binary. The API key is never read from the file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_INSTANCE_URL: &str = "https://api.usemotion.com/v1";
pub const API_KEY_ENV: &str = "MOTION_API_KEY";
pub const INSTANCE_URL_ENV: &str = "MOTION_INSTANCE_URL";
pub const CONFIG_ENV: &str = "MOTION_TOOLKIT_CONFIG";
pub const LOG_FILE_NAME: &str = "motion.debug.log";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    pub motion: MotionSettings,
    pub http: HttpSettings,
    pub logging: LogSettings,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionSettings {
    #[serde(skip)]
    pub api_key: Option<String>,
    pub instance_url: String,
}

impl Default for MotionSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            instance_url: DEFAULT_INSTANCE_URL.to_string(),
        }
    }
}

impl std::fmt::Debug for MotionSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MotionSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("instance_url", &self.instance_url)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    pub timeout_secs: u64,
    /// Extra attempts after the first failure.
    pub max_retries: u32,
    pub retry_base_delay_ms: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_retries: 2,
            retry_base_delay_ms: 250,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Whether to write the rotating debug log at all.
    pub file: bool,
    /// Directory for the debug log; the working directory when unset.
    pub dir: Option<PathBuf>,
    pub max_files: usize,
    /// `EnvFilter` directives used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            file: true,
            dir: None,
            max_files: 10,
            filter: "motion_toolkit=info".to_string(),
        }
    }
}

impl LogSettings {
    pub fn log_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

impl MotionConfig {
    /// `<config dir>/motion-toolkit/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("motion-toolkit").join("config.toml"))
    }

    /// Load from `path`, or from the default location when it exists, then
    /// apply the process environment.
    pub fn load(path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(&path)?,
            None => match Self::default_path().filter(|p| p.is_file()) {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };
        config.apply_env_from(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Apply `MOTION_API_KEY` and `MOTION_INSTANCE_URL` from `lookup`.
    /// Empty values are ignored.
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        if let Some(key) = read(API_KEY_ENV) {
            self.motion.api_key = Some(key);
        }
        if let Some(url) = read(INSTANCE_URL_ENV) {
            self.motion.instance_url = url;
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.motion.api_key = Some(key.into());
        self
    }

    pub fn with_instance_url(mut self, url: impl Into<String>) -> Self {
        self.motion.instance_url = url.into();
        self
    }

    pub fn api_key(&self) -> Result<&str, ConfigError> {
        self.motion
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey)
    }

    /// The instance URL, required to be absolute http(s).
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let raw = self.motion.instance_url.trim();
        let invalid = |reason: String| ConfigError::InvalidUrl {
            url: raw.to_string(),
            reason,
        };
        let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(invalid(format!("unsupported scheme '{other}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = MotionConfig::default();
        assert_eq!(config.motion.instance_url, DEFAULT_INSTANCE_URL);
        assert_eq!(config.http.timeout_secs, 30);
        assert_eq!(config.logging.max_files, 10);
        assert!(matches!(config.api_key(), Err(ConfigError::MissingApiKey)));
    }

    #[test]
    fn test_file_sections_are_optional() {
        let config = MotionConfig::from_toml_str(
            r#"
            [http]
            max_retries = 0

            [logging]
            dir = "/var/log/motion"
            "#,
        )
        .unwrap();
        assert_eq!(config.http.max_retries, 0);
        assert_eq!(config.http.timeout_secs, 30);
        assert_eq!(config.logging.log_dir(), PathBuf::from("/var/log/motion"));
        assert_eq!(config.motion.instance_url, DEFAULT_INSTANCE_URL);
    }

    #[test]
    fn test_api_key_is_not_read_from_the_file() {
        let config =
            MotionConfig::from_toml_str("[motion]\napi_key = \"leaked\"\n").unwrap();
        assert!(config.api_key().is_err());
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config =
            MotionConfig::from_toml_str("[motion]\ninstance_url = \"https://file.example\"\n")
                .unwrap();
        config.apply_env_from(env(&[
            (API_KEY_ENV, "k-123"),
            (INSTANCE_URL_ENV, "http://localhost:4010"),
        ]));
        assert_eq!(config.api_key().unwrap(), "k-123");
        assert_eq!(config.base_url().unwrap().as_str(), "http://localhost:4010/");

        config.apply_env_from(env(&[(API_KEY_ENV, "  ")]));
        assert_eq!(config.api_key().unwrap(), "k-123");
    }

    #[test]
    fn test_base_url_must_be_http() {
        let mut config = MotionConfig::default();
        config.motion.instance_url = "ftp://motion.example".into();
        assert!(matches!(config.base_url(), Err(ConfigError::InvalidUrl { .. })));
        config.motion.instance_url = "not a url".into();
        assert!(config.base_url().is_err());
    }

    #[test]
    fn test_debug_redacts_the_key() {
        let config = MotionConfig::default().with_api_key("super-secret");
        let text = format!("{config:?}");
        assert!(!text.contains("super-secret"));
        assert!(text.contains("<redacted>"));
    }

    #[test]
    fn test_loads_from_an_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[http]\ntimeout_secs = 5\n").unwrap();
        let config = MotionConfig::load(Some(path)).unwrap();
        assert_eq!(config.http.timeout_secs, 5);

        let missing = MotionConfig::load(Some(dir.path().join("nope.toml")));
        assert!(matches!(missing, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_bad_toml_is_reported() {
        assert!(matches!(
            MotionConfig::from_toml_str("[http]\ntimeout_secs = \"soon\"\n"),
            Err(ConfigError::Toml(_))
        ));
    }
}
