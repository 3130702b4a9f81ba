//! Harness configuration
//!
//! Configuration is an explicit, typed struct. Files may be JSON or YAML
//! (chosen by extension); unknown keys are rejected so typos surface early.
//!
//! ```json
//! {
//!   "base_url": "http://localhost:8000",
//!   "timeout": 30,
//!   "retry_attempts": 3,
//!   "retry_delay": 1,
//!   "log_file": "api_logs.txt",
//!   "log_level": "INFO",
//!   "auth": { "type": "bearer", "token": "abc" }
//! }
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Errors raised while loading, saving or validating configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("JSON parse error in {file}: {error}")]
    Json {
        file: String,
        error: serde_json::Error,
    },

    #[error("YAML parse error in {file}: {error}")]
    Yaml {
        file: String,
        error: serde_yaml::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Supported authentication schemes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthKind {
    Basic,
    Bearer,
}

/// Authentication settings as they appear in the config file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    #[serde(rename = "type")]
    pub kind: Option<AuthKind>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub token: Option<String>,
}

/// Resolved credentials applied to every request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    Basic {
        username: String,
        password: Option<String>,
    },
    Bearer {
        token: String,
    },
}

impl AuthConfig {
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            kind: Some(AuthKind::Basic),
            username: Some(username.into()),
            password: Some(password.into()),
            token: None,
        }
    }

    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            kind: Some(AuthKind::Bearer),
            username: None,
            password: None,
            token: Some(token.into()),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match self.kind {
            Some(AuthKind::Basic) if self.username.as_deref().unwrap_or("").is_empty() => Err(
                ConfigError::Invalid("basic auth requires a username".to_string()),
            ),
            Some(AuthKind::Bearer) if self.token.as_deref().unwrap_or("").is_empty() => Err(
                ConfigError::Invalid("bearer auth requires a token".to_string()),
            ),
            _ => Ok(()),
        }
    }

    /// Credentials for the configured scheme, if any
    pub fn credentials(&self) -> Option<Credentials> {
        match self.kind? {
            AuthKind::Basic => Some(Credentials::Basic {
                username: self.username.clone()?,
                password: self.password.clone(),
            }),
            AuthKind::Bearer => Some(Credentials::Bearer {
                token: self.token.clone()?,
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HarnessConfig {
    /// Prefix joined with every request endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: f64,

    /// Extra attempts after a failed request
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,

    /// Fixed delay between attempts in seconds
    #[serde(default = "default_retry_delay")]
    pub retry_delay: f64,

    /// Request/response log destination
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,

    /// TRACE, DEBUG, INFO, WARN (or WARNING), ERROR (or CRITICAL)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub auth: AuthConfig,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout() -> f64 {
    30.0
}

fn default_retry_attempts() -> u32 {
    3
}

fn default_retry_delay() -> f64 {
    1.0
}

fn default_log_file() -> PathBuf {
    PathBuf::from("api_logs.txt")
}

fn default_log_level() -> String {
    "INFO".to_string()
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout: default_timeout(),
            retry_attempts: default_retry_attempts(),
            retry_delay: default_retry_delay(),
            log_file: default_log_file(),
            log_level: default_log_level(),
            auth: AuthConfig::default(),
        }
    }
}

impl HarnessConfig {
    /// Load and validate a JSON (`.json`) or YAML (`.yaml`/`.yml`) config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file = path.display().to_string();

        let config: HarnessConfig = if is_yaml(path) {
            serde_yaml::from_str(&content).map_err(|error| ConfigError::Yaml { file, error })?
        } else {
            serde_json::from_str(&content).map_err(|error| ConfigError::Json { file, error })?
        };

        config.validate()?;
        Ok(config)
    }

    /// Write the config to `path`, format chosen by extension
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let file = path.display().to_string();

        let content = if is_yaml(path) {
            serde_yaml::to_string(self).map_err(|error| ConfigError::Yaml { file, error })?
        } else {
            serde_json::to_string_pretty(self).map_err(|error| ConfigError::Json { file, error })?
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Path of the config file for environment `env` inside `dir`
    pub fn env_path(dir: impl AsRef<Path>, env: &str) -> PathBuf {
        dir.as_ref().join(format!("{}.json", env))
    }

    /// Load `<dir>/<env>.json`, writing the defaults there first if it is missing
    pub fn for_env(dir: impl AsRef<Path>, env: &str) -> Result<Self, ConfigError> {
        let path = Self::env_path(dir, env);
        if path.exists() {
            return Self::load(&path);
        }

        let config = Self::default();
        config.save(&path)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("base_url must not be empty".to_string()));
        }
        if reqwest::Url::parse(&self.base_url).is_err() {
            return Err(ConfigError::Invalid(format!(
                "base_url '{}' is not a valid URL",
                self.base_url
            )));
        }
        if self.timeout <= 0.0 || Duration::try_from_secs_f64(self.timeout).is_err() {
            return Err(ConfigError::Invalid(
                "timeout must be a positive number of seconds".to_string(),
            ));
        }
        if Duration::try_from_secs_f64(self.retry_delay).is_err() {
            return Err(ConfigError::Invalid(
                "retry_delay must be zero or a positive number of seconds".to_string(),
            ));
        }
        if self.log_file.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("log_file must not be empty".to_string()));
        }
        parse_log_level(&self.log_level)?;
        self.auth.validate()
    }

    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs_f64(self.timeout)
    }

    pub fn retry_delay_duration(&self) -> Duration {
        Duration::from_secs_f64(self.retry_delay)
    }

    pub fn credentials(&self) -> Option<Credentials> {
        self.auth.credentials()
    }

    /// The configured level as a `tracing` level
    pub fn tracing_level(&self) -> Result<tracing::Level, ConfigError> {
        parse_log_level(&self.log_level)
    }

    /// `EnvFilter` directive scoping the configured level to this crate
    pub fn tracing_filter(&self) -> Result<String, ConfigError> {
        let level = self.tracing_level()?;
        Ok(format!("api_harness={}", level.as_str().to_ascii_lowercase()))
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

fn parse_log_level(level: &str) -> Result<tracing::Level, ConfigError> {
    match level.to_ascii_uppercase().as_str() {
        "TRACE" => Ok(tracing::Level::TRACE),
        "DEBUG" => Ok(tracing::Level::DEBUG),
        "INFO" => Ok(tracing::Level::INFO),
        "WARN" | "WARNING" => Ok(tracing::Level::WARN),
        "ERROR" | "CRITICAL" => Ok(tracing::Level::ERROR),
        other => Err(ConfigError::Invalid(format!("unknown log_level '{}'", other))),
    }
}
