use crate::inference::{GenerationProfile, ModelFamily};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    pub runtime: RuntimeConfig,
    pub handlers: Vec<HandlerConfig>,
    #[serde(default)]
    pub parameter_store: ParameterStoreConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub logs: LogsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogsConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Where model endpoints are invoked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandlerConfig {
    pub name: String,
    pub path: String,
    pub family: ModelFamily,
    #[serde(default)]
    pub max_characters: Option<usize>,
    #[serde(default)]
    pub profile: GenerationProfile,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterStoreConfig {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    // Used instead of the HTTP store when base_url is unset
    #[serde(default)]
    pub values: HashMap<String, String>,
}

impl Config {
    /// Checks everything that must hold before the server accepts traffic.
    pub fn validate(&self) -> crate::Result<()> {
        use crate::Error;

        reqwest::Url::parse(&self.runtime.base_url).map_err(|e| {
            Error::config(format!(
                "Invalid runtime base_url '{}': {}",
                self.runtime.base_url, e
            ))
        })?;

        if self.runtime.timeout_secs == 0 {
            return Err(Error::config("runtime.timeout_secs must be greater than 0"));
        }

        if self.handlers.is_empty() {
            return Err(Error::config("At least one handler must be configured"));
        }

        let mut paths = HashSet::new();
        for handler in &self.handlers {
            if handler.name.trim().is_empty() {
                return Err(Error::config("Handler name must not be empty"));
            }
            if !handler.path.starts_with('/') {
                return Err(Error::config(format!(
                    "Handler '{}' path must start with '/': {}",
                    handler.name, handler.path
                )));
            }
            if handler.path == "/health" {
                return Err(Error::config(format!(
                    "Handler '{}' cannot use the reserved /health path",
                    handler.name
                )));
            }
            if !paths.insert(handler.path.as_str()) {
                return Err(Error::config(format!(
                    "Duplicate handler path: {}",
                    handler.path
                )));
            }
            let scoped = |e: Error| match e {
                Error::Config(msg) => Error::config(format!("Handler '{}': {}", handler.name, msg)),
                other => other,
            };
            if let Some(max_characters) = handler.max_characters {
                crate::inference::TruncationBound::new(max_characters).map_err(scoped)?;
            }
            handler.profile.validate().map_err(scoped)?;
        }

        if self.parameter_store.max_attempts == 0 {
            return Err(Error::config(
                "parameter_store.max_attempts must be greater than 0",
            ));
        }

        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            logs: LogsConfig::default(),
        }
    }
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for ParameterStoreConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            poll_interval_secs: default_poll_interval_secs(),
            max_attempts: default_max_attempts(),
            values: HashMap::new(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_timeout_secs() -> u64 {
    180
}

fn default_poll_interval_secs() -> u64 {
    5
}

fn default_max_attempts() -> u32 {
    12
}
