//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `SEMGRADE_*` environment variables.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

use crate::constants::{
    DEFAULT_EXCELLENT_THRESHOLD, DEFAULT_MAX_SEQ_LEN, DEFAULT_MODEL_ID, DEFAULT_PARTIAL_THRESHOLD,
    MODEL_CONFIG_FILE, MODEL_TOKENIZER_FILE, MODEL_WEIGHTS_FILE,
};
use crate::embedding::{DevicePreference, ModelSource, SentenceConfig};
use crate::scoring::GradingPolicy;

/// Process configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `SEMGRADE_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8501`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Hugging Face model id, used when `model_path` is unset.
    pub model_id: String,

    /// Local directory holding `config.json`, `tokenizer.json` and `model.safetensors`.
    pub model_path: Option<PathBuf>,

    /// Hugging Face cache directory. Default: the hub's own (`HF_HOME`).
    pub model_cache: Option<PathBuf>,

    /// Token limit per input. Default: `256`.
    pub max_seq_len: usize,

    /// Compute device selection. Default: `auto`.
    pub device: DevicePreference,

    /// Use the deterministic stub embedder instead of a model.
    pub stub_embedder: bool,

    /// Lowest percentage graded EXCELLENT. Default: `85`.
    pub excellent_threshold: f64,

    /// Lowest percentage graded PARTIAL. Default: `60`.
    pub partial_threshold: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8501,
            bind_addr: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
            model_id: DEFAULT_MODEL_ID.to_string(),
            model_path: None,
            model_cache: None,
            max_seq_len: DEFAULT_MAX_SEQ_LEN,
            device: DevicePreference::Auto,
            stub_embedder: false,
            excellent_threshold: DEFAULT_EXCELLENT_THRESHOLD,
            partial_threshold: DEFAULT_PARTIAL_THRESHOLD,
        }
    }
}

impl Config {
    pub const ENV_PORT: &'static str = "SEMGRADE_PORT";
    pub const ENV_BIND_ADDR: &'static str = "SEMGRADE_BIND_ADDR";
    pub const ENV_MODEL_ID: &'static str = "SEMGRADE_MODEL_ID";
    pub const ENV_MODEL_PATH: &'static str = "SEMGRADE_MODEL_PATH";
    pub const ENV_MODEL_CACHE: &'static str = "SEMGRADE_MODEL_CACHE";
    pub const ENV_MAX_SEQ_LEN: &'static str = "SEMGRADE_MAX_SEQ_LEN";
    pub const ENV_DEVICE: &'static str = "SEMGRADE_DEVICE";
    pub const ENV_STUB_EMBEDDER: &'static str = "SEMGRADE_STUB_EMBEDDER";
    pub const ENV_EXCELLENT_THRESHOLD: &'static str = "SEMGRADE_EXCELLENT_THRESHOLD";
    pub const ENV_PARTIAL_THRESHOLD: &'static str = "SEMGRADE_PARTIAL_THRESHOLD";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let model_id = Self::parse_optional_string_from_env(Self::ENV_MODEL_ID)
            .unwrap_or(defaults.model_id);
        let model_path = Self::parse_optional_path_from_env(Self::ENV_MODEL_PATH);
        let model_cache = Self::parse_optional_path_from_env(Self::ENV_MODEL_CACHE);
        let max_seq_len = Self::parse_max_seq_len_from_env(defaults.max_seq_len)?;
        let device = Self::parse_device_from_env(defaults.device)?;
        let stub_embedder =
            Self::parse_bool_from_env(Self::ENV_STUB_EMBEDDER, defaults.stub_embedder)?;
        let excellent_threshold = Self::parse_f64_from_env(
            Self::ENV_EXCELLENT_THRESHOLD,
            defaults.excellent_threshold,
        )?;
        let partial_threshold =
            Self::parse_f64_from_env(Self::ENV_PARTIAL_THRESHOLD, defaults.partial_threshold)?;

        Ok(Self {
            port,
            bind_addr,
            model_id,
            model_path,
            model_cache,
            max_seq_len,
            device,
            stub_embedder,
            excellent_threshold,
            partial_threshold,
        })
    }

    /// Validates paths and thresholds (does not touch the network).
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.grading_policy()?;

        if self.stub_embedder {
            return Ok(());
        }

        if let Some(ref dir) = self.model_path {
            if !dir.exists() {
                return Err(ConfigError::PathNotFound { path: dir.clone() });
            }
            if !dir.is_dir() {
                return Err(ConfigError::NotADirectory { path: dir.clone() });
            }
            for file in [MODEL_CONFIG_FILE, MODEL_TOKENIZER_FILE, MODEL_WEIGHTS_FILE] {
                if !dir.join(file).is_file() {
                    return Err(ConfigError::MissingModelFile {
                        dir: dir.clone(),
                        file,
                    });
                }
            }
        }

        if let Some(ref cache) = self.model_cache
            && cache.exists()
            && !cache.is_dir()
        {
            return Err(ConfigError::NotADirectory {
                path: cache.clone(),
            });
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    /// Builds the grading policy described by the threshold settings.
    pub fn grading_policy(&self) -> Result<GradingPolicy, ConfigError> {
        GradingPolicy::new(self.excellent_threshold, self.partial_threshold).map_err(|e| {
            ConfigError::InvalidThresholds {
                reason: e.to_string(),
            }
        })
    }

    /// Builds the embedder configuration described by the model settings.
    pub fn sentence_config(&self) -> SentenceConfig {
        if self.stub_embedder {
            return SentenceConfig::stub();
        }

        let source = match &self.model_path {
            Some(dir) => ModelSource::Local(dir.clone()),
            None => ModelSource::Hub {
                model_id: self.model_id.clone(),
                cache_dir: self.model_cache.clone(),
            },
        };

        SentenceConfig {
            source,
            max_seq_len: self.max_seq_len,
            device: self.device,
            ..Default::default()
        }
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_max_seq_len_from_env(default: usize) -> Result<usize, ConfigError> {
        let Some(value) = Self::parse_optional_string_from_env(Self::ENV_MAX_SEQ_LEN) else {
            return Ok(default);
        };

        match value.parse::<usize>() {
            Ok(0) => Err(ConfigError::InvalidValue {
                name: Self::ENV_MAX_SEQ_LEN,
                value,
                reason: "must be greater than zero".to_string(),
            }),
            Ok(len) => Ok(len),
            Err(e) => Err(ConfigError::InvalidValue {
                name: Self::ENV_MAX_SEQ_LEN,
                value,
                reason: e.to_string(),
            }),
        }
    }

    fn parse_device_from_env(default: DevicePreference) -> Result<DevicePreference, ConfigError> {
        match Self::parse_optional_string_from_env(Self::ENV_DEVICE) {
            Some(value) => value
                .parse()
                .map_err(|reason| ConfigError::InvalidValue {
                    name: Self::ENV_DEVICE,
                    value,
                    reason,
                }),
            None => Ok(default),
        }
    }

    fn parse_bool_from_env(name: &'static str, default: bool) -> Result<bool, ConfigError> {
        let Some(value) = Self::parse_optional_string_from_env(name) else {
            return Ok(default);
        };

        match value.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidValue {
                name,
                value,
                reason: "expected true/false".to_string(),
            }),
        }
    }

    fn parse_f64_from_env(name: &'static str, default: f64) -> Result<f64, ConfigError> {
        let Some(value) = Self::parse_optional_string_from_env(name) else {
            return Ok(default);
        };

        match value.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            Ok(_) => Err(ConfigError::InvalidValue {
                name,
                value,
                reason: "must be a finite number".to_string(),
            }),
            Err(e) => Err(ConfigError::InvalidValue {
                name,
                value,
                reason: e.to_string(),
            }),
        }
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        Self::parse_optional_string_from_env(var_name).map(PathBuf::from)
    }

    fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}
