use crate::error::ConfigError;
use crate::types::{EngineDescriptor, EngineMode};
use regex::Regex;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub capture: Option<CaptureConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeneralConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_queue_depth")]
    pub queue_depth: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            queue_depth: default_queue_depth(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct EngineConfig {
    #[serde(default = "default_engine_name")]
    pub name: String,

    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,

    #[serde(default = "default_language")]
    pub language: String,

    #[serde(default)]
    pub mode: EngineMode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            name: default_engine_name(),
            data_path: default_data_path(),
            language: default_language(),
            mode: EngineMode::default(),
        }
    }
}

impl EngineConfig {
    /// Build the init descriptor handed to the gate.
    pub fn descriptor(&self) -> EngineDescriptor {
        EngineDescriptor {
            data_path: self.data_path.clone(),
            language: self.language.clone(),
            mode: self.mode,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CaptureConfig {
    pub watch_dir: PathBuf,

    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

impl CaptureConfig {
    pub fn default_extensions() -> Vec<String> {
        default_extensions()
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_queue_depth() -> usize {
    8
}

fn default_engine_name() -> String {
    "null".to_string()
}

fn default_data_path() -> PathBuf {
    PathBuf::from("./tessdata")
}

fn default_language() -> String {
    "eng".to_string()
}

fn default_extensions() -> Vec<String> {
    vec!["png".to_string(), "jpg".to_string(), "jpeg".to_string()]
}

/// Interpolate `${VAR}` patterns with environment variable values.
fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let re = Regex::new(r"\$\{([^}]+)\}").unwrap();
    let mut result = input.to_string();
    let mut errors = Vec::new();

    for cap in re.captures_iter(input) {
        let var_name = &cap[1];
        match std::env::var(var_name) {
            Ok(val) => {
                result = result.replace(&cap[0], &val);
            }
            Err(_) => {
                errors.push(var_name.to_string());
            }
        }
    }

    if let Some(first_missing) = errors.into_iter().next() {
        return Err(ConfigError::EnvVarNotFound(first_missing));
    }

    Ok(result)
}

impl AppConfig {
    /// Load configuration from a TOML file, with environment variable interpolation.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let interpolated = interpolate_env_vars(&content)?;
        let config: AppConfig = toml::from_str(&interpolated)?;
        Ok(config)
    }

    /// Parse configuration from a TOML string (for testing).
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let interpolated = interpolate_env_vars(s)?;
        let config: AppConfig = toml::from_str(&interpolated)?;
        Ok(config)
    }
}
