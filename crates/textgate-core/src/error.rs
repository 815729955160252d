use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("environment variable not found: {0}")]
    EnvVarNotFound(String),
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("engine configuration rejected: {0}")]
    ConfigurationRejected(String),

    #[error("failed to load input image: {0}")]
    LoadFailed(String),

    #[error("recognition failed: {0}")]
    RecognitionFailed(String),

    #[error("engine not found: {0}")]
    NotFound(String),
}

#[derive(Debug, Error)]
pub enum GateError {
    #[error("engine configuration rejected: {0}")]
    ConfigurationRejected(String),

    #[error("engine gate worker is gone")]
    WorkerGone,
}

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("failed to watch frame directory: {0}")]
    Watch(#[from] notify::Error),

    #[error("frame directory does not exist: {0}")]
    MissingDirectory(String),
}
