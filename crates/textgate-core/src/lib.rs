pub mod config;
pub mod error;
pub mod stop;
pub mod types;

pub use config::{AppConfig, CaptureConfig, EngineConfig, GeneralConfig};
pub use error::{CaptureError, ConfigError, EngineError, GateError};
pub use stop::StopToken;
pub use types::{EngineDescriptor, EngineMode, GateStatus, OutcomeStatus, RecognitionOutcome};
