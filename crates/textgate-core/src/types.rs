use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Engine mode selector, mirroring the Tesseract OEM constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineMode {
    LegacyOnly,
    LstmOnly,
    Combined,
    #[default]
    Default,
}

/// Immutable description of how to configure an engine handle.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineDescriptor {
    pub data_path: PathBuf,
    pub language: String,
    pub mode: EngineMode,
}

/// Terminal status of a single recognition request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeStatus {
    Completed,
    NoResult,
    Aborted,
    NotReady,
    Failed,
}

/// Result of one recognition request. Produced once, delivered once.
#[derive(Debug, Clone, PartialEq)]
pub struct RecognitionOutcome {
    pub text: Option<String>,
    pub elapsed: Duration,
    pub status: OutcomeStatus,
}

impl RecognitionOutcome {
    pub fn not_ready() -> Self {
        Self {
            text: None,
            elapsed: Duration::ZERO,
            status: OutcomeStatus::NotReady,
        }
    }

    /// Human-readable line for the status channel.
    pub fn status_line(&self) -> String {
        match self.status {
            OutcomeStatus::Completed => {
                format!("Completed in {:.3}s.", self.elapsed.as_secs_f32())
            }
            OutcomeStatus::NoResult => "No text recognized.".to_string(),
            OutcomeStatus::Aborted => "Recognition stopped.".to_string(),
            OutcomeStatus::NotReady => "Engine is not initialized.".to_string(),
            OutcomeStatus::Failed => "Recognition failed.".to_string(),
        }
    }
}

/// Observable gate state broadcast via watch channel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GateStatus {
    pub ready: bool,
    pub processing: bool,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_descriptor_fields() {
        let desc = EngineDescriptor {
            data_path: PathBuf::from("/data/tessdata"),
            language: "eng".to_string(),
            mode: EngineMode::Default,
        };
        assert_eq!(desc.data_path, PathBuf::from("/data/tessdata"));
        assert_eq!(desc.language, "eng");
        assert_eq!(desc.mode, EngineMode::Default);
    }

    #[test]
    fn test_engine_mode_deserialize_snake_case() {
        #[derive(Deserialize)]
        struct Wrapper {
            mode: EngineMode,
        }
        let w: Wrapper = toml::from_str(r#"mode = "lstm_only""#).unwrap();
        assert_eq!(w.mode, EngineMode::LstmOnly);
        let w: Wrapper = toml::from_str(r#"mode = "combined""#).unwrap();
        assert_eq!(w.mode, EngineMode::Combined);
    }

    #[test]
    fn test_outcome_status_line_completed() {
        let outcome = RecognitionOutcome {
            text: Some("hello".to_string()),
            elapsed: Duration::from_millis(1500),
            status: OutcomeStatus::Completed,
        };
        assert_eq!(outcome.status_line(), "Completed in 1.500s.");
    }

    #[test]
    fn test_outcome_status_line_no_result() {
        let outcome = RecognitionOutcome {
            text: None,
            elapsed: Duration::from_millis(10),
            status: OutcomeStatus::NoResult,
        };
        assert_eq!(outcome.status_line(), "No text recognized.");
    }

    #[test]
    fn test_outcome_not_ready_constructor() {
        let outcome = RecognitionOutcome::not_ready();
        assert_eq!(outcome.status, OutcomeStatus::NotReady);
        assert!(outcome.text.is_none());
        assert_eq!(outcome.elapsed, Duration::ZERO);
    }

    #[test]
    fn test_gate_status_default() {
        let status = GateStatus::default();
        assert!(!status.ready);
        assert!(!status.processing);
        assert!(status.message.is_empty());
    }
}
