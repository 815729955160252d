use crate::engine_trait::OcrEngine;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use textgate_core::{EngineDescriptor, EngineError, StopToken};

/// Deterministic stand-in engine: echoes the loaded file name as recognized
/// text. Used by tests and as the default wiring when no real engine is
/// compiled in.
pub struct NullEngine {
    configured: bool,
    loaded: Option<PathBuf>,
    recognize_count: usize,
}

impl NullEngine {
    pub fn new() -> Self {
        Self {
            configured: false,
            loaded: None,
            recognize_count: 0,
        }
    }

    pub fn recognize_count(&self) -> usize {
        self.recognize_count
    }
}

impl Default for NullEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OcrEngine for NullEngine {
    fn name(&self) -> &str {
        "null"
    }

    async fn configure(&mut self, descriptor: &EngineDescriptor) -> Result<(), EngineError> {
        if descriptor.language.is_empty() {
            return Err(EngineError::ConfigurationRejected(
                "empty language code".to_string(),
            ));
        }
        self.configured = true;
        tracing::debug!(
            data_path = %descriptor.data_path.display(),
            language = %descriptor.language,
            "NullEngine configured"
        );
        Ok(())
    }

    async fn load(&mut self, image_path: &Path) -> Result<(), EngineError> {
        self.loaded = Some(image_path.to_path_buf());
        Ok(())
    }

    async fn recognize(&mut self, stop: &StopToken) -> Result<Option<String>, EngineError> {
        let loaded = self
            .loaded
            .as_ref()
            .ok_or_else(|| EngineError::RecognitionFailed("no image loaded".to_string()))?;

        self.recognize_count += 1;
        if stop.is_triggered() {
            return Ok(None);
        }

        let file_name = loaded
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Some(format!("[null] {file_name}")))
    }

    async fn clear(&mut self) -> Result<(), EngineError> {
        self.loaded = None;
        Ok(())
    }

    async fn dispose(&mut self) -> Result<(), EngineError> {
        self.configured = false;
        self.loaded = None;
        Ok(())
    }
}
