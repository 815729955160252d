use crate::engine_trait::OcrEngine;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use textgate_core::{EngineDescriptor, EngineError, StopToken};

/// Tesseract-backed engine.
///
/// Currently validates configuration and tracks per-request state only; the
/// actual native binding is wired when the `tesseract` dependency in the
/// manifest is uncommented.
pub struct TesseractEngine {
    descriptor: Option<EngineDescriptor>,
    loaded: Option<PathBuf>,
}

impl TesseractEngine {
    pub fn new() -> Self {
        Self {
            descriptor: None,
            loaded: None,
        }
    }
}

impl Default for TesseractEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OcrEngine for TesseractEngine {
    fn name(&self) -> &str {
        "tesseract"
    }

    async fn configure(&mut self, descriptor: &EngineDescriptor) -> Result<(), EngineError> {
        if !descriptor.data_path.is_dir() {
            return Err(EngineError::ConfigurationRejected(format!(
                "data path is not a directory: {}",
                descriptor.data_path.display()
            )));
        }
        if descriptor.language.is_empty() {
            return Err(EngineError::ConfigurationRejected(
                "empty language code".to_string(),
            ));
        }
        self.descriptor = Some(descriptor.clone());
        tracing::info!(
            data_path = %descriptor.data_path.display(),
            language = %descriptor.language,
            mode = ?descriptor.mode,
            "TesseractEngine configured (stub, native binding not loaded)"
        );
        Ok(())
    }

    async fn load(&mut self, image_path: &Path) -> Result<(), EngineError> {
        if !image_path.is_file() {
            return Err(EngineError::LoadFailed(format!(
                "input image not found: {}",
                image_path.display()
            )));
        }
        self.loaded = Some(image_path.to_path_buf());
        Ok(())
    }

    async fn recognize(&mut self, _stop: &StopToken) -> Result<Option<String>, EngineError> {
        if self.loaded.is_none() {
            return Err(EngineError::RecognitionFailed(
                "no image loaded".to_string(),
            ));
        }
        // Stub: real inference deferred to when the tesseract crate is wired
        Ok(None)
    }

    async fn clear(&mut self) -> Result<(), EngineError> {
        self.loaded = None;
        Ok(())
    }

    async fn dispose(&mut self) -> Result<(), EngineError> {
        self.descriptor = None;
        self.loaded = None;
        Ok(())
    }
}
