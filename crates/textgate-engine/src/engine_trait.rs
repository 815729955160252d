use async_trait::async_trait;
use std::path::Path;
use textgate_core::{EngineDescriptor, EngineError, StopToken};

/// A stateful, non-reentrant OCR engine.
///
/// The gate's worker task is the sole caller; `&mut self` enforces that no
/// two calls overlap. Per request the worker runs `load`, `recognize`,
/// `clear` in order. `recognize` returning `Ok(None)` means the engine
/// produced no text, which is an outcome, not an error.
#[async_trait]
pub trait OcrEngine: Send {
    fn name(&self) -> &str;

    async fn configure(&mut self, descriptor: &EngineDescriptor) -> Result<(), EngineError>;

    async fn load(&mut self, image_path: &Path) -> Result<(), EngineError>;

    /// Run recognition on the loaded image. Engines should poll `stop`
    /// between units of work they control and bail out early when triggered.
    async fn recognize(&mut self, stop: &StopToken) -> Result<Option<String>, EngineError>;

    /// Drop per-request state, keeping the configuration.
    async fn clear(&mut self) -> Result<(), EngineError>;

    /// Tear down the engine entirely.
    async fn dispose(&mut self) -> Result<(), EngineError>;
}
