pub mod engine_trait;
pub mod gate;
pub mod null_engine;
pub mod registry;
#[cfg(feature = "tesseract")]
pub mod tesseract_engine;

pub use engine_trait::OcrEngine;
pub use gate::{EngineFactory, EngineGate, GateClient, RecognitionRequest};
pub use null_engine::NullEngine;
pub use registry::EngineRegistry;
#[cfg(feature = "tesseract")]
pub use tesseract_engine::TesseractEngine;
