use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation token for an in-flight recognition.
///
/// Triggered from any thread; the engine worker polls it between the steps
/// it controls and engines poll it inside steps they control. Cleared by the
/// worker before each new request.
#[derive(Debug, Clone, Default)]
pub struct StopToken {
    triggered: Arc<AtomicBool>,
}

impl StopToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) {
        self.triggered.store(true, Ordering::SeqCst);
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered.load(Ordering::SeqCst)
    }

    pub fn clear(&self) {
        self.triggered.store(false, Ordering::SeqCst);
    }
}
