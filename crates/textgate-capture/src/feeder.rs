use std::path::PathBuf;
use textgate_core::RecognitionOutcome;
use textgate_engine::{GateClient, RecognitionRequest};
use tokio::sync::mpsc;

/// Background task bridging a frame source to the gate. Frames arriving
/// while a recognition is in flight are dropped, not queued.
pub struct FrameFeeder {
    task: Option<tokio::task::JoinHandle<()>>,
}

impl FrameFeeder {
    pub fn start(
        client: GateClient,
        mut frames: mpsc::UnboundedReceiver<PathBuf>,
        outcome_tx: mpsc::UnboundedSender<RecognitionOutcome>,
    ) -> Self {
        let task = tokio::spawn(async move {
            while let Some(image_path) = frames.recv().await {
                if client.is_processing() {
                    tracing::trace!(frame = %image_path.display(), "engine busy, dropping frame");
                    continue;
                }
                let request = RecognitionRequest {
                    image_path,
                    outcome_tx: outcome_tx.clone(),
                };
                if client.submit(request).await.is_err() {
                    tracing::debug!("gate worker gone, stopping frame feed");
                    break;
                }
            }
            tracing::debug!("frame source closed, feeder exiting");
        });
        Self { task: Some(task) }
    }

    pub async fn shutdown(&mut self) {
        if let Some(handle) = self.task.take() {
            let _ = handle.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::path::Path;
    use std::time::Duration;
    use textgate_core::{EngineDescriptor, EngineError, EngineMode, OutcomeStatus, StopToken};
    use textgate_engine::{EngineGate, EngineRegistry, OcrEngine};

    fn descriptor() -> EngineDescriptor {
        EngineDescriptor {
            data_path: PathBuf::from("./tessdata"),
            language: "eng".to_string(),
            mode: EngineMode::Default,
        }
    }

    struct SlowEngine {
        delay: Duration,
    }

    #[async_trait]
    impl OcrEngine for SlowEngine {
        fn name(&self) -> &str {
            "slow"
        }

        async fn configure(&mut self, _d: &EngineDescriptor) -> Result<(), EngineError> {
            Ok(())
        }

        async fn load(&mut self, _p: &Path) -> Result<(), EngineError> {
            Ok(())
        }

        async fn recognize(&mut self, _stop: &StopToken) -> Result<Option<String>, EngineError> {
            tokio::time::sleep(self.delay).await;
            Ok(Some("slow text".to_string()))
        }

        async fn clear(&mut self) -> Result<(), EngineError> {
            Ok(())
        }

        async fn dispose(&mut self) -> Result<(), EngineError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_feeder_forwards_frames_to_gate() {
        let registry = EngineRegistry::new();
        let gate = EngineGate::from_registry(&registry, "null", 8).unwrap();
        gate.initialize(descriptor()).await.unwrap();

        let (frame_tx, frame_rx) = mpsc::unbounded_channel();
        let (outcome_tx, mut outcome_rx) = mpsc::unbounded_channel();
        let mut feeder = FrameFeeder::start(gate.client(), frame_rx, outcome_tx);

        frame_tx.send(PathBuf::from("/tmp/frame_a.png")).unwrap();

        let outcome = tokio::time::timeout(Duration::from_secs(2), outcome_rx.recv())
            .await
            .expect("timed out")
            .expect("channel closed");
        assert_eq!(outcome.status, OutcomeStatus::Completed);
        assert_eq!(outcome.text.as_deref(), Some("[null] frame_a.png"));

        drop(frame_tx);
        feeder.shutdown().await;
        gate.shutdown().await;
    }

    #[tokio::test]
    async fn test_feeder_drops_frames_while_busy() {
        let gate = EngineGate::new(
            Box::new(|| {
                Box::new(SlowEngine {
                    delay: Duration::from_millis(200),
                })
            }),
            8,
        );
        gate.initialize(descriptor()).await.unwrap();

        let (frame_tx, frame_rx) = mpsc::unbounded_channel();
        let (outcome_tx, mut outcome_rx) = mpsc::unbounded_channel();
        let mut feeder = FrameFeeder::start(gate.client(), frame_rx, outcome_tx);

        frame_tx.send(PathBuf::from("/tmp/frame_1.png")).unwrap();
        // Let the worker pick up the first frame before offering the second
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(gate.is_processing());
        frame_tx.send(PathBuf::from("/tmp/frame_2.png")).unwrap();

        let outcome = tokio::time::timeout(Duration::from_secs(2), outcome_rx.recv())
            .await
            .expect("timed out")
            .expect("channel closed");
        assert_eq!(outcome.status, OutcomeStatus::Completed);

        // The second frame was dropped, so no further outcome arrives
        drop(frame_tx);
        feeder.shutdown().await;
        gate.shutdown().await;
        assert!(outcome_rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_feeder_not_ready_gate_reports_not_ready() {
        let registry = EngineRegistry::new();
        let gate = EngineGate::from_registry(&registry, "null", 8).unwrap();

        let (frame_tx, frame_rx) = mpsc::unbounded_channel();
        let (outcome_tx, mut outcome_rx) = mpsc::unbounded_channel();
        let mut feeder = FrameFeeder::start(gate.client(), frame_rx, outcome_tx);

        frame_tx.send(PathBuf::from("/tmp/frame_a.png")).unwrap();

        let outcome = tokio::time::timeout(Duration::from_secs(2), outcome_rx.recv())
            .await
            .expect("timed out")
            .expect("channel closed");
        assert_eq!(outcome.status, OutcomeStatus::NotReady);

        drop(frame_tx);
        feeder.shutdown().await;
        gate.shutdown().await;
    }

    #[tokio::test]
    async fn test_feeder_shutdown_after_source_closes() {
        let registry = EngineRegistry::new();
        let gate = EngineGate::from_registry(&registry, "null", 8).unwrap();
        gate.initialize(descriptor()).await.unwrap();

        let (frame_tx, frame_rx) = mpsc::unbounded_channel();
        let (outcome_tx, _outcome_rx) = mpsc::unbounded_channel();
        let mut feeder = FrameFeeder::start(gate.client(), frame_rx, outcome_tx);

        drop(frame_tx);
        tokio::time::timeout(Duration::from_secs(2), feeder.shutdown())
            .await
            .expect("shutdown timed out");
        gate.shutdown().await;
    }
}
