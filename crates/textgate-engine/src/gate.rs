use crate::engine_trait::OcrEngine;
use crate::registry::EngineRegistry;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use textgate_core::{
    EngineDescriptor, EngineError, GateError, GateStatus, OutcomeStatus, RecognitionOutcome,
    StopToken,
};
use tokio::sync::{mpsc, oneshot, watch};

/// Builds a fresh engine handle. Called lazily by the worker on the first
/// `initialize`, and again if an `initialize` follows a `release`.
pub type EngineFactory = Box<dyn Fn() -> Box<dyn OcrEngine> + Send + Sync>;

/// One unit of work: an input image plus the sink its outcome goes to.
/// Callers may share one sink across many requests.
#[derive(Debug, Clone)]
pub struct RecognitionRequest {
    pub image_path: PathBuf,
    pub outcome_tx: mpsc::UnboundedSender<RecognitionOutcome>,
}

enum GateCommand {
    Initialize {
        descriptor: EngineDescriptor,
        reply: oneshot::Sender<Result<(), GateError>>,
    },
    Recognize(RecognitionRequest),
    Release {
        reply: oneshot::Sender<()>,
    },
    Shutdown,
}

struct GateShared {
    ready: AtomicBool,
    processing: AtomicBool,
    stop: StopToken,
    status_tx: watch::Sender<GateStatus>,
}

/// Cloneable handle for flows that only submit, stop, and observe. The
/// owning [`EngineGate`] keeps lifecycle control (initialize, release,
/// shutdown) to itself.
#[derive(Clone)]
pub struct GateClient {
    cmd_tx: mpsc::Sender<GateCommand>,
    shared: Arc<GateShared>,
}

impl GateClient {
    pub fn is_ready(&self) -> bool {
        self.shared.ready.load(Ordering::SeqCst)
    }

    pub fn is_processing(&self) -> bool {
        self.shared.processing.load(Ordering::SeqCst)
    }

    pub fn status_receiver(&self) -> watch::Receiver<GateStatus> {
        self.shared.status_tx.subscribe()
    }

    /// Enqueue a recognition request. A not-ready gate answers the request's
    /// own sink with a `NotReady` outcome instead of erroring, so sink
    /// consumers see every request resolve.
    pub async fn submit(&self, request: RecognitionRequest) -> Result<(), GateError> {
        if !self.is_ready() {
            tracing::warn!(
                image = %request.image_path.display(),
                "submit before successful initialize"
            );
            let _ = request.outcome_tx.send(RecognitionOutcome::not_ready());
            return Ok(());
        }
        self.cmd_tx
            .send(GateCommand::Recognize(request))
            .await
            .map_err(|_| GateError::WorkerGone)
    }

    /// Signal the in-flight recognition to abort. No-op while idle. The
    /// processing flag is cleared only by the worker's completion path.
    pub fn request_stop(&self) {
        if !self.is_processing() {
            return;
        }
        self.shared.stop.trigger();
        self.shared
            .status_tx
            .send_modify(|s| s.message = "Stopping...".to_string());
        tracing::debug!("stop requested for in-flight recognition");
    }
}

/// Serialized access to a stateful, non-reentrant OCR engine.
///
/// A single worker task owns the engine handle exclusively and drains a
/// bounded command queue, so concurrent submitters serialize by enqueueing
/// rather than by blocking on a held lock. Per request the worker runs the
/// engine's load/recognize/clear sequence without interleaving, delivers the
/// outcome to the request's sink, and only then clears the processing flag.
pub struct EngineGate {
    client: GateClient,
    worker: Option<tokio::task::JoinHandle<()>>,
}

impl EngineGate {
    pub fn new(factory: EngineFactory, queue_depth: usize) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel(queue_depth.max(1));
        let (status_tx, _) = watch::channel(GateStatus::default());
        let shared = Arc::new(GateShared {
            ready: AtomicBool::new(false),
            processing: AtomicBool::new(false),
            stop: StopToken::new(),
            status_tx,
        });
        let worker = tokio::spawn(run_worker(factory, cmd_rx, Arc::clone(&shared)));
        Self {
            client: GateClient { cmd_tx, shared },
            worker: Some(worker),
        }
    }

    pub fn from_registry(
        registry: &EngineRegistry,
        engine_name: &str,
        queue_depth: usize,
    ) -> Result<Self, EngineError> {
        let factory = registry.factory(engine_name)?;
        Ok(Self::new(Box::new(factory), queue_depth))
    }

    pub fn client(&self) -> GateClient {
        self.client.clone()
    }

    pub fn is_ready(&self) -> bool {
        self.client.is_ready()
    }

    pub fn is_processing(&self) -> bool {
        self.client.is_processing()
    }

    pub fn status_receiver(&self) -> watch::Receiver<GateStatus> {
        self.client.status_receiver()
    }

    /// Configure the engine, constructing the handle on first use. A repeat
    /// initialize reconfigures the existing handle in place. On rejection
    /// the gate stays not-ready; the handle is kept for a later retry.
    pub async fn initialize(&self, descriptor: EngineDescriptor) -> Result<(), GateError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.client
            .cmd_tx
            .send(GateCommand::Initialize {
                descriptor,
                reply: reply_tx,
            })
            .await
            .map_err(|_| GateError::WorkerGone)?;
        reply_rx.await.map_err(|_| GateError::WorkerGone)?
    }

    pub async fn submit(&self, request: RecognitionRequest) -> Result<(), GateError> {
        self.client.submit(request).await
    }

    pub fn request_stop(&self) {
        self.client.request_stop();
    }

    /// Dispose the engine handle and mark the gate not ready. Safe when no
    /// handle was ever created or a prior initialize failed.
    pub async fn release(&self) -> Result<(), GateError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.client
            .cmd_tx
            .send(GateCommand::Release { reply: reply_tx })
            .await
            .map_err(|_| GateError::WorkerGone)?;
        reply_rx.await.map_err(|_| GateError::WorkerGone)
    }

    /// Drain already-queued requests, dispose the engine, and stop the
    /// worker.
    pub async fn shutdown(mut self) {
        let _ = self.client.cmd_tx.send(GateCommand::Shutdown).await;
        if let Some(handle) = self.worker.take() {
            let _ = handle.await;
        }
    }
}

async fn run_worker(
    factory: EngineFactory,
    mut cmd_rx: mpsc::Receiver<GateCommand>,
    shared: Arc<GateShared>,
) {
    let mut engine: Option<Box<dyn OcrEngine>> = None;

    while let Some(cmd) = cmd_rx.recv().await {
        match cmd {
            GateCommand::Initialize { descriptor, reply } => {
                let result = initialize_engine(&factory, &mut engine, &descriptor).await;
                match &result {
                    Ok(()) => {
                        shared.ready.store(true, Ordering::SeqCst);
                        shared.status_tx.send_modify(|s| {
                            s.ready = true;
                            s.message = "Engine initialized.".to_string();
                        });
                        tracing::info!(
                            data_path = %descriptor.data_path.display(),
                            language = %descriptor.language,
                            "engine initialized"
                        );
                    }
                    Err(e) => {
                        shared.ready.store(false, Ordering::SeqCst);
                        shared.status_tx.send_modify(|s| {
                            s.ready = false;
                            s.message = "Engine initialization failed.".to_string();
                        });
                        tracing::error!("cannot initialize engine: {e}");
                    }
                }
                // Flags are settled before the caller is unblocked.
                let _ = reply.send(result);
            }
            GateCommand::Recognize(request) => {
                // Re-check on dequeue: a release may have raced the submit.
                let ready = shared.ready.load(Ordering::SeqCst);
                let Some(handle) = engine.as_mut().filter(|_| ready) else {
                    tracing::warn!(
                        image = %request.image_path.display(),
                        "recognize dequeued while engine not initialized"
                    );
                    let _ = request.outcome_tx.send(RecognitionOutcome::not_ready());
                    continue;
                };

                shared.stop.clear();
                shared.processing.store(true, Ordering::SeqCst);
                shared.status_tx.send_modify(|s| {
                    s.processing = true;
                    s.message = "Processing...".to_string();
                });

                let outcome =
                    run_recognition(handle.as_mut(), &request.image_path, &shared.stop).await;
                let message = outcome.status_line();
                tracing::debug!(
                    image = %request.image_path.display(),
                    status = ?outcome.status,
                    elapsed_ms = outcome.elapsed.as_millis() as u64,
                    "recognition finished"
                );

                // Ordering guarantee: the outcome reaches the sink before the
                // processing flag is observed false.
                if request.outcome_tx.send(outcome).is_err() {
                    tracing::debug!("outcome receiver dropped");
                }
                shared.processing.store(false, Ordering::SeqCst);
                shared.status_tx.send_modify(|s| {
                    s.processing = false;
                    s.message = message;
                });
            }
            GateCommand::Release { reply } => {
                if let Some(mut handle) = engine.take() {
                    if let Err(e) = handle.dispose().await {
                        tracing::warn!("engine dispose failed: {e}");
                    }
                }
                shared.ready.store(false, Ordering::SeqCst);
                shared.status_tx.send_modify(|s| {
                    s.ready = false;
                    s.message = "Engine released.".to_string();
                });
                tracing::info!("engine released");
                let _ = reply.send(());
            }
            GateCommand::Shutdown => {
                if let Some(mut handle) = engine.take() {
                    if let Err(e) = handle.dispose().await {
                        tracing::warn!("engine dispose failed: {e}");
                    }
                }
                shared.ready.store(false, Ordering::SeqCst);
                break;
            }
        }
    }
}

async fn initialize_engine(
    factory: &EngineFactory,
    engine: &mut Option<Box<dyn OcrEngine>>,
    descriptor: &EngineDescriptor,
) -> Result<(), GateError> {
    let handle = match engine {
        Some(handle) => handle,
        None => engine.insert(factory()),
    };
    handle
        .configure(descriptor)
        .await
        .map_err(|e| GateError::ConfigurationRejected(e.to_string()))
}

/// The critical three-call sequence. `clear` runs after a successful `load`
/// no matter how recognition ended, so the engine never carries stale input
/// into the next request.
async fn run_recognition(
    engine: &mut dyn OcrEngine,
    image_path: &Path,
    stop: &StopToken,
) -> RecognitionOutcome {
    let started = Instant::now();

    if let Err(e) = engine.load(image_path).await {
        tracing::warn!(image = %image_path.display(), "failed to load input image: {e}");
        return RecognitionOutcome {
            text: None,
            elapsed: started.elapsed(),
            status: OutcomeStatus::Failed,
        };
    }

    // Token poll between the steps the worker controls.
    if stop.is_triggered() {
        if let Err(e) = engine.clear().await {
            tracing::warn!("failed to clear engine state: {e}");
        }
        return RecognitionOutcome {
            text: None,
            elapsed: started.elapsed(),
            status: OutcomeStatus::Aborted,
        };
    }

    let recognized = engine.recognize(stop).await;
    if let Err(e) = engine.clear().await {
        tracing::warn!("failed to clear engine state: {e}");
    }
    let elapsed = started.elapsed();

    match recognized {
        Ok(_) if stop.is_triggered() => RecognitionOutcome {
            text: None,
            elapsed,
            status: OutcomeStatus::Aborted,
        },
        Ok(Some(text)) => RecognitionOutcome {
            text: Some(text),
            elapsed,
            status: OutcomeStatus::Completed,
        },
        Ok(None) => RecognitionOutcome {
            text: None,
            elapsed,
            status: OutcomeStatus::NoResult,
        },
        Err(e) => {
            tracing::warn!(image = %image_path.display(), "recognition failed: {e}");
            RecognitionOutcome {
                text: None,
                elapsed,
                status: OutcomeStatus::Failed,
            }
        }
    }
}
