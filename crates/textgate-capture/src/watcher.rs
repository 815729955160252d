use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use textgate_core::CaptureError;
use tokio::sync::mpsc;

/// Watches a single directory for newly created frame files and forwards
/// their paths. Stand-in for a platform screen-capture feed: whatever writes
/// frames into the directory is the capture source.
pub struct FrameWatcher {
    rx: Option<mpsc::UnboundedReceiver<PathBuf>>,
    _watcher: RecommendedWatcher,
}

impl FrameWatcher {
    pub fn new(dir: &Path, extensions: &[String]) -> Result<Self, CaptureError> {
        if !dir.is_dir() {
            return Err(CaptureError::MissingDirectory(dir.display().to_string()));
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let extensions: Vec<String> = extensions
            .iter()
            .map(|e| e.to_ascii_lowercase())
            .collect();

        let mut watcher =
            notify::recommended_watcher(move |res: Result<Event, notify::Error>| match res {
                Ok(event) => {
                    if !matches!(event.kind, EventKind::Create(_)) {
                        return;
                    }
                    for path in event.paths {
                        if has_allowed_extension(&path, &extensions) {
                            let _ = tx.send(path);
                        }
                    }
                }
                Err(e) => {
                    tracing::error!("frame watch error: {e}");
                }
            })?;
        watcher.watch(dir, RecursiveMode::NonRecursive)?;

        tracing::info!(dir = %dir.display(), "watching for frames");
        Ok(Self {
            rx: Some(rx),
            _watcher: watcher,
        })
    }

    pub fn take_receiver(&mut self) -> Option<mpsc::UnboundedReceiver<PathBuf>> {
        self.rx.take()
    }
}

fn has_allowed_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| extensions.iter().any(|a| a.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}
