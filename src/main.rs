use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use textgate_capture::{FrameFeeder, FrameWatcher};
use textgate_core::{AppConfig, CaptureConfig};
use textgate_engine::{EngineGate, EngineRegistry, RecognitionRequest};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "textgate", about = "Serialized OCR engine gate")]
struct Cli {
    /// Path to the configuration file (config.toml is picked up when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Recognize a single image and exit
    #[arg(long)]
    image: Option<PathBuf>,

    /// Watch a directory for new frames (overrides [capture].watch_dir)
    #[arg(long)]
    watch: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // An explicit --config must exist; the implicit default may be absent.
    let config = match &cli.config {
        Some(path) => AppConfig::load_from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => {
            let default_path = std::path::Path::new("config.toml");
            if default_path.exists() {
                AppConfig::load_from_file(default_path)
                    .context("failed to load config from config.toml")?
            } else {
                AppConfig::default()
            }
        }
    };

    let env_filter =
        EnvFilter::try_new(&config.general.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("textgate starting");

    let registry = EngineRegistry::new();
    let gate = EngineGate::from_registry(&registry, &config.engine.name, config.general.queue_depth)
        .with_context(|| format!("failed to create engine '{}'", config.engine.name))?;

    gate.initialize(config.engine.descriptor())
        .await
        .context("engine initialization failed")?;
    tracing::info!(engine = %config.engine.name, "engine gate ready");

    if let Some(image_path) = cli.image {
        let (outcome_tx, mut outcome_rx) = tokio::sync::mpsc::unbounded_channel();
        gate.submit(RecognitionRequest {
            image_path,
            outcome_tx,
        })
        .await
        .context("failed to submit recognition request")?;

        let outcome = outcome_rx
            .recv()
            .await
            .context("gate closed before delivering an outcome")?;
        tracing::info!("{}", outcome.status_line());
        if let Some(text) = outcome.text {
            println!("{text}");
        }
        gate.shutdown().await;
        return Ok(());
    }

    let watch_dir = cli
        .watch
        .or_else(|| config.capture.as_ref().map(|c| c.watch_dir.clone()))
        .context("nothing to do: pass --image or --watch, or set [capture].watch_dir")?;
    let extensions = config
        .capture
        .as_ref()
        .map(|c| c.extensions.clone())
        .unwrap_or_else(CaptureConfig::default_extensions);

    let mut watcher =
        FrameWatcher::new(&watch_dir, &extensions).context("failed to start frame watcher")?;
    let frames = watcher
        .take_receiver()
        .context("frame receiver already taken")?;
    let (outcome_tx, mut outcome_rx) = tokio::sync::mpsc::unbounded_channel();
    let mut feeder = FrameFeeder::start(gate.client(), frames, outcome_tx);

    let logger = tokio::spawn(async move {
        while let Some(outcome) = outcome_rx.recv().await {
            match outcome.text {
                Some(ref text) => tracing::info!("{} {text}", outcome.status_line()),
                None => tracing::info!("{}", outcome.status_line()),
            }
        }
    });

    tracing::info!(dir = %watch_dir.display(), "watching for frames, press ctrl-c to quit");
    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for ctrl-c")?;

    tracing::info!("shutting down");
    drop(watcher);
    feeder.shutdown().await;
    gate.shutdown().await;
    let _ = logger.await;

    Ok(())
}
