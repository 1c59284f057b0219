use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;

use reel_core::VideoRef;
use reel_logging::{reel_debug, reel_error};

use crate::archive::download_collection;
use crate::client::{RenderClient, RenderSettings, ReqwestRenderClient};
use crate::download::download_video;
use crate::fetch::{FetchSettings, Fetcher, ReqwestFetcher};
use crate::orchestrator::{run_renders, ChannelProgressSink, RenderBatch};
use crate::EngineEvent;

#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub render: RenderSettings,
    pub fetch: FetchSettings,
    pub download_dir: PathBuf,
}

enum EngineCommand {
    Render(RenderBatch),
    Download { url: String },
    DownloadCollection { name: String, videos: Vec<VideoRef> },
}

struct Workers {
    renderer: Arc<dyn RenderClient>,
    fetcher: Arc<dyn Fetcher>,
    download_dir: PathBuf,
}

/// Runs engine work on a background runtime and reports back over a channel.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: EngineSettings) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    reel_error!("Failed to start engine runtime: {}", err);
                    return;
                }
            };
            let workers = match Workers::new(settings) {
                Ok(workers) => Arc::new(workers),
                Err(err) => {
                    reel_error!("Failed to build HTTP clients: {}", err);
                    return;
                }
            };
            while let Ok(command) = cmd_rx.recv() {
                let workers = workers.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(&workers, command, event_tx).await;
                });
            }
        });

        Self { cmd_tx, event_rx }
    }

    pub fn render(&self, batch: RenderBatch) {
        self.send(EngineCommand::Render(batch));
    }

    pub fn download(&self, url: impl Into<String>) {
        self.send(EngineCommand::Download { url: url.into() });
    }

    pub fn download_collection(&self, name: impl Into<String>, videos: Vec<VideoRef>) {
        self.send(EngineCommand::DownloadCollection {
            name: name.into(),
            videos,
        });
    }

    /// Blocks for the next event. `None` once the engine has stopped.
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.recv().ok()
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            reel_error!("Engine is not running; command dropped");
        }
    }
}

impl Workers {
    fn new(settings: EngineSettings) -> Result<Self, crate::RequestFailure> {
        Ok(Self {
            renderer: Arc::new(ReqwestRenderClient::new(settings.render)?),
            fetcher: Arc::new(ReqwestFetcher::new(settings.fetch)?),
            download_dir: settings.download_dir,
        })
    }
}

async fn handle_command(
    workers: &Workers,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Render(batch) => {
            let sink = ChannelProgressSink::new(event_tx.clone());
            let result = run_renders(workers.renderer.as_ref(), &batch, &sink).await;
            let _ = event_tx.send(EngineEvent::RenderCompleted(result));
        }
        EngineCommand::Download { url } => {
            reel_debug!("Downloading {}", url);
            let outcome =
                download_video(workers.fetcher.as_ref(), &url, &workers.download_dir).await;
            let _ = event_tx.send(EngineEvent::DownloadCompleted(outcome));
        }
        EngineCommand::DownloadCollection { name, videos } => {
            let result = download_collection(
                workers.fetcher.as_ref(),
                &name,
                &videos,
                &workers.download_dir,
            )
            .await;
            let _ = event_tx.send(EngineEvent::ArchiveCompleted(result));
        }
    }
}
