//! Reel engine: render orchestration, downloads, and local persistence.
mod archive;
mod client;
mod download;
mod engine;
mod fetch;
mod filename;
mod notify;
mod orchestrator;
mod persist;
mod types;

pub use archive::{download_collection, ArchiveError, ArchiveItemFailed, ArchiveSummary};
pub use client::{RenderClient, RenderRequest, RenderSettings, ReqwestRenderClient};
pub use download::{download_video, DownloadError, DownloadOutcome};
pub use engine::{EngineHandle, EngineSettings};
pub use fetch::{FetchOutput, FetchSettings, Fetcher, ReqwestFetcher};
pub use filename::{archive_filename, download_filename, store_filename, url_extension};
pub use notify::{NotificationUpdate, NotifyError, RecordSettings, RecordUpdater};
pub use orchestrator::{
    run_renders, ChannelProgressSink, Composition, ProgressSink, RenderBatch,
};
pub use persist::{ensure_output_dir, AtomicFileWriter, FileStore, PersistError};
pub use types::{EngineEvent, FailureKind, RenderError, RequestFailure};
