use std::path::{Path, PathBuf};

use reel_logging::{reel_info, reel_warn};
use thiserror::Error;

use crate::fetch::Fetcher;
use crate::filename::download_filename;
use crate::persist::{AtomicFileWriter, PersistError};
use crate::RequestFailure;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("fetching the video failed: {0}")]
    Fetch(#[from] RequestFailure),
    #[error("saving the video failed: {0}")]
    Persist(#[from] PersistError),
}

#[derive(Debug)]
pub enum DownloadOutcome {
    Saved { url: String, path: PathBuf },
    /// Saving did not work; the caller should open `url` directly instead.
    OpenDirectly { url: String, reason: DownloadError },
}

impl DownloadOutcome {
    pub fn url(&self) -> &str {
        match self {
            DownloadOutcome::Saved { url, .. } | DownloadOutcome::OpenDirectly { url, .. } => url,
        }
    }
}

/// Saves one finished video into `dest_dir`, falling back to opening it.
pub async fn download_video(fetcher: &dyn Fetcher, url: &str, dest_dir: &Path) -> DownloadOutcome {
    match save_video(fetcher, url, dest_dir).await {
        Ok(path) => {
            reel_info!("Saved {} to {:?}", url, path);
            DownloadOutcome::Saved {
                url: url.to_string(),
                path,
            }
        }
        Err(reason) => {
            reel_warn!("Download of {} failed, opening directly: {}", url, reason);
            DownloadOutcome::OpenDirectly {
                url: url.to_string(),
                reason,
            }
        }
    }
}

async fn save_video(
    fetcher: &dyn Fetcher,
    url: &str,
    dest_dir: &Path,
) -> Result<PathBuf, DownloadError> {
    let output = fetcher.fetch(url).await?;
    let writer = AtomicFileWriter::new(dest_dir.to_path_buf());
    Ok(writer.write(&download_filename(url), &output.bytes)?)
}
