use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use reel_core::VideoRef;
use reel_logging::{reel_info, reel_warn};
use thiserror::Error;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::fetch::Fetcher;
use crate::filename::{archive_filename, url_extension};
use crate::persist::{AtomicFileWriter, PersistError};

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("collection {0:?} has no videos to download")]
    EmptyCollection(String),
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
}

/// One collection item left out of the archive.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("item {position} ({url}) skipped: {reason}")]
pub struct ArchiveItemFailed {
    /// 1-based position in the collection, matching the entry name.
    pub position: usize,
    pub url: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSummary {
    pub path: PathBuf,
    pub entries: Vec<String>,
    pub skipped: Vec<ArchiveItemFailed>,
}

/// Fetches every video of a collection into `{dest_dir}/{name}.zip`.
///
/// Entries are numbered `1.mp4`, `2.webm`, ... by collection position.
/// Items that cannot be fetched are logged and left out.
pub async fn download_collection(
    fetcher: &dyn Fetcher,
    name: &str,
    videos: &[VideoRef],
    dest_dir: &Path,
) -> Result<ArchiveSummary, ArchiveError> {
    if videos.is_empty() {
        return Err(ArchiveError::EmptyCollection(name.to_string()));
    }

    let mut files = Vec::with_capacity(videos.len());
    let mut skipped = Vec::new();
    for (index, video) in videos.iter().enumerate() {
        let position = index + 1;
        match fetcher.fetch(&video.url).await {
            Ok(output) => {
                let entry = format!("{position}.{}", url_extension(&video.url));
                files.push((entry, output.bytes));
            }
            Err(failure) => {
                let failed = ArchiveItemFailed {
                    position,
                    url: video.url.clone(),
                    reason: failure.to_string(),
                };
                reel_warn!("Archive {:?}: {}", name, failed);
                skipped.push(failed);
            }
        }
    }

    let archive = build_zip(&files)?;
    let writer = AtomicFileWriter::new(dest_dir.to_path_buf());
    let path = writer.write(&archive_filename(name), archive)?;
    reel_info!(
        "Archive {:?} written to {:?}: {} entries, {} skipped",
        name,
        path,
        files.len(),
        skipped.len()
    );

    Ok(ArchiveSummary {
        path,
        entries: files.into_iter().map(|(entry, _)| entry).collect(),
        skipped,
    })
}

// Videos are already compressed, so entries are stored as-is.
fn build_zip(files: &[(String, Vec<u8>)]) -> Result<Vec<u8>, ArchiveError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Stored);
    for (entry, bytes) in files {
        zip.start_file(entry.as_str(), options)?;
        zip.write_all(bytes)?;
    }
    Ok(zip.finish()?.into_inner())
}
