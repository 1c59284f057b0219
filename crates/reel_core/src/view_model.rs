use crate::{DownloadSlot, SessionState};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub session: SessionState,
    /// Jobs in the current run: the primary plus every secondary.
    pub expected: usize,
    /// Jobs the renderer has answered so far.
    pub completed: usize,
    /// `Video n/m is rendering...` while a run is in flight.
    pub status_line: Option<String>,
    pub downloads: Vec<DownloadButtonView>,
    pub show_create: bool,
    pub last_error: Option<String>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadButtonView {
    pub slot: DownloadSlot,
    pub label: String,
    pub url: String,
}
