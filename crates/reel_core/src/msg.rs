use crate::RenderProgress;

/// Identifies one downloadable job in the render area.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DownloadSlot {
    Main,
    Additional(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User clicked Create with this many secondary compositions attached.
    CreateClicked { secondary_count: usize },
    /// Orchestrator delivered a new aggregate snapshot.
    RenderProgress(RenderProgress),
    /// Orchestration aborted with a human-readable cause.
    RenderFailed(String),
    /// Orchestration completed with its final aggregate.
    RenderFinished(RenderProgress),
    /// User clicked the download button for one job.
    DownloadClicked(DownloadSlot),
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
