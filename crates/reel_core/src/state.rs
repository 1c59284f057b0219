use crate::view_model::{AppViewModel, DownloadButtonView};
use crate::{format_from_key, DownloadSlot, RenderJob, RenderProgress};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Rendering,
}

/// State behind the create/render/download control.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    session: SessionState,
    expected: usize,
    renders: RenderProgress,
    last_error: Option<String>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> SessionState {
        self.session
    }

    pub fn is_busy(&self) -> bool {
        self.session == SessionState::Rendering
    }

    /// Whether finished jobs are still waiting for the user to download them.
    pub fn has_pending_downloads(&self) -> bool {
        !self.renders.is_empty()
    }

    pub fn view(&self) -> AppViewModel {
        let mut downloads = Vec::new();
        if let Some(url) = self.renders.main.as_ref().and_then(RenderJob::result_url) {
            downloads.push(DownloadButtonView {
                slot: DownloadSlot::Main,
                label: "Download Main Video".to_string(),
                url: url.to_string(),
            });
        }
        for render in &self.renders.additional {
            if let Some(url) = render.result.result_url() {
                downloads.push(DownloadButtonView {
                    slot: DownloadSlot::Additional(render.key.clone()),
                    label: format!("Download {} Format", format_from_key(&render.key)),
                    url: url.to_string(),
                });
            }
        }

        let status_line = self.is_busy().then(|| {
            let current = (self.display_completed() + 1).min(self.expected.max(1));
            format!("Video {}/{} is rendering...", current, self.expected)
        });

        AppViewModel {
            session: self.session,
            expected: self.expected,
            completed: self.renders.completed(),
            status_line,
            downloads,
            show_create: !self.is_busy() && !self.has_pending_downloads(),
            last_error: self.last_error.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns the dirty flag and clears it.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn begin_run(&mut self, expected: usize) {
        self.session = SessionState::Rendering;
        self.expected = expected;
        self.renders = RenderProgress::default();
        self.last_error = None;
        self.mark_dirty();
    }

    pub(crate) fn apply_progress(&mut self, progress: RenderProgress) {
        self.renders = progress;
        self.mark_dirty();
    }

    pub(crate) fn finish_run(&mut self, progress: RenderProgress) {
        self.session = SessionState::Idle;
        self.renders = progress;
        self.drop_unready();
        self.mark_dirty();
    }

    pub(crate) fn fail_run(&mut self, cause: String) {
        self.session = SessionState::Idle;
        self.last_error = Some(cause);
        self.drop_unready();
        self.mark_dirty();
    }

    /// Removes the job behind `slot` and returns its URL if it was ready.
    pub(crate) fn take_download(&mut self, slot: &DownloadSlot) -> Option<String> {
        let url = match slot {
            DownloadSlot::Main => {
                let url = self.renders.main.as_ref()?.result_url()?.to_string();
                self.renders.main = None;
                url
            }
            DownloadSlot::Additional(key) => {
                let index = self
                    .renders
                    .additional
                    .iter()
                    .position(|render| &render.key == key && render.result.is_ready())?;
                let render = self.renders.additional.remove(index);
                render.result.result_url()?.to_string()
            }
        };
        self.mark_dirty();
        Some(url)
    }

    // Main counts once delivered; secondaries only when they succeeded.
    fn display_completed(&self) -> usize {
        usize::from(self.renders.main.is_some())
            + self
                .renders
                .additional
                .iter()
                .filter(|render| render.result.is_ready())
                .count()
    }

    fn drop_unready(&mut self) {
        if !self.renders.main.as_ref().is_some_and(RenderJob::is_ready) {
            self.renders.main = None;
        }
        self.renders
            .additional
            .retain(|render| render.result.is_ready());
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}
