use serde::{Deserialize, Serialize};

/// Outcome of one remote render as reported by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderStatus {
    Pending,
    Succeeded,
    Failed,
}

impl RenderStatus {
    /// Maps the renderer's status string. Anything that is neither
    /// `succeeded` nor `failed` is still in flight on the remote side.
    pub fn from_remote(status: &str) -> Self {
        match status {
            "succeeded" => RenderStatus::Succeeded,
            "failed" => RenderStatus::Failed,
            _ => RenderStatus::Pending,
        }
    }
}

/// Result of one render request. Immutable once received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderJob {
    pub render_id: Option<String>,
    pub status: RenderStatus,
    result_url: Option<String>,
}

impl RenderJob {
    /// Builds a job; the URL is dropped unless the render succeeded.
    pub fn new(render_id: Option<String>, status: RenderStatus, url: Option<String>) -> Self {
        let result_url = match status {
            RenderStatus::Succeeded => url,
            RenderStatus::Pending | RenderStatus::Failed => None,
        };
        Self {
            render_id,
            status,
            result_url,
        }
    }

    pub fn succeeded(url: impl Into<String>) -> Self {
        Self::new(None, RenderStatus::Succeeded, Some(url.into()))
    }

    pub fn failed() -> Self {
        Self::new(None, RenderStatus::Failed, None)
    }

    pub fn result_url(&self) -> Option<&str> {
        self.result_url.as_deref()
    }

    /// A job the user can download: succeeded and carrying a URL.
    pub fn is_ready(&self) -> bool {
        self.status == RenderStatus::Succeeded && self.result_url.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionalRender {
    pub key: String,
    pub result: RenderJob,
}

/// Aggregate snapshot of an orchestration run.
///
/// `main` is set once; `additional` only grows, in completion order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RenderProgress {
    pub main: Option<RenderJob>,
    pub additional: Vec<AdditionalRender>,
}

impl RenderProgress {
    pub fn with_main(main: RenderJob) -> Self {
        Self {
            main: Some(main),
            additional: Vec::new(),
        }
    }

    pub fn push_additional(&mut self, key: impl Into<String>, result: RenderJob) {
        self.additional.push(AdditionalRender {
            key: key.into(),
            result,
        });
    }

    /// Jobs that have come back from the renderer, successful or not.
    pub fn completed(&self) -> usize {
        usize::from(self.main.is_some()) + self.additional.len()
    }

    /// Jobs that finished with a downloadable result.
    pub fn succeeded(&self) -> usize {
        let main = self
            .main
            .as_ref()
            .is_some_and(|job| job.status == RenderStatus::Succeeded);
        usize::from(main)
            + self
                .additional
                .iter()
                .filter(|render| render.result.status == RenderStatus::Succeeded)
                .count()
    }

    pub fn is_empty(&self) -> bool {
        self.main.is_none() && self.additional.is_empty()
    }
}

/// Display name of the format encoded in a secondary key: the second
/// `_`-separated segment, so `Template_16:9` becomes `16:9`. Keys without
/// that segment show `Unknown Format`.
pub fn format_from_key(key: &str) -> &str {
    match key.split_once('_') {
        Some((_, rest)) => rest
            .split('_')
            .next()
            .filter(|format| !format.is_empty())
            .unwrap_or("Unknown Format"),
        None => "Unknown Format",
    }
}

#[cfg(test)]
mod tests {
    use super::{format_from_key, RenderJob, RenderProgress, RenderStatus};

    #[test]
    fn url_is_kept_only_for_succeeded_jobs() {
        let ok = RenderJob::new(None, RenderStatus::Succeeded, Some("u1".into()));
        let pending = RenderJob::new(None, RenderStatus::Pending, Some("u2".into()));
        assert_eq!(ok.result_url(), Some("u1"));
        assert!(ok.is_ready());
        assert_eq!(pending.result_url(), None);
        assert!(!pending.is_ready());
    }

    #[test]
    fn remote_status_mapping() {
        assert_eq!(RenderStatus::from_remote("succeeded"), RenderStatus::Succeeded);
        assert_eq!(RenderStatus::from_remote("failed"), RenderStatus::Failed);
        assert_eq!(RenderStatus::from_remote("rendering"), RenderStatus::Pending);
        assert_eq!(RenderStatus::from_remote("planned"), RenderStatus::Pending);
    }

    #[test]
    fn counts_completed_and_succeeded() {
        let mut progress = RenderProgress::with_main(RenderJob::succeeded("u1"));
        progress.push_additional("Promo_16:9", RenderJob::failed());
        progress.push_additional("Promo_9:16", RenderJob::succeeded("u3"));
        assert_eq!(progress.completed(), 3);
        assert_eq!(progress.succeeded(), 2);
        assert!(RenderProgress::default().is_empty());
    }

    #[test]
    fn format_is_taken_after_first_underscore() {
        assert_eq!(format_from_key("Template_16:9"), "16:9");
        assert_eq!(format_from_key("Template_1:1_extra"), "1:1");
        assert_eq!(format_from_key("Template_"), "Unknown Format");
        assert_eq!(format_from_key("9:16"), "Unknown Format");
        assert_eq!(format_from_key(""), "Unknown Format");
    }
}
