use reel_core::RenderProgress;
use reel_logging::{reel_info, reel_warn};

use crate::client::{RenderClient, RenderRequest};
use crate::{EngineEvent, RenderError};

/// Receives engine events as work progresses.
pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelProgressSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    pub key: String,
    pub source: serde_json::Value,
}

/// One primary composition plus keyed secondaries, rendered in that order.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderBatch {
    pub primary: serde_json::Value,
    pub secondaries: Vec<Composition>,
    pub user_id: Option<String>,
    pub template_names: Vec<String>,
}

impl RenderBatch {
    pub fn new(primary: serde_json::Value) -> Self {
        Self {
            primary,
            secondaries: Vec::new(),
            user_id: None,
            template_names: Vec::new(),
        }
    }

    /// Adds a secondary. Reusing a key replaces its source in place.
    pub fn with_secondary(mut self, key: impl Into<String>, source: serde_json::Value) -> Self {
        let key = key.into();
        match self.secondaries.iter_mut().find(|c| c.key == key) {
            Some(existing) => existing.source = source,
            None => self.secondaries.push(Composition { key, source }),
        }
        self
    }

    pub fn with_user_id(mut self, user_id: Option<String>) -> Self {
        self.user_id = user_id;
        self
    }

    pub fn with_template_names(mut self, names: Vec<String>) -> Self {
        self.template_names = names;
        self
    }

    /// Number of render requests this batch issues.
    pub fn expected(&self) -> usize {
        1 + self.secondaries.len()
    }

    fn request<'a>(&'a self, source: &'a serde_json::Value) -> RenderRequest<'a> {
        RenderRequest {
            source,
            user_id: self.user_id.as_deref(),
            template_names: &self.template_names,
        }
    }
}

/// Renders the primary, then each secondary, one request at a time.
///
/// `sink` receives a [`EngineEvent::RenderProgress`] snapshot after every
/// completed job. The first failure ends the run; nothing after it is sent.
pub async fn run_renders(
    client: &dyn RenderClient,
    batch: &RenderBatch,
    sink: &dyn ProgressSink,
) -> Result<RenderProgress, RenderError> {
    reel_info!("Render run started: {} jobs", batch.expected());

    let main = client
        .submit(&batch.request(&batch.primary))
        .await
        .map_err(|failure| {
            reel_warn!("Primary render failed: {}", failure);
            if failure.is_unauthorized() {
                RenderError::CredentialsMissing
            } else {
                RenderError::RequestFailed(failure)
            }
        })?;
    reel_info!("Primary render finished with status {:?}", main.status);

    let mut progress = RenderProgress::with_main(main);
    sink.emit(EngineEvent::RenderProgress(progress.clone()));

    for composition in &batch.secondaries {
        let result = client
            .submit(&batch.request(&composition.source))
            .await
            .map_err(|failure| {
                reel_warn!("Render `{}` failed: {}", composition.key, failure);
                RenderError::SecondaryFailed {
                    key: composition.key.clone(),
                    failure,
                }
            })?;
        reel_info!(
            "Render `{}` finished with status {:?}",
            composition.key,
            result.status
        );
        progress.push_additional(composition.key.clone(), result);
        sink.emit(EngineEvent::RenderProgress(progress.clone()));
    }

    reel_info!(
        "Render run finished: {}/{} succeeded",
        progress.succeeded(),
        batch.expected()
    );
    Ok(progress)
}
