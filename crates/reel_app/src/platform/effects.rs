use reel_core::{Effect, Msg};
use reel_engine::{EngineEvent, EngineHandle, RenderBatch};
use reel_logging::{reel_error, reel_info};

/// Runs effects emitted by `update` against the engine.
pub struct EffectRunner<'a> {
    engine: &'a EngineHandle,
    batch: RenderBatch,
    pending_downloads: usize,
}

impl<'a> EffectRunner<'a> {
    pub fn new(engine: &'a EngineHandle, batch: RenderBatch) -> Self {
        Self {
            engine,
            batch,
            pending_downloads: 0,
        }
    }

    pub fn enqueue(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartRender { expected } => {
                    reel_info!("StartRender expected={}", expected);
                    self.engine.render(self.batch.clone());
                }
                Effect::Download { url } => {
                    self.pending_downloads += 1;
                    self.engine.download(url);
                }
                Effect::ShowError(cause) => {
                    reel_error!("{}", cause);
                    eprintln!("Error: {cause}");
                }
            }
        }
    }

    /// Downloads started but not yet reported back.
    pub fn pending_downloads(&self) -> usize {
        self.pending_downloads
    }

    pub fn download_finished(&mut self) {
        self.pending_downloads = self.pending_downloads.saturating_sub(1);
    }
}

/// Translates render events into state-machine messages. Download and
/// archive events have no message and are handled by the caller.
pub fn map_event(event: &EngineEvent) -> Option<Msg> {
    match event {
        EngineEvent::RenderProgress(progress) => Some(Msg::RenderProgress(progress.clone())),
        EngineEvent::RenderCompleted(Ok(progress)) => Some(Msg::RenderFinished(progress.clone())),
        EngineEvent::RenderCompleted(Err(err)) => Some(Msg::RenderFailed(err.to_string())),
        EngineEvent::DownloadCompleted(_) | EngineEvent::ArchiveCompleted(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reel_core::{RenderJob, RenderProgress};
    use reel_engine::RenderError;

    #[test]
    fn render_events_map_to_messages() {
        let progress =
            RenderProgress::with_main(RenderJob::succeeded("https://cdn.example.com/a.mp4"));
        assert_eq!(
            map_event(&EngineEvent::RenderProgress(progress.clone())),
            Some(Msg::RenderProgress(progress.clone()))
        );
        assert_eq!(
            map_event(&EngineEvent::RenderCompleted(Ok(progress.clone()))),
            Some(Msg::RenderFinished(progress))
        );
        match map_event(&EngineEvent::RenderCompleted(Err(RenderError::CredentialsMissing))) {
            Some(Msg::RenderFailed(cause)) => assert!(cause.starts_with("No API key was provided")),
            other => panic!("unexpected message {other:?}"),
        }
    }
}
