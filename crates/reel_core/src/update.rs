use reel_logging::{reel_debug, reel_warn};

use crate::{AppState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::CreateClicked { secondary_count } => {
            // One run at a time, and finished jobs must be collected first.
            if state.is_busy() || state.has_pending_downloads() {
                return (state, Vec::new());
            }
            let expected = 1 + secondary_count;
            state.begin_run(expected);
            vec![Effect::StartRender { expected }]
        }
        Msg::RenderProgress(progress) => {
            if state.is_busy() {
                state.apply_progress(progress);
            } else {
                reel_debug!("Dropping progress snapshot outside of a run");
            }
            Vec::new()
        }
        Msg::RenderFailed(cause) => {
            if !state.is_busy() {
                return (state, Vec::new());
            }
            reel_warn!("Render run failed: {}", cause);
            state.fail_run(cause.clone());
            vec![Effect::ShowError(cause)]
        }
        Msg::RenderFinished(progress) => {
            if state.is_busy() {
                state.finish_run(progress);
            }
            Vec::new()
        }
        Msg::DownloadClicked(slot) => match state.take_download(&slot) {
            Some(url) => vec![Effect::Download { url }],
            None => Vec::new(),
        },
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
