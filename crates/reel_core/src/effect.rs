/// Side effects requested by [`crate::update`] for the platform layer to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Start one orchestration run; `expected` counts the primary plus secondaries.
    StartRender { expected: usize },
    /// Fetch or open a finished render.
    Download { url: String },
    /// Present a blocking error notification to the user.
    ShowError(String),
}
