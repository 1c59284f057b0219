use std::fmt;

use reel_core::RenderProgress;
use thiserror::Error;

use crate::archive::{ArchiveError, ArchiveSummary};
use crate::download::DownloadOutcome;

#[derive(Debug)]
pub enum EngineEvent {
    /// Snapshot after each individual render completes.
    RenderProgress(RenderProgress),
    RenderCompleted(Result<RenderProgress, RenderError>),
    DownloadCompleted(DownloadOutcome),
    ArchiveCompleted(Result<ArchiveSummary, ArchiveError>),
}

/// A single HTTP exchange that did not produce a usable response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} ({message})")]
pub struct RequestFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl RequestFailure {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.kind == FailureKind::HttpStatus(401)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    InvalidResponse,
    TooLarge { max_bytes: u64, actual: Option<u64> },
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "status code {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::InvalidResponse => write!(f, "invalid response body"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
        }
    }
}

/// Why an orchestration run stopped. Progress already delivered stays valid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("No API key was provided. Set `api_key` in the config file or REEL_API_KEY.")]
    CredentialsMissing,
    #[error("The render request failed with {0}")]
    RequestFailed(RequestFailure),
    #[error("Additional render `{key}` failed with {failure}")]
    SecondaryFailed { key: String, failure: RequestFailure },
}
