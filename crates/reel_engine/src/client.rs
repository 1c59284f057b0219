use reel_core::{RenderJob, RenderStatus};
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};

use crate::fetch::{map_reqwest_error, FetchSettings};
use crate::{FailureKind, RequestFailure};

#[derive(Debug, Clone)]
pub struct RenderSettings {
    /// Endpoint accepting render creation requests.
    pub endpoint: String,
    /// Sent as a bearer token when present.
    pub api_key: Option<String>,
    pub transport: FetchSettings,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:3000/api/videos".to_string(),
            api_key: None,
            transport: FetchSettings::default(),
        }
    }
}

/// Body of one render creation request. `source` is passed through untouched.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderRequest<'a> {
    pub source: &'a serde_json::Value,
    pub user_id: Option<&'a str>,
    pub template_names: &'a [String],
}

/// Issues one render and waits for the renderer's answer.
#[async_trait::async_trait]
pub trait RenderClient: Send + Sync {
    async fn submit(&self, request: &RenderRequest<'_>) -> Result<RenderJob, RequestFailure>;
}

#[derive(Debug, Deserialize)]
struct RenderResponse {
    #[serde(default)]
    id: Option<String>,
    status: String,
    #[serde(default)]
    url: Option<String>,
}

// The renderer answers with one render, or a list when several templates were used.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RenderReply {
    One(RenderResponse),
    Many(Vec<RenderResponse>),
}

impl RenderReply {
    fn into_job(self) -> Option<RenderJob> {
        let response = match self {
            RenderReply::One(response) => response,
            RenderReply::Many(responses) => responses.into_iter().next()?,
        };
        let status = RenderStatus::from_remote(&response.status);
        Some(RenderJob::new(response.id, status, response.url))
    }
}

#[derive(Debug, Clone)]
pub struct ReqwestRenderClient {
    settings: RenderSettings,
    client: reqwest::Client,
}

impl ReqwestRenderClient {
    pub fn new(settings: RenderSettings) -> Result<Self, RequestFailure> {
        let client = settings.transport.build_client()?;
        Ok(Self { settings, client })
    }
}

#[async_trait::async_trait]
impl RenderClient for ReqwestRenderClient {
    async fn submit(&self, request: &RenderRequest<'_>) -> Result<RenderJob, RequestFailure> {
        let endpoint = reqwest::Url::parse(&self.settings.endpoint)
            .map_err(|err| RequestFailure::new(FailureKind::InvalidUrl, err.to_string()))?;
        let body = serde_json::to_vec(request)
            .map_err(|err| RequestFailure::new(FailureKind::InvalidResponse, err.to_string()))?;

        let mut builder = self
            .client
            .post(endpoint)
            .header(CONTENT_TYPE, "application/json")
            .body(body);
        if let Some(key) = self.settings.api_key.as_deref() {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(RequestFailure::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        let reply: RenderReply = serde_json::from_slice(&bytes)
            .map_err(|err| RequestFailure::new(FailureKind::InvalidResponse, err.to_string()))?;
        reply.into_job().ok_or_else(|| {
            RequestFailure::new(FailureKind::InvalidResponse, "renderer returned no renders")
        })
    }
}
