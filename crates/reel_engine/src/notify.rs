//! Updates the notification-status field of a single record in the external
//! record table.

use reel_logging::{reel_error, reel_info};
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use crate::fetch::{map_reqwest_error, FetchSettings};
use crate::{FailureKind, RequestFailure};

const STATUS_FIELD: &str = "email_notification_status";

#[derive(Debug, Clone)]
pub struct RecordSettings {
    pub api_base: String,
    pub base_id: String,
    pub api_key: Option<String>,
    pub transport: FetchSettings,
}

impl Default for RecordSettings {
    fn default() -> Self {
        Self {
            api_base: "https://api.airtable.com/v0".to_string(),
            base_id: String::new(),
            api_key: None,
            transport: FetchSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationUpdate {
    pub record_id: Option<String>,
    pub status: Option<String>,
    pub table_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotifyError {
    #[error("Missing required fields")]
    MissingFields,
    #[error("Failed to update record: {0}")]
    Upstream(RequestFailure),
}

impl NotifyError {
    /// HTTP-style status for this error: client error or server error.
    pub fn status_code(&self) -> u16 {
        match self {
            NotifyError::MissingFields => 400,
            NotifyError::Upstream(_) => 500,
        }
    }
}

#[derive(Debug, Deserialize)]
struct UpdateReply {
    records: Vec<serde_json::Value>,
}

#[derive(Debug, Clone)]
pub struct RecordUpdater {
    settings: RecordSettings,
    client: reqwest::Client,
}

impl RecordUpdater {
    pub fn new(settings: RecordSettings) -> Result<Self, RequestFailure> {
        let client = settings.transport.build_client()?;
        Ok(Self { settings, client })
    }

    /// Sets the notification status on one record and returns the updated record.
    pub async fn update_notification_status(
        &self,
        update: &NotificationUpdate,
    ) -> Result<serde_json::Value, NotifyError> {
        let (Some(record_id), Some(status), Some(table_id)) = (
            present(&update.record_id),
            present(&update.status),
            present(&update.table_id),
        ) else {
            return Err(NotifyError::MissingFields);
        };

        self.patch(record_id, status, table_id).await.map_err(|failure| {
            reel_error!("Record update for {} failed: {}", record_id, failure);
            NotifyError::Upstream(failure)
        })
    }

    async fn patch(
        &self,
        record_id: &str,
        status: &str,
        table_id: &str,
    ) -> Result<serde_json::Value, RequestFailure> {
        let endpoint = format!(
            "{}/{}/{}",
            self.settings.api_base.trim_end_matches('/'),
            self.settings.base_id,
            table_id
        );
        let url = reqwest::Url::parse(&endpoint)
            .map_err(|err| RequestFailure::new(FailureKind::InvalidUrl, err.to_string()))?;
        let body = json!({
            "records": [{ "id": record_id, "fields": { STATUS_FIELD: status } }]
        });

        let mut builder = self
            .client
            .patch(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body.to_string());
        if let Some(key) = self.settings.api_key.as_deref() {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status_code = response.status();
        if !status_code.is_success() {
            return Err(RequestFailure::new(
                FailureKind::HttpStatus(status_code.as_u16()),
                status_code.to_string(),
            ));
        }
        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        let reply: UpdateReply = serde_json::from_slice(&bytes)
            .map_err(|err| RequestFailure::new(FailureKind::InvalidResponse, err.to_string()))?;
        let record = reply.records.into_iter().next().ok_or_else(|| {
            RequestFailure::new(FailureKind::InvalidResponse, "no record in reply")
        })?;

        reel_info!("Record {} in {} set to {:?}", record_id, table_id, status);
        Ok(record)
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.is_empty())
}
