use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

const UNKNOWN_DATE: &str = "Unknown date";
const INVALID_DATE: &str = "Invalid date";
const DATE_FORMAT: &str = "%b %-d, %Y";

/// A previously rendered video. `url` is the identity within a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRef {
    pub url: String,
    #[serde(
        rename = "templateNames",
        default,
        deserialize_with = "deserialize_label"
    )]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl VideoRef {
    pub fn new(url: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            label: label.into(),
            created_at: None,
        }
    }

    pub fn with_created_at(mut self, created_at: impl Into<String>) -> Self {
        self.created_at = Some(created_at.into());
        self
    }

    /// Human-readable creation date. Never fails: missing or malformed
    /// timestamps degrade to a placeholder.
    pub fn display_created_at(&self) -> String {
        match self.created_at.as_deref().map(str::trim) {
            None | Some("") => UNKNOWN_DATE.to_string(),
            Some(raw) => parse_date(raw)
                .map(|date| date.format(DATE_FORMAT).to_string())
                .unwrap_or_else(|| INVALID_DATE.to_string()),
        }
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

// Records coming from the media table carry either a single template name or a list.
fn deserialize_label<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Label {
        One(String),
        Many(Vec<String>),
        Nothing(()),
    }

    Ok(match Label::deserialize(deserializer)? {
        Label::One(name) => name,
        Label::Many(names) => names.join(", "),
        Label::Nothing(()) => String::new(),
    })
}

/// Payload carried by a drag gesture onto a collection.
///
/// Items dragged out of a collection carry the full `video`; items dragged
/// from elsewhere may carry only identifier fields.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DragItem {
    pub video: Option<VideoRef>,
    pub video_id: Option<String>,
    pub label: Option<String>,
    pub created_at: Option<String>,
    pub source_collection: Option<String>,
    pub index: Option<usize>,
}

impl DragItem {
    /// Drag payload for an item that already holds a full video reference.
    pub fn from_video(video: VideoRef) -> Self {
        Self {
            video_id: Some(video.url.clone()),
            video: Some(video),
            ..Self::default()
        }
    }

    /// Drag payload carrying only identifier fields.
    pub fn from_id(video_id: impl Into<String>) -> Self {
        Self {
            video_id: Some(video_id.into()),
            ..Self::default()
        }
    }

    /// The video this payload stands for, reconstructed from identifier
    /// fields when no full reference is attached.
    pub fn resolve(&self) -> Option<VideoRef> {
        if let Some(video) = &self.video {
            return Some(video.clone());
        }
        let url = self.video_id.as_deref().filter(|id| !id.is_empty())?;
        Some(VideoRef {
            url: url.to_string(),
            label: self.label.clone().unwrap_or_default(),
            created_at: self.created_at.clone(),
        })
    }
}
