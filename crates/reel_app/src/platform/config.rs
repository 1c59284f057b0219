//! Application configuration loaded from `reel.ron`, plus the media list
//! that feeds the `All Videos` collection.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reel_core::VideoRef;
use reel_engine::{EngineSettings, FetchSettings, RecordSettings, RenderSettings};
use reel_logging::{reel_warn, LogDestination};
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_CONFIG_FILENAME: &str = "reel.ron";
const API_KEY_ENV: &str = "REEL_API_KEY";
const RECORDS_API_KEY_ENV: &str = "REEL_RECORDS_API_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
    #[error("failed to parse media list {path:?}: {source}")]
    Media {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogTarget {
    #[default]
    Terminal,
    File,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::File => LogDestination::File,
            LogTarget::Both => LogDestination::Both,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RecordsConfig {
    pub api_base: String,
    pub base_id: String,
    pub api_key: Option<String>,
}

impl Default for RecordsConfig {
    fn default() -> Self {
        Self {
            api_base: RecordSettings::default().api_base,
            base_id: String::new(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub render_endpoint: String,
    pub api_key: Option<String>,
    pub user_id: Option<String>,
    pub template_names: Vec<String>,
    pub data_dir: PathBuf,
    pub download_dir: PathBuf,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: Option<u64>,
    pub max_download_bytes: u64,
    pub records: Option<RecordsConfig>,
    pub log: LogTarget,
}

impl Default for AppConfig {
    fn default() -> Self {
        let fetch = FetchSettings::default();
        Self {
            render_endpoint: RenderSettings::default().endpoint,
            api_key: None,
            user_id: None,
            template_names: Vec::new(),
            data_dir: PathBuf::from(".reel"),
            download_dir: PathBuf::from("downloads"),
            connect_timeout_secs: fetch.connect_timeout.as_secs(),
            request_timeout_secs: None,
            max_download_bytes: fetch.max_bytes,
            records: None,
            log: LogTarget::default(),
        }
    }
}

impl AppConfig {
    /// Reads `path`; a missing file yields defaults. Environment overrides
    /// are applied afterwards.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = match fs::read_to_string(path) {
            Ok(text) => ron::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup(API_KEY_ENV).filter(|key| !key.is_empty()) {
            self.api_key = Some(key);
        }
        if let Some(key) = lookup(RECORDS_API_KEY_ENV).filter(|key| !key.is_empty()) {
            self.records.get_or_insert_with(RecordsConfig::default).api_key = Some(key);
        }
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: self.request_timeout_secs.map(Duration::from_secs),
            max_bytes: self.max_download_bytes,
        }
    }

    pub fn engine_settings(&self) -> EngineSettings {
        let fetch = self.fetch_settings();
        EngineSettings {
            render: RenderSettings {
                endpoint: self.render_endpoint.clone(),
                api_key: self.api_key.clone(),
                transport: fetch.clone(),
            },
            fetch,
            download_dir: self.download_dir.clone(),
        }
    }

    pub fn record_settings(&self) -> RecordSettings {
        let records = self.records.clone().unwrap_or_default();
        RecordSettings {
            api_base: records.api_base,
            base_id: records.base_id,
            api_key: records.api_key,
            transport: self.fetch_settings(),
        }
    }
}

/// Loads the `All Videos` source. No path means an empty library.
pub fn load_media(path: Option<&Path>) -> Result<Vec<VideoRef>, ConfigError> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let media: Vec<VideoRef> =
        serde_json::from_str(&text).map_err(|source| ConfigError::Media {
            path: path.to_path_buf(),
            source,
        })?;
    if media.is_empty() {
        reel_warn!("Media list {:?} is empty", path);
    }
    Ok(media)
}
