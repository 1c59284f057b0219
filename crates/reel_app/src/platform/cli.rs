use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "reel", version, about = "Render, collect and download template videos")]
pub struct Cli {
    /// Configuration file (RON).
    #[arg(long, global = true, default_value = super::config::DEFAULT_CONFIG_FILENAME)]
    pub config: PathBuf,

    /// JSON array of videos that make up the `All Videos` collection.
    #[arg(long, global = true)]
    pub media: Option<PathBuf>,

    /// Log at debug level.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Render a primary composition plus optional keyed secondaries.
    Render(RenderArgs),
    /// Manage user collections.
    #[command(subcommand)]
    Collections(CollectionsCommand),
    /// Save one rendered video into the download directory.
    Download { url: String },
    /// Set the notification status on an external record.
    Notify(NotifyArgs),
}

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// JSON file holding the primary composition.
    #[arg(long)]
    pub primary: PathBuf,

    /// Secondary composition as KEY=FILE, e.g. `Template_9:16=story.json`.
    #[arg(long = "secondary", value_parser = parse_secondary)]
    pub secondaries: Vec<(String, PathBuf)>,

    /// Download every finished render once the run completes.
    #[arg(long)]
    pub download: bool,
}

#[derive(Debug, Subcommand)]
pub enum CollectionsCommand {
    /// Show every collection, `All Videos` first.
    List,
    /// Create an empty collection (resets an existing one).
    Create { name: String },
    Delete { name: String },
    /// Add a video to a collection, creating the collection if needed.
    Add(AddArgs),
    /// Preview a collection with one item moved. Nothing is saved.
    Reorder { name: String, from: usize, to: usize },
    /// Download a whole collection as a zip archive.
    Download { name: String },
}

#[derive(Debug, Args)]
pub struct AddArgs {
    pub name: String,

    #[arg(long, conflicts_with = "from_media", required_unless_present = "from_media")]
    pub url: Option<String>,

    #[arg(long, requires = "url")]
    pub label: Option<String>,

    #[arg(long, requires = "url")]
    pub created_at: Option<String>,

    /// Position (0-based) in `All Videos`.
    #[arg(long)]
    pub from_media: Option<usize>,
}

#[derive(Debug, Args)]
pub struct NotifyArgs {
    #[arg(long)]
    pub record_id: Option<String>,
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long)]
    pub table_id: Option<String>,
}

fn parse_secondary(raw: &str) -> Result<(String, PathBuf), String> {
    match raw.rsplit_once('=') {
        Some((key, file)) if !key.is_empty() && !file.is_empty() => {
            Ok((key.to_string(), PathBuf::from(file)))
        }
        _ => Err(format!("expected KEY=FILE, got {raw:?}")),
    }
}
