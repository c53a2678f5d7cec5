mod downloader;
mod ledger;
mod metadata;
mod notifier;
mod orchestrator;
mod renamer;
mod scanner;
mod sweeper;
mod thumbnail;
mod types;


pub use downloader::Downloader;
pub use ledger::{EpisodeLedger, episode_label};
pub use metadata::MetadataExtractor;
pub use notifier::{Notification, Notifier, episode_notification};
pub use orchestrator::{ChannelOutcome, CycleReport, Pipeline, discover_episodes};
pub use renamer::{MEDIA_EXT, Renamer, episode_file_name};
pub use scanner::Scanner;
pub use sweeper::{RetentionSweeper, SweepReport};
pub use thumbnail::{ThumbnailResolver, thumbnail_file_name};
pub use types::{ChannelTask, EpisodeArtifacts, VideoMetadata};

/// Pipeline result type
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Pipeline error types
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Downloader error: {0}")]
    Downloader(String),

    #[error("HTTP {status} fetching {url}")]
    Fetch { status: u16, url: String },

    #[error("Notification rejected: {status} - {message}")]
    Notify { status: u16, message: String },
}
