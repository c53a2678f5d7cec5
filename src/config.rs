use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::pipeline::{ChannelTask, PipelineError};

/// Run-wide settings. Loaded once from a TOML file plus `PLEXCAST_`
/// environment overrides; validated before any channel runs.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Root of the archived media tree; one subdirectory per channel ID
    pub media_folder: PathBuf,
    /// Directory for durable state: episode counters, thumbnail staging
    pub config_dir: PathBuf,
    /// Playlist item range passed to the downloader (e.g. "1-5")
    pub playlist_items: String,
    /// Pushover user token shared by all channels
    pub pushover_user_token: String,
    #[serde(default)]
    pub channels: Vec<ChannelSettings>,
}

/// One channel's configuration block
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelSettings {
    pub name: String,
    pub channel_id: String,
    pub youtube_url: String,
    pub file_format: String,
    pub file_quality: String,
    pub download_archive: PathBuf,
    pub pushover_app_token: String,
}

impl Settings {
    /// Load settings from a TOML file, then apply environment overrides
    /// (`PLEXCAST_MEDIA_FOLDER=...` etc.)
    pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
        Config::builder()
            .add_source(File::from(path.to_path_buf()))
            .add_source(Environment::with_prefix("PLEXCAST").separator("__"))
            .build()?
            .try_deserialize()
    }

    /// Check the run-wide settings every channel depends on. A failure
    /// here aborts the whole run.
    pub fn ensure_valid(&self) -> Result<(), PipelineError> {
        if !self.media_folder.is_dir() {
            return Err(PipelineError::Config(format!(
                "media_folder {} is not a directory",
                self.media_folder.display()
            )));
        }
        if !self.config_dir.is_dir() {
            return Err(PipelineError::Config(format!(
                "config_dir {} is not a directory",
                self.config_dir.display()
            )));
        }
        if self.playlist_items.is_empty() {
            return Err(PipelineError::Config("playlist_items is empty".to_string()));
        }
        if self.pushover_user_token.is_empty() {
            return Err(PipelineError::Config(
                "pushover_user_token is empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Materialize the per-channel tasks. Per-channel validation happens
    /// later, through `ChannelTask::skip_reason`, so one misconfigured
    /// channel never blocks the others.
    pub fn tasks(&self) -> Vec<ChannelTask> {
        self.channels
            .iter()
            .map(|c| ChannelTask {
                name: c.name.clone(),
                channel_id: c.channel_id.clone(),
                file_format: c.file_format.clone(),
                file_quality: c.file_quality.clone(),
                download_archive: c.download_archive.clone(),
                youtube_url: c.youtube_url.clone(),
                playlist_items: self.playlist_items.clone(),
                pushover_app_token: c.pushover_app_token.clone(),
            })
            .collect()
    }
}

/// Default settings location: the container-style `/config` path when it
/// exists, otherwise the user config directory.
pub fn default_config_path() -> PathBuf {
    let container = PathBuf::from("/config/settings.toml");
    if container.is_file() {
        return container;
    }

    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("plexcast")
        .join("settings.toml")
}
