use std::path::Path;

use tokio::process::Command;
use tracing::info;

use super::{ChannelTask, PipelineError, Result};

/// Wrapper around the external yt-dlp process. One blocking invocation
/// covers a channel's whole playlist-item range; yt-dlp's own archive file
/// deduplicates across runs.
pub struct Downloader {
    bin: String,
}

impl Default for Downloader {
    fn default() -> Self {
        Self::new()
    }
}

impl Downloader {
    pub fn new() -> Self {
        Self {
            bin: "yt-dlp".to_string(),
        }
    }

    pub fn with_bin(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }

    /// Download new videos for a channel into
    /// `{media_folder}/{channel_id}/Season_1/`, writing a `.info.json`
    /// sidecar and a `.description` file per video. A non-zero exit is an
    /// error for this channel's cycle.
    pub async fn download_channel(&self, media_folder: &Path, task: &ChannelTask) -> Result<()> {
        let template = media_folder
            .join(&task.channel_id)
            .join("Season_1")
            .join("%(id)s.%(ext)s");

        info!(
            channel = %task.name,
            url = %task.youtube_url,
            items = %task.playlist_items,
            "invoking downloader"
        );

        let status = Command::new(&self.bin)
            .arg("-o")
            .arg(&template)
            .args(["--playlist-items", &task.playlist_items])
            .arg("--write-info-json")
            .arg("--no-write-playlist-metafiles")
            .arg("--download-archive")
            .arg(&task.download_archive)
            .arg("--restrict-filenames")
            .arg("--add-metadata")
            .args(["--merge-output-format", &task.file_format])
            .args(["--format", &task.file_quality])
            .arg("--abort-on-error")
            .arg("--abort-on-unavailable-fragment")
            .arg("--no-overwrites")
            .arg("--continue")
            .arg("--write-description")
            .arg(&task.youtube_url)
            .status()
            .await?;

        if !status.success() {
            return Err(PipelineError::Downloader(format!(
                "{} exited with {status} for {}",
                self.bin, task.youtube_url
            )));
        }

        Ok(())
    }
}
