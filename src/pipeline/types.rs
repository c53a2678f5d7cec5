use std::path::PathBuf;

/// One configured channel to process. Built from validated settings and
/// immutable for the duration of a run.
#[derive(Debug, Clone)]
pub struct ChannelTask {
    /// Display name used in notification titles
    pub name: String,
    /// YouTube channel ID, also the media subdirectory and ledger key
    pub channel_id: String,
    /// Output container format passed to the downloader (e.g. "mp4")
    pub file_format: String,
    /// Downloader quality/format selector
    pub file_quality: String,
    /// Path to the downloader's archive of already-fetched video IDs
    pub download_archive: PathBuf,
    /// Channel source URL
    pub youtube_url: String,
    /// Playlist item range selector (e.g. "1-5")
    pub playlist_items: String,
    /// Per-channel Pushover application token
    pub pushover_app_token: String,
}

impl ChannelTask {
    /// Decide whether this channel can run. Returns the reason to skip it,
    /// or `None` when all required fields are present and the download
    /// archive already exists on disk.
    pub fn skip_reason(&self) -> Option<String> {
        if self.name.is_empty()
            || self.channel_id.is_empty()
            || self.file_format.is_empty()
            || self.file_quality.is_empty()
            || self.youtube_url.is_empty()
            || self.playlist_items.is_empty()
            || self.pushover_app_token.is_empty()
        {
            return Some("required channel fields are blank".to_string());
        }

        if !self.download_archive.is_file() {
            return Some(format!(
                "download archive {} does not exist",
                self.download_archive.display()
            ));
        }

        None
    }
}

/// Facts extracted from one downloaded video's sidecar JSON. Absent fields
/// take the defaults below; nothing here is persisted beyond the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoMetadata {
    pub id: String,
    pub title: String,
    pub description: String,
    pub webpage_url: String,
    pub uploader_url: String,
    pub channel_url: String,
    pub duration: String,
    pub thumbnail: String,
}

impl Default for VideoMetadata {
    fn default() -> Self {
        Self {
            id: String::new(),
            title: String::new(),
            description: String::new(),
            webpage_url: String::new(),
            uploader_url: String::new(),
            channel_url: String::new(),
            duration: "0:0".to_string(),
            thumbnail: String::new(),
        }
    }
}

/// The sidecar triad for one downloaded video, keyed by a shared filename
/// stem. Only stems with both the sidecar JSON and the media file present
/// become reconciliation work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeArtifacts {
    /// Shared base name (the downloader writes `%(id)s.%(ext)s`, so this
    /// is normally the video ID)
    pub stem: String,
    pub description: PathBuf,
    pub sidecar: PathBuf,
    pub media: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::ChannelTask;
    use std::fs::File;
    use tempfile::TempDir;

    fn task_with_archive(dir: &TempDir) -> ChannelTask {
        let archive = dir.path().join("UC1_archive.txt");
        File::create(&archive).unwrap();

        ChannelTask {
            name: "Channel".to_string(),
            channel_id: "UC1".to_string(),
            file_format: "mp4".to_string(),
            file_quality: "best".to_string(),
            download_archive: archive,
            youtube_url: "https://youtube.com/@channel".to_string(),
            playlist_items: "1-5".to_string(),
            pushover_app_token: "app-token".to_string(),
        }
    }

    #[test]
    fn test_complete_task_runs() {
        let dir = TempDir::new().unwrap();

        assert_eq!(task_with_archive(&dir).skip_reason(), None);
    }

    #[test]
    fn test_blank_field_skips_channel() {
        let dir = TempDir::new().unwrap();

        let mut task = task_with_archive(&dir);
        task.pushover_app_token = String::new();

        let reason = task.skip_reason().unwrap();
        assert!(reason.contains("blank"));
    }

    #[test]
    fn test_missing_archive_skips_channel() {
        let dir = TempDir::new().unwrap();

        let mut task = task_with_archive(&dir);
        task.download_archive = dir.path().join("not-created-yet.txt");

        let reason = task.skip_reason().unwrap();
        assert!(reason.contains("download archive"));
    }
}
