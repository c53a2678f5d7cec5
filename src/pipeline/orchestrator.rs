use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::{
    ChannelTask, Downloader, EpisodeArtifacts, EpisodeLedger, MetadataExtractor, Notifier,
    PipelineError, Renamer, Result, RetentionSweeper, Scanner, ThumbnailResolver, episode_label,
    episode_notification,
    thumbnail::{http_client, thumbnail_file_name},
};

/// What happened to one channel during a run
#[derive(Debug)]
pub enum ChannelOutcome {
    Completed(CycleReport),
    Skipped { reason: String },
    Failed { error: PipelineError },
}

/// Counters for one completed channel cycle
#[derive(Debug, Default, Clone, Copy)]
pub struct CycleReport {
    /// Episodes reconciled and notified
    pub episodes: usize,
    /// Stale files deleted by the retention sweep
    pub swept: usize,
}

/// Drives one channel's download-and-reconcile cycle end-to-end and owns
/// the per-error policy: validation failures skip the channel, cycle
/// errors fail the channel but not the run, rename failures only warn.
pub struct Pipeline {
    media_folder: PathBuf,
    user_token: String,
    downloader: Downloader,
    ledger: EpisodeLedger,
    resolver: ThumbnailResolver,
    notifier: Notifier,
    sweeper: RetentionSweeper,
}

impl Pipeline {
    pub fn new(media_folder: &Path, config_dir: &Path, user_token: &str) -> Self {
        let client = http_client();

        Self {
            media_folder: media_folder.to_path_buf(),
            user_token: user_token.to_string(),
            downloader: Downloader::new(),
            ledger: EpisodeLedger::new(config_dir),
            resolver: ThumbnailResolver::new(client.clone()),
            notifier: Notifier::new(client, config_dir),
            sweeper: RetentionSweeper::new(),
        }
    }

    /// Replace the downloader, e.g. to point at a different binary
    pub fn with_downloader(mut self, downloader: Downloader) -> Self {
        self.downloader = downloader;
        self
    }

    /// Process every configured channel in order, one at a time. A failed
    /// channel never stops the remaining ones.
    pub async fn run(&self, tasks: &[ChannelTask]) -> Vec<(String, ChannelOutcome)> {
        let mut outcomes = Vec::with_capacity(tasks.len());

        for task in tasks {
            let outcome = self.run_channel(task).await;
            match &outcome {
                ChannelOutcome::Completed(report) => info!(
                    channel = %task.name,
                    episodes = report.episodes,
                    swept = report.swept,
                    "channel cycle complete"
                ),
                ChannelOutcome::Skipped { reason } => {
                    warn!(channel = %task.name, reason = %reason, "channel skipped")
                }
                ChannelOutcome::Failed { error } => {
                    warn!(channel = %task.name, error = %error, "channel cycle failed")
                }
            }
            outcomes.push((task.name.clone(), outcome));
        }

        outcomes
    }

    async fn run_channel(&self, task: &ChannelTask) -> ChannelOutcome {
        if let Some(reason) = task.skip_reason() {
            return ChannelOutcome::Skipped { reason };
        }

        match self.cycle(task).await {
            Ok(report) => ChannelOutcome::Completed(report),
            Err(error) => ChannelOutcome::Failed { error },
        }
    }

    /// One full cycle: download, reconcile every complete sidecar triad,
    /// then sweep stale artifacts.
    async fn cycle(&self, task: &ChannelTask) -> Result<CycleReport> {
        self.downloader
            .download_channel(&self.media_folder, task)
            .await?;

        let channel_dir = self.media_folder.join(&task.channel_id);
        let artifacts = discover_episodes(&channel_dir)?;
        info!(
            channel = %task.name,
            candidates = artifacts.len(),
            "reconciling downloaded videos"
        );

        let mut episodes = 0;
        for artifact in &artifacts {
            self.reconcile_episode(task, artifact).await?;
            episodes += 1;
        }

        let swept = self.sweeper.sweep(&channel_dir)?.deleted;

        Ok(CycleReport { episodes, swept })
    }

    /// Turn one raw download into a numbered, notified episode: extract
    /// metadata, resolve and fetch the thumbnail, allocate the episode
    /// number, rename the media file, and send the notification.
    async fn reconcile_episode(&self, task: &ChannelTask, artifact: &EpisodeArtifacts) -> Result<()> {
        let meta = MetadataExtractor::extract(&artifact.sidecar)?;
        debug!(id = %meta.id, title = %meta.title, duration = %meta.duration, "extracted metadata");

        let thumbnail_url = self.resolver.resolve(&meta.id, &meta.thumbnail).await;

        let episode = episode_label(self.ledger.allocate(&task.channel_id)?);

        let season_dir = artifact
            .media
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.media_folder.join(&task.channel_id));

        let thumb_name = thumbnail_file_name(&format!("s01e{episode} - {}", meta.id), &thumbnail_url);
        self.resolver
            .fetch(&thumbnail_url, &season_dir.join(thumb_name))
            .await?;

        // Rename failure is the one per-video failure that must not
        // cascade: the notification then just references the pre-rename
        // name.
        match Renamer::rename_media(&season_dir, &meta.id, &episode) {
            Ok(target) => info!(episode = %episode, target = %target.display(), "episode renamed"),
            Err(e) => warn!(episode = %episode, id = %meta.id, error = %e, "rename failed"),
        }

        let notification = episode_notification(task, &self.user_token, &meta, &thumbnail_url);
        self.notifier.send(&notification).await?;

        Ok(())
    }
}

/// Enumerate the channel directory for reconciliation candidates: every
/// description file whose stem also has both the sidecar JSON and the
/// media file on disk. Incomplete stems (archive-skipped or
/// still-downloading items) are skipped silently.
pub fn discover_episodes(channel_dir: &Path) -> Result<Vec<EpisodeArtifacts>> {
    let mut artifacts = Vec::new();

    for description in Scanner::scan(channel_dir, "*.description")? {
        let Some(stem) = description
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.strip_suffix(".description"))
        else {
            continue;
        };
        let parent = description.parent().unwrap_or(channel_dir);

        let sidecar = parent.join(format!("{stem}.info.json"));
        let media = parent.join(format!("{stem}.mp4"));

        if sidecar.is_file() && media.is_file() {
            artifacts.push(EpisodeArtifacts {
                stem: stem.to_string(),
                description,
                sidecar,
                media,
            });
        } else {
            debug!(stem, "incomplete triad, skipping");
        }
    }

    Ok(artifacts)
}

#[cfg(test)]
mod tests {
    use super::{ChannelOutcome, Pipeline, discover_episodes};
    use crate::pipeline::{ChannelTask, Downloader};
    use std::fs::{self, File};
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn task(name: &str, channel_id: &str, archive: PathBuf) -> ChannelTask {
        ChannelTask {
            name: name.to_string(),
            channel_id: channel_id.to_string(),
            file_format: "mp4".to_string(),
            file_quality: "best".to_string(),
            download_archive: archive,
            youtube_url: "https://youtube.com/@channel".to_string(),
            playlist_items: "1-5".to_string(),
            pushover_app_token: "app-token".to_string(),
        }
    }

    /// A channel whose downloader invocation fails must not stop the
    /// channels after it.
    #[tokio::test]
    async fn test_failed_channel_does_not_stop_the_rest() {
        let media = TempDir::new().unwrap();
        let config = TempDir::new().unwrap();

        let archive = config.path().join("archive.txt");
        File::create(&archive).unwrap();

        // `false` exits 1, so every download attempt fails
        let pipeline = Pipeline::new(media.path(), config.path(), "user-token")
            .with_downloader(Downloader::with_bin("false"));

        let tasks = [
            task("First", "UC1", archive.clone()),
            task("Second", "UC2", archive.clone()),
        ];
        let outcomes = pipeline.run(&tasks).await;

        // Both channels ran; both failed at the downloader stage
        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].0, "First");
        assert_eq!(outcomes[1].0, "Second");
        assert!(
            outcomes
                .iter()
                .all(|(_, o)| matches!(o, ChannelOutcome::Failed { .. }))
        );
    }

    /// A channel that fails validation is skipped without touching the
    /// downloader, and the remaining channels still run.
    #[tokio::test]
    async fn test_invalid_channel_is_skipped_not_failed() {
        let media = TempDir::new().unwrap();
        let config = TempDir::new().unwrap();

        let archive = config.path().join("archive.txt");
        File::create(&archive).unwrap();

        let pipeline = Pipeline::new(media.path(), config.path(), "user-token")
            .with_downloader(Downloader::with_bin("false"));

        let tasks = [
            // Archive never created: validation skips this channel
            task("NoArchive", "UC1", config.path().join("missing.txt")),
            task("Runs", "UC2", archive),
        ];
        let outcomes = pipeline.run(&tasks).await;

        assert_eq!(outcomes.len(), 2);
        assert!(matches!(outcomes[0].1, ChannelOutcome::Skipped { .. }));
        assert!(matches!(outcomes[1].1, ChannelOutcome::Failed { .. }));
    }

    #[test]
    fn test_discover_requires_sidecar_and_media() {
        let dir = TempDir::new().unwrap();
        let season = dir.path().join("Season_1");
        fs::create_dir(&season).unwrap();

        // Complete triad
        File::create(season.join("full.description")).unwrap();
        File::create(season.join("full.info.json")).unwrap();
        File::create(season.join("full.mp4")).unwrap();

        // Description only: still downloading or archive-skipped
        File::create(season.join("partial.description")).unwrap();

        // Description plus sidecar but no media
        File::create(season.join("nomedia.description")).unwrap();
        File::create(season.join("nomedia.info.json")).unwrap();

        let artifacts = discover_episodes(dir.path()).unwrap();

        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0].stem, "full");
        assert_eq!(artifacts[0].media, season.join("full.mp4"));
        assert_eq!(artifacts[0].sidecar, season.join("full.info.json"));
        assert_eq!(artifacts[0].description, season.join("full.description"));
    }

    #[test]
    fn test_discover_empty_directory() {
        let dir = TempDir::new().unwrap();

        assert!(discover_episodes(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_discover_unreadable_root_is_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing");

        assert!(discover_episodes(&missing).is_err());
    }

    #[test]
    fn test_discover_keeps_dotted_stems_together() {
        let dir = TempDir::new().unwrap();

        File::create(dir.path().join("my.video.description")).unwrap();
        File::create(dir.path().join("my.video.info.json")).unwrap();
        File::create(dir.path().join("my.video.mp4")).unwrap();

        let artifacts = discover_episodes(dir.path()).unwrap();

        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0].stem, "my.video");
    }
}
