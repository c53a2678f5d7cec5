use std::fs;
use std::path::{Path, PathBuf};

use super::Result;

/// Media container extension the reconciliation triad is keyed on
pub const MEDIA_EXT: &str = "mp4";

/// Final episode filename: `s01e{NN} - {videoID}.{ext}`
pub fn episode_file_name(episode: &str, video_id: &str, ext: &str) -> String {
    format!("s01e{episode} - {video_id}.{ext}")
}

/// Renamer applying the episode-naming scheme to raw downloader output
pub struct Renamer;

impl Renamer {
    /// Move `{videoID}.mp4` in the season directory to its final
    /// episode-numbered name, returning the new path.
    pub fn rename_media(season_dir: &Path, video_id: &str, episode: &str) -> Result<PathBuf> {
        let source = season_dir.join(format!("{video_id}.{MEDIA_EXT}"));
        let target = season_dir.join(episode_file_name(episode, video_id, MEDIA_EXT));

        fs::rename(&source, &target)?;
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::{Renamer, episode_file_name};
    use std::fs::File;
    use tempfile::TempDir;

    #[test]
    fn test_episode_file_name() {
        assert_eq!(episode_file_name("03", "abc123", "mp4"), "s01e03 - abc123.mp4");
        assert_eq!(
            episode_file_name("100", "xyz", "webp"),
            "s01e100 - xyz.webp"
        );
    }

    #[test]
    fn test_rename_media() {
        let dir = TempDir::new().unwrap();
        File::create(dir.path().join("abc123.mp4")).unwrap();

        let target = Renamer::rename_media(dir.path(), "abc123", "03").unwrap();

        assert_eq!(target, dir.path().join("s01e03 - abc123.mp4"));
        assert!(target.is_file());
        assert!(!dir.path().join("abc123.mp4").exists());
    }

    #[test]
    fn test_rename_missing_source_is_error() {
        let dir = TempDir::new().unwrap();

        assert!(Renamer::rename_media(dir.path(), "missing", "01").is_err());
    }
}
