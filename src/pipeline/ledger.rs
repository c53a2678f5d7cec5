use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use super::{PipelineError, Result};

/// Durable per-channel episode counter. One small text file per channel
/// under the config directory holds the last assigned number; it is the
/// only cross-run state the pipeline owns.
pub struct EpisodeLedger {
    dir: PathBuf,
}

impl EpisodeLedger {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the counter file for a channel
    pub fn counter_path(&self, channel_id: &str) -> PathBuf {
        self.dir.join(format!("{channel_id}_EpisodeNumber.txt"))
    }

    /// Read the last assigned episode number, creating the counter file
    /// with `0` when absent. A non-numeric counter is a configuration
    /// error and is never silently reset, since resetting would reuse
    /// already-assigned episode numbers.
    pub fn read(&self, channel_id: &str) -> Result<u64> {
        let path = self.counter_path(channel_id);

        if !path.is_file() {
            self.persist(&path, 0)?;
            return Ok(0);
        }

        let content = fs::read_to_string(&path)?;
        content.trim().parse().map_err(|_| {
            PipelineError::Config(format!(
                "episode counter {} is not a number: {content:?}",
                path.display()
            ))
        })
    }

    /// Allocate the next episode number: read, increment, persist, return.
    /// Callers run one allocation at a time per channel.
    pub fn allocate(&self, channel_id: &str) -> Result<u64> {
        let next = self.read(channel_id)? + 1;
        self.persist(&self.counter_path(channel_id), next)?;
        debug!(channel_id, episode = next, "allocated episode number");
        Ok(next)
    }

    /// Write the counter atomically: temp file in the same directory, then
    /// rename over the target.
    fn persist(&self, path: &Path, value: u64) -> Result<()> {
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(value.to_string().as_bytes())?;
        tmp.persist(path).map_err(|e| PipelineError::Io(e.error))?;
        Ok(())
    }
}

/// Format an episode number for naming, zero-padded to at least two digits
pub fn episode_label(number: u64) -> String {
    format!("{number:02}")
}
