use std::fs;
use std::io;
use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

use super::{Result, Scanner};

/// Outcome of one retention sweep
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    /// Description files examined
    pub examined: usize,
    /// Files actually deleted (any member of a triad)
    pub deleted: usize,
}

/// Sweeper deleting the artifact triad of any description file older than
/// the retention window.
pub struct RetentionSweeper {
    max_age: Duration,
}

impl Default for RetentionSweeper {
    fn default() -> Self {
        Self {
            max_age: Duration::hours(168),
        }
    }
}

impl RetentionSweeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_age(max_age: Duration) -> Self {
        Self { max_age }
    }

    /// Scan a channel directory for `*.description` files and delete the
    /// `{stem}.description` / `{stem}.mp4` / `{stem}.info.json` triad of
    /// every one whose modification time is older than the retention
    /// window. Missing siblings are not errors; an unreadable listing is.
    pub fn sweep(&self, dir: &Path) -> Result<SweepReport> {
        let mut report = SweepReport::default();

        for description in Scanner::scan(dir, "*.description")? {
            report.examined += 1;

            let modified = fs::metadata(&description)?.modified()?;
            let age = Utc::now().signed_duration_since(DateTime::<Utc>::from(modified));
            if age <= self.max_age {
                continue;
            }

            let Some(stem) = description
                .file_name()
                .and_then(|n| n.to_str())
                .and_then(|n| n.strip_suffix(".description"))
            else {
                continue;
            };
            let parent = description.parent().unwrap_or(dir);

            for name in [
                format!("{stem}.description"),
                format!("{stem}.mp4"),
                format!("{stem}.info.json"),
            ] {
                let path = parent.join(&name);
                match fs::remove_file(&path) {
                    Ok(()) => {
                        info!(file = %path.display(), "deleted stale artifact");
                        report.deleted += 1;
                    }
                    Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                    Err(e) => warn!(file = %path.display(), error = %e, "delete failed"),
                }
            }
        }

        Ok(report)
    }
}
