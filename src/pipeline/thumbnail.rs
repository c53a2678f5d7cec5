use std::path::Path;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use tokio::io::AsyncWriteExt;
use tracing::debug;

use super::{PipelineError, Result};

/// Host pattern the candidate thumbnail URLs are built against
const THUMBNAIL_BASE: &str = "https://i.ytimg.com/vi_webp";

/// Resolver and fetcher for episode thumbnails
pub struct ThumbnailResolver {
    client: Client,
}

impl ThumbnailResolver {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// The two candidate URL variants for a video, in probe order
    pub fn candidates(video_id: &str) -> [String; 2] {
        [
            format!("{THUMBNAIL_BASE}/{video_id}/maxresdefault.jpg"),
            format!("{THUMBNAIL_BASE}/{video_id}/maxresdefault.webp"),
        ]
    }

    /// Pick a working thumbnail URL. Both candidates are probed in order
    /// and the last successful probe wins, so the webp variant is
    /// preferred when both respond. When neither does, the URL embedded in
    /// the sidecar metadata is used as-is.
    pub async fn resolve(&self, video_id: &str, fallback: &str) -> String {
        let candidates = Self::candidates(video_id);
        let mut available = [false; 2];

        for (url, ok) in candidates.iter().zip(available.iter_mut()) {
            *ok = self.probe(url).await;
        }

        select_thumbnail(candidates, available, fallback)
    }

    /// Existence check: a plain GET answering 200 means available
    async fn probe(&self, url: &str) -> bool {
        match self.client.get(url).send().await {
            Ok(response) => {
                debug!(url, status = %response.status(), "thumbnail probe");
                response.status() == StatusCode::OK
            }
            Err(e) => {
                debug!(url, error = %e, "thumbnail probe failed");
                false
            }
        }
    }

    /// Download the resolved URL's bytes to a destination path
    pub async fn fetch(&self, url: &str, dest: &Path) -> Result<()> {
        download_file(&self.client, url, dest).await
    }
}

/// Choose among the probed candidates: the last available one wins, and
/// the metadata fallback is kept only when nothing responded.
fn select_thumbnail(candidates: [String; 2], available: [bool; 2], fallback: &str) -> String {
    let mut resolved = fallback.to_string();

    for (url, ok) in candidates.into_iter().zip(available) {
        if ok {
            resolved = url;
        }
    }

    resolved
}

/// Download a file over HTTP to a local path, creating parent directories
pub(crate) async fn download_file(client: &Client, url: &str, dest: &Path) -> Result<()> {
    let response = client.get(url).send().await?;
    if !response.status().is_success() {
        return Err(PipelineError::Fetch {
            status: response.status().as_u16(),
            url: url.to_string(),
        });
    }

    let bytes = response.bytes().await?;

    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let mut file = tokio::fs::File::create(dest).await?;
    file.write_all(&bytes).await?;

    Ok(())
}

/// Build a shared HTTP client for probes, fetches, and notifications
pub(crate) fn http_client() -> Client {
    Client::builder()
        .user_agent(concat!("plexcast/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(30))
        .build()
        .expect("Failed to build HTTP client")
}

/// Local filename for a downloaded thumbnail: the extension follows the
/// source URL's image-format suffix, defaulting to jpg.
pub fn thumbnail_file_name(prefix: &str, url: &str) -> String {
    if url.ends_with(".webp") {
        format!("{prefix}.webp")
    } else {
        format!("{prefix}.jpg")
    }
}
