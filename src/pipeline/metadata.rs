use std::fs;
use std::path::Path;

use serde_json::Value;

use super::{PipelineError, Result, VideoMetadata};

/// Extractor projecting a downloader sidecar JSON into `VideoMetadata`
pub struct MetadataExtractor;

impl MetadataExtractor {
    /// Read and project one `.info.json` sidecar. Unknown keys are
    /// ignored; known keys are coerced to strings and default when absent.
    /// An unreadable file or invalid JSON is an error, since an episode
    /// without metadata cannot be named or announced.
    pub fn extract(path: &Path) -> Result<VideoMetadata> {
        let content = fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&content).map_err(|e| {
            PipelineError::Parse(format!("invalid sidecar JSON {}: {e}", path.display()))
        })?;

        let mut meta = VideoMetadata::default();
        if let Some(id) = scalar_string(&value, "id") {
            meta.id = id;
        }
        if let Some(title) = scalar_string(&value, "title") {
            meta.title = title;
        }
        if let Some(description) = scalar_string(&value, "description") {
            meta.description = description;
        }
        if let Some(webpage_url) = scalar_string(&value, "webpage_url") {
            meta.webpage_url = webpage_url;
        }
        if let Some(uploader_url) = scalar_string(&value, "uploader_url") {
            meta.uploader_url = uploader_url;
        }
        if let Some(channel_url) = scalar_string(&value, "channel_url") {
            meta.channel_url = channel_url;
        }
        if let Some(duration) = scalar_string(&value, "duration_string") {
            meta.duration = duration;
        }
        if let Some(thumbnail) = scalar_string(&value, "thumbnail") {
            meta.thumbnail = thumbnail;
        }

        Ok(meta)
    }
}

/// Coerce a scalar JSON field to its string representation. Objects,
/// arrays, and null yield `None` so the field keeps its default.
fn scalar_string(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
