use std::path::PathBuf;

use reqwest::Client;
use reqwest::multipart::{Form, Part};
use tracing::{debug, info};

use super::thumbnail::{download_file, thumbnail_file_name};
use super::{ChannelTask, PipelineError, Result, VideoMetadata};

const PUSHOVER_API: &str = "https://api.pushover.net/1/messages.json";

/// One outbound push notification: Pushover tokens, title, HTML body, and
/// the thumbnail to attach.
#[derive(Debug, Clone)]
pub struct Notification {
    pub app_token: String,
    pub user_token: String,
    pub title: String,
    /// HTML-formatted body
    pub message: String,
    pub thumbnail_url: String,
    pub webpage_url: String,
}

/// Build the notification for a newly reconciled episode
pub fn episode_notification(
    task: &ChannelTask,
    user_token: &str,
    meta: &VideoMetadata,
    thumbnail_url: &str,
) -> Notification {
    Notification {
        app_token: task.pushover_app_token.clone(),
        user_token: user_token.to_string(),
        title: format!("RSS Podcast Downloaded ({})", task.name),
        message: format!(
            "<html><body>{}<br /><br />--------------------------------------------<br /><br />{}</body></html>",
            meta.title, meta.description
        ),
        thumbnail_url: thumbnail_url.to_string(),
        webpage_url: meta.webpage_url.clone(),
    }
}

/// Pushover dispatcher. Downloads the episode thumbnail to a fixed local
/// filename in the staging directory, then sends one multipart form POST
/// carrying the tokens, title, HTML body, and the image as an attachment.
pub struct Notifier {
    client: Client,
    staging_dir: PathBuf,
}

impl Notifier {
    pub fn new(client: Client, staging_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            staging_dir: staging_dir.into(),
        }
    }

    /// Send one notification. Any failure, the thumbnail download
    /// included, is an error: a silently missing notification would leave
    /// new episodes unannounced.
    pub async fn send(&self, notification: &Notification) -> Result<()> {
        debug!(
            title = %notification.title,
            url = %notification.webpage_url,
            "dispatching notification"
        );

        let save_name = thumbnail_file_name("maxresdefault", &notification.thumbnail_url);
        let local = self.staging_dir.join(&save_name);
        download_file(&self.client, &notification.thumbnail_url, &local).await?;

        let bytes = tokio::fs::read(&local).await?;
        let mime = if save_name.ends_with(".webp") {
            "image/webp"
        } else {
            "image/jpeg"
        };
        let attachment = Part::bytes(bytes).file_name(save_name).mime_str(mime)?;

        let form = Form::new()
            .text("token", notification.app_token.clone())
            .text("user", notification.user_token.clone())
            .text("title", notification.title.clone())
            .text("message", notification.message.clone())
            .text("html", "1")
            .part("attachment", attachment);

        let response = self.client.post(PUSHOVER_API).multipart(form).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(PipelineError::Notify {
                status: status.as_u16(),
                message,
            });
        }

        info!(title = %notification.title, "notification sent");
        Ok(())
    }
}
