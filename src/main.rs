mod config;
mod pipeline;

use std::path::PathBuf;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Settings;
use crate::pipeline::{ChannelOutcome, Pipeline};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(config::default_config_path);

    let settings = Settings::load(&settings_path)
        .with_context(|| format!("failed to load settings from {}", settings_path.display()))?;
    settings.ensure_valid().context("invalid settings")?;

    let file_appender =
        tracing_appender::rolling::daily(settings.config_dir.join("logs"), "plexcast.log");
    let (file_writer, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(file_writer),
        )
        .init();

    info!(
        media_folder = %settings.media_folder.display(),
        config_dir = %settings.config_dir.display(),
        playlist_items = %settings.playlist_items,
        channels = settings.channels.len(),
        "starting run"
    );

    let tasks = settings.tasks();
    let pipeline = Pipeline::new(
        &settings.media_folder,
        &settings.config_dir,
        &settings.pushover_user_token,
    );

    let outcomes = pipeline.run(&tasks).await;

    let failed = outcomes
        .iter()
        .filter(|(_, o)| matches!(o, ChannelOutcome::Failed { .. }))
        .count();

    info!(
        total = outcomes.len(),
        failed,
        "run finished"
    );

    if failed > 0 {
        anyhow::bail!("{failed} channel(s) failed");
    }

    Ok(())
}
