//! Gateway Watcher — Binary Entrypoint
//! Boots the watcher task, wiring the feed source, settings store, and the
//! headless render/notify adapters.

use gateway_watcher::settings::SettingsStore;
use gateway_watcher::{scheduler, FileSettings, HttpFeedSource, LogRenderer, NotifierMux};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("gateway_watcher=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let settings = FileSettings::from_env_or_default();
    let boot = settings.current();
    tracing::info!(
        url = %boot.feed_url,
        interval_secs = boot.interval_secs(),
        keywords = boot.keywords().len(),
        "starting gateway watcher"
    );

    let handle = scheduler::spawn(
        Box::new(HttpFeedSource::new(boot.feed_url.clone())),
        Box::new(settings),
        Box::new(LogRenderer),
        NotifierMux::from_env(),
    );

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutdown requested");
    handle.stop().await;
    Ok(())
}
