// src/notify/mod.rs
//! Alert delivery seam. The engine produces `NotifyEvent`s; whatever consumes
//! them (desktop tray, webhook, plain log) lives behind the `Notifier` trait.

pub mod webhook;

use anyhow::Result;
use chrono::{DateTime, Utc};

pub use webhook::WebhookNotifier;

/// User-facing alert, emitted on an up→down transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyEvent {
    pub title: String,
    pub body: String,
    pub ts: DateTime<Utc>,
}

#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, ev: &NotifyEvent) -> Result<()>;
    fn name(&self) -> &'static str;
}

/// Fans one event out to every configured sink. A failing sink is logged and
/// skipped; delivery trouble never reaches the engine.
pub struct NotifierMux {
    sinks: Vec<Box<dyn Notifier>>,
}

impl NotifierMux {
    pub fn new(sinks: Vec<Box<dyn Notifier>>) -> Self {
        Self { sinks }
    }

    /// Log sink always; webhook sink when `ALERT_WEBHOOK_URL` is set.
    pub fn from_env() -> Self {
        let mut sinks: Vec<Box<dyn Notifier>> = vec![Box::new(LogNotifier)];
        if let Ok(url) = std::env::var("ALERT_WEBHOOK_URL") {
            if !url.trim().is_empty() {
                sinks.push(Box::new(WebhookNotifier::new(url)));
            }
        }
        Self { sinks }
    }

    pub async fn notify(&self, ev: &NotifyEvent) {
        for sink in &self.sinks {
            if let Err(e) = sink.send(ev).await {
                tracing::warn!(error = ?e, sink = sink.name(), "notify sink failed");
            }
        }
    }
}

/// Headless sink: the alert lands in the log.
pub struct LogNotifier;

#[async_trait::async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, ev: &NotifyEvent) -> Result<()> {
        tracing::info!(title = %ev.title, body = %ev.body, "alert");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
