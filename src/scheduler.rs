// src/scheduler.rs
//! Drives the status engine: one poll cycle immediately, then one every
//! check-interval, with a single cancellable timer in between. Poll results
//! and commands are handled on the same task, so engine state needs no lock.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use metrics::{counter, gauge, histogram};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::classify;
use crate::engine::StatusEngine;
use crate::feed;
use crate::metrics::ensure_metrics_described;
use crate::notify::NotifierMux;
use crate::render::RenderSink;
use crate::settings::SettingsStore;
use crate::source::FeedSource;

#[derive(Debug)]
enum Command {
    RefreshNow,
    ToggleSnooze,
    OpenSettings,
    Stop,
}

/// Owner-side handle to a spawned watcher task.
pub struct WatcherHandle {
    cmd_tx: mpsc::Sender<Command>,
    active: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl WatcherHandle {
    /// Cancel the pending timer and run a cycle right away; the next
    /// automatic cycle is rescheduled from this one's completion.
    pub async fn refresh_now(&self) {
        let _ = self.cmd_tx.send(Command::RefreshNow).await;
    }

    /// Flip alert suppression and re-poll immediately.
    pub async fn toggle_snooze(&self) {
        let _ = self.cmd_tx.send(Command::ToggleSnooze).await;
    }

    /// Passthrough: points the operator at the settings file.
    pub async fn open_settings(&self) {
        let _ = self.cmd_tx.send(Command::OpenSettings).await;
    }

    /// Stop the watcher. No further cycle starts; a fetch already in flight
    /// is not aborted, but its result is discarded.
    pub async fn stop(self) {
        self.active.store(false, Ordering::SeqCst);
        let _ = self.cmd_tx.send(Command::Stop).await;
        let _ = self.task.await;
    }
}

pub fn spawn(
    source: Box<dyn FeedSource>,
    settings: Box<dyn SettingsStore>,
    renderer: Box<dyn RenderSink>,
    notifiers: NotifierMux,
) -> WatcherHandle {
    ensure_metrics_described();

    let (cmd_tx, cmd_rx) = mpsc::channel(16);
    let active = Arc::new(AtomicBool::new(true));
    let task = tokio::spawn(run_loop(
        source,
        settings,
        renderer,
        notifiers,
        cmd_rx,
        Arc::clone(&active),
    ));

    WatcherHandle {
        cmd_tx,
        active,
        task,
    }
}

async fn run_loop(
    source: Box<dyn FeedSource>,
    settings: Box<dyn SettingsStore>,
    renderer: Box<dyn RenderSink>,
    notifiers: NotifierMux,
    mut cmd_rx: mpsc::Receiver<Command>,
    active: Arc<AtomicBool>,
) {
    let mut engine = StatusEngine::new();

    loop {
        let interval = match run_cycle(
            source.as_ref(),
            settings.as_ref(),
            renderer.as_ref(),
            &notifiers,
            &mut engine,
            &active,
        )
        .await
        {
            Some(secs) => secs,
            None => return, // stopped mid-fetch
        };

        // Exactly one pending timer; dropping the sleep on a command is the
        // cancel.
        let sleep = tokio::time::sleep(Duration::from_secs(interval));
        tokio::pin!(sleep);
        loop {
            tokio::select! {
                _ = &mut sleep => break,
                cmd = cmd_rx.recv() => match cmd {
                    Some(Command::RefreshNow) => break,
                    Some(Command::ToggleSnooze) => {
                        let snoozed = engine.toggle_snooze();
                        tracing::info!(snoozed, "alert snooze toggled");
                        break;
                    }
                    Some(Command::OpenSettings) => {
                        match settings.location() {
                            Some(path) => {
                                tracing::info!(path = %path.display(), "settings file");
                            }
                            None => tracing::info!("settings store has no backing file"),
                        }
                        // Not a poll trigger; keep waiting on the same timer.
                        continue;
                    }
                    Some(Command::Stop) | None => return,
                },
            }
        }
    }
}

/// One fetch→parse→classify→apply cycle. Returns the interval (secs) to the
/// next scheduled cycle, or `None` when the watcher was stopped while the
/// fetch was in flight.
async fn run_cycle(
    source: &dyn FeedSource,
    settings: &dyn SettingsStore,
    renderer: &dyn RenderSink,
    notifiers: &NotifierMux,
    engine: &mut StatusEngine,
    active: &AtomicBool,
) -> Option<u64> {
    if !active.load(Ordering::SeqCst) {
        return None;
    }

    let cfg = settings.current();
    let keywords = cfg.keywords();
    let timeout = Duration::from_secs(cfg.fetch_timeout_secs());

    counter!("watch_poll_cycles_total").increment(1);

    let fetched = source.fetch_raw(timeout).await;

    // A result arriving after stop() must not touch state or emit anything.
    if !active.load(Ordering::SeqCst) {
        tracing::debug!("watcher stopped mid-fetch; discarding poll result");
        return None;
    }

    let poll = match fetched {
        Ok(raw) => {
            let t0 = std::time::Instant::now();
            let items = feed::parse(&raw);
            histogram!("watch_parse_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
            counter!("watch_feed_items_total").increment(items.len() as u64);

            let incidents = classify::classify(items, &keywords);
            counter!("watch_incidents_total").increment(incidents.len() as u64);
            Ok(incidents)
        }
        Err(e) => {
            counter!("watch_fetch_errors_total").increment(1);
            Err(e.context(format!("fetching {} status feed", source.name())))
        }
    };

    let outcome = engine.on_poll(poll);
    renderer.render(&outcome.render);
    if let Some(ev) = outcome.notify {
        counter!("watch_alerts_total").increment(1);
        notifiers.notify(&ev).await;
    }

    gauge!("watch_last_poll_ts").set(chrono::Utc::now().timestamp().max(0) as f64);

    tracing::debug!(
        target: "watch",
        status = ?outcome.render.status,
        incidents = outcome.render.incidents.len(),
        "poll cycle complete"
    );

    Some(cfg.interval_secs())
}
