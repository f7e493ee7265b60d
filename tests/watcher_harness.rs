// tests/watcher_harness.rs
// Paused-clock harness for the scheduler: cadence, refresh-now, stop, and
// snooze semantics through the full watcher stack.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use gateway_watcher::engine::{DisplayStatus, RenderInstruction};
use gateway_watcher::notify::{Notifier, NotifierMux, NotifyEvent};
use gateway_watcher::render::RenderSink;
use gateway_watcher::scheduler;
use gateway_watcher::settings::{Settings, SettingsStore};
use gateway_watcher::source::FeedSource;

const DOWN_FEED: &str =
    "<item><title>Outage: API unavailable</title><description>down</description></item>";
const UP_FEED: &str =
    "<item><title>All systems normal</title><description>ok</description></item>";

struct StaticSource {
    body: &'static str,
    fetches: Arc<AtomicUsize>,
    delay: Duration,
}

#[async_trait]
impl FeedSource for StaticSource {
    async fn fetch_raw(&self, _timeout: Duration) -> Result<String> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.delay > Duration::ZERO {
            tokio::time::sleep(self.delay).await;
        }
        Ok(self.body.to_string())
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

struct StaticSettings(Settings);

impl SettingsStore for StaticSettings {
    fn current(&self) -> Settings {
        self.0.clone()
    }
}

#[derive(Default)]
struct RecordingRender(Arc<Mutex<Vec<RenderInstruction>>>);

impl RenderSink for RecordingRender {
    fn render(&self, instruction: &RenderInstruction) {
        self.0.lock().unwrap().push(instruction.clone());
    }
}

struct RecordingNotifier(Arc<Mutex<Vec<NotifyEvent>>>);

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, ev: &NotifyEvent) -> Result<()> {
        self.0.lock().unwrap().push(ev.clone());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

fn minute_settings() -> Settings {
    Settings {
        check_interval: 60,
        ..Settings::default()
    }
}

fn source(body: &'static str, fetches: &Arc<AtomicUsize>) -> Box<StaticSource> {
    Box::new(StaticSource {
        body,
        fetches: Arc::clone(fetches),
        delay: Duration::ZERO,
    })
}

#[tokio::test(start_paused = true)]
async fn polls_on_the_configured_interval() {
    let fetches = Arc::new(AtomicUsize::new(0));
    let handle = scheduler::spawn(
        source(UP_FEED, &fetches),
        Box::new(StaticSettings(minute_settings())),
        Box::new(RecordingRender::default()),
        NotifierMux::new(vec![]),
    );

    // Cycles land at t=0, 60, 120.
    tokio::time::sleep(Duration::from_secs(150)).await;
    assert_eq!(fetches.load(Ordering::SeqCst), 3);
    handle.stop().await;
}

#[tokio::test(start_paused = true)]
async fn refresh_now_cancels_pending_timer_without_double_fire() {
    let fetches = Arc::new(AtomicUsize::new(0));
    let handle = scheduler::spawn(
        source(UP_FEED, &fetches),
        Box::new(StaticSettings(minute_settings())),
        Box::new(RecordingRender::default()),
        NotifierMux::new(vec![]),
    );

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(fetches.load(Ordering::SeqCst), 1);

    handle.refresh_now().await;
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(fetches.load(Ordering::SeqCst), 2);

    // The timer pending for t=60 was cancelled; the next automatic cycle
    // lands 60s after the manual one, at t≈70.
    tokio::time::sleep(Duration::from_secs(55)).await; // t≈66
    assert_eq!(fetches.load(Ordering::SeqCst), 2);
    tokio::time::sleep(Duration::from_secs(10)).await; // t≈76
    assert_eq!(fetches.load(Ordering::SeqCst), 3);

    handle.stop().await;
}

#[tokio::test(start_paused = true)]
async fn stop_cancels_the_pending_cycle() {
    let fetches = Arc::new(AtomicUsize::new(0));
    let handle = scheduler::spawn(
        source(UP_FEED, &fetches),
        Box::new(StaticSettings(minute_settings())),
        Box::new(RecordingRender::default()),
        NotifierMux::new(vec![]),
    );

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(fetches.load(Ordering::SeqCst), 1);

    handle.stop().await;
    tokio::time::sleep(Duration::from_secs(600)).await;
    assert_eq!(fetches.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn result_arriving_after_stop_is_discarded() {
    let fetches = Arc::new(AtomicUsize::new(0));
    let renders = Arc::new(Mutex::new(Vec::new()));
    let notes = Arc::new(Mutex::new(Vec::new()));

    let handle = scheduler::spawn(
        Box::new(StaticSource {
            body: DOWN_FEED,
            fetches: Arc::clone(&fetches),
            delay: Duration::from_secs(30),
        }),
        Box::new(StaticSettings(minute_settings())),
        Box::new(RecordingRender(Arc::clone(&renders))),
        NotifierMux::new(vec![Box::new(RecordingNotifier(Arc::clone(&notes)))]),
    );

    // Let the first cycle start and park inside its slow fetch.
    tokio::task::yield_now().await;
    assert_eq!(fetches.load(Ordering::SeqCst), 1);

    // Stop does not abort the fetch, but its late result must be dropped:
    // no render, no alert, no state change.
    handle.stop().await;
    assert!(renders.lock().unwrap().is_empty());
    assert!(notes.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn snooze_suppresses_alerts_but_keeps_rendering() {
    let fetches = Arc::new(AtomicUsize::new(0));
    let renders = Arc::new(Mutex::new(Vec::new()));
    let notes = Arc::new(Mutex::new(Vec::new()));

    let handle = scheduler::spawn(
        source(DOWN_FEED, &fetches),
        Box::new(StaticSettings(minute_settings())),
        Box::new(RecordingRender(Arc::clone(&renders))),
        NotifierMux::new(vec![Box::new(RecordingNotifier(Arc::clone(&notes)))]),
    );

    // First cycle: fresh up→down edge alerts.
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(notes.lock().unwrap().len(), 1);
    assert_eq!(
        renders.lock().unwrap().last().unwrap().status,
        DisplayStatus::Degraded
    );

    // Toggling snooze re-polls immediately and renders the snoozed state.
    handle.toggle_snooze().await;
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(fetches.load(Ordering::SeqCst), 2);
    assert_eq!(
        renders.lock().unwrap().last().unwrap().status,
        DisplayStatus::DegradedSnoozed
    );

    // Sustained down while snoozed never alerts again.
    tokio::time::sleep(Duration::from_secs(120)).await;
    assert_eq!(notes.lock().unwrap().len(), 1);

    handle.stop().await;
}
