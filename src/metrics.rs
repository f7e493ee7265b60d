// src/metrics.rs
use metrics::{describe_counter, describe_gauge, describe_histogram};
use once_cell::sync::OnceCell;

/// One-time metrics registration (series show up once the host installs a
/// recorder; without one these are no-ops).
pub fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("watch_poll_cycles_total", "Poll cycles started.");
        describe_counter!(
            "watch_fetch_errors_total",
            "Feed fetch transport/status failures."
        );
        describe_counter!("watch_feed_items_total", "Items parsed from the feed.");
        describe_counter!(
            "watch_incidents_total",
            "Items classified as tracked incidents."
        );
        describe_counter!("watch_alerts_total", "Notify events emitted.");
        describe_gauge!("watch_last_poll_ts", "Unix ts of the last completed poll.");
        describe_histogram!("watch_parse_ms", "Feed parse time in milliseconds.");
    });
}
