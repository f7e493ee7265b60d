// tests/poll_cycle.rs
// Fixture-driven parse → classify → engine scenarios.

use gateway_watcher::classify::{classify, Incident};
use gateway_watcher::engine::{DisplayStatus, StatusEngine};
use gateway_watcher::feed;
use gateway_watcher::settings::parse_keywords;

fn incidents_from(xml: &str, keywords: &str) -> Vec<Incident> {
    classify(feed::parse(xml), &parse_keywords(keywords))
}

#[test]
fn tracked_keyword_scenario_fires_alert() {
    let xml = include_str!("fixtures/gateway_rss.xml");
    let incidents = incidents_from(xml, "api");
    assert_eq!(incidents.len(), 1);
    assert_eq!(incidents[0].title, "Investigating Degraded API");

    let mut engine = StatusEngine::new();
    let outcome = engine.on_poll(Ok(incidents));
    assert_eq!(outcome.render.status, DisplayStatus::Degraded);
    assert_eq!(
        outcome.render.incidents[0].description,
        "We are looking into it."
    );

    let notify = outcome.notify.expect("up→down edge should alert");
    assert_eq!(notify.body, "Investigating Degraded API");
}

#[test]
fn unmatched_keyword_scenario_stays_quiet() {
    let xml = include_str!("fixtures/gateway_rss.xml");
    let incidents = incidents_from(xml, "billing");
    assert!(incidents.is_empty());

    let mut engine = StatusEngine::new();
    let outcome = engine.on_poll(Ok(incidents));
    assert_eq!(outcome.render.status, DisplayStatus::Operational);
    assert!(outcome.notify.is_none());
}

#[test]
fn empty_keyword_config_tracks_every_status_item() {
    let xml = include_str!("fixtures/gateway_rss.xml");
    // Only the "Investigating Degraded API" entry carries a status term.
    let incidents = incidents_from(xml, "");
    assert_eq!(incidents.len(), 1);
}

#[test]
fn parser_is_total_over_garbage() {
    for raw in [
        "",
        "not markup at all",
        "<item><title>half open",
        "<rss><channel><item></channel>",
    ] {
        let items = feed::parse(raw);
        assert!(items.is_empty(), "no items expected for {raw:?}");
    }
}
