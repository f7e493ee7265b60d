// src/feed.rs
//! Tolerant extraction of status entries from raw feed markup.
//!
//! The feed is RSS-shaped but not guaranteed well-formed, so `parse` tries a
//! strict deserialization first and falls back to a lenient tag scan. Both
//! paths are total: malformed input yields defaults or nothing, never an
//! error.

use once_cell::sync::OnceCell;
use quick_xml::de::from_str;
use regex::Regex;
use serde::Deserialize;

/// Title used when an item block carries none.
pub const FALLBACK_TITLE: &str = "Update";

/// One entry lifted from the feed, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    description: Option<String>,
}

fn re_item() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| Regex::new(r"(?is)<item>(.*?)</item>").unwrap())
}

fn re_title() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| Regex::new(r"(?is)<title>(.*?)</title>").unwrap())
}

fn re_description() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| Regex::new(r"(?is)<description>(.*?)</description>").unwrap())
}

fn re_tags() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| Regex::new(r"(?is)</?[^>]+>").unwrap())
}

fn re_whitespace() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| Regex::new(r"\s+").unwrap())
}

/// Extract item blocks from `raw`, in document order. Total over arbitrary
/// input: a blank or absent field becomes its default, a document without
/// item blocks yields an empty vec.
pub fn parse(raw: &str) -> Vec<FeedItem> {
    match from_str::<Rss>(raw) {
        Ok(rss) => rss
            .channel
            .item
            .into_iter()
            .map(|it| FeedItem {
                title: field_or(it.title, FALLBACK_TITLE),
                description: field_or(it.description, ""),
            })
            .collect(),
        Err(_) => scan_items(raw),
    }
}

/// Lenient path for documents the strict parser rejects: scan for
/// `<item>` blocks and pull title/description out of each.
fn scan_items(raw: &str) -> Vec<FeedItem> {
    re_item()
        .captures_iter(raw)
        .map(|cap| {
            let block = cap.get(1).map(|m| m.as_str()).unwrap_or_default();
            FeedItem {
                title: capture_field(block, re_title(), FALLBACK_TITLE),
                description: capture_field(block, re_description(), ""),
            }
        })
        .collect()
}

fn capture_field(block: &str, re: &Regex, fallback: &str) -> String {
    let value = re
        .captures(block)
        .and_then(|c| c.get(1))
        .map(|m| unwrap_cdata(m.as_str().trim()).trim().to_string())
        .unwrap_or_default();
    if value.is_empty() {
        fallback.to_string()
    } else {
        value
    }
}

fn field_or(value: Option<String>, fallback: &str) -> String {
    match value {
        Some(s) if !s.trim().is_empty() => s.trim().to_string(),
        _ => fallback.to_string(),
    }
}

// The strict parser unwraps CDATA natively; the scan has to do it by hand.
fn unwrap_cdata(s: &str) -> &str {
    s.strip_prefix("<![CDATA[")
        .and_then(|rest| rest.strip_suffix("]]>"))
        .unwrap_or(s)
}

/// Strip markup for display: decode HTML entities, replace tags with a
/// space, collapse whitespace, trim.
pub fn strip_markup(s: &str) -> String {
    let decoded = html_escape::decode_html_entities(s).to_string();
    let no_tags = re_tags().replace_all(&decoded, " ");
    re_whitespace()
        .replace_all(&no_tags, " ")
        .trim()
        .to_string()
}
