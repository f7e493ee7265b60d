// src/classify.rs
//! Decides which feed items count as active incidents.

use once_cell::sync::OnceCell;
use regex::Regex;

use crate::feed::FeedItem;

/// A feed item confirmed to represent an active issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Incident {
    pub title: String,
    pub description: String,
}

// Titles that indicate an entry describes an active issue rather than
// routine news.
fn re_status_terms() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| Regex::new(r"(?i)Investigating|Identified|Outage|Degraded").unwrap())
}

/// Keep items whose title names an active issue and, when `keywords` is
/// non-empty, mentions at least one tracked keyword as a substring.
/// Keywords are expected lowercase (see `settings::parse_keywords`).
/// Order is preserved; nothing is duplicated.
pub fn classify(items: Vec<FeedItem>, keywords: &[String]) -> Vec<Incident> {
    items
        .into_iter()
        .filter(|it| re_status_terms().is_match(&it.title))
        .filter(|it| {
            keywords.is_empty() || {
                let title = it.title.to_lowercase();
                keywords.iter().any(|k| title.contains(k.as_str()))
            }
        })
        .map(|it| Incident {
            title: it.title,
            description: it.description,
        })
        .collect()
}
