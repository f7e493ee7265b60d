// src/engine.rs
//! # Status engine
//! Pure, testable logic that maps one poll result to a state transition, a
//! render instruction, and (on a fresh up→down edge) a notify event. No I/O.

use chrono::Utc;

use crate::classify::Incident;
use crate::feed;
use crate::notify::NotifyEvent;

/// Notification headline; the body carries the first incident title.
pub const ALERT_TITLE: &str = "Gateway Alert";

/// Incidents shown per render; the feed can carry more, the first ones win.
pub const MAX_DISPLAY_INCIDENTS: usize = 5;

/// One completed poll: the classified incident list, or the fetch error.
pub type PollResult = anyhow::Result<Vec<Incident>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceStatus {
    Operational,
    Degraded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayStatus {
    Operational,
    Degraded,
    DegradedSnoozed,
    ConnectionError,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncidentView {
    pub title: String,
    /// Markup-stripped, whitespace-collapsed description.
    pub description: String,
}

/// What the presentation layer should show after a poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderInstruction {
    pub status: DisplayStatus,
    pub incidents: Vec<IncidentView>,
}

#[derive(Debug)]
pub struct PollOutcome {
    pub render: RenderInstruction,
    pub notify: Option<NotifyEvent>,
}

/// State machine over `{Operational, Degraded} × snoozed`, with one bit of
/// history for edge detection. Owned by the watcher task; both mutation
/// paths (`on_poll`, `toggle_snooze`) run there, so no lock is needed.
#[derive(Debug)]
pub struct StatusEngine {
    status: ServiceStatus,
    snoozed: bool,
    last_poll_was_down: bool,
}

impl Default for StatusEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusEngine {
    pub fn new() -> Self {
        Self {
            status: ServiceStatus::Operational,
            snoozed: false,
            last_poll_was_down: false,
        }
    }

    pub fn status(&self) -> ServiceStatus {
        self.status
    }

    pub fn snoozed(&self) -> bool {
        self.snoozed
    }

    /// Flip alert suppression and return the new flag. Edge history is
    /// untouched: the toggle alone never fires or swallows an alert.
    pub fn toggle_snooze(&mut self) -> bool {
        self.snoozed = !self.snoozed;
        self.snoozed
    }

    /// Apply one completed poll. A fetch error leaves all state as-is and
    /// surfaces only as a `ConnectionError` render.
    pub fn on_poll(&mut self, poll: PollResult) -> PollOutcome {
        let incidents = match poll {
            Ok(incidents) => incidents,
            Err(e) => {
                tracing::warn!(error = ?e, "status fetch failed; keeping previous state");
                return PollOutcome {
                    render: RenderInstruction {
                        status: DisplayStatus::ConnectionError,
                        incidents: Vec::new(),
                    },
                    notify: None,
                };
            }
        };

        let is_down = !incidents.is_empty();
        self.status = if is_down {
            ServiceStatus::Degraded
        } else {
            ServiceStatus::Operational
        };

        let notify = if is_down && !self.last_poll_was_down && !self.snoozed {
            Some(NotifyEvent {
                title: ALERT_TITLE.to_string(),
                body: incidents[0].title.clone(),
                ts: Utc::now(),
            })
        } else {
            None
        };

        // Edge history tracks true up/down regardless of snooze, so a later
        // un-snooze still sees sustained-down as an already-consumed edge.
        self.last_poll_was_down = is_down;

        let display = match (self.snoozed, is_down) {
            (true, true) => DisplayStatus::DegradedSnoozed,
            (false, true) => DisplayStatus::Degraded,
            (_, false) => DisplayStatus::Operational,
        };

        let views = incidents
            .iter()
            .take(MAX_DISPLAY_INCIDENTS)
            .map(|inc| IncidentView {
                title: inc.title.clone(),
                description: feed::strip_markup(&inc.description),
            })
            .collect();

        PollOutcome {
            render: RenderInstruction {
                status: display,
                incidents: views,
            },
            notify,
        }
    }
}
