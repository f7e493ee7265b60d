// src/render.rs
//! Presentation seam. The watcher emits `RenderInstruction`s; adapters own
//! whatever surface displays them (the original lived in a panel indicator).

use crate::engine::{DisplayStatus, RenderInstruction};

pub trait RenderSink: Send + Sync {
    fn render(&self, instruction: &RenderInstruction);
}

/// Headless adapter: status line and incident entries into the log.
pub struct LogRenderer;

impl RenderSink for LogRenderer {
    fn render(&self, instruction: &RenderInstruction) {
        match instruction.status {
            DisplayStatus::Operational => {
                tracing::info!(target: "render", "systems operational");
            }
            DisplayStatus::Degraded => {
                tracing::warn!(
                    target: "render",
                    incidents = instruction.incidents.len(),
                    "issues detected"
                );
            }
            DisplayStatus::DegradedSnoozed => {
                tracing::info!(
                    target: "render",
                    incidents = instruction.incidents.len(),
                    "issues detected (snoozed)"
                );
            }
            DisplayStatus::ConnectionError => {
                tracing::warn!(target: "render", "connection error");
            }
        }
        for inc in &instruction.incidents {
            tracing::info!(
                target: "render",
                title = %inc.title,
                description = %inc.description,
                "incident"
            );
        }
    }
}
