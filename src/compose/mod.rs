//! Compositing passes and the per-render outcome report.

pub mod background;
pub mod image;
pub mod text;

pub use text::FontCatalog;

use crate::error::Error;

/// The compositing pass an outcome belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Background,
    Image,
    Text,
}

/// Outcome of one compositing step: which pass, which entry, and whether it
/// committed or failed.
#[derive(Debug)]
pub struct StepOutcome {
    pub phase: Phase,
    /// Position within the pass (always 0 for the background).
    pub index: usize,
    /// Source identifier or text content the step worked on.
    pub subject: String,
    pub error: Option<Error>,
}

impl StepOutcome {
    pub fn ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Aggregated result of a full render: per-step outcomes plus non-fatal
/// advisories. Failures land here instead of being dropped inside the
/// passes that produced them.
#[derive(Debug, Default)]
pub struct RenderReport {
    pub outcomes: Vec<StepOutcome>,
    pub advisories: Vec<String>,
}

impl RenderReport {
    /// Whether every step committed and nothing was advised.
    pub fn is_clean(&self) -> bool {
        self.advisories.is_empty() && self.outcomes.iter().all(StepOutcome::ok)
    }

    /// Whether every step committed (advisories allowed).
    pub fn is_complete(&self) -> bool {
        self.outcomes.iter().all(StepOutcome::ok)
    }

    /// The steps that failed, in pass order.
    pub fn failures(&self) -> impl Iterator<Item = &StepOutcome> {
        self.outcomes.iter().filter(|o| !o.ok())
    }

    pub(crate) fn advise(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::warn!("{}", message);
        self.advisories.push(message);
    }

    pub(crate) fn record(
        &mut self,
        phase: Phase,
        index: usize,
        subject: impl Into<String>,
        error: Option<Error>,
    ) {
        if let Some(e) = &error {
            log::debug!("{:?} step {} failed: {}", phase, index, e);
        }
        self.outcomes.push(StepOutcome {
            phase,
            index,
            subject: subject.into(),
            error,
        });
    }
}
