/// Worker state definitions for crawl and analysis workers
///
/// Every worker in the frontier crawler and the analysis pipeline walks
/// through these states once per URL it claims.
use crate::SurveyError;
use std::fmt;

/// Represents what a worker is doing right now
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkerState {
    /// Waiting for a URL
    Idle,

    /// Request in flight
    Fetching,

    /// Crawl worker: resolving anchors and feeding the frontier
    ExtractingLinks,

    /// Analysis worker: extracting features and scoring
    Analyzing,

    /// Worker has exited; terminal
    Stopped,
}

impl WorkerState {
    /// Returns true if the worker holds a claimed URL in this state
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Fetching | Self::ExtractingLinks | Self::Analyzing)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Stopped)
    }

    /// Returns true if moving from `self` to `next` is a legal step
    ///
    /// A failed fetch goes straight from `Fetching` back to `Idle`.
    pub fn can_transition_to(&self, next: WorkerState) -> bool {
        use WorkerState::*;
        matches!(
            (self, next),
            (Idle, Fetching)
                | (Idle, Stopped)
                | (Fetching, ExtractingLinks)
                | (Fetching, Analyzing)
                | (Fetching, Idle)
                | (ExtractingLinks, Idle)
                | (Analyzing, Idle)
        )
    }

    /// Moves to `next`, rejecting illegal steps
    pub fn transition(self, next: WorkerState) -> Result<WorkerState, SurveyError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(SurveyError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Fetching => "fetching",
            Self::ExtractingLinks => "extracting_links",
            Self::Analyzing => "analyzing",
            Self::Stopped => "stopped",
        }
    }
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
