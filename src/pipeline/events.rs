//! Status and progress events for an external observer
//!
//! Events flow over an unbounded tokio channel. The receiver is passive:
//! nothing in the survey waits on it, and a dropped receiver is ignored.

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

/// Which phase a progress event belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Discovery,
    Analysis,
}

/// A single observable event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    /// Human-readable status line
    Status(String),

    /// `current` of `total` units done in `phase`
    Progress {
        phase: Phase,
        current: usize,
        total: usize,
    },
}

/// Cloneable sending side; a sink without a channel drops every event
#[derive(Debug, Clone, Default)]
pub struct EventSink {
    sender: Option<UnboundedSender<PipelineEvent>>,
}

impl EventSink {
    /// Creates a sink and the receiver that observes it
    pub fn channel() -> (Self, UnboundedReceiver<PipelineEvent>) {
        let (tx, rx) = unbounded_channel();
        (Self { sender: Some(tx) }, rx)
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn status(&self, message: impl Into<String>) {
        self.emit(PipelineEvent::Status(message.into()));
    }

    pub fn progress(&self, phase: Phase, current: usize, total: usize) {
        self.emit(PipelineEvent::Progress {
            phase,
            current,
            total,
        });
    }

    fn emit(&self, event: PipelineEvent) {
        if let Some(sender) = &self.sender {
            let _ = sender.send(event);
        }
    }
}

impl From<UnboundedSender<PipelineEvent>> for EventSink {
    fn from(sender: UnboundedSender<PipelineEvent>) -> Self {
        Self {
            sender: Some(sender),
        }
    }
}
