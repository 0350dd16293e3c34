use tokio::sync::broadcast;

use watch_core::model::CourseId;

/// Broadcast payload emitted after every progress flush.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressChanged {
    pub course_id: CourseId,
    pub played_fraction: f64,
    pub completed: bool,
}

/// Process-wide "progress changed" channel.
///
/// Delivery is best-effort: subscribers that are not listening when an event
/// fires never see it, and lagging subscribers lose the oldest events. There
/// is no queuing or replay.
#[derive(Clone)]
pub struct ProgressEvents {
    sender: broadcast::Sender<ProgressChanged>,
}

impl ProgressEvents {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ProgressChanged> {
        self.sender.subscribe()
    }

    /// Publish to whoever is listening right now.
    pub fn publish(&self, event: ProgressChanged) {
        // A send error only means there are no receivers.
        let _ = self.sender.send(event);
    }
}

impl Default for ProgressEvents {
    fn default() -> Self {
        Self::new(16)
    }
}
