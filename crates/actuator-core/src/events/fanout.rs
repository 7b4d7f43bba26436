use crate::events::sink::{EventSink, ReactionEvent, SinkHandle};

/// Sink that forwards every event to each inner sink, in order.
#[derive(Default, Clone)]
pub struct FanoutSink {
    sinks: Vec<SinkHandle>,
}

impl FanoutSink {
    pub fn new(sinks: Vec<SinkHandle>) -> Self {
        Self { sinks }
    }

    /// Append another sink; builder-style.
    pub fn with(mut self, sink: SinkHandle) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl EventSink for FanoutSink {
    fn payload_received(&self, receiver: &str, alerts: usize) {
        for s in &self.sinks {
            s.payload_received(receiver, alerts);
        }
    }

    fn alert_unmatched(&self, alert_key: &str) {
        for s in &self.sinks {
            s.alert_unmatched(alert_key);
        }
    }

    fn alert_matched(&self, alert_key: &str, groups: usize) {
        for s in &self.sinks {
            s.alert_matched(alert_key, groups);
        }
    }

    fn reaction_completed(&self, event: &ReactionEvent<'_>) {
        for s in &self.sinks {
            s.reaction_completed(event);
        }
    }

    fn payload_failed(&self, receiver: &str, failures: usize) {
        for s in &self.sinks {
            s.payload_failed(receiver, failures);
        }
    }
}
