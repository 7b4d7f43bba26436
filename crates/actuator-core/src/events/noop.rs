use crate::events::sink::{EventSink, ReactionEvent};

/// Sink that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpSink;

impl EventSink for NoOpSink {
    #[inline(always)]
    fn payload_received(&self, _: &str, _: usize) {}

    #[inline(always)]
    fn alert_unmatched(&self, _: &str) {}

    #[inline(always)]
    fn alert_matched(&self, _: &str, _: usize) {}

    #[inline(always)]
    fn reaction_completed(&self, _: &ReactionEvent<'_>) {}

    #[inline(always)]
    fn payload_failed(&self, _: &str, _: usize) {}
}
