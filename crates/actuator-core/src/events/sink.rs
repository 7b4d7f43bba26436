use std::sync::Arc;

use crate::reaction::ReactionError;

/// How a single reaction invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionOutcome {
    /// Reaction completed successfully.
    Success,
    /// Reaction reported a failure.
    Failure,
    /// Dispatch was canceled while the reaction ran.
    Canceled,
    /// Reaction exceeded its own deadline.
    Timeout,
}

impl ReactionOutcome {
    /// Classify an invocation result.
    pub fn of(result: &Result<(), ReactionError>) -> Self {
        match result {
            Ok(()) => ReactionOutcome::Success,
            Err(ReactionError::Canceled) => ReactionOutcome::Canceled,
            Err(ReactionError::Timeout { .. }) => ReactionOutcome::Timeout,
            Err(_) => ReactionOutcome::Failure,
        }
    }

    /// Return label value for metrics.
    #[inline]
    pub fn as_label(&self) -> &'static str {
        match self {
            ReactionOutcome::Success => "success",
            ReactionOutcome::Failure => "failure",
            ReactionOutcome::Canceled => "canceled",
            ReactionOutcome::Timeout => "timeout",
        }
    }
}

/// One finished reaction invocation.
#[derive(Debug, Clone, Copy)]
pub struct ReactionEvent<'a> {
    /// String identity of the alert's effective label set.
    pub alert_key: &'a str,
    /// Name of the invoked reaction.
    pub reaction: &'a str,
    pub outcome: ReactionOutcome,
    pub duration_ms: u64,
    /// Present for every outcome except [`ReactionOutcome::Success`].
    pub error: Option<&'a ReactionError>,
}

/// Receiver of dispatch events.
///
/// Implementations must be cheap and must not block: they are called inline on the
/// request path.
pub trait EventSink: Send + Sync + 'static {
    /// A payload entered the dispatcher.
    ///
    /// # Arguments
    /// - `receiver`: Alertmanager receiver name from the payload
    /// - `alerts`: number of alerts carried by the payload
    fn payload_received(&self, receiver: &str, alerts: usize);
    /// No rule matched the alert; nothing was invoked.
    fn alert_unmatched(&self, alert_key: &str);
    /// At least one rule matched the alert.
    fn alert_matched(&self, alert_key: &str, groups: usize);
    /// A reaction invocation finished.
    fn reaction_completed(&self, event: &ReactionEvent<'_>);
    /// The payload finished with at least one failed reaction.
    fn payload_failed(&self, receiver: &str, failures: usize);
}

/// Shared handle to an event sink.
pub type SinkHandle = Arc<dyn EventSink>;
