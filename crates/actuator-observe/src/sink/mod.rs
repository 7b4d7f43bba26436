//! Dispatch events as structured log records.
//!
//! Severity follows what an operator needs to see: matches are `info`, failures are `warn`,
//! everything routine stays at `debug`.
use tracing::{debug, info, warn};

use actuator_core::{EventSink, ReactionEvent, ReactionOutcome};

/// [`EventSink`] that logs every dispatch event through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn payload_received(&self, receiver: &str, alerts: usize) {
        debug!(receiver, alerts, "payload received");
    }

    fn alert_unmatched(&self, alert_key: &str) {
        debug!(alert = alert_key, "no rule matched alert");
    }

    fn alert_matched(&self, alert_key: &str, groups: usize) {
        info!(alert = alert_key, groups, "alert matched");
    }

    fn reaction_completed(&self, e: &ReactionEvent<'_>) {
        match e.outcome {
            ReactionOutcome::Success => debug!(
                alert = e.alert_key,
                reaction = e.reaction,
                duration_ms = e.duration_ms,
                "reaction succeeded"
            ),
            outcome => {
                let error = e.error.map(ToString::to_string).unwrap_or_default();
                warn!(
                    alert = e.alert_key,
                    reaction = e.reaction,
                    outcome = outcome.as_label(),
                    duration_ms = e.duration_ms,
                    error = %error,
                    "reaction failed"
                )
            }
        }
    }

    fn payload_failed(&self, receiver: &str, failures: usize) {
        warn!(receiver, failures, "payload finished with failures");
    }
}
