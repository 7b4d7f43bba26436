//! Payload dispatcher.
//!
//! For every alert of a payload the dispatcher builds the effective label set, looks it up in
//! the [`Plan`], and invokes the matched reactions one after another. A failing reaction stops
//! the rest of its group for that alert only; sibling groups and sibling alerts still run.
mod error;
pub use error::{AlertFailure, DispatchError};

use std::{sync::Arc, time::Instant};

use tokio_util::sync::CancellationToken;
use tracing::{instrument, trace};

use actuator_model::{Alert, LabelSet, WebhookPayload};

use crate::{
    events::{ReactionEvent, ReactionOutcome, SinkHandle, noop_sink},
    plan::Plan,
    reaction::ReactionError,
};

/// Stateless payload handler over a shared, read-only [`Plan`].
#[derive(Clone)]
pub struct Dispatcher {
    plan: Arc<Plan>,
    sink: SinkHandle,
}

impl Dispatcher {
    /// Create a dispatcher that reports to a no-op sink.
    pub fn new(plan: Arc<Plan>) -> Self {
        Self {
            plan,
            sink: noop_sink(),
        }
    }

    /// Replace the event sink and return the updated dispatcher.
    pub fn with_sink(mut self, sink: SinkHandle) -> Self {
        self.sink = sink;
        self
    }

    /// Plan this dispatcher matches against.
    pub fn plan(&self) -> &Arc<Plan> {
        &self.plan
    }

    /// Dispatch every alert of `payload`.
    ///
    /// Labels are merged with first-writer-wins precedence: common labels, then group labels,
    /// then the alert's own labels. Once `cancel` fires, the running reaction is abandoned and
    /// no further reactions are invoked for this payload.
    ///
    /// Returns an aggregate error if any reaction failed.
    #[instrument(level = "debug", skip_all, fields(receiver = %payload.receiver, alerts = payload.alerts.len()))]
    pub async fn handle_payload(
        &self,
        cancel: &CancellationToken,
        payload: &WebhookPayload,
    ) -> Result<(), DispatchError> {
        self.sink
            .payload_received(&payload.receiver, payload.alerts.len());

        let mut base = LabelSet::new();
        base.accumulate_map(&payload.common_labels);
        base.accumulate_map(&payload.group_labels);

        let mut failures = Vec::new();
        for alert in &payload.alerts {
            let mut labels = base.clone();
            labels.accumulate_map(&alert.labels);

            if self.handle_alert(cancel, alert, &labels, &mut failures).await {
                break;
            }
        }

        if failures.is_empty() {
            return Ok(());
        }
        self.sink.payload_failed(&payload.receiver, failures.len());
        Err(DispatchError { failures })
    }

    /// Run every reaction matched by `labels`; returns `true` if dispatch was canceled.
    async fn handle_alert(
        &self,
        cancel: &CancellationToken,
        alert: &Alert,
        labels: &LabelSet,
        failures: &mut Vec<AlertFailure>,
    ) -> bool {
        let alert_key = labels.to_string();
        trace!(alert_key = %alert_key, "attempting to handle alert");

        let groups = self.plan.matches(labels);
        if groups.is_empty() {
            self.sink.alert_unmatched(&alert_key);
            return false;
        }
        self.sink.alert_matched(&alert_key, groups.len());

        for group in groups {
            for reaction in group {
                let started = Instant::now();
                let result = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => Err(ReactionError::Canceled),
                    res = reaction.act_on(alert) => res,
                };
                let outcome = ReactionOutcome::of(&result);

                self.sink.reaction_completed(&ReactionEvent {
                    alert_key: &alert_key,
                    reaction: reaction.name(),
                    outcome,
                    duration_ms: started.elapsed().as_millis() as u64,
                    error: result.as_ref().err(),
                });

                if let Err(error) = result {
                    failures.push(AlertFailure {
                        alert_key: alert_key.clone(),
                        fingerprint: alert.fingerprint.clone(),
                        reaction: reaction.name().to_string(),
                        error,
                    });
                    if outcome == ReactionOutcome::Canceled {
                        return true;
                    }
                    break;
                }
            }
        }
        false
    }
}
