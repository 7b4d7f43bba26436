use std::sync::Arc;

use prometheus::{
    Counter, CounterVec, Encoder, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
    proto::MetricFamily,
};

use actuator_core::{EventSink, ReactionEvent};

/// Prometheus-backed dispatch metrics.
///
/// ## Label cardinality
/// - `outcome` (alerts): "matched", "unmatched"
/// - `outcome` (reactions): "success", "failure", "canceled", "timeout"
/// - `reaction`: configured action names, bounded by the config file
#[derive(Clone)]
pub struct PrometheusSink {
    payloads_received: Counter,
    alerts: CounterVec,
    reactions: CounterVec,
    reaction_duration: HistogramVec,
    registry: Arc<Registry>,
}

impl PrometheusSink {
    /// Register the dispatch metrics in `registry`.
    pub fn new_with_registry(registry: Arc<Registry>) -> Result<Self, prometheus::Error> {
        let payloads_received = Counter::with_opts(Opts::new(
            "actuator_payloads_received_total",
            "Total number of webhook payloads dispatched",
        ))?;
        registry.register(Box::new(payloads_received.clone()))?;

        let alerts = CounterVec::new(
            Opts::new("actuator_alerts_total", "Total number of alerts looked up in the plan"),
            &["outcome"],
        )?;
        registry.register(Box::new(alerts.clone()))?;

        let reactions = CounterVec::new(
            Opts::new("actuator_reactions_total", "Total number of reaction invocations"),
            &["reaction", "outcome"],
        )?;
        registry.register(Box::new(reactions.clone()))?;

        let reaction_duration = HistogramVec::new(
            HistogramOpts::new(
                "actuator_reaction_duration_seconds",
                "Reaction execution duration in seconds",
            )
            .buckets(vec![0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 10.0, 30.0, 60.0]),
            &["reaction"],
        )?;
        registry.register(Box::new(reaction_duration.clone()))?;

        Ok(Self {
            payloads_received,
            alerts,
            reactions,
            reaction_duration,
            registry,
        })
    }

    /// Create the sink with its own registry.
    pub fn new() -> Result<Self, prometheus::Error> {
        Self::new_with_registry(Arc::new(Registry::new()))
    }

    pub fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }

    /// Render every registered metric in the Prometheus text format.
    pub fn encode_text(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }

    /// Content type of [`PrometheusSink::encode_text`] output.
    pub fn content_type(&self) -> String {
        TextEncoder::new().format_type().to_string()
    }

    /// Underlying registry, for registering extra metrics alongside dispatch ones.
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }
}

impl EventSink for PrometheusSink {
    fn payload_received(&self, _receiver: &str, _alerts: usize) {
        self.payloads_received.inc();
    }

    fn alert_unmatched(&self, _alert_key: &str) {
        self.alerts.with_label_values(&["unmatched"]).inc();
    }

    fn alert_matched(&self, _alert_key: &str, _groups: usize) {
        self.alerts.with_label_values(&["matched"]).inc();
    }

    fn reaction_completed(&self, event: &ReactionEvent<'_>) {
        self.reactions
            .with_label_values(&[event.reaction, event.outcome.as_label()])
            .inc();

        let duration_seconds = event.duration_ms as f64 / 1000.0;
        self.reaction_duration
            .with_label_values(&[event.reaction])
            .observe(duration_seconds);
    }

    fn payload_failed(&self, _receiver: &str, _failures: usize) {}
}
