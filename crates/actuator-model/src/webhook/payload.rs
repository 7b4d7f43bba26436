use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{Alert, AlertStatus, LabelKey, LabelValue, WEBHOOK_VERSION};

/// One Alertmanager webhook delivery.
///
/// Labels shared by every alert of the group are repeated in `group_labels` and
/// `common_labels`; the dispatcher merges them into each alert's effective label set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookPayload {
    pub version: String,
    #[serde(default)]
    pub group_key: String,
    /// Number of alerts Alertmanager dropped because of `max_alerts`.
    #[serde(default)]
    pub truncated_alerts: u64,
    pub status: AlertStatus,
    #[serde(default)]
    pub receiver: String,
    #[serde(default)]
    pub group_labels: HashMap<LabelKey, LabelValue>,
    #[serde(default)]
    pub common_labels: HashMap<LabelKey, LabelValue>,
    #[serde(default)]
    pub common_annotations: HashMap<String, String>,
    #[serde(default, rename = "externalURL")]
    pub external_url: String,
    #[serde(default)]
    pub alerts: Vec<Alert>,
}

impl WebhookPayload {
    /// Create a version-4 payload carrying the given alerts.
    pub fn new(receiver: impl Into<String>, alerts: Vec<Alert>) -> Self {
        Self {
            version: WEBHOOK_VERSION.to_string(),
            group_key: String::new(),
            truncated_alerts: 0,
            status: AlertStatus::Firing,
            receiver: receiver.into(),
            group_labels: HashMap::new(),
            common_labels: HashMap::new(),
            common_annotations: HashMap::new(),
            external_url: String::new(),
            alerts,
        }
    }

    /// Returns `true` if the payload announces the supported webhook version.
    pub fn is_supported_version(&self) -> bool {
        self.version == WEBHOOK_VERSION
    }
}
