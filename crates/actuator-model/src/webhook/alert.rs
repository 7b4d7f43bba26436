use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{LabelKey, LabelValue};

/// Whether an alert is currently active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    #[default]
    Firing,
    Resolved,
}

impl AlertStatus {
    /// Returns the status as a static string.
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertStatus::Firing => "firing",
            AlertStatus::Resolved => "resolved",
        }
    }
}

/// Single alert as delivered inside an Alertmanager webhook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub status: AlertStatus,
    /// Labels identifying this alert.
    #[serde(default)]
    pub labels: HashMap<LabelKey, LabelValue>,
    #[serde(default)]
    pub annotations: HashMap<String, String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub starts_at: Option<OffsetDateTime>,
    /// Alertmanager sends the zero time (`0001-01-01T00:00:00Z`) for alerts that have not ended.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub ends_at: Option<OffsetDateTime>,
    /// Link back to the entity that generated the alert.
    #[serde(default, rename = "generatorURL")]
    pub generator_url: String,
    #[serde(default)]
    pub fingerprint: String,
}

impl Alert {
    /// Create a firing alert with the given labels and nothing else set.
    pub fn firing<I, K, V>(labels: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<LabelKey>,
        V: Into<LabelValue>,
    {
        Self {
            status: AlertStatus::Firing,
            labels: labels
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            annotations: HashMap::new(),
            starts_at: None,
            ends_at: None,
            generator_url: String::new(),
            fingerprint: String::new(),
        }
    }

    /// Set the fingerprint; builder-style.
    pub fn with_fingerprint(mut self, fingerprint: impl Into<String>) -> Self {
        self.fingerprint = fingerprint.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALERT: &str = r#"{
        "status": "resolved",
        "labels": {"alertname": "InstanceDown", "instance": "web-1"},
        "annotations": {"summary": "web-1 is down"},
        "startsAt": "2024-03-01T12:00:00Z",
        "endsAt": "0001-01-01T00:00:00Z",
        "generatorURL": "http://prometheus/graph",
        "fingerprint": "a1b2c3"
    }"#;

    #[test]
    fn decodes_alertmanager_alert() {
        let alert: Alert = serde_json::from_str(ALERT).unwrap();

        assert_eq!(alert.status, AlertStatus::Resolved);
        assert_eq!(alert.labels.get("instance").map(|v| v.as_str()), Some("web-1"));
        assert_eq!(alert.annotations["summary"], "web-1 is down");
        assert_eq!(alert.starts_at.map(|t| t.year()), Some(2024));
        assert_eq!(alert.ends_at.map(|t| t.year()), Some(1));
        assert_eq!(alert.generator_url, "http://prometheus/graph");
        assert_eq!(alert.fingerprint, "a1b2c3");
    }

    #[test]
    fn missing_optional_fields_use_defaults() {
        let alert: Alert = serde_json::from_str(r#"{"status": "firing"}"#).unwrap();
        assert_eq!(alert, Alert::firing(Vec::<(&str, &str)>::new()));
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!(serde_json::from_str::<Alert>(r#"{"status": "pending"}"#).is_err());
    }

    #[test]
    fn status_strings() {
        assert_eq!(AlertStatus::Firing.as_str(), "firing");
        assert_eq!(AlertStatus::Resolved.as_str(), "resolved");
    }
}
