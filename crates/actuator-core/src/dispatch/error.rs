use std::fmt;

use thiserror::Error;

use crate::reaction::ReactionError;

/// A reaction that failed for one alert.
#[derive(Debug)]
pub struct AlertFailure {
    /// String identity of the alert's effective label set.
    pub alert_key: String,
    /// Alertmanager fingerprint of the alert.
    pub fingerprint: String,
    /// Name of the reaction that failed.
    pub reaction: String,
    pub error: ReactionError,
}

impl fmt::Display for AlertFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.alert_key, self.reaction, self.error)
    }
}

/// Every reaction failure of one payload.
#[derive(Debug, Error)]
#[error("{} reaction(s) failed: {}", .failures.len(), summarize(.failures))]
pub struct DispatchError {
    pub failures: Vec<AlertFailure>,
}

impl DispatchError {
    /// Returns `true` if dispatch stopped because it was canceled.
    pub fn was_canceled(&self) -> bool {
        self.failures
            .iter()
            .any(|f| matches!(f.error, ReactionError::Canceled))
    }
}

fn summarize(failures: &[AlertFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
