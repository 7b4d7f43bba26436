use async_trait::async_trait;
use tracing::info;

use actuator_model::{Alert, LabelSet};

use crate::reaction::{Reaction, ReactionError};

/// Reaction that only records the alert in the log.
///
/// Used for actions configured without a command.
#[derive(Debug, Clone)]
pub struct LogReaction {
    name: String,
}

impl LogReaction {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for LogReaction {
    fn default() -> Self {
        Self::new("log")
    }
}

#[async_trait]
impl Reaction for LogReaction {
    async fn act_on(&self, alert: &Alert) -> Result<(), ReactionError> {
        let mut labels = LabelSet::new();
        labels.accumulate_map(&alert.labels);

        info!(
            reaction = %self.name,
            status = alert.status.as_str(),
            fingerprint = %alert.fingerprint,
            labels = %labels,
            "alert matched log-only reaction",
        );
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
