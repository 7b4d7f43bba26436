use std::collections::HashSet;

use tracing::warn;

use actuator_model::{Alert, LabelSet};

pub(crate) const ALERT_STATUS: &str = "ACTUATOR_ALERT_STATUS";
pub(crate) const ALERT_FINGERPRINT: &str = "ACTUATOR_ALERT_FINGERPRINT";
pub(crate) const ALERT_LABELS: &str = "ACTUATOR_ALERT_LABELS";
pub(crate) const ALERT_GENERATOR: &str = "ACTUATOR_ALERT_GENERATOR";
pub(crate) const LABEL_PREFIX: &str = "ACTUATOR_LABEL_";

/// Environment describing `alert` to the spawned process.
///
/// Keys that sanitize to the same variable (`app-name`, `app_name`) keep the value of the key
/// that sorts first; the others are skipped and reported.
pub(crate) fn alert_env(alert: &Alert) -> Vec<(String, String)> {
    let mut labels = LabelSet::new();
    labels.accumulate_map(&alert.labels);

    let mut env = vec![
        (ALERT_STATUS.to_string(), alert.status.as_str().to_string()),
        (ALERT_FINGERPRINT.to_string(), alert.fingerprint.clone()),
        (ALERT_LABELS.to_string(), labels.to_string()),
        (ALERT_GENERATOR.to_string(), alert.generator_url.clone()),
    ];
    let mut seen = HashSet::new();
    for label in labels.iter() {
        let var = label_var(label.key().as_str());
        if !seen.insert(var.clone()) {
            warn!(
                label = %label.key(),
                var = %var,
                "label variable already set by another key; skipping"
            );
            continue;
        }
        env.push((var, label.value().to_string()));
    }
    env
}

/// `ACTUATOR_LABEL_<KEY>` with the key upper-cased and everything but ASCII alphanumerics
/// replaced by `_`.
pub(crate) fn label_var(key: &str) -> String {
    let mut var = String::with_capacity(LABEL_PREFIX.len() + key.len());
    var.push_str(LABEL_PREFIX);
    var.extend(key.chars().map(|c| {
        if c.is_ascii_alphanumeric() {
            c.to_ascii_uppercase()
        } else {
            '_'
        }
    }));
    var
}
