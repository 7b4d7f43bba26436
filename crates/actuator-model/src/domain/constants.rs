//! Common model-level constants.

/// Alertmanager webhook payload version understood by this model.
///
/// Payloads announcing any other version are rejected at the HTTP boundary
/// before they are handed to the dispatcher.
pub const WEBHOOK_VERSION: &str = "4";
