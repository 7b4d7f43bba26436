mod domain;
pub use domain::WEBHOOK_VERSION;
pub use domain::{Label, LabelKey, LabelSet, LabelValue, Segment};

mod error;
pub use error::{ModelError, ModelResult};

mod webhook;
pub use webhook::{Alert, AlertStatus, WebhookPayload};
