mod alert;
pub use alert::{Alert, AlertStatus};

mod payload;
pub use payload::WebhookPayload;
