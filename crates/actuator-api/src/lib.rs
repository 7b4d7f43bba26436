//! HTTP surface of the actuator: Alertmanager webhook receivers plus health and metrics.
mod error;
pub use error::ApiError;

mod receiver;
pub use receiver::{ReceiveResponse, Receiver};

mod http;
pub use http::WebhookApi;
