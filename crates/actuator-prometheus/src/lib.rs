//! Prometheus metrics for alert dispatch.
//!
//! [`PrometheusSink`] implements [`actuator_core::EventSink`]; attach it to a dispatcher and
//! expose [`PrometheusSink::encode_text`] on a `/metrics` endpoint.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use actuator_core::{Dispatcher, Plan};
//! use actuator_prometheus::PrometheusSink;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let metrics = PrometheusSink::new()?;
//! let dispatcher = Dispatcher::new(Arc::new(Plan::new())).with_sink(Arc::new(metrics.clone()));
//!
//! let body = metrics.encode_text()?;
//! # let _ = (dispatcher, body);
//! # Ok(())
//! # }
//! ```
//!
//! ## Metrics
//! - `actuator_payloads_received_total` - Counter
//! - `actuator_alerts_total{outcome}` - Counter
//! - `actuator_reactions_total{reaction, outcome}` - Counter
//! - `actuator_reaction_duration_seconds{reaction}` - Histogram

mod sink;
pub use sink::PrometheusSink;

pub use prometheus::{Encoder, Registry, TextEncoder};
