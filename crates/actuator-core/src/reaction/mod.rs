//! Reaction abstraction: something that can act on a single matched alert.
//!
//! The dispatcher only knows this trait; concrete reactions (logging, running a command,
//! calling a remote system) are plugged in when the plan is built.
mod error;
pub use error::ReactionError;

mod log;
pub use log::LogReaction;

use std::sync::Arc;

use async_trait::async_trait;

use actuator_model::Alert;

/// Action taken in response to a matched alert.
#[async_trait]
pub trait Reaction: Send + Sync {
    /// Act on the alert the reaction was matched against.
    async fn act_on(&self, alert: &Alert) -> Result<(), ReactionError>;

    /// Reaction name used in logs and diagnostics.
    fn name(&self) -> &str {
        "reaction"
    }
}

/// Shared handle to a reaction; the same reaction may belong to several rules.
pub type ReactionRef = Arc<dyn Reaction>;

/// Reactions registered together under one rule, invoked in order.
pub type ReactionGroup = Vec<ReactionRef>;
