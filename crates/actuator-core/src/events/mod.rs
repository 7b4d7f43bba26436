//! Structured dispatch events.
//!
//! The dispatcher reports what it does through an [`EventSink`] handed to it at construction
//! time. Sinks (tracing logs, prometheus, test recorders) implement [`EventSink`] and can be
//! combined with [`FanoutSink`].
mod sink;
pub use sink::{EventSink, ReactionEvent, ReactionOutcome, SinkHandle};

mod noop;
pub use noop::NoOpSink;

mod fanout;
pub use fanout::FanoutSink;

use std::sync::Arc;

/// Create a no-op sink handle.
#[inline]
pub fn noop_sink() -> SinkHandle {
    Arc::new(NoOpSink)
}
