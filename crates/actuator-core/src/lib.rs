pub mod dispatch;
pub mod error;
pub mod events;
pub mod plan;
pub mod reaction;
pub mod trie;

pub use dispatch::{AlertFailure, DispatchError, Dispatcher};
pub use error::{CoreError, CoreResult};
pub use events::{
    EventSink, FanoutSink, NoOpSink, ReactionEvent, ReactionOutcome, SinkHandle, noop_sink,
};
pub use plan::{Plan, Rule};
pub use reaction::{LogReaction, Reaction, ReactionError, ReactionGroup, ReactionRef};
pub use trie::{Node, SegmentTrie, Segmentable};

pub mod prelude {
    pub use crate::dispatch::{DispatchError, Dispatcher};
    pub use crate::error::CoreError;
    pub use crate::events::{EventSink, SinkHandle};
    pub use crate::plan::{Plan, Rule};
    pub use crate::reaction::{Reaction, ReactionError, ReactionRef};
}
