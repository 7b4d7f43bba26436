mod label;
pub use label::{Label, LabelKey, LabelValue};

mod label_set;
pub use label_set::LabelSet;

mod segment;
pub use segment::Segment;

mod constants;
pub use constants::WEBHOOK_VERSION;
