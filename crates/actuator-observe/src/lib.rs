mod logger;
pub use logger::*;

#[cfg(feature = "sink")]
mod sink;

#[cfg(feature = "sink")]
pub use sink::TracingSink;
