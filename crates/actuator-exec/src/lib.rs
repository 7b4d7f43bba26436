mod error;
pub use error::ExecError;

pub mod command;
pub use command::{CommandReaction, CommandSpec, LogConfig};
