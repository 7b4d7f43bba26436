mod clock;
mod config;
mod error;
mod install;
mod level;

pub use clock::{LoggerTimeZone, init_local_offset};
pub use config::{LoggerConfig, LoggerFormat};
pub use error::{LoggerError, LoggerResult};
pub use level::LoggerLevel;

/// Install the global tracing subscriber described by `cfg`.
///
/// Fails with [`LoggerError::AlreadyInitialized`] when a global subscriber is already set.
/// With [`LoggerTimeZone::Local`], call [`init_local_offset`] first, before the tokio runtime
/// starts any threads.
///
/// ```rust
/// use actuator_observe::{LoggerConfig, init_logger};
///
/// init_logger(&LoggerConfig::default()).expect("logger");
/// tracing::info!("ready");
/// ```
pub fn init_logger(cfg: &LoggerConfig) -> LoggerResult<()> {
    install::install(cfg)
}
