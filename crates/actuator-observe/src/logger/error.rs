use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("unknown log format {0:?}, expected one of: text, json, journald")]
    UnknownFormat(String),

    #[error("unknown timezone {0:?}, expected utc or local")]
    UnknownTimeZone(String),

    #[error("invalid log filter {expr:?}: {reason}")]
    InvalidLevel { expr: String, reason: String },

    #[error("journald output is only available on linux")]
    JournaldUnavailable,

    #[error("cannot connect to journald: {0}")]
    Journald(#[from] std::io::Error),

    #[error("a global tracing subscriber is already installed")]
    AlreadyInitialized,
}

pub type LoggerResult<T> = Result<T, LoggerError>;
