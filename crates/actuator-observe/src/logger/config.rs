use std::{fmt, io::IsTerminal, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::logger::{LoggerError, LoggerLevel, LoggerTimeZone};

/// Where and how log records are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
#[non_exhaustive]
pub enum LoggerFormat {
    /// Human-readable lines on stdout.
    #[default]
    Text,
    /// One JSON object per line on stdout.
    Json,
    /// Native systemd-journald records (Linux only).
    Journald,
}

impl LoggerFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
            Self::Journald => "journald",
        }
    }
}

impl FromStr for LoggerFormat {
    type Err = LoggerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let format = match s.trim().to_ascii_lowercase().as_str() {
            "text" => Self::Text,
            "json" => Self::Json,
            "journald" | "journal" => Self::Journald,
            _ => return Err(LoggerError::UnknownFormat(s.to_string())),
        };
        if format == Self::Journald && !cfg!(target_os = "linux") {
            return Err(LoggerError::JournaldUnavailable);
        }
        Ok(format)
    }
}

impl TryFrom<String> for LoggerFormat {
    type Error = LoggerError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<LoggerFormat> for &'static str {
    fn from(format: LoggerFormat) -> Self {
        format.as_str()
    }
}

impl fmt::Display for LoggerFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn enabled() -> bool {
    true
}

/// `logger` section of the daemon configuration; every field is optional.
///
/// ```yaml
/// logger:
///   format: json
///   level: actuator_exec=debug,info
///   tz: local
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggerConfig {
    #[serde(default)]
    pub format: LoggerFormat,
    /// `EnvFilter` directives.
    #[serde(default)]
    pub level: LoggerLevel,
    /// Timezone of record timestamps.
    #[serde(default)]
    pub tz: LoggerTimeZone,
    /// Print the emitting module next to each record.
    #[serde(default = "enabled")]
    pub with_targets: bool,
    /// ANSI colors for text output; ignored when stdout is not a terminal.
    #[serde(default = "enabled")]
    pub use_color: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            format: LoggerFormat::Text,
            level: LoggerLevel::default(),
            tz: LoggerTimeZone::Utc,
            with_targets: enabled(),
            use_color: enabled(),
        }
    }
}

impl LoggerConfig {
    /// Whether text output should carry ANSI colors right now.
    pub fn ansi(&self) -> bool {
        self.use_color && std::io::stdout().is_terminal()
    }
}
