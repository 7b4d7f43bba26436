//! Timestamps for log records.
use std::{
    fmt,
    str::FromStr,
    sync::{OnceLock, RwLock},
};

use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, UtcOffset, format_description::well_known::Rfc3339};
use tracing_subscriber::fmt::{format::Writer, time::FormatTime};

use crate::logger::LoggerError;

static LOCAL_OFFSET: RwLock<UtcOffset> = RwLock::new(UtcOffset::UTC);
static DETECTED: OnceLock<()> = OnceLock::new();

/// Timezone of log timestamps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoggerTimeZone {
    #[default]
    Utc,
    Local,
}

impl FromStr for LoggerTimeZone {
    type Err = LoggerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "utc" => Ok(Self::Utc),
            "local" => Ok(Self::Local),
            _ => Err(LoggerError::UnknownTimeZone(s.to_string())),
        }
    }
}

impl fmt::Display for LoggerTimeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Utc => "utc",
            Self::Local => "local",
        })
    }
}

/// Detect the local UTC offset and remember it for log timestamps.
///
/// Must run while the process is still single-threaded: on most Unix platforms the offset
/// cannot be read once other threads exist. Falls back to UTC.
pub fn init_local_offset() {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    if let Ok(mut slot) = LOCAL_OFFSET.write() {
        *slot = offset;
    }
    let _ = DETECTED.set(());
}

fn local_offset() -> UtcOffset {
    DETECTED.get_or_init(|| {
        let Ok(offset) = UtcOffset::current_local_offset() else {
            return;
        };
        if let Ok(mut slot) = LOCAL_OFFSET.write() {
            *slot = offset;
        }
    });
    LOCAL_OFFSET.read().map(|slot| *slot).unwrap_or(UtcOffset::UTC)
}

/// RFC 3339 timer for `tracing_subscriber::fmt` layers.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Rfc3339Timer(pub LoggerTimeZone);

impl Rfc3339Timer {
    fn stamp(&self, at: OffsetDateTime) -> String {
        let offset = match self.0 {
            LoggerTimeZone::Utc => UtcOffset::UTC,
            LoggerTimeZone::Local => local_offset(),
        };
        at.to_offset(offset)
            .format(&Rfc3339)
            .unwrap_or_else(|_| "<invalid-time>".into())
    }
}

impl FormatTime for Rfc3339Timer {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        write!(w, "{} ", self.stamp(OffsetDateTime::now_utc()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timezone_names() {
        assert_eq!("UTC".parse::<LoggerTimeZone>().unwrap(), LoggerTimeZone::Utc);
        assert_eq!(" Local".parse::<LoggerTimeZone>().unwrap(), LoggerTimeZone::Local);
        assert!(matches!(
            "pst".parse::<LoggerTimeZone>(),
            Err(LoggerError::UnknownTimeZone(_))
        ));
        assert_eq!(LoggerTimeZone::Local.to_string(), "local");
    }

    #[test]
    fn utc_stamps() {
        let at = OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap();
        assert_eq!(Rfc3339Timer(LoggerTimeZone::Utc).stamp(at), "2023-11-14T22:13:20Z");
    }

    #[test]
    fn local_offset_is_plausible() {
        init_local_offset();
        assert!(local_offset().whole_hours().abs() <= 14);
        let at = OffsetDateTime::from_unix_timestamp(0).unwrap();
        assert!(Rfc3339Timer(LoggerTimeZone::Local).stamp(at).starts_with("19"));
    }
}
