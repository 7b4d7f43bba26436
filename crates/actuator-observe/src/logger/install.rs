use tracing_subscriber::{Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::logger::{LoggerConfig, LoggerError, LoggerFormat, LoggerResult, clock::Rfc3339Timer};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Output layer for the configured format.
fn output_layer(cfg: &LoggerConfig) -> LoggerResult<BoxedLayer> {
    let timer = Rfc3339Timer(cfg.tz);
    let layer = match cfg.format {
        LoggerFormat::Text => fmt::layer()
            .with_ansi(cfg.ansi())
            .with_target(cfg.with_targets)
            .with_timer(timer)
            .boxed(),
        LoggerFormat::Json => fmt::layer()
            .json()
            .with_ansi(false)
            .with_target(cfg.with_targets)
            .with_timer(timer)
            .boxed(),
        LoggerFormat::Journald => journald_layer()?,
    };
    Ok(layer)
}

#[cfg(target_os = "linux")]
fn journald_layer() -> LoggerResult<BoxedLayer> {
    Ok(tracing_journald::layer()?.boxed())
}

#[cfg(not(target_os = "linux"))]
fn journald_layer() -> LoggerResult<BoxedLayer> {
    Err(LoggerError::JournaldUnavailable)
}

pub(crate) fn install(cfg: &LoggerConfig) -> LoggerResult<()> {
    tracing_subscriber::registry()
        .with(output_layer(cfg)?)
        .with(cfg.level.to_env_filter())
        .try_init()
        .map_err(|_| LoggerError::AlreadyInitialized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_stdout_layers() {
        for format in [LoggerFormat::Text, LoggerFormat::Json] {
            let cfg = LoggerConfig {
                format,
                use_color: false,
                ..Default::default()
            };
            assert!(output_layer(&cfg).is_ok());
        }
    }

    #[test]
    fn only_one_global_subscriber() {
        let cfg = LoggerConfig {
            use_color: false,
            ..Default::default()
        };
        let _ = install(&cfg);
        assert!(matches!(install(&cfg), Err(LoggerError::AlreadyInitialized)));
    }
}
