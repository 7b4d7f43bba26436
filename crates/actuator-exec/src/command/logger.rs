use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tracing::{debug, info, warn};

/// Configuration for process output logging.
#[derive(Debug, Clone, Copy)]
pub struct LogConfig {
    /// Max line length before truncation.
    pub max_line_length: usize,
    /// Log stdout at INFO level (false = DEBUG).
    pub stdout_info: bool,
    /// Log stderr at WARN level (false = DEBUG).
    pub stderr_warn: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            max_line_length: 4096,
            stdout_info: true,
            stderr_warn: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Stream {
    Stdout,
    Stderr,
}

impl Stream {
    fn as_str(self) -> &'static str {
        match self {
            Stream::Stdout => "stdout",
            Stream::Stderr => "stderr",
        }
    }
}

/// Log every line read from `pipe` until it closes; returns the number of lines seen.
pub(crate) async fn drain<R>(pipe: Option<R>, stream: Stream, reaction: &str, cfg: LogConfig) -> usize
where
    R: AsyncRead + Unpin,
{
    let Some(pipe) = pipe else {
        return 0;
    };
    let mut lines = BufReader::new(pipe).lines();
    let mut seen = 0;

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                debug!(reaction, stream = stream.as_str(), "failed to read process output: {e}");
                break;
            }
        };
        seen += 1;
        let line = truncate(&line, cfg.max_line_length);

        match stream {
            Stream::Stdout if cfg.stdout_info => info!(reaction, stream = "stdout", "{line}"),
            Stream::Stderr if cfg.stderr_warn => warn!(reaction, stream = "stderr", "{line}"),
            _ => debug!(reaction, stream = stream.as_str(), "{line}"),
        }
    }
    seen
}

/// Cut `line` to at most `max` bytes on a char boundary, marking the cut.
pub(crate) fn truncate(line: &str, max: usize) -> std::borrow::Cow<'_, str> {
    if line.len() <= max {
        return line.into();
    }
    let mut end = max;
    while !line.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &line[..end]).into()
}
