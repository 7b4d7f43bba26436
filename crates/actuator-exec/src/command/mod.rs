//! Command reaction: runs an external process for every matched alert.
//!
//! The alert is described to the process through environment variables
//! (`ACTUATOR_ALERT_*` and one `ACTUATOR_LABEL_<KEY>` per label). Output is logged line by line
//! while the process runs.
mod env;
mod logger;
mod spec;

pub use logger::LogConfig;
pub use spec::CommandSpec;

use std::{process::Stdio, time::Duration};

use async_trait::async_trait;
use tokio::{io::AsyncRead, process::Command, task::JoinHandle};
use tracing::{debug, trace};

use actuator_core::{Reaction, ReactionError};
use actuator_model::Alert;

use crate::{
    ExecError,
    command::logger::{Stream, drain},
};

/// How long output is still drained once the process has exited.
///
/// Background children inheriting the pipes may keep them open indefinitely.
const OUTPUT_GRACE: Duration = Duration::from_millis(200);

/// Output drain running on its own task; aborted when dropped.
struct OutputTask(JoinHandle<usize>);

impl OutputTask {
    fn spawn<R>(pipe: Option<R>, stream: Stream, reaction: &str, log: LogConfig) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let reaction = reaction.to_string();
        Self(tokio::spawn(async move {
            drain(pipe, stream, &reaction, log).await
        }))
    }

    /// Wait up to `grace` for the pipe to close, then give up on the rest of the output.
    async fn finish(mut self, grace: Duration, reaction: &str) {
        if tokio::time::timeout(grace, &mut self.0).await.is_err() {
            debug!(reaction, "process output still open after exit; detaching");
        }
    }
}

impl Drop for OutputTask {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Reaction that spawns the process described by a [`CommandSpec`].
///
/// The child is killed when the invocation is dropped, which is how dispatch cancellation
/// reaches the process.
#[derive(Debug, Clone)]
pub struct CommandReaction {
    name: String,
    spec: CommandSpec,
    log: LogConfig,
}

impl CommandReaction {
    /// Create a command reaction after validating its spec.
    pub fn new(name: impl Into<String>, spec: CommandSpec) -> Result<Self, ExecError> {
        spec.validate()?;
        let name = name.into();
        spec.trace_state(&name);
        Ok(Self {
            name,
            spec,
            log: LogConfig::default(),
        })
    }

    /// Replace the output logging configuration; builder-style.
    pub fn with_log_config(mut self, log: LogConfig) -> Self {
        self.log = log;
        self
    }

    pub fn spec(&self) -> &CommandSpec {
        &self.spec
    }

    fn command(&self, alert: &Alert) -> Command {
        let (program, args) = self.spec.program();
        let mut cmd = Command::new(program);
        cmd.args(args);

        if let Some(cwd) = &self.spec.cwd {
            cmd.current_dir(cwd);
        }
        cmd.envs(&self.spec.env);
        cmd.envs(env::alert_env(alert));

        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl Reaction for CommandReaction {
    async fn act_on(&self, alert: &Alert) -> Result<(), ReactionError> {
        trace!(
            reaction = %self.name,
            command = %self.spec.command,
            fingerprint = %alert.fingerprint,
            "spawning command",
        );

        let mut child = self
            .command(alert)
            .spawn()
            .map_err(|e| ReactionError::Io(format!("spawn failed: {e}")))?;

        let stdout = OutputTask::spawn(child.stdout.take(), Stream::Stdout, &self.name, self.log);
        let stderr = OutputTask::spawn(child.stderr.take(), Stream::Stderr, &self.name, self.log);

        let status = match self.spec.timeout() {
            Some(limit) => match tokio::time::timeout(limit, child.wait()).await {
                Ok(status) => status,
                Err(_) => {
                    debug!(reaction = %self.name, "command deadline exceeded; killing process");
                    if let Err(e) = child.kill().await {
                        debug!(reaction = %self.name, "failed to kill process: {e}");
                    }
                    return Err(ReactionError::Timeout {
                        timeout_ms: self.spec.timeout_ms.unwrap_or_default(),
                    });
                }
            },
            None => child.wait().await,
        }
        .map_err(|e| ReactionError::Io(format!("wait failed: {e}")))?;

        tokio::join!(
            stdout.finish(OUTPUT_GRACE, &self.name),
            stderr.finish(OUTPUT_GRACE, &self.name),
        );

        if !status.success() && self.spec.fail_on_non_zero {
            return Err(match status.code() {
                Some(code) => {
                    ReactionError::Failed(format!("process exited with non-zero code: {code}"))
                }
                None => ReactionError::Failed("process terminated by signal".into()),
            });
        }
        debug!(reaction = %self.name, code = ?status.code(), "command finished");
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;

    fn alert() -> Alert {
        Alert::firing([("service", "web"), ("severity", "critical")]).with_fingerprint("fp1")
    }

    #[test]
    fn new_validates_spec() {
        assert!(matches!(
            CommandReaction::new("blank", CommandSpec::new(" ")),
            Err(ExecError::InvalidSpec(_))
        ));
        let r = CommandReaction::new("ok", CommandSpec::new("true")).unwrap();
        assert_eq!(r.name(), "ok");
        assert_eq!(r.spec().command, "true");
    }

    #[tokio::test]
    async fn successful_command() {
        let r = CommandReaction::new("t", CommandSpec::new("true")).unwrap();
        assert!(r.act_on(&alert()).await.is_ok());
    }

    #[tokio::test]
    async fn non_zero_exit_fails_when_enabled() {
        let r = CommandReaction::new("f", CommandSpec::new("sh").with_args(["-c", "exit 3"]))
            .unwrap();
        let err = r.act_on(&alert()).await.unwrap_err();
        assert!(matches!(err, ReactionError::Failed(ref m) if m.ends_with("code: 3")));
    }

    #[tokio::test]
    async fn non_zero_exit_ignored_when_disabled() {
        let spec = CommandSpec::new("false").with_fail_on_non_zero(false);
        let r = CommandReaction::new("f", spec).unwrap();
        assert!(r.act_on(&alert()).await.is_ok());
    }

    #[tokio::test]
    async fn missing_program_is_io_error() {
        let r = CommandReaction::new("m", CommandSpec::new("/nonexistent/actuator-test-bin"))
            .unwrap();
        assert!(matches!(r.act_on(&alert()).await, Err(ReactionError::Io(_))));
    }

    #[tokio::test]
    async fn alert_context_is_exported() {
        let script = r#"test "$ACTUATOR_ALERT_FINGERPRINT" = fp1 \
            && test "$ACTUATOR_ALERT_STATUS" = firing \
            && test "$ACTUATOR_ALERT_LABELS" = "service=web;severity=critical;" \
            && test "$ACTUATOR_LABEL_SEVERITY" = critical \
            && test "$EXTRA" = yes"#;
        let spec = CommandSpec::new("sh")
            .with_args(["-c", script])
            .with_env("EXTRA", "yes");
        let r = CommandReaction::new("env", spec).unwrap();
        r.act_on(&alert()).await.unwrap();
    }

    #[tokio::test]
    async fn cwd_is_applied() {
        let spec = CommandSpec::new("sh")
            .with_args(["-c", "test \"$(pwd)\" = /"])
            .with_cwd("/");
        let r = CommandReaction::new("cwd", spec).unwrap();
        r.act_on(&alert()).await.unwrap();
    }

    #[tokio::test]
    async fn output_is_consumed() {
        let spec = CommandSpec::new("sh").with_args(["-c", "echo out; echo err >&2"]);
        let r = CommandReaction::new("out", spec)
            .unwrap()
            .with_log_config(LogConfig {
                max_line_length: 2,
                stdout_info: false,
                stderr_warn: false,
            });
        r.act_on(&alert()).await.unwrap();
    }

    #[tokio::test]
    async fn exit_completes_even_if_output_stays_open() {
        let spec = CommandSpec::new("sh")
            .with_args(["-c", "sleep 3 & exit 0"])
            .with_timeout_ms(1000);
        let r = CommandReaction::new("bg", spec).unwrap();

        let started = Instant::now();
        r.act_on(&alert()).await.unwrap();
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn deadline_kills_process() {
        let spec = CommandSpec::new("sleep 5").with_timeout_ms(100);
        let r = CommandReaction::new("slow", spec).unwrap();

        let started = Instant::now();
        let err = r.act_on(&alert()).await.unwrap_err();
        assert!(matches!(err, ReactionError::Timeout { timeout_ms: 100 }));
        assert!(started.elapsed() < Duration::from_secs(4));
    }
}
