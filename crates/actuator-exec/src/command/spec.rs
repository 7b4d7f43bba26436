use std::{collections::BTreeMap, fmt, path::PathBuf, time::Duration};

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::ExecError;

fn default_fail_on_non_zero() -> bool {
    true
}

/// Process to run for every alert a command reaction is invoked with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    /// Program to execute (e.g. `"systemctl"`, `"/usr/local/bin/heal"`).
    ///
    /// When `args` is empty and the command contains whitespace, it is split on whitespace:
    /// the first word is the program and the rest are its arguments.
    pub command: String,
    /// Command-line arguments passed to the program.
    #[serde(default)]
    pub args: Vec<String>,
    /// Extra environment for the process, on top of the inherited one.
    #[serde(default)]
    pub env: BTreeMap<String, String>,
    /// Working directory; inherits the daemon's when `None`.
    #[serde(default)]
    pub cwd: Option<PathBuf>,
    /// Deadline for a single invocation; unlimited when `None`.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    /// Whether a non-zero exit status is a reaction failure.
    #[serde(default = "default_fail_on_non_zero")]
    pub fail_on_non_zero: bool,
}

impl CommandSpec {
    /// Spec running `command` with default settings.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
            env: BTreeMap::new(),
            cwd: None,
            timeout_ms: None,
            fail_on_non_zero: true,
        }
    }

    /// Set explicit arguments; builder-style.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Add one environment variable; builder-style.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Set the invocation deadline; builder-style.
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    /// Set the working directory; builder-style.
    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Set the non-zero exit policy; builder-style.
    pub fn with_fail_on_non_zero(mut self, enabled: bool) -> Self {
        self.fail_on_non_zero = enabled;
        self
    }

    /// Validate the spec before it is used.
    ///
    /// Rules:
    /// - `command` is not empty or whitespace-only.
    /// - `timeout_ms`, when set, is greater than zero.
    pub fn validate(&self) -> Result<(), ExecError> {
        if self.command.trim().is_empty() {
            return Err(ExecError::InvalidSpec("command is empty".into()));
        }
        if self.timeout_ms == Some(0) {
            return Err(ExecError::InvalidSpec("timeout_ms must be positive".into()));
        }
        Ok(())
    }

    /// Resolve the program and its arguments.
    pub(crate) fn program(&self) -> (String, Vec<String>) {
        if !self.args.is_empty() {
            return (self.command.trim().to_string(), self.args.clone());
        }
        let mut words = self.command.split_whitespace().map(str::to_string);
        let program = words.next().unwrap_or_default();
        (program, words.collect())
    }

    pub(crate) fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// Emit a trace-level log with the essential fields.
    pub fn trace_state(&self, reaction: &str) {
        trace!(
            reaction = reaction,
            command = %self.command,
            args = ?self.args,
            cwd = ?self.cwd,
            env_len = self.env.len(),
            timeout_ms = ?self.timeout_ms,
            fail_on_non_zero = self.fail_on_non_zero,
            "command spec resolved"
        );
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CommandSpec(cmd='{}', args={}, env={}, cwd={:?}, fail_on_non_zero={})",
            self.command,
            self.args.len(),
            self.env.len(),
            self.cwd,
            self.fail_on_non_zero,
        )
    }
}
