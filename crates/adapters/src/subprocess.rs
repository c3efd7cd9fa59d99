// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shell subprocess execution for cluster commands.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Default upper bound for a single cluster command.
pub const COMMAND_TIMEOUT: Duration = Duration::from_secs(120);

/// Errors that prevent a command from producing an exit status
#[derive(Debug, Error)]
pub enum RunError {
    #[error("failed to spawn {description}: {source}")]
    Spawn {
        description: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{description} timed out after {}s", timeout.as_secs())]
    Timeout { description: String, timeout: Duration },
}

/// Captured result of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when terminated by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<std::process::Output> for CommandOutput {
    fn from(output: std::process::Output) -> Self {
        Self {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

/// Run a prepared command, killing it if it outlives `timeout`.
pub async fn run_with_timeout(
    mut cmd: tokio::process::Command,
    timeout: Duration,
    description: &str,
) -> Result<std::process::Output, RunError> {
    cmd.kill_on_drop(true);
    match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(source)) => Err(RunError::Spawn { description: description.to_string(), source }),
        Err(_) => Err(RunError::Timeout { description: description.to_string(), timeout }),
    }
}

/// Adapter for running shell-interpreted cluster commands
#[async_trait]
pub trait CommandRunner: Clone + Send + Sync + 'static {
    async fn run(&self, command: &str) -> Result<CommandOutput, RunError>;
}

/// Runs commands through `sh -c`.
#[derive(Clone, Debug)]
pub struct ShellRunner {
    timeout: Duration,
}

impl ShellRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for ShellRunner {
    fn default() -> Self {
        Self::new(COMMAND_TIMEOUT)
    }
}

#[async_trait]
impl CommandRunner for ShellRunner {
    async fn run(&self, command: &str) -> Result<CommandOutput, RunError> {
        let mut cmd = tokio::process::Command::new("sh");
        cmd.arg("-c").arg(command);
        let output = run_with_timeout(cmd, self.timeout, "cluster command").await?;
        Ok(output.into())
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{CommandOutput, CommandRunner, RunError};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::Arc;

    #[derive(Clone)]
    enum Scripted {
        Output(CommandOutput),
        SpawnError(String),
    }

    #[derive(Default)]
    struct FakeRunnerState {
        scripted: HashMap<String, Scripted>,
        calls: Vec<String>,
    }

    /// Fake command runner for testing.
    ///
    /// Unscripted commands succeed with empty output.
    #[derive(Clone, Default)]
    pub struct FakeRunner {
        inner: Arc<Mutex<FakeRunnerState>>,
    }

    impl FakeRunner {
        pub fn new() -> Self {
            Self::default()
        }

        /// Script a successful run printing `stdout`.
        pub fn succeed(&self, command: &str, stdout: &str) -> &Self {
            let output =
                CommandOutput { code: Some(0), stdout: stdout.to_string(), stderr: String::new() };
            self.inner.lock().scripted.insert(command.to_string(), Scripted::Output(output));
            self
        }

        /// Script a non-zero exit with `stderr`.
        pub fn fail(&self, command: &str, stderr: &str) -> &Self {
            let output =
                CommandOutput { code: Some(1), stdout: String::new(), stderr: stderr.to_string() };
            self.inner.lock().scripted.insert(command.to_string(), Scripted::Output(output));
            self
        }

        /// Script a spawn failure.
        pub fn spawn_error(&self, command: &str, message: &str) -> &Self {
            self.inner
                .lock()
                .scripted
                .insert(command.to_string(), Scripted::SpawnError(message.to_string()));
            self
        }

        /// Commands run so far, in order.
        pub fn calls(&self) -> Vec<String> {
            self.inner.lock().calls.clone()
        }
    }

    #[async_trait]
    impl CommandRunner for FakeRunner {
        async fn run(&self, command: &str) -> Result<CommandOutput, RunError> {
            let mut inner = self.inner.lock();
            inner.calls.push(command.to_string());
            match inner.scripted.get(command).cloned() {
                Some(Scripted::Output(output)) => Ok(output),
                Some(Scripted::SpawnError(message)) => Err(RunError::Spawn {
                    description: "cluster command".to_string(),
                    source: std::io::Error::other(message),
                }),
                None => Ok(CommandOutput { code: Some(0), ..CommandOutput::default() }),
            }
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeRunner;

#[cfg(test)]
#[path = "subprocess_tests.rs"]
mod tests;
