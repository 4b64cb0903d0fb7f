use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::process::Command;
use tokio::time::timeout;

/// Process runner errors
///
/// A non-zero exit code is not an error: it is reported through
/// [`ProcessOutput::exit_code`].
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("Command is empty")]
    EmptyCommand,

    #[error("Failed to spawn '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{command}' timed out after {timeout_secs} seconds")]
    Timeout { command: String, timeout_secs: u64 },

    #[error("IO error while running '{command}': {source}")]
    Io {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

/// Captured outcome of one external command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code of the process (-1 when terminated by a signal)
    pub exit_code: i32,

    /// Standard output, captured and never forwarded
    pub stdout: String,

    /// Standard error output
    pub stderr: String,
}

impl ProcessOutput {
    pub fn new(exit_code: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    /// Successful output with empty streams
    pub fn success() -> Self {
        Self::new(0, "", "")
    }

    /// Failed output carrying the given stderr
    pub fn failure(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self::new(exit_code, "", stderr)
    }

    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Render a command line for messages and logs
pub fn display_command(command: &[String]) -> String {
    command.join(" ")
}

/// Executes a single external command
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run `command` (program followed by its arguments) in `working_directory`.
    async fn run(
        &self,
        command: &[String],
        working_directory: &Path,
    ) -> Result<ProcessOutput, ProcessError>;
}

/// [`ProcessRunner`] backed by `tokio::process`
#[derive(Debug, Clone, Default)]
pub struct SystemProcessRunner {
    timeout: Option<Duration>,
    environment_variables: HashMap<String, String>,
}

impl SystemProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Kill the process and report a timeout once `timeout_secs` elapse
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout = Some(Duration::from_secs(timeout_secs));
        self
    }

    /// Add environment variable
    pub fn with_environment_variable(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.environment_variables.insert(key.into(), value.into());
        self
    }
}

#[async_trait]
impl ProcessRunner for SystemProcessRunner {
    async fn run(
        &self,
        command: &[String],
        working_directory: &Path,
    ) -> Result<ProcessOutput, ProcessError> {
        let (program, args) = command.split_first().ok_or(ProcessError::EmptyCommand)?;
        let rendered = display_command(command);
        let start_time = Instant::now();

        let mut cmd = Command::new(program);
        cmd.args(args)
            .current_dir(working_directory)
            .envs(&self.environment_variables)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = cmd.spawn().map_err(|source| ProcessError::SpawnFailed {
            command: rendered.clone(),
            source,
        })?;

        // Both pipes are drained concurrently by wait_with_output
        let output = match self.timeout {
            Some(limit) => match timeout(limit, child.wait_with_output()).await {
                Ok(output) => output,
                Err(_) => {
                    return Err(ProcessError::Timeout {
                        command: rendered,
                        timeout_secs: limit.as_secs(),
                    })
                }
            },
            None => child.wait_with_output().await,
        }
        .map_err(|source| ProcessError::Io {
            command: rendered.clone(),
            source,
        })?;

        let exit_code = output.status.code().unwrap_or(-1);
        tracing::debug!(
            command = %rendered,
            cwd = %working_directory.display(),
            exit_code,
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "command finished"
        );

        Ok(ProcessOutput {
            exit_code,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
