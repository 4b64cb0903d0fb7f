//! Mock services for testing
//!
//! `RecordingProcessRunner` stands in for git: it records every invocation and
//! answers from a script keyed by repository and git subcommand.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use fleet_sync::infrastructure::process::{ProcessError, ProcessOutput, ProcessRunner};

/// A single recorded runner call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command: Vec<String>,
    pub working_directory: PathBuf,
}

impl Invocation {
    /// The git subcommand (`clone`, `pull`, `checkout`)
    pub fn subcommand(&self) -> Option<&str> {
        self.command.get(1).map(|s| s.as_str())
    }

    /// The repository the call targets: the clone destination, or the working directory
    pub fn repository(&self) -> Option<String> {
        let path = if self.subcommand() == Some("clone") {
            self.command.last().map(PathBuf::from)?
        } else {
            self.working_directory.clone()
        };
        path.file_name().map(|n| n.to_string_lossy().to_string())
    }
}

/// Scripted response for a (repository, subcommand) pair
#[derive(Debug, Clone)]
pub enum Scripted {
    Output(ProcessOutput),
    Timeout(u64),
}

/// Mock process runner that records invocations
#[derive(Clone, Default)]
pub struct RecordingProcessRunner {
    /// Call history for verification
    invocations: Arc<Mutex<Vec<Invocation>>>,
    /// Responses keyed by (repository, subcommand)
    script: Arc<Mutex<HashMap<(String, String), Scripted>>>,
    /// Artificial latency per repository
    delays: Arc<Mutex<HashMap<String, Duration>>>,
    /// Whether a successful clone creates the destination directory
    materialize_clones: bool,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl RecordingProcessRunner {
    /// Create a new runner where every command succeeds
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the clone destination on a successful clone, like git would
    pub fn materializing_clones(mut self) -> Self {
        self.materialize_clones = true;
        self
    }

    /// Make `subcommand` fail for `repository` with the given stderr
    pub fn fail(self, repository: &str, subcommand: &str, exit_code: i32, stderr: &str) -> Self {
        self.script.lock().unwrap().insert(
            (repository.to_string(), subcommand.to_string()),
            Scripted::Output(ProcessOutput::failure(exit_code, stderr)),
        );
        self
    }

    /// Make `subcommand` time out for `repository`
    pub fn time_out(self, repository: &str, subcommand: &str, timeout_secs: u64) -> Self {
        self.script.lock().unwrap().insert(
            (repository.to_string(), subcommand.to_string()),
            Scripted::Timeout(timeout_secs),
        );
        self
    }

    /// Delay every command for `repository`
    pub fn delay(self, repository: &str, delay: Duration) -> Self {
        self.delays
            .lock()
            .unwrap()
            .insert(repository.to_string(), delay);
        self
    }

    /// Get call history for verification
    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.lock().unwrap().clone()
    }

    /// Calls made for one repository, in order
    pub fn invocations_for(&self, repository: &str) -> Vec<Invocation> {
        self.invocations()
            .into_iter()
            .filter(|i| i.repository().as_deref() == Some(repository))
            .collect()
    }

    /// Subcommands issued for one repository, in order
    pub fn subcommands_for(&self, repository: &str) -> Vec<String> {
        self.invocations_for(repository)
            .iter()
            .filter_map(|i| i.subcommand().map(str::to_string))
            .collect()
    }

    /// Highest number of commands observed running at the same time
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProcessRunner for RecordingProcessRunner {
    async fn run(
        &self,
        command: &[String],
        working_directory: &Path,
    ) -> Result<ProcessOutput, ProcessError> {
        let invocation = Invocation {
            command: command.to_vec(),
            working_directory: working_directory.to_path_buf(),
        };
        let repository = invocation.repository().unwrap_or_default();
        let subcommand = invocation.subcommand().unwrap_or_default().to_string();
        self.invocations.lock().unwrap().push(invocation);

        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);

        let delay = self.delays.lock().unwrap().get(&repository).copied();
        match delay {
            Some(delay) => tokio::time::sleep(delay).await,
            None => tokio::task::yield_now().await,
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let scripted = self
            .script
            .lock()
            .unwrap()
            .get(&(repository, subcommand.clone()))
            .cloned();

        match scripted {
            Some(Scripted::Output(output)) => Ok(output),
            Some(Scripted::Timeout(timeout_secs)) => Err(ProcessError::Timeout {
                command: command.join(" "),
                timeout_secs,
            }),
            None => {
                if self.materialize_clones && subcommand == "clone" {
                    if let Some(target) = command.last() {
                        std::fs::create_dir_all(working_directory.join(target)).unwrap();
                    }
                }
                Ok(ProcessOutput::success())
            }
        }
    }
}
