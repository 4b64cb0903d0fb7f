use anyhow::Result;
use std::sync::Arc;
use validator::Validate;

use super::CommandContext;
use crate::application::use_cases::sync_repositories::{
    SyncOrchestrator, SyncRepositoriesConfig, SyncRepositoriesError,
};
use crate::common::error::FleetError;
use crate::domain::entities::fleet_config::FleetConfig;
use crate::domain::entities::sync_task::{SyncOperation, SyncReport};
use crate::infrastructure::process::SystemProcessRunner;
use crate::presentation::ui::{OutputFormat, ResultFormatter};

/// Handler for the clone, pull and update commands
pub struct SyncCommand {
    pub context: CommandContext,
    pub operation: SyncOperation,
    pub jobs: Option<usize>,
    pub timeout: Option<u64>,
    pub remote_base: Option<String>,
    pub format: OutputFormat,
}

impl SyncCommand {
    pub fn new(context: CommandContext, operation: SyncOperation) -> Self {
        Self {
            context,
            operation,
            jobs: None,
            timeout: None,
            remote_base: None,
            format: OutputFormat::Text,
        }
    }

    pub fn with_jobs(mut self, jobs: Option<usize>) -> Self {
        self.jobs = jobs;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<u64>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_remote_base(mut self, remote_base: Option<String>) -> Self {
        self.remote_base = remote_base;
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Run the operation over every discovered repository, printing one line per result
    pub async fn execute(&self) -> Result<SyncReport> {
        // Load configuration and apply command line overrides
        let config = self.effective_config()?;

        // Discover repositories before anything is launched
        let names = self.context.discover(&config)?;

        let mut runner =
            SystemProcessRunner::new().with_environment_variable("GIT_TERMINAL_PROMPT", "0");
        if let Some(timeout_secs) = config.timeout_secs {
            runner = runner.with_timeout(timeout_secs);
        }

        let orchestrator_config =
            SyncRepositoriesConfig::from_fleet_config(&self.context.base_directory, &config);
        let orchestrator = SyncOrchestrator::new(orchestrator_config, Arc::new(runner))
            .map_err(|e| anyhow::anyhow!("{}", e))?;

        let formatter =
            ResultFormatter::new(self.format, self.context.verbose, self.context.use_color);

        let report = match orchestrator
            .execute_with(&names, self.operation, |result| {
                println!("{}", formatter.format_result(result));
            })
            .await
        {
            Ok(report) => report,
            Err(SyncRepositoriesError::PrepareFailed(e)) => return Err(e.into()),
            Err(e) => return Err(anyhow::anyhow!("{}", e)),
        };

        // Keep stdout to one line per repository
        if let Some(summary) = formatter.format_summary(&report) {
            eprintln!("{}", summary);
        }

        Ok(report)
    }

    fn effective_config(&self) -> Result<FleetConfig> {
        let mut config = self.context.load_config()?;

        if let Some(ref remote_base) = self.remote_base {
            config = config.with_remote_base(remote_base.clone());
        }
        if let Some(jobs) = self.jobs {
            config = config.with_max_concurrency(jobs);
        }
        if let Some(timeout) = self.timeout {
            config = config.with_timeout(timeout);
        }

        config.validate().map_err(FleetError::from)?;
        Ok(config)
    }
}
