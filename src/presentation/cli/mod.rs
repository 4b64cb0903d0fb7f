pub mod commands;

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::env;
use std::path::PathBuf;
use std::process::exit;

use crate::domain::entities::sync_task::SyncOperation;
use crate::presentation::cli::commands::{CommandContext, ListCommand, SyncCommand};
use crate::presentation::ui::OutputFormat;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_HASH"),
    " ",
    env!("BUILD_DATE"),
    ")"
);

/// fleet-sync - Clone, pull and update a fleet of service repositories
#[derive(Parser, Debug)]
#[command(name = "fleet-sync")]
#[command(about = "Clone, pull and update a fleet of service repositories in parallel")]
#[command(version, long_version = LONG_VERSION)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Base directory (defaults to current directory)
    #[arg(short = 'C', long, global = true)]
    pub directory: Option<PathBuf>,

    /// Configuration file (defaults to fleet.yaml in the base directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Clone every repository that is not checked out yet
    Clone(SyncArgs),

    /// Pull every repository that is already checked out
    Pull(SyncArgs),

    /// Check out the trunk branch and pull, for every checked out repository
    Update(SyncArgs),

    /// List discovered repositories and whether they are cloned
    List {
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

/// Options shared by clone, pull and update
#[derive(Args, Debug, Clone)]
pub struct SyncArgs {
    /// Maximum number of parallel jobs (unbounded when not set)
    #[arg(short, long, env = "FLEET_JOBS")]
    pub jobs: Option<usize>,

    /// Per-command timeout in seconds
    #[arg(long, env = "FLEET_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Base URL repositories are cloned from
    #[arg(long, env = "FLEET_REMOTE_BASE")]
    pub remote_base: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// CLI application runner
pub struct CliApp {
    cli: Cli,
}

impl CliApp {
    pub fn new() -> Self {
        Self { cli: Cli::parse() }
    }

    pub fn from_cli(cli: Cli) -> Self {
        Self { cli }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        // Set up colored output
        if self.cli.no_color {
            colored::control::set_override(false);
        }

        // Handle the command
        match self.handle_command().await {
            Ok(true) => Ok(()),
            Ok(false) => exit(1),
            Err(e) => {
                eprintln!("{} {:#}", "Error:".red().bold(), e);
                exit(1);
            }
        }
    }

    /// Returns `false` when any repository failed
    async fn handle_command(&self) -> anyhow::Result<bool> {
        let context = self.context()?;

        match &self.cli.command {
            Commands::Clone(args) => {
                self.handle_sync_command(context, SyncOperation::Clone, args).await
            }
            Commands::Pull(args) => {
                self.handle_sync_command(context, SyncOperation::Pull, args).await
            }
            Commands::Update(args) => {
                self.handle_sync_command(context, SyncOperation::Update, args).await
            }
            Commands::List { format } => {
                ListCommand::new(context, *format).execute().await?;
                Ok(true)
            }
        }
    }

    async fn handle_sync_command(
        &self,
        context: CommandContext,
        operation: SyncOperation,
        args: &SyncArgs,
    ) -> anyhow::Result<bool> {
        let report = SyncCommand::new(context, operation)
            .with_jobs(args.jobs)
            .with_timeout(args.timeout)
            .with_remote_base(args.remote_base.clone())
            .with_format(args.format)
            .execute()
            .await?;

        Ok(report.is_success())
    }

    fn context(&self) -> anyhow::Result<CommandContext> {
        let current_dir = env::current_dir()?;
        let base_directory = match self.cli.directory {
            Some(ref dir) if dir.is_absolute() => dir.clone(),
            Some(ref dir) => current_dir.join(dir),
            None => current_dir,
        };

        Ok(CommandContext {
            base_directory,
            config_path: self.cli.config.clone(),
            verbose: self.cli.verbose,
            use_color: !self.cli.no_color,
        })
    }
}

impl Default for CliApp {
    fn default() -> Self {
        Self::new()
    }
}
