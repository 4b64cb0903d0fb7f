use anyhow::Result;
use std::path::Path;

use super::CommandContext;
use crate::domain::value_objects::repository_location::RepositoryLocation;
use crate::presentation::ui::{CheckoutState, OutputFormat, ResultFormatter};

/// Handler for the list command
pub struct ListCommand {
    pub context: CommandContext,
    pub format: OutputFormat,
}

impl ListCommand {
    pub fn new(context: CommandContext, format: OutputFormat) -> Self {
        Self { context, format }
    }

    /// Print every discovered repository with its path and checkout state
    pub async fn execute(&self) -> Result<()> {
        let config = self.context.load_config()?;
        let names = self.context.discover(&config)?;
        let formatter =
            ResultFormatter::new(self.format, self.context.verbose, self.context.use_color);

        for name in &names {
            let location = RepositoryLocation::resolve(
                &self.context.base_directory,
                &config.services_dir,
                name,
            );
            let state = inspect(location.path()).await;
            println!(
                "{}",
                formatter.format_list_entry(name.as_str(), location.path(), &state)
            );
        }

        Ok(())
    }
}

/// Determine the checkout state of a repository path without hiding I/O errors
async fn inspect(path: &Path) -> CheckoutState {
    match tokio::fs::try_exists(path).await {
        Ok(true) => CheckoutState::Cloned,
        Ok(false) => CheckoutState::Missing,
        Err(e) => {
            tracing::warn!(path = %path.display(), "cannot inspect checkout: {}", e);
            CheckoutState::Unreadable(e.to_string())
        }
    }
}
