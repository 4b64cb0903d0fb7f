pub mod list;
pub mod sync;

pub use list::*;
pub use sync::*;

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::domain::entities::fleet_config::FleetConfig;
use crate::domain::value_objects::repository_name::RepositoryName;
use crate::infrastructure::filesystem::{
    config_store::ConfigStore, manifest_scanner::ManifestScanner,
};

/// Settings shared by every subcommand
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Directory every relative path is resolved against
    pub base_directory: PathBuf,
    /// Explicit `--config` path
    pub config_path: Option<PathBuf>,
    pub verbose: bool,
    pub use_color: bool,
}

impl CommandContext {
    /// Load `fleet.yaml` (or the explicit config file) for the base directory
    pub fn load_config(&self) -> Result<FleetConfig> {
        let config = ConfigStore::new().load(&self.base_directory, self.config_path.as_deref())?;
        Ok(config)
    }

    /// Discover repository names from the manifest directory
    pub fn discover(&self, config: &FleetConfig) -> Result<Vec<RepositoryName>> {
        let manifest_dir = self.resolve(&config.manifest_dir);
        let names = ManifestScanner::new().scan(&manifest_dir)?;
        tracing::debug!(
            manifest_dir = %manifest_dir.display(),
            repositories = names.len(),
            "discovered repositories"
        );
        Ok(names)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_directory.join(path)
        }
    }
}
