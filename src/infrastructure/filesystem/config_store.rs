use std::path::{Path, PathBuf};
use validator::Validate;

use crate::common::error::FleetError;
use crate::common::result::{FleetResult, IoResultExt};
use crate::domain::entities::fleet_config::{FleetConfig, CONFIG_FILE_NAME};

/// Loads [`FleetConfig`] from YAML
#[derive(Debug, Clone, Default)]
pub struct ConfigStore;

impl ConfigStore {
    pub fn new() -> Self {
        Self
    }

    /// Default location of the configuration file for a base directory
    pub fn default_path(base_directory: &Path) -> PathBuf {
        base_directory.join(CONFIG_FILE_NAME)
    }

    /// Load the configuration for `base_directory`.
    ///
    /// An explicit path must exist. Without one, `<base>/fleet.yaml` is read
    /// when present and defaults are used otherwise.
    pub fn load(&self, base_directory: &Path, explicit: Option<&Path>) -> FleetResult<FleetConfig> {
        let config = match explicit {
            Some(path) => {
                let path = if path.is_absolute() {
                    path.to_path_buf()
                } else {
                    base_directory.join(path)
                };
                if !path.is_file() {
                    return Err(FleetError::config_error(format!(
                        "Configuration file not found: {}",
                        path.display()
                    )));
                }
                self.read(&path)?
            }
            None => {
                let path = Self::default_path(base_directory);
                if path.is_file() {
                    self.read(&path)?
                } else {
                    tracing::debug!("no {} found, using defaults", CONFIG_FILE_NAME);
                    FleetConfig::default()
                }
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Read and parse a configuration file
    pub fn read(&self, path: &Path) -> FleetResult<FleetConfig> {
        let content =
            std::fs::read_to_string(path).with_path(path, "Failed to read configuration")?;

        // An empty file is a valid "all defaults" configuration
        if content.trim().is_empty() {
            return Ok(FleetConfig::default());
        }

        let config: FleetConfig = serde_yaml::from_str(&content).map_err(|e| {
            FleetError::config_error_with_source(
                format!("Failed to parse {}", path.display()),
                e,
            )
        })?;

        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Write a configuration file
    pub fn write(&self, path: &Path, config: &FleetConfig) -> FleetResult<()> {
        let content = serde_yaml::to_string(config)?;
        std::fs::write(path, content).with_path(path, "Failed to write configuration")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_default_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = ConfigStore::new().load(temp_dir.path(), None).unwrap();
        assert_eq!(config, FleetConfig::default());
    }

    #[test]
    fn test_default_file_is_read() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("fleet.yaml"),
            "remote_base: git@github.com:example\nmax_concurrency: 4\n",
        )
        .unwrap();

        let config = ConfigStore::new().load(temp_dir.path(), None).unwrap();
        assert_eq!(config.remote_base, "git@github.com:example");
        assert_eq!(config.max_concurrency, Some(4));
        assert_eq!(config.trunk_branch, "main");
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = ConfigStore::new().load(temp_dir.path(), Some(Path::new("custom.yaml")));
        assert!(matches!(result, Err(FleetError::ConfigError { .. })));
    }

    #[test]
    fn test_explicit_relative_path_is_resolved_against_base() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("custom.yaml"), "trunk_branch: trunk\n").unwrap();

        let config = ConfigStore::new()
            .load(temp_dir.path(), Some(Path::new("custom.yaml")))
            .unwrap();
        assert_eq!(config.trunk_branch, "trunk");
    }

    #[test]
    fn test_empty_file_means_defaults() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("fleet.yaml"), "\n").unwrap();

        let config = ConfigStore::new().load(temp_dir.path(), None).unwrap();
        assert_eq!(config, FleetConfig::default());
    }

    #[test]
    fn test_invalid_values_fail_validation() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("fleet.yaml"), "timeout_secs: 0\n").unwrap();

        let result = ConfigStore::new().load(temp_dir.path(), None);
        assert!(matches!(result, Err(FleetError::ConfigError { .. })));
    }

    #[test]
    fn test_malformed_yaml() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("fleet.yaml"), "max_concurrency: [oops\n").unwrap();

        let result = ConfigStore::new().load(temp_dir.path(), None);
        assert!(matches!(result, Err(FleetError::ConfigError { .. })));
    }

    #[test]
    fn test_write_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let store = ConfigStore::new();
        let config = FleetConfig::default().with_trunk_branch("develop").with_timeout(120);

        store.write(&ConfigStore::default_path(temp_dir.path()), &config).unwrap();
        let loaded = store.load(temp_dir.path(), None).unwrap();
        assert_eq!(loaded, config);
    }
}
