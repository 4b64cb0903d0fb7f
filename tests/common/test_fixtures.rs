//! Test fixtures for creating fleet directories
//!
//! A fleet directory is a base directory holding the manifest directory
//! (`service-compose/`) and the checkout directory (`services/`).

use std::path::{Path, PathBuf};
use tempfile::TempDir;

use fleet_sync::domain::value_objects::repository_name::RepositoryName;

/// Temporary fleet directory
pub struct FleetFixture {
    pub temp_dir: TempDir,
}

impl FleetFixture {
    /// Create an empty fleet with an empty manifest directory
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir_all(temp_dir.path().join("service-compose")).unwrap();
        Self { temp_dir }
    }

    /// Create a fleet with one `.yaml` manifest per name
    pub fn with_services(names: &[&str]) -> Self {
        let fixture = Self::new();
        for name in names {
            fixture.add_manifest(&format!("{}.yaml", name));
        }
        fixture
    }

    pub fn base(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn manifest_dir(&self) -> PathBuf {
        self.base().join("service-compose")
    }

    pub fn services_dir(&self) -> PathBuf {
        self.base().join("services")
    }

    pub fn service_path(&self, name: &str) -> PathBuf {
        self.services_dir().join(name)
    }

    /// Add a manifest file (any file name, with extension)
    pub fn add_manifest(&self, file_name: &str) -> &Self {
        std::fs::write(
            self.manifest_dir().join(file_name),
            "services:\n  app:\n    image: example\n",
        )
        .unwrap();
        self
    }

    /// Pretend a service has already been cloned
    pub fn check_out(&self, name: &str) -> &Self {
        std::fs::create_dir_all(self.service_path(name).join(".git")).unwrap();
        self
    }

    /// Write `fleet.yaml` in the base directory
    pub fn write_config(&self, content: &str) -> &Self {
        std::fs::write(self.base().join("fleet.yaml"), content).unwrap();
        self
    }
}

/// Build repository names from string literals
pub fn names(values: &[&str]) -> Vec<RepositoryName> {
    values
        .iter()
        .map(|v| RepositoryName::new(v).unwrap())
        .collect()
}
