use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::common::error::FleetError;
use crate::common::result::FleetResult;
use crate::domain::value_objects::repository_name::RepositoryName;

/// Manifest file extensions that register a service
pub const MANIFEST_EXTENSIONS: &[&str] = &[".yaml", ".yml"];

/// Derives repository names from a directory of service manifests
///
/// Only the presence of a file matters; its contents are never read.
#[derive(Debug, Clone)]
pub struct ManifestScanner {
    extensions: Vec<String>,
}

impl Default for ManifestScanner {
    fn default() -> Self {
        Self {
            extensions: MANIFEST_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }
}

impl ManifestScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan `directory` (non-recursively) and return repository names sorted by name.
    ///
    /// Two manifests resolving to the same name are rejected with
    /// [`FleetError::DuplicateRepository`].
    pub fn scan(&self, directory: &Path) -> FleetResult<Vec<RepositoryName>> {
        if !directory.is_dir() {
            return Err(FleetError::manifest_directory_not_found(directory));
        }

        let mut found: BTreeMap<RepositoryName, PathBuf> = BTreeMap::new();

        for entry in WalkDir::new(directory)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| {
                let path = e
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| directory.to_path_buf());
                match e.into_io_error() {
                    Some(source) => FleetError::filesystem_error_with_source(
                        format!("Failed to read manifest directory: {}", path.display()),
                        Some(path),
                        source,
                    ),
                    None => FleetError::filesystem_error(
                        format!("Failed to read manifest directory: {}", path.display()),
                        Some(path),
                    ),
                }
            })?;

            // Follows symlinks; directories named like manifests are ignored
            if !entry.path().is_file() {
                continue;
            }

            let file_name = entry.file_name().to_string_lossy();
            let Some(stem) = self.strip_extension(&file_name) else {
                continue;
            };

            let name = match RepositoryName::new(stem) {
                Ok(name) => name,
                Err(e) => {
                    tracing::warn!(
                        file = %entry.path().display(),
                        "ignoring manifest with unusable name: {}",
                        e
                    );
                    continue;
                }
            };

            if let Some(first) = found.get(&name) {
                return Err(FleetError::duplicate_repository(
                    name.as_str(),
                    first.clone(),
                    entry.path(),
                ));
            }
            found.insert(name, entry.path().to_path_buf());
        }

        tracing::debug!(
            directory = %directory.display(),
            count = found.len(),
            "scanned service manifests"
        );

        Ok(found.into_keys().collect())
    }

    /// Strip a recognized manifest extension from a file name
    fn strip_extension<'a>(&self, file_name: &'a str) -> Option<&'a str> {
        self.extensions
            .iter()
            .find_map(|ext| file_name.strip_suffix(ext.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn names(repos: &[RepositoryName]) -> Vec<&str> {
        repos.iter().map(|r| r.as_str()).collect()
    }

    #[test]
    fn test_scan_accepts_both_extensions() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("serviceA.yaml"), "services: {}\n").unwrap();
        fs::write(temp_dir.path().join("serviceB.yml"), "").unwrap();

        let repos = ManifestScanner::new().scan(temp_dir.path()).unwrap();
        assert_eq!(names(&repos), vec!["serviceA", "serviceB"]);
    }

    #[test]
    fn test_scan_ignores_other_files_and_directories() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("README.md"), "docs").unwrap();
        fs::write(temp_dir.path().join("compose.yaml.bak"), "").unwrap();
        fs::write(temp_dir.path().join("UPPER.YAML"), "").unwrap();
        fs::create_dir(temp_dir.path().join("nested.yaml")).unwrap();
        fs::create_dir(temp_dir.path().join("sub")).unwrap();
        fs::write(temp_dir.path().join("sub").join("deep.yaml"), "").unwrap();
        fs::write(temp_dir.path().join("real.yml"), "").unwrap();

        let repos = ManifestScanner::new().scan(temp_dir.path()).unwrap();
        assert_eq!(names(&repos), vec!["real"]);
    }

    #[test]
    fn test_scan_strips_only_the_suffix() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("my.yaml-service.yaml"), "").unwrap();

        let repos = ManifestScanner::new().scan(temp_dir.path()).unwrap();
        assert_eq!(names(&repos), vec!["my.yaml-service"]);
    }

    #[test]
    fn test_scan_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let repos = ManifestScanner::new().scan(temp_dir.path()).unwrap();
        assert!(repos.is_empty());
    }

    #[test]
    fn test_scan_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("service-compose");

        let error = ManifestScanner::new().scan(&missing).unwrap_err();
        match error {
            FleetError::ManifestDirectoryNotFound { path } => assert_eq!(path, missing),
            other => panic!("Expected ManifestDirectoryNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_scan_rejects_duplicate_names() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("api.yaml"), "").unwrap();
        fs::write(temp_dir.path().join("api.yml"), "").unwrap();

        let error = ManifestScanner::new().scan(temp_dir.path()).unwrap_err();
        match error {
            FleetError::DuplicateRepository { name, first, second } => {
                assert_eq!(name, "api");
                assert_eq!(first, temp_dir.path().join("api.yaml"));
                assert_eq!(second, temp_dir.path().join("api.yml"));
            }
            other => panic!("Expected DuplicateRepository, got {:?}", other),
        }
    }

    #[test]
    fn test_scan_skips_invalid_names() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(".yaml"), "").unwrap();
        fs::write(temp_dir.path().join("-evil.yml"), "").unwrap();
        fs::write(temp_dir.path().join("good.yaml"), "").unwrap();

        let repos = ManifestScanner::new().scan(temp_dir.path()).unwrap();
        assert_eq!(names(&repos), vec!["good"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_scan_follows_symlinked_manifests() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("shared.yaml.src");
        fs::write(&target, "").unwrap();
        std::os::unix::fs::symlink(&target, temp_dir.path().join("linked.yaml")).unwrap();

        let repos = ManifestScanner::new().scan(temp_dir.path()).unwrap();
        assert_eq!(names(&repos), vec!["linked"]);
    }
}
