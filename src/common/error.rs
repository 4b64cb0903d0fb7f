use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FleetError {
    #[error("Manifest directory not found: {}", path.display())]
    ManifestDirectoryNotFound { path: PathBuf },

    #[error(
        "Duplicate repository '{name}' declared by {} and {}",
        first.display(),
        second.display()
    )]
    DuplicateRepository {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("File system operation failed: {message}")]
    FileSystemError {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Serialization error: {message}")]
    SerializationError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl FleetError {
    pub fn manifest_directory_not_found(path: impl Into<PathBuf>) -> Self {
        Self::ManifestDirectoryNotFound { path: path.into() }
    }

    pub fn duplicate_repository(
        name: impl Into<String>,
        first: impl Into<PathBuf>,
        second: impl Into<PathBuf>,
    ) -> Self {
        Self::DuplicateRepository {
            name: name.into(),
            first: first.into(),
            second: second.into(),
        }
    }

    pub fn filesystem_error(message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::FileSystemError {
            message: message.into(),
            path,
            source: None,
        }
    }

    pub fn filesystem_error_with_source(
        message: impl Into<String>,
        path: Option<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::FileSystemError {
            message: message.into(),
            path,
            source: Some(source),
        }
    }

    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
            source: None,
        }
    }

    pub fn config_error_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::ConfigError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn serialization_error_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::SerializationError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

impl From<serde_yaml::Error> for FleetError {
    fn from(error: serde_yaml::Error) -> Self {
        Self::serialization_error_with_source("YAML serialization failed", error)
    }
}

impl From<validator::ValidationErrors> for FleetError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::config_error_with_source("Invalid configuration", errors)
    }
}
