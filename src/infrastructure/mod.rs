/// Infrastructure layer modules
///
/// This layer provides concrete implementations for external system interactions:
/// - File system operations (manifest discovery, configuration file)
/// - Process execution (git invocations)
pub mod filesystem;
pub mod process;

// Re-export commonly used types
pub use filesystem::{config_store::ConfigStore, manifest_scanner::ManifestScanner};
pub use process::{ProcessError, ProcessOutput, ProcessRunner, SystemProcessRunner};
