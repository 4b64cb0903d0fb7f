use std::path::Path;

use crate::common::error::FleetError;

/// fleet-sync全体で使用するResult型のエイリアス
///
/// # Examples
///
/// ```
/// use fleet_sync::common::result::FleetResult;
/// use fleet_sync::common::error::FleetError;
///
/// fn example_function() -> FleetResult<String> {
///     Ok("success".to_string())
/// }
///
/// fn example_with_error() -> FleetResult<()> {
///     Err(FleetError::config_error("Something went wrong"))
/// }
/// ```
pub type FleetResult<T> = Result<T, FleetError>;

/// I/Oエラーにパス情報を付加するヘルパー
pub trait IoResultExt<T> {
    /// I/OエラーをパスつきのFileSystemErrorに変換する
    ///
    /// # Examples
    ///
    /// ```
    /// use fleet_sync::common::result::{FleetResult, IoResultExt};
    /// use std::path::Path;
    ///
    /// let path = Path::new("/definitely/not/here");
    /// let result: FleetResult<String> =
    ///     std::fs::read_to_string(path).with_path(path, "Failed to read file");
    /// assert!(result.is_err());
    /// ```
    fn with_path(self, path: &Path, message: &str) -> FleetResult<T>;
}

impl<T> IoResultExt<T> for Result<T, std::io::Error> {
    fn with_path(self, path: &Path, message: &str) -> FleetResult<T> {
        self.map_err(|source| {
            FleetError::filesystem_error_with_source(
                format!("{}: {}", message, path.display()),
                Some(path.to_path_buf()),
                source,
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_path_keeps_ok_values() {
        let ok: Result<u32, std::io::Error> = Ok(7);
        assert_eq!(ok.with_path(Path::new("/tmp"), "unused").unwrap(), 7);
    }

    #[test]
    fn test_with_path_attaches_path() {
        let err: Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        let error = err
            .with_path(Path::new("/srv/services"), "Failed to create directory")
            .unwrap_err();

        match error {
            FleetError::FileSystemError { message, path, source } => {
                assert_eq!(message, "Failed to create directory: /srv/services");
                assert_eq!(path.unwrap(), Path::new("/srv/services"));
                assert!(source.is_some());
            }
            other => panic!("Expected FileSystemError, got {:?}", other),
        }
    }
}
