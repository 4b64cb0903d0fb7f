use serde::Serialize;
use std::path::{Path, PathBuf};

use super::repository_name::RepositoryName;

/// リポジトリのローカル配置場所
///
/// 配置ポリシーは「ネスト方式」のみ: 全リポジトリは
/// `<base_directory>/<services_dir>/<name>` に置かれる。
/// 解決は純粋関数で、ファイルシステムには触れない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryLocation {
    /// リポジトリ名
    pub name: RepositoryName,

    /// チェックアウト先のパス
    pub path: PathBuf,
}

impl RepositoryLocation {
    /// ベースディレクトリとサービスディレクトリから配置場所を解決
    pub fn resolve(base_directory: &Path, services_dir: &Path, name: &RepositoryName) -> Self {
        Self {
            name: name.clone(),
            path: base_directory.join(services_dir).join(name.as_str()),
        }
    }

    /// チェックアウト先のパスを取得
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_nested_location() {
        let name = RepositoryName::new("ffc-grants-web").unwrap();
        let location = RepositoryLocation::resolve(
            Path::new("/work/core"),
            Path::new("services"),
            &name,
        );

        assert_eq!(location.name, name);
        assert_eq!(location.path(), Path::new("/work/core/services/ffc-grants-web"));
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let name = RepositoryName::new("svc").unwrap();
        let first = RepositoryLocation::resolve(Path::new("base"), Path::new("services"), &name);
        let second = RepositoryLocation::resolve(Path::new("base"), Path::new("services"), &name);
        assert_eq!(first, second);
    }

    #[test]
    fn test_absolute_services_dir_wins() {
        let name = RepositoryName::new("svc").unwrap();
        let location = RepositoryLocation::resolve(
            Path::new("/work/core"),
            Path::new("/opt/checkouts"),
            &name,
        );
        assert_eq!(location.path(), Path::new("/opt/checkouts/svc"));
    }
}
