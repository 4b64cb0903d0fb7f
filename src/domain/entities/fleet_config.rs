use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use validator::Validate;

/// デフォルトのマニフェストディレクトリ名
pub const DEFAULT_MANIFEST_DIR: &str = "service-compose";

/// デフォルトのチェックアウト先ディレクトリ名
pub const DEFAULT_SERVICES_DIR: &str = "services";

/// デフォルトのリモートベース
pub const DEFAULT_REMOTE_BASE: &str = "https://github.com/DEFRA";

/// デフォルトのトランクブランチ
pub const DEFAULT_TRUNK_BRANCH: &str = "main";

/// 設定ファイル名
pub const CONFIG_FILE_NAME: &str = "fleet.yaml";

/// フリート全体の設定（`fleet.yaml`）
///
/// 全フィールドにデフォルトがあるため、設定ファイルは省略可能。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default, deny_unknown_fields)]
pub struct FleetConfig {
    /// サービスマニフェストを置くディレクトリ（ベースディレクトリからの相対パス）
    pub manifest_dir: PathBuf,

    /// リポジトリをチェックアウトするディレクトリ（ベースディレクトリからの相対パス）
    pub services_dir: PathBuf,

    /// クローンURLのベース（`<remote_base>/<name>.git`）
    #[validate(length(min = 1))]
    pub remote_base: String,

    /// updateでチェックアウトするブランチ
    #[validate(length(min = 1, max = 255))]
    pub trunk_branch: String,

    /// gitの実行ファイル
    #[validate(length(min = 1))]
    pub git_executable: String,

    /// 同時実行数の上限（Noneの場合は無制限）
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1))]
    pub max_concurrency: Option<usize>,

    /// 外部コマンドのタイムアウト（秒、Noneの場合は無制限）
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1))]
    pub timeout_secs: Option<u64>,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            manifest_dir: PathBuf::from(DEFAULT_MANIFEST_DIR),
            services_dir: PathBuf::from(DEFAULT_SERVICES_DIR),
            remote_base: DEFAULT_REMOTE_BASE.to_string(),
            trunk_branch: DEFAULT_TRUNK_BRANCH.to_string(),
            git_executable: "git".to_string(),
            max_concurrency: None,
            timeout_secs: None,
        }
    }
}

impl FleetConfig {
    pub fn with_remote_base(mut self, remote_base: impl Into<String>) -> Self {
        self.remote_base = remote_base.into();
        self
    }

    pub fn with_trunk_branch(mut self, trunk_branch: impl Into<String>) -> Self {
        self.trunk_branch = trunk_branch.into();
        self
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = Some(max_concurrency);
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }
}
