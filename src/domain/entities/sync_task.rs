use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::domain::value_objects::{
    repository_location::RepositoryLocation, repository_name::RepositoryName,
};

/// 同期操作の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncOperation {
    /// 未チェックアウトのリポジトリをクローン
    Clone,
    /// 既存チェックアウトでpull
    Pull,
    /// トランクブランチをチェックアウトしてからpull
    Update,
}

impl SyncOperation {
    /// 成功時の表示に使う過去形の動詞
    pub fn past_tense(&self) -> &'static str {
        match self {
            SyncOperation::Clone => "cloned",
            SyncOperation::Pull => "pulled",
            SyncOperation::Update => "updated",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SyncOperation::Clone => "clone",
            SyncOperation::Pull => "pull",
            SyncOperation::Update => "update",
        }
    }
}

impl fmt::Display for SyncOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 並行実行の単位となる同期タスク
#[derive(Debug, Clone)]
pub struct SyncTask {
    pub name: RepositoryName,
    pub location: RepositoryLocation,
    pub operation: SyncOperation,
}

impl SyncTask {
    pub fn new(location: RepositoryLocation, operation: SyncOperation) -> Self {
        Self {
            name: location.name.clone(),
            location,
            operation,
        }
    }
}

/// 同期結果のステータス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    /// 成功
    Success,
    /// スキップ（前提条件を満たさない）
    Skipped,
    /// 失敗
    Failed,
}

/// 単一リポジトリの同期結果
///
/// タスクごとにちょうど一度だけ生成され、生成後に変更されることはない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncResult {
    /// リポジトリ名
    pub name: RepositoryName,

    /// 実行した操作
    pub operation: SyncOperation,

    /// 結果ステータス
    pub status: SyncStatus,

    /// 成功時は空、スキップ時は理由、失敗時はキャプチャしたstderrそのもの
    pub message: String,

    /// スキップ時に代わりに使うべき操作の案内
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,

    /// 失敗したステップのコマンドライン
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_command: Option<String>,

    /// 失敗したステップの終了コード
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
}

impl SyncResult {
    /// 成功結果を作成
    pub fn success(name: RepositoryName, operation: SyncOperation) -> Self {
        Self {
            name,
            operation,
            status: SyncStatus::Success,
            message: String::new(),
            hint: None,
            failed_command: None,
            exit_code: None,
        }
    }

    /// スキップ結果を作成
    pub fn skipped(
        name: RepositoryName,
        operation: SyncOperation,
        reason: impl Into<String>,
        hint: impl Into<String>,
    ) -> Self {
        Self {
            name,
            operation,
            status: SyncStatus::Skipped,
            message: reason.into(),
            hint: Some(hint.into()),
            failed_command: None,
            exit_code: None,
        }
    }

    /// 失敗結果を作成
    pub fn failed(
        name: RepositoryName,
        operation: SyncOperation,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name,
            operation,
            status: SyncStatus::Failed,
            message: message.into(),
            hint: None,
            failed_command: None,
            exit_code: None,
        }
    }

    /// 失敗したコマンドと終了コードを設定
    pub fn with_failed_command(
        mut self,
        command: impl Into<String>,
        exit_code: Option<i32>,
    ) -> Self {
        self.failed_command = Some(command.into());
        self.exit_code = exit_code;
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == SyncStatus::Success
    }

    pub fn is_skipped(&self) -> bool {
        self.status == SyncStatus::Skipped
    }

    pub fn is_failure(&self) -> bool {
        self.status == SyncStatus::Failed
    }
}

/// 1回のオーケストレーション実行の集計レポート
#[derive(Debug, Clone)]
pub struct SyncReport {
    /// 実行した操作
    pub operation: SyncOperation,

    /// 完了順に並んだ結果
    pub results: Vec<SyncResult>,

    /// 実行開始時刻
    pub started_at: DateTime<Utc>,

    /// 全タスク完了までの所要時間
    pub elapsed: Duration,
}

impl SyncReport {
    pub fn new(operation: SyncOperation) -> Self {
        Self {
            operation,
            results: Vec::new(),
            started_at: Utc::now(),
            elapsed: Duration::ZERO,
        }
    }

    /// 結果を追加
    pub fn add_result(&mut self, result: SyncResult) {
        self.results.push(result);
    }

    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    pub fn skipped(&self) -> usize {
        self.results.iter().filter(|r| r.is_skipped()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.iter().filter(|r| r.is_failure()).count()
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// 失敗が一件もなければ成功（スキップは失敗に含めない）
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    /// 失敗した結果のみを取得
    pub fn failed_results(&self) -> Vec<&SyncResult> {
        self.results.iter().filter(|r| r.is_failure()).collect()
    }

    /// 名前で結果を検索
    pub fn result_for(&self, name: &str) -> Option<&SyncResult> {
        self.results.iter().find(|r| r.name.as_str() == name)
    }
}
