use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::domain::entities::sync_task::{SyncOperation, SyncResult, SyncTask};
use crate::domain::value_objects::remote_base::RemoteBase;
use crate::infrastructure::process::{display_command, ProcessOutput, ProcessRunner};

/// 各同期操作（clone / pull / update）の状態遷移を実装するポリシー
///
/// 全てのエラーはここで [`SyncResult`] に変換され、呼び出し元に伝播しない。
pub struct SyncPolicy {
    /// 外部コマンド実行
    runner: Arc<dyn ProcessRunner>,

    /// gitの実行ファイル
    git_executable: String,

    /// クローンURLのベース
    remote_base: RemoteBase,

    /// updateでチェックアウトするブランチ
    trunk_branch: String,

    /// cloneを実行する作業ディレクトリ
    base_directory: PathBuf,
}

impl SyncPolicy {
    /// 新しいSyncPolicyインスタンスを作成
    pub fn new(
        runner: Arc<dyn ProcessRunner>,
        git_executable: impl Into<String>,
        remote_base: RemoteBase,
        trunk_branch: impl Into<String>,
        base_directory: impl Into<PathBuf>,
    ) -> Self {
        Self {
            runner,
            git_executable: git_executable.into(),
            remote_base,
            trunk_branch: trunk_branch.into(),
            base_directory: base_directory.into(),
        }
    }

    /// タスクの操作に応じたポリシーを実行
    pub async fn run(&self, task: &SyncTask) -> SyncResult {
        tracing::debug!(repo = %task.name, operation = %task.operation, "sync task started");

        let result = match task.operation {
            SyncOperation::Clone => self.clone_repository(task).await,
            SyncOperation::Pull => self.pull_repository(task).await,
            SyncOperation::Update => self.update_repository(task).await,
        };

        tracing::debug!(
            repo = %task.name,
            operation = %task.operation,
            status = ?result.status,
            "sync task finished"
        );
        result
    }

    /// clone: `start → [exists? → Skipped] → running-clone → {Success | Failed}`
    async fn clone_repository(&self, task: &SyncTask) -> SyncResult {
        let target = task.location.path();

        match self.path_exists(task, target).await {
            Ok(true) => {
                return SyncResult::skipped(
                    task.name.clone(),
                    task.operation,
                    "already exists",
                    "use `pull` or `update` to refresh it",
                )
            }
            Ok(false) => {}
            Err(failed) => return failed,
        }

        let url = self.remote_base.repository_url(&task.name);
        let target_arg = target.to_string_lossy();
        let command = self.git(&["clone", url.as_str(), &*target_arg]);

        match self.run_step(task, &command, &self.base_directory).await {
            Ok(_) => SyncResult::success(task.name.clone(), task.operation),
            Err(failed) => {
                self.discard_partial_clone(task, target).await;
                failed
            }
        }
    }

    /// 失敗したcloneが残したディレクトリを削除（次回のcloneでスキップされないように）
    async fn discard_partial_clone(&self, task: &SyncTask, target: &Path) {
        if !matches!(tokio::fs::try_exists(target).await, Ok(true)) {
            return;
        }

        match tokio::fs::remove_dir_all(target).await {
            Ok(()) => tracing::debug!(
                repo = %task.name,
                path = %target.display(),
                "removed partial clone"
            ),
            Err(e) => tracing::warn!(
                repo = %task.name,
                path = %target.display(),
                "failed to remove partial clone: {}",
                e
            ),
        }
    }

    /// pull: `start → [missing? → Skipped] → running-pull → {Success | Failed}`
    async fn pull_repository(&self, task: &SyncTask) -> SyncResult {
        let repo_path = task.location.path();

        if let Some(skipped) = self.skip_if_missing(task, repo_path).await {
            return skipped;
        }

        let command = self.git(&["pull"]);
        match self.run_step(task, &command, repo_path).await {
            Ok(_) => SyncResult::success(task.name.clone(), task.operation),
            Err(failed) => failed,
        }
    }

    /// update: `start → [missing? → Skipped] → running-checkout →
    /// [checkout-failed? → Failed] → running-pull → {Success | Failed}`
    async fn update_repository(&self, task: &SyncTask) -> SyncResult {
        let repo_path = task.location.path();

        if let Some(skipped) = self.skip_if_missing(task, repo_path).await {
            return skipped;
        }

        let checkout = self.git(&["checkout", self.trunk_branch.as_str()]);
        if let Err(failed) = self.run_step(task, &checkout, repo_path).await {
            return failed;
        }

        let pull = self.git(&["pull"]);
        match self.run_step(task, &pull, repo_path).await {
            Ok(_) => SyncResult::success(task.name.clone(), task.operation),
            Err(failed) => failed,
        }
    }

    /// チェックアウトが存在しなければスキップ結果を返す
    async fn skip_if_missing(&self, task: &SyncTask, repo_path: &Path) -> Option<SyncResult> {
        match self.path_exists(task, repo_path).await {
            Ok(true) => None,
            Ok(false) => Some(SyncResult::skipped(
                task.name.clone(),
                task.operation,
                "not cloned",
                "run `clone` first",
            )),
            Err(failed) => Some(failed),
        }
    }

    /// パスの存在確認（確認自体の失敗はFailedとして扱う）
    async fn path_exists(&self, task: &SyncTask, path: &Path) -> Result<bool, SyncResult> {
        tokio::fs::try_exists(path).await.map_err(|e| {
            SyncResult::failed(
                task.name.clone(),
                task.operation,
                format!("Failed to inspect {}: {}", path.display(), e),
            )
        })
    }

    /// 1ステップ実行し、終了コード0以外をFailed結果に変換
    async fn run_step(
        &self,
        task: &SyncTask,
        command: &[String],
        working_directory: &Path,
    ) -> Result<ProcessOutput, SyncResult> {
        let rendered = display_command(command);

        match self.runner.run(command, working_directory).await {
            Ok(output) if output.is_success() => Ok(output),
            Ok(output) => {
                tracing::debug!(
                    repo = %task.name,
                    command = %rendered,
                    exit_code = output.exit_code,
                    "step failed"
                );
                Err(
                    SyncResult::failed(task.name.clone(), task.operation, output.stderr)
                        .with_failed_command(rendered, Some(output.exit_code)),
                )
            }
            Err(e) => {
                tracing::debug!(
                    repo = %task.name,
                    command = %rendered,
                    "step could not run: {}",
                    e
                );
                Err(
                    SyncResult::failed(task.name.clone(), task.operation, e.to_string())
                        .with_failed_command(rendered, None),
                )
            }
        }
    }

    fn git(&self, args: &[&str]) -> Vec<String> {
        std::iter::once(self.git_executable.clone())
            .chain(args.iter().map(|arg| arg.to_string()))
            .collect()
    }
}
