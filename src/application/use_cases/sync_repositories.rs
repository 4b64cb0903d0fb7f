use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::sync::Semaphore;

use crate::application::services::sync_policy::SyncPolicy;
use crate::common::result::IoResultExt;
use crate::domain::entities::fleet_config::FleetConfig;
use crate::domain::entities::sync_task::{SyncOperation, SyncReport, SyncResult, SyncTask};
use crate::domain::value_objects::{
    remote_base::{RemoteBase, RemoteBaseError},
    repository_location::RepositoryLocation,
    repository_name::RepositoryName,
};
use crate::infrastructure::process::ProcessRunner;

/// SyncRepositories関連のエラー（実行開始前の致命的なエラーのみ）
#[derive(Debug, Error)]
pub enum SyncRepositoriesError {
    #[error("Invalid remote base: {0}")]
    InvalidRemoteBase(#[from] RemoteBaseError),

    #[error("Failed to prepare services directory: {0}")]
    PrepareFailed(#[from] crate::common::error::FleetError),
}

/// リポジトリ同期の設定
#[derive(Debug, Clone)]
pub struct SyncRepositoriesConfig {
    /// パス解決の基準ディレクトリ（プロセスのカレントディレクトリには依存しない）
    pub base_directory: PathBuf,

    /// チェックアウト先ディレクトリ（base_directoryからの相対）
    pub services_dir: PathBuf,

    /// クローンURLのベース
    pub remote_base: String,

    /// updateでチェックアウトするブランチ
    pub trunk_branch: String,

    /// gitの実行ファイル
    pub git_executable: String,

    /// 並列実行の最大数（Noneの場合は無制限）
    pub max_concurrency: Option<usize>,
}

impl SyncRepositoriesConfig {
    pub fn new(base_directory: impl Into<PathBuf>) -> Self {
        Self::from_fleet_config(base_directory, &FleetConfig::default())
    }

    /// FleetConfigから設定を作成
    pub fn from_fleet_config(base_directory: impl Into<PathBuf>, config: &FleetConfig) -> Self {
        Self {
            base_directory: base_directory.into(),
            services_dir: config.services_dir.clone(),
            remote_base: config.remote_base.clone(),
            trunk_branch: config.trunk_branch.clone(),
            git_executable: config.git_executable.clone(),
            max_concurrency: config.max_concurrency,
        }
    }

    pub fn with_remote_base(mut self, remote_base: impl Into<String>) -> Self {
        self.remote_base = remote_base.into();
        self
    }

    pub fn with_trunk_branch(mut self, trunk_branch: impl Into<String>) -> Self {
        self.trunk_branch = trunk_branch.into();
        self
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = Some(max_concurrency.max(1));
        self
    }

    /// チェックアウト先ディレクトリの絶対パス
    pub fn services_root(&self) -> PathBuf {
        self.base_directory.join(&self.services_dir)
    }
}

/// 全リポジトリに対して同期タスクを並行実行するオーケストレーター
///
/// リポジトリごとに独立したタスクを起動し、全タスクが結果を返すまで待つ。
/// あるタスクの失敗が他のタスクを中断・遅延させることはない。
pub struct SyncOrchestrator {
    /// 同期設定
    config: SyncRepositoriesConfig,

    /// 全タスクで共有する不変のポリシー
    policy: Arc<SyncPolicy>,
}

impl SyncOrchestrator {
    /// 新しいSyncOrchestratorインスタンスを作成
    pub fn new(
        config: SyncRepositoriesConfig,
        runner: Arc<dyn ProcessRunner>,
    ) -> Result<Self, SyncRepositoriesError> {
        let remote_base = RemoteBase::new(&config.remote_base)?;
        let policy = SyncPolicy::new(
            runner,
            config.git_executable.clone(),
            remote_base,
            config.trunk_branch.clone(),
            config.base_directory.clone(),
        );

        Ok(Self {
            config,
            policy: Arc::new(policy),
        })
    }

    /// リポジトリごとの同期タスクを作成
    pub fn plan(&self, names: &[RepositoryName], operation: SyncOperation) -> Vec<SyncTask> {
        names
            .iter()
            .map(|name| {
                let location = RepositoryLocation::resolve(
                    &self.config.base_directory,
                    &self.config.services_dir,
                    name,
                );
                SyncTask::new(location, operation)
            })
            .collect()
    }

    /// 同期を実行し、全結果をまとめたレポートを返す
    pub async fn execute(
        &self,
        names: &[RepositoryName],
        operation: SyncOperation,
    ) -> Result<SyncReport, SyncRepositoriesError> {
        self.execute_with(names, operation, |_| {}).await
    }

    /// 同期を実行し、各タスクの完了時に `on_result` を呼び出す
    ///
    /// `on_result` は完了順に呼ばれ、出力はここを経由してのみ行われる。
    pub async fn execute_with<F>(
        &self,
        names: &[RepositoryName],
        operation: SyncOperation,
        mut on_result: F,
    ) -> Result<SyncReport, SyncRepositoriesError>
    where
        F: FnMut(&SyncResult),
    {
        // 1. 実行前の準備（失敗は致命的）
        self.prepare(operation).await?;

        // 2. タスクの作成
        let tasks = self.plan(names, operation);
        let mut report = SyncReport::new(operation);
        let start_time = Instant::now();

        tracing::debug!(
            operation = %operation,
            tasks = tasks.len(),
            max_concurrency = ?self.config.max_concurrency,
            "launching sync tasks"
        );

        // 3. 全タスクを起動
        let semaphore = self
            .config
            .max_concurrency
            .map(|limit| Arc::new(Semaphore::new(limit.max(1))));

        let mut pending = FuturesUnordered::new();
        for task in tasks {
            let name = task.name.clone();
            let policy = Arc::clone(&self.policy);
            let semaphore = semaphore.clone();

            let handle = tokio::spawn(async move {
                let _permit = match semaphore {
                    Some(semaphore) => match semaphore.acquire_owned().await {
                        Ok(permit) => Some(permit),
                        Err(e) => {
                            return SyncResult::failed(
                                task.name.clone(),
                                task.operation,
                                format!("Failed to acquire worker slot: {}", e),
                            )
                        }
                    },
                    None => None,
                };
                policy.run(&task).await
            });

            // パニックしたタスクもそのリポジトリの失敗として扱う
            pending.push(handle.map(move |joined| match joined {
                Ok(result) => result,
                Err(join_error) => SyncResult::failed(
                    name,
                    operation,
                    format!("Sync task aborted: {}", join_error),
                ),
            }));
        }

        // 4. 完了順に結果を受け取る（全タスク完了まで待機）
        while let Some(result) = pending.next().await {
            on_result(&result);
            report.add_result(result);
        }

        report.elapsed = start_time.elapsed();

        tracing::info!(
            operation = %operation,
            succeeded = report.succeeded(),
            skipped = report.skipped(),
            failed = report.failed(),
            elapsed_ms = report.elapsed.as_millis() as u64,
            "sync finished"
        );

        Ok(report)
    }

    /// 操作ごとの事前準備
    async fn prepare(&self, operation: SyncOperation) -> Result<(), SyncRepositoriesError> {
        if operation == SyncOperation::Clone {
            let services_root = self.config.services_root();
            tokio::fs::create_dir_all(&services_root)
                .await
                .with_path(&services_root, "Failed to create services directory")?;
        }
        Ok(())
    }
}
