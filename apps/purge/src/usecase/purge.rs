//! # ワークフローパージユースケース
//!
//! ワークフロー 1 件分のメタデータを単一トランザクションで削除する。
//!
//! ## 処理の流れ
//!
//! ```text
//! begin ─→ guard ─→ sweep ─→ hierarchy ─→ commit
//!            │         │          │
//!            └─────────┴──────────┴─→ エラー時は TxContext をドロップ（ロールバック）
//! ```
//!
//! - `guard`: 定義レコードの確認（実行時は行ロック）と定義ソースの存在確認（[`GuardChecker`]）
//! - `sweep`: カタログ駆動の一括削除（[`CascadeSweeper`]）
//! - `hierarchy`: サブワークフローの親側クリーンアップ（[`HierarchyResolver`]）
//!
//! 途中のエンティティで失敗した場合、それまでの削除もすべて取り消される。
//! 定義レコード自体は削除しないため、同じワークフローの再実行は 0 件で成功する。

mod guard;
mod hierarchy;
mod sweep;

use std::sync::Arc;

use flowsweep_domain::{
    catalog::EntityCatalog,
    purge::{PurgeOutcome, PurgeRequest},
};
use flowsweep_infra::{
    db::TransactionManager,
    definition_source::DefinitionSourceProbe,
    deletion::EntityRowDeleter,
    repository::WorkflowDefinitionRepository,
};
pub use guard::GuardChecker;
pub use hierarchy::HierarchyResolver;
pub use sweep::CascadeSweeper;

use crate::error::PurgeError;

/// 実行モード
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum PurgeMode {
    /// 削除してコミットする
    Execute,
    /// 件数を数えるだけで、トランザクションはコミットしない
    Preview,
}

/// ワークフローパージユースケース
pub struct WorkflowPurgeUseCaseImpl {
    tx_manager: Arc<dyn TransactionManager>,
    guard:      GuardChecker,
    sweeper:    CascadeSweeper,
    hierarchy:  HierarchyResolver,
}

impl WorkflowPurgeUseCaseImpl {
    pub fn new(
        tx_manager: Arc<dyn TransactionManager>,
        definition_repo: Arc<dyn WorkflowDefinitionRepository>,
        row_deleter: Arc<dyn EntityRowDeleter>,
        source_probe: Arc<dyn DefinitionSourceProbe>,
        catalog: Arc<EntityCatalog>,
    ) -> Self {
        Self {
            tx_manager,
            guard: GuardChecker::new(definition_repo, source_probe),
            sweeper: CascadeSweeper::new(row_deleter.clone(), catalog.clone()),
            hierarchy: HierarchyResolver::new(row_deleter, catalog),
        }
    }

    /// ワークフローと子孫のメタデータを削除する
    ///
    /// 成功時はエンティティ別の削除件数と合計を返す。
    /// `NotFound` / `StillActive` の場合は何も削除しない。
    #[tracing::instrument(
        skip_all,
        fields(
            workflow_id = %request.workflow_id(),
            keep_audit_records = request.keep_audit_records()
        )
    )]
    pub async fn purge(&self, request: &PurgeRequest) -> Result<PurgeOutcome, PurgeError> {
        self.run(request, PurgeMode::Execute).await
    }

    /// 削除せずに、削除されるはずの件数を返す
    ///
    /// ガードと件数計算は [`purge`](Self::purge) と同じ規則で行う。
    /// トランザクションはコミットせずに破棄する。
    #[tracing::instrument(
        skip_all,
        fields(
            workflow_id = %request.workflow_id(),
            keep_audit_records = request.keep_audit_records()
        )
    )]
    pub async fn preview(&self, request: &PurgeRequest) -> Result<PurgeOutcome, PurgeError> {
        self.run(request, PurgeMode::Preview).await
    }

    async fn run(&self, request: &PurgeRequest, mode: PurgeMode) -> Result<PurgeOutcome, PurgeError> {
        let workflow_id = request.workflow_id();
        let mut tx = self.tx_manager.begin().await?;

        self.guard.check(&mut tx, workflow_id, mode).await?;

        let mut entities = self
            .sweeper
            .sweep(&mut tx, workflow_id, request.keep_audit_records(), mode)
            .await?;
        entities.extend(
            self.hierarchy
                .resolve_parent_cleanup(&mut tx, workflow_id, mode)
                .await?,
        );

        let outcome = PurgeOutcome::new(workflow_id.clone(), entities);

        match mode {
            PurgeMode::Execute => {
                tx.commit().await?;
                tracing::info!(total = outcome.total(), "パージが完了しました");
            }
            PurgeMode::Preview => {
                drop(tx);
                tracing::info!(total = outcome.total(), "プレビューが完了しました（変更なし）");
            }
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use flowsweep_domain::{
        catalog::{EntityDescriptor, ExecutionHistoryKind},
        workflow::WorkflowId,
    };
    use flowsweep_infra::{
        deletion::standard_catalog,
        fake::{FakeWorkflowStore, StaticSourceProbe},
        repository::DEFINITION_TABLE,
    };
    use pretty_assertions::assert_eq;

    use super::*;

    fn sut(store: &FakeWorkflowStore, catalog: EntityCatalog) -> WorkflowPurgeUseCaseImpl {
        WorkflowPurgeUseCaseImpl::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(StaticSourceProbe::empty()),
            Arc::new(catalog),
        )
    }

    fn request(raw: &str) -> PurgeRequest {
        PurgeRequest::new(WorkflowId::new(raw).unwrap())
    }

    #[tokio::test]
    async fn test_標準カタログでパージしても定義レコードは残る() {
        let store = FakeWorkflowStore::new();
        store.insert_definition("daily_etl", None);
        store.insert_definition("daily_etl.load_task", None);
        store.insert_row("workflow_tags", "daily_etl");
        let sut = sut(&store, standard_catalog().unwrap());

        let outcome = sut.purge(&request("daily_etl")).await.unwrap();

        assert_eq!(outcome.deleted_for(DEFINITION_TABLE), 0);
        assert_eq!(outcome.deleted_for("workflow_tags"), 1);
        assert_eq!(outcome.total(), 1);
        assert_eq!(store.count(DEFINITION_TABLE), 2);
        assert_eq!(store.commit_count(), 1);
        assert_eq!(store.lock_count(), 1);
    }

    #[tokio::test]
    async fn test_失敗時はコミットしない() {
        let store = FakeWorkflowStore::new();
        store.insert_definition("daily_etl", None);
        store.fail_on("event_logs");
        let sut = sut(&store, standard_catalog().unwrap());

        let result = sut
            .purge(&request("daily_etl").with_keep_audit_records(false))
            .await;

        assert!(matches!(result, Err(PurgeError::Storage(_))));
        assert_eq!(store.count(DEFINITION_TABLE), 1);
        assert_eq!(store.commit_count(), 0);
    }

    #[tokio::test]
    async fn test_プレビューはコミットしない() {
        let store = FakeWorkflowStore::new();
        store.insert_definition("daily_etl", None);
        store.insert_row("workflow_tags", "daily_etl");
        let sut = sut(&store, standard_catalog().unwrap());

        let outcome = sut.preview(&request("daily_etl")).await.unwrap();

        assert_eq!(outcome.total(), 1);
        assert_eq!(store.count(DEFINITION_TABLE), 1);
        assert_eq!(store.count("workflow_tags"), 1);
        assert_eq!(store.commit_count(), 0);
        assert_eq!(store.lock_count(), 0);
        assert_eq!(store.pending_tx_count(), 0);
    }

    #[tokio::test]
    async fn test_結果はスイープの後に親側クリーンアップの件数が並ぶ() {
        let store = FakeWorkflowStore::new();
        store.insert_definition("daily_etl.load_task", None);
        store.insert_task_row("workflow_runs", "daily_etl", "load_task");
        let catalog = EntityCatalog::builder()
            .register(EntityDescriptor::workflow_scoped(
                "workflow_tags",
                "workflow_tags",
                "workflow_id",
            ))
            .register(
                EntityDescriptor::workflow_scoped("workflow_runs", "workflow_runs", "workflow_id")
                    .with_task_column("task_id")
                    .execution_history(ExecutionHistoryKind::WorkflowRun),
            )
            .build()
            .unwrap();
        let sut = sut(&store, catalog);

        let outcome = sut.purge(&request("daily_etl.load_task")).await.unwrap();

        let scopes: Vec<(&str, String)> = outcome
            .entities()
            .iter()
            .map(|c| (c.entity, c.scope.to_string()))
            .collect();
        assert_eq!(
            scopes,
            vec![
                ("workflow_tags", "workflow".to_string()),
                ("workflow_runs", "workflow".to_string()),
                ("workflow_runs", "parent_task".to_string()),
            ]
        );
        assert_eq!(outcome.total(), 1);
    }
}
