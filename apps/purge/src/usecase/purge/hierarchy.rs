//! # サブワークフローの親側クリーンアップ
//!
//! サブワークフローの実行履歴は、親ワークフロー ID と起動元タスク ID で
//! 記録されている。ID の前方一致では拾えないため、`P.T` を `(P, T)` に分割し、
//! 実行履歴エンティティから該当行を削除する。

use std::sync::Arc;

use flowsweep_domain::{
    catalog::EntityCatalog,
    purge::{EntityPurgeCount, PurgeScope},
    workflow::{ParentTask, WorkflowId},
};
use flowsweep_infra::{InfraError, db::TxContext, deletion::EntityRowDeleter};

use super::PurgeMode;

/// サブワークフローの親側クリーンアップ
pub struct HierarchyResolver {
    row_deleter: Arc<dyn EntityRowDeleter>,
    catalog:     Arc<EntityCatalog>,
}

impl HierarchyResolver {
    pub fn new(row_deleter: Arc<dyn EntityRowDeleter>, catalog: Arc<EntityCatalog>) -> Self {
        Self {
            row_deleter,
            catalog,
        }
    }

    /// 親ワークフロー側に残る実行履歴を削除する
    ///
    /// サブワークフローでない ID（区切り文字なし、または `".x"` のように
    /// 分割すると空になる ID）の場合は何もせず空の結果を返す。
    pub async fn resolve_parent_cleanup(
        &self,
        tx: &mut TxContext,
        workflow_id: &WorkflowId,
        mode: PurgeMode,
    ) -> Result<Vec<EntityPurgeCount>, InfraError> {
        let Some(split) = workflow_id.split_sub_workflow() else {
            return Ok(Vec::new());
        };
        let key = ParentTask::from(split);

        let mut counts = Vec::new();
        for entity in self.catalog.execution_history() {
            let deleted = match mode {
                PurgeMode::Execute => {
                    self.row_deleter
                        .delete_by_parent_task(tx, entity, &key)
                        .await?
                }
                PurgeMode::Preview => {
                    self.row_deleter
                        .count_by_parent_task(tx, entity, &key)
                        .await?
                }
            };

            tracing::info!(
                entity = entity.name(),
                parent = %key.parent,
                task = %key.task,
                deleted,
                %mode,
                "親ワークフロー側の実行履歴を処理"
            );
            counts.push(EntityPurgeCount {
                entity: entity.name(),
                scope: PurgeScope::ParentTask,
                deleted,
            });
        }

        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use flowsweep_domain::catalog::{EntityDescriptor, ExecutionHistoryKind};
    use flowsweep_infra::{db::TransactionManager, fake::FakeWorkflowStore};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn catalog() -> Arc<EntityCatalog> {
        Arc::new(
            EntityCatalog::builder()
                .register(
                    EntityDescriptor::workflow_scoped("workflow_runs", "workflow_runs", "workflow_id")
                        .with_task_column("task_id")
                        .execution_history(ExecutionHistoryKind::WorkflowRun),
                )
                .register(
                    EntityDescriptor::workflow_scoped("task_instances", "task_instances", "workflow_id")
                        .with_task_column("task_id")
                        .execution_history(ExecutionHistoryKind::TaskInstance),
                )
                .register(
                    EntityDescriptor::workflow_scoped("xcom_entries", "xcom_entries", "workflow_id")
                        .with_task_column("task_id"),
                )
                .build()
                .unwrap(),
        )
    }

    fn seeded_store() -> FakeWorkflowStore {
        let store = FakeWorkflowStore::new();
        store.insert_task_row("workflow_runs", "daily_etl", "load_task");
        store.insert_task_row("workflow_runs", "daily_etl", "load_task");
        store.insert_task_row("workflow_runs", "daily_etl", "extract_task");
        store.insert_task_row("task_instances", "daily_etl", "load_task");
        store.insert_task_row("xcom_entries", "daily_etl", "load_task");
        store
    }

    fn resolver(store: &FakeWorkflowStore) -> HierarchyResolver {
        HierarchyResolver::new(Arc::new(store.clone()), catalog())
    }

    #[tokio::test]
    async fn test_親タスクの実行履歴のみを削除する() {
        let store = seeded_store();
        let mut tx = store.begin().await.unwrap();

        let counts = resolver(&store)
            .resolve_parent_cleanup(
                &mut tx,
                &WorkflowId::new("daily_etl.load_task").unwrap(),
                PurgeMode::Execute,
            )
            .await
            .unwrap();
        tx.commit().await.unwrap();

        let actual: Vec<(&str, u64)> = counts.iter().map(|c| (c.entity, c.deleted)).collect();
        assert_eq!(actual, vec![("workflow_runs", 2), ("task_instances", 1)]);
        assert!(counts.iter().all(|c| c.scope == PurgeScope::ParentTask));
        assert_eq!(store.count("workflow_runs"), 1);
        assert_eq!(store.count("xcom_entries"), 1);
    }

    #[rstest]
    #[case("daily_etl")]
    #[case(".load_task")]
    #[case("daily_etl.")]
    #[tokio::test]
    async fn test_サブワークフローでなければ何もしない(#[case] raw: &str) {
        let store = seeded_store();
        let mut tx = store.begin().await.unwrap();

        let counts = resolver(&store)
            .resolve_parent_cleanup(&mut tx, &WorkflowId::new(raw).unwrap(), PurgeMode::Execute)
            .await
            .unwrap();

        assert!(counts.is_empty());
    }

    #[tokio::test]
    async fn test_多段のサブワークフローは最後の区切りで分割する() {
        let store = FakeWorkflowStore::new();
        store.insert_task_row("task_instances", "daily_etl.load_task", "copy");
        store.insert_task_row("task_instances", "daily_etl", "load_task");
        let mut tx = store.begin().await.unwrap();

        let counts = resolver(&store)
            .resolve_parent_cleanup(
                &mut tx,
                &WorkflowId::new("daily_etl.load_task.copy").unwrap(),
                PurgeMode::Preview,
            )
            .await
            .unwrap();

        assert_eq!(
            counts.iter().map(|c| c.deleted).collect::<Vec<_>>(),
            vec![0, 1]
        );
    }
}
