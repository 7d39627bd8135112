//! # ワークフロー行削除基盤
//!
//! エンティティカタログの各コレクションに対して、ワークフロー単位の
//! 削除・件数確認を行う。
//!
//! ## 概要
//!
//! - [`EntityRowDeleter`]: 1 つのエンティティ記述子に対して削除・件数確認を行うトレイト
//! - [`PostgresEntityRowDeleter`]: 記述子のテーブル名・列名から SQL を組み立てる実装
//! - [`standard_catalog`]: 本ツールが対象とする PostgreSQL スキーマのカタログ
//!
//! ## 照合規則
//!
//! | スコープ | 条件 |
//! |---|---|
//! | ワークフロー | `workflow_id = W OR workflow_id LIKE 'W.%'` |
//! | 親タスク | `workflow_id = P AND task_id = T` |
//!
//! LIKE パターンの `W` はエスケープしない。`%` や `_` を含む ID は
//! 意図より広い範囲に一致しうる。

mod postgres;
mod standard_catalog;

use async_trait::async_trait;
use flowsweep_domain::{
    catalog::EntityDescriptor,
    workflow::{ParentTask, WorkflowId},
};
pub use postgres::PostgresEntityRowDeleter;
pub use standard_catalog::{expected_entity_names, standard_catalog};

use crate::{db::TxContext, error::InfraError};

/// エンティティ行削除トレイト
///
/// 全メソッドが `TxContext` を要求する。呼び出し側が 1 つのトランザクションで
/// 全コレクションを処理し、最後にまとめてコミットする。
#[async_trait]
pub trait EntityRowDeleter: Send + Sync {
    /// ワークフロー ID が一致、または `W.` で始まる行を削除する
    ///
    /// ワークフロー ID 列を持たない記述子を渡した場合は `InvalidInput` を返す。
    async fn delete_by_workflow(
        &self,
        tx: &mut TxContext,
        entity: &EntityDescriptor,
        workflow_id: &WorkflowId,
    ) -> Result<u64, InfraError>;

    /// 親ワークフロー ID とタスク ID が一致する行を削除する
    ///
    /// タスク ID 列を持たない記述子を渡した場合は `InvalidInput` を返す。
    async fn delete_by_parent_task(
        &self,
        tx: &mut TxContext,
        entity: &EntityDescriptor,
        key: &ParentTask,
    ) -> Result<u64, InfraError>;

    /// `delete_by_workflow` が削除する行の件数を返す
    async fn count_by_workflow(
        &self,
        tx: &mut TxContext,
        entity: &EntityDescriptor,
        workflow_id: &WorkflowId,
    ) -> Result<u64, InfraError>;

    /// `delete_by_parent_task` が削除する行の件数を返す
    async fn count_by_parent_task(
        &self,
        tx: &mut TxContext,
        entity: &EntityDescriptor,
        key: &ParentTask,
    ) -> Result<u64, InfraError>;
}

/// 記述子からワークフロー ID 列名を取り出す
pub(crate) fn workflow_column(entity: &EntityDescriptor) -> Result<&'static str, InfraError> {
    entity.workflow_id_column().ok_or_else(|| {
        InfraError::invalid_input(format!(
            "{} はワークフロー ID 列を持ちません",
            entity.name()
        ))
    })
}

/// 記述子からワークフロー ID 列名とタスク ID 列名を取り出す
pub(crate) fn parent_task_columns(
    entity: &EntityDescriptor,
) -> Result<(&'static str, &'static str), InfraError> {
    let workflow = workflow_column(entity)?;
    let task = entity.task_id_column().ok_or_else(|| {
        InfraError::invalid_input(format!("{} はタスク ID 列を持ちません", entity.name()))
    })?;
    Ok((workflow, task))
}

#[cfg(test)]
mod tests {
    use flowsweep_domain::catalog::ExecutionHistoryKind;

    use super::*;
    use crate::error::InfraErrorKind;

    #[test]
    fn test_ワークフロー列のない記述子はinvalid_input() {
        let entity = EntityDescriptor::unscoped("import_errors", "import_errors");
        let err = workflow_column(&entity).unwrap_err();
        assert!(matches!(err.kind(), InfraErrorKind::InvalidInput(_)));
    }

    #[test]
    fn test_タスク列のない記述子はinvalid_input() {
        let entity = EntityDescriptor::workflow_scoped("xcom_entries", "xcom_entries", "workflow_id");
        let err = parent_task_columns(&entity).unwrap_err();
        assert!(matches!(err.kind(), InfraErrorKind::InvalidInput(_)));
    }

    #[test]
    fn test_実行履歴の記述子から列名を取り出せる() {
        let entity = EntityDescriptor::workflow_scoped("task_failures", "task_failures", "workflow_id")
            .with_task_column("task_id")
            .execution_history(ExecutionHistoryKind::TaskFailure);
        assert_eq!(
            parent_task_columns(&entity).unwrap(),
            ("workflow_id", "task_id")
        );
    }
}
