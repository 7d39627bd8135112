//! # 標準カタログ
//!
//! 本ツールが対象とする PostgreSQL スキーマのエンティティカタログ。
//!
//! 新しいコレクションをスキーマに追加した場合は、ここに記述子を登録し、
//! [`expected_entity_names`] にも名前を追加する（登録漏れ検出テスト用）。

use flowsweep_domain::{
    DomainError,
    catalog::{EntityCatalog, EntityDescriptor, ExecutionHistoryKind},
};

const WORKFLOW_ID: &str = "workflow_id";
const TASK_ID: &str = "task_id";

/// 標準スキーマのカタログを構築する
///
/// 定義テーブル（`workflow_definitions`）はガードの参照先であり、削除対象には含めない。
/// 定義レコードの削除は定義の登録・同期を担う側の責務。
pub fn standard_catalog() -> Result<EntityCatalog, DomainError> {
    EntityCatalog::builder()
        .register(EntityDescriptor::workflow_scoped(
            "workflow_tags",
            "workflow_tags",
            WORKFLOW_ID,
        ))
        // workflow_runs.task_id はサブワークフローを起動した親のタスク（トップレベルの実行では NULL）
        .register(
            EntityDescriptor::workflow_scoped("workflow_runs", "workflow_runs", WORKFLOW_ID)
                .with_task_column(TASK_ID)
                .execution_history(ExecutionHistoryKind::WorkflowRun),
        )
        .register(
            EntityDescriptor::workflow_scoped("task_instances", "task_instances", WORKFLOW_ID)
                .with_task_column(TASK_ID)
                .execution_history(ExecutionHistoryKind::TaskInstance),
        )
        .register(
            EntityDescriptor::workflow_scoped("task_failures", "task_failures", WORKFLOW_ID)
                .with_task_column(TASK_ID)
                .execution_history(ExecutionHistoryKind::TaskFailure),
        )
        .register(
            EntityDescriptor::workflow_scoped("task_reschedules", "task_reschedules", WORKFLOW_ID)
                .with_task_column(TASK_ID),
        )
        .register(
            EntityDescriptor::workflow_scoped("xcom_entries", "xcom_entries", WORKFLOW_ID)
                .with_task_column(TASK_ID),
        )
        .register(
            EntityDescriptor::workflow_scoped("sla_misses", "sla_misses", WORKFLOW_ID)
                .with_task_column(TASK_ID),
        )
        .register(EntityDescriptor::workflow_scoped(
            "serialized_workflows",
            "serialized_workflows",
            WORKFLOW_ID,
        ))
        .register(EntityDescriptor::workflow_scoped("event_logs", "event_logs", WORKFLOW_ID).audit())
        .register(EntityDescriptor::unscoped("import_errors", "import_errors"))
        .build()
}

/// 期待されるエンティティ名の一覧を返す（登録漏れ検出テスト用）
pub fn expected_entity_names() -> Vec<&'static str> {
    vec![
        "workflow_tags",
        "workflow_runs",
        "task_instances",
        "task_failures",
        "task_reschedules",
        "xcom_entries",
        "sla_misses",
        "serialized_workflows",
        "event_logs",
        "import_errors",
    ]
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::repository::DEFINITION_TABLE;

    #[test]
    fn test_標準カタログが構築できる() {
        let catalog = standard_catalog().unwrap();
        assert_eq!(catalog.names(), expected_entity_names());
    }

    #[test]
    fn test_実行履歴は3コレクション() {
        let catalog = standard_catalog().unwrap();
        let names: Vec<_> = catalog.execution_history().map(|e| e.name()).collect();
        assert_eq!(names, vec!["workflow_runs", "task_instances", "task_failures"]);
    }

    #[test]
    fn test_監査コレクションはevent_logsのみ() {
        let catalog = standard_catalog().unwrap();
        let names: Vec<_> = catalog.iter().filter(|e| e.is_audit()).map(|e| e.name()).collect();
        assert_eq!(names, vec!["event_logs"]);
    }

    #[test]
    fn test_定義テーブルはパージ対象に含まれない() {
        let catalog = standard_catalog().unwrap();
        assert!(catalog.iter().all(|e| e.table() != DEFINITION_TABLE));
    }
}
