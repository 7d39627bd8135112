//! # パージ要求と結果
//!
//! ワークフロー 1 件分のメタデータ削除の入力と出力を表す。

use serde::Serialize;

use crate::workflow::WorkflowId;

/// パージ要求
///
/// `keep_audit_records` が `true` の場合、監査コレクションは削除しない。
/// デフォルトは `true`（監査のために残す）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurgeRequest {
    workflow_id:        WorkflowId,
    keep_audit_records: bool,
}

impl PurgeRequest {
    /// 監査ログを残すパージ要求を作成する
    pub fn new(workflow_id: WorkflowId) -> Self {
        Self {
            workflow_id,
            keep_audit_records: true,
        }
    }

    /// 監査ログを残すかどうか
    pub fn keep_audit_records(&self) -> bool {
        self.keep_audit_records
    }

    /// 監査ログを残すかどうかを設定する
    pub fn with_keep_audit_records(mut self, keep: bool) -> Self {
        self.keep_audit_records = keep;
        self
    }

    pub fn workflow_id(&self) -> &WorkflowId {
        &self.workflow_id
    }
}

/// 削除件数のスコープ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PurgeScope {
    /// ワークフロー ID が一致、またはプレフィックス一致した行
    Workflow,
    /// 親ワークフロー ID + タスク ID で記録された実行履歴行
    ParentTask,
}

/// エンティティ単位の削除件数
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityPurgeCount {
    pub entity:  &'static str,
    pub scope:   PurgeScope,
    pub deleted: u64,
}

/// パージ結果
///
/// `total` は `entities` の `deleted` の合計。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurgeOutcome {
    workflow_id: WorkflowId,
    total:       u64,
    entities:    Vec<EntityPurgeCount>,
}

impl PurgeOutcome {
    pub fn new(workflow_id: WorkflowId, entities: Vec<EntityPurgeCount>) -> Self {
        let total = entities.iter().map(|e| e.deleted).sum();
        Self {
            workflow_id,
            total,
            entities,
        }
    }

    pub fn workflow_id(&self) -> &WorkflowId {
        &self.workflow_id
    }

    /// 全コレクションの合計削除件数
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn entities(&self) -> &[EntityPurgeCount] {
        &self.entities
    }

    /// 指定エンティティの削除件数（スコープ合算）
    pub fn deleted_for(&self, entity: &str) -> u64 {
        self.entities
            .iter()
            .filter(|e| e.entity == entity)
            .map(|e| e.deleted)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn workflow_id() -> WorkflowId {
        WorkflowId::new("daily_etl").unwrap()
    }

    #[test]
    fn test_デフォルトでは監査ログを残す() {
        let request = PurgeRequest::new(workflow_id());
        assert!(request.keep_audit_records());
    }

    #[test]
    fn test_監査ログを削除する要求を作成できる() {
        let request = PurgeRequest::new(workflow_id()).with_keep_audit_records(false);
        assert!(!request.keep_audit_records());
    }

    #[test]
    fn test_totalはエンティティ別件数の合計() {
        let outcome = PurgeOutcome::new(
            workflow_id(),
            vec![
                EntityPurgeCount {
                    entity:  "task_instances",
                    scope:   PurgeScope::Workflow,
                    deleted: 3,
                },
                EntityPurgeCount {
                    entity:  "workflow_runs",
                    scope:   PurgeScope::Workflow,
                    deleted: 1,
                },
                EntityPurgeCount {
                    entity:  "workflow_runs",
                    scope:   PurgeScope::ParentTask,
                    deleted: 2,
                },
            ],
        );

        assert_eq!(outcome.total(), 6);
        assert_eq!(outcome.deleted_for("workflow_runs"), 3);
        assert_eq!(outcome.deleted_for("missing"), 0);
    }

    #[test]
    fn test_空の結果のtotalは0() {
        let outcome = PurgeOutcome::new(workflow_id(), Vec::new());
        assert_eq!(outcome.total(), 0);
    }

    #[test]
    fn test_jsonにシリアライズできる() {
        let outcome = PurgeOutcome::new(
            workflow_id(),
            vec![EntityPurgeCount {
                entity:  "task_instances",
                scope:   PurgeScope::ParentTask,
                deleted: 2,
            }],
        );

        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(
            value,
            json!({
                "workflow_id": "daily_etl",
                "total": 2,
                "entities": [
                    {"entity": "task_instances", "scope": "parent_task", "deleted": 2}
                ]
            })
        );
    }
}
