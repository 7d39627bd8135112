//! # エンティティカタログ
//!
//! パージ対象となる永続化コレクション（テーブル）を列挙する。
//!
//! ## 設計判断
//!
//! コレクションは別の場所で定義され、時間とともに増える。削除処理に
//! テーブル名をハードコードせず、起動時に構築したカタログを注入する。
//!
//! 各エンティティが「ワークフロー ID 列を持つか」「タスク ID 列を持つか」
//! 「監査ログか」は [`EntityDescriptor`] に登録時点で明示する。
//! 実行時に属性の有無を調べることはしない。
//!
//! ## 使用例
//!
//! ```rust
//! use flowsweep_domain::catalog::{EntityCatalog, EntityDescriptor, ExecutionHistoryKind};
//!
//! let catalog = EntityCatalog::builder()
//!     .register(EntityDescriptor::workflow_scoped("workflow_runs", "workflow_runs", "workflow_id")
//!         .with_task_column("task_id")
//!         .execution_history(ExecutionHistoryKind::WorkflowRun))
//!     .register(EntityDescriptor::workflow_scoped("event_logs", "event_logs", "workflow_id").audit())
//!     .register(EntityDescriptor::unscoped("import_errors", "import_errors"))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(catalog.workflow_scoped().count(), 2);
//! assert_eq!(catalog.execution_history().count(), 1);
//! ```

use std::collections::HashSet;

use serde::Serialize;
use strum::IntoStaticStr;

use crate::DomainError;

/// 実行履歴コレクションの種別
///
/// サブワークフローの実行履歴は親ワークフロー ID + タスク ID で記録される。
/// この 3 種のコレクションが親スコープの削除対象になる。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, IntoStaticStr, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ExecutionHistoryKind {
    /// ワークフロー実行記録
    WorkflowRun,
    /// タスク失敗記録
    TaskFailure,
    /// タスクインスタンス
    TaskInstance,
}

/// エンティティの分類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, IntoStaticStr, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// 通常のコレクション
    Standard,
    /// 監査・履歴コレクション（ポリシーにより削除対象外にできる）
    Audit,
    /// 実行履歴コレクション（親スコープの削除対象）
    ExecutionHistory(ExecutionHistoryKind),
}

/// エンティティ記述子
///
/// 1 つのコレクションについて、名前・テーブル名・列名・分類を保持する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityDescriptor {
    name:               &'static str,
    table:              &'static str,
    workflow_id_column: Option<&'static str>,
    task_id_column:     Option<&'static str>,
    kind:               EntityKind,
}

impl EntityDescriptor {
    /// ワークフロー ID 列を持つエンティティを定義する
    pub const fn workflow_scoped(
        name: &'static str,
        table: &'static str,
        workflow_id_column: &'static str,
    ) -> Self {
        Self {
            name,
            table,
            workflow_id_column: Some(workflow_id_column),
            task_id_column: None,
            kind: EntityKind::Standard,
        }
    }

    /// ワークフロー ID 列を持たないエンティティを定義する
    ///
    /// カタログには載るが、パージでは常にスキップされる。
    pub const fn unscoped(name: &'static str, table: &'static str) -> Self {
        Self {
            name,
            table,
            workflow_id_column: None,
            task_id_column: None,
            kind: EntityKind::Standard,
        }
    }

    /// タスク ID 列を設定する
    pub const fn with_task_column(mut self, task_id_column: &'static str) -> Self {
        self.task_id_column = Some(task_id_column);
        self
    }

    /// 監査コレクションとして分類する
    pub const fn audit(mut self) -> Self {
        self.kind = EntityKind::Audit;
        self
    }

    /// 実行履歴コレクションとして分類する
    ///
    /// タスク ID 列が必須。未設定の場合は [`EntityCatalogBuilder::build`] がエラーを返す。
    pub const fn execution_history(mut self, kind: ExecutionHistoryKind) -> Self {
        self.kind = EntityKind::ExecutionHistory(kind);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn table(&self) -> &'static str {
        self.table
    }

    pub fn workflow_id_column(&self) -> Option<&'static str> {
        self.workflow_id_column
    }

    pub fn task_id_column(&self) -> Option<&'static str> {
        self.task_id_column
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// ワークフロー ID 列を持つか
    pub fn is_workflow_scoped(&self) -> bool {
        self.workflow_id_column.is_some()
    }

    /// 監査コレクションか
    pub fn is_audit(&self) -> bool {
        self.kind == EntityKind::Audit
    }

    /// 実行履歴コレクションか
    pub fn is_execution_history(&self) -> bool {
        matches!(self.kind, EntityKind::ExecutionHistory(_))
    }
}

/// エンティティカタログ
///
/// 登録順を保持する。パージはこの順序でコレクションを走査する。
#[derive(Debug, Clone, Default)]
pub struct EntityCatalog {
    entities: Vec<EntityDescriptor>,
}

impl EntityCatalog {
    pub fn builder() -> EntityCatalogBuilder {
        EntityCatalogBuilder::default()
    }

    /// 全エンティティを登録順に返す
    pub fn iter(&self) -> impl Iterator<Item = &EntityDescriptor> {
        self.entities.iter()
    }

    /// ワークフロー ID 列を持つエンティティのみ返す
    pub fn workflow_scoped(&self) -> impl Iterator<Item = &EntityDescriptor> {
        self.entities.iter().filter(|e| e.is_workflow_scoped())
    }

    /// 実行履歴エンティティのみ返す
    pub fn execution_history(&self) -> impl Iterator<Item = &EntityDescriptor> {
        self.entities.iter().filter(|e| e.is_execution_history())
    }

    /// 名前でエンティティを検索する
    pub fn find(&self, name: &str) -> Option<&EntityDescriptor> {
        self.entities.iter().find(|e| e.name == name)
    }

    /// 登録済みエンティティ名の一覧を返す
    pub fn names(&self) -> Vec<&'static str> {
        self.entities.iter().map(|e| e.name).collect()
    }
}

/// [`EntityCatalog`] のビルダー
#[derive(Debug, Default)]
pub struct EntityCatalogBuilder {
    entities: Vec<EntityDescriptor>,
}

impl EntityCatalogBuilder {
    /// エンティティを登録する
    pub fn register(mut self, entity: EntityDescriptor) -> Self {
        self.entities.push(entity);
        self
    }

    /// カタログを構築する
    ///
    /// # エラー
    ///
    /// - エンティティ名が重複している
    /// - 実行履歴エンティティにワークフロー ID 列またはタスク ID 列がない
    pub fn build(self) -> Result<EntityCatalog, DomainError> {
        let mut seen = HashSet::new();
        for entity in &self.entities {
            if !seen.insert(entity.name) {
                return Err(DomainError::Validation(format!(
                    "エンティティ名が重複しています: {}",
                    entity.name
                )));
            }
            if entity.is_execution_history()
                && (entity.workflow_id_column.is_none() || entity.task_id_column.is_none())
            {
                return Err(DomainError::Validation(format!(
                    "実行履歴エンティティにはワークフロー ID 列とタスク ID 列が必要です: {}",
                    entity.name
                )));
            }
        }

        Ok(EntityCatalog {
            entities: self.entities,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn task_instances() -> EntityDescriptor {
        EntityDescriptor::workflow_scoped("task_instances", "task_instances", "workflow_id")
            .with_task_column("task_id")
            .execution_history(ExecutionHistoryKind::TaskInstance)
    }

    fn event_logs() -> EntityDescriptor {
        EntityDescriptor::workflow_scoped("event_logs", "event_logs", "workflow_id").audit()
    }

    #[test]
    fn test_登録順が保持される() {
        let catalog = EntityCatalog::builder()
            .register(event_logs())
            .register(task_instances())
            .build()
            .unwrap();

        assert_eq!(catalog.names(), vec!["event_logs", "task_instances"]);
    }

    #[test]
    fn test_名前の重複はエラー() {
        let result = EntityCatalog::builder()
            .register(event_logs())
            .register(event_logs())
            .build();

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_タスク列のない実行履歴エンティティはエラー() {
        let result = EntityCatalog::builder()
            .register(
                EntityDescriptor::workflow_scoped("workflow_runs", "workflow_runs", "workflow_id")
                    .execution_history(ExecutionHistoryKind::WorkflowRun),
            )
            .build();

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_workflow_scopedはワークフロー列のないエンティティを除外する() {
        let catalog = EntityCatalog::builder()
            .register(EntityDescriptor::unscoped("import_errors", "import_errors"))
            .register(event_logs())
            .build()
            .unwrap();

        let names: Vec<_> = catalog.workflow_scoped().map(|e| e.name()).collect();
        assert_eq!(names, vec!["event_logs"]);
    }

    #[test]
    fn test_execution_historyは実行履歴のみ返す() {
        let catalog = EntityCatalog::builder()
            .register(event_logs())
            .register(task_instances())
            .build()
            .unwrap();

        let names: Vec<_> = catalog.execution_history().map(|e| e.name()).collect();
        assert_eq!(names, vec!["task_instances"]);
    }

    #[test]
    fn test_記述子の能力フラグ() {
        let audit = event_logs();
        assert!(audit.is_workflow_scoped());
        assert!(audit.is_audit());
        assert!(!audit.is_execution_history());

        let history = task_instances();
        assert!(!history.is_audit());
        assert!(history.is_execution_history());
        assert_eq!(history.task_id_column(), Some("task_id"));
    }

    #[test]
    fn test_findで名前から記述子を取得できる() {
        let catalog = EntityCatalog::builder()
            .register(task_instances())
            .build()
            .unwrap();

        assert_eq!(catalog.find("task_instances").map(|e| e.table()), Some("task_instances"));
        assert!(catalog.find("missing").is_none());
    }

    #[test]
    fn test_entity_kindの表示名() {
        assert_eq!(EntityKind::Audit.to_string(), "audit");
        assert_eq!(ExecutionHistoryKind::TaskFailure.to_string(), "task_failure");
    }
}
