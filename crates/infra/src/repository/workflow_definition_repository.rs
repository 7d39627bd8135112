//! # WorkflowDefinitionRepository
//!
//! ワークフロー定義レコードの読み取りを担当するリポジトリ。
//!
//! ## 設計方針
//!
//! - **悲観的ロック**: 削除前は `SELECT ... FOR UPDATE` で定義レコードをロックする。
//!   同一ワークフローのパージが並行実行された場合、後続はロック解放まで待機する
//! - **ロックなし読み取り**: 件数の確認のみ（プレビュー）では [`find`] を使い、
//!   実行中のパージや定義の同期をブロックしない
//!
//! [`find`]: WorkflowDefinitionRepository::find
//! - **実行時クエリ**: 対象スキーマは外部で管理されるため、
//!   `sqlx::query!` のコンパイル時検証ではなく `sqlx::query_as` を使用する

use async_trait::async_trait;
use flowsweep_domain::{definition::WorkflowDefinitionRecord, workflow::WorkflowId};

use crate::{db::TxContext, error::InfraError};

/// ワークフロー定義テーブル名
pub const DEFINITION_TABLE: &str = "workflow_definitions";

/// ワークフロー定義リポジトリトレイト
#[async_trait]
pub trait WorkflowDefinitionRepository: Send + Sync {
    /// ID で定義レコードを取得し、行ロックを取得する
    ///
    /// # 戻り値
    ///
    /// - `Ok(Some(record))`: 定義が見つかった場合
    /// - `Ok(None)`: 定義が見つからない場合
    /// - `Err(_)`: データベースエラー
    async fn find_for_update(
        &self,
        tx: &mut TxContext,
        workflow_id: &WorkflowId,
    ) -> Result<Option<WorkflowDefinitionRecord>, InfraError>;

    /// ID で定義レコードを取得する（行ロックは取得しない）
    async fn find(
        &self,
        tx: &mut TxContext,
        workflow_id: &WorkflowId,
    ) -> Result<Option<WorkflowDefinitionRecord>, InfraError>;
}

/// PostgreSQL 実装の WorkflowDefinitionRepository
#[derive(Debug, Clone, Default)]
pub struct PostgresWorkflowDefinitionRepository;

impl PostgresWorkflowDefinitionRepository {
    pub fn new() -> Self {
        Self
    }
}

type DefinitionRow = (String, Option<String>, bool);

fn into_record(row: DefinitionRow) -> Result<WorkflowDefinitionRecord, InfraError> {
    let (id, fileloc, is_sub_workflow) = row;
    let id = WorkflowId::new(id).map_err(|e| InfraError::unexpected(e.to_string()))?;
    Ok(WorkflowDefinitionRecord::new(id, fileloc, is_sub_workflow))
}

#[async_trait]
impl WorkflowDefinitionRepository for PostgresWorkflowDefinitionRepository {
    #[tracing::instrument(skip_all, level = "debug", fields(%workflow_id))]
    async fn find_for_update(
        &self,
        tx: &mut TxContext,
        workflow_id: &WorkflowId,
    ) -> Result<Option<WorkflowDefinitionRecord>, InfraError> {
        let row: Option<DefinitionRow> = sqlx::query_as(
            r#"
            SELECT workflow_id, fileloc, is_sub_workflow
            FROM workflow_definitions
            WHERE workflow_id = $1
            FOR UPDATE
            "#,
        )
        .bind(workflow_id.as_str())
        .fetch_optional(tx.conn()?)
        .await?;

        row.map(into_record).transpose()
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%workflow_id))]
    async fn find(
        &self,
        tx: &mut TxContext,
        workflow_id: &WorkflowId,
    ) -> Result<Option<WorkflowDefinitionRecord>, InfraError> {
        let row: Option<DefinitionRow> = sqlx::query_as(
            r#"
            SELECT workflow_id, fileloc, is_sub_workflow
            FROM workflow_definitions
            WHERE workflow_id = $1
            "#,
        )
        .bind(workflow_id.as_str())
        .fetch_optional(tx.conn()?)
        .await?;

        row.map(into_record).transpose()
    }
}
